//! Whitespace-delimited text input and pattern output.
//!
//! Every non-empty line of an input file is one row. Tokens are separated by any whitespace.
//! Lines starting with `#` are comments.

use crate::error::Seq2PatError;
use crate::mining::Pattern;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

/// Sequences loaded from a file. Files where every token is a positive integer are read as
/// integer items, anything else as string items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceFile {
    Integers(Vec<Vec<u32>>),
    Strings(Vec<Vec<String>>),
}

impl SequenceFile {
    pub fn num_rows(&self) -> usize {
        match self {
            SequenceFile::Integers(rows) => rows.len(),
            SequenceFile::Strings(rows) => rows.len(),
        }
    }
}

/// Non-comment, non-empty lines with their 1-based line numbers.
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub fn parse_sequences(text: &str) -> SequenceFile {
    let rows: Vec<Vec<String>> = data_lines(text)
        .map(|(_, line)| line.split_whitespace().map(str::to_string).collect())
        .collect();
    let integers: Option<Vec<Vec<u32>>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|token| token.parse::<u32>().ok().filter(|it| *it > 0))
                .collect::<Option<Vec<u32>>>()
        })
        .collect();
    match integers {
        Some(integers) => SequenceFile::Integers(integers),
        None => SequenceFile::Strings(rows),
    }
}

pub fn parse_attribute(text: &str) -> Result<Vec<Vec<i64>>, Seq2PatError> {
    data_lines(text)
        .map(|(line, content)| {
            content
                .split_whitespace()
                .map(|token| {
                    token.parse::<i64>().map_err(|_| Seq2PatError::Parse {
                        line,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<i64>, Seq2PatError>>()
        })
        .collect()
}

pub fn read_sequences(path: impl AsRef<Path>) -> Result<SequenceFile, Seq2PatError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_sequences(&text))
}

pub fn read_attribute(path: impl AsRef<Path>) -> Result<Vec<Vec<i64>>, Seq2PatError> {
    let text = std::fs::read_to_string(path)?;
    parse_attribute(&text)
}

/// Write one pattern per line: its items followed by its frequency.
pub fn write_patterns<T: Display>(
    mut writer: impl Write,
    patterns: &[Pattern<T>],
) -> Result<(), Seq2PatError> {
    for pattern in patterns {
        for item in &pattern.items {
            write!(writer, "{} ", item)?;
        }
        writeln!(writer, "{}", pattern.frequency)?;
    }
    writer.flush()?;
    Ok(())
}
