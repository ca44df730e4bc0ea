use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use seq2pat::batch::BatchConfig;
use seq2pat::constraint::{Attribute, Constraint, ConstraintKind};
use seq2pat::error::Seq2PatError;
use seq2pat::io::{SequenceFile, read_attribute, read_sequences, write_patterns};
use seq2pat::item::Item;
use seq2pat::mining::{MinFrequency, Pattern};
use seq2pat::session::{Seq2Pat, Seq2PatConfig};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "seq2pat")]
#[command(about = "Mine frequent sequential patterns under attribute constraints")]
struct Args {
    /// Path to a sequence file (one whitespace-delimited sequence per line)
    #[arg(value_name = "FILE")]
    file: String,

    /// Path to an attribute file aligned with the sequences (can be repeated)
    #[arg(long, value_name = "FILE", require_equals = true)]
    attribute: Vec<String>,

    /// Constraint on an attribute, as INDEX:KIND:LOWER:UPPER (e.g. 0:average:3:4, 1:span::10)
    #[arg(long, value_name = "SPEC", require_equals = true)]
    constraint: Vec<ConstraintSpec>,

    /// Minimum frequency: a row count (e.g. 2) or a fraction of rows (e.g. 0.5)
    #[arg(long, default_value = "2", require_equals = true, value_parser = parse_min_frequency)]
    min_frequency: MinFrequency,

    /// Maximum number of consecutive events covered by a pattern occurrence
    #[arg(long, default_value_t = 10, require_equals = true)]
    max_span: usize,

    /// Do not bound the span of pattern occurrences (may be very slow)
    #[arg(long)]
    no_max_span: bool,

    /// Mine in shuffled batches of the given number of rows
    #[arg(long, require_equals = true)]
    batch_size: Option<usize>,

    /// Threshold discount applied inside each batch
    #[arg(long, default_value_t = 0.2, require_equals = true)]
    discount_factor: f64,

    /// Number of batch workers (negative values count back from the number of CPUs)
    #[arg(long, default_value_t = 2, require_equals = true, allow_hyphen_values = true)]
    jobs: i32,

    /// Seed of the batch shuffle
    #[arg(long, default_value_t = 0, require_equals = true)]
    seed: u64,

    /// Number of patterns to print (0 = all)
    #[arg(long, default_value_t = 0, require_equals = true)]
    count: usize,

    /// Logging verbosity (use -v for info, or -v=LEVEL for specific level)
    #[arg(long, short = 'v', value_name = "LEVEL", num_args = 0..=1, default_missing_value = "info", require_equals = true)]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
        }
    }
}

/// A constraint given on the command line, referring to an attribute by its position.
#[derive(Clone, Debug)]
struct ConstraintSpec {
    attribute: usize,
    kind: ConstraintKind,
    lower: Option<i64>,
    upper: Option<i64>,
}

impl FromStr for ConstraintSpec {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(':').collect();
        let [attribute, kind, lower, upper] = parts.as_slice() else {
            return Err(format!("expected INDEX:KIND:LOWER:UPPER, found `{value}`"));
        };
        let attribute = attribute
            .parse::<usize>()
            .map_err(|e| format!("invalid attribute index `{attribute}`: {e}"))?;
        let kind = match kind.to_ascii_lowercase().as_str() {
            "average" | "avg" => ConstraintKind::Average,
            "gap" => ConstraintKind::Gap,
            "median" => ConstraintKind::Median,
            "span" => ConstraintKind::Span,
            other => return Err(format!("unknown constraint kind `{other}`")),
        };
        let bound = |text: &str| -> Result<Option<i64>, String> {
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse::<i64>()
                    .map(Some)
                    .map_err(|e| format!("invalid bound `{text}`: {e}"))
            }
        };
        Ok(ConstraintSpec {
            attribute,
            kind,
            lower: bound(*lower)?,
            upper: bound(*upper)?,
        })
    }
}

fn parse_min_frequency(value: &str) -> Result<MinFrequency, String> {
    if value.contains('.') {
        value
            .parse::<f64>()
            .map(MinFrequency::Fraction)
            .map_err(|e| e.to_string())
    } else {
        value
            .parse::<i64>()
            .map(MinFrequency::Count)
            .map_err(|e| e.to_string())
    }
}

fn build_constraint(spec: &ConstraintSpec, attributes: &[Attribute]) -> Option<Constraint> {
    let attribute = attributes.get(spec.attribute)?;
    let mut constraint = Constraint::new(attribute.clone(), spec.kind);
    if let Some(lower) = spec.lower {
        constraint = constraint.at_least(lower);
    }
    if let Some(upper) = spec.upper {
        constraint = constraint.at_most(upper);
    }
    Some(constraint)
}

fn mine<T: Item>(
    sequences: Vec<Vec<T>>,
    config: Seq2PatConfig,
    constraints: Vec<Constraint>,
    min_frequency: MinFrequency,
) -> Result<Vec<Pattern<T>>, Seq2PatError> {
    let mut seq2pat = Seq2Pat::with_config(sequences, config)?;
    for constraint in constraints {
        seq2pat.add_constraint(constraint)?;
    }
    seq2pat.get_patterns(min_frequency)
}

fn print_patterns<T: Display>(patterns: &[Pattern<T>], count: usize) {
    let shown = if count == 0 {
        patterns
    } else {
        &patterns[..count.min(patterns.len())]
    };
    if let Err(e) = write_patterns(std::io::stdout().lock(), shown) {
        eprintln!("Failed to write patterns: {}", e);
        std::process::exit(1);
    }
}

fn main() {
    let args = Args::parse();

    // Configure logging:
    // None = not specified, Some(None) = -v without value, Some(Some(level)) = -v=level
    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(ref level)) => level.clone().into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let sequences = read_sequences(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to load sequence file {}: {}", args.file, e);
        std::process::exit(1);
    });
    println!("Loaded {} sequences.", sequences.num_rows());

    let attributes: Vec<Attribute> = args
        .attribute
        .iter()
        .map(|path| {
            read_attribute(path)
                .and_then(Attribute::new)
                .unwrap_or_else(|e| {
                    eprintln!("Failed to load attribute file {}: {}", path, e);
                    std::process::exit(1);
                })
        })
        .collect();

    let constraints: Vec<Constraint> = args
        .constraint
        .iter()
        .map(|spec| {
            build_constraint(spec, &attributes).unwrap_or_else(|| {
                eprintln!(
                    "Constraint refers to attribute {}, but only {} attributes were given.",
                    spec.attribute,
                    attributes.len()
                );
                std::process::exit(1);
            })
        })
        .collect();

    let config = Seq2PatConfig {
        max_span: (!args.no_max_span).then_some(args.max_span),
        batch: args.batch_size.map(|batch_size| BatchConfig {
            batch_size,
            discount_factor: args.discount_factor,
            n_jobs: args.jobs,
            seed: args.seed,
        }),
        ..Seq2PatConfig::new()
    };

    let total = match sequences {
        SequenceFile::Integers(rows) => mine(rows, config, constraints, args.min_frequency)
            .map(|patterns| {
                print_patterns(&patterns, args.count);
                patterns.len()
            }),
        SequenceFile::Strings(rows) => mine(rows, config, constraints, args.min_frequency)
            .map(|patterns| {
                print_patterns(&patterns, args.count);
                patterns.len()
            }),
    };

    match total {
        Ok(total) => println!("Total patterns found: {}", total),
        Err(e) => {
            eprintln!("Error during pattern mining: {}", e);
            std::process::exit(1);
        }
    }
}
