use crate::constraint::Attribute;

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Owned string sequences from string literals.
pub fn string_sequences(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|it| it.to_string()).collect())
        .collect()
}

/// The small three-row shopping example used across tests:
///
/// ```text
/// A A B A D
/// C B A
/// C A C D
/// ```
pub fn shopping_sequences() -> Vec<Vec<String>> {
    string_sequences(&[
        &["A", "A", "B", "A", "D"],
        &["C", "B", "A"],
        &["C", "A", "C", "D"],
    ])
}

/// Prices aligned with [`shopping_sequences`].
pub fn shopping_price() -> Attribute {
    attribute(vec![vec![5, 5, 3, 8, 2], vec![1, 3, 3], vec![4, 5, 2, 1]])
}

/// Timestamps aligned with [`shopping_sequences`].
pub fn shopping_time() -> Attribute {
    attribute(vec![vec![1, 1, 2, 3, 3], vec![3, 8, 9], vec![2, 5, 5, 7]])
}

pub fn attribute(values: Vec<Vec<i64>>) -> Attribute {
    Attribute::new(values).expect("Invalid test attribute.")
}

/// Render patterns as `"AD:2"` strings for compact assertions.
pub fn render<T: AsRef<str>>(patterns: &[crate::mining::Pattern<T>]) -> Vec<String> {
    patterns
        .iter()
        .map(|it| {
            let items: String = it.items.iter().map(|item| item.as_ref()).collect();
            format!("{}:{}", items, it.frequency)
        })
        .collect()
}
