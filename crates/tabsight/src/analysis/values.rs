//! Cell cleaning shared by every engine.

use crate::input::DataTable;

/// Tokens that mean "no value", compared case-insensitively.
const NULL_TOKENS: &[&str] = &["nan", "none", "null"];

/// Formatting characters stripped before numeric parsing.
const FORMAT_CHARS: &[char] = &[',', '$', '%'];

/// Unit suffixes tolerated on metric values in key-value datasets.
const KEY_VALUE_SUFFIXES: &[&str] = &["ms", "SOL"];

/// How permissive numeric parsing is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumericMode {
    /// Strip `,` `$` `%`.
    #[default]
    Standard,
    /// Additionally strip a trailing `ms` or `SOL` unit.
    KeyValue,
}

/// The trimmed cell, or `None` when it is empty or a null token.
pub fn usable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse a cell as a finite number after stripping formatting.
pub fn parse_numeric(value: &str, mode: NumericMode) -> Option<f64> {
    let trimmed = usable(value)?;
    let cleaned: String = trimmed.chars().filter(|c| !FORMAT_CHARS.contains(c)).collect();
    let mut cleaned = cleaned.trim();

    if mode == NumericMode::KeyValue {
        for suffix in KEY_VALUE_SUFFIXES {
            if let Some(stripped) = cleaned.strip_suffix(suffix) {
                cleaned = stripped.trim_end();
                break;
            }
        }
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A numeric column with one parsed cell per row (`None` where unparseable).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    pub fn parse(table: &DataTable, index: usize, mode: NumericMode) -> Self {
        Self {
            name: table.headers[index].clone(),
            values: table
                .column_values(index)
                .map(|cell| parse_numeric(cell, mode))
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn from_values(name: &str, values: &[Option<f64>]) -> Self {
        Self {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }
}

/// Row-aligned pairs where both columns have a value.
pub fn aligned_pairs(x: &NumericColumn, y: &NumericColumn) -> Vec<(f64, f64)> {
    x.values
        .iter()
        .zip(&y.values)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect()
}
