//! Delimited text parser (the row extractor).
//!
//! Parsing is total: any input yields a [`DataTable`], possibly empty. Bytes that
//! are not valid UTF-8 are decoded lossily rather than rejected.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::source::DataTable;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter. Comma unless the caller knows better.
    pub delimiter: u8,
    /// Sniff the delimiter from the first lines instead of using `delimiter`.
    pub detect_delimiter: bool,
    /// Quote character.
    pub quote: u8,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            detect_delimiter: false,
            quote: b'"',
            max_rows: None,
        }
    }
}

/// Parses delimited text into a table of raw string cells.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse delimited text.
    pub fn parse_str(&self, text: &str) -> DataTable {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse delimited bytes.
    ///
    /// The first line is the header. Empty input or fewer than two non-blank
    /// lines produce an empty table. Short rows are padded with empty cells,
    /// cells beyond the header are dropped, rows whose cells are all blank
    /// are skipped. A repeated header name maps onto the first column of
    /// that name, later cells overwriting earlier ones.
    pub fn parse_bytes(&self, bytes: &[u8]) -> DataTable {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        if count_non_blank_lines(bytes, 2) < 2 {
            return DataTable::empty();
        }

        let delimiter = if self.config.detect_delimiter {
            detect_delimiter(bytes).unwrap_or(self.config.delimiter)
        } else {
            self.config.delimiter
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);
        let mut records = reader.byte_records();

        let raw_headers: Vec<String> = match records.next() {
            Some(Ok(record)) => record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .collect(),
            Some(Err(e)) => {
                warn!(error = %e, "Unreadable header row");
                return DataTable::empty();
            }
            None => return DataTable::empty(),
        };

        // Map every raw position onto a unique header slot.
        let mut headers: Vec<String> = Vec::with_capacity(raw_headers.len());
        let mut slots: Vec<usize> = Vec::with_capacity(raw_headers.len());
        for name in raw_headers {
            match headers.iter().position(|h| *h == name) {
                Some(slot) => slots.push(slot),
                None => {
                    slots.push(headers.len());
                    headers.push(name);
                }
            }
        }

        let mut rows = Vec::new();
        for (row_idx, result) in records.enumerate() {
            if let Some(max) = self.config.max_rows {
                if rows.len() >= max {
                    break;
                }
            }

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(row = row_idx, error = %e, "Stopping at unreadable row");
                    break;
                }
            };

            let mut row = vec![String::new(); headers.len()];
            for (&slot, field) in slots.iter().zip(record.iter()) {
                row[slot] = String::from_utf8_lossy(field).into_owned();
            }

            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(row);
        }

        debug!(
            columns = headers.len(),
            rows = rows.len(),
            delimiter = %(delimiter as char).escape_default(),
            "Parsed delimited text"
        );

        DataTable::new(headers, rows)
    }
}

/// Count non-blank lines, stopping once `limit` is reached.
///
/// `\r`, `\n` and `\r\n` all end a line, as they do for the csv reader.
fn count_non_blank_lines(bytes: &[u8], limit: usize) -> usize {
    bytes
        .split(|&b| b == b'\n' || b == b'\r')
        .filter(|line| line.iter().any(|b| !b.is_ascii_whitespace()))
        .take(limit)
        .count()
}

/// Detect the delimiter by analyzing the first few lines.
///
/// Returns `None` when no candidate appears on the first line.
pub fn detect_delimiter(bytes: &[u8]) -> Option<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut best: Option<(u8, usize)> = None;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;

        // Higher count with lower variance wins; tabs rarely occur inside data.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if best.is_none_or(|(_, s)| score > s) {
            best = Some((delim, score));
        }
    }

    best.map(|(delim, _)| delim)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
