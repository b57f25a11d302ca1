//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of a dataset: column name to raw cell value, in header order.
///
/// All records of a dataset share the same column set; missing cells are
/// empty strings.
pub type Record = IndexMap<String, String>;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (`csv`, `tsv`, `json`, `image/<ext>`, `document/<ext>`, `binary`),
    /// or a caller-chosen label for inline data.
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the analysis was performed.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been analyzed.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }

    /// Metadata for data that did not come from a file (inline text, shards).
    pub fn inline(format: impl Into<String>, table: &DataTable) -> Self {
        Self {
            file: String::new(),
            path: PathBuf::new(),
            hash: String::new(),
            size_bytes: 0,
            format: format.into(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            analyzed_at: Utc::now(),
        }
    }
}

/// Represents parsed tabular data.
///
/// Headers are unique; rows are always exactly as wide as the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table from records.
    ///
    /// The column set is the union of all record keys in first-seen order;
    /// records lacking a column get an empty cell. Records whose cells are all
    /// blank are skipped, as the delimited parser skips blank rows.
    pub fn from_records(records: &[Record]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| -> Vec<String> {
                headers
                    .iter()
                    .map(|h| record.get(h).cloned().unwrap_or_default())
                    .collect()
            })
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();

        Self { headers, rows }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to analyze.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.headers.is_empty()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Materialize the rows as records.
    pub fn records(&self) -> Vec<Record> {
        self.sample_records(self.rows.len())
    }

    /// The first `n` rows as records, for handing samples to a narrative generator.
    pub fn sample_records(&self, n: usize) -> Vec<Record> {
        self.rows
            .iter()
            .take(n)
            .map(|row| self.headers.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }
}
