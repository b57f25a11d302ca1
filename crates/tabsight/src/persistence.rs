//! JSON persistence for insight documents.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, TabsightError};
use crate::insight::DataInsights;

/// Write a value as pretty JSON, creating parent directories as needed.
pub(crate) fn save_json<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                TabsightError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        TabsightError::Persistence(format!(
            "Failed to create file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).map_err(|e| {
        TabsightError::Persistence(format!("Failed to serialize {}: {}", what, e))
    })?;

    Ok(())
}

/// Read a value from a JSON file.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        TabsightError::Persistence(format!(
            "Failed to open file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        TabsightError::Persistence(format!(
            "Failed to parse {} '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

impl DataInsights {
    /// Save the insights to a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tabsight::DataInsights;
    /// # fn example(insights: &DataInsights) -> tabsight::Result<()> {
    /// insights.save("sales.insights.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json(self, path.as_ref(), "insights")
    }

    /// Load insights from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref(), "insights")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_insights() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("shard.insights.json");

        let insights = DataInsights {
            num_samples: 3,
            columns: vec!["a".into()],
            ..DataInsights::default()
        };
        insights.save(&path).unwrap();

        assert_eq!(DataInsights::load(&path).unwrap(), insights);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DataInsights::load("/nonexistent/insights.json").unwrap_err();
        assert!(matches!(err, TabsightError::Persistence(_)));
    }
}
