//! Partitioning a table into header-carrying CSV shards.

use crate::error::{Result, TabsightError};

use super::source::DataTable;

/// Split a table into `shards` CSV texts, each starting with the header row.
///
/// Rows are dealt in contiguous blocks; the first shards take one extra row
/// when the row count does not divide evenly. Fewer shards than requested are
/// returned when there are fewer rows than shards. An empty table yields no
/// shards.
pub fn shard_table(table: &DataTable, shards: usize) -> Result<Vec<String>> {
    if shards == 0 {
        return Err(TabsightError::Precondition(
            "shard count must be at least 1".to_string(),
        ));
    }
    if table.is_empty() {
        return Ok(Vec::new());
    }

    let shards = shards.min(table.row_count());
    let base = table.row_count() / shards;
    let extra = table.row_count() % shards;

    let mut out = Vec::with_capacity(shards);
    let mut start = 0;
    for index in 0..shards {
        let len = base + usize::from(index < extra);
        out.push(write_csv(&table.headers, &table.rows[start..start + len])?);
        start += len;
    }

    Ok(out)
}

fn write_csv(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TabsightError::Persistence(format!("Failed to flush shard: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| TabsightError::Persistence(format!("Shard is not UTF-8: {}", e)))
}
