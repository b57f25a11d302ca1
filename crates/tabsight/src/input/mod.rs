//! Input parsing and data source handling.

mod document;
mod json;
mod parser;
mod shard;
mod source;

pub use document::{binary_record, image_dimensions, DocumentSummary, ImageSummary};
pub use json::parse_json;
pub use parser::{detect_delimiter, Parser, ParserConfig};
pub use shard::shard_table;
pub use source::{DataTable, Record, SourceMetadata};
