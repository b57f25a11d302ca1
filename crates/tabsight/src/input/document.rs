//! Synthetic one-row records for non-tabular uploads.
//!
//! Rich extraction (PDF text, Word documents) happens upstream; these types
//! only describe what was extracted so the statistics engine can treat it as
//! a one-row table. PNG and GIF dimensions are read from their headers here.

use serde::{Deserialize, Serialize};

use super::source::{DataTable, Record};

/// Summary of an extracted text document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Kind of document ("text", "pdf", "docx", ...).
    pub document_type: String,
    pub size_bytes: u64,
    pub word_count: usize,
    pub char_count: usize,
    pub line_count: usize,
}

impl DocumentSummary {
    /// Summarize extracted text.
    pub fn from_text(document_type: impl Into<String>, text: &str, size_bytes: u64) -> Self {
        Self {
            document_type: document_type.into(),
            size_bytes,
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            line_count: text.lines().count(),
        }
    }

    /// The synthetic record describing this document.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("document_type".into(), self.document_type.clone());
        record.insert("size_bytes".into(), self.size_bytes.to_string());
        record.insert("word_count".into(), self.word_count.to_string());
        record.insert("char_count".into(), self.char_count.to_string());
        record.insert("line_count".into(), self.line_count.to_string());
        record
    }

    /// A one-row table holding [`Self::to_record`].
    pub fn to_table(&self) -> DataTable {
        DataTable::from_records(&[self.to_record()])
    }
}

/// Dimensions and size of an image, as reported by the extraction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Image format ("png", "jpeg", ...).
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl ImageSummary {
    pub fn to_record(&self) -> Record {
        let aspect_ratio = if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        };
        let megapixels = self.width as f64 * self.height as f64 / 1_000_000.0;

        let mut record = Record::new();
        record.insert("document_type".into(), format!("image/{}", self.format));
        record.insert("width".into(), self.width.to_string());
        record.insert("height".into(), self.height.to_string());
        record.insert("aspect_ratio".into(), format!("{:.3}", aspect_ratio));
        record.insert("megapixels".into(), format!("{:.3}", megapixels));
        record.insert("size_bytes".into(), self.size_bytes.to_string());
        record
    }

    pub fn to_table(&self) -> DataTable {
        DataTable::from_records(&[self.to_record()])
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Width and height from a PNG or GIF header.
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.starts_with(PNG_SIGNATURE) && bytes.get(12..16) == Some(&b"IHDR"[..]) {
        let width = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
        let height = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
        return Some((width, height));
    }

    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        let width = u16::from_le_bytes(bytes.get(6..8)?.try_into().ok()?);
        let height = u16::from_le_bytes(bytes.get(8..10)?.try_into().ok()?);
        return Some((width.into(), height.into()));
    }

    None
}

/// Record for opaque bytes: only the size is known.
pub fn binary_record(document_type: &str, size_bytes: u64) -> DataTable {
    let mut record = Record::new();
    record.insert("document_type".into(), document_type.to_string());
    record.insert("size_bytes".into(), size_bytes.to_string());
    DataTable::from_records(&[record])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_counts() {
        let summary = DocumentSummary::from_text("text", "hello world\nsecond line here", 28);

        assert_eq!(summary.word_count, 5);
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.char_count, 28);

        let table = summary.to_table();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 5);
    }

    #[test]
    fn test_image_record() {
        let image = ImageSummary {
            format: "png".into(),
            width: 1920,
            height: 1080,
            size_bytes: 2048,
        };
        let record = image.to_record();

        assert_eq!(record["document_type"], "image/png");
        assert_eq!(record["aspect_ratio"], "1.778");
        assert_eq!(record["megapixels"], "2.074");
    }

    #[test]
    fn test_image_dimensions() {
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend([0, 0, 0, 13]);
        png.extend(b"IHDR");
        png.extend(640u32.to_be_bytes());
        png.extend(480u32.to_be_bytes());
        assert_eq!(image_dimensions(&png), Some((640, 480)));

        let mut gif = b"GIF89a".to_vec();
        gif.extend(32u16.to_le_bytes());
        gif.extend(16u16.to_le_bytes());
        assert_eq!(image_dimensions(&gif), Some((32, 16)));

        assert_eq!(image_dimensions(b"\xff\xd8\xff"), None);
        assert_eq!(image_dimensions(&png[..18]), None);
    }
}
