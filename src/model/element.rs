//! Sheet inventory structures.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sheet value recorded for a file that could not be opened.
pub const BAD_FILE_SHEET: &str = "Bad File Error";

/// One (path, book, sheet) inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Directory containing the workbook
    #[serde(rename = "Path")]
    pub path: String,

    /// Workbook file name
    #[serde(rename = "Book")]
    pub book: String,

    /// Sheet name, or [`BAD_FILE_SHEET`]
    #[serde(rename = "Sheet")]
    pub sheet: String,
}

impl ElementRecord {
    /// Create a record for a sheet of the workbook at `file`.
    pub fn new(file: &Path, sheet: impl Into<String>) -> Self {
        let (path, book) = split_file_path(file);
        Self {
            path,
            book,
            sheet: sheet.into(),
        }
    }

    /// Create the sentinel record for an unreadable workbook.
    pub fn bad_file(file: &Path) -> Self {
        Self::new(file, BAD_FILE_SHEET)
    }

    /// Whether this record marks an unreadable workbook.
    pub fn is_bad_file(&self) -> bool {
        self.sheet == BAD_FILE_SHEET
    }

    /// Full path of the workbook.
    pub fn file_path(&self) -> PathBuf {
        Path::new(&self.path).join(&self.book)
    }
}

fn split_file_path(file: &Path) -> (String, String) {
    let path = file
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let book = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (path, book)
}

/// Ordered sheet inventory produced by one handler.
///
/// Rows of the same workbook are contiguous; the scanners rely on this to
/// keep a single workbook open across consecutive rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementTable {
    rows: Vec<ElementRecord>,
}

impl ElementTable {
    /// Column headers of the inventory.
    pub const HEADERS: [&'static str; 3] = ["Path", "Book", "Sheet"];

    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: ElementRecord) {
        self.rows.push(record);
    }

    /// Records in table order.
    pub fn rows(&self) -> &[ElementRecord] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, ElementRecord> {
        self.rows.iter()
    }
}

impl FromIterator<ElementRecord> for ElementTable {
    fn from_iter<I: IntoIterator<Item = ElementRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ElementTable {
    type Item = &'a ElementRecord;
    type IntoIter = std::slice::Iter<'a, ElementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_file_path() {
        let record = ElementRecord::new(Path::new("reports/2024/q1.xlsx"), "Summary");
        assert_eq!(record.path, "reports/2024");
        assert_eq!(record.book, "q1.xlsx");
        assert_eq!(record.sheet, "Summary");
        assert_eq!(record.file_path(), PathBuf::from("reports/2024/q1.xlsx"));
        assert!(!record.is_bad_file());
    }

    #[test]
    fn test_bad_file_record() {
        let record = ElementRecord::bad_file(Path::new("broken.xls"));
        assert_eq!(record.path, "");
        assert_eq!(record.book, "broken.xls");
        assert_eq!(record.sheet, BAD_FILE_SHEET);
        assert!(record.is_bad_file());
    }
}
