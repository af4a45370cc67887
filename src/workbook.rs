//! Read-only workbook handle over cached cell values.
//!
//! Formulas are never evaluated: each cell yields the value the producing
//! application last stored for it.

use crate::detect::{detect_format_from_bytes, WorkbookFormat};
use crate::error::{Error, Result};
use calamine::{Data, Reader, Sheets, Xls, Xlsx};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// An opened workbook.
///
/// The file is read into memory on open, so dropping the handle is all it
/// takes to close it.
pub struct Workbook {
    format: WorkbookFormat,
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl Workbook {
    /// Open a workbook file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Open a workbook from bytes, choosing the reader by content.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = detect_format_from_bytes(&data)?;
        let cursor = Cursor::new(data);
        let sheets = match format {
            WorkbookFormat::Xls => {
                Sheets::Xls(Xls::new(cursor).map_err(|e| Error::Workbook(e.to_string()))?)
            }
            WorkbookFormat::Xlsx | WorkbookFormat::Xlsm => {
                Sheets::Xlsx(Xlsx::new(cursor).map_err(|e| Error::Workbook(e.to_string()))?)
            }
        };
        Ok(Self { format, sheets })
    }

    /// Sheet names in the workbook's declared order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Text of every non-empty cell of a sheet, row by row.
    pub fn sheet_cell_texts(&mut self, sheet: &str) -> Result<Vec<String>> {
        if !self.sheet_names().iter().any(|name| name == sheet) {
            return Err(Error::SheetNotFound(sheet.to_string()));
        }
        let range = self.sheets.worksheet_range(sheet)?;
        Ok(range.used_cells().filter_map(|(_, _, value)| cell_text(value)).collect())
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("format", &self.format)
            .field("sheets", &self.sheet_names())
            .finish()
    }
}

/// String form of a cell value as it is matched against keywords.
///
/// Returns `None` for empty cells.
pub fn cell_text(value: &Data) -> Option<String> {
    let text = match value {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_cell_text_conversion() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(
            cell_text(&Data::String("invoice 2024".into())),
            Some("invoice 2024".to_string())
        );
        assert_eq!(cell_text(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(cell_text(&Data::Float(2024.0)), Some("2024".to_string()));
        assert_eq!(cell_text(&Data::Float(0.5)), Some("0.5".to_string()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("True".to_string()));
        assert_eq!(cell_text(&Data::Bool(false)), Some("False".to_string()));
        assert_eq!(
            cell_text(&Data::Error(CellErrorType::Div0)),
            Some("#DIV/0!".to_string())
        );
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-03-01T00:00:00".into())),
            Some("2024-03-01T00:00:00".to_string())
        );
    }

    #[test]
    fn test_date_cell_text() {
        let date = |serial: f64| {
            cell_text(&Data::DateTime(ExcelDateTime::new(
                serial,
                ExcelDateTimeType::DateTime,
                false,
            )))
        };
        assert_eq!(date(45352.0), Some("2024-03-01 00:00:00".to_string()));
        assert_eq!(date(45352.5), Some("2024-03-01 12:00:00".to_string()));
        // Past the last representable date the serial number is kept
        assert_eq!(date(1e9), Some("1000000000".to_string()));
    }

    #[test]
    fn test_open_rejects_unknown_content() {
        let result = Workbook::from_bytes(b"definitely not a spreadsheet".to_vec());
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
