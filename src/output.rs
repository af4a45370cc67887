//! CSV persistence of result tables.
//!
//! Files are UTF-8 with a byte order mark so spreadsheet applications pick
//! the right encoding. Empty counts are written as empty fields.

use crate::error::Result;
use crate::model::{ElementTable, KeywordTable};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn create_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;
    Ok(csv::Writer::from_writer(file))
}

/// Write an inventory to `path` with a `Path,Book,Sheet` header.
pub fn write_element_table(path: &Path, table: &ElementTable) -> Result<()> {
    let mut writer = create_writer(path)?;
    if table.is_empty() {
        writer.write_record(ElementTable::HEADERS)?;
    }
    for record in table {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a keyword table to `path`, one column per keyword after the
/// inventory columns.
pub fn write_keyword_table(path: &Path, table: &KeywordTable) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(table.headers())?;

    for row in table.rows() {
        let mut record = vec![
            row.element.path.clone(),
            row.element.book.clone(),
            row.element.sheet.clone(),
        ];
        record.extend(row.counts.iter().map(|count| match count {
            Some(n) if *n > 0 => n.to_string(),
            _ => String::new(),
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementRecord;
    use std::fs;

    fn elements() -> ElementTable {
        [
            ElementRecord::new(Path::new("data/q1"), "Sheet1"),
            ElementRecord::bad_file(Path::new("data/broken.xlsx")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_element_table_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excel_search.csv");
        write_element_table(&path, &elements()).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Path,Book,Sheet");
        assert_eq!(lines[1], "data,q1,Sheet1");
        assert_eq!(lines[2], "data,broken.xlsx,Bad File Error");
    }

    #[test]
    fn test_empty_element_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_element_table(&path, &ElementTable::new()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_start_matches('\u{feff}').trim_end(), "Path,Book,Sheet");
    }

    #[test]
    fn test_keyword_table_csv() {
        let mut table = KeywordTable::from_elements(
            &elements(),
            &["invoice".to_string(), "total, net".to_string()],
        );
        table.store(0, &[3, 0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("excel_search.csv");
        write_keyword_table(&path, &table).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(lines[0], "Path,Book,Sheet,invoice,\"total, net\"");
        assert_eq!(lines[1], "data,q1,Sheet1,3,");
        assert_eq!(lines[2], "data,broken.xlsx,Bad File Error,,");
    }
}
