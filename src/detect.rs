//! Format detection for spreadsheet workbooks.
//!
//! Detection sniffs the content instead of trusting the extension, so a
//! renamed or mislabelled file is still opened with the right reader.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Compound File Binary magic bytes (legacy BIFF8 .xls).
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the XLSX workbook part.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the macro-enabled XLSM workbook part.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Detected workbook format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Office Open XML workbook (.xlsx)
    Xlsx,
    /// Macro-enabled Office Open XML workbook (.xlsm)
    Xlsm,
    /// Legacy binary workbook (.xls)
    Xls,
}

impl WorkbookFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            WorkbookFormat::Xlsx => "xlsx",
            WorkbookFormat::Xlsm => "xlsm",
            WorkbookFormat::Xls => "xls",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            WorkbookFormat::Xlsx => "Excel Workbook",
            WorkbookFormat::Xlsm => "Excel Macro-Enabled Workbook",
            WorkbookFormat::Xls => "Excel 97-2003 Workbook",
        }
    }

    /// Whether the workbook is an OOXML package (and so has DrawingML parts).
    pub fn is_ooxml(&self) -> bool {
        !matches!(self, WorkbookFormat::Xls)
    }
}

impl std::fmt::Display for WorkbookFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the workbook format from a file path.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<WorkbookFormat> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    let head = read_head(&mut reader)?;
    if is_cfb_file(&head) {
        return Ok(WorkbookFormat::Xls);
    }
    if !is_zip_file(&head) {
        return Err(Error::UnknownFormat);
    }
    reader.rewind()?;
    detect_format_from_reader(reader)
}

/// Read up to the first 8 bytes, however the reader splits them.
fn read_head<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut head = Vec::with_capacity(CFB_MAGIC.len());
    reader.take(CFB_MAGIC.len() as u64).read_to_end(&mut head)?;
    Ok(head)
}

/// Detect the workbook format from a byte slice.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<WorkbookFormat> {
    if is_cfb_file(data) {
        return Ok(WorkbookFormat::Xls);
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }

    let cursor = std::io::Cursor::new(data);
    detect_format_from_reader(cursor)
}

/// Detect the OOXML workbook format from a reader over a ZIP archive.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<WorkbookFormat> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(XLSM_CONTENT_TYPE) {
        Ok(WorkbookFormat::Xlsm)
    } else if content_types.contains(XLSX_CONTENT_TYPE) {
        Ok(WorkbookFormat::Xlsx)
    } else {
        detect_by_folder_structure(&mut archive)
    }
}

/// Fallback detection by checking folder structure.
fn detect_by_folder_structure<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<WorkbookFormat> {
    let has_workbook = archive.file_names().any(|n| n == "xl/workbook.xml");
    if has_workbook {
        Ok(WorkbookFormat::Xlsx)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Check if data starts with Compound File Binary magic bytes.
pub fn is_cfb_file(data: &[u8]) -> bool {
    data.len() >= CFB_MAGIC.len() && data[..CFB_MAGIC.len()] == CFB_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            for (name, body) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_format_display() {
        assert_eq!(WorkbookFormat::Xlsx.to_string(), "Excel Workbook");
        assert_eq!(WorkbookFormat::Xls.extension(), "xls");
        assert!(WorkbookFormat::Xlsm.is_ooxml());
        assert!(!WorkbookFormat::Xls.is_ooxml());
    }

    #[test]
    fn test_magic_checks() {
        assert!(is_zip_file(&[0x50, 0x4B, 0x03, 0x04, 0x00]));
        assert!(!is_zip_file(&[0x50, 0x4B]));
        assert!(is_cfb_file(&CFB_MAGIC));
        assert!(!is_cfb_file(&CFB_MAGIC[..4]));
    }

    /// Hands out one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match (self.0.split_first(), buf.first_mut()) {
                (Some((byte, rest)), Some(slot)) => {
                    *slot = *byte;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn test_read_head_survives_short_reads() {
        let mut data = CFB_MAGIC.to_vec();
        data.extend_from_slice(b"rest of the file");
        let head = read_head(&mut Trickle(&data)).unwrap();
        assert_eq!(head, CFB_MAGIC);
        assert!(is_cfb_file(&head));

        let head = read_head(&mut Trickle(b"PK")).unwrap();
        assert_eq!(head, b"PK");
        assert!(!is_zip_file(&head));
    }

    #[test]
    fn test_detect_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.xls");
        let mut data = CFB_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        std::fs::write(&path, data).unwrap();
        assert_eq!(detect_format_from_path(&path).unwrap(), WorkbookFormat::Xls);

        std::fs::write(&path, b"tiny").unwrap();
        assert!(matches!(detect_format_from_path(&path), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_invalid_data() {
        let result = detect_format_from_bytes(b"not a workbook");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_legacy_xls() {
        let mut data = CFB_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), WorkbookFormat::Xls);
    }

    #[test]
    fn test_detect_content_types() {
        let xlsx = zip_with(&[(
            "[Content_Types].xml",
            &format!(r#"<Types><Override PartName="/xl/workbook.xml" ContentType="{XLSX_CONTENT_TYPE}"/></Types>"#),
        )]);
        assert_eq!(detect_format_from_bytes(&xlsx).unwrap(), WorkbookFormat::Xlsx);

        let xlsm = zip_with(&[(
            "[Content_Types].xml",
            &format!(r#"<Types><Override PartName="/xl/workbook.xml" ContentType="{XLSM_CONTENT_TYPE}"/></Types>"#),
        )]);
        assert_eq!(detect_format_from_bytes(&xlsm).unwrap(), WorkbookFormat::Xlsm);
    }

    #[test]
    fn test_detect_by_folder_fallback() {
        let data = zip_with(&[
            ("[Content_Types].xml", "<Types/>"),
            ("xl/workbook.xml", "<workbook/>"),
        ]);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), WorkbookFormat::Xlsx);

        let data = zip_with(&[("[Content_Types].xml", "<Types/>")]);
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }
}
