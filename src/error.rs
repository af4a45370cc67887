//! Error types for the docsearch library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docsearch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while searching documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The spreadsheet reader rejected the workbook.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// The named sheet does not exist in the open workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The settings file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing a result table.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A document type name is not registered.
    #[error("Unknown document type: {0}")]
    UnknownDocType(String),

    /// `search_keyword` was called before `search_element`.
    #[error("Keyword search requires a prior element search")]
    ElementsNotSearched,

    /// The search target does not exist.
    #[error("Target path does not exist: {}", .0.display())]
    TargetNotFound(PathBuf),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Workbook(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format");

        let err = Error::SheetNotFound("Summary".to_string());
        assert_eq!(err.to_string(), "Sheet not found: Summary");

        let err = Error::TargetNotFound(PathBuf::from("missing"));
        assert_eq!(err.to_string(), "Target path does not exist: missing");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
