//! # docsearch
//!
//! Keyword search over spreadsheet workbooks.
//!
//! This library walks a directory tree for `.xls`, `.xlsx` and `.xlsm`
//! files, builds an inventory of their sheets, and counts how many cells
//! and drawing shapes on each sheet contain each keyword.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsearch::search::{DocumentSearch, ExcelSearch};
//! use std::path::Path;
//!
//! let mut search = ExcelSearch::new();
//! search.search_element(Path::new("reports"));
//! search.search_keyword(&["invoice".to_string()], true)?;
//!
//! if let Some(table) = search.keyword_list() {
//!     for row in table.rows() {
//!         println!("{} / {}: {:?}", row.element.book, row.element.sheet, row.counts);
//!     }
//! }
//! # Ok::<(), docsearch::Error>(())
//! ```
//!
//! ## Running a whole search
//!
//! ```no_run
//! use docsearch::{run_search, Config};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let keywords = vec!["budget".to_string()];
//! let saved = run_search(Path::new("reports"), &keywords, &config, Path::new("output"))?;
//! println!("saved: {}", saved);
//! # Ok::<(), docsearch::Error>(())
//! ```
//!
//! Unreadable workbooks never stop a search: they appear in the inventory
//! with the sheet name [`BAD_FILE_SHEET`] and are skipped by the keyword
//! scanners.

pub mod config;
pub mod container;
pub mod detect;
pub mod error;
pub mod model;
pub mod output;
pub mod progress;
pub mod scan;
pub mod search;
pub mod session;
pub mod workbook;
pub mod xlsx;

// Re-exports
pub use config::{load_keywords, Config};
pub use detect::{detect_format_from_bytes, detect_format_from_path, WorkbookFormat};
pub use error::{Error, Result};
pub use model::{
    ElementRecord, ElementTable, KeywordRow, KeywordTable, Shape, ShapeKind, BAD_FILE_SHEET,
    MAX_GROUP_DEPTH,
};
pub use progress::{NoProgress, ProgressSink};
pub use scan::{ScanReport, Skip, SkipReason};
pub use search::{DocType, DocumentSearch, ExcelSearch, SearchAdapter};
pub use session::{DrawingSession, SessionGuard, ShapeSession};
pub use workbook::Workbook;

use std::path::Path;

/// Search `target` with the handlers named in `config` and save the results
/// into `output_dir`.
///
/// No progress is reported. Returns whether a result file was written.
///
/// # Errors
///
/// Fails when `target` does not exist, a configured handler name is unknown,
/// or a result file cannot be written.
pub fn run_search(
    target: &Path,
    keywords: &[String],
    config: &Config,
    output_dir: &Path,
) -> Result<bool> {
    if !target.exists() {
        return Err(Error::TargetNotFound(target.to_path_buf()));
    }

    let mut adapter = SearchAdapter::from_names(&config.doc_types, &|| {
        Box::new(NoProgress) as Box<dyn ProgressSink>
    })?;
    if !adapter.search(target, Some(keywords), config.shape_search) {
        return Ok(false);
    }
    adapter.save_results(output_dir)
}
