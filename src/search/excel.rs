//! Spreadsheet handler.

use super::{DocType, DocumentSearch};
use crate::error::{Error, Result};
use crate::model::{ElementTable, KeywordTable};
use crate::progress::{NoProgress, ProgressSink};
use crate::scan::{build_inventory, collect_files, scan_cells, scan_shapes, ScanReport};
use crate::session::{default_session, SessionFactory, ShapeSession};
use std::path::Path;
use tracing::{info, warn};

/// Searches `.xls`, `.xlsx` and `.xlsm` workbooks.
///
/// # Example
///
/// ```no_run
/// use docsearch::search::{DocumentSearch, ExcelSearch};
/// use std::path::Path;
///
/// let mut search = ExcelSearch::new();
/// if search.search_element(Path::new("reports")) {
///     let keywords = vec!["invoice".to_string()];
///     search.search_keyword(&keywords, true)?;
/// }
/// # Ok::<(), docsearch::Error>(())
/// ```
pub struct ExcelSearch {
    progress: Box<dyn ProgressSink>,
    session_factory: Box<SessionFactory>,
    elements: Option<ElementTable>,
    keywords: Option<KeywordTable>,
    cell_report: Option<ScanReport>,
    shape_report: Option<ScanReport>,
}

impl ExcelSearch {
    /// Create a handler that reports no progress.
    pub fn new() -> Self {
        Self::with_progress(Box::new(NoProgress))
    }

    /// Create a handler reporting to `progress`.
    pub fn with_progress(progress: Box<dyn ProgressSink>) -> Self {
        Self {
            progress,
            session_factory: Box::new(default_session),
            elements: None,
            keywords: None,
            cell_report: None,
            shape_report: None,
        }
    }

    /// Use `factory` to start shape sessions instead of the DrawingML reader.
    pub fn with_session_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn ShapeSession>> + 'static,
    {
        self.session_factory = Box::new(factory);
        self
    }

    /// Outcome of the last cell scan.
    pub fn cell_report(&self) -> Option<&ScanReport> {
        self.cell_report.as_ref()
    }

    /// Outcome of the last shape scan, if shapes were searched.
    pub fn shape_report(&self) -> Option<&ScanReport> {
        self.shape_report.as_ref()
    }
}

impl Default for ExcelSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExcelSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcelSearch")
            .field("elements", &self.elements.as_ref().map(ElementTable::len))
            .field("keywords", &self.keywords.as_ref().map(KeywordTable::len))
            .finish()
    }
}

impl DocumentSearch for ExcelSearch {
    fn doc_type(&self) -> DocType {
        DocType::Excel
    }

    fn search_element(&mut self, target: &Path) -> bool {
        let doc_type = self.doc_type();
        let files = collect_files(target, doc_type.extensions());
        info!(target = %target.display(), files = files.len(), "searching {}", doc_type);

        let table = build_inventory(&files, self.progress.as_ref(), doc_type);
        let found = !table.is_empty();
        self.elements = Some(table);
        self.keywords = None;
        self.cell_report = None;
        self.shape_report = None;
        found
    }

    fn search_keyword(&mut self, keywords: &[String], enable_shape_search: bool) -> Result<bool> {
        let elements = self.elements.as_ref().ok_or(Error::ElementsNotSearched)?;
        self.keywords = None;
        self.cell_report = None;
        self.shape_report = None;

        if keywords.is_empty() || elements.is_empty() {
            return Ok(false);
        }

        let doc_type = self.doc_type();
        let mut table = KeywordTable::from_elements(elements, keywords);
        self.cell_report = Some(scan_cells(&mut table, self.progress.as_ref(), doc_type));
        if enable_shape_search {
            self.shape_report = Some(scan_shapes(
                &mut table,
                self.session_factory.as_ref(),
                self.progress.as_ref(),
                doc_type,
            ));
        }

        for (stage, report) in [("cells", &self.cell_report), ("shapes", &self.shape_report)] {
            if let Some(report) = report.as_ref().filter(|r| r.has_failures()) {
                warn!(
                    stage,
                    skipped = report.skipped.len(),
                    "some {} sheets were not searched",
                    doc_type
                );
            }
        }

        let found = !table.is_empty();
        self.keywords = Some(table);
        Ok(found)
    }

    fn element_list(&self) -> Option<&ElementTable> {
        self.elements.as_ref()
    }

    fn keyword_list(&self) -> Option<&KeywordTable> {
        self.keywords.as_ref()
    }
}
