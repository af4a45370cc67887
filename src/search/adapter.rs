//! Runs every configured handler and persists their tables.

use super::{DocumentSearch, ExcelSearch};
use crate::error::{Error, Result};
use crate::output::{write_element_table, write_keyword_table};
use crate::progress::ProgressSink;
use std::path::Path;
use tracing::{info, warn};

/// Creates the progress sink handed to each handler.
pub type ProgressFactory = dyn Fn() -> Box<dyn ProgressSink>;

type HandlerConstructor = fn(Box<dyn ProgressSink>) -> Box<dyn DocumentSearch>;

fn excel_handler(progress: Box<dyn ProgressSink>) -> Box<dyn DocumentSearch> {
    Box::new(ExcelSearch::with_progress(progress))
}

/// Handler names accepted by [`SearchAdapter::from_names`].
pub const REGISTRY: &[(&str, HandlerConstructor)] = &[("excel", excel_handler)];

/// Owns a set of handlers and drives them over one target.
pub struct SearchAdapter {
    handlers: Vec<Box<dyn DocumentSearch>>,
}

impl SearchAdapter {
    /// Create an adapter over `handlers`, searched in order.
    pub fn new(handlers: Vec<Box<dyn DocumentSearch>>) -> Self {
        Self { handlers }
    }

    /// Create an adapter from registered handler names.
    ///
    /// Names are matched without regard to case. Each handler gets its own
    /// sink from `progress`.
    pub fn from_names<S: AsRef<str>>(names: &[S], progress: &ProgressFactory) -> Result<Self> {
        let mut handlers = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let constructor = REGISTRY
                .iter()
                .find(|(registered, _)| registered.eq_ignore_ascii_case(name.trim()))
                .map(|(_, constructor)| constructor)
                .ok_or_else(|| Error::UnknownDocType(name.to_string()))?;
            handlers.push(constructor(progress()));
        }
        Ok(Self::new(handlers))
    }

    /// The handlers, in search order.
    pub fn handlers(&self) -> &[Box<dyn DocumentSearch>] {
        &self.handlers
    }

    /// Build every handler's inventory under `target` and, when `keywords`
    /// is given, its keyword table.
    ///
    /// Returns whether any handler found documents.
    pub fn search(
        &mut self,
        target: &Path,
        keywords: Option<&[String]>,
        enable_shapes: bool,
    ) -> bool {
        let mut success = false;
        for handler in &mut self.handlers {
            let doc_type = handler.doc_type();
            if !handler.search_element(target) {
                info!(doc_type = %doc_type, "no documents found");
                continue;
            }
            success = true;

            let Some(keywords) = keywords else {
                continue;
            };
            match handler.search_keyword(keywords, enable_shapes) {
                Ok(true) => info!(doc_type = %doc_type, "keyword search finished"),
                Ok(false) => info!(doc_type = %doc_type, "keyword search produced no table"),
                Err(err) => warn!(doc_type = %doc_type, error = %err, "keyword search failed"),
            }
        }
        success
    }

    /// Write one CSV per handler with results into `output_dir`.
    ///
    /// The keyword table is preferred over the inventory. Returns `Ok(false)`
    /// when `output_dir` does not exist or nothing was written.
    pub fn save_results(&self, output_dir: &Path) -> Result<bool> {
        if !output_dir.is_dir() {
            warn!(path = %output_dir.display(), "output directory does not exist");
            return Ok(false);
        }

        let mut saved = false;
        for handler in &self.handlers {
            let path = output_dir.join(handler.doc_type().output_file_name());
            if let Some(table) = handler.keyword_list().filter(|t| !t.is_empty()) {
                write_keyword_table(&path, table)?;
            } else if let Some(table) = handler.element_list().filter(|t| !t.is_empty()) {
                write_element_table(&path, table)?;
            } else {
                continue;
            }
            info!(path = %path.display(), "results saved");
            saved = true;
        }
        Ok(saved)
    }
}

impl std::fmt::Debug for SearchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let doc_types: Vec<_> = self.handlers.iter().map(|h| h.doc_type()).collect();
        f.debug_struct("SearchAdapter")
            .field("handlers", &doc_types)
            .finish()
    }
}
