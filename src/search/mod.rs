//! Document-type handlers and the orchestrating adapter.

mod adapter;
mod excel;

pub use adapter::{ProgressFactory, SearchAdapter, REGISTRY};
pub use excel::ExcelSearch;

use crate::error::Result;
use crate::model::{ElementTable, KeywordTable};
use std::fmt;
use std::path::Path;

/// Document families a handler can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocType {
    /// Spreadsheet workbooks
    Excel,
}

impl DocType {
    /// Display name, also used to label progress tasks.
    pub fn name(&self) -> &'static str {
        match self {
            DocType::Excel => "Excel",
        }
    }

    /// File extensions handled, with their leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            DocType::Excel => &[".xls", ".xlsx", ".xlsm"],
        }
    }

    /// Name of the CSV file results are saved to.
    pub fn output_file_name(&self) -> String {
        format!("{}_search.csv", self.name().to_lowercase())
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A searcher for one document family.
///
/// Handlers move from no tables, to an element table after
/// [`search_element`](Self::search_element), to both tables after a
/// successful [`search_keyword`](Self::search_keyword). Running
/// `search_element` again drops the keyword table.
pub trait DocumentSearch {
    /// The document family handled.
    fn doc_type(&self) -> DocType;

    /// Build the sheet inventory of every matching file under `target`.
    ///
    /// Returns whether the inventory has any rows.
    fn search_element(&mut self, target: &Path) -> bool;

    /// Count keyword occurrences for each inventory row.
    ///
    /// Returns `Ok(false)` without keeping a keyword table when there are no
    /// keywords or the inventory is empty.
    ///
    /// # Errors
    ///
    /// [`Error::ElementsNotSearched`](crate::Error::ElementsNotSearched) when
    /// called before `search_element`.
    fn search_keyword(&mut self, keywords: &[String], enable_shape_search: bool) -> Result<bool>;

    /// The inventory, once built.
    fn element_list(&self) -> Option<&ElementTable>;

    /// The keyword table, once built.
    fn keyword_list(&self) -> Option<&KeywordTable>;
}
