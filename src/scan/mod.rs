//! Keyword scanning over sheet inventories.
//!
//! The scanners keep a batch running when individual workbooks, sheets or
//! shapes fail: each failure becomes a [`Skip`] in the returned
//! [`ScanReport`] and a `warn!` event, never an error.

mod cells;
mod inventory;
mod shapes;

pub use cells::{count_cell_hits, scan_cells};
pub use inventory::{build_inventory, collect_files};
pub use shapes::{keyword_hits, scan_shapes};

use std::fmt;

/// Why a row was not scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row is an inventory sentinel.
    BadFile,
    /// The row's workbook could not be opened.
    BookUnavailable(String),
    /// The row's sheet could not be read.
    SheetUnavailable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BadFile => write!(f, "unreadable file"),
            SkipReason::BookUnavailable(reason) => write!(f, "workbook unavailable: {}", reason),
            SkipReason::SheetUnavailable(reason) => write!(f, "sheet unavailable: {}", reason),
        }
    }
}

/// A row left out of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    /// Row index in the keyword table
    pub row: usize,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Outcome of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Rows whose counters were updated
    pub scanned: usize,
    /// Rows left untouched
    pub skipped: Vec<Skip>,
}

impl ScanReport {
    /// Record a skipped row.
    pub fn skip(&mut self, row: usize, reason: SkipReason) {
        self.skipped.push(Skip { row, reason });
    }

    /// Whether any row was skipped for a reason other than being a sentinel.
    pub fn has_failures(&self) -> bool {
        self.skipped
            .iter()
            .any(|skip| skip.reason != SkipReason::BadFile)
    }
}
