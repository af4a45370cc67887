//! Keyword counting over cell values.

use super::{ScanReport, SkipReason};
use crate::model::KeywordTable;
use crate::progress::{ProgressSink, TaskProgress};
use crate::search::DocType;
use crate::workbook::Workbook;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Add one to `counts[i]` for every text containing `keywords[i]`.
///
/// A text counts once per keyword however many times the keyword occurs in
/// it.
pub fn count_cell_hits<S: AsRef<str>>(texts: &[S], keywords: &[String], counts: &mut [u64]) {
    for text in texts {
        let text = text.as_ref();
        for (keyword, count) in keywords.iter().zip(counts.iter_mut()) {
            if text.contains(keyword.as_str()) {
                *count += 1;
            }
        }
    }
}

/// Count keyword occurrences in the cells of every row's sheet.
///
/// Counters start from the table's current values. Rows are visited in
/// order with one open workbook, which is replaced when the row's book
/// changes. Zero counts are cleared before returning.
pub fn scan_cells(
    table: &mut KeywordTable,
    progress: &dyn ProgressSink,
    doc_type: DocType,
) -> ScanReport {
    let mut report = ScanReport::default();
    let mut task = TaskProgress::new(
        progress,
        format!("{} Keyword in Cells", doc_type),
        table.len(),
    );
    let keywords = table.keywords().to_vec();

    let mut current: Option<PathBuf> = None;
    let mut workbook: Option<Workbook> = None;

    for row in 0..table.len() {
        let element = &table.rows()[row].element;
        if element.is_bad_file() {
            report.skip(row, SkipReason::BadFile);
            task.step();
            continue;
        }

        let file = element.file_path();
        if current.as_ref() != Some(&file) {
            drop(workbook.take());
            workbook = match Workbook::open(&file) {
                Ok(opened) => {
                    debug!(path = %file.display(), "opened workbook for cells");
                    Some(opened)
                }
                Err(err) => {
                    warn!(path = %file.display(), error = %err, "cannot open workbook");
                    None
                }
            };
            current = Some(file);
        }

        let Some(book) = workbook.as_mut() else {
            report.skip(row, SkipReason::BookUnavailable(element.book.clone()));
            task.step();
            continue;
        };

        let sheet = element.sheet.clone();
        match book.sheet_cell_texts(&sheet) {
            Ok(texts) => {
                let mut counts = table.seed(row);
                count_cell_hits(&texts, &keywords, &mut counts);
                table.store(row, &counts);
                report.scanned += 1;
            }
            Err(err) => {
                warn!(sheet = %sheet, error = %err, "cannot read sheet cells");
                report.skip(row, SkipReason::SheetUnavailable(err.to_string()));
            }
        }
        task.step();
    }

    drop(workbook);
    table.normalize();
    task.finish();

    info!(
        doc_type = %doc_type,
        scanned = report.scanned,
        skipped = report.skipped.len(),
        "cell scan finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementRecord, ElementTable};
    use crate::progress::NoProgress;
    use std::path::Path;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_repeated_keyword_in_one_cell_counts_once() {
        let mut counts = vec![0];
        count_cell_hits(&["invoice 2024 invoice"], &keywords(&["invoice"]), &mut counts);
        assert_eq!(counts, vec![1]);
    }

    #[test]
    fn test_each_matching_cell_counts() {
        let texts = ["total", "grand total", "subtotal", "sum"];
        let mut counts = vec![0, 0];
        count_cell_hits(&texts, &keywords(&["total", "sum"]), &mut counts);
        assert_eq!(counts, vec![3, 1]);
    }

    #[test]
    fn test_counts_add_to_seed() {
        let mut counts = vec![2];
        count_cell_hits(&["budget"], &keywords(&["budget"]), &mut counts);
        assert_eq!(counts, vec![3]);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut counts = vec![0];
        count_cell_hits(&["Invoice"], &keywords(&["invoice"]), &mut counts);
        assert_eq!(counts, vec![0]);
    }

    #[test]
    fn test_scan_skips_sentinels_and_missing_books() {
        let elements: ElementTable = [
            ElementRecord::bad_file(Path::new("nowhere/bad.xlsx")),
            ElementRecord::new(Path::new("nowhere/gone.xlsx"), "Sheet1"),
            ElementRecord::new(Path::new("nowhere/gone.xlsx"), "Sheet2"),
        ]
        .into_iter()
        .collect();
        let mut table = KeywordTable::from_elements(&elements, &keywords(&["x"]));

        let report = scan_cells(&mut table, &NoProgress, DocType::Excel);
        assert_eq!(report.scanned, 0);
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].reason, SkipReason::BadFile);
        assert!(matches!(
            report.skipped[2].reason,
            SkipReason::BookUnavailable(_)
        ));
        assert!(table.rows().iter().all(|r| r.counts == vec![None]));
    }
}
