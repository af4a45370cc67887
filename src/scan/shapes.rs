//! Keyword counting over drawing shapes.

use super::{ScanReport, SkipReason};
use crate::model::{KeywordTable, Shape, ShapeKind, MAX_GROUP_DEPTH};
use crate::progress::{ProgressSink, TaskProgress};
use crate::search::DocType;
use crate::session::{SessionFactory, SessionGuard};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Number of text-bearing shapes in the tree under `shape` whose text
/// contains `keyword`.
///
/// Groups are walked depth first. Children nested deeper than
/// [`MAX_GROUP_DEPTH`] groups are not visited.
pub fn keyword_hits(shape: &Shape, keyword: &str) -> u64 {
    let mut hits = 0;
    let mut stack = vec![(shape, 0usize)];

    while let Some((shape, depth)) = stack.pop() {
        match &shape.kind {
            ShapeKind::Group(children) => {
                if depth >= MAX_GROUP_DEPTH {
                    debug!(shape = %shape.name, depth, "group nesting too deep, not descending");
                    continue;
                }
                // Reversed so children pop in document order.
                stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
            }
            ShapeKind::Leaf { text: Some(text) } => {
                if text.contains(keyword) {
                    hits += 1;
                }
            }
            ShapeKind::Leaf { text: None } => {}
            ShapeKind::Unreadable(reason) => {
                debug!(shape = %shape.name, reason = %reason, "skipping unreadable shape");
            }
        }
    }
    hits
}

/// Count keyword occurrences in the drawing shapes of every row's sheet.
///
/// One session is started for the whole pass and torn down on every exit
/// path. If it cannot be started no row is scanned. Zero counts are cleared
/// before returning in every case.
pub fn scan_shapes(
    table: &mut KeywordTable,
    factory: &SessionFactory,
    progress: &dyn ProgressSink,
    doc_type: DocType,
) -> ScanReport {
    let mut report = ScanReport::default();
    let mut task = TaskProgress::new(
        progress,
        format!("{} Keyword in Shapes", doc_type),
        table.len(),
    );

    let mut session = match SessionGuard::start(factory) {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "cannot start shape session, shapes not searched");
            table.normalize();
            task.finish();
            return report;
        }
    };

    let keywords = table.keywords().to_vec();
    let mut current: Option<PathBuf> = None;
    let mut book_open = false;

    for row in 0..table.len() {
        let element = &table.rows()[row].element;
        if element.is_bad_file() {
            report.skip(row, SkipReason::BadFile);
            task.step();
            continue;
        }

        let file = element.file_path();
        if current.as_ref() != Some(&file) {
            if current.is_some() {
                session.close_workbook();
            }
            book_open = match session.open_workbook(&file) {
                Ok(()) => true,
                Err(err) => {
                    warn!(path = %file.display(), error = %err, "cannot open workbook for shapes");
                    false
                }
            };
            current = Some(file);
        }

        if !book_open {
            report.skip(row, SkipReason::BookUnavailable(element.book.clone()));
            task.step();
            continue;
        }

        let sheet = element.sheet.clone();
        match session.sheet_shapes(&sheet) {
            Ok(shapes) => {
                let mut counts = table.seed(row);
                for (keyword, count) in keywords.iter().zip(counts.iter_mut()) {
                    *count += shapes
                        .iter()
                        .map(|shape| keyword_hits(shape, keyword))
                        .sum::<u64>();
                }
                table.store(row, &counts);
                report.scanned += 1;
            }
            Err(err) => {
                warn!(sheet = %sheet, error = %err, "cannot read sheet shapes");
                report.skip(row, SkipReason::SheetUnavailable(err.to_string()));
            }
        }
        task.step();
    }

    drop(session);
    table.normalize();
    task.finish();

    info!(
        doc_type = %doc_type,
        scanned = report.scanned,
        skipped = report.skipped.len(),
        "shape scan finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(depth: usize, leaf: Shape) -> Shape {
        (0..depth).fold(leaf, |inner, i| Shape::group(format!("Group {}", i), vec![inner]))
    }

    #[test]
    fn test_leaf_with_text() {
        assert_eq!(keyword_hits(&Shape::text("TextBox 1", "budget 2024"), "budget"), 1);
        assert_eq!(keyword_hits(&Shape::text("TextBox 1", "budget budget"), "budget"), 1);
        assert_eq!(keyword_hits(&Shape::text("TextBox 1", "forecast"), "budget"), 0);
    }

    #[test]
    fn test_leaf_without_text_frame() {
        assert_eq!(keyword_hits(&Shape::plain("Picture 2"), "budget"), 0);
    }

    #[test]
    fn test_group_sums_children() {
        let group = Shape::group(
            "Group 3",
            vec![
                Shape::text("A", "budget"),
                Shape::text("B", "the budget"),
                Shape::plain("C"),
            ],
        );
        assert_eq!(keyword_hits(&group, "budget"), 2);
    }

    #[test]
    fn test_nested_groups() {
        let tree = Shape::group(
            "Outer",
            vec![
                Shape::text("A", "budget"),
                Shape::group("Inner", vec![Shape::text("B", "budget"), Shape::text("C", "x")]),
            ],
        );
        assert_eq!(keyword_hits(&tree, "budget"), 2);
    }

    #[test]
    fn test_unreadable_contributes_zero() {
        let group = Shape::group(
            "G",
            vec![
                Shape::unreadable("Broken", "bad entity"),
                Shape::text("A", "budget"),
            ],
        );
        assert_eq!(keyword_hits(&group, "budget"), 1);
    }

    #[test]
    fn test_depth_bound() {
        let reachable = nested(MAX_GROUP_DEPTH, Shape::text("deep", "budget"));
        assert_eq!(keyword_hits(&reachable, "budget"), 1);

        let too_deep = nested(MAX_GROUP_DEPTH + 1, Shape::text("deeper", "budget"));
        assert_eq!(keyword_hits(&too_deep, "budget"), 0);
    }
}
