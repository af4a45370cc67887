//! Sheet inventory.

use crate::model::{ElementRecord, ElementTable};
use crate::progress::{ProgressSink, TaskProgress};
use crate::search::DocType;
use crate::workbook::Workbook;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Find the files under `root` whose extension is one of `extensions`.
///
/// Extensions are given with their leading dot and compared without regard
/// to case. Directories are walked recursively in file-name order. A `root`
/// that is itself a matching file is returned alone.
pub fn collect_files(root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    if root.is_file() {
        return if has_extension(root, extensions) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    files
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions.iter().any(|candidate| {
        candidate
            .trim_start_matches('.')
            .eq_ignore_ascii_case(ext)
    })
}

/// List the sheets of every file.
///
/// Each readable workbook contributes one record per sheet in its declared
/// order. A file that cannot be opened contributes a single
/// [`BAD_FILE_SHEET`](crate::model::BAD_FILE_SHEET) record.
pub fn build_inventory(
    files: &[PathBuf],
    progress: &dyn ProgressSink,
    doc_type: DocType,
) -> ElementTable {
    let mut table = ElementTable::new();
    let mut task = TaskProgress::new(progress, format!("{} Sheets", doc_type), files.len());
    let mut bad_files = 0usize;

    for file in files {
        match Workbook::open(file) {
            Ok(workbook) => {
                for sheet in workbook.sheet_names() {
                    table.push(ElementRecord::new(file, sheet));
                }
            }
            Err(err) => {
                warn!(path = %file.display(), error = %err, "cannot open workbook");
                table.push(ElementRecord::bad_file(file));
                bad_files += 1;
            }
        }
        task.step();
    }
    task.finish();

    info!(
        doc_type = %doc_type,
        files = files.len(),
        sheets = table.len() - bad_files,
        bad_files,
        "inventory built"
    );
    table
}
