use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::diff::{cell_count, Comparison};
use crate::document::Document;
use crate::error::CompareError;

/// Both documents plus their edit script.
#[derive(Debug, Clone)]
pub struct CompareOutput {
    pub old: Document,
    pub new: Document,
    pub comparison: Comparison,
}

/// Load two documents from disk and align them.
///
/// `max_cells` bounds the size of the line-level DP table; `None` means no
/// bound.
pub fn compare_files(
    old_path: &Path,
    new_path: &Path,
    max_cells: Option<usize>,
) -> Result<CompareOutput, CompareError> {
    let old = Document::load(old_path)?;
    let new = Document::load(new_path)?;
    compare_documents(old, new, max_cells)
}

pub fn compare_documents(
    old: Document,
    new: Document,
    max_cells: Option<usize>,
) -> Result<CompareOutput, CompareError> {
    let cells = cell_count(old.line_count(), new.line_count());
    if let Some(limit) = max_cells {
        if cells > limit {
            return Err(CompareError::TooLarge { cells, limit });
        }
    }

    let started = Instant::now();
    let comparison = Comparison::compute(&old.lines, &new.lines);
    let first_change = comparison
        .records
        .iter()
        .find(|r| !r.is_equal())
        .and_then(|r| r.new_index().or(r.old_index()));
    info!(
        old = %old.path.display(),
        new = %new.path.display(),
        records = comparison.records.len(),
        added = comparison.stats.added,
        removed = comparison.stats.removed,
        changed = comparison.stats.changed,
        first_change = ?first_change,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "compared documents"
    );

    Ok(CompareOutput {
        old,
        new,
        comparison,
    })
}
