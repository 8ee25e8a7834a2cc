pub mod align;
pub mod char_diff;
pub mod types;

pub use align::{align, cell_count};
pub use char_diff::{highlight_change, Fragment, FragmentKind, DEFAULT_CHAR_DIFF_LIMIT};
pub use types::{DiffStats, Edit, EditRecord};

/// The last computed edit script for a pair of documents, kept so display
/// toggles can re-project without re-running the aligner.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub records: Vec<EditRecord>,
    pub stats: DiffStats,
}

impl Comparison {
    pub fn compute(old: &[String], new: &[String]) -> Self {
        Self::from_records(align(old, new))
    }

    pub fn from_records(records: Vec<EditRecord>) -> Self {
        let stats = DiffStats::from_records(&records);
        Self { records, stats }
    }

    pub fn is_identical(&self) -> bool {
        self.stats.is_empty()
    }
}
