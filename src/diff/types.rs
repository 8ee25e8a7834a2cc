use serde::Serialize;

/// One aligned unit of an edit script. Indices are 1-based positions in the
/// owning sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Edit<T> {
    Equal {
        old_index: usize,
        new_index: usize,
        value: T,
    },
    Insert {
        new_index: usize,
        value: T,
    },
    Delete {
        old_index: usize,
        value: T,
    },
    /// A Delete immediately followed by an Insert in the raw script.
    Change {
        old_index: usize,
        new_index: usize,
        old: T,
        new: T,
    },
}

/// Line-level record.
pub type EditRecord = Edit<String>;

/// Character-level record, only used to build highlighted fragments.
pub type CharEdit = Edit<char>;

impl<T> Edit<T> {
    pub fn is_equal(&self) -> bool {
        matches!(self, Edit::Equal { .. })
    }

    /// Value contributed to the old sequence, if any.
    pub fn old_value(&self) -> Option<&T> {
        match self {
            Edit::Equal { value, .. } | Edit::Delete { value, .. } => Some(value),
            Edit::Change { old, .. } => Some(old),
            Edit::Insert { .. } => None,
        }
    }

    /// Value contributed to the new sequence, if any.
    pub fn new_value(&self) -> Option<&T> {
        match self {
            Edit::Equal { value, .. } | Edit::Insert { value, .. } => Some(value),
            Edit::Change { new, .. } => Some(new),
            Edit::Delete { .. } => None,
        }
    }

    pub fn old_index(&self) -> Option<usize> {
        match self {
            Edit::Equal { old_index, .. }
            | Edit::Delete { old_index, .. }
            | Edit::Change { old_index, .. } => Some(*old_index),
            Edit::Insert { .. } => None,
        }
    }

    pub fn new_index(&self) -> Option<usize> {
        match self {
            Edit::Equal { new_index, .. }
            | Edit::Insert { new_index, .. }
            | Edit::Change { new_index, .. } => Some(*new_index),
            Edit::Delete { .. } => None,
        }
    }
}

/// Record-count summary. Each Change counts once toward both `added` and
/// `removed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffStats {
    pub fn from_records<T>(records: &[Edit<T>]) -> Self {
        let mut stats = DiffStats::default();
        for record in records {
            match record {
                Edit::Equal { .. } => {}
                Edit::Insert { .. } => stats.added += 1,
                Edit::Delete { .. } => stats.removed += 1,
                Edit::Change { .. } => {
                    stats.added += 1;
                    stats.removed += 1;
                    stats.changed += 1;
                }
            }
        }
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}
