use serde::{Serialize, Serializer};

use crate::diff::{highlight_change, Edit, EditRecord, Fragment, DEFAULT_CHAR_DIFF_LIMIT};
use crate::state::DiffViewMode;

/// Unchanged records shown on each side of a change in diff-only mode.
pub const DEFAULT_CONTEXT_RADIUS: usize = 2;

/// Text shown in place of a collapsed run of unchanged records.
pub const GAP_TEXT: &str = "\u{b7}\u{b7}\u{b7}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Blank,
    Added,
    Removed,
    Gap,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Blank => " ",
            Marker::Added => "+",
            Marker::Removed => "-",
            Marker::Gap => GAP_TEXT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Context,
    Added,
    Removed,
    Changed,
    /// Blank counterpart column or collapsed gap.
    Placeholder,
}

impl LineClass {
    pub fn class_name(self) -> &'static str {
        match self {
            LineClass::Context => "",
            LineClass::Added => "added",
            LineClass::Removed => "removed",
            LineClass::Changed => "changed",
            LineClass::Placeholder => "empty-placeholder",
        }
    }
}

/// Serialized as the class name so JSON consumers can style rows directly.
impl Serialize for LineClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.class_name())
    }
}

/// One rendered line of one column. Never mutated after projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewLine {
    pub old_lineno: Option<usize>,
    pub new_lineno: Option<usize>,
    pub marker: Marker,
    pub fragments: Vec<Fragment>,
    pub class: LineClass,
    /// Number of records collapsed into this line (gap lines only).
    #[serde(skip_serializing_if = "is_zero")]
    pub hidden_count: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl ViewLine {
    fn new(
        old_lineno: Option<usize>,
        new_lineno: Option<usize>,
        marker: Marker,
        fragments: Vec<Fragment>,
        class: LineClass,
    ) -> Self {
        Self {
            old_lineno,
            new_lineno,
            marker,
            fragments,
            class,
            hidden_count: 0,
        }
    }

    fn plain(text: &str) -> Vec<Fragment> {
        if text.is_empty() {
            Vec::new()
        } else {
            vec![Fragment::plain(text)]
        }
    }

    fn placeholder() -> Self {
        Self::new(None, None, Marker::Blank, Vec::new(), LineClass::Placeholder)
    }

    fn gap(hidden_count: usize) -> Self {
        Self {
            hidden_count,
            ..Self::new(
                None,
                None,
                Marker::Gap,
                vec![Fragment::plain(GAP_TEXT)],
                LineClass::Placeholder,
            )
        }
    }

    pub fn is_gap(&self) -> bool {
        self.marker == Marker::Gap
    }

    /// Concatenated fragment text.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// A display row: a pair of columns in split mode, a single line in unified mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DisplayRow {
    Split { old: ViewLine, new: ViewLine },
    Unified(ViewLine),
}

impl DisplayRow {
    pub fn is_gap(&self) -> bool {
        match self {
            DisplayRow::Split { old, .. } => old.is_gap(),
            DisplayRow::Unified(line) => line.is_gap(),
        }
    }

    /// True for rows that show an insertion, deletion or change.
    pub fn is_change(&self) -> bool {
        let is_change_class = |line: &ViewLine| {
            matches!(
                line.class,
                LineClass::Added | LineClass::Removed | LineClass::Changed
            )
        };
        match self {
            DisplayRow::Split { old, new } => is_change_class(old) || is_change_class(new),
            DisplayRow::Unified(line) => is_change_class(line),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Show only changed records and their context window.
    pub diff_only: bool,
    pub context_radius: usize,
    /// See [`crate::diff::highlight_change`].
    pub char_diff_limit: usize,
    /// Also mark hidden runs before the first and after the last visible record.
    pub edge_gaps: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            diff_only: false,
            context_radius: DEFAULT_CONTEXT_RADIUS,
            char_diff_limit: DEFAULT_CHAR_DIFF_LIMIT,
            edge_gaps: false,
        }
    }
}

/// A filtered item: either a visible record or a collapsed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteredItem<'a> {
    Record {
        record: &'a EditRecord,
        index: usize,
    },
    Gap {
        hidden_count: usize,
    },
}

/// Mark every record within `radius` of a non-Equal record.
pub fn visible_indices(records: &[EditRecord], radius: usize) -> Vec<bool> {
    let mut visible = vec![false; records.len()];
    let Some(last) = records.len().checked_sub(1) else {
        return visible;
    };
    for (idx, record) in records.iter().enumerate() {
        if record.is_equal() {
            continue;
        }
        let start = idx.saturating_sub(radius);
        let end = idx.saturating_add(radius).min(last);
        visible[start..=end].fill(true);
    }
    visible
}

/// Apply the diff-only window to a record sequence.
///
/// In full mode every record passes through. In diff-only mode a run of
/// hidden records between two visible records becomes one `Gap`. Hidden
/// records before the first or after the last visible record are dropped
/// without a marker unless `edge_gaps` is set. When nothing is visible the
/// result is empty.
pub fn filter_records<'a>(
    records: &'a [EditRecord],
    options: &ProjectionOptions,
) -> Vec<FilteredItem<'a>> {
    if !options.diff_only {
        return records
            .iter()
            .enumerate()
            .map(|(index, record)| FilteredItem::Record { record, index })
            .collect();
    }

    let visible = visible_indices(records, options.context_radius);
    let mut items = Vec::new();
    let mut hidden = 0;

    for (index, record) in records.iter().enumerate() {
        if !visible[index] {
            hidden += 1;
            continue;
        }
        if hidden > 0 && (options.edge_gaps || !items.is_empty()) {
            items.push(FilteredItem::Gap {
                hidden_count: hidden,
            });
        }
        hidden = 0;
        items.push(FilteredItem::Record { record, index });
    }
    if hidden > 0 && options.edge_gaps && !items.is_empty() {
        items.push(FilteredItem::Gap {
            hidden_count: hidden,
        });
    }

    items
}

/// Build the two-column projection.
pub fn build_split_display_map(
    records: &[EditRecord],
    options: &ProjectionOptions,
) -> Vec<DisplayRow> {
    filter_records(records, options)
        .into_iter()
        .map(|item| match item {
            FilteredItem::Gap { hidden_count } => DisplayRow::Split {
                old: ViewLine::gap(hidden_count),
                new: ViewLine::gap(hidden_count),
            },
            FilteredItem::Record { record, .. } => split_row(record, options),
        })
        .collect()
}

fn split_row(record: &EditRecord, options: &ProjectionOptions) -> DisplayRow {
    let (old, new) = match record {
        Edit::Equal {
            old_index,
            new_index,
            value,
        } => (
            ViewLine::new(
                Some(*old_index),
                None,
                Marker::Blank,
                ViewLine::plain(value),
                LineClass::Context,
            ),
            ViewLine::new(
                None,
                Some(*new_index),
                Marker::Blank,
                ViewLine::plain(value),
                LineClass::Context,
            ),
        ),
        Edit::Delete { old_index, value } => (
            ViewLine::new(
                Some(*old_index),
                None,
                Marker::Removed,
                ViewLine::plain(value),
                LineClass::Removed,
            ),
            ViewLine::placeholder(),
        ),
        Edit::Insert { new_index, value } => (
            ViewLine::placeholder(),
            ViewLine::new(
                None,
                Some(*new_index),
                Marker::Added,
                ViewLine::plain(value),
                LineClass::Added,
            ),
        ),
        Edit::Change {
            old_index,
            new_index,
            old,
            new,
        } => {
            let fragments = highlight_change(old, new, options.char_diff_limit);
            (
                ViewLine::new(
                    Some(*old_index),
                    None,
                    Marker::Removed,
                    fragments.old,
                    LineClass::Changed,
                ),
                ViewLine::new(
                    None,
                    Some(*new_index),
                    Marker::Added,
                    fragments.new,
                    LineClass::Changed,
                ),
            )
        }
    };
    DisplayRow::Split { old, new }
}

/// Build the single-column projection. A Change expands to a `-` line
/// followed by a `+` line.
pub fn build_unified_display_map(
    records: &[EditRecord],
    options: &ProjectionOptions,
) -> Vec<DisplayRow> {
    let mut rows = Vec::new();

    for item in filter_records(records, options) {
        let record = match item {
            FilteredItem::Gap { hidden_count } => {
                rows.push(DisplayRow::Unified(ViewLine::gap(hidden_count)));
                continue;
            }
            FilteredItem::Record { record, .. } => record,
        };

        match record {
            Edit::Equal {
                old_index,
                new_index,
                value,
            } => rows.push(DisplayRow::Unified(ViewLine::new(
                Some(*old_index),
                Some(*new_index),
                Marker::Blank,
                ViewLine::plain(value),
                LineClass::Context,
            ))),
            Edit::Delete { old_index, value } => rows.push(DisplayRow::Unified(ViewLine::new(
                Some(*old_index),
                None,
                Marker::Removed,
                ViewLine::plain(value),
                LineClass::Removed,
            ))),
            Edit::Insert { new_index, value } => rows.push(DisplayRow::Unified(ViewLine::new(
                None,
                Some(*new_index),
                Marker::Added,
                ViewLine::plain(value),
                LineClass::Added,
            ))),
            Edit::Change {
                old_index,
                new_index,
                old,
                new,
            } => {
                let fragments = highlight_change(old, new, options.char_diff_limit);
                rows.push(DisplayRow::Unified(ViewLine::new(
                    Some(*old_index),
                    None,
                    Marker::Removed,
                    fragments.old,
                    LineClass::Removed,
                )));
                rows.push(DisplayRow::Unified(ViewLine::new(
                    None,
                    Some(*new_index),
                    Marker::Added,
                    fragments.new,
                    LineClass::Added,
                )));
            }
        }
    }

    rows
}

/// Build the appropriate display map based on the view mode.
pub fn build_display_map(
    records: &[EditRecord],
    mode: DiffViewMode,
    options: &ProjectionOptions,
) -> Vec<DisplayRow> {
    match mode {
        DiffViewMode::Split => build_split_display_map(records, options),
        DiffViewMode::Unified => build_unified_display_map(records, options),
    }
}

/// Row index of the first row of every contiguous run of changed rows.
pub fn hunk_starts(rows: &[DisplayRow]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_hunk = false;
    for (idx, row) in rows.iter().enumerate() {
        let changed = row.is_change();
        if changed && !in_hunk {
            starts.push(idx);
        }
        in_hunk = changed;
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{align, FragmentKind};
    use pretty_assertions::assert_eq;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// `len` Equal records with a Change at `change_at`.
    fn records_with_change(len: usize, change_at: usize) -> Vec<EditRecord> {
        (0..len)
            .map(|i| {
                if i == change_at {
                    Edit::Change {
                        old_index: i + 1,
                        new_index: i + 1,
                        old: format!("old {i}"),
                        new: format!("new {i}"),
                    }
                } else {
                    Edit::Equal {
                        old_index: i + 1,
                        new_index: i + 1,
                        value: format!("line {i}"),
                    }
                }
            })
            .collect()
    }

    fn diff_only() -> ProjectionOptions {
        ProjectionOptions {
            diff_only: true,
            ..ProjectionOptions::default()
        }
    }

    fn record_indices(items: &[FilteredItem<'_>]) -> Vec<usize> {
        items
            .iter()
            .filter_map(|item| match item {
                FilteredItem::Record { index, .. } => Some(*index),
                FilteredItem::Gap { .. } => None,
            })
            .collect()
    }

    fn gap_count(rows: &[DisplayRow]) -> usize {
        rows.iter().filter(|r| r.is_gap()).count()
    }

    #[test]
    fn test_full_mode_keeps_every_record() {
        let records = records_with_change(10, 4);
        let rows = build_split_display_map(&records, &ProjectionOptions::default());
        assert_eq!(rows.len(), 10);
        assert_eq!(gap_count(&rows), 0);
    }

    #[test]
    fn test_diff_only_window_in_middle() {
        let records = records_with_change(100, 50);
        let options = diff_only();

        let items = filter_records(&records, &options);
        assert_eq!(record_indices(&items), vec![48, 49, 50, 51, 52]);
        // Hidden runs at either edge leave no marker.
        assert_eq!(items.len(), 5);

        let split = build_split_display_map(&records, &options);
        assert_eq!(split.len(), 5);
        assert!(!split[0].is_gap());
        assert!(!split[4].is_gap());

        // The change expands to two lines in unified mode.
        let unified = build_unified_display_map(&records, &options);
        assert_eq!(unified.len(), 6);
        assert_eq!(gap_count(&unified), 0);
    }

    #[test]
    fn test_edge_gaps_mark_leading_and_trailing_runs() {
        let records = records_with_change(100, 50);
        let options = ProjectionOptions {
            edge_gaps: true,
            ..diff_only()
        };
        let items = filter_records(&records, &options);
        assert_eq!(items.len(), 7);
        assert_eq!(items[0], FilteredItem::Gap { hidden_count: 48 });
        assert_eq!(items[6], FilteredItem::Gap { hidden_count: 47 });

        let split = build_split_display_map(&records, &options);
        assert_eq!(split.len(), 7);
        assert_eq!(gap_count(&split), 2);

        // No hidden run at the edge, no marker
        let first = records_with_change(10, 0);
        let items = filter_records(&first, &options);
        assert!(matches!(items[0], FilteredItem::Record { index: 0, .. }));
        assert_eq!(items.len(), 4);

        // Nothing visible stays empty
        let text = lines(&["a", "b"]);
        assert!(filter_records(&align(&text, &text), &options).is_empty());
    }

    /// Two changes far apart, at 20 and 70.
    fn records_with_two_changes() -> Vec<EditRecord> {
        let mut records = records_with_change(100, 20);
        records[70] = Edit::Delete {
            old_index: 71,
            value: "dropped".to_string(),
        };
        records
    }

    #[test]
    fn test_gap_only_between_visible_records() {
        let records = records_with_two_changes();
        let items = filter_records(&records, &diff_only());
        assert_eq!(
            record_indices(&items),
            vec![18, 19, 20, 21, 22, 68, 69, 70, 71, 72]
        );
        assert_eq!(items.len(), 11);
        assert_eq!(items[5], FilteredItem::Gap { hidden_count: 45 });

        let split = build_split_display_map(&records, &diff_only());
        assert_eq!(split.len(), 11);
        assert_eq!(gap_count(&split), 1);
        assert!(split[5].is_gap());
    }

    #[test]
    fn test_diff_only_change_at_edges() {
        let first = records_with_change(100, 0);
        let items = filter_records(&first, &diff_only());
        assert_eq!(record_indices(&items), vec![0, 1, 2]);
        assert!(matches!(items[0], FilteredItem::Record { index: 0, .. }));
        assert_eq!(items.len(), 3);

        let last = records_with_change(100, 99);
        let items = filter_records(&last, &diff_only());
        assert_eq!(record_indices(&items), vec![97, 98, 99]);
        assert!(matches!(items.last(), Some(FilteredItem::Record { index: 99, .. })));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_overlapping_windows_have_no_gap() {
        let mut records = records_with_change(30, 10);
        records[14] = Edit::Delete {
            old_index: 15,
            value: "dropped".to_string(),
        };
        let items = filter_records(&records, &diff_only());
        assert_eq!(record_indices(&items), (8..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_hidden_record_between_windows_gets_a_gap() {
        let mut records = records_with_change(30, 10);
        records[16] = Edit::Insert {
            new_index: 17,
            value: "extra".to_string(),
        };
        let items = filter_records(&records, &diff_only());
        let gap_positions: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches!(item, FilteredItem::Gap { .. }))
            .map(|(i, _)| i)
            .collect();
        // Only record 13 separates the two windows.
        assert_eq!(gap_positions, vec![5]);
        assert_eq!(items[5], FilteredItem::Gap { hidden_count: 1 });
    }

    #[test]
    fn test_diff_only_without_changes_is_empty() {
        let text = lines(&["a", "b", "c"]);
        let records = align(&text, &text);
        assert!(build_split_display_map(&records, &diff_only()).is_empty());
        assert!(build_unified_display_map(&records, &diff_only()).is_empty());
    }

    #[test]
    fn test_zero_radius_shows_only_changes() {
        let records = records_with_change(5, 2);
        let options = ProjectionOptions {
            diff_only: true,
            context_radius: 0,
            ..ProjectionOptions::default()
        };
        let items = filter_records(&records, &options);
        assert_eq!(record_indices(&items), vec![2]);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_split_projection_shapes() {
        let records = align(
            &lines(&["alpha", "beta", "gamma"]),
            &lines(&["alpha", "BETA", "gamma", "delta"]),
        );
        let rows = build_split_display_map(&records, &ProjectionOptions::default());
        assert_eq!(rows.len(), 4);

        let DisplayRow::Split { old, new } = &rows[1] else {
            panic!("expected split row");
        };
        assert_eq!(old.class, LineClass::Changed);
        assert_eq!(old.old_lineno, Some(2));
        assert_eq!(old.fragments[0].kind, FragmentKind::Deleted);
        assert_eq!(new.new_lineno, Some(2));
        assert_eq!(new.text(), "BETA");

        let DisplayRow::Split { old, new } = &rows[3] else {
            panic!("expected split row");
        };
        assert_eq!(old.class, LineClass::Placeholder);
        assert_eq!(old.old_lineno, None);
        assert_eq!(new.class, LineClass::Added);
        assert_eq!(new.marker, Marker::Added);
        assert_eq!(new.text(), "delta");
    }

    #[test]
    fn test_unified_projection_shapes() {
        let records = align(
            &lines(&["alpha", "beta", "gamma"]),
            &lines(&["alpha", "BETA", "gamma", "delta"]),
        );
        let rows = build_unified_display_map(&records, &ProjectionOptions::default());
        let markers: Vec<&str> = rows
            .iter()
            .map(|row| match row {
                DisplayRow::Unified(line) => line.marker.as_str(),
                DisplayRow::Split { .. } => "?",
            })
            .collect();
        assert_eq!(markers, vec![" ", "-", "+", " ", "+"]);

        let DisplayRow::Unified(removed) = &rows[1] else {
            panic!("expected unified row");
        };
        assert_eq!(removed.class, LineClass::Removed);
        assert_eq!((removed.old_lineno, removed.new_lineno), (Some(2), None));

        let DisplayRow::Unified(context) = &rows[3] else {
            panic!("expected unified row");
        };
        assert_eq!((context.old_lineno, context.new_lineno), (Some(3), Some(3)));
    }

    #[test]
    fn test_gap_lines_have_no_line_numbers() {
        let records = records_with_two_changes();
        let rows = build_unified_display_map(&records, &diff_only());
        assert_eq!(gap_count(&rows), 1);
        for row in rows {
            if let DisplayRow::Unified(line) = row {
                if line.is_gap() {
                    assert_eq!((line.old_lineno, line.new_lineno), (None, None));
                    assert_eq!(line.text(), GAP_TEXT);
                    assert_eq!(line.class.class_name(), "empty-placeholder");
                }
            }
        }
    }

    #[test]
    fn test_oversized_change_has_no_highlights() {
        let records = vec![Edit::Change {
            old_index: 1,
            new_index: 1,
            old: "x".repeat(1000),
            new: "y".repeat(1000),
        }];
        let rows = build_split_display_map(&records, &ProjectionOptions::default());
        let DisplayRow::Split { old, new } = &rows[0] else {
            panic!("expected split row");
        };
        assert!(old.fragments.iter().all(|f| f.kind == FragmentKind::Plain));
        assert!(new.fragments.iter().all(|f| f.kind == FragmentKind::Plain));
    }

    #[test]
    fn test_mode_dispatch() {
        let records = records_with_change(3, 1);
        let options = ProjectionOptions::default();
        let split = build_display_map(&records, DiffViewMode::Split, &options);
        let unified = build_display_map(&records, DiffViewMode::Unified, &options);
        assert!(split.iter().all(|r| matches!(r, DisplayRow::Split { .. })));
        assert!(unified.iter().all(|r| matches!(r, DisplayRow::Unified(_))));
        assert_eq!(unified.len(), split.len() + 1);
    }

    #[test]
    fn test_hunk_starts() {
        let records = align(
            &lines(&["a", "b", "c", "d", "e"]),
            &lines(&["a", "B", "c", "d", "E", "f"]),
        );
        let rows = build_unified_display_map(&records, &ProjectionOptions::default());
        // a, -b, +B, c, d, -e, +E, +f
        assert_eq!(hunk_starts(&rows), vec![1, 5]);
    }
}
