use crate::diff::{Comparison, DEFAULT_CHAR_DIFF_LIMIT};
use crate::display_map::{
    build_display_map, hunk_starts, DisplayRow, ProjectionOptions, DEFAULT_CONTEXT_RADIUS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffViewMode {
    Split,
    Unified,
}

impl DiffViewMode {
    pub fn label(self) -> &'static str {
        match self {
            DiffViewMode::Split => "split",
            DiffViewMode::Unified => "unified",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DiffViewMode::Split => DiffViewMode::Unified,
            DiffViewMode::Unified => DiffViewMode::Split,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub view_mode: DiffViewMode,
    pub diff_only: bool,
    pub context_radius: usize,
    pub char_diff_limit: usize,
    pub edge_gaps: bool,
}

impl DiffOptions {
    pub fn new(unified: bool, diff_only: bool) -> Self {
        Self {
            view_mode: if unified {
                DiffViewMode::Unified
            } else {
                DiffViewMode::Split
            },
            diff_only,
            context_radius: DEFAULT_CONTEXT_RADIUS,
            char_diff_limit: DEFAULT_CHAR_DIFF_LIMIT,
            edge_gaps: false,
        }
    }

    pub fn projection(&self) -> ProjectionOptions {
        ProjectionOptions {
            diff_only: self.diff_only,
            context_radius: self.context_radius,
            char_diff_limit: self.char_diff_limit,
            edge_gaps: self.edge_gaps,
        }
    }
}

/// Header info for one side of the comparison.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub name: String,
    pub line_count: usize,
}

pub struct DiffState {
    pub options: DiffOptions,
    pub old_doc: DocumentInfo,
    pub new_doc: DocumentInfo,
    /// Last computed edit script. Display toggles re-project from here.
    pub comparison: Option<Comparison>,
    /// Rows for the current options, rebuilt by `reproject`.
    pub rows: Vec<DisplayRow>,
    /// First row of every changed run in `rows`.
    pub hunk_starts: Vec<usize>,
    pub scroll_offset: usize,
    pub viewport_height: usize,
    pub loading: bool,
}

impl DiffState {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            old_doc: DocumentInfo::default(),
            new_doc: DocumentInfo::default(),
            comparison: None,
            rows: Vec::new(),
            hunk_starts: Vec::new(),
            scroll_offset: 0,
            viewport_height: 20,
            loading: false,
        }
    }

    pub fn set_comparison(&mut self, comparison: Comparison) {
        self.comparison = Some(comparison);
        self.reproject();
    }

    /// Re-derive display rows from the cached comparison.
    pub fn reproject(&mut self) {
        self.rows = match &self.comparison {
            Some(cmp) => build_display_map(
                &cmp.records,
                self.options.view_mode,
                &self.options.projection(),
            ),
            None => Vec::new(),
        };
        self.hunk_starts = hunk_starts(&self.rows);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Switch split/unified, keeping the record at the top of the view.
    pub fn toggle_view_mode(&mut self) {
        let anchor = self
            .rows
            .iter()
            .skip(self.scroll_offset)
            .map(row_line_numbers)
            .find(|(old, new)| old.is_some() || new.is_some());

        self.options.view_mode = self.options.view_mode.toggled();
        self.reproject();

        let Some((old_anchor, new_anchor)) = anchor else {
            return;
        };
        let target = self.rows.iter().position(|row| {
            let (old, new) = row_line_numbers(row);
            (old_anchor.is_some() && old == old_anchor)
                || (new_anchor.is_some() && new == new_anchor)
        });
        if let Some(row) = target {
            self.scroll_to(row);
        }
    }

    pub fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.viewport_height.max(1))
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let target = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta as usize)
        };
        self.scroll_offset = target.min(self.max_scroll());
    }

    pub fn scroll_to(&mut self, row: usize) {
        self.scroll_offset = row.min(self.max_scroll());
    }

    /// Scroll to the first hunk starting below the top row.
    pub fn next_hunk(&mut self) -> bool {
        let current = self.scroll_offset;
        match self.hunk_starts.iter().find(|&&s| s > current) {
            Some(&start) => {
                self.scroll_to(start);
                true
            }
            None => false,
        }
    }

    /// Scroll to the last hunk starting above the top row.
    pub fn prev_hunk(&mut self) -> bool {
        let current = self.scroll_offset;
        match self.hunk_starts.iter().rev().find(|&&s| s < current) {
            Some(&start) => {
                self.scroll_to(start);
                true
            }
            None => false,
        }
    }
}

/// Line numbers a row shows. Gap rows have none.
fn row_line_numbers(row: &DisplayRow) -> (Option<usize>, Option<usize>) {
    match row {
        DisplayRow::Split { old, new } => (old.old_lineno, new.new_lineno),
        DisplayRow::Unified(line) => (line.old_lineno, line.new_lineno),
    }
}
