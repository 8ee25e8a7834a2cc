use ratatui::text::Line;

use crate::markdown::{render_markdown, PreviewStyles};
use crate::theme::Theme;

/// Rendered Markdown of both documents, shown side by side.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub visible: bool,
    old_source: String,
    new_source: String,
    pub old_lines: Vec<Line<'static>>,
    pub new_lines: Vec<Line<'static>>,
    pub scroll_offset: usize,
    pub viewport_height: usize,
}

impl PreviewState {
    pub fn set_sources(&mut self, old: String, new: String, theme: &Theme) {
        self.old_source = old;
        self.new_source = new;
        self.restyle(theme);
    }

    /// Re-render both sources, e.g. after a theme change.
    pub fn restyle(&mut self, theme: &Theme) {
        let styles = PreviewStyles::from_theme(theme);
        self.old_lines = render_markdown(&self.old_source, &styles);
        self.new_lines = render_markdown(&self.new_source, &styles);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Height of the taller rendered document.
    pub fn content_height(&self) -> usize {
        self.old_lines.len().max(self.new_lines.len())
    }

    pub fn max_scroll(&self) -> usize {
        self.content_height()
            .saturating_sub(self.viewport_height.max(1))
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
}
