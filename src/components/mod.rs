pub mod action_hud;
pub mod context_bar;
pub mod diff_view;
pub mod preview_pane;

use ratatui::{layout::Rect, style::Style, Frame};

use crate::state::AppState;
use crate::theme::Theme;

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}

/// Base style of the one-line bars above and below the diff.
fn bar_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text).bg(theme.surface)
}
