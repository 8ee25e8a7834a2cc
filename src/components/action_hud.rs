use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;

use super::{bar_style, Component};

const SHORT_BINDINGS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("j/k", "scroll"),
    ("n/N", "hunk"),
    ("Tab", "view"),
    ("d", "diff-only"),
    ("v", "preview"),
    ("?", "more"),
];

const FULL_BINDINGS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("j/k", "scroll"),
    ("PgUp/PgDn", "page"),
    ("g/G", "top/bottom"),
    ("n/N", "hunk"),
    ("Tab", "view"),
    ("d", "diff-only"),
    ("+/-", "context"),
    ("v", "preview"),
    ("t", "theme"),
    ("r", "reload"),
    ("?", "less"),
];

pub struct ActionHud;

impl Component for ActionHud {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        if let Some((ref msg, is_error)) = state.status_message {
            let color = if is_error { theme.error } else { theme.success };
            let bar = Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(msg.as_str(), Style::default().fg(color)),
            ]))
            .style(bar_style(theme));
            frame.render_widget(bar, area);
            return;
        }

        let bindings = if state.hud_expanded {
            FULL_BINDINGS
        } else {
            SHORT_BINDINGS
        };

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                (*desc).to_string(),
                Style::default().fg(theme.text_muted),
            ));
        }

        // Scroll position on the right
        let (offset, total) = if state.preview.visible {
            (state.preview.scroll_offset, state.preview.content_height())
        } else {
            (state.diff.scroll_offset, state.diff.rows.len())
        };
        if total > 0 {
            let position = format!(" {}/{} ", (offset + 1).min(total), total);
            let used: usize = spans.iter().map(|s| s.width()).sum();
            let remaining = (area.width as usize).saturating_sub(used + position.len());
            if remaining > 0 {
                spans.push(Span::raw(" ".repeat(remaining)));
                spans.push(Span::styled(position, Style::default().fg(theme.text_muted)));
            }
        }

        let bar = Paragraph::new(Line::from(spans)).style(bar_style(theme));
        frame.render_widget(bar, area);
    }
}
