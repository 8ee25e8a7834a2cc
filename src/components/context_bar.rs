use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::AppState;

use super::{bar_style, Component};

pub struct ContextBar;

impl Component for ContextBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let diff = &state.diff;
        let muted = Style::default().fg(theme.text_muted);

        let mut spans = vec![
            Span::styled(
                " mdcompare ",
                Style::default().fg(Color::Black).bg(theme.accent),
            ),
            Span::raw("  "),
            Span::styled(
                diff.old_doc.name.clone(),
                Style::default()
                    .fg(theme.diff_del_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", diff.old_doc.line_count), muted),
            Span::styled(" \u{2192} ", muted),
            Span::styled(
                diff.new_doc.name.clone(),
                Style::default()
                    .fg(theme.diff_add_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", diff.new_doc.line_count), muted),
            Span::raw("  "),
            Span::styled(format!("[{}]", diff.options.view_mode.label()), muted),
        ];
        if diff.options.diff_only {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("[diff-only \u{b1}{}]", diff.options.context_radius),
                muted,
            ));
        }

        // Stats on the right
        if let Some(cmp) = &diff.comparison {
            let stats = &cmp.stats;
            let right = vec![
                Span::styled(format!("+{}", stats.added), Style::default().fg(theme.diff_add_fg)),
                Span::raw(" "),
                Span::styled(format!("-{}", stats.removed), Style::default().fg(theme.diff_del_fg)),
                Span::raw(" "),
                Span::styled(format!("{} changed ", stats.changed), Style::default().fg(theme.warning)),
            ];
            let used: usize = spans.iter().chain(right.iter()).map(|s| s.width()).sum();
            let remaining = (area.width as usize).saturating_sub(used);
            if remaining > 0 {
                spans.push(Span::raw(" ".repeat(remaining)));
                spans.extend(right);
            }
        }

        let bar = Paragraph::new(Line::from(spans)).style(bar_style(theme));
        frame.render_widget(bar, area);
    }
}
