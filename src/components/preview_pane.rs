use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::AppState;

use super::Component;

/// Rendered Markdown of the old and new documents in two columns.
pub struct PreviewPane;

impl Component for PreviewPane {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let preview = &state.preview;

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let sides = [
            (halves[0], &state.diff.old_doc.name, &preview.old_lines),
            (halves[1], &state.diff.new_doc.name, &preview.new_lines),
        ];
        for (half, name, lines) in sides {
            let block = Block::default()
                .title(format!(" {name} [preview] "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent));
            let inner = block.inner(half);
            frame.render_widget(block, half);

            if lines.is_empty() {
                let empty = Paragraph::new(" Empty document")
                    .style(Style::default().fg(theme.text_muted));
                frame.render_widget(empty, inner);
                continue;
            }
            let visible: Vec<Line> = visible_lines(lines, preview.scroll_offset, inner.height);
            frame.render_widget(Paragraph::new(visible), inner);
        }
    }
}

fn visible_lines<'a>(lines: &[Line<'a>], offset: usize, height: u16) -> Vec<Line<'a>> {
    lines
        .iter()
        .skip(offset)
        .take(height as usize)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DiffOptions;
    use crate::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_visible_lines_window() {
        let lines: Vec<Line> = (0..5).map(|i| Line::from(format!("row {i}"))).collect();
        let window = visible_lines(&lines, 3, 4);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0], Line::from("row 3"));
    }

    #[test]
    fn test_renders_both_documents() {
        let theme = Theme::from_name("one-dark");
        let mut state = AppState::new(DiffOptions::new(false, false), theme.clone());
        state.diff.old_doc.name = "v1.md".to_string();
        state.diff.new_doc.name = "v2.md".to_string();
        state
            .preview
            .set_sources("# Before".to_string(), String::new(), &theme);

        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal
            .draw(|frame| PreviewPane.render(frame, frame.area(), &state))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let row: String = (0..40u16).map(|x| buffer[(x, 1u16)].symbol()).collect();
        assert!(row.contains("Before"));
        assert!(row.contains("Empty document"));
    }
}
