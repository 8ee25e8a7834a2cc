use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::diff::{Fragment, FragmentKind};
use crate::display_map::{DisplayRow, LineClass, Marker, ViewLine};
use crate::state::{AppState, DiffViewMode};
use crate::theme::Theme;

use super::Component;

const GUTTER_WIDTH: usize = 5;

pub struct DiffView;

impl Component for DiffView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let diff = &state.diff;

        let block = Block::default()
            .title(format_title(state))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));

        let empty_message = match &diff.comparison {
            None if diff.loading => Some(" Comparing..."),
            None => Some(" No comparison loaded"),
            Some(_) if !diff.rows.is_empty() => None,
            Some(cmp) if cmp.records.is_empty() => Some(" Both documents are empty"),
            Some(cmp) if cmp.is_identical() => Some(" Documents are identical"),
            Some(_) => None,
        };
        if let Some(content) = empty_message {
            let paragraph = Paragraph::new(content)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let visible = diff
            .rows
            .iter()
            .skip(diff.scroll_offset)
            .take(inner.height as usize);

        match diff.options.view_mode {
            DiffViewMode::Split => {
                let halves = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(inner);

                let mut left = Vec::new();
                let mut right = Vec::new();
                for row in visible {
                    if let DisplayRow::Split { old, new } = row {
                        left.push(make_split_line(old, old.old_lineno, theme));
                        right.push(make_split_line(new, new.new_lineno, theme));
                    }
                }
                frame.render_widget(Paragraph::new(left), halves[0]);
                frame.render_widget(Paragraph::new(right), halves[1]);
            }
            DiffViewMode::Unified => {
                let lines: Vec<Line> = visible
                    .filter_map(|row| match row {
                        DisplayRow::Unified(line) => Some(make_unified_line(line, theme)),
                        DisplayRow::Split { .. } => None,
                    })
                    .collect();
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }
    }
}

fn format_title(state: &AppState) -> String {
    let diff = &state.diff;
    let mut title = format!(
        " {} \u{2192} {} [{}",
        diff.old_doc.name,
        diff.new_doc.name,
        diff.options.view_mode.label()
    );
    if diff.options.diff_only {
        title.push_str(&format!(", changes \u{b1}{}", diff.options.context_radius));
    }
    title.push_str("] ");
    title
}

fn format_lineno(lineno: Option<usize>, width: usize) -> String {
    match lineno {
        Some(n) => format!("{n:>width$}"),
        None => " ".repeat(width),
    }
}

/// Background and foreground for a whole line, by class and side.
fn line_style(line: &ViewLine, theme: &Theme) -> Style {
    match line.class {
        LineClass::Context => Style::default().fg(theme.diff_context_fg),
        LineClass::Added => Style::default().fg(theme.diff_add_fg).bg(theme.diff_add_bg),
        LineClass::Removed => Style::default().fg(theme.diff_del_fg).bg(theme.diff_del_bg),
        LineClass::Changed => match line.marker {
            Marker::Removed => Style::default().fg(theme.text).bg(theme.diff_del_bg),
            _ => Style::default().fg(theme.text).bg(theme.diff_add_bg),
        },
        LineClass::Placeholder => Style::default().fg(theme.text_muted).bg(theme.collapsed_bg),
    }
}

fn fragment_spans<'a>(fragments: &[Fragment], base: Style, theme: &Theme) -> Vec<Span<'a>> {
    fragments
        .iter()
        .map(|fragment| {
            let style = match fragment.kind {
                FragmentKind::Plain => base,
                FragmentKind::Deleted => base
                    .bg(theme.char_del_bg)
                    .add_modifier(Modifier::BOLD),
                FragmentKind::Inserted => base
                    .bg(theme.char_add_bg)
                    .add_modifier(Modifier::BOLD),
            };
            Span::styled(fragment.text.clone(), style)
        })
        .collect()
}

fn gap_label(line: &ViewLine) -> String {
    match line.hidden_count {
        0 => line.text(),
        1 => format!("{} 1 line hidden", line.text()),
        n => format!("{} {n} lines hidden", line.text()),
    }
}

fn make_split_line<'a>(line: &ViewLine, lineno: Option<usize>, theme: &Theme) -> Line<'a> {
    let gutter_style = Style::default().fg(theme.text_muted);
    if line.is_gap() {
        return Line::from(vec![
            Span::styled(format!("{} ", " ".repeat(GUTTER_WIDTH)), gutter_style),
            Span::styled(gap_label(line), gutter_style),
        ]);
    }

    let base = line_style(line, theme);
    let marker = match line.class {
        LineClass::Context | LineClass::Placeholder => " ",
        _ => line.marker.as_str(),
    };
    let mut spans = vec![
        Span::styled(format_lineno(lineno, GUTTER_WIDTH), gutter_style),
        Span::styled(marker.to_string(), base),
    ];
    spans.extend(fragment_spans(&line.fragments, base, theme));
    Line::from(spans).style(base)
}

fn make_unified_line<'a>(line: &ViewLine, theme: &Theme) -> Line<'a> {
    let gutter_style = Style::default().fg(theme.text_muted);
    if line.is_gap() {
        return Line::from(vec![
            Span::styled(
                format!("{} {} ", " ".repeat(GUTTER_WIDTH), " ".repeat(GUTTER_WIDTH)),
                gutter_style,
            ),
            Span::styled(gap_label(line), gutter_style),
        ]);
    }

    let base = line_style(line, theme);
    let gutter = format!(
        "{} {}",
        format_lineno(line.old_lineno, GUTTER_WIDTH),
        format_lineno(line.new_lineno, GUTTER_WIDTH)
    );
    let mut spans = vec![
        Span::styled(gutter, gutter_style),
        Span::styled(line.marker.as_str().to_string(), base),
    ];
    spans.extend(fragment_spans(&line.fragments, base, theme));
    Line::from(spans).style(base)
}
