use anyhow::Result;
use crossterm::style::{style, Color, Stylize};
use serde::Serialize;
use std::fmt::Write as _;

use crate::cli::OutputFormat;
use crate::compare::CompareOutput;
use crate::diff::{DiffStats, EditRecord, FragmentKind};
use crate::display_map::{build_display_map, DisplayRow, LineClass, Marker, ViewLine};
use crate::state::{DiffOptions, DiffViewMode};

const LINENO_WIDTH: usize = 5;

/// Resolve `Auto` against whether stdout is a terminal.
pub fn resolve_format(format: OutputFormat, stdout_is_terminal: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto if stdout_is_terminal => OutputFormat::Color,
        OutputFormat::Auto => OutputFormat::Plain,
        other => other,
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    old: &'a str,
    new: &'a str,
    view: &'a str,
    stats: DiffStats,
    records: &'a [EditRecord],
    rows: &'a [DisplayRow],
}

/// Render a comparison for non-interactive output.
pub fn render(output: &CompareOutput, options: &DiffOptions, format: OutputFormat) -> Result<String> {
    let rows = build_display_map(
        &output.comparison.records,
        options.view_mode,
        &options.projection(),
    );

    match format {
        OutputFormat::Json => {
            let report = JsonReport {
                old: &output.old.name,
                new: &output.new.name,
                view: options.view_mode.label(),
                stats: output.comparison.stats,
                records: &output.comparison.records,
                rows: &rows,
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Color => Ok(render_text(output, &rows, options.view_mode, true)),
        OutputFormat::Plain | OutputFormat::Auto => {
            Ok(render_text(output, &rows, options.view_mode, false))
        }
    }
}

fn render_text(
    output: &CompareOutput,
    rows: &[DisplayRow],
    mode: DiffViewMode,
    color: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- {}", output.old.name);
    let _ = writeln!(out, "+++ {}", output.new.name);

    // Widest old-side cell, for aligning the split divider
    let left_width = match mode {
        DiffViewMode::Split => rows
            .iter()
            .filter_map(|row| match row {
                DisplayRow::Split { old, .. } if !old.is_gap() => {
                    Some(cell_text(old).chars().count())
                }
                _ => None,
            })
            .max()
            .unwrap_or(0),
        DiffViewMode::Unified => 0,
    };

    for row in rows {
        match row {
            // One label spanning both columns
            DisplayRow::Split { old, .. } if row.is_gap() => {
                let _ = writeln!(
                    out,
                    "{}  {}",
                    " ".repeat(LINENO_WIDTH),
                    paint_line(old, color)
                );
            }
            DisplayRow::Split { old, new } => {
                let old_text = paint_line(old, color);
                let pad = left_width.saturating_sub(cell_text(old).chars().count());
                let _ = writeln!(
                    out,
                    "{} {}{}{} | {} {}{}",
                    lineno(old.old_lineno),
                    marker(old),
                    old_text,
                    " ".repeat(pad),
                    lineno(new.new_lineno),
                    marker(new),
                    paint_line(new, color),
                );
            }
            DisplayRow::Unified(line) => {
                let _ = writeln!(
                    out,
                    "{} {} {}{}",
                    lineno(line.old_lineno),
                    lineno(line.new_lineno),
                    marker(line),
                    paint_line(line, color),
                );
            }
        }
    }

    let stats = output.comparison.stats;
    if stats.is_empty() {
        out.push_str("no differences\n");
    } else if color {
        let _ = writeln!(
            out,
            "{} {} {}",
            format!("+{}", stats.added).green(),
            format!("-{}", stats.removed).red(),
            format!("{} changed", stats.changed).yellow(),
        );
    } else {
        let _ = writeln!(out, "+{} -{} {} changed", stats.added, stats.removed, stats.changed);
    }
    out
}

fn lineno(n: Option<usize>) -> String {
    match n {
        Some(n) => format!("{n:>width$}", width = LINENO_WIDTH),
        None => " ".repeat(LINENO_WIDTH),
    }
}

fn marker(line: &ViewLine) -> &'static str {
    match line.marker {
        Marker::Gap => " ",
        other => other.as_str(),
    }
}

fn cell_text(line: &ViewLine) -> String {
    if line.is_gap() {
        format!("{} {} hidden", line.text(), line.hidden_count)
    } else {
        line.text()
    }
}

fn line_color(line: &ViewLine) -> Option<Color> {
    match line.class {
        LineClass::Added => Some(Color::Green),
        LineClass::Removed => Some(Color::Red),
        LineClass::Changed => match line.marker {
            Marker::Removed => Some(Color::Red),
            _ => Some(Color::Green),
        },
        LineClass::Placeholder => Some(Color::DarkGrey),
        LineClass::Context => None,
    }
}

fn paint_line(line: &ViewLine, color: bool) -> String {
    if !color {
        return cell_text(line);
    }
    if line.is_gap() {
        return cell_text(line).dark_grey().to_string();
    }

    let fg = line_color(line);
    let mut out = String::new();
    for fragment in &line.fragments {
        let mut styled = style(fragment.text.as_str());
        if let Some(fg) = fg {
            styled = styled.with(fg);
        }
        if fragment.kind != FragmentKind::Plain {
            styled = styled.bold().reverse();
        }
        let _ = write!(out, "{styled}");
    }
    out
}
