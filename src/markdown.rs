use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::Theme;

const CODE_INDENT: &str = "    ";
const RULE_WIDTH: usize = 24;

/// Styles applied by the preview renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreviewStyles {
    pub text: Style,
    pub heading: Style,
    pub code: Style,
    pub link: Style,
    pub muted: Style,
}

impl PreviewStyles {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            text: Style::default().fg(theme.text),
            heading: Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(theme.warning),
            link: Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::UNDERLINED),
            muted: Style::default().fg(theme.text_muted),
        }
    }
}

/// Render Markdown source into styled terminal lines.
///
/// Block structure becomes line structure: one line per paragraph, heading,
/// list item, table row and code line, with a blank line between blocks.
pub fn render_markdown(source: &str, styles: &PreviewStyles) -> Vec<Line<'static>> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let mut renderer = Renderer::new(styles);
    for event in Parser::new_ext(source, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

struct Renderer<'s> {
    styles: &'s PreviewStyles,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,

    emphasis: usize,
    strong: usize,
    strikethrough: usize,
    link: usize,
    heading: Option<HeadingLevel>,
    quote_depth: usize,
    /// Open lists, innermost last. `Some(n)` is the next ordered number.
    lists: Vec<Option<u64>>,
    in_code_block: bool,
    table_cell: usize,
}

impl<'s> Renderer<'s> {
    fn new(styles: &'s PreviewStyles) -> Self {
        Self {
            styles,
            lines: Vec::new(),
            current: Vec::new(),
            emphasis: 0,
            strong: 0,
            strikethrough: 0,
            link: 0,
            heading: None,
            quote_depth: 0,
            lists: Vec::new(),
            in_code_block: false,
            table_cell: 0,
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }

    fn inline_style(&self) -> Style {
        let mut style = match self.heading {
            Some(_) => self.styles.heading,
            None => self.styles.text,
        };
        if self.heading == Some(HeadingLevel::H1) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.emphasis > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strong > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.strikethrough > 0 {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.link > 0 {
            style = style.patch(self.styles.link);
        }
        style
    }

    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if self.current.is_empty() && self.quote_depth > 0 {
            self.current
                .push(Span::styled("> ".repeat(self.quote_depth), self.styles.muted));
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    /// End the current block with at most one blank line.
    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn push_code(&mut self, text: &str) {
        for line in text.lines() {
            self.push(CODE_INDENT, self.styles.code);
            self.push(line, self.styles.code);
            self.flush();
        }
    }

    fn start_item(&mut self) {
        self.flush();
        let indent = "  ".repeat(self.lists.len().saturating_sub(1));
        let bullet = match self.lists.last_mut() {
            Some(Some(next)) => {
                let bullet = format!("{indent}{next}. ");
                *next += 1;
                bullet
            }
            _ => format!("{indent}\u{2022} "),
        };
        self.push(&bullet, self.styles.muted);
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.in_code_block => self.push_code(&text),
            Event::Text(text) => self.push(&text, self.inline_style()),
            Event::Code(code) => self.push(&code, self.styles.code),
            Event::SoftBreak => self.push(" ", self.inline_style()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.push(&"\u{2500}".repeat(RULE_WIDTH), self.styles.muted);
                self.blank();
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push(marker, self.styles.muted);
            }
            Event::Html(html) => {
                for line in html.lines() {
                    self.push(line, self.styles.muted);
                    self.flush();
                }
            }
            Event::InlineHtml(html) => self.push(&html, self.styles.muted),
            Event::FootnoteReference(label) => {
                self.push(&format!("[^{label}]"), self.styles.muted);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.flush(),
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level);
            }
            Tag::BlockQuote => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => self.start_item(),
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { .. } => self.link += 1,
            Tag::Image { .. } => self.push("[image: ", self.styles.muted),
            Tag::TableHead | Tag::TableRow => {
                self.flush();
                self.table_cell = 0;
            }
            Tag::TableCell => {
                if self.table_cell > 0 {
                    self.push(" | ", self.styles.muted);
                }
                self.table_cell += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.blank();
                } else {
                    self.flush();
                }
            }
            TagEnd::Heading(_) => {
                self.heading = None;
                self.blank();
            }
            TagEnd::BlockQuote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank();
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item | TagEnd::TableHead | TagEnd::TableRow => self.flush(),
            TagEnd::Table => self.blank(),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => self.link = self.link.saturating_sub(1),
            TagEnd::Image => self.push("]", self.styles.muted),
            _ => {}
        }
    }
}
