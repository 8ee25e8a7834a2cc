use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::action::Action;
use crate::async_diff::{CompareRequest, CompareWorker};
use crate::compare::CompareOutput;
use crate::components::action_hud::ActionHud;
use crate::components::context_bar::ContextBar;
use crate::components::diff_view::DiffView;
use crate::components::preview_pane::PreviewPane;
use crate::components::Component;
use crate::event::{map_key_to_action, map_mouse_to_action, Event, EventReader};
use crate::state::{AppState, DiffOptions, DocumentInfo};
use crate::theme::{next_theme, Theme};
use crate::tui::Tui;

const MAX_CONTEXT_RADIUS: usize = 50;

pub struct App {
    state: AppState,
    worker: CompareWorker,
    old_path: PathBuf,
    new_path: PathBuf,
    max_cells: Option<usize>,
    generation: u64,
    status_clear_countdown: u32,
    hud_collapse_countdown: u32,
}

impl App {
    pub fn new(
        diff_options: DiffOptions,
        theme: Theme,
        old_path: PathBuf,
        new_path: PathBuf,
        max_cells: Option<usize>,
    ) -> Self {
        Self {
            state: AppState::new(diff_options, theme),
            worker: CompareWorker::new(),
            old_path,
            new_path,
            max_cells,
            generation: 0,
            status_clear_countdown: 0,
            hud_collapse_countdown: 0,
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        self.request_compare();

        let mut events = EventReader::new(Duration::from_millis(50));

        let context_bar = ContextBar;
        let diff_view = DiffView;
        let preview_pane = PreviewPane;
        let action_hud = ActionHud;

        loop {
            self.poll_compare_results();

            // context_bar + hud + borders
            let term_size = terminal.size()?;
            let viewport = term_size.height.saturating_sub(4) as usize;
            self.state.diff.viewport_height = viewport;
            self.state.preview.viewport_height = viewport;

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                context_bar.render(frame, outer[0], &self.state);
                if self.state.preview.visible {
                    preview_pane.render(frame, outer[1], &self.state);
                } else {
                    diff_view.render(frame, outer[1], &self.state);
                }
                action_hud.render(frame, outer[2], &self.state);
            })?;

            // Wait for one event, then drain the rest so buffered
            // scroll input does not lag behind.
            let mut pending = Vec::new();
            if let Some(ev) = events.next().await {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            // Collapse consecutive scroll actions into net movement
            let mut scroll_delta: isize = 0;
            let mut actions: Vec<Action> = Vec::new();
            for event in pending {
                let action = match event {
                    Event::Key(key) => map_key_to_action(key),
                    Event::Mouse(mouse) => map_mouse_to_action(mouse),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                match action {
                    Some(Action::ScrollUp) => scroll_delta -= 1,
                    Some(Action::ScrollDown) => scroll_delta += 1,
                    Some(other) => actions.push(other),
                    None => {}
                }
            }

            if scroll_delta != 0 {
                self.scroll_by(scroll_delta);
            }
            for action in actions {
                self.update(action);
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn request_compare(&mut self) {
        self.generation += 1;
        self.state.diff.loading = true;
        self.worker.request(CompareRequest {
            generation: self.generation,
            old_path: self.old_path.clone(),
            new_path: self.new_path.clone(),
            max_cells: self.max_cells,
        });
    }

    fn poll_compare_results(&mut self) {
        while let Some(result) = self.worker.try_recv() {
            if result.generation < self.generation {
                debug!(generation = result.generation, "dropping stale comparison");
                continue;
            }
            self.state.diff.loading = false;
            match result.output {
                Ok(output) => self.apply_output(output),
                Err(e) => {
                    warn!(error = %e, "comparison failed");
                    self.set_status(e, true);
                }
            }
        }
    }

    fn apply_output(&mut self, output: CompareOutput) {
        self.state.diff.old_doc = DocumentInfo {
            name: output.old.name.clone(),
            line_count: output.old.line_count(),
        };
        self.state.diff.new_doc = DocumentInfo {
            name: output.new.name.clone(),
            line_count: output.new.line_count(),
        };
        self.state.preview.set_sources(
            output.old.lines.join("\n"),
            output.new.lines.join("\n"),
            &self.state.theme,
        );
        self.state.diff.set_comparison(output.comparison);
    }

    /// Scroll whichever pane is showing.
    fn scroll_by(&mut self, delta: isize) {
        if self.state.preview.visible {
            self.state.preview.scroll_by(delta);
        } else {
            self.state.diff.scroll_by(delta);
        }
    }

    fn scroll_to(&mut self, row: usize) {
        if self.state.preview.visible {
            self.state.preview.scroll_to(row);
        } else {
            self.state.diff.scroll_to(row);
        }
    }

    fn update(&mut self, action: Action) {
        let viewport = if self.state.preview.visible {
            self.state.preview.viewport_height
        } else {
            self.state.diff.viewport_height
        };
        let page = viewport.max(1) as isize;
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Resize => {
                let offset = self.state.diff.scroll_offset;
                self.state.diff.scroll_to(offset);
                let offset = self.state.preview.scroll_offset;
                self.state.preview.scroll_to(offset);
            }

            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollPageUp => self.scroll_by(-page),
            Action::ScrollPageDown => self.scroll_by(page),
            Action::ScrollToTop => self.scroll_to(0),
            Action::ScrollToBottom => self.scroll_to(usize::MAX),
            Action::NextHunk => {
                if !self.state.diff.next_hunk() {
                    self.set_status("No more changes below".to_string(), false);
                }
            }
            Action::PrevHunk => {
                if !self.state.diff.prev_hunk() {
                    self.set_status("No more changes above".to_string(), false);
                }
            }

            Action::ToggleViewMode => self.state.diff.toggle_view_mode(),
            Action::ToggleDiffOnly => {
                self.state.diff.options.diff_only = !self.state.diff.options.diff_only;
                self.state.diff.scroll_offset = 0;
                self.state.diff.reproject();
            }
            Action::IncreaseContext => {
                let radius = &mut self.state.diff.options.context_radius;
                if *radius < MAX_CONTEXT_RADIUS {
                    *radius += 1;
                    self.state.diff.reproject();
                }
            }
            Action::DecreaseContext => {
                let radius = &mut self.state.diff.options.context_radius;
                if *radius > 0 {
                    *radius -= 1;
                    self.state.diff.reproject();
                }
            }
            Action::CycleTheme => {
                let name = next_theme(&self.state.theme.name);
                self.state.theme = Theme::from_name(name);
                self.state.preview.restyle(&self.state.theme);
                self.set_status(format!("Theme: {name}"), false);
            }
            Action::ToggleHud => {
                self.state.hud_expanded = !self.state.hud_expanded;
                // 10 seconds at 50ms tick rate
                self.hud_collapse_countdown = if self.state.hud_expanded { 200 } else { 0 };
            }
            Action::TogglePreview => {
                self.state.preview.visible = !self.state.preview.visible;
            }
            Action::Reload => {
                self.request_compare();
                self.set_status("Reloading documents".to_string(), false);
            }

            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
                if self.hud_collapse_countdown > 0 {
                    self.hud_collapse_countdown -= 1;
                    if self.hud_collapse_countdown == 0 {
                        self.state.hud_expanded = false;
                    }
                }
            }
        }
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        // ~3 seconds at 50ms tick rate
        self.status_clear_countdown = 60;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_documents;
    use crate::display_map::DisplayRow;
    use crate::document::Document;
    use crate::state::DiffViewMode;
    use std::path::Path;

    fn app_with(old: &str, new: &str, options: DiffOptions) -> App {
        let mut app = App::new(
            options,
            Theme::from_name("one-dark"),
            PathBuf::from("old.md"),
            PathBuf::from("new.md"),
            None,
        );
        let output = compare_documents(
            Document::from_text(Path::new("old.md"), old),
            Document::from_text(Path::new("new.md"), new),
            None,
        )
        .unwrap();
        app.apply_output(output);
        app
    }

    fn numbered(count: usize, changed: Option<usize>) -> String {
        (0..count)
            .map(|i| {
                if Some(i) == changed {
                    format!("edited {i}")
                } else {
                    format!("line {i}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_toggle_view_mode_reuses_comparison() {
        let mut app = app_with("a\nb", "a\nc", DiffOptions::new(false, false));
        assert!(matches!(app.state.diff.rows[0], DisplayRow::Split { .. }));

        app.update(Action::ToggleViewMode);
        assert_eq!(app.state.diff.options.view_mode, DiffViewMode::Unified);
        assert!(matches!(app.state.diff.rows[0], DisplayRow::Unified(_)));
        // Equal, then the change split into a removed and an added row
        assert_eq!(app.state.diff.rows.len(), 3);
        assert_eq!(app.generation, 0);
    }

    #[tokio::test]
    async fn test_toggle_diff_only_and_context() {
        let mut app = app_with(
            &numbered(30, None),
            &numbered(30, Some(15)),
            DiffOptions::new(false, false),
        );
        assert_eq!(app.state.diff.rows.len(), 30);

        app.update(Action::ToggleDiffOnly);
        // The change and two records either side
        assert_eq!(app.state.diff.rows.len(), 5);

        app.update(Action::DecreaseContext);
        assert_eq!(app.state.diff.options.context_radius, 1);
        assert_eq!(app.state.diff.rows.len(), 3);

        app.update(Action::IncreaseContext);
        app.update(Action::IncreaseContext);
        assert_eq!(app.state.diff.rows.len(), 7);
    }

    #[tokio::test]
    async fn test_toggle_view_mode_keeps_position() {
        let mut app = app_with(
            &numbered(30, None),
            &numbered(30, Some(3)),
            DiffOptions::new(false, false),
        );
        app.state.diff.viewport_height = 5;
        app.state.diff.scroll_to(10);

        app.update(Action::ToggleViewMode);
        // One extra row for the change above the top record
        assert_eq!(app.state.diff.scroll_offset, 11);
        app.update(Action::ToggleViewMode);
        assert_eq!(app.state.diff.scroll_offset, 10);
    }

    #[tokio::test]
    async fn test_preview_takes_scrolling() {
        let items = |n: usize| {
            (0..n)
                .map(|i| format!("- item {i}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let mut app = app_with(&items(30), &items(20), DiffOptions::new(false, false));
        app.state.diff.viewport_height = 10;
        app.state.preview.viewport_height = 10;

        app.update(Action::TogglePreview);
        assert!(app.state.preview.visible);
        assert_eq!(app.state.preview.content_height(), 30);

        app.update(Action::ScrollDown);
        assert_eq!(app.state.preview.scroll_offset, 1);
        assert_eq!(app.state.diff.scroll_offset, 0);
        app.update(Action::ScrollToBottom);
        assert_eq!(app.state.preview.scroll_offset, 20);

        app.update(Action::TogglePreview);
        app.update(Action::ScrollDown);
        assert_eq!(app.state.diff.scroll_offset, 1);
        assert_eq!(app.state.preview.scroll_offset, 20);
    }

    #[tokio::test]
    async fn test_cycle_theme_restyles_preview() {
        let mut app = app_with("# Title", "# Title", DiffOptions::new(false, false));
        app.update(Action::CycleTheme);
        let accent = app.state.theme.accent;
        assert_eq!(app.state.preview.old_lines[0].spans[0].style.fg, Some(accent));
    }

    #[tokio::test]
    async fn test_decrease_context_stops_at_zero() {
        let mut app = app_with("a", "b", DiffOptions::new(false, true));
        for _ in 0..5 {
            app.update(Action::DecreaseContext);
        }
        assert_eq!(app.state.diff.options.context_radius, 0);
    }

    #[tokio::test]
    async fn test_hunk_navigation_sets_status_at_end() {
        let mut app = app_with("a\nb", "a\nc", DiffOptions::new(false, false));
        app.state.diff.viewport_height = 1;
        app.update(Action::NextHunk);
        assert_eq!(app.state.diff.scroll_offset, 1);
        app.update(Action::NextHunk);
        let (msg, is_error) = app.state.status_message.clone().unwrap();
        assert_eq!(msg, "No more changes below");
        assert!(!is_error);
    }

    #[tokio::test]
    async fn test_status_clears_after_ticks() {
        let mut app = app_with("a", "a", DiffOptions::new(false, false));
        app.set_status("hello".to_string(), false);
        for _ in 0..60 {
            app.update(Action::Tick);
        }
        assert!(app.state.status_message.is_none());
    }

    #[tokio::test]
    async fn test_reload_bumps_generation() {
        let mut app = app_with("a", "b", DiffOptions::new(false, false));
        app.update(Action::Reload);
        assert_eq!(app.generation, 1);
        assert!(app.state.diff.loading);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = app_with("a", "b", DiffOptions::new(false, false));
        app.update(Action::Quit);
        assert!(app.state.should_quit);
    }
}
