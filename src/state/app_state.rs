use super::{DiffOptions, DiffState, PreviewState};
use crate::theme::Theme;

pub struct AppState {
    pub diff: DiffState,
    pub preview: PreviewState,
    pub theme: Theme,
    pub should_quit: bool,
    pub hud_expanded: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
}

impl AppState {
    pub fn new(diff_options: DiffOptions, theme: Theme) -> Self {
        Self {
            diff: DiffState::new(diff_options),
            preview: PreviewState::default(),
            theme,
            should_quit: false,
            hud_expanded: false,
            status_message: None,
        }
    }
}
