/// Central action enum. All state mutations flow through `App::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // Scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    ScrollToBottom,
    NextHunk,
    PrevHunk,

    // Display toggles (re-project, never re-align)
    ToggleViewMode,
    ToggleDiffOnly,
    IncreaseContext,
    DecreaseContext,
    CycleTheme,
    ToggleHud,
    /// Swap the diff for rendered Markdown of both documents
    TogglePreview,

    // Re-read both documents and re-run the comparison
    Reload,
}
