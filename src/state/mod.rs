pub mod app_state;
pub mod diff_state;
pub mod preview_state;

pub use app_state::AppState;
pub use diff_state::{DiffOptions, DiffState, DiffViewMode, DocumentInfo};
pub use preview_state::PreviewState;
