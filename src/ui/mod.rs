pub mod app;
pub mod state;
pub mod theme;
pub mod views;

pub use app::CuelineApp;
pub use state::{AppState, AppView};
pub use theme::Theme;
