pub mod app;
pub mod host_form_state;
pub mod theme;

pub use app::run_tui;
