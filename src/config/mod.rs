//! Configuration layer: paths, `config.toml`, and the JSON settings store.
pub mod app;
pub mod io;
pub mod path;

pub use app::{AppConfig, Permissions};
pub use io::SettingsStore;
pub use path::{config_dir, config_path};
