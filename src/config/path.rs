use std::path::{Path, PathBuf};
use std::io;

/// `~/.config/hostmgmt` (or the platform equivalent).
pub fn config_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    base.join("hostmgmt")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn theme_path() -> PathBuf {
    config_dir().join("theme.toml")
}

/// Expands a leading `~` and environment variables.
pub fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(p) => PathBuf::from(p.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).into_owned()),
    }
}

/// Creates the parent directory and an empty JSON object file if missing.
pub fn ensure_json_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        std::fs::write(path, "{}\n")?;
    }
    Ok(())
}
