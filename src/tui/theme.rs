use std::fs;
use std::path::Path;

use log::warn;
use ratatui::style::Color;
use serde::Deserialize;

use crate::config::path::theme_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::Rgb(((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8))
}

#[derive(Deserialize)]
struct Config {
    bg: Option<String>,
    fg: Option<String>,
    accent: Option<String>,
    muted: Option<String>,
    error: Option<String>,
}

/// `theme.toml` next to `config.toml`, zenburn otherwise.
pub fn load() -> Theme {
    load_from(&theme_path())
}

pub fn load_from(path: &Path) -> Theme {
    let Ok(content) = fs::read_to_string(path) else {
        return zenburn();
    };
    match toml::from_str::<Config>(&content) {
        Ok(cfg) => {
            let fallback = zenburn();
            let pick = |v: &Option<String>, d: Color| v.as_deref().and_then(hex_to_color).unwrap_or(d);
            Theme {
                bg: pick(&cfg.bg, fallback.bg),
                fg: pick(&cfg.fg, fallback.fg),
                accent: pick(&cfg.accent, fallback.accent),
                muted: pick(&cfg.muted, fallback.muted),
                error: pick(&cfg.error, fallback.error),
            }
        }
        Err(e) => {
            warn!("ignoring theme {}: {e}", path.display());
            zenburn()
        }
    }
}

pub fn zenburn() -> Theme {
    Theme {
        bg: Color::Rgb(40, 40, 40),
        fg: Color::Rgb(220, 220, 204),
        accent: Color::Rgb(181, 189, 104),
        muted: Color::Rgb(150, 150, 150),
        error: Color::Rgb(204, 147, 147),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_theme_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.toml");
        fs::write(&path, "accent = \"#ff0000\"\nfg = \"nope\"\n").unwrap();
        let theme = load_from(&path);
        assert_eq!(theme.accent, Color::Rgb(255, 0, 0));
        assert_eq!(theme.fg, zenburn().fg);
    }

    #[test]
    fn missing_or_broken_file_is_zenburn() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("none.toml")), zenburn());
        let path = dir.path().join("bad.toml");
        fs::write(&path, "accent = [").unwrap();
        assert_eq!(load_from(&path), zenburn());
    }
}
