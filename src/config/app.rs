use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use super::path::{config_dir, config_path, expand};
use crate::error::Result;

/// Routes the operator may modify unless `config.toml` says otherwise.
pub const DEFAULT_MODIFY: [&str; 2] = ["extension/other", "common/security"];

/// Route-based permissions of the operator running the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions {
    pub modify: Vec<String>,
}

impl Permissions {
    pub fn all() -> Self {
        Permissions { modify: DEFAULT_MODIFY.iter().map(|s| s.to_string()).collect() }
    }

    pub fn none() -> Self {
        Permissions { modify: Vec::new() }
    }

    pub fn has_permission(&self, action: &str, route: &str) -> bool {
        match action {
            "modify" => self.modify.iter().any(|r| r == route),
            _ => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPermissions {
    modify: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    admin_config: Option<String>,
    public_config: Option<String>,
    database: Option<String>,
    db_prefix: Option<String>,
    settings: Option<String>,
    language: Option<String>,
    language_file: Option<String>,
    #[serde(default)]
    permissions: RawPermissions,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `admin/config.php`
    pub admin_config: PathBuf,
    /// Storefront `config.php`
    pub public_config: PathBuf,
    /// SQLite file holding the host table
    pub database: PathBuf,
    pub db_prefix: String,
    /// JSON settings store
    pub settings: PathBuf,
    pub language: String,
    pub language_file: Option<PathBuf>,
    pub permissions: Permissions,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dir = config_dir();
        AppConfig {
            admin_config: PathBuf::from("/var/www/html/admin/config.php"),
            public_config: PathBuf::from("/var/www/html/config.php"),
            database: dir.join("hosts.sqlite"),
            db_prefix: "oc_".to_string(),
            settings: dir.join("settings.json"),
            language: "en-gb".to_string(),
            language_file: None,
            permissions: Permissions::all(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the default location when `None`. A missing default
    /// file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };
        if !explicit && !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&path)?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml(&content, &base)
    }

    /// Parses TOML; relative paths are resolved against `base`.
    pub fn from_toml(content: &str, base: &Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let resolve = |p: &str| {
            let p = expand(p);
            if p.is_relative() { base.join(p) } else { p }
        };

        let mut cfg = AppConfig::default();
        if let Some(p) = raw.admin_config.as_deref() {
            cfg.admin_config = resolve(p);
        }
        if let Some(p) = raw.public_config.as_deref() {
            cfg.public_config = resolve(p);
        }
        if let Some(p) = raw.database.as_deref() {
            cfg.database = resolve(p);
        }
        if let Some(p) = raw.settings.as_deref() {
            cfg.settings = resolve(p);
        }
        if let Some(prefix) = raw.db_prefix {
            cfg.db_prefix = prefix;
        }
        if let Some(lang) = raw.language {
            cfg.language = lang;
        }
        cfg.language_file = raw.language_file.as_deref().map(resolve);
        if let Some(modify) = raw.permissions.modify {
            cfg.permissions = Permissions { modify };
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("", Path::new("/etc/hostmgmt")).unwrap();
        assert_eq!(cfg.db_prefix, "oc_");
        assert_eq!(cfg.language, "en-gb");
        assert!(cfg.permissions.has_permission("modify", "common/security"));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let cfg = AppConfig::from_toml(
            r#"
admin_config = "shop/admin/config.php"
public_config = "/srv/shop/config.php"
db_prefix = ""

[permissions]
modify = ["common/security"]
"#,
            Path::new("/etc/hostmgmt"),
        )
        .unwrap();
        assert_eq!(cfg.admin_config, PathBuf::from("/etc/hostmgmt/shop/admin/config.php"));
        assert_eq!(cfg.public_config, PathBuf::from("/srv/shop/config.php"));
        assert_eq!(cfg.db_prefix, "");
        assert!(!cfg.permissions.has_permission("modify", "extension/other"));
        assert!(!cfg.permissions.has_permission("access", "common/security"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(AppConfig::from_toml("admin_config = [", Path::new(".")).is_err());
    }
}
