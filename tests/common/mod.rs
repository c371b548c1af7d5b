//! Shared fixtures: a scratch shop with both bootstrap files.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use hostmgmt::config::AppConfig;
use tempfile::TempDir;

pub const ADMIN: &str = "<?php
// APPLICATION
define('APPLICATION', 'Admin');

// HTTP
define('HTTP_SERVER', 'https://shop.example/admin/');
define('HTTP_CATALOG', 'https://shop.example/');

// DIR
define('DIR_APPLICATION', '/var/www/admin/');
";

pub const PUBLIC: &str = "<?php
// APPLICATION
define('APPLICATION', 'Catalog');

// HTTP
define('HTTP_SERVER', 'https://shop.example/');

// DIR
define('DIR_APPLICATION', '/var/www/catalog/');
";

#[allow(dead_code)]
pub struct Shop {
    root: TempDir,
}

#[allow(dead_code)]
impl Shop {
    pub fn new() -> Self {
        let root = TempDir::new().expect("temp dir");
        fs::create_dir_all(root.path().join("www/admin")).unwrap();
        fs::write(root.path().join("www/admin/config.php"), ADMIN).unwrap();
        fs::write(root.path().join("www/config.php"), PUBLIC).unwrap();
        fs::write(
            root.path().join("config.toml"),
            "admin_config = \"www/admin/config.php\"\n\
             public_config = \"www/config.php\"\n\
             database = \"data/hosts.sqlite\"\n\
             settings = \"data/settings.json\"\n",
        )
        .unwrap();
        Shop { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn admin_path(&self) -> PathBuf {
        self.root().join("www/admin/config.php")
    }

    pub fn public_path(&self) -> PathBuf {
        self.root().join("www/config.php")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.toml")
    }

    pub fn admin(&self) -> String {
        fs::read_to_string(self.admin_path()).unwrap()
    }

    pub fn public(&self) -> String {
        fs::read_to_string(self.public_path()).unwrap()
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::load(Some(&self.config_path())).unwrap()
    }

    /// The binary, pointed at this shop's config.toml.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("hostmgmt").expect("hostmgmt binary");
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}
