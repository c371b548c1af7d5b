//! Host management orchestration: install, uninstall, settings page and save.
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bootstrap::{self, EditorError};
use crate::config::io::{truthy, Group};
use crate::config::{AppConfig, Permissions, SettingsStore};
use crate::error::{Error, Result};
use crate::messages::{Language, MessageBag, Response, WARNING};
use crate::models::{single_default, ConfigData, Dirs, Endpoint, Host, HostInput, HostRecord, Protocol};
use crate::repository::HostRepository;
use crate::validation;

/// Settings group code.
pub const CODE: &str = "other_host_management";
pub const ADMIN_DIR: &str = "other_host_management_admin_dir";
pub const PUBLIC_DIR: &str = "other_host_management_public_dir";
pub const STATUS: &str = "other_host_management_status";

/// Posted settings form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveRequest {
    #[serde(default)]
    pub hosts: Vec<HostInput>,
    /// Requested extension status; `"1"`, `1` and `true` all mean on.
    #[serde(rename = "other_host_management_status", default, deserialize_with = "truthy")]
    pub status: bool,
}

/// Data behind the settings page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexPage {
    pub hosts: Vec<HostRecord>,
    pub admin_dir: String,
    pub public_dir: String,
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,
}

pub struct HostManagement {
    admin_path: PathBuf,
    public_path: PathBuf,
    permissions: Permissions,
    repository: HostRepository,
    settings: SettingsStore,
    language: Rc<Language>,
    messages: MessageBag,
}

impl HostManagement {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let language = Rc::new(Language::load(&config.language, config.language_file.as_deref())?);
        debug!(
            "language {}, admin {}, public {}",
            language.code(),
            config.admin_config.display(),
            config.public_config.display()
        );
        Ok(HostManagement {
            admin_path: config.admin_config.clone(),
            public_path: config.public_config.clone(),
            permissions: config.permissions.clone(),
            repository: HostRepository::open(&config.database, &config.db_prefix)?,
            settings: SettingsStore::load(&config.settings)?,
            messages: MessageBag::new(Rc::clone(&language)),
            language,
        })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    fn reset(&mut self) {
        self.messages = MessageBag::new(Rc::clone(&self.language));
    }

    fn log_translated(&self, key: &str) {
        warn!("{}", self.language.get(key));
    }

    fn report(&mut self, err: &EditorError) {
        warn!("{err}");
        match err.path() {
            Some(path) => self.messages.error(err.key(), WARNING, &[path]),
            None => self.messages.warning(err.key()),
        }
    }

    fn report_database(&mut self, err: &Error) {
        error!("host table: {err}");
        self.messages.warning("error_database");
    }

    fn cached_dirs(&self) -> Dirs {
        Dirs { admin: self.settings.get_str(ADMIN_DIR), public: self.settings.get_str(PUBLIC_DIR) }
    }

    fn status(&self) -> bool {
        self.settings.get_bool(STATUS)
    }

    /// Replaces the settings group. The status key is only written when on.
    fn update_settings(&mut self, dirs: &Dirs, status: bool) -> bool {
        let mut values = Group::new();
        values.insert(ADMIN_DIR.to_string(), json!(dirs.admin));
        values.insert(PUBLIC_DIR.to_string(), json!(dirs.public));
        if status {
            values.insert(STATUS.to_string(), json!(true));
        }
        match self.settings.edit_setting(CODE, values) {
            Ok(()) => true,
            Err(e) => {
                error!("settings: {e}");
                self.messages.warning("error_settings");
                false
            }
        }
    }

    /// Names the first check a config read fails.
    fn report_config_read(&mut self, config: &ConfigData) {
        if !validation::has_same_hosts(config) {
            self.messages.warning("error_same");
        } else if !validation::is_valid_protocol(&config.server.protocol) {
            self.messages.warning("error_protocol");
        } else if !validation::is_valid_hostname(&config.server.hostname) {
            self.messages.warning("error_hostname");
        } else if !validation::is_valid_admin_dir(&config.server.dir) {
            self.messages.error("error_dir", WARNING, &["text_admin"]);
        } else {
            self.messages.error("error_dir", WARNING, &["text_public"]);
        }
    }

    fn store_default(&mut self, server: &Endpoint) -> Result<()> {
        if self.repository.get_default()?.is_some() {
            return self.repository.update_default(server);
        }
        let protocol: Protocol = server.protocol.parse().map_err(Error::InvalidRow)?;
        self.repository.insert(&Host::new(protocol, server.hostname.as_str(), true))
    }

    /// Reads the admin bootstrap file, caches its directories and stores its
    /// host as the default one.
    fn save_config_file_data(&mut self) -> Option<ConfigData> {
        let config = match bootstrap::read_config(&self.admin_path) {
            Ok(config) => config,
            Err(e) => {
                self.report(&e);
                return None;
            }
        };
        if !validation::is_valid_config_read(&config) {
            self.report_config_read(&config);
            return None;
        }
        if !self.update_settings(&config.dirs(), false) {
            return None;
        }
        if let Err(e) = self.store_default(&config.server) {
            self.report_database(&e);
            return None;
        }
        Some(config)
    }

    /// Per-field errors keyed `protocol_<i>` / `hostname_<i>`, then the
    /// default count. Returns the typed hosts when everything is valid.
    fn validate_hosts(&mut self, inputs: &[HostInput]) -> Option<Vec<Host>> {
        let mut hosts = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            let protocol = input
                .protocol
                .as_deref()
                .filter(|p| validation::is_valid_protocol(p))
                .and_then(|p| p.parse::<Protocol>().ok());
            if protocol.is_none() {
                self.messages.error("error_protocol", &format!("protocol_{i}"), &[]);
            }
            let hostname = input.hostname.as_deref().filter(|h| validation::is_valid_hostname(h));
            if hostname.is_none() {
                self.messages.error("error_hostname", &format!("hostname_{i}"), &[]);
            }
            if let (Some(protocol), Some(hostname)) = (protocol, hostname) {
                hosts.push(Host::new(protocol, hostname, input.default));
            }
        }

        if self.messages.has_errors() {
            self.messages.warning("error_warning");
            return None;
        }
        if hosts.iter().filter(|h| h.default).count() != 1 {
            self.messages.warning("error_default_count");
            return None;
        }
        Some(hosts)
    }

    fn replace_hosts(&mut self, hosts: &[Host]) -> Result<()> {
        self.repository.truncate()?;
        self.repository.insert_many(hosts)
    }

    fn enable(&mut self, hosts: &[Host], dirs: &Dirs) -> bool {
        let result = bootstrap::can_edit(&self.admin_path)
            .and_then(|_| bootstrap::can_edit(&self.public_path))
            .and_then(|_| bootstrap::edit(&self.admin_path, hosts, dirs))
            .and_then(|_| bootstrap::edit(&self.public_path, hosts, dirs));
        match result {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    fn update(&mut self, hosts: &[Host]) -> bool {
        let result = bootstrap::can_update(&self.admin_path)
            .and_then(|_| bootstrap::can_update(&self.public_path))
            .and_then(|_| bootstrap::update(&self.admin_path, hosts))
            .and_then(|_| bootstrap::update(&self.public_path, hosts));
        match result {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Restores both files with the default host.
    fn disable(&mut self, hosts: &[Host], dirs: &Dirs) -> bool {
        let Some(default) = single_default(hosts) else {
            self.messages.warning("error_default_host");
            return false;
        };
        let result = bootstrap::can_restore(&self.admin_path)
            .and_then(|_| bootstrap::can_restore(&self.public_path))
            .and_then(|_| bootstrap::restore(&self.admin_path, default, dirs))
            .and_then(|_| bootstrap::restore(&self.public_path, default, dirs));
        match result {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Creates the host table and seeds it from the admin bootstrap file.
    pub fn install(&mut self) -> Response {
        self.reset();
        if !self.permissions.has_permission("modify", "extension/other") {
            self.log_translated("error_perm_other");
            self.messages.warning("error_perm_other");
            return self.messages.get();
        }
        if let Err(e) = self.repository.install() {
            self.report_database(&e);
            return self.messages.get();
        }
        if self.save_config_file_data().is_none() {
            self.log_translated("error_install_data");
            self.messages.warning("error_install_data");
        } else {
            info!("installed into {}", self.repository.table());
            self.messages.success("text_success", &[]);
        }
        self.messages.get()
    }

    /// Restores the bootstrap files when enabled, then drops the table and
    /// the extension settings.
    pub fn uninstall(&mut self) -> Response {
        self.reset();
        if !self.permissions.has_permission("modify", "extension/other") {
            self.log_translated("error_perm_other");
            self.messages.warning("error_perm_other");
            return self.messages.get();
        }

        if self.status() {
            let dirs = self.cached_dirs();
            let checked = bootstrap::can_restore(&self.admin_path)
                .and_then(|_| bootstrap::can_restore(&self.public_path));
            match checked {
                Err(e) => self.report(&e),
                Ok(()) => match self.repository.get_default() {
                    Ok(Some(record)) => {
                        if let Err(e) = bootstrap::restore(&self.admin_path, &record.host, &dirs) {
                            self.report(&e);
                        }
                        if let Err(e) = bootstrap::restore(&self.public_path, &record.host, &dirs) {
                            self.report(&e);
                        }
                    }
                    Ok(None) => self.messages.warning("error_default_host"),
                    Err(e) => self.report_database(&e),
                },
            }
        }

        if let Err(e) = self.repository.uninstall() {
            self.report_database(&e);
        }
        if let Err(e) = self.settings.delete_setting(CODE) {
            error!("settings: {e}");
            self.messages.warning("error_settings");
        }
        if !self.messages.has_errors() {
            self.messages.success("text_success", &[]);
        }
        self.messages.get()
    }

    /// Settings page data. Re-reads the admin bootstrap file when the cached
    /// directories are invalid or no host is stored.
    pub fn index(&mut self) -> IndexPage {
        self.reset();
        let hosts = self.repository.all().unwrap_or_else(|e| {
            self.report_database(&e);
            Vec::new()
        });
        let dirs = self.cached_dirs();
        if validation::is_valid_admin_dir(&dirs.admin)
            && validation::is_valid_public_dir(&dirs.public)
            && !hosts.is_empty()
        {
            return IndexPage {
                hosts,
                admin_dir: dirs.admin,
                public_dir: dirs.public,
                status: self.status(),
                read_error: None,
            };
        }

        let config = self.save_config_file_data();
        let read_error = match config {
            Some(_) => None,
            None => self.messages.first_error().map(str::to_string),
        };
        let hosts = self.repository.all().unwrap_or_else(|e| {
            error!("host table: {e}");
            Vec::new()
        });
        let dirs = config.map(|c| c.dirs()).unwrap_or_default();
        IndexPage {
            hosts,
            admin_dir: dirs.admin,
            public_dir: dirs.public,
            status: self.status(),
            read_error,
        }
    }

    /// Validates and stores the posted hosts, then moves the bootstrap files
    /// to the requested status.
    pub fn save(&mut self, request: &SaveRequest) -> Response {
        self.reset();
        if !self.permissions.has_permission("modify", "common/security") {
            self.messages.warning("error_perm_security");
            if let Some(first) = self.messages.first_error() {
                warn!("{first}");
            }
            return self.messages.get();
        }

        let Some(hosts) = self.validate_hosts(&request.hosts) else {
            return self.messages.get();
        };
        if let Err(e) = self.replace_hosts(&hosts) {
            self.report_database(&e);
            return self.messages.get();
        }
        self.messages.success("text_success_hosts", &[]);

        let dirs = self.cached_dirs();
        let status = self.status();
        let requested = request.status;

        let result = match (status, requested) {
            (false, false) => return self.messages.get(),
            (false, true) => self.enable(&hosts, &dirs),
            (true, false) => !self.disable(&hosts, &dirs),
            (true, true) => {
                self.update(&hosts);
                status
            }
        };

        if result != status {
            self.update_settings(&dirs, result);
        }
        if result != requested {
            self.messages.error("error_status", "status", &[]);
        }
        if !self.messages.has_errors() {
            self.messages.success("text_success_files", &[]);
        }
        self.messages.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_accepts_form_style_status() {
        let req: SaveRequest = serde_json::from_str(
            r#"{"hosts":[{"protocol":"http","hostname":"a.example","default":true}],
                "other_host_management_status":"1"}"#,
        )
        .unwrap();
        assert!(req.status);
        assert_eq!(req.hosts.len(), 1);

        let req: SaveRequest = serde_json::from_str(r#"{"hosts":[{"hostname":"a.example"}]}"#).unwrap();
        assert!(!req.status);
        assert!(!req.hosts[0].default);
        assert_eq!(req.hosts[0].protocol, None);

        let req: SaveRequest =
            serde_json::from_str(r#"{"other_host_management_status":0}"#).unwrap();
        assert!(!req.status);
        assert!(req.hosts.is_empty());
    }
}
