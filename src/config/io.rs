//! Platform settings store: `{ "<code>": { "<key>": value } }` in one JSON file.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::path::ensure_json_file;
use crate::error::Result;

pub type Group = BTreeMap<String, Value>;

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    groups: BTreeMap<String, Group>,
}

/// PHP-style truthiness of a stored value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Deserializes any JSON value by its truthiness, so `"1"`, `1` and `true` all
/// read as true.
pub fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

impl SettingsStore {
    /// Loads the store, creating an empty file when missing. Invalid JSON is
    /// backed up next to the file and replaced by an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        ensure_json_file(path)?;
        let content = fs::read_to_string(path)?;
        let groups = match serde_json::from_str::<BTreeMap<String, Group>>(&content) {
            Ok(groups) => groups,
            Err(e) => {
                let bak = path.with_extension("json.bak");
                fs::write(&bak, &content)?;
                warn!("settings at {} were invalid ({e}); backed up to {}", path.display(), bak.display());
                BTreeMap::new()
            }
        };
        debug!("loaded settings from {}", path.display());
        Ok(SettingsStore { path: path.to_path_buf(), groups })
    }

    /// Looks a key up across all groups.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.groups.values().find_map(|g| g.get(key))
    }

    /// String value, empty when missing or not a string.
    pub fn get_str(&self, key: &str) -> String {
        self.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(is_truthy).unwrap_or(false)
    }

    pub fn group(&self, code: &str) -> Option<&Group> {
        self.groups.get(code)
    }

    /// Replaces every setting of `code` with `values` and saves.
    pub fn edit_setting(&mut self, code: &str, values: Group) -> Result<()> {
        self.groups.insert(code.to_string(), values);
        self.save()
    }

    pub fn delete_setting(&mut self, code: &str) -> Result<()> {
        if self.groups.remove(code).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Write to a temp file, then rename over the store.
    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.groups)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
