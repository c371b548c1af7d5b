use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::error::Result;

const EN_GB: &str = include_str!("../../lang/en-gb.toml");

/// Keyed translation catalog. Unknown keys translate to themselves.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    strings: HashMap<String, String>,
}

/// Flat `key = "text"` table; a broken catalog leaves every key untranslated.
fn parse_catalog(content: &str) -> HashMap<String, String> {
    toml::from_str(content).unwrap_or_else(|e| {
        warn!("built-in language catalog is invalid ({e}); keys will not be translated");
        HashMap::new()
    })
}

impl Language {
    /// Built-in English catalog.
    pub fn en_gb() -> Self {
        let strings = parse_catalog(EN_GB);
        Language { code: "en-gb".to_string(), strings }
    }

    /// Loads `code`, overlaying `file` (a flat `key = "text"` TOML table) on the
    /// built-in catalog when given.
    pub fn load(code: &str, file: Option<&Path>) -> Result<Self> {
        let mut lang = Language::en_gb();
        if code != lang.code && file.is_none() {
            warn!("no catalog for language '{code}', using en-gb");
        }
        if let Some(path) = file {
            let content = fs::read_to_string(path)?;
            let extra: HashMap<String, String> = toml::from_str(&content)?;
            lang.strings.extend(extra);
            lang.code = code.to_string();
        }
        Ok(lang)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Translates `key` and fills each `%s` with the next replacement.
    pub fn format(&self, key: &str, replacements: &[&str]) -> String {
        let template = self.get(key);
        if replacements.is_empty() {
            return template.to_string();
        }
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        let mut values = replacements.iter();
        while let Some(pos) = rest.find("%s") {
            out.push_str(&rest[..pos]);
            out.push_str(values.next().copied().unwrap_or(""));
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::en_gb()
    }
}
