//! Keyed operator messages (errors per form field, success banners).
pub mod language;

use std::rc::Rc;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use language::Language;

use crate::util::lcfirst;

/// Default error key for banner warnings.
pub const WARNING: &str = "warning";

/// Insertion-ordered `key -> text` error map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(Vec<(String, String)>);

impl ErrorMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends `text` to an existing entry (space separated) or adds a new one.
    fn push(&mut self, key: &str, text: &str) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(text);
            }
            None => self.0.push((key.to_string(), text.to_string())),
        }
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Body of every `save` response: `{"error": {...}, "success": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "ErrorMap::is_empty")]
    pub error: ErrorMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}

impl Response {
    pub fn has_errors(&self) -> bool {
        !self.error.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MessageBag {
    language: Rc<Language>,
    errors: ErrorMap,
    success: Vec<String>,
}

impl MessageBag {
    pub fn new(language: Rc<Language>) -> Self {
        MessageBag { language, errors: ErrorMap::default(), success: Vec::new() }
    }

    /// Translates `message`; replacements are translated too and lowercased
    /// on their first letter before filling the `%s` slots.
    fn prepare(&self, message: &str, replacements: &[&str]) -> String {
        if replacements.is_empty() {
            return self.language.get(message).to_string();
        }
        let terms: Vec<String> =
            replacements.iter().map(|t| lcfirst(self.language.get(t))).collect();
        let terms: Vec<&str> = terms.iter().map(String::as_str).collect();
        self.language.format(message, &terms)
    }

    pub fn error(&mut self, message: &str, key: &str, replacements: &[&str]) {
        let text = self.prepare(message, replacements);
        self.errors.push(key, &text);
    }

    /// Shorthand for a banner warning without replacements.
    pub fn warning(&mut self, message: &str) {
        self.error(message, WARNING, &[]);
    }

    pub fn success(&mut self, message: &str, replacements: &[&str]) {
        let text = self.prepare(message, replacements);
        self.success.push(text);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.0.first().map(|(_, v)| v.as_str())
    }

    pub fn get(&self) -> Response {
        Response {
            error: self.errors.clone(),
            success: (!self.success.is_empty()).then(|| self.success.join(" ")),
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }
}
