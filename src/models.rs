use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URL scheme a host is reachable under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// The other scheme (used by the TUI toggle).
    pub fn toggled(&self) -> Protocol {
        match self {
            Protocol::Http => Protocol::Https,
            Protocol::Https => Protocol::Http,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(format!("unknown protocol '{other}'")),
        }
    }
}

/// A registered (protocol, hostname) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    pub protocol: Protocol,
    /// FQDN, e.g. `shop.example.com`
    pub hostname: String,
    /// Used when the requested URL is not one of the registered ones
    #[serde(default)]
    pub default: bool,
}

impl Host {
    pub fn new(protocol: Protocol, hostname: impl Into<String>, default: bool) -> Self {
        Host { protocol, hostname: hostname.into(), default }
    }

    /// Base URL with trailing slash, e.g. `https://shop.example.com/`.
    pub fn url(&self) -> String {
        format!("{}://{}/", self.protocol, self.hostname)
    }
}

/// A host row as stored in the database.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HostRecord {
    pub id: i64,
    #[serde(flatten)]
    pub host: Host,
}

/// Untyped host as posted by the operator. Missing `default` means false;
/// form-style values such as `"1"` are read by truthiness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HostInput {
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, deserialize_with = "crate::config::io::truthy")]
    pub default: bool,
}

impl From<&Host> for HostInput {
    fn from(h: &Host) -> Self {
        HostInput {
            protocol: Some(h.protocol.to_string()),
            hostname: Some(h.hostname.clone()),
            default: h.default,
        }
    }
}

/// Admin and public directories relative to the host document root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Dirs {
    /// e.g. `admin/`
    pub admin: String,
    /// e.g. `shop/`, or empty when the storefront sits in the document root
    pub public: String,
}

/// One `define('HTTP_…', 'proto://host/dir')` read from a bootstrap file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Endpoint {
    pub protocol: String,
    pub hostname: String,
    pub dir: String,
}

/// Base URLs read from the admin bootstrap file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigData {
    pub server: Endpoint,
    pub catalog: Endpoint,
}

impl ConfigData {
    pub fn dirs(&self) -> Dirs {
        Dirs { admin: self.server.dir.clone(), public: self.catalog.dir.clone() }
    }
}

/// Picks the single default host; `None` when there is none or more than one.
pub fn single_default(hosts: &[Host]) -> Option<&Host> {
    let mut defaults = hosts.iter().filter(|h| h.default);
    match (defaults.next(), defaults.next()) {
        (Some(h), None) => Some(h),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_has_trailing_slash() {
        let h = Host::new(Protocol::Https, "shop.example.com", true);
        assert_eq!(h.url(), "https://shop.example.com/");
    }

    #[test]
    fn protocol_parses_lowercase_only() {
        assert_eq!("http".parse::<Protocol>(), Ok(Protocol::Http));
        assert_eq!("https".parse::<Protocol>(), Ok(Protocol::Https));
        assert!("HTTPS".parse::<Protocol>().is_err());
        assert!("ftp".parse::<Protocol>().is_err());
    }

    #[test]
    fn host_input_default_is_optional() {
        let input: HostInput =
            serde_json::from_str(r#"{"protocol":"http","hostname":"a.com"}"#).unwrap();
        assert!(!input.default);
        assert_eq!(input.hostname.as_deref(), Some("a.com"));
    }

    #[test]
    fn host_input_default_accepts_form_values() {
        let read = |body: &str| serde_json::from_str::<HostInput>(body).unwrap().default;
        assert!(read(r#"{"default":"1"}"#));
        assert!(read(r#"{"default":1}"#));
        assert!(read(r#"{"default":true}"#));
        assert!(!read(r#"{"default":"0"}"#));
        assert!(!read(r#"{"default":""}"#));
    }

    #[test]
    fn single_default_rejects_ambiguity() {
        let a = Host::new(Protocol::Http, "a.com", true);
        let b = Host::new(Protocol::Http, "b.com", false);
        assert_eq!(single_default(&[a.clone(), b.clone()]), Some(&a));
        assert_eq!(single_default(&[b.clone()]), None);
        let mut c = b.clone();
        c.default = true;
        assert_eq!(single_default(&[a, c]), None);
    }
}
