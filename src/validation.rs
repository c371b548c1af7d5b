//! Stateless input checks for hosts and directories.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ConfigData;

static HOSTNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9\-.]{0,253}[a-z0-9]$").unwrap());
static DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[a-zA-Z0-9_-]+/)+$").unwrap());

pub fn is_valid_hostname(hostname: &str) -> bool {
    HOSTNAME_RE.is_match(hostname)
}

pub fn is_valid_protocol(protocol: &str) -> bool {
    matches!(protocol, "http" | "https")
}

/// `admin/` or `nested/admin/`: one or more segments, each followed by `/`.
pub fn is_valid_admin_dir(dir: &str) -> bool {
    dir.len() < 256 && DIR_RE.is_match(dir)
}

/// Empty (document root) or an admin-style directory.
pub fn is_valid_public_dir(dir: &str) -> bool {
    dir.is_empty() || is_valid_admin_dir(dir)
}

/// Server and catalog point to the same protocol and hostname.
pub fn has_same_hosts(config: &ConfigData) -> bool {
    config.server.protocol == config.catalog.protocol
        && config.server.hostname == config.catalog.hostname
}

pub fn is_valid_config_read(config: &ConfigData) -> bool {
    is_valid_protocol(&config.server.protocol)
        && is_valid_hostname(&config.server.hostname)
        && is_valid_admin_dir(&config.server.dir)
        && is_valid_protocol(&config.catalog.protocol)
        && is_valid_hostname(&config.catalog.hostname)
        && is_valid_public_dir(&config.catalog.dir)
        && has_same_hosts(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Endpoint;

    #[test]
    fn hostnames() {
        for ok in ["shop.example.com", "localhost", "a1", "x-y.z", "127.0.0.1"] {
            assert!(is_valid_hostname(ok), "{ok} should be valid");
        }
        for bad in ["-bad.com", "UPPER.com", "bad-.com.", "a", "", "shop_example.com", "a b.com"] {
            assert!(!is_valid_hostname(bad), "{bad} should be rejected");
        }
        assert!(is_valid_hostname(&"a".repeat(255)));
        assert!(!is_valid_hostname(&"a".repeat(256)));
    }

    #[test]
    fn protocols() {
        assert!(is_valid_protocol("http"));
        assert!(is_valid_protocol("https"));
        assert!(!is_valid_protocol("HTTP"));
        assert!(!is_valid_protocol("ftp"));
        assert!(!is_valid_protocol(""));
    }

    #[test]
    fn directories() {
        assert!(is_valid_admin_dir("admin/"));
        assert!(is_valid_admin_dir("shop/admin_2-x/"));
        assert!(!is_valid_admin_dir("admin"));
        assert!(!is_valid_admin_dir("/admin/"));
        assert!(!is_valid_admin_dir(""));
        assert!(!is_valid_admin_dir("ad min/"));
        let long = format!("{}/", "a".repeat(255));
        assert!(!is_valid_admin_dir(&long));

        assert!(is_valid_public_dir(""));
        assert!(is_valid_public_dir("shop/"));
        assert!(!is_valid_public_dir("shop"));
    }

    #[test]
    fn config_read_requires_same_host() {
        let endpoint = |host: &str, dir: &str| Endpoint {
            protocol: "https".into(),
            hostname: host.into(),
            dir: dir.into(),
        };
        let mut config = ConfigData {
            server: endpoint("shop.example.com", "admin/"),
            catalog: endpoint("shop.example.com", ""),
        };
        assert!(has_same_hosts(&config));
        assert!(is_valid_config_read(&config));

        config.catalog.hostname = "other.example.com".into();
        assert!(!has_same_hosts(&config));
        assert!(!is_valid_config_read(&config));
    }
}
