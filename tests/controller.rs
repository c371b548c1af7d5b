mod common;

use std::fs;

use common::{Shop, ADMIN, PUBLIC};
use hostmgmt::bootstrap::BLOCK_START;
use hostmgmt::config::{AppConfig, Permissions};
use hostmgmt::models::HostInput;
use hostmgmt::{HostManagement, SaveRequest};

fn host(protocol: &str, hostname: &str, default: bool) -> HostInput {
    HostInput { protocol: Some(protocol.into()), hostname: Some(hostname.into()), default }
}

fn two_hosts(status: bool) -> SaveRequest {
    SaveRequest {
        hosts: vec![host("https", "shop.example", true), host("http", "www.shop.example", false)],
        status,
    }
}

fn installed(shop: &Shop) -> HostManagement {
    let mut controller = HostManagement::new(&shop.config()).unwrap();
    let response = controller.install();
    assert!(!response.has_errors(), "{response:?}");
    controller
}

#[test]
fn install_reads_default_host_and_dirs() {
    let shop = Shop::new();
    let mut controller = installed(&shop);

    let page = controller.index();
    assert_eq!(page.hosts.len(), 1);
    assert_eq!(page.hosts[0].host.url(), "https://shop.example/");
    assert!(page.hosts[0].host.default);
    assert_eq!(page.admin_dir, "admin/");
    assert_eq!(page.public_dir, "");
    assert!(!page.status);
    assert!(page.read_error.is_none());

    // a second install updates the default host instead of adding one
    controller.install();
    assert_eq!(controller.index().hosts.len(), 1);
}

#[test]
fn enable_update_disable_round_trip() {
    let shop = Shop::new();
    let mut controller = installed(&shop);

    let response = controller.save(&two_hosts(true));
    assert!(!response.has_errors(), "{response:?}");
    assert_eq!(response.success.as_deref(), Some("Hosts have been updated! Config files have been updated!"));
    assert!(shop.admin().contains(BLOCK_START));
    assert!(shop.public().contains("'http://www.shop.example/'"));
    assert!(controller.index().status);

    let mut request = two_hosts(true);
    request.hosts.push(host("https", "shop.example.org", false));
    let response = controller.save(&request);
    assert!(!response.has_errors(), "{response:?}");
    assert!(shop.admin().contains("'https://shop.example.org/'"));
    assert!(shop.public().contains("'https://shop.example.org/'"));

    let response = controller.save(&two_hosts(false));
    assert!(!response.has_errors(), "{response:?}");
    assert_eq!(shop.admin(), ADMIN);
    assert_eq!(shop.public(), PUBLIC);
    assert!(!controller.index().status);
}

#[test]
fn saving_without_status_change_leaves_files_alone() {
    let shop = Shop::new();
    let mut controller = installed(&shop);

    let response = controller.save(&two_hosts(false));
    assert_eq!(response.success.as_deref(), Some("Hosts have been updated!"));
    assert_eq!(shop.admin(), ADMIN);
    assert_eq!(controller.index().hosts.len(), 2);
}

#[test]
fn default_count_is_enforced() {
    let shop = Shop::new();
    let mut controller = installed(&shop);

    let mut request = two_hosts(true);
    request.hosts[1].default = true;
    let response = controller.save(&request);
    assert_eq!(response.error.get("warning"), Some("Warning: You must have one default host!"));
    assert!(response.success.is_none());

    request.hosts.iter_mut().for_each(|h| h.default = false);
    assert!(controller.save(&request).error.contains_key("warning"));

    // nothing was stored
    assert_eq!(controller.index().hosts.len(), 1);
    assert_eq!(shop.admin(), ADMIN);
}

#[test]
fn field_errors_are_keyed_by_row() {
    let shop = Shop::new();
    let mut controller = installed(&shop);

    let request = SaveRequest {
        hosts: vec![
            host("https", "shop.example", true),
            host("ftp", "-bad.com", false),
            HostInput { protocol: Some("http".into()), hostname: Some("UPPER.com".into()), default: false },
        ],
        status: false,
    };
    let response = controller.save(&request);
    assert!(response.error.contains_key("protocol_1"));
    assert!(response.error.contains_key("hostname_1"));
    assert!(response.error.contains_key("hostname_2"));
    assert!(!response.error.contains_key("protocol_2"));
    assert!(!response.error.contains_key("hostname_0"));
    assert_eq!(response.error.get("warning"), Some("Warning: Please check the form carefully for errors!"));
}

#[test]
fn unwritable_file_keeps_status_off() {
    let shop = Shop::new();
    let mut controller = installed(&shop);
    fs::remove_file(shop.public_path()).unwrap();

    let response = controller.save(&two_hosts(true));
    let warning = response.error.get("warning").unwrap();
    assert!(warning.starts_with("Warning: Could not get write access for:"), "{warning}");
    assert!(warning.contains("config.php"));
    assert_eq!(response.error.get("status"), Some("Status was not changed!"));
    assert_eq!(response.success.as_deref(), Some("Hosts have been updated!"));

    // the admin file was only checked, never written
    assert_eq!(shop.admin(), ADMIN);
    assert!(!controller.index().status);
}

#[test]
fn save_requires_security_permission() {
    let shop = Shop::new();
    installed(&shop);
    let config = AppConfig { permissions: Permissions::none(), ..shop.config() };
    let mut controller = HostManagement::new(&config).unwrap();

    let response = controller.save(&two_hosts(true));
    assert_eq!(
        response.error.get("warning"),
        Some("Warning: You do not have permission to modify security settings!")
    );
    assert_eq!(shop.admin(), ADMIN);

    let response = controller.install();
    assert!(response.error.get("warning").unwrap().contains("other extensions"));
}

#[test]
fn uninstall_restores_enabled_files() {
    let shop = Shop::new();
    let mut controller = installed(&shop);
    assert!(!controller.save(&two_hosts(true)).has_errors());

    let response = controller.uninstall();
    assert!(!response.has_errors(), "{response:?}");
    assert_eq!(shop.admin(), ADMIN);
    assert_eq!(shop.public(), PUBLIC);

    let settings = fs::read_to_string(shop.root().join("data/settings.json")).unwrap();
    assert!(!settings.contains("other_host_management"));
}

#[test]
fn broken_admin_file_is_reported_on_index() {
    let shop = Shop::new();
    fs::write(shop.admin_path(), "<?php\ndefine('APPLICATION', 'Admin');\n").unwrap();
    let mut controller = HostManagement::new(&shop.config()).unwrap();

    let response = controller.install();
    assert!(response.error.get("warning").unwrap().contains("Reading admin config failed"));

    let page = controller.index();
    assert!(page.hosts.is_empty());
    assert_eq!(page.admin_dir, "");
    assert_eq!(
        page.read_error.as_deref(),
        Some("Error: Reading admin config failed. Could not match protocol, hostname and directory.")
    );
}

#[test]
fn mismatched_server_and_catalog_are_rejected() {
    let shop = Shop::new();
    fs::write(shop.admin_path(), ADMIN.replace("'https://shop.example/');", "'https://other.example/');")).unwrap();
    let mut controller = HostManagement::new(&shop.config()).unwrap();

    let response = controller.install();
    assert!(response
        .error
        .get("warning")
        .unwrap()
        .starts_with("Server and catalog must have same protocol and hostname."));
}
