use prettytable::{row, Table};

use crate::controller::IndexPage;
use crate::messages::Language;

/// Host table of the settings page.
pub fn hosts_table(page: &IndexPage, lang: &Language) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", lang.get("entry_host_protocol"), lang.get("entry_hostname"), lang.get("entry_default")]);
    for (i, record) in page.hosts.iter().enumerate() {
        let default = if record.host.default { "*" } else { "" };
        table.add_row(row![i, record.host.protocol, record.host.hostname, default]);
    }
    table
}

/// Directories and status of the settings page.
pub fn summary_table(page: &IndexPage, lang: &Language) -> Table {
    let public = if page.public_dir.is_empty() { lang.get("text_dir_root") } else { page.public_dir.as_str() };
    let status = if page.status { lang.get("text_enabled") } else { lang.get("text_disabled") };

    let mut table = Table::new();
    table.add_row(row![lang.get("text_dir_admin"), page.admin_dir]);
    table.add_row(row![lang.get("text_dir_public"), public]);
    table.add_row(row![lang.get("text_status_title"), status]);
    table
}

pub fn print_page(page: &IndexPage, lang: &Language) {
    println!("{}", lang.get("heading_title"));
    if let Some(err) = &page.read_error {
        println!("{}{err}", lang.get("msg_error_prefix"));
        println!("{}", lang.get("error_notice"));
    }
    summary_table(page, lang).printstd();
    if page.hosts.is_empty() {
        println!("No hosts stored.");
        return;
    }
    hosts_table(page, lang).printstd();
}
