//! Row-level host edits: each one rebuilds the posted form and saves it.
use inquire::{Confirm, Select, Text};

use crate::controller::SaveRequest;
use crate::error::{Error, Result};
use crate::models::{HostInput, Protocol};
use crate::validation::is_valid_hostname;

fn label(input: &HostInput) -> String {
    let mark = if input.default { " (default)" } else { "" };
    format!(
        "{}://{}/{mark}",
        input.protocol.as_deref().unwrap_or("?"),
        input.hostname.as_deref().unwrap_or("?")
    )
}

/// Index of the row whose hostname or base URL equals `needle`.
pub fn find_host(hosts: &[HostInput], needle: &str) -> Option<usize> {
    hosts.iter().position(|h| {
        h.hostname.as_deref() == Some(needle)
            || format!("{}://{}/", h.protocol.as_deref().unwrap_or(""), h.hostname.as_deref().unwrap_or(""))
                == needle
    })
}

/// Appends a row; a new default takes the flag from every other row.
pub fn add_host(request: &mut SaveRequest, input: HostInput) {
    if input.default {
        request.hosts.iter_mut().for_each(|h| h.default = false);
    }
    request.hosts.push(input);
}

pub fn remove_host(request: &mut SaveRequest, index: usize) -> Option<HostInput> {
    (index < request.hosts.len()).then(|| request.hosts.remove(index))
}

pub fn set_default(request: &mut SaveRequest, index: usize) {
    for (i, h) in request.hosts.iter_mut().enumerate() {
        h.default = i == index;
    }
}

fn pick(request: &SaveRequest, prompt: &str, needle: Option<&str>) -> Result<usize> {
    if let Some(needle) = needle {
        return find_host(&request.hosts, needle).ok_or_else(|| Error::UnknownHost(needle.to_string()));
    }
    let labels: Vec<String> = request.hosts.iter().map(label).collect();
    if labels.is_empty() {
        return Err(Error::UnknownHost(String::new()));
    }
    let choice = Select::new(prompt, labels.clone()).prompt()?;
    labels.iter().position(|l| *l == choice).ok_or(Error::UnknownHost(choice))
}

/// Builds the new row from the arguments, prompting for what is missing.
pub fn prompt_new_host(protocol: Option<Protocol>, hostname: Option<String>, default: bool) -> Result<HostInput> {
    let protocol = match protocol {
        Some(p) => p,
        None => Select::new("Protocol:", vec![Protocol::Https, Protocol::Http]).prompt()?,
    };
    let hostname = match hostname {
        Some(h) => h,
        None => Text::new("Hostname (FQDN):")
            .with_help_message("lowercase, e.g. shop.example.com")
            .prompt()?
            .trim()
            .to_string(),
    };
    if !is_valid_hostname(&hostname) {
        eprintln!("'{hostname}' does not look like a valid hostname; saving will report it.");
    }
    Ok(HostInput { protocol: Some(protocol.to_string()), hostname: Some(hostname), default })
}

pub fn add(request: &mut SaveRequest, protocol: Option<Protocol>, hostname: Option<String>, default: bool) -> Result<()> {
    let input = prompt_new_host(protocol, hostname, default)?;
    add_host(request, input);
    Ok(())
}

pub fn remove(request: &mut SaveRequest, needle: Option<&str>, yes: bool) -> Result<()> {
    let index = pick(request, "Choose host to remove:", needle)?;
    if !yes {
        let confirmed = Confirm::new(&format!("Remove {}?", label(&request.hosts[index])))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            return Ok(());
        }
    }
    remove_host(request, index);
    Ok(())
}

pub fn make_default(request: &mut SaveRequest, needle: Option<&str>) -> Result<()> {
    let index = pick(request, "Choose default host:", needle)?;
    set_default(request, index);
    Ok(())
}
