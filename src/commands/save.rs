use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::controller::{IndexPage, SaveRequest};
use crate::error::Result;
use crate::models::HostInput;

/// Reads a save request body from a file, or stdin when `source` is `-`.
pub fn read_body(source: &str) -> Result<SaveRequest> {
    let content = if source == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(Path::new(source))?
    };
    Ok(serde_json::from_str(&content)?)
}

/// The request that would save the page unchanged.
pub fn request_from_page(page: &IndexPage) -> SaveRequest {
    SaveRequest {
        hosts: page.hosts.iter().map(|r| HostInput::from(&r.host)).collect(),
        status: page.status,
    }
}

/// `--enable` / `--disable` override the body's status.
pub fn apply_status_flags(request: &mut SaveRequest, enable: bool, disable: bool) {
    if enable {
        request.status = true;
    } else if disable {
        request.status = false;
    }
}
