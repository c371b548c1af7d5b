//! Bootstrap (`config.php`) file editor.
//!
//! Moves a file between its raw state (literal `HTTP_SERVER` / `HTTP_CATALOG`
//! definitions) and its active state (the generated block choosing the base
//! URL per request). Files are read whole, patched in memory and overwritten
//! only when every pattern matched.
pub mod codegen;
pub mod patch;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, error};
use thiserror::Error;

use crate::models::{ConfigData, Dirs, Host};

pub use codegen::{BLOCK_END, BLOCK_START};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("could not get read access for {path}: {source}")]
    ReadAccess { path: String, #[source] source: io::Error },

    #[error("could not get write access for {path}: {source}")]
    WriteAccess { path: String, #[source] source: io::Error },

    #[error("could not read {path}: {source}")]
    FileAccess { path: String, #[source] source: io::Error },

    #[error("HTTP_SERVER or HTTP_CATALOG definition not found")]
    Read,

    #[error("raw HTTP_SERVER definition not found exactly once")]
    HttpServer,

    #[error("raw HTTP_CATALOG definition not found exactly once")]
    HttpCatalog,

    #[error("block locator (// HTTP or <?php) not found exactly once")]
    PhpTag,

    #[error("$hm_default / $hm_urls not found exactly once")]
    UpdateUrls,

    #[error("marked block not found exactly once")]
    Restore,

    #[error("no default host")]
    DefaultHost,
}

impl EditorError {
    /// Language key shown to the operator.
    pub fn key(&self) -> &'static str {
        match self {
            EditorError::ReadAccess { .. } => "error_read_access",
            EditorError::WriteAccess { .. } => "error_write_access",
            EditorError::FileAccess { .. } => "error_file_access",
            EditorError::Read => "error_read",
            EditorError::HttpServer => "error_http_server",
            EditorError::HttpCatalog => "error_http_catalog",
            EditorError::PhpTag => "error_php_tag",
            EditorError::UpdateUrls => "error_update_urls",
            EditorError::Restore => "error_restore",
            EditorError::DefaultHost => "error_default_host",
        }
    }

    /// File path for messages with a `%s` slot.
    pub fn path(&self) -> Option<&str> {
        match self {
            EditorError::ReadAccess { path, .. }
            | EditorError::WriteAccess { path, .. }
            | EditorError::FileAccess { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    ReadWrite,
}

fn open(path: &Path, mode: Mode) -> Result<File, EditorError> {
    let result = match mode {
        Mode::Read => File::open(path),
        Mode::ReadWrite => OpenOptions::new().read(true).write(true).open(path),
    };
    result.map_err(|source| {
        let path = path.display().to_string();
        let err = match mode {
            Mode::Read => EditorError::ReadAccess { path, source },
            Mode::ReadWrite => EditorError::WriteAccess { path, source },
        };
        error!("{err}");
        err
    })
}

fn read_all(file: &mut File, path: &Path) -> Result<String, EditorError> {
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|source| {
        let err = EditorError::FileAccess { path: path.display().to_string(), source };
        error!("{err}");
        err
    })?;
    Ok(content)
}

fn overwrite(file: &mut File, path: &Path, content: &str) -> Result<(), EditorError> {
    let write = |file: &mut File| -> io::Result<()> {
        file.seek(SeekFrom::Start(0))?;
        file.set_len(0)?;
        file.write_all(content.as_bytes())?;
        file.flush()
    };
    write(file).map_err(|source| {
        let err = EditorError::WriteAccess { path: path.display().to_string(), source };
        error!("{err}");
        err
    })
}

/// Opens `path` read-write, feeds its contents to `transform` and writes the
/// result back. Nothing is written when `transform` fails.
fn rewrite<F>(path: &Path, transform: F) -> Result<(), EditorError>
where
    F: FnOnce(&str) -> Result<String, EditorError>,
{
    let mut file = open(path, Mode::ReadWrite)?;
    let content = read_all(&mut file, path)?;
    let patched = transform(&content)?;
    overwrite(&mut file, path, &patched)?;
    debug!("rewrote {}", path.display());
    Ok(())
}

/// Runs a dry-run check on a file opened read-write.
fn check<F>(path: &Path, f: F) -> Result<(), EditorError>
where
    F: FnOnce(&str) -> Result<(), EditorError>,
{
    let mut file = open(path, Mode::ReadWrite)?;
    let content = read_all(&mut file, path)?;
    f(&content)
}

/// Reads base URLs from the raw definitions of an admin bootstrap file.
pub fn read_config(path: &Path) -> Result<ConfigData, EditorError> {
    let mut file = open(path, Mode::Read)?;
    let content = read_all(&mut file, path)?;
    patch::parse_config(&content)
}

pub fn can_edit(path: &Path) -> Result<(), EditorError> {
    check(path, patch::check_edit)
}

/// Replaces the raw definitions with the generated block.
pub fn edit(path: &Path, hosts: &[Host], dirs: &Dirs) -> Result<(), EditorError> {
    rewrite(path, |content| patch::apply_edit(content, hosts, dirs))
}

pub fn can_update(path: &Path) -> Result<(), EditorError> {
    check(path, patch::check_update)
}

/// Rewrites the default URL and URL list of an active file.
pub fn update(path: &Path, hosts: &[Host]) -> Result<(), EditorError> {
    rewrite(path, |content| patch::apply_update(content, hosts))
}

pub fn can_restore(path: &Path) -> Result<(), EditorError> {
    check(path, patch::check_restore)
}

/// Removes the generated block and puts back literal definitions for `host`.
pub fn restore(path: &Path, host: &Host, dirs: &Dirs) -> Result<(), EditorError> {
    rewrite(path, |content| patch::apply_restore(content, host, dirs))
}
