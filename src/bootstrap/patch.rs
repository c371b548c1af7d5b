//! Pure text transforms over bootstrap file contents.
//!
//! Every pattern must match exactly once. Each function returns the new
//! contents or the error naming the pattern that failed; callers only write
//! when they get contents back.
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Match, Regex};

use crate::models::{ConfigData, Dirs, Endpoint, Host};

use super::codegen::{generate_code_block, generate_definitions, generate_urls, BLOCK_END, BLOCK_START};
use super::EditorError;

static SERVER_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        define\s*\(
        \s*["']HTTP_SERVER["']\s*,
        \s*["'](?P<protocol>http|https)://(?P<hostname>[\w\-.]+)/(?P<dir>[^'"]+)["']\s*
        \)"#,
    )
    .unwrap()
});
static CATALOG_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        define\s*\(
        \s*["']HTTP_CATALOG["']\s*,
        \s*["'](?P<protocol>http|https)://(?P<hostname>[\w\-.]+)/(?P<dir>[^'"]+)?["']\s*
        \)"#,
    )
    .unwrap()
});

static ADMIN_APP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?mR)^define\s*\(\s*["']APPLICATION["']\s*,\s*["']Admin["']\s*\);[ \t]*$"#)
        .unwrap()
});
// Whole raw definition lines, terminator included.
static SERVER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^define\s*\(\s*["']HTTP_SERVER["']\s*,\s*["'][^'"]+["']\s*\);[ \t]*\r?\n"#,
    )
    .unwrap()
});
static CATALOG_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^define\s*\(\s*["']HTTP_CATALOG["']\s*,\s*["'][^'"]+["']\s*\);[ \t]*\r?\n"#,
    )
    .unwrap()
});

static HTTP_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^//[ \t]*HTTP[ \t]*$").unwrap());
static PHP_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)^<\?(?:php)?[ \t]*$").unwrap());

static DEFAULT_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\$hm_default\s*=\s*["'][^'"]+["']"#).unwrap());
static ALL_URLS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\$hm_urls\s*=\s*\[[^\]]+\]"#).unwrap());

static HTTP_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| block_regex(r"//[ \t]*HTTP[ \t]*"));
static PHP_BLOCK_RE: Lazy<Regex> = Lazy::new(|| block_regex(r"<\?(?:php)?[ \t]*"));

/// Locator line, then the marked block through the end marker (terminator excluded).
fn block_regex(locator: &str) -> Regex {
    let pattern = format!(
        r"(?msR)^(?P<locator>{locator})\r?\n{}.*?{}[ \t]*$",
        marker_pattern(BLOCK_START),
        marker_pattern(BLOCK_END),
    );
    Regex::new(&pattern).unwrap()
}

/// Marker words with any whitespace between them.
fn marker_pattern(marker: &str) -> String {
    marker.split(' ').map(regex::escape).collect::<Vec<_>>().join(r"\s*")
}

/// Line terminator and file role detected from the contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub eol: &'static str,
    pub is_admin: bool,
}

impl Layout {
    pub fn detect(content: &str) -> Self {
        Layout {
            eol: if content.contains("\r\n") { "\r\n" } else { "\n" },
            is_admin: ADMIN_APP_RE.is_match(content),
        }
    }
}

fn find_once<'h>(re: &Regex, haystack: &'h str) -> Option<Match<'h>> {
    let mut found = re.find_iter(haystack);
    match (found.next(), found.next()) {
        (Some(m), None) => Some(m),
        _ => None,
    }
}

fn remove_range(content: &str, range: Range<usize>) -> String {
    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..range.start]);
    out.push_str(&content[range.end..]);
    out
}

fn splice(content: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(content.len() + replacement.len());
    out.push_str(&content[..range.start]);
    out.push_str(replacement);
    out.push_str(&content[range.end..]);
    out
}

/// Locator for the marked block: the `// HTTP` comment when present,
/// otherwise the opening php tag.
fn locator(content: &str) -> (&'static Regex, &'static Regex) {
    if HTTP_COMMENT_RE.is_match(content) {
        (&*HTTP_COMMENT_RE, &*HTTP_BLOCK_RE)
    } else {
        (&*PHP_TAG_RE, &*PHP_BLOCK_RE)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigData, EditorError> {
    let endpoint = |caps: regex::Captures| Endpoint {
        protocol: caps["protocol"].to_string(),
        hostname: caps["hostname"].to_string(),
        dir: caps.name("dir").map(|m| m.as_str().to_string()).unwrap_or_default(),
    };
    let server = SERVER_URL_RE.captures(content).ok_or(EditorError::Read)?;
    let catalog = CATALOG_URL_RE.captures(content).ok_or(EditorError::Read)?;
    Ok(ConfigData { server: endpoint(server), catalog: endpoint(catalog) })
}

/// Contents with the raw definitions removed, and the offset right after the
/// locator line text where the block goes.
fn prepare_edit(content: &str) -> Result<(String, usize, Layout), EditorError> {
    let layout = Layout::detect(content);

    let server = find_once(&SERVER_LINE_RE, content).ok_or(EditorError::HttpServer)?;
    let mut stripped = remove_range(content, server.range());

    if layout.is_admin {
        let catalog = find_once(&CATALOG_LINE_RE, &stripped).ok_or(EditorError::HttpCatalog)?;
        stripped = remove_range(&stripped, catalog.range());
    }

    let (locator_re, _) = locator(&stripped);
    let at = find_once(locator_re, &stripped).ok_or(EditorError::PhpTag)?.end();
    Ok((stripped, at, layout))
}

pub fn check_edit(content: &str) -> Result<(), EditorError> {
    prepare_edit(content).map(|_| ())
}

/// Replaces the raw definitions with the generated block.
pub fn apply_edit(content: &str, hosts: &[Host], dirs: &Dirs) -> Result<String, EditorError> {
    let (stripped, at, layout) = prepare_edit(content)?;
    let block = generate_code_block(hosts, dirs, layout.is_admin, layout.eol)?;
    let insert = format!("{}{}", layout.eol, block);
    Ok(splice(&stripped, at..at, &insert))
}

fn locate_urls(content: &str) -> Result<(Range<usize>, Range<usize>), EditorError> {
    let default = find_once(&DEFAULT_URL_RE, content).ok_or(EditorError::UpdateUrls)?;
    let all = find_once(&ALL_URLS_RE, content).ok_or(EditorError::UpdateUrls)?;
    Ok((default.range(), all.range()))
}

pub fn check_update(content: &str) -> Result<(), EditorError> {
    locate_urls(content).map(|_| ())
}

/// Rewrites only the default URL and the URL list inside an active block.
pub fn apply_update(content: &str, hosts: &[Host]) -> Result<String, EditorError> {
    let (default, all) = locate_urls(content)?;
    let urls = generate_urls(hosts, Layout::detect(content).eol)?;

    // Later range first so the earlier one keeps its offsets.
    let (first, second) = if default.start < all.start {
        ((default, urls.default), (all, urls.all))
    } else {
        ((all, urls.all), (default, urls.default))
    };
    let updated = splice(content, second.0, &second.1);
    Ok(splice(&updated, first.0, &first.1))
}

/// Range of the whole block match and end of the locator text inside it.
fn locate_block(content: &str) -> Result<(Range<usize>, usize), EditorError> {
    let (_, block_re) = locator(content);
    let mut found = block_re.captures_iter(content);
    match (found.next(), found.next()) {
        (Some(caps), None) => {
            let whole = caps.get(0).ok_or(EditorError::Restore)?;
            let locator = caps.name("locator").ok_or(EditorError::Restore)?;
            Ok((whole.range(), locator.end()))
        }
        _ => Err(EditorError::Restore),
    }
}

pub fn check_restore(content: &str) -> Result<(), EditorError> {
    locate_block(content).map(|_| ())
}

/// Replaces the marked block with literal definitions for `host`.
///
/// The definitions are written single-quoted directly under the locator line,
/// so a file only comes back byte-identical when its raw definitions had that
/// layout. Double quotes or blank lines between the locator and the
/// definitions are not preserved.
pub fn apply_restore(content: &str, host: &Host, dirs: &Dirs) -> Result<String, EditorError> {
    let (whole, locator_end) = locate_block(content)?;
    let layout = Layout::detect(content);
    let definitions = generate_definitions(host, dirs, layout.is_admin, layout.eol);
    let replacement = format!("{}{}{}", &content[whole.start..locator_end], layout.eol, definitions);
    Ok(splice(content, whole, &replacement))
}
