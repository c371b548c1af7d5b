//! Generated PHP for the marked block and for restored definitions.
use crate::models::{Dirs, Host};

use super::EditorError;

pub const BLOCK_START: &str = "// Start Host Management Extension";
pub const BLOCK_END: &str = "// End Host Management Extension";

/// Request-time URL selection. `*default*` and `*urls*` are filled per save.
const RESOLVER: &str = r#"if (
    (isset($_SERVER['HTTPS']) && (($_SERVER['HTTPS'] == 'on')
    || ($_SERVER['HTTPS'] == '1')))
    || $_SERVER['SERVER_PORT'] == 443
) {
    $hm_protocol = 'https://';
} elseif (
    !empty($_SERVER['HTTP_X_FORWARDED_PROTO'])
    && $_SERVER['HTTP_X_FORWARDED_PROTO'] == 'https'
    || !empty($_SERVER['HTTP_X_FORWARDED_SSL'])
    && $_SERVER['HTTP_X_FORWARDED_SSL'] == 'on'
) {
    $hm_protocol = 'https://';
} else {
    $hm_protocol = 'http://';
}

$hm_requested = $hm_protocol . $_SERVER['HTTP_HOST'] . '/';
*default*;
*urls*;

$hm_url = in_array($hm_requested, $hm_urls) ? $hm_requested : $hm_default;"#;

/// The two lines `update` rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    /// `$hm_default = 'https://a/'` (no semicolon, it stays in the file)
    pub default: String,
    /// `$hm_urls = [ ... ]` spread over one line per URL
    pub all: String,
}

pub fn generate_urls(hosts: &[Host], eol: &str) -> Result<Urls, EditorError> {
    let default = hosts.iter().find(|h| h.default).ok_or(EditorError::DefaultHost)?;

    let mut all = String::from("$hm_urls = [");
    for (i, host) in hosts.iter().enumerate() {
        if i != 0 {
            all.push(',');
        }
        all.push_str(eol);
        all.push_str("    '");
        all.push_str(&host.url());
        all.push('\'');
    }
    all.push_str(eol);
    all.push(']');

    Ok(Urls { default: format!("$hm_default = '{}'", default.url()), all })
}

/// Whole marked block, without a trailing line terminator.
pub fn generate_code_block(
    hosts: &[Host],
    dirs: &Dirs,
    is_admin: bool,
    eol: &str,
) -> Result<String, EditorError> {
    let urls = generate_urls(hosts, eol)?;

    let mut code = String::from(BLOCK_START);
    code.push_str(eol);
    code.push_str(
        &RESOLVER
            .replace('\n', eol)
            .replace("*default*", &urls.default)
            .replace("*urls*", &urls.all),
    );
    code.push_str(eol);
    code.push_str(eol);
    code.push_str("define('HTTP_SERVER', $hm_url");

    if is_admin {
        code.push_str(&format!(" . '{}');", dirs.admin));
        code.push_str(eol);
        code.push_str("define('HTTP_CATALOG', $hm_url");
    }
    if !dirs.public.is_empty() {
        code.push_str(&format!(" . '{}'", dirs.public));
    }

    code.push_str(");");
    code.push_str(eol);
    code.push_str(BLOCK_END);
    Ok(code)
}

/// Literal definitions put back by `restore`.
pub fn generate_definitions(host: &Host, dirs: &Dirs, is_admin: bool, eol: &str) -> String {
    let base = host.url();
    let dir = if is_admin { &dirs.admin } else { &dirs.public };
    let mut definitions = format!("define('HTTP_SERVER', '{base}{dir}');");
    if is_admin {
        definitions.push_str(eol);
        definitions.push_str(&format!("define('HTTP_CATALOG', '{base}{}');", dirs.public));
    }
    definitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Protocol;

    fn hosts() -> Vec<Host> {
        vec![
            Host::new(Protocol::Https, "shop.example", true),
            Host::new(Protocol::Http, "www.shop.example", false),
        ]
    }

    #[test]
    fn urls_list_every_host() {
        let urls = generate_urls(&hosts(), "\n").unwrap();
        assert_eq!(urls.default, "$hm_default = 'https://shop.example/'");
        assert_eq!(
            urls.all,
            "$hm_urls = [\n    'https://shop.example/',\n    'http://www.shop.example/'\n]"
        );
    }

    #[test]
    fn urls_need_a_default() {
        let mut hs = hosts();
        hs[0].default = false;
        assert!(matches!(generate_urls(&hs, "\n"), Err(EditorError::DefaultHost)));
    }

    #[test]
    fn admin_block_defines_server_and_catalog() {
        let dirs = Dirs { admin: "admin/".into(), public: "shop/".into() };
        let block = generate_code_block(&hosts(), &dirs, true, "\n").unwrap();
        assert!(block.starts_with(BLOCK_START));
        assert!(block.ends_with(&format!(
            "define('HTTP_SERVER', $hm_url . 'admin/');\ndefine('HTTP_CATALOG', $hm_url . 'shop/');\n{BLOCK_END}"
        )));
        assert!(block.contains("\n$hm_default = 'https://shop.example/';\n$hm_urls = [\n"));
    }

    #[test]
    fn public_block_in_document_root() {
        let dirs = Dirs { admin: "admin/".into(), public: String::new() };
        let block = generate_code_block(&hosts(), &dirs, false, "\n").unwrap();
        assert!(block.ends_with(&format!("define('HTTP_SERVER', $hm_url);\n{BLOCK_END}")));
        assert!(!block.contains("HTTP_CATALOG"));
    }

    #[test]
    fn crlf_block_has_no_bare_newlines() {
        let dirs = Dirs { admin: "admin/".into(), public: String::new() };
        let block = generate_code_block(&hosts(), &dirs, true, "\r\n").unwrap();
        assert_eq!(block.matches('\n').count(), block.matches("\r\n").count());
    }

    #[test]
    fn definitions_use_the_given_host() {
        let host = Host::new(Protocol::Http, "a.example", true);
        let dirs = Dirs { admin: "admin/".into(), public: String::new() };
        assert_eq!(
            generate_definitions(&host, &dirs, true, "\n"),
            "define('HTTP_SERVER', 'http://a.example/admin/');\ndefine('HTTP_CATALOG', 'http://a.example/');"
        );
        assert_eq!(
            generate_definitions(&host, &dirs, false, "\n"),
            "define('HTTP_SERVER', 'http://a.example/');"
        );
    }
}
