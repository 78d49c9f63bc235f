//! CSRF token lookup.

use crate::config::Config;
use crate::dom::Document;

/// Content of the first connected `<meta name="…">` with a non-empty
/// `content` attribute.
#[must_use]
pub fn meta_content(document: &Document, name: &str) -> Option<String> {
    document
        .elements_named("meta")
        .into_iter()
        .filter_map(|node| document.element(node))
        .find(|meta| meta.attr("name") == Some(name))
        .and_then(|meta| meta.attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Percent-decoded value of the cookie called `name` in a
/// `document.cookie`-style string. Empty values count as absent.
#[must_use]
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| value.to_string())
        })
        .filter(|value| !value.is_empty())
}

/// Token for state-changing requests: the cookie named by the CSRF param
/// meta tag, else the CSRF token meta tag.
#[must_use]
pub fn csrf_token(document: &Document, cookies: &str, config: &Config) -> Option<String> {
    meta_content(document, &config.csrf_param_meta)
        .and_then(|cookie_name| cookie_value(cookies, &cookie_name))
        .or_else(|| meta_content(document, &config.csrf_token_meta))
}
