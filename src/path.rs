//! Path helpers: request-target splitting, percent coding, clean paths.
//!
//! None of these allocate when the input is already in the wanted form; they
//! return [`Cow::Borrowed`] in that case.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Bytes left alone when encoding a path for a `Location` header.
const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Same as [`PATH`] but keeps existing `%XX` escapes in route patterns.
const ROUTE: &AsciiSet = &PATH.remove(b'%');

/// A request target split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    /// Everything before `?` or `#`.
    pub path: &'a str,
    /// Text after `?`, without the `?`.
    pub query: Option<&'a str>,
    /// Text after `#`, without the `#`.
    pub fragment: Option<&'a str>,
}

impl<'a> RequestTarget<'a> {
    /// Split a raw request target such as `/a/b?x=1#top`.
    pub fn parse(uri: &'a str) -> Self {
        let (rest, fragment) = match uri.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (uri, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        Self {
            path,
            query,
            fragment,
        }
    }
}

/// Percent-decode a path segment.
///
/// Malformed escapes or escapes that decode to invalid UTF-8 leave the input
/// untouched. `+` is not treated as a space.
pub fn unescape(segment: &str) -> Cow<'_, str> {
    if !segment.contains('%') || !has_valid_escapes(segment) {
        return Cow::Borrowed(segment);
    }
    percent_decode_str(segment)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(segment))
}

fn has_valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Percent-encode a decoded path for use in a `Location` header.
pub fn encode_path(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, PATH).into()
}

/// Canonical form of `path`.
///
/// Resolves `.` and `..` segments and collapses repeated slashes. The result
/// always starts with `/`, and keeps a trailing slash when the input had one
/// (or ended in `/.`).
///
/// ```
/// use pathmux::clean_path;
///
/// assert_eq!(clean_path("//a/./b/../c/"), "/a/c/");
/// assert_eq!(clean_path("/../x"), "/x");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    let last = path.rsplit('/').next().unwrap_or_default();
    let trailing = (path.len() > 1 && path.ends_with('/')) || last == ".";

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() || trailing {
        cleaned.push('/');
    }

    if cleaned == path {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(cleaned)
    }
}

/// Percent-escaped form of a route pattern.
///
/// Escaping would otherwise destroy route syntax, so `/*`, `/\:` and `/\*`
/// sequences are restored afterwards. A terminal `~regex` token is copied
/// verbatim.
pub fn escape_route(pattern: &str) -> Cow<'_, str> {
    let (head, regex) = match pattern.find("/~") {
        Some(i) => pattern.split_at(i + 1),
        None => (pattern, ""),
    };

    let escaped: Cow<'_, str> = utf8_percent_encode(head, ROUTE).into();
    if matches!(escaped, Cow::Borrowed(_)) {
        return Cow::Borrowed(pattern);
    }

    let mut restored = escaped
        .replace("/%2A", "/*")
        .replace("/%5C:", "/\\:")
        .replace("/%5C%5C:", "/%5C:")
        .replace("/%5C%2A", "/%2A")
        .replace("/%5C%5C%2A", "/%5C%2A");
    restored.push_str(regex);
    Cow::Owned(restored)
}
