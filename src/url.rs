//! URL helpers used by the guard and the controller.
//!
//! All URLs are treated as opaque strings. Nothing here parses a URL
//! structurally, so malformed input degrades to plain string comparison and
//! never fails.
//!
//! # Example
//!
//! ```
//! use gpui_navguard::url::{strip_query_and_fragment, to_base_relative_path, urls_equal};
//!
//! assert_eq!(strip_query_and_fragment("/Record/Editor?id=1"), "/Record/Editor");
//! assert_eq!(
//!     to_base_relative_path("https://app.test/", "https://app.test/users/7?tab=2"),
//!     "/users/7?tab=2"
//! );
//! assert!(urls_equal("/Record/Editor", "/record/editor"));
//! ```

const QUERY_OR_FRAGMENT: [char; 2] = ['?', '#'];

/// Return `url` up to (not including) the first `?` or `#`.
///
/// A URL without either delimiter is already bare and is returned unchanged.
pub fn strip_query_and_fragment(url: &str) -> &str {
    match url.find(QUERY_OR_FRAGMENT) {
        Some(index) => &url[..index],
        None => url,
    }
}

/// Return the query string of `url` without the leading `?` and without any
/// fragment, or `""` when there is none.
pub fn query_string(url: &str) -> &str {
    let Some((_, rest)) = url.split_once('?') else {
        return "";
    };
    match rest.find('#') {
        Some(index) => &rest[..index],
        None => rest,
    }
}

/// Compare two URLs ignoring ASCII case.
pub fn urls_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Express `location` relative to `base_uri`, always with a leading `/`.
///
/// Locations outside the base are returned as-is (with a leading `/` added
/// only if they are not absolute). The query string and fragment are kept.
pub fn to_base_relative_path(base_uri: &str, location: &str) -> String {
    let base = base_uri.trim_end_matches('/');

    let relative = if !base.is_empty() && starts_with_ignore_case(location, base) {
        &location[base.len()..]
    } else {
        location
    };

    if relative.starts_with('/') || relative.contains("://") {
        relative.to_string()
    } else {
        format!("/{}", relative)
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query_and_fragment("/a/b?x=1"), "/a/b");
    }

    #[test]
    fn test_strip_fragment_before_query() {
        assert_eq!(strip_query_and_fragment("/a#top?x=1"), "/a");
        assert_eq!(strip_query_and_fragment("/a?x=1#top"), "/a");
    }

    #[test]
    fn test_strip_bare_url_unchanged() {
        assert_eq!(strip_query_and_fragment("/a/b"), "/a/b");
        assert_eq!(strip_query_and_fragment(""), "");
        assert_eq!(strip_query_and_fragment("not a url at all"), "not a url at all");
    }

    #[test]
    fn test_query_string() {
        assert_eq!(query_string("/r?id=2&tab=x#frag"), "id=2&tab=x");
        assert_eq!(query_string("/r"), "");
        assert_eq!(query_string("/r?"), "");
    }

    #[test]
    fn test_urls_equal_ignores_case() {
        assert!(urls_equal("/Record/Editor", "/RECORD/editor"));
        assert!(!urls_equal("/Record/Editor", "/Record/Editor/"));
    }

    #[test]
    fn test_base_relative_path() {
        assert_eq!(
            to_base_relative_path("https://app.test/", "https://app.test/users"),
            "/users"
        );
        assert_eq!(
            to_base_relative_path("https://app.test/", "https://app.test/"),
            "/"
        );
        assert_eq!(
            to_base_relative_path("https://APP.test", "https://app.test/a?b=c"),
            "/a?b=c"
        );
    }

    #[test]
    fn test_base_relative_path_outside_base() {
        assert_eq!(
            to_base_relative_path("https://app.test/", "https://other.test/x"),
            "https://other.test/x"
        );
        assert_eq!(to_base_relative_path("", "users"), "/users");
        assert_eq!(to_base_relative_path("", "/users"), "/users");
    }
}
