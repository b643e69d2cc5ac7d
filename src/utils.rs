//! ASCII-oriented scanning helpers shared by the rule parser and the match
//! program. All routines take byte offsets into `&str` views and return a
//! miss on out-of-range input instead of panicking.

#[inline]
pub fn fast_starts_with(text: &str, prefix: &str) -> bool {
    text.as_bytes().starts_with(prefix.as_bytes())
}

#[inline]
pub fn fast_starts_with_from(text: &str, prefix: &str, from: usize) -> bool {
    match text.as_bytes().get(from..) {
        Some(rest) => rest.starts_with(prefix.as_bytes()),
        None => false,
    }
}

#[inline]
pub fn fast_ends_with(text: &str, suffix: &str) -> bool {
    text.as_bytes().ends_with(suffix.as_bytes())
}

/// Byte offset of `needle` in `text`, searching from `from`.
#[inline]
pub fn find_from(text: &str, needle: &str, from: usize) -> Option<usize> {
    text.get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|i| i + from)
}

/// Offset of the first byte in `set` at or after `from`.
#[inline]
pub fn find_first_of(text: &str, set: &[u8], from: usize) -> Option<usize> {
    text.as_bytes()
        .get(from..)?
        .iter()
        .position(|b| set.contains(b))
        .map(|i| i + from)
}

/// ASCII-case-insensitive substring test.
pub fn contains_ignore_ascii_case(text: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > text.len() {
        return false;
    }
    let text = text.as_bytes();
    let needle = needle.as_bytes();
    text.windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

#[inline]
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// The dot-suffix chain of a host, most specific first:
/// `a.b.c.com` yields `[a.b.c.com, b.c.com, c.com, com]`.
pub fn domain_suffixes(host: &str) -> Vec<&str> {
    let mut suffixes = Vec::with_capacity(4);
    suffixes.push(host);
    let mut rest = host;
    while let Some(dot) = rest.find('.') {
        rest = &rest[dot + 1..];
        if rest.is_empty() {
            break;
        }
        suffixes.push(rest);
    }
    suffixes
}

/// Whether `host` equals `domain` or ends with it at a label boundary.
pub fn host_within(host: &str, domain: &str) -> bool {
    if host.len() == domain.len() {
        return host == domain;
    }
    if host.len() > domain.len() && fast_ends_with(host, domain) {
        return host.as_bytes()[host.len() - domain.len() - 1] == b'.';
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_from_works() {
        assert!(fast_starts_with_from("||host^", "||", 0));
        assert!(fast_starts_with_from("||host^", "host", 2));
        assert!(!fast_starts_with_from("||host^", "host", 3));
        assert!(!fast_starts_with_from("abc", "abc", 1));
        assert!(!fast_starts_with_from("abc", "a", 17));
        assert!(fast_starts_with_from("abc", "", 3));
    }

    #[test]
    fn find_from_works() {
        assert_eq!(find_from("ad/banner/ad", "ad", 0), Some(0));
        assert_eq!(find_from("ad/banner/ad", "ad", 1), Some(10));
        assert_eq!(find_from("ad/banner/ad", "ad", 11), None);
        assert_eq!(find_from("ad", "ad", 40), None);
    }

    #[test]
    fn find_first_of_works() {
        assert_eq!(find_first_of("http://x.com/p", b"/:?=&", 0), Some(4));
        assert_eq!(find_first_of("http://x.com/p", b"/:?=&", 5), Some(5));
        assert_eq!(find_first_of("http://x.com/p", b"/:?=&", 13), None);
        assert_eq!(find_first_of("abc", b"/", 9), None);
    }

    #[test]
    fn contains_ignore_ascii_case_works() {
        assert!(contains_ignore_ascii_case("text/JavaScript", "script"));
        assert!(contains_ignore_ascii_case("SCRIPT", "script"));
        assert!(!contains_ignore_ascii_case("text/css", "script"));
        assert!(contains_ignore_ascii_case("anything", ""));
        assert!(!contains_ignore_ascii_case("ab", "abc"));
    }

    #[test]
    fn domain_suffixes_works() {
        assert_eq!(
            domain_suffixes("a.b.c.com"),
            vec!["a.b.c.com", "b.c.com", "c.com", "com"]
        );
        assert_eq!(domain_suffixes("com"), vec!["com"]);
        assert_eq!(domain_suffixes("global"), vec!["global"]);
        assert_eq!(domain_suffixes("trailing."), vec!["trailing."]);
    }

    #[test]
    fn host_within_works() {
        assert!(host_within("silly.com", "silly.com"));
        assert!(host_within("sub.silly.com", "silly.com"));
        assert!(host_within("a.b.silly.com", "silly.com"));
        assert!(!host_within("mysilly.com", "silly.com"));
        assert!(!host_within("silly.com", "sub.silly.com"));
        assert!(!host_within("silly.com", "other.com"));
    }
}
