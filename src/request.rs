//! The request side of matching: an absolute URI plus the headers the
//! matcher consults (`X-Requested-With`, `Referer`, `Content-Type`).

use url::Url;

#[derive(Debug, PartialEq)]
pub enum RequestError {
    UrlParseError,
    NoHost,
}

impl From<url::ParseError> for RequestError {
    fn from(_err: url::ParseError) -> RequestError {
        RequestError::UrlParseError
    }
}

/// An ordered multimap of request headers with ASCII-case-insensitive
/// name lookup.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Headers {
        Headers::default()
    }

    /// Appends a header, keeping any values already recorded for the name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value recorded for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Headers {
        Headers {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// A parsed inbound request. Owns the serialised absolute URI, the span of
/// its host within that string, a lowercase shadow for case-insensitive
/// fragments, and the header bag.
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    url_lowercase: String,
    hostname_start: usize,
    hostname_end: usize,
    headers: Headers,
}

impl Request {
    pub fn parse(url: &str, headers: Headers) -> Result<Request, RequestError> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .map(String::from)
            .ok_or(RequestError::NoHost)?;
        let url: String = parsed.into();
        let hostname_start = url.find(&host).ok_or(RequestError::NoHost)?;
        let hostname_end = hostname_start + host.len();
        let url_lowercase = url.to_ascii_lowercase();
        Ok(Request {
            url,
            url_lowercase,
            hostname_start,
            hostname_end,
            headers,
        })
    }

    /// The absolute serialised form of the URI, as matched against.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn hostname(&self) -> &str {
        &self.url[self.hostname_start..self.hostname_end]
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Cursor position just past `scheme://host`.
    pub(crate) fn hostname_end(&self) -> usize {
        self.hostname_end
    }

    /// The view literal fragments scan: the original bytes under
    /// `matchcase`, the lowercase shadow otherwise. Both views have
    /// identical byte offsets.
    pub(crate) fn matching_url(&self, match_case: bool) -> &str {
        if match_case {
            &self.url
        } else {
            &self.url_lowercase
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_span() {
        let request = Request::parse("http://silly.com/stoopid/url&=b1", Headers::new()).unwrap();
        assert_eq!(request.hostname(), "silly.com");
        assert_eq!(request.url(), "http://silly.com/stoopid/url&=b1");
        assert_eq!(&request.url()[..request.hostname_end()], "http://silly.com");
    }

    #[test]
    fn normalises_scheme_and_host_case() {
        let request = Request::parse("HTTP://Example.COM/Ad", Headers::new()).unwrap();
        assert_eq!(request.hostname(), "example.com");
        assert_eq!(request.matching_url(false), "http://example.com/ad");
        assert_eq!(request.matching_url(true), "http://example.com/Ad");
    }

    #[test]
    fn rejects_relative_and_hostless() {
        assert_eq!(
            Request::parse("silly.com/ad", Headers::new()).err(),
            Some(RequestError::UrlParseError)
        );
        assert_eq!(
            Request::parse("data:text/plain,hi", Headers::new()).err(),
            Some(RequestError::NoHost)
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers: Headers = [
            ("X-Requested-With", "XmlHttpRequest"),
            ("content-type", "script"),
            ("Content-Type", "image"),
        ]
        .into_iter()
        .collect();
        assert_eq!(headers.get("x-requested-with"), Some("XmlHttpRequest"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("script"));
        assert_eq!(headers.get_all("Content-Type").count(), 2);
        assert_eq!(headers.get("Referer"), None);
    }
}
