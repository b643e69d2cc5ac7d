//! URL filters: the compiled fragment program plus option flags and
//! applicable/exception host sets, and the request matcher over them.

use std::collections::HashSet;

use bitflags::bitflags;
use url::Url;

use crate::filters::fragment::{check_parts, FilterPart, ANCHOR_END_CHARS};
use crate::request::Request;
use crate::utils;

#[derive(Debug, PartialEq, Eq)]
pub enum FilterError {
    /// Empty or whitespace-only line.
    Empty,
    /// Comment line or list header.
    Comment,
    /// Unrecognisable rule text, including out-of-range accesses during
    /// parsing.
    Malformed,
    /// Element-hide rule with an empty CSS selector (`strict-selectors`
    /// builds only).
    EmptySelector,
}

bitflags! {
    /// One bit per recognised option token. Only the xmlhttprequest,
    /// third-party, script, image and stylesheet bits plus `MATCH_CASE`
    /// affect matching; the rest are parsed and carried.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FilterOptions: u64 {
        const FROM_SCRIPT = 1 << 0;
        const NOT_SCRIPT = 1 << 1;
        const FROM_IMAGE = 1 << 2;
        const NOT_IMAGE = 1 << 3;
        const FROM_STYLESHEET = 1 << 4;
        const NOT_STYLESHEET = 1 << 5;
        const FROM_OBJECT = 1 << 6;
        const NOT_OBJECT = 1 << 7;
        const FROM_SUBDOCUMENT = 1 << 8;
        const NOT_SUBDOCUMENT = 1 << 9;
        const FROM_XMLHTTPREQUEST = 1 << 10;
        const NOT_XMLHTTPREQUEST = 1 << 11;
        const FROM_WEBSOCKET = 1 << 12;
        const NOT_WEBSOCKET = 1 << 13;
        const FROM_OBJECT_SUBREQUEST = 1 << 14;
        const NOT_OBJECT_SUBREQUEST = 1 << 15;
        const FROM_DOCUMENT = 1 << 16;
        const NOT_DOCUMENT = 1 << 17;
        const FROM_ELEMHIDE = 1 << 18;
        const NOT_ELEMHIDE = 1 << 19;
        const FROM_OTHER = 1 << 20;
        const NOT_OTHER = 1 << 21;
        const FROM_MEDIA = 1 << 22;
        const NOT_MEDIA = 1 << 23;
        const FROM_FONT = 1 << 24;
        const NOT_FONT = 1 << 25;
        const FROM_PING = 1 << 26;
        const NOT_PING = 1 << 27;

        const POPUP = 1 << 28;
        const NOT_POPUP = 1 << 29;
        const THIRD_PARTY = 1 << 30;
        const NOT_THIRD_PARTY = 1 << 31;
        const DONOTTRACK = 1 << 32;
        const GENERICHIDE = 1 << 33;
        const GENERICBLOCK = 1 << 34;
        const COLLAPSE = 1 << 35;
        const NOT_COLLAPSE = 1 << 36;

        const MATCH_CASE = 1 << 37;

        /// Bits resolved by the Content-Type priority ladder. A single
        /// header value satisfies at most one positive bucket: `script`
        /// outranks `image` outranks `stylesheet`, and negative bits
        /// accumulate only down the non-matching branch.
        const CONTENT_LADDER = Self::FROM_SCRIPT.bits()
            | Self::NOT_SCRIPT.bits()
            | Self::FROM_IMAGE.bits()
            | Self::NOT_IMAGE.bits()
            | Self::FROM_STYLESHEET.bits()
            | Self::NOT_STYLESHEET.bits();

        const XHR_BITS = Self::FROM_XMLHTTPREQUEST.bits() | Self::NOT_XMLHTTPREQUEST.bits();
    }
}

fn option_flag(name: &str, negated: bool) -> Option<FilterOptions> {
    let flag = match (name, negated) {
        ("script", false) => FilterOptions::FROM_SCRIPT,
        ("script", true) => FilterOptions::NOT_SCRIPT,
        ("image", false) => FilterOptions::FROM_IMAGE,
        ("image", true) => FilterOptions::NOT_IMAGE,
        ("stylesheet", false) => FilterOptions::FROM_STYLESHEET,
        ("stylesheet", true) => FilterOptions::NOT_STYLESHEET,
        ("object", false) => FilterOptions::FROM_OBJECT,
        ("object", true) => FilterOptions::NOT_OBJECT,
        ("subdocument", false) => FilterOptions::FROM_SUBDOCUMENT,
        ("subdocument", true) => FilterOptions::NOT_SUBDOCUMENT,
        ("xmlhttprequest", false) => FilterOptions::FROM_XMLHTTPREQUEST,
        ("xmlhttprequest", true) => FilterOptions::NOT_XMLHTTPREQUEST,
        ("websocket", false) => FilterOptions::FROM_WEBSOCKET,
        ("websocket", true) => FilterOptions::NOT_WEBSOCKET,
        ("object-subrequest", false) => FilterOptions::FROM_OBJECT_SUBREQUEST,
        ("object-subrequest", true) => FilterOptions::NOT_OBJECT_SUBREQUEST,
        ("document", false) => FilterOptions::FROM_DOCUMENT,
        ("document", true) => FilterOptions::NOT_DOCUMENT,
        ("elemhide", false) => FilterOptions::FROM_ELEMHIDE,
        ("elemhide", true) => FilterOptions::NOT_ELEMHIDE,
        ("other", false) => FilterOptions::FROM_OTHER,
        ("other", true) => FilterOptions::NOT_OTHER,
        ("media", false) => FilterOptions::FROM_MEDIA,
        ("media", true) => FilterOptions::NOT_MEDIA,
        ("font", false) => FilterOptions::FROM_FONT,
        ("font", true) => FilterOptions::NOT_FONT,
        ("ping", false) => FilterOptions::FROM_PING,
        ("ping", true) => FilterOptions::NOT_PING,
        ("popup", false) => FilterOptions::POPUP,
        ("popup", true) => FilterOptions::NOT_POPUP,
        ("third-party", false) => FilterOptions::THIRD_PARTY,
        ("third-party", true) => FilterOptions::NOT_THIRD_PARTY,
        ("donottrack", false) => FilterOptions::DONOTTRACK,
        ("generichide", false) => FilterOptions::GENERICHIDE,
        ("genericblock", false) => FilterOptions::GENERICBLOCK,
        ("collapse", false) => FilterOptions::COLLAPSE,
        ("collapse", true) => FilterOptions::NOT_COLLAPSE,
        ("matchcase", false) => FilterOptions::MATCH_CASE,
        _ => return None,
    };
    Some(flag)
}

/// A compiled URL filter rule.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlFilter {
    pub parts: Vec<FilterPart>,
    pub options: FilterOptions,
    pub applicable_domains: HashSet<String>,
    pub exception_domains: HashSet<String>,
    pub applicable_referers: HashSet<String>,
    pub exception_referers: HashSet<String>,
    pub is_exception: bool,
    pub category_id: i16,
    pub original_rule: Option<String>,
}

impl UrlFilter {
    /// Parses a single (pre-trimmed) URL filter line.
    ///
    /// `@@` marks an exception, the segment after the last `$` holds
    /// options, and the remaining body compiles left-to-right into the
    /// fragment program. An empty body with an options segment yields a
    /// zero-fragment program that matches every URI.
    pub fn parse(line: &str, category_id: i16) -> Result<UrlFilter, FilterError> {
        let mut options = FilterOptions::empty();
        let mut applicable_domains = HashSet::new();
        let mut exception_domains = HashSet::new();
        let mut applicable_referers = HashSet::new();
        let mut exception_referers = HashSet::new();

        let mut filter_index_start = 0;
        let mut filter_index_end = line.len();

        let is_exception = utils::fast_starts_with(line, "@@");
        if is_exception {
            filter_index_start = 2;
        }

        if let Some(options_index) = line.rfind('$') {
            if options_index >= filter_index_start {
                filter_index_end = options_index;
                for token in line[options_index + 1..].split(',') {
                    let bytes = token.as_bytes();
                    // Privileged options are recognised by shape alone:
                    // length, first byte and the position of '='.
                    if bytes.len() > 7 && bytes[0] == b'd' && bytes[6] == b'=' {
                        parse_host_list(
                            &token[7..],
                            &mut applicable_domains,
                            &mut exception_domains,
                        );
                    } else if bytes.len() > 7 && bytes[0] == b'r' && bytes[7] == b'=' {
                        parse_host_list(
                            &token[8..],
                            &mut applicable_referers,
                            &mut exception_referers,
                        );
                    } else {
                        let negated = bytes.first() == Some(&b'~');
                        let name = if negated { &token[1..] } else { token };
                        if let Some(flag) = option_flag(name, negated) {
                            options |= flag;
                        }
                    }
                }
            }
        }

        let body = line
            .get(filter_index_start..filter_index_end)
            .ok_or(FilterError::Malformed)?;
        let match_case = options.contains(FilterOptions::MATCH_CASE);

        let mut parts: Vec<FilterPart> = Vec::new();
        let mut rest = body;

        if let Some(after) = body.strip_prefix("||") {
            let host_end =
                utils::find_first_of(after, ANCHOR_END_CHARS, 0).unwrap_or(after.len());
            let host = &after[..host_end];
            if host.is_empty() {
                return Err(FilterError::Malformed);
            }
            let host = utils::strip_www(host).to_ascii_lowercase();
            applicable_domains.insert(host.clone());
            parts.push(FilterPart::AnchoredDomain(host));
            rest = &after[host_end..];
        } else if let Some(after) = body.strip_prefix('|') {
            // A trailing `|` terminator wins over anchor-end characters,
            // so `|scheme://host/path|` captures the full address.
            let (span, remainder) = match after.find('|') {
                Some(pipe) => (&after[..pipe], &after[pipe + 1..]),
                None => {
                    let end = utils::find_first_of(after, ANCHOR_END_CHARS, 0)
                        .unwrap_or(after.len());
                    (&after[..end], &after[end..])
                }
            };
            if span.is_empty() {
                return Err(FilterError::Malformed);
            }
            if let Ok(parsed) = Url::parse(span) {
                if let Some(host) = parsed.host_str() {
                    applicable_domains.insert(host.to_string());
                }
            }
            let address = if match_case {
                span.to_string()
            } else {
                span.to_ascii_lowercase()
            };
            parts.push(FilterPart::AnchoredAddress {
                address,
                match_case,
            });
            rest = remainder;
        }

        let mut pending_start = 0;
        for (i, byte) in rest.bytes().enumerate() {
            if byte == b'*' || byte == b'^' {
                if i > pending_start {
                    parts.push(make_literal(&rest[pending_start..i], match_case));
                }
                parts.push(if byte == b'*' {
                    FilterPart::Wildcard
                } else {
                    FilterPart::Separator
                });
                pending_start = i + 1;
            }
        }
        if pending_start < rest.len() {
            parts.push(make_literal(&rest[pending_start..], match_case));
        }

        Ok(UrlFilter {
            parts,
            options,
            applicable_domains,
            exception_domains,
            applicable_referers,
            exception_referers,
            is_exception,
            category_id,
            original_rule: Some(line.to_string()),
        })
    }

    /// Tests the request against this rule: option constraints first
    /// (cheap header and host-set checks), then the fragment program.
    pub fn matches(&self, request: &Request) -> bool {
        self.check_options(request) && check_parts(&self.parts, request)
    }

    /// Drops the source text and all four host sets. The fragment program
    /// still enforces anchored hosts, but set gating becomes vacuous and
    /// the filter can no longer be re-indexed.
    pub fn trim_excess_data(&mut self) {
        self.original_rule = None;
        for set in [
            &mut self.applicable_domains,
            &mut self.exception_domains,
            &mut self.applicable_referers,
            &mut self.exception_referers,
        ] {
            set.clear();
            set.shrink_to_fit();
        }
    }

    fn check_options(&self, request: &Request) -> bool {
        if self.options.intersects(FilterOptions::XHR_BITS) {
            let is_xhr = request
                .headers()
                .get("X-Requested-With")
                .map_or(false, |v| v.eq_ignore_ascii_case("XMLHttpRequest"));
            if self.options.contains(FilterOptions::FROM_XMLHTTPREQUEST) && !is_xhr {
                return false;
            }
            if self.options.contains(FilterOptions::NOT_XMLHTTPREQUEST) && is_xhr {
                return false;
            }
        }

        // Referer-bearing checks. An absent Referer is a fresh
        // navigation: not third-party, and the referer-set checks are
        // skipped entirely.
        match request.headers().get("Referer") {
            Some(value) => {
                let referer = match Url::parse(value) {
                    Ok(parsed) => match parsed.host_str() {
                        Some(host) => utils::strip_www(host).to_string(),
                        None => return false,
                    },
                    Err(_) => return false,
                };
                let same_origin = referer == request.hostname();
                if self.options.contains(FilterOptions::NOT_THIRD_PARTY) && !same_origin {
                    return false;
                }
                if self.options.contains(FilterOptions::THIRD_PARTY) && same_origin {
                    return false;
                }
                if !self.applicable_domains.is_empty()
                    && !host_in_set(&self.applicable_domains, &referer)
                {
                    return false;
                }
                if !self.exception_domains.is_empty()
                    && host_in_set(&self.exception_domains, &referer)
                {
                    return false;
                }
                if !self.applicable_referers.is_empty()
                    && !host_in_set(&self.applicable_referers, &referer)
                {
                    return false;
                }
                if !self.exception_referers.is_empty()
                    && host_in_set(&self.exception_referers, &referer)
                {
                    return false;
                }
            }
            None => {
                if self.options.contains(FilterOptions::THIRD_PARTY) {
                    return false;
                }
            }
        }

        if self.options.intersects(FilterOptions::CONTENT_LADDER) {
            let content_type = request.headers().get("Content-Type").unwrap_or("");
            if !self.check_content_type(content_type) {
                return false;
            }
        }

        let host = utils::strip_www(request.hostname());
        if !self.applicable_domains.is_empty() && !host_in_set(&self.applicable_domains, host) {
            return false;
        }
        if !self.exception_domains.is_empty() && host_in_set(&self.exception_domains, host) {
            return false;
        }

        true
    }

    fn check_content_type(&self, content_type: &str) -> bool {
        let satisfied = if utils::contains_ignore_ascii_case(content_type, "script") {
            FilterOptions::FROM_SCRIPT
        } else if utils::contains_ignore_ascii_case(content_type, "image") {
            FilterOptions::NOT_SCRIPT | FilterOptions::FROM_IMAGE
        } else if utils::contains_ignore_ascii_case(content_type, "stylesheet") {
            FilterOptions::NOT_SCRIPT | FilterOptions::NOT_IMAGE | FilterOptions::FROM_STYLESHEET
        } else {
            FilterOptions::NOT_SCRIPT | FilterOptions::NOT_IMAGE | FilterOptions::NOT_STYLESHEET
        };
        (self.options & FilterOptions::CONTENT_LADDER & !satisfied).is_empty()
    }
}

fn make_literal(value: &str, match_case: bool) -> FilterPart {
    let value = if match_case {
        value.to_string()
    } else {
        value.to_ascii_lowercase()
    };
    FilterPart::Literal { value, match_case }
}

fn parse_host_list(
    list: &str,
    applicable: &mut HashSet<String>,
    exception: &mut HashSet<String>,
) {
    for entry in list.split('|') {
        if let Some(host) = entry.strip_prefix('~') {
            if !host.is_empty() {
                exception.insert(host.to_ascii_lowercase());
            }
        } else if !entry.is_empty() {
            applicable.insert(entry.to_ascii_lowercase());
        }
    }
}

/// Suffix-at-label-boundary membership: `host` or any of its dot-parents
/// is looked up in the set, so `sub.silly.com` is within `{silly.com}`.
fn host_in_set(set: &HashSet<String>, host: &str) -> bool {
    utils::domain_suffixes(host)
        .into_iter()
        .any(|suffix| set.contains(suffix))
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct UrlFilterBreakdown {
        parts: Vec<FilterPart>,
        options: FilterOptions,
        applicable_domains: Vec<String>,
        exception_domains: Vec<String>,
        applicable_referers: Vec<String>,
        exception_referers: Vec<String>,
        is_exception: bool,
    }

    fn sorted(set: &HashSet<String>) -> Vec<String> {
        let mut hosts: Vec<String> = set.iter().cloned().collect();
        hosts.sort();
        hosts
    }

    impl From<&UrlFilter> for UrlFilterBreakdown {
        fn from(filter: &UrlFilter) -> UrlFilterBreakdown {
            UrlFilterBreakdown {
                parts: filter.parts.clone(),
                options: filter.options,
                applicable_domains: sorted(&filter.applicable_domains),
                exception_domains: sorted(&filter.exception_domains),
                applicable_referers: sorted(&filter.applicable_referers),
                exception_referers: sorted(&filter.exception_referers),
                is_exception: filter.is_exception,
            }
        }
    }

    fn default_breakdown() -> UrlFilterBreakdown {
        UrlFilterBreakdown {
            parts: vec![],
            options: FilterOptions::empty(),
            applicable_domains: vec![],
            exception_domains: vec![],
            applicable_referers: vec![],
            exception_referers: vec![],
            is_exception: false,
        }
    }

    fn literal(value: &str) -> FilterPart {
        FilterPart::Literal {
            value: value.to_string(),
            match_case: false,
        }
    }

    #[test]
    fn parses_plain_pattern() {
        let filter = UrlFilter::parse("ads", 0).unwrap();
        let mut expected = default_breakdown();
        expected.parts = vec![literal("ads")];
        assert_eq!(expected, UrlFilterBreakdown::from(&filter));
        assert_eq!(filter.original_rule.as_deref(), Some("ads"));
        assert_eq!(filter.category_id, 0);
    }

    #[test]
    fn parses_hostname_anchor_with_program() {
        let filter =
            UrlFilter::parse("||silly.com^stoopid^url^*1$xmlhttprequest,script,~third-party", 7)
                .unwrap();
        let mut expected = default_breakdown();
        expected.parts = vec![
            FilterPart::AnchoredDomain("silly.com".to_string()),
            FilterPart::Separator,
            literal("stoopid"),
            FilterPart::Separator,
            literal("url"),
            FilterPart::Separator,
            FilterPart::Wildcard,
            literal("1"),
        ];
        expected.options = FilterOptions::FROM_XMLHTTPREQUEST
            | FilterOptions::FROM_SCRIPT
            | FilterOptions::NOT_THIRD_PARTY;
        expected.applicable_domains = vec!["silly.com".to_string()];
        assert_eq!(expected, UrlFilterBreakdown::from(&filter));
        assert_eq!(filter.category_id, 7);
    }

    #[test]
    fn hostname_anchor_strips_www() {
        let filter = UrlFilter::parse("||www.example.com^", 0).unwrap();
        assert_eq!(
            filter.parts[0],
            FilterPart::AnchoredDomain("example.com".to_string())
        );
        assert!(filter.applicable_domains.contains("example.com"));
    }

    #[test]
    fn parses_address_anchor() {
        let filter = UrlFilter::parse("|http://baddomain.com/banner|", 0).unwrap();
        let mut expected = default_breakdown();
        expected.parts = vec![FilterPart::AnchoredAddress {
            address: "http://baddomain.com/banner".to_string(),
            match_case: false,
        }];
        expected.applicable_domains = vec!["baddomain.com".to_string()];
        assert_eq!(expected, UrlFilterBreakdown::from(&filter));
    }

    #[test]
    fn address_anchor_without_terminator_stops_at_anchor_end() {
        let filter = UrlFilter::parse("|http", 0).unwrap();
        let mut expected = default_breakdown();
        expected.parts = vec![FilterPart::AnchoredAddress {
            address: "http".to_string(),
            match_case: false,
        }];
        assert_eq!(expected, UrlFilterBreakdown::from(&filter));
    }

    #[test]
    fn wildcard_and_separator_flush_literals() {
        let filter = UrlFilter::parse("a*b^c", 0).unwrap();
        let mut expected = default_breakdown();
        expected.parts = vec![
            literal("a"),
            FilterPart::Wildcard,
            literal("b"),
            FilterPart::Separator,
            literal("c"),
        ];
        assert_eq!(expected, UrlFilterBreakdown::from(&filter));
    }

    #[test]
    fn parses_exception_prefix() {
        let filter = UrlFilter::parse("@@||good.com^", 0).unwrap();
        assert!(filter.is_exception);
        assert!(filter.applicable_domains.contains("good.com"));
    }

    #[test]
    fn empty_body_with_options_compiles_to_zero_fragments() {
        let filter = UrlFilter::parse("@@$referer=pinterest.com", 0).unwrap();
        assert!(filter.parts.is_empty());
        assert!(filter.is_exception);
        assert!(filter.applicable_referers.contains("pinterest.com"));
    }

    #[test]
    fn each_option_token_sets_exactly_its_bit() {
        let table: &[(&str, FilterOptions)] = &[
            ("script", FilterOptions::FROM_SCRIPT),
            ("~script", FilterOptions::NOT_SCRIPT),
            ("image", FilterOptions::FROM_IMAGE),
            ("~image", FilterOptions::NOT_IMAGE),
            ("stylesheet", FilterOptions::FROM_STYLESHEET),
            ("~stylesheet", FilterOptions::NOT_STYLESHEET),
            ("object", FilterOptions::FROM_OBJECT),
            ("~object", FilterOptions::NOT_OBJECT),
            ("subdocument", FilterOptions::FROM_SUBDOCUMENT),
            ("~subdocument", FilterOptions::NOT_SUBDOCUMENT),
            ("xmlhttprequest", FilterOptions::FROM_XMLHTTPREQUEST),
            ("~xmlhttprequest", FilterOptions::NOT_XMLHTTPREQUEST),
            ("websocket", FilterOptions::FROM_WEBSOCKET),
            ("~websocket", FilterOptions::NOT_WEBSOCKET),
            ("object-subrequest", FilterOptions::FROM_OBJECT_SUBREQUEST),
            ("~object-subrequest", FilterOptions::NOT_OBJECT_SUBREQUEST),
            ("document", FilterOptions::FROM_DOCUMENT),
            ("~document", FilterOptions::NOT_DOCUMENT),
            ("elemhide", FilterOptions::FROM_ELEMHIDE),
            ("~elemhide", FilterOptions::NOT_ELEMHIDE),
            ("other", FilterOptions::FROM_OTHER),
            ("~other", FilterOptions::NOT_OTHER),
            ("media", FilterOptions::FROM_MEDIA),
            ("~media", FilterOptions::NOT_MEDIA),
            ("font", FilterOptions::FROM_FONT),
            ("~font", FilterOptions::NOT_FONT),
            ("ping", FilterOptions::FROM_PING),
            ("~ping", FilterOptions::NOT_PING),
            ("popup", FilterOptions::POPUP),
            ("~popup", FilterOptions::NOT_POPUP),
            ("third-party", FilterOptions::THIRD_PARTY),
            ("~third-party", FilterOptions::NOT_THIRD_PARTY),
            ("donottrack", FilterOptions::DONOTTRACK),
            ("generichide", FilterOptions::GENERICHIDE),
            ("genericblock", FilterOptions::GENERICBLOCK),
            ("collapse", FilterOptions::COLLAPSE),
            ("~collapse", FilterOptions::NOT_COLLAPSE),
            ("matchcase", FilterOptions::MATCH_CASE),
        ];
        for (token, flag) in table {
            let filter = UrlFilter::parse(&format!("ads${}", token), 0).unwrap();
            assert_eq!(filter.options, *flag, "token {}", token);
        }
    }

    #[test]
    fn unrecognised_options_are_ignored() {
        let filter = UrlFilter::parse("ads$frobnicate,script,~nonsense", 0).unwrap();
        assert_eq!(filter.options, FilterOptions::FROM_SCRIPT);
    }

    #[test]
    fn parses_domain_and_referer_lists() {
        let filter =
            UrlFilter::parse("r$domain=a.com|b.com|~c.com,referer=d.com|~e.com", 0).unwrap();
        let mut expected = default_breakdown();
        expected.parts = vec![literal("r")];
        expected.applicable_domains = vec!["a.com".to_string(), "b.com".to_string()];
        expected.exception_domains = vec!["c.com".to_string()];
        expected.applicable_referers = vec!["d.com".to_string()];
        expected.exception_referers = vec!["e.com".to_string()];
        assert_eq!(expected, UrlFilterBreakdown::from(&filter));
    }

    #[test]
    fn privileged_option_detection_is_positional() {
        // Any token of the right shape is consumed as a host list, not
        // looked up in the option table.
        let filter = UrlFilter::parse("ads$dummys=a.com", 0).unwrap();
        assert!(filter.applicable_domains.contains("a.com"));
        assert_eq!(filter.options, FilterOptions::empty());
    }

    #[test]
    fn matchcase_keeps_literal_case() {
        let filter = UrlFilter::parse("BanNer$matchcase", 0).unwrap();
        assert_eq!(
            filter.parts,
            vec![FilterPart::Literal {
                value: "BanNer".to_string(),
                match_case: true,
            }]
        );

        let folded = UrlFilter::parse("BanNer", 0).unwrap();
        assert_eq!(
            folded.parts,
            vec![FilterPart::Literal {
                value: "banner".to_string(),
                match_case: false,
            }]
        );
    }

    #[test]
    fn rejects_bare_anchors() {
        assert_eq!(UrlFilter::parse("||", 0).err(), Some(FilterError::Malformed));
        assert_eq!(
            UrlFilter::parse("||^ads", 0).err(),
            Some(FilterError::Malformed)
        );
        assert_eq!(UrlFilter::parse("|", 0).err(), Some(FilterError::Malformed));
    }

    #[test]
    fn trim_excess_data_clears_sets_and_source() {
        let mut filter = UrlFilter::parse("||silly.com^$domain=a.com", 0).unwrap();
        filter.trim_excess_data();
        assert_eq!(filter.original_rule, None);
        assert!(filter.applicable_domains.is_empty());
        assert!(filter.exception_domains.is_empty());
        assert_eq!(
            filter.parts[0],
            FilterPart::AnchoredDomain("silly.com".to_string())
        );
    }
}
