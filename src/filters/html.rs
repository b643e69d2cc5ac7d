//! Element-hide filters. These are parsed and categorised so they can be
//! stored and handed to an HTML backend, but the request matcher never
//! evaluates them.

use std::collections::HashSet;

use crate::filters::url::FilterError;

/// A parsed element-hide rule: `domains##selector` or `domains#@#selector`.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlFilter {
    /// The CSS selector payload, stored verbatim.
    pub css_selector: String,
    pub applicable_domains: HashSet<String>,
    pub exception_domains: HashSet<String>,
    pub is_exception: bool,
    pub category_id: i16,
    pub original_rule: Option<String>,
}

impl HtmlFilter {
    /// Parses a single (pre-trimmed) element-hide line. The last `##`
    /// wins; failing that, the last `#@` marks an exception whose payload
    /// begins three bytes after the match.
    pub fn parse(line: &str, category_id: i16) -> Result<HtmlFilter, FilterError> {
        let (sentinel_index, sentinel_len, is_exception) = match line.rfind("##") {
            Some(index) => (index, 2, false),
            None => match line.rfind("#@") {
                Some(index) => (index, 3, true),
                None => return Err(FilterError::Malformed),
            },
        };

        let css_selector = line
            .get(sentinel_index + sentinel_len..)
            .ok_or(FilterError::Malformed)?;

        #[cfg(feature = "strict-selectors")]
        if css_selector.trim().is_empty() {
            return Err(FilterError::EmptySelector);
        }

        let mut applicable_domains = HashSet::new();
        let mut exception_domains = HashSet::new();
        for entry in line[..sentinel_index].split(',') {
            if let Some(host) = entry.strip_prefix('~') {
                if !host.is_empty() {
                    exception_domains.insert(host.to_ascii_lowercase());
                }
            } else if !entry.is_empty() {
                applicable_domains.insert(entry.to_ascii_lowercase());
            }
        }

        Ok(HtmlFilter {
            css_selector: css_selector.to_string(),
            applicable_domains,
            exception_domains,
            is_exception,
            category_id,
            original_rule: Some(line.to_string()),
        })
    }
}
