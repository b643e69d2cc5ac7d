//! Rule line classification. A raw line is routed to the URL filter or
//! element-hide parser; comments, list headers and empty lines are
//! rejected with a typed failure so ingest can count them.

use itertools::{Either, Itertools};

use crate::filters::html::HtmlFilter;
use crate::filters::url::{FilterError, UrlFilter};

/// A successfully parsed rule line.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Url(UrlFilter),
    Html(HtmlFilter),
}

impl Filter {
    pub fn is_exception(&self) -> bool {
        match self {
            Filter::Url(filter) => filter.is_exception,
            Filter::Html(filter) => filter.is_exception,
        }
    }

    pub fn category_id(&self) -> i16 {
        match self {
            Filter::Url(filter) => filter.category_id,
            Filter::Html(filter) => filter.category_id,
        }
    }

    pub fn original_rule(&self) -> Option<&str> {
        match self {
            Filter::Url(filter) => filter.original_rule.as_deref(),
            Filter::Html(filter) => filter.original_rule.as_deref(),
        }
    }
}

/// Parses one line of ABP filter text.
///
/// Classification order: a line containing `##` (or, failing that, `#@`)
/// is an element-hide rule; everything else is a URL filter, an exception
/// iff it begins with `@@`.
pub fn parse(line: &str, category_id: i16) -> Result<Filter, FilterError> {
    let rule = line.trim();
    if rule.is_empty() {
        return Err(FilterError::Empty);
    }
    if rule.starts_with('!') || rule.starts_with("[Adblock") {
        return Err(FilterError::Comment);
    }
    if rule.contains("##") || rule.contains("#@") {
        HtmlFilter::parse(rule, category_id).map(Filter::Html)
    } else {
        UrlFilter::parse(rule, category_id).map(Filter::Url)
    }
}

/// Bulk helper: classifies and parses every line, partitioning the
/// successes. Failed lines are simply dropped; callers needing the
/// failure count use [`parse`] directly, as the store's ingest does.
pub fn parse_filters<S: AsRef<str>>(
    lines: &[S],
    category_id: i16,
) -> (Vec<UrlFilter>, Vec<HtmlFilter>) {
    lines
        .iter()
        .filter_map(|line| parse(line.as_ref(), category_id).ok())
        .partition_map(|filter| match filter {
            Filter::Url(url) => Either::Left(url),
            Filter::Html(html) => Either::Right(html),
        })
}
