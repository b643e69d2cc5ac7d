//! An Adblock Plus style request filtering engine.
//!
//! Rule lines in ABP filter syntax are compiled into executable match
//! programs ([`UrlFilter`]) or categorised element-hide rules
//! ([`HtmlFilter`]), indexed per applicable domain in a SQLite-backed
//! [`FilterStore`], and evaluated against live requests (absolute URI plus
//! selected headers) with [`UrlFilter::matches`].
//!
//! Lookups fan out over the dot-suffix chain of the queried host and are
//! memoised for a short interval; rules are re-parsed from their stored
//! source text on every cache miss, which measures faster than any
//! general-purpose serialisation for this grammar.

pub mod cache;
pub mod filters;
pub mod parser;
pub mod request;
pub mod store;
pub mod utils;

pub use crate::filters::html::HtmlFilter;
pub use crate::filters::url::{FilterError, FilterOptions, UrlFilter};
pub use crate::parser::{parse, Filter};
pub use crate::request::{Headers, Request};
pub use crate::store::{FilterStore, StoreError, StoreOptions, GLOBAL_DOMAIN};
