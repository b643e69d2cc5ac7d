//! The fragment match program: an ordered sequence of match fragments
//! evaluated left to right against the absolute URI. A scan cursor starts
//! at 0; every fragment either advances it or fails the program.

use crate::request::Request;
use crate::utils;

/// Characters that terminate the captured host/address of a `||` or `|`
/// prefix.
pub const ANCHOR_END_CHARS: &[u8] = b"/:?=&*^";

/// Characters a `^` separator consumes up to and including.
pub const SEPARATOR_CHARS: &[u8] = b"/:?=&";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPart {
    /// `||host` — request host must equal the anchor host or end with it
    /// at a label boundary; advances past `scheme://host`.
    AnchoredDomain(String),
    /// `|address` — absolute URI must begin with the address.
    AnchoredAddress { address: String, match_case: bool },
    /// Plain text that must appear at or after the cursor.
    Literal { value: String, match_case: bool },
    /// `*` — consumes at least one character.
    Wildcard,
    /// `^` — consumes up to and including the next separator character.
    Separator,
}

impl FilterPart {
    /// New cursor position after this fragment, or `None` on failure.
    fn advance(&self, request: &Request, cursor: usize) -> Option<usize> {
        match self {
            FilterPart::AnchoredDomain(host) => {
                if utils::host_within(request.hostname(), host) {
                    Some(request.hostname_end())
                } else {
                    None
                }
            }
            FilterPart::AnchoredAddress {
                address,
                match_case,
            } => {
                if utils::fast_starts_with(request.matching_url(*match_case), address) {
                    Some(address.len())
                } else {
                    None
                }
            }
            FilterPart::Literal { value, match_case } => {
                utils::find_from(request.matching_url(*match_case), value, cursor)
                    .map(|i| i + value.len())
            }
            FilterPart::Wildcard => {
                if cursor < request.url().len() {
                    Some(cursor + 1)
                } else {
                    None
                }
            }
            FilterPart::Separator => {
                utils::find_first_of(request.url(), SEPARATOR_CHARS, cursor).map(|i| i + 1)
            }
        }
    }
}

/// Runs the program. A zero-fragment program matches every URI.
pub fn check_parts(parts: &[FilterPart], request: &Request) -> bool {
    let mut cursor = 0;
    for part in parts {
        match part.advance(request, cursor) {
            Some(next) => cursor = next,
            None => return false,
        }
    }
    true
}
