//! Compiled filter objects: URL filters with their fragment match
//! programs, and element-hide filters.

pub mod fragment;
pub mod html;
pub mod url;
