//! Per-resource endpoint wrappers.
//!
//! Thin callers of the request pipeline: each contributes a URL and a
//! payload shape, nothing else.

pub mod channels;
pub mod streams;
