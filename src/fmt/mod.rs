//! Rendering for diagnostics
//!
//! `Display` implementations for terms, patterns, types and combinator
//! terms. They are used in error messages and log output; nothing parses
//! them back.

pub mod combinator;
pub mod term;
pub mod ty;
