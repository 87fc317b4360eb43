//! Bounded memo of recognition results keyed by input.
//!
//! The cache is deliberately unaware of recognition settings: a hit returns
//! whatever was computed for that input, even if settings changed since.

mod result_cache;
pub use result_cache::*;
