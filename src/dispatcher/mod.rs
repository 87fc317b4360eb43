//! Memoizing recognition dispatcher
//!
//! Per `process` call:
//!
//! ```text
//! Idle -> Lookup --hit--> Notify -> Done
//!            |
//!            +--miss--> Exclusive (lock algorithm)
//!                         -> lazily build algorithm
//!                         -> apply pending settings (if dirty)
//!                         -> process(input)
//!                         -> Store (successful results only)
//!                         -> Notify -> Done
//! ```
//!
//! Cache hits never take the algorithm lock. Settings changes never
//! invalidate cached results: a hit is trusted regardless of the settings in
//! force when it was computed.

mod builder;
mod recognition_dispatcher;
pub use builder::*;
pub use recognition_dispatcher::*;


use std::sync::Arc;

use crate::alias::OOF;
use crate::ProcessError;

/// What listeners receive for one processed input
pub type Recognition<T> = std::result::Result<Arc<OOF<T>>, Arc<ProcessError>>;

/// How a `process` call was served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Served from the result cache; the algorithm was not touched
    CacheHit,
    /// Computed by the algorithm and cached
    Computed,
    /// The algorithm reported a failure; nothing was cached
    Failed,
}
