//! Memoizing, concurrency-safe dispatcher in front of a stateful recognition
//! algorithm.
//!
//! - [`ResultCache`]: bounded LRU memo of results per input
//! - [`SettingsVersion`]: lazy, apply-once-per-change settings tracking
//! - [`ListenerRegistry`]: handle-based observers with snapshot delivery
//! - [`RecognitionDispatcher`]: cache lookup, serialized compute on miss,
//!   fan-out on a caller-chosen [`ExecutionContext`]

mod algorithm;
mod cache;
mod config;
mod dispatcher;
mod errors;
mod executor;
mod listener;
mod settings;
mod type_config;

pub mod constants;
pub mod metrics;

pub use algorithm::*;
pub use cache::*;
pub use config::*;
pub use dispatcher::*;
pub use errors::*;
pub use executor::*;
pub use listener::*;
pub use settings::*;
pub use type_config::*;

//-----------------------------------------------------------
// Test utils
