//! Result observers
//!
//! Listeners are identified by the [`ListenerHandle`] returned on
//! registration, never by comparing listener values.

mod listener_registry;
pub use listener_registry::*;


use crate::alias::IOF;
use crate::Recognition;
use crate::RecognitionDispatcher;
use crate::TypeConfig;

pub trait RecognitionListener<T>: Send + Sync + 'static
where
    T: TypeConfig,
{
    /// Called once per `process` call that reaches notification, on the
    /// execution context chosen by that call.
    fn on_result(
        &self,
        source: &RecognitionDispatcher<T>,
        input: &IOF<T>,
        recognition: &Recognition<T>,
    );
}

impl<T, F> RecognitionListener<T> for F
where
    T: TypeConfig,
    F: Fn(&RecognitionDispatcher<T>, &IOF<T>, &Recognition<T>) + Send + Sync + 'static,
{
    fn on_result(
        &self,
        source: &RecognitionDispatcher<T>,
        input: &IOF<T>,
        recognition: &Recognition<T>,
    ) {
        self(source, input, recognition)
    }
}
