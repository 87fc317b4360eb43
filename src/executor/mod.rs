//! Execution contexts for listener notification
//!
//! The caller of `process` picks where its listeners run: inline on the
//! calling thread, on a dedicated serial worker thread, or on a tokio
//! runtime's blocking pool. The dispatcher hands the context one job per
//! notification round and, unless configured for fire-and-forget delivery,
//! waits for that job to finish.

mod inline_executor;
mod thread_executor;
mod tokio_executor;
pub use inline_executor::*;
pub use thread_executor::*;
pub use tokio_executor::*;


use tracing::trace;

use crate::DispatchError;

/// Unit of work submitted to an [`ExecutionContext`]
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub trait ExecutionContext: Send + Sync {
    /// Human readable context name, used in logs and errors
    fn name(&self) -> &str;

    /// Submits `job` without waiting for it.
    fn execute(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError>;

    /// Submits `job` and blocks until it has run on the context.
    fn execute_and_wait(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError> {
        blocking_handoff(self, job)
    }
}

/// Wraps `job` with a completion signal, submits it and waits for the signal.
///
/// A job that panics drops the signal sender while unwinding, which the waiter
/// observes as [`DispatchError::JobAbandoned`].
pub(crate) fn blocking_handoff<C>(
    context: &C,
    job: Job,
) -> std::result::Result<(), DispatchError>
where
    C: ExecutionContext + ?Sized,
{
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
    context.execute(Box::new(move || {
        job();
        let _ = done_tx.send(());
    }))?;

    done_rx.recv().map_err(|_| DispatchError::JobAbandoned {
        context: context.name().to_string(),
    })?;
    trace!(context = context.name(), "Blocking handoff completed");
    Ok(())
}
