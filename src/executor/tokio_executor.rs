use crossbeam_channel::Receiver;
use crossbeam_channel::TryRecvError;
use tokio::runtime::Handle;
use tracing::warn;

use super::ExecutionContext;
use super::Job;
use crate::DispatchError;

/// Runs jobs on the blocking thread pool of a tokio runtime.
///
/// Listener callbacks are synchronous, so they go through `spawn_blocking`
/// instead of occupying an async worker. Separate jobs may run in parallel.
///
/// Once the runtime has shut down, submissions fail with
/// [`DispatchError::ContextClosed`].
#[derive(Debug, Clone)]
pub struct TokioExecutor {
    name: String,
    handle: Handle,
    /// Disconnects when the runtime drops its tasks on shutdown
    alive: Receiver<()>,
}

impl TokioExecutor {
    pub fn new(handle: Handle) -> Self {
        let (token, alive) = crossbeam_channel::bounded::<()>(1);
        // Parked forever; the runtime drops it, and the token with it, on shutdown
        let _ = handle.spawn(async move {
            let _token = token;
            std::future::pending::<()>().await
        });

        Self {
            name: "tokio".to_string(),
            handle,
            alive,
        }
    }

    /// Binds to the runtime the caller is currently running in, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    pub fn with_name(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.alive.try_recv(), Err(TryRecvError::Disconnected))
    }
}

impl ExecutionContext for TokioExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError> {
        if !self.is_running() {
            warn!(context = %self.name, "Runtime is shut down; job rejected");
            return Err(DispatchError::ContextClosed {
                context: self.name.clone(),
            });
        }

        // A shutdown racing with this call still drops the job; a waiting
        // caller then observes JobAbandoned.
        let _ = self.handle.spawn_blocking(job);
        Ok(())
    }
}
