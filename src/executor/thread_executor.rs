use std::panic;
use std::panic::AssertUnwindSafe;
use std::thread;
use std::thread::JoinHandle;
use std::thread::ThreadId;

use crossbeam_channel::unbounded;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::debug;
use tracing::warn;

use super::blocking_handoff;
use super::ExecutionContext;
use super::Job;
use crate::DispatchError;
use crate::NotifyConfig;

/// Serial execution context backed by one named worker thread.
///
/// Jobs run one at a time in submission order. The worker keeps running when
/// a job panics. Dropping the executor (or calling [`Self::shutdown`]) lets
/// already queued jobs finish and joins the worker.
pub struct ThreadExecutor {
    name: String,
    /// None once shut down
    sender: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
}

impl std::fmt::Debug for ThreadExecutor {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ThreadExecutor")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

impl ThreadExecutor {
    pub fn new(name: impl Into<String>) -> std::result::Result<Self, DispatchError> {
        let name = name.into();
        let (sender, receiver) = unbounded::<Job>();

        let thread_name = name.clone();
        let worker = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                debug!(context = %thread_name, "Execution context started");

                // Ends once every sender is dropped and the queue is drained
                for job in receiver.iter() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        warn!(context = %thread_name, "Job panicked on execution context");
                    }
                }

                debug!(context = %thread_name, "Execution context stopped");
            })
            .map_err(|source| DispatchError::SpawnFailed {
                context: name.clone(),
                source,
            })?;

        let worker_id = worker.thread().id();
        Ok(Self {
            name,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            worker_id,
        })
    }

    pub fn from_config(config: &NotifyConfig) -> std::result::Result<Self, DispatchError> {
        Self::new(config.thread_name.clone())
    }

    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
    }

    fn on_worker_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    /// Stops accepting jobs, drains the queue and joins the worker.
    ///
    /// Calling this from a job running on the worker only closes the queue.
    pub fn shutdown(&self) {
        // Dropping the sender ends the worker loop after the queue drains
        let sender = self.sender.lock().take();
        drop(sender);

        if self.on_worker_thread() {
            return;
        }
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                warn!(context = %self.name, "Execution context worker exited abnormally");
            }
        }
    }
}

impl ExecutionContext for ThreadExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError> {
        let closed = || DispatchError::ContextClosed {
            context: self.name.clone(),
        };

        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(job).map_err(|_| closed()),
            None => Err(closed()),
        }
    }

    /// Waiting on the worker from the worker itself would never return, so
    /// such a job runs in place.
    fn execute_and_wait(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError> {
        if self.on_worker_thread() {
            job();
            return Ok(());
        }
        blocking_handoff(self, job)
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
