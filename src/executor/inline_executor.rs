use super::ExecutionContext;
use super::Job;
use crate::DispatchError;

/// Runs every job immediately on the submitting thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl ExecutionContext for InlineExecutor {
    fn name(&self) -> &str {
        "inline"
    }

    fn execute(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError> {
        job();
        Ok(())
    }

    fn execute_and_wait(
        &self,
        job: Job,
    ) -> std::result::Result<(), DispatchError> {
        self.execute(job)
    }
}
