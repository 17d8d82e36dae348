use crate::task::TaskResult;
use crate::error::Result;
use async_trait::async_trait;

/// A pluggable unit of work the engine executes as one task
#[async_trait]
pub trait Operator: Send + Sync {
    /// Run the task to completion and produce its result
    async fn run(&self) -> Result<TaskResult>;
}
