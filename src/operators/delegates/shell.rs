use super::DelegateInvocation;
use crate::error::Result;
use crate::exec::{CommandExecutor, CommandSpec};
use crate::operators::{Operator, OperatorFactory};
use crate::task::{OperatorContext, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct ShellOperatorFactory {
    exec: Arc<dyn CommandExecutor>,
}

impl ShellOperatorFactory {
    pub fn new(exec: Arc<dyn CommandExecutor>) -> Self {
        Self { exec }
    }
}

impl OperatorFactory for ShellOperatorFactory {
    fn operator_type(&self) -> &str {
        "sh"
    }

    fn new_operator(&self, context: OperatorContext) -> Box<dyn Operator> {
        Box::new(ShellOperator {
            exec: Arc::clone(&self.exec),
            context,
        })
    }
}

/// Runs the command string with `bash -c`
pub struct ShellOperator {
    exec: Arc<dyn CommandExecutor>,
    context: OperatorContext,
}

impl ShellOperator {
    pub(crate) fn command_spec(&self) -> Result<CommandSpec> {
        let invocation = DelegateInvocation::prepare(&self.context)?;
        Ok(CommandSpec::new("bash")
            .arg("-c")
            .arg(invocation.command)
            .envs(&invocation.env)
            .current_dir(invocation.working_dir))
    }
}

#[async_trait]
impl Operator for ShellOperator {
    async fn run(&self) -> Result<TaskResult> {
        let spec = self.command_spec()?;
        info!("🐚 sh>: {}", spec.args[1]);
        self.exec.execute(&spec).await?;
        Ok(TaskResult::empty())
    }
}
