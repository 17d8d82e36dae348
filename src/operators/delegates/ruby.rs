use super::{run_with_runner, DelegateInvocation};
use crate::error::Result;
use crate::exec::{CommandExecutor, ConfigMapper};
use crate::operators::{Operator, OperatorFactory};
use crate::task::{OperatorContext, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Loads the parameters, resolves `Class.method` (instantiating the class) or a
/// top-level `method`, passes matching keyword arguments and writes a Hash
/// return value back.
const RUBY_RUNNER: &str = r#"
require 'json'
params = JSON.parse(File.read(ENV.fetch('GKE_OPERATOR_PARAMS_FILE')))
require File.expand_path(params['require']) if params['require']
command = ARGV.fetch(0)
idx = command.rindex('.')
if idx
  receiver = Object.const_get(command[0...idx]).new
  method_name = command[(idx + 1)..-1]
else
  receiver = self
  method_name = command
end
callable = receiver.method(method_name)
kwargs = {}
callable.parameters.each do |type, name|
  next unless [:key, :keyreq].include?(type)
  kwargs[name] = params[name.to_s] if params.key?(name.to_s)
end
result = kwargs.empty? ? callable.call : callable.call(**kwargs)
File.write(ENV.fetch('GKE_OPERATOR_OUTPUT_FILE'), JSON.generate(result.is_a?(Hash) ? result : nil))
"#;

pub struct RubyOperatorFactory {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
}

impl RubyOperatorFactory {
    pub fn new(exec: Arc<dyn CommandExecutor>, mapper: ConfigMapper) -> Self {
        Self { exec, mapper }
    }
}

impl OperatorFactory for RubyOperatorFactory {
    fn operator_type(&self) -> &str {
        "rb"
    }

    fn new_operator(&self, context: OperatorContext) -> Box<dyn Operator> {
        Box::new(RubyOperator {
            exec: Arc::clone(&self.exec),
            mapper: self.mapper.clone(),
            context,
        })
    }
}

pub struct RubyOperator {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
    context: OperatorContext,
}

#[async_trait]
impl Operator for RubyOperator {
    async fn run(&self) -> Result<TaskResult> {
        let invocation = DelegateInvocation::prepare(&self.context)?;
        let ruby: String = invocation.config.get_or("ruby", "ruby".to_string())?;
        info!("💎 rb>: {}", invocation.command);
        run_with_runner(
            self.exec.as_ref(),
            &self.mapper,
            invocation,
            &ruby,
            &["-e", RUBY_RUNNER],
        )
        .await
    }
}
