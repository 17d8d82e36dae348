use super::{run_with_runner, DelegateInvocation};
use crate::error::Result;
use crate::exec::{CommandExecutor, ConfigMapper};
use crate::operators::{Operator, OperatorFactory};
use crate::task::{OperatorContext, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Imports `module.function` or `module.Class.method` from the project
/// directory, calls it with the parameters whose names match its signature and
/// writes a dict return value back.
const PYTHON_RUNNER: &str = r#"
import importlib, importlib.util, inspect, json, os, sys
with open(os.environ["GKE_OPERATOR_PARAMS_FILE"]) as f:
    params = json.load(f)
sys.path.insert(0, os.getcwd())
command = sys.argv[1]
parts = command.split(".")
target = None
for i in range(len(parts) - 1, 0, -1):
    module = ".".join(parts[:i])
    try:
        found = importlib.util.find_spec(module)
    except ModuleNotFoundError:
        found = None
    if found is None:
        continue
    target = importlib.import_module(module)
    for name in parts[i:]:
        attr = getattr(target, name)
        target = attr() if inspect.isclass(attr) else attr
    break
if target is None or not callable(target):
    raise SystemExit("cannot resolve a callable from " + command)
accepted = inspect.signature(target).parameters
result = target(**{k: params[k] for k in accepted if k in params})
with open(os.environ["GKE_OPERATOR_OUTPUT_FILE"], "w") as f:
    json.dump(result if isinstance(result, dict) else None, f)
"#;

pub struct PythonOperatorFactory {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
}

impl PythonOperatorFactory {
    pub fn new(exec: Arc<dyn CommandExecutor>, mapper: ConfigMapper) -> Self {
        Self { exec, mapper }
    }
}

impl OperatorFactory for PythonOperatorFactory {
    fn operator_type(&self) -> &str {
        "py"
    }

    fn new_operator(&self, context: OperatorContext) -> Box<dyn Operator> {
        Box::new(PythonOperator {
            exec: Arc::clone(&self.exec),
            mapper: self.mapper.clone(),
            context,
        })
    }
}

pub struct PythonOperator {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
    context: OperatorContext,
}

#[async_trait]
impl Operator for PythonOperator {
    async fn run(&self) -> Result<TaskResult> {
        let invocation = DelegateInvocation::prepare(&self.context)?;
        let python: String = invocation.config.get_or("python", "python3".to_string())?;
        info!("🐍 py>: {}", invocation.command);
        run_with_runner(
            self.exec.as_ref(),
            &self.mapper,
            invocation,
            &python,
            &["-c", PYTHON_RUNNER],
        )
        .await
    }
}
