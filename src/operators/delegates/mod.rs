//! Delegate executors for the nested sub-command
//!
//! These run the `sh>` / `rb>` / `py>` body of a task once the GKE operator
//! has rewritten its config. They read the resolved command string from
//! `_command_value`, export the `_env` mapping and the injected kube-config
//! path, and run in the project directory.

pub mod python;
pub mod ruby;
pub mod shell;

pub use python::{PythonOperator, PythonOperatorFactory};
pub use ruby::{RubyOperator, RubyOperatorFactory};
pub use shell::{ShellOperator, ShellOperatorFactory};

use crate::error::Result;
use crate::exec::{CommandExecutor, CommandSpec, ConfigMapper};
use crate::task::{OperatorContext, TaskConfig, TaskResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Resolved command string key in a child task config.
pub const COMMAND_VALUE_KEY: &str = "_command_value";
/// Resolved command type key (`sh`, `rb`, `py`) in a child task config.
pub const COMMAND_TYPE_KEY: &str = "_command_type";

pub const PARAMS_FILE_VAR: &str = "GKE_OPERATOR_PARAMS_FILE";
pub const OUTPUT_FILE_VAR: &str = "GKE_OPERATOR_OUTPUT_FILE";

/// What every delegate needs before it can build its process invocation.
#[derive(Debug, Clone)]
pub(crate) struct DelegateInvocation {
    pub command: String,
    pub env: HashMap<String, String>,
    pub working_dir: PathBuf,
    pub config: TaskConfig,
}

impl DelegateInvocation {
    pub fn prepare(context: &OperatorContext) -> Result<Self> {
        let config = context.task_request().config.clone();
        let command: String = config.get(COMMAND_VALUE_KEY)?;

        let mut env = HashMap::new();
        for (key, value) in config.get_nested_or_empty("_env")?.iter() {
            match value {
                Value::String(s) => {
                    env.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    env.insert(key.clone(), n.to_string());
                }
                Value::Bool(b) => {
                    env.insert(key.clone(), b.to_string());
                }
                _ => debug!("Skipping non-scalar _env entry: {}", key),
            }
        }

        let kubernetes = config.get_nested_or_empty("kubernetes")?;
        if let Some(path) = kubernetes.get_optional::<String>("kube_config_path")? {
            env.insert("KUBECONFIG".to_string(), path);
        }

        Ok(Self {
            command,
            env,
            working_dir: context.project_path().to_path_buf(),
            config,
        })
    }
}

/// Run an interpreter with a fixed runner script. Parameters go in through a
/// JSON file, the callable's return value comes back through another.
pub(crate) async fn run_with_runner(
    exec: &dyn CommandExecutor,
    mapper: &ConfigMapper,
    invocation: DelegateInvocation,
    program: &str,
    runner_args: &[&str],
) -> Result<TaskResult> {
    let scratch = tempfile::tempdir()?;
    let params_file = scratch.path().join("params.json");
    let output_file = scratch.path().join("output.json");
    mapper.write_params(&params_file, &invocation.config)?;

    let spec = CommandSpec::new(program)
        .args(runner_args.iter().copied())
        .arg(invocation.command)
        .envs(&invocation.env)
        .env(PARAMS_FILE_VAR, params_file.to_string_lossy())
        .env(OUTPUT_FILE_VAR, output_file.to_string_lossy())
        .current_dir(invocation.working_dir);

    exec.execute(&spec).await?;
    mapper.read_result(&output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskRequest;
    use serde_json::json;

    fn context(config: Value) -> OperatorContext {
        let request: TaskRequest = serde_json::from_value(json!({
            "site_id": 0,
            "project_id": 1,
            "workflow_name": "wf",
            "task_id": 1,
            "attempt_id": 1,
            "session_id": 1,
            "task_name": "+wf+t",
            "lock_id": "l",
            "session_uuid": "8c5d3f3e-2b8c-4a4f-9a57-0d3c2b1f9e11",
            "session_time": "2024-05-01T00:00:00Z",
            "created_at": "2024-05-01T00:00:00Z",
            "config": config
        }))
        .unwrap();
        OperatorContext::new("/srv/project", request)
    }

    #[test]
    fn test_prepare_collects_env_and_kubeconfig() {
        let ctx = context(json!({
            "_command_value": "kubectl get po",
            "_env": {"STAGE": "prod", "REPLICAS": 3, "DEBUG": false, "NESTED": {"a": 1}},
            "kubernetes": {"name": "test", "kube_config_path": "/home/u/.kube/config"}
        }));
        let invocation = DelegateInvocation::prepare(&ctx).unwrap();

        assert_eq!(invocation.command, "kubectl get po");
        assert_eq!(invocation.env.get("STAGE").unwrap(), "prod");
        assert_eq!(invocation.env.get("REPLICAS").unwrap(), "3");
        assert_eq!(invocation.env.get("DEBUG").unwrap(), "false");
        assert!(!invocation.env.contains_key("NESTED"));
        assert_eq!(invocation.env.get("KUBECONFIG").unwrap(), "/home/u/.kube/config");
        assert_eq!(invocation.working_dir, PathBuf::from("/srv/project"));
    }

    #[test]
    fn test_prepare_requires_command_value() {
        let err = DelegateInvocation::prepare(&context(json!({}))).unwrap_err();
        assert!(err.is_config_error());
    }
}
