use async_trait::async_trait;
use gke_operator::exec::{CommandExecutor, CommandOutcome, CommandSpec};
use gke_operator::operators::delegates::{OUTPUT_FILE_VAR, PARAMS_FILE_VAR};
use gke_operator::{AppError, Result};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One recorded invocation, plus the params file contents at execution time
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub spec: CommandSpec,
    pub params: Option<Value>,
}

impl RecordedCommand {
    pub fn line(&self) -> String {
        self.spec.to_string()
    }
}

/// Command executor that records instead of spawning processes
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    calls: Arc<RwLock<Vec<RecordedCommand>>>,
    fail_on: Arc<RwLock<Option<String>>>,
    output: Arc<RwLock<Option<String>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command whose display form starts with `prefix`
    pub async fn set_fail_on(&self, prefix: &str) {
        *self.fail_on.write().await = Some(prefix.to_string());
    }

    /// JSON the fake interpreter "returns" through the output file
    pub async fn set_output(&self, json: &str) {
        *self.output.write().await = Some(json.to_string());
    }

    pub async fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.read().await.clone()
    }

    pub async fn lines(&self) -> Vec<String> {
        self.calls().await.iter().map(|c| c.line()).collect()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        let params = spec
            .env
            .get(PARAMS_FILE_VAR)
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|text| serde_json::from_str(&text).ok());

        self.calls.write().await.push(RecordedCommand {
            spec: spec.clone(),
            params,
        });

        if let Some(prefix) = self.fail_on.read().await.as_ref() {
            if spec.to_string().starts_with(prefix.as_str()) {
                return Err(AppError::CommandFailed {
                    command: spec.to_string(),
                    exit_code: Some(1),
                });
            }
        }

        if let (Some(output), Some(path)) =
            (self.output.read().await.as_ref(), spec.env.get(OUTPUT_FILE_VAR))
        {
            std::fs::write(path, output).expect("write fake output");
        }

        Ok(CommandOutcome::success())
    }
}
