use super::config::TaskConfig;
use serde::{Deserialize, Serialize};

/// Outcome of a successful operator run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub store_params: TaskConfig,
    #[serde(default)]
    pub export_params: TaskConfig,
}

impl TaskResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_store_params(mut self, params: TaskConfig) -> Self {
        self.store_params = params;
        self
    }
}
