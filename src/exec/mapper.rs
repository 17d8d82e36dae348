//! JSON hand-off between the delegates and their interpreter runners

use crate::error::{AppError, Result};
use crate::task::{TaskConfig, TaskResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ConfigMapper {
    pretty: bool,
}

impl ConfigMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn serialize(&self, config: &TaskConfig) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(config)?
        } else {
            serde_json::to_string(config)?
        };
        Ok(text)
    }

    pub fn write_params(&self, path: &Path, config: &TaskConfig) -> Result<()> {
        debug!("📝 Writing task parameters to {}", path.display());
        std::fs::write(path, self.serialize(config)?)?;
        Ok(())
    }

    /// Read the runner's output file. An absent or empty file is an empty
    /// result; a JSON `null` return value is too.
    pub fn read_result(&self, path: &Path) -> Result<TaskResult> {
        if !path.exists() {
            return Ok(TaskResult::empty());
        }
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(TaskResult::empty());
        }

        let value: Value = serde_json::from_str(&text)?;
        match value {
            Value::Null => Ok(TaskResult::empty()),
            Value::Object(map) => Ok(TaskResult::empty().with_store_params(TaskConfig::from(map))),
            other => Err(AppError::ValidationError(format!(
                "Task returned a non-mapping value: {}",
                other
            ))),
        }
    }
}
