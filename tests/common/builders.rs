use chrono::{TimeZone, Utc};
use gke_operator::{OperatorContext, TaskConfig, TaskRequest};
use serde_json::Value;
use std::path::PathBuf;
use uuid::Uuid;

/// Builder for task requests and operator contexts
pub struct TaskRequestBuilder {
    config: TaskConfig,
    task_name: String,
    project_path: PathBuf,
}

impl TaskRequestBuilder {
    pub fn new() -> Self {
        Self {
            config: TaskConfig::new(),
            task_name: "+nightly+deploy".to_string(),
            project_path: PathBuf::from("/tmp"),
        }
    }

    /// Parent config for a `gke>` task against cluster `test`
    pub fn gke(command: Value) -> Self {
        Self::new().with_config(serde_json::json!({
            "cluster": "test",
            "zone": "asia-northeast1-a",
            "project_id": "my-project",
            "_command": command
        }))
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = TaskConfig::from_value(config).expect("config must be a mapping");
        self
    }

    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.config.set(key, value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.config.remove(key);
        self
    }

    pub fn with_task_name(mut self, name: &str) -> Self {
        self.task_name = name.to_string();
        self
    }

    pub fn with_project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = path.into();
        self
    }

    pub fn build_request(&self) -> TaskRequest {
        TaskRequest {
            site_id: 0,
            project_id: 42,
            workflow_name: "nightly".to_string(),
            revision: Some("rev-7".to_string()),
            task_id: 1001,
            attempt_id: 77,
            session_id: 5,
            task_name: self.task_name.clone(),
            lock_id: "lock-1001".to_string(),
            time_zone: "Asia/Tokyo".to_string(),
            session_uuid: Uuid::parse_str("8c5d3f3e-2b8c-4a4f-9a57-0d3c2b1f9e11").unwrap(),
            session_time: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 5).unwrap(),
            config: self.config.clone(),
            local_config: TaskConfig::new().with("timezone", "Asia/Tokyo"),
            last_state_params: TaskConfig::new().with("retry_count", 1),
        }
    }

    pub fn build(&self) -> OperatorContext {
        OperatorContext::new(self.project_path.clone(), self.build_request())
    }
}

impl Default for TaskRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
