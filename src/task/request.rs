use super::config::TaskConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task invocation as handed over by the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub site_id: i32,
    pub project_id: i32,
    pub workflow_name: String,
    #[serde(default)]
    pub revision: Option<String>,
    pub task_id: i64,
    pub attempt_id: i64,
    pub session_id: i64,
    pub task_name: String,
    pub lock_id: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    pub session_uuid: Uuid,
    pub session_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub config: TaskConfig,
    #[serde(default)]
    pub local_config: TaskConfig,
    #[serde(default)]
    pub last_state_params: TaskConfig,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl TaskRequest {
    /// Request for a delegated child task: identity and session metadata are
    /// copied verbatim, only the config is replaced.
    pub fn with_config(&self, config: TaskConfig) -> TaskRequest {
        TaskRequest {
            site_id: self.site_id,
            project_id: self.project_id,
            workflow_name: self.workflow_name.clone(),
            revision: self.revision.clone(),
            task_id: self.task_id,
            attempt_id: self.attempt_id,
            session_id: self.session_id,
            task_name: self.task_name.clone(),
            lock_id: self.lock_id.clone(),
            time_zone: self.time_zone.clone(),
            session_uuid: self.session_uuid,
            session_time: self.session_time,
            created_at: self.created_at,
            config,
            local_config: self.local_config.clone(),
            last_state_params: self.last_state_params.clone(),
        }
    }
}
