use super::request::TaskRequest;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything an operator needs to run one task.
#[derive(Debug, Clone)]
pub struct OperatorContext {
    project_path: PathBuf,
    task_request: TaskRequest,
    secrets: HashMap<String, String>,
    privileged_variables: HashMap<String, String>,
}

impl OperatorContext {
    pub fn new(project_path: impl Into<PathBuf>, task_request: TaskRequest) -> Self {
        Self {
            project_path: project_path.into(),
            task_request,
            secrets: HashMap::new(),
            privileged_variables: HashMap::new(),
        }
    }

    pub fn with_secrets(mut self, secrets: HashMap<String, String>) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn with_privileged_variables(mut self, variables: HashMap<String, String>) -> Self {
        self.privileged_variables = variables;
        self
    }

    /// Context for a child task: same project path, secrets and privileged
    /// variables, different request.
    pub fn derive(&self, task_request: TaskRequest) -> Self {
        Self {
            project_path: self.project_path.clone(),
            task_request,
            secrets: self.secrets.clone(),
            privileged_variables: self.privileged_variables.clone(),
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn task_request(&self) -> &TaskRequest {
        &self.task_request
    }

    pub fn secrets(&self) -> &HashMap<String, String> {
        &self.secrets
    }

    pub fn privileged_variables(&self) -> &HashMap<String, String> {
        &self.privileged_variables
    }
}
