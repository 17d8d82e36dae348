//! GKE cluster authentication through the gcloud / kubectl CLIs

use super::child_task::DEFAULT_NAMESPACE;
use crate::error::{AppError, Result};
use crate::exec::{CommandExecutor, CommandSpec};
use crate::task::TaskConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Cluster the task runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTarget {
    pub cluster: String,
    pub zone: String,
    pub project_id: String,
    pub namespace: String,
}

impl ClusterTarget {
    pub fn from_params(params: &TaskConfig) -> Result<Self> {
        Ok(Self {
            cluster: params.get("cluster")?,
            zone: params.get("zone")?,
            project_id: params.get("project_id")?,
            namespace: params.get_or("namespace", DEFAULT_NAMESPACE.to_string())?,
        })
    }
}

/// Service-account key to activate before fetching cluster credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAccountCredential {
    Inline(String),
    File(PathBuf),
}

impl ServiceAccountCredential {
    /// `credential_json` takes precedence over `credential_json_path`.
    pub fn from_params(params: &TaskConfig) -> Result<Option<Self>> {
        if let Some(json) = params.get_optional::<String>("credential_json")? {
            return Ok(Some(ServiceAccountCredential::Inline(json)));
        }
        Ok(params
            .get_optional::<String>("credential_json_path")?
            .map(|path| ServiceAccountCredential::File(PathBuf::from(path))))
    }

    /// Key contents with embedded newlines removed
    pub fn load(&self) -> Result<String> {
        let raw = match self {
            ServiceAccountCredential::Inline(json) => json.clone(),
            ServiceAccountCredential::File(path) => {
                std::fs::read_to_string(path).map_err(|e| {
                    AppError::ConfigError(format!(
                        "Please check gcp credential file and file path '{}': {}",
                        path.display(),
                        e
                    ))
                })?
            }
        };
        Ok(raw.replace(['\n', '\r'], ""))
    }
}

pub struct ClusterAuthenticator {
    exec: Arc<dyn CommandExecutor>,
}

impl ClusterAuthenticator {
    pub fn new(exec: Arc<dyn CommandExecutor>) -> Self {
        Self { exec }
    }

    /// Commands to run, in order.
    pub fn commands(
        &self,
        target: &ClusterTarget,
        credential: Option<&ServiceAccountCredential>,
    ) -> Result<Vec<CommandSpec>> {
        let mut commands = Vec::with_capacity(4);

        if let Some(credential) = credential {
            commands.push(
                CommandSpec::new("gcloud")
                    .args(["auth", "activate-service-account", "--key-file=-"])
                    .stdin(credential.load()?),
            );
        }

        commands.push(CommandSpec::new("gcloud").args([
            "container",
            "clusters",
            "get-credentials",
            target.cluster.as_str(),
            "--zone",
            target.zone.as_str(),
            "--project",
            target.project_id.as_str(),
        ]));
        commands.push(CommandSpec::new("kubectl").args(["get", "po"]));
        commands.push(CommandSpec::new("kubectl").args([
            "config".to_string(),
            "set-context".to_string(),
            "--current".to_string(),
            format!("--namespace={}", target.namespace),
        ]));

        Ok(commands)
    }

    pub async fn authenticate(
        &self,
        target: &ClusterTarget,
        credential: Option<&ServiceAccountCredential>,
    ) -> Result<()> {
        info!(
            cluster = %target.cluster,
            zone = %target.zone,
            project_id = %target.project_id,
            namespace = %target.namespace,
            service_account = credential.is_some(),
            "🔐 Authenticating against GKE cluster"
        );

        for spec in self.commands(target, credential)? {
            self.exec.execute(&spec).await?;
        }

        debug!("✅ Cluster credentials ready for {}", target.cluster);
        Ok(())
    }
}
