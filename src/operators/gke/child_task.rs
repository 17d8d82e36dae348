//! Child task configuration derivation
//!
//! Turns the parent `gke>` task config into the config of the single nested
//! `sh>` / `rb>` / `py>` sub-command, with the cluster connection injected
//! into its `kubernetes` mapping.

use super::kube_config;
use crate::config::{
    kube_config_loader, resolve_kube_config_path, EnvironmentConfig, KubeConfigMode,
    OperatorSettings,
};
use crate::error::{AppError, Result};
use crate::operators::delegates::{COMMAND_TYPE_KEY, COMMAND_VALUE_KEY};
use crate::task::TaskConfig;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

pub const COMMAND_KEY: &str = "_command";
pub const EXPORT_KEY: &str = "_export";
pub const KUBERNETES_KEY: &str = "kubernetes";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Delegate a sub-command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Shell,
    Ruby,
    Python,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Shell => "sh",
            CommandType::Ruby => "rb",
            CommandType::Python => "py",
        }
    }

    pub fn from_marker(marker: &str) -> Result<Self> {
        match marker {
            "sh>" => Ok(CommandType::Shell),
            "rb>" => Ok(CommandType::Ruby),
            "py>" => Ok(CommandType::Python),
            other => Err(unsupported(other)),
        }
    }
}

fn unsupported(found: &str) -> AppError {
    AppError::ConfigError(format!(
        "unsupported operator type '{}': gke> supports only sh>, rb> and py>",
        found
    ))
}

impl FromStr for CommandType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sh" => Ok(CommandType::Shell),
            "rb" => Ok(CommandType::Ruby),
            "py" => Ok(CommandType::Python),
            other => Err(unsupported(other)),
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single `<type>>: <body>` entry of the parent's `_command` mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCommand {
    pub command_type: CommandType,
    pub body: String,
}

impl SubCommand {
    pub fn extract(parent: &TaskConfig) -> Result<Self> {
        let command_config = parent.get_nested_or_empty(COMMAND_KEY)?;
        let markers: Vec<String> = command_config
            .keys()
            .into_iter()
            .filter(|key| key.ends_with('>'))
            .collect();

        let marker = match markers.as_slice() {
            [] => {
                return Err(AppError::ConfigError(
                    "no operator found in _command: expected one of sh>, rb> or py>".to_string(),
                ))
            }
            [marker] => marker,
            _ => {
                return Err(AppError::ConfigError(format!(
                    "too many operators in _command: {}",
                    markers.join(", ")
                )))
            }
        };

        let command_type = CommandType::from_marker(marker)?;
        let body: String = command_config.get(marker)?;
        Ok(Self { command_type, body })
    }
}

/// Connection details injected into the child's `kubernetes` mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterConnection {
    KubeConfigPath {
        name: String,
        kube_config_path: PathBuf,
    },
    Resolved {
        name: String,
        master: String,
        certs_ca_data: Option<String>,
        oauth_token: Option<String>,
        namespace: String,
    },
}

impl ClusterConnection {
    /// Set the injected fields, leaving every other key alone.
    pub fn apply(&self, kubernetes: &mut TaskConfig) {
        match self {
            ClusterConnection::KubeConfigPath {
                name,
                kube_config_path,
            } => {
                kubernetes
                    .set("name", name.as_str())
                    .set("kube_config_path", kube_config_path.to_string_lossy().into_owned());
            }
            ClusterConnection::Resolved {
                name,
                master,
                certs_ca_data,
                oauth_token,
                namespace,
            } => {
                kubernetes.set("name", name.as_str()).set("master", master.as_str());
                if let Some(ca) = certs_ca_data {
                    kubernetes.set("certs_ca_data", ca.as_str());
                }
                if let Some(token) = oauth_token {
                    kubernetes.set("oauth_token", token.as_str());
                }
                kubernetes.set("namespace", namespace.as_str());
            }
        }
    }
}

/// Config handed to the delegate, plus the delegate it targets
#[derive(Debug, Clone, PartialEq)]
pub struct ChildTask {
    pub command_type: CommandType,
    pub config: TaskConfig,
}

pub struct ChildTaskBuilder {
    settings: OperatorSettings,
    env: EnvironmentConfig,
}

impl ChildTaskBuilder {
    pub fn new(settings: OperatorSettings, env: EnvironmentConfig) -> Self {
        Self { settings, env }
    }

    /// Builder reading `KUBECONFIG` / `HOME` from the process environment
    pub fn from_env(settings: OperatorSettings) -> Result<Self> {
        Ok(Self::new(settings, kube_config_loader().load()?))
    }

    pub fn derive_child_config(
        &self,
        cluster: &str,
        namespace: Option<&str>,
        parent: &TaskConfig,
    ) -> Result<ChildTask> {
        let sub_command = SubCommand::extract(parent)?;
        debug!(
            "🔍 Sub-command resolved: {}> ({} chars)",
            sub_command.command_type,
            sub_command.body.len()
        );

        let mut child = parent.deep_copy();
        if self.settings.merge_export {
            let exported = parent.get_nested_or_empty(EXPORT_KEY)?;
            if !exported.is_empty() {
                debug!("📤 Merging {} exported parameters", exported.len());
                child.merge(&exported);
            }
        }
        child
            .set(COMMAND_VALUE_KEY, sub_command.body.as_str())
            .set(COMMAND_TYPE_KEY, sub_command.command_type.as_str());

        let connection = self.connection(cluster, namespace)?;
        let mut kubernetes = child.get_nested_or_empty(KUBERNETES_KEY)?;
        connection.apply(&mut kubernetes);
        child.set_nested(KUBERNETES_KEY, kubernetes);

        info!(
            cluster = cluster,
            command_type = %sub_command.command_type,
            mode = %self.settings.kube_config_mode,
            "☸️ Child task config derived"
        );
        Ok(ChildTask {
            command_type: sub_command.command_type,
            config: child,
        })
    }

    fn connection(&self, cluster: &str, namespace: Option<&str>) -> Result<ClusterConnection> {
        let kube_config_path = resolve_kube_config_path(&self.env)?;
        match self.settings.kube_config_mode {
            KubeConfigMode::Path => Ok(ClusterConnection::KubeConfigPath {
                name: cluster.to_string(),
                kube_config_path,
            }),
            KubeConfigMode::Resolved => {
                let resolved = kube_config::load(&kube_config_path)?;
                Ok(ClusterConnection::Resolved {
                    name: cluster.to_string(),
                    master: resolved.master,
                    certs_ca_data: resolved.certs_ca_data,
                    oauth_token: resolved.oauth_token,
                    namespace: namespace.unwrap_or(DEFAULT_NAMESPACE).to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn home_env() -> EnvironmentConfig {
        EnvironmentConfig {
            variables: HashMap::from([("HOME".to_string(), "/home/u".to_string())]),
        }
    }

    fn config(value: serde_json::Value) -> TaskConfig {
        TaskConfig::from_value(value).unwrap()
    }

    #[test]
    fn test_shell_command_with_default_kube_config() {
        let builder = ChildTaskBuilder::new(OperatorSettings::default(), home_env());
        let parent = config(json!({"_command": {"sh>": "echo test"}}));

        let child = builder.derive_child_config("test", None, &parent).unwrap();

        assert_eq!(child.command_type, CommandType::Shell);
        assert_eq!(child.config.get::<String>("_command_type").unwrap(), "sh");
        assert_eq!(child.config.get::<String>("_command_value").unwrap(), "echo test");
        assert_eq!(
            child.config.get_raw("kubernetes").unwrap(),
            &json!({"name": "test", "kube_config_path": "/home/u/.kube/config"})
        );
    }

    #[test]
    fn test_existing_kubernetes_keys_survive() {
        let builder = ChildTaskBuilder::new(OperatorSettings::default(), home_env());
        let parent = config(json!({
            "_command": {"py>": "tasks.run"},
            "kubernetes": {"foo": "bar", "name": "stale"}
        }));

        let child = builder.derive_child_config("prod", None, &parent).unwrap();
        let kubernetes = child.config.get_nested_or_empty("kubernetes").unwrap();

        assert_eq!(kubernetes.get::<String>("foo").unwrap(), "bar");
        assert_eq!(kubernetes.get::<String>("name").unwrap(), "prod");
        assert_eq!(
            kubernetes.get::<String>("kube_config_path").unwrap(),
            "/home/u/.kube/config"
        );
        // parent untouched
        assert_eq!(
            parent.get_nested_or_empty("kubernetes").unwrap().get::<String>("name").unwrap(),
            "stale"
        );
    }

    #[test]
    fn test_no_operator() {
        let builder = ChildTaskBuilder::new(OperatorSettings::default(), home_env());
        let err = builder
            .derive_child_config("test", None, &config(json!({"_command": {"_env": {}}})))
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("no operator found"));

        let err = builder
            .derive_child_config("test", None, &config(json!({"cluster": "x"})))
            .unwrap_err();
        assert!(err.to_string().contains("no operator found"));
    }

    #[test]
    fn test_too_many_operators() {
        let builder = ChildTaskBuilder::new(OperatorSettings::default(), home_env());
        let parent = config(json!({"_command": {"sh>": "echo a", "py>": "m.f"}}));
        let err = builder.derive_child_config("test", None, &parent).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("too many operators"));
    }

    #[test]
    fn test_unsupported_operator_type() {
        let builder = ChildTaskBuilder::new(OperatorSettings::default(), home_env());
        let parent = config(json!({"_command": {"go>": "run"}}));
        let err = builder.derive_child_config("test", None, &parent).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("unsupported operator type"));
    }

    #[test]
    fn test_export_merge_only_when_enabled() {
        let parent = config(json!({
            "_command": {"rb>": "Job.run"},
            "_export": {"table": "events", "_command_type": "py"}
        }));

        let plain = ChildTaskBuilder::new(OperatorSettings::default(), home_env())
            .derive_child_config("c", None, &parent)
            .unwrap();
        assert!(!plain.config.has("table"));

        let settings = OperatorSettings {
            merge_export: true,
            ..Default::default()
        };
        let merged = ChildTaskBuilder::new(settings, home_env())
            .derive_child_config("c", None, &parent)
            .unwrap();
        assert_eq!(merged.config.get::<String>("table").unwrap(), "events");
        // exports never override the resolved command
        assert_eq!(merged.config.get::<String>("_command_type").unwrap(), "rb");
    }

    #[test]
    fn test_exported_kubernetes_keys_survive_injection() {
        let settings = OperatorSettings {
            merge_export: true,
            ..Default::default()
        };
        let parent = config(json!({
            "_command": {"sh>": "echo"},
            "_export": {"kubernetes": {"foo": "bar"}}
        }));

        let child = ChildTaskBuilder::new(settings, home_env())
            .derive_child_config("c", None, &parent)
            .unwrap();

        assert_eq!(
            child.config.get_raw("kubernetes").unwrap(),
            &json!({"foo": "bar", "name": "c", "kube_config_path": "/home/u/.kube/config"})
        );
    }

    #[test]
    fn test_resolved_mode_defaults_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(
            &path,
            "current-context: ctx\n\
             clusters:\n- name: gke\n  cluster:\n    server: https://10.1.2.3\n\
             contexts:\n- name: ctx\n  context:\n    cluster: gke\n    user: u\n\
             users:\n- name: u\n  user:\n    token: t0k3n\n",
        )
        .unwrap();
        let env = EnvironmentConfig {
            variables: HashMap::from([(
                "KUBECONFIG".to_string(),
                path.to_string_lossy().into_owned(),
            )]),
        };
        let settings = OperatorSettings {
            kube_config_mode: KubeConfigMode::Resolved,
            ..Default::default()
        };
        let parent = config(json!({"_command": {"sh>": "kubectl get po"}}));

        let child = ChildTaskBuilder::new(settings, env)
            .derive_child_config("gke", None, &parent)
            .unwrap();

        assert_eq!(
            child.config.get_raw("kubernetes").unwrap(),
            &json!({
                "name": "gke",
                "master": "https://10.1.2.3",
                "oauth_token": "t0k3n",
                "namespace": "default"
            })
        );
    }

    #[test]
    fn test_command_type_parsing() {
        assert_eq!("sh".parse::<CommandType>().unwrap(), CommandType::Shell);
        assert_eq!("rb".parse::<CommandType>().unwrap(), CommandType::Ruby);
        assert_eq!("py".parse::<CommandType>().unwrap(), CommandType::Python);
        assert!("go".parse::<CommandType>().unwrap_err().is_config_error());
        assert!("".parse::<CommandType>().is_err());
    }
}
