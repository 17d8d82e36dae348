use super::environment::{EnvironmentConfig, EnvironmentLoader};
use crate::error::{AppError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

pub const KUBE_CONFIG_MODE_VAR: &str = "GKE_OPERATOR_KUBE_CONFIG_MODE";
pub const MERGE_EXPORT_VAR: &str = "GKE_OPERATOR_MERGE_EXPORT";
pub const SKIP_AUTH_VAR: &str = "GKE_OPERATOR_SKIP_AUTH";

pub const KUBECONFIG_VAR: &str = "KUBECONFIG";
pub const HOME_VAR: &str = "HOME";
const DEFAULT_KUBE_CONFIG: &str = ".kube/config";

/// How cluster connection details are injected into the child `kubernetes` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KubeConfigMode {
    /// `name` + `kube_config_path`
    #[default]
    Path,
    /// `name` + `master`, `certs_ca_data`, `oauth_token`, `namespace` read from the kube-config
    Resolved,
}

impl FromStr for KubeConfigMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "path" => Ok(KubeConfigMode::Path),
            "resolved" => Ok(KubeConfigMode::Resolved),
            other => Err(AppError::ConfigError(format!(
                "Unknown kube-config mode '{}', expected 'path' or 'resolved'",
                other
            ))),
        }
    }
}

impl fmt::Display for KubeConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KubeConfigMode::Path => write!(f, "path"),
            KubeConfigMode::Resolved => write!(f, "resolved"),
        }
    }
}

/// Operator-wide settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorSettings {
    pub kube_config_mode: KubeConfigMode,
    /// Merge the `_export` mapping into the child task's top-level config.
    pub merge_export: bool,
    pub skip_auth: bool,
}

impl OperatorSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_loader(EnvironmentLoader::new())
    }

    pub fn from_loader(loader: EnvironmentLoader) -> Result<Self> {
        let env = loader
            .default_var(KUBE_CONFIG_MODE_VAR, "path")
            .default_var(MERGE_EXPORT_VAR, "false")
            .default_var(SKIP_AUTH_VAR, "false")
            .load()?;

        let settings = Self {
            kube_config_mode: env.get_or_default(KUBE_CONFIG_MODE_VAR, "path").parse()?,
            merge_export: env.get_bool(MERGE_EXPORT_VAR)?,
            skip_auth: env.get_bool(SKIP_AUTH_VAR)?,
        };

        info!(
            kube_config_mode = %settings.kube_config_mode,
            merge_export = settings.merge_export,
            skip_auth = settings.skip_auth,
            "📋 Operator settings loaded"
        );
        Ok(settings)
    }
}

/// Variables consulted when locating the kube-config file.
pub fn kube_config_loader() -> EnvironmentLoader {
    EnvironmentLoader::new()
        .optional_var(KUBECONFIG_VAR)
        .optional_var(HOME_VAR)
}

/// `$KUBECONFIG` when set, otherwise `$HOME/.kube/config`.
pub fn resolve_kube_config_path(env: &EnvironmentConfig) -> Result<PathBuf> {
    if let Some(path) = env.get(KUBECONFIG_VAR) {
        return Ok(PathBuf::from(path));
    }
    match env.get(HOME_VAR) {
        Some(home) => Ok(PathBuf::from(home).join(DEFAULT_KUBE_CONFIG)),
        None => Err(AppError::ConfigError(
            "Cannot locate kube-config: neither KUBECONFIG nor HOME is set".to_string(),
        )),
    }
}
