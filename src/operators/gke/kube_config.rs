//! Minimal kube-config reader
//!
//! Only what the resolved injection mode needs: follow `current-context` to its
//! cluster and user and pull out the API server, CA data and bearer token.

use crate::error::{AppError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct KubeConfigFile {
    current_context: Option<String>,
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(default)]
    users: Vec<NamedUser>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    name: String,
    cluster: ClusterEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ClusterEntry {
    server: String,
    certificate_authority_data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    name: String,
    context: ContextEntry,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    cluster: String,
    user: String,
}

#[derive(Debug, Deserialize)]
struct NamedUser {
    name: String,
    #[serde(default)]
    user: UserEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UserEntry {
    token: Option<String>,
    auth_provider: Option<AuthProvider>,
}

#[derive(Debug, Deserialize)]
struct AuthProvider {
    #[serde(default)]
    config: HashMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKubeConfig {
    pub master: String,
    pub certs_ca_data: Option<String>,
    pub oauth_token: Option<String>,
}

pub fn load(path: &Path) -> Result<ResolvedKubeConfig> {
    debug!("📖 Reading kube-config from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(format!(
            "Cannot read kube-config '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<ResolvedKubeConfig> {
    let file: KubeConfigFile = serde_yaml::from_str(text)
        .map_err(|e| AppError::ConfigError(format!("Malformed kube-config: {}", e)))?;

    let current = file.current_context.as_deref().ok_or_else(|| {
        AppError::ConfigError("kube-config has no current-context".to_string())
    })?;

    let context = file
        .contexts
        .iter()
        .find(|c| c.name == current)
        .ok_or_else(|| {
            AppError::ConfigError(format!("kube-config context '{}' not found", current))
        })?;

    let cluster = file
        .clusters
        .iter()
        .find(|c| c.name == context.context.cluster)
        .ok_or_else(|| {
            AppError::ConfigError(format!(
                "kube-config cluster '{}' not found",
                context.context.cluster
            ))
        })?;

    let user = file
        .users
        .iter()
        .find(|u| u.name == context.context.user)
        .ok_or_else(|| {
            AppError::ConfigError(format!(
                "kube-config user '{}' not found",
                context.context.user
            ))
        })?;

    let oauth_token = user.user.token.clone().or_else(|| {
        user.user
            .auth_provider
            .as_ref()
            .and_then(|p| p.config.get("access-token"))
            .and_then(|v| v.as_str().map(str::to_string))
    });

    Ok(ResolvedKubeConfig {
        master: cluster.cluster.server.clone(),
        certs_ca_data: cluster.cluster.certificate_authority_data.clone(),
        oauth_token,
    })
}
