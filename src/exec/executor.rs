//! Command execution abstraction
//!
//! Every external process this crate starts (`gcloud`, `kubectl`, `bash`,
//! `ruby`, `python3`) goes through a `CommandExecutor`. The process inherits the
//! caller's stdout/stderr so operators see CLI output live; nothing is captured.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, info};

/// A single process invocation, described as an argument vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub working_dir: Option<PathBuf>,
    /// Payload written to the child's stdin. Never shown in `Display`.
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, vars: &HashMap<String, String>) -> Self {
        self.env.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn stdin(mut self, payload: impl Into<String>) -> Self {
        self.stdin = Some(payload.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion. Non-zero exit is an error.
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutcome>;
}

/// Spawns real processes through `tokio::process`.
#[derive(Debug, Default, Clone)]
pub struct ProcessCommandExecutor;

impl ProcessCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        info!("🐚 Running: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::inherit()
            });

        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to start `{}`: {}", spec.program, e))
        })?;

        if let Some(payload) = &spec.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(payload.as_bytes()).await.map_err(|e| {
                    AppError::ExternalServiceError(format!(
                        "Failed to write stdin of `{}`: {}",
                        spec.program, e
                    ))
                })?;
                // dropping stdin closes the pipe so the child sees EOF
            }
        }

        let status = child.wait().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to wait for `{}`: {}", spec.program, e))
        })?;

        if !status.success() {
            error!("❌ Command failed: {} ({:?})", spec, status.code());
            return Err(AppError::CommandFailed {
                command: spec.to_string(),
                exit_code: status.code(),
            });
        }

        debug!("✅ Command finished: {}", spec.program);
        Ok(CommandOutcome {
            exit_code: status.code().unwrap_or(0),
        })
    }
}
