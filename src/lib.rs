//! GKE operator - run workflow sub-commands against a Google Kubernetes Engine cluster
//!
//! The `gke>` operator authenticates against a named cluster with the gcloud
//! CLI, rewrites its task config so the nested `sh>` / `rb>` / `py>` command
//! carries Kubernetes connection details, and hands it off to the matching
//! delegate operator.

pub mod config;
pub mod error;
pub mod exec;
pub mod operators;
pub mod task;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use operators::{GkePlugin, Operator, OperatorFactory, OperatorRegistry, StandardOperators};
pub use task::{OperatorContext, TaskConfig, TaskRequest, TaskResult};
