//! Google Kubernetes Engine operator

pub mod authenticator;
pub mod child_task;
pub mod kube_config;
pub mod operator;
pub mod plugin;

pub use authenticator::{ClusterAuthenticator, ClusterTarget, ServiceAccountCredential};
pub use child_task::{ChildTask, ChildTaskBuilder, ClusterConnection, CommandType, SubCommand};
pub use operator::{GkeOperator, GkeOperatorFactory, GKE_OPERATOR_TYPE};
pub use plugin::{GkePlugin, StandardOperators};
