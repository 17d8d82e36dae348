//! Operator system
//!
//! Operators are built by factories and run through the registry:
//! - `Operator`: one runnable task
//! - `OperatorFactory` / `OperatorProvider`: how plugins contribute operators
//! - `OperatorRegistry`: lookup and execution by operator type name
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gke_operator::config::OperatorSettings;
//! use gke_operator::exec::{ConfigMapper, ProcessCommandExecutor};
//! use gke_operator::operators::{GkePlugin, OperatorRegistry};
//! use std::sync::Arc;
//!
//! let mut registry = OperatorRegistry::new();
//! let exec = Arc::new(ProcessCommandExecutor::new());
//! registry.register_provider(&GkePlugin::new(exec, ConfigMapper::new(), OperatorSettings::default()));
//! assert!(registry.has_factory("gke"));
//! ```

pub mod delegates;
pub mod factory;
pub mod gke;
pub mod manager;
pub mod traits;

pub use factory::{OperatorFactory, OperatorProvider};
pub use gke::{GkeOperator, GkeOperatorFactory, GkePlugin, StandardOperators};
pub use manager::OperatorRegistry;
pub use traits::Operator;
