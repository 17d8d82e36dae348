//! Operator factories and providers
//!
//! A factory turns an `OperatorContext` into a runnable `Operator` for one
//! operator type (`gke`, `sh`, `rb`, `py`). Providers bundle the factories a
//! plugin contributes so the registry can pick them up in one go.

use super::traits::Operator;
use crate::task::OperatorContext;
use std::sync::Arc;

pub trait OperatorFactory: Send + Sync {
    /// Type name used in workflow definitions, without the trailing `>`
    fn operator_type(&self) -> &str;

    fn new_operator(&self, context: OperatorContext) -> Box<dyn Operator>;
}

pub trait OperatorProvider: Send + Sync {
    fn factories(&self) -> Vec<Arc<dyn OperatorFactory>>;
}
