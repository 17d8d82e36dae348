//! Operator registry
//!
//! Facade over the registered factories: plugins register their providers
//! here, and tasks are run by operator type name.

use super::factory::{OperatorFactory, OperatorProvider};
use crate::error::{AppError, Result};
use crate::task::{OperatorContext, TaskResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Default)]
pub struct OperatorRegistry {
    factories: HashMap<String, Arc<dyn OperatorFactory>>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory; a later registration for the same type replaces the earlier one.
    pub fn register_factory(&mut self, factory: Arc<dyn OperatorFactory>) {
        let name = factory.operator_type().to_string();
        if self.factories.contains_key(&name) {
            warn!("⚠️ Replacing existing factory for operator type: {}", name);
        } else {
            info!("🏭 Registering operator factory: {}", name);
        }
        self.factories.insert(name, factory);
    }

    pub fn register_provider(&mut self, provider: &dyn OperatorProvider) {
        for factory in provider.factories() {
            self.register_factory(factory);
        }
    }

    pub fn get_factory(&self, operator_type: &str) -> Result<Arc<dyn OperatorFactory>> {
        self.factories.get(operator_type).cloned().ok_or_else(|| {
            error!("❌ No factory found for operator type: {}", operator_type);
            AppError::NotFound(format!(
                "No factory found for operator type: {}",
                operator_type
            ))
        })
    }

    pub fn has_factory(&self, operator_type: &str) -> bool {
        self.factories.contains_key(operator_type)
    }

    pub fn operator_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    /// Build the operator for `operator_type` and run it
    pub async fn run_task(
        &self,
        operator_type: &str,
        context: OperatorContext,
    ) -> Result<TaskResult> {
        let factory = self.get_factory(operator_type)?;
        debug!(
            "🎯 Running task '{}' with operator '{}'",
            context.task_request().task_name,
            operator_type
        );

        let operator = factory.new_operator(context);
        let result = operator.run().await;
        match &result {
            Ok(_) => info!("✅ Operator '{}' completed", operator_type),
            Err(e) => error!("❌ Operator '{}' failed: {}", operator_type, e),
        }
        result
    }
}
