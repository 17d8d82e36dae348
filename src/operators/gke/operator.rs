//! The `gke>` operator
//!
//! Authenticates against the named cluster, rewrites the task config for the
//! nested sub-command and hands it to the shell, Ruby or Python delegate.

use super::authenticator::{ClusterAuthenticator, ClusterTarget, ServiceAccountCredential};
use super::child_task::{ChildTaskBuilder, CommandType};
use crate::config::OperatorSettings;
use crate::error::Result;
use crate::exec::{CommandExecutor, ConfigMapper};
use crate::operators::delegates::{
    PythonOperatorFactory, RubyOperatorFactory, ShellOperatorFactory, COMMAND_TYPE_KEY,
};
use crate::operators::{Operator, OperatorFactory};
use crate::task::{OperatorContext, TaskConfig, TaskResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub const GKE_OPERATOR_TYPE: &str = "gke";

pub struct GkeOperatorFactory {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
    settings: OperatorSettings,
}

impl GkeOperatorFactory {
    pub fn new(
        exec: Arc<dyn CommandExecutor>,
        mapper: ConfigMapper,
        settings: OperatorSettings,
    ) -> Self {
        Self {
            exec,
            mapper,
            settings,
        }
    }
}

impl OperatorFactory for GkeOperatorFactory {
    fn operator_type(&self) -> &str {
        GKE_OPERATOR_TYPE
    }

    fn new_operator(&self, context: OperatorContext) -> Box<dyn Operator> {
        Box::new(GkeOperator::new(
            Arc::clone(&self.exec),
            self.mapper.clone(),
            self.settings.clone(),
            context,
        ))
    }
}

pub struct GkeOperator {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
    settings: OperatorSettings,
    context: OperatorContext,
}

impl GkeOperator {
    pub fn new(
        exec: Arc<dyn CommandExecutor>,
        mapper: ConfigMapper,
        settings: OperatorSettings,
        context: OperatorContext,
    ) -> Self {
        Self {
            exec,
            mapper,
            settings,
            context,
        }
    }

    /// Task config with the nested `gke` mapping filling in missing keys
    pub fn params(&self) -> Result<TaskConfig> {
        let config = &self.context.task_request().config;
        let mut params = config.deep_copy();
        params.merge_default(&config.get_nested_or_empty(GKE_OPERATOR_TYPE)?);
        Ok(params)
    }

    /// Run the child task on the delegate matching `resolved_type`
    pub async fn dispatch(
        &self,
        child_context: OperatorContext,
        resolved_type: &str,
    ) -> Result<TaskResult> {
        let factory = self.delegate_factory(resolved_type)?;
        debug!(
            "🎯 Dispatching child task '{}' to {}>",
            child_context.task_request().task_name,
            factory.operator_type()
        );
        factory.new_operator(child_context).run().await
    }

    fn delegate_factory(&self, resolved_type: &str) -> Result<Box<dyn OperatorFactory>> {
        let exec = Arc::clone(&self.exec);
        let factory: Box<dyn OperatorFactory> = match resolved_type.parse::<CommandType>()? {
            CommandType::Shell => Box::new(ShellOperatorFactory::new(exec)),
            CommandType::Ruby => Box::new(RubyOperatorFactory::new(exec, self.mapper.clone())),
            CommandType::Python => {
                Box::new(PythonOperatorFactory::new(exec, self.mapper.clone()))
            }
        };
        Ok(factory)
    }
}

#[async_trait]
impl Operator for GkeOperator {
    async fn run(&self) -> Result<TaskResult> {
        let params = self.params()?;
        let target = ClusterTarget::from_params(&params)?;

        if self.settings.skip_auth {
            info!("⏭️ Skipping cluster authentication for {}", target.cluster);
        } else {
            let credential = ServiceAccountCredential::from_params(&params)?;
            ClusterAuthenticator::new(Arc::clone(&self.exec))
                .authenticate(&target, credential.as_ref())
                .await?;
        }

        let child = ChildTaskBuilder::from_env(self.settings.clone())?.derive_child_config(
            &target.cluster,
            Some(&target.namespace),
            &params,
        )?;

        let child_request = self.context.task_request().with_config(child.config);
        let child_context = self.context.derive(child_request);
        let resolved_type: String = child_context.task_request().config.get(COMMAND_TYPE_KEY)?;

        self.dispatch(child_context, &resolved_type).await
    }
}
