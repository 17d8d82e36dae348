use super::operator::GkeOperatorFactory;
use crate::config::OperatorSettings;
use crate::exec::{CommandExecutor, ConfigMapper};
use crate::operators::delegates::{PythonOperatorFactory, RubyOperatorFactory, ShellOperatorFactory};
use crate::operators::{OperatorFactory, OperatorProvider};
use std::sync::Arc;

/// Contributes the `gke` operator
pub struct GkePlugin {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
    settings: OperatorSettings,
}

impl GkePlugin {
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

impl OperatorProvider for GkePlugin {
    fn factories(&self) -> Vec<Arc<dyn OperatorFactory>> {
        vec![Arc::new(GkeOperatorFactory::new(
            Arc::clone(&self.exec),
            self.mapper.clone(),
            self.settings.clone(),
        ))]
    }
}

/// The stand-alone `sh`, `rb` and `py` operators
pub struct StandardOperators {
    exec: Arc<dyn CommandExecutor>,
    mapper: ConfigMapper,
}

impl StandardOperators {
    pub fn new(exec: Arc<dyn CommandExecutor>, mapper: ConfigMapper) -> Self {
        Self { exec, mapper }
    }
}

impl OperatorProvider for StandardOperators {
    fn factories(&self) -> Vec<Arc<dyn OperatorFactory>> {
        vec![
            Arc::new(ShellOperatorFactory::new(Arc::clone(&self.exec))),
            Arc::new(RubyOperatorFactory::new(
                Arc::clone(&self.exec),
                self.mapper.clone(),
            )),
            Arc::new(PythonOperatorFactory::new(
                Arc::clone(&self.exec),
                self.mapper.clone(),
            )),
        ]
    }
}
