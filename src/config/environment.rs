use crate::error::{AppError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Environment variable loader
///
/// Collects a declared set of variables from the process environment (or from
/// an explicit source in tests) so that the rest of the crate never reads
/// `std::env` directly.
pub struct EnvironmentLoader {
    required_vars: Vec<String>,
    optional_vars: Vec<String>,
    defaults: HashMap<String, String>, // var_name -> default_value
    source: Option<HashMap<String, String>>,
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentLoader {
    pub fn new() -> Self {
        Self {
            required_vars: Vec::new(),
            optional_vars: Vec::new(),
            defaults: HashMap::new(),
            source: None,
        }
    }

    /// Read variables from `vars` instead of the process environment.
    pub fn with_source(mut self, vars: HashMap<String, String>) -> Self {
        self.source = Some(vars);
        self
    }

    pub fn require_var(mut self, var_name: &str) -> Self {
        self.required_vars.push(var_name.to_string());
        self
    }

    /// Variable that may be absent; absent variables are simply not recorded.
    pub fn optional_var(mut self, var_name: &str) -> Self {
        self.optional_vars.push(var_name.to_string());
        self
    }

    pub fn default_var(mut self, var_name: &str, default_value: &str) -> Self {
        self.defaults
            .insert(var_name.to_string(), default_value.to_string());
        self
    }

    fn lookup(&self, var_name: &str) -> Option<String> {
        let value = match &self.source {
            Some(vars) => vars.get(var_name).cloned(),
            None => std::env::var(var_name).ok(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Load and validate all declared variables
    pub fn load(&self) -> Result<EnvironmentConfig> {
        let mut config = EnvironmentConfig {
            variables: HashMap::new(),
        };

        for var_name in &self.required_vars {
            match self.lookup(var_name) {
                Some(value) => {
                    config.variables.insert(var_name.clone(), value);
                }
                None => {
                    return Err(AppError::ConfigError(format!(
                        "Required environment variable '{}' is not set",
                        var_name
                    )));
                }
            }
        }

        for var_name in &self.optional_vars {
            if let Some(value) = self.lookup(var_name) {
                config.variables.insert(var_name.clone(), value);
            }
        }

        for (var_name, default_value) in &self.defaults {
            let value = self
                .lookup(var_name)
                .unwrap_or_else(|| default_value.clone());
            config.variables.insert(var_name.clone(), value);
        }

        debug!(
            required_vars = self.required_vars.len(),
            optional_vars = self.optional_vars.len() + self.defaults.len(),
            "🌍 Environment configuration loaded"
        );

        Ok(config)
    }
}

/// Environment configuration container
#[derive(Debug, Clone, Default)]
pub struct EnvironmentConfig {
    pub variables: HashMap<String, String>,
}

impl EnvironmentConfig {
    pub fn get(&self, key: &str) -> Option<&String> {
        self.variables.get(key)
    }

    pub fn get_or_default(&self, key: &str, default: &str) -> String {
        self.variables
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.variables.get(key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(AppError::ConfigError(format!(
                    "Invalid boolean value for '{}': {}",
                    key, value
                ))),
            },
            None => Err(AppError::ConfigError(format!(
                "Environment variable '{}' not found",
                key
            ))),
        }
    }
}
