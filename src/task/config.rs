//! Ordered key/value task configuration
//!
//! `TaskConfig` is the mutable parameter bag handed to every operator. Keys keep
//! their insertion order, values are arbitrary JSON (scalars or nested mappings),
//! and required lookups fail with `AppError::ConfigError` naming the key.

use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskConfig {
    entries: Map<String, Value>,
}

impl TaskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::new()),
            other => Err(AppError::ConfigError(format!(
                "Expected a mapping but got: {}",
                other
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Required typed lookup.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.entries.get(key) {
            Some(Value::Null) | None => Err(AppError::ConfigError(format!(
                "Parameter '{}' is required but not set",
                key
            ))),
            Some(value) => Self::convert(key, value),
        }
    }

    pub fn get_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Self::convert(key, value).map(Some),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_optional(key)?.unwrap_or(default))
    }

    fn convert<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T> {
        serde_json::from_value(value.clone()).map_err(|e| {
            AppError::ConfigError(format!("Parameter '{}' has an invalid type: {}", key, e))
        })
    }

    /// Set a value, replacing any existing one in place.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) -> &mut Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Owned variant of [`TaskConfig::set`] for building configs inline.
    pub fn with<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn set_nested(&mut self, key: &str, nested: TaskConfig) -> &mut Self {
        self.entries.insert(key.to_string(), nested.into_value());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Nested mapping at `key`, or an empty config when the key is absent.
    pub fn get_nested_or_empty(&self, key: &str) -> Result<TaskConfig> {
        match self.entries.get(key) {
            Some(Value::Null) | None => Ok(TaskConfig::new()),
            Some(Value::Object(entries)) => Ok(TaskConfig {
                entries: entries.clone(),
            }),
            Some(other) => Err(AppError::ConfigError(format!(
                "Parameter '{}' must be a mapping but got: {}",
                key, other
            ))),
        }
    }

    pub fn deep_copy(&self) -> TaskConfig {
        self.clone()
    }

    /// Shallow, right-biased merge: keys from `other` win.
    pub fn merge(&mut self, other: &TaskConfig) -> &mut Self {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }

    /// Shallow merge that only fills in keys this config does not have yet.
    pub fn merge_default(&mut self, defaults: &TaskConfig) -> &mut Self {
        for (key, value) in &defaults.entries {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
            }
        }
        self
    }
}

impl From<Map<String, Value>> for TaskConfig {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}
