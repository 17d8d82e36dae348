#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Command `{command}` failed with exit code {}", describe_exit(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("Not found: {0}")]
    NotFound(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl AppError {
    pub fn is_config_error(&self) -> bool {
        matches!(self, AppError::ConfigError(_))
    }
}

// Add From implementations for common error types
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ExternalServiceError(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::ValidationError(format!("YAML error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = AppError::CommandFailed {
            command: "gcloud container clusters get-credentials test".to_string(),
            exit_code: Some(1),
        };
        assert_eq!(
            err.to_string(),
            "Command `gcloud container clusters get-credentials test` failed with exit code 1"
        );

        let killed = AppError::CommandFailed {
            command: "kubectl get po".to_string(),
            exit_code: None,
        };
        assert!(killed.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_io_error_maps_to_external_service_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gcloud");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
        assert!(!err.is_config_error());
    }
}
