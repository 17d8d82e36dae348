//! Operator configuration loaded from the process environment

pub mod environment;
pub mod settings;

pub use environment::{EnvironmentConfig, EnvironmentLoader};
pub use settings::{
    kube_config_loader, resolve_kube_config_path, KubeConfigMode, OperatorSettings,
};

use dotenv::dotenv;
use tracing::{debug, info};

/// Load a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    match dotenv() {
        Ok(path) => info!("✅ Loaded .env file from {}", path.display()),
        Err(_) => debug!("No .env file found, using system environment variables"),
    }
}
