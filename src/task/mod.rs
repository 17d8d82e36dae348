//! Task model shared by every operator: the parameter bag, the request the
//! engine hands over, the execution context, and the result.

pub mod config;
pub mod context;
pub mod request;
pub mod result;

pub use config::TaskConfig;
pub use context::OperatorContext;
pub use request::TaskRequest;
pub use result::TaskResult;
