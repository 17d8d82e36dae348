//! Process execution and serialization collaborators shared by the operators

pub mod executor;
pub mod mapper;

pub use executor::{CommandExecutor, CommandOutcome, CommandSpec, ProcessCommandExecutor};
pub use mapper::ConfigMapper;
