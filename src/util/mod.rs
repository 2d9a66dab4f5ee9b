//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod errors;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::Config;
pub use context::HarnessContext;
pub use diagnostic::Diagnostic;
pub use errors::HarnessError;
pub use shell::Shell;
