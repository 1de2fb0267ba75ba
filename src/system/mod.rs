//! System abstraction for environment lookups
//!
//! Handlers receive a `Context` built from these values. Keeping the lookups
//! behind a trait lets tests run commands against a fixed environment.

use std::env::VarError;
use std::io;
use std::path::PathBuf;

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for environment-derived values
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env` and `dirs`
/// - `MockSystem`: Test implementation using in-memory values
pub trait System: Send + Sync {
    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Get the user's home directory, if one can be determined
    fn home_dir(&self) -> Option<PathBuf>;

    /// Get the user's configuration directory, if one can be determined
    fn config_dir(&self) -> Option<PathBuf>;
}
