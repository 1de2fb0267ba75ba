//! Mock system implementation for testing

use super::System;
use std::collections::HashMap;
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory implementation of System trait for testing
///
/// # Example
/// ```
/// use argspec::system::{mock::MockSystem, System};
/// use std::path::PathBuf;
///
/// let system = MockSystem::new()
///     .with_env("EDITOR", "vi")
///     .with_home("/home/user")
///     .with_current_dir("/work");
///
/// assert_eq!(system.env_var("EDITOR").unwrap(), "vi");
/// assert_eq!(system.home_dir(), Some(PathBuf::from("/home/user")));
/// ```
#[derive(Debug, Clone)]
pub struct MockSystem {
    env_vars: HashMap<String, String>,
    current_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

impl MockSystem {
    /// Create a new `MockSystem` with `/` as current directory and no home
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            env_vars: HashMap::new(),
            current_dir: Some(PathBuf::from("/")),
            home_dir: None,
            config_dir: None,
        }
    }

    /// Set an environment variable (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env_vars.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Set the current working directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Make the current working directory lookup fail (builder pattern)
    #[must_use]
    #[inline]
    pub fn without_current_dir(mut self) -> Self {
        self.current_dir = None;
        self
    }

    /// Set the home directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_home<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.home_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the configuration directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_config_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        self.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        self.current_dir.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "current directory is not set")
        })
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.clone()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir.clone()
    }
}
