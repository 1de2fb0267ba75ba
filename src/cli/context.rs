//! Per-invocation context handed to command handlers

use super::command::Command;
use crate::system::System;
use crate::utils::{expand_home, normalize_path};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment-derived values for one handler invocation
///
/// A fresh `Context` is built for every `exec`; nothing in it is shared
/// between invocations apart from the command reference itself.
pub struct Context<'a, T> {
    command: &'a Command<T>,
    system: &'a dyn System,
    home_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    current_dir: Option<PathBuf>,
}

impl<'a, T> Context<'a, T> {
    /// Read the environment through `system` for `command`
    #[inline]
    pub fn new(system: &'a dyn System, command: &'a Command<T>) -> Self {
        let current_dir = match system.current_dir() {
            Ok(dir) => Some(dir),
            Err(err) => {
                debug!("Current directory unavailable: {err}");
                None
            }
        };

        Self {
            command,
            system,
            home_dir: system.home_dir(),
            config_dir: system.config_dir(),
            current_dir,
        }
    }

    /// The command being executed
    #[must_use]
    #[inline]
    pub const fn command(&self) -> &'a Command<T> {
        self.command
    }

    /// Environment variable, `None` when unset or not valid unicode
    #[must_use]
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.system.env_var(key).ok()
    }

    #[must_use]
    #[inline]
    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Resolve a user-supplied path
    ///
    /// A leading `~` expands to the home directory and relative paths are
    /// joined onto the current directory. The result is normalized lexically,
    /// the filesystem is never touched.
    #[must_use]
    pub fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        let expanded = path.to_str().map_or_else(
            || path.to_path_buf(),
            |raw| expand_home(raw, self.home_dir()),
        );

        let joined = match self.current_dir() {
            Some(current) if expanded.is_relative() => current.join(expanded),
            _ => expanded,
        };
        normalize_path(&joined)
    }
}

impl<T> fmt::Debug for Context<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command.path())
            .field("home_dir", &self.home_dir)
            .field("config_dir", &self.config_dir)
            .field("current_dir", &self.current_dir)
            .finish_non_exhaustive()
    }
}
