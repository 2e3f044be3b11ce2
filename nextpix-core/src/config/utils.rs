//! Configuration utility functions
//!
//! This module provides helper functions for reading configuration values
//! from environment variables.

use std::path::PathBuf;

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    get_env_opt_path(key).unwrap_or(default)
}

/// Get a path value from an environment variable. Unset or empty values
/// yield `None`.
pub fn get_env_opt_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}
