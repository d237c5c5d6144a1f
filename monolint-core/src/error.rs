//! Error types for monolint-core.
//!
//! This module distinguishes between:
//! - Configuration errors: the rule cannot run as configured for this package
//! - Runtime errors: I/O or parse failures while reading package state
//!
//! Neither is a lint finding; findings are collected on the `Context`.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },

    #[error("invalid options for rule '{rule}': {}", errors.join("; "))]
    InvalidOptions { rule: String, errors: Vec<String> },

    #[error("no package.json in {package_dir}")]
    MissingManifest { package_dir: Utf8PathBuf },

    #[error("invalid manifest {path}: {message}")]
    InvalidManifest { path: Utf8PathBuf, message: String },

    #[error("no workspace context above {package_dir}")]
    NoWorkspace { package_dir: Utf8PathBuf },

    #[error("{package_dir} is not a workspace root")]
    NotAWorkspace { package_dir: Utf8PathBuf },

    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("unable to make generator: {message}")]
    NoGenerator { message: String },

    #[error("invalid template {origin}: {message}")]
    InvalidTemplate { origin: String, message: String },
}

/// Failure of one rule invocation.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("runtime error: {0:#}")]
    Runtime(#[from] anyhow::Error),
}

impl RuleError {
    pub fn is_config_error(&self) -> bool {
        matches!(self, RuleError::Config(_))
    }
}
