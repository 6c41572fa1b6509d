//! Shared configuration for the outflow workspace.
//!
//! The only environment-specific setting the rest of the workspace depends on
//! is the Remote Campaign API base URL; everything else (timeouts, lead-poll
//! tuning, the mock user id) has a working default so `outflow` runs against
//! a local backend with no setup.

pub mod app_config;
pub mod config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
