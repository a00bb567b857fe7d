//! Shared types for the BigCommerce catalog gateway.
//!
//! Holds the [`Outcome`] envelope every adapter operation returns, the
//! upstream wire types, the image upload policy, and env-based application
//! configuration. This crate is a leaf: no HTTP, no async.

use thiserror::Error;

mod app_config;
mod config;
pub mod result;
pub mod types;
pub mod upload;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use result::{ErrorDetail, Outcome};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
