use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let bigcommerce_api_url = require("BCGW_BIGCOMMERCE_API_URL")?;
    let bigcommerce_token = require("BCGW_BIGCOMMERCE_TOKEN")?;
    let jwt_secret = require("BCGW_JWT_SECRET")?;

    let env = parse_environment(&or_default("BCGW_ENV", "development"));

    let bind_addr = parse_addr("BCGW_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BCGW_LOG_LEVEL", "info");
    let bigcommerce_timeout_secs = parse_u64("BCGW_BIGCOMMERCE_TIMEOUT_SECS", "30")?;

    let jwt_issuer = or_default("BCGW_JWT_ISSUER", "bcgw");
    let jwt_audience = or_default("BCGW_JWT_AUDIENCE", "bcgw-frontend");
    let token_ttl_hours = parse_i64("BCGW_TOKEN_TTL_HOURS", "72")?;
    let user_credentials = lookup("BCGW_USER_CREDENTIALS").ok();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        bigcommerce_api_url,
        bigcommerce_token,
        bigcommerce_timeout_secs,
        jwt_secret,
        jwt_issuer,
        jwt_audience,
        token_ttl_hours,
        user_credentials,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
