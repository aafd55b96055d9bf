pub mod server;
pub mod tracing;

use std::env;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Static application identity reported by the `/health` endpoint.
///
/// Build it with [`app_info!`] so the values come from the calling crate's
/// `Cargo.toml` rather than this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Expands to an [`AppInfo`] for the crate in which it is invoked.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load and parse environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load and parse environment variable or return error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an environment variable into `T`, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        temp_env::with_var("APP_ENV", Some("PRODUCTION"), || {
            assert_eq!(Environment::from_env(), Environment::Production);
        });

        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default_without_value() {
        temp_env::with_var_unset("USERS_API_MISSING_VAR", || {
            let result = env_or_default("USERS_API_MISSING_VAR", "default_value");
            assert_eq!(result, "default_value");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("USERS_API_MISSING_REQUIRED", || {
            let err = env_required("USERS_API_MISSING_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("USERS_API_MISSING_REQUIRED"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_parse_reports_key_on_failure() {
        temp_env::with_var("USERS_API_NUMBER", Some("abc"), || {
            let err = env_parse::<u32>("USERS_API_NUMBER", "1").unwrap_err();
            assert!(err.to_string().contains("USERS_API_NUMBER"));
        });

        temp_env::with_var_unset("USERS_API_NUMBER", || {
            let value: u32 = env_parse("USERS_API_NUMBER", "7").unwrap();
            assert_eq!(value, 7);
        });
    }

    #[test]
    fn test_app_info_macro_uses_crate_metadata() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert!(!info.version.is_empty());
    }
}
