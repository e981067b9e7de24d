//! Startup configuration.
//!
//! The client reads a single environment variable, the API base URL, once at
//! startup. `from_lookup` exists so tests can inject values without mutating
//! the process environment.

use thiserror::Error;

/// Environment variable naming the backend base URL.
pub const API_BASE_URL_VAR: &str = "API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing or empty environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(API_BASE_URL_VAR)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingVar(API_BASE_URL_VAR))?;
        Ok(Self {
            api_base_url: url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_base_url() {
        let config =
            Config::from_lookup(|key| (key == API_BASE_URL_VAR).then(|| "https://api.example.com".to_string()))
                .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn trims_trailing_slashes() {
        let config = Config::from_lookup(|_| Some("http://localhost:3000/".to_string())).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn missing_variable_is_an_error() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(API_BASE_URL_VAR)));
    }

    #[test]
    fn empty_variable_is_an_error() {
        let err = Config::from_lookup(|_| Some(String::new())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }
}
