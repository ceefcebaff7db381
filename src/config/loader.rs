//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the upstream base URL.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate.
///
/// The upstream origin is fixed for the life of the process; nothing
/// re-reads it after this call.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with a custom variable lookup, so callers can layer
/// command-line flags over the process environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = read_config(path)?;

    apply_env_overrides(&mut config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse the TOML file at `path`, or defaults when there is none.
///
/// No environment overrides and no validation: for tools that only need the
/// session and routing settings.
pub fn read_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(GatewayConfig::default()),
    }
}

/// Apply environment overrides through `lookup`.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.upstream.base_url = url.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_file_value() {
        let mut config = GatewayConfig::with_upstream("http://from-file");
        apply_env_overrides(&mut config, |key| {
            (key == BACKEND_URL_ENV).then(|| "http://from-env:3001/".to_string())
        });
        assert_eq!(config.upstream.normalized_base_url(), "http://from-env:3001");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = GatewayConfig::with_upstream("http://from-file");
        apply_env_overrides(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.upstream.base_url, "http://from-file");
    }

    #[test]
    fn test_lookup_supplies_upstream() {
        let config = load_config_with(None, |key| {
            (key == BACKEND_URL_ENV).then(|| "http://backend:3001".to_string())
        })
        .unwrap();
        assert_eq!(config.upstream.base_url, "http://backend:3001");
    }

    #[test]
    fn test_missing_upstream_fails_validation() {
        let err = load_config_with(None, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.contains(&ValidationError::MissingUpstream)));
    }

    #[test]
    fn test_read_config_skips_validation() {
        let path = std::env::temp_dir().join(format!("gateway-read-{}.toml", std::process::id()));
        fs::write(&path, "[session]\ncookie_name = \"sid\"\nlogin_path = \"/connexion\"\n").unwrap();

        let config = read_config(Some(&path)).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.login_path, "/connexion");
        assert!(config.upstream.base_url.is_empty());
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/gateway.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_error_message_lists_all() {
        let err = ConfigError::Validation(vec![
            ValidationError::MissingUpstream,
            ValidationError::Zero("timeouts.request_secs"),
        ]);
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("BACKEND_URL"));
        assert!(message.contains("timeouts.request_secs"));
    }
}
