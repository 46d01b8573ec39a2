//! Load test configuration loaded from environment variables.
//!
//! Every variable is optional; the defaults reproduce the standard run
//! against a local backend.
//!
//! # Environment Variables
//!
//! - `STORELOAD_HOST` - Backend base URL (default: `http://localhost:4000`)
//! - `STORELOAD_SALES_WEIGHT` - Relative odds of a salesperson (default: 7)
//! - `STORELOAD_MANAGER_WEIGHT` - Relative odds of a central manager (default: 3)
//! - `STORELOAD_THINK_MIN_SECS` - Minimum pause between tasks (default: 1)
//! - `STORELOAD_THINK_MAX_SECS` - Maximum pause between tasks (default: 3)
//! - `STORELOAD_LOGIN_TIMEOUT_SECS` - Login request timeout (default: 10)
//! - `STORELOAD_ORDER_TIMEOUT_SECS` - Order creation timeout (default: 10)
//! - `STORELOAD_INVENTORY_TIMEOUT_SECS` - Inventory query timeout (default: 5)
//! - `STORELOAD_CREDENTIALS_FILE` - YAML file replacing the built-in accounts
//!
//! The goose command line (`--host`, `-u`, `-r`, `-t`, `--report-file`)
//! still applies on top: `STORELOAD_HOST` only sets goose's default host.

use std::path::PathBuf;
use std::time::Duration;

use storeload_core::api::DEFAULT_HOST;
use storeload_core::session::ZeroWeightsError;
use storeload_core::{CredentialTable, CredentialTableError, RoleWeights};
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot read credentials file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid credentials file {}: {source}", .path.display())]
    Credentials {
        path: PathBuf,
        #[source]
        source: CredentialTableError,
    },
}

/// Pause bounds between two tasks of the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    pub min: Duration,
    pub max: Duration,
}

impl Default for ThinkTime {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}

/// Per-request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub login: Duration,
    pub order: Duration,
    pub inventory: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(10),
            order: Duration::from_secs(10),
            inventory: Duration::from_secs(5),
        }
    }
}

/// Load test configuration.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Backend base URL
    pub host: Url,
    /// Odds of each role for a new session
    pub role_weights: RoleWeights,
    /// Pause between tasks
    pub think_time: ThinkTime,
    /// Per-request timeouts
    pub timeouts: Timeouts,
    /// Accounts sessions are drawn from
    pub credentials: CredentialTable,
}

impl LoadConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable does not parse or the credentials
    /// file cannot be read or fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`LoadConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_host = lookup("STORELOAD_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = parse_host("STORELOAD_HOST", &raw_host)?;

        let role_weights = RoleWeights::new(
            parse_or(&lookup, "STORELOAD_SALES_WEIGHT", 7)?,
            parse_or(&lookup, "STORELOAD_MANAGER_WEIGHT", 3)?,
        )
        .map_err(|ZeroWeightsError| {
            ConfigError::InvalidEnvVar(
                "STORELOAD_SALES_WEIGHT".to_string(),
                "sales and manager weights cannot both be zero".to_string(),
            )
        })?;

        let think_time = ThinkTime {
            min: secs(&lookup, "STORELOAD_THINK_MIN_SECS", 1)?,
            max: secs(&lookup, "STORELOAD_THINK_MAX_SECS", 3)?,
        };
        if think_time.min > think_time.max {
            return Err(ConfigError::InvalidEnvVar(
                "STORELOAD_THINK_MIN_SECS".to_string(),
                format!(
                    "minimum think time ({}s) exceeds maximum ({}s)",
                    think_time.min.as_secs(),
                    think_time.max.as_secs()
                ),
            ));
        }

        let timeouts = Timeouts {
            login: secs(&lookup, "STORELOAD_LOGIN_TIMEOUT_SECS", 10)?,
            order: secs(&lookup, "STORELOAD_ORDER_TIMEOUT_SECS", 10)?,
            inventory: secs(&lookup, "STORELOAD_INVENTORY_TIMEOUT_SECS", 5)?,
        };

        let credentials = match lookup("STORELOAD_CREDENTIALS_FILE") {
            Some(path) => load_credentials(PathBuf::from(path))?,
            None => CredentialTable::builtin(),
        };

        Ok(Self {
            host,
            role_weights,
            think_time,
            timeouts,
            credentials,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate a backend base URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` unless the value is an absolute
/// `http` or `https` URL.
pub fn parse_host(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_or<F>(lookup: &F, key: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn secs<F>(lookup: &F, key: &str, default: u32) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(lookup, key, default).map(|s| Duration::from_secs(u64::from(s)))
}

fn load_credentials(path: PathBuf) -> Result<CredentialTable, ConfigError> {
    let yaml = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    CredentialTable::from_yaml_str(&yaml)
        .map_err(|source| ConfigError::Credentials { path, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use storeload_core::Role;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LoadConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host.as_str(), "http://localhost:4000/");
        assert_eq!(config.role_weights, RoleWeights::default());
        assert_eq!(config.think_time, ThinkTime::default());
        assert_eq!(config.timeouts.login, Duration::from_secs(10));
        assert_eq!(config.timeouts.order, Duration::from_secs(10));
        assert_eq!(config.timeouts.inventory, Duration::from_secs(5));
        assert_eq!(config.credentials.for_role(Role::Sales).len(), 4);
    }

    #[test]
    fn test_overrides() {
        let config = LoadConfig::from_lookup(lookup_from(&[
            ("STORELOAD_HOST", "https://staging.example.com:8443"),
            ("STORELOAD_SALES_WEIGHT", "1"),
            ("STORELOAD_MANAGER_WEIGHT", "0"),
            ("STORELOAD_THINK_MIN_SECS", "0"),
            ("STORELOAD_THINK_MAX_SECS", "0"),
            ("STORELOAD_INVENTORY_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.host.host_str(), Some("staging.example.com"));
        assert_eq!(config.role_weights.sales(), 1);
        assert_eq!(config.role_weights.central_manager(), 0);
        assert_eq!(config.think_time.max, Duration::ZERO);
        assert_eq!(config.timeouts.inventory, Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_bad_host() {
        let err = LoadConfig::from_lookup(lookup_from(&[("STORELOAD_HOST", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STORELOAD_HOST"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        assert!(parse_host("STORELOAD_HOST", "ftp://localhost").is_err());
    }

    #[test]
    fn test_rejects_zero_weights() {
        let err = LoadConfig::from_lookup(lookup_from(&[
            ("STORELOAD_SALES_WEIGHT", "0"),
            ("STORELOAD_MANAGER_WEIGHT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_rejects_inverted_think_time() {
        let err = LoadConfig::from_lookup(lookup_from(&[
            ("STORELOAD_THINK_MIN_SECS", "5"),
            ("STORELOAD_THINK_MAX_SECS", "2"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STORELOAD_THINK_MIN_SECS")
        );
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        assert!(
            LoadConfig::from_lookup(lookup_from(&[("STORELOAD_LOGIN_TIMEOUT_SECS", "ten")]))
                .is_err()
        );
    }

    #[test]
    fn test_missing_credentials_file() {
        let err = LoadConfig::from_lookup(lookup_from(&[(
            "STORELOAD_CREDENTIALS_FILE",
            "/nonexistent/storeload-credentials.yaml",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
