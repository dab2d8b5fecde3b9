//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ASSETLENS_DATABASE_URL` - `PostgreSQL` connection string
//! - `MARKETCHECK_API_KEY` - Vehicle market-data provider API key
//! - `REGRID_API_TOKEN` - Parcel data provider API token
//!
//! ## Optional
//! - `ASSETLENS_HOST` - Bind address (default: 127.0.0.1)
//! - `ASSETLENS_PORT` - Listen port (default: 3000)
//! - `ASSETLENS_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `MARKETCHECK_BASE_URL` / `REGRID_BASE_URL` - Provider endpoint overrides
//! - `ASSETLENS_MARKET_MARKUP` - Assessed-to-market markup (default: 1.10)
//! - `ASSETLENS_TRADE_IN_FACTOR` - Trade-in spread (default: 0.85)
//! - `ASSETLENS_RETAIL_FACTOR` - Retail spread (default: 1.15)
//! - `ASSETLENS_LTV_RATIO` - Loan-to-value ratio (default: 0.80)
//! - `ASSETLENS_ANNUAL_RATE_PERCENT` - Estimated APR (default: 6.5)
//! - `ASSETLENS_LOAN_TERM_MONTHS` - Loan term (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Vehicle market-data provider configuration
    pub vehicle_provider: VehicleProviderConfig,
    /// Parcel data provider configuration
    pub parcel_provider: ParcelProviderConfig,
    /// Business policy constants for the valuation calculators
    pub policy: ValuationPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Vehicle market-data provider (`MarketCheck`) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct VehicleProviderConfig {
    /// API endpoint base URL
    pub base_url: String,
    /// Provider API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for VehicleProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Parcel data provider (Regrid) configuration.
#[derive(Clone)]
pub struct ParcelProviderConfig {
    /// API endpoint base URL
    pub base_url: String,
    /// Provider API token
    pub api_token: SecretString,
}

impl std::fmt::Debug for ParcelProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParcelProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Business policy constants used by the valuation calculators.
///
/// The spreads and loan terms are modeling assumptions, not provider data, so
/// they live in configuration where they can be tuned without touching the
/// algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationPolicy {
    /// Market value assumed to exceed assessed value by this factor.
    pub market_markup: Decimal,
    /// Trade-in tier as a fraction of the observed market mean.
    pub trade_in_factor: Decimal,
    /// Retail tier as a fraction of the observed market mean.
    pub retail_factor: Decimal,
    /// Loan amount as a fraction of the base value, in (0, 1].
    pub ltv_ratio: Decimal,
    /// Estimated annual interest rate, in percent.
    pub annual_rate_percent: Decimal,
    /// Loan term in months.
    pub term_months: u32,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            market_markup: Decimal::new(110, 2),      // 1.10
            trade_in_factor: Decimal::new(85, 2),     // 0.85
            retail_factor: Decimal::new(115, 2),      // 1.15
            ltv_ratio: Decimal::new(80, 2),           // 0.80
            annual_rate_percent: Decimal::new(65, 1), // 6.5
            term_months: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ASSETLENS_DATABASE_URL")?;
        let host = parse_env_or_default("ASSETLENS_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("ASSETLENS_PORT", "3000")?;
        let base_url = get_env_or_default("ASSETLENS_BASE_URL", "http://localhost:3000");

        let vehicle_provider = VehicleProviderConfig::from_env()?;
        let parcel_provider = ParcelProviderConfig::from_env()?;
        let policy = ValuationPolicy::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            vehicle_provider,
            parcel_provider,
            policy,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl VehicleProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default(
                "MARKETCHECK_BASE_URL",
                "https://marketcheck-prod.apigee.net/v2",
            ),
            api_key: get_required_secret("MARKETCHECK_API_KEY")?,
        })
    }
}

impl ParcelProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("REGRID_BASE_URL", "https://app.regrid.com/api/v1"),
            api_token: get_required_secret("REGRID_API_TOKEN")?,
        })
    }
}

impl ValuationPolicy {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            market_markup: parse_env_or(
                "ASSETLENS_MARKET_MARKUP",
                defaults.market_markup,
            )?,
            trade_in_factor: parse_env_or(
                "ASSETLENS_TRADE_IN_FACTOR",
                defaults.trade_in_factor,
            )?,
            retail_factor: parse_env_or("ASSETLENS_RETAIL_FACTOR", defaults.retail_factor)?,
            ltv_ratio: parse_env_or("ASSETLENS_LTV_RATIO", defaults.ltv_ratio)?,
            annual_rate_percent: parse_env_or(
                "ASSETLENS_ANNUAL_RATE_PERCENT",
                defaults.annual_rate_percent,
            )?,
            term_months: parse_env_or("ASSETLENS_LOAN_TERM_MONTHS", defaults.term_months)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default string.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an environment variable, falling back to an already-typed default.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let policy = ValuationPolicy::default();
        assert_eq!(policy.market_markup, Decimal::new(110, 2));
        assert_eq!(policy.trade_in_factor, Decimal::new(85, 2));
        assert_eq!(policy.retail_factor, Decimal::new(115, 2));
        assert_eq!(policy.ltv_ratio, Decimal::new(80, 2));
        assert_eq!(policy.annual_rate_percent, Decimal::new(65, 1));
        assert_eq!(policy.term_months, 60);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            vehicle_provider: VehicleProviderConfig {
                base_url: "https://example.test/v2".to_string(),
                api_key: SecretString::from("key"),
            },
            parcel_provider: ParcelProviderConfig {
                base_url: "https://example.test/api/v1".to_string(),
                api_token: SecretString::from("token"),
            },
            policy: ValuationPolicy::default(),
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_provider_config_debug_redacts_secrets() {
        let config = VehicleProviderConfig {
            base_url: "https://example.test/v2".to_string(),
            api_key: SecretString::from("super_secret_api_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://example.test/v2"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }
}
