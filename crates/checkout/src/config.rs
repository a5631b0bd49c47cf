//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PAGARME_API_KEY` - Pagar.me secret key (`sk_...`)
//!
//! ## Optional
//! - `PAGARME_BASE_URL` - Gateway base URL (default: the core/v5 API)
//! - `VIACEP_BASE_URL` - Postal lookup base URL (default: viacep.com.br)

use secrecy::SecretString;
use thiserror::Error;

use crate::services::{pagarme, viacep};

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "sua-chave",
    "sk_test_xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Top-level checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Payment gateway credentials and endpoint.
    pub pagarme: PagarmeConfig,
    /// Postal-code lookup endpoint.
    pub viacep: ViaCepConfig,
}

/// Pagar.me API configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct PagarmeConfig {
    /// Secret API key, sent as HTTP Basic auth.
    pub api_key: SecretString,
    /// API base URL (overridable for sandboxing).
    pub base_url: String,
}

impl std::fmt::Debug for PagarmeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagarmeConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// ViaCEP lookup configuration.
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// API base URL.
    pub base_url: String,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            base_url: viacep::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is missing or looks like a
    /// placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            pagarme: PagarmeConfig::from_env()?,
            viacep: ViaCepConfig::from_env(),
        })
    }
}

impl PagarmeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("PAGARME_API_KEY")?,
            base_url: get_env_or_default("PAGARME_BASE_URL", pagarme::DEFAULT_BASE_URL),
        })
    }
}

impl ViaCepConfig {
    fn from_env() -> Self {
        Self {
            base_url: get_env_or_default("VIACEP_BASE_URL", viacep::DEFAULT_BASE_URL),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is not a placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("sua-chave-aqui", "TEST_VAR");
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("sk_live_5ad1ae64dc3648c7", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_pagarme_config_debug_redacts_key() {
        let config = PagarmeConfig {
            api_key: SecretString::from("sk_live_super_secret"),
            base_url: pagarme::DEFAULT_BASE_URL.to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_live_super_secret"));
        assert!(debug_output.contains(pagarme::DEFAULT_BASE_URL));
    }

    #[test]
    fn test_viacep_default_base_url() {
        assert_eq!(ViaCepConfig::default().base_url, viacep::DEFAULT_BASE_URL);
    }
}
