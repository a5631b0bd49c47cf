//! ViaCEP postal-code lookup client.
//!
//! Consumed on focus-loss of the CEP input to pre-fill the address step.
//! A miss or failure leaves the form editable; nothing here ever blocks
//! submission. Hits are cached - CEP data changes on a timescale of years.

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;

use mimo_checkout_core::format::only_digits;

use crate::config::ViaCepConfig;

/// ViaCEP API base URL.
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

/// Lookups cached per session process.
const CACHE_MAX_CAPACITY: u64 = 1024;

/// Errors that can occur when looking up a postal code.
#[derive(Debug, Error)]
pub enum CepError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status.
    #[error("API error: status {0}")]
    Api(u16),

    /// The input does not carry exactly 8 digits.
    #[error("zipcode must have 8 digits: {0:?}")]
    InvalidZipcode(String),
}

/// Address fields returned for a known CEP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CepAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter federative unit code.
    pub state: String,
}

/// ViaCEP wire format. The service flags unknown CEPs with an `erro` key
/// instead of a non-200 status.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    // Boolean in older responses, the string "true" in newer ones;
    // presence alone marks the miss.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

/// ViaCEP lookup client with an in-memory cache.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, Option<CepAddress>>,
}

impl CepClient {
    /// Create a new lookup client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ViaCepConfig) -> Result<Self, CepError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            cache: Cache::new(CACHE_MAX_CAPACITY),
        })
    }

    /// Look up an 8-digit CEP.
    ///
    /// Returns `Ok(None)` for a well-formed code the service does not
    /// know. Masked input (`01310-100`) is accepted.
    ///
    /// # Errors
    ///
    /// Returns error for input without exactly 8 digits, or if the request
    /// fails.
    pub async fn lookup(&self, zipcode: &str) -> Result<Option<CepAddress>, CepError> {
        let digits = only_digits(zipcode);
        if digits.len() != 8 {
            return Err(CepError::InvalidZipcode(zipcode.to_string()));
        }

        if let Some(cached) = self.cache.get(&digits).await {
            return Ok(cached);
        }

        let url = format!("{}/{digits}/json/", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(zipcode = %digits, status = status.as_u16(), "CEP lookup failed");
            return Err(CepError::Api(status.as_u16()));
        }

        let body: ViaCepResponse = response.json().await?;
        let found = if body.erro.is_some() {
            None
        } else {
            Some(CepAddress {
                street: body.logradouro,
                neighborhood: body.bairro,
                city: body.localidade,
                state: body.uf,
            })
        };

        self.cache.insert(digits, found.clone()).await;
        Ok(found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_rejects_short_input() {
        let client = CepClient::new(&ViaCepConfig::default()).unwrap();
        let result = client.lookup("01310").await;
        assert!(matches!(result, Err(CepError::InvalidZipcode(_))));
    }

    #[test]
    fn test_response_parsing_hit() {
        let body = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        }"#;
        let parsed: ViaCepResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.erro.is_none());
        assert_eq!(parsed.logradouro, "Avenida Paulista");
        assert_eq!(parsed.uf, "SP");
    }

    #[test]
    fn test_response_parsing_miss_boolean_and_string() {
        for body in [r#"{"erro": true}"#, r#"{"erro": "true"}"#] {
            let parsed: ViaCepResponse = serde_json::from_str(body).unwrap();
            assert!(parsed.erro.is_some(), "miss not detected in {body}");
        }
    }

    #[test]
    fn test_response_parsing_partial_fields_default_empty() {
        let parsed: ViaCepResponse =
            serde_json::from_str(r#"{"localidade": "Campinas", "uf": "SP"}"#).unwrap();
        assert_eq!(parsed.logradouro, "");
        assert_eq!(parsed.localidade, "Campinas");
    }
}
