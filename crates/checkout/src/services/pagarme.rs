//! Pagar.me API client for order creation.
//!
//! Builds the core/v5 order payload from the assembled [`CheckoutOrder`]
//! and exposes the charge details the UI needs afterwards (PIX QR code,
//! boleto barcode and URL).

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mimo_checkout_core::format::only_digits;
use mimo_checkout_core::types::{CheckoutOrder, CurrencyCode, PaymentMethod};

use crate::config::PagarmeConfig;

/// Pagar.me API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pagar.me/core/v5";

/// PIX charges stay payable for 30 minutes.
const PIX_EXPIRES_IN_SECS: u32 = 1800;

/// Boleto charges stay payable for 3 days.
const BOLETO_EXPIRES_IN_SECS: u32 = 259_200;

const BOLETO_INSTRUCTIONS: &str = "Pagamento referente ao presente do chá de bebê";

/// Errors that can occur when interacting with the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The order is missing a sub-object required by its payment method.
    #[error("order is missing {0} data")]
    Incomplete(&'static str),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The gateway response lacks the charge details for the method.
    #[error("{0} details missing from gateway response")]
    MissingDetails(&'static str),
}

/// Pagar.me API client.
#[derive(Clone)]
pub struct PagarmeClient {
    client: reqwest::Client,
    base_url: String,
}

impl PagarmeClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PagarmeConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();

        // HTTP Basic auth with the secret key and an empty password
        let token = BASE64.encode(format!("{}:", config.api_key.expose_secret()));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|e| GatewayError::Parse(format!("Invalid API key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert("Authorization", auth_value);

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Create an order for the assembled checkout.
    ///
    /// # Errors
    ///
    /// Returns error if the order is missing required sub-objects, the
    /// request fails, or the gateway rejects it.
    pub async fn create_order(&self, order: &CheckoutOrder) -> Result<GatewayOrder, GatewayError> {
        let request = OrderRequest::from_checkout(order)?;
        let url = self.orders_url();

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }

    /// Fetch the current status of a previously created order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the gateway rejects it.
    pub async fn get_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let url = self.order_url(order_id);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }

    fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url)
    }

    fn order_url(&self, order_id: &str) -> String {
        format!("{}/orders/{order_id}", self.base_url)
    }
}

// =============================================================================
// Request payload
// =============================================================================

/// Order creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Total in minor units (centavos).
    pub amount: i64,
    pub currency: String,
    pub payment: PaymentRequest,
    pub customer: CustomerRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OrderMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderMetadata {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix: Option<PixRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boleto: Option<BoletoRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRequest {
    pub holder_name: String,
    /// Bare digits; the display grouping is stripped before sending.
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixRequest {
    pub expires_in: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoletoRequest {
    pub expires_in: u32,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    /// Bare CPF digits.
    pub document: String,
    pub phones: PhonesRequest,
    pub address: AddressRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhonesRequest {
    pub mobile_phone: PhoneRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneRequest {
    pub country_code: String,
    pub area_code: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRequest {
    pub country: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub street_number: String,
    /// Bare CEP digits.
    pub zipcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

impl OrderRequest {
    /// Assemble the gateway payload from the in-progress order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Incomplete`] when the buyer or address is
    /// missing, or when a credit-card order carries no card.
    pub fn from_checkout(order: &CheckoutOrder) -> Result<Self, GatewayError> {
        let buyer = order
            .buyer
            .as_ref()
            .ok_or(GatewayError::Incomplete("buyer"))?;
        let address = order
            .address
            .as_ref()
            .ok_or(GatewayError::Incomplete("address"))?;

        let payment = match order.payment_method {
            PaymentMethod::CreditCard => {
                let card = order.card.as_ref().ok_or(GatewayError::Incomplete("card"))?;
                PaymentRequest {
                    payment_method: PaymentMethod::CreditCard,
                    card: Some(CardRequest {
                        holder_name: card.holder_name.clone(),
                        number: only_digits(&card.number),
                        exp_month: card.expiration_month.clone(),
                        exp_year: card.expiration_year.clone(),
                        cvv: card.cvv.clone(),
                    }),
                    pix: None,
                    boleto: None,
                }
            }
            PaymentMethod::Pix => PaymentRequest {
                payment_method: PaymentMethod::Pix,
                card: None,
                pix: Some(PixRequest {
                    expires_in: PIX_EXPIRES_IN_SECS,
                }),
                boleto: None,
            },
            PaymentMethod::Boleto => PaymentRequest {
                payment_method: PaymentMethod::Boleto,
                card: None,
                pix: None,
                boleto: Some(BoletoRequest {
                    expires_in: BOLETO_EXPIRES_IN_SECS,
                    instructions: BOLETO_INSTRUCTIONS.to_string(),
                }),
            },
        };

        Ok(Self {
            amount: order.amount,
            currency: CurrencyCode::BRL.code().to_string(),
            payment,
            customer: CustomerRequest {
                name: buyer.name.clone(),
                email: buyer.email.clone(),
                document: only_digits(&buyer.document),
                phones: PhonesRequest {
                    mobile_phone: split_phone(&buyer.phone),
                },
                address: AddressRequest {
                    country: address.country.clone(),
                    state: address.state.clone(),
                    city: address.city.clone(),
                    neighborhood: address.neighborhood.clone(),
                    street: address.street.clone(),
                    street_number: address.street_number.clone(),
                    zipcode: only_digits(&address.zipcode),
                    complement: address.complement.clone(),
                },
            },
            metadata: Some(OrderMetadata {
                description: order.description.clone(),
            }),
        })
    }
}

/// Split a Brazilian phone into country code 55, two-digit area code and
/// the subscriber number.
fn split_phone(phone: &str) -> PhoneRequest {
    let digits = only_digits(phone);
    let split = digits.len().min(2);
    let (area_code, number) = digits.split_at(split);
    PhoneRequest {
        country_code: "55".to_string(),
        area_code: area_code.to_string(),
        number: number.to_string(),
    }
}

// =============================================================================
// Response payload
// =============================================================================

/// An order as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Gateway status string (e.g., "paid", "pending", "failed").
    pub status: String,
    #[serde(default)]
    pub charges: Vec<Charge>,
}

/// One charge within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub payment_method: String,
    #[serde(default)]
    pub last_transaction: Option<ChargeTransaction>,
}

/// Transaction detail attached to a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChargeTransaction {
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_code_url: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// What the UI needs to render a PIX payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixDetails {
    pub qr_code: String,
    pub qr_code_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// What the UI needs to render a boleto payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoletoDetails {
    pub url: String,
    pub barcode: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl GatewayOrder {
    /// Extract the PIX QR code from the order's charges.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingDetails`] when no PIX charge with a
    /// transaction is present.
    pub fn pix_details(&self) -> Result<PixDetails, GatewayError> {
        let transaction = self
            .charge_transaction("pix")
            .ok_or(GatewayError::MissingDetails("pix"))?;
        match (&transaction.qr_code, &transaction.qr_code_url) {
            (Some(qr_code), Some(qr_code_url)) => Ok(PixDetails {
                qr_code: qr_code.clone(),
                qr_code_url: qr_code_url.clone(),
                expires_at: transaction.expires_at,
            }),
            _ => Err(GatewayError::MissingDetails("pix")),
        }
    }

    /// Extract the boleto URL and barcode from the order's charges.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingDetails`] when no boleto charge with
    /// a transaction is present.
    pub fn boleto_details(&self) -> Result<BoletoDetails, GatewayError> {
        let transaction = self
            .charge_transaction("boleto")
            .ok_or(GatewayError::MissingDetails("boleto"))?;
        match (&transaction.pdf, &transaction.barcode) {
            (Some(pdf), Some(barcode)) => Ok(BoletoDetails {
                url: pdf.clone(),
                barcode: barcode.clone(),
                expires_at: transaction.expires_at,
            }),
            _ => Err(GatewayError::MissingDetails("boleto")),
        }
    }

    fn charge_transaction(&self, method: &str) -> Option<&ChargeTransaction> {
        self.charges
            .iter()
            .find(|charge| charge.payment_method == method)
            .and_then(|charge| charge.last_transaction.as_ref())
    }
}

impl crate::session::PaymentGateway for PagarmeClient {
    async fn create_order(&self, order: &CheckoutOrder) -> Result<GatewayOrder, GatewayError> {
        Self::create_order(self, order).await
    }
}
