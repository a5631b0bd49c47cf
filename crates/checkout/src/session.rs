//! The checkout session state machine.
//!
//! Owns the single order/errors/step triple for one buyer. Steps advance
//! only when the current step validates; moving backward never revalidates.
//! The session holds no locks and enforces no mutual exclusion beyond the
//! loading flag - callers disable the submit control while it is set.

use mimo_checkout_core::types::{
    CartItem, CheckoutOrder, CheckoutStep, Field, PaymentMethod, ValidationErrors,
};

use crate::services::pagarme::{GatewayError, GatewayOrder};
use crate::services::viacep::CepAddress;

/// The payment collaborator invoked on the final step.
///
/// Implemented by [`crate::services::pagarme::PagarmeClient`] and by test
/// stubs.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Submit the assembled order for payment.
    async fn create_order(&self, order: &CheckoutOrder) -> Result<GatewayOrder, GatewayError>;
}

/// Result of [`CheckoutSession::process_payment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The gateway accepted the order.
    Completed(GatewayOrder),
    /// Step-3 validation failed; the error map holds the details.
    Rejected,
    /// The gateway call failed; already logged, no retry.
    Failed,
}

impl PaymentOutcome {
    /// Whether the gateway accepted the order.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// One buyer's trip through the three checkout steps.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    step: CheckoutStep,
    order: CheckoutOrder,
    errors: ValidationErrors,
    is_loading: bool,
}

impl CheckoutSession {
    /// Start an empty session at step 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session pre-seeded with cart items from a registry link.
    #[must_use]
    pub fn with_cart(items: Vec<CartItem>) -> Self {
        let mut session = Self::default();
        session.order.seed_cart(items);
        session
    }

    /// The step currently shown to the buyer.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The in-progress order.
    #[must_use]
    pub const fn order(&self) -> &CheckoutOrder {
        &self.order
    }

    /// The current field error map.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The message for one field, if it currently fails its rule.
    #[must_use]
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Whether a gateway call is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Store one keystroke's worth of input.
    ///
    /// Applies the field's display mask, writes the value into the order,
    /// and refreshes only that field's entry in the error map - sibling
    /// fields keep whatever state they had, so typing in one input never
    /// flashes errors on another.
    pub fn update_field(&mut self, field: Field, raw: &str) {
        let formatted = field.format(raw);
        field.assign(&mut self.order, formatted);

        match field.validate(&self.order) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    /// Switch the payment method.
    ///
    /// Card rules only apply to credit-card orders, so switching to PIX or
    /// boleto drops any card-field errors still on display.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.order.payment_method = method;
        if method != PaymentMethod::CreditCard {
            for field in Field::step_fields(CheckoutStep::Payment) {
                self.errors.remove(field);
            }
        }
    }

    /// Run every rule for a step, replacing the whole error map.
    ///
    /// Returns `true` when the step is clean. Step-3 rules are skipped for
    /// PIX and boleto orders.
    pub fn validate_step(&mut self, step: CheckoutStep) -> bool {
        self.errors.clear();
        for field in Field::step_fields(step) {
            if let Some(message) = field.validate(&self.order) {
                self.errors.insert(*field, message);
            }
        }
        self.errors.is_empty()
    }

    /// Validate the current step and advance on success, clamped at step 3.
    ///
    /// On failure the step stays put and the error map is left populated
    /// for display.
    pub fn next_step(&mut self) -> bool {
        if self.validate_step(self.step) {
            self.step = self.step.next();
            true
        } else {
            false
        }
    }

    /// Go back one step, clamped at step 1. Never touches the error map.
    pub fn prev_step(&mut self) {
        self.step = self.step.prev();
    }

    /// Pre-fill address fields from a postal-code lookup hit.
    ///
    /// Only non-empty lookup fields are applied, each through the normal
    /// [`Self::update_field`] path so masks and per-field validation run.
    /// A failed lookup is simply never applied; it cannot block the form.
    pub fn apply_postal_address(&mut self, found: &CepAddress) {
        let fields = [
            (Field::Street, found.street.as_str()),
            (Field::Neighborhood, found.neighborhood.as_str()),
            (Field::City, found.city.as_str()),
            (Field::State, found.state.as_str()),
        ];
        for (field, value) in fields {
            if !value.is_empty() {
                self.update_field(field, value);
            }
        }
    }

    /// Re-validate step 3 and submit the order to the gateway.
    ///
    /// The loading flag is set for the duration of the call. Gateway
    /// failures are logged and collapsed into [`PaymentOutcome::Failed`];
    /// there is no retry and nothing to roll back.
    pub async fn process_payment<G: PaymentGateway>(&mut self, gateway: &G) -> PaymentOutcome {
        if !self.validate_step(CheckoutStep::Payment) {
            return PaymentOutcome::Rejected;
        }

        self.is_loading = true;
        let result = gateway.create_order(&self.order).await;
        self.is_loading = false;

        match result {
            Ok(order) => PaymentOutcome::Completed(order),
            Err(error) => {
                tracing::error!(%error, "payment gateway call failed");
                PaymentOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_field_applies_mask_and_validates() {
        let mut session = CheckoutSession::new();
        session.update_field(Field::Document, "52998224725");

        assert_eq!(
            session.order().buyer.as_ref().unwrap().document,
            "529.982.247-25"
        );
        assert_eq!(session.error(Field::Document), None);
    }

    #[test]
    fn test_update_field_only_touches_its_own_entry() {
        let mut session = CheckoutSession::new();
        // Populate the full step-1 error map
        assert!(!session.validate_step(CheckoutStep::Buyer));
        assert_eq!(session.errors().len(), 4);

        session.update_field(Field::Email, "maria@example.com");
        assert_eq!(session.error(Field::Email), None);
        // Siblings untouched
        assert_eq!(session.error(Field::Name), Some("Nome é obrigatório"));
        assert_eq!(session.errors().len(), 3);
    }

    #[test]
    fn test_cvv_error_appears_and_clears() {
        let mut session = CheckoutSession::new();
        session.update_field(Field::Cvv, "12");
        assert_eq!(
            session.error(Field::Cvv),
            Some("CVV deve ter 3 ou 4 dígitos")
        );

        session.update_field(Field::Cvv, "123");
        assert_eq!(session.error(Field::Cvv), None);
    }

    #[test]
    fn test_switching_to_pix_clears_card_errors() {
        let mut session = CheckoutSession::new();
        session.update_field(Field::Cvv, "12");
        assert!(session.error(Field::Cvv).is_some());

        session.set_payment_method(PaymentMethod::Pix);
        assert_eq!(session.error(Field::Cvv), None);
        assert!(session.validate_step(CheckoutStep::Payment));
    }

    #[test]
    fn test_prev_step_keeps_errors() {
        let mut session = CheckoutSession::new();
        session.update_field(Field::Name, "Maria");
        assert!(!session.next_step());
        let before = session.errors().clone();

        session.prev_step();
        assert_eq!(session.step(), CheckoutStep::Buyer);
        assert_eq!(session.errors(), &before);
    }

    #[test]
    fn test_with_cart_seeds_amount() {
        let session = CheckoutSession::with_cart(vec![CartItem {
            id: "1".to_string(),
            name: "Fralda".to_string(),
            price: 2500,
            quantity: 2,
        }]);
        assert_eq!(session.order().amount, 5000);
        assert_eq!(session.order().description, "Carrinho com 1 item(s)");
    }

    #[test]
    fn test_apply_postal_address_fills_and_validates() {
        let mut session = CheckoutSession::new();
        session.apply_postal_address(&CepAddress {
            street: "Rua dos Pinheiros".to_string(),
            neighborhood: "Pinheiros".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        });

        let address = session.order().address.as_ref().unwrap();
        assert_eq!(address.street, "Rua dos Pinheiros");
        assert_eq!(address.state, "SP");
        assert_eq!(session.error(Field::Street), None);
    }

    #[test]
    fn test_apply_postal_address_skips_empty_fields() {
        let mut session = CheckoutSession::new();
        session.update_field(Field::City, "Campinas");
        session.apply_postal_address(&CepAddress {
            street: "Avenida Norte".to_string(),
            neighborhood: String::new(),
            city: String::new(),
            state: "SP".to_string(),
        });

        let address = session.order().address.as_ref().unwrap();
        assert_eq!(address.city, "Campinas");
        assert_eq!(address.street, "Avenida Norte");
    }
}
