//! The form field table.
//!
//! [`Field`] is the single source of truth for everything the checkout
//! needs to know about an input: which step owns it, which mask to apply
//! while typing, where its value lives inside [`CheckoutOrder`], and which
//! rule and message govern it. Both the per-keystroke path
//! (`CheckoutSession::update_field`) and the per-step path
//! (`CheckoutSession::validate_step`) go through [`Field::validate`], so a
//! rule can never drift between the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format;
use crate::types::{CheckoutOrder, CheckoutStep, PaymentMethod};
use crate::validate;

/// Map from field to the message shown under its input.
///
/// Absence of a key means the field is valid or untouched.
pub type ValidationErrors = BTreeMap<Field, String>;

/// Every input across the three checkout steps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    // Step 1 - buyer
    Name,
    Email,
    Document,
    Phone,
    // Step 2 - address
    Zipcode,
    Street,
    StreetNumber,
    Neighborhood,
    City,
    State,
    Complement,
    // Step 3 - card
    HolderName,
    Number,
    ExpirationMonth,
    ExpirationYear,
    Cvv,
}

impl Field {
    /// The step that collects this field.
    #[must_use]
    pub const fn step(self) -> CheckoutStep {
        match self {
            Self::Name | Self::Email | Self::Document | Self::Phone => CheckoutStep::Buyer,
            Self::Zipcode
            | Self::Street
            | Self::StreetNumber
            | Self::Neighborhood
            | Self::City
            | Self::State
            | Self::Complement => CheckoutStep::Address,
            Self::HolderName
            | Self::Number
            | Self::ExpirationMonth
            | Self::ExpirationYear
            | Self::Cvv => CheckoutStep::Payment,
        }
    }

    /// Stable name used as the error-map key in serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Document => "document",
            Self::Phone => "phone",
            Self::Zipcode => "zipcode",
            Self::Street => "street",
            Self::StreetNumber => "streetNumber",
            Self::Neighborhood => "neighborhood",
            Self::City => "city",
            Self::State => "state",
            Self::Complement => "complement",
            Self::HolderName => "holderName",
            Self::Number => "number",
            Self::ExpirationMonth => "expirationMonth",
            Self::ExpirationYear => "expirationYear",
            Self::Cvv => "cvv",
        }
    }

    /// The required fields of a step, in display order.
    ///
    /// `Complement` is optional and therefore absent from step 2's list.
    #[must_use]
    pub const fn step_fields(step: CheckoutStep) -> &'static [Self] {
        match step {
            CheckoutStep::Buyer => &[Self::Name, Self::Email, Self::Document, Self::Phone],
            CheckoutStep::Address => &[
                Self::Zipcode,
                Self::Street,
                Self::StreetNumber,
                Self::Neighborhood,
                Self::City,
                Self::State,
            ],
            CheckoutStep::Payment => &[
                Self::HolderName,
                Self::Number,
                Self::ExpirationMonth,
                Self::ExpirationYear,
                Self::Cvv,
            ],
        }
    }

    /// Apply this field's display mask, if it has one.
    #[must_use]
    pub fn format(self, raw: &str) -> String {
        match self {
            Self::Document => format::format_document(raw),
            Self::Phone => format::format_phone(raw),
            Self::Zipcode => format::format_zipcode(raw),
            Self::Number => format::format_card_number(raw),
            Self::ExpirationMonth | Self::ExpirationYear | Self::Cvv => format::only_digits(raw),
            _ => raw.to_string(),
        }
    }

    /// Read this field's current value out of the order.
    #[must_use]
    pub fn value(self, order: &CheckoutOrder) -> &str {
        match self {
            Self::Name => order.buyer.as_ref().map_or("", |b| b.name.as_str()),
            Self::Email => order.buyer.as_ref().map_or("", |b| b.email.as_str()),
            Self::Document => order.buyer.as_ref().map_or("", |b| b.document.as_str()),
            Self::Phone => order.buyer.as_ref().map_or("", |b| b.phone.as_str()),
            Self::Zipcode => order.address.as_ref().map_or("", |a| a.zipcode.as_str()),
            Self::Street => order.address.as_ref().map_or("", |a| a.street.as_str()),
            Self::StreetNumber => order
                .address
                .as_ref()
                .map_or("", |a| a.street_number.as_str()),
            Self::Neighborhood => order
                .address
                .as_ref()
                .map_or("", |a| a.neighborhood.as_str()),
            Self::City => order.address.as_ref().map_or("", |a| a.city.as_str()),
            Self::State => order.address.as_ref().map_or("", |a| a.state.as_str()),
            Self::Complement => order
                .address
                .as_ref()
                .and_then(|a| a.complement.as_deref())
                .unwrap_or(""),
            Self::HolderName => order.card.as_ref().map_or("", |c| c.holder_name.as_str()),
            Self::Number => order.card.as_ref().map_or("", |c| c.number.as_str()),
            Self::ExpirationMonth => order
                .card
                .as_ref()
                .map_or("", |c| c.expiration_month.as_str()),
            Self::ExpirationYear => order
                .card
                .as_ref()
                .map_or("", |c| c.expiration_year.as_str()),
            Self::Cvv => order.card.as_ref().map_or("", |c| c.cvv.as_str()),
        }
    }

    /// Write an already-masked value into the order, creating the owning
    /// sub-object on demand.
    pub fn assign(self, order: &mut CheckoutOrder, value: String) {
        match self {
            Self::Name => order.buyer.get_or_insert_default().name = value,
            Self::Email => order.buyer.get_or_insert_default().email = value,
            Self::Document => order.buyer.get_or_insert_default().document = value,
            Self::Phone => order.buyer.get_or_insert_default().phone = value,
            Self::Zipcode => order.address.get_or_insert_default().zipcode = value,
            Self::Street => order.address.get_or_insert_default().street = value,
            Self::StreetNumber => {
                order
                    .address
                    .get_or_insert_default()
                    .street_number = value;
            }
            Self::Neighborhood => {
                order
                    .address
                    .get_or_insert_default()
                    .neighborhood = value;
            }
            Self::City => order.address.get_or_insert_default().city = value,
            Self::State => order.address.get_or_insert_default().state = value,
            Self::Complement => {
                order.address.get_or_insert_default().complement =
                    if value.trim().is_empty() {
                        None
                    } else {
                        Some(value)
                    };
            }
            Self::HolderName => order.card.get_or_insert_default().holder_name = value,
            Self::Number => order.card.get_or_insert_default().number = value,
            Self::ExpirationMonth => {
                order
                    .card
                    .get_or_insert_default()
                    .expiration_month = value;
            }
            Self::ExpirationYear => {
                order
                    .card
                    .get_or_insert_default()
                    .expiration_year = value;
            }
            Self::Cvv => order.card.get_or_insert_default().cvv = value,
        }
    }

    /// Run this field's rule against the order.
    ///
    /// Returns the message to display, or `None` when the field is valid.
    /// Card fields are exempt for PIX and boleto orders.
    #[must_use]
    pub fn validate(self, order: &CheckoutOrder) -> Option<String> {
        if self.step() == CheckoutStep::Payment
            && order.payment_method != PaymentMethod::CreditCard
        {
            return None;
        }

        let value = self.value(order);
        if self == Self::Complement {
            return None;
        }
        if value.trim().is_empty() {
            return Some(self.required_message().to_string());
        }

        let invalid = match self {
            Self::Name | Self::HolderName => !validate::validate_name(value),
            Self::Email => !validate::validate_email(value),
            Self::Document => !validate::validate_cpf(value),
            Self::Phone => !validate::validate_phone(value),
            Self::Zipcode => !validate::validate_zipcode(value),
            Self::Street => !validate::validate_street(value),
            Self::StreetNumber => !validate::validate_street_number(value),
            Self::Neighborhood => !validate::validate_neighborhood(value),
            Self::City => !validate::validate_city(value),
            Self::State => !validate::validate_state(value),
            Self::Number => !validate::validate_card_number(value),
            Self::Cvv => !validate::validate_cvv(value),
            Self::ExpirationMonth | Self::ExpirationYear => {
                return self.validate_expiration_part(order);
            }
            Self::Complement => false,
        };

        invalid.then(|| self.invalid_message().to_string())
    }

    /// Joint month/year rule, reported on whichever part is being checked.
    ///
    /// The expiry comparison only fires once both parts are present, so a
    /// buyer who has typed the month but not the year sees only the year's
    /// required message.
    fn validate_expiration_part(self, order: &CheckoutOrder) -> Option<String> {
        let month = Self::ExpirationMonth.value(order);
        let year = Self::ExpirationYear.value(order);

        if self == Self::ExpirationMonth
            && !month
                .parse::<u32>()
                .is_ok_and(|m| (1..=12).contains(&m))
        {
            return Some("Mês inválido".to_string());
        }
        if self == Self::ExpirationYear && year.parse::<i32>().is_err() {
            return Some("Ano inválido".to_string());
        }

        if !month.trim().is_empty()
            && !year.trim().is_empty()
            && !validate::validate_expiration(month, year)
        {
            return Some("Cartão expirado".to_string());
        }
        None
    }

    const fn required_message(self) -> &'static str {
        match self {
            Self::Name => "Nome é obrigatório",
            Self::Email => "Email é obrigatório",
            Self::Document => "CPF é obrigatório",
            Self::Phone => "Telefone é obrigatório",
            Self::Zipcode => "CEP é obrigatório",
            Self::Street => "Logradouro é obrigatório",
            Self::StreetNumber => "Número é obrigatório",
            Self::Neighborhood => "Bairro é obrigatório",
            Self::City => "Cidade é obrigatória",
            Self::State => "Estado é obrigatório",
            Self::Complement => "",
            Self::HolderName => "Nome no cartão é obrigatório",
            Self::Number => "Número do cartão é obrigatório",
            Self::ExpirationMonth => "Mês é obrigatório",
            Self::ExpirationYear => "Ano é obrigatório",
            Self::Cvv => "CVV é obrigatório",
        }
    }

    const fn invalid_message(self) -> &'static str {
        match self {
            Self::Name | Self::HolderName => "Nome inválido",
            Self::Email => "Email inválido",
            Self::Document => "CPF inválido",
            Self::Phone => "Telefone inválido",
            Self::Zipcode => "CEP inválido",
            Self::Street => "Logradouro muito curto",
            Self::StreetNumber => "Número inválido",
            Self::Neighborhood => "Bairro muito curto",
            Self::City => "Cidade muito curta",
            Self::State => "Estado inválido",
            Self::Complement => "",
            Self::Number => "Número do cartão inválido",
            Self::ExpirationMonth => "Mês inválido",
            Self::ExpirationYear => "Ano inválido",
            Self::Cvv => "CVV deve ter 3 ou 4 dígitos",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BuyerData, CardData, CheckoutOrder, PaymentMethod};

    fn order_with_card(card: CardData) -> CheckoutOrder {
        CheckoutOrder {
            card: Some(card),
            ..CheckoutOrder::default()
        }
    }

    #[test]
    fn test_every_field_belongs_to_its_step() {
        for step in [
            CheckoutStep::Buyer,
            CheckoutStep::Address,
            CheckoutStep::Payment,
        ] {
            for field in Field::step_fields(step) {
                assert_eq!(field.step(), step, "{field} listed under wrong step");
            }
        }
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for field in [Field::StreetNumber, Field::HolderName, Field::Cvv] {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }

    #[test]
    fn test_assign_creates_sub_object() {
        let mut order = CheckoutOrder::new();
        Field::Email.assign(&mut order, "maria@example.com".to_string());
        assert_eq!(order.buyer.as_ref().unwrap().email, "maria@example.com");
        assert_eq!(Field::Email.value(&order), "maria@example.com");
    }

    #[test]
    fn test_assign_empty_complement_is_none() {
        let mut order = CheckoutOrder::new();
        Field::Complement.assign(&mut order, "  ".to_string());
        assert_eq!(order.address.as_ref().unwrap().complement, None);
        Field::Complement.assign(&mut order, "Apto 42".to_string());
        assert_eq!(
            order.address.as_ref().unwrap().complement.as_deref(),
            Some("Apto 42")
        );
    }

    #[test]
    fn test_missing_buyer_fields_use_required_messages() {
        let order = CheckoutOrder::new();
        assert_eq!(
            Field::Name.validate(&order).as_deref(),
            Some("Nome é obrigatório")
        );
        assert_eq!(
            Field::Email.validate(&order).as_deref(),
            Some("Email é obrigatório")
        );
    }

    #[test]
    fn test_invalid_email_message() {
        let mut order = CheckoutOrder::new();
        order.buyer = Some(BuyerData {
            email: "maria@invalid".to_string(),
            ..BuyerData::default()
        });
        assert_eq!(
            Field::Email.validate(&order).as_deref(),
            Some("Email inválido")
        );
    }

    #[test]
    fn test_card_fields_skipped_for_pix() {
        let mut order = CheckoutOrder::new();
        order.payment_method = PaymentMethod::Pix;
        assert_eq!(Field::Number.validate(&order), None);
        assert_eq!(Field::Cvv.validate(&order), None);
    }

    #[test]
    fn test_cvv_length_message() {
        let order = order_with_card(CardData {
            cvv: "12".to_string(),
            ..CardData::default()
        });
        assert_eq!(
            Field::Cvv.validate(&order).as_deref(),
            Some("CVV deve ter 3 ou 4 dígitos")
        );

        let order = order_with_card(CardData {
            cvv: "123".to_string(),
            ..CardData::default()
        });
        assert_eq!(Field::Cvv.validate(&order), None);
    }

    #[test]
    fn test_expired_card_flags_both_parts() {
        let order = order_with_card(CardData {
            expiration_month: "01".to_string(),
            expiration_year: "2020".to_string(),
            ..CardData::default()
        });
        assert_eq!(
            Field::ExpirationMonth.validate(&order).as_deref(),
            Some("Cartão expirado")
        );
        assert_eq!(
            Field::ExpirationYear.validate(&order).as_deref(),
            Some("Cartão expirado")
        );
    }

    #[test]
    fn test_month_alone_does_not_report_expiry() {
        let order = order_with_card(CardData {
            expiration_month: "12".to_string(),
            ..CardData::default()
        });
        assert_eq!(Field::ExpirationMonth.validate(&order), None);
        assert_eq!(
            Field::ExpirationYear.validate(&order).as_deref(),
            Some("Ano é obrigatório")
        );
    }

    #[test]
    fn test_out_of_range_month() {
        let order = order_with_card(CardData {
            expiration_month: "13".to_string(),
            expiration_year: "2099".to_string(),
            ..CardData::default()
        });
        assert_eq!(
            Field::ExpirationMonth.validate(&order).as_deref(),
            Some("Mês inválido")
        );
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(Field::Document.format("52998224725"), "529.982.247-25");
        assert_eq!(Field::Cvv.format("1a2b3"), "123");
        assert_eq!(Field::Name.format("João"), "João");
    }
}
