//! Core types for the Mimo checkout.
//!
//! This module provides the order aggregate and the supporting enums used
//! by the step state machine in `mimo-checkout`.

pub mod field;
pub mod order;
pub mod price;
pub mod step;

pub use field::{Field, ValidationErrors};
pub use order::{AddressData, BuyerData, CardData, CartItem, CheckoutOrder, PaymentMethod};
pub use price::{CurrencyCode, Price};
pub use step::CheckoutStep;
