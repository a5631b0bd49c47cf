//! Mimo Checkout - step-wise checkout flow.
//!
//! This crate drives the three-step checkout (buyer -> address -> payment)
//! for the gift-registry storefront: it owns the in-progress order, the
//! per-field error map and the step transitions, and talks to the two
//! external collaborators (the Pagar.me payment gateway and the ViaCEP
//! postal-code lookup). The pure formatting and validation rules live in
//! `mimo-checkout-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod services;
pub mod session;

pub use session::{CheckoutSession, PaymentGateway, PaymentOutcome};
