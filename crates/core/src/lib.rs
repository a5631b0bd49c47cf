//! Mimo Checkout Core - Shared domain library.
//!
//! This crate provides the pure part of the checkout: the order aggregate,
//! the input masks applied while the buyer types, and the field validation
//! rules used both per-keystroke and per-step.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. The `mimo-checkout` crate layers the step state
//! machine and the Pagar.me / ViaCEP clients on top of it.
//!
//! # Modules
//!
//! - [`types`] - Order aggregate, checkout steps, fields and prices
//! - [`format`] - Display masks for documents, phones, cards and money
//! - [`validate`] - Boolean validity rules (CPF check digits, Luhn, etc.)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod types;
pub mod validate;

pub use types::*;
