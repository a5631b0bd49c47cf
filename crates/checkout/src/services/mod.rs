//! Clients for the external collaborators.
//!
//! - [`pagarme`] - Payment gateway (orders, PIX/boleto charge details)
//! - [`viacep`] - Postal-code lookup used to pre-fill the address step

pub mod pagarme;
pub mod viacep;
