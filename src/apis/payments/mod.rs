//! Payments API: payment creation, confirmation, status and eligible banks.

mod api;

pub use api::PaymentClient;
