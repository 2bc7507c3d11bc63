//! Clients for the various Payit APIs.

pub mod auth;
pub mod links;
pub mod payments;
