//! Link-management API: one-time and reusable payment links, refunds, reconciliation
//! files, health and version information.

mod api;

pub use api::LinkClient;
