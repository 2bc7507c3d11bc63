//! Rust client for the Payit payments API.
//!
//! The client takes care of the OAuth2 client-credentials flow: the access token is requested
//! on first use, cached, and renewed shortly before it expires. Concurrent callers share one
//! token and never trigger more than one token request at a time.
//!
//! # Usage
//!
//! ## Initialize a new `PayitClient`
//!
//! Create a [`ClientConfig`](crate::config::ClientConfig) with your API base URL, token endpoint
//! and client credentials, then build a [`PayitClient`](crate::client::PayitClient) from it.
//!
//! ```rust,no_run
//! # use payit_rust::{PayitClient, config::{ClientConfigBuilder, Environment}};
//! # #[tokio::main]
//! # async fn main() -> Result<(), payit_rust::Error> {
//! let config = ClientConfigBuilder::default()
//!     .base_url("https://sandbox.payit.example/api")
//!     .token_url("https://login.example/oauth2/token")
//!     .client_id("some-client-id")
//!     .client_secret("some-client-secret")
//!     .resource("some-resource")
//!     .environment(Environment::Proving)
//!     .build()?;
//!
//! let payit = PayitClient::new(config)?;
//! # Ok(())
//! # }
//! ```
//!
//! By default, link-management endpoints are routed to the proving service.
//! Use [`Environment::Production`](crate::config::Environment::Production) to reach the production one.
//!
//! ## Create a payment link
//!
//! ```rust,no_run
//! # use payit_rust::{PayitClient, Error};
//! # use serde_json::json;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let payit: PayitClient = unreachable!();
//! #
//! let link = payit
//!     .links
//!     .create_one_time_link(&json!({
//!         "amount": 100.00,
//!         "currency": "GBP",
//!         "description": "Test Payment"
//!     }))
//!     .await?;
//!
//! println!("Created new link: {}", link);
//! # Ok(())
//! # }
//! ```
//!
//! ## Download a reconciliation file
//!
//! ```rust,no_run
//! # use payit_rust::{PayitClient, Error};
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! # let payit: PayitClient = unreachable!();
//! #
//! let csv = payit
//!     .links
//!     .download_reconciliation("CSV", "2024-01-01", "1")
//!     .await?;
//!
//! println!("Downloaded {} bytes", csv.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod apis;
pub(crate) mod authenticator;
pub mod client;
mod common;
pub mod config;
pub mod error;
mod executor;
mod middlewares;

pub use client::PayitClient;
pub use error::Error;
