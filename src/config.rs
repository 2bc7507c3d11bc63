//! Configuration of a [`PayitClient`](crate::client::PayitClient).

use crate::{
    apis::auth::Token,
    common::{DEFAULT_TIMEOUT_SECONDS, PRODUCTION_LINK_SERVICE, PROVING_LINK_SERVICE},
    Error,
};
use derive_builder::Builder;
use reqwest::Url;
use serde::Deserialize;
use std::{fmt, time::Duration};

/// Payit environment the client talks to.
///
/// Only the literal tag `production` selects [`Environment::Production`].
/// Any other tag (`proving`, `sandbox`, ...) falls back to [`Environment::Proving`].
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum Environment {
    #[default]
    Proving,
    Production,
}

impl Environment {
    /// Service segment prefixed to link-management endpoints in this environment.
    pub fn link_service_segment(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_LINK_SERVICE,
            Environment::Proving => PROVING_LINK_SERVICE,
        }
    }
}

impl From<&str> for Environment {
    fn from(tag: &str) -> Self {
        match tag {
            "production" => Environment::Production,
            _ => Environment::Proving,
        }
    }
}

impl From<String> for Environment {
    fn from(tag: String) -> Self {
        Environment::from(tag.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Proving => "proving",
            Environment::Production => "production",
        })
    }
}

/// Settings needed to authenticate and talk to the Payit APIs.
///
/// ```rust
/// # use payit_rust::config::{ClientConfigBuilder, Environment};
/// let config = ClientConfigBuilder::default()
///     .base_url("https://sandbox.payit.example/api")
///     .token_url("https://login.example/oauth2/token")
///     .client_id("my-client-id")
///     .client_secret("my-client-secret")
///     .environment(Environment::Proving)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.timeout().as_secs(), 10);
/// ```
#[derive(Deserialize, Debug, Clone, Builder)]
#[builder(
    setter(into),
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: Token,
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub resource: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub environment: Environment,
    #[builder(default = "DEFAULT_TIMEOUT_SECONDS")]
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ClientConfig {
    /// Upper bound for every outbound HTTP call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Checks the invariants the builder enforces, for configs obtained through serde.
    pub fn validate(&self) -> Result<(), Error> {
        check_url("base_url", &self.base_url)?;
        check_url("token_url", &self.token_url)?;
        check_not_empty("client_id", &self.client_id)?;
        check_not_empty("client_secret", self.client_secret.expose_secret())?;
        check_timeout(self.timeout_seconds)
    }
}

impl ClientConfigBuilder {
    fn validate(&self) -> Result<(), Error> {
        if let Some(base_url) = &self.base_url {
            check_url("base_url", base_url)?;
        }
        if let Some(token_url) = &self.token_url {
            check_url("token_url", token_url)?;
        }
        if let Some(client_id) = &self.client_id {
            check_not_empty("client_id", client_id)?;
        }
        if let Some(client_secret) = &self.client_secret {
            check_not_empty("client_secret", client_secret.expose_secret())?;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            check_timeout(timeout_seconds)?;
        }
        Ok(())
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        Error::Configuration(format!("missing required field `{}`", e.field_name()))
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn check_not_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Configuration(format!("`{}` must not be empty", field)));
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), Error> {
    check_not_empty(field, value)?;
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| Error::Configuration(format!("`{}` is not a valid URL: {}", field, e)))
}

fn check_timeout(timeout_seconds: u64) -> Result<(), Error> {
    if timeout_seconds == 0 {
        return Err(Error::Configuration(
            "`timeout_seconds` must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
