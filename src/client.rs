//! Module containing the main Payit API client.

use crate::{
    apis::{auth::AuthApi, links::LinkClient, payments::PaymentClient},
    authenticator::{Authenticator, ClientCredentials},
    config::ClientConfig,
    executor::{ApiRequestExecutor, HeaderProfile},
    middlewares::{
        authentication::AuthenticationMiddleware, error_handling::ErrorHandlingMiddleware,
        inject_user_agent::InjectUserAgentMiddleware,
    },
    Error,
};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::{DefaultSpanBackend, TracingMiddleware};
use std::sync::Arc;

/// Client for the Payit APIs.
///
/// All the API clients share one access token cache. Cloning a `PayitClient` is cheap
/// and clones keep sharing the same cache.
///
/// No request is ever retried automatically: every failure is returned to the caller as is.
#[derive(Debug, Clone)]
pub struct PayitClient {
    /// Authentication APIs client.
    pub auth: AuthApi,
    /// Payments APIs client.
    pub payments: PaymentClient,
    /// Link-management APIs client.
    pub links: LinkClient,
}

impl PayitClient {
    /// Builds a new [`PayitClient`](crate::client::PayitClient) with the default HTTP settings.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ClientConfig) -> Result<PayitClient, Error> {
        PayitClientBuilder::new(config).build()
    }

    /// Returns a new builder to configure a new [`PayitClient`](crate::client::PayitClient).
    pub fn builder(config: ClientConfig) -> PayitClientBuilder {
        PayitClientBuilder::new(config)
    }
}

/// Builder for a [`PayitClient`](crate::client::PayitClient).
#[derive(Debug)]
pub struct PayitClientBuilder {
    config: ClientConfig,
    http_client: reqwest::ClientBuilder,
}

impl PayitClientBuilder {
    /// Creates a new builder to configure a [`PayitClient`](crate::client::PayitClient).
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::builder(),
        }
    }

    /// Sets a preconfigured reqwest [`ClientBuilder`](reqwest::ClientBuilder) to use, e.g. to set up proxies
    /// or custom root certificates.
    ///
    /// The timeout of the [`ClientConfig`](crate::config::ClientConfig) always overrides any timeout set here.
    pub fn with_http_client_builder(mut self, http_client: reqwest::ClientBuilder) -> Self {
        self.http_client = http_client;
        self
    }

    /// Consumes the builder and builds a new [`PayitClient`](crate::client::PayitClient).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Result<PayitClient, Error> {
        let config = self.config;
        config.validate()?;

        let token_url = Url::parse(&config.token_url)
            .map_err(|e| Error::Configuration(format!("`token_url` is not a valid URL: {}", e)))?;
        let http_client = self
            .http_client
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build the HTTP client: {}", e)))?;

        // Build an authenticator
        let authenticator = Authenticator::new(
            build_client_with_middleware(http_client.clone(), None),
            token_url,
            ClientCredentials {
                client_id: config.client_id,
                client_secret: config.client_secret,
                resource: config.resource,
            },
        );

        let client = build_client_with_middleware(
            http_client,
            Some(AuthenticationMiddleware {
                authenticator: authenticator.clone(),
            }),
        );

        let payments = ApiRequestExecutor::new(client.clone(), &config.base_url, HeaderProfile::Payments);
        let links = ApiRequestExecutor::new(client, &config.base_url, HeaderProfile::LinkManagement);

        tracing::debug!(environment = %config.environment, "Built Payit client");

        Ok(PayitClient {
            auth: AuthApi::new(authenticator),
            payments: PaymentClient::new(Arc::new(payments)),
            links: LinkClient::new(Arc::new(links), config.environment),
        })
    }
}

fn build_client_with_middleware(
    client: reqwest::Client,
    auth_middleware: Option<AuthenticationMiddleware>,
) -> ClientWithMiddleware {
    let mut builder = reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::<DefaultSpanBackend>::default())
        .with(InjectUserAgentMiddleware::new());

    // Token endpoint failures are classified by the authenticator itself
    if let Some(auth_middleware) = auth_middleware {
        builder = builder.with(ErrorHandlingMiddleware).with(auth_middleware);
    }

    builder.build()
}
