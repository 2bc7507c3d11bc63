//! Standard errors used by all functions in the crate.

use std::fmt;

/// Error collecting all possible failures of the Payit client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The OAuth2 client-credentials grant failed.
    #[error("Failed to obtain access token: {0}")]
    TokenAcquisition(#[from] TokenAcquisitionError),
    /// A Payit API endpoint answered with a non-success HTTP status.
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// A successful response carried a body that is not valid JSON.
    #[error("Failed to decode response body: {source}")]
    ResponseDecode {
        source: serde_json::Error,
        /// Raw response body, lossily converted to UTF-8.
        body: String,
    },
    /// The client configuration is missing a required field or holds an invalid value.
    #[error("Invalid client configuration: {0}")]
    Configuration(String),
    /// Transport failure (connection error, timeout, ...) on an API call.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Failure of the client-credentials grant against the token endpoint.
#[derive(thiserror::Error, Debug)]
pub enum TokenAcquisitionError {
    /// The token endpoint could not be reached, or the call timed out.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    /// The token endpoint answered with a non-success HTTP status.
    #[error("token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    /// The token endpoint answered successfully but without a usable `access_token`.
    #[error("No access_token in token response: {body}")]
    MissingAccessToken { body: String },
}

/// Payit HTTP APIs error.
#[derive(thiserror::Error, Debug)]
pub struct ApiError {
    /// HTTP status returned by the server.
    pub status: u16,
    /// Raw response body, lossily converted to UTF-8.
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payit HTTP error {}", self.status)?;

        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }

        Ok(())
    }
}
