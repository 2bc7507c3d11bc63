use crate::{apis::auth::AccessToken, authenticator::Authenticator, Error};

/// Payit authentication API client.
#[derive(Debug, Clone)]
pub struct AuthApi {
    authenticator: Authenticator,
}

impl AuthApi {
    pub(crate) fn new(authenticator: Authenticator) -> Self {
        Self { authenticator }
    }

    /// Returns the current [`AccessToken`](crate::apis::auth::AccessToken) used to authenticate to the Payit APIs.
    /// If no token is cached yet, or the cached one is about to expire, a new client-credentials
    /// grant is fired against the configured token endpoint.
    pub async fn get_access_token(&self) -> Result<AccessToken, Error> {
        // Just delegate to the authenticator
        self.authenticator.get_access_token().await
    }
}
