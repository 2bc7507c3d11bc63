use crate::{
    apis::auth::{AccessToken, ClientCredentialsGrant, RawTokenResponse, Token},
    common::{DEFAULT_TOKEN_LIFETIME_SECONDS, TOKEN_EXPIRY_SAFETY_MARGIN_SECONDS},
    error::{Error, TokenAcquisitionError},
};
use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tokio::sync::{mpsc, oneshot};

/// Credentials of a client-credentials grant.
#[derive(Debug)]
pub(crate) struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Token,
    pub resource: Option<String>,
}

/// Manager for the client-credentials grant and the cached access token.
#[derive(Debug, Clone)]
pub struct Authenticator {
    tx: mpsc::UnboundedSender<oneshot::Sender<Result<AccessToken, Error>>>,
}

impl Authenticator {
    /// Starts a new authenticator for the given credentials.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn new(
        client: ClientWithMiddleware,
        token_url: Url,
        credentials: ClientCredentials,
    ) -> Self {
        let state = AuthenticatorState {
            client,
            token_url,
            credentials,
            access_token: None,
        };

        // Spawn a long running task which will run until the authenticator is dropped
        let (tx, rx) = mpsc::unbounded_channel();
        #[cfg(test)]
        tests::mocked_time::spawn(async move {
            // We need to propagate the mocked time task-local in order to control time in the tests
            process_loop(state, rx).await;
        });
        #[cfg(not(test))]
        tokio::spawn(async move {
            process_loop(state, rx).await;
        });

        Self { tx }
    }

    /// Returns the current access token used for authentication against the Payit APIs.
    /// If there's no access token available, or the available one is within 30 seconds of
    /// its expiry, a new one is requested from the token endpoint.
    ///
    /// Requests are served one at a time, so concurrent calls racing past an expired token
    /// result in one single call to the token endpoint, and all of them observe the same token.
    pub async fn get_access_token(&self) -> Result<AccessToken, Error> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(tx)
            .map_err(|_| Error::Other(anyhow::anyhow!("Token manager task is not running")))?;

        rx.await.map_err(|_| {
            Error::Other(anyhow::anyhow!(
                "Token manager task stopped before answering"
            ))
        })?
    }
}

/// Internal state of the authenticator.
struct AuthenticatorState {
    client: ClientWithMiddleware,
    token_url: Url,
    credentials: ClientCredentials,
    access_token: Option<AccessToken>,
}

async fn process_loop(
    mut state: AuthenticatorState,
    mut rx: mpsc::UnboundedReceiver<oneshot::Sender<Result<AccessToken, Error>>>,
) {
    // Serve requests until every `Authenticator` handle has been dropped
    while let Some(reply) = rx.recv().await {
        if reply
            .send(process_get_access_token(&mut state).await)
            .is_err()
        {
            tracing::warn!("Receiver dropped before the reply");
        }
    }
}

#[tracing::instrument(name = "Get Access Token", level = "debug", skip(state))]
async fn process_get_access_token(state: &mut AuthenticatorState) -> Result<AccessToken, Error> {
    if let Some(token) = &state.access_token {
        if !should_refresh_token(token) {
            tracing::debug!("Reusing existing access token");
            return Ok(token.clone());
        }
    }

    let grant = ClientCredentialsGrant::new(
        &state.credentials.client_id,
        &state.credentials.client_secret,
        state.credentials.resource.as_deref(),
    );

    let response = state
        .client
        .post(state.token_url.clone())
        .form(&grant)
        .send()
        .await
        .map_err(transport_error)?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(TokenAcquisitionError::Transport)?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    if !status.is_success() {
        tracing::debug!("Token endpoint rejected the grant. Status code: {}", status);
        return Err(TokenAcquisitionError::Rejected {
            status: status.as_u16(),
            body,
        }
        .into());
    }

    let res = serde_json::from_slice::<RawTokenResponse>(&bytes).ok();
    let access_token = match res.as_ref().and_then(|r| r.access_token.as_deref()) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(TokenAcquisitionError::MissingAccessToken { body }.into()),
    };
    let now = now();
    let announced = res.as_ref().and_then(RawTokenResponse::expires_in_seconds);
    let (expires_in, expires_at) = match announced.map(|s| (s, expiry(now, s))) {
        Some((s, Some(expires_at))) => (s, expires_at),
        unusable => {
            if let Some((s, _)) = unusable {
                tracing::warn!(expires_in = s, "Token lifetime out of range, using the default");
            }
            (
                DEFAULT_TOKEN_LIFETIME_SECONDS,
                now + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS),
            )
        }
    };

    let token = AccessToken {
        token: access_token.into(),
        expires_at,
    };
    state.access_token = Some(token.clone());

    tracing::info!(expires_in, "Got new access token");

    Ok(token)
}

fn transport_error(e: reqwest_middleware::Error) -> Error {
    match e {
        reqwest_middleware::Error::Reqwest(e) => TokenAcquisitionError::Transport(e).into(),
        reqwest_middleware::Error::Middleware(e) => Error::Other(e),
    }
}

/// Instant `expires_in` seconds after `now`, or `None` if it cannot be represented.
fn expiry(now: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::try_seconds(expires_in)?)
}

/// Returns `true` if the token is within the safety margin of its expiration and should be refreshed.
fn should_refresh_token(token: &AccessToken) -> bool {
    token
        .expires_at
        .checked_sub_signed(Duration::seconds(TOKEN_EXPIRY_SAFETY_MARGIN_SECONDS))
        .map_or(true, |refresh_at| now() >= refresh_at)
}

// Select an implementation of `now()` depending on whether we are testing or not
#[cfg(not(test))]
fn now() -> DateTime<Utc> {
    Utc::now()
}
#[cfg(test)]
use tests::mocked_time::now;
