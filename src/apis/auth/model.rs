use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;

/// Opaque bearer token used to authenticate to the Payit APIs.
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub(crate) token: Token,
    pub(crate) expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Actual token contents held by this `AccessToken` instance.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Expiration date of the token, as announced by the token endpoint.
    ///
    /// The client stops reusing a token 30 seconds before this instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl Deref for AccessToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        self.token()
    }
}

/// Wrapper for a secret string that makes it harder to accidentally expose secrets
/// and ensures the backing memory is wiped on drop.
///
/// It is a wrapper around a [`secrecy::Secret`](secrecy::Secret).
///
/// ```rust
/// # use payit_rust::apis::auth::Token;
/// let token = Token::new("supersecret");
///
/// // The secret is redacted when printed with Debug
/// assert!(!format!("{:?}", token).contains("supersecret"));
///
/// // But can be manually exposed calling `expose_secret()`...
/// assert_eq!(token.expose_secret(), "supersecret");
///
/// // ... Or if serialized with Serde
/// let serialized = serde_json::to_string(&token).unwrap();
/// assert!(serialized.contains("supersecret"));
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Token(#[serde(serialize_with = "serialize_secret")] Secret<String>);

impl Token {
    /// Wraps a secret string in a new `Token`.
    pub fn new<T: Into<String>>(s: T) -> Self {
        Self(Secret::new(s.into()))
    }

    /// Exposes a reference to the underlying secret string.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl<T> From<T> for Token
where
    T: Into<String>,
{
    fn from(s: T) -> Self {
        Token::new(s)
    }
}

fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::ser::Serializer,
{
    secret.expose_secret().serialize(serializer)
}

/// Form body of a client-credentials grant.
#[derive(Serialize, Debug)]
pub(crate) struct ClientCredentialsGrant<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<&'a str>,
}

impl<'a> ClientCredentialsGrant<'a> {
    pub fn new(client_id: &'a str, client_secret: &'a Token, resource: Option<&'a str>) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id,
            client_secret: client_secret.expose_secret(),
            resource,
        }
    }
}

/// Body of a successful response from the token endpoint.
///
/// Every field is optional: a missing `access_token` is reported as an error by the caller,
/// a missing or unreadable `expires_in` falls back to the default token lifetime.
#[derive(Deserialize, Debug)]
pub(crate) struct RawTokenResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<Value>,
}

impl RawTokenResponse {
    /// Lifetime announced by the token endpoint, in seconds.
    ///
    /// Integers, floats (truncated) and numeric strings are accepted.
    pub fn expires_in_seconds(&self) -> Option<i64> {
        match self.expires_in.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_seconds)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate_seconds))
            }
            _ => None,
        }
    }
}

fn truncate_seconds(f: f64) -> Option<i64> {
    // `as` saturates, out of range values are rejected instead
    (f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64).then(|| f.trunc() as i64)
}

// A token that is not a string is as good as no token at all
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
