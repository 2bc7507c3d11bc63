//! Shared request plumbing behind the domain clients: URL building, per-client header sets
//! and JSON decoding of responses.

use crate::{
    common::{
        API_VERSION_HEADER, JSON_MEDIA_TYPE, LINK_MANAGEMENT_API_VERSION,
        LINK_MANAGEMENT_MEDIA_TYPE, OCTET_STREAM_MEDIA_TYPE, TRANSACTION_ID_HEADER,
    },
    Error,
};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

/// Set of headers a client variant attaches to its JSON requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderProfile {
    /// Plain JSON API used by the payments client.
    Payments,
    /// Versioned link-management API, which also wants a unique transaction id per request.
    LinkManagement,
}

impl HeaderProfile {
    fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            HeaderProfile::Payments => builder
                .header(ACCEPT, JSON_MEDIA_TYPE)
                .header(CONTENT_TYPE, JSON_MEDIA_TYPE),
            HeaderProfile::LinkManagement => {
                let transaction_id = new_transaction_id();
                tracing::debug!(%transaction_id, "Tagging link-management request");

                builder
                    .header(ACCEPT, LINK_MANAGEMENT_MEDIA_TYPE)
                    .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
                    .header(API_VERSION_HEADER, LINK_MANAGEMENT_API_VERSION)
                    .header(TRANSACTION_ID_HEADER, transaction_id)
            }
        }
    }
}

fn new_transaction_id() -> String {
    format!("txn_{}", Uuid::new_v4().simple())
}

/// Issues authorized requests against `base_url` and decodes their responses.
///
/// Authorization itself is injected by the middleware stack of the wrapped client.
#[derive(Clone)]
pub(crate) struct ApiRequestExecutor {
    client: ClientWithMiddleware,
    base_url: String,
    profile: HeaderProfile,
}

impl ApiRequestExecutor {
    pub fn new(client: ClientWithMiddleware, base_url: &str, profile: HeaderProfile) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a JSON request to `base_url + path`.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        let builder = self.client.request(method, self.url(path));

        ApiRequest {
            builder: self.profile.apply(builder),
        }
    }

    /// Downloads `base_url + path` as raw bytes, without any decoding.
    pub async fn download_binary(&self, path: &str) -> Result<Vec<u8>, Error> {
        let bytes = self
            .client
            .get(self.url(path))
            .header(ACCEPT, OCTET_STREAM_MEDIA_TYPE)
            .send()
            .await?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Debug for ApiRequestExecutor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequestExecutor")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// A JSON request under construction.
pub(crate) struct ApiRequest {
    builder: RequestBuilder,
}

impl ApiRequest {
    /// Sets a JSON-serialized body.
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Self {
        Self {
            builder: self.builder.json(body),
        }
    }

    /// Appends URL query parameters.
    pub fn query<T: Serialize + ?Sized>(self, query: &T) -> Self {
        Self {
            builder: self.builder.query(query),
        }
    }

    /// Sends the request and decodes the response body as JSON.
    pub async fn send(self) -> Result<Value, Error> {
        let bytes = self.builder.send().await?.bytes().await?;
        decode_json(&bytes)
    }
}

/// Decodes a response body. An empty body (e.g. `204 No Content`) decodes to `null`.
fn decode_json(bytes: &[u8]) -> Result<Value, Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(bytes).map_err(|source| Error::ResponseDecode {
        source,
        body: String::from_utf8_lossy(bytes).into_owned(),
    })
}
