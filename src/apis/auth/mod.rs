//! Access tokens and the client-credentials grant.

mod api;
mod model;

pub use api::AuthApi;
pub use model::{AccessToken, Token};
pub(crate) use model::{ClientCredentialsGrant, RawTokenResponse};
