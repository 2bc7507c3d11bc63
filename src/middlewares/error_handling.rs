use crate::error::{ApiError, Error};
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Reqwest middleware which translates non-success responses returned from Payit APIs
/// into [`Error::ApiError`](crate::error::Error)s carrying the status code and the raw body.
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let response = next.run(req, extensions).await?;

        if !response.status().is_success() {
            let status = response.status();
            let bytes = response.bytes().await?;

            tracing::debug!("Failed HTTP request. Status code: {}", status);

            return Err(Error::ApiError(ApiError {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
            .into());
        }

        Ok(response)
    }
}
