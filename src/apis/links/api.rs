use crate::{
    common::LINK_SERVICE_MARKER, config::Environment, executor::ApiRequestExecutor, Error,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use urlencoding::encode;

/// Payit link-management APIs client.
///
/// Payloads and criteria are forwarded as-is and responses are returned as decoded JSON.
#[derive(Clone, Debug)]
pub struct LinkClient {
    executor: Arc<ApiRequestExecutor>,
    environment: Environment,
}

impl LinkClient {
    pub(crate) fn new(executor: Arc<ApiRequestExecutor>, environment: Environment) -> Self {
        Self {
            executor,
            environment,
        }
    }

    /// Creates a one-time payment link.
    #[tracing::instrument(name = "Create One-Time Link", skip_all)]
    pub async fn create_one_time_link<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Value, Error> {
        self.executor
            .request(Method::POST, &self.link_path("/links"))
            .json(payload)
            .send()
            .await
    }

    /// Creates a reusable payment link.
    #[tracing::instrument(name = "Create Reusable Link", skip_all)]
    pub async fn create_reusable_link<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<Value, Error> {
        self.executor
            .request(Method::POST, &self.link_path("/reusableLinks"))
            .json(payload)
            .send()
            .await
    }

    /// Cancels a one-time link.
    #[tracing::instrument(name = "Cancel One-Time Link", skip(self))]
    pub async fn cancel_one_time_link(&self, link_id: &str) -> Result<Value, Error> {
        self.executor
            .request(Method::DELETE, &format!("/links/{}", encode(link_id)))
            .send()
            .await
    }

    /// Cancels a reusable link.
    #[tracing::instrument(name = "Cancel Reusable Link", skip(self))]
    pub async fn cancel_reusable_link(&self, link_id: &str) -> Result<Value, Error> {
        self.executor
            .request(Method::DELETE, &format!("/reusableLinks/{}", encode(link_id)))
            .send()
            .await
    }

    /// Retrieves historical one-time link details matching the given criteria.
    #[tracing::instrument(name = "Get Link Details", skip_all)]
    pub async fn get_link_details<T: Serialize + ?Sized>(
        &self,
        criteria: &T,
    ) -> Result<Value, Error> {
        self.post("/linkDetails", criteria).await
    }

    /// Retrieves historical reusable link details matching the given criteria.
    #[tracing::instrument(name = "Get Reusable Link Details", skip_all)]
    pub async fn get_reusable_link_details<T: Serialize + ?Sized>(
        &self,
        criteria: &T,
    ) -> Result<Value, Error> {
        self.post("/reusableLinkDetails", criteria).await
    }

    /// Retrieves the payment sessions of reusable links matching the given criteria.
    #[tracing::instrument(name = "Get Reusable Link Sessions", skip_all)]
    pub async fn get_reusable_link_sessions<T: Serialize + ?Sized>(
        &self,
        criteria: &T,
    ) -> Result<Value, Error> {
        self.post("/reusableLinksSessions", criteria).await
    }

    /// Requests a refund. This is the first phase of the refund protocol and must be followed by
    /// [`confirm_refund`](Self::confirm_refund).
    ///
    /// The two calls are independent: correlating them through the payloads, and recovering when the
    /// confirmation fails after a successful request, is up to the caller.
    #[tracing::instrument(name = "Request Refund", skip_all)]
    pub async fn request_refund<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Value, Error> {
        self.post("/merchant-refunds", payload).await
    }

    /// Confirms a refund previously issued with [`request_refund`](Self::request_refund).
    #[tracing::instrument(name = "Confirm Refund", skip_all)]
    pub async fn confirm_refund<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Value, Error> {
        self.post("/merchant-refunds-confirm", payload).await
    }

    /// Downloads a reconciliation file. The bytes are returned exactly as served.
    #[tracing::instrument(name = "Download Reconciliation File", skip(self))]
    pub async fn download_reconciliation(
        &self,
        filetype: &str,
        date: &str,
        run: &str,
    ) -> Result<Vec<u8>, Error> {
        let bytes = self
            .executor
            .download_binary(&format!(
                "/download/reconciliation/{}/{}/{}",
                encode(filetype),
                encode(date),
                encode(run)
            ))
            .await?;

        tracing::debug!(size = bytes.len(), "Downloaded reconciliation file");

        Ok(bytes)
    }

    /// Sets the reconciliation file version used for a company.
    #[tracing::instrument(name = "Set Reconciliation Version", skip(self))]
    pub async fn set_reconciliation_version(
        &self,
        company_id: &str,
        version: &str,
    ) -> Result<Value, Error> {
        self.executor
            .request(
                Method::POST,
                &format!(
                    "/reconciliation-version/{}/{}",
                    encode(company_id),
                    encode(version)
                ),
            )
            .send()
            .await
    }

    /// Gets version information of the API.
    #[tracing::instrument(name = "Get Info", skip(self))]
    pub async fn get_info(&self) -> Result<Value, Error> {
        self.executor.request(Method::GET, "/info").send().await
    }

    /// Gets the health status of the API.
    #[tracing::instrument(name = "Get Health", skip(self))]
    pub async fn get_health(&self) -> Result<Value, Error> {
        self.executor.request(Method::GET, "/health").send().await
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, Error> {
        self.executor
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
    }

    /// Path of a link-management endpoint, relative to the base URL.
    ///
    /// A base URL that already points at the link-management service gets the endpoint as is,
    /// otherwise the endpoint is nested under the service segment of the configured environment.
    fn link_path(&self, endpoint: &str) -> String {
        link_path(self.executor.base_url(), self.environment, endpoint)
    }
}

fn link_path(base_url: &str, environment: Environment, endpoint: &str) -> String {
    if base_url.contains(LINK_SERVICE_MARKER) {
        return endpoint.to_string();
    }

    format!("/{}{}", environment.link_service_segment(), endpoint)
}
