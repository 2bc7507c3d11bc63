use crate::{executor::ApiRequestExecutor, Error};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use urlencoding::encode;

/// Payit payments APIs client.
///
/// Payloads are forwarded as-is and responses are returned as decoded JSON:
/// their business content is the caller's concern.
#[derive(Clone, Debug)]
pub struct PaymentClient {
    executor: Arc<ApiRequestExecutor>,
}

impl PaymentClient {
    pub(crate) fn new(executor: Arc<ApiRequestExecutor>) -> Self {
        Self { executor }
    }

    /// Initiates a new payment.
    #[tracing::instrument(name = "Create Payment", skip_all)]
    pub async fn create_payment<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Value, Error> {
        self.executor
            .request(Method::POST, "/lp2nos-merchant/merchant-payments")
            .json(payload)
            .send()
            .await
    }

    /// Confirms a previously created payment. Without a payload, no request body is sent.
    ///
    /// ```rust,no_run
    /// # use payit_rust::PayitClient;
    /// # use serde_json::Value;
    /// # async fn run(payit: PayitClient) -> Result<(), payit_rust::Error> {
    /// payit.payments.confirm_payment("p-123", None::<&Value>).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(name = "Confirm Payment", skip(self, payload))]
    pub async fn confirm_payment<T: Serialize + ?Sized>(
        &self,
        payment_id: &str,
        payload: Option<&T>,
    ) -> Result<Value, Error> {
        let mut request = self
            .executor
            .request(Method::POST, &format!("/payments/{}/confirm", encode(payment_id)));
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        request.send().await
    }

    /// Retrieves the status of a payment.
    #[tracing::instrument(name = "Get Payment Status", skip(self))]
    pub async fn get_payment_status(&self, payment_id: &str) -> Result<Value, Error> {
        self.executor
            .request(Method::GET, &format!("/payments/{}/status", encode(payment_id)))
            .send()
            .await
    }

    /// Lists the banks eligible for payments, optionally filtered by query parameters
    /// (e.g. `&[("country", "GB")]`).
    #[tracing::instrument(name = "List Banks", skip(self))]
    pub async fn list_banks(&self, query: &[(&str, &str)]) -> Result<Value, Error> {
        let mut request = self.executor.request(Method::GET, "/eligible-banks");
        if !query.is_empty() {
            request = request.query(query);
        }

        request.send().await
    }
}
