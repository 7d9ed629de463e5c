//! HTTP Client
//!
//! `reqwest` implementation of [`WeightApi`].

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::error::{ClientError, ErrorBody};
use super::{ApiResponse, CancelToken, WeightApi};
use crate::dates::TimeWindow;
use crate::types::{ItemData, SessionData, SubmitReceipt, WeightSubmission, WeightTransaction};

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Directions requested by the transaction listing
const LIST_FILTER: &str = "in,out";

/// Configuration for the weighing backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api` suffix
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }
}

/// Weighing backend REST client
#[derive(Debug, Clone)]
pub struct WeightClient {
    client: Client,
    base_url: String,
}

impl WeightClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Call `GET /health`; any 2xx status counts as healthy
    pub async fn check_health(&self, cancel: &CancelToken) -> ApiResponse<()> {
        let request = self.client.get(self.url("/health"));

        let check = async {
            let response = request.send().await.map_err(ClientError::from_reqwest)?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(ClientError::Status {
                    status: response.status().as_u16(),
                    message: "Backend is not healthy".to_string(),
                })
            }
        };

        race(check, cancel).await.into()
    }

    /// Send one request and decode the JSON body.
    ///
    /// Non-2xx responses surface the body's `error` field, or `fallback`
    /// when the body has none.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        fallback: &'static str,
        cancel: &CancelToken,
    ) -> Result<T, ClientError> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("api_request", %request_id, operation);

        let exchange = async {
            let response = request.send().await.map_err(ClientError::from_reqwest)?;
            let status = response.status();

            if !status.is_success() {
                let body: Option<ErrorBody> = response.json().await.ok();
                let message = body
                    .and_then(|b| b.error)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            let bytes = response.bytes().await.map_err(ClientError::from_reqwest)?;
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
        };

        let result = race(exchange, cancel).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(_) => tracing::debug!("request completed"),
            Err(e) if e.is_cancelled() => tracing::debug!("request cancelled"),
            Err(e) => tracing::warn!(error = %e, "request failed"),
        });

        result
    }
}

/// Resolve to `Cancelled` as soon as `cancel` fires, without waiting for the
/// exchange to finish
async fn race<T, F>(exchange: F, cancel: &CancelToken) -> Result<T, ClientError>
where
    F: std::future::Future<Output = Result<T, ClientError>>,
{
    if cancel.is_cancelled() {
        return Err(ClientError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = exchange => result,
    }
}

#[async_trait::async_trait]
impl WeightApi for WeightClient {
    async fn get_transactions(
        &self,
        window: &TimeWindow,
        cancel: &CancelToken,
    ) -> ApiResponse<Vec<WeightTransaction>> {
        let request = self.client.get(self.url("/api/weight")).query(&[
            ("from", window.from.as_str()),
            ("to", window.to.as_str()),
            ("filter", LIST_FILTER),
        ]);

        self.execute(
            "get_transactions",
            request,
            "Failed to fetch transactions",
            cancel,
        )
        .await
        .into()
    }

    async fn submit_weight(
        &self,
        submission: &WeightSubmission,
        cancel: &CancelToken,
    ) -> ApiResponse<SubmitReceipt> {
        let request = self.client.post(self.url("/api/weight")).json(submission);

        self.execute("submit_weight", request, "Failed to submit weight", cancel)
            .await
            .into()
    }

    async fn get_item_details(&self, id: &str, cancel: &CancelToken) -> ApiResponse<ItemData> {
        let path = format!("/api/item/{}", urlencoding::encode(id));
        let request = self.client.get(self.url(&path));

        self.execute(
            "get_item_details",
            request,
            "Failed to fetch item details",
            cancel,
        )
        .await
        .into()
    }

    async fn get_session_details(
        &self,
        id: &str,
        cancel: &CancelToken,
    ) -> ApiResponse<SessionData> {
        let path = format!("/api/session/{}", urlencoding::encode(id));
        let request = self.client.get(self.url(&path));

        self.execute(
            "get_session_details",
            request,
            "Failed to fetch session details",
            cancel,
        )
        .await
        .into()
    }
}
