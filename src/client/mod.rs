//! Weighing Backend Client
//!
//! REST client for the weighing backend.
//!
//! # Endpoints
//!
//! - `GET /api/weight?from=&to=&filter=in,out` - Recent transactions
//! - `POST /api/weight` - Submit a weighing
//! - `GET /api/item/:id` - Truck or container details
//! - `GET /api/session/:id` - Session details
//! - `GET /health` - Backend health
//!
//! Every operation resolves to an [`ApiResponse`]; nothing is raised to the
//! caller. Every operation takes a [`CancelToken`].

mod cancel;
mod error;
mod http;

pub use cancel::CancelToken;
pub use error::ClientError;
pub use http::{ClientConfig, WeightClient, DEFAULT_API_BASE};

use async_trait::async_trait;
use serde::Serialize;

use crate::dates::TimeWindow;
use crate::types::{ItemData, SessionData, SubmitReceipt, WeightSubmission, WeightTransaction};

/// Result of one backend round trip: data or a message, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Data(T),
    Error(String),
}

impl<T> ApiResponse<T> {
    pub fn is_data(&self) -> bool {
        matches!(self, ApiResponse::Data(_))
    }

    pub fn data(self) -> Option<T> {
        match self {
            ApiResponse::Data(data) => Some(data),
            ApiResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResponse::Data(_) => None,
            ApiResponse::Error(message) => Some(message),
        }
    }
}

impl<T> From<Result<T, ClientError>> for ApiResponse<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => ApiResponse::Data(data),
            Err(e) => ApiResponse::Error(e.to_string()),
        }
    }
}

/// Operations the shell and the form need from the backend
#[async_trait]
pub trait WeightApi: Send + Sync {
    /// Transactions in `window`, directions `in` and `out` only
    async fn get_transactions(
        &self,
        window: &TimeWindow,
        cancel: &CancelToken,
    ) -> ApiResponse<Vec<WeightTransaction>>;

    async fn submit_weight(
        &self,
        submission: &WeightSubmission,
        cancel: &CancelToken,
    ) -> ApiResponse<SubmitReceipt>;

    async fn get_item_details(&self, id: &str, cancel: &CancelToken) -> ApiResponse<ItemData>;

    async fn get_session_details(&self, id: &str, cancel: &CancelToken)
        -> ApiResponse<SessionData>;
}
