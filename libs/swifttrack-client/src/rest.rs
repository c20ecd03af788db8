use crate::types::*;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Backend unreachable: {0}")]
    NetworkUnreachable(#[source] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::MalformedResponse(e.to_string())
        } else {
            ClientError::NetworkUnreachable(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// REST client for the SwiftTrack order service
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: Client,
}

impl RestClient {
    /// Create new REST client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Create a REST client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::NetworkUnreachable)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL from path segments, escaping each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Validation(format!("bad base url {}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::Validation(format!("base url {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Check that the backend is up
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint(&["health"])?;

        debug!("Checking backend health at {}", url);

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    /// Submit a new order
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderReceipt> {
        if order.order_id.trim().is_empty() {
            return Err(ClientError::Validation("order id must not be empty".to_string()));
        }

        let url = self.endpoint(&["orders"])?;

        debug!(
            "Submitting order {} with {} items",
            order.order_id,
            order.items.len()
        );

        let response = self.client.post(url).json(order).send().await?;
        Self::decode(response).await
    }

    /// Get the current status of an order
    pub async fn get_order_status(&self, order_id: &str) -> Result<OrderStatusSnapshot> {
        if order_id.trim().is_empty() {
            return Err(ClientError::Validation("order id must not be empty".to_string()));
        }

        let url = self.endpoint(&["orders", order_id, "status"])?;

        debug!("Fetching status for order {} from {}", order_id, url);

        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(order_id.to_string()));
        }

        let snapshot: OrderStatusSnapshot = Self::decode(response).await?;
        snapshot.validate().map_err(ClientError::MalformedResponse)?;

        debug!("Order {} is {}", snapshot.order_id, snapshot.status);
        Ok(snapshot)
    }

    /// Get aggregate dashboard metrics
    pub async fn get_dashboard(&self) -> Result<DashboardSummary> {
        let url = self.endpoint(&["dashboard"])?;

        debug!("Fetching dashboard from {}", url);

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    /// Get the fleet overview
    pub async fn get_vehicles(&self) -> Result<FleetOverview> {
        let url = self.endpoint(&["vehicles"])?;

        debug!("Fetching vehicles from {}", url);

        let response = self.client.get(url).send().await?;
        let fleet: FleetOverview = Self::decode(response).await?;

        debug!("Fetched {} vehicles", fleet.vehicles.len());
        Ok(fleet)
    }

    /// Turn a response into `T`, or into an error carrying the backend's message
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}

/// Pull a readable message out of an error body
///
/// The service answers errors with `{"error": ...}`, `{"message": ...}` or
/// `{"detail": ...}`; anything else falls back to the raw text or the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RestClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_endpoint_escapes_order_id() {
        let client = RestClient::new("http://localhost:8000/");
        let url = client.endpoint(&["orders", "ORD 1/2", "status"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/orders/ORD%201%2F2/status");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        let client = RestClient::new("not a url");
        assert!(matches!(
            client.endpoint(&["health"]),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad order"}"#),
            "bad order"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"detail":"cms down"}"#),
            "cms down"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream"), "upstream");
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }
}
