//! Where order snapshots come from

use async_trait::async_trait;
use swifttrack_client::{ClientError, OrderStatusSnapshot, RestClient};

/// Fetch-status operation the tracking controller drives
#[async_trait]
pub trait OrderStatusSource: Send + Sync + 'static {
    async fn fetch_status(&self, order_id: &str) -> Result<OrderStatusSnapshot, ClientError>;
}

#[async_trait]
impl OrderStatusSource for RestClient {
    async fn fetch_status(&self, order_id: &str) -> Result<OrderStatusSnapshot, ClientError> {
        self.get_order_status(order_id).await
    }
}
