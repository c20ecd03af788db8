//! Operations dashboard loader
//!
//! Fetches the dashboard summary and the fleet overview together. Either
//! failing fails the whole refresh with one message; the last good data is
//! kept on screen.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use swifttrack_client::{ClientError, DashboardSummary, FleetOverview, RestClient};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub fleet: FleetOverview,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub data: Option<DashboardData>,
    pub error: Option<String>,
    pub loading: bool,
}

pub struct DashboardLoader {
    client: RestClient,
    state_tx: watch::Sender<DashboardState>,
}

impl DashboardLoader {
    pub fn new(client: RestClient) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::default());
        Self { client, state_tx }
    }

    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// Fetch both resources concurrently
    pub async fn fetch(&self) -> Result<DashboardData, ClientError> {
        debug!("Fetching dashboard and fleet overview");

        let (summary, fleet) =
            tokio::try_join!(self.client.get_dashboard(), self.client.get_vehicles())?;

        Ok(DashboardData {
            summary,
            fleet,
            fetched_at: Utc::now(),
        })
    }

    /// Fetch and publish the result
    pub async fn refresh(&self) -> DashboardState {
        self.state_tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.fetch().await;

        self.state_tx.send_modify(|state| {
            state.loading = false;
            match result {
                Ok(data) => {
                    debug!("Dashboard refreshed: {} vehicles", data.fleet.summary.total);
                    state.data = Some(data);
                }
                Err(e) => {
                    warn!("Dashboard refresh failed: {}", e);
                    state.error = Some(e.to_string());
                }
            }
        });

        self.state()
    }

    /// Refresh now and then every `interval` until `running` goes false
    pub fn spawn(self: Arc<Self>, interval: Duration, running: Arc<AtomicBool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            info!("Dashboard auto-refresh every {:?}", interval);

            loop {
                ticker.tick().await;
                if !running.load(Ordering::Acquire) {
                    break;
                }
                self.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_dashboard(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "overview": {"totalOrders": 12, "activeRoutes": 3}
            })))
            .mount(server)
            .await;
    }

    fn fleet_body() -> serde_json::Value {
        json!({
            "vehicles": [
                {"vehicleId": "VH001", "status": "available", "capacity": 100},
                {"vehicleId": "VH002", "status": "in-transit", "capacity": null}
            ],
            "summary": {"total": 2, "available": 1, "busy": 1, "withWMSAssignments": 0}
        })
    }

    #[tokio::test]
    async fn test_refresh_loads_both() {
        let server = MockServer::start().await;
        mount_dashboard(&server).await;
        Mock::given(method("GET"))
            .and(path("/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fleet_body()))
            .mount(&server)
            .await;

        let loader = DashboardLoader::new(RestClient::new(server.uri()));
        let state = loader.refresh().await;

        assert!(!state.loading);
        assert_eq!(state.error, None);
        let data = state.data.unwrap();
        assert_eq!(data.summary.metric(&["overview", "totalOrders"]), "12");
        assert_eq!(data.fleet.vehicles.len(), 2);
        assert_eq!(data.fleet.summary.busy, 1);
    }

    #[tokio::test]
    async fn test_one_failure_fails_refresh_and_keeps_old_data() {
        let server = MockServer::start().await;
        mount_dashboard(&server).await;
        Mock::given(method("GET"))
            .and(path("/vehicles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fleet_body()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vehicles"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "fleet service down"})))
            .mount(&server)
            .await;

        let loader = DashboardLoader::new(RestClient::new(server.uri()));
        assert!(loader.refresh().await.data.is_some());

        let state = loader.refresh().await;
        assert_eq!(state.error.as_deref(), Some("HTTP 502: fleet service down"));
        assert!(state.data.is_some());
    }
}
