//! Wire types for the SwiftTrack order service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decode `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One status fetch for an order
///
/// Created fresh for every successful lookup and superseded (never merged)
/// by the next one for the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: String,
    /// Raw backend status: received, processing, processed, failed, or anything else
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    pub received_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Present only when the order failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrderStatusSnapshot {
    /// Check the invariants the backend guarantees for a snapshot
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.order_id.trim().is_empty() {
            return Err("snapshot is missing orderId".to_string());
        }
        if self.last_updated < self.received_at {
            return Err(format!(
                "lastUpdated {} precedes receivedAt {}",
                self.last_updated, self.received_at
            ));
        }
        Ok(())
    }
}

/// Delivery location attached to a new order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Body of `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_id: String,
    pub delivery_address: DeliveryAddress,
    pub items: Vec<String>,
}

/// Response of `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub status: String,
    pub order_id: String,
    /// Relative link for status tracking
    pub track: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
}

/// Response of `GET /dashboard`
///
/// The backend owns this shape, so it is kept as raw JSON with accessors for
/// the metric cards the client renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardSummary(pub Value);

impl DashboardSummary {
    /// Look up a nested value by path, e.g. `["overview", "totalOrders"]`
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |node, key| node.get(*key))
    }

    /// Render a metric for display, `"-"` when absent
    pub fn metric(&self, path: &[&str]) -> String {
        match self.get(path) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Per-subsystem health as `(system, status, uptime)`
    pub fn system_health(&self) -> Vec<(String, String, String)> {
        let Some(Value::Object(systems)) = self.get(&["systemHealth"]) else {
            return Vec::new();
        };

        systems
            .iter()
            .map(|(name, health)| {
                let field = |key: &str| {
                    health
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or("-")
                        .to_string()
                };
                (name.clone(), field("status"), field("uptime"))
            })
            .collect()
    }
}

/// Warehouse assignment reported for a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmsAssignment {
    #[serde(default)]
    pub warehouse_assignment: Option<String>,
}

/// One fleet vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub wms_assignment: Option<WmsAssignment>,
}

/// Fleet counters shown on the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub available: u32,
    #[serde(default)]
    pub busy: u32,
    #[serde(default, rename = "withWMSAssignments")]
    pub with_wms_assignments: u32,
}

/// Response of `GET /vehicles`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetOverview {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub summary: FleetSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_null_status_decodes_empty() {
        let snapshot: OrderStatusSnapshot = serde_json::from_value(json!({
            "orderId": "ORD1",
            "status": null,
            "receivedAt": "2024-01-15T10:30:00Z",
            "lastUpdated": "2024-01-15T10:31:00Z"
        }))
        .unwrap();

        assert_eq!(snapshot.status, "");
        assert!(snapshot.error.is_none());
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_snapshot_rejects_time_travel() {
        let snapshot: OrderStatusSnapshot = serde_json::from_value(json!({
            "orderId": "ORD1",
            "status": "received",
            "receivedAt": "2024-01-15T10:30:00Z",
            "lastUpdated": "2024-01-15T10:00:00Z"
        }))
        .unwrap();

        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_empty_items_serialize_as_empty_array() {
        let request = OrderRequest {
            order_id: "ORD7".to_string(),
            delivery_address: DeliveryAddress {
                address: "Galle Road".to_string(),
                latitude: 6.8344,
                longitude: 79.8644,
            },
            items: Vec::new(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["items"], json!([]));
        assert_eq!(value["deliveryAddress"]["latitude"], json!(6.8344));
        assert_eq!(value["orderId"], json!("ORD7"));
    }

    #[test]
    fn test_dashboard_metrics() {
        let dashboard = DashboardSummary(json!({
            "overview": { "totalOrders": 42, "systemUptime": "99.9%" },
            "systemHealth": {
                "cms": { "status": "operational", "uptime": "12d" }
            }
        }));

        assert_eq!(dashboard.metric(&["overview", "totalOrders"]), "42");
        assert_eq!(dashboard.metric(&["overview", "systemUptime"]), "99.9%");
        assert_eq!(dashboard.metric(&["daily", "activeDrivers"]), "-");
        assert_eq!(
            dashboard.system_health(),
            vec![("cms".to_string(), "operational".to_string(), "12d".to_string())]
        );
    }

    #[test]
    fn test_fleet_overview_decodes() {
        let fleet: FleetOverview = serde_json::from_value(json!({
            "vehicles": [
                { "vehicleId": "VH001", "status": "available", "capacity": 500,
                  "wmsAssignment": { "warehouseAssignment": "WH-A" } }
            ],
            "summary": { "total": 1, "available": 1, "busy": 0, "withWMSAssignments": 1 }
        }))
        .unwrap();

        assert_eq!(fleet.vehicles[0].vehicle_id, "VH001");
        assert_eq!(fleet.summary.with_wms_assignments, 1);
    }
}
