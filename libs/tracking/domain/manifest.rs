//! Driver delivery manifest
//!
//! The backend has no manifest endpoint yet, so the manifest is generated
//! locally from the session's client id.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Pending,
}

impl DeliveryStatus {
    pub fn color_class(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "status-success",
            DeliveryStatus::Pending => "status-warning",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Delivered => write!(f, "delivered"),
            DeliveryStatus::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPriority {
    High,
    Normal,
}

impl fmt::Display for DeliveryPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryPriority::High => write!(f, "high"),
            DeliveryPriority::Normal => write!(f, "normal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDelivery {
    pub order_id: String,
    pub address: String,
    pub status: DeliveryStatus,
    pub priority: DeliveryPriority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverManifest {
    pub driver_id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub deliveries: Vec<ManifestDelivery>,
}

impl DriverManifest {
    /// Build the day's manifest for a client
    pub fn generate(client_id: &str, date: NaiveDate) -> Self {
        let delivery = |order_id: &str, address: &str, status, priority| ManifestDelivery {
            order_id: order_id.to_string(),
            address: address.to_string(),
            status,
            priority,
        };

        Self {
            driver_id: format!("DRIVER_{}", client_id),
            vehicle_id: "VH001".to_string(),
            date,
            deliveries: vec![
                delivery("ORD001", "Colombo 03", DeliveryStatus::Delivered, DeliveryPriority::High),
                delivery("ORD002", "Galle Road", DeliveryStatus::Delivered, DeliveryPriority::Normal),
                delivery("ORD003", "Kandy City", DeliveryStatus::Pending, DeliveryPriority::High),
                delivery("ORD004", "Nugegoda", DeliveryStatus::Pending, DeliveryPriority::Normal),
            ],
        }
    }

    pub fn completed(&self) -> usize {
        self.count(DeliveryStatus::Delivered)
    }

    pub fn remaining(&self) -> usize {
        self.count(DeliveryStatus::Pending)
    }

    fn count(&self, status: DeliveryStatus) -> usize {
        self.deliveries.iter().filter(|d| d.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_manifest() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let manifest = DriverManifest::generate("CLIENT001", date);

        assert_eq!(manifest.driver_id, "DRIVER_CLIENT001");
        assert_eq!(manifest.vehicle_id, "VH001");
        assert_eq!(manifest.deliveries.len(), 4);
        assert_eq!(manifest.completed(), 2);
        assert_eq!(manifest.remaining(), 2);
        assert_eq!(manifest.deliveries[2].address, "Kandy City");
        assert_eq!(manifest.deliveries[2].priority, DeliveryPriority::High);
    }
}
