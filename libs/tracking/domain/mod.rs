//! Domain layer: pure tracking logic with no I/O

pub mod history;
pub mod manifest;
pub mod status;

pub use history::{HistoryEntry, HistoryLedger, MAX_HISTORY_ENTRIES};
pub use manifest::{DeliveryPriority, DeliveryStatus, DriverManifest, ManifestDelivery};
pub use status::{
    map_status, system_health_class, vehicle_status_class, OrderStatusKind, StageProgress,
    StatusDisplay, Timeline, TimelineStage,
};
