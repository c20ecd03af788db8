//! Status mapping for order snapshots
//!
//! Turns the raw backend status string into everything the UI shows for it:
//! a semantic color class, a glyph, the lifecycle stage label and the
//! three-step progress timeline. All functions here are pure and total.

use std::fmt;

/// Color class used for informational / unknown states
pub const DEFAULT_COLOR_CLASS: &str = "status-info";
/// Glyph used for unrecognized statuses
pub const DEFAULT_GLYPH: &str = "📄";

/// Known order lifecycle statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatusKind {
    Received,
    Processing,
    Processed,
    Failed,
    Unknown,
}

impl OrderStatusKind {
    /// Parse a raw status, case-insensitively. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "received" => OrderStatusKind::Received,
            "processing" => OrderStatusKind::Processing,
            "processed" => OrderStatusKind::Processed,
            "failed" => OrderStatusKind::Failed,
            _ => OrderStatusKind::Unknown,
        }
    }
}

impl fmt::Display for OrderStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatusKind::Received => write!(f, "RECEIVED"),
            OrderStatusKind::Processing => write!(f, "PROCESSING"),
            OrderStatusKind::Processed => write!(f, "PROCESSED"),
            OrderStatusKind::Failed => write!(f, "FAILED"),
            OrderStatusKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Display fields derived from a raw status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub kind: OrderStatusKind,
    pub color_class: &'static str,
    pub glyph: &'static str,
    pub stage_label: &'static str,
}

/// Map a raw status string to its display fields
pub fn map_status(raw: &str) -> StatusDisplay {
    let kind = OrderStatusKind::parse(raw);

    let (color_class, glyph, stage_label) = match kind {
        OrderStatusKind::Received => ("status-info", "📨", "Order Received"),
        OrderStatusKind::Processing => ("status-warning", "⏳", "Processing & Route Optimization"),
        OrderStatusKind::Processed => ("status-success", "✅", "Ready for Dispatch"),
        OrderStatusKind::Failed => ("status-danger", "❌", "Failed"),
        OrderStatusKind::Unknown => (DEFAULT_COLOR_CLASS, DEFAULT_GLYPH, "Unknown"),
    };

    StatusDisplay {
        kind,
        color_class,
        glyph,
        stage_label,
    }
}

/// Progress of one timeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageProgress {
    Complete,
    InProgress,
    Pending,
}

impl StageProgress {
    pub fn color_class(&self) -> &'static str {
        match self {
            StageProgress::Complete => "status-success",
            StageProgress::InProgress => "status-warning",
            StageProgress::Pending => "status-info",
        }
    }
}

/// One row of the progress timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineStage {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub progress: StageProgress,
}

impl TimelineStage {
    /// Badge text shown next to the stage
    pub fn badge(&self) -> &'static str {
        match (self.number, self.progress) {
            (3, StageProgress::Complete) => "Ready",
            (_, StageProgress::Complete) => "Completed",
            (_, StageProgress::InProgress) => "In Progress",
            (_, StageProgress::Pending) => "Pending",
        }
    }
}

/// Three-step progress view: Received → Processing → Ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub stages: [TimelineStage; 3],
}

impl Timeline {
    /// Derive the timeline for a snapshot's status
    ///
    /// Only meaningful once a snapshot exists, which is why stage one is
    /// always complete.
    pub fn derive(raw: &str) -> Self {
        let kind = OrderStatusKind::parse(raw);

        let processing = match kind {
            OrderStatusKind::Processed => StageProgress::Complete,
            OrderStatusKind::Processing => StageProgress::InProgress,
            _ => StageProgress::Pending,
        };
        let dispatch = if kind == OrderStatusKind::Processed {
            StageProgress::Complete
        } else {
            StageProgress::Pending
        };

        Self {
            stages: [
                TimelineStage {
                    number: 1,
                    title: "Order Received",
                    description: "Order ingested by the platform",
                    progress: StageProgress::Complete,
                },
                TimelineStage {
                    number: 2,
                    title: "Processing & Route Optimization",
                    description: "Integrating with ROS and WMS systems",
                    progress: processing,
                },
                TimelineStage {
                    number: 3,
                    title: "Ready for Dispatch",
                    description: "Vehicle assignment and route finalization",
                    progress: dispatch,
                },
            ],
        }
    }
}

/// Color class for a fleet vehicle status
pub fn vehicle_status_class(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "available" => "status-success",
        "in-transit" => "status-warning",
        "maintenance" => "status-danger",
        _ => DEFAULT_COLOR_CLASS,
    }
}

/// Color class for a backend subsystem health status
pub fn system_health_class(status: &str) -> &'static str {
    if status == "operational" {
        "status-success"
    } else {
        "status-danger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        let cases = [
            ("received", "status-info", "📨", "Order Received"),
            ("processing", "status-warning", "⏳", "Processing & Route Optimization"),
            ("processed", "status-success", "✅", "Ready for Dispatch"),
            ("failed", "status-danger", "❌", "Failed"),
        ];

        for (raw, color, glyph, label) in cases {
            let display = map_status(raw);
            assert_eq!(display.color_class, color, "{raw}");
            assert_eq!(display.glyph, glyph, "{raw}");
            assert_eq!(display.stage_label, label, "{raw}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(map_status("PROCESSED").kind, OrderStatusKind::Processed);
        assert_eq!(map_status("Failed").kind, OrderStatusKind::Failed);
    }

    #[test]
    fn test_unknown_falls_back() {
        for raw in ["", "shipped", " processing", "🚚"] {
            let display = map_status(raw);
            assert_eq!(display.kind, OrderStatusKind::Unknown);
            assert_eq!(display.color_class, DEFAULT_COLOR_CLASS);
            assert_eq!(display.glyph, DEFAULT_GLYPH);
        }
    }

    #[test]
    fn test_timeline_processing() {
        let timeline = Timeline::derive("processing");
        let badges: Vec<_> = timeline.stages.iter().map(|s| s.badge()).collect();
        assert_eq!(badges, ["Completed", "In Progress", "Pending"]);
    }

    #[test]
    fn test_timeline_processed() {
        let timeline = Timeline::derive("processed");
        let badges: Vec<_> = timeline.stages.iter().map(|s| s.badge()).collect();
        assert_eq!(badges, ["Completed", "Completed", "Ready"]);
    }

    #[test]
    fn test_timeline_received_and_failed() {
        for raw in ["received", "failed", "whatever"] {
            let timeline = Timeline::derive(raw);
            assert_eq!(timeline.stages[0].progress, StageProgress::Complete);
            assert_eq!(timeline.stages[1].progress, StageProgress::Pending);
            assert_eq!(timeline.stages[2].progress, StageProgress::Pending);
        }
    }

    #[test]
    fn test_vehicle_classes() {
        assert_eq!(vehicle_status_class("available"), "status-success");
        assert_eq!(vehicle_status_class("In-Transit"), "status-warning");
        assert_eq!(vehicle_status_class("maintenance"), "status-danger");
        assert_eq!(vehicle_status_class("parked"), "status-info");
        assert_eq!(system_health_class("operational"), "status-success");
        assert_eq!(system_health_class("degraded"), "status-danger");
    }
}
