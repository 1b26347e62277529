use serde::{Deserialize, Serialize};

/// Per-cluster totals, rolled up into the batch-level Summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub waypoint_count: usize,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// Totals per cluster, grand totals, success counts, failure messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub batch_id: String,
    pub success: bool,
    pub waypoint_count: usize,
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    pub average_speed_kmh: f64,
    pub clusters: Vec<ClusterSummary>,
    pub failure_messages: Vec<String>,
    /// True when the winning Measurement's provenance was Estimated rather
    /// than Measured or a fixed degenerate/single-point constant.
    pub degraded: bool,
    /// True when cancellation hit mid-sweep and this is the best scenario
    /// evaluated so far rather than the result of a completed K search.
    pub partial: bool,
}

impl Summary {
    pub fn average_speed_kmh(total_distance_m: f64, total_duration_s: f64) -> f64 {
        if total_duration_s <= 0.0 {
            return 0.0;
        }
        (total_distance_m / 1000.0) / (total_duration_s / 3600.0)
    }
}
