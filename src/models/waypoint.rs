use crate::models::point::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointKind {
    Origin,
    Waypoint,
    Destination,
    /// The whole plan is one point (N=1, K=1).
    Single,
}

/// Point + sequence index + kind + per-leg and cumulative distance/time.
/// Created by ResultAssembler; read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledWaypoint {
    pub point: Point,
    pub sequence_index: usize,
    pub kind: WaypointKind,
    pub prior_leg_distance_m: f64,
    pub prior_leg_duration_s: f64,
    pub cumulative_distance_m: f64,
    pub cumulative_duration_s: f64,
}
