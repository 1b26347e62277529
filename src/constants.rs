// Application-wide constants
// This module centralizes all magic numbers and hardcoded values for better maintainability

/// Hard provider cap: origin + destination + waypoints ≤ 30.
pub const MAX_TOTAL_WAYPOINTS: usize = 30;
/// Intermediate waypoints ≤ 28, since origin+destination already consume 2 of the 30 slots.
pub const MAX_INTERMEDIATE_WAYPOINTS: usize = 28;

// Regional bounds (default: a Korea-sized box), configurable via Config.
pub const DEFAULT_MIN_LON: f64 = 124.0;
pub const DEFAULT_MAX_LON: f64 = 132.0;
pub const DEFAULT_MIN_LAT: f64 = 33.0;
pub const DEFAULT_MAX_LAT: f64 = 43.0;

/// Lloyd-iteration road-distance weighting factor: roads assumed ~30% longer than
/// straight-line distance.
pub const DEFAULT_ROAD_DISTANCE_FACTOR: f64 = 1.3;
/// Speed assumed for the degraded straight-line estimator, in km/h.
pub const DEGRADED_ESTIMATE_SPEED_KMH: f64 = 30.0;

/// Proximity threshold below which two endpoints are "the same place" to the provider.
pub const DEGENERATE_PROXIMITY_METERS: f64 = 5.0;
/// Fixed measurement substituted for a degenerate pair.
pub const DEGENERATE_SECONDS: f64 = 30.0;
pub const DEGENERATE_METERS: f64 = 10.0;

/// Fixed measurement substituted for the whole-plan single-point case (N=1).
pub const SINGLE_POINT_SECONDS: f64 = 30.0;
pub const SINGLE_POINT_METERS: f64 = 50.0;

/// Proximity warning threshold within a cluster (not merged, only logged).
pub const PROXIMITY_WARNING_METERS: f64 = 10.0;

// Lloyd iteration cap and convergence threshold.
pub const LLOYD_MAX_ROUNDS: usize = 10;
pub const LLOYD_CONVERGENCE_METERS: f64 = 1.0;

// DirectionsClient retry policy.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;
pub const RETRY_BACKOFF_BASE_MS: u64 = 1000;
pub const RATE_LIMIT_BACKOFF_MS: u64 = 5000;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Plausibility-violation thresholds (trigger a requeue, not a mere warning).
pub const IMPLAUSIBLE_SPEED_KMH: f64 = 800.0;

// Plausibility-warning thresholds (accepted, merely logged).
pub const WARN_SPEED_KMH: f64 = 150.0;
pub const WARN_MIN_SECONDS_PER_WAYPOINT: f64 = 10.0;
pub const WARN_TOTAL_DISTANCE_METERS: f64 = 1_000_000.0;

// GlobalOptimizer selection tie-break threshold.
pub const TIE_BREAK_SECONDS: f64 = 6.0;
/// GlobalOptimizer skips the K-sweep entirely at or below this N.
pub const SMALL_PLAN_MAX_N: usize = 3;

// Concurrency model.
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;
pub const DEFAULT_MAX_REQUESTS_PER_SECOND: f64 = 10.0;
pub const CANCELLATION_GRACE_SECS: u64 = 3;
pub const CALL_TIMEOUT_SECS: u64 = 30;
