pub mod cluster;
pub mod measurement;
pub mod plan;
pub mod point;
pub mod priority;
pub mod summary;
pub mod waypoint;

pub use cluster::Cluster;
pub use measurement::{Measurement, Provenance};
pub use plan::Plan;
pub use point::{Point, PointDetails, PointId};
pub use priority::Priority;
pub use summary::{ClusterSummary, Summary};
pub use waypoint::{AssembledWaypoint, WaypointKind};
