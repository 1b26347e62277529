//! Library exports for testing and reusability.

pub mod config;
pub mod constants;
pub mod coordinatekit;
pub mod directions;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod planning;

pub use error::{PlanError, Result};
pub use planning::batch_coordinator::{BatchCoordinator, BatchResult};
