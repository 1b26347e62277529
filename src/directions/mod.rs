pub mod client;
pub mod rate_limit;
pub mod wire;

pub use client::{DirectionsOutcome, DirectionsProvider, HttpDirectionsClient};
pub use rate_limit::TokenBucket;
