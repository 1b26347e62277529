pub mod geocoder;
pub mod input;
pub mod output;

pub use geocoder::{Geocoder, NoopGeocoder};
pub use input::{read_orders, OrderRecord};
pub use output::{write_summary, write_waypoints};
