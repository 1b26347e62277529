//! Geocoding collaborator: a real resolver is out of scope, but the core
//! depends on the trait so one can be swapped in without touching planning.

use crate::error::PlanError;
use crate::io::input::OrderRecord;
use crate::models::point::{Point, PointDetails};
use async_trait::async_trait;

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, raw: OrderRecord) -> Result<Point, PlanError>;
}

/// Passthrough resolver requiring the CSV row to already carry lon/lat.
pub struct NoopGeocoder {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl NoopGeocoder {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        NoopGeocoder {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }
}

#[async_trait]
impl Geocoder for NoopGeocoder {
    async fn resolve(&self, raw: OrderRecord) -> Result<Point, PlanError> {
        let lon = raw
            .lon
            .ok_or_else(|| PlanError::InputError(format!("order {} missing lon", raw.id)))?;
        let lat = raw
            .lat
            .ok_or_else(|| PlanError::InputError(format!("order {} missing lat", raw.id)))?;

        Point::new(
            raw.id.clone(),
            lon,
            lat,
            PointDetails {
                address: raw.address,
                contact_name: raw.contact_name,
                phone: raw.phone,
                memo: raw.memo,
            },
            self.min_lon,
            self.max_lon,
            self.min_lat,
            self.max_lat,
        )
        .map_err(|e| PlanError::InputError(format!("order {}: {e}", raw.id)))
    }
}
