//! Wire format for the external waypoint-directions provider, matching
//! the Kakao Mobility Directions API's request/response shapes.

use crate::models::priority::Priority;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct WirePoint {
    pub x: f64,
    pub y: f64,
    pub name: String,
}

impl WirePoint {
    pub fn new(lon: f64, lat: f64, name: impl Into<String>) -> Self {
        WirePoint {
            x: lon,
            y: lat,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsRequest {
    pub origin: WirePoint,
    pub destination: WirePoint,
    pub waypoints: Vec<WirePoint>,
    pub priority: Priority,
    pub car_fuel: String,
    pub car_hipass: bool,
    pub alternatives: bool,
    pub road_details: bool,
}

impl DirectionsRequest {
    pub fn new(origin: WirePoint, destination: WirePoint, waypoints: Vec<WirePoint>, priority: Priority) -> Self {
        DirectionsRequest {
            origin,
            destination,
            waypoints,
            priority,
            car_fuel: "GASOLINE".to_string(),
            car_hipass: false,
            alternatives: false,
            road_details: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSummary {
    pub distance: f64,
    pub duration: f64,
    #[serde(default)]
    #[allow(dead_code)]
    pub fare: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionSummary {
    pub summary: RouteSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub result_code: i64,
    #[serde(default)]
    pub result_msg: String,
    pub summary: Option<RouteSummary>,
    #[serde(default)]
    pub sections: Vec<SectionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub routes: Vec<Route>,
}
