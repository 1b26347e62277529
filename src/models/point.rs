use serde::{Deserialize, Serialize};

/// Stable identifier carried through from the input record, opaque to planning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub String);

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PointId {
    fn from(s: String) -> Self {
        PointId(s)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        PointId(s.to_string())
    }
}

/// Free-form metadata carried through opaquely (address text, contact info).
/// The planning core never inspects these fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointDetails {
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub memo: Option<String>,
}

/// Created at ingest, immutable through planning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub details: PointDetails,
}

impl Point {
    /// Constructs a Point, validating it against the given regional bounds.
    /// Invariant: longitude/latitude must fall within the configured bound box.
    pub fn new(
        id: impl Into<PointId>,
        lon: f64,
        lat: f64,
        details: PointDetails,
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    ) -> Result<Self, String> {
        if !(min_lon..=max_lon).contains(&lon) || !(min_lat..=max_lat).contains(&lat) {
            return Err(format!(
                "coordinate ({lon}, {lat}) outside regional bounds [{min_lon},{max_lon}]x[{min_lat},{max_lat}]"
            ));
        }
        Ok(Point {
            id: id.into(),
            lon,
            lat,
            details,
        })
    }
}
