//! Haversine distance, WGS84 validity, regional bounds check, centroid.
//! Free functions over `(lon, lat)` tuples, meter-denominated throughout.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two (lon, lat) pairs, in meters.
pub fn haversine_distance_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lon1, lat1) = a;
    let (lon2, lat2) = b;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let sin_half_lat = (delta_lat / 2.0).sin();
    let sin_half_lon = (delta_lon / 2.0).sin();

    let h = sin_half_lat * sin_half_lat
        + lat1_rad.cos() * lat2_rad.cos() * sin_half_lon * sin_half_lon;
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// WGS84 validity: longitude in [-180,180], latitude in [-90,90].
pub fn is_valid_wgs84(lon: f64, lat: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Regional bounds check against a configurable box.
pub fn in_regional_bounds(
    lon: f64,
    lat: f64,
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
) -> bool {
    (min_lon..=max_lon).contains(&lon) && (min_lat..=max_lat).contains(&lat)
}

/// Mean longitude, mean latitude of a set of points. Used for cluster centroids
/// and Lloyd-iteration recomputation.
pub fn centroid<I: IntoIterator<Item = (f64, f64)>>(points: I) -> (f64, f64) {
    let mut sum_lon = 0.0;
    let mut sum_lat = 0.0;
    let mut count = 0usize;
    for (lon, lat) in points {
        sum_lon += lon;
        sum_lat += lat;
        count += 1;
    }
    if count == 0 {
        return (0.0, 0.0);
    }
    (sum_lon / count as f64, sum_lat / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_distance_m((127.0, 37.5), (127.0, 37.5)), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = (127.0, 37.5);
        let b = (129.0, 35.1);
        assert!((haversine_distance_m(a, b) - haversine_distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert!(!in_regional_bounds(200.0, 37.5, 124.0, 132.0, 33.0, 43.0));
        assert!(in_regional_bounds(127.0, 37.5, 124.0, 132.0, 33.0, 43.0));
    }

    #[test]
    fn centroid_of_single_point_is_itself() {
        assert_eq!(centroid(vec![(127.0, 37.5)]), (127.0, 37.5));
    }
}
