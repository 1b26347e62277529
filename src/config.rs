use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub directions_base_url: String,
    pub directions_api_key: String,
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub road_distance_factor: f64,
    pub worker_pool_size: usize,
    pub max_requests_per_second: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let road_distance_factor: f64 = env::var("ROAD_DISTANCE_FACTOR")
            .unwrap_or_else(|_| DEFAULT_ROAD_DISTANCE_FACTOR.to_string())
            .parse()
            .map_err(|_| "Invalid ROAD_DISTANCE_FACTOR")?;

        if road_distance_factor < 1.0 || road_distance_factor > 3.0 {
            return Err("ROAD_DISTANCE_FACTOR must be between 1.0 and 3.0".to_string());
        }

        let worker_pool_size: usize = env::var("WORKER_POOL_SIZE")
            .unwrap_or_else(|_| DEFAULT_WORKER_POOL_SIZE.to_string())
            .parse()
            .map_err(|_| "Invalid WORKER_POOL_SIZE")?;

        if worker_pool_size == 0 {
            return Err("WORKER_POOL_SIZE must be at least 1".to_string());
        }

        Ok(Config {
            directions_base_url: env::var("DIRECTIONS_BASE_URL")
                .unwrap_or_else(|_| "https://apis-navi.kakaomobility.com/v1".to_string()),
            directions_api_key: env::var("ROUTEPLAN_API_KEY")
                .map_err(|_| "ROUTEPLAN_API_KEY must be set")?,
            min_lon: env::var("MIN_LON")
                .unwrap_or_else(|_| DEFAULT_MIN_LON.to_string())
                .parse()
                .map_err(|_| "Invalid MIN_LON")?,
            max_lon: env::var("MAX_LON")
                .unwrap_or_else(|_| DEFAULT_MAX_LON.to_string())
                .parse()
                .map_err(|_| "Invalid MAX_LON")?,
            min_lat: env::var("MIN_LAT")
                .unwrap_or_else(|_| DEFAULT_MIN_LAT.to_string())
                .parse()
                .map_err(|_| "Invalid MIN_LAT")?,
            max_lat: env::var("MAX_LAT")
                .unwrap_or_else(|_| DEFAULT_MAX_LAT.to_string())
                .parse()
                .map_err(|_| "Invalid MAX_LAT")?,
            road_distance_factor,
            worker_pool_size,
            max_requests_per_second: env::var("MAX_REQUESTS_PER_SECOND")
                .unwrap_or_else(|_| DEFAULT_MAX_REQUESTS_PER_SECOND.to_string())
                .parse()
                .map_err(|_| "Invalid MAX_REQUESTS_PER_SECOND")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_road_factor() {
        std::env::set_var("ROUTEPLAN_API_KEY", "test-key");
        std::env::set_var("ROAD_DISTANCE_FACTOR", "10.0");
        let result = Config::from_env();
        assert!(result.is_err());
        std::env::remove_var("ROAD_DISTANCE_FACTOR");
        std::env::remove_var("ROUTEPLAN_API_KEY");
    }
}
