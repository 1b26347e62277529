//! Tabular output writers for assembled waypoints and batch summaries.

use crate::error::PlanError;
use crate::models::summary::Summary;
use crate::models::waypoint::AssembledWaypoint;
use serde::Serialize;

#[derive(Serialize)]
struct WaypointRow<'a> {
    sequence_index: usize,
    point_id: &'a str,
    lon: f64,
    lat: f64,
    kind: String,
    prior_leg_distance_m: f64,
    prior_leg_duration_s: f64,
    cumulative_distance_m: f64,
    cumulative_duration_s: f64,
}

pub fn write_waypoints(path: &str, waypoints: &[AssembledWaypoint]) -> Result<(), PlanError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PlanError::InputError(format!("could not open {path} for writing: {e}")))?;

    for w in waypoints {
        writer
            .serialize(WaypointRow {
                sequence_index: w.sequence_index,
                point_id: &w.point.id.0,
                lon: w.point.lon,
                lat: w.point.lat,
                kind: format!("{:?}", w.kind),
                prior_leg_distance_m: w.prior_leg_distance_m,
                prior_leg_duration_s: w.prior_leg_duration_s,
                cumulative_distance_m: w.cumulative_distance_m,
                cumulative_duration_s: w.cumulative_duration_s,
            })
            .map_err(|e| PlanError::InputError(format!("failed writing row to {path}: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| PlanError::InputError(format!("failed flushing {path}: {e}")))
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    batch_id: &'a str,
    success: bool,
    waypoint_count: usize,
    total_distance_m: f64,
    total_duration_s: f64,
    average_speed_kmh: f64,
    degraded: bool,
    partial: bool,
    failure_messages: String,
}

pub fn write_summary(path: &str, summary: &Summary) -> Result<(), PlanError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PlanError::InputError(format!("could not open {path} for writing: {e}")))?;

    writer
        .serialize(SummaryRow {
            batch_id: &summary.batch_id,
            success: summary.success,
            waypoint_count: summary.waypoint_count,
            total_distance_m: summary.total_distance_m,
            total_duration_s: summary.total_duration_s,
            average_speed_kmh: summary.average_speed_kmh,
            degraded: summary.degraded,
            partial: summary.partial,
            failure_messages: summary.failure_messages.join("; "),
        })
        .map_err(|e| PlanError::InputError(format!("failed writing summary to {path}: {e}")))?;

    writer
        .flush()
        .map_err(|e| PlanError::InputError(format!("failed flushing {path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::point::{Point, PointDetails};
    use crate::models::waypoint::WaypointKind;

    #[test]
    fn writes_single_waypoint_row() {
        let mut path = std::env::temp_dir();
        path.push(format!("routeplan-out-test-{}.csv", std::process::id()));
        let path_str = path.to_str().unwrap();

        let waypoints = vec![AssembledWaypoint {
            point: Point {
                id: "a".into(),
                lon: 127.0,
                lat: 37.5,
                details: PointDetails::default(),
            },
            sequence_index: 0,
            kind: WaypointKind::Single,
            prior_leg_distance_m: 0.0,
            prior_leg_duration_s: 0.0,
            cumulative_distance_m: 0.0,
            cumulative_duration_s: 0.0,
        }];

        write_waypoints(path_str, &waypoints).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("127"));
        let _ = std::fs::remove_file(&path);
    }
}
