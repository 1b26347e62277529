//! Stitches per-cluster ordered waypoints into a single sequence; computes
//! per-point fields with correct cumulative distance/time carried across
//! cluster boundaries.

use crate::models::plan::Plan;
use crate::models::waypoint::{AssembledWaypoint, WaypointKind};
use crate::planning::global_optimizer::Winner;

pub struct ResultAssembler;

impl ResultAssembler {
    pub fn assemble(winner: &Winner) -> Vec<AssembledWaypoint> {
        let plan: &Plan = &winner.plan;
        let total_points: usize = plan.point_count();
        let mut out = Vec::with_capacity(total_points);

        let mut cumulative_distance = 0.0;
        let mut cumulative_duration = 0.0;
        let mut sequence_index = 0usize;

        for (cluster_idx, cluster) in plan.clusters.iter().enumerate() {
            let is_first_cluster = cluster_idx == 0;
            let is_last_cluster = cluster_idx == plan.clusters.len() - 1;
            let legs = winner.cluster_legs.get(cluster_idx);

            for (member_idx, point) in cluster.members.iter().enumerate() {
                let is_first_overall = is_first_cluster && member_idx == 0;
                let is_last_overall = is_last_cluster && member_idx == cluster.members.len() - 1;

                let kind = if total_points == 1 {
                    WaypointKind::Single
                } else if is_first_overall {
                    WaypointKind::Origin
                } else if is_last_overall {
                    WaypointKind::Destination
                } else {
                    WaypointKind::Waypoint
                };

                let (prior_distance, prior_duration) = if member_idx == 0 {
                    if cluster_idx == 0 {
                        (0.0, 0.0)
                    } else {
                        // Inter-cluster hop measurement between the previous
                        // cluster's exit and this cluster's entry.
                        winner
                            .hop_legs
                            .get(cluster_idx - 1)
                            .map(|(s, m)| (*m, *s))
                            .unwrap_or((0.0, 0.0))
                    }
                } else {
                    // Corresponding section from this cluster's directions
                    // response, mapped positionally.
                    legs.and_then(|l| l.get(member_idx - 1))
                        .map(|(s, m)| (*m, *s))
                        .unwrap_or((0.0, 0.0))
                };

                cumulative_distance += prior_distance;
                cumulative_duration += prior_duration;

                out.push(AssembledWaypoint {
                    point: point.clone(),
                    sequence_index,
                    kind,
                    prior_leg_distance_m: prior_distance,
                    prior_leg_duration_s: prior_duration,
                    cumulative_distance_m: cumulative_distance,
                    cumulative_duration_s: cumulative_duration,
                });

                sequence_index += 1;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cluster::Cluster;
    use crate::models::measurement::Measurement;
    use crate::models::point::{Point, PointDetails};

    fn pt(id: &str, lon: f64, lat: f64) -> Point {
        Point {
            id: id.into(),
            lon,
            lat,
            details: PointDetails::default(),
        }
    }

    #[test]
    fn cumulative_is_monotonic_across_clusters() {
        let mut c0 = Cluster::new(0, vec![pt("a", 0.0, 0.0), pt("b", 1.0, 1.0)]);
        c0.entry = "a".into();
        c0.exit = "b".into();
        let mut c1 = Cluster::new(1, vec![pt("c", 2.0, 2.0), pt("d", 3.0, 3.0)]);
        c1.entry = "c".into();
        c1.exit = "d".into();

        let winner = Winner {
            plan: Plan::new(vec![c0, c1]),
            measurement: Measurement::zero(crate::models::measurement::Provenance::Measured),
            cluster_legs: vec![vec![(10.0, 100.0)], vec![(20.0, 200.0)]],
            hop_legs: vec![(5.0, 50.0)],
            partial: false,
        };

        let assembled = ResultAssembler::assemble(&winner);
        assert_eq!(assembled.len(), 4);
        assert_eq!(assembled[0].kind, WaypointKind::Origin);
        assert_eq!(assembled[3].kind, WaypointKind::Destination);

        let cumulatives: Vec<f64> = assembled.iter().map(|w| w.cumulative_distance_m).collect();
        for w in cumulatives.windows(2) {
            assert!(w[1] >= w[0]);
        }
        // first point cumulative is zero
        assert_eq!(assembled[0].cumulative_distance_m, 0.0);
        // second point within cluster 0 picks up the cluster's section leg
        assert_eq!(assembled[1].cumulative_distance_m, 100.0);
        // third point (first of cluster 1) picks up the hop leg
        assert_eq!(assembled[2].cumulative_distance_m, 150.0);
    }

    #[test]
    fn single_point_plan_uses_single_kind() {
        let mut c0 = Cluster::new(0, vec![pt("a", 0.0, 0.0)]);
        c0.entry = "a".into();
        c0.exit = "a".into();
        let winner = Winner {
            plan: Plan::new(vec![c0]),
            measurement: Measurement::single_point(),
            cluster_legs: vec![Vec::new()],
            hop_legs: Vec::new(),
            partial: false,
        };
        let assembled = ResultAssembler::assemble(&winner);
        assert_eq!(assembled.len(), 1);
        assert_eq!(assembled[0].kind, WaypointKind::Single);
        assert_eq!(assembled[0].cumulative_distance_m, 0.0);
    }
}
