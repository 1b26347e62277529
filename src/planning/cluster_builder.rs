//! Partitions N points into K groups using a farthest-first seeded Lloyd-style
//! refinement with a road-distance factor, then balances oversized clusters.

use crate::constants::{LLOYD_CONVERGENCE_METERS, LLOYD_MAX_ROUNDS, MAX_TOTAL_WAYPOINTS, PROXIMITY_WARNING_METERS};
use crate::coordinatekit::{centroid, haversine_distance_m};
use crate::logging::{Event, Sink};
use crate::models::cluster::Cluster;
use crate::models::point::Point;

pub struct ClusterBuilder<'a> {
    pub road_distance_factor: f64,
    pub sink: &'a dyn Sink,
}

impl<'a> ClusterBuilder<'a> {
    pub fn new(road_distance_factor: f64, sink: &'a dyn Sink) -> Self {
        ClusterBuilder {
            road_distance_factor,
            sink,
        }
    }

    /// Contract: given N Points and a target count K (1 ≤ K ≤ N), return K
    /// non-empty clusters partitioning the N points.
    pub fn build(&self, points: &[Point], k: usize) -> Vec<Cluster> {
        assert!(k >= 1 && k <= points.len(), "K must be in [1, N]");

        if k == 1 {
            let cluster = Cluster::new(0, points.to_vec());
            self.warn_proximity(std::slice::from_ref(&cluster));
            return vec![cluster];
        }

        let centroids = self.seed_farthest_first(points, k);
        let assignment = self.lloyd_refine(points, centroids);

        let mut groups: Vec<Vec<Point>> = vec![Vec::new(); k];
        for (point, cluster_idx) in points.iter().zip(assignment.iter()) {
            groups[*cluster_idx].push(point.clone());
        }

        // Discard empty clusters (step 3).
        groups.retain(|g| !g.is_empty());

        let mut clusters: Vec<Cluster> = groups
            .into_iter()
            .enumerate()
            .map(|(id, members)| Cluster::new(id, members))
            .collect();

        self.balance_sizes(&mut clusters);

        for (id, cluster) in clusters.iter_mut().enumerate() {
            cluster.id = id;
        }

        self.warn_proximity(&clusters);
        clusters
    }

    /// Step 1: centroid₀ = points[0]; centroidᵢ = argmax over remaining points p
    /// of min over existing centroids c of distance(p, c).
    fn seed_farthest_first(&self, points: &[Point], k: usize) -> Vec<(f64, f64)> {
        let mut centroids = vec![(points[0].lon, points[0].lat)];

        while centroids.len() < k {
            let next = points
                .iter()
                .map(|p| {
                    let min_dist = centroids
                        .iter()
                        .map(|c| haversine_distance_m((p.lon, p.lat), *c))
                        .fold(f64::INFINITY, f64::min);
                    ((p.lon, p.lat), min_dist)
                })
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                .map(|(pos, _)| pos)
                .unwrap();
            centroids.push(next);
        }

        centroids
    }

    /// Step 2: Lloyd iteration (≤10 rounds) with road-factor-weighted assignment.
    fn lloyd_refine(&self, points: &[Point], mut centroids: Vec<(f64, f64)>) -> Vec<usize> {
        let mut assignment = vec![0usize; points.len()];

        for _round in 0..LLOYD_MAX_ROUNDS {
            for (i, p) in points.iter().enumerate() {
                let (best_idx, _) = centroids
                    .iter()
                    .enumerate()
                    .map(|(idx, c)| (idx, haversine_distance_m((p.lon, p.lat), *c) * self.road_distance_factor))
                    .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                    .unwrap();
                assignment[i] = best_idx;
            }

            let mut max_move = 0.0f64;
            let new_centroids: Vec<(f64, f64)> = centroids
                .iter()
                .enumerate()
                .map(|(idx, old)| {
                    let members: Vec<(f64, f64)> = points
                        .iter()
                        .zip(assignment.iter())
                        .filter(|(_, a)| **a == idx)
                        .map(|(p, _)| (p.lon, p.lat))
                        .collect();
                    if members.is_empty() {
                        return *old;
                    }
                    let new_c = centroid(members);
                    let moved = haversine_distance_m(*old, new_c);
                    max_move = max_move.max(moved);
                    new_c
                })
                .collect();

            centroids = new_centroids;

            if max_move < LLOYD_CONVERGENCE_METERS {
                break;
            }
        }

        assignment
    }

    /// Step 4: while any cluster has >30 members, move its farthest-from-centroid
    /// point to the smallest under-capacity cluster (ties by proximity of target centroid).
    fn balance_sizes(&self, clusters: &mut Vec<Cluster>) {
        loop {
            let oversized = clusters
                .iter()
                .enumerate()
                .find(|(_, c)| c.len() > MAX_TOTAL_WAYPOINTS);

            let Some((over_idx, _)) = oversized else {
                break;
            };

            let over_centroid = clusters[over_idx].centroid();
            let farthest_idx = clusters[over_idx]
                .members
                .iter()
                .enumerate()
                .map(|(i, p)| (i, haversine_distance_m((p.lon, p.lat), over_centroid)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap();

            let moved_point = clusters[over_idx].members[farthest_idx].clone();

            let candidates: Vec<usize> = clusters
                .iter()
                .enumerate()
                .filter(|(i, c)| *i != over_idx && c.len() < MAX_TOTAL_WAYPOINTS)
                .map(|(i, _)| i)
                .collect();

            if candidates.is_empty() {
                // No under-capacity cluster exists; cannot balance further.
                break;
            }

            let target_idx = candidates
                .into_iter()
                .map(|i| {
                    let c = clusters[i].centroid();
                    (i, clusters[i].len(), haversine_distance_m((moved_point.lon, moved_point.lat), c))
                })
                .min_by(|a, b| a.1.cmp(&b.1).then(a.2.partial_cmp(&b.2).unwrap()))
                .map(|(i, _, _)| i)
                .unwrap();

            clusters[over_idx].members.remove(farthest_idx);
            clusters[target_idx].members.push(moved_point);
        }
    }

    /// After clustering, within each cluster detect every pair of points within
    /// 10 m and emit a warning; do not merge.
    fn warn_proximity(&self, clusters: &[Cluster]) {
        for cluster in clusters {
            for i in 0..cluster.members.len() {
                for j in (i + 1)..cluster.members.len() {
                    let a = &cluster.members[i];
                    let b = &cluster.members[j];
                    let dist = haversine_distance_m((a.lon, a.lat), (b.lon, b.lat));
                    if dist < PROXIMITY_WARNING_METERS {
                        self.sink.warn(Event::ClusterProximityWarning {
                            cluster_id: cluster.id,
                            meters: dist,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::CapturingSink;
    use crate::models::point::PointDetails;

    fn pt(id: &str, lon: f64, lat: f64) -> Point {
        Point {
            id: id.into(),
            lon,
            lat,
            details: PointDetails::default(),
        }
    }

    #[test]
    fn partitions_two_clumps_into_two_clusters() {
        let sink = CapturingSink::new();
        let builder = ClusterBuilder::new(1.3, &sink);

        let mut points = Vec::new();
        for i in 0..20 {
            points.push(pt(&format!("seoul_{i}"), 127.0 + 0.001 * i as f64, 37.5 + 0.001 * i as f64));
        }
        for i in 0..20 {
            points.push(pt(&format!("busan_{i}"), 129.0 + 0.001 * i as f64, 35.1 + 0.001 * i as f64));
        }

        let clusters = builder.build(&points, 2);
        assert_eq!(clusters.len(), 2);

        let total: usize = clusters.iter().map(|c| c.len()).sum();
        assert_eq!(total, 40);

        for cluster in &clusters {
            let all_seoul = cluster.members.iter().all(|p| p.id.0.starts_with("seoul"));
            let all_busan = cluster.members.iter().all(|p| p.id.0.starts_with("busan"));
            assert!(all_seoul || all_busan);
        }
    }

    #[test]
    fn no_cluster_exceeds_max_size() {
        let sink = CapturingSink::new();
        let builder = ClusterBuilder::new(1.3, &sink);
        let points: Vec<Point> = (0..35)
            .map(|i| pt(&format!("p{i}"), 127.0 + 0.01 * i as f64, 37.5 + 0.01 * i as f64))
            .collect();

        let clusters = builder.build(&points, 2);
        for c in &clusters {
            assert!(c.len() <= MAX_TOTAL_WAYPOINTS);
        }
    }

    #[test]
    fn identical_coordinates_still_cluster_successfully() {
        let sink = CapturingSink::new();
        let builder = ClusterBuilder::new(1.3, &sink);
        let points: Vec<Point> = (0..6).map(|i| pt(&format!("p{i}"), 127.0, 37.5)).collect();
        let clusters = builder.build(&points, 2);
        assert_eq!(clusters.iter().map(|c| c.len()).sum::<usize>(), 6);
    }
}
