//! With a cluster sequence fixed, assigns each cluster an entry Point and an
//! exit Point from its members, including the global-closure pass over the
//! first/last clusters.

use crate::coordinatekit::haversine_distance_m;
use crate::models::cluster::Cluster;

pub struct ClusterEndpointPicker;

impl ClusterEndpointPicker {
    fn nearest_member_idx(cluster: &Cluster, target: (f64, f64)) -> usize {
        cluster
            .members
            .iter()
            .enumerate()
            .map(|(i, p)| (i, haversine_distance_m((p.lon, p.lat), target)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
            .map(|(i, _)| i)
            .unwrap()
    }

    pub fn pick(clusters: &mut [Cluster]) {
        let k = clusters.len();

        if k == 1 {
            // Single-cluster case: entry = first member, exit = last member;
            // closure not applied at this stage.
            let first = clusters[0].members.first().unwrap().id.clone();
            let last = clusters[0].members.last().unwrap().id.clone();
            clusters[0].entry = first;
            clusters[0].exit = last;
            return;
        }

        let centroids: Vec<(f64, f64)> = clusters.iter().map(|c| c.centroid()).collect();

        for i in 0..k {
            if i > 0 {
                let idx = Self::nearest_member_idx(&clusters[i], centroids[i - 1]);
                clusters[i].entry = clusters[i].members[idx].id.clone();
            }
            if i < k - 1 {
                let idx = Self::nearest_member_idx(&clusters[i], centroids[i + 1]);
                clusters[i].exit = clusters[i].members[idx].id.clone();
            }
        }

        // Global closure: enumerate all (start, end) candidate pairs between
        // the first and last clusters, pick the pair minimizing straight-line
        // distance, overwrite cluster[0].entry and cluster[K-1].exit.
        let mut best_pair: Option<(usize, usize, f64)> = None;
        for (si, start) in clusters[0].members.iter().enumerate() {
            for (ei, end) in clusters[k - 1].members.iter().enumerate() {
                let d = haversine_distance_m((start.lon, start.lat), (end.lon, end.lat));
                let better = match best_pair {
                    None => true,
                    Some((bs, be, bd)) => d < bd || (d == bd && (si, ei) < (bs, be)),
                };
                if better {
                    best_pair = Some((si, ei, d));
                }
            }
        }

        if let Some((si, ei, _)) = best_pair {
            clusters[0].entry = clusters[0].members[si].id.clone();
            let last_idx = k - 1;
            clusters[last_idx].exit = clusters[last_idx].members[ei].id.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn single_cluster_uses_first_and_last_member() {
        let mut clusters = vec![Cluster::new(0, vec![pt("a", 0.0, 0.0), pt("b", 1.0, 1.0), pt("c", 2.0, 2.0)])];
        ClusterEndpointPicker::pick(&mut clusters);
        assert_eq!(clusters[0].entry, "a".into());
        assert_eq!(clusters[0].exit, "c".into());
    }

    #[test]
    fn entry_exit_are_always_members() {
        let mut clusters = vec![
            Cluster::new(0, vec![pt("a", 127.0, 37.5), pt("b", 127.01, 37.51)]),
            Cluster::new(1, vec![pt("c", 129.0, 35.1), pt("d", 129.01, 35.11)]),
        ];
        ClusterEndpointPicker::pick(&mut clusters);
        for c in &clusters {
            assert!(c.endpoints_are_members());
        }
    }
}
