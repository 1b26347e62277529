//! With a cluster's entry and exit fixed, orders its interior points by
//! nearest-neighbor from the entry, then appends the exit.

use crate::coordinatekit::haversine_distance_m;
use crate::logging::{Event, Sink};
use crate::models::cluster::Cluster;
use crate::models::point::{Point, PointId};

pub struct InternalOrderer<'a> {
    sink: &'a dyn Sink,
}

impl<'a> InternalOrderer<'a> {
    pub fn new(sink: &'a dyn Sink) -> Self {
        InternalOrderer { sink }
    }

    /// Returns the ordered member list [E, p1, ..., pn, X] for this cluster.
    pub fn order(&self, cluster: &Cluster) -> Vec<Point> {
        let original_len = cluster.len();

        if cluster.len() <= 2 {
            return cluster.members.clone();
        }

        let entry = cluster.member(&cluster.entry).expect("entry is a member").clone();
        let exit_id = cluster.exit.clone();

        if entry.id == exit_id {
            // E = X: cycle returning to start, drop the duplicated endpoint.
            let interior: Vec<Point> = cluster
                .members
                .iter()
                .filter(|p| p.id != entry.id)
                .cloned()
                .collect();
            let mut ordered = vec![entry.clone()];
            ordered.extend(Self::nearest_neighbor_tour(&entry, &interior));
            return self.verify_or_fallback(cluster, ordered, original_len);
        }

        let exit = cluster.member(&exit_id).expect("exit is a member").clone();
        let interior: Vec<Point> = cluster
            .members
            .iter()
            .filter(|p| p.id != entry.id && p.id != exit_id)
            .cloned()
            .collect();

        let mut ordered = vec![entry.clone()];
        ordered.extend(Self::nearest_neighbor_tour(&entry, &interior));
        ordered.push(exit);

        self.verify_or_fallback(cluster, ordered, original_len)
    }

    fn nearest_neighbor_tour(start: &Point, interior: &[Point]) -> Vec<Point> {
        let mut remaining: Vec<Point> = interior.to_vec();
        let mut ordered = Vec::with_capacity(remaining.len());
        let mut current = (start.lon, start.lat);

        while !remaining.is_empty() {
            let (idx, _) = remaining
                .iter()
                .enumerate()
                .map(|(i, p)| (i, haversine_distance_m(current, (p.lon, p.lat))))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
                .unwrap();
            let next = remaining.remove(idx);
            current = (next.lon, next.lat);
            ordered.push(next);
        }

        ordered
    }

    /// Safety net: result length must equal |members|; otherwise the
    /// original order is returned and an error is logged.
    fn verify_or_fallback(&self, cluster: &Cluster, ordered: Vec<Point>, expected_len: usize) -> Vec<Point> {
        if ordered.len() == expected_len {
            let ids: std::collections::HashSet<&PointId> = ordered.iter().map(|p| &p.id).collect();
            if ids.len() == expected_len {
                return ordered;
            }
        }
        self.sink.error(Event::ScenarioFailed {
            k: cluster.id,
            reason: "InternalOrderer produced a malformed tour; falling back to original order".to_string(),
        });
        cluster.members.clone()
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
    fn small_cluster_returned_unchanged() {
        let sink = CapturingSink::new();
        let orderer = InternalOrderer::new(&sink);
        let mut cluster = Cluster::new(0, vec![pt("a", 0.0, 0.0), pt("b", 1.0, 1.0)]);
        cluster.entry = "a".into();
        cluster.exit = "b".into();
        let ordered = orderer.order(&cluster);
        assert_eq!(ordered.len(), 2);
    }

    #[test]
    fn result_preserves_all_members() {
        let sink = CapturingSink::new();
        let orderer = InternalOrderer::new(&sink);
        let mut cluster = Cluster::new(
            0,
            vec![pt("a", 0.0, 0.0), pt("b", 5.0, 5.0), pt("c", 1.0, 1.0), pt("d", 2.0, 2.0)],
        );
        cluster.entry = "a".into();
        cluster.exit = "b".into();
        let ordered = orderer.order(&cluster);
        assert_eq!(ordered.len(), 4);
        assert_eq!(ordered.first().unwrap().id, "a".into());
        assert_eq!(ordered.last().unwrap().id, "b".into());
    }
}
