//! Orders K clusters as a small TSP: nearest-neighbor from each possible
//! start, keep best.

use crate::coordinatekit::haversine_distance_m;
use crate::models::cluster::Cluster;

pub struct ClusterSequencer;

impl ClusterSequencer {
    /// Returns a permutation of cluster indices giving the shortest
    /// nearest-neighbor tour over cluster centroids, tried from every start.
    pub fn sequence(clusters: &[Cluster]) -> Vec<usize> {
        let k = clusters.len();
        if k <= 2 {
            return (0..k).collect();
        }

        let centroids: Vec<(f64, f64)> = clusters.iter().map(|c| c.centroid()).collect();

        let mut best_tour: Vec<usize> = (0..k).collect();
        let mut best_total = f64::INFINITY;

        for start in 0..k {
            let tour = Self::nearest_neighbor_from(&centroids, start);
            let total = Self::tour_length(&centroids, &tour);
            if total < best_total {
                best_total = total;
                best_tour = tour;
            }
        }

        best_tour
    }

    fn nearest_neighbor_from(centroids: &[(f64, f64)], start: usize) -> Vec<usize> {
        let k = centroids.len();
        let mut visited = vec![false; k];
        let mut tour = vec![start];
        visited[start] = true;

        let mut current = start;
        for _ in 1..k {
            let next = (0..k)
                .filter(|i| !visited[*i])
                .map(|i| (i, haversine_distance_m(centroids[current], centroids[i])))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
                .map(|(i, _)| i)
                .unwrap();
            visited[next] = true;
            tour.push(next);
            current = next;
        }

        tour
    }

    fn tour_length(centroids: &[(f64, f64)], tour: &[usize]) -> f64 {
        tour.windows(2)
            .map(|w| haversine_distance_m(centroids[w[0]], centroids[w[1]]))
            .sum()
    }

    /// Reorders clusters in place according to the given permutation, reindexing ids.
    pub fn apply(clusters: Vec<Cluster>, order: &[usize]) -> Vec<Cluster> {
        let mut by_id: Vec<Option<Cluster>> = clusters.into_iter().map(Some).collect();
        order
            .iter()
            .enumerate()
            .map(|(new_id, &old_idx)| {
                let mut c = by_id[old_idx].take().expect("each index used once");
                c.id = new_id;
                c
            })
            .collect()
    }
}
