use crate::models::cluster::Cluster;

/// An ordered sequence of clusters with fixed entries, exits, and internal orders.
#[derive(Debug, Clone)]
pub struct Plan {
    pub clusters: Vec<Cluster>,
}

impl Plan {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Plan { clusters }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn point_count(&self) -> usize {
        self.clusters.iter().map(|c| c.len()).sum()
    }

    /// Conservation invariant: every point id appears exactly once.
    pub fn conserves(&self, expected_ids: &[crate::models::point::PointId]) -> bool {
        let mut plan_ids: Vec<_> = self
            .clusters
            .iter()
            .flat_map(|c| c.members.iter().map(|p| p.id.clone()))
            .collect();
        let mut expected: Vec<_> = expected_ids.to_vec();
        plan_ids.sort();
        expected.sort();
        plan_ids == expected
    }
}
