use crate::models::point::{Point, PointId};

/// A set of points visited contiguously, with a chosen entry and exit,
/// sized ≤30 to satisfy the provider constraint.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<Point>,
    pub entry: PointId,
    pub exit: PointId,
}

impl Cluster {
    /// Builds a cluster with entry/exit defaulted to the first member, to be
    /// overwritten later by ClusterEndpointPicker.
    pub fn new(id: usize, members: Vec<Point>) -> Self {
        let first = members[0].id.clone();
        Cluster {
            id,
            members,
            entry: first.clone(),
            exit: first,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Invariant check used by tests and by ResultAssembler's safety nets:
    /// entry and exit must both be members.
    pub fn endpoints_are_members(&self) -> bool {
        self.members.iter().any(|p| p.id == self.entry)
            && self.members.iter().any(|p| p.id == self.exit)
    }

    pub fn member(&self, id: &PointId) -> Option<&Point> {
        self.members.iter().find(|p| &p.id == id)
    }

    /// Mean longitude/latitude of the member set (CoordinateKit centroid).
    pub fn centroid(&self) -> (f64, f64) {
        crate::coordinatekit::centroid(self.members.iter().map(|p| (p.lon, p.lat)))
    }

    /// Interior points: all members excluding entry and exit.
    pub fn interior(&self) -> Vec<&Point> {
        self.members
            .iter()
            .filter(|p| p.id != self.entry && p.id != self.exit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn endpoint_membership_invariant() {
        let c = Cluster::new(0, vec![pt("a", 127.0, 37.0), pt("b", 127.1, 37.1)]);
        assert!(c.endpoints_are_members());
    }

    #[test]
    fn centroid_is_mean_of_members() {
        let c = Cluster::new(0, vec![pt("a", 0.0, 0.0), pt("b", 2.0, 2.0)]);
        let (lon, lat) = c.centroid();
        assert!((lon - 1.0).abs() < 1e-9);
        assert!((lat - 1.0).abs() < 1e-9);
    }
}
