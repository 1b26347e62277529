use crate::constants::{DEGENERATE_METERS, DEGENERATE_SECONDS, SINGLE_POINT_METERS, SINGLE_POINT_SECONDS};

/// Whether a Measurement came from a live provider call, a fixed degenerate
/// constant, or the degraded straight-line estimator. The selection rule in
/// GlobalOptimizer never lets an Estimated scenario beat a Measured one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Measured,
    /// A fixed constant substituted for a 5 m-proximity degenerate pair or a
    /// size-1 cluster — not a network call, but not an estimate either.
    Degenerate,
    /// The whole-plan single-point case (N=1).
    SinglePoint,
    /// The degraded straight-line×road-factor fallback.
    Estimated,
}

/// A tuple (total_seconds, total_meters) for a Plan, valid only if every
/// constituent call succeeded or was resolved by a degenerate rule.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub total_seconds: f64,
    pub total_meters: f64,
    pub provenance: Provenance,
}

impl Measurement {
    pub fn zero(provenance: Provenance) -> Self {
        Measurement {
            total_seconds: 0.0,
            total_meters: 0.0,
            provenance,
        }
    }

    pub fn degenerate() -> Self {
        Measurement {
            total_seconds: DEGENERATE_SECONDS,
            total_meters: DEGENERATE_METERS,
            provenance: Provenance::Degenerate,
        }
    }

    pub fn single_point() -> Self {
        Measurement {
            total_seconds: SINGLE_POINT_SECONDS,
            total_meters: SINGLE_POINT_METERS,
            provenance: Provenance::SinglePoint,
        }
    }

    pub fn add(&mut self, seconds: f64, meters: f64) {
        self.total_seconds += seconds;
        self.total_meters += meters;
    }

    pub fn is_measured(&self) -> bool {
        self.provenance == Provenance::Measured
    }
}
