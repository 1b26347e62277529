//! Sweeps K from 2 to ⌈N/2⌉, keeps the scenario with minimum measured total
//! time; on tie prefers closure. Falls back to a degraded straight-line
//! estimate if every candidate K fails.

use crate::constants::{SMALL_PLAN_MAX_N, TIE_BREAK_SECONDS};
use crate::coordinatekit::haversine_distance_m;
use crate::directions::client::DirectionsProvider;
use crate::error::PlanError;
use crate::logging::{Event, Sink};
use crate::models::measurement::{Measurement, Provenance};
use crate::models::plan::Plan;
use crate::models::point::Point;
use crate::models::priority::Priority;
use crate::planning::cluster_builder::ClusterBuilder;
use crate::planning::endpoint_picker::ClusterEndpointPicker;
use crate::planning::internal_orderer::InternalOrderer;
use crate::planning::scenario_evaluator::{ScenarioEvaluator, ScenarioOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct GlobalOptimizer {
    pub road_distance_factor: f64,
    pub worker_pool_size: usize,
    pub provider: Arc<dyn DirectionsProvider>,
    pub sink: Arc<dyn Sink>,
}

pub struct Winner {
    pub plan: Plan,
    pub measurement: Measurement,
    /// Per-cluster interior leg breakdown for ResultAssembler; empty
    /// per cluster when no real DirectionsClient call was made (single-point,
    /// small-plan, or degraded-fallback paths), in which case ResultAssembler
    /// derives legs directly from straight-line segments.
    pub cluster_legs: Vec<Vec<(f64, f64)>>,
    pub hop_legs: Vec<(f64, f64)>,
    /// Set when this `Winner` is the best scenario evaluated so far at the
    /// moment cancellation hit, rather than the result of a completed sweep.
    pub partial: bool,
}

impl GlobalOptimizer {
    pub fn new(
        road_distance_factor: f64,
        worker_pool_size: usize,
        provider: Arc<dyn DirectionsProvider>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        GlobalOptimizer {
            road_distance_factor,
            worker_pool_size,
            provider,
            sink,
        }
    }

    /// `cancelled` is polled between K candidates so a mid-sweep cancellation
    /// can still surface the best scenario evaluated so far rather than
    /// discarding it: `Ok(Winner)` if at least one K succeeded (complete or
    /// cancelled-partial), `Err(PlanError::Cancelled)` only if cancellation
    /// hit before any scenario finished.
    pub async fn optimize(
        &self,
        points: &[Point],
        priority: Priority,
        cancelled: Arc<AtomicBool>,
    ) -> Result<Winner, PlanError> {
        let n = points.len();

        if n == 1 {
            // Whole-plan single-point case.
            let cluster = crate::models::cluster::Cluster::new(0, points.to_vec());
            return Ok(Winner {
                plan: Plan::new(vec![cluster]),
                measurement: Measurement::single_point(),
                cluster_legs: vec![Vec::new()],
                hop_legs: Vec::new(),
                partial: false,
            });
        }

        if n <= SMALL_PLAN_MAX_N {
            // skip the K-sweep/API calls; use the degraded estimator directly.
            let builder = ClusterBuilder::new(self.road_distance_factor, self.sink.as_ref());
            let mut clusters = builder.build(points, 1);
            ClusterEndpointPicker::pick(&mut clusters);
            let orderer = InternalOrderer::new(self.sink.as_ref());
            for cluster in clusters.iter_mut() {
                cluster.members = orderer.order(cluster);
            }
            let measurement = Self::estimate_path(&clusters[0].members, self.road_distance_factor);
            return Ok(Winner {
                cluster_legs: vec![Self::estimate_legs(&clusters[0].members, self.road_distance_factor)],
                plan: Plan::new(clusters),
                measurement,
                hop_legs: Vec::new(),
                partial: false,
            });
        }

        let evaluator = ScenarioEvaluator::new(
            self.road_distance_factor,
            self.worker_pool_size,
            self.provider.clone(),
            self.sink.clone(),
        );

        let max_k = std::cmp::max(2, (n as f64 / 2.0).ceil() as usize);

        type BestTuple = (usize, Plan, Measurement, Vec<Vec<(f64, f64)>>, Vec<(f64, f64)>);
        let mut best: Option<BestTuple> = None;
        let mut was_cancelled = false;

        for k in 2..=max_k {
            if cancelled.load(Ordering::SeqCst) {
                was_cancelled = true;
                break;
            }

            match evaluator.evaluate(points, k, priority).await {
                ScenarioOutcome::Succeeded { plan, measurement, cluster_legs, hop_legs } => {
                    best = Some(match best {
                        None => (k, plan, measurement, cluster_legs, hop_legs),
                        Some((best_k, best_plan, best_measurement, best_cluster_legs, best_hop_legs)) => {
                            if Self::prefers(&measurement, &plan, &best_measurement, &best_plan) {
                                (k, plan, measurement, cluster_legs, hop_legs)
                            } else {
                                (best_k, best_plan, best_measurement, best_cluster_legs, best_hop_legs)
                            }
                        }
                    });
                }
                ScenarioOutcome::Failed { reason } => {
                    self.sink.warn(Event::ScenarioFailed { k, reason });
                }
            }
        }

        if was_cancelled {
            return match best {
                Some((best_k, plan, measurement, cluster_legs, hop_legs)) => {
                    self.sink.warn(Event::CancelledPartial { best_k });
                    Ok(Winner { plan, measurement, cluster_legs, hop_legs, partial: true })
                }
                None => Err(PlanError::Cancelled),
            };
        }

        match best {
            Some((_, plan, measurement, cluster_legs, hop_legs)) => Ok(Winner {
                plan,
                measurement,
                cluster_legs,
                hop_legs,
                partial: false,
            }),
            None => Ok(self.degraded_fallback(points)),
        }
    }

    /// Selection rule: lower measured_total_seconds wins; if |Δseconds| < 6s,
    /// the smaller global start-to-end straight-line distance wins; never lets
    /// an Estimated scenario beat a Measured one.
    fn prefers(candidate: &Measurement, candidate_plan: &Plan, current_best: &Measurement, best_plan: &Plan) -> bool {
        let candidate_measured = candidate.provenance == Provenance::Measured;
        let best_measured = current_best.provenance == Provenance::Measured;

        if best_measured && !candidate_measured {
            return false;
        }
        if candidate_measured && !best_measured {
            return true;
        }

        let delta = candidate.total_seconds - current_best.total_seconds;
        if delta.abs() < TIE_BREAK_SECONDS {
            Self::closure_distance(candidate_plan) < Self::closure_distance(best_plan)
        } else {
            delta < 0.0
        }
    }

    fn closure_distance(plan: &Plan) -> f64 {
        let Some(first) = plan.clusters.first() else {
            return f64::INFINITY;
        };
        let Some(last) = plan.clusters.last() else {
            return f64::INFINITY;
        };
        let start = first.member(&first.entry).unwrap();
        let end = last.member(&last.exit).unwrap();
        haversine_distance_m((start.lon, start.lat), (end.lon, end.lat))
    }

    /// If all scenarios fail, fall back to the simplest viable plan:
    /// K=⌈N/30⌉ clusters measured with the degraded straight-line estimator.
    fn degraded_fallback(&self, points: &[Point]) -> Winner {
        let k = std::cmp::max(1, (points.len() as f64 / 30.0).ceil() as usize);
        let builder = ClusterBuilder::new(self.road_distance_factor, self.sink.as_ref());
        let mut clusters = builder.build(points, k);
        let order = crate::planning::cluster_sequencer::ClusterSequencer::sequence(&clusters);
        clusters = crate::planning::cluster_sequencer::ClusterSequencer::apply(clusters, &order);
        ClusterEndpointPicker::pick(&mut clusters);
        let orderer = InternalOrderer::new(self.sink.as_ref());
        for cluster in clusters.iter_mut() {
            cluster.members = orderer.order(cluster);
        }

        let mut measurement = Measurement::zero(Provenance::Estimated);
        let mut cluster_legs = Vec::with_capacity(clusters.len());
        for cluster in &clusters {
            let m = Self::estimate_path(&cluster.members, self.road_distance_factor);
            measurement.add(m.total_seconds, m.total_meters);
            cluster_legs.push(Self::estimate_legs(&cluster.members, self.road_distance_factor));
        }
        let mut hop_legs = Vec::with_capacity(clusters.len().saturating_sub(1));
        for pair in clusters.windows(2) {
            let a = pair[0].member(&pair[0].exit).unwrap();
            let b = pair[1].member(&pair[1].entry).unwrap();
            let dist = haversine_distance_m((a.lon, a.lat), (b.lon, b.lat));
            let est_m = dist * self.road_distance_factor;
            let est_s = (est_m / 1000.0) / crate::constants::DEGRADED_ESTIMATE_SPEED_KMH * 3600.0;
            measurement.add(est_s, est_m);
            hop_legs.push((est_s, est_m));
        }

        self.sink.warn(Event::Degraded {
            reason: "all scenarios failed; using degraded straight-line estimate".to_string(),
        });

        Winner {
            plan: Plan::new(clusters),
            measurement,
            cluster_legs,
            hop_legs,
            partial: false,
        }
    }

    fn estimate_path(members: &[Point], road_distance_factor: f64) -> Measurement {
        let mut total_m = 0.0;
        for pair in members.windows(2) {
            total_m += haversine_distance_m((pair[0].lon, pair[0].lat), (pair[1].lon, pair[1].lat)) * road_distance_factor;
        }
        let total_s = (total_m / 1000.0) / crate::constants::DEGRADED_ESTIMATE_SPEED_KMH * 3600.0;
        Measurement {
            total_seconds: total_s,
            total_meters: total_m,
            provenance: Provenance::Estimated,
        }
    }

    /// Per-leg breakdown matching `estimate_path`'s total, for ResultAssembler
    /// when no real DirectionsClient response is available to map positionally.
    fn estimate_legs(members: &[Point], road_distance_factor: f64) -> Vec<(f64, f64)> {
        members
            .windows(2)
            .map(|pair| {
                let m = haversine_distance_m((pair[0].lon, pair[0].lat), (pair[1].lon, pair[1].lat)) * road_distance_factor;
                let s = (m / 1000.0) / crate::constants::DEGRADED_ESTIMATE_SPEED_KMH * 3600.0;
                (s, m)
            })
            .collect()
    }
}
