//! For a candidate K, builds the full plan (ClusterBuilder → ClusterSequencer
//! → ClusterEndpointPicker → InternalOrderer), then invokes DirectionsClient
//! once per cluster plus once per inter-cluster hop to obtain measured
//! time/distance.
//!
//! Dispatch is a semaphore-bounded worker pool whose results are collected
//! through a completion channel keyed by job index, so final ordering matches
//! submission order regardless of completion order.

use crate::coordinatekit::haversine_distance_m;
use crate::directions::client::{DirectionsOutcome, DirectionsProvider};
use crate::logging::{Event, Sink};
use crate::models::cluster::Cluster;
use crate::models::measurement::{Measurement, Provenance};
use crate::models::plan::Plan;
use crate::models::point::Point;
use crate::models::priority::Priority;
use crate::planning::cluster_builder::ClusterBuilder;
use crate::planning::cluster_sequencer::ClusterSequencer;
use crate::planning::endpoint_picker::ClusterEndpointPicker;
use crate::planning::internal_orderer::InternalOrderer;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::constants::{DEGENERATE_PROXIMITY_METERS, DEGRADED_ESTIMATE_SPEED_KMH};

#[derive(Debug, Clone, Copy)]
enum JobKind {
    ClusterCall(usize),
    Hop(usize),
}

pub enum ScenarioOutcome {
    Succeeded {
        plan: Plan,
        measurement: Measurement,
        /// Per-cluster (duration_seconds, distance_meters) legs, positionally
        /// matching that cluster's interior points, for ResultAssembler.
        cluster_legs: Vec<Vec<(f64, f64)>>,
        /// Per-hop (duration_seconds, distance_meters), one per adjacent
        /// cluster pair, for ResultAssembler's prior-leg rule.
        hop_legs: Vec<(f64, f64)>,
    },
    Failed {
        reason: String,
    },
}

pub struct ScenarioEvaluator {
    pub road_distance_factor: f64,
    pub worker_pool_size: usize,
    pub provider: Arc<dyn DirectionsProvider>,
    pub sink: Arc<dyn Sink>,
}

impl ScenarioEvaluator {
    pub fn new(
        road_distance_factor: f64,
        worker_pool_size: usize,
        provider: Arc<dyn DirectionsProvider>,
        sink: Arc<dyn Sink>,
    ) -> Self {
        ScenarioEvaluator {
            road_distance_factor,
            worker_pool_size,
            provider,
            sink,
        }
    }

    pub async fn evaluate(&self, points: &[Point], k: usize, priority: Priority) -> ScenarioOutcome {
        let builder = ClusterBuilder::new(self.road_distance_factor, self.sink.as_ref());
        let mut clusters = builder.build(points, k);

        let order = ClusterSequencer::sequence(&clusters);
        clusters = ClusterSequencer::apply(clusters, &order);

        ClusterEndpointPicker::pick(&mut clusters);

        let orderer = InternalOrderer::new(self.sink.as_ref());
        for cluster in clusters.iter_mut() {
            cluster.members = orderer.order(cluster);
        }

        let kc = clusters.len();
        let mut jobs = Vec::with_capacity(kc + kc.saturating_sub(1));
        for i in 0..kc {
            jobs.push(JobKind::ClusterCall(i));
        }
        for i in 0..kc.saturating_sub(1) {
            jobs.push(JobKind::Hop(i));
        }

        let results = self.dispatch(jobs, &clusters, priority).await;

        let mut measurement = Measurement::zero(Provenance::Measured);
        let mut degraded = false;
        let mut cluster_legs: Vec<Vec<(f64, f64)>> = vec![Vec::new(); kc];
        let mut hop_legs: Vec<(f64, f64)> = vec![(0.0, 0.0); kc.saturating_sub(1)];

        for (job, outcome) in results {
            match job {
                JobKind::ClusterCall(idx) => match outcome {
                    CallResult::Degenerate => {
                        measurement.add(
                            crate::constants::DEGENERATE_SECONDS,
                            crate::constants::DEGENERATE_METERS,
                        );
                    }
                    CallResult::Measured { seconds, meters, sections } => {
                        measurement.add(seconds, meters);
                        cluster_legs[idx] = sections;
                    }
                    CallResult::Failed(reason) => {
                        self.sink.error(Event::ScenarioFailed {
                            k,
                            reason: format!("cluster {idx} call failed: {reason}"),
                        });
                        return ScenarioOutcome::Failed {
                            reason: format!("cluster {idx} call failed: {reason}"),
                        };
                    }
                },
                JobKind::Hop(idx) => match outcome {
                    CallResult::Degenerate => {
                        measurement.add(
                            crate::constants::DEGENERATE_SECONDS,
                            crate::constants::DEGENERATE_METERS,
                        );
                        hop_legs[idx] = (crate::constants::DEGENERATE_SECONDS, crate::constants::DEGENERATE_METERS);
                    }
                    CallResult::Measured { seconds, meters, .. } => {
                        measurement.add(seconds, meters);
                        hop_legs[idx] = (seconds, meters);
                    }
                    CallResult::Failed(reason) => {
                        // Hop failure: fall back to a flagged straight-line estimate.
                        let a = clusters[idx].member(&clusters[idx].exit).unwrap();
                        let b = clusters[idx + 1].member(&clusters[idx + 1].entry).unwrap();
                        let dist_m = haversine_distance_m((a.lon, a.lat), (b.lon, b.lat));
                        let est_m = dist_m * self.road_distance_factor;
                        let est_s = (est_m / 1000.0) / DEGRADED_ESTIMATE_SPEED_KMH * 3600.0;
                        measurement.add(est_s, est_m);
                        hop_legs[idx] = (est_s, est_m);
                        degraded = true;
                        self.sink.warn(Event::Degraded {
                            reason: format!("hop {idx} estimated after failure: {reason}"),
                        });
                    }
                },
            }
        }

        if degraded {
            measurement.provenance = Provenance::Estimated;
        }

        self.sink.info(Event::ScenarioMeasured {
            k,
            seconds: measurement.total_seconds,
            meters: measurement.total_meters,
        });

        ScenarioOutcome::Succeeded {
            plan: Plan::new(clusters),
            measurement,
            cluster_legs,
            hop_legs,
        }
    }

    async fn dispatch(
        &self,
        jobs: Vec<JobKind>,
        clusters: &[Cluster],
        priority: Priority,
    ) -> Vec<(JobKind, CallResult)> {
        let semaphore = Arc::new(Semaphore::new(self.worker_pool_size.max(1)));
        let (tx, mut rx) = mpsc::channel(jobs.len().max(1));

        for (index, job) in jobs.iter().enumerate() {
            let job = *job;
            let sem = semaphore.clone();
            let provider = self.provider.clone();
            let tx = tx.clone();

            let call = self.build_call(job, clusters, priority);

            tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.expect("semaphore not closed");
                let result = match call {
                    Call::Degenerate => CallResult::Degenerate,
                    Call::Dispatch { origin, destination, waypoints, priority } => {
                        match provider.get_directions(origin, destination, &waypoints, priority).await {
                            DirectionsOutcome::Ok { duration_seconds, distance_meters, sections } => {
                                CallResult::Measured {
                                    seconds: duration_seconds,
                                    meters: distance_meters,
                                    sections,
                                }
                            }
                            DirectionsOutcome::Degenerate => CallResult::Degenerate,
                            other => CallResult::Failed(format!("{other:?}")),
                        }
                    }
                };
                let _ = tx.send((index, job, result)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<(JobKind, CallResult)>> = vec![None; jobs.len()];
        while let Some((index, job, result)) = rx.recv().await {
            slots[index] = Some((job, result));
        }

        slots.into_iter().map(|s| s.expect("every job reports exactly once")).collect()
    }

    fn build_call(&self, job: JobKind, clusters: &[Cluster], priority: Priority) -> Call {
        match job {
            JobKind::ClusterCall(idx) => {
                let cluster = &clusters[idx];
                if cluster.len() == 1 || (cluster.entry == cluster.exit && cluster.interior().is_empty()) {
                    return Call::Degenerate;
                }
                let entry = cluster.member(&cluster.entry).unwrap();
                let exit = cluster.member(&cluster.exit).unwrap();
                let waypoints: Vec<(f64, f64)> = cluster
                    .interior()
                    .iter()
                    .map(|p| (p.lon, p.lat))
                    .collect();
                Call::Dispatch {
                    origin: (entry.lon, entry.lat),
                    destination: (exit.lon, exit.lat),
                    waypoints,
                    priority,
                }
            }
            JobKind::Hop(idx) => {
                let a = clusters[idx].member(&clusters[idx].exit).unwrap();
                let b = clusters[idx + 1].member(&clusters[idx + 1].entry).unwrap();
                let dist = haversine_distance_m((a.lon, a.lat), (b.lon, b.lat));
                if dist < DEGENERATE_PROXIMITY_METERS {
                    return Call::Degenerate;
                }
                Call::Dispatch {
                    origin: (a.lon, a.lat),
                    destination: (b.lon, b.lat),
                    waypoints: Vec::new(),
                    priority,
                }
            }
        }
    }
}

enum Call {
    Degenerate,
    Dispatch {
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: Vec<(f64, f64)>,
        priority: Priority,
    },
}

#[derive(Debug, Clone)]
enum CallResult {
    Measured {
        seconds: f64,
        meters: f64,
        sections: Vec<(f64, f64)>,
    },
    Degenerate,
    Failed(String),
}
