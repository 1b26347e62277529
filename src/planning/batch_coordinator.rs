//! Top-level entry: validates inputs, delegates to GlobalOptimizer, returns
//! both the assembled per-waypoint sequence and the aggregate totals.

use crate::config::Config;
use crate::constants::CANCELLATION_GRACE_SECS;
use crate::directions::client::DirectionsProvider;
use crate::error::PlanError;
use crate::logging::{Event, Sink};
use crate::models::measurement::Provenance;
use crate::models::point::Point;
use crate::models::priority::Priority;
use crate::models::summary::{ClusterSummary, Summary};
use crate::models::waypoint::AssembledWaypoint;
use crate::planning::global_optimizer::GlobalOptimizer;
use crate::planning::result_assembler::ResultAssembler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub struct BatchCoordinator {
    pub config: Config,
    pub provider: Arc<dyn DirectionsProvider>,
    pub sink: Arc<dyn Sink>,
    cancelled: Arc<AtomicBool>,
    cancel_notify: Arc<Notify>,
}

pub struct BatchResult {
    pub waypoints: Vec<AssembledWaypoint>,
    pub summary: Summary,
}

impl BatchCoordinator {
    pub fn new(config: Config, provider: Arc<dyn DirectionsProvider>, sink: Arc<dyn Sink>) -> Self {
        BatchCoordinator {
            config,
            provider,
            sink,
            cancelled: Arc::new(AtomicBool::new(false)),
            cancel_notify: Arc::new(Notify::new()),
        }
    }

    /// Cooperative cancellation signal: stop accepting new scenarios.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancel_notify.notify_waiters();
    }

    pub async fn plan(&self, batch_id: &str, points: Vec<Point>, priority: Priority) -> Result<BatchResult, PlanError> {
        if points.is_empty() {
            return Err(PlanError::InputError("no valid points to plan".to_string()));
        }

        let valid_points: Vec<Point> = points
            .into_iter()
            .filter(|p| {
                let ok = crate::coordinatekit::in_regional_bounds(
                    p.lon,
                    p.lat,
                    self.config.min_lon,
                    self.config.max_lon,
                    self.config.min_lat,
                    self.config.max_lat,
                );
                if !ok {
                    self.sink.warn(Event::PlausibilityWarning {
                        detail: format!("point {} outside regional bounds, filtered", p.id),
                    });
                }
                ok
            })
            .collect();

        if valid_points.is_empty() {
            return Err(PlanError::InputError(
                "no valid coordinates after filtering".to_string(),
            ));
        }

        if self.cancelled.load(Ordering::SeqCst) {
            return Err(PlanError::Cancelled);
        }

        let optimizer = GlobalOptimizer::new(
            self.config.road_distance_factor,
            self.config.worker_pool_size,
            self.provider.clone(),
            self.sink.clone(),
        );

        let cancelled = self.cancelled.clone();
        let mut run = tokio::spawn(async move { optimizer.optimize(&valid_points, priority, cancelled).await });

        let winner = tokio::select! {
            result = &mut run => result.expect("optimize task panicked")?,
            _ = self.cancel_notify.notified() => {
                // `optimize` polls `cancelled` between K candidates, so give it a
                // grace period to land on that check and hand back its best-so-far
                // scenario before this is treated as a hard, unsalvageable failure.
                match tokio::time::timeout(
                    std::time::Duration::from_secs(CANCELLATION_GRACE_SECS),
                    &mut run,
                ).await {
                    Ok(result) => result.expect("optimize task panicked")?,
                    Err(_elapsed) => {
                        run.abort();
                        return Err(PlanError::Cancelled);
                    }
                }
            }
        };

        let waypoints = ResultAssembler::assemble(&winner);

        let cluster_summaries: Vec<ClusterSummary> = winner
            .plan
            .clusters
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let legs = winner.cluster_legs.get(idx);
                let duration_s = legs.map(|l| l.iter().map(|(s, _)| s).sum()).unwrap_or(0.0);
                let distance_m = legs.map(|l| l.iter().map(|(_, m)| m).sum()).unwrap_or(0.0);
                ClusterSummary {
                    cluster_id: c.id,
                    waypoint_count: c.len(),
                    distance_m,
                    duration_s,
                }
            })
            .collect();

        let summary = Summary {
            batch_id: batch_id.to_string(),
            success: true,
            waypoint_count: waypoints.len(),
            total_distance_m: winner.measurement.total_meters,
            total_duration_s: winner.measurement.total_seconds,
            average_speed_kmh: Summary::average_speed_kmh(
                winner.measurement.total_meters,
                winner.measurement.total_seconds,
            ),
            clusters: cluster_summaries,
            failure_messages: if winner.partial {
                vec!["cancelled mid-sweep; returning best scenario evaluated so far".to_string()]
            } else {
                Vec::new()
            },
            degraded: winner.measurement.provenance == Provenance::Estimated,
            partial: winner.partial,
        };

        Ok(BatchResult { waypoints, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_sets_flag() {
        let cancelled = Arc::new(AtomicBool::new(false));
        cancelled.store(true, Ordering::SeqCst);
        assert!(cancelled.load(Ordering::SeqCst));
    }
}
