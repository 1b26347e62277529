use async_trait::async_trait;
use routeplan::directions::{DirectionsOutcome, DirectionsProvider};
use routeplan::models::{Point, PointDetails, Priority};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A scripted directions provider: each call pulls the next outcome from a
/// fixed queue, cycling back to the last entry once exhausted. Tracks the
/// number of calls made so tests can assert on call counts.
pub struct MockDirectionsProvider {
    outcomes: Mutex<Vec<DirectionsOutcome>>,
    cursor: AtomicUsize,
    calls: AtomicUsize,
}

impl MockDirectionsProvider {
    pub fn new(outcomes: Vec<DirectionsOutcome>) -> Self {
        MockDirectionsProvider {
            outcomes: Mutex::new(outcomes),
            cursor: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(outcome: DirectionsOutcome) -> Self {
        MockDirectionsProvider::new(vec![outcome])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for MockDirectionsProvider {
    async fn get_directions(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        _waypoints: &[(f64, f64)],
        _priority: Priority,
    ) -> DirectionsOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let dist_m = routeplan::coordinatekit::haversine_distance_m(origin, destination);
        let outcomes = self.outcomes.lock().unwrap();
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst).min(outcomes.len() - 1);
        match &outcomes[idx] {
            DirectionsOutcome::Ok { sections, .. } => DirectionsOutcome::Ok {
                duration_seconds: (dist_m / 1000.0) / 30.0 * 3600.0,
                distance_meters: dist_m,
                sections: sections.clone(),
            },
            other => other.clone(),
        }
    }
}

#[allow(dead_code)]
pub fn pt(id: &str, lon: f64, lat: f64) -> Point {
    Point {
        id: id.into(),
        lon,
        lat,
        details: PointDetails::default(),
    }
}

/// Ten tightly clustered Seoul points.
#[allow(dead_code)]
pub fn tight_seoul_cluster(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| pt(&format!("seoul_{i}"), 127.0 + 0.001 * i as f64, 37.50 + 0.001 * i as f64))
        .collect()
}

/// Points spread along a line, far enough apart that a single 30-waypoint
/// cluster cannot cover all of them once N exceeds 30.
#[allow(dead_code)]
pub fn line_points(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| pt(&format!("line_{i}"), 127.0 + 0.01 * i as f64, 37.5 + 0.01 * i as f64))
        .collect()
}

/// Two geographic clumps: Seoul-area and Busan-area points.
#[allow(dead_code)]
pub fn two_clumps(seoul_n: usize, busan_n: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(seoul_n + busan_n);
    for i in 0..seoul_n {
        points.push(pt(&format!("seoul_{i}"), 127.0 + 0.001 * i as f64, 37.5 + 0.001 * i as f64));
    }
    for i in 0..busan_n {
        points.push(pt(&format!("busan_{i}"), 129.0 + 0.001 * i as f64, 35.1 + 0.001 * i as f64));
    }
    points
}
