//! One call unit against the external waypoint-directions provider: request
//! building, retry/backoff, and timeout-vs-status classification.

use crate::constants::{
    IMPLAUSIBLE_SPEED_KMH, MAX_INTERMEDIATE_WAYPOINTS, MAX_RETRY_ATTEMPTS, RATE_LIMIT_BACKOFF_MS,
    REQUEST_TIMEOUT_SECS, RETRY_BACKOFF_BASE_MS, WARN_MIN_SECONDS_PER_WAYPOINT, WARN_SPEED_KMH,
    WARN_TOTAL_DISTANCE_METERS,
};
use crate::directions::rate_limit::TokenBucket;
use crate::directions::wire::{DirectionsRequest, DirectionsResponse, WirePoint};
use crate::logging::{Event, Sink};
use crate::models::priority::Priority;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Discriminated union result.
#[derive(Debug, Clone)]
pub enum DirectionsOutcome {
    Ok {
        duration_seconds: f64,
        distance_meters: f64,
        /// Per-leg (duration_seconds, distance_meters) breakdown from the
        /// response's `sections` array, positionally one entry per
        /// origin→wp1, wp1→wp2, ..., wpN→destination leg. Empty when the
        /// provider returned only a top-level summary with no section detail.
        sections: Vec<(f64, f64)>,
    },
    /// Origin/destination within 5 m (result_code 104): 30 s, 10 m.
    Degenerate,
    NoRouteFound {
        result_code: i64,
        message: String,
    },
    ProviderError {
        result_code: i64,
        message: String,
    },
    MalformedResponse,
    NetworkError(String),
    AuthFailure,
    Forbidden,
    RateLimited,
}

impl DirectionsOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DirectionsOutcome::Ok { .. } | DirectionsOutcome::Degenerate)
    }
}

/// Abstracts the directions provider so ScenarioEvaluator can be driven by a
/// mock in tests without network I/O.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn get_directions(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: &[(f64, f64)],
        priority: Priority,
    ) -> DirectionsOutcome;
}

pub struct HttpDirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: TokenBucket,
    sink: Arc<dyn Sink>,
}

impl HttpDirectionsClient {
    pub fn new(base_url: String, api_key: String, bucket: TokenBucket, sink: Arc<dyn Sink>) -> Self {
        HttpDirectionsClient {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("reqwest client builds"),
            base_url,
            api_key,
            bucket,
            sink,
        }
    }

    fn check_plausibility(&self, duration_seconds: f64, distance_meters: f64, waypoint_count: usize) {
        let speed_kmh = if duration_seconds > 0.0 {
            (distance_meters / 1000.0) / (duration_seconds / 3600.0)
        } else {
            0.0
        };
        if speed_kmh > WARN_SPEED_KMH {
            self.sink.warn(Event::PlausibilityWarning {
                detail: format!("average speed {speed_kmh:.1} km/h exceeds warning threshold"),
            });
        }
        if duration_seconds < WARN_MIN_SECONDS_PER_WAYPOINT * waypoint_count as f64 {
            self.sink.warn(Event::PlausibilityWarning {
                detail: format!("duration {duration_seconds:.1}s implausibly short for {waypoint_count} waypoints"),
            });
        }
        if distance_meters > WARN_TOTAL_DISTANCE_METERS {
            self.sink.warn(Event::PlausibilityWarning {
                detail: format!("total distance {distance_meters:.0}m exceeds warning threshold"),
            });
        }
    }

    /// True if the response is implausible enough to warrant a requeue rather
    /// than acceptance.
    fn is_implausible(&self, duration_seconds: f64, distance_meters: f64, waypoint_count: usize) -> bool {
        if waypoint_count >= 2 && duration_seconds == 0.0 {
            return true;
        }
        if duration_seconds > 0.0 {
            let speed_kmh = (distance_meters / 1000.0) / (duration_seconds / 3600.0);
            if speed_kmh > IMPLAUSIBLE_SPEED_KMH {
                return true;
            }
        }
        false
    }

    fn extract_measurement(
        resp: &DirectionsResponse,
    ) -> Result<(f64, f64, Vec<(f64, f64)>), DirectionsOutcome> {
        let route = resp
            .routes
            .first()
            .ok_or(DirectionsOutcome::MalformedResponse)?;

        let sections: Vec<(f64, f64)> = route
            .sections
            .iter()
            .map(|s| (s.summary.duration, s.summary.distance))
            .collect();

        match route.result_code {
            0 => {
                if let Some(summary) = &route.summary {
                    Ok((summary.duration, summary.distance, sections))
                } else if !sections.is_empty() {
                    let duration: f64 = sections.iter().map(|(d, _)| d).sum();
                    let distance: f64 = sections.iter().map(|(_, m)| m).sum();
                    Ok((duration, distance, sections))
                } else {
                    Err(DirectionsOutcome::MalformedResponse)
                }
            }
            104 => Err(DirectionsOutcome::Degenerate),
            1 | 101..=107 => Err(DirectionsOutcome::NoRouteFound {
                result_code: route.result_code,
                message: route.result_msg.clone(),
            }),
            other => Err(DirectionsOutcome::ProviderError {
                result_code: other,
                message: route.result_msg.clone(),
            }),
        }
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsClient {
    async fn get_directions(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        waypoints: &[(f64, f64)],
        priority: Priority,
    ) -> DirectionsOutcome {
        if waypoints.len() > MAX_INTERMEDIATE_WAYPOINTS {
            return DirectionsOutcome::ProviderError {
                result_code: -1,
                message: format!("too many intermediate waypoints: {}", waypoints.len()),
            };
        }

        let body = DirectionsRequest::new(
            WirePoint::new(origin.0, origin.1, "origin"),
            WirePoint::new(destination.0, destination.1, "destination"),
            waypoints
                .iter()
                .enumerate()
                .map(|(i, p)| WirePoint::new(p.0, p.1, format!("waypoint_{i}")))
                .collect(),
            priority,
        );

        let url = format!("{}/waypoints/directions", self.base_url);
        let mut reduce_concurrency = false;

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            self.bucket.acquire().await;
            if reduce_concurrency {
                self.bucket.throttle_to_one();
            }

            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("KakaoAK {}", self.api_key))
                .json(&body)
                .send()
                .await;

            // Any error surfaced by `send()` is a transport-level failure
            // (timeout, connect reset, other I/O) — all retryable the same way.
            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    self.sink.warn(Event::RetryingRequest {
                        attempt,
                        reason: format!("network error: {e}"),
                    });
                    if attempt + 1 < MAX_RETRY_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(
                            RETRY_BACKOFF_BASE_MS * 2u64.pow(attempt),
                        ))
                        .await;
                        continue;
                    }
                    return DirectionsOutcome::NetworkError(e.to_string());
                }
            };

            let status = response.status();

            if status.as_u16() == 401 {
                return DirectionsOutcome::AuthFailure;
            }
            if status.as_u16() == 403 {
                return DirectionsOutcome::Forbidden;
            }
            if status.as_u16() == 400 {
                return DirectionsOutcome::ProviderError {
                    result_code: 400,
                    message: "invalid request".to_string(),
                };
            }
            if status.as_u16() == 429 {
                self.sink.warn(Event::RateLimited {
                    backoff_ms: RATE_LIMIT_BACKOFF_MS,
                });
                reduce_concurrency = true;
                if attempt + 1 < MAX_RETRY_ATTEMPTS {
                    tokio::time::sleep(Duration::from_millis(RATE_LIMIT_BACKOFF_MS)).await;
                    continue;
                }
                return DirectionsOutcome::RateLimited;
            }
            if status.is_server_error() {
                self.sink.warn(Event::RetryingRequest {
                    attempt,
                    reason: format!("server error {status}"),
                });
                if attempt + 1 < MAX_RETRY_ATTEMPTS {
                    tokio::time::sleep(Duration::from_millis(
                        RETRY_BACKOFF_BASE_MS * 2u64.pow(attempt),
                    ))
                    .await;
                    continue;
                }
                return DirectionsOutcome::NetworkError(format!("server error {status}"));
            }

            let parsed: Result<DirectionsResponse, _> = response.json().await;
            let parsed = match parsed {
                Ok(p) => p,
                Err(_) => return DirectionsOutcome::MalformedResponse,
            };

            match Self::extract_measurement(&parsed) {
                Ok((duration, distance, sections)) => {
                    let waypoint_count = waypoints.len() + 2;
                    if self.is_implausible(duration, distance, waypoint_count) {
                        self.sink.warn(Event::RetryingRequest {
                            attempt,
                            reason: "implausible measurement".to_string(),
                        });
                        if attempt + 1 < MAX_RETRY_ATTEMPTS {
                            tokio::time::sleep(Duration::from_millis(
                                RETRY_BACKOFF_BASE_MS * 2u64.pow(attempt),
                            ))
                            .await;
                            continue;
                        }
                    }
                    self.check_plausibility(duration, distance, waypoint_count);
                    return DirectionsOutcome::Ok {
                        duration_seconds: duration,
                        distance_meters: distance,
                        sections,
                    };
                }
                Err(DirectionsOutcome::MalformedResponse) => {
                    if attempt + 1 < MAX_RETRY_ATTEMPTS {
                        continue;
                    }
                    return DirectionsOutcome::MalformedResponse;
                }
                Err(other) => return other,
            }
        }

        DirectionsOutcome::NetworkError("exhausted retries".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::TracingSink;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn outcome_success_classification() {
        assert!(DirectionsOutcome::Degenerate.is_success());
        assert!(DirectionsOutcome::Ok {
            duration_seconds: 1.0,
            distance_meters: 1.0,
            sections: Vec::new(),
        }
        .is_success());
        assert!(!DirectionsOutcome::AuthFailure.is_success());
    }

    /// Serves one canned HTTP response per accepted connection, draining the
    /// request first so the client doesn't block on a half-closed write.
    async fn serve_responses(listener: TcpListener, responses: Vec<String>) {
        for body in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(body.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        }
    }

    #[tokio::test]
    async fn retries_past_429_and_succeeds_on_third_attempt() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let ok_body = r#"{"routes":[{"result_code":0,"result_msg":"","summary":{"distance":1000.0,"duration":120.0},"sections":[]}]}"#;
        let ok_response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            ok_body.len(),
            ok_body
        );
        let responses = vec![
            "HTTP/1.1 429 Too Many Requests\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
            "HTTP/1.1 429 Too Many Requests\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
            ok_response,
        ];

        tokio::spawn(serve_responses(listener, responses));

        let bucket = TokenBucket::new(1000.0);
        let sink: Arc<dyn Sink> = Arc::new(TracingSink);
        let client = HttpDirectionsClient::new(format!("http://{addr}"), "test-key".to_string(), bucket, sink);

        let start = std::time::Instant::now();
        let outcome = client
            .get_directions((127.0, 37.5), (127.1, 37.6), &[], Priority::Recommend)
            .await;
        let elapsed = start.elapsed();

        match outcome {
            DirectionsOutcome::Ok { duration_seconds, distance_meters, .. } => {
                assert_eq!(duration_seconds, 120.0);
                assert_eq!(distance_meters, 1000.0);
            }
            other => panic!("expected Ok outcome after retries, got {other:?}"),
        }
        assert!(
            elapsed.as_millis() >= 9000,
            "two rate-limit backoffs of 5s each should elapse at least 10s, got {elapsed:?}"
        );
    }
}
