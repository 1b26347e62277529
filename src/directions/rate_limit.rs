//! An async token bucket gating outbound DirectionsClient requests, shared
//! across workers via a `Clone`-able `Arc<Mutex<..>>`.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::time::sleep;

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Shared across workers; cloning shares the same underlying bucket.
#[derive(Clone)]
pub struct TokenBucket {
    inner: std::sync::Arc<Mutex<BucketState>>,
    rate_per_second: f64,
    capacity: f64,
}

impl TokenBucket {
    pub fn new(rate_per_second: f64) -> Self {
        TokenBucket {
            inner: std::sync::Arc::new(Mutex::new(BucketState {
                tokens: rate_per_second,
                last_refill: Instant::now(),
            })),
            rate_per_second,
            capacity: rate_per_second,
        }
    }

    /// Temporarily drops effective rate to 1 req/s, used after a 429 cooldown.
    pub fn throttle_to_one(&self) {
        let mut state = self.inner.lock().unwrap();
        state.tokens = state.tokens.min(1.0);
    }

    /// Blocks until a token is available, then consumes one.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.inner.lock().unwrap();
                let now = Instant::now();
                let elapsed = now.duration_since(state.last_refill).as_secs_f64();
                state.tokens = (state.tokens + elapsed * self.rate_per_second).min(self.capacity);
                state.last_refill = now;

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    None
                } else {
                    let deficit = 1.0 - state.tokens;
                    Some(Duration::from_secs_f64(deficit / self.rate_per_second))
                }
            };

            match wait {
                None => return,
                Some(d) => sleep(d).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_does_not_hang_under_capacity() {
        let bucket = TokenBucket::new(10.0);
        for _ in 0..5 {
            bucket.acquire().await;
        }
    }
}
