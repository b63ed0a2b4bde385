//! Interval gate for remote calls.
//!
//! One gate is the single pacing channel for a scan: every remote lookup
//! waits its turn here. Clones share state, so fetchers built from the same
//! gate are paced globally rather than per instance.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct IntervalGate {
    min_interval: Duration,
    last_turn: Arc<Mutex<Option<Instant>>>,
}

impl IntervalGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_turn: Arc::new(Mutex::new(None)),
        }
    }

    /// A gate that never sleeps.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep until at least `min_interval` has passed since the previous
    /// granted turn, then record this turn. Returns how long it slept.
    ///
    /// The lock is held across the sleep, so concurrent callers queue up
    /// behind each other.
    pub async fn wait_turn(&self) -> Duration {
        let mut last = self.last_turn.lock().await;

        let waited = match *last {
            Some(prev) => {
                let elapsed = prev.elapsed();
                if elapsed < self.min_interval {
                    let remaining = self.min_interval - elapsed;
                    debug!(wait_ms = remaining.as_millis() as u64, "Pacing before remote call");
                    tokio::time::sleep(remaining).await;
                    remaining
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        };

        *last = Some(Instant::now());
        waited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_turn_is_free() {
        let gate = IntervalGate::new(Duration::from_secs(10));
        assert_eq!(gate.wait_turn().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_turn_waits_remaining_delta() {
        let gate = IntervalGate::new(Duration::from_secs(10));
        gate.wait_turn().await;

        tokio::time::advance(Duration::from_secs(4)).await;
        let start = Instant::now();
        let waited = gate.wait_turn().await;

        assert_eq!(waited, Duration::from_secs(6));
        assert!(start.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_interval_elapsed() {
        let gate = IntervalGate::new(Duration::from_secs(10));
        gate.wait_turn().await;
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(gate.wait_turn().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_the_gate() {
        let gate = IntervalGate::new(Duration::from_secs(10));
        let other = gate.clone();

        gate.wait_turn().await;
        assert_eq!(other.wait_turn().await, Duration::from_secs(10));
    }

    #[test]
    fn test_unpaced_never_sleeps() {
        let gate = IntervalGate::unpaced();
        for _ in 0..3 {
            assert_eq!(tokio_test::block_on(gate.wait_turn()), Duration::ZERO);
        }
    }
}
