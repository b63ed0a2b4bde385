//! Throttle detection, exponential backoff and identity rotation.
//!
//! Detection is an ordered list of heuristics (status code, body phrases,
//! transport error text); any hit marks the call as throttled. There is no
//! ground truth at this boundary, so both false positives and false
//! negatives are possible.
//!
//! Backoff doubles per consecutive throttle up to a ceiling and decays back
//! to the base after a run of clean calls.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::RateLimitConfig;
use crate::rotation::IdentityRotator;

/// HTTP 429 Too Many Requests.
pub const TOO_MANY_REQUESTS: u16 = 429;

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// What a single remote call produced, as seen by the detectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOutcome<'a> {
    pub status: Option<u16>,
    pub body: Option<&'a str>,
    pub error: Option<&'a str>,
}

impl<'a> CallOutcome<'a> {
    pub fn response(status: u16, body: &'a str) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
            error: None,
        }
    }

    pub fn error(message: &'a str) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }
}

/// One throttle heuristic.
pub trait ThrottleDetector: Send + Sync {
    fn detect(&self, outcome: &CallOutcome<'_>) -> bool;

    fn name(&self) -> &str;
}

/// Matches an explicit status code.
pub struct StatusCodeDetector {
    pub code: u16,
}

impl ThrottleDetector for StatusCodeDetector {
    fn detect(&self, outcome: &CallOutcome<'_>) -> bool {
        outcome.status == Some(self.code)
    }

    fn name(&self) -> &str {
        "status_code"
    }
}

/// Case-insensitive phrase search over response text.
pub struct BodyPhraseDetector {
    phrases: Vec<String>,
}

impl BodyPhraseDetector {
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: lowercase_all(phrases),
        }
    }
}

impl ThrottleDetector for BodyPhraseDetector {
    fn detect(&self, outcome: &CallOutcome<'_>) -> bool {
        outcome
            .body
            .is_some_and(|body| contains_any(body, &self.phrases))
    }

    fn name(&self) -> &str {
        "body_phrase"
    }
}

/// Case-insensitive phrase search over transport error messages.
pub struct ErrorMessageDetector {
    phrases: Vec<String>,
}

impl ErrorMessageDetector {
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: lowercase_all(phrases),
        }
    }
}

impl ThrottleDetector for ErrorMessageDetector {
    fn detect(&self, outcome: &CallOutcome<'_>) -> bool {
        outcome
            .error
            .is_some_and(|err| contains_any(err, &self.phrases))
    }

    fn name(&self) -> &str {
        "error_message"
    }
}

fn lowercase_all(phrases: &[String]) -> Vec<String> {
    phrases
        .iter()
        .map(|p| p.to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn contains_any(haystack: &str, phrases: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    phrases.iter().any(|p| haystack.contains(p.as_str()))
}

// ---------------------------------------------------------------------------
// State and handler
// ---------------------------------------------------------------------------

/// Counters scoped to one handler (one scan process).
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    pub throttle_count: u32,
    pub consecutive_successes: u32,
    pub last_throttle: Option<Instant>,
    pub last_rotation: Option<Instant>,
    pub rotations: u32,
}

/// What to do about a detected throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDecision {
    pub throttle_count: u32,
    pub wait: Duration,
    pub rotated: bool,
}

pub struct RateLimitHandler {
    base_wait: Duration,
    max_wait: Duration,
    reset_after_successes: u32,
    min_rotation_interval: Duration,
    min_wait_after_rotation: Duration,
    detectors: Vec<Box<dyn ThrottleDetector>>,
    rotator: Option<Arc<dyn IdentityRotator>>,
    state: RateLimitState,
}

impl RateLimitHandler {
    /// Handler with the built-in detectors (429, body phrases, error text)
    /// and no rotation.
    pub fn new(cfg: &RateLimitConfig) -> Self {
        let detectors: Vec<Box<dyn ThrottleDetector>> = vec![
            Box::new(StatusCodeDetector {
                code: TOO_MANY_REQUESTS,
            }),
            Box::new(BodyPhraseDetector::new(&cfg.throttle_phrases)),
            Box::new(ErrorMessageDetector::new(&cfg.disconnect_phrases)),
        ];

        Self {
            base_wait: Duration::from_secs(cfg.base_wait_secs),
            max_wait: Duration::from_secs(cfg.max_wait_secs),
            reset_after_successes: cfg.reset_after_successes,
            min_rotation_interval: Duration::from_secs(cfg.min_rotation_interval_secs),
            min_wait_after_rotation: Duration::from_secs(cfg.min_wait_after_rotation_secs),
            detectors,
            rotator: None,
            state: RateLimitState::default(),
        }
    }

    pub fn with_rotator(mut self, rotator: Arc<dyn IdentityRotator>) -> Self {
        self.rotator = Some(rotator);
        self
    }

    /// Append a detector after the built-ins.
    pub fn with_detector(mut self, detector: Box<dyn ThrottleDetector>) -> Self {
        self.detectors.push(detector);
        self
    }

    pub fn state(&self) -> &RateLimitState {
        &self.state
    }

    /// True if any detector flags the outcome.
    pub fn is_throttled(&self, outcome: &CallOutcome<'_>) -> bool {
        match self.detectors.iter().find(|d| d.detect(outcome)) {
            Some(detector) => {
                warn!(
                    detector = detector.name(),
                    status = ?outcome.status,
                    "Throttle signal detected"
                );
                true
            }
            None => false,
        }
    }

    /// Backoff for a throttle count: `base * 2^(count-1)` capped at the
    /// ceiling. A count of zero yields the base wait.
    pub fn wait_duration(&self, throttle_count: u32) -> Duration {
        if throttle_count == 0 {
            return self.base_wait.min(self.max_wait);
        }
        let factor = 1u32
            .checked_shl(throttle_count - 1)
            .unwrap_or(u32::MAX);
        self.base_wait
            .checked_mul(factor)
            .unwrap_or(self.max_wait)
            .min(self.max_wait)
    }

    /// Record a throttle and decide how long to back off, rotating identity
    /// first when possible.
    pub async fn on_throttle(&mut self) -> ThrottleDecision {
        self.state.throttle_count += 1;
        self.state.consecutive_successes = 0;
        self.state.last_throttle = Some(Instant::now());

        let count = self.state.throttle_count;
        let mut wait = self.wait_duration(count);
        warn!(throttle_count = count, wait_secs = wait.as_secs(), "Rate limit hit");

        let rotated = self.maybe_rotate_identity().await;
        if rotated {
            wait = (wait / 2).max(self.min_wait_after_rotation);
            info!(wait_secs = wait.as_secs(), "Identity rotated, wait reduced");
        }

        ThrottleDecision {
            throttle_count: count,
            wait,
            rotated,
        }
    }

    /// Rotate the egress identity if a rotator is configured and the last
    /// attempt is older than the minimum rotation interval. Failures are
    /// logged and reported as `false`.
    pub async fn maybe_rotate_identity(&mut self) -> bool {
        let Some(rotator) = self.rotator.clone() else {
            return false;
        };

        if let Some(last) = self.state.last_rotation {
            if last.elapsed() < self.min_rotation_interval {
                info!(
                    since_secs = last.elapsed().as_secs(),
                    "Skipping rotation, last one too recent"
                );
                return false;
            }
        }

        // Attempts count against the interval whether or not they succeed.
        self.state.last_rotation = Some(Instant::now());
        match rotator.rotate().await {
            Ok(()) => {
                self.state.rotations += 1;
                true
            }
            Err(e) => {
                warn!(error = %e, "Identity rotation failed, using full wait");
                false
            }
        }
    }

    /// Record a clean call. After enough in a row the throttle counter resets.
    pub fn on_success(&mut self) {
        self.state.consecutive_successes += 1;
        if self.state.consecutive_successes >= self.reset_after_successes {
            if self.state.throttle_count > 0 {
                info!(
                    was = self.state.throttle_count,
                    "Resetting throttle counter after clean run"
                );
                self.state.throttle_count = 0;
            }
            self.state.consecutive_successes = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
