//! Pacing controller: per-question countdown with a single commit point.
//!
//! Two states: armed (countdown running, awaiting an answer) and resolved.
//! The first terminal event wins; a submission racing a timeout is settled
//! by whoever calls `try_resolve` first, and every later attempt is a no-op.
//! Cancelling stops the countdown without a terminal event so a stale
//! timeout can never fire against a discarded session. Cooperative and
//! single-threaded; deterministic under paused tokio time in tests.

use tokio::time::{sleep_until, Duration, Instant};
use tracing::debug;

use crate::config::EngineConfig;
use crate::curve::time_limit_ms;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Armed,
    Resolved,
    Cancelled,
}

#[derive(Debug)]
pub struct PacingController {
    started: Instant,
    limit: Duration,
    phase: Phase,
}

impl PacingController {
    /// Compute the budget from the difficulty curve and start the countdown.
    pub fn arm(level: i64, streak: i64, cfg: &EngineConfig) -> Self {
        let limit_ms = time_limit_ms(level, streak, cfg);
        debug!(target: "session", level, streak, limit_ms, "Countdown armed");
        Self {
            started: Instant::now(),
            limit: Duration::from_millis(limit_ms.max(0) as u64),
            phase: Phase::Armed,
        }
    }

    pub fn limit_ms(&self) -> i64 {
        self.limit.as_millis() as i64
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.started.elapsed().as_millis() as i64
    }

    /// Elapsed share of the budget in [0, 1]. Polled by hosts for a visual
    /// progress bar.
    pub fn elapsed_fraction(&self) -> f64 {
        if self.limit.is_zero() {
            return 1.0;
        }
        (self.started.elapsed().as_secs_f64() / self.limit.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Await the deadline. A host timeout task awaits this and then submits
    /// a timeout; completion here is not itself a terminal event.
    pub async fn expired(&self) {
        sleep_until(self.started + self.limit).await;
    }

    /// Commit point: returns true only for the first caller. Submissions and
    /// timeouts both go through here, so exactly one terminal event per
    /// question is honored.
    pub fn try_resolve(&mut self) -> bool {
        if self.phase != Phase::Armed {
            return false;
        }
        self.phase = Phase::Resolved;
        true
    }

    /// Stop the countdown without a terminal event (teardown/navigation).
    pub fn cancel(&mut self) {
        if self.phase == Phase::Armed {
            debug!(target: "session", "Countdown cancelled");
            self.phase = Phase::Cancelled;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.phase == Phase::Armed
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }
}
