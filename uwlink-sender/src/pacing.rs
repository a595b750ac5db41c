use std::time::{Duration, Instant};

use crate::config::PacingConfig;

/// Result of attempting to send one chunk over the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Success,
    Congested,
    OtherError,
}

/// Adaptive inter-chunk delay plus in-flight credit accounting.
///
/// Credits model the link stack's limited notification queue: a send may
/// only be attempted while `credits > 0`, and a credit is returned only
/// when the link signals that a previous notification was transmitted.
#[derive(Debug, Clone)]
pub struct PacingController {
    config: PacingConfig,
    delay_ms: u64,
    consecutive_failures: u32,
    consecutive_successes: u32,
    credits: u32,
    congestion_events: u64,
    last_congestion_report: Option<Instant>,
}

impl PacingController {
    pub fn new(config: PacingConfig) -> Self {
        let delay_ms = config.initial_delay_ms;
        let credits = config.max_credits;
        Self {
            config,
            delay_ms,
            consecutive_failures: 0,
            consecutive_successes: 0,
            credits,
            congestion_events: 0,
            last_congestion_report: None,
        }
    }

    /// Whether a send may currently be attempted.
    pub fn has_credit(&self) -> bool {
        self.credits > 0
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn congestion_events(&self) -> u64 {
        self.congestion_events
    }

    /// Consumes one credit for an attempted send. Callers must check
    /// [`Self::has_credit`] first; this only decrements the counter.
    pub fn consume_credit(&mut self) {
        self.credits = self.credits.saturating_sub(1);
    }

    /// Records the outcome of a send attempt and updates the delay.
    pub fn record_outcome(&mut self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Success => {
                self.consecutive_failures = 0;
                self.consecutive_successes += 1;
                if self.consecutive_successes >= self.config.success_threshold
                    && self.delay_ms > self.config.min_delay_ms
                {
                    self.delay_ms = self
                        .delay_ms
                        .saturating_sub(self.config.speedup_decrement_ms)
                        .max(self.config.min_delay_ms);
                    self.consecutive_successes = 0;
                }
            }
            SendOutcome::Congested => {
                self.consecutive_failures += 1;
                self.consecutive_successes = 0;
                if self.consecutive_failures >= self.config.congestion_threshold {
                    self.delay_ms = (self.delay_ms + self.config.backoff_increment_ms)
                        .min(self.config.max_delay_ms);
                    self.congestion_events += 1;
                    self.report_congestion("link reported congestion");
                }
            }
            SendOutcome::OtherError => {
                // Non-fatal to pacing; caller is expected to count this
                // separately in session statistics.
            }
        }
    }

    /// Emits a `tracing::warn!` for a congestion condition, rate-limited to
    /// at most one every `congestion_report_interval`. Callers pass a
    /// `reason` describing which condition tripped (link-reported
    /// congestion vs. credit starvation).
    pub fn report_congestion(&mut self, reason: &'static str) {
        let now = Instant::now();
        let due = match self.last_congestion_report {
            Some(last) => now.duration_since(last) >= self.config.congestion_report_interval,
            None => true,
        };
        if due {
            tracing::warn!(reason, delay_ms = self.delay_ms, "link congested");
            self.last_congestion_report = Some(now);
        }
    }

    /// Called when the link reports a previously-sent notification has
    /// actually gone out over the air, returning one credit.
    pub fn on_notification_transmitted(&mut self) {
        self.credits = (self.credits + 1).min(self.config.max_credits);
    }

    pub fn recommended_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn current_delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_after_threshold_congestions() {
        let mut pacing = PacingController::new(PacingConfig::default());
        pacing.record_outcome(SendOutcome::Congested);
        pacing.record_outcome(SendOutcome::Congested);
        assert_eq!(pacing.current_delay_ms(), 15);
        pacing.record_outcome(SendOutcome::Congested);
        assert_eq!(pacing.current_delay_ms(), 20);
    }

    #[test]
    fn speedup_after_threshold_successes() {
        let mut pacing = PacingController::new(PacingConfig {
            initial_delay_ms: 20,
            ..PacingConfig::default()
        });
        for _ in 0..50 {
            pacing.record_outcome(SendOutcome::Success);
        }
        assert_eq!(pacing.current_delay_ms(), 19);
    }

    #[test]
    fn delay_never_leaves_bounds() {
        let cfg = PacingConfig::default();
        let mut pacing = PacingController::new(cfg);
        for _ in 0..1000 {
            pacing.record_outcome(SendOutcome::Congested);
        }
        assert_eq!(pacing.current_delay_ms(), cfg.max_delay_ms);

        let mut pacing = PacingController::new(cfg);
        for _ in 0..1000 {
            pacing.record_outcome(SendOutcome::Success);
        }
        assert_eq!(pacing.current_delay_ms(), cfg.min_delay_ms);
    }

    #[test]
    fn credits_bounded_and_consumed() {
        let mut pacing = PacingController::new(PacingConfig::default());
        assert_eq!(pacing.credits(), 2);
        pacing.consume_credit();
        pacing.consume_credit();
        assert_eq!(pacing.credits(), 0);
        assert!(!pacing.has_credit());
        pacing.on_notification_transmitted();
        assert_eq!(pacing.credits(), 1);
        pacing.on_notification_transmitted();
        pacing.on_notification_transmitted();
        assert_eq!(pacing.credits(), 2); // clamped at max_credits
    }
}
