use std::time::Duration;

/// Pacing thresholds, tunable for tests; production code uses `default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub initial_delay_ms: u64,
    pub backoff_increment_ms: u64,
    pub speedup_decrement_ms: u64,
    pub congestion_threshold: u32,
    pub success_threshold: u32,
    pub max_credits: u32,
    /// Minimum spacing between rate-limited `tracing::warn!` congestion
    /// reports; does not affect the backoff math itself.
    pub congestion_report_interval: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 15,
            max_delay_ms: 50,
            initial_delay_ms: 15,
            backoff_increment_ms: 5,
            speedup_decrement_ms: 1,
            congestion_threshold: 3,
            success_threshold: 50,
            max_credits: 2,
            congestion_report_interval: Duration::from_secs(5),
        }
    }
}

/// Corpus constants, exposed as overridable limits so tests can run scaled
/// scenarios against the same session code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub total_blocks: u32,
    pub samples_per_block: usize,
    pub block_header_len: usize,
    pub raw_payload_len: usize,
    pub ack_interval: u32,
    pub block_size_bound: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            total_blocks: uwlink_wire::T,
            samples_per_block: uwlink_wire::S,
            block_header_len: uwlink_wire::BLOCK_HEADER_LEN,
            raw_payload_len: uwlink_wire::R,
            ack_interval: uwlink_wire::ACK_INTERVAL,
            block_size_bound: uwlink_wire::BLOCK_SIZE_BOUND,
        }
    }
}
