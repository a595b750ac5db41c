use std::time::{Duration, Instant};

/// Point-in-time statistics snapshot, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferStats {
    pub blocks_received: u32,
    pub total_blocks: u32,
    pub total_bytes_received: u64,
    pub total_chunks_received: u64,
    pub elapsed_seconds: f64,
    pub throughput_kbps: f64,
    pub progress_percent: f64,
    pub decode_errors: u64,
    pub framing_errors: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct StatsTracker {
    pub total_blocks: u32,
    pub blocks_received: u32,
    pub total_bytes_received: u64,
    pub total_chunks_received: u64,
    pub decode_errors: u64,
    pub framing_errors: u64,
    started_at: Option<Instant>,
    active: bool,
}

impl StatsTracker {
    pub fn new(total_blocks: u32) -> Self {
        Self {
            total_blocks,
            blocks_received: 0,
            total_bytes_received: 0,
            total_chunks_received: 0,
            decode_errors: 0,
            framing_errors: 0,
            started_at: None,
            active: false,
        }
    }

    pub fn start(&mut self) {
        *self = Self::new(self.total_blocks);
        self.started_at = Some(Instant::now());
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn record_chunk(&mut self, bytes: usize) {
        self.total_chunks_received += 1;
        self.total_bytes_received += bytes as u64;
    }

    pub fn record_block_completed(&mut self) {
        self.blocks_received += 1;
    }

    pub fn snapshot(&self) -> TransferStats {
        let elapsed = if self.active {
            self.started_at
                .map(|t| t.elapsed())
                .unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };
        let elapsed_seconds = elapsed.as_secs_f64();
        let throughput_kbps = if elapsed_seconds > 0.0 {
            self.total_bytes_received as f64 / elapsed_seconds / 1000.0
        } else {
            0.0
        };
        let progress_percent = if self.total_blocks > 0 {
            100.0 * self.blocks_received as f64 / self.total_blocks as f64
        } else {
            0.0
        };
        TransferStats {
            blocks_received: self.blocks_received,
            total_blocks: self.total_blocks,
            total_bytes_received: self.total_bytes_received,
            total_chunks_received: self.total_chunks_received,
            elapsed_seconds,
            throughput_kbps,
            progress_percent,
            decode_errors: self.decode_errors,
            framing_errors: self.framing_errors,
        }
    }
}
