use uwlink_wire::BlockHeader;

use crate::stats::TransferStats;

/// A fully decoded, validated block delivered to the observer exactly
/// once per block.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBlock {
    pub header: BlockHeader,
    pub samples: Vec<i32>,
    pub was_compressed: bool,
}

/// Event hooks the receiver session invokes. Implementations must be
/// short and must not re-enter the same session; re-entering the link
/// (e.g. to write an ACK from `on_ack_emit`) is expected and safe.
pub trait ReceiverObserver {
    fn on_waveform(&mut self, block: DecodedBlock);
    fn on_progress(&mut self, stats: TransferStats);
    fn on_completion(&mut self, stats: TransferStats);
    fn on_ack_emit(&mut self, block_number: u32);
}

/// An observer that records every invocation, useful for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub waveforms: Vec<DecodedBlock>,
    pub progress_events: Vec<TransferStats>,
    pub completions: Vec<TransferStats>,
    pub acks_emitted: Vec<u32>,
}

impl ReceiverObserver for RecordingObserver {
    fn on_waveform(&mut self, block: DecodedBlock) {
        self.waveforms.push(block);
    }

    fn on_progress(&mut self, stats: TransferStats) {
        self.progress_events.push(stats);
    }

    fn on_completion(&mut self, stats: TransferStats) {
        self.completions.push(stats);
    }

    fn on_ack_emit(&mut self, block_number: u32) {
        self.acks_emitted.push(block_number);
    }
}
