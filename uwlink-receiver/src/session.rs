use std::collections::{HashMap, HashSet};

use uwlink_wire::chunk::ChunkHeader;

use crate::config::ReceiverLimits;
use crate::decode::decode_block;
use crate::error::ReceiverError;
use crate::observer::ReceiverObserver;
use crate::partial_block::PartialBlock;
use crate::stats::{StatsTracker, TransferStats};

/// Reassembles chunks into blocks, decodes and validates payloads, and
/// drives the observer callbacks that report progress and completion.
pub struct ReceiverSession<O: ReceiverObserver> {
    limits: ReceiverLimits,
    active: bool,
    partials: HashMap<u32, PartialBlock>,
    completed: HashSet<u32>,
    stats: StatsTracker,
    observer: O,
}

impl<O: ReceiverObserver> ReceiverSession<O> {
    pub fn new(limits: ReceiverLimits, observer: O) -> Self {
        Self {
            stats: StatsTracker::new(limits.total_blocks),
            limits,
            active: false,
            partials: HashMap::new(),
            completed: HashSet::new(),
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn get_stats(&self) -> TransferStats {
        self.stats.snapshot()
    }

    pub fn start(&mut self) {
        self.partials.clear();
        self.completed.clear();
        self.stats.start();
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.stats.stop();
        self.active = false;
    }

    /// Ingests one notification's bytes. Framing, range, and decode
    /// errors are counted and returned, but never put the session into a
    /// broken state: the next chunk is processed normally.
    #[tracing::instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    pub fn process_chunk(&mut self, bytes: &[u8]) -> Result<(), ReceiverError> {
        let mut cursor = bytes;
        let header = match ChunkHeader::decode(&mut cursor) {
            Ok(h) => h,
            Err(e) => {
                self.stats.framing_errors += 1;
                tracing::debug!(error = %e, "dropping chunk: bad header");
                return Err(e.into());
            }
        };

        let block_number = header.block_number as u32;
        if block_number >= self.limits.total_blocks {
            self.stats.framing_errors += 1;
            tracing::warn!(block_number, total_blocks = self.limits.total_blocks, "chunk names a block outside the transfer");
            return Err(ReceiverError::BlockOutOfRange(block_number));
        }

        let payload_start = uwlink_wire::chunk::CHUNK_HEADER_LEN;
        let payload_end = (payload_start + header.chunk_size as usize).min(bytes.len());
        let payload = &bytes[payload_start.min(bytes.len())..payload_end];

        if self.completed.contains(&block_number) {
            // Duplicate block: still accounted in statistics, never
            // re-assembled or re-delivered (see the duplicate-block policy).
            self.stats.record_chunk(payload.len());
            return Ok(());
        }

        let entry = self
            .partials
            .entry(block_number)
            .or_insert_with(|| PartialBlock::new(header.total_chunks));

        if entry.expected_total() != header.total_chunks {
            self.stats.framing_errors += 1;
            tracing::warn!(
                block_number,
                declared = header.total_chunks,
                seen = entry.expected_total(),
                "chunk's total_chunks disagrees with earlier chunks for this block"
            );
            return Err(ReceiverError::InconsistentTotalChunks {
                declared: header.total_chunks,
                seen: entry.expected_total(),
            });
        }

        if entry.store_chunk(header.chunk_number, payload) {
            self.stats.record_chunk(payload.len());
        }

        if entry.is_complete() {
            let assembled = entry.compact();
            self.partials.remove(&block_number);

            match decode_block(&assembled, &self.limits) {
                Ok(decoded) => {
                    self.completed.insert(block_number);
                    self.stats.record_block_completed();
                    self.observer.on_waveform(decoded);

                    if block_number > 0 && (block_number + 1) % self.limits.ack_interval == 0 {
                        self.observer.on_ack_emit(block_number);
                    }
                    self.observer.on_progress(self.stats.snapshot());

                    if self.active && self.completed.len() as u32 == self.limits.total_blocks {
                        self.active = false;
                        self.stats.stop();
                        self.observer.on_completion(self.stats.snapshot());
                    }
                }
                Err(e) => {
                    self.stats.decode_errors += 1;
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use uwlink_wire::{crc32_samples, pack_24bit_samples, BlockHeader};

    fn tiny_limits() -> ReceiverLimits {
        ReceiverLimits {
            total_blocks: 2,
            samples_per_block: 4,
            block_header_len: uwlink_wire::BLOCK_HEADER_LEN,
            raw_payload_len: 12,
            ack_interval: 20,
            // Small enough that a 50-byte raw test block is classified Raw
            // (see the production default's padding requirement in
            // uwlink-sender's BlockSource, which keeps real raw blocks at
            // or above BLOCK_SIZE_BOUND for the same reason).
            block_size_bound: 20,
        }
    }

    fn raw_block_bytes(block_number: u32, samples: &[i32]) -> Vec<u8> {
        let header = BlockHeader {
            block_number,
            timestamp_ms: 0,
            sample_rate_hz: 1_000,
            sample_count: samples.len() as u16,
            trigger_sample: 0,
            pulse_freq_hz: 0,
            temperature_cx10: 0,
            gain_db: 0,
            crc32: crc32_samples(samples),
        };
        let mut bytes = Vec::new();
        header.encode(&mut bytes);
        bytes.extend_from_slice(&pack_24bit_samples(samples));
        bytes
    }

    fn chunk_bytes(block_number: u16, chunk_number: u16, total_chunks: u16, payload: &[u8]) -> Vec<u8> {
        let header = ChunkHeader {
            block_number,
            chunk_number,
            chunk_size: payload.len() as u16,
            total_chunks,
        };
        let mut out = Vec::new();
        header.encode(&mut out);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn tiny_raw_roundtrip_two_blocks() {
        let mut session = ReceiverSession::new(tiny_limits(), RecordingObserver::default());
        session.start();

        let samples0 = vec![1, -1, 8_388_607, -8_388_608];
        let samples1 = vec![0, 0, 0, 0];
        let block0 = raw_block_bytes(0, &samples0);
        let block1 = raw_block_bytes(1, &samples1);

        for (bn, block) in [(0u16, &block0), (1u16, &block1)] {
            for (i, chunk) in block.chunks(5).enumerate() {
                let frame = chunk_bytes(bn, i as u16, ((block.len() + 4) / 5) as u16, chunk);
                session.process_chunk(&frame).unwrap();
            }
        }

        let observer = session.observer();
        assert_eq!(observer.waveforms.len(), 2);
        assert_eq!(observer.waveforms[0].samples, samples0);
        assert_eq!(observer.waveforms[1].samples, samples1);
        assert_eq!(observer.completions.len(), 1);
        assert!(!session.is_active());
    }

    #[test]
    fn duplicate_chunk_is_idempotent() {
        let mut session = ReceiverSession::new(tiny_limits(), RecordingObserver::default());
        session.start();
        let samples = vec![1, 2, 3, 4];
        let block = raw_block_bytes(0, &samples);
        let total_chunks = ((block.len() + 4) / 5) as u16;

        for (i, chunk) in block.chunks(5).enumerate() {
            let frame = chunk_bytes(0, i as u16, total_chunks, chunk);
            session.process_chunk(&frame).unwrap();
            session.process_chunk(&frame).unwrap(); // duplicate feed
        }

        assert_eq!(session.observer().waveforms.len(), 1);
    }

    #[test]
    fn out_of_range_block_rejected() {
        let mut session = ReceiverSession::new(tiny_limits(), RecordingObserver::default());
        session.start();
        let frame = chunk_bytes(99, 0, 1, b"x");
        assert!(matches!(
            session.process_chunk(&frame),
            Err(ReceiverError::BlockOutOfRange(99))
        ));
    }

    #[test]
    fn out_of_order_chunks_still_complete() {
        let mut session = ReceiverSession::new(tiny_limits(), RecordingObserver::default());
        session.start();
        let samples = vec![5, 6, 7, 8];
        let block = raw_block_bytes(0, &samples);
        let chunks: Vec<_> = block.chunks(5).collect();
        let total = chunks.len() as u16;

        for i in (0..chunks.len()).rev() {
            let frame = chunk_bytes(0, i as u16, total, chunks[i]);
            session.process_chunk(&frame).unwrap();
        }

        assert_eq!(session.observer().waveforms.len(), 1);
        assert_eq!(session.observer().waveforms[0].samples, samples);
    }
}
