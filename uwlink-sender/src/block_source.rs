use uwlink_wire::{crc32_samples, delta::delta_encode, pack_24bit_samples, BlockHeader};

use crate::error::SenderError;

/// Which payload encoding a session transmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Raw,
    Compressed,
}

/// One block's on-wire bytes: 38-byte header followed by the encoded
/// payload, ready to be sliced into chunks.
#[derive(Debug, Clone)]
pub struct EncodedBlock {
    pub bytes: Vec<u8>,
}

impl EncodedBlock {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Supplies the bytes for a given block index. Waveform *generation* is
/// out of scope for this crate; implementors only need to honor the wire
/// contract above.
pub trait BlockSource {
    fn next_block(&self, block_number: u32, mode: TransferMode) -> Result<EncodedBlock, SenderError>;
}

/// Deterministic synthetic waveform, useful for tests and as a reference
/// implementation of the [`BlockSource`] contract.
pub struct SyntheticBlockSource {
    pub samples_per_block: usize,
    pub sample_rate_hz: u32,
}

impl SyntheticBlockSource {
    pub fn new(samples_per_block: usize, sample_rate_hz: u32) -> Self {
        Self {
            samples_per_block,
            sample_rate_hz,
        }
    }

    fn synthesize_samples(&self, block_number: u32) -> Vec<i32> {
        (0..self.samples_per_block)
            .map(|i| {
                let phase = (i as i64 + block_number as i64 * 7) % 1000;
                (phase - 500) as i32
            })
            .collect()
    }
}

impl BlockSource for SyntheticBlockSource {
    fn next_block(&self, block_number: u32, mode: TransferMode) -> Result<EncodedBlock, SenderError> {
        let samples = self.synthesize_samples(block_number);
        let crc = crc32_samples(&samples);

        let header = BlockHeader {
            block_number,
            timestamp_ms: block_number.saturating_mul(10),
            sample_rate_hz: self.sample_rate_hz,
            sample_count: samples.len() as u16,
            trigger_sample: 0,
            pulse_freq_hz: 0,
            temperature_cx10: 250,
            gain_db: 0,
            crc32: crc,
        };

        let mut bytes = Vec::new();
        header.encode(&mut bytes);

        match mode {
            TransferMode::Raw => {
                bytes.extend_from_slice(&pack_24bit_samples(&samples));
                // The receiver tells Raw from Compressed by size alone; a
                // bare H+R raw block (7166 bytes) would fall under
                // BLOCK_SIZE_BOUND and be misread as Compressed, so raw
                // blocks are padded up to the bound.
                if bytes.len() < uwlink_wire::BLOCK_SIZE_BOUND {
                    bytes.resize(uwlink_wire::BLOCK_SIZE_BOUND, 0);
                }
            }
            TransferMode::Compressed => {
                let compressed = delta_encode(&samples).map_err(|e| SenderError::BlockSourceFailed {
                    block_number,
                    reason: e.to_string(),
                })?;
                bytes.extend_from_slice(&compressed);
            }
        }

        Ok(EncodedBlock { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_block_is_padded_to_size_bound() {
        let source = SyntheticBlockSource::new(uwlink_wire::S, 2_000_000);
        let block = source.next_block(0, TransferMode::Raw).unwrap();
        assert!(uwlink_wire::BLOCK_HEADER_LEN + uwlink_wire::R <= uwlink_wire::BLOCK_SIZE_BOUND);
        assert_eq!(block.len(), uwlink_wire::BLOCK_SIZE_BOUND);
    }

    #[test]
    fn compressed_block_is_smaller_than_raw() {
        let source = SyntheticBlockSource::new(uwlink_wire::S, 2_000_000);
        let raw = source.next_block(0, TransferMode::Raw).unwrap();
        let compressed = source.next_block(0, TransferMode::Compressed).unwrap();
        assert!(compressed.len() < raw.len());
    }
}
