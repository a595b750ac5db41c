use bytes::{Buf, BufMut};

use crate::error::WireError;

/// Size of the waveform-block header on the wire.
pub const BLOCK_HEADER_LEN: usize = 38;

/// Fixed 38-byte waveform-block header.
///
/// This is the receiver-side layout pinned by this protocol; a richer
/// 40-byte variant exists elsewhere but is not wire-compatible and is not
/// produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_number: u32,
    pub timestamp_ms: u32,
    pub sample_rate_hz: u32,
    pub sample_count: u16,
    pub trigger_sample: u16,
    pub pulse_freq_hz: u32,
    pub temperature_cx10: i16,
    pub gain_db: u8,
    pub crc32: u32,
}

impl BlockHeader {
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.block_number);
        buf.put_u32_le(self.timestamp_ms);
        buf.put_u32_le(self.sample_rate_hz);
        buf.put_u16_le(self.sample_count);
        buf.put_u16_le(0); // reserved
        buf.put_u16_le(self.trigger_sample);
        buf.put_u32_le(self.pulse_freq_hz);
        buf.put_u32_le(0); // reserved
        buf.put_i16_le(self.temperature_cx10);
        buf.put_u8(self.gain_db);
        buf.put_u8(0); // reserved
        buf.put_u32_le(self.crc32);
        buf.put_u32_le(0); // reserved / padding
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, WireError> {
        if buf.remaining() < BLOCK_HEADER_LEN {
            return Err(WireError::ShortFrame {
                need: BLOCK_HEADER_LEN,
                got: buf.remaining(),
            });
        }
        let block_number = buf.get_u32_le();
        let timestamp_ms = buf.get_u32_le();
        let sample_rate_hz = buf.get_u32_le();
        let sample_count = buf.get_u16_le();
        buf.advance(2); // reserved
        let trigger_sample = buf.get_u16_le();
        let pulse_freq_hz = buf.get_u32_le();
        buf.advance(4); // reserved
        let temperature_cx10 = buf.get_i16_le();
        let gain_db = buf.get_u8();
        buf.advance(1); // reserved
        let crc32 = buf.get_u32_le();
        buf.advance(4); // reserved / padding
        Ok(Self {
            block_number,
            timestamp_ms,
            sample_rate_hz,
            sample_count,
            trigger_sample,
            pulse_freq_hz,
            temperature_cx10,
            gain_db,
            crc32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> BlockHeader {
        BlockHeader {
            block_number: 42,
            timestamp_ms: 9_001,
            sample_rate_hz: 2_000_000,
            sample_count: crate::S as u16,
            trigger_sample: 512,
            pulse_freq_hz: 5_000_000,
            temperature_cx10: -153,
            gain_db: 40,
            crc32: 0xdead_beef,
        }
    }

    #[test]
    fn roundtrip() {
        let h = sample_header();
        let mut buf = Vec::new();
        h.encode(&mut buf);
        assert_eq!(buf.len(), BLOCK_HEADER_LEN);
        let mut cursor = &buf[..];
        assert_eq!(BlockHeader::decode(&mut cursor).unwrap(), h);
    }

    #[test]
    fn short_frame_rejected() {
        let mut cursor = &[0u8; 10][..];
        assert!(matches!(
            BlockHeader::decode(&mut cursor),
            Err(WireError::ShortFrame { .. })
        ));
    }
}
