use bytes::{Buf, BufMut};

use crate::error::WireError;

/// Size of the chunk header prepended to every notification payload.
pub const CHUNK_HEADER_LEN: usize = 12;

/// Header carried by every link-layer notification.
///
/// `chunk_size` is the number of payload bytes following this header;
/// `total_chunks` is constant across every chunk of a given block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub block_number: u16,
    pub chunk_number: u16,
    pub chunk_size: u16,
    pub total_chunks: u16,
}

impl ChunkHeader {
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u16_le(self.block_number);
        buf.put_u16_le(self.chunk_number);
        buf.put_u16_le(self.chunk_size);
        buf.put_u16_le(self.total_chunks);
        buf.put_u32_le(0); // reserved
    }

    pub fn decode(buf: &mut impl Buf) -> Result<Self, WireError> {
        if buf.remaining() < CHUNK_HEADER_LEN {
            return Err(WireError::ShortFrame {
                need: CHUNK_HEADER_LEN,
                got: buf.remaining(),
            });
        }
        let block_number = buf.get_u16_le();
        let chunk_number = buf.get_u16_le();
        let chunk_size = buf.get_u16_le();
        let total_chunks = buf.get_u16_le();
        buf.advance(4); // reserved
        Ok(Self {
            block_number,
            chunk_number,
            chunk_size,
            total_chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let h = ChunkHeader {
            block_number: 17,
            chunk_number: 3,
            chunk_size: 244,
            total_chunks: 30,
        };
        let mut buf = Vec::new();
        h.encode(&mut buf);
        assert_eq!(buf.len(), CHUNK_HEADER_LEN);
        let mut cursor = &buf[..];
        let decoded = ChunkHeader::decode(&mut cursor).unwrap();
        assert_eq!(decoded, h);
    }

    #[test]
    fn short_frame_rejected() {
        let mut cursor = &[0u8; 4][..];
        assert_eq!(
            ChunkHeader::decode(&mut cursor),
            Err(WireError::ShortFrame { need: 12, got: 4 })
        );
    }
}
