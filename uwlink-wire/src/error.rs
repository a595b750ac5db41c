use thiserror::Error;

/// Errors produced while decoding wire bytes.
///
/// None of these are fatal to a session: callers count them and drop the
/// offending frame or block, per the resume-by-ACK recovery model.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WireError {
    #[error("frame too short: need {need} bytes, got {got}")]
    ShortFrame { need: usize, got: usize },

    #[error("unknown control command byte 0x{0:02x}")]
    BadCommand(u8),

    #[error("block index {0} out of range")]
    BadBlockIndex(u32),

    #[error("decompressed payload size mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("deflate decompression failed: {0}")]
    Decompress(String),

    #[error("crc mismatch: header says 0x{expected:08x}, computed 0x{computed:08x}")]
    CrcMismatch { expected: u32, computed: u32 },
}
