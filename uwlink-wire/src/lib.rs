//! Wire codec for the ultrasound-waveform bulk-transfer protocol.
//!
//! This crate is pure and synchronous: it knows nothing about BLE, links,
//! sessions, or pacing. It only encodes and decodes the byte layouts that
//! both peers must agree on bit-for-bit.

#![forbid(unsafe_code)]

pub mod block;
pub mod chunk;
pub mod control;
pub mod crc;
pub mod delta;
pub mod error;
pub mod samples;

pub use block::{BlockHeader, BLOCK_HEADER_LEN};
pub use chunk::{ChunkHeader, CHUNK_HEADER_LEN};
pub use control::{Command, ControlMessage, CONTROL_MESSAGE_LEN};
pub use crc::{crc32_bytes, crc32_samples};
pub use error::WireError;
pub use samples::{pack_24bit_samples, unpack_24bit_samples};

/// Total blocks in the corpus.
pub const T: u32 = 1800;
/// Samples per block.
pub const S: usize = 2376;
/// Raw packed-sample payload size in bytes (`S * 3`).
pub const R: usize = S * 3;
/// Cumulative-ACK cadence, in blocks.
pub const ACK_INTERVAL: u32 = 20;
/// Size threshold the receiver uses to distinguish Raw from Compressed blocks.
pub const BLOCK_SIZE_BOUND: usize = 7168;
