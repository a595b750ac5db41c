use thiserror::Error;

/// Errors the receiver session surfaces. All are non-fatal: the affected
/// frame or block is dropped and counted, and the session keeps running.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ReceiverError {
    #[error("wire decode error: {0}")]
    Wire(#[from] uwlink_wire::WireError),

    #[error("block number {0} out of range")]
    BlockOutOfRange(u32),

    #[error("chunk declared total_chunks={declared} but block already saw total_chunks={seen}")]
    InconsistentTotalChunks { declared: u16, seen: u16 },
}
