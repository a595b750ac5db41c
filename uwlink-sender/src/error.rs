use thiserror::Error;

/// Errors the sender session surfaces. None of these are fatal: they are
/// counted in statistics and the session keeps running, recovering at the
/// next ACK barrier.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SenderError {
    #[error("block source failed for block {block_number}: {reason}")]
    BlockSourceFailed { block_number: u32, reason: String },

    #[error("operation invalid in state {0:?}")]
    InvalidState(crate::session::SenderState),
}
