//! Central (receiver) side of the ultrasound-waveform bulk-transfer
//! protocol: chunk reassembly, payload decode/validation, and statistics.

pub mod config;
pub mod decode;
pub mod error;
pub mod observer;
pub mod partial_block;
pub mod session;
pub mod stats;

pub use config::ReceiverLimits;
pub use decode::decode_block;
pub use error::ReceiverError;
pub use observer::{DecodedBlock, ReceiverObserver, RecordingObserver};
pub use partial_block::PartialBlock;
pub use session::ReceiverSession;
pub use stats::TransferStats;
