//! Peripheral (sender) side of the ultrasound-waveform bulk-transfer
//! protocol: pacing, session state machine, and an async driver loop.

pub mod block_source;
pub mod config;
pub mod driver;
pub mod error;
pub mod link;
pub mod pacing;
pub mod session;

pub use block_source::{BlockSource, EncodedBlock, SyntheticBlockSource, TransferMode};
pub use config::{PacingConfig, SessionLimits};
pub use error::SenderError;
pub use link::NotificationLink;
pub use pacing::{PacingController, SendOutcome};
pub use session::{SenderSession, SenderState, SenderStats, StepResult};
