use crate::pacing::SendOutcome;

/// The byte-oriented primitive the sender session needs from the BLE link.
///
/// Everything about GATT services, characteristics, MTU negotiation, and
/// the platform BLE stack lives on the other side of this trait.
pub trait NotificationLink {
    /// Attempts to send one notification. Must return promptly;
    /// [`SendOutcome::Success`] only means the stack accepted the write,
    /// not that it has gone out over the air (see
    /// [`crate::session::SenderSession::on_notification_transmitted`]).
    fn send_notification(&mut self, bytes: &[u8]) -> SendOutcome;
}

/// In-memory link used by tests: records every notification it was asked
/// to send and always reports success.
#[derive(Debug, Default)]
pub struct InMemoryLink {
    pub sent: Vec<Vec<u8>>,
}

impl NotificationLink for InMemoryLink {
    fn send_notification(&mut self, bytes: &[u8]) -> SendOutcome {
        self.sent.push(bytes.to_vec());
        SendOutcome::Success
    }
}
