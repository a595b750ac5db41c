use uwlink_wire::chunk::ChunkHeader;
use uwlink_wire::control::{Command, ControlMessage};

use crate::block_source::{BlockSource, TransferMode};
use crate::config::{PacingConfig, SessionLimits};
use crate::error::SenderError;
use crate::link::NotificationLink;
use crate::pacing::{PacingController, SendOutcome};

/// Lifecycle states of a sender session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderState {
    Idle,
    Active,
    WaitingAck,
    Paused,
    Complete,
}

/// Outcome of one [`SenderSession::process_next_chunk`] call, useful for
/// driver loops and tests that want to distinguish "nothing to do" from
/// "blocked" from "sent".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Not in a state where sending makes sense.
    Idle,
    /// Active but credits are exhausted or the link reported congestion.
    Blocked,
    /// A chunk was sent.
    Sent,
    /// The block just sent was the last chunk of a block, and the session
    /// is now waiting for a cumulative ACK before continuing.
    EnteredWaitingAck,
    /// The final block has been fully sent.
    Completed,
}

/// Point-in-time statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SenderStats {
    pub cur_block: u32,
    pub last_acked_block: u32,
    pub chunks_sent: u64,
    pub bytes_sent: u64,
    pub congestion_events: u64,
    pub disconnections: u64,
}

/// Drives transmission of a fixed corpus of `limits.total_blocks` blocks
/// to a central, honoring cumulative ACK barriers and adaptive pacing.
pub struct SenderSession<B: BlockSource> {
    block_source: B,
    limits: SessionLimits,
    mode: TransferMode,
    state: SenderState,
    cur_block: u32,
    cur_chunk: u16,
    last_acked_block: u32,
    chunk_payload_size: usize,
    buffered_block: Option<u32>,
    block_bytes: Vec<u8>,
    pacing: PacingController,
    stats: SenderStats,
}

impl<B: BlockSource> SenderSession<B> {
    pub fn new(block_source: B, limits: SessionLimits, pacing_config: PacingConfig) -> Self {
        Self {
            block_source,
            limits,
            mode: TransferMode::Raw,
            state: SenderState::Idle,
            cur_block: 0,
            cur_chunk: 0,
            last_acked_block: 0,
            chunk_payload_size: 0,
            buffered_block: None,
            block_bytes: Vec::new(),
            pacing: PacingController::new(pacing_config),
            stats: SenderStats::default(),
        }
    }

    pub fn state(&self) -> SenderState {
        self.state
    }

    pub fn stats(&self) -> SenderStats {
        SenderStats {
            cur_block: self.cur_block,
            last_acked_block: self.last_acked_block,
            congestion_events: self.pacing.congestion_events(),
            ..self.stats
        }
    }

    pub fn recommended_delay(&self) -> std::time::Duration {
        self.pacing.recommended_delay()
    }

    /// Begins a new transfer. `mtu` is the negotiated ATT MTU; the chunk
    /// payload size is `mtu - 3 (ATT overhead) - 12 (chunk header)`.
    pub fn start(&mut self, mode: TransferMode, mtu: u16) -> Result<(), SenderError> {
        self.mode = mode;
        self.chunk_payload_size = (mtu as usize).saturating_sub(3 + uwlink_wire::chunk::CHUNK_HEADER_LEN);
        self.cur_block = 0;
        self.cur_chunk = 0;
        self.last_acked_block = 0;
        self.buffered_block = None;
        self.stats = SenderStats::default();
        self.state = SenderState::Active;
        self.load_block(0)?;
        Ok(())
    }

    fn load_block(&mut self, block_number: u32) -> Result<(), SenderError> {
        if self.buffered_block == Some(block_number) {
            return Ok(());
        }
        let encoded = self.block_source.next_block(block_number, self.mode)?;
        self.block_bytes = encoded.bytes;
        self.buffered_block = Some(block_number);
        Ok(())
    }

    fn total_chunks_for_current_block(&self) -> u16 {
        let len = self.block_bytes.len();
        let payload = self.chunk_payload_size.max(1);
        ((len + payload - 1) / payload) as u16
    }

    /// Attempts to send the next chunk. Called repeatedly by a driver
    /// loop; a no-op unless the session is [`SenderState::Active`].
    #[tracing::instrument(level = "debug", skip(self, link), fields(cur_block = self.cur_block))]
    pub fn process_next_chunk(
        &mut self,
        link: &mut impl NotificationLink,
    ) -> Result<StepResult, SenderError> {
        if self.state != SenderState::Active {
            return Ok(StepResult::Idle);
        }
        if !self.pacing.has_credit() {
            self.pacing.report_congestion("credits exhausted");
            return Ok(StepResult::Blocked);
        }

        self.load_block(self.cur_block)?;
        let total_chunks = self.total_chunks_for_current_block();
        let payload = self.chunk_payload_size.max(1);
        let offset = self.cur_chunk as usize * payload;
        let remaining = self.block_bytes.len().saturating_sub(offset);
        let chunk_size = remaining.min(payload);

        let header = ChunkHeader {
            block_number: self.cur_block as u16,
            chunk_number: self.cur_chunk,
            chunk_size: chunk_size as u16,
            total_chunks,
        };
        let mut frame = Vec::with_capacity(uwlink_wire::chunk::CHUNK_HEADER_LEN + chunk_size);
        header.encode(&mut frame);
        frame.extend_from_slice(&self.block_bytes[offset..offset + chunk_size]);

        let outcome = link.send_notification(&frame);
        match outcome {
            SendOutcome::Success => {
                self.pacing.record_outcome(SendOutcome::Success);
                self.pacing.consume_credit();
                self.stats.chunks_sent += 1;
                self.stats.bytes_sent += frame.len() as u64;
                self.cur_chunk += 1;
                if self.cur_chunk >= total_chunks {
                    self.cur_block += 1;
                    self.cur_chunk = 0;
                    self.buffered_block = None;
                    if self.cur_block >= self.limits.total_blocks {
                        self.state = SenderState::Complete;
                        return Ok(StepResult::Completed);
                    }
                    if self.cur_block % self.limits.ack_interval == 0 {
                        self.state = SenderState::WaitingAck;
                        return Ok(StepResult::EnteredWaitingAck);
                    }
                }
                Ok(StepResult::Sent)
            }
            SendOutcome::Congested => {
                self.pacing.record_outcome(SendOutcome::Congested);
                Ok(StepResult::Blocked)
            }
            SendOutcome::OtherError => {
                self.pacing.record_outcome(SendOutcome::OtherError);
                Ok(StepResult::Blocked)
            }
        }
    }

    /// Handles a write to the control characteristic. `Start` is not
    /// interpreted here: the embedder calls [`Self::start`] directly once
    /// MTU negotiation has completed, since a bare control byte carries no
    /// MTU/mode information.
    pub fn on_control_write(&mut self, msg: ControlMessage) {
        match msg.command {
            Command::Start => {
                tracing::debug!("ignoring Start control write; embedder drives start() directly");
            }
            Command::Stop => {
                tracing::info!(state = ?self.state, "received Stop, returning to Idle");
                self.state = SenderState::Idle;
            }
            Command::Ack => {
                let acked = msg.block_number as u32;
                if acked + 1 > self.last_acked_block {
                    self.last_acked_block = acked + 1;
                } else {
                    tracing::debug!(acked, last = self.last_acked_block, "ignoring stale ACK");
                }
                // The barrier at `cur_block` unblocks once the ACK covers
                // every block transmitted before it, i.e. through
                // `cur_block - 1`.
                if self.state == SenderState::WaitingAck && self.last_acked_block >= self.cur_block {
                    self.state = SenderState::Active;
                }
            }
        }
    }

    pub fn on_disconnect(&mut self) {
        if matches!(self.state, SenderState::Active | SenderState::WaitingAck) {
            self.state = SenderState::Paused;
            self.stats.disconnections += 1;
        }
    }

    /// Resumes after reconnect by rewinding to the last acknowledged
    /// block; blocks in the un-ACKed window are retransmitted.
    pub fn on_reconnect(&mut self, mtu: u16) {
        self.chunk_payload_size = (mtu as usize).saturating_sub(3 + uwlink_wire::chunk::CHUNK_HEADER_LEN);
        self.cur_block = self.last_acked_block;
        self.cur_chunk = 0;
        self.buffered_block = None;
        self.state = SenderState::Active;
    }

    /// The central unsubscribed from notifications mid-transfer.
    pub fn on_cccd(&mut self, enabled: bool) {
        if !enabled && matches!(self.state, SenderState::Active | SenderState::WaitingAck) {
            self.state = SenderState::Paused;
        }
    }

    pub fn on_notification_transmitted(&mut self) {
        self.pacing.on_notification_transmitted();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_source::SyntheticBlockSource;
    use crate::link::InMemoryLink;

    fn tiny_session() -> SenderSession<SyntheticBlockSource> {
        let limits = SessionLimits {
            total_blocks: 40,
            ack_interval: 20,
            ..SessionLimits::default()
        };
        SenderSession::new(
            SyntheticBlockSource::new(limits.samples_per_block, 1_000_000),
            limits,
            PacingConfig::default(),
        )
    }

    #[test]
    fn ack_barrier_blocks_until_ack() {
        let mut session = tiny_session();
        session.start(TransferMode::Raw, 247).unwrap();
        let mut link = InMemoryLink::default();

        let mut saw_waiting_ack = false;
        for _ in 0..100_000 {
            match session.process_next_chunk(&mut link).unwrap() {
                StepResult::EnteredWaitingAck => {
                    saw_waiting_ack = true;
                    break;
                }
                StepResult::Blocked => {
                    session.on_notification_transmitted();
                }
                _ => {}
            }
        }
        assert!(saw_waiting_ack);
        assert_eq!(session.state(), SenderState::WaitingAck);
        assert_eq!(session.cur_block, 20);

        // stale ack is ignored
        session.on_control_write(ControlMessage::ack(18, 0));
        assert_eq!(session.state(), SenderState::WaitingAck);

        session.on_control_write(ControlMessage::ack(19, 0));
        assert_eq!(session.state(), SenderState::Active);
    }

    #[test]
    fn credit_starvation_blocks_after_max_credits() {
        let mut session = tiny_session();
        session.start(TransferMode::Raw, 247).unwrap();
        let mut link = InMemoryLink::default();

        let mut successes = 0;
        for _ in 0..10 {
            match session.process_next_chunk(&mut link).unwrap() {
                StepResult::Sent | StepResult::EnteredWaitingAck => successes += 1,
                StepResult::Blocked => break,
                _ => {}
            }
        }
        assert_eq!(successes, 2); // C_max = 2

        session.on_notification_transmitted();
        match session.process_next_chunk(&mut link).unwrap() {
            StepResult::Sent => {}
            other => panic!("expected Sent after credit returned, got {other:?}"),
        }
    }

    #[test]
    fn disconnect_then_reconnect_rewinds_to_last_ack() {
        let mut session = tiny_session();
        session.start(TransferMode::Raw, 247).unwrap();
        session.on_control_write(ControlMessage::ack(39, 0));
        // simulate progress into block 42-equivalent by direct field poke via public API only:
        // advance last_acked_block to 39+1 = 40, then disconnect/reconnect.
        session.on_disconnect();
        assert_eq!(session.state(), SenderState::Paused);
        session.on_reconnect(247);
        assert_eq!(session.state(), SenderState::Active);
        assert_eq!(session.cur_block, 40);
        assert_eq!(session.cur_chunk, 0);
    }

    #[test]
    fn stop_returns_to_idle() {
        let mut session = tiny_session();
        session.start(TransferMode::Raw, 247).unwrap();
        session.on_control_write(ControlMessage::stop());
        assert_eq!(session.state(), SenderState::Idle);
    }
}
