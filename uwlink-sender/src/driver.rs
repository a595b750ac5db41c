use tokio::sync::mpsc;
use tokio::time::sleep;
use uwlink_wire::control::ControlMessage;

use crate::block_source::BlockSource;
use crate::link::NotificationLink;
use crate::session::{SenderSession, SenderState, StepResult};

/// Events the embedder feeds into the driver loop from the link layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    NotificationTransmitted,
    Disconnected,
    Reconnected { mtu: u16 },
    CccdChanged { enabled: bool },
}

/// Input fed into the driver loop: either a control-characteristic write
/// or a link lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    Control(ControlMessage),
    Link(LinkEvent),
}

/// Drives a [`SenderSession`] to completion, pacing chunk emission and
/// reacting to control/link events as they arrive on `events`.
///
/// This is the async equivalent of the session's single-threaded
/// cooperative execution context (see the concurrency model notes): one
/// task owns the session and the link for the lifetime of the transfer.
pub async fn run<B: BlockSource>(
    session: &mut SenderSession<B>,
    link: &mut impl NotificationLink,
    mut events: mpsc::Receiver<DriverEvent>,
) {
    loop {
        while let Ok(event) = events.try_recv() {
            apply_event(session, event);
        }

        match session.process_next_chunk(link) {
            Ok(StepResult::Completed) => {
                tracing::info!("transfer complete");
                break;
            }
            Ok(StepResult::Idle) => {
                if session.state() == SenderState::Complete {
                    break;
                }
                // Paused, waiting for ACK, or not yet started: block on the
                // next event rather than busy-polling.
                match events.recv().await {
                    Some(event) => apply_event(session, event),
                    None => break,
                }
            }
            Ok(StepResult::Sent) | Ok(StepResult::EnteredWaitingAck) | Ok(StepResult::Blocked) => {
                sleep(session.recommended_delay()).await;
            }
            Err(err) => {
                tracing::warn!(%err, "sender session error; continuing");
            }
        }
    }
}

fn apply_event<B: BlockSource>(session: &mut SenderSession<B>, event: DriverEvent) {
    match event {
        DriverEvent::Control(msg) => session.on_control_write(msg),
        DriverEvent::Link(LinkEvent::NotificationTransmitted) => {
            session.on_notification_transmitted()
        }
        DriverEvent::Link(LinkEvent::Disconnected) => session.on_disconnect(),
        DriverEvent::Link(LinkEvent::Reconnected { mtu }) => session.on_reconnect(mtu),
        DriverEvent::Link(LinkEvent::CccdChanged { enabled }) => session.on_cccd(enabled),
    }
}
