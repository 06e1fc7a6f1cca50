//! Bus events: one per packet per direction.

use crate::{PacketRef, SessionRef};

/// Fired by the host once per inbound packet.
///
/// Carries the decoded packet and the session it arrived from. Any
/// listener below the reserved monitor priority may cancel the event,
/// which stops the host from processing the packet.
#[derive(Debug)]
pub struct PacketReceiveEvent {
    packet: PacketRef,
    origin: SessionRef,
    cancelled: bool,
}

impl PacketReceiveEvent {
    /// Creates an uncancelled receive event.
    #[must_use]
    pub fn new(packet: PacketRef, origin: SessionRef) -> Self {
        Self {
            packet,
            origin,
            cancelled: false,
        }
    }

    /// The inbound packet.
    #[must_use]
    pub fn packet(&self) -> &PacketRef {
        &self.packet
    }

    /// The session the packet arrived from.
    #[must_use]
    pub fn origin(&self) -> &SessionRef {
        &self.origin
    }

    /// Marks the event cancelled; the host will drop the packet.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns `true` if a listener cancelled this event.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Fired by the host once per outbound delivery: one packet batch bound
/// for one target list.
///
/// Cancelling stops the host from delivering the batch to any of the
/// original targets; a listener that wants partial delivery cancels and
/// re-submits via [`PacketBus::broadcast`](crate::PacketBus::broadcast).
#[derive(Debug)]
pub struct PacketSendEvent {
    packets: Vec<PacketRef>,
    targets: Vec<SessionRef>,
    cancelled: bool,
}

impl PacketSendEvent {
    /// Creates an uncancelled send event.
    #[must_use]
    pub fn new(packets: Vec<PacketRef>, targets: Vec<SessionRef>) -> Self {
        Self {
            packets,
            targets,
            cancelled: false,
        }
    }

    /// The outbound packet batch.
    #[must_use]
    pub fn packets(&self) -> &[PacketRef] {
        &self.packets
    }

    /// The original delivery targets.
    #[must_use]
    pub fn targets(&self) -> &[SessionRef] {
        &self.targets
    }

    /// Marks the event cancelled; the host will not deliver the batch.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns `true` if a listener cancelled this event.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSession, TestPacket};
    use crate::Packet;
    use std::sync::Arc;

    #[test]
    fn receive_event_starts_uncancelled() {
        let event = PacketReceiveEvent::new(
            Arc::new(TestPacket::new("chat", 9)),
            Arc::new(FakeSession::named("alice")),
        );
        assert!(!event.is_cancelled());
        assert_eq!(event.packet().wire_id().value(), 9);
    }

    #[test]
    fn receive_event_cancel_sticks() {
        let mut event = PacketReceiveEvent::new(
            Arc::new(TestPacket::new("chat", 9)),
            Arc::new(FakeSession::named("alice")),
        );
        event.cancel();
        assert!(event.is_cancelled());
    }

    #[test]
    fn send_event_exposes_batch_and_targets() {
        let mut event = PacketSendEvent::new(
            vec![Arc::new(TestPacket::new("chat", 9)) as PacketRef],
            vec![Arc::new(FakeSession::named("alice")) as SessionRef],
        );
        assert_eq!(event.packets().len(), 1);
        assert_eq!(event.targets().len(), 1);
        event.cancel();
        assert!(event.is_cancelled());
    }
}
