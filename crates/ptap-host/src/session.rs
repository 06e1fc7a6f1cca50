//! The connected-peer surface.

use ptap_types::SessionId;
use std::fmt;
use std::sync::Arc;

/// A connected peer in the host's session layer.
///
/// Sessions appear in two roles:
///
/// - the **origin** of an inbound packet ([`PacketReceiveEvent`]);
/// - a **target** of an outbound batch ([`PacketSendEvent`]).
///
/// [`PacketReceiveEvent`]: crate::PacketReceiveEvent
/// [`PacketSendEvent`]: crate::PacketSendEvent
///
/// # Broadcastability
///
/// [`is_open`](Self::is_open) answers whether the session can still be
/// resolved to a deliverable endpoint. A session may legitimately appear
/// in an outbound target list after its peer disconnected; such sessions
/// are dropped from any rebroadcast but still count as ordinary targets
/// for veto decisions.
pub trait Session: fmt::Debug + Send + Sync {
    /// Stable identity of this session.
    fn session_id(&self) -> SessionId;

    /// Returns `true` if the session resolves to a deliverable endpoint.
    fn is_open(&self) -> bool;
}

/// Shared handle to a session.
pub type SessionRef = Arc<dyn Session>;
