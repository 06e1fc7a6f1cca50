//! The host event bus surface.

use crate::{EventPriority, PacketReceiveEvent, PacketRef, PacketSendEvent, SessionRef};
use ptap_types::{BindingId, RegistrantId};

/// Listener invoked for each inbound-packet event.
pub type ReceiveFn = Box<dyn Fn(&mut PacketReceiveEvent) + Send + Sync>;

/// Listener invoked for each outbound-batch event.
pub type SendFn = Box<dyn Fn(&mut PacketSendEvent) + Send + Sync>;

/// The host's event bus, scoped to the two packet events.
///
/// The bus delivers each event to its listeners in ascending
/// [`EventPriority`] order, on the host's single dispatch thread. A
/// listener registered with `include_cancelled = false` is skipped once
/// an earlier listener cancelled the event.
///
/// `broadcast` is the delivery primitive: it hands a packet batch
/// directly to the given sessions, bypassing the send event. ptap uses
/// it only for the outgoing-intercept rebroadcast path.
///
/// Implementations provide interior mutability; registration and
/// delivery take `&self`.
pub trait PacketBus: Send + Sync {
    /// Registers a listener for inbound-packet events.
    fn register_receive(
        &self,
        priority: EventPriority,
        registrant: RegistrantId,
        include_cancelled: bool,
        listener: ReceiveFn,
    ) -> BindingId;

    /// Registers a listener for outbound-batch events.
    fn register_send(
        &self,
        priority: EventPriority,
        registrant: RegistrantId,
        include_cancelled: bool,
        listener: SendFn,
    ) -> BindingId;

    /// Removes a listener binding. Returns `false` if the binding was
    /// already absent.
    fn unregister(&self, binding: BindingId) -> bool;

    /// Delivers a packet batch to the given sessions directly.
    fn broadcast(&self, targets: &[SessionRef], packets: &[PacketRef]);
}
