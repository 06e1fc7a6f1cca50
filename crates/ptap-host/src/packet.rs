//! The decoded packet surface.

use ptap_types::{KindName, WireId};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A decoded packet flowing through the host's session layer.
///
/// Wire encoding/decoding is entirely the host's business; ptap only
/// needs the wire identifier (to key handler buckets) and a downcast
/// surface so handlers that declared a concrete kind can recover the
/// typed packet.
///
/// # Downcasting
///
/// ```
/// use ptap_host::Packet;
/// use ptap_types::{KindName, WireId};
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct ChatPacket {
///     kind: KindName,
///     text: String,
/// }
///
/// impl Packet for ChatPacket {
///     fn wire_id(&self) -> WireId { WireId::new(9) }
///     fn kind(&self) -> &KindName { &self.kind }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let packet: &dyn Packet = &ChatPacket {
///     kind: KindName::new("chat"),
///     text: "hello".into(),
/// };
/// let chat = packet.as_any().downcast_ref::<ChatPacket>().unwrap();
/// assert_eq!(chat.text, "hello");
/// ```
pub trait Packet: fmt::Debug + Send + Sync {
    /// The wire identifier of this packet's concrete kind.
    fn wire_id(&self) -> WireId;

    /// The concrete kind name, as the catalog knows it.
    fn kind(&self) -> &KindName;

    /// Downcast surface for handlers that know the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a packet.
///
/// Events hold packets behind `Arc` so the outgoing interceptor can
/// re-submit the original batch without cloning packet payloads.
pub type PacketRef = Arc<dyn Packet>;
