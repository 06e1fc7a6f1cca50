//! In-memory doubles for the host contracts.
//!
//! Provides everything a test needs to drive the engine without a real
//! session layer:
//!
//! - [`TestPacket`] — a packet with a kind, wire id and JSON body
//! - [`FakeSession`] — a named session, open or closed
//! - [`StaticCatalog`] — a facet graph with transitive assignability
//! - [`RecordingBus`] — a bus that delivers in priority order, honors
//!   include-cancelled, and records broadcasts
//!
//! # Example
//!
//! ```
//! use ptap_host::testing::{FakeSession, RecordingBus, StaticCatalog, TestPacket};
//! use ptap_host::PacketBus;
//! use std::sync::Arc;
//!
//! let catalog = StaticCatalog::new()
//!     .facet("chat-like", &["inbound"])
//!     .kind("chat", 9, &["chat-like"]);
//!
//! let bus = RecordingBus::new();
//! let event = bus.fire_receive(
//!     Arc::new(TestPacket::new("chat", 9)),
//!     Arc::new(FakeSession::named("alice")),
//! );
//! assert!(!event.is_cancelled()); // no listeners registered
//! ```

use crate::{
    EventPriority, Packet, PacketBus, PacketCatalog, PacketReceiveEvent, PacketRef,
    PacketSendEvent, ReceiveFn, SendFn, Session, SessionRef,
};
use ptap_types::{BindingId, KindName, RegistrantId, SessionId, WireId};
use serde_json::Value;
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

/// A packet for tests: kind name, wire id and an optional JSON body.
#[derive(Debug)]
pub struct TestPacket {
    kind: KindName,
    wire: WireId,
    /// Free-form payload, downcast-reachable from handlers.
    pub body: Value,
}

impl TestPacket {
    /// Creates a packet with a null body.
    #[must_use]
    pub fn new(kind: &str, wire: u32) -> Self {
        Self {
            kind: KindName::new(kind),
            wire: WireId::new(wire),
            body: Value::Null,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

impl Packet for TestPacket {
    fn wire_id(&self) -> WireId {
        self.wire
    }

    fn kind(&self) -> &KindName {
        &self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A session for tests, identified by name.
///
/// The session id is random per instance; use [`named`](Self::named) for
/// an open session and [`closed`](Self::closed) for one whose endpoint is
/// gone (dropped from rebroadcasts).
#[derive(Debug)]
pub struct FakeSession {
    id: SessionId,
    /// Display name, for assertion messages.
    pub name: String,
    open: bool,
}

impl FakeSession {
    /// Creates an open session.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            id: SessionId::new(),
            name: name.to_string(),
            open: true,
        }
    }

    /// Creates a session whose endpoint can no longer be resolved.
    #[must_use]
    pub fn closed(name: &str) -> Self {
        Self {
            id: SessionId::new(),
            name: name.to_string(),
            open: false,
        }
    }
}

impl Session for FakeSession {
    fn session_id(&self) -> SessionId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// A fixed catalog built from concrete kinds and abstract facets.
///
/// Assignability is the transitive closure of the declared facet edges,
/// plus reflexivity. The base facets `"inbound"` and `"outbound"` are
/// pre-seeded.
///
/// # Example
///
/// ```
/// use ptap_host::testing::StaticCatalog;
/// use ptap_host::PacketCatalog;
/// use ptap_types::KindName;
///
/// let catalog = StaticCatalog::new()
///     .facet("compressible", &["outbound"])
///     .kind("chunk", 20, &["compressible"]);
///
/// // chunk → compressible → outbound
/// assert!(catalog.is_assignable(&KindName::new("chunk"), &KindName::new("outbound")));
/// assert!(!catalog.is_assignable(&KindName::new("chunk"), &KindName::new("inbound")));
/// ```
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    /// Concrete kinds in insertion order: (name, wire id, closure of
    /// assignable names including self).
    kinds: Vec<(KindName, WireId, BTreeSet<KindName>)>,
    by_name: HashMap<KindName, usize>,
    /// Facet name → closure of assignable names including self.
    facets: HashMap<KindName, BTreeSet<KindName>>,
}

impl StaticCatalog {
    /// Creates a catalog with only the base `"inbound"`/`"outbound"`
    /// facets.
    #[must_use]
    pub fn new() -> Self {
        let mut facets = HashMap::new();
        for base in ["inbound", "outbound"] {
            let name = KindName::new(base);
            facets.insert(name.clone(), BTreeSet::from([name]));
        }
        Self {
            kinds: Vec::new(),
            by_name: HashMap::new(),
            facets,
        }
    }

    /// Declares an abstract facet assignable to the given parents.
    ///
    /// Parents must already be declared (base facets are pre-seeded).
    #[must_use]
    pub fn facet(mut self, name: &str, parents: &[&str]) -> Self {
        let closure = self.closure_of(name, parents);
        self.facets.insert(KindName::new(name), closure);
        self
    }

    /// Declares a concrete packet kind with its wire id and facets.
    #[must_use]
    pub fn kind(mut self, name: &str, wire: u32, parents: &[&str]) -> Self {
        let closure = self.closure_of(name, parents);
        let kind = KindName::new(name);
        self.by_name.insert(kind.clone(), self.kinds.len());
        self.kinds.push((kind, WireId::new(wire), closure));
        self
    }

    fn closure_of(&self, name: &str, parents: &[&str]) -> BTreeSet<KindName> {
        let mut closure = BTreeSet::from([KindName::new(name)]);
        for parent in parents {
            let parent = KindName::new(*parent);
            match self.facets.get(&parent) {
                Some(parent_closure) => closure.extend(parent_closure.iter().cloned()),
                None => panic!("StaticCatalog: undeclared parent facet '{parent}'"),
            }
        }
        closure
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketCatalog for StaticCatalog {
    fn wire_id(&self, kind: &KindName) -> Option<WireId> {
        self.by_name.get(kind).map(|&i| self.kinds[i].1)
    }

    fn is_assignable(&self, kind: &KindName, target: &KindName) -> bool {
        if kind == target {
            return true;
        }
        if let Some(&i) = self.by_name.get(kind) {
            return self.kinds[i].2.contains(target);
        }
        self.facets
            .get(kind)
            .is_some_and(|closure| closure.contains(target))
    }

    fn concrete_kinds(&self) -> Vec<(WireId, KindName)> {
        self.kinds
            .iter()
            .map(|(name, wire, _)| (*wire, name.clone()))
            .collect()
    }
}

/// One recorded `broadcast()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRecord {
    /// Session ids the batch was delivered to, in order.
    pub targets: Vec<SessionId>,
    /// Wire ids of the delivered batch, in order.
    pub packets: Vec<WireId>,
}

struct ReceiveListener {
    binding: BindingId,
    priority: EventPriority,
    include_cancelled: bool,
    listener: ReceiveFn,
}

struct SendListener {
    binding: BindingId,
    priority: EventPriority,
    include_cancelled: bool,
    listener: SendFn,
}

/// An in-memory bus that mimics the host's delivery semantics.
///
/// - listeners run in ascending priority order (stable for equal
///   priorities);
/// - a listener with `include_cancelled = false` is skipped once the
///   event is cancelled;
/// - `broadcast()` calls are recorded, not delivered anywhere.
///
/// Fire an event with [`fire_receive`](Self::fire_receive) /
/// [`fire_send`](Self::fire_send); the returned event carries the final
/// cancel flag.
#[derive(Default)]
pub struct RecordingBus {
    receive: RwLock<Vec<ReceiveListener>>,
    send: RwLock<Vec<SendListener>>,
    broadcasts: RwLock<Vec<BroadcastRecord>>,
}

impl RecordingBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers one inbound packet to the registered receive listeners.
    pub fn fire_receive(&self, packet: PacketRef, origin: SessionRef) -> PacketReceiveEvent {
        let mut event = PacketReceiveEvent::new(packet, origin);
        let listeners = self.receive.read().expect("lock poisoned");
        for entry in Self::in_priority_order(&listeners, |l| l.priority) {
            if event.is_cancelled() && !entry.include_cancelled {
                continue;
            }
            (entry.listener)(&mut event);
        }
        event
    }

    /// Delivers one outbound batch to the registered send listeners.
    pub fn fire_send(&self, packets: Vec<PacketRef>, targets: Vec<SessionRef>) -> PacketSendEvent {
        let mut event = PacketSendEvent::new(packets, targets);
        let listeners = self.send.read().expect("lock poisoned");
        for entry in Self::in_priority_order(&listeners, |l| l.priority) {
            if event.is_cancelled() && !entry.include_cancelled {
                continue;
            }
            (entry.listener)(&mut event);
        }
        event
    }

    fn in_priority_order<L>(listeners: &[L], priority: impl Fn(&L) -> EventPriority) -> Vec<&L> {
        let mut ordered: Vec<&L> = listeners.iter().collect();
        ordered.sort_by_key(|l| priority(l));
        ordered
    }

    /// Number of registered receive listeners.
    #[must_use]
    pub fn receive_listener_count(&self) -> usize {
        self.receive.read().expect("lock poisoned").len()
    }

    /// Number of registered send listeners.
    #[must_use]
    pub fn send_listener_count(&self) -> usize {
        self.send.read().expect("lock poisoned").len()
    }

    /// All recorded broadcasts, in call order.
    #[must_use]
    pub fn broadcasts(&self) -> Vec<BroadcastRecord> {
        self.broadcasts.read().expect("lock poisoned").clone()
    }
}

impl PacketBus for RecordingBus {
    fn register_receive(
        &self,
        priority: EventPriority,
        _registrant: RegistrantId,
        include_cancelled: bool,
        listener: ReceiveFn,
    ) -> BindingId {
        let binding = BindingId::new();
        self.receive.write().expect("lock poisoned").push(ReceiveListener {
            binding,
            priority,
            include_cancelled,
            listener,
        });
        binding
    }

    fn register_send(
        &self,
        priority: EventPriority,
        _registrant: RegistrantId,
        include_cancelled: bool,
        listener: SendFn,
    ) -> BindingId {
        let binding = BindingId::new();
        self.send.write().expect("lock poisoned").push(SendListener {
            binding,
            priority,
            include_cancelled,
            listener,
        });
        binding
    }

    fn unregister(&self, binding: BindingId) -> bool {
        let mut receive = self.receive.write().expect("lock poisoned");
        let before = receive.len();
        receive.retain(|l| l.binding != binding);
        if receive.len() < before {
            return true;
        }
        drop(receive);

        let mut send = self.send.write().expect("lock poisoned");
        let before = send.len();
        send.retain(|l| l.binding != binding);
        send.len() < before
    }

    fn broadcast(&self, targets: &[SessionRef], packets: &[PacketRef]) {
        self.broadcasts.write().expect("lock poisoned").push(BroadcastRecord {
            targets: targets.iter().map(|t| t.session_id()).collect(),
            packets: packets.iter().map(|p| p.wire_id()).collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .facet("chat-like", &["inbound"])
            .kind("chat", 9, &["chat-like"])
            .kind("whisper", 10, &["chat-like"])
            .kind("move", 11, &["inbound"])
    }

    // ── StaticCatalog ────────────────────────────────────────

    #[test]
    fn wire_id_of_concrete_kind() {
        let c = catalog();
        assert_eq!(c.wire_id(&KindName::new("chat")), Some(WireId::new(9)));
        assert_eq!(c.wire_id(&KindName::new("chat-like")), None);
        assert_eq!(c.wire_id(&KindName::new("nope")), None);
    }

    #[test]
    fn assignability_is_transitive() {
        let c = catalog();
        let chat = KindName::new("chat");
        assert!(c.is_assignable(&chat, &KindName::new("chat")));
        assert!(c.is_assignable(&chat, &KindName::new("chat-like")));
        assert!(c.is_assignable(&chat, &KindName::new("inbound")));
        assert!(!c.is_assignable(&chat, &KindName::new("outbound")));
    }

    #[test]
    fn facet_assignable_to_base() {
        let c = catalog();
        assert!(c.is_assignable(&KindName::new("chat-like"), &KindName::new("inbound")));
        assert!(!c.is_assignable(&KindName::new("inbound"), &KindName::new("chat-like")));
    }

    #[test]
    fn concrete_kinds_in_declaration_order() {
        let kinds = catalog().concrete_kinds();
        let names: Vec<&str> = kinds.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, ["chat", "whisper", "move"]);
    }

    // ── RecordingBus ─────────────────────────────────────────

    fn register_counter(
        bus: &RecordingBus,
        priority: EventPriority,
        include_cancelled: bool,
        cancel: bool,
    ) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        bus.register_receive(
            priority,
            RegistrantId::named("test"),
            include_cancelled,
            Box::new(move |event| {
                seen.fetch_add(1, Ordering::SeqCst);
                if cancel {
                    event.cancel();
                }
            }),
        );
        count
    }

    #[test]
    fn listeners_run_in_priority_order() {
        let bus = RecordingBus::new();
        let order = Arc::new(RwLock::new(Vec::new()));
        for (priority, tag) in [
            (EventPriority::High, "high"),
            (EventPriority::Lowest, "lowest"),
            (EventPriority::Normal, "normal"),
        ] {
            let order = Arc::clone(&order);
            bus.register_receive(
                priority,
                RegistrantId::named("test"),
                false,
                Box::new(move |_| order.write().expect("lock poisoned").push(tag)),
            );
        }
        bus.fire_receive(
            Arc::new(TestPacket::new("chat", 9)),
            Arc::new(FakeSession::named("alice")),
        );
        assert_eq!(
            *order.read().expect("lock poisoned"),
            vec!["lowest", "normal", "high"]
        );
    }

    #[test]
    fn cancelled_event_skips_plain_listeners() {
        let bus = RecordingBus::new();
        let canceller = register_counter(&bus, EventPriority::Low, false, true);
        let plain = register_counter(&bus, EventPriority::Normal, false, false);
        let watcher = register_counter(&bus, EventPriority::Monitor, true, false);

        let event = bus.fire_receive(
            Arc::new(TestPacket::new("chat", 9)),
            Arc::new(FakeSession::named("alice")),
        );

        assert!(event.is_cancelled());
        assert_eq!(canceller.load(Ordering::SeqCst), 1);
        assert_eq!(plain.load(Ordering::SeqCst), 0);
        assert_eq!(watcher.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_removes_binding() {
        let bus = RecordingBus::new();
        let binding = bus.register_receive(
            EventPriority::Normal,
            RegistrantId::named("test"),
            false,
            Box::new(|_| {}),
        );
        assert_eq!(bus.receive_listener_count(), 1);
        assert!(bus.unregister(binding));
        assert_eq!(bus.receive_listener_count(), 0);
        assert!(!bus.unregister(binding)); // already gone
    }

    #[test]
    fn broadcast_is_recorded() {
        let bus = RecordingBus::new();
        let alice: SessionRef = Arc::new(FakeSession::named("alice"));
        let packet: PacketRef = Arc::new(TestPacket::new("chat", 9));
        bus.broadcast(std::slice::from_ref(&alice), std::slice::from_ref(&packet));

        let records = bus.broadcasts();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].targets, vec![alice.session_id()]);
        assert_eq!(records[0].packets, vec![WireId::new(9)]);
    }
}
