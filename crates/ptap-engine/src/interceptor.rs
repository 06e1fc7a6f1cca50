//! Packet interceptor — veto-capable dispatch.
//!
//! One [`PacketInterceptor`] owns two independent (registry, lifecycle)
//! pairs, one per direction. A shared bus listener exists per direction
//! exactly while that direction's registry is non-empty.
//!
//! # Dispatch protocol
//!
//! **Incoming**: handlers for the packet's wire id run in registration
//! order against (packet, originating session). The first `false` marks
//! the event cancelled and short-circuits the chain.
//!
//! **Outgoing**: the event carries one packet batch and one target list.
//! For each packet with registered handlers, every original target runs
//! the handler chain; a `false` drops that target (other targets are
//! unaffected). If any target was dropped, the event is cancelled, the
//! full original batch is rebroadcast to the surviving targets (closed
//! sessions filtered out), and batch processing stops — only the first
//! adjusted packet's narrowing is honored per event. The early stop is
//! kept for host compatibility and is not a guarantee worth relying on.
//!
//! Handler chains see a snapshot of the registry taken at event entry;
//! registrations made inside a handler take effect from the next event.
//! Handler panics are not caught and propagate to the host dispatcher.

use crate::registry::DirectionState;
use crate::{resolve, ConfigurationError, InterceptHandler, RegisterError};
use ptap_host::{
    EventPriority, Packet, PacketBus, PacketCatalog, PacketRef, ReceiveFn, SendFn, Session,
    SessionRef,
};
use ptap_types::{Direction, RegistrantId};
use std::sync::{Arc, RwLock};

type SharedState = Arc<RwLock<DirectionState<dyn InterceptHandler>>>;

/// Veto-capable packet dispatch for both directions.
///
/// Created via [`PacketTap::interceptor`](crate::PacketTap::interceptor)
/// or [`new`](Self::new). Registration calls return `&Self`, so multiple
/// registrations chain with `?`:
///
/// ```no_run
/// # use ptap_engine::{PacketInterceptor, RegisterError, InterceptHandler};
/// # use std::sync::Arc;
/// # fn demo(
/// #     interceptor: &PacketInterceptor,
/// #     chat_filter: Arc<dyn InterceptHandler>,
/// #     spam_filter: Arc<dyn InterceptHandler>,
/// # ) -> Result<(), RegisterError> {
/// interceptor
///     .intercept_incoming(chat_filter)?
///     .intercept_incoming(spam_filter)?;
/// # Ok(())
/// # }
/// ```
pub struct PacketInterceptor {
    bus: Arc<dyn PacketBus>,
    catalog: Arc<dyn PacketCatalog>,
    registrant: RegistrantId,
    priority: EventPriority,
    include_cancelled: bool,
    incoming: SharedState,
    outgoing: SharedState,
}

impl std::fmt::Debug for PacketInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketInterceptor")
            .field("registrant", &self.registrant)
            .field("priority", &self.priority)
            .field("include_cancelled", &self.include_cancelled)
            .finish_non_exhaustive()
    }
}

impl PacketInterceptor {
    /// Creates an interceptor attaching its listeners at `priority`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ReservedMonitorPriority`] if `priority` is
    /// the reserved observe-only level — rejected here, before any
    /// registration can occur.
    pub fn new(
        bus: Arc<dyn PacketBus>,
        catalog: Arc<dyn PacketCatalog>,
        registrant: RegistrantId,
        priority: EventPriority,
        include_cancelled: bool,
    ) -> Result<Self, ConfigurationError> {
        if priority.is_monitor() {
            return Err(ConfigurationError::ReservedMonitorPriority);
        }
        Ok(Self {
            bus,
            catalog,
            registrant,
            priority,
            include_cancelled,
            incoming: Arc::new(RwLock::new(DirectionState::new("incoming-intercept"))),
            outgoing: Arc::new(RwLock::new(DirectionState::new("outgoing-intercept"))),
        })
    }

    /// Registers a handler for inbound packets.
    ///
    /// # Errors
    ///
    /// [`RegisterError`] if the handler's constraint is malformed, names
    /// a capability not assignable to `"inbound"`, or resolves to no
    /// wire identifiers.
    pub fn intercept_incoming(
        &self,
        handler: Arc<dyn InterceptHandler>,
    ) -> Result<&Self, RegisterError> {
        let wire_ids =
            resolve::resolve_wire_ids(&*self.catalog, Direction::Incoming, handler.constraint())?;
        let mut state = self.incoming.write().expect("lock poisoned");
        if state.registry.add(&wire_ids, &handler) {
            let listener = receive_listener(Arc::clone(&self.incoming));
            state.lifecycle.ensure_attached(|| {
                self.bus.register_receive(
                    self.priority,
                    self.registrant.clone(),
                    self.include_cancelled,
                    listener,
                )
            });
        }
        Ok(self)
    }

    /// Registers a handler for outbound packets.
    ///
    /// # Errors
    ///
    /// [`RegisterError`], as [`intercept_incoming`](Self::intercept_incoming)
    /// but against `"outbound"`.
    pub fn intercept_outgoing(
        &self,
        handler: Arc<dyn InterceptHandler>,
    ) -> Result<&Self, RegisterError> {
        let wire_ids =
            resolve::resolve_wire_ids(&*self.catalog, Direction::Outgoing, handler.constraint())?;
        let mut state = self.outgoing.write().expect("lock poisoned");
        if state.registry.add(&wire_ids, &handler) {
            let listener = send_listener(Arc::clone(&self.outgoing), Arc::clone(&self.bus));
            state.lifecycle.ensure_attached(|| {
                self.bus.register_send(
                    self.priority,
                    self.registrant.clone(),
                    self.include_cancelled,
                    listener,
                )
            });
        }
        Ok(self)
    }

    /// Removes an inbound handler by id. Detaches the direction's bus
    /// listener if this was the last handler.
    ///
    /// Returns `false` if the id was not registered.
    pub fn unregister_incoming(&self, id: &str) -> bool {
        Self::unregister(&self.incoming, &*self.bus, id)
    }

    /// Removes an outbound handler by id.
    ///
    /// Returns `false` if the id was not registered.
    pub fn unregister_outgoing(&self, id: &str) -> bool {
        Self::unregister(&self.outgoing, &*self.bus, id)
    }

    fn unregister(state: &SharedState, bus: &dyn PacketBus, id: &str) -> bool {
        let mut state = state.write().expect("lock poisoned");
        if !state.registry.contains(id) {
            return false;
        }
        if state.registry.remove(id) {
            state.lifecycle.ensure_detached(|binding| bus.unregister(binding));
        }
        true
    }
}

fn receive_listener(state: SharedState) -> ReceiveFn {
    Box::new(move |event| {
        let handlers = {
            let state = state.read().expect("lock poisoned");
            state.registry.lookup(event.packet().wire_id()).to_vec()
        };
        if handlers.is_empty() {
            return;
        }
        let packet = Arc::clone(event.packet());
        let origin = Arc::clone(event.origin());
        for handler in &handlers {
            if !handler.intercept(packet.as_ref(), origin.as_ref()) {
                event.cancel();
                break;
            }
        }
    })
}

fn send_listener(state: SharedState, bus: Arc<dyn PacketBus>) -> SendFn {
    Box::new(move |event| {
        let packets: Vec<PacketRef> = event.packets().to_vec();
        let original: Vec<SessionRef> = event.targets().to_vec();

        for packet in &packets {
            let handlers = {
                let state = state.read().expect("lock poisoned");
                state.registry.lookup(packet.wire_id()).to_vec()
            };
            if handlers.is_empty() {
                continue;
            }

            let mut remaining: Vec<SessionRef> = Vec::with_capacity(original.len());
            for target in &original {
                let allowed = handlers
                    .iter()
                    .all(|h| h.intercept(packet.as_ref(), target.as_ref()));
                if allowed {
                    remaining.push(Arc::clone(target));
                }
            }

            if remaining.len() != original.len() {
                event.cancel();
                if !remaining.is_empty() {
                    let deliverable: Vec<SessionRef> =
                        remaining.into_iter().filter(|t| t.is_open()).collect();
                    bus.broadcast(&deliverable, &packets);
                }
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::MockIntercept;
    use ptap_host::testing::{RecordingBus, StaticCatalog};
    use ptap_types::ErrorCode;

    fn catalog() -> Arc<StaticCatalog> {
        Arc::new(
            StaticCatalog::new()
                .kind("chat", 9, &["inbound"])
                .kind("chunk", 20, &["outbound"]),
        )
    }

    fn interceptor(bus: &Arc<RecordingBus>) -> PacketInterceptor {
        PacketInterceptor::new(
            Arc::clone(bus) as Arc<dyn PacketBus>,
            catalog(),
            RegistrantId::named("test"),
            EventPriority::Normal,
            false,
        )
        .expect("normal priority is valid")
    }

    #[test]
    fn monitor_priority_rejected_at_construction() {
        let bus = Arc::new(RecordingBus::new());
        let err = PacketInterceptor::new(
            bus as Arc<dyn PacketBus>,
            catalog(),
            RegistrantId::named("test"),
            EventPriority::Monitor,
            false,
        )
        .expect_err("monitor priority must be rejected");
        assert_eq!(err, ConfigurationError::ReservedMonitorPriority);
        assert_eq!(err.code(), "TAP_RESERVED_PRIORITY");
    }

    #[test]
    fn first_registration_attaches_one_listener() {
        let bus = Arc::new(RecordingBus::new());
        let interceptor = interceptor(&bus);

        interceptor
            .intercept_incoming(Arc::new(MockIntercept::allow("a", "chat")))
            .expect("valid")
            .intercept_incoming(Arc::new(MockIntercept::allow("b", "chat")))
            .expect("valid");

        assert_eq!(bus.receive_listener_count(), 1);
        assert_eq!(bus.send_listener_count(), 0);
    }

    #[test]
    fn directions_attach_independently() {
        let bus = Arc::new(RecordingBus::new());
        let interceptor = interceptor(&bus);

        interceptor
            .intercept_incoming(Arc::new(MockIntercept::allow("in", "chat")))
            .expect("valid");
        interceptor
            .intercept_outgoing(Arc::new(MockIntercept::allow("out", "chunk")))
            .expect("valid");

        assert_eq!(bus.receive_listener_count(), 1);
        assert_eq!(bus.send_listener_count(), 1);
    }

    #[test]
    fn failed_registration_attaches_nothing() {
        let bus = Arc::new(RecordingBus::new());
        let interceptor = interceptor(&bus);

        let err = interceptor
            .intercept_incoming(Arc::new(MockIntercept::allow("a", "chunk")))
            .expect_err("chunk is outbound");
        assert_eq!(err.code(), "TAP_NOT_ASSIGNABLE");
        assert_eq!(bus.receive_listener_count(), 0);
    }

    #[test]
    fn last_unregister_detaches() {
        let bus = Arc::new(RecordingBus::new());
        let interceptor = interceptor(&bus);

        interceptor
            .intercept_incoming(Arc::new(MockIntercept::allow("a", "chat")))
            .expect("valid");
        assert!(interceptor.unregister_incoming("a"));
        assert_eq!(bus.receive_listener_count(), 0);

        assert!(!interceptor.unregister_incoming("a")); // already gone
    }

    #[test]
    fn reregistration_attaches_fresh_listener() {
        let bus = Arc::new(RecordingBus::new());
        let interceptor = interceptor(&bus);

        for _ in 0..3 {
            interceptor
                .intercept_incoming(Arc::new(MockIntercept::allow("a", "chat")))
                .expect("valid");
            assert_eq!(bus.receive_listener_count(), 1);
            interceptor.unregister_incoming("a");
            assert_eq!(bus.receive_listener_count(), 0);
        }
    }
}
