//! Packet monitor — observe-only dispatch.
//!
//! Structurally a [`PacketInterceptor`](crate::PacketInterceptor)
//! without the veto: listeners always attach at the reserved
//! [`EventPriority::Monitor`] level, every registered handler runs
//! unconditionally, and nothing the handlers do can cancel the event.
//!
//! By host contract a monitor-priority listener does not see cancelled
//! events unless registered with `include_cancelled = true`.

use crate::registry::DirectionState;
use crate::{resolve, MonitorHandler, RegisterError};
use ptap_host::{EventPriority, Packet, PacketBus, PacketCatalog, ReceiveFn, SendFn};
use ptap_types::{Direction, RegistrantId};
use std::sync::{Arc, RwLock};

type SharedState = Arc<RwLock<DirectionState<dyn MonitorHandler>>>;

/// Observe-only packet dispatch for both directions.
///
/// Created via [`PacketTap::monitor`](crate::PacketTap::monitor).
pub struct PacketMonitor {
    bus: Arc<dyn PacketBus>,
    catalog: Arc<dyn PacketCatalog>,
    registrant: RegistrantId,
    include_cancelled: bool,
    incoming: SharedState,
    outgoing: SharedState,
}

impl PacketMonitor {
    /// Creates a monitor.
    ///
    /// With `include_cancelled = true` the monitor also observes events
    /// cancelled by lower-priority interceptors.
    #[must_use]
    pub fn new(
        bus: Arc<dyn PacketBus>,
        catalog: Arc<dyn PacketCatalog>,
        registrant: RegistrantId,
        include_cancelled: bool,
    ) -> Self {
        Self {
            bus,
            catalog,
            registrant,
            include_cancelled,
            incoming: Arc::new(RwLock::new(DirectionState::new("incoming-monitor"))),
            outgoing: Arc::new(RwLock::new(DirectionState::new("outgoing-monitor"))),
        }
    }

    /// Registers an observer for inbound packets.
    ///
    /// # Errors
    ///
    /// [`RegisterError`] if the constraint is malformed, of the wrong
    /// direction, or resolves to no wire identifiers.
    pub fn monitor_incoming(
        &self,
        handler: Arc<dyn MonitorHandler>,
    ) -> Result<&Self, RegisterError> {
        let wire_ids =
            resolve::resolve_wire_ids(&*self.catalog, Direction::Incoming, handler.constraint())?;
        let mut state = self.incoming.write().expect("lock poisoned");
        if state.registry.add(&wire_ids, &handler) {
            let listener = receive_listener(Arc::clone(&self.incoming));
            state.lifecycle.ensure_attached(|| {
                self.bus.register_receive(
                    EventPriority::Monitor,
                    self.registrant.clone(),
                    self.include_cancelled,
                    listener,
                )
            });
        }
        Ok(self)
    }

    /// Registers an observer for outbound packets.
    ///
    /// # Errors
    ///
    /// [`RegisterError`], as [`monitor_incoming`](Self::monitor_incoming)
    /// but against `"outbound"`.
    pub fn monitor_outgoing(
        &self,
        handler: Arc<dyn MonitorHandler>,
    ) -> Result<&Self, RegisterError> {
        let wire_ids =
            resolve::resolve_wire_ids(&*self.catalog, Direction::Outgoing, handler.constraint())?;
        let mut state = self.outgoing.write().expect("lock poisoned");
        if state.registry.add(&wire_ids, &handler) {
            let listener = send_listener(Arc::clone(&self.outgoing));
            state.lifecycle.ensure_attached(|| {
                self.bus.register_send(
                    EventPriority::Monitor,
                    self.registrant.clone(),
                    self.include_cancelled,
                    listener,
                )
            });
        }
        Ok(self)
    }

    /// Removes an inbound observer by id.
    ///
    /// Returns `false` if the id was not registered.
    pub fn unregister_incoming(&self, id: &str) -> bool {
        Self::unregister(&self.incoming, &*self.bus, id)
    }

    /// Removes an outbound observer by id.
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
        let packet = Arc::clone(event.packet());
        let origin = Arc::clone(event.origin());
        for handler in &handlers {
            handler.observe(packet.as_ref(), origin.as_ref());
        }
    })
}

fn send_listener(state: SharedState) -> SendFn {
    Box::new(move |event| {
        for packet in event.packets() {
            let handlers = {
                let state = state.read().expect("lock poisoned");
                state.registry.lookup(packet.wire_id()).to_vec()
            };
            if handlers.is_empty() {
                continue;
            }
            for target in event.targets() {
                for handler in &handlers {
                    handler.observe(packet.as_ref(), target.as_ref());
                }
            }
        }
    })
}
