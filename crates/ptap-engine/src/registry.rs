//! Handler registry — wire-id buckets for one (direction, mode) pair.

use crate::PacketHandler;
use ptap_types::WireId;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps wire identifiers to the ordered handlers registered for them.
///
/// One instance exists per direction × mode. Buckets preserve insertion
/// order (which is execution order at dispatch) and deduplicate by
/// handler id: registering the same id twice under one wire identifier
/// is a no-op, not a duplicate invocation.
///
/// `add` and `remove` report the registry's empty/non-empty transitions;
/// the dispatch coordinators use those signals to drive the listener
/// lifecycle. Both are evaluated under the caller's write lock, so the
/// transition check is atomic with the mutation.
pub struct HandlerRegistry<H: ?Sized> {
    buckets: HashMap<WireId, Vec<Arc<H>>>,
    entries: usize,
}

impl<H: PacketHandler + ?Sized> HandlerRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            entries: 0,
        }
    }

    /// Inserts the handler into the bucket of every given wire id,
    /// skipping buckets that already hold its id.
    ///
    /// Returns `true` if the registry transitioned from empty to
    /// non-empty (the signal to attach the bus listener).
    pub fn add(&mut self, wire_ids: &[WireId], handler: &Arc<H>) -> bool {
        let was_empty = self.entries == 0;
        for &id in wire_ids {
            let bucket = self.buckets.entry(id).or_default();
            if bucket.iter().any(|h| h.id() == handler.id()) {
                continue;
            }
            bucket.push(Arc::clone(handler));
            self.entries += 1;
        }
        was_empty && self.entries > 0
    }

    /// Removes the handler id from every bucket it appears in, dropping
    /// buckets that become empty.
    ///
    /// Scanning all buckets (rather than re-deriving the id's wire set)
    /// guarantees removal symmetry with whatever set the id was
    /// registered under.
    ///
    /// Returns `true` if the registry transitioned from non-empty to
    /// empty (the signal to detach the bus listener).
    pub fn remove(&mut self, id: &str) -> bool {
        let was_non_empty = self.entries > 0;
        self.buckets.retain(|_, bucket| {
            let before = bucket.len();
            bucket.retain(|h| h.id() != id);
            self.entries -= before - bucket.len();
            !bucket.is_empty()
        });
        was_non_empty && self.entries == 0
    }

    /// Returns `true` if the id is registered under any wire id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.buckets
            .values()
            .any(|bucket| bucket.iter().any(|h| h.id() == id))
    }

    /// The handlers for a wire id, in registration order. Empty if none.
    #[must_use]
    pub fn lookup(&self, wire_id: WireId) -> &[Arc<H>] {
        self.buckets.get(&wire_id).map_or(&[], Vec::as_slice)
    }

    /// Total number of (wire id, handler) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

impl<H: PacketHandler + ?Sized> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry plus its listener lifecycle, mutated together under one
/// write lock so the empty/non-empty transition is atomic with the
/// attach/detach decision.
pub(crate) struct DirectionState<H: ?Sized> {
    pub registry: HandlerRegistry<H>,
    pub lifecycle: crate::lifecycle::ListenerLifecycle,
}

impl<H: PacketHandler + ?Sized> DirectionState<H> {
    pub fn new(label: &'static str) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            lifecycle: crate::lifecycle::ListenerLifecycle::new(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::MockIntercept;
    use crate::InterceptHandler;

    fn ids(registry: &HandlerRegistry<dyn InterceptHandler>, wire: u32) -> Vec<String> {
        registry
            .lookup(WireId::new(wire))
            .iter()
            .map(|h| h.id().to_string())
            .collect()
    }

    fn handler(id: &str) -> Arc<dyn InterceptHandler> {
        Arc::new(MockIntercept::allow(id, "chat"))
    }

    #[test]
    fn add_reports_first_transition_only() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        assert!(registry.add(&[WireId::new(9)], &handler("a")));
        assert!(!registry.add(&[WireId::new(9)], &handler("b")));
        assert!(!registry.add(&[WireId::new(11)], &handler("c")));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn add_preserves_registration_order() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        registry.add(&[WireId::new(9)], &handler("first"));
        registry.add(&[WireId::new(9)], &handler("second"));
        registry.add(&[WireId::new(9)], &handler("third"));
        assert_eq!(ids(&registry, 9), ["first", "second", "third"]);
    }

    #[test]
    fn add_same_id_is_idempotent() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        registry.add(&[WireId::new(9)], &handler("a"));
        registry.add(&[WireId::new(9)], &handler("a"));
        assert_eq!(registry.len(), 1);
        assert_eq!(ids(&registry, 9), ["a"]);
    }

    #[test]
    fn add_spans_multiple_wire_ids() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        registry.add(&[WireId::new(9), WireId::new(10)], &handler("a"));
        assert_eq!(ids(&registry, 9), ["a"]);
        assert_eq!(ids(&registry, 10), ["a"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_reports_last_transition_only() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        registry.add(&[WireId::new(9)], &handler("a"));
        registry.add(&[WireId::new(10)], &handler("b"));
        assert!(!registry.remove("a"));
        assert!(registry.remove("b"));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_takes_id_out_of_every_bucket() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        registry.add(&[WireId::new(9), WireId::new(10)], &handler("a"));
        registry.add(&[WireId::new(9)], &handler("b"));
        registry.remove("a");
        assert_eq!(ids(&registry, 9), ["b"]);
        assert!(registry.lookup(WireId::new(10)).is_empty());
        assert!(!registry.contains("a"));
        assert!(registry.contains("b"));
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        registry.add(&[WireId::new(9)], &handler("a"));
        assert!(!registry.remove("ghost"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_missing_wire_id_is_empty() {
        let registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        assert!(registry.lookup(WireId::new(99)).is_empty());
    }

    #[test]
    fn add_remove_cycles_signal_each_transition() {
        let mut registry: HandlerRegistry<dyn InterceptHandler> = HandlerRegistry::new();
        for _ in 0..3 {
            assert!(registry.add(&[WireId::new(9)], &handler("a")));
            assert!(registry.remove("a"));
        }
    }
}
