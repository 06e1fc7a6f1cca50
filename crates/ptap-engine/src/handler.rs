//! Handler traits and testing utilities.

use crate::CapabilityConstraint;
use ptap_host::{Packet, Session};

/// Common surface of every registered handler.
///
/// Handlers are identity-keyed by their client-supplied [`id`](Self::id):
/// registering a second handler under an id already present for a wire
/// identifier is a no-op, and unregistration is by id. The declared
/// [`constraint`](Self::constraint) decides which concrete packet kinds
/// the handler is invoked for; parameter and return shape are fixed by
/// the trait signatures.
pub trait PacketHandler: Send + Sync {
    /// Unique identifier for this handler.
    fn id(&self) -> &str;

    /// Which packet kinds this handler wants to see.
    fn constraint(&self) -> &CapabilityConstraint;
}

/// A handler that may veto delivery.
///
/// Invoked in registration order; the first `false` cancels the event
/// and short-circuits the rest of the chain (incoming) or drops the
/// current target (outgoing).
pub trait InterceptHandler: PacketHandler {
    /// Returns `false` to veto this packet for this session.
    ///
    /// Incoming: `session` is the originating session. Outgoing:
    /// `session` is one delivery target; the handler runs once per
    /// target.
    fn intercept(&self, packet: &dyn Packet, session: &dyn Session) -> bool;
}

/// An observe-only handler. No veto capability.
pub trait MonitorHandler: PacketHandler {
    /// Observes one packet for one session.
    fn observe(&self, packet: &dyn Packet, session: &dyn Session);
}

/// Test utilities for handlers.
pub mod testing {
    use super::*;
    use ptap_types::{SessionId, WireId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type VerdictFn = Box<dyn Fn(&dyn Packet, &dyn Session) -> bool + Send + Sync>;

    /// A mock intercept handler with a programmable verdict.
    ///
    /// Tracks invocation count via `call_count`.
    pub struct MockIntercept {
        /// Handler id.
        pub id: String,
        /// Declared constraint.
        pub constraint: CapabilityConstraint,
        verdict: VerdictFn,
        /// Number of times `intercept()` has been called.
        pub call_count: Arc<AtomicUsize>,
    }

    impl MockIntercept {
        /// Creates a handler that allows everything.
        #[must_use]
        pub fn allow(id: &str, constraint: &str) -> Self {
            Self::with(id, constraint, |_, _| true)
        }

        /// Creates a handler that vetoes everything.
        #[must_use]
        pub fn deny(id: &str, constraint: &str) -> Self {
            Self::with(id, constraint, |_, _| false)
        }

        /// Creates a handler that vetoes only the given session.
        #[must_use]
        pub fn deny_session(id: &str, constraint: &str, session: SessionId) -> Self {
            Self::with(id, constraint, move |_, s| s.session_id() != session)
        }

        /// Creates a handler with an arbitrary verdict function.
        #[must_use]
        pub fn with(
            id: &str,
            constraint: &str,
            verdict: impl Fn(&dyn Packet, &dyn Session) -> bool + Send + Sync + 'static,
        ) -> Self {
            Self {
                id: id.to_string(),
                constraint: constraint.parse().expect("valid constraint for MockIntercept"),
                verdict: Box::new(verdict),
                call_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Returns the number of times this handler has run.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    impl PacketHandler for MockIntercept {
        fn id(&self) -> &str {
            &self.id
        }

        fn constraint(&self) -> &CapabilityConstraint {
            &self.constraint
        }
    }

    impl InterceptHandler for MockIntercept {
        fn intercept(&self, packet: &dyn Packet, session: &dyn Session) -> bool {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            (self.verdict)(packet, session)
        }
    }

    /// A mock monitor handler that records what it saw.
    pub struct MockObserver {
        /// Handler id.
        pub id: String,
        /// Declared constraint.
        pub constraint: CapabilityConstraint,
        /// Number of times `observe()` has been called.
        pub call_count: Arc<AtomicUsize>,
        /// (wire id, session id) pairs in observation order.
        pub seen: Arc<Mutex<Vec<(WireId, SessionId)>>>,
    }

    impl MockObserver {
        /// Creates an observer.
        #[must_use]
        pub fn new(id: &str, constraint: &str) -> Self {
            Self {
                id: id.to_string(),
                constraint: constraint.parse().expect("valid constraint for MockObserver"),
                call_count: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Returns the number of times this observer has run.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Returns the (wire id, session id) pairs seen so far.
        #[must_use]
        pub fn observations(&self) -> Vec<(WireId, SessionId)> {
            self.seen.lock().expect("lock poisoned").clone()
        }
    }

    impl PacketHandler for MockObserver {
        fn id(&self) -> &str {
            &self.id
        }

        fn constraint(&self) -> &CapabilityConstraint {
            &self.constraint
        }
    }

    impl MonitorHandler for MockObserver {
        fn observe(&self, packet: &dyn Packet, session: &dyn Session) {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .expect("lock poisoned")
                .push((packet.wire_id(), session.session_id()));
        }
    }
}
