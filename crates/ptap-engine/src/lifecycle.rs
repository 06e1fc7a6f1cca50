//! Listener lifecycle — one shared bus binding per (direction, mode).
//!
//! A two-state machine:
//!
//! ```text
//! ┌──────────┐  ensure_attached (registry 0 → 1)   ┌──────────┐
//! │ Detached │ ──────────────────────────────────► │ Attached │
//! │          │ ◄────────────────────────────────── │ (binding)│
//! └──────────┘  ensure_detached (registry 1 → 0)   └──────────┘
//! ```
//!
//! The coordinators call `ensure_attached`/`ensure_detached` under the
//! same write lock that mutates the registry, which makes the transition
//! atomic with the count check. Invariant: registry non-empty ⇔ binding
//! present.

use ptap_types::BindingId;

/// Tracks the single outstanding bus binding for one (direction, mode).
#[derive(Debug)]
pub struct ListenerLifecycle {
    /// Log label, e.g. `"incoming-intercept"`.
    label: &'static str,
    binding: Option<BindingId>,
}

impl ListenerLifecycle {
    /// Creates a detached lifecycle.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            binding: None,
        }
    }

    /// Attaches via `register` unless already attached.
    ///
    /// `register` performs the actual bus registration and returns the
    /// binding handle; it runs only on the detached → attached
    /// transition.
    pub fn ensure_attached(&mut self, register: impl FnOnce() -> BindingId) {
        if self.binding.is_some() {
            return;
        }
        let binding = register();
        tracing::debug!(listener = self.label, %binding, "bus listener attached");
        self.binding = Some(binding);
    }

    /// Detaches via `unregister` if currently attached.
    ///
    /// `unregister` returns `false` when the bus no longer knows the
    /// binding; that is benign (double-detach) and only logged.
    pub fn ensure_detached(&mut self, unregister: impl FnOnce(BindingId) -> bool) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        if unregister(binding) {
            tracing::debug!(listener = self.label, %binding, "bus listener detached");
        } else {
            tracing::warn!(
                listener = self.label,
                %binding,
                "bus listener binding already absent on detach"
            );
        }
    }

    /// Returns `true` if a binding is outstanding.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// The outstanding binding, if any.
    #[must_use]
    pub fn binding(&self) -> Option<BindingId> {
        self.binding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_runs_register_once() {
        let mut lifecycle = ListenerLifecycle::new("test");
        let mut registrations = 0;

        lifecycle.ensure_attached(|| {
            registrations += 1;
            BindingId::new()
        });
        let first = lifecycle.binding();
        lifecycle.ensure_attached(|| {
            registrations += 1;
            BindingId::new()
        });

        assert_eq!(registrations, 1);
        assert!(lifecycle.is_attached());
        assert_eq!(lifecycle.binding(), first);
    }

    #[test]
    fn detach_passes_recorded_binding() {
        let mut lifecycle = ListenerLifecycle::new("test");
        lifecycle.ensure_attached(BindingId::new);
        let binding = lifecycle.binding().expect("attached");

        let mut seen = None;
        lifecycle.ensure_detached(|b| {
            seen = Some(b);
            true
        });

        assert_eq!(seen, Some(binding));
        assert!(!lifecycle.is_attached());
    }

    #[test]
    fn detach_when_detached_is_a_no_op() {
        let mut lifecycle = ListenerLifecycle::new("test");
        let mut calls = 0;
        lifecycle.ensure_detached(|_| {
            calls += 1;
            true
        });
        assert_eq!(calls, 0);
    }

    #[test]
    fn absent_binding_on_detach_is_benign() {
        let mut lifecycle = ListenerLifecycle::new("test");
        lifecycle.ensure_attached(BindingId::new);
        // Host says it never heard of the binding; state still resets.
        lifecycle.ensure_detached(|_| false);
        assert!(!lifecycle.is_attached());
    }

    #[test]
    fn reattach_after_detach_gets_fresh_binding() {
        let mut lifecycle = ListenerLifecycle::new("test");
        lifecycle.ensure_attached(BindingId::new);
        let first = lifecycle.binding();
        lifecycle.ensure_detached(|_| true);
        lifecycle.ensure_attached(BindingId::new);
        assert!(lifecycle.is_attached());
        assert_ne!(lifecycle.binding(), first);
    }
}
