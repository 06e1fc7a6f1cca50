//! Identifier types for ptap.
//!
//! All identifiers are UUID-based. Run-time handles use random v4;
//! named registrants use deterministic v5 so the same name resolves to
//! the same identity across processes and machines.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::{uuid, Uuid};

/// ptap namespace UUID for deterministic UUID v5 generation.
const PTAP_NAMESPACE: Uuid = uuid!("6f2c1a84-55d0-4b7e-9b0a-3f6d8c21e597");

/// Identity of the party registering listeners with the host bus.
///
/// The host's event bus requires a registrant on every listener
/// registration so it can account for (and bulk-remove) listeners per
/// plugin. A registrant is a stable name plus a deterministic UUID.
///
/// # Example
///
/// ```
/// use ptap_types::RegistrantId;
///
/// let a = RegistrantId::named("anti-spam");
/// let b = RegistrantId::named("anti-spam");
/// assert_eq!(a, b);               // same name, same UUID
/// assert_eq!(a.name(), "anti-spam");
/// assert_ne!(a, RegistrantId::named("metrics"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrantId {
    /// Deterministic identity derived from the name.
    pub uuid: Uuid,
    /// Human-readable registrant name (e.g. the plugin name).
    pub name: String,
}

impl RegistrantId {
    /// Creates a registrant id with a deterministic UUID v5 derived from
    /// the name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uuid: Uuid::new_v5(&PTAP_NAMESPACE, name.as_bytes()),
            name,
        }
    }

    /// Returns the registrant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RegistrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Handle for one listener registration on the host event bus.
///
/// Returned by the bus at registration time; required to unregister.
/// At most one binding exists per (direction, mode) pair in ptap — the
/// listener lifecycle manager owns that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingId(Uuid);

impl BindingId {
    /// Creates a fresh random binding id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BindingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one remote session (a connected peer) in the host's
/// session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a fresh random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_registrant_is_deterministic() {
        assert_eq!(RegistrantId::named("x"), RegistrantId::named("x"));
        assert_ne!(RegistrantId::named("x"), RegistrantId::named("y"));
    }

    #[test]
    fn registrant_display_is_name() {
        assert_eq!(RegistrantId::named("anti-spam").to_string(), "anti-spam");
    }

    #[test]
    fn binding_ids_are_unique() {
        assert_ne!(BindingId::new(), BindingId::new());
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn binding_id_serde_roundtrip() {
        let id = BindingId::new();
        let json = serde_json::to_string(&id).expect("BindingId should serialize");
        let back: BindingId = serde_json::from_str(&json).expect("BindingId should deserialize");
        assert_eq!(back, id);
    }
}
