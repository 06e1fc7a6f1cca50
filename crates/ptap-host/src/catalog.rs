//! The host's packet catalog surface.

use ptap_types::{KindName, WireId};

/// The host's catalog of packet kinds.
///
/// The catalog is the single authority on three questions ptap asks at
/// registration time:
///
/// 1. What is the wire identifier of a concrete kind name?
/// 2. Is kind/facet `a` assignable to kind/facet `b`?
/// 3. What is the full set of concrete kinds? (intersection scans)
///
/// # Assignability
///
/// `is_assignable(a, b)` must be reflexive (`a` is assignable to `a`)
/// and transitive across the host's kind/facet hierarchy. The base
/// capabilities `"inbound"` and `"outbound"` (see
/// [`Direction::capability`](ptap_types::Direction::capability)) are
/// facets in this hierarchy: every concrete kind is assignable to exactly
/// one of them.
pub trait PacketCatalog: Send + Sync {
    /// Returns the wire identifier of a concrete kind name, or `None` if
    /// the name is unknown or abstract (a facet with no direct mapping).
    fn wire_id(&self, kind: &KindName) -> Option<WireId>;

    /// Returns `true` if `kind` is assignable to `target`.
    fn is_assignable(&self, kind: &KindName, target: &KindName) -> bool;

    /// Enumerates every concrete packet kind with its wire identifier.
    ///
    /// Order must be stable across calls within one process; intersection
    /// resolution derives its result order from it.
    fn concrete_kinds(&self) -> Vec<(WireId, KindName)>;
}
