//! Constraint resolution: type groups in, wire identifiers out.
//!
//! Two stages, both pure and both registration-time only:
//!
//! 1. [`resolve`] — normalize the declared constraint and check every
//!    named capability against the direction's base capability;
//! 2. [`flatten`] — convert the groups into concrete wire identifiers,
//!    consulting the catalog only for intersection groups.
//!
//! ```text
//! CapabilityConstraint ──resolve──► Vec<TypeGroup> ──flatten──► Vec<WireId>
//!          │                              │
//!          │  SignatureError              │  ResolutionError
//!          ▼                              ▼
//!     (shape/direction)             (unknown/unmatched)
//! ```

use crate::{CapabilityConstraint, RegisterError, ResolutionError, SignatureError, TypeGroup};
use ptap_host::PacketCatalog;
use ptap_types::{Direction, WireId};

/// Normalizes a constraint and validates it against the direction's base
/// capability.
///
/// Every name in every group must be assignable to
/// [`Direction::capability`] — an incoming handler cannot watch outbound
/// kinds and vice versa. Declaration order is preserved.
///
/// # Errors
///
/// [`SignatureError`] for empty shapes or a capability of the wrong
/// direction.
pub fn resolve(
    catalog: &dyn PacketCatalog,
    direction: Direction,
    constraint: &CapabilityConstraint,
) -> Result<Vec<TypeGroup>, SignatureError> {
    let groups = constraint.normalize()?;
    let expected = direction.capability();
    for group in &groups {
        for name in group.names() {
            if !catalog.is_assignable(name, &expected) {
                return Err(SignatureError::NotAssignable {
                    name: name.clone(),
                    expected,
                });
            }
        }
    }
    Ok(groups)
}

/// Converts type groups into a deduplicated, first-seen-ordered list of
/// wire identifiers.
///
/// - A one-name group reads the kind's wire identifier directly — O(1),
///   no catalog scan. A name without a direct mapping (unknown, or an
///   abstract facet) is an error: the direct-mapping contract leaves no
///   scan path for single names.
/// - A multi-name group scans the catalog's concrete kinds; a kind
///   qualifies if it is assignable to every name in the group.
///
/// Groups are processed in order; identifiers from later groups append
/// after earlier ones, skipping identifiers already present.
///
/// # Errors
///
/// [`ResolutionError::UnknownKind`] for an unmapped single name,
/// [`ResolutionError::UnmatchedIntersection`] when an intersection
/// matches nothing — a registration that would never fire is an error,
/// not a silent no-op.
pub fn flatten(
    catalog: &dyn PacketCatalog,
    groups: &[TypeGroup],
) -> Result<Vec<WireId>, ResolutionError> {
    let mut ids: Vec<WireId> = Vec::new();
    for group in groups {
        if let Some(name) = group.single() {
            let id = catalog
                .wire_id(name)
                .ok_or_else(|| ResolutionError::UnknownKind(name.clone()))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        } else {
            let mut matched = false;
            for (id, kind) in catalog.concrete_kinds() {
                if group.names().iter().all(|n| catalog.is_assignable(&kind, n)) {
                    matched = true;
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            if !matched {
                return Err(ResolutionError::UnmatchedIntersection {
                    names: group.names().to_vec(),
                });
            }
        }
    }
    Ok(ids)
}

/// Resolves a constraint all the way to wire identifiers.
///
/// # Errors
///
/// [`RegisterError`] wrapping either stage's failure.
pub fn resolve_wire_ids(
    catalog: &dyn PacketCatalog,
    direction: Direction,
    constraint: &CapabilityConstraint,
) -> Result<Vec<WireId>, RegisterError> {
    let groups = resolve(catalog, direction, constraint)?;
    Ok(flatten(catalog, &groups)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptap_host::testing::StaticCatalog;
    use ptap_types::KindName;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .facet("chat-like", &["inbound"])
            .facet("compressible", &["outbound"])
            .kind("chat", 9, &["chat-like"])
            .kind("whisper", 10, &["chat-like"])
            .kind("move", 11, &["inbound"])
            .kind("chunk", 20, &["compressible"])
            .kind("sound", 21, &["outbound"])
    }

    fn wire_ids(constraint: &str, direction: Direction) -> Result<Vec<u32>, RegisterError> {
        let constraint: CapabilityConstraint = constraint.parse().expect("valid constraint");
        resolve_wire_ids(&catalog(), direction, &constraint)
            .map(|ids| ids.into_iter().map(WireId::value).collect())
    }

    // ── resolve ──────────────────────────────────────────────

    #[test]
    fn simple_constraint_resolves() {
        let groups = resolve(
            &catalog(),
            Direction::Incoming,
            &CapabilityConstraint::simple("chat"),
        )
        .expect("chat is inbound");
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn wrong_direction_rejected() {
        let err = resolve(
            &catalog(),
            Direction::Incoming,
            &CapabilityConstraint::simple("chunk"),
        )
        .expect_err("chunk is outbound");
        assert_eq!(
            err,
            SignatureError::NotAssignable {
                name: KindName::new("chunk"),
                expected: KindName::new("inbound"),
            }
        );
    }

    #[test]
    fn one_wrong_branch_rejects_whole_union() {
        let err = wire_ids("chat|chunk", Direction::Incoming).expect_err("mixed directions");
        assert!(matches!(
            err,
            RegisterError::Signature(SignatureError::NotAssignable { .. })
        ));
    }

    #[test]
    fn empty_shapes_rejected() {
        let err = resolve(
            &catalog(),
            Direction::Incoming,
            &CapabilityConstraint::any_of([]),
        )
        .expect_err("empty union");
        assert_eq!(err, SignatureError::EmptyUnion);
    }

    // ── flatten ──────────────────────────────────────────────

    #[test]
    fn simple_maps_directly() {
        assert_eq!(wire_ids("chat", Direction::Incoming).expect("valid"), [9]);
    }

    #[test]
    fn union_in_branch_order_deduplicated() {
        assert_eq!(
            wire_ids("move|chat|move", Direction::Incoming).expect("valid"),
            [11, 9]
        );
    }

    #[test]
    fn intersection_scans_catalog() {
        // Everything assignable to both inbound and chat-like.
        assert_eq!(
            wire_ids("inbound&chat-like", Direction::Incoming).expect("valid"),
            [9, 10]
        );
    }

    #[test]
    fn intersection_result_appends_after_simple_branches() {
        assert_eq!(
            wire_ids("move|inbound&chat-like", Direction::Incoming).expect("valid"),
            [11, 9, 10]
        );
    }

    #[test]
    fn unmatched_intersection_is_an_error() {
        let err = wire_ids("chat-like&move", Direction::Incoming).expect_err("nothing matches");
        assert!(matches!(
            err,
            RegisterError::Resolution(ResolutionError::UnmatchedIntersection { .. })
        ));
    }

    #[test]
    fn abstract_single_name_is_unknown() {
        let err = wire_ids("chat-like", Direction::Incoming).expect_err("facet has no wire id");
        assert_eq!(
            err,
            RegisterError::Resolution(ResolutionError::UnknownKind(KindName::new("chat-like")))
        );
    }

    #[test]
    fn unknown_name_fails_at_assignability() {
        // A name the catalog has never heard of cannot be assignable to
        // the base capability, so it fails in resolve, not flatten.
        let err = wire_ids("nope", Direction::Incoming).expect_err("unknown name");
        assert!(matches!(err, RegisterError::Signature(_)));
    }

    #[test]
    fn outgoing_direction_accepts_outbound_kinds() {
        assert_eq!(
            wire_ids("chunk|sound", Direction::Outgoing).expect("valid"),
            [20, 21]
        );
    }
}
