//! Engine error taxonomy.
//!
//! All engine-detected errors are synchronous: they surface to the caller
//! of the offending registration or construction call and never during
//! dispatch. None are recoverable — each one is a bug in the registering
//! code, not a transient condition.
//!
//! | Error | Code | When |
//! |-------|------|------|
//! | [`SignatureError::EmptyUnion`] | `TAP_EMPTY_UNION` | union constraint with no branches |
//! | [`SignatureError::EmptyIntersection`] | `TAP_EMPTY_INTERSECTION` | intersection with no names |
//! | [`SignatureError::NotAssignable`] | `TAP_NOT_ASSIGNABLE` | capability of the wrong direction |
//! | [`SignatureError::Parse`] | `TAP_CONSTRAINT_SYNTAX` | malformed constraint string |
//! | [`ResolutionError::UnknownKind`] | `TAP_UNKNOWN_KIND` | name with no direct wire id |
//! | [`ResolutionError::UnmatchedIntersection`] | `TAP_UNMATCHED_INTERSECTION` | intersection matching zero kinds |
//! | [`ConfigurationError::ReservedMonitorPriority`] | `TAP_RESERVED_PRIORITY` | interceptor at monitor priority |

use ptap_types::{ErrorCode, KindName};
use thiserror::Error;

/// A handler's declared constraint does not satisfy the required shape
/// or direction contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A union constraint with no branches.
    #[error("constraint declares an empty union")]
    EmptyUnion,

    /// An intersection constraint with no names.
    #[error("constraint declares an empty intersection")]
    EmptyIntersection,

    /// A named capability is not assignable to the direction's base
    /// capability (e.g. an outbound kind in an incoming handler).
    #[error("capability '{name}' is not assignable to '{expected}'")]
    NotAssignable {
        /// The offending capability name.
        name: KindName,
        /// The direction's base capability.
        expected: KindName,
    },

    /// A constraint string could not be parsed.
    #[error("invalid constraint syntax: {0}")]
    Parse(String),
}

/// A constraint normalized cleanly but maps to no wire identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A one-name group whose name has no direct wire-id mapping in the
    /// catalog (unknown, or an abstract facet).
    #[error("packet kind '{0}' has no wire identifier")]
    UnknownKind(KindName),

    /// An intersection that no concrete packet kind satisfies.
    #[error("intersection [{}] matches no concrete packet kind", join_names(.names))]
    UnmatchedIntersection {
        /// The names of the unmatched group.
        names: Vec<KindName>,
    },
}

/// The engine was constructed with an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Interceptors may not attach at the reserved observe-only priority.
    #[error("cannot intercept packets at the reserved monitor priority")]
    ReservedMonitorPriority,
}

/// Umbrella error returned by registration calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The constraint's shape or direction is wrong.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The constraint maps to no wire identifiers.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

fn join_names(names: &[KindName]) -> String {
    names
        .iter()
        .map(KindName::as_str)
        .collect::<Vec<_>>()
        .join(" & ")
}

impl ErrorCode for SignatureError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyUnion => "TAP_EMPTY_UNION",
            Self::EmptyIntersection => "TAP_EMPTY_INTERSECTION",
            Self::NotAssignable { .. } => "TAP_NOT_ASSIGNABLE",
            Self::Parse(_) => "TAP_CONSTRAINT_SYNTAX",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

impl ErrorCode for ResolutionError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "TAP_UNKNOWN_KIND",
            Self::UnmatchedIntersection { .. } => "TAP_UNMATCHED_INTERSECTION",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

impl ErrorCode for ConfigurationError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReservedMonitorPriority => "TAP_RESERVED_PRIORITY",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

impl ErrorCode for RegisterError {
    fn code(&self) -> &'static str {
        match self {
            Self::Signature(e) => e.code(),
            Self::Resolution(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
