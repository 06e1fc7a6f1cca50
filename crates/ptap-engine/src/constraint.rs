//! Capability constraints — what packet kinds a handler wants to see.
//!
//! A constraint has three shapes:
//!
//! - **Simple**: one packet-kind name — the common case;
//! - **Union** (`AnyOf`): alternative simple/intersection branches, any
//!   one suffices;
//! - **Intersection** (`AllOf`): names that must ALL match the same
//!   concrete packet kind.
//!
//! Every constraint normalizes to a non-empty ordered list of
//! [`TypeGroup`]s (a union of intersections); a simple constraint is a
//! single one-name group. Declaration order is preserved — it decides
//! wire-id iteration order, nothing more.
//!
//! # String form
//!
//! ```text
//! constraint := branch ( "|" branch )*
//! branch     := name ( "&" name )*
//! ```
//!
//! ```
//! use ptap_engine::CapabilityConstraint;
//!
//! let c: CapabilityConstraint = "chat|move&delta".parse().unwrap();
//! assert_eq!(c.to_string(), "chat|move&delta");
//! let groups = c.normalize().unwrap();
//! assert_eq!(groups.len(), 2);
//! assert!(groups[1].is_intersection());
//! ```

use crate::SignatureError;
use ptap_types::KindName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A handler's declared requirement on the packet kinds it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityConstraint {
    /// One packet-kind name.
    Simple(KindName),

    /// Names that must all match the same concrete kind.
    AllOf(Vec<KindName>),

    /// Alternative branches; satisfying any one suffices.
    /// Nested unions flatten during normalization.
    AnyOf(Vec<CapabilityConstraint>),
}

impl CapabilityConstraint {
    /// Creates a simple constraint.
    #[must_use]
    pub fn simple(name: impl Into<KindName>) -> Self {
        Self::Simple(name.into())
    }

    /// Creates an intersection constraint.
    #[must_use]
    pub fn all_of<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<KindName>,
    {
        Self::AllOf(names.into_iter().map(Into::into).collect())
    }

    /// Creates a union constraint.
    #[must_use]
    pub fn any_of(branches: impl IntoIterator<Item = CapabilityConstraint>) -> Self {
        Self::AnyOf(branches.into_iter().collect())
    }

    /// Normalizes into the union-of-intersections form.
    ///
    /// # Errors
    ///
    /// [`SignatureError::EmptyUnion`] / [`SignatureError::EmptyIntersection`]
    /// for constraints with no branches or no names.
    pub fn normalize(&self) -> Result<Vec<TypeGroup>, SignatureError> {
        match self {
            Self::Simple(name) => Ok(vec![TypeGroup::from_names(vec![name.clone()])]),
            Self::AllOf(names) => {
                if names.is_empty() {
                    return Err(SignatureError::EmptyIntersection);
                }
                Ok(vec![TypeGroup::from_names(names.clone())])
            }
            Self::AnyOf(branches) => {
                if branches.is_empty() {
                    return Err(SignatureError::EmptyUnion);
                }
                let mut groups = Vec::with_capacity(branches.len());
                for branch in branches {
                    groups.extend(branch.normalize()?);
                }
                Ok(groups)
            }
        }
    }
}

impl fmt::Display for CapabilityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => f.write_str(name.as_str()),
            Self::AllOf(names) => {
                let joined = names
                    .iter()
                    .map(KindName::as_str)
                    .collect::<Vec<_>>()
                    .join("&");
                f.write_str(&joined)
            }
            Self::AnyOf(branches) => {
                let joined = branches
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("|");
                f.write_str(&joined)
            }
        }
    }
}

impl FromStr for CapabilityConstraint {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(SignatureError::Parse("empty constraint".into()));
        }

        let mut branches = Vec::new();
        for branch in s.split('|') {
            let mut names = Vec::new();
            for name in branch.split('&') {
                let name = name.trim();
                if name.is_empty() {
                    return Err(SignatureError::Parse(format!(
                        "empty name in constraint '{s}'"
                    )));
                }
                names.push(KindName::new(name));
            }
            branches.push(if names.len() == 1 {
                Self::Simple(names.remove(0))
            } else {
                Self::AllOf(names)
            });
        }

        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Self::AnyOf(branches)
        })
    }
}

/// One intersection branch of a normalized constraint: a non-empty set
/// of names whose conjunction must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeGroup {
    names: Vec<KindName>,
}

impl TypeGroup {
    fn from_names(names: Vec<KindName>) -> Self {
        debug_assert!(!names.is_empty(), "TypeGroup must be non-empty");
        Self { names }
    }

    /// The names in declaration order.
    #[must_use]
    pub fn names(&self) -> &[KindName] {
        &self.names
    }

    /// Returns the name if this is a one-name group.
    #[must_use]
    pub fn single(&self) -> Option<&KindName> {
        match self.names.as_slice() {
            [name] => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if more than one name must hold.
    #[must_use]
    pub fn is_intersection(&self) -> bool {
        self.names.len() > 1
    }
}
