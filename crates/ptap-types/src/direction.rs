//! Packet flow direction.

use crate::KindName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction a packet travels through the host's session layer.
///
/// Direction decides which host event a listener binds to and which base
/// capability a handler's declared constraint must be assignable to:
///
/// | Direction | Host event | Base capability |
/// |-----------|------------|-----------------|
/// | `Incoming` | packet received | `"inbound"` |
/// | `Outgoing` | packet send | `"outbound"` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Client → server: packets arriving from a remote session.
    Incoming,
    /// Server → client: packets queued for delivery to targets.
    Outgoing,
}

impl Direction {
    /// Returns the base capability every handler constraint for this
    /// direction must be assignable to.
    ///
    /// # Example
    ///
    /// ```
    /// use ptap_types::Direction;
    ///
    /// assert_eq!(Direction::Outgoing.capability().as_str(), "outbound");
    /// ```
    #[must_use]
    pub fn capability(self) -> KindName {
        match self {
            Self::Incoming => KindName::new("inbound"),
            Self::Outgoing => KindName::new("outbound"),
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
