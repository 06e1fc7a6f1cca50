//! Wire-protocol vocabulary: wire identifiers and packet kind names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The discrete code a host protocol uses to tag a concrete packet kind
/// on the wire.
///
/// Wire identifiers come from the host's packet catalog; ptap never
/// invents them, it only keys handler buckets by them.
///
/// # Example
///
/// ```
/// use ptap_types::WireId;
///
/// let id = WireId::new(0x31);
/// assert_eq!(id.value(), 0x31);
/// assert_eq!(id.to_string(), "0x31");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(u32);

impl WireId {
    /// Creates a wire identifier from its raw protocol value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw protocol value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl From<u32> for WireId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// The name of a packet kind or capability facet in the host's catalog.
///
/// A `KindName` may name a concrete packet kind (one with a direct
/// [`WireId`] mapping) or an abstract facet that concrete kinds are
/// assignable to (e.g. `"inbound"`, `"compressible"`). The catalog decides
/// which is which; ptap treats names as opaque keys.
///
/// # Example
///
/// ```
/// use ptap_types::KindName;
///
/// let chat = KindName::new("chat");
/// assert_eq!(chat.as_str(), "chat");
/// assert_eq!(chat, KindName::new("chat"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindName(String);

impl KindName {
    /// Creates a kind name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KindName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for KindName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for KindName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for KindName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
