//! Foundation types for the ptap packet interception layer.
//!
//! This crate provides the identifier and wire-protocol vocabulary shared
//! by every other ptap crate.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Contract Layer                          │
//! │  (SemVer stable, safe for host integrations to depend on)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ptap-types : WireId, KindName, Direction, ids  ◄── HERE    │
//! │  ptap-host  : Packet, Session, PacketCatalog, PacketBus     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Engine Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ptap-engine : constraints, registry, dispatch, facade      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Run-time handles ([`BindingId`], [`SessionId`]) are random UUID v4.
//! Named registrants ([`RegistrantId`]) use deterministic UUID v5 so the
//! same plugin name resolves to the same identity across processes.
//!
//! # Example
//!
//! ```
//! use ptap_types::{Direction, KindName, RegistrantId, WireId};
//!
//! let chat = WireId::new(9);
//! let kind = KindName::new("chat");
//! assert_eq!(chat.value(), 9);
//! assert_eq!(kind.as_str(), "chat");
//!
//! // Incoming handlers must declare capabilities assignable to "inbound".
//! assert_eq!(Direction::Incoming.capability().as_str(), "inbound");
//!
//! // Same name, same identity.
//! assert_eq!(RegistrantId::named("anti-spam"), RegistrantId::named("anti-spam"));
//! ```

mod direction;
mod error;
mod id;
mod wire;

pub use direction::Direction;
pub use error::ErrorCode;
pub use id::{BindingId, RegistrantId, SessionId};
pub use wire::{KindName, WireId};
