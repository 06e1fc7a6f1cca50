//! Host session-layer contracts for ptap.
//!
//! This crate declares the interfaces the host application's session layer
//! must provide — ptap consumes them and never implements them (the
//! [`testing`] doubles exist for tests only).
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Contract Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ptap-types : WireId, KindName, Direction, ids              │
//! │  ptap-host  : Packet, Session, catalog, bus  ◄── HERE       │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Engine Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ptap-engine : constraints, registry, dispatch, facade      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Host Surface
//!
//! | Contract | Purpose |
//! |----------|---------|
//! | [`Packet`] | A decoded packet: wire id + kind + downcast surface |
//! | [`Session`] | A connected peer; origin of inbound, target of outbound |
//! | [`PacketCatalog`] | Enumerates concrete kinds, answers assignability |
//! | [`PacketBus`] | Listener registration, event delivery, broadcast |
//! | [`PacketReceiveEvent`] | One inbound packet + origin, cancellable |
//! | [`PacketSendEvent`] | One outbound batch + targets, cancellable |
//! | [`EventPriority`] | Listener ordering; `Monitor` is reserved |
//!
//! # Event Flow
//!
//! ```text
//! ┌─────────────┐  ReceiveEvent   ┌─────────────┐
//! │   Session   │ ──────────────► │  PacketBus  │ ──► listeners
//! │   (peer)    │                 │             │     (priority order)
//! └─────────────┘                 └─────────────┘
//!
//! ┌─────────────┐   SendEvent     ┌─────────────┐
//! │    Host     │ ──────────────► │  PacketBus  │ ──► listeners
//! │  (batch +   │                 │             │
//! │   targets)  │  broadcast() ◄─────────────────── rebroadcast path
//! └─────────────┘                 └─────────────┘
//! ```
//!
//! A cancelled event is not delivered by the host; ptap's outgoing
//! interceptor uses [`PacketBus::broadcast`] to re-submit a batch to a
//! narrowed target list after cancelling the original event.

mod bus;
mod catalog;
mod event;
mod packet;
mod priority;
mod session;
pub mod testing;

pub use bus::{PacketBus, ReceiveFn, SendFn};
pub use catalog::PacketCatalog;
pub use event::{PacketReceiveEvent, PacketSendEvent};
pub use packet::{Packet, PacketRef};
pub use priority::EventPriority;
pub use session::{Session, SessionRef};
