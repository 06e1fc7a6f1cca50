//! Packet interception and monitoring dispatch engine.
//!
//! ptap sits between a host application's session layer and an arbitrary
//! number of independently registered packet handlers. Each handler
//! declares — via a [`CapabilityConstraint`] — which concrete packet
//! kinds it wants to see; the engine resolves that declaration to wire
//! identifiers, keeps one shared bus listener alive per (direction,
//! mode) exactly while handlers exist, and runs the direction-specific
//! veto protocol on every fired event.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          PacketTap (facade)                      │
//! │          interceptor(priority, ..)      monitor(..)              │
//! └──────────────────────────────────────────────────────────────────┘
//!               │                                  │
//!               ▼                                  ▼
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │    PacketInterceptor     │      │      PacketMonitor       │
//! │  (may veto, cancels)     │      │  (observe-only, Monitor  │
//! │                          │      │   priority, no cancel)   │
//! └──────────────────────────┘      └──────────────────────────┘
//!               │ per direction                    │
//!               ▼                                  ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  HandlerRegistry (wire id → ordered handlers)                    │
//! │  ListenerLifecycle {Detached, Attached} — one bus binding        │
//! └──────────────────────────────────────────────────────────────────┘
//!               │ lookup on every fired event
//!               ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Host PacketBus: receive / send events, broadcast primitive      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Registration Flow
//!
//! ```text
//! client handler (id + constraint)
//!     │
//!     ▼ resolve: normalize, check direction assignability
//! Vec<TypeGroup>
//!     │
//!     ▼ flatten: direct mapping / intersection scan
//! Vec<WireId>
//!     │
//!     ▼ registry.add — on 0→1, attach bus listener
//! dispatch-ready
//! ```
//!
//! # Dispatch Semantics
//!
//! | Direction | Intercept | Monitor |
//! |-----------|-----------|---------|
//! | Incoming | chain in order, first `false` cancels + stops | all run, no cancel |
//! | Outgoing | per-target chain, narrowed targets rebroadcast | all × targets run |
//!
//! # Concurrency
//!
//! The host bus invokes dispatch synchronously on its own thread; the
//! engine spawns nothing. Shared state sits behind
//! `Arc<std::sync::RwLock<...>>` so registration from other threads
//! cannot corrupt the registry, and the empty/non-empty transition is
//! checked and acted on under one write lock. Dispatch reads a snapshot
//! of the handler chain, so handlers may re-enter
//! register/unregister without deadlock; the change applies from the
//! next event.
//!
//! # Errors
//!
//! Registration-time failures ([`SignatureError`], [`ResolutionError`],
//! [`ConfigurationError`]) surface synchronously to the registering
//! caller and never during dispatch. Handler panics propagate to the
//! host's dispatcher untouched.
//!
//! # Example
//!
//! ```
//! use ptap_engine::{handler::testing::MockIntercept, PacketTap};
//! use ptap_host::testing::{FakeSession, RecordingBus, StaticCatalog, TestPacket};
//! use ptap_host::EventPriority;
//! use ptap_types::RegistrantId;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(RecordingBus::new());
//! let catalog = Arc::new(StaticCatalog::new().kind("chat", 9, &["inbound"]));
//! let tap = PacketTap::new(bus.clone(), catalog, RegistrantId::named("anti-spam"));
//!
//! let interceptor = tap.interceptor(EventPriority::Normal, false).unwrap();
//! interceptor
//!     .intercept_incoming(Arc::new(MockIntercept::deny("drop-chat", "chat")))
//!     .unwrap();
//!
//! let event = bus.fire_receive(
//!     Arc::new(TestPacket::new("chat", 9)),
//!     Arc::new(FakeSession::named("alice")),
//! );
//! assert!(event.is_cancelled());
//! ```

mod config;
mod constraint;
mod error;
pub mod handler;
mod interceptor;
mod lifecycle;
mod monitor;
mod registry;
pub mod resolve;
mod tap;

pub use config::{ConfigApplyError, DropRuleDef, RuleValidationError, TapConfig};
pub use constraint::{CapabilityConstraint, TypeGroup};
pub use error::{ConfigurationError, RegisterError, ResolutionError, SignatureError};
pub use handler::{InterceptHandler, MonitorHandler, PacketHandler};
pub use interceptor::PacketInterceptor;
pub use lifecycle::ListenerLifecycle;
pub use monitor::PacketMonitor;
pub use registry::HandlerRegistry;
pub use tap::PacketTap;

/// Test utilities for the engine.
pub mod testing {
    //! Re-export of the handler mocks.
    pub use crate::handler::testing::{MockIntercept, MockObserver};
}
