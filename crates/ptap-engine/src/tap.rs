//! The entry-point facade.

use crate::{ConfigurationError, PacketInterceptor, PacketMonitor};
use ptap_host::{EventPriority, PacketBus, PacketCatalog};
use ptap_types::RegistrantId;
use std::sync::Arc;

/// Factory for interceptors and monitors bound to one host.
///
/// Holds explicit bus and catalog handles — there is no ambient global
/// lookup, which is what makes the engine testable against in-memory
/// doubles.
///
/// # Example
///
/// ```
/// use ptap_engine::PacketTap;
/// use ptap_host::testing::{RecordingBus, StaticCatalog};
/// use ptap_host::EventPriority;
/// use ptap_types::RegistrantId;
/// use std::sync::Arc;
///
/// let bus = Arc::new(RecordingBus::new());
/// let catalog = Arc::new(StaticCatalog::new().kind("chat", 9, &["inbound"]));
///
/// let tap = PacketTap::new(bus, catalog, RegistrantId::named("my-plugin"));
/// let interceptor = tap.interceptor(EventPriority::Normal, false).unwrap();
/// let monitor = tap.monitor(false);
///
/// // Interceptors can never run at the reserved observe-only level.
/// assert!(tap.interceptor(EventPriority::Monitor, false).is_err());
/// # let _ = (interceptor, monitor);
/// ```
pub struct PacketTap {
    bus: Arc<dyn PacketBus>,
    catalog: Arc<dyn PacketCatalog>,
    registrant: RegistrantId,
}

impl PacketTap {
    /// Creates a facade for the given host handles.
    #[must_use]
    pub fn new(
        bus: Arc<dyn PacketBus>,
        catalog: Arc<dyn PacketCatalog>,
        registrant: RegistrantId,
    ) -> Self {
        Self {
            bus,
            catalog,
            registrant,
        }
    }

    /// Creates a veto-capable interceptor at the given priority.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ReservedMonitorPriority`] for
    /// [`EventPriority::Monitor`].
    pub fn interceptor(
        &self,
        priority: EventPriority,
        include_cancelled: bool,
    ) -> Result<PacketInterceptor, ConfigurationError> {
        PacketInterceptor::new(
            Arc::clone(&self.bus),
            Arc::clone(&self.catalog),
            self.registrant.clone(),
            priority,
            include_cancelled,
        )
    }

    /// Creates an observe-only monitor at the reserved priority.
    #[must_use]
    pub fn monitor(&self, include_cancelled: bool) -> PacketMonitor {
        PacketMonitor::new(
            Arc::clone(&self.bus),
            Arc::clone(&self.catalog),
            self.registrant.clone(),
            include_cancelled,
        )
    }
}
