//! Unified error code contract.
//!
//! Every ptap error type implements [`ErrorCode`] to provide:
//!
//! - **Machine-readable codes**: for programmatic error handling
//! - **Recoverability info**: for retry logic and user feedback
//!
//! # Example
//!
//! ```
//! use ptap_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum CatalogError {
//!     Unavailable,
//!     UnknownKind(String),
//! }
//!
//! impl ErrorCode for CatalogError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Unavailable => "TAP_CATALOG_UNAVAILABLE",
//!             Self::UnknownKind(_) => "TAP_UNKNOWN_KIND",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Unavailable)
//!     }
//! }
//!
//! let err = CatalogError::UnknownKind("chat".into());
//! assert_eq!(err.code(), "TAP_UNKNOWN_KIND");
//! assert!(!err.is_recoverable());
//! ```

/// Unified error code interface for ptap errors.
///
/// # Code Format
///
/// Error codes should be:
///
/// - **UPPER_SNAKE_CASE** with the `TAP_` prefix: e.g. `"TAP_UNKNOWN_KIND"`
/// - **Stable**: codes do not change once defined (API contract)
///
/// # Recoverability
///
/// An error is recoverable if retrying the operation may succeed or the
/// condition is transient. All registration-time errors in ptap are
/// caller bugs and therefore not recoverable.
pub trait ErrorCode {
    /// Returns the stable machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns `true` if retrying the operation may succeed.
    fn is_recoverable(&self) -> bool;
}
