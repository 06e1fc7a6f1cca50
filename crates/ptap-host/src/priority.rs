//! Listener priority levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority at which a bus listener observes an event.
///
/// Listeners run in ascending priority order. `Monitor` is reserved by
/// host contract for observe-only listeners: it runs last and can never
/// cancel the event. Constructing a ptap interceptor at `Monitor` is a
/// configuration error, rejected at construction time.
///
/// | Level | Value | Notes |
/// |-------|-------|-------|
/// | `Lowest` | 0 | first to run |
/// | `Low` | 1 | |
/// | `Normal` | 2 | default for interceptors |
/// | `High` | 3 | |
/// | `Highest` | 4 | last level that may cancel |
/// | `Monitor` | 5 | reserved, observe-only |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    /// First to observe the event.
    Lowest,
    /// Early observer.
    Low,
    /// Default interceptor level.
    Normal,
    /// Late observer.
    High,
    /// Last level that may still cancel the event.
    Highest,
    /// Reserved observe-only level. Never cancels.
    Monitor,
}

impl EventPriority {
    /// Returns the numeric level (0 = first).
    #[must_use]
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Returns `true` for the reserved observe-only level.
    #[must_use]
    pub fn is_monitor(self) -> bool {
        matches!(self, Self::Monitor)
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Highest => "highest",
            Self::Monitor => "monitor",
        }
    }
}

impl Default for EventPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_numeric_value() {
        assert!(EventPriority::Lowest < EventPriority::Normal);
        assert!(EventPriority::Highest < EventPriority::Monitor);
        assert_eq!(EventPriority::Lowest.value(), 0);
        assert_eq!(EventPriority::Monitor.value(), 5);
    }

    #[test]
    fn only_monitor_is_monitor() {
        for p in [
            EventPriority::Lowest,
            EventPriority::Low,
            EventPriority::Normal,
            EventPriority::High,
            EventPriority::Highest,
        ] {
            assert!(!p.is_monitor(), "{p} should not be monitor");
        }
        assert!(EventPriority::Monitor.is_monitor());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(EventPriority::default(), EventPriority::Normal);
    }

    #[test]
    fn serde_snake_case() {
        let json = serde_json::to_string(&EventPriority::Monitor)
            .expect("EventPriority should serialize");
        assert_eq!(json, "\"monitor\"");
    }
}
