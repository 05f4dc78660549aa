//! Runtime configuration parameters.

use crate::error::ConfigError;

/// Configuration for a [`Runtime`](crate::Runtime).
///
/// Capacities are preallocation hints only; both arenas grow on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Object slots reserved up front.
    ///
    /// Default: 64.
    pub object_capacity: usize,

    /// Scope slots reserved up front, including the root.
    ///
    /// Default: 8.
    pub scope_capacity: usize,

    /// Minimum number of tombstones in a scope's entry list before it is
    /// compacted. Compaction additionally requires tombstones to outnumber
    /// live entries.
    ///
    /// Default: 32. Must be at least 1.
    pub compact_threshold: usize,
}

impl RuntimeConfig {
    /// Default object slot reservation.
    pub const DEFAULT_OBJECT_CAPACITY: usize = 64;

    /// Default scope slot reservation.
    pub const DEFAULT_SCOPE_CAPACITY: usize = 8;

    /// Default compaction threshold.
    pub const DEFAULT_COMPACT_THRESHOLD: usize = 32;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            object_capacity: Self::DEFAULT_OBJECT_CAPACITY,
            scope_capacity: Self::DEFAULT_SCOPE_CAPACITY,
            compact_threshold: Self::DEFAULT_COMPACT_THRESHOLD,
        }
    }

    /// Check the config for values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compact_threshold == 0 {
            return Err(ConfigError::InvalidCompactThreshold {
                value: self.compact_threshold,
            });
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RuntimeConfig::default();
        assert_eq!(config.compact_threshold, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = RuntimeConfig {
            compact_threshold: 0,
            ..RuntimeConfig::new()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidCompactThreshold { value: 0 })
        );
    }
}
