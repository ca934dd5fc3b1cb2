//! Store configuration parameters.

use inertia_core::ConfigError;

/// Configuration for a [`ColumnStore`](crate::ColumnStore).
///
/// Controls the rows allocated up front and the hard row limit.
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Rows allocated when the store is created.
    ///
    /// Default: 0. Growth from zero follows the same doubling rule as any
    /// other capacity.
    pub initial_capacity: usize,

    /// Maximum number of rows the store will ever hold.
    ///
    /// Default: `u32::MAX`, the largest row a `RowId` can address.
    /// Growth clamps to this limit; `take()` past it fails.
    pub max_rows: usize,
}

impl StoreConfig {
    /// Default number of preallocated rows.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

    /// Default row limit.
    pub const DEFAULT_MAX_ROWS: usize = u32::MAX as usize;

    /// Create a config with the given initial capacity and default limit.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_rows: Self::DEFAULT_MAX_ROWS,
        }
    }

    /// Check the limits are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rows > Self::DEFAULT_MAX_ROWS {
            return Err(ConfigError::InvalidCapacity {
                reason: format!(
                    "max_rows ({}) exceeds the addressable row limit ({})",
                    self.max_rows,
                    Self::DEFAULT_MAX_ROWS,
                ),
            });
        }
        if self.initial_capacity > self.max_rows {
            return Err(ConfigError::InvalidCapacity {
                reason: format!(
                    "initial_capacity ({}) exceeds max_rows ({})",
                    self.initial_capacity, self.max_rows,
                ),
            });
        }
        Ok(())
    }

    /// Capacity to grow to from `capacity` when the store is full.
    ///
    /// `(capacity + 1) * 2`, clamped to `max_rows`.
    pub fn next_capacity(&self, capacity: usize) -> usize {
        capacity
            .saturating_add(1)
            .saturating_mul(2)
            .min(self.max_rows)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_escapes_zero() {
        let config = StoreConfig::default();
        assert_eq!(config.next_capacity(0), 2);
        assert_eq!(config.next_capacity(2), 6);
        assert_eq!(config.next_capacity(6), 14);
    }

    #[test]
    fn growth_clamps_to_max_rows() {
        let config = StoreConfig {
            initial_capacity: 0,
            max_rows: 5,
        };
        assert_eq!(config.next_capacity(2), 5);
    }

    #[test]
    fn initial_capacity_above_limit_is_rejected() {
        let config = StoreConfig {
            initial_capacity: 10,
            max_rows: 4,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(StoreConfig::default().validate().is_ok());
        assert_eq!(StoreConfig::new(10).initial_capacity, 10);
    }
}
