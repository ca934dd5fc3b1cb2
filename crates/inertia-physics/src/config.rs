//! World configuration.

use inertia_core::ConfigError;
use inertia_soa::StoreConfig;

/// Configuration for a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Body store limits.
    pub store: StoreConfig,

    /// Step length used by [`World::run_for_default`](crate::World::run_for_default).
    ///
    /// Default: 1 ms. Must be finite and > 0.
    pub default_timestep: f64,
}

impl WorldConfig {
    /// Default step length in seconds.
    pub const DEFAULT_TIMESTEP: f64 = 0.001;

    /// Room for `initial_capacity` bodies before the first growth.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            store: StoreConfig::new(initial_capacity),
            default_timestep: Self::DEFAULT_TIMESTEP,
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        if !self.default_timestep.is_finite() || self.default_timestep <= 0.0 {
            return Err(ConfigError::InvalidTimestep {
                value: self.default_timestep,
            });
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(StoreConfig::DEFAULT_INITIAL_CAPACITY)
    }
}
