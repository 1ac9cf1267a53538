//! Engine configuration, validated at construction.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`crate::engine::CollectionEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum pixel distance between a tap and a projected anchor for
    /// the tap to count as a hit.
    pub tap_threshold_px: f32,

    /// Capacity of the engine event ring buffer.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tap_threshold_px: 150.0,
            event_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Default configuration with a custom hit threshold.
    pub fn with_threshold(tap_threshold_px: f32) -> Self {
        Self {
            tap_threshold_px,
            ..Self::default()
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tap_threshold_px > 0.0) {
            return Err(ConfigError::NonPositiveThreshold {
                value: self.tap_threshold_px,
            });
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }
}

/// Errors produced by [`EngineConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The tap threshold must be a positive, finite-comparable pixel
    /// distance (NaN fails the comparison and lands here too).
    #[error("tap threshold must be positive, got {value}")]
    NonPositiveThreshold { value: f32 },

    /// The event buffer must hold at least one event.
    #[error("event capacity must be non-zero")]
    ZeroEventCapacity,
}
