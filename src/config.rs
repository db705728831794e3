//! Controller configuration parameters
//!
//! All tunable parameters for the projector controller. The defaults match the
//! shipped hardware; a JSON override can be embedded at build time through the
//! `BECKVIEW_CONFIG` environment variable.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Build-time JSON override, if any.
const EMBEDDED_CONFIG: Option<&str> = option_env!("BECKVIEW_CONFIG");

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    // --- Frame signal cadence ---
    /// TargetFrequency used until the speed knob is first polled (Hz)
    pub default_frequency_hz: u8,
    /// Floor applied to the knob reading so a fully-closed knob never stalls
    /// the generator (Hz)
    pub min_frequency_hz: u8,
    /// Top of the knob's linear scale (Hz)
    pub max_frequency_hz: u8,

    // --- Speed knob ---
    /// Poll rate of the frequency monitor while idle (Hz)
    pub monitor_poll_hz: u8,
    /// Raw ADC value that maps to `max_frequency_hz`
    pub adc_full_scale: u16,

    // --- Run loop ---
    /// Sleep between queue drains on target (milliseconds)
    pub idle_poll_ms: u32,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            default_frequency_hz: 5,
            min_frequency_hz: 1,
            max_frequency_hz: 24,

            monitor_poll_hz: 5,
            adc_full_scale: u16::MAX,

            idle_poll_ms: 1,
        }
    }
}

impl ProjectorConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the build-time override, falling back to defaults when it is
    /// absent or invalid.
    pub fn load() -> Self {
        match EMBEDDED_CONFIG {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                warn!("BECKVIEW_CONFIG rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Reject values that would stall or overdrive the generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_frequency_hz == 0 {
            return Err(ConfigError::ValidationFailed("min_frequency_hz"));
        }
        if self.max_frequency_hz < self.min_frequency_hz {
            return Err(ConfigError::ValidationFailed("max_frequency_hz"));
        }
        if !(self.min_frequency_hz..=self.max_frequency_hz).contains(&self.default_frequency_hz) {
            return Err(ConfigError::ValidationFailed("default_frequency_hz"));
        }
        if self.monitor_poll_hz == 0 {
            return Err(ConfigError::ValidationFailed("monitor_poll_hz"));
        }
        if self.adc_full_scale == 0 {
            return Err(ConfigError::ValidationFailed("adc_full_scale"));
        }
        Ok(())
    }
}
