//! Speed-knob frequency monitor.
//!
//! While the projector is idle the shared timer runs at the monitor's poll
//! rate and every expiry samples the knob.  The reading is scaled linearly
//! onto `0 ..= max_frequency_hz` and floored at `min_frequency_hz`, so a knob
//! turned fully down still yields a usable cadence for the next run.
//!
//! Readings are used as-is; the pot is not filtered.

use crate::app::events::FrequencyReport;
use crate::config::ProjectorConfig;

pub struct FrequencyMonitor {
    poll_hz: u8,
    full_scale: u16,
    min_hz: u8,
    max_hz: u8,
    last: Option<FrequencyReport>,
}

impl FrequencyMonitor {
    pub fn new(config: &ProjectorConfig) -> Self {
        Self {
            poll_hz: config.monitor_poll_hz,
            full_scale: config.adc_full_scale,
            min_hz: config.min_frequency_hz,
            max_hz: config.max_frequency_hz,
            last: None,
        }
    }

    pub fn poll_hz(&self) -> u8 {
        self.poll_hz
    }

    /// Convert one raw reading.  The caller stores `target_hz`.
    pub fn sample(&mut self, raw: u16) -> FrequencyReport {
        let scaled_hz = scale_reading(raw, self.full_scale, self.max_hz);
        let target_hz = scaled_hz.max(self.min_hz).min(self.max_hz);
        let report = FrequencyReport {
            raw,
            scaled_hz,
            target_hz,
        };
        self.last = Some(report);
        report
    }

    /// Most recent sample, if the knob has been polled at all.
    pub fn last_sample(&self) -> Option<FrequencyReport> {
        self.last
    }
}

/// `round(raw / full_scale * max_hz)`, rounding halves up.  Readings above
/// `full_scale` saturate.
pub fn scale_reading(raw: u16, full_scale: u16, max_hz: u8) -> u8 {
    if full_scale == 0 {
        return 0;
    }
    let raw = u32::from(raw.min(full_scale));
    let full = u32::from(full_scale);
    let scaled = (2 * raw * u32::from(max_hz) + full) / (2 * full);
    scaled as u8
}
