//! Speed knob: a 10 kΩ potentiometer on an ESP32-S3 ADC channel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init) and
//! widens the 12-bit sample to the full 16-bit range.
//! On host/test: returns a value injected with [`FrequencyPot::sim_set_raw`].

use crate::app::ports::KnobPort;
use crate::pins;

/// Stretch an `bits`-wide sample over 0..=65535 so that full scale maps to
/// full scale (the top bits are replicated into the low bits).
pub fn widen_to_u16(raw: u16, bits: u32) -> u16 {
    if bits >= 16 {
        return raw;
    }
    let max = (1u32 << bits) - 1;
    let raw = u32::from(raw).min(max);
    let shift = 16 - bits;
    ((raw << shift) | (raw >> bits.saturating_sub(shift))) as u16
}

pub struct FrequencyPot {
    channel: u32,
    last_raw: u16,
    #[cfg(not(target_os = "espidf"))]
    sim_raw: u16,
}

impl Default for FrequencyPot {
    fn default() -> Self {
        Self::new(pins::FREQUENCY_POT_ADC_CHANNEL)
    }
}

impl FrequencyPot {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            last_raw: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_raw: 0,
        }
    }

    /// Inject a native-resolution (12-bit) sample.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_raw(&mut self, raw: u16) {
        self.sim_raw = raw;
    }

    /// Native-resolution sample of the last read.
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    #[cfg(target_os = "espidf")]
    fn read_native(&mut self) -> u16 {
        crate::drivers::hw_init::adc1_read(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_native(&mut self) -> u16 {
        let _ = self.channel;
        self.sim_raw
    }

    /// Read the knob, widened to 16 bits.
    pub fn read(&mut self) -> u16 {
        self.last_raw = self.read_native();
        widen_to_u16(self.last_raw, pins::ADC_RESOLUTION_BITS)
    }
}

impl KnobPort for FrequencyPot {
    fn read_knob(&mut self) -> u16 {
        self.read()
    }
}
