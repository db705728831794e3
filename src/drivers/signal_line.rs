//! Digital signal line with a configured active level.
//!
//! Wraps any `embedded_hal` output pin.  The frame-advance and end-of-film
//! lines on the board are open-collector and therefore active LOW; the status
//! LED is active HIGH.  Callers only ever say "active" or "idle".

use embedded_hal::digital::OutputPin;

use crate::error::SignalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

pub struct SignalLine<P> {
    pin: P,
    polarity: Polarity,
    name: &'static str,
    active: bool,
}

impl<P: OutputPin> SignalLine<P> {
    pub fn new(pin: P, polarity: Polarity, name: &'static str) -> Self {
        Self {
            pin,
            polarity,
            name,
            active: false,
        }
    }

    pub fn active_high(pin: P, name: &'static str) -> Self {
        Self::new(pin, Polarity::ActiveHigh, name)
    }

    pub fn active_low(pin: P, name: &'static str) -> Self {
        Self::new(pin, Polarity::ActiveLow, name)
    }

    /// Drive the line to its active or idle level.
    pub fn set(&mut self, active: bool) -> Result<(), SignalError> {
        let high = match self.polarity {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        };
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| SignalError::GpioWriteFailed(self.name))?;
        self.active = active;
        Ok(())
    }

    /// Last level successfully written.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
