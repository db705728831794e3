//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the three signal lines, the blocking delay used for pulse holds,
//! the periodic timer, the clock and the speed knob, exposing them through
//! [`SignalPort`], [`TimerPort`], [`ClockPort`] and [`KnobPort`].  This is
//! the only module in the system that touches actual hardware.  On
//! non-espidf targets, the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::error;

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{ClockPort, KnobPort, Line, SignalPort, TimerPort};
use crate::drivers::hw_timer::HwTimer;
use crate::drivers::signal_line::SignalLine;
use crate::sensors::frequency_pot::FrequencyPot;

/// The three output lines of the board.
pub struct SignalLines<P> {
    pub status: SignalLine<P>,
    pub frame: SignalLine<P>,
    pub eof: SignalLine<P>,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, D> {
    lines: SignalLines<P>,
    delay: D,
    timer: HwTimer,
    clock: Esp32TimeAdapter,
    pot: FrequencyPot,
    write_failures: u32,
}

impl<P: OutputPin, D: DelayNs> HardwareAdapter<P, D> {
    pub fn new(
        lines: SignalLines<P>,
        delay: D,
        timer: HwTimer,
        clock: Esp32TimeAdapter,
        pot: FrequencyPot,
    ) -> Self {
        Self {
            lines,
            delay,
            timer,
            clock,
            pot,
            write_failures: 0,
        }
    }

    /// Boot state: status LED on, frame and EOF lines idle.
    pub fn boot_indicator(&mut self) {
        self.set_line(Line::Frame, false);
        self.set_line(Line::EndOfFilm, false);
        self.set_line(Line::Status, true);
    }

    pub fn lines(&self) -> &SignalLines<P> {
        &self.lines
    }

    pub fn timer(&self) -> &HwTimer {
        &self.timer
    }

    pub fn pot_mut(&mut self) -> &mut FrequencyPot {
        &mut self.pot
    }

    /// Pin writes that failed since boot.
    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }
}

// ── SignalPort implementation ─────────────────────────────────

impl<P: OutputPin, D: DelayNs> SignalPort for HardwareAdapter<P, D> {
    fn set_line(&mut self, line: Line, active: bool) {
        let target = match line {
            Line::Status => &mut self.lines.status,
            Line::Frame => &mut self.lines.frame,
            Line::EndOfFilm => &mut self.lines.eof,
        };
        if let Err(e) = target.set(active) {
            self.write_failures = self.write_failures.saturating_add(1);
            error!("hardware: {}", e);
        }
    }

    fn hold_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl<P, D> TimerPort for HardwareAdapter<P, D> {
    fn start_periodic(&mut self, freq_hz: u32) {
        self.timer.start_periodic(freq_hz);
    }

    fn stop(&mut self) {
        self.timer.stop();
    }

    fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    fn take_ticks(&mut self) -> u32 {
        self.timer.take_ticks()
    }
}

// ── ClockPort / KnobPort implementation ───────────────────────

impl<P, D> ClockPort for HardwareAdapter<P, D> {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

impl<P, D> KnobPort for HardwareAdapter<P, D> {
    fn read_knob(&mut self) -> u16 {
        self.pot.read_knob()
    }
}
