//! Frame-advance signal generator.
//!
//! Each expiry of the periodic timer while Running produces one OK1 pulse:
//!
//! ```text
//!  status  ___/‾‾‾‾‾‾‾‾\___
//!  OK1     ‾‾‾\________/‾‾‾     (active low on the board)
//!             |<-8 ms->|
//! ```
//!
//! The generator also owns the one-shot EOF pulse emitted when the run ends.
//! Both pulses share the same 8 ms hold, which the digitiser's input stage
//! requires; it is not configurable.

use crate::app::events::FrameReport;
use crate::app::ports::{ClockPort, Line, SignalPort};

/// Pulse width required by the digitiser (milliseconds).
pub const PULSE_HOLD_MS: u32 = 8;

pub struct SignalGenerator {
    /// LastTickTimestamp — set on arm, then updated every tick.
    last_tick_ms: u32,
    /// Cadence fixed at arm time.
    cadence_hz: u8,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalGenerator {
    pub fn new() -> Self {
        Self {
            last_tick_ms: 0,
            cadence_hz: 0,
        }
    }

    /// Prepare for a new run starting at `now_ms`.
    pub fn arm(&mut self, now_ms: u32, cadence_hz: u8) {
        self.last_tick_ms = now_ms;
        self.cadence_hz = cadence_hz;
    }

    pub fn cadence_hz(&self) -> u8 {
        self.cadence_hz
    }

    pub fn last_tick_ms(&self) -> u32 {
        self.last_tick_ms
    }

    /// Fixed per-tick work: timestamp, pulse, rate.
    ///
    /// `frame` is the current FrameCounter value; the caller increments it
    /// afterwards.
    pub fn tick<H>(&mut self, frame: u32, hw: &mut H) -> FrameReport
    where
        H: SignalPort + ClockPort + ?Sized,
    {
        let now = hw.now_ms();
        let elapsed_ms = now.wrapping_sub(self.last_tick_ms);
        self.last_tick_ms = now;

        pulse(hw, Line::Frame);

        let rate_fps = frame_rate(elapsed_ms);
        if rate_fps.is_none() {
            log::warn!("generator: zero elapsed time on frame {}, rate skipped", frame);
        }

        FrameReport {
            frame,
            elapsed_ms,
            rate_fps,
        }
    }

    /// One-shot end-of-film pulse.
    pub fn emit_eof<H>(&self, hw: &mut H)
    where
        H: SignalPort + ?Sized,
    {
        pulse(hw, Line::EndOfFilm);
    }
}

/// Instantaneous rate for a tick interval.  `None` for a zero interval.
pub fn frame_rate(elapsed_ms: u32) -> Option<f32> {
    if elapsed_ms == 0 {
        None
    } else {
        Some(1000.0 / elapsed_ms as f32)
    }
}

/// Assert `line` (and the status LED) for [`PULSE_HOLD_MS`].
fn pulse<H>(hw: &mut H, line: Line)
where
    H: SignalPort + ?Sized,
{
    hw.set_line(Line::Status, true);
    hw.set_line(line, true);
    hw.hold_ms(PULSE_HOLD_MS);
    hw.set_line(line, false);
    hw.set_line(Line::Status, false);
}
