//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProjectorService (domain)
//! ```
//!
//! Driven adapters (signal lines, the periodic timer, the speed knob, the
//! display) implement these traits.  The
//! [`ProjectorService`](super::service::ProjectorService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! Port methods are infallible: a physical line either toggles or the board
//! is broken, and there is no recovery path the controller could take.
//! Adapters log hardware errors instead of returning them.

use super::events::Report;

// ───────────────────────────────────────────────────────────────
// Signal port (domain → output lines)
// ───────────────────────────────────────────────────────────────

/// Output lines driven by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Status LED, lit for the duration of every pulse.
    Status,
    /// OK1 frame-advance signal.
    Frame,
    /// End-of-film signal.
    EndOfFilm,
}

/// Write-side port for the digital signal lines.
pub trait SignalPort {
    /// Drive `line` to its active (`true`) or idle (`false`) level.
    /// Polarity is the adapter's concern.
    fn set_line(&mut self, line: Line, active: bool);

    /// Block for `ms` milliseconds while a pulse is held.
    fn hold_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Timer port (the single shared periodic timer)
// ───────────────────────────────────────────────────────────────

/// The one periodic hardware timer.  Whoever holds it decides the cadence.
pub trait TimerPort {
    /// (Re)arm the timer to expire `freq_hz` times per second.
    fn start_periodic(&mut self, freq_hz: u32);

    /// Disarm the timer.  No expiry that has not yet been taken with
    /// [`take_ticks`](Self::take_ticks) may be delivered afterwards.
    fn stop(&mut self);

    /// Whether the timer is currently armed.
    fn is_armed(&self) -> bool;

    /// Take the number of expiries since the last call.
    fn take_ticks(&mut self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; callers subtract with
/// `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Knob port (speed potentiometer)
// ───────────────────────────────────────────────────────────────

pub trait KnobPort {
    /// Raw knob position, full 16-bit range (0 – 65535).
    fn read_knob(&mut self) -> u16;
}

/// Everything the run-state machine drives.  Blanket-implemented for any
/// adapter that provides all four ports.
pub trait HardwarePort: SignalPort + TimerPort + ClockPort + KnobPort {}

impl<T: SignalPort + TimerPort + ClockPort + KnobPort> HardwarePort for T {}

// ───────────────────────────────────────────────────────────────
// Report sink (domain → display / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits typed [`Report`]s through this port.  Adapters decide
/// where they go (OLED, serial log, test recorder).
pub trait ReportSink {
    fn report(&mut self, report: &Report);
}

// ───────────────────────────────────────────────────────────────
// Text display (consumed by the display reporter)
// ───────────────────────────────────────────────────────────────

/// Minimal text surface of the status display.  Calls must return promptly.
pub trait TextDisplay {
    fn clear(&mut self);

    /// Draw `text` with its top-left corner at pixel (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: i32, y: i32);

    /// Push the frame buffer to the panel.
    fn present(&mut self);
}
