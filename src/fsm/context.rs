//! Controller state threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and write
//! to: the frame counter, the target frequency, the two timer-driven workers
//! and the record of who currently holds the periodic timer.  The hardware
//! and report ports travel alongside it in [`Io`] for the duration of one
//! dispatch.

use log::{debug, error};

use crate::app::ports::{HardwarePort, ReportSink};
use crate::config::ProjectorConfig;
use crate::control::generator::SignalGenerator;
use crate::control::monitor::FrequencyMonitor;

// ---------------------------------------------------------------------------
// Frame counter
// ---------------------------------------------------------------------------

/// Frames signalled since the last Running entry, or -1 when not running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounter(i32);

impl FrameCounter {
    /// Sentinel: the projector is not running.
    pub const IDLE: Self = Self(-1);

    /// Counter value on Running entry.
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    pub const fn is_running(self) -> bool {
        self.0 >= 0
    }

    /// Frames counted so far, or `None` for the sentinel.
    pub fn frames(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }

    /// Count one emitted frame.  The sentinel is never incremented.
    pub fn increment(&mut self) {
        if self.is_running() {
            self.0 = self.0.saturating_add(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Timer ownership
// ---------------------------------------------------------------------------

/// The two roles that can hold the periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRole {
    /// Frequency monitor, polling the knob while idle.
    Monitor,
    /// Signal generator, pulsing frames while running.
    Generator,
}

// ---------------------------------------------------------------------------
// Io
// ---------------------------------------------------------------------------

/// Ports borrowed for one dispatch.
pub struct Io<'a> {
    pub hw: &'a mut dyn HardwarePort,
    pub sink: &'a mut dyn ReportSink,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Configuration --
    pub config: ProjectorConfig,

    // -- Run data --
    /// FrameCounter: -1 while idle.
    pub frame_counter: FrameCounter,
    /// TargetFrequency (Hz).  Written by the monitor while idle, read once on
    /// Running entry.
    pub target_hz: u8,

    // -- Workers --
    pub generator: SignalGenerator,
    pub monitor: FrequencyMonitor,

    // -- Shared timer --
    timer_owner: Option<TimerRole>,
}

impl FsmContext {
    pub fn new(config: ProjectorConfig) -> Self {
        Self {
            frame_counter: FrameCounter::IDLE,
            target_hz: config.default_frequency_hz,
            generator: SignalGenerator::new(),
            monitor: FrequencyMonitor::new(&config),
            config,
            timer_owner: None,
        }
    }

    /// Role currently holding the periodic timer, if any.
    pub fn timer_owner(&self) -> Option<TimerRole> {
        self.timer_owner
    }

    /// Arm the shared timer for `role`.
    ///
    /// The timer must be free.  If it is not, the holder is stopped first so
    /// two roles can never run at once.
    pub fn acquire_timer(&mut self, role: TimerRole, freq_hz: u32, hw: &mut dyn HardwarePort) {
        if let Some(holder) = self.timer_owner {
            error!("timer: {:?} acquiring while {:?} still holds it", role, holder);
            debug_assert!(false, "timer acquired twice");
            hw.stop();
        }
        hw.start_periodic(freq_hz);
        self.timer_owner = Some(role);
        debug!("timer: {:?} @ {} Hz", role, freq_hz);
    }

    /// Disarm the shared timer on behalf of `role`.
    pub fn release_timer(&mut self, role: TimerRole, hw: &mut dyn HardwarePort) {
        if self.timer_owner != Some(role) {
            error!(
                "timer: {:?} releasing but holder is {:?}",
                role, self.timer_owner
            );
        }
        hw.stop();
        self.timer_owner = None;
        debug!("timer: released by {:?}", role);
    }
}
