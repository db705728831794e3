//! Outbound reports.
//!
//! The [`ProjectorService`](super::service::ProjectorService) emits these
//! through the [`ReportSink`](super::ports::ReportSink) port.  Adapters on the
//! other side decide how to present them.

use crate::fsm::RunState;

/// Structured reports emitted by the controller core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    /// The controller has started and is waiting for the start button.
    Ready,

    /// The run-state machine applied a transition.
    StateChanged { from: RunState, to: RunState },

    /// One frame-advance pulse was emitted.
    Frame(FrameReport),

    /// The EOF pulse was emitted; carries the number of frames projected.
    EndOfFilm { total_frames: u32 },

    /// The speed knob was sampled while idle.
    Frequency(FrequencyReport),
}

/// Per-tick generator report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Index of the frame just signalled (0-based).
    pub frame: u32,
    /// Milliseconds since the previous tick (or since the run started).
    pub elapsed_ms: u32,
    /// Instantaneous frame rate.  `None` when `elapsed_ms` is zero.
    pub rate_fps: Option<f32>,
}

/// Per-poll knob report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyReport {
    /// Raw 16-bit knob reading.
    pub raw: u16,
    /// Linear scaling of `raw` before the floor is applied.
    pub scaled_hz: u8,
    /// The TargetFrequency stored for the next run.
    pub target_hz: u8,
}
