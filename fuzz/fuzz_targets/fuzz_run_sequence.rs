//! Fuzz target: button / timer / knob interleavings
//!
//! Each input byte is one event: start edge, stop edge, timer expiry, knob
//! move, clock advance or a run-loop drain.  Verifies:
//! - No panics (including the debug assertion on double timer acquisition)
//! - Exactly one EOF pulse per completed run
//! - The periodic timer is never armed twice
//!
//! cargo fuzz run fuzz_run_sequence

#![no_main]

use beckview::app::events::Report;
use beckview::app::ports::{ClockPort, KnobPort, Line, ReportSink, SignalPort, TimerPort};
use beckview::app::service::ProjectorService;
use beckview::config::ProjectorConfig;
use beckview::events::InterruptBridge;
use beckview::fsm::RunState;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Bench {
    now: u32,
    knob: u16,
    armed: bool,
    overlaps: u32,
    pending: u32,
    eof_pulses: u32,
}

impl SignalPort for Bench {
    fn set_line(&mut self, line: Line, active: bool) {
        if line == Line::EndOfFilm && active {
            self.eof_pulses += 1;
        }
    }
    fn hold_ms(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl TimerPort for Bench {
    fn start_periodic(&mut self, _freq_hz: u32) {
        if self.armed {
            self.overlaps += 1;
        }
        self.armed = true;
        self.pending = 0;
    }
    fn stop(&mut self) {
        self.armed = false;
        self.pending = 0;
    }
    fn is_armed(&self) -> bool {
        self.armed
    }
    fn take_ticks(&mut self) -> u32 {
        core::mem::take(&mut self.pending)
    }
}

impl ClockPort for Bench {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

impl KnobPort for Bench {
    fn read_knob(&mut self) -> u16 {
        self.knob
    }
}

/// Counts Running → Idle transitions and EOF reports.
#[derive(Default)]
struct Tally {
    runs_ended: u32,
    eof_reports: u32,
}

impl ReportSink for Tally {
    fn report(&mut self, report: &Report) {
        match report {
            Report::StateChanged {
                from: RunState::Running,
                to: RunState::Idle,
            } => self.runs_ended += 1,
            Report::EndOfFilm { .. } => self.eof_reports += 1,
            _ => {}
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut bridge = InterruptBridge::new();
    let (mut tx, mut rx) = bridge.split();
    let mut app = ProjectorService::new(ProjectorConfig::default());
    let mut hw = Bench::default();
    let mut sink = Tally::default();
    app.start(&mut hw, &mut sink);

    for &byte in data {
        match byte % 6 {
            0 => tx.on_start_edge(),
            1 => tx.on_stop_edge(),
            2 => {
                if hw.armed {
                    hw.pending += u32::from(byte >> 6) + 1;
                }
            }
            3 => hw.knob = u16::from(byte) << 8,
            4 => hw.now = hw.now.wrapping_add(u32::from(byte)),
            _ => {
                app.run_pending(&mut rx, &mut hw, &mut sink);
            }
        }
    }

    assert_eq!(hw.overlaps, 0);
    assert_eq!(hw.eof_pulses, sink.runs_ended);
    assert_eq!(sink.eof_reports, sink.runs_ended);
});
