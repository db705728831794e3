//! Mock hardware adapter for integration tests.
//!
//! Records every signal and timer call against a virtual microsecond clock,
//! so tests can assert on pulse timing without real GPIO or esp_timer.
//! The periodic timer accumulates expiries as virtual time advances,
//! including time spent inside a pulse hold.

use beckview::app::events::Report;
use beckview::app::ports::{ClockPort, KnobPort, Line, ReportSink, SignalPort, TimerPort};
use beckview::app::service::ProjectorService;
use beckview::events::RequestConsumer;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Set { line: Line, active: bool, at_ms: u32 },
    Hold { ms: u32 },
    TimerStart { hz: u32 },
    TimerStop,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<Call>,
    pub knob: u16,
    /// `start_periodic` while already armed.
    pub timer_overlaps: u32,
    now_us: u64,
    period_us: Option<u64>,
    next_expiry_us: u64,
    pending: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            knob: 0,
            timer_overlaps: 0,
            now_us: 0,
            period_us: None,
            next_expiry_us: 0,
            pending: 0,
        }
    }

    /// Move virtual time forward, counting timer expiries on the way.
    pub fn advance_us(&mut self, us: u64) {
        let until = self.now_us + us;
        if let Some(period) = self.period_us {
            while self.next_expiry_us <= until {
                self.pending += 1;
                self.next_expiry_us += period;
            }
        }
        self.now_us = until;
    }

    pub fn advance_ms(&mut self, ms: u32) {
        self.advance_us(u64::from(ms) * 1_000);
    }

    pub fn armed_hz(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::TimerStart { hz } => Some(Some(*hz)),
            Call::TimerStop => Some(None),
            _ => None,
        })?
    }

    /// Times at which `line` went active.
    pub fn assertions(&self, line: Line) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Set { line: l, active: true, at_ms } if *l == line => Some(*at_ms),
                _ => None,
            })
            .collect()
    }

    pub fn frame_pulses(&self) -> usize {
        self.assertions(Line::Frame).len()
    }

    pub fn eof_pulses(&self) -> usize {
        self.assertions(Line::EndOfFilm).len()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalPort for MockHardware {
    fn set_line(&mut self, line: Line, active: bool) {
        let at_ms = self.now_ms();
        self.calls.push(Call::Set { line, active, at_ms });
    }

    fn hold_ms(&mut self, ms: u32) {
        self.calls.push(Call::Hold { ms });
        self.advance_ms(ms);
    }
}

impl TimerPort for MockHardware {
    fn start_periodic(&mut self, freq_hz: u32) {
        if self.period_us.is_some() {
            self.timer_overlaps += 1;
        }
        let period = 1_000_000 / u64::from(freq_hz.max(1));
        self.period_us = Some(period);
        self.next_expiry_us = self.now_us + period;
        self.pending = 0;
        self.calls.push(Call::TimerStart { hz: freq_hz });
    }

    fn stop(&mut self) {
        self.period_us = None;
        self.pending = 0;
        self.calls.push(Call::TimerStop);
    }

    fn is_armed(&self) -> bool {
        self.period_us.is_some()
    }

    fn take_ticks(&mut self) -> u32 {
        core::mem::take(&mut self.pending)
    }
}

impl ClockPort for MockHardware {
    fn now_ms(&self) -> u32 {
        (self.now_us / 1_000) as u32
    }
}

impl KnobPort for MockHardware {
    fn read_knob(&mut self) -> u16 {
        self.knob
    }
}

// ── Report recorder ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub reports: Vec<Report>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_numbers(&self) -> Vec<u32> {
        self.reports
            .iter()
            .filter_map(|r| match r {
                Report::Frame(f) => Some(f.frame),
                _ => None,
            })
            .collect()
    }

    pub fn eof_totals(&self) -> Vec<u32> {
        self.reports
            .iter()
            .filter_map(|r| match r {
                Report::EndOfFilm { total_frames } => Some(*total_frames),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn report(&mut self, report: &Report) {
        self.reports.push(*report);
    }
}

// ── Run loop ──────────────────────────────────────────────────

/// Step the cooperative run loop in 1 ms increments of virtual time.
#[allow(dead_code)]
pub fn run_for(
    app: &mut ProjectorService,
    requests: &mut RequestConsumer<'_>,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    ms: u32,
) {
    for _ in 0..ms {
        hw.advance_ms(1);
        app.run_pending(requests, hw, sink);
    }
}
