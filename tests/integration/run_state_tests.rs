//! Integration tests for the ProjectorService → FSM → signal lines pipeline.

use super::mock_hw::{Call, MockHardware, RecordingSink, run_for};

use beckview::app::events::Report;
use beckview::app::ports::Line;
use beckview::app::service::ProjectorService;
use beckview::config::ProjectorConfig;
use beckview::events::{InterruptBridge, Request};
use beckview::fsm::RunState;
use beckview::fsm::context::{FrameCounter, TimerRole};

fn make_app() -> (ProjectorService, MockHardware, RecordingSink) {
    let mut app = ProjectorService::new(ProjectorConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_reports_ready_and_arms_monitor() {
    let (app, hw, sink) = make_app();
    assert_eq!(app.state(), RunState::Idle);
    assert_eq!(app.frame_counter(), FrameCounter::IDLE);
    assert_eq!(app.timer_owner(), Some(TimerRole::Monitor));
    assert_eq!(hw.armed_hz(), Some(5));
    assert_eq!(sink.reports, [Report::Ready]);
}

// ── Five frames at 5 Hz ───────────────────────────────────────

#[test]
fn five_ticks_then_stop() {
    let (mut app, mut hw, mut sink) = make_app();

    assert!(app.enter_running(&mut hw, &mut sink));
    assert_eq!(app.frame_counter(), FrameCounter::zero());
    assert_eq!(hw.armed_hz(), Some(5));

    for _ in 0..5 {
        hw.advance_ms(200);
        app.on_timer_tick(&mut hw, &mut sink);
    }
    assert_eq!(app.frame_counter().value(), 5);

    assert!(app.enter_idle(&mut hw, &mut sink));

    assert_eq!(sink.frame_numbers(), [0, 1, 2, 3, 4]);
    assert_eq!(sink.eof_totals(), [5]);
    assert_eq!(app.frame_counter(), FrameCounter::IDLE);
    assert_eq!(app.timer_owner(), Some(TimerRole::Monitor));
    assert_eq!(hw.armed_hz(), Some(5));
    assert_eq!(hw.frame_pulses(), 5);
    assert_eq!(hw.eof_pulses(), 1);
}

#[test]
fn frame_pulse_sequence_is_status_line_hold_release() {
    let (mut app, mut hw, mut sink) = make_app();
    app.enter_running(&mut hw, &mut sink);
    hw.calls.clear();

    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);

    let sequence: Vec<_> = hw
        .calls
        .iter()
        .map(|c| match c {
            Call::Set { line, active, .. } => Call::Set { line: *line, active: *active, at_ms: 0 },
            other => *other,
        })
        .collect();
    assert_eq!(
        sequence,
        [
            Call::Set { line: Line::Status, active: true, at_ms: 0 },
            Call::Set { line: Line::Frame, active: true, at_ms: 0 },
            Call::Hold { ms: 8 },
            Call::Set { line: Line::Frame, active: false, at_ms: 0 },
            Call::Set { line: Line::Status, active: false, at_ms: 0 },
        ]
    );
}

#[test]
fn frame_reports_carry_elapsed_and_rate() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.advance_ms(1_000);
    app.enter_running(&mut hw, &mut sink);
    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);

    let frame = sink.reports.iter().find_map(|r| match r {
        Report::Frame(f) => Some(*f),
        _ => None,
    });
    let frame = frame.expect("one frame report");
    assert_eq!(frame.frame, 0);
    assert_eq!(frame.elapsed_ms, 200);
    assert_eq!(frame.rate_fps, Some(5.0));
    assert_eq!(app.last_tick_ms(), 1_200);
}

#[test]
fn zero_elapsed_tick_has_no_rate() {
    let (mut app, mut hw, mut sink) = make_app();
    app.enter_running(&mut hw, &mut sink);
    app.on_timer_tick(&mut hw, &mut sink);

    assert!(sink.reports.iter().any(|r| matches!(
        r,
        Report::Frame(f) if f.elapsed_ms == 0 && f.rate_fps.is_none()
    )));
    assert_eq!(app.frame_counter().value(), 1);
}

// ── Knob fully down ───────────────────────────────────────────

#[test]
fn knob_at_zero_is_floored_to_one_hz() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.knob = 0;
    app.on_timer_tick(&mut hw, &mut sink);

    assert!(sink.reports.contains(&Report::Frequency(beckview::app::events::FrequencyReport {
        raw: 0,
        scaled_hz: 0,
        target_hz: 1,
    })));
    assert_eq!(app.target_frequency(), 1);

    app.enter_running(&mut hw, &mut sink);
    assert_eq!(hw.armed_hz(), Some(1));
    assert_eq!(app.running_frequency(), 1);
}

#[test]
fn knob_at_full_scale_gives_24_hz() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.knob = u16::MAX;
    app.on_timer_tick(&mut hw, &mut sink);
    assert_eq!(app.target_frequency(), 24);
}

#[test]
fn knob_ignored_while_running() {
    let (mut app, mut hw, mut sink) = make_app();
    app.enter_running(&mut hw, &mut sink);
    hw.knob = u16::MAX;
    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);
    assert_eq!(app.target_frequency(), 5);
    assert!(!sink.reports.iter().any(|r| matches!(r, Report::Frequency(_))));
}

// ── Duplicate and alternating edges ───────────────────────────

#[test]
fn two_queued_start_edges_make_one_transition() {
    let mut bridge = InterruptBridge::new();
    let (mut tx, mut rx) = bridge.split();
    let (mut app, mut hw, mut sink) = make_app();

    tx.on_start_edge();
    tx.on_start_edge();
    app.run_pending(&mut rx, &mut hw, &mut sink);

    let transitions = sink
        .reports
        .iter()
        .filter(|r| matches!(r, Report::StateChanged { .. }))
        .count();
    assert_eq!(transitions, 1);
    assert_eq!(app.state(), RunState::Running);
}

#[test]
fn burst_of_alternating_edges_ends_on_last_edge() {
    let mut bridge = InterruptBridge::new();
    let (mut tx, mut rx) = bridge.split();
    let (mut app, mut hw, mut sink) = make_app();

    for _ in 0..4 {
        tx.on_start_edge();
        tx.on_stop_edge();
    }
    app.run_pending(&mut rx, &mut hw, &mut sink);
    assert_eq!(app.state(), RunState::Idle);
    assert_eq!(hw.eof_pulses(), 1);
    assert_eq!(sink.eof_totals(), [0]);

    for _ in 0..4 {
        tx.on_stop_edge();
        tx.on_start_edge();
    }
    app.run_pending(&mut rx, &mut hw, &mut sink);
    assert_eq!(app.state(), RunState::Running);
    assert_eq!(hw.eof_pulses(), 1);
}

#[test]
fn duplicate_start_does_not_reset_run() {
    let (mut app, mut hw, mut sink) = make_app();
    app.enter_running(&mut hw, &mut sink);
    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);
    let last_tick = app.last_tick_ms();

    hw.advance_ms(50);
    assert!(!app.handle_request(Request::EnterRunning, &mut hw, &mut sink));
    assert_eq!(app.frame_counter().value(), 1);
    assert_eq!(app.last_tick_ms(), last_tick);
    assert_eq!(app.request_counts(), (1, 1));
}

#[test]
fn stop_while_idle_emits_no_eof() {
    let (mut app, mut hw, mut sink) = make_app();
    assert!(!app.enter_idle(&mut hw, &mut sink));
    assert_eq!(hw.eof_pulses(), 0);
    assert!(sink.eof_totals().is_empty());
}

#[test]
fn start_stop_start_runs_fresh() {
    let (mut app, mut hw, mut sink) = make_app();
    app.enter_running(&mut hw, &mut sink);
    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);
    app.enter_idle(&mut hw, &mut sink);

    app.enter_running(&mut hw, &mut sink);
    assert_eq!(app.frame_counter(), FrameCounter::zero());
    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);
    app.enter_idle(&mut hw, &mut sink);

    assert_eq!(sink.frame_numbers(), [0, 0]);
    assert_eq!(sink.eof_totals(), [1, 1]);
}

// ── Run loop ──────────────────────────────────────────────────

#[test]
fn stop_edge_cancels_generator_synchronously() {
    let mut bridge = InterruptBridge::new();
    let (mut tx, mut rx) = bridge.split();
    let (mut app, mut hw, mut sink) = make_app();

    tx.on_start_edge();
    run_for(&mut app, &mut rx, &mut hw, &mut sink, 1_000);
    let pulses = hw.frame_pulses();
    assert!(pulses >= 4, "expected ~5 pulses in one second, got {pulses}");

    // An expiry is pending when the stop edge arrives.
    hw.advance_ms(200);
    tx.on_stop_edge();
    app.run_pending(&mut rx, &mut hw, &mut sink);

    assert_eq!(hw.frame_pulses(), pulses);
    assert_eq!(hw.eof_pulses(), 1);
    assert_eq!(app.state(), RunState::Idle);
}

#[test]
fn timer_never_held_twice() {
    let mut bridge = InterruptBridge::new();
    let (mut tx, mut rx) = bridge.split();
    let (mut app, mut hw, mut sink) = make_app();

    for _ in 0..4 {
        tx.on_start_edge();
        run_for(&mut app, &mut rx, &mut hw, &mut sink, 333);
        tx.on_stop_edge();
        run_for(&mut app, &mut rx, &mut hw, &mut sink, 250);
    }

    assert_eq!(hw.timer_overlaps, 0);
    assert_eq!(hw.eof_pulses(), 4);
    // monitor poll reports only appear while idle
    let mut running = false;
    for r in &sink.reports {
        match r {
            Report::StateChanged { to, .. } => running = *to == RunState::Running,
            Report::Frequency(_) => assert!(!running),
            Report::Frame(_) => assert!(running),
            _ => {}
        }
    }
}

#[test]
fn idle_monitor_polls_at_five_hz() {
    let mut bridge = InterruptBridge::new();
    let (_tx, mut rx) = bridge.split();
    let (mut app, mut hw, mut sink) = make_app();
    hw.knob = 32_768;

    run_for(&mut app, &mut rx, &mut hw, &mut sink, 1_000);

    let polls = sink
        .reports
        .iter()
        .filter(|r| matches!(r, Report::Frequency(_)))
        .count();
    assert_eq!(polls, 5);
    assert_eq!(app.target_frequency(), 12);
}
