//! Pulse cadence against the virtual clock, across the whole knob range.

use super::mock_hw::{MockHardware, RecordingSink, run_for};

use beckview::app::events::Report;
use beckview::app::ports::Line;
use beckview::app::service::ProjectorService;
use beckview::config::ProjectorConfig;
use beckview::events::InterruptBridge;

/// Knob position that scales to `hz`.
fn knob_for(hz: u8) -> u16 {
    (u32::from(hz) * u32::from(u16::MAX) / 24) as u16
}

#[test]
fn frame_interval_matches_target_frequency() {
    for hz in 1..=24u8 {
        let mut bridge = InterruptBridge::new();
        let (mut tx, mut rx) = bridge.split();
        let mut app = ProjectorService::new(ProjectorConfig::default());
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);

        hw.knob = knob_for(hz);
        run_for(&mut app, &mut rx, &mut hw, &mut sink, 200);
        assert_eq!(app.target_frequency(), hz, "knob poll for {hz} Hz");

        tx.on_start_edge();
        let period_ms = 1000.0 / f64::from(hz);
        run_for(&mut app, &mut rx, &mut hw, &mut sink, (period_ms * 6.0) as u32 + 1);
        tx.on_stop_edge();
        run_for(&mut app, &mut rx, &mut hw, &mut sink, 1);

        let starts = hw.assertions(Line::Frame);
        assert!(starts.len() >= 5, "{hz} Hz: only {} pulses", starts.len());
        for pair in starts.windows(2) {
            let interval = f64::from(pair[1] - pair[0]);
            assert!(
                (interval - period_ms).abs() <= 1.0,
                "{hz} Hz: interval {interval} ms, expected {period_ms:.2} ms"
            );
        }

        // Every rate after the first frame is close to the target.
        for r in &sink.reports {
            if let Report::Frame(f) = r {
                if f.frame > 0 {
                    let fps = f.rate_fps.unwrap_or(0.0);
                    let err = (f64::from(fps) - f64::from(hz)).abs() / f64::from(hz);
                    assert!(err < 0.05, "{hz} Hz: frame {} rate {fps}", f.frame);
                }
            }
        }
        assert_eq!(hw.eof_pulses(), 1);
    }
}

#[test]
fn eof_pulse_is_held_eight_ms() {
    let mut bridge = InterruptBridge::new();
    let (mut tx, mut rx) = bridge.split();
    let mut app = ProjectorService::new(ProjectorConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);

    tx.on_start_edge();
    run_for(&mut app, &mut rx, &mut hw, &mut sink, 10);
    tx.on_stop_edge();
    run_for(&mut app, &mut rx, &mut hw, &mut sink, 1);

    let asserted = hw.assertions(Line::EndOfFilm);
    assert_eq!(asserted.len(), 1);
    let released = hw
        .calls
        .iter()
        .find_map(|c| match c {
            super::mock_hw::Call::Set { line: Line::EndOfFilm, active: false, at_ms } => Some(*at_ms),
            _ => None,
        })
        .expect("EOF released");
    assert_eq!(released - asserted[0], 8);
}
