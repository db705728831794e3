//! ProjectorService driving the display reporter end to end.

use super::mock_hw::MockHardware;

use beckview::adapters::display::{DisplayReporter, Tee};
use beckview::adapters::log_sink::LogReportSink;
use beckview::app::ports::TextDisplay;
use beckview::app::service::ProjectorService;
use beckview::config::ProjectorConfig;

/// Text surface that keeps what is currently on screen.
#[derive(Default)]
struct ScreenMock {
    lines: Vec<(String, i32)>,
    presents: u32,
}

impl ScreenMock {
    fn text_at(&self, y: i32) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|(_, row)| *row == y)
            .map(|(t, _)| t.as_str())
    }
}

impl TextDisplay for ScreenMock {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn draw_text(&mut self, text: &str, _x: i32, y: i32) {
        self.lines.push((text.to_owned(), y));
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}

#[test]
fn screen_follows_a_run() {
    let mut app = ProjectorService::new(ProjectorConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = Tee(DisplayReporter::new(ScreenMock::default()), LogReportSink::new());

    app.start(&mut hw, &mut sink);
    assert_eq!(sink.0.display().text_at(0), Some("beck-view"));
    assert_eq!(sink.0.display().text_at(25), Some("Press button"));

    app.enter_running(&mut hw, &mut sink);
    hw.advance_ms(200);
    app.on_timer_tick(&mut hw, &mut sink);
    assert_eq!(sink.0.display().text_at(25), Some("Frame 0"));
    assert_eq!(sink.0.display().text_at(35), Some("FPS   5.00"));

    app.enter_idle(&mut hw, &mut sink);
    assert_eq!(sink.0.display().text_at(25), Some("EOF reached"));
    assert_eq!(sink.0.display().text_at(35), Some("Frames 1"));

    hw.knob = u16::MAX;
    app.on_timer_tick(&mut hw, &mut sink);
    assert_eq!(sink.0.display().text_at(55), Some("FPS   24"));
    assert_eq!(sink.0.display().text_at(25), Some("EOF reached"));
}
