//! Display reporter — renders typed reports on the 128×64 status panel.
//!
//! The domain hands over [`Report`] values; every string drawn on the panel
//! is formatted here.  Text is built in fixed-capacity `heapless::String`s
//! so rendering never allocates.
//!
//! ```text
//!  y=0   beck-view            (welcome only)
//!  y=8   projector
//!  y=25  Frame 42      | EOF reached | Press button
//!  y=35  FPS   5.00    | Frames 120  | to start
//!  y=45                              | projector
//!  y=55  FPS    5      (knob, while idle)
//! ```

use core::fmt::Write;

use heapless::String;
use log::warn;

use crate::app::events::{FrameReport, FrequencyReport, Report};
use crate::app::ports::{ReportSink, TextDisplay};

/// Longest line the panel can show (128 px / 8 px glyphs).
const LINE_CAP: usize = 16;

const ROW_TITLE: i32 = 0;
const ROW_SUBTITLE: i32 = 8;
const ROW_MAIN: i32 = 25;
const ROW_DETAIL: i32 = 35;
const ROW_HINT: i32 = 45;
const ROW_FREQUENCY: i32 = 55;

/// [`ReportSink`] that draws on a [`TextDisplay`].
pub struct DisplayReporter<D: TextDisplay> {
    display: D,
}

impl<D: TextDisplay> DisplayReporter<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }

    /// Borrow the underlying panel.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Boot screen, shown until the first run.
    pub fn show_welcome(&mut self) {
        self.display.clear();
        self.display.draw_text("beck-view", 0, ROW_TITLE);
        self.display.draw_text("projector", 0, ROW_SUBTITLE);
        self.display.draw_text("Press button", 0, ROW_MAIN);
        self.display.draw_text("to start", 0, ROW_DETAIL);
        self.display.draw_text("projector", 0, ROW_HINT);
        self.display.present();
    }

    fn show_frame(&mut self, f: &FrameReport) {
        let mut count: String<LINE_CAP> = String::new();
        let mut rate: String<LINE_CAP> = String::new();
        let ok = write!(count, "Frame {}", f.frame).is_ok()
            && match f.rate_fps {
                Some(fps) => write!(rate, "FPS   {:.2}", fps).is_ok(),
                None => rate.push_str("FPS   -.--").is_ok(),
            };
        if !ok {
            warn!("display: frame line truncated");
        }
        self.display.clear();
        self.display.draw_text(&count, 0, ROW_MAIN);
        self.display.draw_text(&rate, 0, ROW_DETAIL);
        self.display.present();
    }

    fn show_end_of_film(&mut self, total_frames: u32) {
        let mut total: String<LINE_CAP> = String::new();
        if write!(total, "Frames {}", total_frames).is_err() {
            warn!("display: EOF line truncated");
        }
        self.display.clear();
        self.display.draw_text("EOF reached", 0, ROW_MAIN);
        self.display.draw_text(&total, 0, ROW_DETAIL);
        self.display.present();
    }

    /// Only the bottom row is redrawn; the rest of the screen is kept.
    fn show_frequency(&mut self, r: &FrequencyReport) {
        let mut line: String<LINE_CAP> = String::new();
        if write!(line, "FPS   {:2}", r.scaled_hz).is_err() {
            warn!("display: frequency line truncated");
        }
        self.display.draw_text(&line, 0, ROW_FREQUENCY);
        self.display.present();
    }
}

impl<D: TextDisplay> ReportSink for DisplayReporter<D> {
    fn report(&mut self, report: &Report) {
        match report {
            Report::Ready => self.show_welcome(),
            Report::Frame(f) => self.show_frame(f),
            Report::EndOfFilm { total_frames } => self.show_end_of_film(*total_frames),
            Report::Frequency(r) => self.show_frequency(r),
            Report::StateChanged { .. } => {}
        }
    }
}

/// Fans one report out to two sinks (panel + serial log on target).
pub struct Tee<A, B>(pub A, pub B);

impl<A: ReportSink, B: ReportSink> ReportSink for Tee<A, B> {
    fn report(&mut self, report: &Report) {
        self.0.report(report);
        self.1.report(report);
    }
}
