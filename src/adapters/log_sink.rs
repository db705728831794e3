//! Log-based report sink adapter.
//!
//! Implements [`ReportSink`] by writing controller reports to the ESP-IDF
//! logger (UART / USB-CDC in production).  The display adapter implements
//! the same trait.

use log::{info, warn};

use crate::app::events::Report;
use crate::app::ports::ReportSink;

/// Adapter that logs every [`Report`] to the serial console.
#[derive(Default)]
pub struct LogReportSink;

impl LogReportSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for LogReportSink {
    fn report(&mut self, report: &Report) {
        match report {
            Report::Ready => {
                info!("READY | press start");
            }
            Report::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            Report::Frame(f) => match f.rate_fps {
                Some(fps) => info!(
                    "FRAME | n={} | dt={}ms | {:.2} fps",
                    f.frame, f.elapsed_ms, fps
                ),
                None => warn!("FRAME | n={} | dt={}ms | rate n/a", f.frame, f.elapsed_ms),
            },
            Report::EndOfFilm { total_frames } => {
                info!("EOF   | total_frames={}", total_frames);
            }
            Report::Frequency(r) => {
                info!(
                    "FREQ  | raw={} | scaled={}Hz | target={}Hz",
                    r.raw, r.scaled_hz, r.target_hz
                );
            }
        }
    }
}
