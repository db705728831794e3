//! beck-view projector controller — Main Entry Point
//!
//! Hexagonal architecture with interrupt-driven requests and a cooperative
//! run loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          DisplayReporter    LogReportSink     │
//! │  (Signal+Timer+Clock+Knob) (ReportSink)      (ReportSink)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ProjectorService (pure logic)               │    │
//! │  │  FSM · SignalGenerator · FrequencyMonitor              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Button ISRs ──▶ request slot ──▶ run loop ◀── timer ticks     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{config::Config as SpiConfig, SpiDeviceDriver, SpiDriverConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info};

use beckview::adapters::display::{DisplayReporter, Tee};
use beckview::adapters::hardware::{HardwareAdapter, SignalLines};
use beckview::adapters::log_sink::LogReportSink;
use beckview::adapters::time::Esp32TimeAdapter;
use beckview::app::service::ProjectorService;
use beckview::config::ProjectorConfig;
use beckview::drivers::hw_init::{self, GpioOutput};
use beckview::drivers::hw_timer::HwTimer;
use beckview::drivers::signal_line::SignalLine;
use beckview::drivers::ssd1306::Ssd1306;
use beckview::events::InterruptBridge;
use beckview::pins;
use beckview::sensors::frequency_pot::FrequencyPot;

/// Pending-request storage.  Split once in `main`; the producer half is handed
/// to the button ISRs, the consumer half stays with the run loop.
static mut BRIDGE: InterruptBridge = InterruptBridge::new();

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  beck-view projector v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ProjectorConfig::load();
    info!(
        "Config: default={} Hz, range={}..={} Hz, knob poll={} Hz",
        config.default_frequency_hz,
        config.min_frequency_hz,
        config.max_frequency_hz,
        config.monitor_poll_hz
    );

    // ── 3. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is fatal — log and halt.
        error!("HAL init failed: {} — halting", e);
        loop {
            FreeRtos::delay_ms(1000);
        }
    }

    let mut hw = HardwareAdapter::new(
        SignalLines {
            status: SignalLine::active_high(GpioOutput::new(pins::STATUS_LED_GPIO), "status"),
            frame: SignalLine::active_low(GpioOutput::new(pins::FRAME_SIGNAL_GPIO), "frame"),
            eof: SignalLine::active_low(GpioOutput::new(pins::EOF_SIGNAL_GPIO), "eof"),
        },
        Ets,
        HwTimer::new().map_err(|e| anyhow::anyhow!("{e}"))?,
        Esp32TimeAdapter::new(),
        FrequencyPot::new(pins::FREQUENCY_POT_ADC_CHANNEL),
    );
    hw.boot_indicator();

    // ── 4. Status display ─────────────────────────────────────
    let peripherals = Peripherals::take()?;
    // SAFETY: the OLED pins are claimed here only; no other driver uses them.
    let (sck, mosi, cs, dc, rst) = unsafe {
        (
            AnyIOPin::new(pins::OLED_SCK_GPIO),
            AnyIOPin::new(pins::OLED_MOSI_GPIO),
            AnyIOPin::new(pins::OLED_CS_GPIO),
            AnyOutputPin::new(pins::OLED_DC_GPIO),
            AnyOutputPin::new(pins::OLED_RST_GPIO),
        )
    };
    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        sck,
        mosi,
        Option::<AnyIOPin>::None,
        Some(cs),
        &SpiDriverConfig::new(),
        &SpiConfig::new().baudrate(Hertz(pins::OLED_SPI_FREQ_HZ)),
    )?;
    let dc = PinDriver::output(dc)?;
    let mut rst = PinDriver::output(rst)?;
    let mut panel = Ssd1306::new(spi, dc);
    if let Err(e) = panel.init(&mut rst, &mut Ets) {
        error!("Display init failed: {} — continuing without panel output", e);
    }
    let mut sink = Tee(DisplayReporter::new(panel), LogReportSink::new());

    // ── 5. Interrupt bridge + ISRs ────────────────────────────
    // SAFETY: BRIDGE is borrowed exactly once, here, before any ISR is
    // registered; both halves live for the rest of the program.
    let (producer, mut requests) = unsafe { (*(&raw mut BRIDGE)).split() };
    if let Err(e) = hw_init::init_isr_service(producer) {
        error!("ISR service init failed: {} — halting", e);
        loop {
            FreeRtos::delay_ms(1000);
        }
    }

    // ── 6. Controller ─────────────────────────────────────────
    let idle_poll_ms = config.idle_poll_ms;
    let mut app = ProjectorService::new(config);
    app.start(&mut hw, &mut sink);

    info!("System ready. Entering run loop.");

    // ── 7. Run loop ───────────────────────────────────────────
    loop {
        app.run_pending(&mut requests, &mut hw, &mut sink);
        FreeRtos::delay_ms(idle_poll_ms);
    }
}
