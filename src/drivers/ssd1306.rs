//! SSD1306 128×64 monochrome OLED over SPI.
//!
//! Text is rendered with `embedded-graphics` into a 1 KiB page-ordered frame
//! buffer; [`Ssd1306::flush`] pushes the whole buffer to the panel.  The
//! controller only ever shows a few lines of text, so a full-frame update
//! per report is cheap enough at SPI speeds.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal` SPI and pin traits: on ESP-IDF `main` passes
//! the esp-idf-hal drivers, tests pass recording mocks.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use log::{error, info};

use crate::app::ports::TextDisplay;

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const BUF_LEN: usize = WIDTH * HEIGHT / 8;

/// Power-on command sequence for an internally pumped 128×64 panel.
const INIT_SEQUENCE: &[u8] = &[
    0xAE,       // display off
    0x20, 0x00, // horizontal addressing
    0x40,       // start line 0
    0xA1,       // segment remap
    0xA8, 0x3F, // multiplex 64
    0xC8,       // COM scan descending
    0xD3, 0x00, // display offset
    0xDA, 0x12, // COM pins
    0xD5, 0x80, // clock divide
    0xD9, 0xF1, // pre-charge
    0xDB, 0x30, // VCOMH deselect
    0x81, 0xFF, // contrast
    0xA4,       // follow RAM
    0xA6,       // not inverted
    0x8D, 0x14, // charge pump on
    0xAF,       // display on
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// SPI transfer failed.
    Spi,
    /// DC or RST pin write failed.
    Pin,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi => write!(f, "SPI transfer failed"),
            Self::Pin => write!(f, "control pin write failed"),
        }
    }
}

// ── Frame buffer ──────────────────────────────────────────────

/// Page-ordered 1 bpp buffer: byte `x + (y / 8) * WIDTH`, bit `y % 8`.
pub struct FrameBuffer {
    buf: [u8; BUF_LEN],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self { buf: [0; BUF_LEN] }
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((idx, bit)) = Self::locate(x, y) else {
            return;
        };
        if on {
            self.buf[idx] |= bit;
        } else {
            self.buf[idx] &= !bit;
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> bool {
        Self::locate(x, y).is_some_and(|(idx, bit)| self.buf[idx] & bit != 0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u8)> {
        let x = usize::try_from(x).ok().filter(|&x| x < WIDTH)?;
        let y = usize::try_from(y).ok().filter(|&y| y < HEIGHT)?;
        Some((x + (y / 8) * WIDTH, 1 << (y % 8)))
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

// ── Panel driver ──────────────────────────────────────────────

pub struct Ssd1306<SPI, DC> {
    spi: SPI,
    dc: DC,
    fb: FrameBuffer,
}

impl<SPI: SpiDevice, DC: OutputPin> Ssd1306<SPI, DC> {
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            fb: FrameBuffer::new(),
        }
    }

    /// Hardware reset followed by the power-on sequence.  Leaves the panel
    /// blank and switched on.
    pub fn init<RST, D>(&mut self, rst: &mut RST, delay: &mut D) -> Result<(), DisplayError>
    where
        RST: OutputPin,
        D: DelayNs,
    {
        rst.set_high().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(1);
        rst.set_low().map_err(|_| DisplayError::Pin)?;
        delay.delay_ms(10);
        rst.set_high().map_err(|_| DisplayError::Pin)?;

        self.command(INIT_SEQUENCE)?;
        self.fb.clear();
        self.flush()?;
        info!("ssd1306: {}x{} panel initialised", WIDTH, HEIGHT);
        Ok(())
    }

    /// Push the whole frame buffer to display RAM.
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        self.command(&[0x21, 0x00, (WIDTH - 1) as u8])?;
        self.command(&[0x22, 0x00, (HEIGHT / 8 - 1) as u8])?;
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.spi.write(self.fb.as_bytes()).map_err(|_| DisplayError::Spi)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.fb
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(bytes).map_err(|_| DisplayError::Spi)
    }
}

impl<SPI: SpiDevice, DC: OutputPin> TextDisplay for Ssd1306<SPI, DC> {
    fn clear(&mut self) {
        self.fb.clear();
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        // Opaque background so a shorter line fully replaces a longer one.
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .background_color(BinaryColor::Off)
            .build();
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut self.fb);
    }

    fn present(&mut self) {
        if let Err(e) = self.flush() {
            error!("ssd1306: {}", e);
        }
    }
}
