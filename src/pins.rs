//! GPIO / peripheral pin assignments for the projector controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Signal outputs
// ---------------------------------------------------------------------------

/// Status LED, active HIGH.  Lit during every pulse and at boot.
pub const STATUS_LED_GPIO: i32 = 21;
/// OK1 frame-advance line to the digitiser, active LOW (idle HIGH).
pub const FRAME_SIGNAL_GPIO: i32 = 12;
/// End-of-film line to the digitiser, active LOW (idle HIGH).
pub const EOF_SIGNAL_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Button inputs (active-low with internal pull-up, falling-edge IRQ)
// ---------------------------------------------------------------------------

pub const START_BUTTON_GPIO: i32 = 14;
pub const STOP_BUTTON_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Speed knob (10 kΩ potentiometer to ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const FREQUENCY_POT_GPIO: i32 = 4;
pub const FREQUENCY_POT_ADC_CHANNEL: u32 = 3;
/// Native ADC resolution; readings are widened to 16 bits.
pub const ADC_RESOLUTION_BITS: u32 = 12;

// ---------------------------------------------------------------------------
// Status display (SSD1306 128×64 OLED on SPI2)
// ---------------------------------------------------------------------------

pub const OLED_SCK_GPIO: i32 = 6;
pub const OLED_MOSI_GPIO: i32 = 7;
pub const OLED_DC_GPIO: i32 = 8;
pub const OLED_RST_GPIO: i32 = 9;
pub const OLED_CS_GPIO: i32 = 5;
pub const OLED_SPI_FREQ_HZ: u32 = 8_000_000;
