//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to               |
//! |-------------|-------------------------|---------------------------|
//! | `display`   | ReportSink              | TextDisplay (status OLED) |
//! | `hardware`  | SignalPort, TimerPort   | ESP32 GPIO, esp_timer     |
//! |             | ClockPort, KnobPort     | ESP32 ADC, system timer   |
//! | `log_sink`  | ReportSink              | Serial log output         |
//! | `time`      | ClockPort               | ESP32 system timer        |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod time;
