//! Signal line drivers, the periodic timer, the status display and hardware
//! initialisation.

pub mod hw_init;
pub mod hw_timer;
pub mod signal_line;
pub mod ssd1306;
