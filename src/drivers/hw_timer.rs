//! The single periodic hardware timer, using ESP-IDF's esp_timer API.
//!
//! Whichever state currently owns the timer re-arms it at its own cadence:
//! the knob poll rate while idle, the target frame rate while running.
//! Expiries are counted in a [`TickCounter`] and taken by the run loop.
//! On simulation targets, ticks are injected by hand with [`HwTimer::fire`].
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely touch atomics.

use core::sync::atomic::{AtomicBool, Ordering};

use log::debug;
#[cfg(target_os = "espidf")]
use log::error;

use crate::app::ports::TimerPort;
use crate::events::TickCounter;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Pending expiries.  Incremented by the callback, taken by the run loop.
#[cfg(target_os = "espidf")]
static TIMER_TICKS: TickCounter = TickCounter::new();

/// Cleared before the timer is stopped so an expiry racing with `stop()`
/// is not counted.
static TIMER_ARMED: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
unsafe extern "C" fn periodic_cb(_arg: *mut core::ffi::c_void) {
    if TIMER_ARMED.load(Ordering::Acquire) {
        TIMER_TICKS.signal();
    }
}

/// Microsecond period for `freq_hz`.  A zero frequency is treated as 1 Hz.
pub fn period_us(freq_hz: u32) -> u64 {
    1_000_000 / u64::from(freq_hz.max(1))
}

pub struct HwTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    #[cfg(not(target_os = "espidf"))]
    ticks: TickCounter,
    armed_hz: Option<u32>,
}

impl HwTimer {
    /// Create the timer, disarmed.
    #[cfg(target_os = "espidf")]
    pub fn new() -> crate::error::Result<Self> {
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        let args = esp_timer_create_args_t {
            callback: Some(periodic_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"projector\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        // SAFETY: args outlives the call; handle is written by esp_timer_create.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            error!("hw_timer: create failed (rc={})", ret);
            return Err(crate::error::Error::Timer(ret));
        }
        log::info!("hw_timer: created");
        Ok(Self { handle, armed_hz: None })
    }

    /// Create the simulated timer, disarmed.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> crate::error::Result<Self> {
        Ok(Self {
            ticks: TickCounter::new(),
            armed_hz: None,
        })
    }

    /// Simulate one expiry.  Ignored while disarmed, like the hardware.
    #[cfg(not(target_os = "espidf"))]
    pub fn fire(&self) {
        if self.armed_hz.is_some() {
            self.ticks.signal();
        }
    }

    /// Frequency the timer is armed at.
    pub fn armed_hz(&self) -> Option<u32> {
        self.armed_hz
    }

    fn counter(&self) -> &TickCounter {
        #[cfg(target_os = "espidf")]
        {
            &TIMER_TICKS
        }
        #[cfg(not(target_os = "espidf"))]
        {
            &self.ticks
        }
    }

    #[cfg(target_os = "espidf")]
    fn hw_start(&mut self, period: u64) {
        // SAFETY: handle was created in new() and is owned by self.
        let ret = unsafe { esp_timer_start_periodic(self.handle, period) };
        if ret != ESP_OK {
            error!("hw_timer: start failed (rc={})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn hw_start(&mut self, _period: u64) {}

    #[cfg(target_os = "espidf")]
    fn hw_stop(&mut self) {
        // SAFETY: handle was created in new(); stopping an idle timer only
        // returns ESP_ERR_INVALID_STATE.
        let ret = unsafe { esp_timer_stop(self.handle) };
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            error!("hw_timer: stop failed (rc={})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn hw_stop(&mut self) {}
}

impl TimerPort for HwTimer {
    fn start_periodic(&mut self, freq_hz: u32) {
        if self.armed_hz.is_some() {
            self.stop();
        }
        let period = period_us(freq_hz);
        self.counter().clear();
        TIMER_ARMED.store(true, Ordering::Release);
        self.hw_start(period);
        self.armed_hz = Some(freq_hz);
        debug!("hw_timer: armed @ {} Hz ({} us)", freq_hz, period);
    }

    fn stop(&mut self) {
        TIMER_ARMED.store(false, Ordering::Release);
        self.hw_stop();
        self.counter().clear();
        self.armed_hz = None;
    }

    fn is_armed(&self) -> bool {
        self.armed_hz.is_some()
    }

    fn take_ticks(&mut self) -> u32 {
        self.counter().take()
    }
}

#[cfg(target_os = "espidf")]
impl Drop for HwTimer {
    fn drop(&mut self) {
        self.hw_stop();
        // SAFETY: the timer is stopped; the handle is not used afterwards.
        unsafe { esp_timer_delete(self.handle) };
    }
}
