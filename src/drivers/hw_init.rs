//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC channel, GPIO directions and the GPIO ISR service
//! using raw ESP-IDF sys calls. Called once from `main()` before the run
//! loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

use crate::events::RequestProducer;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::AdcInitFailed(_) => Self::Init("adc"),
            HwInitError::GpioConfigFailed(_) => Self::Init("gpio"),
            HwInitError::IsrInstallFailed(_) => Self::Init("isr"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the run loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// run-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe {
        adc_oneshot_config_channel(adc1_handle(), pins::FREQUENCY_POT_ADC_CHANNEL, &chan_cfg)
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!(
        "hw_init: ADC1 configured (CH{}=speed knob on GPIO {})",
        pins::FREQUENCY_POT_ADC_CHANNEL,
        pins::FREQUENCY_POT_GPIO
    );
    Ok(())
}

/// Raw oneshot reading at native resolution.  Read failures yield 0.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded run-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: ADC1 CH{} read failed (rc={})", channel, ret);
        return 0;
    }
    raw.max(0) as u16
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Buttons: active-low with pull-up, falling edge
    for &pin in &[pins::START_BUTTON_GPIO, pins::STOP_BUTTON_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: GPIO inputs configured (start, stop)");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::STATUS_LED_GPIO,
        pins::FRAME_SIGNAL_GPIO,
        pins::EOF_SIGNAL_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: GPIO outputs configured (status, frame, eof)");
    Ok(())
}

/// Write a configured output.  Returns the ESP-IDF error code on failure.
#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Run loop only.
    let ret = unsafe { gpio_set_level(pin, if high { 1 } else { 0 }) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> Result<(), i32> {
    Ok(())
}

/// A configured output GPIO exposed through `embedded_hal`.
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for GpioOutput {
    type Error = ErrorKind;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        gpio_write(self.pin, false).map_err(|_| ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        gpio_write(self.pin, true).map_err(|_| ErrorKind::Other)
    }
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// ISR-side half of the request slot.  Written once in
/// `init_isr_service()` before the handlers are registered; afterwards only
/// the two button ISRs touch it, and they share one interrupt level so they
/// never preempt each other.
#[cfg(target_os = "espidf")]
static mut ISR_PRODUCER: Option<RequestProducer<'static>> = None;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn start_button_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: see ISR_PRODUCER.
    if let Some(producer) = unsafe { (*(&raw mut ISR_PRODUCER)).as_mut() } {
        producer.on_start_edge();
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn stop_button_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: see ISR_PRODUCER.
    if let Some(producer) = unsafe { (*(&raw mut ISR_PRODUCER)).as_mut() } {
        producer.on_stop_edge();
    }
}

/// Install the per-pin GPIO ISR service and register the button handlers.
/// Call after init_peripherals() and before the run loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(producer: RequestProducer<'static>) -> Result<(), HwInitError> {
    // SAFETY: ISR_PRODUCER is written before any handler is registered.
    // gpio_install_isr_service returns ESP_ERR_INVALID_STATE if already
    // installed, which is acceptable.
    unsafe {
        *(&raw mut ISR_PRODUCER) = Some(producer);

        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(pins::START_BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(pins::START_BUTTON_GPIO, Some(start_button_isr), core::ptr::null_mut());
        if ret != ESP_OK { return Err(HwInitError::IsrInstallFailed(ret)); }
        gpio_intr_enable(pins::START_BUTTON_GPIO);

        gpio_set_intr_type(pins::STOP_BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(pins::STOP_BUTTON_GPIO, Some(stop_button_isr), core::ptr::null_mut());
        if ret != ESP_OK { return Err(HwInitError::IsrInstallFailed(ret)); }
        gpio_intr_enable(pins::STOP_BUTTON_GPIO);

        info!("hw_init: ISR service installed (start, stop)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(_producer: RequestProducer<'static>) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
