//! Unified error types for the beck-view controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! run loop's error handling uniform.  All variants are `Copy` so they can be
//! logged and passed around without allocation.
//!
//! Most of the controller never fails: duplicate requests and zero-length tick
//! intervals are absorbed locally.  What remains is hardware bring-up and
//! configuration, which are fatal or fall back to defaults respectively.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// A signal line write failed.
    Signal(SignalError),
    /// The periodic timer could not be created, started or stopped.
    Timer(i32),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Signal(e) => write!(f, "signal: {e}"),
            Self::Timer(rc) => write!(f, "timer: rc={rc}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The embedded JSON override did not parse.
    Malformed,
    /// A field failed range validation; the string names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed JSON"),
            Self::ValidationFailed(field) => write!(f, "validation failed: {field}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Signal line errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The GPIO driver rejected a level change.
    GpioWriteFailed(&'static str),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed(line) => write!(f, "GPIO write failed on {line}"),
        }
    }
}

impl From<SignalError> for Error {
    fn from(e: SignalError) -> Self {
        Self::Signal(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
