//! Custom error types for the application.
//!
//! This module defines the primary error type, `SelfTestError`, for the entire
//! suite. Using the `thiserror` crate, it provides a centralized and consistent
//! way to handle the few conditions that are genuine errors rather than probe
//! outcomes.
//!
//! ## Error Hierarchy
//!
//! `SelfTestError` is an enum that consolidates the error sources:
//!
//! - **`Config`**: Wraps errors from the `figment` crate, typically related to
//!   file parsing or malformed values in the configuration file.
//! - **`Configuration`**: Represents semantic errors in the configuration, such
//!   as values that parse but are logically invalid (e.g., a coverage threshold
//!   above 1.0). These are caught during the validation step.
//! - **`Io`**: Wraps standard `std::io::Error`, covering config file access and
//!   console I/O.
//! - **`RunInProgress`**: Returned when `start()` is called while a run is
//!   already executing. The in-flight run is unaffected.
//! - **`ResetWhileRunning`**: Returned when `reset()` is called before the run
//!   has reached its completed state.
//! - **`Registry`**: A misconfigured probe registry (e.g., the configuration
//!   names an unknown probe kind). This is a programming/configuration bug and
//!   surfaces immediately rather than being swallowed into a verdict.
//!
//! Probe failures are deliberately NOT represented here: within a run, every
//! probe rejection or timeout is captured as a failing `Verdict` rather than
//! an error that exits the run loop.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, SelfTestError>;

/// Top-level error type for the self-test suite.
#[derive(Error, Debug)]
pub enum SelfTestError {
    /// Configuration file could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration parsed but failed semantic validation.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// I/O error from config access or console interaction.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A run is already executing; `start()` is not re-entrant.
    #[error("A test run is already in progress")]
    RunInProgress,

    /// `reset()` is only valid once the run has completed.
    #[error("Cannot reset while a test run is in progress")]
    ResetWhileRunning,

    /// The probe registry is misconfigured (unknown probe kind, etc.).
    #[error("Probe registry error: {0}")]
    Registry(String),
}
