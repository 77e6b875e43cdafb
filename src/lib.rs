//! Core library for the device self-test suite.
//!
//! This library contains the orchestration engine, the probe contract and
//! its concrete hardware checks, and the platform capability layer. It is
//! used by the CLI binary and by integration tests, which drive the whole
//! suite against a scripted mock platform.

pub mod config;
pub mod core;
pub mod device_info;
pub mod dialog;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod probes;
pub mod progress;
pub mod registry;
pub mod timeout;
