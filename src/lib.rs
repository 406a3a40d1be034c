//! Airlink firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod sensors;
pub mod wire;

// The BLE adapter compiles on every target; the Bluedroid-backed paths
// inside it are cfg-gated to ESP-IDF.
pub mod adapters;
