//! blehub firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod commands;
pub mod config;
pub mod error;
pub mod gap;
pub mod gatt;
pub mod slots;

pub mod adapters;
