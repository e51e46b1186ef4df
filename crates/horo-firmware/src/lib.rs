//! ESP32-S3 firmware-specific modules for horo-rs
//!
//! This crate contains hardware-specific code that cannot compile on desktop
//! targets: ESP32 peripheral initialization, WiFi bring-up, the SNTP sync
//! task and the wall clock derived from it, and the panel error adapter.

#![no_std]

extern crate alloc;

pub mod net;
pub mod panel;
pub mod wall_clock;
