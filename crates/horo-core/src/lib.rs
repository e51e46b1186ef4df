//! Hardware-independent core of the horo-rs analog clock.
//!
//! Everything needed to render and incrementally update the clock lives here:
//! the hand geometry, the static face renderer, the hand tracker that erases
//! and redraws only the moving strokes each second, and the frame/surface
//! plumbing that batches changed pixels into a single window per flush.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets (ESP32-S3) and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod ambient;
pub mod face;
pub mod frame;
pub mod geometry;
pub mod hands;
pub mod palette;
pub mod screen;
pub mod surface;
#[cfg(test)]
mod testing;
pub mod time;
