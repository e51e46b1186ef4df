//! Pure hand geometry: clock units to pixel endpoints.
//!
//! A hand position is a unit on a dial (hour 0..=11, minute/second 0..=59).
//! Unit zero points straight up and units advance clockwise. All results are
//! truncated toward zero, and every function here is a pure function of its
//! arguments, so an erase pass recomputing the geometry of an earlier draw
//! pass lands on exactly the same pixels.

use embedded_graphics::prelude::*;
use libm::{cosf, sinf};

/// Units in one revolution of the hour hand.
pub const HOUR_UNITS: u32 = 12;
/// Units in one revolution of the minute and second hands.
pub const MINUTE_UNITS: u32 = 60;

const TAU: f32 = core::f32::consts::TAU;

/// One line segment of a hand stroke, in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// Pixel endpoint of a hand of `length` at `unit` out of `units_per_rev`.
///
/// Computed as `center + length * (sin θ, -cos θ)` with
/// `θ = unit * 2π / units_per_rev`, so unit zero is the top of the dial.
/// Units outside `0..units_per_rev` are fine; the angle simply wraps.
pub fn hand_endpoint(unit: i32, units_per_rev: u32, length: u32, center: Point) -> Point {
    let theta = unit as f32 * TAU / units_per_rev as f32;
    Point::new(
        center.x + (length as f32 * sinf(theta)) as i32,
        center.y - (length as f32 * cosf(theta)) as i32,
    )
}

/// Two-segment stroke for the hour and minute hands.
///
/// The tails sit a quarter revolution to either side of the tip at the short
/// `tail_length`, and both segments converge on the tip. The spread fakes a
/// tapered hand without filling a polygon.
pub fn tailed_stroke(
    unit: i32,
    units_per_rev: u32,
    length: u32,
    tail_length: u32,
    center: Point,
) -> [Segment; 2] {
    let quarter = units_per_rev as i32 / 4;
    let tip = hand_endpoint(unit, units_per_rev, length, center);
    [
        Segment {
            start: hand_endpoint(unit - quarter, units_per_rev, tail_length, center),
            end: tip,
        },
        Segment {
            start: hand_endpoint(unit + quarter, units_per_rev, tail_length, center),
            end: tip,
        },
    ]
}

/// Single-segment stroke for the second hand, pivot to tip.
pub fn center_stroke(unit: i32, units_per_rev: u32, length: u32, center: Point) -> Segment {
    Segment {
        start: center,
        end: hand_endpoint(unit, units_per_rev, length, center),
    }
}
