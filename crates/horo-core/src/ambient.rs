//! Ambient animation shown while no wall-clock time is available yet.
//!
//! Each tick repaints the whole scene from scratch: concentric circle and
//! square outlines around the panel center and four full-span lines, every
//! outline in a fresh random color. The scene keeps no state besides its
//! random generator, so a tick that fails to present can simply be dropped
//! and the next one paints a complete frame again.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use rand_core::RngCore;

use crate::frame::SCREEN_SIZE_PX;
use crate::surface::Surface;

/// Outline rings drawn per frame, also the number of square outlines.
const RING_COUNT: u32 = 4;
/// Radius of the innermost circle; each ring grows by the same step.
const RING_BASE_RADIUS: u32 = 10;
const RING_RADIUS_STEP: u32 = 30;
/// Side of the innermost square; each square grows by the same step.
const SQUARE_BASE_SIDE: u32 = 30;
const SQUARE_SIDE_STEP: u32 = 60;

pub struct AmbientScene<R> {
    rng: R,
}

impl<R: RngCore> AmbientScene<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn random_color(&mut self) -> Rgb565 {
        Rgb565::from(RawU16::new(self.rng.next_u32() as u16))
    }

    /// Paint one full frame of the scene and present it in a single flush.
    pub fn tick<S>(&mut self, surface: &mut S) -> Result<(), S::Error>
    where
        S: Surface,
    {
        let size = i32::from(SCREEN_SIZE_PX);
        let center = Point::new(size / 2, size / 2);

        surface.clear(Rgb565::BLACK)?;

        for ring in 0..RING_COUNT {
            let radius = RING_BASE_RADIUS + ring * RING_RADIUS_STEP;
            let style = PrimitiveStyle::with_stroke(self.random_color(), 1);
            Circle::with_center(center, radius * 2 + 1)
                .into_styled(style)
                .draw(surface)?;
        }

        for ring in 0..RING_COUNT {
            let side = SQUARE_BASE_SIDE + ring * SQUARE_SIDE_STEP;
            let style = PrimitiveStyle::with_stroke(self.random_color(), 1);
            let corner = center - Size::new_equal(side) / 2;
            Rectangle::new(corner, Size::new_equal(side))
                .into_styled(style)
                .draw(surface)?;
        }

        let edge = size - 1;
        let spans = [
            (Point::new(0, 0), Point::new(edge, edge)),
            (Point::new(edge, 0), Point::new(0, edge)),
            (Point::new(0, center.y), Point::new(edge, center.y)),
            (Point::new(center.x, 0), Point::new(center.x, edge)),
        ];
        for (start, end) in spans {
            let style = PrimitiveStyle::with_stroke(self.random_color(), 1);
            Line::new(start, end).into_styled(style).draw(surface)?;
        }

        surface.flush()
    }
}
