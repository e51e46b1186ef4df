//! The static clock face: frame rectangles, dial disk and hour numerals.
//!
//! Drawn once per session, when the first valid time arrives. Afterwards
//! only the hands move; the hand tracker erases its strokes in the face
//! background color, so everything drawn here except the area under the
//! hands stays untouched for the process lifetime.

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::frame::SCREEN_SIZE_PX;
use crate::geometry::{MINUTE_UNITS, hand_endpoint};

/// Inset of the inner frame rectangle from the panel edge.
const BORDER_INSET_PX: u32 = 5;
/// Numerals are drawn with their glyph top this far above the hour mark.
const NUMERAL_RAISE_PX: i32 = 5;
/// Hour numerals, clockwise from the top of the dial.
const NUMERALS: [&str; 12] = [
    "12", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11",
];

/// Immutable face layout and palette, built once at startup.
///
/// The default fills the 240x240 panel: a white dial on a black backdrop
/// inside a double white frame, black hour and minute hands, a red second
/// hand.
#[derive(Debug, Clone)]
pub struct ClockFace {
    pub center: Point,
    pub face_radius: u32,
    pub mark_radius: u32,
    pub hour_len: u32,
    pub minute_len: u32,
    pub second_len: u32,
    pub tail_len: u32,
    pub backdrop: Rgb565,
    pub background: Rgb565,
    pub border: Rgb565,
    pub numeral: Rgb565,
    pub hour_color: Rgb565,
    pub minute_color: Rgb565,
    pub second_color: Rgb565,
    pub font: &'static MonoFont<'static>,
}

impl Default for ClockFace {
    fn default() -> Self {
        let mid = i32::from(SCREEN_SIZE_PX) / 2;
        Self {
            center: Point::new(mid, mid),
            face_radius: 100,
            mark_radius: 80,
            hour_len: 43,
            minute_len: 55,
            second_len: 70,
            tail_len: 3,
            backdrop: Rgb565::BLACK,
            background: Rgb565::WHITE,
            border: Rgb565::WHITE,
            numeral: Rgb565::BLACK,
            hour_color: Rgb565::BLACK,
            minute_color: Rgb565::BLACK,
            second_color: Rgb565::RED,
            font: &FONT_10X20,
        }
    }
}

impl ClockFace {
    /// Draw the static face.
    ///
    /// Layering order matters: backdrop clear, frame rectangles, dial disk,
    /// then numerals on top of the disk.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        target.clear(self.backdrop)?;

        let full = Size::new_equal(u32::from(SCREEN_SIZE_PX));
        let frame_style = PrimitiveStyle::with_stroke(self.border, 1);
        Rectangle::new(Point::zero(), full)
            .into_styled(frame_style)
            .draw(target)?;
        Rectangle::new(
            Point::new(BORDER_INSET_PX as i32, BORDER_INSET_PX as i32),
            full - Size::new_equal(2 * BORDER_INSET_PX),
        )
        .into_styled(frame_style)
        .draw(target)?;

        Circle::with_center(self.center, self.face_radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(self.background))
            .draw(target)?;

        let style = MonoTextStyle::new(self.font, self.numeral);
        for (position, numeral) in NUMERALS.iter().enumerate() {
            let unit = position as i32 * (MINUTE_UNITS / NUMERALS.len() as u32) as i32;
            let mark = hand_endpoint(unit, MINUTE_UNITS, self.mark_radius, self.center);
            // Offset inward by half the rendered width so one- and two-digit
            // numerals both sit centered on their mark.
            let half_width =
                numeral.len() as i32 * self.font.character_size.width as i32 / 2;
            let origin = Point::new(mark.x - half_width, mark.y - NUMERAL_RAISE_PX);
            Text::with_baseline(numeral, origin, style, Baseline::Top).draw(target)?;
        }

        Ok(())
    }
}
