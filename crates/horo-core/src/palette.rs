//! Boot palette screen.
//!
//! One-shot diagnostic drawn before the tick loop starts: a title plus one
//! line per named color, each label rendered in its own color. Handy for
//! spotting a miswired data line or a panel with swapped color order before
//! the clock ever comes up.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::{Rgb565, WebColors};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// Labels and their colors, one screen line each, top to bottom.
pub const NAMED_COLORS: [(&str, Rgb565); 10] = [
    ("Red", Rgb565::RED),
    ("Purple", Rgb565::CSS_PURPLE),
    ("Blue Violet", Rgb565::CSS_BLUE_VIOLET),
    ("Blue", Rgb565::BLUE),
    ("Cyan", Rgb565::CYAN),
    ("Lawn Green", Rgb565::CSS_LAWN_GREEN),
    ("Green Yellow", Rgb565::CSS_GREEN_YELLOW),
    ("Yellow", Rgb565::YELLOW),
    ("Orange", Rgb565::CSS_ORANGE),
    ("Brown", Rgb565::CSS_BROWN),
];

const MARGIN: Point = Point::new(4, 2);

/// Draw the palette screen; the caller flushes.
pub fn draw<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.clear(Rgb565::BLACK)?;
    let font = &FONT_10X20;
    let line_height = font.character_size.height as i32;

    let title = MonoTextStyle::new(font, Rgb565::WHITE);
    Text::with_baseline("horo", MARGIN, title, Baseline::Top).draw(target)?;

    for (row, (label, color)) in NAMED_COLORS.iter().enumerate() {
        let origin = MARGIN + Point::new(0, line_height * (row as i32 + 1));
        let style = MonoTextStyle::new(font, *color);
        Text::with_baseline(label, origin, style, Baseline::Top).draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuffer;

    fn ink_in_row(frame: &FrameBuffer, row: usize, color: Rgb565) -> usize {
        let top = MARGIN.y + 20 * (row as i32 + 1);
        let mut hits = 0;
        for y in top..top + 20 {
            for x in 0..240 {
                if frame.pixel(Point::new(x, y)) == Some(color) {
                    hits += 1;
                }
            }
        }
        hits
    }

    #[test]
    fn test_every_label_is_drawn_in_its_own_color() {
        let mut frame = FrameBuffer::new();
        draw(&mut frame).unwrap();

        for (row, (label, color)) in NAMED_COLORS.iter().enumerate() {
            assert!(
                ink_in_row(&frame, row, *color) > 0,
                "row for {label} must contain its color"
            );
        }
    }

    #[test]
    fn test_title_row_is_white_on_black() {
        let mut frame = FrameBuffer::new();
        draw(&mut frame).unwrap();

        let mut white = 0;
        for y in MARGIN.y..MARGIN.y + 20 {
            for x in 0..240 {
                match frame.pixel(Point::new(x, y)) {
                    Some(p) if p == Rgb565::WHITE => white += 1,
                    Some(p) => assert_eq!(p, Rgb565::BLACK, "title row holds only ink and backdrop"),
                    None => {}
                }
            }
        }
        assert!(white > 0, "the title must be drawn");
    }
}
