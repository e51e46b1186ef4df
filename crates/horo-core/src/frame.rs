//! RAM frame with per-pixel change detection.
//!
//! All drawing lands in this buffer instead of going straight to the SPI
//! panel. When a frame is complete, only the rectangular window containing
//! changed pixels is pushed to the panel in one transaction, which keeps the
//! 1 Hz hand updates to a few hundred bytes on the bus instead of a full
//! 240x240 repaint.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Side length of the square panel.
pub const SCREEN_SIZE_PX: u16 = 240;

const PIXEL_COUNT: usize = SCREEN_SIZE_PX as usize * SCREEN_SIZE_PX as usize;

/// Bounding window of pixels written with a new color since the last
/// successful flush.
#[derive(Debug, Clone, Copy)]
struct DirtyWindow {
    min_x: u16,
    min_y: u16,
    max_x: u16,
    max_y: u16,
}

impl DirtyWindow {
    fn pixel(x: u16, y: u16) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn grow(&mut self, x: u16, y: u16) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn to_rect(self) -> Rectangle {
        Rectangle::new(
            Point::new(i32::from(self.min_x), i32::from(self.min_y)),
            Size::new(
                u32::from(self.max_x - self.min_x) + 1,
                u32::from(self.max_y - self.min_y) + 1,
            ),
        )
    }
}

/// Heap-backed `Rgb565` frame implementing `DrawTarget`.
///
/// The 240x240x2 = 115,200-byte pixel store comes from the global allocator
/// (PSRAM on the device). Writes that do not change a pixel's color are
/// dropped, so redrawing an unchanged hand costs no bus traffic.
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyWindow>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Allocate a frame filled with black pixels.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; PIXEL_COUNT],
            dirty: None,
        }
    }

    /// Whether any pixel changed since the last successful flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// The whole frame in row-major order.
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Read one pixel; `None` outside the panel.
    pub fn pixel(&self, p: Point) -> Option<Rgb565> {
        let (x, y) = in_bounds(p.x, p.y)?;
        Some(self.pixels[y * SCREEN_SIZE_PX as usize + x])
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * SCREEN_SIZE_PX as usize + x;
        if self.pixels[idx] == color {
            return;
        }
        self.pixels[idx] = color;
        match &mut self.dirty {
            Some(window) => window.grow(x as u16, y as u16),
            None => self.dirty = Some(DirtyWindow::pixel(x as u16, y as u16)),
        }
    }

    /// Push the dirty window to a panel in one `fill_contiguous` call.
    ///
    /// A clean frame is a no-op. The window is cleared only after the panel
    /// accepts the pixels; on error it stays marked so the next flush retries
    /// the same region and the panel never silently misses an update.
    pub fn flush_to<D>(&mut self, panel: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(window) = self.dirty else {
            return Ok(());
        };
        let area = window.to_rect();
        debug!(
            "Flushing {}x{} window at ({}, {})",
            area.size.width, area.size.height, area.top_left.x, area.top_left.y
        );

        let stride = SCREEN_SIZE_PX as usize;
        let width = area.size.width as usize;
        let pixels = &self.pixels;
        let colors = (window.min_y..=window.max_y).flat_map(move |y| {
            let row = y as usize * stride + window.min_x as usize;
            pixels[row..row + width].iter().copied()
        });
        panel.fill_contiguous(&area, colors)?;

        self.dirty = None;
        Ok(())
    }
}

/// Clamp-check a coordinate pair against the panel bounds.
#[inline]
fn in_bounds(x: i32, y: i32) -> Option<(usize, usize)> {
    let size = i32::from(SCREEN_SIZE_PX);
    (x >= 0 && y >= 0 && x < size && y < size).then_some((x as usize, y as usize))
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new_equal(u32::from(SCREEN_SIZE_PX))
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = in_bounds(coord.x, coord.y) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Walk the full area so the color iterator stays in step even where
        // the area hangs off the panel.
        for (point, color) in area.points().zip(colors) {
            if let Some((x, y)) = in_bounds(point.x, point.y) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let size = u32::from(SCREEN_SIZE_PX);
        let clipped = area.intersection(&Rectangle::new(Point::zero(), Size::new_equal(size)));
        for point in clipped.points() {
            self.set_pixel(point.x as usize, point.y as usize, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_solid(
            &Rectangle::new(Point::zero(), Size::new_equal(u32::from(SCREEN_SIZE_PX))),
            color,
        )
    }
}
