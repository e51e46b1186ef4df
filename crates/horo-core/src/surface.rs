//! The drawing surface the clock renders through.
//!
//! Draw calls land in RAM and cannot fail; presenting the frame to the
//! physical panel can. The [`Surface`] trait separates the two so the hand
//! tracker can stage a whole tick's erases and draws and commit them with a
//! single flush.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::frame::FrameBuffer;

/// A drawable frame that can be presented to a display.
///
/// Contract for implementors: draw calls stage pixels only; `flush` is the
/// one operation that talks to the device. When `flush` fails the panel must
/// still be showing the previously presented frame, and the staged changes
/// must remain flushable, so a caller can either retry the flush or repaint
/// and flush again without the device ever showing a torn frame.
pub trait Surface: DrawTarget<Color = Rgb565> {
    /// Present the staged frame to the display.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// How the tick driver should react to a failed flush.
pub trait SurfaceFault {
    /// `true` for faults worth retrying on the next tick (bus busy, timeout);
    /// `false` for faults that mean the panel is gone.
    fn is_transient(&self) -> bool;
}

impl SurfaceFault for Infallible {
    fn is_transient(&self) -> bool {
        match *self {}
    }
}

/// A [`FrameBuffer`] staged in front of a panel.
///
/// This is the one `Surface` implementation both binaries use: the firmware
/// puts the mipidsi display behind it, the simulator its SDL display. Draws
/// go to the frame and always succeed; `flush` pushes the dirty window to
/// the panel and reports the panel's error as its own.
pub struct PanelSurface<D: DrawTarget<Color = Rgb565>> {
    frame: FrameBuffer,
    panel: D,
}

impl<D: DrawTarget<Color = Rgb565>> PanelSurface<D> {
    pub fn new(panel: D) -> Self {
        Self {
            frame: FrameBuffer::new(),
            panel,
        }
    }

    /// The panel behind the frame.
    pub fn panel(&self) -> &D {
        &self.panel
    }
}

impl<D: DrawTarget<Color = Rgb565>> OriginDimensions for PanelSurface<D> {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl<D: DrawTarget<Color = Rgb565>> DrawTarget for PanelSurface<D> {
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels).map_err(|e| match e {})
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.frame.fill_contiguous(area, colors).map_err(|e| match e {})
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.fill_solid(area, color).map_err(|e| match e {})
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.clear(color).map_err(|e| match e {})
    }
}

impl<D: DrawTarget<Color = Rgb565>> Surface for PanelSurface<D> {
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.frame.flush_to(&mut self.panel)
    }
}
