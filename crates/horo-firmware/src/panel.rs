//! Adapter that gives the display driver a locally classifiable error type.

use core::fmt::Debug;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use horo_core::surface::SurfaceFault;
use thiserror_no_std::Error;

/// Fault raised when a pixel push over the display bus fails.
#[derive(Debug, Error)]
#[error("display bus fault: {0:?}")]
pub struct PanelError<E: Debug>(pub E);

impl<E: Debug> SurfaceFault for PanelError<E> {
    fn is_transient(&self) -> bool {
        // A failed SPI write leaves the panel on its previous frame; the
        // next tick simply pushes again.
        true
    }
}

/// Wrapper around the mipidsi display so surface faults carry [`PanelError`].
pub struct Panel<D> {
    display: D,
}

impl<D> Panel<D> {
    pub fn new(display: D) -> Self {
        Self { display }
    }
}

impl<D: OriginDimensions> OriginDimensions for Panel<D> {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl<D> DrawTarget for Panel<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    D::Error: Debug,
{
    type Color = Rgb565;
    type Error = PanelError<D::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels).map_err(PanelError)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.display.fill_contiguous(area, colors).map_err(PanelError)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color).map_err(PanelError)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.display.clear(color).map_err(PanelError)
    }
}
