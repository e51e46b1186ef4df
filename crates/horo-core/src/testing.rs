//! Test doubles shared by the rendering tests.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::face::ClockFace;
use crate::frame::{FrameBuffer, SCREEN_SIZE_PX};
use crate::hands::{HandPositions, draw_hands, erase_hands};
use crate::surface::{Surface, SurfaceFault};

/// Faults a test surface can be told to raise on its next flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFault {
    /// Transient: the next attempt may succeed.
    Busy,
    /// Permanent: the panel is gone.
    Detached,
}

impl SurfaceFault for TestFault {
    fn is_transient(&self) -> bool {
        matches!(self, TestFault::Busy)
    }
}

/// In-memory [`Surface`] with separate staged and presented frames.
///
/// Draws land in the staged frame; [`Surface::flush`] copies the dirty
/// window to the presented frame, exactly like the panel-backed surface
/// pushes to hardware. Tests inject faults through `fail_next` and count
/// flushes to pin down how often a code path presents.
pub struct TestSurface {
    frame: FrameBuffer,
    panel: FrameBuffer,
    pub flushes: usize,
    pub fail_next: Option<TestFault>,
}

impl TestSurface {
    pub fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            panel: FrameBuffer::new(),
            flushes: 0,
            fail_next: None,
        }
    }

    /// The frame draws have landed in but which may not be presented yet.
    pub fn staged(&self) -> &FrameBuffer {
        &self.frame
    }

    /// The frame a viewer of the panel would see.
    pub fn presented(&self) -> &FrameBuffer {
        &self.panel
    }
}

impl OriginDimensions for TestSurface {
    fn size(&self) -> Size {
        Size::new_equal(u32::from(SCREEN_SIZE_PX))
    }
}

impl DrawTarget for TestSurface {
    type Color = Rgb565;
    type Error = TestFault;

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

impl Surface for TestSurface {
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        if let Some(fault) = self.fail_next.take() {
            return Err(fault);
        }
        self.frame.flush_to(&mut self.panel).map_err(|e| match e {})
    }
}

/// Face plus the given hand steps rendered onto a fresh surface and flushed
/// once. A `true` step erases its positions instead of drawing them.
pub fn replay_hands(face: &ClockFace, steps: &[(HandPositions, bool)]) -> TestSurface {
    let mut surface = TestSurface::new();
    face.draw(&mut surface).unwrap();
    for &(positions, erase) in steps {
        if erase {
            erase_hands(face, positions, &mut surface).unwrap();
        } else {
            draw_hands(face, positions, &mut surface).unwrap();
        }
    }
    surface.flush().unwrap();
    surface
}
