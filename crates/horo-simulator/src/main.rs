//! Desktop simulator for the analog clock.
//!
//! Renders through the same [`PanelSurface`] the firmware uses, with an SDL
//! window standing in for the ST7789 panel, so the staging and dirty-window
//! logic gets exercised on the host. The wall clock starts unsynchronized
//! and the ambient animation runs until sync is requested by key press.
//!
//! Key bindings:
//!
//! | Key         | Action                                  |
//! |-------------|-----------------------------------------|
//! | `S`         | Sync the wall clock to the host clock   |
//! | `F`         | Fail the next flush with a transient fault |
//! | `Q` / `Esc` | Quit                                    |
//!
//! Run with `RUST_LOG=debug` to watch the tick-by-tick hand updates.

use std::cell::Cell;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use horo_core::face::ClockFace;
use horo_core::frame::SCREEN_SIZE_PX;
use horo_core::palette;
use horo_core::screen::ClockScreen;
use horo_core::surface::{PanelSurface, Surface, SurfaceFault};
use horo_core::time::{TimeSample, TimeSource};
use log::{info, warn};
use rand_core::SeedableRng;
use rand_xoshiro::Xoroshiro128StarStar;

/// Integer scale factor applied to the simulated panel.
const WINDOW_SCALE: u32 = 2;

/// Pause between window updates, roughly 30 FPS.
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// One clock tick per second, matching the firmware's ticker.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long the startup palette stays on screen before the clock takes over.
const PALETTE_HOLD: Duration = Duration::from_secs(2);

/// Transient fault injected with the `F` key.
#[derive(Debug)]
struct FlushFault;

impl SurfaceFault for FlushFault {
    fn is_transient(&self) -> bool {
        true
    }
}

/// The simulated panel, with a switch that fails the next write to it.
///
/// Draws staged in the frame never touch this; only a flush does. Failing
/// here leaves the frame's dirty window intact, which is exactly what a
/// bus fault does on hardware, so the recovery path on the next tick is
/// the real one.
struct FlakyPanel {
    display: SimulatorDisplay<Rgb565>,
    fail_next: Cell<bool>,
}

impl FlakyPanel {
    fn new(display: SimulatorDisplay<Rgb565>) -> Self {
        Self {
            display,
            fail_next: Cell::new(false),
        }
    }

    /// Arm a one-shot failure for the next panel write.
    fn fail_next_flush(&self) {
        self.fail_next.set(true);
    }

    /// The display behind the fault switch, for the window to present.
    fn display(&self) -> &SimulatorDisplay<Rgb565> {
        &self.display
    }
}

impl OriginDimensions for FlakyPanel {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for FlakyPanel {
    type Color = Rgb565;
    type Error = FlushFault;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels).map_err(|e| match e {})
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        if self.fail_next.take() {
            return Err(FlushFault);
        }
        self.display
            .fill_contiguous(area, colors)
            .map_err(|e| match e {})
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color).map_err(|e| match e {})
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.display.clear(color).map_err(|e| match e {})
    }
}

/// Host wall clock, gated behind the `S` key the way the firmware's clock
/// is gated behind SNTP sync.
struct HostClock {
    utc_offset_seconds: i64,
    synced: bool,
}

impl TimeSource for HostClock {
    fn sample(&mut self) -> Option<TimeSample> {
        if !self.synced {
            return None;
        }
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Some(TimeSample::from_day_seconds(
            epoch as i64 + self.utc_offset_seconds,
        ))
    }
}

fn main() {
    env_logger::init();

    info!("starting clock simulator");
    info!("press S to sync the wall clock, F to fail a flush, Q or Esc to quit");

    // Same key the firmware reads from .env at build time; here it comes
    // straight from the process environment.
    let utc_offset_minutes: i64 = std::env::var("UTC_OFFSET_MINUTES")
        .ok()
        .and_then(|minutes| minutes.parse().ok())
        .unwrap_or(0);
    let mut clock = HostClock {
        utc_offset_seconds: utc_offset_minutes * 60,
        synced: false,
    };

    let display = SimulatorDisplay::<Rgb565>::new(Size::new_equal(u32::from(SCREEN_SIZE_PX)));
    let mut surface = PanelSurface::new(FlakyPanel::new(display));

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Horo Simulator", &output_settings);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let mut screen = ClockScreen::new(
        ClockFace::default(),
        Xoroshiro128StarStar::seed_from_u64(seed),
    );

    // The boot palette, as on hardware. No fault can be armed yet, so these
    // cannot fail.
    palette::draw(&mut surface).expect("palette draws into RAM");
    surface.flush().expect("no fault armed at startup");

    // The SDL window is lazily initialized on the first `update()` call. We
    // must call `update()` once before `events()` or it will panic.
    window.update(surface.panel().display());

    let palette_shown = Instant::now();
    let mut last_tick = Instant::now();

    'running: loop {
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::S => {
                        if !clock.synced {
                            clock.synced = true;
                            info!("wall clock synced to host time");
                        }
                    }
                    Keycode::F => {
                        surface.panel().fail_next_flush();
                        info!("armed a transient fault for the next flush");
                    }
                    Keycode::Q | Keycode::Escape => break 'running,
                    _ => {}
                },
                _ => {}
            }
        }

        if palette_shown.elapsed() >= PALETTE_HOLD && last_tick.elapsed() >= TICK_INTERVAL {
            last_tick = Instant::now();
            if let Err(fault) = screen.tick(&mut surface, clock.sample()) {
                if fault.is_transient() {
                    warn!("flush failed, retrying next tick: {fault:?}");
                } else {
                    panic!("panel fault: {fault:?}");
                }
            }
        }

        window.update(surface.panel().display());
        std::thread::sleep(FRAME_DURATION);
    }

    info!("simulator closed");
}
