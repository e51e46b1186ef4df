//! Per-tick orchestration of the ambient scene, the face and the hands.
//!
//! The screen is the single entry point the tick loop calls. It owns the
//! phase switch from ambient animation to the running clock, so the face is
//! always drawn before the first hand update and ambient frames are never
//! interleaved with hand updates.

use log::{info, warn};
use rand_core::RngCore;

use crate::ambient::AmbientScene;
use crate::face::ClockFace;
use crate::hands::{HandPositions, HandTracker};
use crate::surface::Surface;
use crate::time::TimeSample;

enum Phase {
    Ambient,
    Clock,
}

pub struct ClockScreen<R> {
    ambient: AmbientScene<R>,
    tracker: HandTracker,
    phase: Phase,
}

impl<R: RngCore> ClockScreen<R> {
    pub fn new(face: ClockFace, rng: R) -> Self {
        Self {
            ambient: AmbientScene::new(rng),
            tracker: HandTracker::new(face),
            phase: Phase::Ambient,
        }
    }

    pub fn is_showing_clock(&self) -> bool {
        matches!(self.phase, Phase::Clock)
    }

    /// Hand positions currently on the panel, once the clock has started.
    pub fn positions(&self) -> Option<HandPositions> {
        self.tracker.positions()
    }

    /// Run one display tick with the current wall-clock sample, if any.
    ///
    /// Before the first sample every tick paints an ambient frame. The first
    /// sample draws and presents the face, then hands take over; the phase
    /// only advances once the face is actually on the panel, so a failed
    /// flush here means the next tick starts over from ambient.
    pub fn tick<S>(&mut self, surface: &mut S, sample: Option<TimeSample>) -> Result<(), S::Error>
    where
        S: Surface,
    {
        match (&self.phase, sample) {
            (Phase::Ambient, None) => self.ambient.tick(surface),
            (Phase::Ambient, Some(sample)) => {
                self.tracker.face().draw(surface)?;
                surface.flush()?;
                info!("wall clock acquired, face drawn");
                self.phase = Phase::Clock;
                self.tracker.update(surface, HandPositions::from(sample))
            }
            (Phase::Clock, Some(sample)) => {
                self.tracker.update(surface, HandPositions::from(sample))
            }
            (Phase::Clock, None) => {
                warn!("wall clock sample missing, leaving the face as is");
                Ok(())
            }
        }
    }
}
