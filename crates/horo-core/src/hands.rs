//! Incremental hand rendering.
//!
//! The tracker keeps the last hand positions it managed to present and
//! moves the hands by erase-then-redraw: the previous strokes are repainted
//! in the dial background color, the new strokes on top, and the whole
//! delta goes out in a single flush. Because the stroke geometry is
//! deterministic, the erase pass covers the exact pixels the earlier draw
//! touched and the rest of the face is never repainted.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use log::debug;

use crate::face::ClockFace;
use crate::geometry::{HOUR_UNITS, MINUTE_UNITS, Segment, center_stroke, tailed_stroke};
use crate::surface::Surface;
use crate::time::TimeSample;

/// Dial positions of the three hands, in whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandPositions {
    /// Hour unit on the 12-unit dial, `0..12`.
    pub hour: u8,
    /// Minute unit, `0..60`.
    pub minute: u8,
    /// Second unit, `0..60`.
    pub second: u8,
}

impl From<TimeSample> for HandPositions {
    fn from(sample: TimeSample) -> Self {
        Self {
            hour: sample.hour_unit(),
            minute: sample.minute(),
            second: sample.second(),
        }
    }
}

fn draw_segments<D>(segments: &[Segment], color: Rgb565, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(color, 1);
    for segment in segments {
        Line::new(segment.start, segment.end)
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

/// Paint all three hands, hour first so the second hand lands on top.
fn paint_hands<D>(
    face: &ClockFace,
    hands: HandPositions,
    colors: [Rgb565; 3],
    target: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let hour = tailed_stroke(
        i32::from(hands.hour),
        HOUR_UNITS,
        face.hour_len,
        face.tail_len,
        face.center,
    );
    draw_segments(&hour, colors[0], target)?;
    let minute = tailed_stroke(
        i32::from(hands.minute),
        MINUTE_UNITS,
        face.minute_len,
        face.tail_len,
        face.center,
    );
    draw_segments(&minute, colors[1], target)?;
    let second = center_stroke(
        i32::from(hands.second),
        MINUTE_UNITS,
        face.second_len,
        face.center,
    );
    draw_segments(&[second], colors[2], target)
}

pub(crate) fn draw_hands<D>(
    face: &ClockFace,
    hands: HandPositions,
    target: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let colors = [face.hour_color, face.minute_color, face.second_color];
    paint_hands(face, hands, colors, target)
}

pub(crate) fn erase_hands<D>(
    face: &ClockFace,
    hands: HandPositions,
    target: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    paint_hands(face, hands, [face.background; 3], target)
}

/// Owns the erase-then-redraw cycle and the last presented positions.
///
/// Until the first successful update the tracker has nothing to erase;
/// afterwards every update erases exactly what the previous one drew. A
/// failed flush rolls the staged frame back to the presented content and
/// leaves the tracked positions untouched, so the next tick retries from
/// a consistent state.
pub struct HandTracker {
    face: ClockFace,
    current: Option<HandPositions>,
}

impl HandTracker {
    pub fn new(face: ClockFace) -> Self {
        Self {
            face,
            current: None,
        }
    }

    pub fn face(&self) -> &ClockFace {
        &self.face
    }

    /// Positions currently presented on the panel, if any update succeeded.
    pub fn positions(&self) -> Option<HandPositions> {
        self.current
    }

    pub fn is_tracking(&self) -> bool {
        self.current.is_some()
    }

    /// Move the hands to `next` and present the change in one flush.
    ///
    /// The tracked positions only advance once the flush succeeds; on
    /// failure the staged strokes are reverted and the error is handed to
    /// the caller to classify.
    pub fn update<S>(&mut self, surface: &mut S, next: HandPositions) -> Result<(), S::Error>
    where
        S: Surface,
    {
        if self.current.is_none() {
            debug!("hand tracker starting at {next:?}");
        }
        if let Some(prev) = self.current
            && prev != next
        {
            erase_hands(&self.face, prev, surface)?;
        }
        draw_hands(&self.face, next, surface)?;
        match surface.flush() {
            Ok(()) => {
                self.current = Some(next);
                Ok(())
            }
            Err(fault) => {
                erase_hands(&self.face, next, surface)?;
                if let Some(prev) = self.current {
                    draw_hands(&self.face, prev, surface)?;
                }
                Err(fault)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceFault;
    use crate::testing::{TestFault, TestSurface, replay_hands};

    fn hands(hour: u8, minute: u8, second: u8) -> HandPositions {
        HandPositions {
            hour,
            minute,
            second,
        }
    }

    #[test]
    fn test_sample_conversion_folds_the_hour_onto_the_dial() {
        let positions = HandPositions::from(TimeSample::new(22, 10, 5));
        assert_eq!(positions, hands(10, 10, 5));
    }

    #[test]
    fn test_first_update_draws_without_erasing() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();

        tracker
            .update(&mut surface, hands(10, 10, 1))
            .expect("in-memory flush cannot fail");

        assert!(tracker.is_tracking());
        assert_eq!(tracker.positions(), Some(hands(10, 10, 1)));
        assert_eq!(surface.flushes, 1, "one flush per update");

        let expected = replay_hands(&face, &[(hands(10, 10, 1), false)]);
        assert_eq!(
            surface.presented().pixels(),
            expected.presented().pixels(),
            "first update presents the face with the hands drawn once"
        );
    }

    #[test]
    fn test_stalled_time_repaints_nothing() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();

        tracker.update(&mut surface, hands(10, 10, 1)).unwrap();
        tracker.update(&mut surface, hands(10, 10, 1)).unwrap();

        assert_eq!(surface.flushes, 2, "every tick flushes exactly once");
        assert!(
            !surface.staged().is_dirty(),
            "repeating the same positions stages no pixel changes"
        );
        let expected = replay_hands(&face, &[(hands(10, 10, 1), false)]);
        assert_eq!(surface.presented().pixels(), expected.presented().pixels());
    }

    #[test]
    fn test_ticks_replay_as_erase_then_draw() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();

        for second in 1..=3 {
            tracker.update(&mut surface, hands(10, 10, second)).unwrap();
        }

        let expected = replay_hands(
            &face,
            &[
                (hands(10, 10, 1), false),
                (hands(10, 10, 1), true),
                (hands(10, 10, 2), false),
                (hands(10, 10, 2), true),
                (hands(10, 10, 3), false),
            ],
        );
        assert_eq!(
            surface.presented().pixels(),
            expected.presented().pixels(),
            "each tick is exactly one erase of the old strokes and one draw"
        );
    }

    #[test]
    fn test_erase_restores_the_dial_under_the_old_hand() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();

        // Seconds 20 and 25 keep both tips clear of the numerals.
        tracker.update(&mut surface, hands(10, 10, 20)).unwrap();
        let old_tip = surface.presented().pixel(Point::new(180, 155));
        assert_eq!(old_tip, Some(face.second_color), "tip drawn at second 20");

        tracker.update(&mut surface, hands(10, 10, 25)).unwrap();
        assert_eq!(
            surface.presented().pixel(Point::new(180, 155)),
            Some(face.background),
            "the old tip pixel is back to dial background"
        );
        assert_eq!(
            surface.presented().pixel(Point::new(155, 180)),
            Some(face.second_color),
            "tip drawn at second 25"
        );
        // Both strokes share the pivot pixel; it only stays painted if the
        // erase pass runs before the draw pass.
        assert_eq!(
            surface.presented().pixel(face.center),
            Some(face.second_color),
            "erase precedes draw on overlapping pixels"
        );
    }

    #[test]
    fn test_rollover_to_the_top_of_the_dial() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();

        tracker.update(&mut surface, hands(10, 59, 59)).unwrap();
        tracker.update(&mut surface, hands(11, 0, 0)).unwrap();

        let expected = replay_hands(
            &face,
            &[
                (hands(10, 59, 59), false),
                (hands(10, 59, 59), true),
                (hands(11, 0, 0), false),
            ],
        );
        assert_eq!(
            surface.presented().pixels(),
            expected.presented().pixels(),
            "minute and second wrap back over the top cleanly"
        );
    }

    #[test]
    fn test_midnight_stacks_the_second_hand_on_top() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();

        tracker.update(&mut surface, hands(0, 0, 0)).unwrap();

        // All three hands share the column above the pivot; the second hand
        // is drawn last and owns the shared pixels.
        let presented = surface.presented();
        assert_eq!(
            presented.pixel(Point::new(120, 77)),
            Some(face.second_color),
            "second hand covers the hour tip where they overlap"
        );
        assert_eq!(
            presented.pixel(Point::new(120, 60)),
            Some(face.second_color),
            "past the minute tip only the second hand paints"
        );
        assert_eq!(
            presented.pixel(Point::new(110, 100)),
            Some(face.background),
            "off the hand column the dial shows through"
        );
    }

    #[test]
    fn test_failed_flush_keeps_state_and_rolls_the_stage_back() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();
        tracker.update(&mut surface, hands(10, 10, 20)).unwrap();

        surface.fail_next = Some(TestFault::Busy);
        let result = tracker.update(&mut surface, hands(10, 10, 21));
        assert_eq!(result, Err(TestFault::Busy));
        assert!(
            result.unwrap_err().is_transient(),
            "a busy panel is worth a retry on the next tick"
        );
        assert_eq!(
            tracker.positions(),
            Some(hands(10, 10, 20)),
            "positions only advance on a successful flush"
        );
        assert_eq!(
            surface.staged().pixels(),
            surface.presented().pixels(),
            "the staged frame is rolled back to what the panel shows"
        );

        // The next tick retries and lands the skipped advance.
        tracker.update(&mut surface, hands(10, 10, 22)).unwrap();
        assert_eq!(tracker.positions(), Some(hands(10, 10, 22)));
        let expected = replay_hands(
            &face,
            &[
                (hands(10, 10, 20), false),
                (hands(10, 10, 20), true),
                (hands(10, 10, 22), false),
            ],
        );
        assert_eq!(surface.presented().pixels(), expected.presented().pixels());
    }

    #[test]
    fn test_detached_panel_fault_is_not_retryable() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();
        tracker.update(&mut surface, hands(10, 10, 20)).unwrap();

        surface.fail_next = Some(TestFault::Detached);
        let fault = tracker
            .update(&mut surface, hands(10, 10, 21))
            .expect_err("a gone panel must hand the fault to the driver");
        assert!(
            !fault.is_transient(),
            "a detached panel is not worth retrying"
        );
        assert_eq!(
            tracker.positions(),
            Some(hands(10, 10, 20)),
            "tracked positions stay on the last presented hands"
        );
        assert_eq!(
            surface.staged().pixels(),
            surface.presented().pixels(),
            "the staged frame still matches what the panel last showed"
        );
    }

    #[test]
    fn test_updates_leave_the_backdrop_and_frames_alone() {
        let face = ClockFace::default();
        let mut tracker = HandTracker::new(face.clone());
        let mut surface = TestSurface::new();
        face.draw(&mut surface).unwrap();
        for second in 0..30 {
            tracker.update(&mut surface, hands(3, 15, second)).unwrap();
        }

        let presented = surface.presented();
        assert_eq!(presented.pixel(Point::new(0, 0)), Some(face.border));
        assert_eq!(presented.pixel(Point::new(7, 7)), Some(face.backdrop));
        assert_eq!(presented.pixel(Point::new(200, 7)), Some(face.backdrop));
    }
}
