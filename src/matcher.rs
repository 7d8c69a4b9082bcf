//! Ordered-segment state machine for a single gesture.
//!
//! A matcher walks its definition's segments in order, one evaluation per
//! frame:
//! - `Succeeded` advances to the next segment, or fires on the last one.
//! - `Pausing` waits on the same segment while the window budget lasts.
//! - `Failed` abandons the attempt immediately.
//!
//! The idle flag and pause budget are bookkeeping only. Every frame evaluates
//! the current segment whatever their value.

use std::sync::Arc;

use crate::catalog::GestureDefinition;
use crate::segment::SegmentOutcome;
use crate::snapshot::JointSnapshot;
use crate::{GestureEvent, GestureId};

/// Frames a matcher may spend without advancing before it starts over.
pub const WINDOW_SIZE: u32 = 50;
/// Pause budget recorded after a segment advance.
pub const MAX_PAUSE_FRAMES: u32 = 10;
/// Pause budget recorded after a pausing frame or a reset.
pub const SHORT_PAUSE_FRAMES: u32 = 5;

#[derive(Clone, Debug)]
pub struct GestureMatcher {
    definition: Arc<GestureDefinition>,
    segment_index: usize,
    frame_count: u32,
    pause_budget: u32,
    idle: bool,
}

impl GestureMatcher {
    pub fn new(definition: Arc<GestureDefinition>) -> Self {
        Self {
            definition,
            segment_index: 0,
            frame_count: 0,
            pause_budget: MAX_PAUSE_FRAMES,
            idle: false,
        }
    }

    /// Feed one snapshot. Returns the recognition when the last segment succeeds.
    pub fn update(&mut self, snapshot: &JointSnapshot) -> Option<GestureEvent> {
        if self.idle {
            if self.frame_count == self.pause_budget {
                self.idle = false;
            }
            self.frame_count += 1;
        }

        let segments = self.definition.segments();
        let segment = &segments[self.segment_index];
        match segment.evaluate(snapshot) {
            SegmentOutcome::Succeeded if self.segment_index + 1 < segments.len() => {
                log::trace!(
                    "{}: segment {} ({}) matched for body {}",
                    self.gesture(),
                    self.segment_index,
                    segment.name(),
                    snapshot.tracking_id()
                );
                self.segment_index += 1;
                self.frame_count = 0;
                self.pause_budget = MAX_PAUSE_FRAMES;
                self.idle = true;
                None
            }
            SegmentOutcome::Succeeded => {
                let event = GestureEvent {
                    gesture: self.gesture(),
                    forbidden_next: self.definition.forbidden_next(),
                    tracking_id: snapshot.tracking_id(),
                };
                log::trace!("{}: fired for body {}", event.gesture, event.tracking_id);
                self.reset();
                Some(event)
            }
            SegmentOutcome::Failed => {
                if self.segment_index > 0 {
                    log::trace!(
                        "{}: segment {} ({}) failed, restarting",
                        self.gesture(),
                        self.segment_index,
                        segment.name()
                    );
                }
                self.reset();
                None
            }
            SegmentOutcome::Pausing if self.frame_count >= WINDOW_SIZE => {
                log::trace!(
                    "{}: window expired on segment {}, restarting",
                    self.gesture(),
                    self.segment_index
                );
                self.reset();
                None
            }
            SegmentOutcome::Pausing => {
                self.frame_count += 1;
                self.pause_budget = SHORT_PAUSE_FRAMES;
                self.idle = true;
                None
            }
        }
    }

    /// Discard all progress.
    pub fn reset(&mut self) {
        self.segment_index = 0;
        self.frame_count = 0;
        self.pause_budget = SHORT_PAUSE_FRAMES;
        self.idle = true;
    }

    pub fn gesture(&self) -> GestureId {
        self.definition.id()
    }

    pub fn definition(&self) -> &Arc<GestureDefinition> {
        &self.definition
    }

    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn pause_budget(&self) -> u32 {
        self.pause_budget
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GestureCatalog;
    use crate::segment::fixtures::{neutral, right_hand};
    use crate::segment::GestureSegment;
    use crate::GestureSet;
    use anyhow::Result;

    // Segments keyed off the right hand's x so a test can pick each outcome.
    fn step_a(s: &JointSnapshot) -> SegmentOutcome {
        outcome_for(s, 1.0)
    }

    fn step_b(s: &JointSnapshot) -> SegmentOutcome {
        outcome_for(s, 2.0)
    }

    fn outcome_for(s: &JointSnapshot, wanted: f32) -> SegmentOutcome {
        let x = s.joint(crate::snapshot::JointType::HandRight).x;
        if x < 0.0 {
            SegmentOutcome::Failed
        } else if x == wanted {
            SegmentOutcome::Succeeded
        } else {
            SegmentOutcome::Pausing
        }
    }

    fn two_step() -> Result<GestureMatcher> {
        let definition = GestureDefinition::new(
            GestureId::ZoomIn,
            vec![GestureSegment::new("a", step_a), GestureSegment::new("b", step_b)],
            GestureSet::from([GestureId::ZoomOut]),
        )?;
        Ok(GestureMatcher::new(Arc::new(definition)))
    }

    fn at(x: f32) -> JointSnapshot {
        right_hand(x, 0.0, 0.0)
    }

    #[test]
    fn starts_fresh() -> Result<()> {
        let matcher = two_step()?;
        assert_eq!(matcher.segment_index(), 0);
        assert_eq!(matcher.frame_count(), 0);
        assert_eq!(matcher.pause_budget(), MAX_PAUSE_FRAMES);
        assert!(!matcher.is_idle());
        Ok(())
    }

    #[test]
    fn fires_once_on_last_segment_and_resets() -> Result<()> {
        let mut matcher = two_step()?;
        assert_eq!(matcher.update(&at(1.0)), None);
        assert_eq!(matcher.segment_index(), 1);
        assert_eq!(matcher.pause_budget(), MAX_PAUSE_FRAMES);

        let event = matcher.update(&at(2.0));
        assert_eq!(
            event,
            Some(GestureEvent {
                gesture: GestureId::ZoomIn,
                forbidden_next: GestureSet::from([GestureId::ZoomOut]),
                tracking_id: 1,
            })
        );
        assert_eq!(matcher.segment_index(), 0);
        assert_eq!(matcher.frame_count(), 0);
        assert_eq!(matcher.pause_budget(), SHORT_PAUSE_FRAMES);
        assert!(matcher.is_idle());

        // Holding the final pose does not fire again.
        assert_eq!(matcher.update(&at(2.0)), None);
        Ok(())
    }

    #[test]
    fn pausing_keeps_progress() -> Result<()> {
        let mut matcher = two_step()?;
        matcher.update(&at(1.0));
        for _ in 0..10 {
            assert_eq!(matcher.update(&at(0.5)), None);
        }
        assert_eq!(matcher.segment_index(), 1);
        assert!(matcher.update(&at(2.0)).is_some());
        Ok(())
    }

    #[test]
    fn failed_discards_all_progress() -> Result<()> {
        let mut matcher = two_step()?;
        matcher.update(&at(1.0));
        matcher.update(&at(0.5));
        assert_eq!(matcher.update(&at(-1.0)), None);
        assert_eq!(matcher.segment_index(), 0);
        assert_eq!(matcher.frame_count(), 0);
        // The last segment alone does not complete the gesture.
        assert_eq!(matcher.update(&at(2.0)), None);
        assert_eq!(matcher.segment_index(), 0);
        Ok(())
    }

    #[test]
    fn window_expiry_resets_like_failure() -> Result<()> {
        let mut matcher = two_step()?;
        matcher.update(&at(1.0));
        let mut frames = 0;
        while matcher.segment_index() == 1 {
            assert!(frames < WINDOW_SIZE, "window never expired");
            matcher.update(&at(0.5));
            frames += 1;
        }
        assert!(frames > 1);
        assert_eq!(matcher.frame_count(), 0);
        assert_eq!(matcher.pause_budget(), SHORT_PAUSE_FRAMES);
        Ok(())
    }

    #[test]
    fn idle_flag_does_not_gate_evaluation() -> Result<()> {
        let mut matcher = two_step()?;
        matcher.update(&at(1.0));
        assert!(matcher.is_idle());
        // Still idle, yet the very next frame may complete the gesture.
        assert!(matcher.update(&at(2.0)).is_some());
        Ok(())
    }

    #[test]
    fn wave_right_fires_on_fourth_alternation() {
        let catalog = GestureCatalog::builtin();
        let Some(definition) = catalog.get(GestureId::WaveRightHand) else {
            panic!("wave missing from catalog");
        };
        let mut matcher = GestureMatcher::new(definition.clone());
        assert!(Arc::ptr_eq(matcher.definition(), definition));
        assert_eq!(matcher.definition().segments().len(), 4);
        let out = right_hand(0.35, 0.35, 1.85);
        let inward = right_hand(0.15, 0.35, 1.85);

        assert_eq!(matcher.update(&out), None);
        assert_eq!(matcher.update(&inward), None);
        assert_eq!(matcher.update(&out), None);
        let event = matcher.update(&inward);
        assert_eq!(event.map(|e| e.gesture), Some(GestureId::WaveRightHand));
        assert_eq!(matcher.update(&neutral()), None);
    }
}
