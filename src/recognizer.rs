//! Per-person gesture multiplexer.
//!
//! A `GestureRecognizer` owns one matcher per subscribed gesture and forwards
//! each snapshot to all of them. When any matcher fires:
//! - the event is delivered unless its gesture is in the forbidden-next set of
//!   the previously fired gesture (and bypass is off),
//! - the forbidden-next set is replaced by the fired gesture's own set, even
//!   when the event itself was suppressed,
//! - every matcher is reset, so no partial progress outlives a recognition.

use std::sync::Arc;

use crate::catalog::GestureCatalog;
use crate::matcher::GestureMatcher;
use crate::snapshot::JointSnapshot;
use crate::{GestureEvent, GestureId, GestureSet};

#[derive(Debug)]
pub struct GestureRecognizer {
    catalog: Arc<GestureCatalog>,
    matchers: Vec<GestureMatcher>,
    subscribed: GestureSet,
    previous_forbidden: GestureSet,
    bypass_forbidden: bool,
    running: bool,
}

impl GestureRecognizer {
    /// Empty, stopped recognizer. Call `subscribe` and `start` before feeding frames.
    pub fn new(catalog: Arc<GestureCatalog>, bypass_forbidden: bool) -> Self {
        Self {
            catalog,
            matchers: Vec::new(),
            subscribed: GestureSet::empty(),
            previous_forbidden: GestureSet::empty(),
            bypass_forbidden,
            running: false,
        }
    }

    /// Stopped recognizer subscribed to every gesture in the catalog.
    pub fn with_all(catalog: Arc<GestureCatalog>, bypass_forbidden: bool) -> Self {
        let ids = catalog.ids();
        let mut recognizer = Self::new(catalog, bypass_forbidden);
        recognizer.subscribe(ids.iter());
        recognizer
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add a matcher per id. Already subscribed ids and ids missing from the
    /// catalog are skipped. Returns how many matchers were added.
    pub fn subscribe<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = GestureId>,
    {
        let mut added = 0;
        for id in ids {
            if self.subscribed.contains(id) {
                continue;
            }
            let Some(definition) = self.catalog.get(id) else {
                log::debug!("gesture {} not in catalog; not subscribed", id);
                continue;
            };
            self.matchers.push(GestureMatcher::new(definition.clone()));
            self.subscribed.insert(id);
            added += 1;
        }
        added
    }

    pub fn subscribed(&self) -> GestureSet {
        self.subscribed
    }

    pub fn reload(&mut self, bypass_forbidden: bool) {
        self.bypass_forbidden = bypass_forbidden;
    }

    /// Feed one snapshot to every matcher and return the delivered events.
    ///
    /// Does nothing while stopped or without a snapshot.
    pub fn update(&mut self, snapshot: Option<&JointSnapshot>) -> Vec<GestureEvent> {
        let mut delivered = Vec::new();
        if !self.running {
            return delivered;
        }
        let Some(snapshot) = snapshot else {
            return delivered;
        };

        for i in 0..self.matchers.len() {
            let Some(event) = self.matchers[i].update(snapshot) else {
                continue;
            };
            if !self.previous_forbidden.contains(event.gesture) || self.bypass_forbidden {
                delivered.push(event);
            } else {
                log::debug!(
                    "suppressed {} for body {} (forbidden after previous gesture)",
                    event.gesture,
                    event.tracking_id
                );
            }
            self.previous_forbidden = event.forbidden_next;
            self.reset_all();
        }
        delivered
    }

    /// Reset every matcher to its first segment.
    pub fn reset_all(&mut self) {
        for matcher in &mut self.matchers {
            matcher.reset();
        }
    }

    pub fn previous_forbidden(&self) -> GestureSet {
        self.previous_forbidden
    }

    pub fn bypass_forbidden(&self) -> bool {
        self.bypass_forbidden
    }

    pub fn matcher(&self, id: GestureId) -> Option<&GestureMatcher> {
        self.matchers.iter().find(|m| m.gesture() == id)
    }

    pub fn matchers(&self) -> &[GestureMatcher] {
        &self.matchers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GestureDefinition;
    use crate::segment::fixtures::right_hand;
    use crate::segment::{GestureSegment, SegmentCheck, SegmentOutcome};
    use crate::snapshot::JointType;
    use anyhow::Result;

    // Single-segment gestures triggered by the right hand's x coordinate.
    fn at_one(s: &JointSnapshot) -> SegmentOutcome {
        trigger(s, 1.0)
    }

    fn at_two(s: &JointSnapshot) -> SegmentOutcome {
        trigger(s, 2.0)
    }

    fn at_three(s: &JointSnapshot) -> SegmentOutcome {
        trigger(s, 3.0)
    }

    fn trigger(s: &JointSnapshot, x: f32) -> SegmentOutcome {
        if s.joint(JointType::HandRight).x == x {
            SegmentOutcome::Succeeded
        } else {
            SegmentOutcome::Pausing
        }
    }

    const A: GestureId = GestureId::WaveRightHand;
    const B: GestureId = GestureId::SwipeDownRightHand;
    const C: GestureId = GestureId::ZoomIn;

    fn catalog() -> Result<Arc<GestureCatalog>> {
        let one = |id: GestureId, check: SegmentCheck, forbidden: GestureSet| {
            GestureDefinition::new(id, vec![GestureSegment::new("step", check)], forbidden)
        };
        Ok(Arc::new(GestureCatalog::from_definitions(vec![
            one(A, at_one, GestureSet::from([B]))?,
            one(B, at_two, GestureSet::empty())?,
            one(C, at_three, GestureSet::empty())?,
        ])?))
    }

    fn running(bypass: bool) -> Result<GestureRecognizer> {
        let mut recognizer = GestureRecognizer::with_all(catalog()?, bypass);
        recognizer.start();
        Ok(recognizer)
    }

    fn fire(recognizer: &mut GestureRecognizer, x: f32) -> Vec<GestureId> {
        recognizer
            .update(Some(&right_hand(x, 0.0, 0.0)))
            .into_iter()
            .map(|e| e.gesture)
            .collect()
    }

    #[test]
    fn stopped_recognizer_ignores_frames() -> Result<()> {
        let mut recognizer = GestureRecognizer::with_all(catalog()?, false);
        assert!(!recognizer.is_running());
        assert!(fire(&mut recognizer, 1.0).is_empty());
        recognizer.start();
        assert!(recognizer.update(None).is_empty());
        assert_eq!(fire(&mut recognizer, 1.0), vec![A]);
        recognizer.stop();
        assert!(fire(&mut recognizer, 3.0).is_empty());
        Ok(())
    }

    #[test]
    fn subscribe_skips_duplicates_and_unknown_ids() -> Result<()> {
        let mut recognizer = GestureRecognizer::new(catalog()?, false);
        assert_eq!(recognizer.subscribe([A, A, B]), 2);
        assert_eq!(recognizer.subscribe([B, C, GestureId::ZoomOut]), 1);
        assert_eq!(recognizer.matchers().len(), 3);
        assert_eq!(recognizer.subscribed(), GestureSet::from([A, B, C]));
        assert!(recognizer.matcher(GestureId::ZoomOut).is_none());
        Ok(())
    }

    #[test]
    fn forbidden_gesture_is_suppressed_once() -> Result<()> {
        let mut recognizer = running(false)?;
        assert_eq!(fire(&mut recognizer, 1.0), vec![A]);
        assert_eq!(recognizer.previous_forbidden(), GestureSet::from([B]));

        // B right after A is discarded, but B's own (empty) set takes over.
        assert!(fire(&mut recognizer, 2.0).is_empty());
        assert!(recognizer.previous_forbidden().is_empty());

        assert_eq!(fire(&mut recognizer, 2.0), vec![B]);
        Ok(())
    }

    #[test]
    fn other_gestures_pass_after_a_forbidding_one() -> Result<()> {
        let mut recognizer = running(false)?;
        assert_eq!(fire(&mut recognizer, 1.0), vec![A]);
        assert_eq!(fire(&mut recognizer, 3.0), vec![C]);
        assert_eq!(fire(&mut recognizer, 2.0), vec![B]);
        Ok(())
    }

    #[test]
    fn bypass_delivers_forbidden_gestures() -> Result<()> {
        let mut recognizer = running(false)?;
        recognizer.reload(true);
        assert!(recognizer.bypass_forbidden());
        assert_eq!(fire(&mut recognizer, 1.0), vec![A]);
        assert_eq!(fire(&mut recognizer, 2.0), vec![B]);
        Ok(())
    }

    #[test]
    fn forbidden_gesture_in_the_same_pass_is_suppressed() -> Result<()> {
        // JoinedHands sorts before A and only advances here, so it shows the resets.
        let two_step = GestureDefinition::new(
            GestureId::JoinedHands,
            vec![
                GestureSegment::new("first", at_one),
                GestureSegment::new("second", at_three),
            ],
            GestureSet::empty(),
        )?;
        let catalog = Arc::new(GestureCatalog::from_definitions(vec![
            two_step,
            GestureDefinition::new(A, vec![GestureSegment::new("step", at_one)], GestureSet::from([B]))?,
            GestureDefinition::new(B, vec![GestureSegment::new("step", at_one)], GestureSet::empty())?,
        ])?);
        let mut recognizer = GestureRecognizer::with_all(catalog, false);
        recognizer.start();

        // A fires first, then B fires later in the same pass and is discarded.
        assert_eq!(fire(&mut recognizer, 1.0), vec![A]);
        assert!(recognizer.previous_forbidden().is_empty());
        assert!(recognizer.matchers().iter().all(|m| m.segment_index() == 0));

        // B's empty set is now in force, so A passes and B is discarded again.
        assert_eq!(fire(&mut recognizer, 1.0), vec![A]);
        assert!(recognizer.previous_forbidden().is_empty());
        Ok(())
    }

    #[test]
    fn recognition_resets_every_matcher() -> Result<()> {
        let builtin = GestureCatalog::builtin();
        let Some(wave) = builtin.get(A) else {
            panic!("wave missing from catalog");
        };
        let catalog = Arc::new(GestureCatalog::from_definitions(vec![
            (**wave).clone(),
            GestureDefinition::new(C, vec![GestureSegment::new("step", at_three)], GestureSet::empty())?,
        ])?);
        let mut recognizer = GestureRecognizer::with_all(catalog, false);
        recognizer.start();

        recognizer.update(Some(&right_hand(0.35, 0.35, 1.85)));
        assert_eq!(recognizer.matcher(A).map(|m| m.segment_index()), Some(1));

        // Still a pausing wave pose, but C fires on x = 3.0 and drops the wave's progress.
        let events = recognizer.update(Some(&right_hand(3.0, 0.35, 1.85)));
        assert_eq!(events.iter().map(|e| e.gesture).collect::<Vec<_>>(), vec![C]);
        assert_eq!(recognizer.matcher(A).map(|m| m.segment_index()), Some(0));
        Ok(())
    }
}
