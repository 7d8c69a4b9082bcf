//! Per-body recognition state.
//!
//! Each tracked body gets a recognizer, a set of gestures recognized during
//! the current frame, and a cooldown gate. While the gate is closed the
//! recognizer does not see frames at all.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::GestureCatalog;
use crate::config::GestureSettings;
use crate::recognizer::GestureRecognizer;
use crate::snapshot::{Hand, HandState, JointSnapshot, Point3, TrackingConfidence};
use crate::{GestureEvent, GestureId, GestureSet};

#[derive(Debug)]
pub struct PersonGestureState {
    snapshot: JointSnapshot,
    previous_hand_states: [HandState; 2],
    recognizer: GestureRecognizer,
    recognized: GestureSet,
    cooldown: Duration,
    /// Time of creation or of the last delivered recognition.
    paused_at: Duration,
    debug: bool,
}

impl PersonGestureState {
    /// Create the state for a newly seen body. The cooldown runs from `now`.
    pub fn new(
        snapshot: JointSnapshot,
        settings: &GestureSettings,
        catalog: Arc<GestureCatalog>,
        now: Duration,
    ) -> Self {
        let mut recognizer = GestureRecognizer::new(catalog, settings.bypass_forbidden);
        recognizer.subscribe(settings.gestures.iter());
        recognizer.start();
        Self {
            snapshot,
            previous_hand_states: [HandState::Unknown; 2],
            recognizer,
            recognized: GestureSet::empty(),
            cooldown: settings.cooldown,
            paused_at: now,
            debug: settings.debug,
        }
    }

    pub fn tracking_id(&self) -> u64 {
        self.snapshot.tracking_id()
    }

    pub fn snapshot(&self) -> &JointSnapshot {
        &self.snapshot
    }

    /// Replace the held snapshot, remembering the outgoing hand states when tracked.
    pub fn update_snapshot(&mut self, snapshot: JointSnapshot) {
        for hand in [Hand::Left, Hand::Right] {
            let outgoing = self.snapshot.hand_state(hand);
            if outgoing.is_tracked() {
                self.previous_hand_states[hand_slot(hand)] = outgoing;
            }
        }
        self.snapshot = snapshot;
    }

    pub fn clear_recognized(&mut self) {
        self.recognized.clear();
    }

    /// Run the recognizer on the held snapshot unless the body is untracked
    /// or the cooldown is still running.
    pub fn update_gestures(&mut self, now: Duration) -> Vec<GestureEvent> {
        if !self.snapshot.is_tracked() || self.in_cooldown(now) {
            return Vec::new();
        }
        let events = self.recognizer.update(Some(&self.snapshot));
        for event in &events {
            if self.debug {
                log::info!(
                    "gesture {} recognized for body {}",
                    event.gesture,
                    event.tracking_id
                );
            }
            self.recognized.insert(event.gesture);
            self.paused_at = now;
        }
        events
    }

    pub fn in_cooldown(&self, now: Duration) -> bool {
        now < self.cooldown_until()
    }

    pub fn cooldown_until(&self) -> Duration {
        self.paused_at + self.cooldown
    }

    /// Apply new debug, bypass and cooldown settings without touching progress.
    pub fn reload(&mut self, settings: &GestureSettings) {
        self.debug = settings.debug;
        self.cooldown = settings.cooldown;
        self.recognizer.reload(settings.bypass_forbidden);
    }

    pub fn has_gesture(&self, id: GestureId) -> bool {
        self.recognized.contains(id)
    }

    /// Gestures delivered during the current frame.
    pub fn recognized(&self) -> GestureSet {
        self.recognized
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn hand_state(&self, hand: Hand) -> HandState {
        self.snapshot.hand_state(hand)
    }

    /// Last tracked state of the hand before the current snapshot.
    pub fn previous_hand_state(&self, hand: Hand) -> HandState {
        self.previous_hand_states[hand_slot(hand)]
    }

    pub fn hand_confidence(&self, hand: Hand) -> TrackingConfidence {
        self.snapshot.hand_confidence(hand)
    }

    pub fn hand_position(&self, hand: Hand) -> Point3 {
        self.snapshot.hand_position(hand)
    }

    pub fn cursor_hand(&self) -> Hand {
        self.snapshot.cursor_hand()
    }

    /// The hand just entered `state`.
    pub fn hand_state_started(&self, hand: Hand, state: HandState) -> bool {
        let current = self.hand_state(hand);
        current.is_tracked() && current == state && self.previous_hand_state(hand) != state
    }

    /// The hand just left `state` for another tracked state.
    pub fn hand_state_ended(&self, hand: Hand, state: HandState) -> bool {
        let current = self.hand_state(hand);
        current.is_tracked() && current != state && self.previous_hand_state(hand) == state
    }
}

fn hand_slot(hand: Hand) -> usize {
    match hand {
        Hand::Left => 0,
        Hand::Right => 1,
    }
}
