//! Tracked-people table.
//!
//! `PersonTable` owns one `PersonGestureState` per tracked body:
//! - bodies that disappear from a frame are dropped with all their progress,
//! - new bodies are admitted only while there is a free slot,
//! - known bodies get their snapshot replaced in place.
//!
//! Queries take a 1-based person index in admission order and return a
//! neutral value when there is no such person.

use std::sync::Arc;

use anyhow::Result;

use crate::catalog::GestureCatalog;
use crate::config::GestureSettings;
use crate::person::PersonGestureState;
use crate::snapshot::{BodyFrame, Hand, HandState, Point3, TrackingConfidence};
use crate::{GestureEvent, GestureId};

/// Upper bound on `max_players`.
pub const MAX_PLAYERS_LIMIT: usize = 6;

#[derive(Debug)]
pub struct PersonTable {
    settings: GestureSettings,
    catalog: Arc<GestureCatalog>,
    people: Vec<PersonGestureState>,
}

impl PersonTable {
    /// Table using the built-in gesture catalog.
    pub fn new(settings: GestureSettings) -> Result<Self> {
        Self::with_catalog(settings, GestureCatalog::shared())
    }

    pub fn with_catalog(settings: GestureSettings, catalog: Arc<GestureCatalog>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            catalog,
            people: Vec::new(),
        })
    }

    /// Run one frame through the table and return every delivered recognition.
    pub fn process_frame(&mut self, frame: BodyFrame) -> Vec<GestureEvent> {
        self.skip_frame();
        let now = frame.timestamp;
        self.update_people(frame);

        let mut events = Vec::new();
        for person in &mut self.people {
            events.extend(person.update_gestures(now));
        }
        events
    }

    /// Clear this frame's recognized flags when the host has no new frame.
    pub fn skip_frame(&mut self) {
        for person in &mut self.people {
            person.clear_recognized();
        }
    }

    fn update_people(&mut self, frame: BodyFrame) {
        let present: Vec<u64> = frame.present().map(|s| s.tracking_id()).collect();
        self.people.retain(|person| {
            let keep = present.contains(&person.tracking_id());
            if !keep {
                log::debug!("body {} left; dropping its gesture state", person.tracking_id());
            }
            keep
        });

        for snapshot in frame.bodies.into_iter().flatten() {
            let tracking_id = snapshot.tracking_id();
            if tracking_id == 0 {
                continue;
            }
            if let Some(person) = self
                .people
                .iter_mut()
                .find(|p| p.tracking_id() == tracking_id)
            {
                person.update_snapshot(snapshot);
            } else if self.people.len() < self.settings.max_players {
                log::debug!(
                    "body {} admitted as person {}",
                    tracking_id,
                    self.people.len() + 1
                );
                self.people.push(PersonGestureState::new(
                    snapshot,
                    &self.settings,
                    self.catalog.clone(),
                    frame.timestamp,
                ));
            } else {
                log::trace!("body {} ignored; all {} slots taken", tracking_id, self.settings.max_players);
            }
        }
    }

    /// Validate and apply new settings to the table and every live person.
    ///
    /// Lowering `max_players` only affects future admissions.
    pub fn reload(&mut self, settings: GestureSettings) -> Result<()> {
        settings.validate()?;
        for person in &mut self.people {
            person.reload(&settings);
        }
        self.settings = settings;
        Ok(())
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Tracking ids in person-index order.
    pub fn tracking_ids(&self) -> Vec<u64> {
        self.people.iter().map(|p| p.tracking_id()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonGestureState> {
        self.people.iter()
    }

    /// Person by 1-based index.
    pub fn person(&self, index: usize) -> Option<&PersonGestureState> {
        if self.people.is_empty() {
            return None;
        }
        if index == 0 || index > MAX_PLAYERS_LIMIT {
            log::warn!(
                "invalid person index {}; must be between 1 and {}",
                index,
                MAX_PLAYERS_LIMIT
            );
            return None;
        }
        self.people.get(index - 1)
    }

    // -------------------- Queries --------------------

    pub fn has_gesture(&self, index: usize, id: GestureId) -> bool {
        self.person(index).is_some_and(|p| p.has_gesture(id))
    }

    pub fn hand_state(&self, index: usize, hand: Hand) -> HandState {
        self.person(index)
            .map_or(HandState::NotTracked, |p| p.hand_state(hand))
    }

    pub fn previous_hand_state(&self, index: usize, hand: Hand) -> HandState {
        self.person(index)
            .map_or(HandState::NotTracked, |p| p.previous_hand_state(hand))
    }

    pub fn hand_confidence(&self, index: usize, hand: Hand) -> TrackingConfidence {
        self.person(index)
            .map_or(TrackingConfidence::Low, |p| p.hand_confidence(hand))
    }

    pub fn hand_position(&self, index: usize, hand: Hand) -> Point3 {
        self.person(index)
            .map_or(Point3::ZERO, |p| p.hand_position(hand))
    }

    pub fn hand_height_from_spine(&self, index: usize, hand: Hand) -> f32 {
        self.person(index)
            .map_or(0.0, |p| p.snapshot().hand_height_from_spine(hand))
    }

    pub fn hand_distance_from_spine(&self, index: usize, hand: Hand) -> f32 {
        self.person(index)
            .map_or(0.0, |p| p.snapshot().hand_distance_from_spine(hand))
    }

    /// Spine-relative pointer of the cursor hand; `(0.0, 0.0)` when it is
    /// lowered or there is no such person.
    pub fn hand_pointer(&self, index: usize) -> (f32, f32) {
        self.person(index)
            .map_or((0.0, 0.0), |p| p.snapshot().hand_pointer())
    }

    pub fn hand_state_started(&self, index: usize, hand: Hand, state: HandState) -> bool {
        self.person(index)
            .is_some_and(|p| p.hand_state_started(hand, state))
    }

    pub fn hand_state_ended(&self, index: usize, hand: Hand, state: HandState) -> bool {
        self.person(index)
            .is_some_and(|p| p.hand_state_ended(hand, state))
    }

    pub fn cursor_hand_state(&self, index: usize) -> HandState {
        self.person(index)
            .map_or(HandState::NotTracked, |p| p.hand_state(p.cursor_hand()))
    }

    pub fn cursor_hand_previous_state(&self, index: usize) -> HandState {
        self.person(index)
            .map_or(HandState::NotTracked, |p| p.previous_hand_state(p.cursor_hand()))
    }

    pub fn cursor_hand_confidence(&self, index: usize) -> TrackingConfidence {
        self.person(index)
            .map_or(TrackingConfidence::Low, |p| p.hand_confidence(p.cursor_hand()))
    }

    pub fn cursor_hand_state_started(&self, index: usize, state: HandState) -> bool {
        self.person(index)
            .is_some_and(|p| p.hand_state_started(p.cursor_hand(), state))
    }

    pub fn cursor_hand_state_ended(&self, index: usize, state: HandState) -> bool {
        self.person(index)
            .is_some_and(|p| p.hand_state_ended(p.cursor_hand(), state))
    }
}
