//! Skeletal Gesture Kernel
//!
//! This crate turns a per-frame stream of skeletal joint snapshots into discrete
//! "gesture recognized" events for every tracked person.
//!
//! # Architecture
//!
//! Per frame, the pipeline runs to completion on one thread:
//!
//! 1. **Snapshots**: the frame source delivers one `JointSnapshot` per body slot.
//! 2. **People**: `PersonTable` creates, updates and drops per-body state by tracking id.
//! 3. **Recognizer**: each person's `GestureRecognizer` feeds the snapshot to every matcher.
//! 4. **Matchers**: a `GestureMatcher` walks one gesture's ordered segments and fires on the last.
//! 5. **Suppression**: a recognition resets all matchers and may discard the next one.
//! 6. **Cooldown**: a person that just recognized a gesture skips updates for a while.
//!
//! # Module Structure
//!
//! - `snapshot`: joint model (JointSnapshot, BodyFrame, HandState)
//! - `segment`: stateless geometric predicates (Succeeded / Failed / Pausing)
//! - `catalog`: immutable gesture definitions shared by all recognizers
//! - `matcher`, `recognizer`, `person`, `people`: the recognition state
//! - `config`, `ingest`: settings and frame sources for the binaries
//! - Core types: GestureId, GestureSet, GestureEvent

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub mod catalog;
pub mod config;
pub mod ingest;
pub mod matcher;
pub mod people;
pub mod person;
pub mod recognizer;
pub mod segment;
pub mod snapshot;

pub use catalog::{GestureCatalog, GestureDefinition};
pub use config::{GestureConfig, GestureSettings, SourceSettings};
pub use ingest::{FrameSource, SourceStats};
pub use matcher::{GestureMatcher, MAX_PAUSE_FRAMES, SHORT_PAUSE_FRAMES, WINDOW_SIZE};
pub use people::{PersonTable, MAX_PLAYERS_LIMIT};
pub use person::PersonGestureState;
pub use recognizer::GestureRecognizer;
pub use segment::{GestureSegment, SegmentOutcome};
pub use snapshot::{
    BodyFrame, Hand, HandState, JointSnapshot, JointType, Point3, SnapshotRecord,
    TrackingConfidence,
};

// -------------------- Gesture Ids --------------------

/// Closed set of gestures the kernel knows how to match.
///
/// The discriminant doubles as a dense index (see [`GestureId::index`]).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GestureId {
    /// Hands joined in front of the chest.
    JoinedHands,
    WaveRightHand,
    WaveLeftHand,
    SwipeUpRightHand,
    SwipeUpLeftHand,
    SwipeDownRightHand,
    SwipeDownLeftHand,
    /// Both hands move apart.
    ZoomIn,
    /// Both hands move together.
    ZoomOut,
    SwipeLeftWithRightHand,
    SwipeLeftWithLeftHand,
    SwipeRightWithLeftHand,
    SwipeRightWithRightHand,
}

impl GestureId {
    pub const COUNT: usize = 13;

    pub const ALL: [GestureId; GestureId::COUNT] = [
        GestureId::JoinedHands,
        GestureId::WaveRightHand,
        GestureId::WaveLeftHand,
        GestureId::SwipeUpRightHand,
        GestureId::SwipeUpLeftHand,
        GestureId::SwipeDownRightHand,
        GestureId::SwipeDownLeftHand,
        GestureId::ZoomIn,
        GestureId::ZoomOut,
        GestureId::SwipeLeftWithRightHand,
        GestureId::SwipeLeftWithLeftHand,
        GestureId::SwipeRightWithLeftHand,
        GestureId::SwipeRightWithRightHand,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            GestureId::JoinedHands => "joined_hands",
            GestureId::WaveRightHand => "wave_right_hand",
            GestureId::WaveLeftHand => "wave_left_hand",
            GestureId::SwipeUpRightHand => "swipe_up_right_hand",
            GestureId::SwipeUpLeftHand => "swipe_up_left_hand",
            GestureId::SwipeDownRightHand => "swipe_down_right_hand",
            GestureId::SwipeDownLeftHand => "swipe_down_left_hand",
            GestureId::ZoomIn => "zoom_in",
            GestureId::ZoomOut => "zoom_out",
            GestureId::SwipeLeftWithRightHand => "swipe_left_with_right_hand",
            GestureId::SwipeLeftWithLeftHand => "swipe_left_with_left_hand",
            GestureId::SwipeRightWithLeftHand => "swipe_right_with_left_hand",
            GestureId::SwipeRightWithRightHand => "swipe_right_with_right_hand",
        }
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GestureId {
    type Err = anyhow::Error;

    /// Accepts the snake_case name or the CamelCase variant name, case-insensitively.
    fn from_str(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        GestureId::ALL
            .into_iter()
            .find(|id| id.name().replace('_', "") == normalized)
            .ok_or_else(|| anyhow!("unknown gesture id: {}", raw.trim()))
    }
}

// -------------------- Gesture Sets --------------------

/// Small copyable set of gesture ids (one bit per id).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GestureSet {
    bits: u16,
}

impl GestureSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        GestureId::ALL.into_iter().collect()
    }

    pub fn contains(&self, id: GestureId) -> bool {
        self.bits & (1 << id.index()) != 0
    }

    /// Returns true when the id was not already present.
    pub fn insert(&mut self, id: GestureId) -> bool {
        let added = !self.contains(id);
        self.bits |= 1 << id.index();
        added
    }

    pub fn remove(&mut self, id: GestureId) {
        self.bits &= !(1 << id.index());
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates in `GestureId` order.
    pub fn iter(&self) -> impl Iterator<Item = GestureId> + '_ {
        GestureId::ALL.into_iter().filter(|id| self.contains(*id))
    }
}

impl FromIterator<GestureId> for GestureSet {
    fn from_iter<I: IntoIterator<Item = GestureId>>(iter: I) -> Self {
        let mut set = GestureSet::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<const N: usize> From<[GestureId; N]> for GestureSet {
    fn from(ids: [GestureId; N]) -> Self {
        ids.into_iter().collect()
    }
}

impl fmt::Debug for GestureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for GestureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for GestureSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let ids = Vec::<GestureId>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

// -------------------- Events --------------------

/// A recognized gesture, as delivered out of a recognizer pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GestureEvent {
    pub gesture: GestureId,
    /// Gestures whose very next recognition is discarded after this one.
    pub forbidden_next: GestureSet,
    pub tracking_id: u64,
}
