//! Joint snapshot model.
//!
//! A `JointSnapshot` is one frame's view of one tracked body: a camera-space
//! position for every skeleton joint, per-hand open/closed state and the
//! tracking identifier the sensor assigned to the body.
//!
//! Snapshots are immutable once built. Builder methods consume the value, and
//! there is no mutable joint accessor, so every matcher observing a frame sees
//! exactly the same data.
//!
//! Coordinates follow the sensor convention: +x to the body's right as seen by
//! the sensor, +y up, +z away from the sensor. "In front of" therefore means a
//! smaller z.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Pointer value of a hand straight in front of the spine base.
const POINTER_CENTER: f32 = 0.5;

// ----------------------------------------------------------------------------
// Joint vocabulary
// ----------------------------------------------------------------------------

/// The 25 joints reported by the skeletal tracker.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl JointType {
    pub const COUNT: usize = 25;

    pub const ALL: [JointType; JointType::COUNT] = [
        JointType::SpineBase,
        JointType::SpineMid,
        JointType::Neck,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
        JointType::SpineShoulder,
        JointType::HandTipLeft,
        JointType::ThumbLeft,
        JointType::HandTipRight,
        JointType::ThumbRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Camera-space position in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl From<[f32; 3]> for Point3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for [f32; 3] {
    fn from(p: Point3) -> Self {
        [p.x, p.y, p.z]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    #[default]
    Unknown,
    NotTracked,
    Open,
    Closed,
    Lasso,
}

impl HandState {
    /// True for Open, Closed and Lasso.
    pub fn is_tracked(self) -> bool {
        !matches!(self, HandState::Unknown | HandState::NotTracked)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingConfidence {
    #[default]
    Low,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn joint(self) -> JointType {
        match self {
            Hand::Left => JointType::HandLeft,
            Hand::Right => JointType::HandRight,
        }
    }
}

// ----------------------------------------------------------------------------
// JointSnapshot
// ----------------------------------------------------------------------------

/// One body's joints for one frame. Read-only input to every segment predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct JointSnapshot {
    tracking_id: u64,
    tracked: bool,
    joints: [Point3; JointType::COUNT],
    hand_states: [HandState; 2],
    hand_confidences: [TrackingConfidence; 2],
}

impl JointSnapshot {
    /// A tracked body with every joint at the origin and both hands Unknown.
    pub fn new(tracking_id: u64) -> Self {
        Self {
            tracking_id,
            tracked: true,
            joints: [Point3::ZERO; JointType::COUNT],
            hand_states: [HandState::Unknown; 2],
            hand_confidences: [TrackingConfidence::Low; 2],
        }
    }

    pub fn with_joint(mut self, joint: JointType, position: Point3) -> Self {
        self.joints[joint.index()] = position;
        self
    }

    pub fn with_hand_state(mut self, hand: Hand, state: HandState) -> Self {
        self.hand_states[hand_slot(hand)] = state;
        self
    }

    pub fn with_hand_confidence(mut self, hand: Hand, confidence: TrackingConfidence) -> Self {
        self.hand_confidences[hand_slot(hand)] = confidence;
        self
    }

    pub fn with_tracked(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    pub fn tracking_id(&self) -> u64 {
        self.tracking_id
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn joint(&self, joint: JointType) -> Point3 {
        self.joints[joint.index()]
    }

    pub fn hand_state(&self, hand: Hand) -> HandState {
        self.hand_states[hand_slot(hand)]
    }

    pub fn hand_confidence(&self, hand: Hand) -> TrackingConfidence {
        self.hand_confidences[hand_slot(hand)]
    }

    pub fn hand_position(&self, hand: Hand) -> Point3 {
        self.joint(hand.joint())
    }

    /// The hand closer to the sensor; ties go to the right hand.
    pub fn cursor_hand(&self) -> Hand {
        if self.joint(JointType::HandLeft).z < self.joint(JointType::HandRight).z {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    /// Vertical distance from the spine base to the hand.
    pub fn hand_height_from_spine(&self, hand: Hand) -> f32 {
        self.hand_position(hand).y - self.joint(JointType::SpineBase).y
    }

    /// Horizontal offset of the hand from the spine base, shifted by half a
    /// meter so a hand centered on the body reads 0.5.
    pub fn hand_distance_from_spine(&self, hand: Hand) -> f32 {
        POINTER_CENTER + self.hand_position(hand).x - self.joint(JointType::SpineBase).x
    }

    /// Spine-relative `(distance, height)` of the cursor hand, or `(0.0, 0.0)`
    /// while that hand is below the spine base.
    pub fn hand_pointer(&self) -> (f32, f32) {
        let hand = self.cursor_hand();
        let height = self.hand_height_from_spine(hand);
        if height < 0.0 {
            return (0.0, 0.0);
        }
        (self.hand_distance_from_spine(hand), height)
    }
}

fn hand_slot(hand: Hand) -> usize {
    match hand {
        Hand::Left => 0,
        Hand::Right => 1,
    }
}

// ----------------------------------------------------------------------------
// Serialized form
// ----------------------------------------------------------------------------

/// Serde representation of a snapshot. Missing joints default to the origin.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotRecord {
    pub tracking_id: u64,
    #[serde(default = "default_tracked")]
    pub tracked: bool,
    #[serde(default)]
    pub hand_left_state: HandState,
    #[serde(default)]
    pub hand_right_state: HandState,
    #[serde(default)]
    pub hand_left_confidence: TrackingConfidence,
    #[serde(default)]
    pub hand_right_confidence: TrackingConfidence,
    #[serde(default)]
    pub joints: BTreeMap<JointType, Point3>,
}

fn default_tracked() -> bool {
    true
}

impl From<SnapshotRecord> for JointSnapshot {
    fn from(record: SnapshotRecord) -> Self {
        let mut snapshot = JointSnapshot::new(record.tracking_id)
            .with_tracked(record.tracked)
            .with_hand_state(Hand::Left, record.hand_left_state)
            .with_hand_state(Hand::Right, record.hand_right_state)
            .with_hand_confidence(Hand::Left, record.hand_left_confidence)
            .with_hand_confidence(Hand::Right, record.hand_right_confidence);
        for (joint, position) in record.joints {
            snapshot = snapshot.with_joint(joint, position);
        }
        snapshot
    }
}

impl From<&JointSnapshot> for SnapshotRecord {
    fn from(snapshot: &JointSnapshot) -> Self {
        Self {
            tracking_id: snapshot.tracking_id,
            tracked: snapshot.tracked,
            hand_left_state: snapshot.hand_state(Hand::Left),
            hand_right_state: snapshot.hand_state(Hand::Right),
            hand_left_confidence: snapshot.hand_confidence(Hand::Left),
            hand_right_confidence: snapshot.hand_confidence(Hand::Right),
            joints: JointType::ALL
                .into_iter()
                .map(|joint| (joint, snapshot.joint(joint)))
                .collect(),
        }
    }
}

// ----------------------------------------------------------------------------
// BodyFrame
// ----------------------------------------------------------------------------

/// One sensor frame: a slot per potential body, `None` where no body is present.
#[derive(Clone, Debug, Default)]
pub struct BodyFrame {
    /// Time since the session started. This is the kernel's only clock.
    pub timestamp: Duration,
    pub bodies: Vec<Option<JointSnapshot>>,
}

impl BodyFrame {
    pub fn new(timestamp: Duration, bodies: Vec<Option<JointSnapshot>>) -> Self {
        Self { timestamp, bodies }
    }

    /// Present bodies, skipping empty slots.
    pub fn present(&self) -> impl Iterator<Item = &JointSnapshot> {
        self.bodies.iter().flatten()
    }
}

/// Serde representation of a frame (one JSON-lines record).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyFrameRecord {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub bodies: Vec<Option<SnapshotRecord>>,
}

impl TryFrom<BodyFrameRecord> for BodyFrame {
    type Error = anyhow::Error;

    fn try_from(record: BodyFrameRecord) -> Result<Self> {
        let mut seen = Vec::with_capacity(record.bodies.len());
        for body in record.bodies.iter().flatten() {
            if seen.contains(&body.tracking_id) {
                return Err(anyhow!(
                    "duplicate tracking_id {} in one frame",
                    body.tracking_id
                ));
            }
            seen.push(body.tracking_id);
        }
        Ok(BodyFrame {
            timestamp: Duration::from_millis(record.timestamp_ms),
            bodies: record
                .bodies
                .into_iter()
                .map(|body| body.map(JointSnapshot::from))
                .collect(),
        })
    }
}
