//! Gesture segment predicates.
//!
//! A segment is one geometric sub-pose of a gesture. It is a pure function of a
//! single `JointSnapshot`: no smoothing, no memory of previous frames.
//!
//! Every predicate in this library has the same two-level shape:
//! - hard preconditions (the gesture is being attempted at all), and
//! - a positional target (this stage of the gesture is reached).
//!
//! A violated precondition is `Failed`; a held precondition with an unmet target
//! is `Pausing`; both satisfied is `Succeeded`. All comparisons are strict.

use std::fmt;

use crate::snapshot::JointSnapshot;

pub mod joined_hands;
pub mod swipe;
pub mod wave;
pub mod zoom;

/// Tri-state result of evaluating one segment against one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentOutcome {
    /// The sub-pose for this stage is satisfied.
    Succeeded,
    /// A hard precondition is violated; the attempt must be abandoned.
    Failed,
    /// Preconditions hold but the target is not reached yet.
    Pausing,
}

pub type SegmentCheck = fn(&JointSnapshot) -> SegmentOutcome;

/// Named, stateless predicate. Cheap to copy and safe to share between matchers.
#[derive(Clone, Copy)]
pub struct GestureSegment {
    name: &'static str,
    check: SegmentCheck,
}

impl GestureSegment {
    pub const fn new(name: &'static str, check: SegmentCheck) -> Self {
        Self { name, check }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn evaluate(&self, snapshot: &JointSnapshot) -> SegmentOutcome {
        (self.check)(snapshot)
    }
}

impl fmt::Debug for GestureSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GestureSegment").field(&self.name).finish()
    }
}

/// Collapse a precondition and a target into an outcome.
pub(crate) fn judge(preconditions: bool, target: bool) -> SegmentOutcome {
    if !preconditions {
        SegmentOutcome::Failed
    } else if target {
        SegmentOutcome::Succeeded
    } else {
        SegmentOutcome::Pausing
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Reference skeleton shared by the predicate tests.
    //!
    //! Neutral stance, about two meters from the sensor, arms hanging down.

    use crate::ingest::synthetic::neutral_body;
    use crate::snapshot::{Hand, HandState, JointSnapshot, JointType, Point3};

    /// Body 1 at rest, hand states unknown.
    pub fn neutral() -> JointSnapshot {
        neutral_body(1)
            .with_hand_state(Hand::Left, HandState::Unknown)
            .with_hand_state(Hand::Right, HandState::Unknown)
    }

    pub fn right_hand(x: f32, y: f32, z: f32) -> JointSnapshot {
        neutral().with_joint(JointType::HandRight, Point3::new(x, y, z))
    }

    pub fn left_hand(x: f32, y: f32, z: f32) -> JointSnapshot {
        neutral().with_joint(JointType::HandLeft, Point3::new(x, y, z))
    }

    pub fn both_hands(left: [f32; 3], right: [f32; 3]) -> JointSnapshot {
        neutral()
            .with_joint(JointType::HandLeft, Point3::from(left))
            .with_joint(JointType::HandRight, Point3::from(right))
    }
}
