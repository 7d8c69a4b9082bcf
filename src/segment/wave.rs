//! Wave segments.
//!
//! A wave is the hand swinging across its elbow while held above it. The
//! catalog alternates the two segments twice: outward, inward, outward, inward.

use super::{judge, GestureSegment, SegmentOutcome};
use crate::snapshot::{JointSnapshot, JointType};

/// Right hand above the right elbow and to its right.
pub const WAVE_RIGHT_OUT: GestureSegment = GestureSegment::new("wave_right_out", wave_right_out);
/// Right hand above the right elbow and to its left.
pub const WAVE_RIGHT_IN: GestureSegment = GestureSegment::new("wave_right_in", wave_right_in);
/// Left hand above the left elbow and to its left.
pub const WAVE_LEFT_OUT: GestureSegment = GestureSegment::new("wave_left_out", wave_left_out);
/// Left hand above the left elbow and to its right.
pub const WAVE_LEFT_IN: GestureSegment = GestureSegment::new("wave_left_in", wave_left_in);

fn wave_right_out(s: &JointSnapshot) -> SegmentOutcome {
    let hand = s.joint(JointType::HandRight);
    let elbow = s.joint(JointType::ElbowRight);
    // A dropped hand means nobody is waving.
    judge(hand.y > elbow.y, hand.x > elbow.x)
}

fn wave_right_in(s: &JointSnapshot) -> SegmentOutcome {
    let hand = s.joint(JointType::HandRight);
    let elbow = s.joint(JointType::ElbowRight);
    judge(hand.y > elbow.y, hand.x < elbow.x)
}

fn wave_left_out(s: &JointSnapshot) -> SegmentOutcome {
    let hand = s.joint(JointType::HandLeft);
    let elbow = s.joint(JointType::ElbowLeft);
    judge(hand.y > elbow.y, hand.x < elbow.x)
}

fn wave_left_in(s: &JointSnapshot) -> SegmentOutcome {
    let hand = s.joint(JointType::HandLeft);
    let elbow = s.joint(JointType::ElbowLeft);
    judge(hand.y > elbow.y, hand.x > elbow.x)
}
