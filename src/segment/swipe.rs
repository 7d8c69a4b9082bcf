//! Swipe segments.
//!
//! Every swipe is three steps: qualify, midpoint, endpoint.
//!
//! Vertical swipes keep the hand outside its shoulder and in front of its
//! elbow. Horizontal swipes keep the hand in front of its elbow and between
//! the spine base and the spine shoulder while it crosses the body.

use super::{judge, GestureSegment, SegmentOutcome};
use crate::snapshot::{Hand, JointSnapshot, JointType, Point3};

pub const SWIPE_UP_RIGHT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_up_right_start", |s| up_start(s, Hand::Right)),
    GestureSegment::new("swipe_up_right_shoulder", |s| up_shoulder(s, Hand::Right)),
    GestureSegment::new("swipe_up_right_head", |s| up_head(s, Hand::Right)),
];

pub const SWIPE_UP_LEFT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_up_left_start", |s| up_start(s, Hand::Left)),
    GestureSegment::new("swipe_up_left_shoulder", |s| up_shoulder(s, Hand::Left)),
    GestureSegment::new("swipe_up_left_head", |s| up_head(s, Hand::Left)),
];

pub const SWIPE_DOWN_RIGHT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_down_right_start", |s| down_start(s, Hand::Right)),
    GestureSegment::new("swipe_down_right_elbow", |s| down_elbow(s, Hand::Right)),
    GestureSegment::new("swipe_down_right_hip", |s| down_hip(s, Hand::Right)),
];

pub const SWIPE_DOWN_LEFT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_down_left_start", |s| down_start(s, Hand::Left)),
    GestureSegment::new("swipe_down_left_elbow", |s| down_elbow(s, Hand::Left)),
    GestureSegment::new("swipe_down_left_hip", |s| down_hip(s, Hand::Left)),
];

pub const SWIPE_LEFT_WITH_LEFT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_left_with_left_start", left_with_left_start),
    GestureSegment::new("swipe_left_with_left_middle", |s| across_middle(s, Hand::Left)),
    GestureSegment::new("swipe_left_with_left_end", left_with_left_end),
];

pub const SWIPE_RIGHT_WITH_RIGHT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_right_with_right_start", right_with_right_start),
    GestureSegment::new("swipe_right_with_right_middle", |s| across_middle(s, Hand::Right)),
    GestureSegment::new("swipe_right_with_right_end", right_with_right_end),
];

pub const SWIPE_LEFT_WITH_RIGHT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_left_with_right_start", left_with_right_start),
    GestureSegment::new("swipe_left_with_right_middle", |s| across_middle(s, Hand::Right)),
    GestureSegment::new("swipe_left_with_right_end", left_with_right_end),
];

pub const SWIPE_RIGHT_WITH_LEFT: [GestureSegment; 3] = [
    GestureSegment::new("swipe_right_with_left_start", right_with_left_start),
    GestureSegment::new("swipe_right_with_left_middle", |s| across_middle(s, Hand::Left)),
    GestureSegment::new("swipe_right_with_left_end", right_with_left_end),
];

// ----------------------------------------------------------------------------
// Arm geometry
// ----------------------------------------------------------------------------

struct Arm {
    side: Hand,
    hand: Point3,
    elbow: Point3,
    shoulder: Point3,
    hip: Point3,
}

impl Arm {
    fn of(s: &JointSnapshot, side: Hand) -> Self {
        let (elbow, shoulder, hip) = match side {
            Hand::Left => (JointType::ElbowLeft, JointType::ShoulderLeft, JointType::HipLeft),
            Hand::Right => (JointType::ElbowRight, JointType::ShoulderRight, JointType::HipRight),
        };
        Self {
            side,
            hand: s.joint(side.joint()),
            elbow: s.joint(elbow),
            shoulder: s.joint(shoulder),
            hip: s.joint(hip),
        }
    }

    /// Hand further from the body's midline than `x`, on this arm's side.
    fn outward_of(&self, x: f32) -> bool {
        match self.side {
            Hand::Left => self.hand.x < x,
            Hand::Right => self.hand.x > x,
        }
    }

    fn in_front_of_elbow(&self) -> bool {
        self.hand.z < self.elbow.z
    }

    /// Hand at torso height: strictly between spine base and spine shoulder.
    fn at_torso_height(&self, s: &JointSnapshot) -> bool {
        self.hand.y > s.joint(JointType::SpineBase).y
            && self.hand.y < s.joint(JointType::SpineShoulder).y
    }
}

// ----------------------------------------------------------------------------
// Vertical swipes
// ----------------------------------------------------------------------------

fn up_start(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    let between_spine_and_head =
        s.joint(JointType::SpineBase).y < arm.hand.y && arm.hand.y < s.joint(JointType::Head).y;
    judge(
        arm.outward_of(arm.shoulder.x) && between_spine_and_head,
        arm.in_front_of_elbow(),
    )
}

fn up_shoulder(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    judge(
        arm.outward_of(arm.shoulder.x) && arm.in_front_of_elbow(),
        arm.hand.y > arm.shoulder.y,
    )
}

fn up_head(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    judge(
        arm.outward_of(arm.shoulder.x) && arm.in_front_of_elbow(),
        arm.hand.y > s.joint(JointType::Head).y,
    )
}

fn down_start(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    judge(
        arm.outward_of(arm.shoulder.x) && arm.in_front_of_elbow(),
        arm.hand.y < s.joint(JointType::Head).y && arm.hand.y > arm.elbow.y,
    )
}

fn down_elbow(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    judge(
        arm.outward_of(arm.shoulder.x) && arm.in_front_of_elbow(),
        arm.hand.y < arm.elbow.y,
    )
}

fn down_hip(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    judge(
        arm.outward_of(arm.shoulder.x) && arm.in_front_of_elbow(),
        arm.hand.y < arm.hip.y,
    )
}

// ----------------------------------------------------------------------------
// Horizontal swipes
// ----------------------------------------------------------------------------

fn across(s: &JointSnapshot, side: Hand, target: impl FnOnce(&Arm) -> bool) -> SegmentOutcome {
    let arm = Arm::of(s, side);
    judge(arm.in_front_of_elbow() && arm.at_torso_height(s), target(&arm))
}

fn across_middle(s: &JointSnapshot, side: Hand) -> SegmentOutcome {
    across(s, side, |arm| {
        arm.hand.x > s.joint(JointType::ShoulderLeft).x
            && arm.hand.x < s.joint(JointType::ShoulderRight).x
    })
}

fn left_with_left_start(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Left, |arm| arm.hand.x > s.joint(JointType::SpineMid).x)
}

fn left_with_left_end(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Left, |arm| {
        arm.hand.x < s.joint(JointType::ShoulderRight).x && arm.hand.x < arm.elbow.x
    })
}

fn right_with_right_start(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Right, |arm| arm.hand.x < s.joint(JointType::SpineMid).x)
}

fn right_with_right_end(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Right, |arm| {
        arm.hand.x > arm.shoulder.x && arm.hand.x > arm.elbow.x
    })
}

fn left_with_right_start(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Right, |arm| {
        arm.hand.x > arm.shoulder.x && arm.hand.x > arm.elbow.x
    })
}

fn left_with_right_end(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Right, |arm| arm.hand.x < s.joint(JointType::SpineMid).x)
}

fn right_with_left_start(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Left, |arm| {
        arm.hand.x < arm.shoulder.x && arm.hand.x < arm.elbow.x
    })
}

fn right_with_left_end(s: &JointSnapshot) -> SegmentOutcome {
    across(s, Hand::Left, |arm| arm.hand.x > s.joint(JointType::SpineMid).x)
}
