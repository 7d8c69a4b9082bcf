//! Two-handed zoom segments.
//!
//! Zoom in walks inside-shoulders, outside-shoulders, outside-elbows. Zoom out
//! walks the same three segments in reverse.

use super::{judge, GestureSegment, SegmentOutcome};
use crate::snapshot::{JointSnapshot, JointType};

pub const ZOOM_INSIDE_SHOULDERS: GestureSegment =
    GestureSegment::new("zoom_inside_shoulders", inside_shoulders);
pub const ZOOM_OUTSIDE_SHOULDERS: GestureSegment =
    GestureSegment::new("zoom_outside_shoulders", outside_shoulders);
pub const ZOOM_OUTSIDE_ELBOWS: GestureSegment =
    GestureSegment::new("zoom_outside_elbows", outside_elbows);

/// Both hands in front of their elbows and at torso height.
fn both_hands_raised(s: &JointSnapshot) -> bool {
    let base = s.joint(JointType::SpineBase).y;
    let top = s.joint(JointType::SpineShoulder).y;
    [
        (JointType::HandLeft, JointType::ElbowLeft),
        (JointType::HandRight, JointType::ElbowRight),
    ]
    .into_iter()
    .all(|(hand, elbow)| {
        let hand = s.joint(hand);
        hand.z < s.joint(elbow).z && hand.y > base && hand.y < top
    })
}

fn inside_shoulders(s: &JointSnapshot) -> SegmentOutcome {
    let left = s.joint(JointType::ShoulderLeft).x;
    let right = s.joint(JointType::ShoulderRight).x;
    let inside = |x: f32| x > left && x < right;
    judge(
        both_hands_raised(s),
        inside(s.joint(JointType::HandLeft).x) && inside(s.joint(JointType::HandRight).x),
    )
}

fn outside_shoulders(s: &JointSnapshot) -> SegmentOutcome {
    judge(
        both_hands_raised(s),
        s.joint(JointType::HandRight).x > s.joint(JointType::ShoulderRight).x
            && s.joint(JointType::HandLeft).x < s.joint(JointType::ShoulderLeft).x,
    )
}

fn outside_elbows(s: &JointSnapshot) -> SegmentOutcome {
    judge(
        both_hands_raised(s),
        s.joint(JointType::HandRight).x > s.joint(JointType::ElbowRight).x
            && s.joint(JointType::HandLeft).x < s.joint(JointType::ElbowLeft).x,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::fixtures::{both_hands, neutral, right_hand};
    use crate::segment::SegmentOutcome::*;

    #[test]
    fn zoom_segments_track_hand_spread() {
        let close = both_hands([-0.1, 0.2, 1.8], [0.1, 0.2, 1.8]);
        let wide = both_hands([-0.3, 0.2, 1.8], [0.3, 0.2, 1.8]);
        let widest = both_hands([-0.35, 0.2, 1.8], [0.35, 0.2, 1.8]);

        assert_eq!(ZOOM_INSIDE_SHOULDERS.evaluate(&close), Succeeded);
        assert_eq!(ZOOM_OUTSIDE_SHOULDERS.evaluate(&close), Pausing);
        assert_eq!(ZOOM_OUTSIDE_SHOULDERS.evaluate(&wide), Succeeded);
        assert_eq!(ZOOM_OUTSIDE_ELBOWS.evaluate(&widest), Succeeded);
        assert_eq!(ZOOM_INSIDE_SHOULDERS.evaluate(&widest), Pausing);
    }

    #[test]
    fn one_raised_hand_is_not_a_zoom() {
        let one = right_hand(0.1, 0.2, 1.8);
        assert_eq!(ZOOM_INSIDE_SHOULDERS.evaluate(&one), Failed);
        assert_eq!(ZOOM_OUTSIDE_ELBOWS.evaluate(&neutral()), Failed);
    }

    #[test]
    fn hands_above_spine_shoulder_fail() {
        let high = both_hands([-0.1, 0.5, 1.8], [0.1, 0.5, 1.8]);
        assert_eq!(ZOOM_INSIDE_SHOULDERS.evaluate(&high), Failed);
    }
}
