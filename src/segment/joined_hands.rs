//! Joined hands: both hands raised in front of the chest with the wrists crossed.

use super::{judge, GestureSegment, SegmentOutcome};
use crate::snapshot::{JointSnapshot, JointType};

/// Held for several consecutive segments by the catalog.
pub const JOINED_HANDS: GestureSegment = GestureSegment::new("joined_hands", joined_hands);

fn joined_hands(s: &JointSnapshot) -> SegmentOutcome {
    let left = s.joint(JointType::HandLeft);
    let right = s.joint(JointType::HandRight);
    let base = s.joint(JointType::SpineBase).y;
    let top = s.joint(JointType::SpineShoulder).y;

    let in_front = left.z < s.joint(JointType::ElbowLeft).z
        && right.z < s.joint(JointType::ElbowRight).z;
    let at_chest = left.y > base && left.y < top && right.y > base && right.y < top;
    let inside_shoulders = left.x > s.joint(JointType::ShoulderLeft).x
        && right.x < s.joint(JointType::ShoulderRight).x;

    judge(in_front && at_chest && inside_shoulders, right.x - left.x < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::fixtures::{both_hands, neutral};
    use crate::segment::SegmentOutcome::*;

    #[test]
    fn crossed_hands_succeed() {
        let crossed = both_hands([0.02, 0.2, 1.8], [-0.02, 0.2, 1.8]);
        assert_eq!(JOINED_HANDS.evaluate(&crossed), Succeeded);
    }

    #[test]
    fn hands_apart_are_pausing() {
        let apart = both_hands([-0.1, 0.2, 1.8], [0.1, 0.2, 1.8]);
        assert_eq!(JOINED_HANDS.evaluate(&apart), Pausing);
    }

    #[test]
    fn resting_or_wide_hands_fail() {
        assert_eq!(JOINED_HANDS.evaluate(&neutral()), Failed);
        let wide = both_hands([-0.3, 0.2, 1.8], [0.3, 0.2, 1.8]);
        assert_eq!(JOINED_HANDS.evaluate(&wide), Failed);
    }
}
