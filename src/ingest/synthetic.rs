//! Synthetic body source (`stub://<script>`).
//!
//! Plays one body performing a scripted gesture in a loop: each key pose is
//! held for a few frames, then the body returns to a rest pose before the
//! script repeats. Optional seeded jitter perturbs both hand joints.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::SourceStats;
use crate::config::SourceSettings;
use crate::snapshot::{BodyFrame, Hand, HandState, JointSnapshot, JointType, Point3};

/// Tracking id of the scripted body.
pub const SYNTHETIC_TRACKING_ID: u64 = 1;

const HOLD_FRAMES: usize = 3;
const REST_FRAMES: usize = 15;

/// Scripted gesture loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntheticScript {
    Idle,
    WaveRightHand,
    WaveLeftHand,
    SwipeUpRightHand,
    SwipeDownRightHand,
    ZoomIn,
    JoinedHands,
}

impl SyntheticScript {
    pub const ALL: [SyntheticScript; 7] = [
        SyntheticScript::Idle,
        SyntheticScript::WaveRightHand,
        SyntheticScript::WaveLeftHand,
        SyntheticScript::SwipeUpRightHand,
        SyntheticScript::SwipeDownRightHand,
        SyntheticScript::ZoomIn,
        SyntheticScript::JoinedHands,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SyntheticScript::Idle => "idle",
            SyntheticScript::WaveRightHand => "wave_right_hand",
            SyntheticScript::WaveLeftHand => "wave_left_hand",
            SyntheticScript::SwipeUpRightHand => "swipe_up_right_hand",
            SyntheticScript::SwipeDownRightHand => "swipe_down_right_hand",
            SyntheticScript::ZoomIn => "zoom_in",
            SyntheticScript::JoinedHands => "joined_hands",
        }
    }

    /// One loop of the script: key poses with their hold, then rest.
    fn cycle(self) -> Vec<JointSnapshot> {
        let rest = neutral_body(SYNTHETIC_TRACKING_ID);
        let right = |x, y, z| rest.clone().with_joint(JointType::HandRight, Point3::new(x, y, z));
        let left = |x, y, z| rest.clone().with_joint(JointType::HandLeft, Point3::new(x, y, z));
        let both = |lx: f32, rx: f32| {
            rest.clone()
                .with_joint(JointType::HandLeft, Point3::new(lx, 0.2, 1.8))
                .with_joint(JointType::HandRight, Point3::new(rx, 0.2, 1.8))
        };

        let (keys, hold) = match self {
            SyntheticScript::Idle => (Vec::new(), HOLD_FRAMES),
            SyntheticScript::WaveRightHand => {
                let out = right(0.35, 0.35, 1.85);
                let inward = right(0.15, 0.35, 1.85);
                (vec![out.clone(), inward.clone(), out, inward], HOLD_FRAMES)
            }
            SyntheticScript::WaveLeftHand => {
                let out = left(-0.35, 0.35, 1.85);
                let inward = left(-0.15, 0.35, 1.85);
                (vec![out.clone(), inward.clone(), out, inward], HOLD_FRAMES)
            }
            SyntheticScript::SwipeUpRightHand => (
                vec![
                    right(0.35, 0.30, 1.85),
                    right(0.35, 0.50, 1.85),
                    right(0.35, 0.70, 1.85),
                ],
                HOLD_FRAMES,
            ),
            SyntheticScript::SwipeDownRightHand => (
                vec![
                    right(0.35, 0.35, 1.85),
                    right(0.35, 0.0, 1.85),
                    right(0.35, -0.25, 1.85),
                ],
                HOLD_FRAMES,
            ),
            SyntheticScript::ZoomIn => (
                vec![both(-0.1, 0.1), both(-0.3, 0.3), both(-0.35, 0.35)],
                HOLD_FRAMES,
            ),
            // The joined pose must be held for five consecutive frames.
            SyntheticScript::JoinedHands => (vec![both(0.02, -0.02)], 6),
        };

        let mut frames = Vec::with_capacity(keys.len() * hold + REST_FRAMES);
        for key in keys {
            frames.extend(std::iter::repeat(key).take(hold));
        }
        frames.extend(std::iter::repeat(rest).take(REST_FRAMES));
        frames
    }
}

impl fmt::Display for SyntheticScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyntheticScript {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        SyntheticScript::ALL
            .into_iter()
            .find(|script| script.name() == raw)
            .ok_or_else(|| {
                let known: Vec<_> = SyntheticScript::ALL.iter().map(|s| s.name()).collect();
                anyhow!(
                    "unknown synthetic script {:?} (expected one of: {})",
                    raw,
                    known.join(", ")
                )
            })
    }
}

/// Rest pose about two meters from the sensor with the arms hanging down.
pub fn neutral_body(tracking_id: u64) -> JointSnapshot {
    use JointType::*;
    let joints = [
        (Head, Point3::new(0.0, 0.60, 2.0)),
        (Neck, Point3::new(0.0, 0.50, 2.0)),
        (SpineShoulder, Point3::new(0.0, 0.45, 2.0)),
        (SpineMid, Point3::new(0.0, 0.20, 2.0)),
        (SpineBase, Point3::new(0.0, -0.10, 2.0)),
        (ShoulderLeft, Point3::new(-0.20, 0.42, 2.0)),
        (ShoulderRight, Point3::new(0.20, 0.42, 2.0)),
        (ElbowLeft, Point3::new(-0.25, 0.15, 2.0)),
        (ElbowRight, Point3::new(0.25, 0.15, 2.0)),
        (WristLeft, Point3::new(-0.26, -0.05, 2.0)),
        (WristRight, Point3::new(0.26, -0.05, 2.0)),
        (HandLeft, Point3::new(-0.27, -0.12, 2.0)),
        (HandRight, Point3::new(0.27, -0.12, 2.0)),
        (HipLeft, Point3::new(-0.10, -0.15, 2.0)),
        (HipRight, Point3::new(0.10, -0.15, 2.0)),
        (KneeLeft, Point3::new(-0.11, -0.55, 2.0)),
        (KneeRight, Point3::new(0.11, -0.55, 2.0)),
        (AnkleLeft, Point3::new(-0.12, -0.95, 2.0)),
        (AnkleRight, Point3::new(0.12, -0.95, 2.0)),
        (FootLeft, Point3::new(-0.12, -1.00, 1.9)),
        (FootRight, Point3::new(0.12, -1.00, 1.9)),
    ];
    joints
        .into_iter()
        .fold(JointSnapshot::new(tracking_id), |s, (joint, p)| s.with_joint(joint, p))
        .with_hand_state(Hand::Left, HandState::Open)
        .with_hand_state(Hand::Right, HandState::Open)
}

pub(super) struct SyntheticSource {
    uri: String,
    script: SyntheticScript,
    cycle: Vec<JointSnapshot>,
    target_fps: u32,
    jitter: f32,
    rng: StdRng,
    frame_count: u64,
}

impl SyntheticSource {
    pub(super) fn new(settings: &SourceSettings, script_name: &str) -> Result<Self> {
        let script: SyntheticScript = script_name.parse()?;
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            uri: settings.uri.clone(),
            script,
            cycle: script.cycle(),
            target_fps: settings.target_fps.max(1),
            jitter: settings.jitter,
            rng,
            frame_count: 0,
        })
    }

    pub(super) fn connect(&mut self) -> Result<()> {
        log::info!(
            "FrameSource: connected to {} (synthetic, script {})",
            self.uri,
            self.script
        );
        Ok(())
    }

    /// Never ends.
    pub(super) fn next_frame(&mut self) -> Result<Option<BodyFrame>> {
        let index = (self.frame_count % self.cycle.len() as u64) as usize;
        let timestamp =
            Duration::from_nanos(self.frame_count * 1_000_000_000 / u64::from(self.target_fps));
        self.frame_count += 1;

        let mut body = self.cycle[index].clone();
        if self.jitter > 0.0 {
            for joint in [JointType::HandLeft, JointType::HandRight] {
                let p = body.joint(joint);
                let moved = p.offset(self.noise(), self.noise(), self.noise());
                body = body.with_joint(joint, moved);
            }
        }
        Ok(Some(BodyFrame::new(timestamp, vec![Some(body)])))
    }

    fn noise(&mut self) -> f32 {
        self.rng.gen_range(-self.jitter..=self.jitter)
    }

    pub(super) fn is_healthy(&self) -> bool {
        true
    }

    pub(super) fn stats(&self) -> SourceStats {
        SourceStats {
            frames_delivered: self.frame_count,
            uri: self.uri.clone(),
        }
    }
}
