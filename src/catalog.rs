//! Gesture catalog.
//!
//! Maps every `GestureId` to its ordered segments and its forbidden-next set.
//! The built-in catalog is constructed once per process and shared read-only
//! by every recognizer through `Arc`.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, Result};

use crate::segment::joined_hands::JOINED_HANDS;
use crate::segment::swipe::{
    SWIPE_DOWN_LEFT, SWIPE_DOWN_RIGHT, SWIPE_LEFT_WITH_LEFT, SWIPE_LEFT_WITH_RIGHT,
    SWIPE_RIGHT_WITH_LEFT, SWIPE_RIGHT_WITH_RIGHT, SWIPE_UP_LEFT, SWIPE_UP_RIGHT,
};
use crate::segment::wave::{WAVE_LEFT_IN, WAVE_LEFT_OUT, WAVE_RIGHT_IN, WAVE_RIGHT_OUT};
use crate::segment::zoom::{ZOOM_INSIDE_SHOULDERS, ZOOM_OUTSIDE_ELBOWS, ZOOM_OUTSIDE_SHOULDERS};
use crate::segment::GestureSegment;
use crate::{GestureId, GestureSet};

/// Immutable description of one gesture.
#[derive(Clone, Debug)]
pub struct GestureDefinition {
    id: GestureId,
    segments: Vec<GestureSegment>,
    forbidden_next: GestureSet,
}

impl GestureDefinition {
    pub fn new(
        id: GestureId,
        segments: Vec<GestureSegment>,
        forbidden_next: GestureSet,
    ) -> Result<Self> {
        if segments.is_empty() {
            return Err(anyhow!("gesture {} has no segments", id));
        }
        Ok(Self {
            id,
            segments,
            forbidden_next,
        })
    }

    pub fn id(&self) -> GestureId {
        self.id
    }

    /// Never empty.
    pub fn segments(&self) -> &[GestureSegment] {
        &self.segments
    }

    pub fn forbidden_next(&self) -> GestureSet {
        self.forbidden_next
    }
}

/// Read-only table of gesture definitions keyed by id.
#[derive(Debug)]
pub struct GestureCatalog {
    definitions: BTreeMap<GestureId, Arc<GestureDefinition>>,
}

static BUILTIN: OnceLock<Arc<GestureCatalog>> = OnceLock::new();

impl GestureCatalog {
    /// Build a catalog from explicit definitions. Duplicate ids are rejected.
    pub fn from_definitions(definitions: Vec<GestureDefinition>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for definition in definitions {
            let id = definition.id();
            if map.insert(id, Arc::new(definition)).is_some() {
                return Err(anyhow!("gesture {} defined more than once", id));
            }
        }
        Ok(Self { definitions: map })
    }

    /// The thirteen built-in gestures.
    pub fn builtin() -> Self {
        let definitions = GestureId::ALL.into_iter().map(|id| {
            let definition = GestureDefinition {
                id,
                segments: builtin_segments(id),
                forbidden_next: builtin_forbidden(id),
            };
            (id, Arc::new(definition))
        });
        Self {
            definitions: definitions.collect(),
        }
    }

    /// Process-wide built-in catalog, constructed on first use.
    pub fn shared() -> Arc<GestureCatalog> {
        BUILTIN
            .get_or_init(|| Arc::new(GestureCatalog::builtin()))
            .clone()
    }

    pub fn get(&self, id: GestureId) -> Option<&Arc<GestureDefinition>> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: GestureId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Definitions in `GestureId` order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<GestureDefinition>> {
        self.definitions.values()
    }

    pub fn ids(&self) -> GestureSet {
        self.definitions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn builtin_segments(id: GestureId) -> Vec<GestureSegment> {
    match id {
        GestureId::JoinedHands => vec![JOINED_HANDS; 5],
        GestureId::WaveRightHand => {
            vec![WAVE_RIGHT_OUT, WAVE_RIGHT_IN, WAVE_RIGHT_OUT, WAVE_RIGHT_IN]
        }
        GestureId::WaveLeftHand => vec![WAVE_LEFT_OUT, WAVE_LEFT_IN, WAVE_LEFT_OUT, WAVE_LEFT_IN],
        GestureId::SwipeUpRightHand => SWIPE_UP_RIGHT.to_vec(),
        GestureId::SwipeUpLeftHand => SWIPE_UP_LEFT.to_vec(),
        GestureId::SwipeDownRightHand => SWIPE_DOWN_RIGHT.to_vec(),
        GestureId::SwipeDownLeftHand => SWIPE_DOWN_LEFT.to_vec(),
        GestureId::ZoomIn => vec![
            ZOOM_INSIDE_SHOULDERS,
            ZOOM_OUTSIDE_SHOULDERS,
            ZOOM_OUTSIDE_ELBOWS,
        ],
        GestureId::ZoomOut => vec![
            ZOOM_OUTSIDE_ELBOWS,
            ZOOM_OUTSIDE_SHOULDERS,
            ZOOM_INSIDE_SHOULDERS,
        ],
        GestureId::SwipeLeftWithRightHand => SWIPE_LEFT_WITH_RIGHT.to_vec(),
        GestureId::SwipeLeftWithLeftHand => SWIPE_LEFT_WITH_LEFT.to_vec(),
        GestureId::SwipeRightWithLeftHand => SWIPE_RIGHT_WITH_LEFT.to_vec(),
        GestureId::SwipeRightWithRightHand => SWIPE_RIGHT_WITH_RIGHT.to_vec(),
    }
}

fn builtin_forbidden(id: GestureId) -> GestureSet {
    match id {
        // A raised hand coming back down would otherwise read as a swipe down.
        GestureId::WaveRightHand
        | GestureId::WaveLeftHand
        | GestureId::SwipeUpRightHand
        | GestureId::SwipeUpLeftHand => {
            GestureSet::from([GestureId::SwipeDownRightHand, GestureId::SwipeDownLeftHand])
        }
        _ => GestureSet::empty(),
    }
}
