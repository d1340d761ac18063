//! Canonical road roles of one merge/branch event and an id-indexed map over
//! them.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Attach side of the ramp relative to mainline travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EventKind {
    /// The ramp joins the mainline.
    Merge,
    /// The ramp leaves the mainline.
    Branch,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Merge => "merge",
            EventKind::Branch => "branch",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EventKind {
    type Err = crate::CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(EventKind::Merge),
            "branch" | "diverge" => Ok(EventKind::Branch),
            other => Err(crate::CoreError::Parse(format!(
                "invalid event kind {other:?}: expected \"merge\" or \"branch\""
            ))),
        }
    }
}

/// Which end of a road a link attaches to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ContactPoint {
    Start,
    End,
}

impl ContactPoint {
    pub fn name(self) -> &'static str {
        match self {
            ContactPoint::Start => "start",
            ContactPoint::End => "end",
        }
    }
}

/// The six sub-roads one interchange event is decomposed into.
///
/// Mainline travel order is `MainPreEvent → Wedge → MainPostNear →
/// MainPostFar` for both event kinds.  Ramp travel is `RampFar → RampNear →
/// Wedge` for a merge and `Wedge → RampNear → RampFar` for a branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CanonicalRoadId {
    MainPreEvent,
    Wedge,
    MainPostNear,
    MainPostFar,
    RampNear,
    RampFar,
}

impl CanonicalRoadId {
    pub const COUNT: usize = 6;

    /// Every id in storage order.
    pub const ALL: [CanonicalRoadId; 6] = [
        CanonicalRoadId::MainPreEvent,
        CanonicalRoadId::Wedge,
        CanonicalRoadId::MainPostNear,
        CanonicalRoadId::MainPostFar,
        CanonicalRoadId::RampNear,
        CanonicalRoadId::RampFar,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CanonicalRoadId::MainPreEvent => "main_pre_event",
            CanonicalRoadId::Wedge => "wedge",
            CanonicalRoadId::MainPostNear => "main_post_near",
            CanonicalRoadId::MainPostFar => "main_post_far",
            CanonicalRoadId::RampNear => "ramp_near",
            CanonicalRoadId::RampFar => "ramp_far",
        }
    }

    /// `true` for the four roads on the mainline.
    pub fn is_mainline(self) -> bool {
        !self.is_ramp()
    }

    pub fn is_ramp(self) -> bool {
        matches!(self, CanonicalRoadId::RampNear | CanonicalRoadId::RampFar)
    }
}

impl fmt::Display for CanonicalRoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── RoadMap ───────────────────────────────────────────────────────────────────

/// Exactly one `T` per [`CanonicalRoadId`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadMap<T> {
    slots: [T; 6],
}

impl<T> RoadMap<T> {
    /// Wrap values given in [`CanonicalRoadId::ALL`] order.
    pub fn from_array(slots: [T; 6]) -> Self {
        Self { slots }
    }

    pub fn from_fn(mut f: impl FnMut(CanonicalRoadId) -> T) -> Self {
        Self { slots: std::array::from_fn(|i| f(CanonicalRoadId::ALL[i])) }
    }

    #[inline]
    pub fn get(&self, id: CanonicalRoadId) -> &T {
        &self.slots[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: CanonicalRoadId) -> &mut T {
        &mut self.slots[id.index()]
    }

    /// Store `value` under `id`, returning the previous value.
    pub fn replace(&mut self, id: CanonicalRoadId, value: T) -> T {
        std::mem::replace(&mut self.slots[id.index()], value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalRoadId, &T)> {
        CanonicalRoadId::ALL.into_iter().zip(self.slots.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CanonicalRoadId, &mut T)> {
        CanonicalRoadId::ALL.into_iter().zip(self.slots.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(CanonicalRoadId, &T) -> U) -> RoadMap<U> {
        RoadMap::from_fn(|id| f(id, &self.slots[id.index()]))
    }
}

impl<T> Index<CanonicalRoadId> for RoadMap<T> {
    type Output = T;
    #[inline]
    fn index(&self, id: CanonicalRoadId) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<CanonicalRoadId> for RoadMap<T> {
    #[inline]
    fn index_mut(&mut self, id: CanonicalRoadId) -> &mut T {
        self.get_mut(id)
    }
}
