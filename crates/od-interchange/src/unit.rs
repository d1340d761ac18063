//! One merge/branch event decomposed into its six canonical roads.

use log::debug;
use od_core::{branch_shift, CanonicalRoadId, EventKind, Polyline, RoadMap, UnitId};
use od_geometry::{classify, ClassifyConfig, Classification};
use od_lanes::{LaneConfig, LaneTopology, LaneTopologyBuilder, RoleLanes};

use crate::error::InterchangeResult;
use crate::link::{Border, LinkSet};

use CanonicalRoadId::{MainPostFar, MainPostNear, MainPreEvent, RampFar, RampNear, Wedge};

/// Owned centrelines of the six canonical roads.
pub type CanonicalRoads = RoadMap<Polyline>;

/// Raw input of one unit, as loaded.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitInput {
    pub id:     UnitId,
    pub event:  EventKind,
    pub links:  LinkSet,
    pub border: Border,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitStatus {
    Ok,
    Failed(String),
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterchangeUnit {
    pub id:              UnitId,
    pub event:           EventKind,
    pub roads:           CanonicalRoads,
    /// Lane specs of the input links.
    pub lane_specs:      RoleLanes,
    /// Metres per second, inherited from the link each road was cut from.
    pub speed_limits:    RoadMap<f64>,
    pub classifications: Option<RoadMap<Classification>>,
    pub lanes:           Option<LaneTopology>,
    pub status:          UnitStatus,
}

impl InterchangeUnit {
    pub fn new(id: UnitId, event: EventKind, roads: CanonicalRoads, links: &LinkSet) -> Self {
        let speed_limits = RoadMap::from_fn(|road| match road {
            MainPreEvent | Wedge => links.upstream.speed_limit,
            MainPostNear | MainPostFar => links.downstream.speed_limit,
            RampNear | RampFar => links.ramp.speed_limit,
        });
        Self {
            id,
            event,
            roads,
            lane_specs: links.role_lanes(),
            speed_limits,
            classifications: None,
            lanes: None,
            status: UnitStatus::Ok,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == UnitStatus::Ok
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = UnitStatus::Failed(reason.into());
    }

    pub fn road(&self, id: CanonicalRoadId) -> &Polyline {
        &self.roads[id]
    }

    pub fn classification(&self, id: CanonicalRoadId) -> Option<&Classification> {
        self.classifications.as_ref().map(|c| &c[id])
    }

    /// Classify all six roads and put them on the wedge's heading branch.
    pub fn classify(&mut self, cfg: &ClassifyConfig) {
        let mut classes = self.roads.map(|_, road| classify(road, cfg));
        align_branches(self.event, &mut classes);
        self.classifications = Some(classes);
    }

    /// Re-run classification for `ids` only (all roads if none exist yet).
    ///
    /// Fresh headings start on the principal branch; they are moved back onto
    /// the branch the rest of the unit is on, which may have been shifted by
    /// an earlier splice.
    pub fn reclassify(&mut self, ids: &[CanonicalRoadId], cfg: &ClassifyConfig) {
        match self.classifications.as_mut() {
            Some(classes) => {
                let wedge_before = classes[Wedge].first_heading();
                for &id in ids {
                    debug!("{}: reclassifying {id}", self.id);
                    classes[id] = classify(&self.roads[id], cfg);
                }
                if let (Some(before), Some(after)) = (wedge_before, classes[Wedge].first_heading()) {
                    classes[Wedge].shift_headings(branch_shift(before, after));
                }
                align_branches(self.event, classes);
            }
            None => self.classify(cfg),
        }
    }

    /// Analytic lengths when classified, polyline lengths otherwise.
    pub fn road_lengths(&self) -> RoadMap<f64> {
        match &self.classifications {
            Some(classes) => classes.map(|_, c| c.length()),
            None => self.roads.map(|_, p| p.length()),
        }
    }

    pub fn build_lanes(&mut self, cfg: &LaneConfig) -> InterchangeResult<()> {
        let topology = LaneTopologyBuilder::new(self.event, self.lane_specs)
            .config(cfg.clone())
            .build(&self.road_lengths())?;
        self.lanes = Some(topology);
        Ok(())
    }
}

// ── Heading branches ──────────────────────────────────────────────────────────

/// Move every road onto the wedge's heading branch, walking out from the
/// wedge through the shared vertices in travel order.
fn align_branches(event: EventKind, classes: &mut RoadMap<Classification>) {
    follow(classes, Wedge, MainPreEvent, false);
    follow(classes, Wedge, MainPostNear, true);
    follow(classes, MainPostNear, MainPostFar, true);
    match event {
        EventKind::Merge => {
            follow(classes, Wedge, RampNear, false);
            follow(classes, RampNear, RampFar, false);
        }
        EventKind::Branch => {
            follow(classes, Wedge, RampNear, true);
            follow(classes, RampNear, RampFar, true);
        }
    }
}

/// Shift `moved` by whole turns so that it meets `fixed` on one branch.
/// `moved_after` means `moved` starts where `fixed` ends.
fn follow(classes: &mut RoadMap<Classification>, fixed: CanonicalRoadId, moved: CanonicalRoadId, moved_after: bool) {
    let (reference, value) = if moved_after {
        (classes[fixed].last_heading(), classes[moved].first_heading())
    } else {
        (classes[fixed].first_heading(), classes[moved].last_heading())
    };
    if let (Some(reference), Some(value)) = (reference, value) {
        let shift = branch_shift(reference, value);
        if shift != 0.0 {
            classes[moved].shift_headings(shift);
        }
    }
}
