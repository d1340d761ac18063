//! Lane tables, lane links and junction rows for one interchange unit.
//!
//! Lane counts per canonical road follow from the three input links:
//!
//! | Road                       | Merge           | Branch     |
//! |----------------------------|-----------------|------------|
//! | `MainPreEvent`             | upstream        | upstream   |
//! | `Wedge`                    | upstream + ramp | upstream   |
//! | `MainPostNear/MainPostFar` | downstream      | downstream |
//! | `RampNear/RampFar`         | ramp            | ramp       |
//!
//! Ramp lanes occupy the right-most ids of the wedge.  A count mismatch of
//! one or two lanes across a road boundary becomes a cubic taper over the
//! whole length of the shorter road of the pair, which then carries the
//! larger count.  Larger mismatches are left as steps.

use log::{debug, warn};
use od_core::{CanonicalRoadId, ContactPoint, CubicPoly, EventKind, RoadMap};

use crate::error::{LaneError, LaneResult};
use crate::table::{
    JunctionConnectionRow, LaneInfoRow, LaneRef, LaneSpec, LaneTable, LaneTopology, MarkKind,
    RoadLink, RoleLanes,
};
use crate::taper::{taper_width, Taper, TaperKind};

use CanonicalRoadId::{MainPostFar, MainPostNear, MainPreEvent, RampFar, RampNear, Wedge};

/// Largest lane-count change resolved by a taper.
pub const MAX_TAPER_MISMATCH: u32 = 2;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LaneConfig {
    pub max_taper_mismatch: u32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self { max_taper_mismatch: MAX_TAPER_MISMATCH }
    }
}

/// Lanes crossing from one road into the next along travel.
struct Boundary {
    from:       CanonicalRoadId,
    to:         CanonicalRoadId,
    from_lanes: u32,
    to_lanes:   u32,
}

/// Builds a [`LaneTopology`] from the link lane specs and road lengths.
///
/// ```rust,ignore
/// let lanes = RoleLanes { upstream: LaneSpec::new(3, 3.5), downstream: LaneSpec::new(3, 3.5), ramp: LaneSpec::new(1, 3.75) };
/// let topology = LaneTopologyBuilder::new(EventKind::Merge, lanes).build(&lengths)?;
/// ```
pub struct LaneTopologyBuilder {
    event:  EventKind,
    lanes:  RoleLanes,
    config: LaneConfig,
}

impl LaneTopologyBuilder {
    pub fn new(event: EventKind, lanes: RoleLanes) -> Self {
        Self { event, lanes, config: LaneConfig::default() }
    }

    pub fn config(mut self, config: LaneConfig) -> Self {
        self.config = config;
        self
    }

    /// `lengths` are the planar lengths of the six roads in metres.
    pub fn build(&self, lengths: &RoadMap<f64>) -> LaneResult<LaneTopology> {
        self.validate(lengths)?;

        let mut widths: RoadMap<Vec<CubicPoly>> =
            RoadMap::from_fn(|id| self.base_widths(id).into_iter().map(CubicPoly::constant).collect());
        let offsets = RoadMap::from_fn(|id| 0.5 * self.base_widths(id).iter().sum::<f64>());
        let mut tapers: RoadMap<Option<Taper>> = RoadMap::from_fn(|_| None);

        for boundary in self.boundaries() {
            self.apply_boundary(&boundary, lengths, &mut widths, &mut tapers);
        }

        let links = self.lane_links(&widths);
        let junction = self.junction_rows(&links);

        let tables = RoadMap::from_fn(|id| {
            let lane_widths = &widths[id];
            let n = lane_widths.len();
            let mut rows = Vec::with_capacity(n + 1);
            rows.push(LaneInfoRow {
                lane_id:     0,
                width:       CubicPoly::constant(0.0),
                mark:        MarkKind::Solid,
                predecessor: None,
                successor:   None,
                spliced_predecessor: None,
                spliced_successor:   None,
            });
            for (k, width) in lane_widths.iter().enumerate() {
                let me = LaneRef { road: id, lane: -(k as i32 + 1) };
                rows.push(LaneInfoRow {
                    lane_id:     me.lane,
                    width:       *width,
                    mark:        if k + 1 == n { MarkKind::Solid } else { MarkKind::Broken },
                    predecessor: links.iter().find(|(_, to)| *to == me).map(|(from, _)| *from),
                    successor:   links.iter().find(|(from, _)| *from == me).map(|(_, to)| *to),
                    spliced_predecessor: None,
                    spliced_successor:   None,
                });
            }
            let (predecessor, successor) = road_links(self.event, id);
            LaneTable {
                lane_count:  n as u32,
                rows,
                lane_offset: CubicPoly::constant(offsets[id]),
                predecessor,
                successor,
                taper:       tapers.replace(id, None),
            }
        });

        debug!(
            "{} lane topology: {} lane links, {} junction connections",
            self.event,
            links.len(),
            junction.len()
        );
        Ok(LaneTopology { event: self.event, tables, junction })
    }

    // ── Validation ────────────────────────────────────────────────────────

    fn validate(&self, lengths: &RoadMap<f64>) -> LaneResult<()> {
        let specs = [
            ("upstream", self.lanes.upstream),
            ("downstream", self.lanes.downstream),
            ("ramp", self.lanes.ramp),
        ];
        for (role, LaneSpec { count, width }) in specs {
            if count == 0 {
                return Err(LaneError::InvalidLaneCount { role, count, reason: "at least one lane is required" });
            }
            if !(width.is_finite() && width > 0.0) {
                return Err(LaneError::InvalidWidth { role, width });
            }
        }
        if self.event == EventKind::Branch && self.lanes.ramp.count >= self.lanes.upstream.count {
            return Err(LaneError::InvalidLaneCount {
                role:   "ramp",
                count:  self.lanes.ramp.count,
                reason: "a branch must leave at least one upstream lane on the mainline",
            });
        }
        for (road, &length) in lengths.iter() {
            if !(length.is_finite() && length > 0.0) {
                return Err(LaneError::InvalidLength { road, length });
            }
        }
        Ok(())
    }

    // ── Counts ────────────────────────────────────────────────────────────

    /// Nominal width of each right-hand lane, innermost first.
    fn base_widths(&self, id: CanonicalRoadId) -> Vec<f64> {
        let RoleLanes { upstream: up, downstream: down, ramp } = self.lanes;
        let run = |spec: LaneSpec| vec![spec.width; spec.count as usize];
        match id {
            MainPreEvent => run(up),
            Wedge => {
                let mut w = run(up);
                if self.event == EventKind::Merge {
                    w.extend(run(ramp));
                }
                w
            }
            MainPostNear | MainPostFar => run(down),
            RampNear | RampFar => run(ramp),
        }
    }

    fn boundaries(&self) -> [Boundary; 4] {
        let (up, down, ramp) = (self.lanes.upstream.count, self.lanes.downstream.count, self.lanes.ramp.count);
        let b = |from, to, from_lanes, to_lanes| Boundary { from, to, from_lanes, to_lanes };
        match self.event {
            EventKind::Merge => [
                b(MainPreEvent, Wedge, up, up),
                b(Wedge, MainPostNear, up + ramp, down),
                b(MainPostNear, MainPostFar, down, down),
                b(RampFar, RampNear, ramp, ramp),
            ],
            EventKind::Branch => [
                b(MainPreEvent, Wedge, up, up),
                b(Wedge, MainPostNear, up - ramp, down),
                b(MainPostNear, MainPostFar, down, down),
                b(RampNear, RampFar, ramp, ramp),
            ],
        }
    }

    // ── Tapers ────────────────────────────────────────────────────────────

    /// The shorter road of the pair carries the taper.  In a branch the
    /// wedge's outer lanes already lead onto the ramp, so its partner does.
    fn taper_carrier(&self, b: &Boundary, lengths: &RoadMap<f64>) -> CanonicalRoadId {
        let shorter = if lengths[b.to] <= lengths[b.from] { b.to } else { b.from };
        if self.event == EventKind::Branch && shorter == Wedge { b.to } else { shorter }
    }

    fn apply_boundary(
        &self,
        b:       &Boundary,
        lengths: &RoadMap<f64>,
        widths:  &mut RoadMap<Vec<CubicPoly>>,
        tapers:  &mut RoadMap<Option<Taper>>,
    ) {
        let (lo, hi) = (b.from_lanes.min(b.to_lanes), b.from_lanes.max(b.to_lanes));
        if lo == hi {
            return;
        }
        if hi - lo > self.config.max_taper_mismatch {
            warn!("{} lanes step from {} to {} into {}; left untapered", b.from, b.from_lanes, b.to_lanes, b.to);
            return;
        }
        let carrier = self.taper_carrier(b, lengths);
        if tapers[carrier].is_some() {
            warn!("{carrier} already carries a taper; lane change into {} left as a step", b.to);
            return;
        }

        let kind = if b.from_lanes > b.to_lanes { TaperKind::Closing } else { TaperKind::Opening };
        let nominal = self.base_widths(if kind == TaperKind::Closing { b.from } else { b.to });
        let length = lengths[carrier];
        let lanes = &mut widths[carrier];
        if lanes.len() < hi as usize {
            lanes.resize(hi as usize, CubicPoly::constant(0.0));
        }
        for k in lo as usize..hi as usize {
            let w = nominal.get(k).copied().unwrap_or(self.lanes.downstream.width);
            lanes[k] = taper_width(w, length, kind);
        }

        debug!("{kind:?} taper of {} lane(s) on {carrier} over {length:.1} m", hi - lo);
        tapers[carrier] = Some(Taper {
            kind,
            lanes: (lo + 1..=hi).map(|k| -(k as i32)).collect(),
            length,
        });
    }

    // ── Links ─────────────────────────────────────────────────────────────

    fn lane_links(&self, widths: &RoadMap<Vec<CubicPoly>>) -> Vec<(LaneRef, LaneRef)> {
        let n = |id: CanonicalRoadId| widths[id].len() as u32;
        let up = self.lanes.upstream.count;
        let ramp = self.lanes.ramp.count;
        let mut links = Vec::new();
        match self.event {
            EventKind::Merge => {
                chain(&mut links, MainPreEvent, Wedge, n(MainPreEvent).min(up), 0, 0);
                chain(&mut links, Wedge, MainPostNear, n(Wedge).min(n(MainPostNear)), 0, 0);
                chain(&mut links, MainPostNear, MainPostFar, n(MainPostNear).min(n(MainPostFar)), 0, 0);
                chain(&mut links, RampFar, RampNear, n(RampFar).min(n(RampNear)), 0, 0);
                chain(&mut links, RampNear, Wedge, n(RampNear).min(ramp), 0, up);
            }
            EventKind::Branch => {
                let through = up - ramp;
                chain(&mut links, MainPreEvent, Wedge, n(MainPreEvent).min(n(Wedge)), 0, 0);
                chain(&mut links, Wedge, MainPostNear, through.min(n(MainPostNear)), 0, 0);
                chain(&mut links, Wedge, RampNear, ramp.min(n(RampNear)), through, 0);
                chain(&mut links, MainPostNear, MainPostFar, n(MainPostNear).min(n(MainPostFar)), 0, 0);
                chain(&mut links, RampNear, RampFar, n(RampNear).min(n(RampFar)), 0, 0);
            }
        }
        links
    }

    fn junction_rows(&self, links: &[(LaneRef, LaneRef)]) -> Vec<JunctionConnectionRow> {
        let feeds = |road: CanonicalRoadId| matches!(road, MainPreEvent | RampNear);
        let leaves = |road: CanonicalRoadId| matches!(road, MainPostNear | RampNear);
        links
            .iter()
            .filter_map(|&(from, to)| match self.event {
                EventKind::Merge if to.road == Wedge && feeds(from.road) => Some(JunctionConnectionRow {
                    incoming_road:   from.road,
                    connecting_road: Wedge,
                    contact_point:   ContactPoint::Start,
                    lane_from:       from.lane,
                    lane_to:         to.lane,
                }),
                EventKind::Branch if from.road == Wedge && leaves(to.road) => Some(JunctionConnectionRow {
                    incoming_road:   to.road,
                    connecting_road: Wedge,
                    contact_point:   ContactPoint::End,
                    lane_from:       to.lane,
                    lane_to:         from.lane,
                }),
                _ => None,
            })
            .collect()
    }
}

/// Link lane `-(from_offset + k)` of `from` to lane `-(to_offset + k)` of
/// `to` for `k = 1..=count`.
fn chain(
    links:       &mut Vec<(LaneRef, LaneRef)>,
    from:        CanonicalRoadId,
    to:          CanonicalRoadId,
    count:       u32,
    from_offset: u32,
    to_offset:   u32,
) {
    for k in 1..=count {
        links.push((
            LaneRef { road: from, lane: -((from_offset + k) as i32) },
            LaneRef { road: to, lane: -((to_offset + k) as i32) },
        ));
    }
}

/// Road-level `(predecessor, successor)` of `id`.
fn road_links(event: EventKind, id: CanonicalRoadId) -> (Option<RoadLink>, Option<RoadLink>) {
    let start = |road| Some(RoadLink::Road { road, contact: ContactPoint::Start });
    let end = |road| Some(RoadLink::Road { road, contact: ContactPoint::End });
    let junction = Some(RoadLink::Junction);
    match (event, id) {
        (EventKind::Merge, MainPreEvent) => (None, junction),
        (EventKind::Branch, MainPreEvent) => (None, start(Wedge)),
        (_, Wedge) => (end(MainPreEvent), start(MainPostNear)),
        (EventKind::Merge, MainPostNear) => (end(Wedge), start(MainPostFar)),
        (EventKind::Branch, MainPostNear) => (junction, start(MainPostFar)),
        (_, MainPostFar) => (end(MainPostNear), None),
        (EventKind::Merge, RampNear) => (end(RampFar), junction),
        (EventKind::Branch, RampNear) => (junction, start(RampFar)),
        (EventKind::Merge, RampFar) => (None, start(RampNear)),
        (EventKind::Branch, RampFar) => (end(RampNear), None),
    }
}
