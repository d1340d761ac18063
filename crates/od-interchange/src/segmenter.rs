//! Cut the three input links of one event into six canonical roads.
//!
//! # Algorithm
//!
//! 1. The mainline is `upstream ⊕ downstream`.  Each wedge-border endpoint is
//!    located on the event's primary mainline link (downstream for a merge,
//!    upstream for a branch) by nearest vertex.  The wedge end is searched
//!    only within [`WEDGE_SEARCH_WINDOW`] vertices past the wedge start, so an
//!    alignment that later passes the wedge again cannot match.  A hit within
//!    [`MIN_EXTENT_VERTICES`] of either end of that link is re-rooted onto the
//!    other mainline link once; a second near-end hit fails the unit.
//! 2. The mainline is cut at the wedge start `a` and end `b` into
//!    `MainPreEvent = [..=a]`, `Wedge = [a..=b]`, and `[b..]`, whose first
//!    [`TAPER_VERTICES`] edges become `MainPostNear` and the rest
//!    `MainPostFar`.
//! 3. The ramp gore is searched only within [`RAMP_SEARCH_WINDOW`] vertices of
//!    the ramp's wedge end, so a looped ramp cannot match its other pass.
//!    The wedge-facing part is split the same way into `RampNear` /
//!    `RampFar`.
//! 4. Both near roads are re-graded linearly between the wedge elevation and
//!    their trunk road's elevation.

use std::ops::Range;

use log::debug;
use od_core::{CoreError, CoreResult, EventKind, Polyline, RoadMap, SearchWindow};

use crate::error::{BorderEnd, InterchangeError, InterchangeResult};
use crate::link::LinkRole;
use crate::unit::{InterchangeUnit, UnitInput};

/// Minimum number of vertices that must remain between a matched vertex and
/// the end of its link.
pub const MIN_EXTENT_VERTICES: usize = 5;

/// Ramp vertices searched for the gore, counted from the ramp's wedge end.
pub const RAMP_SEARCH_WINDOW: usize = 12;

/// Mainline vertices searched for the wedge end, counted from the wedge start.
pub const WEDGE_SEARCH_WINDOW: usize = 250;

/// Edges in each short near-wedge taper road.
pub const TAPER_VERTICES: usize = 3;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SegmenterConfig {
    pub min_extent_vertices: usize,
    pub ramp_search_window:  usize,
    pub wedge_search_window: usize,
    pub taper_vertices:      usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_extent_vertices: MIN_EXTENT_VERTICES,
            ramp_search_window:  RAMP_SEARCH_WINDOW,
            wedge_search_window: WEDGE_SEARCH_WINDOW,
            taper_vertices:      TAPER_VERTICES,
        }
    }
}

/// Segment one unit's links into an [`InterchangeUnit`] with six roads.
pub fn segment(input: &UnitInput, cfg: &SegmenterConfig) -> InterchangeResult<InterchangeUnit> {
    let unit = input.id;
    let degenerate = |e: CoreError| InterchangeError::DegenerateGeometry { unit, reason: e.to_string() };

    let links = &input.links;
    let mainline = links.upstream.centerline.concat(&links.downstream.centerline);
    let down_offset = mainline.len() - links.downstream.centerline.len();

    let a = locate_on_mainline(input, BorderEnd::Start, 0..mainline.len(), down_offset, cfg)?;
    let b = locate_on_mainline(input, BorderEnd::End, a + 1..a + 1 + cfg.wedge_search_window, down_offset, cfg)?;
    if a >= b {
        return Err(InterchangeError::DegenerateGeometry {
            unit,
            reason: format!("wedge start at mainline vertex {a} is not before wedge end at {b}"),
        });
    }

    let pre = mainline.slice(0, a).map_err(degenerate)?;
    let wedge = mainline.slice(a, b).map_err(degenerate)?;
    let post = mainline.slice(b, mainline.last_index()).map_err(degenerate)?;
    let (mut post_near, post_far) = split_near(&post, cfg.taper_vertices, true).map_err(degenerate)?;

    let (gore, mut ramp_near, ramp_far) = cut_ramp(input, cfg)?;

    post_near.regrade_linear(wedge.last().z, post_far.first().z);
    match input.event {
        EventKind::Merge => ramp_near.regrade_linear(ramp_far.last().z, wedge.first().z),
        EventKind::Branch => ramp_near.regrade_linear(wedge.last().z, ramp_far.first().z),
    }

    debug!(
        "{unit}: {} wedge on mainline vertices {a}..={b} of {}, ramp gore at vertex {gore}",
        input.event,
        mainline.len()
    );
    let roads = RoadMap::from_array([pre, wedge, post_near, post_far, ramp_near, ramp_far]);
    Ok(InterchangeUnit::new(unit, input.event, roads, links))
}

// ── Border location ───────────────────────────────────────────────────────────

fn near_either_end(i: usize, len: usize, extent: usize) -> bool {
    i < extent || len - 1 - i < extent
}

/// Mainline vertex index matching `border_end`, searched only among the
/// mainline vertices in `window`.
fn locate_on_mainline(
    input:       &UnitInput,
    border_end:  BorderEnd,
    window:      Range<usize>,
    down_offset: usize,
    cfg:         &SegmenterConfig,
) -> InterchangeResult<usize> {
    let target = match border_end {
        BorderEnd::Start => input.border.start(),
        BorderEnd::End => input.border.end(),
    };
    let (primary, adjacent) = match input.event {
        EventKind::Merge => (LinkRole::Downstream, LinkRole::Upstream),
        EventKind::Branch => (LinkRole::Upstream, LinkRole::Downstream),
    };

    let mut misses = Vec::with_capacity(2);
    for role in [primary, adjacent] {
        let line = &input.links.get(role).centerline;
        let offset = if role == LinkRole::Downstream { down_offset } else { 0 };
        let lo = window.start.max(offset);
        let hi = window.end.min(offset + line.len());
        if lo >= hi {
            misses.push(format!("no vertex of the {role} link inside the search window"));
            continue;
        }
        let i = line.nearest_vertex(target.xyz(), SearchWindow::Range { start: lo - offset, len: hi - lo });
        if near_either_end(i, line.len(), cfg.min_extent_vertices) {
            debug!("{}: {border_end} matched vertex {i} of {} on the {role} link; re-rooting", input.id, line.len());
            misses.push(format!("vertex {i} of {} on the {role} link", line.len()));
            continue;
        }
        return Ok(offset + i);
    }
    Err(InterchangeError::InsufficientBorderData {
        unit:       input.id,
        border_end,
        reason:     format!(
            "matched {} (a match must lie at least {} vertices from a link end)",
            misses.join(" and "),
            cfg.min_extent_vertices
        ),
    })
}

/// Gore index on the ramp plus its `(near, far)` roads.
fn cut_ramp(input: &UnitInput, cfg: &SegmenterConfig) -> InterchangeResult<(usize, Polyline, Polyline)> {
    let unit = input.id;
    let degenerate = |e: CoreError| InterchangeError::DegenerateGeometry { unit, reason: e.to_string() };
    let ramp = &input.links.ramp.centerline;
    let last = ramp.last_index();
    let extent = cfg.min_extent_vertices;
    let short = |border_end, j: usize, beyond: usize| InterchangeError::InsufficientBorderData {
        unit,
        border_end,
        reason: format!("ramp gore at vertex {j} of {} leaves {beyond} vertices before the ramp end", ramp.len()),
    };

    match input.event {
        EventKind::Merge => {
            let window = SearchWindow::FromEnd(cfg.ramp_search_window);
            let j = ramp.nearest_vertex(input.border.start().xyz(), window);
            if j < extent {
                return Err(short(BorderEnd::Start, j, j));
            }
            let toward = ramp.slice(0, j).map_err(degenerate)?;
            let (near, far) = split_near(&toward, cfg.taper_vertices, false).map_err(degenerate)?;
            Ok((j, near, far))
        }
        EventKind::Branch => {
            let window = SearchWindow::FromStart(cfg.ramp_search_window);
            let j = ramp.nearest_vertex(input.border.end().xyz(), window);
            if last - j < extent {
                return Err(short(BorderEnd::End, j, last - j));
            }
            let toward = ramp.slice(j, last).map_err(degenerate)?;
            let (near, far) = split_near(&toward, cfg.taper_vertices, true).map_err(degenerate)?;
            Ok((j, near, far))
        }
    }
}

// ── Near/far split ────────────────────────────────────────────────────────────

/// Split `line` into `(near, far)` where `near` has `taper` edges at the
/// start (`near_at_start`) or at the end.  Both share the cut vertex.
pub(crate) fn split_near(line: &Polyline, taper: usize, near_at_start: bool) -> CoreResult<(Polyline, Polyline)> {
    if line.len() < taper + 2 {
        return Err(CoreError::Degenerate { what: "near/far taper split", got: line.len(), need: taper + 2 });
    }
    if near_at_start {
        line.split_at(taper)
    } else {
        let (far, near) = line.split_at(line.last_index() - taper)?;
        Ok((near, far))
    }
}
