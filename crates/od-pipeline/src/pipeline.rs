//! The `Pipeline` struct and its batch run.

use log::{debug, info, warn};
use od_core::{CanonicalRoadId, JunctionId, RoadId, RoadMap, UnitId};
use od_interchange::{
    align_entry_headings, join_spliced_lanes, segment, splice_units, HeadingBranchCorrected, InterchangeUnit,
    SpliceReport, UnitInput,
};

use crate::batch::{Batch, CompletedUnit, FailedUnit, Stage, UnitIds};
use crate::{PipelineConfig, PipelineObserver};

/// Join the mainline exit of `exit` to the mainline entry of `entry`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplicePair {
    pub exit:           UnitId,
    pub entry:          UnitId,
    /// Metres to the left of the exit → entry direction.
    pub lateral_offset: f64,
}

impl SplicePair {
    pub fn new(exit: UnitId, entry: UnitId, lateral_offset: f64) -> Self {
        Self { exit, entry, lateral_offset }
    }
}

/// Per-input state while the batch is in flight.
type Slot = Result<InterchangeUnit, FailedUnit>;

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Runs a batch of interchange units through four phases:
///
/// 1. **Segment** (parallel with the `parallel` feature): cut each unit into
///    six canonical roads and classify them.
/// 2. **Splice** (sequential, in the order given): join each configured pair,
///    with exclusive access to its two units, then repeat heading alignment
///    over the joined pairs until no entry moves.
/// 3. **Lanes** (parallel with the `parallel` feature): build each surviving
///    unit's lane topology from its final road lengths, then link lanes
///    across every splice.
/// 4. **Ids** (sequential, input order): hand out junction and road ids to
///    the surviving units.
///
/// A unit that fails any phase is dropped with its reason; the rest of the
/// batch carries on.
///
/// Create via [`PipelineBuilder`][crate::PipelineBuilder].
pub struct Pipeline {
    pub config:          PipelineConfig,
    pub(crate) inputs:   Vec<UnitInput>,
    /// `(exit position, entry position, lateral offset)` into `inputs`.
    pub(crate) splices:  Vec<(usize, usize, f64)>,
}

impl Pipeline {
    pub fn inputs(&self) -> &[UnitInput] {
        &self.inputs
    }

    /// Run every phase and collect the result.
    pub fn run<O: PipelineObserver>(&self, observer: &mut O) -> Batch {
        // ── Phase 1: segment + classify ───────────────────────────────────
        let mut slots = self.segment_all();
        for slot in &slots {
            match slot {
                Ok(unit) => observer.on_unit_segmented(unit),
                Err(failed) => observer.on_unit_failed(failed),
            }
        }

        // ── Phase 2: splices, strictly in order ───────────────────────────
        let mut reports = Vec::new();
        let mut joined = Vec::new();
        for &(i, j, offset) in &self.splices {
            let (exit_id, entry_id) = (self.inputs[i].id, self.inputs[j].id);
            let outcome = match pair_mut(&mut slots, i, j) {
                (Ok(exit), Ok(entry)) => {
                    splice_units(exit, entry, offset, &self.config.splice, &self.config.classify)
                }
                _ => {
                    warn!("{exit_id} → {entry_id}: skipped, a unit of the pair has failed");
                    continue;
                }
            };
            match outcome {
                Ok(report) => {
                    observer.on_splice(&report);
                    reports.push(report);
                    joined.push((i, j));
                }
                Err(e) => {
                    let failed = FailedUnit { id: exit_id, stage: Stage::Splice, reason: e.to_string() };
                    warn!("{exit_id} → {entry_id}: {e}");
                    observer.on_unit_failed(&failed);
                    slots[i] = Err(failed);
                }
            }
        }

        align_chains(&mut slots, &joined, &mut reports);

        // ── Phase 3: lanes ────────────────────────────────────────────────
        self.build_lanes(&mut slots);
        for &(i, j) in &joined {
            if let (Ok(exit), Ok(entry)) = pair_mut(&mut slots, i, j) {
                join_spliced_lanes(exit, entry, &self.config.lanes);
            }
        }
        for slot in &slots {
            if let Err(failed) = slot {
                if failed.stage == Stage::Lanes {
                    observer.on_unit_failed(failed);
                }
            }
        }

        // ── Phase 4: ids ──────────────────────────────────────────────────
        let batch = assemble(slots, &joined, reports);
        info!(
            "batch done: {} units, {} failed, {} splices ({} bridged)",
            batch.units.len(),
            batch.failed_count(),
            batch.splices.len(),
            batch.approximate_splices().count()
        );
        observer.on_batch_end(&batch);
        batch
    }

    fn segment_all(&self) -> Vec<Slot> {
        let config = &self.config;

        #[cfg(not(feature = "parallel"))]
        {
            self.inputs.iter().map(|input| segment_one(input, config)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.inputs.par_iter().map(|input| segment_one(input, config)).collect()
        }
    }

    fn build_lanes(&self, slots: &mut [Slot]) {
        let config = &self.config;

        #[cfg(not(feature = "parallel"))]
        {
            slots.iter_mut().for_each(|slot| lanes_one(slot, config));
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            slots.par_iter_mut().for_each(|slot| lanes_one(slot, config));
        }
    }
}

// ── Per-unit phases ───────────────────────────────────────────────────────────

/// Re-run heading alignment over the joined pairs so that a unit spliced at
/// both ends follows its exit unit even when that splice came later.
/// `joined` and `reports` run in parallel.
pub(crate) fn align_chains(slots: &mut [Slot], joined: &[(usize, usize)], reports: &mut [SpliceReport]) {
    for _ in 0..joined.len() {
        let mut moved = false;
        for (report, &(i, j)) in reports.iter_mut().zip(joined) {
            let (Ok(exit), Ok(entry)) = pair_mut(slots, i, j) else {
                continue;
            };
            if let Some(HeadingBranchCorrected { shift }) = align_entry_headings(exit, entry) {
                let total = report.heading_correction.map_or(0.0, |c| c.shift) + shift;
                report.heading_correction = Some(HeadingBranchCorrected { shift: total });
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
}

fn segment_one(input: &UnitInput, config: &PipelineConfig) -> Slot {
    match segment(input, &config.segmenter) {
        Ok(mut unit) => {
            unit.classify(&config.classify);
            debug!("{}: segmented and classified", unit.id);
            Ok(unit)
        }
        Err(e) => {
            warn!("{}: {e}", input.id);
            Err(FailedUnit { id: input.id, stage: Stage::Segment, reason: e.to_string() })
        }
    }
}

fn lanes_one(slot: &mut Slot, config: &PipelineConfig) {
    let failure = match slot {
        Ok(unit) => unit.build_lanes(&config.lanes).err().map(|e| {
            warn!("{}: {e}", unit.id);
            FailedUnit { id: unit.id, stage: Stage::Lanes, reason: e.to_string() }
        }),
        Err(_) => None,
    };
    if let Some(failed) = failure {
        *slot = Err(failed);
    }
}

/// Disjoint mutable references to `items[i]` and `items[j]`, `i != j`.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

// ── Id assignment ─────────────────────────────────────────────────────────────

/// Number surviving units in input order: one junction per unit, six
/// consecutive road ids in [`CanonicalRoadId::ALL`] order.
fn assemble(slots: Vec<Slot>, joined: &[(usize, usize)], splices: Vec<SpliceReport>) -> Batch {
    let mut next_road = 0u32;
    let mut next_junction = 0u32;
    let mut ids: Vec<Option<UnitIds>> = slots
        .iter()
        .map(|slot| {
            slot.as_ref().ok()?;
            let roads = RoadMap::from_fn(|_| {
                let id = RoadId(next_road);
                next_road += 1;
                id
            });
            let junction = JunctionId(next_junction);
            next_junction += 1;
            Some(UnitIds { junction, roads, upstream: None, downstream: None })
        })
        .collect();

    for &(i, j) in joined {
        let (Some(exit), Some(entry)) = (ids[i].as_ref(), ids[j].as_ref()) else {
            continue;
        };
        let exit_far = exit.roads[CanonicalRoadId::MainPostFar];
        let entry_pre = entry.roads[CanonicalRoadId::MainPreEvent];
        if let Some(exit) = ids[i].as_mut() {
            exit.downstream = Some(entry_pre);
        }
        if let Some(entry) = ids[j].as_mut() {
            entry.upstream = Some(exit_far);
        }
    }

    let mut batch = Batch { splices, ..Batch::default() };
    for (slot, ids) in slots.into_iter().zip(ids) {
        match slot {
            Ok(unit) => batch.units.extend(ids.map(|ids| CompletedUnit { unit, ids })),
            Err(failed) => batch.failed.push(failed),
        }
    }
    batch
}
