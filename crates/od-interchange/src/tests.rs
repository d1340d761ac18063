//! Unit tests for od-interchange.

#[cfg(test)]
mod fixtures {
    use od_core::{EventKind, Polyline, RoadMap, UnitId};
    use od_lanes::LaneSpec;

    use crate::{Border, InterchangeUnit, LinkGroup, LinkRole, LinkSet, UnitInput};

    pub fn mainline_z(x: f64) -> f64 {
        10.0 + 0.01 * x
    }

    pub fn link(role: LinkRole, points: Vec<(f64, f64, f64)>, lanes: u32, speed: f64) -> LinkGroup {
        LinkGroup {
            role,
            centerline:  Polyline::from_xyz(points).unwrap(),
            lanes:       LaneSpec::new(lanes, if role == LinkRole::Ramp { 3.75 } else { 3.5 }),
            speed_limit: speed,
        }
    }

    /// Straight mainline along +x: upstream 0..=300 m, downstream 300..=700 m,
    /// 2 m spacing.
    pub fn mainline() -> (LinkGroup, LinkGroup) {
        let pts = |from: usize, to: usize| (from..=to).map(|i| (2.0 * i as f64, 0.0, mainline_z(2.0 * i as f64))).collect();
        (
            link(LinkRole::Upstream, pts(0, 150), 3, 27.8),
            link(LinkRole::Downstream, pts(150, 350), 3, 25.0),
        )
    }

    fn border(points: [(f64, f64); 2]) -> Border {
        Border::new(Polyline::from_xyz(points.map(|(x, y)| (x, y, mainline_z(x)))).unwrap())
    }

    /// Ramp joining from the right, reaching the mainline grade at x = 340.
    pub fn merge_ramp() -> LinkGroup {
        let pts = (0..=40)
            .map(|i| {
                let x = 200.0 + 4.0 * i as f64;
                (x, -3.0 - 0.25 * (340.0 - x).max(0.0), 12.0 + 0.03 * (x - 340.0))
            })
            .collect();
        link(LinkRole::Ramp, pts, 1, 16.7)
    }

    /// Ramp leaving to the right from x = 280.
    pub fn branch_ramp() -> LinkGroup {
        let pts = (0..=40)
            .map(|i| {
                let x = 270.0 + 4.0 * i as f64;
                (x, -3.0 - 0.25 * (x - 280.0).max(0.0), 12.5 + 0.03 * (x - 280.0))
            })
            .collect();
        link(LinkRole::Ramp, pts, 1, 16.7)
    }

    pub fn merge_input(wedge: [(f64, f64); 2], ramp: LinkGroup) -> UnitInput {
        let (upstream, downstream) = mainline();
        UnitInput {
            id:     UnitId(0),
            event:  EventKind::Merge,
            links:  LinkSet { ramp, upstream, downstream },
            border: border(wedge),
        }
    }

    pub fn merge() -> UnitInput {
        merge_input([(340.0, -3.0), (420.0, -1.0)], merge_ramp())
    }

    pub fn branch() -> UnitInput {
        let (upstream, downstream) = mainline();
        UnitInput {
            id:     UnitId(1),
            event:  EventKind::Branch,
            links:  LinkSet { ramp: branch_ramp(), upstream, downstream },
            border: border([(200.0, -3.0), (280.0, -1.0)]),
        }
    }

    /// Straight polyline of `n` vertices from `start`, stepping `(dx, dy)`,
    /// with `z = 0.01·x`.
    pub fn straight(start: (f64, f64), step: (f64, f64), n: usize) -> Polyline {
        Polyline::from_xyz((0..n).map(|i| {
            let x = start.0 + step.0 * i as f64;
            (x, start.1 + step.1 * i as f64, 0.01 * x)
        }))
        .unwrap()
    }

    /// A unit whose mainline exit is `exit` (split three edges in) and whose
    /// entry is `entry`.  The other roads are short stubs.
    pub fn spliceable(id: u32, exit: &Polyline, entry: &Polyline) -> InterchangeUnit {
        let (near, far) = exit.split_at(3).unwrap();
        let e0 = exit.first();
        let wedge = Polyline::from_xyz([(e0.x - 10.0, e0.y, e0.z), (e0.x, e0.y, e0.z)]).unwrap();
        let stub = Polyline::from_xyz([(0.0, -50.0, 0.0), (10.0, -50.0, 0.0)]).unwrap();
        let roads = RoadMap::from_array([entry.clone(), wedge, near, far, stub.clone(), stub.clone()]);
        let stub_link = |role| LinkGroup {
            role,
            centerline:  stub.clone(),
            lanes:       LaneSpec::new(2, 3.5),
            speed_limit: 25.0,
        };
        let links = LinkSet {
            ramp:       stub_link(LinkRole::Ramp),
            upstream:   stub_link(LinkRole::Upstream),
            downstream: stub_link(LinkRole::Downstream),
        };
        InterchangeUnit::new(UnitId(id), EventKind::Merge, roads, &links)
    }
}

#[cfg(test)]
mod segmenter {
    use approx::assert_abs_diff_eq;
    use od_core::CanonicalRoadId::*;

    use super::fixtures::{branch, link, mainline_z, merge, merge_input, merge_ramp};
    use crate::{segment, BorderEnd, InterchangeError, LinkRole, SegmenterConfig};

    #[test]
    fn merge_cuts_six_roads_at_the_wedge() {
        let unit = segment(&merge(), &SegmenterConfig::default()).unwrap();
        let r = &unit.roads;
        assert_eq!(r[MainPreEvent].len(), 171);
        assert_eq!(r[Wedge].len(), 41);
        assert_eq!(r[Wedge].first().x, 340.0);
        assert_eq!(r[Wedge].last().x, 420.0);
        assert_eq!(r[MainPostNear].len(), 4);
        assert_eq!(r[MainPostFar].len(), 138);
        assert_eq!(r[MainPostFar].last().x, 700.0);
        assert_eq!(r[RampNear].len(), 4);
        assert_eq!(r[RampNear].last().x, 340.0);
        assert_eq!(r[RampFar].len(), 33);
        assert_eq!(r[RampFar].first().x, 200.0);
    }

    #[test]
    fn merge_roads_share_endpoints_and_grades() {
        let unit = segment(&merge(), &SegmenterConfig::default()).unwrap();
        let r = &unit.roads;
        assert_eq!(r[MainPreEvent].last().xyz(), r[Wedge].first().xyz());
        assert_eq!(r[MainPostNear].first().xyz(), r[Wedge].last().xyz());
        assert_eq!(r[MainPostNear].last().xyz(), r[MainPostFar].first().xyz());
        assert_eq!(r[RampNear].first().xyz(), r[RampFar].last().xyz());
        // Ramp taper climbs from 11.64 m to the wedge grade.
        assert_abs_diff_eq!(r[RampNear].last().z, r[Wedge].first().z, epsilon = 1e-9);
        let zs: Vec<f64> = r[RampNear].vertices().iter().map(|v| v.z).collect();
        assert!(zs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn branch_ramp_leaves_from_wedge_end() {
        let unit = segment(&branch(), &SegmenterConfig::default()).unwrap();
        let r = &unit.roads;
        assert_eq!(r[Wedge].first().x, 200.0);
        assert_eq!(r[Wedge].last().x, 280.0);
        assert_eq!(r[RampNear].len(), 4);
        assert_eq!(r[RampNear].first().x, 278.0);
        assert_eq!(r[RampFar].first().x, 290.0);
        assert_eq!(r[RampFar].last().x, 430.0);
        assert_abs_diff_eq!(r[RampNear].first().z, r[Wedge].last().z, epsilon = 1e-9);
        assert_abs_diff_eq!(r[RampNear].last().z, r[RampFar].first().z, epsilon = 1e-9);
    }

    #[test]
    fn wedge_start_near_link_joint_reroots_onto_upstream() {
        let input = merge_input([(250.0, -3.0), (420.0, -1.0)], merge_ramp());
        let unit = segment(&input, &SegmenterConfig::default()).unwrap();
        assert_eq!(unit.roads[Wedge].first().x, 250.0);
        assert_eq!(unit.roads[MainPreEvent].len(), 126);
    }

    #[test]
    fn wedge_end_near_mainline_end_fails() {
        let input = merge_input([(340.0, -3.0), (696.0, -1.0)], merge_ramp());
        let err = segment(&input, &SegmenterConfig::default()).unwrap_err();
        assert!(matches!(err, InterchangeError::InsufficientBorderData { border_end: BorderEnd::End, .. }));
    }

    #[test]
    fn ramp_without_extent_past_gore_fails() {
        let short = link(
            LinkRole::Ramp,
            (0..5).map(|i| (324.0 + 4.0 * i as f64, -3.0, 13.4)).collect(),
            1,
            16.7,
        );
        let err = segment(&merge_input([(340.0, -3.0), (420.0, -1.0)], short), &SegmenterConfig::default())
            .unwrap_err();
        assert!(matches!(err, InterchangeError::InsufficientBorderData { border_end: BorderEnd::Start, .. }));
    }

    #[test]
    fn wedge_end_ignores_a_later_pass_of_the_mainline() {
        // The downstream link runs out to x = 900 and comes back one metre to
        // the right at the same grade, passing exactly over the wedge end.
        let mut input = merge();
        let out = (150..=450).map(|i| 2.0 * i as f64).map(|x| (x, 0.0, mainline_z(x)));
        let back = (0..260).map(|i| 898.0 - 2.0 * i as f64).map(|x| (x, -1.0, mainline_z(x)));
        input.links.downstream = link(LinkRole::Downstream, out.chain(back).collect(), 3, 25.0);

        let unit = segment(&input, &SegmenterConfig::default()).unwrap();
        let wedge = &unit.roads[Wedge];
        assert_eq!(wedge.first().xy(), [340.0, 0.0]);
        assert_eq!(wedge.last().xy(), [420.0, 0.0]);
        assert_eq!(wedge.len(), 41);

        let unbounded = SegmenterConfig { wedge_search_window: usize::MAX / 2, ..SegmenterConfig::default() };
        let unit = segment(&input, &unbounded).unwrap();
        assert_eq!(unit.roads[Wedge].last().xy(), [420.0, -1.0]);
    }

    #[test]
    fn reversed_border_is_degenerate() {
        let input = merge_input([(420.0, -1.0), (340.0, -3.0)], merge_ramp());
        let err = segment(&input, &SegmenterConfig::default()).unwrap_err();
        assert!(matches!(err, InterchangeError::DegenerateGeometry { .. }));
    }
}

#[cfg(test)]
mod unit {
    use od_core::CanonicalRoadId::*;
    use od_geometry::ClassifyConfig;
    use od_lanes::LaneConfig;

    use super::fixtures::merge;
    use crate::{segment, SegmenterConfig};

    #[test]
    fn classify_then_build_lanes() {
        let mut unit = segment(&merge(), &SegmenterConfig::default()).unwrap();
        assert!(unit.classification(Wedge).is_none());
        unit.classify(&ClassifyConfig::default());
        let wedge_len = unit.classification(Wedge).unwrap().length();
        assert!((wedge_len - 80.0).abs() < 1e-6);

        unit.build_lanes(&LaneConfig::default()).unwrap();
        let lanes = unit.lanes.as_ref().unwrap();
        assert_eq!(lanes.table(Wedge).lane_count, 4);
        assert_eq!(lanes.table(RampFar).lane_count, 1);
        assert!(unit.is_ok());
    }

    #[test]
    fn speed_limits_follow_source_links() {
        let unit = segment(&merge(), &SegmenterConfig::default()).unwrap();
        assert_eq!(unit.speed_limits[Wedge], 27.8);
        assert_eq!(unit.speed_limits[MainPostFar], 25.0);
        assert_eq!(unit.speed_limits[RampNear], 16.7);
    }

    #[test]
    fn fail_records_reason() {
        let mut unit = segment(&merge(), &SegmenterConfig::default()).unwrap();
        unit.fail("lane topology");
        assert!(!unit.is_ok());
    }
}

#[cfg(test)]
mod splicer {
    use std::f64::consts::{PI, TAU};

    use approx::assert_abs_diff_eq;
    use od_core::CanonicalRoadId::*;
    use od_geometry::ClassifyConfig;

    use super::fixtures::{spliceable, straight};
    use crate::{
        align_entry_headings, join_target, splice_tails, splice_units, InterchangeUnit, SpliceConfig,
        SpliceConflict, SpliceMethod, TailSide,
    };

    #[test]
    fn collinear_tails_meet_at_midpoint() {
        let exit = straight((0.0, 0.0), (2.0, 0.0), 301);
        let entry = straight((580.0, 0.0), (2.0, 0.0), 211);
        let mut a = spliceable(0, &exit, &entry);
        let mut b = spliceable(1, &exit, &entry);

        let report = splice_units(&mut a, &mut b, 0.0, &SpliceConfig::default(), &ClassifyConfig::default()).unwrap();
        assert_eq!(report.method, SpliceMethod::Rigid);
        assert!(!report.is_approximate());
        assert_abs_diff_eq!(report.join[0], 590.0, epsilon = 1e-9);

        let end = a.roads[MainPostFar].last();
        let start = b.roads[MainPreEvent].first();
        assert_abs_diff_eq!(end.x, 590.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.x, start.x, epsilon = 1e-12);
        assert_abs_diff_eq!(end.y, start.y, epsilon = 1e-12);
        assert_eq!(a.roads[MainPostNear].len(), 4);
        assert_eq!(a.roads[MainPostNear].last().xyz(), a.roads[MainPostFar].first().xyz());
        assert!(a.classification(MainPostFar).is_some());
        assert!(report.heading_correction.is_none());
    }

    #[test]
    fn lateral_offset_keeps_anchors_and_edge_lengths() {
        let exit = straight((0.0, 0.0), (2.0, 0.0), 301);
        let entry = straight((580.0, 0.0), (2.0, 0.0), 211);
        let join = join_target(&exit, &entry, 1.5);
        assert_abs_diff_eq!(join[1], 1.5, epsilon = 1e-12);

        let (a, b) = splice_tails(&exit, &entry, join, &SpliceConfig::default()).unwrap();
        assert_eq!(a.first().xy(), [0.0, 0.0]);
        assert_eq!(b.last().xy(), [1000.0, 0.0]);
        assert_abs_diff_eq!(a.last().x, join[0], epsilon = 1e-12);
        assert_abs_diff_eq!(a.last().y, join[1], epsilon = 1e-12);
        assert_abs_diff_eq!(b.first().y, join[1], epsilon = 1e-12);
        // Only the edge reaching the join changes length.
        let edges = |p: &od_core::Polyline| -> Vec<f64> {
            p.vertices().windows(2).map(|w| w[0].distance_2d(&w[1])).collect()
        };
        let (ea, eb) = (edges(&a), edges(&b));
        for e in &ea[..ea.len() - 1] {
            assert_abs_diff_eq!(*e, 2.0, epsilon = 1e-9);
        }
        for e in &eb[1..] {
            assert_abs_diff_eq!(*e, 2.0, epsilon = 1e-9);
        }
        assert!((ea[ea.len() - 1] - 2.0).abs() > 1e-6);
    }

    #[test]
    fn trim_at_anchor_is_a_conflict() {
        let exit = straight((0.0, 0.0), (2.0, 0.0), 301);
        let entry = straight((-600.0, 0.0), (2.0, 0.0), 251);
        let join = join_target(&exit, &entry, 0.0);
        let err = splice_tails(&exit, &entry, join, &SpliceConfig::default()).unwrap_err();
        assert_eq!(err, SpliceConflict::TrimAtEndpoint { tail: TailSide::Exit });
    }

    #[test]
    fn reversed_entry_is_a_crossing() {
        let exit = straight((0.0, 0.0), (2.0, 0.0), 301);
        let entry = straight((590.0, 0.0), (-2.0, 0.0), 146);
        let join = join_target(&exit, &entry, 0.0);
        let err = splice_tails(&exit, &entry, join, &SpliceConfig::default()).unwrap_err();
        assert_eq!(err, SpliceConflict::Crossing);
    }

    #[test]
    fn short_entry_falls_back_to_bridge() {
        let exit = straight((0.0, 0.0), (2.0, 0.0), 301);
        let entry = straight((581.0, 0.0), (2.0, 0.0), 10);
        let mut a = spliceable(0, &exit, &entry);
        let mut b = spliceable(1, &exit, &entry);

        let report = splice_units(&mut a, &mut b, 0.0, &SpliceConfig::default(), &ClassifyConfig::default()).unwrap();
        assert_eq!(
            report.method,
            SpliceMethod::Bridge { conflict: SpliceConflict::TooShort { tail: TailSide::Entry, vertices: 5, need: 20 } }
        );
        assert!(report.is_approximate());

        let far = &a.roads[MainPostFar];
        assert_abs_diff_eq!(far.last().x, 299.5, epsilon = 1e-9);
        assert_eq!(far.last().xy(), b.roads[MainPreEvent].first().xy());
        assert_eq!(b.roads[MainPreEvent].last().xy(), [599.0, 0.0]);
        for v in far.vertices().iter().chain(b.roads[MainPreEvent].vertices()) {
            assert_abs_diff_eq!(v.y, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.z, 0.01 * v.x, epsilon = 1e-6);
        }
    }

    #[test]
    fn headings_across_the_branch_cut_are_reconciled() {
        // Exit heads just left of -x (heading π - 0.01), entry just right of
        // it (heading -π + 0.01): numerically 2π apart.
        let exit = straight((0.0, 0.0), (-2.0, 0.02), 301);
        let entry = straight((-580.0, 5.8), (-2.0, -0.02), 201);
        let mut a = spliceable(0, &exit, &entry);
        let mut b = spliceable(1, &exit, &entry);
        let cfg = ClassifyConfig::default();
        a.classify(&cfg);
        b.classify(&cfg);

        let report = splice_units(&mut a, &mut b, 0.0, &SpliceConfig::default(), &cfg).unwrap();
        assert_eq!(report.method, SpliceMethod::Rigid);
        let shift = report.heading_correction.unwrap().shift;
        assert_abs_diff_eq!(shift, TAU, epsilon = 1e-12);

        let h_exit = a.classification(MainPostFar).unwrap().last_heading().unwrap();
        let h_entry = b.classification(MainPreEvent).unwrap().first_heading().unwrap();
        assert!((h_entry - h_exit).abs() < PI);
        assert!(h_entry > PI);
        // Every road of the entry unit moved with it.
        assert!(b.classification(Wedge).unwrap().first_heading().unwrap() > 3.0 * PI / 2.0);
    }

    /// Three westbound units alternating either side of the ±π cut:
    /// `a` and `c` drift north, `b` drifts south.
    fn westbound_chain() -> [InterchangeUnit; 3] {
        let a_exit = straight((0.0, 0.0), (-2.0, 0.02), 301);
        let b_entry = straight((-580.0, 5.8), (-2.0, -0.02), 201);
        let b_exit = straight((-1000.0, 0.0), (-2.0, -0.02), 301);
        let c_entry = straight((-1580.0, -5.8), (-2.0, 0.02), 201);
        let c_exit = straight((-2000.0, 0.0), (-2.0, 0.02), 301);
        let cfg = ClassifyConfig::default();
        let mut units = [
            spliceable(0, &a_exit, &a_exit),
            spliceable(1, &b_exit, &b_entry),
            spliceable(2, &c_exit, &c_entry),
        ];
        for unit in &mut units {
            unit.classify(&cfg);
        }
        units
    }

    fn gap(exit: &InterchangeUnit, entry: &InterchangeUnit) -> f64 {
        let h_exit = exit.classification(MainPostFar).unwrap().last_heading().unwrap();
        entry.classification(MainPreEvent).unwrap().first_heading().unwrap() - h_exit
    }

    #[test]
    fn respliced_exit_stays_on_its_shifted_branch() {
        let [mut a, mut b, mut c] = westbound_chain();
        let (splice, classify) = (SpliceConfig::default(), ClassifyConfig::default());

        let first = splice_units(&mut a, &mut b, 0.0, &splice, &classify).unwrap();
        assert_abs_diff_eq!(first.heading_correction.unwrap().shift, TAU, epsilon = 1e-12);
        // Splicing b again at its exit must not drop its exit roads back to
        // the principal branch.
        let second = splice_units(&mut b, &mut c, 0.0, &splice, &classify).unwrap();
        assert_eq!(second.method, SpliceMethod::Rigid);
        assert!(second.heading_correction.is_none());

        assert!(gap(&a, &b).abs() < PI);
        assert!(gap(&b, &c).abs() < PI);
        let near = b.classification(MainPostNear).unwrap().first_heading().unwrap();
        assert!(near > PI);
        assert!((near - b.classification(Wedge).unwrap().last_heading().unwrap()).abs() < PI);
    }

    #[test]
    fn either_splice_order_ends_on_the_same_branches() {
        let [mut a, mut b, mut c] = westbound_chain();
        let (splice, classify) = (SpliceConfig::default(), ClassifyConfig::default());
        splice_units(&mut a, &mut b, 0.0, &splice, &classify).unwrap();
        splice_units(&mut b, &mut c, 0.0, &splice, &classify).unwrap();

        let [mut ra, mut rb, mut rc] = westbound_chain();
        let late = splice_units(&mut rb, &mut rc, 0.0, &splice, &classify).unwrap();
        assert_abs_diff_eq!(late.heading_correction.unwrap().shift, -TAU, epsilon = 1e-12);
        splice_units(&mut ra, &mut rb, 0.0, &splice, &classify).unwrap();
        // rb moved a turn up after rc was aligned to it.
        assert!(gap(&rb, &rc).abs() >= PI);
        let again = align_entry_headings(&rb, &mut rc).unwrap();
        assert_abs_diff_eq!(again.shift, TAU, epsilon = 1e-12);
        assert!(align_entry_headings(&rb, &mut rc).is_none());

        for (x, y) in [(&b, &rb), (&c, &rc)] {
            for road in [MainPreEvent, Wedge, MainPostFar] {
                let h = x.classification(road).unwrap().first_heading().unwrap();
                let rh = y.classification(road).unwrap().first_heading().unwrap();
                assert_abs_diff_eq!(h, rh, epsilon = 1e-9);
            }
        }
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use od_core::{EventKind, UnitId};

    use crate::{load_units_reader, InterchangeError, LinkRole};

    fn link_rows() -> String {
        let mut s = String::from("unit,role,seq,x,y,z,lane_count,lane_width,speed_limit\n");
        for (role, lanes, width) in [("downstream", 3, 3.5), ("ramp", 1, 3.75), ("upstream", 3, 3.5)] {
            // Written in reverse order to exercise the seq sort.
            for seq in (0..4).rev() {
                s.push_str(&format!("0,{role},{seq},{}.0,0.0,10.0,{lanes},{width},27.8\n", 10 * seq));
            }
        }
        s.push_str("1,upstream,0,0.0,0.0,0.0,2,3.5,25.0\n1,upstream,1,5.0,0.0,0.0,2,3.5,25.0\n");
        s.push_str("1,downstream,0,5.0,0.0,0.0,2,3.5,25.0\n1,downstream,1,9.0,0.0,0.0,2,3.5,25.0\n");
        s
    }

    const BORDERS: &str = "unit,event,seq,x,y,z\n\
                           0,merge,1,20.0,-2.0,10.0\n\
                           0,merge,0,10.0,-3.0,10.0\n\
                           1,branch,0,1.0,-3.0,0.0\n\
                           1,branch,1,4.0,-3.0,0.0\n\
                           2,merge,0,1.0,-3.0,0.0\n\
                           2,merge,1,4.0,-3.0,0.0\n";

    #[test]
    fn assembles_complete_units_and_rejects_the_rest() {
        let loaded = load_units_reader(Cursor::new(link_rows()), Cursor::new(BORDERS)).unwrap();
        assert_eq!(loaded.units.len(), 1);
        let unit = &loaded.units[0];
        assert_eq!(unit.id, UnitId(0));
        assert_eq!(unit.event, EventKind::Merge);
        assert_eq!(unit.links.ramp.lanes.count, 1);
        assert_eq!(unit.links.ramp.lanes.width, 3.75);
        let xs: Vec<f64> = unit.links.upstream.centerline.vertices().iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(unit.border.start().x, 10.0);

        let rejected: Vec<_> = loaded.rejected.iter().map(|(id, _)| *id).collect();
        assert_eq!(rejected, vec![UnitId(1), UnitId(2)]);
        assert!(loaded.rejected.iter().all(|(_, e)| matches!(e, InterchangeError::MissingLink { role: LinkRole::Ramp, .. })));
    }

    #[test]
    fn bad_role_fails_the_load() {
        let links = "unit,role,seq,x,y,z,lane_count,lane_width,speed_limit\n0,shoulder,0,0,0,0,1,3.5,20\n";
        assert!(load_units_reader(Cursor::new(links), Cursor::new(BORDERS)).is_err());
    }

    #[test]
    fn missing_border_rejects_unit() {
        let loaded = load_units_reader(Cursor::new(link_rows()), Cursor::new("unit,event,seq,x,y,z\n")).unwrap();
        assert!(loaded.units.is_empty());
        assert!(matches!(loaded.rejected[0].1, InterchangeError::MissingBorder { unit: UnitId(0) }));
    }
}
