//! Unit tests for od-geometry.
//!
//! Fixtures are synthetic centrelines with known analytic shape, so every
//! expected value can be derived by hand.

#[cfg(test)]
mod helpers {
    use od_core::Polyline;

    /// `n` vertices along `y = 2x`, one metre apart in `x`.
    pub fn line_y2x(n: usize) -> Polyline {
        Polyline::from_xyz((0..n).map(|i| (i as f64, 2.0 * i as f64, 0.0))).unwrap()
    }

    /// Circular arc from the origin with initial heading 0.  Positive
    /// `radius` turns left.
    pub fn arc(radius: f64, sweep: f64, n: usize) -> Polyline {
        let r = radius.abs();
        let sign = radius.signum();
        Polyline::from_xyz((0..n).map(|i| {
            let phi = sweep * i as f64 / (n - 1) as f64;
            (r * phi.sin(), sign * r * (1.0 - phi.cos()), 0.0)
        }))
        .unwrap()
    }

    /// 100 m straight along +x, then 150 m of left-hand arc (R = 300 m),
    /// 2 m spacing.
    pub fn line_then_arc() -> Polyline {
        let mut pts: Vec<(f64, f64, f64)> = (0..=50).map(|i| (2.0 * i as f64, 0.0, 0.0)).collect();
        for i in 1..=75 {
            let phi = 2.0 * i as f64 / 300.0;
            pts.push((100.0 + 300.0 * phi.sin(), 300.0 * (1.0 - phi.cos()), 0.0));
        }
        Polyline::from_xyz(pts).unwrap()
    }

    /// Left arc then right arc of equal radius, tangent at the joint.
    pub fn s_curve() -> Polyline {
        let r = 200.0;
        let mut pts = Vec::new();
        let half = 60;
        let step = 2.0 / r;
        for i in 0..=half {
            let phi = step * i as f64;
            pts.push((r * phi.sin(), r * (1.0 - phi.cos()), 0.0));
        }
        let phi_end = step * half as f64;
        let (jx, jy) = (r * phi_end.sin(), r * (1.0 - phi_end.cos()));
        // Right-turning centre sits to the right of the joint tangent.
        let (cx, cy) = (jx + r * phi_end.sin(), jy - r * phi_end.cos());
        for i in 1..=half {
            let psi = phi_end - step * i as f64;
            pts.push((cx - r * psi.sin(), cy + r * psi.cos(), 0.0));
        }
        Polyline::from_xyz(pts).unwrap()
    }

    /// Assert the segment tiling invariants of a classification.
    pub fn assert_tiles(c: &crate::Classification, n: usize) {
        assert_eq!(c.headings.len(), n);
        assert_eq!(c.curvatures.len(), n);
        assert_eq!(c.stations.len(), n);
        assert_eq!(c.segments[0].s, 0.0);
        for w in c.segments.windows(2) {
            assert!((w[0].end_s() - w[1].s).abs() < 1e-9, "gap between segments");
        }
        assert!((c.length() - c.stations[n - 1]).abs() < 1e-9);
        for w in c.stations.windows(2) {
            assert!(w[1] >= w[0]);
        }
        for seg in &c.segments {
            assert!(seg.length.is_finite() && seg.length >= 0.0);
            assert!(seg.heading.is_finite());
        }
    }
}

// ── Circle fit ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fit {
    use approx::assert_relative_eq;
    use od_core::Vertex;

    use crate::fit::{fit_circle, local_radius};
    use crate::{vertex_headings, FitConfig, STRAIGHT_RADIUS};

    fn circle_pts(r: f64, from: f64, to: f64, n: usize) -> Vec<Vertex> {
        (0..n)
            .map(|i| {
                let t = from + (to - from) * i as f64 / (n - 1) as f64;
                Vertex::new(10.0 + r * t.cos(), -5.0 + r * t.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn counter_clockwise_is_positive() {
        let fit = fit_circle(&circle_pts(50.0, 0.0, 1.0, 7));
        assert_relative_eq!(fit.radius, 50.0, max_relative = 1e-9);
        assert_relative_eq!(fit.cx, 10.0, epsilon = 1e-7);
        assert_relative_eq!(fit.cy, -5.0, epsilon = 1e-7);
    }

    #[test]
    fn clockwise_is_negative() {
        let mut pts = circle_pts(50.0, 0.0, 1.0, 7);
        pts.reverse();
        let fit = fit_circle(&pts);
        assert_relative_eq!(fit.radius, -50.0, max_relative = 1e-9);
        assert_relative_eq!(fit.curvature(), -0.02, max_relative = 1e-9);
    }

    #[test]
    fn major_arc_keeps_turn_sign() {
        let fit = fit_circle(&circle_pts(20.0, 0.0, 5.0, 25));
        assert_relative_eq!(fit.radius, 20.0, max_relative = 1e-9);
    }

    #[test]
    fn collinear_is_finite_and_straight() {
        let pts: Vec<Vertex> = (0..6).map(|i| Vertex::new(i as f64, 3.0 * i as f64, 0.0)).collect();
        let fit = fit_circle(&pts);
        assert!(fit.radius.is_finite());
        assert!(fit.radius.abs() > 1e4);
        assert!(fit.radius.abs() <= STRAIGHT_RADIUS);
    }

    #[test]
    fn duplicates_do_not_panic() {
        let pts = vec![Vertex::new(1.0, 1.0, 0.0); 4];
        assert!(fit_circle(&pts).radius.is_finite());
        assert!(fit_circle(&pts[..2]).is_straight());
    }

    #[test]
    fn local_radius_on_arc() {
        let p = super::helpers::arc(200.0, 1.0, 80);
        let cfg = FitConfig::default();
        for i in [0, 40, 79] {
            assert_relative_eq!(local_radius(&p, i, &cfg).radius, 200.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn local_radius_ignores_stacked_points() {
        let p = od_core::Polyline::from_xyz([(0.0, 0.0, 0.0), (0.0, 0.0, 0.0), (5.0, 0.0, 0.0)]).unwrap();
        assert!(local_radius(&p, 1, &FitConfig::default()).is_straight());
    }

    #[test]
    fn headings_follow_line() {
        let p = super::helpers::line_y2x(10);
        for h in vertex_headings(&p) {
            assert_relative_eq!(h, 2.0_f64.atan2(1.0), epsilon = 1e-12);
        }
    }
}

// ── Fresnel & clothoid ────────────────────────────────────────────────────────

#[cfg(test)]
mod clothoid {
    use approx::assert_abs_diff_eq;
    use od_core::Pose;

    use crate::fresnel::fresnel;
    use crate::{clothoid_pose, clothoid_sample, subdivide_at_zero_curvature, GeometrySegment, SegmentKind};

    #[test]
    fn fresnel_known_values() {
        let (c, s) = fresnel(1.0);
        assert_abs_diff_eq!(c, 0.779_893_400_376_822_8, epsilon = 1e-10);
        assert_abs_diff_eq!(s, 0.438_259_147_390_354_8, epsilon = 1e-10);

        let (c, s) = fresnel(2.0);
        assert_abs_diff_eq!(c, 0.488_253_406_075_340_8, epsilon = 1e-10);
        assert_abs_diff_eq!(s, 0.343_415_678_363_698_2, epsilon = 1e-10);

        let (c, s) = fresnel(10.0);
        assert_abs_diff_eq!(c, 0.499_898_694_205_515_7, epsilon = 1e-9);
        assert_abs_diff_eq!(s, 0.468_169_978_584_882_2, epsilon = 1e-9);
    }

    #[test]
    fn fresnel_is_odd_and_continuous() {
        let (c, s) = fresnel(-1.0);
        assert_abs_diff_eq!(c, -0.779_893_400_376_822_8, epsilon = 1e-10);
        assert_abs_diff_eq!(s, -0.438_259_147_390_354_8, epsilon = 1e-10);

        let below = fresnel(1.5 - 1e-9);
        let above = fresnel(1.5 + 1e-9);
        assert_abs_diff_eq!(below.0, above.0, epsilon = 1e-8);
        assert_abs_diff_eq!(below.1, above.1, epsilon = 1e-8);
    }

    /// Midpoint integration of the heading function.
    fn integrate(start: Pose, k0: f64, k1: f64, len: f64) -> (f64, f64) {
        let n = 20_000;
        let h = len / n as f64;
        let rate = (k1 - k0) / len;
        let (mut x, mut y) = (start.x, start.y);
        for i in 0..n {
            let s = (i as f64 + 0.5) * h;
            let hdg = start.hdg + k0 * s + 0.5 * rate * s * s;
            x += h * hdg.cos();
            y += h * hdg.sin();
        }
        (x, y)
    }

    #[test]
    fn pose_matches_numeric_integration() {
        let start = Pose::new(12.0, -3.0, 0.4);
        let cases = [
            (0.0, 0.01, 80.0),
            (0.004, -0.002, 120.0),
            (-0.02, -0.005, 40.0),
            // Large Fresnel arguments.
            (0.05, 0.06, 30.0),
        ];
        for &(k0, k1, len) in &cases {
            let end = clothoid_pose(start, k0, k1, len, len);
            let (x, y) = integrate(start, k0, k1, len);
            assert_abs_diff_eq!(end.x, x, epsilon = 1e-5);
            assert_abs_diff_eq!(end.y, y, epsilon = 1e-5);
            assert_abs_diff_eq!(end.hdg, 0.4 + 0.5 * (k0 + k1) * len, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_rate_is_straight() {
        let start = Pose::new(0.0, 0.0, 0.3);
        let p = clothoid_pose(start, 0.0, 0.0, 50.0, 10.0);
        assert_abs_diff_eq!(p.x, 10.0 * 0.3_f64.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 10.0 * 0.3_f64.sin(), epsilon = 1e-6);
    }

    #[test]
    fn sample_includes_both_ends() {
        let start = Pose::new(1.0, 2.0, 0.0);
        let poses = clothoid_sample(start, 0.0, 0.02, 30.0, 6);
        assert_eq!(poses.len(), 7);
        assert_abs_diff_eq!(poses[0].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(poses[6].hdg, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn inflection_splits_into_two_spirals() {
        let seg = GeometrySegment {
            kind:         SegmentKind::Spiral { start_curvature: 0.01, end_curvature: -0.01 },
            start_vertex: 0,
            end_vertex:   10,
            s:            0.0,
            x:            0.0,
            y:            0.0,
            heading:      0.0,
            length:       50.0,
        };
        let (a, b) = subdivide_at_zero_curvature(&seg).expect("sign change");
        assert_abs_diff_eq!(a.length, 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.length + b.length, 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.end_curvature(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(b.start_curvature(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(b.s, 25.0, epsilon = 1e-12);

        let joint = a.end_pose();
        assert_abs_diff_eq!(joint.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(joint.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(seg.end_pose().x, b.end_pose().x, epsilon = 1e-6);
        assert_abs_diff_eq!(seg.end_pose().y, b.end_pose().y, epsilon = 1e-6);
    }

    #[test]
    fn no_split_without_sign_change() {
        let seg = GeometrySegment {
            kind:         SegmentKind::Spiral { start_curvature: 0.0, end_curvature: 0.01 },
            start_vertex: 0,
            end_vertex:   1,
            s:            0.0,
            x:            0.0,
            y:            0.0,
            heading:      0.0,
            length:       10.0,
        };
        assert!(subdivide_at_zero_curvature(&seg).is_none());
    }
}

// ── Classification ────────────────────────────────────────────────────────────

#[cfg(test)]
mod classify {
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use od_core::Polyline;

    use super::helpers::{arc, assert_tiles, line_then_arc, line_y2x, s_curve};
    use crate::{classify, ClassifyConfig, SegmentKind};

    fn variants(kinds: &[SegmentKind]) -> Vec<&'static str> {
        kinds.iter().map(SegmentKind::name).collect()
    }

    #[test]
    fn straight_line_is_one_line() {
        let p = line_y2x(100);
        let c = classify(&p, &ClassifyConfig::default());
        assert_eq!(c.segments.len(), 1);
        assert_eq!(c.segments[0].kind, SegmentKind::Line);
        assert_relative_eq!(c.segments[0].length, p.length(), max_relative = 1e-12);
        for &h in &c.headings {
            assert_relative_eq!(h, 2.0_f64.atan2(1.0), epsilon = 1e-12);
        }
        assert_tiles(&c, p.len());
    }

    #[test]
    fn two_vertices_is_a_line() {
        let p = Polyline::from_xyz([(0.0, 0.0, 0.0), (3.0, 4.0, 0.0)]).unwrap();
        let c = classify(&p, &ClassifyConfig::default());
        assert_eq!(c.kinds(), vec![SegmentKind::Line]);
        assert_relative_eq!(c.length(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn pure_arc_round_trips() {
        let p = arc(200.0, 1.2, 100);
        let c = classify(&p, &ClassifyConfig::default());
        assert_eq!(c.segments.len(), 1);
        let SegmentKind::Arc { radius } = c.segments[0].kind else {
            panic!("expected an arc, got {:?}", c.segments[0].kind);
        };
        assert_relative_eq!(radius, 200.0, max_relative = 1e-8);
        assert!(c.reconstruction_error(&p) < 1e-6);
        assert_relative_eq!(c.segments[0].heading, 0.0, epsilon = 1e-9);
        assert_tiles(&c, p.len());
    }

    #[test]
    fn right_turn_has_negative_radius() {
        let p = arc(-250.0, 0.8, 60);
        let c = classify(&p, &ClassifyConfig::default());
        match c.segments[0].kind {
            SegmentKind::Arc { radius } => assert!(radius < 0.0),
            other => panic!("expected an arc, got {other:?}"),
        }
        assert!(c.curvatures.iter().all(|&k| k < 0.0));
    }

    #[test]
    fn line_then_arc_gets_transition_spiral() {
        let p = line_then_arc();
        let c = classify(&p, &ClassifyConfig::default());
        assert_eq!(variants(&c.kinds()), vec!["line", "spiral", "arc"]);
        assert!(c.reconstruction_error(&p) < 0.3);
        assert_tiles(&c, p.len());

        // Curvature continuity across primitive boundaries.
        for w in c.segments.windows(2) {
            assert_relative_eq!(w[0].end_curvature(), w[1].start_curvature(), epsilon = 1e-12);
        }
    }

    #[test]
    fn reclassifying_resampled_output_is_idempotent() {
        let p = line_then_arc();
        let cfg = ClassifyConfig::default();
        let first = classify(&p, &cfg);
        let resampled = first.resample(2.0).unwrap();
        let second = classify(&resampled, &cfg);
        assert_eq!(variants(&first.kinds()), variants(&second.kinds()));
    }

    #[test]
    fn s_curve_spirals_never_cross_zero() {
        let p = s_curve();
        let c = classify(&p, &ClassifyConfig::default());
        assert_tiles(&c, p.len());
        assert!(matches!(c.segments[0].kind, SegmentKind::Arc { radius } if radius > 0.0));
        assert!(matches!(c.segments.last().unwrap().kind, SegmentKind::Arc { radius } if radius < 0.0));
        for seg in &c.segments {
            if let SegmentKind::Spiral { start_curvature, end_curvature } = seg.kind {
                assert!(start_curvature * end_curvature >= 0.0);
            }
        }
    }

    #[test]
    fn noisy_input_still_tiles() {
        let mut rng = SmallRng::seed_from_u64(17);
        let clean = line_then_arc();
        let noisy = Polyline::from_xyz(clean.vertices().iter().map(|v| {
            (v.x + rng.gen_range(-0.02..0.02), v.y + rng.gen_range(-0.02..0.02), v.z)
        }))
        .unwrap();
        let c = classify(&noisy, &ClassifyConfig::default());
        assert_tiles(&c, noisy.len());
        assert_eq!(c.segments[0].kind, SegmentKind::Line);
        assert!(matches!(c.segments.last().unwrap().kind, SegmentKind::Arc { radius } if radius > 0.0));
        assert!(c.reconstruction_error(&noisy) < 0.5);
    }
}

// ── Resampling & paramPoly3 ───────────────────────────────────────────────────

#[cfg(test)]
mod encode {
    use approx::assert_abs_diff_eq;

    use crate::{classify, resample, to_param_poly3, ClassifyConfig, GeometrySegment, SegmentKind};

    #[test]
    fn resample_keeps_length_and_ends() {
        let p = super::helpers::line_y2x(30);
        let c = classify(&p, &ClassifyConfig::default());
        let r = resample(&c, 5.0).unwrap();
        assert_abs_diff_eq!(r.length(), p.length(), epsilon = 1e-9);
        assert_abs_diff_eq!(r.last().x, p.last().x, epsilon = 1e-9);
        assert_abs_diff_eq!(r.last().y, p.last().y, epsilon = 1e-9);
        assert!(resample(&c, 0.0).is_err());
    }

    #[test]
    fn param_poly_hits_segment_end() {
        let seg = GeometrySegment {
            kind:         SegmentKind::Arc { radius: -150.0 },
            start_vertex: 0,
            end_vertex:   5,
            s:            0.0,
            x:            4.0,
            y:            7.0,
            heading:      1.1,
            length:       60.0,
        };
        let pp = to_param_poly3(&seg);
        assert_eq!(pp.eval(0.0), (0.0, 0.0));
        let (x, y) = pp.eval_world(seg.start_pose(), 1.0);
        let end = seg.end_pose();
        assert_abs_diff_eq!(x, end.x, epsilon = 1e-9);
        assert_abs_diff_eq!(y, end.y, epsilon = 1e-9);

        // Mid-point of a gentle arc is within a few centimetres.
        let (mx, my) = pp.eval_world(seg.start_pose(), 0.5);
        let mid = seg.pose_at(30.0);
        assert!(mid.distance_to(mx, my) < 0.05);
    }
}
