//! Synthetic two-event corridor.
//!
//! A mainline that runs straight along +x for 800 m and then bends left on a
//! 2 km radius.  A two-lane ramp merges from the right at s = 340 m; a
//! one-lane ramp leaves to the right at s = 940 m.  Both events are emitted in
//! the loader's CSV formats.

use std::fmt::Write;

/// Mainline station where the straight ends and the curve begins.
const BEND_START: f64 = 800.0;
const BEND_RADIUS: f64 = 2_000.0;
const SPACING: f64 = 2.0;

fn grade(s: f64) -> f64 {
    20.0 + 0.02 * s
}

/// Mainline position and left normal at station `s`.
fn mainline(s: f64) -> ([f64; 2], [f64; 2]) {
    if s <= BEND_START {
        return ([s, 0.0], [0.0, 1.0]);
    }
    let theta = (s - BEND_START) / BEND_RADIUS;
    let (sin, cos) = theta.sin_cos();
    ([BEND_START + BEND_RADIUS * sin, BEND_RADIUS * (1.0 - cos)], [-sin, cos])
}

/// Point `offset` metres left of the mainline at `s`.
fn offset_point(s: f64, offset: f64) -> [f64; 2] {
    let (p, n) = mainline(s);
    [p[0] + offset * n[0], p[1] + offset * n[1]]
}

struct Lanes {
    count: u32,
    width: f64,
    speed: f64,
}

struct EventSpec {
    unit:       u32,
    event:      &'static str,
    /// Mainline stations of upstream start, upstream/downstream joint and
    /// downstream end.
    mainline:   [f64; 3],
    upstream:   Lanes,
    downstream: Lanes,
    ramp:       Lanes,
    /// Wedge border stations, start then end.
    border:     [f64; 2],
    /// Station where the ramp meets the mainline edge.
    gore:       f64,
}

fn events() -> [EventSpec; 2] {
    [
        EventSpec {
            unit:       0,
            event:      "merge",
            mainline:   [0.0, 300.0, 700.0],
            upstream:   Lanes { count: 2, width: 3.5, speed: 27.8 },
            downstream: Lanes { count: 3, width: 3.5, speed: 27.8 },
            ramp:       Lanes { count: 2, width: 3.75, speed: 16.7 },
            border:     [340.0, 420.0],
            gore:       340.0,
        },
        EventSpec {
            unit:       1,
            event:      "branch",
            mainline:   [660.0, 1_000.0, 1_400.0],
            upstream:   Lanes { count: 3, width: 3.5, speed: 27.8 },
            downstream: Lanes { count: 2, width: 3.5, speed: 25.0 },
            ramp:       Lanes { count: 1, width: 3.75, speed: 16.7 },
            border:     [860.0, 940.0],
            gore:       940.0,
        },
    ]
}

/// `(links_csv, borders_csv)` for the whole corridor.
pub fn corridor_csv() -> Result<(String, String), std::fmt::Error> {
    let mut links = String::from("unit,role,seq,x,y,z,lane_count,lane_width,speed_limit\n");
    let mut borders = String::from("unit,event,seq,x,y,z\n");

    for ev in events() {
        let mut row = |role: &str, seq: usize, xy: [f64; 2], z: f64, lanes: &Lanes| {
            writeln!(
                links,
                "{},{role},{seq},{:.4},{:.4},{:.4},{},{},{}",
                ev.unit, xy[0], xy[1], z, lanes.count, lanes.width, lanes.speed
            )
        };

        let [start, joint, end] = ev.mainline;
        for (role, from, to, lanes) in [("upstream", start, joint, &ev.upstream), ("downstream", joint, end, &ev.downstream)] {
            let steps = ((to - from) / SPACING).round() as usize;
            for i in 0..=steps {
                let s = from + SPACING * i as f64;
                row(role, i, mainline(s).0, grade(s), lanes)?;
            }
        }

        // Ramp: 40 edges of 4 m, 3 m off the edge line at the gore and
        // diverging at 1 in 4 away from it.
        let first = match ev.event {
            "merge" => ev.gore - 140.0,
            _ => ev.gore - 10.0,
        };
        for i in 0..=40 {
            let s = first + 4.0 * i as f64;
            let away = match ev.event {
                "merge" => (ev.gore - s).max(0.0),
                _ => (s - ev.gore).max(0.0),
            };
            let z = grade(ev.gore) + 1.5 + 0.03 * (s - ev.gore);
            row("ramp", i, offset_point(s, -3.0 - 0.25 * away), z, &ev.ramp)?;
        }

        for (seq, (s, off)) in [(ev.border[0], -3.0), (ev.border[1], -1.0)].into_iter().enumerate() {
            let p = offset_point(s, off);
            writeln!(borders, "{},{},{seq},{:.4},{:.4},{:.4}", ev.unit, ev.event, p[0], p[1], grade(s))?;
        }
    }
    Ok((links, borders))
}
