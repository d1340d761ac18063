//! Tunables for curvature estimation and primitive classification.
//!
//! Defaults target highway survey data with roughly 1–10 m vertex spacing.

/// Fitted radius magnitude treated as "straight" (metres).  Also the value
/// returned when a window has too few usable points.
pub const STRAIGHT_RADIUS: f64 = 1.0e9;

/// Consecutive window points closer than this (metres) count as one point.
pub const MIN_POINT_SPACING: f64 = 1e-6;

/// Arclength half-windows tried, largest first, when estimating curvature at
/// a vertex.  The last entry (0 m) degenerates to the immediate neighbours.
pub const DEFAULT_LOOKAHEADS: [f64; 3] = [20.0, 10.0, 0.0];

/// Settings for [`local_radius`](crate::fit::local_radius).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitConfig {
    /// Half-window arclengths in metres, tried in order.
    pub lookaheads: Vec<f64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self { lookaheads: DEFAULT_LOOKAHEADS.to_vec() }
    }
}

/// Settings for [`classify`](crate::classify::classify).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifyConfig {
    pub fit: FitConfig,

    /// Vertices with a fitted radius above this (metres) may join a line.
    /// Default: 2000 m.
    pub line_radius_threshold: f64,

    /// Maximum heading deviation (radians) of any edge of a line run from
    /// the run's first edge.  Default: 0.02 rad (≈ 1.1°).
    pub line_angle_threshold: f64,

    /// Relative radius tolerance for growing an arc run around a curvature
    /// extremum: `|r − r_ext| < tol · |r_ext|`.  Default: 0.1.
    pub arc_radius_tolerance: f64,

    /// Minimum vertices for an arc or line run.  Default: 3.
    pub min_run_vertices: usize,

    /// Split spirals whose end curvatures have opposite signs at the
    /// inflection point.  Default: `true`.
    pub split_inflections: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            fit:                   FitConfig::default(),
            line_radius_threshold: 2_000.0,
            line_angle_threshold:  0.02,
            arc_radius_tolerance:  0.1,
            min_run_vertices:      3,
            split_inflections:     true,
        }
    }
}
