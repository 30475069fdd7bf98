//! Default settings and geometric tolerances

/// Mitre joins longer than this multiple of the offset distance become bevels.
pub const MITRE_LIMIT: f64 = 5.0;

/// Segments used to approximate a quarter circle in round joins.
pub const ARC_RESOLUTION: usize = 16;

/// Absolute tolerance for coordinate and offset comparisons.
pub const EPSILON: f64 = 1e-9;

/// Tolerance when comparing angles (radians).
pub const ANGLE_EPSILON: f64 = 1e-6;

/// Relative slack allowed when judging whether an offset point keeps its distance.
pub const OFFSET_TOLERANCE: f64 = 1e-6;

/// Largest gap between surviving offset pieces that is still bridged, as a
/// fraction of the offset distance.
pub const STITCH_TOLERANCE: f64 = 0.05;
