//! Parallel offset curves for polylines.
//!
//! Offsetting works in three passes over a "raw" curve:
//!
//! 1. **Raw construction**: every source segment is shifted along its normal.
//!    Consecutive shifted edges are connected with a join. On the outside of a
//!    turn the join is an arc, a mitre or a bevel. On the inside of a turn the
//!    two edges are connected through the source vertex, which creates loops
//!    that the later passes cut away.
//! 2. **Splitting**: raw segments are cut wherever two non-adjacent raw
//!    segments cross.
//! 3. **Filtering**: a piece survives only if its midpoint keeps the full
//!    offset distance from the source. Surviving pieces are stitched back
//!    together when the gap between them is below [`STITCH_TOLERANCE`] of the
//!    offset distance. Tiny loop remnants at gentle inner turns leave such
//!    gaps on smooth curves.
//!
//! The result may be empty (the path folds back within the offset distance),
//! a single path, or several disconnected paths.
//!
//! [`offset_with_matching_direction`] adds the orientation check the text path
//! controller needs before it trusts an offset curve.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DVec2, dvec2};

use crate::defaults::{ANGLE_EPSILON, ARC_RESOLUTION, EPSILON, MITRE_LIMIT, OFFSET_TOLERANCE, STITCH_TOLERANCE};
use crate::geometry::{distance, distance_to_segment, line_intersection, segment_intersection};
use crate::log::{debug, trace};
use crate::path::Path;
use crate::types::Side;

/// How offset edges meet on the outside of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinStyle {
    /// Circular arc around the source vertex
    #[default]
    Round,
    /// Extend both edges until they meet, falling back to a bevel past the mitre limit
    Mitre,
    /// Straight line between the two edge ends
    Bevel,
}

/// Tuning for offset construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetOptions {
    pub join_style: JoinStyle,
    /// Longest allowed mitre as a multiple of the offset distance
    pub mitre_limit: f64,
    /// Arc segments per quarter turn for round joins
    pub resolution: usize,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        OffsetOptions {
            join_style: JoinStyle::Round,
            mitre_limit: MITRE_LIMIT,
            resolution: ARC_RESOLUTION,
        }
    }
}

/// Outcome of offsetting a path.
#[derive(Clone, Debug, PartialEq)]
pub enum OffsetCurve {
    /// Nothing keeps the requested distance from the source
    Empty,
    Single(Path),
    /// Disconnected pieces in source order
    Multi(Vec<Path>),
}

/// An offset curve plus whether its orientation follows the source path.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectedOffset {
    pub curve: OffsetCurve,
    /// Only ever `true` for [`OffsetCurve::Single`]
    pub direction_confirmed: bool,
}

/// Where a raw segment came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    /// Shifted copy of source segment `k`
    Edge(usize),
    /// Outer join around source vertex `j`
    Join(usize),
    /// Connector through source vertex `j` on the inside of a turn
    Inner(usize),
}

#[derive(Clone, Copy, Debug)]
struct RawSegment {
    start: DVec2,
    end: DVec2,
    origin: Origin,
}

/// Turn classification at an interior vertex, seen from the offset side.
enum Turn {
    Straight,
    Outer,
    /// The path doubles back on itself
    Reversal,
    Inner,
}

/// Unit normal of `dir` on `side`, in screen coordinates (y grows downward).
fn side_normal(dir: DVec2, side: Side) -> DVec2 {
    match side {
        Side::Left => dvec2(dir.y, -dir.x),
        Side::Right => dvec2(-dir.y, dir.x),
    }
}

fn classify_turn(dir: DVec2, next_dir: DVec2, normal: DVec2) -> Turn {
    let cross = dir.perp_dot(next_dir);
    if cross.abs() <= ANGLE_EPSILON {
        if dir.dot(next_dir) > 0.0 { Turn::Straight } else { Turn::Reversal }
    } else if normal.dot(next_dir) < 0.0 {
        Turn::Outer
    } else {
        Turn::Inner
    }
}

/// Accumulates raw segments, skipping zero-length steps.
struct RawBuilder {
    cursor: DVec2,
    segments: Vec<RawSegment>,
}

impl RawBuilder {
    fn new(start: DVec2) -> Self {
        RawBuilder {
            cursor: start,
            segments: Vec::new(),
        }
    }

    fn line_to(&mut self, to: DVec2, origin: Origin) {
        if distance(self.cursor, to) > EPSILON {
            self.segments.push(RawSegment {
                start: self.cursor,
                end: to,
                origin,
            });
            self.cursor = to;
        }
    }
}

/// Offset `path` by `amount` units to `side`.
///
/// A negative amount offsets to the opposite side. A zero amount returns the
/// path unchanged.
pub fn parallel_offset(path: &Path, amount: f64, side: Side, options: &OffsetOptions) -> OffsetCurve {
    if amount == 0.0 {
        return OffsetCurve::Single(path.clone());
    }
    let (d, side) = if amount < 0.0 {
        (-amount, side.flipped())
    } else {
        (amount, side)
    };

    let source: Vec<(DVec2, DVec2)> = path.segments().collect();
    let raw = build_raw(path.points(), d, side, options);
    let pieces = split_at_crossings(&raw);

    let min_distance = d * (1.0 - OFFSET_TOLERANCE);
    let max_gap = d * STITCH_TOLERANCE;
    let mut chains: Vec<Vec<DVec2>> = Vec::new();
    for (start, end, origin) in pieces {
        let mid = start.lerp(end, 0.5);
        let keeps_distance = source.iter().enumerate().all(|(k, &(a, b))| {
            if let Origin::Join(j) = origin {
                // An arc chord sags toward its own vertex
                if k + 1 == j || k == j {
                    return true;
                }
            }
            distance_to_segment(mid, a, b) >= min_distance
        });
        if !keeps_distance {
            trace!(?origin, ?mid, "dropping offset piece");
            continue;
        }

        let gap = chains
            .last()
            .and_then(|chain| chain.last())
            .map(|last| distance(*last, start))
            .filter(|gap| *gap <= max_gap);
        if let (Some(gap), Some(chain)) = (gap, chains.last_mut()) {
            if gap > EPSILON {
                trace!(gap, ?start, "bridging offset gap");
                chain.push(start);
            }
            chain.push(end);
        } else {
            chains.push(vec![start, end]);
        }
    }

    let mut paths: Vec<Path> = chains.into_iter().filter_map(|c| Path::new(c).ok()).collect();
    debug!(amount, %side, pieces = paths.len(), "offset path");
    match paths.len() {
        0 => OffsetCurve::Empty,
        1 => OffsetCurve::Single(paths.remove(0)),
        _ => OffsetCurve::Multi(paths),
    }
}

fn build_raw(points: &[DVec2], d: f64, side: Side, options: &OffsetOptions) -> Vec<RawSegment> {
    let dirs: Vec<DVec2> = points.windows(2).map(|p| (p[1] - p[0]).normalize()).collect();
    let normals: Vec<DVec2> = dirs.iter().map(|dir| side_normal(*dir, side) * d).collect();

    let mut raw = RawBuilder::new(points[0] + normals[0]);
    for j in 1..points.len() - 1 {
        let k = j - 1;
        let vertex = points[j];
        let (n, next_n) = (normals[k], normals[j]);
        let (dir, next_dir) = (dirs[k], dirs[j]);

        raw.line_to(vertex + n, Origin::Edge(k));
        let closing = match classify_turn(dir, next_dir, n) {
            Turn::Straight => Origin::Join(j),
            Turn::Inner => {
                raw.line_to(vertex, Origin::Inner(j));
                Origin::Inner(j)
            }
            Turn::Outer => {
                let sweep = n.perp_dot(next_n).atan2(n.dot(next_n));
                outer_join(&mut raw, vertex, (n, next_n), (dir, next_dir), sweep, j, options);
                Origin::Join(j)
            }
            Turn::Reversal => {
                let sweep = PI * n.perp_dot(dir).signum();
                outer_join(&mut raw, vertex, (n, next_n), (dir, next_dir), sweep, j, options);
                Origin::Join(j)
            }
        };
        raw.line_to(vertex + next_n, closing);
    }
    let last = points.len() - 1;
    raw.line_to(points[last] + normals[last - 1], Origin::Edge(last - 1));
    raw.segments
}

/// Emit the interior points of an outer join; `sweep` is the signed turn from
/// `n` to `next_n` in radians.
fn outer_join(
    raw: &mut RawBuilder,
    vertex: DVec2,
    (n, next_n): (DVec2, DVec2),
    (dir, next_dir): (DVec2, DVec2),
    sweep: f64,
    j: usize,
    options: &OffsetOptions,
) {
    match options.join_style {
        JoinStyle::Round => {
            let radius = n.length();
            let start_angle = n.y.atan2(n.x);
            let steps = ((sweep.abs() / FRAC_PI_2) * options.resolution.max(1) as f64)
                .ceil()
                .max(1.0) as usize;
            for i in 1..steps {
                let angle = start_angle + sweep * i as f64 / steps as f64;
                raw.line_to(vertex + dvec2(angle.cos(), angle.sin()) * radius, Origin::Join(j));
            }
        }
        JoinStyle::Mitre => {
            let limit = options.mitre_limit * n.length();
            let tip = line_intersection(vertex + n, dir, vertex + next_n, next_dir)
                .filter(|tip| distance(*tip, vertex) <= limit);
            if let Some(tip) = tip {
                raw.line_to(tip, Origin::Join(j));
            }
        }
        JoinStyle::Bevel => {}
    }
}

/// Cut raw segments where non-adjacent ones cross.
///
/// The crossing point is computed once and shared by both segments so that
/// the pieces meet exactly.
fn split_at_crossings(raw: &[RawSegment]) -> Vec<(DVec2, DVec2, Origin)> {
    let mut cuts: Vec<Vec<(f64, DVec2)>> = vec![Vec::new(); raw.len()];
    for i in 0..raw.len() {
        for j in i + 2..raw.len() {
            let (a, b) = (raw[i], raw[j]);
            if let Some((t, u)) = segment_intersection(a.start, a.end, b.start, b.end) {
                let point = a.start.lerp(a.end, t);
                cuts[i].push((t, point));
                cuts[j].push((u, point));
            }
        }
    }

    let mut pieces = Vec::new();
    for (segment, mut cut) in raw.iter().zip(cuts) {
        cut.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut from = segment.start;
        for (_, point) in cut {
            if distance(from, point) > EPSILON && distance(point, segment.end) > EPSILON {
                pieces.push((from, point, segment.origin));
                from = point;
            }
        }
        pieces.push((from, segment.end, segment.origin));
    }
    pieces
}

/// Smallest absolute difference between two angles.
fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff)
}

/// Offset `path` and orient the result like the source.
///
/// Empty and disconnected results are never confirmed. A single path goes
/// through [`orient_offset`].
pub fn offset_with_matching_direction(
    path: &Path,
    amount: f64,
    side: Side,
    options: &OffsetOptions,
) -> DirectedOffset {
    match parallel_offset(path, amount, side, options) {
        OffsetCurve::Single(candidate) => {
            let (curve, direction_confirmed) = orient_offset(path, candidate, amount);
            DirectedOffset {
                curve: OffsetCurve::Single(curve),
                direction_confirmed,
            }
        }
        curve => DirectedOffset {
            curve,
            direction_confirmed: false,
        },
    }
}

/// Orient `candidate`, an offset of `source` by `amount`, like the source.
///
/// The candidate is checked against the source start, first as is and then
/// reversed. It is confirmed when its start sits exactly `amount` away from
/// the source start and it sets off at the same angle. When only the start
/// position matches, the matching orientation is returned unconfirmed.
/// Otherwise the candidate comes back untouched and unconfirmed.
pub fn orient_offset(source: &Path, candidate: Path, amount: f64) -> (Path, bool) {
    let expected = amount.abs();
    let tolerance = OFFSET_TOLERANCE * expected.max(1.0);
    let position_matches = |p: &Path| (distance(p.start(), source.start()) - expected).abs() <= tolerance;
    let angle_matches = |p: &Path| angle_difference(p.start_angle(), source.start_angle()) <= ANGLE_EPSILON;

    let reversed = candidate.reverse();
    let (curve, direction_confirmed) = if position_matches(&candidate) && angle_matches(&candidate) {
        (candidate, true)
    } else if position_matches(&reversed) && angle_matches(&reversed) {
        debug!("offset path runs backwards, using its reversal");
        (reversed, true)
    } else if position_matches(&candidate) {
        (candidate, false)
    } else if position_matches(&reversed) {
        (reversed, false)
    } else {
        (candidate, false)
    };

    debug!(direction_confirmed, "matched offset direction");
    (curve, direction_confirmed)
}
