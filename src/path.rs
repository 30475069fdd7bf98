//! Polyline paths and the queries text layout needs from them.
//!
//! A [`Path`] is an ordered run of connected straight segments. Offsets are
//! arc-length positions measured from the first point.

use glam::{DVec2, dvec2};

use crate::defaults::EPSILON;
use crate::errors::PathError;
use crate::geometry::{
    closest_param_on_segment, direction, distance, segment_angle, segment_circle_params,
};
use crate::types::{HorizontalDirection, check_finite};

/// An immutable polyline with strictly positive length.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points: Vec<DVec2>,
    /// Arc length from the first point to each point; same length as `points`.
    cumulative: Vec<f64>,
}

impl Path {
    /// Build a path from coordinates.
    ///
    /// Consecutive duplicate coordinates are dropped. Fails when fewer than two
    /// points are given, when any coordinate is not finite, or when nothing is
    /// left after dropping duplicates.
    pub fn new(points: impl IntoIterator<Item = DVec2>) -> Result<Path, PathError> {
        let raw: Vec<DVec2> = points.into_iter().collect();
        if raw.len() < 2 {
            return Err(PathError::TooFewPoints { count: raw.len() });
        }

        let mut points: Vec<DVec2> = Vec::with_capacity(raw.len());
        for p in raw {
            check_finite(p.x)?;
            check_finite(p.y)?;
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        if points.len() < 2 {
            return Err(PathError::ZeroLength);
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(total);
        for pair in points.windows(2) {
            total += distance(pair[0], pair[1]);
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(PathError::ZeroLength);
        }

        Ok(Path { points, cumulative })
    }

    /// Convenience constructor from `(x, y)` tuples.
    pub fn from_coords(coords: &[(f64, f64)]) -> Result<Path, PathError> {
        Path::new(coords.iter().map(|&(x, y)| dvec2(x, y)))
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn start(&self) -> DVec2 {
        self.points[0]
    }

    pub fn end(&self) -> DVec2 {
        self.points[self.points.len() - 1]
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Angle of the first segment.
    pub fn start_angle(&self) -> f64 {
        segment_angle(self.points[0], self.points[1])
    }

    fn directional_length(&self, aggregate: impl Fn(HorizontalDirection) -> bool) -> f64 {
        self.segments()
            .filter(|&(a, b)| aggregate(direction(a, b)))
            .map(|(a, b)| distance(a, b))
            .sum()
    }

    /// Length of all segments heading left (-x) to right (+x).
    ///
    /// Vertical segments count toward both directional lengths.
    pub fn left_to_right_length(&self) -> f64 {
        self.directional_length(|dir| dir != HorizontalDirection::RightToLeft)
    }

    /// Length of all segments heading right (+x) to left (-x).
    ///
    /// Vertical segments count toward both directional lengths.
    pub fn right_to_left_length(&self) -> f64 {
        self.directional_length(|dir| dir != HorizontalDirection::LeftToRight)
    }

    /// Offset and angle at the start of every segment.
    pub fn angle_table(&self) -> AngleTable {
        let entries = self
            .segments()
            .zip(&self.cumulative)
            .map(|((a, b), &offset)| (offset, segment_angle(a, b)))
            .collect();
        AngleTable { entries }
    }

    /// Index of the segment containing `offset`, assuming `0 < offset < length`.
    fn segment_index(&self, offset: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c <= offset);
        idx.saturating_sub(1).min(self.points.len() - 2)
    }

    /// Point at `offset` along the path, clamped to the end points.
    pub fn point_at(&self, offset: f64) -> DVec2 {
        if offset <= 0.0 {
            return self.start();
        }
        if offset >= self.length() {
            return self.end();
        }
        let i = self.segment_index(offset);
        let seg_len = self.cumulative[i + 1] - self.cumulative[i];
        let t = (offset - self.cumulative[i]) / seg_len;
        self.points[i].lerp(self.points[i + 1], t)
    }

    /// Offset of the point on the path nearest to `point`.
    ///
    /// When several points are equally near, the smallest offset wins.
    pub fn project(&self, point: DVec2) -> f64 {
        let mut best_distance = f64::INFINITY;
        let mut best_offset = 0.0;
        for (i, (a, b)) in self.segments().enumerate() {
            let t = closest_param_on_segment(point, a, b);
            let d = distance(point, a.lerp(b, t));
            if d < best_distance {
                best_distance = d;
                best_offset = self.cumulative[i] + t * (self.cumulative[i + 1] - self.cumulative[i]);
            }
        }
        best_offset
    }

    /// The same path walked from its far end.
    pub fn reverse(&self) -> Path {
        let points: Vec<DVec2> = self.points.iter().rev().copied().collect();
        let total = self.length();
        let cumulative = self.cumulative.iter().rev().map(|c| total - c).collect();
        Path { points, cumulative }
    }

    /// The part of the path between two offsets.
    ///
    /// `end = None` runs to the end of the path. Offsets are clamped to the
    /// path; a `start` past `end` yields the reversed piece. Returns `None`
    /// when the piece has no length.
    pub fn substring(&self, start: f64, end: Option<f64>) -> Option<Path> {
        let total = self.length();
        let end = end.unwrap_or(total);
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        let lo = lo.clamp(0.0, total);
        let hi = hi.clamp(0.0, total);
        if hi - lo <= EPSILON {
            return None;
        }

        let mut points = vec![self.point_at(lo)];
        points.extend(
            self.points
                .iter()
                .zip(&self.cumulative)
                .filter(|&(_, &c)| c > lo && c < hi)
                .map(|(p, _)| *p),
        );
        points.push(self.point_at(hi));

        let piece = Path::new(points).ok()?;
        if start <= end { Some(piece) } else { Some(piece.reverse()) }
    }

    /// Points where the path crosses the circle around `center`.
    ///
    /// Fails with [`PathError::CircleTracesPath`] when the path runs along the
    /// circle, because the intersection is then an arc rather than points.
    pub fn circle_intersections(&self, center: DVec2, radius: f64) -> Result<Vec<DVec2>, PathError> {
        let mut points: Vec<DVec2> = Vec::new();
        for (_, p) in self.circle_crossings(center, radius)? {
            if !points.iter().any(|q| distance(*q, p) <= EPSILON) {
                points.push(p);
            }
        }
        Ok(points)
    }

    /// Crossings with the circle as `(offset, point)` pairs in path order.
    fn circle_crossings(&self, center: DVec2, radius: f64) -> Result<Vec<(f64, DVec2)>, PathError> {
        if self.traces_circle(center, radius) {
            return Err(PathError::CircleTracesPath);
        }

        let mut crossings: Vec<(f64, DVec2)> = Vec::new();
        for (i, (a, b)) in self.segments().enumerate() {
            let seg_len = self.cumulative[i + 1] - self.cumulative[i];
            for t in segment_circle_params(a, b, center, radius) {
                let offset = self.cumulative[i] + t * seg_len;
                if !crossings.iter().any(|(o, _)| (o - offset).abs() <= EPSILON) {
                    crossings.push((offset, a.lerp(b, t)));
                }
            }
        }
        Ok(crossings)
    }

    /// True when three or more consecutive vertices sit on the circle.
    fn traces_circle(&self, center: DVec2, radius: f64) -> bool {
        if radius <= 0.0 {
            return false;
        }
        let tolerance = EPSILON * radius.max(1.0);
        let mut run = 0;
        for p in &self.points {
            if (distance(*p, center) - radius).abs() <= tolerance {
                run += 1;
                if run >= 3 {
                    return true;
                }
            } else {
                run = 0;
            }
        }
        false
    }

    /// Advance from `offset` by a straight-line `distance` and report where
    /// that lands in offset space.
    ///
    /// Intersects the path with the circle of radius `distance` around the
    /// point at `offset`, drops crossings behind `offset` and returns the
    /// nearest remaining one. `None` means the path is too short or never
    /// comes back within reach.
    pub fn next_offset_at_distance(&self, offset: f64, distance: f64) -> Result<Option<f64>, PathError> {
        let center = self.point_at(offset);
        let next = self
            .circle_crossings(center, distance)?
            .into_iter()
            .map(|(o, _)| o)
            .filter(|o| *o >= offset)
            .min_by(f64::total_cmp);
        Ok(next)
    }
}

/// Angle of each segment keyed by the offset where the segment starts.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AngleTable {
    entries: Vec<(f64, f64)>,
}

impl AngleTable {
    /// Build a table from `(offset, angle)` pairs sorted by offset.
    pub fn new(entries: Vec<(f64, f64)>) -> Self {
        AngleTable { entries }
    }

    pub fn entries(&self) -> &[(f64, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Angle of the segment entered at `offset`.
    ///
    /// An offset exactly on a segment boundary belongs to the segment that
    /// starts there. Offsets past the last entry keep the last angle.
    pub fn angle_at(&self, offset: f64) -> Result<f64, PathError> {
        if offset < 0.0 {
            return Err(PathError::NegativeOffset { offset });
        }
        let angle = self
            .entries
            .iter()
            .rev()
            .find(|(start, _)| *start <= offset)
            .or(self.entries.first())
            .map(|&(_, angle)| angle)
            .unwrap_or(0.0);
        Ok(angle)
    }
}

impl<'a> IntoIterator for &'a AngleTable {
    type Item = &'a (f64, f64);
    type IntoIter = std::slice::Iter<'a, (f64, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

    fn path(coords: &[(f64, f64)]) -> Path {
        Path::from_coords(coords).unwrap()
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn rejects_degenerate_input() {
        assert_eq!(Path::from_coords(&[(0.0, 0.0)]), Err(PathError::TooFewPoints { count: 1 }));
        assert_eq!(Path::from_coords(&[(1.0, 1.0), (1.0, 1.0)]), Err(PathError::ZeroLength));
        assert!(matches!(
            Path::from_coords(&[(0.0, 0.0), (f64::NAN, 1.0)]),
            Err(PathError::NonFinite(_))
        ));
    }

    #[test]
    fn drops_consecutive_duplicates() {
        let p = path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(p.points().len(), 3);
        assert_eq!(p.length(), 2.0);
    }

    #[test]
    fn ltr_and_rtl_lengths() {
        let cases = [
            (path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]), 2.0, 0.0),
            (path(&[(2.0, 0.0), (1.0, 0.0), (0.0, 0.0)]), 0.0, 2.0),
            (path(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]), 2.0, SQRT_2),
        ];
        for (p, ltr, rtl) in cases {
            assert_eq!(p.left_to_right_length(), ltr);
            assert_eq!(p.right_to_left_length(), rtl);
        }
    }

    #[test]
    fn vertical_paths_count_in_both_directions() {
        let p = path(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        assert_eq!(p.left_to_right_length(), p.right_to_left_length());
        assert_eq!(p.left_to_right_length(), p.length());

        let reversed = p.reverse();
        assert_eq!(reversed.left_to_right_length(), reversed.right_to_left_length());
    }

    #[test]
    fn directional_lengths_cover_total_length() {
        let p = path(&[(0.0, 0.0), (3.0, 4.0), (3.0, 8.0), (1.0, 9.0)]);
        let sum = p.left_to_right_length() + p.right_to_left_length();
        assert!(sum > p.length());

        let no_vertical = path(&[(0.0, 0.0), (3.0, 4.0), (1.0, 9.0)]);
        assert_approx(
            no_vertical.left_to_right_length() + no_vertical.right_to_left_length(),
            no_vertical.length(),
        );
    }

    #[test]
    fn reverse_round_trips() {
        let p = path(&[(0.0, 0.0), (1.0, 2.0), (5.0, 2.0)]);
        assert_eq!(p.reverse().start(), p.end());
        assert_eq!(p.reverse().reverse().points(), p.points());
    }

    #[test]
    fn angle_tables() {
        let cases = [
            (path(&[(0.0, 0.0), (2.0, 0.0), (0.0, 0.0)]), vec![(0.0, 0.0), (2.0, PI)]),
            (
                path(&[(0.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
                vec![(0.0, FRAC_PI_2), (2.0, -FRAC_PI_2)],
            ),
            (
                path(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
                vec![(0.0, FRAC_PI_4), (SQRT_2, -PI * 3.0 / 4.0)],
            ),
            (
                path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]),
                vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)],
            ),
        ];
        for (p, expected) in cases {
            let table = p.angle_table();
            assert_eq!(table.entries().len(), expected.len());
            for ((offset, angle), (e_offset, e_angle)) in table.iter().zip(expected) {
                assert_approx(offset, e_offset);
                assert_approx(angle, e_angle);
            }
        }
    }

    #[test]
    fn angle_at_offset() {
        let table = AngleTable::new(vec![(0.0, 0.0), (2.0, PI)]);
        assert_eq!(table.angle_at(0.0), Ok(0.0));
        assert_eq!(table.angle_at(1.0), Ok(0.0));
        assert_eq!(table.angle_at(2.0), Ok(PI));
        assert_eq!(table.angle_at(3.0), Ok(PI));
    }

    #[test]
    fn angle_at_negative_offset_fails() {
        let table = AngleTable::new(vec![(0.0, 0.0), (2.0, PI)]);
        assert_eq!(table.angle_at(-1.34), Err(PathError::NegativeOffset { offset: -1.34 }));
    }

    #[test]
    fn angle_table_is_restartable() {
        let table = path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).angle_table();
        let first: Vec<_> = (&table).into_iter().collect();
        let second: Vec<_> = (&table).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn point_at_interpolates_and_clamps() {
        let p = path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(p.point_at(-5.0), dvec2(0.0, 0.0));
        assert_eq!(p.point_at(0.0), dvec2(0.0, 0.0));
        assert_eq!(p.point_at(5.0), dvec2(5.0, 0.0));
        assert_eq!(p.point_at(10.0), dvec2(10.0, 0.0));
        assert_eq!(p.point_at(15.0), dvec2(10.0, 5.0));
        assert_eq!(p.point_at(25.0), dvec2(10.0, 10.0));
    }

    #[test]
    fn project_points() {
        let cases = [
            (path(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]), dvec2(0.0, 0.5), 0.5),
            (path(&[(0.0, 0.0), (0.5, 1.0), (0.0, 2.0)]), dvec2(0.5, 1.0), 1.25f64.sqrt()),
            (path(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]), dvec2(0.0, 3.0), 2.0),
            (path(&[(0.0, 0.0), (0.5, 1.0), (0.0, 2.0)]), dvec2(1.0, 1.0), 1.25f64.sqrt()),
        ];
        for (p, point, expected) in cases {
            assert_approx(p.project(point), expected);
        }
    }

    #[test]
    fn substring_between_offsets() {
        let p = path(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let piece = p.substring(5.0, Some(15.0)).unwrap();
        assert_eq!(piece.points(), &[dvec2(5.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 5.0)]);

        let tail = p.substring(12.0, None).unwrap();
        assert_eq!(tail.points(), &[dvec2(10.0, 2.0), dvec2(10.0, 10.0)]);

        let backwards = p.substring(15.0, Some(5.0)).unwrap();
        assert_eq!(backwards.start(), dvec2(10.0, 5.0));
        assert_eq!(backwards.end(), dvec2(5.0, 0.0));

        assert!(p.substring(3.0, Some(3.0)).is_none());
    }

    #[test]
    fn circle_intersection_counts() {
        let p = path(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        assert_eq!(p.circle_intersections(dvec2(0.0, 1.0), 0.5).unwrap().len(), 2);
        assert_eq!(p.circle_intersections(dvec2(0.0, 2.0), 0.5).unwrap().len(), 1);
        assert_eq!(p.circle_intersections(dvec2(0.0, 3.0), 0.5).unwrap().len(), 0);
    }

    #[test]
    fn circle_through_a_vertex_is_reported_once() {
        let p = path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let points = p.circle_intersections(dvec2(0.0, 0.0), 1.0).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0] - dvec2(1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn circle_through_a_slanted_vertex_is_found() {
        let p = path(&[(0.0, 0.0), (3.154, 0.586), (6.087, 1.181)]);
        let vertex = dvec2(3.154, 0.586);
        let points = p.circle_intersections(DVec2::ZERO, vertex.length()).unwrap();
        assert_eq!(points.len(), 1, "{points:?}");
        assert!((points[0] - vertex).length() < 1e-9);
    }

    #[test]
    fn next_offset_reaches_the_path_end() {
        let p = path(&[(0.0, 0.0), (3.154, 0.586), (6.087, 1.181)]);
        let chord = (p.end() - p.start()).length();
        let next = p.next_offset_at_distance(0.0, chord).unwrap();
        assert_approx(next.unwrap(), p.length());
    }

    #[test]
    fn circle_tracing_the_path_fails() {
        let ring: Vec<DVec2> = (0..=64)
            .map(|i| {
                let angle = PI * 2.0 * i as f64 / 64.0;
                dvec2(angle.cos(), angle.sin())
            })
            .collect();
        let p = Path::new(ring).unwrap();
        assert_eq!(
            p.circle_intersections(dvec2(0.0, 0.0), 1.0),
            Err(PathError::CircleTracesPath)
        );
    }

    #[test]
    fn next_offset_from_offset() {
        let cases = [
            (path(&[(0.0, 0.0), (10.0, 0.0)]), 3.0, 1.0, Some(4.0)),
            (path(&[(2.0, 0.0), (10.0, 0.0)]), 9.0, 1.5, None),
            (path(&[(0.0, 0.0), (10.0, 0.0)]), 0.0, 10.0, Some(10.0)),
            (
                path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (3.0, 0.0)]),
                0.0,
                2.0,
                Some(SQRT_2 + 2.0),
            ),
            // Several forward candidates: the nearest one wins
            (path(&[(0.0, 0.0), (2.0, 0.0), (0.0, 1.0), (2.0, 1.0)]), 1.0, 0.5, Some(1.5)),
        ];
        for (p, offset, distance, expected) in cases {
            let next = p.next_offset_at_distance(offset, distance).unwrap();
            match (next, expected) {
                (Some(n), Some(e)) => assert_approx(n, e),
                (None, None) => {}
                _ => panic!("expected {expected:?}, got {next:?}"),
            }
        }
    }
}
