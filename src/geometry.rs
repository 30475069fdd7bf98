//! Geometry primitives: distances, segment headings and polar offsets

use glam::{DVec2, dvec2};

use crate::defaults::EPSILON;
use crate::types::HorizontalDirection;

/// Euclidean distance between two coordinates.
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Classify the segment `a -> b` by comparing x-coordinates only.
///
/// Vertical segments are [`HorizontalDirection::Ambiguous`]; that ambiguity
/// carries into every directional length built on top of this.
pub fn direction(a: DVec2, b: DVec2) -> HorizontalDirection {
    if b.x - a.x == 0.0 {
        HorizontalDirection::Ambiguous
    } else if b.x > a.x {
        HorizontalDirection::LeftToRight
    } else {
        HorizontalDirection::RightToLeft
    }
}

/// Move `point` by `magnitude` along `angle` (radians).
#[inline]
pub fn polar_offset(point: DVec2, angle: f64, magnitude: f64) -> DVec2 {
    point + dvec2(angle.cos() * magnitude, angle.sin() * magnitude)
}

/// Angle of the segment `a -> b`, `atan2(dy, dx)`.
#[inline]
pub fn segment_angle(a: DVec2, b: DVec2) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Closest point to `p` on segment `a -> b`, as the parameter `t` in `[0, 1]`.
pub fn closest_param_on_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return 0.0;
    }
    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
}

/// Distance from `p` to the segment `a -> b`.
pub fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let t = closest_param_on_segment(p, a, b);
    distance(p, a.lerp(b, t))
}

/// Parameters `t` in `[0, 1]` where segment `a -> b` meets the circle.
///
/// Roots within [`EPSILON`] outside the segment are clamped onto its ends so
/// crossings at a vertex survive rounding. Tangent contacts yield a single
/// parameter. Degenerate segments yield nothing.
pub fn segment_circle_params(a: DVec2, b: DVec2, center: DVec2, radius: f64) -> Vec<f64> {
    let d = b - a;
    let f = a - center;
    let qa = d.dot(d);
    if qa == 0.0 {
        return Vec::new();
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - radius * radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return Vec::new();
    }

    let root = disc.sqrt();
    let mut params = Vec::with_capacity(2);
    for t in [(-qb - root) / (2.0 * qa), (-qb + root) / (2.0 * qa)] {
        if !(-EPSILON..=1.0 + EPSILON).contains(&t) {
            continue;
        }
        let t = t.clamp(0.0, 1.0);
        if !params.contains(&t) {
            params.push(t);
        }
    }
    params
}

/// Intersection of two segments as parameters `(t, u)` along each.
///
/// Parallel and collinear segments report no intersection.
pub fn segment_intersection(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> Option<(f64, f64)> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Intersection of the infinite lines through `p` along `dp` and `q` along `dq`.
pub fn line_intersection(p: DVec2, dp: DVec2, q: DVec2, dq: DVec2) -> Option<DVec2> {
    let denom = dp.perp_dot(dq);
    if denom == 0.0 {
        return None;
    }
    let t = (q - p).perp_dot(dq) / denom;
    Some(p + dp * t)
}
