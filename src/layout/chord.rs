//! Chord-walking placement

use super::{LayoutEngine, Placement, alignment_start};
use crate::errors::PathError;
use crate::geometry::segment_angle;
use crate::log::{debug, trace};
use crate::path::Path;
use crate::types::{Alignment, Extent, GlyphExtent};

/// Places the leading edge of each cluster on the path and rotates it along
/// the chord to where its trailing edge meets the path.
///
/// The next cluster starts where the previous chord ended, so on tight curves
/// the text keeps its advance widths instead of bunching up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChordLayout;

impl LayoutEngine for ChordLayout {
    fn place(
        &self,
        path: &Path,
        extents: &[GlyphExtent],
        run_extent: &Extent,
        alignment: Alignment,
        start_offset: f64,
    ) -> Result<Vec<Placement>, PathError> {
        let length = path.length();
        let mut cursor = alignment_start(alignment, length, run_extent.width, start_offset)
            + extents.first().map_or(0.0, |e| e.x());

        let mut placements = Vec::with_capacity(extents.len());
        for (cluster, extent) in extents.iter().enumerate() {
            let width = extent.width();
            if cursor < 0.0 {
                trace!(cluster, cursor, "cluster lands before the path start");
                cursor += width;
                continue;
            }
            if cursor > length {
                debug!(placed = placements.len(), total = extents.len(), "text does not fit the path");
                break;
            }

            let position = path.point_at(cursor);
            let rotation = if width == 0.0 {
                path.angle_table().angle_at(cursor)?
            } else {
                match path.next_offset_at_distance(cursor, width)? {
                    Some(next) => {
                        let angle = segment_angle(position, path.point_at(next));
                        cursor = next;
                        angle
                    }
                    None => {
                        debug!(placed = placements.len(), total = extents.len(), "text does not fit the path");
                        break;
                    }
                }
            };
            placements.push(Placement {
                cluster,
                position,
                rotation,
                extent: *extent,
            });
        }
        Ok(placements)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use glam::{DVec2, dvec2};

    use super::*;

    fn extents(count: usize, advance: f64) -> Vec<GlyphExtent> {
        (0..count)
            .map(|i| GlyphExtent::new(i as f64 * advance, 0.0, advance, 20.0, 16.0))
            .collect()
    }

    fn place(coords: &[(f64, f64)], count: usize, start_offset: f64) -> Vec<Placement> {
        let path = Path::from_coords(coords).unwrap();
        let extents = extents(count, 10.0);
        let run = Extent::new(0.0, 0.0, count as f64 * 10.0, 20.0);
        ChordLayout
            .place(&path, &extents, &run, Alignment::Left, start_offset)
            .unwrap()
    }

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn walks_a_straight_path() {
        let placed = place(&[(0.0, 0.0), (100.0, 0.0)], 3, 0.0);
        assert_eq!(placed.len(), 3);
        for (i, p) in placed.iter().enumerate() {
            assert_close(p.position, dvec2(i as f64 * 10.0, 0.0));
            assert_eq!(p.rotation, 0.0);
        }
    }

    #[test]
    fn turns_the_corner() {
        let placed = place(&[(0.0, 0.0), (10.0, 0.0), (10.0, 100.0)], 3, 0.0);
        let positions: Vec<_> = placed.iter().map(|p| p.position).collect();
        assert_close(positions[0], dvec2(0.0, 0.0));
        assert_close(positions[1], dvec2(10.0, 0.0));
        assert_close(positions[2], dvec2(10.0, 10.0));
        assert!((placed[1].rotation - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn fills_a_slanted_path_exactly() {
        let (sin, cos) = 0.3_f64.sin_cos();
        let coords: Vec<(f64, f64)> = (0..4).map(|k| (k as f64 * 10.0 * cos, k as f64 * 10.0 * sin)).collect();
        let placed = place(&coords, 3, 0.0);
        assert_eq!(placed.len(), 3);
        assert_close(placed[2].position, dvec2(20.0 * cos, 20.0 * sin));
    }

    #[test]
    fn stops_when_no_chord_fits() {
        let placed = place(&[(0.0, 0.0), (25.0, 0.0)], 3, 0.0);
        assert_eq!(placed.len(), 2);
    }

    #[test]
    fn skips_clusters_before_the_start() {
        let placed = place(&[(0.0, 0.0), (100.0, 0.0)], 3, -15.0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].cluster, 2);
        assert_close(placed[0].position, dvec2(5.0, 0.0));
    }
}
