//! SVG `<textPath>` placement

use std::f64::consts::PI;

use super::{LayoutEngine, Placement, alignment_start};
use crate::errors::PathError;
use crate::geometry::polar_offset;
use crate::log::{debug, trace};
use crate::path::Path;
use crate::types::{Alignment, Extent, GlyphExtent};

/// Places the horizontal midpoint of each cluster on the path and rotates it
/// to the tangent there.
///
/// The drawing origin is then moved back by half the cluster width along the
/// tangent, so the cluster's leading edge is where drawing starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SvgLayout;

impl LayoutEngine for SvgLayout {
    fn place(
        &self,
        path: &Path,
        extents: &[GlyphExtent],
        run_extent: &Extent,
        alignment: Alignment,
        start_offset: f64,
    ) -> Result<Vec<Placement>, PathError> {
        let angles = path.angle_table();
        let length = path.length();
        let start = alignment_start(alignment, length, run_extent.width, start_offset);

        let mut placements = Vec::with_capacity(extents.len());
        for (cluster, extent) in extents.iter().enumerate() {
            let half_width = extent.width() / 2.0;
            let offset = start + extent.x() + half_width;
            if offset > length {
                debug!(placed = placements.len(), total = extents.len(), "text does not fit the path");
                break;
            }
            if offset <= 0.0 {
                trace!(cluster, offset, "cluster lands before the path start");
                continue;
            }

            let rotation = angles.angle_at(offset)?;
            let position = polar_offset(path.point_at(offset), rotation + PI, half_width);
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
