//! Layout engines map cluster extents onto a path.
//!
//! An engine turns the flat, left-to-right logical extents of a line of
//! clusters into anchor points and rotations along a [`Path`]. Engines are
//! strategy values collected in [`LayoutStrategy`] and dispatched statically.
//!
//! Every engine shares two behaviours:
//!
//! - text that runs past the end of the path is cut off from the first
//!   cluster that does not fit;
//! - clusters that land before the start of the path are skipped one by
//!   one while later clusters are still placed.

mod chord;
mod svg;

pub use chord::ChordLayout;
pub use svg::SvgLayout;

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::errors::PathError;
use crate::path::Path;
use crate::types::{Alignment, Extent, GlyphExtent};

/// Where one cluster ends up on the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Index into the cluster list handed to the engine
    pub cluster: usize,
    /// Drawing origin of the cluster
    pub position: DVec2,
    /// Rotation in radians
    pub rotation: f64,
    /// The cluster's logical extent before bending
    pub extent: GlyphExtent,
}

#[enum_dispatch]
pub trait LayoutEngine {
    /// Place clusters with the given logical extents along `path`.
    ///
    /// `run_extent` is the logical extent of the whole line and drives the
    /// alignment. Placements come back in cluster order; clusters that were
    /// skipped or cut off are absent.
    fn place(
        &self,
        path: &Path,
        extents: &[GlyphExtent],
        run_extent: &Extent,
        alignment: Alignment,
        start_offset: f64,
    ) -> Result<Vec<Placement>, PathError>;
}

/// The available layout engines.
#[enum_dispatch(LayoutEngine)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutStrategy {
    /// Midpoint of each cluster on the path, like SVG `<textPath>`
    Svg(SvgLayout),
    /// Leading edge on the path, advancing by chord length
    Chord(ChordLayout),
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        LayoutStrategy::Svg(SvgLayout)
    }
}

/// Offset along the path where the line starts.
///
/// Center and right alignment fall back to left alignment when the line is
/// wider than the path.
pub fn alignment_start(alignment: Alignment, path_length: f64, run_width: f64, start_offset: f64) -> f64 {
    match alignment {
        Alignment::Center if run_width <= path_length => (path_length - run_width) / 2.0 + start_offset,
        Alignment::Right if run_width <= path_length => path_length - run_width + start_offset,
        _ => start_offset,
    }
}
