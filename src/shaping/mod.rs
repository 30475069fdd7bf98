//! Shaped text as consumed by text paths.
//!
//! Font selection, shaping and line breaking happen elsewhere. A text path
//! only needs the [`ShapedText`] view of the result: the runs of one line, the
//! logical extent of each cluster, and a way to split a run between clusters.
//!
//! [`GlyphLayout`] is a plain in-memory implementation holding glyphs that
//! were shaped ahead of time. With the `rustybuzz` feature it can also shape
//! a string itself.

mod glyphs;
#[cfg(feature = "rustybuzz")]
mod harfbuzz;

pub use glyphs::{GlyphLayout, GlyphLine, GlyphRun, ShapedGlyph};

use std::ops::Range;

use crate::errors::ShapingError;
use crate::types::Extent;

/// Read access to a shaped, laid-out piece of text.
///
/// Byte indices refer to [`ShapedText::text`]. Runs and cluster extents must
/// come out in the same logical order.
pub trait ShapedText {
    /// A shaped run, opaque to layout and handed back to the drawing surface
    type Run: Clone;

    fn text(&self) -> &str;

    fn line_count(&self) -> usize;

    /// Every run paired with the baseline of the line it sits on, measured
    /// from the top of the layout.
    fn runs(&self) -> impl Iterator<Item = (Self::Run, f64)> + '_;

    /// Start byte and logical extent of every cluster, in run order.
    fn cluster_extents(&self) -> impl Iterator<Item = (usize, Extent)> + '_;

    /// Byte range of the text covered by `run`.
    fn run_range(&self, run: &Self::Run) -> Range<usize>;

    /// Split `run` at `index` bytes from its start.
    ///
    /// Returns the leading part and leaves the remainder in `run`. Fails with
    /// [`ShapingError::NotAClusterBoundary`] when `index` falls inside a
    /// cluster; callers may retry at another index.
    fn split_run(&self, run: &mut Self::Run, index: usize) -> Result<Self::Run, ShapingError>;
}
