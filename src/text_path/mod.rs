//! Text path controllers.
//!
//! A controller owns a path and the clusters of one shaped line, plus a set of
//! [`TextPathOptions`]. Placements are computed on first use and reused until
//! the options change.
//!
//! - [`TextPath`] lays the text out on the chosen side of the path.
//! - [`UprightTextPath`] tries both sides and keeps the one that reads left
//!   to right, so text never ends up upside down.

mod controller;
mod upright;

pub use controller::TextPath;
pub use upright::UprightTextPath;

use glam::DVec2;

use crate::errors::TextPathError;
use crate::layout::LayoutStrategy;
use crate::offset::OffsetOptions;
use crate::path::Path;
use crate::surface::Surface;
use crate::types::{Alignment, GlyphExtent, NumericError, Side, check_finite, check_non_negative};

/// Everything that shapes the placement of text on a path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextPathOptions {
    pub alignment: Alignment,
    /// Extra distance along the path before the text starts
    pub start_offset: f64,
    /// Distance to raise the text off the path, towards the text's left
    pub vertical_offset: f64,
    pub side: Side,
    pub layout: LayoutStrategy,
    /// Join handling when `vertical_offset` is non-zero
    pub offset: OffsetOptions,
}

impl TextPathOptions {
    /// Reject non-finite offsets and a negative or non-finite mitre limit.
    pub fn validate(&self) -> Result<(), TextPathError> {
        check_finite(self.start_offset).map_err(invalid("start offset"))?;
        check_finite(self.vertical_offset).map_err(invalid("vertical offset"))?;
        check_non_negative(self.offset.mitre_limit).map_err(invalid("mitre limit"))?;
        Ok(())
    }
}

fn invalid(setting: &'static str) -> impl FnOnce(NumericError) -> TextPathError {
    move |source| TextPathError::InvalidSetting { setting, source }
}

/// A cluster as it ends up on the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph<'a, R> {
    pub run: &'a R,
    pub position: DVec2,
    pub rotation: f64,
    pub extent: GlyphExtent,
}

/// Outline polygons covering the drawn text.
pub type Boundaries = Vec<Vec<DVec2>>;

/// Operations shared by all text path controllers.
pub trait TextOnPath {
    /// Run type of the shaped text
    type Run;

    fn options(&self) -> &TextPathOptions;

    /// Replace all options. Placements are recomputed on next use.
    ///
    /// Invalid options are rejected and the current ones kept; every setter
    /// below goes through here.
    fn set_options(&mut self, options: TextPathOptions) -> Result<(), TextPathError>;

    /// Whether every cluster was placed.
    fn text_fits(&mut self) -> Result<bool, TextPathError>;

    /// The stretch of the path actually covered by placed text.
    ///
    /// `None` when nothing could be placed.
    fn compute_baseline(&mut self) -> Result<Option<Path>, TextPathError>;

    /// Reserved for the outline of the placed text; currently always `None`.
    fn compute_boundaries(&mut self) -> Result<Option<Boundaries>, TextPathError>;

    /// Paint every placed cluster onto `surface`.
    ///
    /// Each cluster is painted inside its own saved transform, which is
    /// restored even when painting fails.
    fn draw<S: Surface<Self::Run>>(&mut self, surface: &mut S) -> Result<(), TextPathError>;

    fn set_alignment(&mut self, alignment: Alignment) -> Result<(), TextPathError> {
        self.set_options(TextPathOptions {
            alignment,
            ..*self.options()
        })
    }

    fn set_side(&mut self, side: Side) -> Result<(), TextPathError> {
        self.set_options(TextPathOptions { side, ..*self.options() })
    }

    fn set_layout(&mut self, layout: LayoutStrategy) -> Result<(), TextPathError> {
        self.set_options(TextPathOptions {
            layout,
            ..*self.options()
        })
    }

    fn set_start_offset(&mut self, start_offset: f64) -> Result<(), TextPathError> {
        self.set_options(TextPathOptions {
            start_offset,
            ..*self.options()
        })
    }

    fn set_vertical_offset(&mut self, vertical_offset: f64) -> Result<(), TextPathError> {
        self.set_options(TextPathOptions {
            vertical_offset,
            ..*self.options()
        })
    }

    fn set_offset_options(&mut self, offset: OffsetOptions) -> Result<(), TextPathError> {
        self.set_options(TextPathOptions {
            offset,
            ..*self.options()
        })
    }
}
