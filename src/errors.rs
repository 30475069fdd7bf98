//! Error types with diagnostic codes using miette
//!
//! Every fatal condition a text path can hit is a variant here; soft
//! conditions such as text overflowing the path are not errors.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Path Errors
// ============================================================================

/// Errors raised by path construction and path queries
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("a path needs at least two distinct points, got {count}")]
    #[diagnostic(code(textpath::path::too_few_points))]
    TooFewPoints { count: usize },

    #[error("path has zero length")]
    #[diagnostic(
        code(textpath::path::zero_length),
        help("consecutive duplicate points are dropped; make sure the path actually moves")
    )]
    ZeroLength,

    #[error("invalid coordinate: {0}")]
    #[diagnostic(code(textpath::path::non_finite))]
    NonFinite(#[from] NumericError),

    #[error("offset must not be negative, got {offset}")]
    #[diagnostic(code(textpath::path::negative_offset))]
    NegativeOffset { offset: f64 },

    #[error("path runs along the query circle")]
    #[diagnostic(
        code(textpath::path::circle_traces_path),
        help("the intersection is an arc rather than a set of points")
    )]
    CircleTracesPath,
}

// ============================================================================
// Shaping Errors
// ============================================================================

/// Errors raised while decomposing shaped text into clusters
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ShapingError {
    /// Recoverable: the split index does not fall between two clusters.
    #[error("index {index} is not a cluster boundary")]
    #[diagnostic(code(textpath::shaping::not_a_cluster_boundary))]
    NotAClusterBoundary { index: usize },

    #[error("shaping engine reported {extents} cluster extents for {runs} clusters")]
    #[diagnostic(
        code(textpath::shaping::cluster_count_mismatch),
        help("the run iterator and the cluster-extent iterator must advance in lockstep")
    )]
    ClusterCountMismatch { runs: usize, extents: usize },

    #[error("cluster extent starts at byte {found}, expected {expected}")]
    #[diagnostic(code(textpath::shaping::cluster_order_mismatch))]
    ClusterOrderMismatch { expected: usize, found: usize },
}

// ============================================================================
// Surface Errors
// ============================================================================

/// Errors raised while turning a recorded surface into a document
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("failed to serialize SVG: {message}")]
    #[diagnostic(code(textpath::surface::serialize))]
    Serialize { message: String },
}

// ============================================================================
// Text Path Errors
// ============================================================================

/// Errors raised by text path controllers
#[derive(Error, Diagnostic, Debug)]
pub enum TextPathError {
    #[error("text paths take a single line of text, got {lines} lines")]
    #[diagnostic(code(textpath::text_path::multi_line))]
    MultiLine { lines: usize },

    #[error("failed to offset path: no path remains at this distance")]
    #[diagnostic(
        code(textpath::text_path::offset_empty),
        help("the path probably folds back on itself within the vertical offset")
    )]
    OffsetEmpty,

    #[error("failed to offset path: it splits into {pieces} disconnected pieces")]
    #[diagnostic(
        code(textpath::text_path::offset_disconnected),
        help("the path probably self-intersects at this vertical offset")
    )]
    OffsetDisconnected { pieces: usize },

    #[error("failed to offset path: direction could not be established")]
    #[diagnostic(code(textpath::text_path::offset_direction_unknown))]
    OffsetDirectionUnknown,

    #[error("invalid {setting}: {source}")]
    #[diagnostic(code(textpath::text_path::invalid_setting))]
    InvalidSetting {
        setting: &'static str,
        source: NumericError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Shaping(#[from] ShapingError),

    #[error("surface failed to paint a cluster")]
    #[diagnostic(code(textpath::text_path::paint))]
    Paint {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
