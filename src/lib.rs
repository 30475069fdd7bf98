//! Lay out pre-shaped text along a polyline, in the manner of SVG `<textPath>`.
//!
//! The crate is organized into modules:
//! - `path`: the polyline, its angle table and distance queries
//! - `offset`: parallel offset curves for raising text off the path
//! - `shaping`: the shaped-text contract and a concrete glyph layout
//! - `clusters`: splitting shaped text into indivisible clusters
//! - `layout`: layout engines that place clusters along a path
//! - `surface`: drawing surfaces, including an SVG recorder
//! - `text_path`: controllers tying the above together
//!
//! ```
//! use textpath::{GlyphLayout, Path, SvgSurface, TextOnPath, TextPath};
//!
//! let path = Path::from_coords(&[(0.0, 50.0), (100.0, 0.0), (200.0, 50.0)])?;
//! let layout = GlyphLayout::monospace("Hello", 10.0, 20.0);
//! let mut text_path = TextPath::new(path, &layout)?;
//! assert!(text_path.text_fits()?);
//!
//! let mut surface = SvgSurface::new(200.0, 60.0);
//! text_path.draw(&mut surface)?;
//! assert_eq!(surface.nodes().len(), 5);
//! let svg = surface.finish()?;
//! assert!(svg.contains("matrix("));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod log;

pub mod clusters;
pub mod defaults;
pub mod errors;
pub mod geometry;
pub mod layout;
pub mod offset;
pub mod path;
pub mod shaping;
pub mod surface;
pub mod text_path;
pub mod types;

// Re-export commonly used items
pub use errors::{PathError, ShapingError, SurfaceError, TextPathError};
pub use layout::{ChordLayout, LayoutStrategy, SvgLayout};
pub use offset::{JoinStyle, OffsetOptions};
pub use path::Path;
pub use shaping::{GlyphLayout, GlyphRun, ShapedText};
pub use surface::{Surface, SvgSurface, TransformStack};
pub use text_path::{TextOnPath, TextPath, TextPathOptions, UprightTextPath};
pub use types::{Alignment, Side};
