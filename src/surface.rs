//! Drawing surfaces for placed text.
//!
//! A surface keeps a stack of transforms and can paint a shaped run at the
//! origin of its current transform. [`TransformScope`] pairs every `save`
//! with a `restore`, including when painting fails part way.

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};

use facet_svg::facet_xml::SerializeOptions;
use facet_svg::{Points, Polyline, Svg, SvgNode, Text, facet_xml};
use glam::{DAffine2, DVec2};

use crate::errors::SurfaceError;
use crate::log::warn;
use crate::path::Path;
use crate::shaping::GlyphRun;

/// Save/restore transform stack with translate and rotate.
pub trait TransformStack {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: DVec2);
    /// Rotate by `angle` radians, clockwise on screen (y grows downward).
    fn rotate(&mut self, angle: f64);
}

/// A transform stack that can paint runs of type `R`.
pub trait Surface<R>: TransformStack {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Paint `run` (a slice of `text`) with its origin at the current transform.
    fn paint_run(&mut self, text: &str, run: &R) -> Result<(), Self::Error>;
}

/// Saves the surface transform on creation and restores it on drop.
pub struct TransformScope<'s, S: TransformStack + ?Sized> {
    surface: &'s mut S,
}

impl<'s, S: TransformStack + ?Sized> TransformScope<'s, S> {
    pub fn new(surface: &'s mut S) -> Self {
        surface.save();
        TransformScope { surface }
    }
}

impl<S: TransformStack + ?Sized> Deref for TransformScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: TransformStack + ?Sized> DerefMut for TransformScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: TransformStack + ?Sized> Drop for TransformScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Records painted runs as SVG `<text>` elements.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    current: DAffine2,
    saved: Vec<DAffine2>,
    nodes: Vec<SvgNode>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        SvgSurface {
            width,
            height,
            current: DAffine2::IDENTITY,
            saved: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// The transform new elements are drawn with.
    pub fn transform(&self) -> DAffine2 {
        self.current
    }

    /// Number of saved transforms not yet restored.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Elements recorded so far, in paint order.
    pub fn nodes(&self) -> &[SvgNode] {
        &self.nodes
    }

    /// Draw `path` as an unfilled polyline in untransformed coordinates.
    pub fn stroke_path(&mut self, path: &Path, color: &str) {
        let points = path.points().iter().fold(Points::new(), |points, p| points.push(p.x, p.y));
        self.nodes.push(SvgNode::Polyline(Polyline {
            points,
            fill: Some("none".to_string()),
            stroke: Some(color.to_string()),
            ..Default::default()
        }));
    }

    /// The recorded elements as an SVG document tree.
    pub fn document(&self) -> Svg {
        Svg {
            width: Some(fmt_num(self.width)),
            height: Some(fmt_num(self.height)),
            view_box: Some(format!("0 0 {} {}", fmt_num(self.width), fmt_num(self.height))),
            children: self.nodes.clone(),
        }
    }

    /// Serialize the complete SVG document.
    pub fn finish(self) -> Result<String, SurfaceError> {
        fn format_float(value: f64, writer: &mut dyn std::io::Write) -> Result<(), std::io::Error> {
            write!(writer, "{}", fmt_num(value))
        }

        let options = SerializeOptions {
            float_formatter: Some(format_float),
            ..Default::default()
        };
        facet_xml::to_string_with_options(&self.document(), &options).map_err(|e| SurfaceError::Serialize {
            message: e.to_string(),
        })
    }
}

impl TransformStack for SvgSurface {
    fn save(&mut self) {
        self.saved.push(self.current);
    }

    fn restore(&mut self) {
        match self.saved.pop() {
            Some(transform) => self.current = transform,
            None => {
                warn!("restore without a matching save");
            }
        }
    }

    fn translate(&mut self, offset: DVec2) {
        self.current = self.current * DAffine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f64) {
        self.current = self.current * DAffine2::from_angle(angle);
    }
}

impl Surface<GlyphRun> for SvgSurface {
    type Error = Infallible;

    fn paint_run(&mut self, text: &str, run: &GlyphRun) -> Result<(), Infallible> {
        let m = self.current;
        let transform = format!(
            "matrix({} {} {} {} {} {})",
            fmt_num(m.matrix2.x_axis.x),
            fmt_num(m.matrix2.x_axis.y),
            fmt_num(m.matrix2.y_axis.x),
            fmt_num(m.matrix2.y_axis.y),
            fmt_num(m.translation.x),
            fmt_num(m.translation.y),
        );
        self.nodes.push(SvgNode::Text(Text {
            transform: Some(transform),
            font_size: Some(fmt_num(run.font_size)),
            content: Some(run.text(text).to_string()),
            ..Default::default()
        }));
        Ok(())
    }
}

/// Format a number rounded to three decimals, without a trailing `.0` or a
/// negative zero.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}
