//! In-memory glyph layout

use std::ops::Range;

use super::ShapedText;
use crate::errors::ShapingError;
use crate::types::Extent;

/// One positioned glyph, already scaled to layout units.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    /// Byte index of the first character of the glyph's cluster
    pub cluster: usize,
    pub x_advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// A run of glyphs sharing one font, covering `text_range` of the layout text.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    pub text_range: Range<usize>,
    pub glyphs: Vec<ShapedGlyph>,
    pub font_size: f64,
}

impl GlyphRun {
    /// Sum of all advances.
    pub fn width(&self) -> f64 {
        self.glyphs.iter().map(|g| g.x_advance).sum()
    }

    /// The slice of `text` this run covers.
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.text_range.clone()).unwrap_or_default()
    }

    /// Start byte and total advance of each cluster, in glyph order.
    pub fn clusters(&self) -> Vec<(usize, f64)> {
        let mut clusters: Vec<(usize, f64)> = Vec::new();
        for glyph in &self.glyphs {
            match clusters.last_mut() {
                Some((start, advance)) if *start == glyph.cluster => *advance += glyph.x_advance,
                _ => clusters.push((glyph.cluster, glyph.x_advance)),
            }
        }
        clusters
    }

    /// Split off the glyphs before byte `index` (relative to the run start).
    ///
    /// `self` keeps the remainder.
    pub fn split_at(&mut self, index: usize) -> Result<GlyphRun, ShapingError> {
        let at = self.text_range.start + index;
        let on_boundary = index > 0
            && at < self.text_range.end
            && self.glyphs.iter().any(|g| g.cluster == at);
        if !on_boundary {
            return Err(ShapingError::NotAClusterBoundary { index });
        }

        let split = self
            .glyphs
            .iter()
            .position(|g| g.cluster >= at)
            .unwrap_or(self.glyphs.len());
        let rest = self.glyphs.split_off(split);
        let head = std::mem::replace(&mut self.glyphs, rest);

        let first = GlyphRun {
            text_range: self.text_range.start..at,
            glyphs: head,
            font_size: self.font_size,
        };
        self.text_range.start = at;
        Ok(first)
    }
}

/// One line of a [`GlyphLayout`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GlyphLine {
    pub runs: Vec<GlyphRun>,
    /// Top of the line
    pub y: f64,
    pub height: f64,
    /// Baseline position measured from the top of the layout
    pub baseline: f64,
}

/// Text plus the glyphs a shaping engine produced for it.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GlyphLayout {
    text: String,
    lines: Vec<GlyphLine>,
}

impl GlyphLayout {
    pub fn new(text: impl Into<String>, lines: Vec<GlyphLine>) -> Self {
        GlyphLayout {
            text: text.into(),
            lines,
        }
    }

    /// One glyph per character with a fixed advance, one line per `\n`.
    ///
    /// The baseline sits at 80% of the line height.
    pub fn monospace(text: &str, advance: f64, line_height: f64) -> Self {
        let mut lines = Vec::new();
        let mut line_start = 0;
        for (i, line_text) in text.split('\n').enumerate() {
            let glyphs: Vec<ShapedGlyph> = line_text
                .char_indices()
                .map(|(byte, ch)| ShapedGlyph {
                    glyph_id: ch as u32,
                    cluster: line_start + byte,
                    x_advance: advance,
                    x_offset: 0.0,
                    y_offset: 0.0,
                })
                .collect();
            let runs = if glyphs.is_empty() {
                Vec::new()
            } else {
                vec![GlyphRun {
                    text_range: line_start..line_start + line_text.len(),
                    glyphs,
                    font_size: line_height,
                }]
            };
            let y = i as f64 * line_height;
            lines.push(GlyphLine {
                runs,
                y,
                height: line_height,
                baseline: y + line_height * 0.8,
            });
            line_start += line_text.len() + 1;
        }
        GlyphLayout::new(text, lines)
    }

    pub fn lines(&self) -> &[GlyphLine] {
        &self.lines
    }
}

impl ShapedText for GlyphLayout {
    type Run = GlyphRun;

    fn text(&self) -> &str {
        &self.text
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn runs(&self) -> impl Iterator<Item = (GlyphRun, f64)> + '_ {
        self.lines
            .iter()
            .flat_map(|line| line.runs.iter().map(move |run| (run.clone(), line.baseline)))
    }

    fn cluster_extents(&self) -> impl Iterator<Item = (usize, Extent)> + '_ {
        let mut extents = Vec::new();
        for line in &self.lines {
            let mut x = 0.0;
            for run in &line.runs {
                for (start, advance) in run.clusters() {
                    extents.push((start, Extent::new(x, line.y, advance, line.height)));
                    x += advance;
                }
            }
        }
        extents.into_iter()
    }

    fn run_range(&self, run: &GlyphRun) -> Range<usize> {
        run.text_range.clone()
    }

    fn split_run(&self, run: &mut GlyphRun, index: usize) -> Result<GlyphRun, ShapingError> {
        run.split_at(index)
    }
}
