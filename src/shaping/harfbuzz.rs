//! Shaping strings with rustybuzz

use rustybuzz::{Direction, Face, UnicodeBuffer, shape};

use super::{GlyphLayout, GlyphLine, GlyphRun, ShapedGlyph};

impl GlyphLayout {
    /// Shape `text` as one left-to-right line using `face` at `font_size`.
    ///
    /// Glyph clusters are byte offsets into `text`. Line metrics come from the
    /// face's ascender and descender.
    pub fn shape(face: &Face<'_>, text: &str, font_size: f64) -> GlyphLayout {
        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(Direction::LeftToRight);
        let output = shape(face, &[], buffer);

        let scale = font_size / face.units_per_em() as f64;
        let glyphs: Vec<ShapedGlyph> = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster as usize,
                x_advance: pos.x_advance as f64 * scale,
                x_offset: pos.x_offset as f64 * scale,
                y_offset: pos.y_offset as f64 * scale,
            })
            .collect();

        let ascender = face.ascender() as f64 * scale;
        let descender = face.descender() as f64 * scale;
        let runs = if glyphs.is_empty() {
            Vec::new()
        } else {
            vec![GlyphRun {
                text_range: 0..text.len(),
                glyphs,
                font_size,
            }]
        };

        GlyphLayout::new(
            text,
            vec![GlyphLine {
                runs,
                y: 0.0,
                height: ascender - descender,
                baseline: ascender,
            }],
        )
    }
}
