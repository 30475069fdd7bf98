use crate::clusters::LayoutClusters;
use crate::errors::TextPathError;
use crate::geometry::polar_offset;
use crate::layout::{LayoutEngine, Placement};
use crate::log::debug;
use crate::offset::{DirectedOffset, OffsetCurve, offset_with_matching_direction};
use crate::path::Path;
use crate::shaping::ShapedText;
use crate::surface::{Surface, TransformScope};
use crate::types::Side;

use super::{Boundaries, PlacedGlyph, TextOnPath, TextPathOptions};

/// Text laid out along one side of a path, like SVG `<textPath>`.
///
/// Only single-line, left-to-right text is supported.
#[derive(Clone, Debug)]
pub struct TextPath<R> {
    path: Path,
    clusters: LayoutClusters<R>,
    options: TextPathOptions,
    prepared: Option<Prepared>,
}

/// Placements computed for one set of options.
#[derive(Clone, Debug)]
struct Prepared {
    options: TextPathOptions,
    path: Path,
    placements: Vec<Placement>,
}

impl<R: Clone> TextPath<R> {
    /// Decompose `shaped` into clusters for layout along `path`.
    ///
    /// Fails with [`TextPathError::MultiLine`] when the text spans more than
    /// one line.
    pub fn new<T>(path: Path, shaped: &T) -> Result<Self, TextPathError>
    where
        T: ShapedText<Run = R>,
    {
        let lines = shaped.line_count();
        if lines > 1 {
            return Err(TextPathError::MultiLine { lines });
        }
        let clusters = LayoutClusters::from_shaped(shaped)?;
        Ok(TextPath::from_clusters(path, clusters, TextPathOptions::default()))
    }
}

impl<R> TextPath<R> {
    pub(crate) fn from_clusters(path: Path, clusters: LayoutClusters<R>, options: TextPathOptions) -> Self {
        TextPath {
            path,
            clusters,
            options,
            prepared: None,
        }
    }

    pub fn with_options(mut self, options: TextPathOptions) -> Result<Self, TextPathError> {
        self.set_options(options)?;
        Ok(self)
    }

    /// The path as given, before side and offset adjustments.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn clusters(&self) -> &LayoutClusters<R> {
        &self.clusters
    }

    /// The path the text is actually laid along.
    pub fn effective_path(&mut self) -> Result<&Path, TextPathError> {
        let prepared = Self::prepared(&self.path, &self.clusters, &self.options, &mut self.prepared)?;
        Ok(&prepared.path)
    }

    /// Every placed cluster, in order.
    pub fn placed_glyphs(&mut self) -> Result<Vec<PlacedGlyph<'_, R>>, TextPathError> {
        let prepared = Self::prepared(&self.path, &self.clusters, &self.options, &mut self.prepared)?;
        let clusters = self.clusters.clusters();
        Ok(prepared
            .placements
            .iter()
            .filter_map(|p| {
                clusters.get(p.cluster).map(|cluster| PlacedGlyph {
                    run: &cluster.run,
                    position: p.position,
                    rotation: p.rotation,
                    extent: p.extent,
                })
            })
            .collect())
    }

    /// Placements for the current options, recomputed only when they changed.
    fn prepared<'a>(
        path: &Path,
        clusters: &LayoutClusters<R>,
        options: &TextPathOptions,
        slot: &'a mut Option<Prepared>,
    ) -> Result<&'a Prepared, TextPathError> {
        let prepared = match slot.take() {
            Some(prepared) if prepared.options == *options => prepared,
            _ => {
                let path = effective_path(path, options)?;
                let placements = options.layout.place(
                    &path,
                    &clusters.logical_extents(),
                    &clusters.logical_extent(),
                    options.alignment,
                    options.start_offset,
                )?;
                debug!(placed = placements.len(), clusters = clusters.len(), "laid out text path");
                Prepared {
                    options: *options,
                    path,
                    placements,
                }
            }
        };
        Ok(slot.insert(prepared))
    }

    fn prepare(&mut self) -> Result<&Prepared, TextPathError> {
        Self::prepared(&self.path, &self.clusters, &self.options, &mut self.prepared)
    }
}

/// Reverse for the right side, then move off the path by the vertical offset.
fn effective_path(path: &Path, options: &TextPathOptions) -> Result<Path, TextPathError> {
    let path = match options.side {
        Side::Left => path.clone(),
        Side::Right => path.reverse(),
    };
    if options.vertical_offset == 0.0 {
        return Ok(path);
    }

    debug!(vertical_offset = options.vertical_offset, side = %options.side, "offsetting text path");
    confirmed_offset(offset_with_matching_direction(
        &path,
        options.vertical_offset,
        Side::Left,
        &options.offset,
    ))
}

/// Accept only a single offset path whose direction was confirmed.
fn confirmed_offset(directed: DirectedOffset) -> Result<Path, TextPathError> {
    match directed.curve {
        OffsetCurve::Empty => Err(TextPathError::OffsetEmpty),
        OffsetCurve::Multi(pieces) => Err(TextPathError::OffsetDisconnected { pieces: pieces.len() }),
        OffsetCurve::Single(offset) if directed.direction_confirmed => Ok(offset),
        OffsetCurve::Single(_) => Err(TextPathError::OffsetDirectionUnknown),
    }
}

impl<R> TextOnPath for TextPath<R> {
    type Run = R;

    fn options(&self) -> &TextPathOptions {
        &self.options
    }

    fn set_options(&mut self, options: TextPathOptions) -> Result<(), TextPathError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    fn text_fits(&mut self) -> Result<bool, TextPathError> {
        let total = self.clusters.len();
        Ok(self.prepare()?.placements.len() == total)
    }

    fn compute_baseline(&mut self) -> Result<Option<Path>, TextPathError> {
        let prepared = self.prepare()?;
        let (Some(first), Some(last)) = (prepared.placements.first(), prepared.placements.last()) else {
            return Ok(None);
        };
        let start = prepared.path.project(first.position);
        let trailing_edge = polar_offset(last.position, last.rotation, last.extent.width());
        let end = prepared.path.project(trailing_edge);
        Ok(prepared.path.substring(start, Some(end)))
    }

    fn compute_boundaries(&mut self) -> Result<Option<Boundaries>, TextPathError> {
        // TODO: union the rotated logical rectangles of the placed clusters
        self.prepare()?;
        Ok(None)
    }

    fn draw<S: Surface<R>>(&mut self, surface: &mut S) -> Result<(), TextPathError> {
        let prepared = Self::prepared(&self.path, &self.clusters, &self.options, &mut self.prepared)?;
        let text = self.clusters.text();
        for placement in &prepared.placements {
            let Some(cluster) = self.clusters.clusters().get(placement.cluster) else {
                continue;
            };
            let mut scope = TransformScope::new(&mut *surface);
            scope.translate(placement.position);
            scope.rotate(placement.rotation);
            scope
                .paint_run(text, &cluster.run)
                .map_err(|err| TextPathError::Paint { source: Box::new(err) })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use facet_svg::SvgNode;
    use glam::{DAffine2, DVec2, dvec2};

    use super::*;
    use crate::errors::ShapingError;
    use crate::layout::{ChordLayout, LayoutStrategy};
    use crate::offset::OffsetOptions;
    use crate::shaping::{GlyphLayout, GlyphRun};
    use crate::surface::{SvgSurface, TransformStack};
    use crate::types::Alignment;

    const TEXT: &str = "Hi from Παν語";

    fn text_path(coords: &[(f64, f64)], text: &str) -> TextPath<GlyphRun> {
        let path = Path::from_coords(coords).unwrap();
        TextPath::new(path, &GlyphLayout::monospace(text, 10.0, 20.0)).unwrap()
    }

    fn assert_close(a: DVec2, b: DVec2) {
        assert!((a - b).length() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn multi_line_text_is_rejected() {
        let path = Path::from_coords(&[(0.0, 0.0), (100.0, 0.0)]).unwrap();
        let result = TextPath::new(path, &GlyphLayout::monospace("one\ntwo", 10.0, 20.0));
        assert!(matches!(result, Err(TextPathError::MultiLine { lines: 2 })));
    }

    #[test]
    fn fits_on_long_path_only() {
        assert!(text_path(&[(0.0, 0.0), (600.0, 0.0)], TEXT).text_fits().unwrap());
        assert!(!text_path(&[(0.0, 0.0), (50.0, 0.0)], TEXT).text_fits().unwrap());
    }

    #[test]
    fn centered_text_starts_at_half_the_slack() {
        let mut tp = text_path(&[(0.0, 0.0), (200.0, 0.0)], TEXT);
        tp.set_alignment(Alignment::Center).unwrap();
        let glyphs = tp.placed_glyphs().unwrap();
        assert_eq!(glyphs.len(), 12);
        assert_close(glyphs[0].position, dvec2(40.0, 0.0));
    }

    #[test]
    fn centered_text_on_short_path_matches_left() {
        let mut centered = text_path(&[(0.0, 0.0), (50.0, 0.0)], TEXT);
        centered.set_alignment(Alignment::Center).unwrap();
        let mut left = text_path(&[(0.0, 0.0), (50.0, 0.0)], TEXT);
        let centered: Vec<_> = centered.placed_glyphs().unwrap().iter().map(|g| g.position).collect();
        let left: Vec<_> = left.placed_glyphs().unwrap().iter().map(|g| g.position).collect();
        assert_eq!(centered, left);
    }

    #[test]
    fn right_side_reads_from_the_far_end() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab");
        tp.set_side(Side::Right).unwrap();
        assert_eq!(tp.effective_path().unwrap().start(), dvec2(100.0, 0.0));
        let glyphs = tp.placed_glyphs().unwrap();
        assert_close(glyphs[0].position, dvec2(100.0, 0.0));
    }

    #[test]
    fn vertical_offset_raises_the_text() {
        let mut tp = text_path(&[(0.0, 50.0), (100.0, 50.0)], "ab");
        tp.set_vertical_offset(10.0).unwrap();
        let path = tp.effective_path().unwrap();
        assert_eq!(path.points(), &[dvec2(0.0, 40.0), dvec2(100.0, 40.0)]);
    }

    #[test]
    fn vertical_offset_on_right_side_lowers_the_text() {
        let mut tp = text_path(&[(0.0, 50.0), (100.0, 50.0)], "ab");
        tp.set_side(Side::Right).unwrap();
        tp.set_vertical_offset(10.0).unwrap();
        let path = tp.effective_path().unwrap();
        assert_eq!(path.points(), &[dvec2(100.0, 60.0), dvec2(0.0, 60.0)]);
    }

    #[test]
    fn folded_path_cannot_be_offset() {
        let mut tp = text_path(&[(0.0, 0.0), (20.0, 0.0), (20.0, 5.0), (0.0, 5.0)], "ab");
        tp.set_side(Side::Right).unwrap();
        tp.set_vertical_offset(10.0).unwrap();
        assert!(matches!(tp.text_fits(), Err(TextPathError::OffsetEmpty)));
        // Still failing on the next call
        assert!(matches!(tp.compute_baseline(), Err(TextPathError::OffsetEmpty)));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab");
        assert!(matches!(
            tp.set_start_offset(f64::NAN),
            Err(TextPathError::InvalidSetting { setting: "start offset", .. })
        ));
        assert!(matches!(
            tp.set_vertical_offset(f64::INFINITY),
            Err(TextPathError::InvalidSetting { setting: "vertical offset", .. })
        ));
        assert_eq!(tp.options().start_offset, 0.0);
    }

    #[test]
    fn placements_follow_option_changes() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab");
        assert_close(tp.placed_glyphs().unwrap()[0].position, dvec2(0.0, 0.0));
        tp.set_start_offset(20.0).unwrap();
        assert_close(tp.placed_glyphs().unwrap()[0].position, dvec2(20.0, 0.0));
        tp.set_layout(LayoutStrategy::Chord(ChordLayout)).unwrap();
        assert_close(tp.placed_glyphs().unwrap()[1].position, dvec2(30.0, 0.0));
    }

    #[test]
    fn baseline_covers_placed_text() {
        let mut tp = text_path(&[(0.0, 10.0), (50.0, 20.0), (100.0, 10.0)], "abcd");
        tp.set_alignment(Alignment::Center).unwrap();
        let baseline = tp.compute_baseline().unwrap().unwrap();
        assert!(baseline.length() > 0.0);
        assert!(baseline.length() < tp.path().length());
    }

    #[test]
    fn baseline_of_straight_text() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "abc");
        tp.set_start_offset(10.0).unwrap();
        let baseline = tp.compute_baseline().unwrap().unwrap();
        assert_close(baseline.start(), dvec2(10.0, 0.0));
        assert_close(baseline.end(), dvec2(40.0, 0.0));
    }

    #[test]
    fn nothing_placed_means_no_baseline() {
        let mut tp = text_path(&[(0.0, 0.0), (1.0, 0.0)], "abc");
        assert!(tp.compute_baseline().unwrap().is_none());
        assert!(!tp.text_fits().unwrap());
    }

    #[test]
    fn boundaries_are_not_computed() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "abc");
        assert!(tp.compute_boundaries().unwrap().is_none());
    }

    #[test]
    fn draw_paints_each_cluster() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab");
        let mut surface = SvgSurface::new(100.0, 20.0);
        tp.draw(&mut surface).unwrap();
        assert_eq!(surface.depth(), 0);
        let painted: Vec<String> = surface
            .nodes()
            .iter()
            .filter_map(|node| match node {
                SvgNode::Text(text) => Some(format!("{:?} {}", text.transform, text.content.as_deref().unwrap_or(""))),
                _ => None,
            })
            .collect();
        insta::assert_snapshot!(painted.join("\n"), @r#"
        Some("matrix(1 0 0 1 0 0)") a
        Some("matrix(1 0 0 1 10 0)") b
        "#);
    }

    #[test]
    fn options_are_validated_as_a_whole() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab");
        let nan_start = TextPathOptions {
            start_offset: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tp.set_options(nan_start),
            Err(TextPathError::InvalidSetting { setting: "start offset", .. })
        ));
        assert_eq!(tp.options(), &TextPathOptions::default());
        assert_close(tp.placed_glyphs().unwrap()[0].position, dvec2(0.0, 0.0));

        let negative_mitre = TextPathOptions {
            offset: OffsetOptions {
                mitre_limit: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab").with_options(negative_mitre);
        assert!(matches!(
            result,
            Err(TextPathError::InvalidSetting { setting: "mitre limit", .. })
        ));
    }

    #[test]
    fn with_options_applies_valid_options() {
        let options = TextPathOptions {
            start_offset: 20.0,
            ..Default::default()
        };
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "ab").with_options(options).unwrap();
        assert_close(tp.placed_glyphs().unwrap()[0].position, dvec2(20.0, 0.0));
    }

    #[test]
    fn only_a_confirmed_single_offset_is_accepted() {
        let offset = Path::from_coords(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
        let directed = |curve, direction_confirmed| DirectedOffset {
            curve,
            direction_confirmed,
        };

        let accepted = confirmed_offset(directed(OffsetCurve::Single(offset.clone()), true));
        assert_eq!(accepted.unwrap(), offset);
        assert!(matches!(
            confirmed_offset(directed(OffsetCurve::Single(offset.clone()), false)),
            Err(TextPathError::OffsetDirectionUnknown)
        ));
        assert!(matches!(
            confirmed_offset(directed(OffsetCurve::Multi(vec![offset.clone(), offset]), false)),
            Err(TextPathError::OffsetDisconnected { pieces: 2 })
        ));
        assert!(matches!(
            confirmed_offset(directed(OffsetCurve::Empty, false)),
            Err(TextPathError::OffsetEmpty)
        ));
    }

    #[test]
    fn pinched_path_reports_disconnected_offset() {
        let mut tp = text_path(
            &[(0.0, 0.0), (100.0, 0.0), (100.0, 30.0), (50.0, 30.0), (50.0, 4.0), (40.0, 4.0), (40.0, 40.0)],
            "ab",
        );
        tp.set_vertical_offset(-5.0).unwrap();
        assert!(matches!(tp.text_fits(), Err(TextPathError::OffsetDisconnected { .. })));
    }

    #[test]
    fn smooth_curve_takes_a_small_offset_on_either_side() {
        let wave: Vec<(f64, f64)> = (0..=100)
            .map(|i| {
                let x = 0.94 * i as f64;
                (x, 50.0 + 20.0 * (std::f64::consts::TAU * x / 94.0).sin())
            })
            .collect();
        for side in [Side::Left, Side::Right] {
            let mut tp = text_path(&wave, "Hello");
            tp.set_side(side).unwrap();
            tp.set_vertical_offset(3.0).unwrap();
            assert!(tp.text_fits().unwrap(), "{side}");
        }
    }

    /// Records transforms and fails on the second paint.
    #[derive(Default)]
    struct FlakySurface {
        depth: usize,
        painted: usize,
        transform: DAffine2,
    }

    impl TransformStack for FlakySurface {
        fn save(&mut self) {
            self.depth += 1;
        }

        fn restore(&mut self) {
            self.depth -= 1;
        }

        fn translate(&mut self, offset: DVec2) {
            self.transform = self.transform * DAffine2::from_translation(offset);
        }

        fn rotate(&mut self, angle: f64) {
            self.transform = self.transform * DAffine2::from_angle(angle);
        }
    }

    impl Surface<GlyphRun> for FlakySurface {
        type Error = ShapingError;

        fn paint_run(&mut self, _text: &str, _run: &GlyphRun) -> Result<(), ShapingError> {
            self.painted += 1;
            if self.painted == 2 {
                return Err(ShapingError::NotAClusterBoundary { index: 0 });
            }
            Ok(())
        }
    }

    #[test]
    fn failed_paint_still_restores_transform() {
        let mut tp = text_path(&[(0.0, 0.0), (100.0, 0.0)], "abc");
        let mut surface = FlakySurface::default();
        let result = tp.draw(&mut surface);
        assert!(matches!(result, Err(TextPathError::Paint { .. })));
        assert_eq!(surface.painted, 2);
        assert_eq!(surface.depth, 0);
    }
}
