use crate::clusters::LayoutClusters;
use crate::errors::TextPathError;
use crate::log::debug;
use crate::path::Path;
use crate::shaping::ShapedText;
use crate::surface::Surface;

use super::{Boundaries, TextOnPath, TextPath, TextPathOptions};

/// A [`TextPath`] that picks the side keeping the text upright.
///
/// Both the configured side and its opposite are laid out; the one whose
/// covered baseline runs further left to right wins. The choice is kept until
/// the options change.
#[derive(Clone, Debug)]
pub struct UprightTextPath<R> {
    path: Path,
    clusters: LayoutClusters<R>,
    options: TextPathOptions,
    selected: Option<(TextPathOptions, TextPath<R>)>,
}

impl<R: Clone> UprightTextPath<R> {
    pub fn new<T>(path: Path, shaped: &T) -> Result<Self, TextPathError>
    where
        T: ShapedText<Run = R>,
    {
        let lines = shaped.line_count();
        if lines > 1 {
            return Err(TextPathError::MultiLine { lines });
        }
        Ok(UprightTextPath {
            path,
            clusters: LayoutClusters::from_shaped(shaped)?,
            options: TextPathOptions::default(),
            selected: None,
        })
    }

    pub fn with_options(mut self, options: TextPathOptions) -> Result<Self, TextPathError> {
        self.set_options(options)?;
        Ok(self)
    }

    /// The controller all calls are delegated to under the current options.
    pub fn selected(&mut self) -> Result<&mut TextPath<R>, TextPathError> {
        let (options, text_path) = match self.selected.take() {
            Some((options, text_path)) if options == self.options => (options, text_path),
            _ => (self.options, self.select()?),
        };
        let (_, text_path) = self.selected.insert((options, text_path));
        Ok(text_path)
    }

    fn select(&self) -> Result<TextPath<R>, TextPathError> {
        let mut as_given = TextPath::from_clusters(self.path.clone(), self.clusters.clone(), self.options);
        let flipped_options = TextPathOptions {
            side: self.options.side.flipped(),
            ..self.options
        };
        let mut flipped = TextPath::from_clusters(self.path.clone(), self.clusters.clone(), flipped_options);

        let ltr_given = as_given.compute_baseline()?.map_or(0.0, |b| b.left_to_right_length());
        let ltr_flipped = flipped.compute_baseline()?.map_or(0.0, |b| b.left_to_right_length());
        let chosen = if ltr_given > ltr_flipped { as_given } else { flipped };
        debug!(ltr_given, ltr_flipped, side = %chosen.options().side, "selected upright side");
        Ok(chosen)
    }
}

impl<R: Clone> TextOnPath for UprightTextPath<R> {
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
        self.selected()?.text_fits()
    }

    fn compute_baseline(&mut self) -> Result<Option<Path>, TextPathError> {
        self.selected()?.compute_baseline()
    }

    fn compute_boundaries(&mut self) -> Result<Option<Boundaries>, TextPathError> {
        self.selected()?.compute_boundaries()
    }

    fn draw<S: Surface<R>>(&mut self, surface: &mut S) -> Result<(), TextPathError> {
        self.selected()?.draw(surface)
    }
}
