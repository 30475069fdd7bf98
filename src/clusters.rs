//! Decompose shaped text into single-cluster runs
//!
//! Each run of the shaped text is split into one sub-run per cluster, and
//! every sub-run is paired with the logical extent the shaping engine reports
//! for that cluster. Both sequences are walked in one pass; any disagreement in
//! count or order is a broken shaping engine and fails extraction.
//!
//! Right-to-left text is not supported.

use crate::errors::ShapingError;
use crate::log::trace;
use crate::shaping::ShapedText;
use crate::types::{Extent, GlyphExtent};

/// One cluster: its own sub-run plus where it sits in the unbent line.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster<R> {
    pub run: R,
    pub extent: GlyphExtent,
}

/// The clusters of a shaped text, in logical order.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutClusters<R> {
    text: String,
    clusters: Vec<Cluster<R>>,
    logical_extent: Extent,
}

impl<R: Clone> LayoutClusters<R> {
    pub fn from_shaped<T>(shaped: &T) -> Result<Self, ShapingError>
    where
        T: ShapedText<Run = R>,
    {
        let mut extents = shaped.cluster_extents();
        let mut clusters: Vec<Cluster<R>> = Vec::new();

        for (run, baseline) in shaped.runs() {
            for piece in split_into_clusters(shaped, run)? {
                let Some((start, extent)) = extents.next() else {
                    return Err(ShapingError::ClusterCountMismatch {
                        runs: clusters.len() + 1,
                        extents: clusters.len(),
                    });
                };
                let expected = shaped.run_range(&piece).start;
                if start != expected {
                    return Err(ShapingError::ClusterOrderMismatch {
                        expected,
                        found: start,
                    });
                }
                clusters.push(Cluster {
                    run: piece,
                    extent: GlyphExtent { extent, baseline },
                });
            }
        }

        let leftover = extents.count();
        if leftover > 0 {
            return Err(ShapingError::ClusterCountMismatch {
                runs: clusters.len(),
                extents: clusters.len() + leftover,
            });
        }

        let logical_extent = clusters
            .iter()
            .map(|c| c.extent.extent)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        trace!(clusters = clusters.len(), width = logical_extent.width, "extracted clusters");

        Ok(LayoutClusters {
            text: shaped.text().to_owned(),
            clusters,
            logical_extent,
        })
    }
}

impl<R> LayoutClusters<R> {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clusters(&self) -> &[Cluster<R>] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Logical extent of every cluster, in order.
    pub fn logical_extents(&self) -> Vec<GlyphExtent> {
        self.clusters.iter().map(|c| c.extent).collect()
    }

    /// Bounding box of the whole shaped text.
    pub fn logical_extent(&self) -> Extent {
        self.logical_extent
    }
}

/// Split `run` into one run per cluster.
fn split_into_clusters<T: ShapedText>(shaped: &T, mut run: T::Run) -> Result<Vec<T::Run>, ShapingError> {
    let mut pieces = Vec::new();
    while let Some(first) = split_first_cluster(shaped, &mut run)? {
        pieces.push(first);
    }
    pieces.push(run);
    Ok(pieces)
}

/// Split off the first cluster of `run`, trying each byte index in turn.
///
/// Returns `None` once `run` holds a single cluster.
fn split_first_cluster<T: ShapedText>(shaped: &T, run: &mut T::Run) -> Result<Option<T::Run>, ShapingError> {
    let len = shaped.run_range(run).len();
    for index in 1..len {
        match shaped.split_run(run, index) {
            Ok(first) => return Ok(Some(first)),
            Err(ShapingError::NotAClusterBoundary { .. }) => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}
