use log::debug;
use rayon::prelude::*;

use crate::map::{BinaryEdgeMap, Grid, MagnitudeMap, MaxGradient};
use crate::params::EdgeParams;
use crate::sink::{emit, ImageSink, Stage};

/// Binarizes `magnitude` against `round(alpha * beta * max)`.
///
/// A pixel is an edge only when its magnitude is strictly above the cutoff. The result is
/// emitted to `sink` as [`Stage::ThresholdGradient`].
pub fn threshold_gradient(
    magnitude: &MagnitudeMap,
    max: MaxGradient,
    params: &EdgeParams,
    sink: &mut dyn ImageSink,
) -> BinaryEdgeMap {
    let cutoff = params.simple_cutoff(max);
    let edges = Grid::from_columns(
        magnitude
            .columns()
            .par_iter()
            .map(|col| col.iter().map(|&m| m > cutoff).collect())
            .collect(),
    );
    debug!("threshold cutoff {} (max gradient {})", cutoff, max.get());
    emit(sink, &edges.to_luma(), Stage::ThresholdGradient);
    edges
}
