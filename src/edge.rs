use image::GrayImage;
use log::debug;

use crate::error::Result;
use crate::gradient::{compute_gradient, compute_gradient_with_angle};
use crate::hysteresis::{hysteresis_threshold, HysteresisMode};
use crate::kernel::Kernel;
use crate::map::BinaryEdgeMap;
use crate::params::EdgeParams;
use crate::sink::{ImageSink, NullSink};
use crate::suppression::{non_max_suppression, BucketRule};
use crate::threshold::threshold_gradient;

/// Knobs of the Canny-style pipeline. The default reproduces historical output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CannyOptions {
    /// Direction quantization used by non-maximum suppression.
    pub bucket_rule: BucketRule,
    /// Weak pixel resolution used by hysteresis.
    pub hysteresis: HysteresisMode,
}

/// Computes an edge map by thresholding gradient magnitudes.
///
/// `alpha` and `beta` must lie in [0, 1]; a pixel is an edge when its magnitude exceeds
/// `round(alpha * beta * max_magnitude)`.
///
/// ```
/// use gradient_edges::{threshold_gradient_edges, Kernel, PRESET_ALPHA, PRESET_BETA};
///
/// let image = image::GrayImage::from_fn(8, 8, |x, _| image::Luma([if x < 4 { 10 } else { 90 }]));
/// let edges = threshold_gradient_edges(&image, &Kernel::SOBEL, PRESET_ALPHA, PRESET_BETA)
///     .expect("valid input");
/// assert!(edges[(3, 4)]);
/// assert!(!edges[(6, 4)]);
/// ```
pub fn threshold_gradient_edges(
    image: &GrayImage,
    kernel: &Kernel,
    alpha: f64,
    beta: f64,
) -> Result<BinaryEdgeMap> {
    threshold_gradient_edges_with(image, kernel, &EdgeParams::new(alpha, beta)?, &mut NullSink)
}

/// [`threshold_gradient_edges`] with stage snapshots sent to `sink`.
pub fn threshold_gradient_edges_with(
    image: &GrayImage,
    kernel: &Kernel,
    params: &EdgeParams,
    sink: &mut dyn ImageSink,
) -> Result<BinaryEdgeMap> {
    let gradient = compute_gradient(image, kernel, sink)?;
    let edges = threshold_gradient(&gradient.magnitude, gradient.max, params, sink);
    debug!("threshold pipeline found {} edge pixels", edges.edge_count());
    Ok(edges)
}

/// Computes an edge map with non-maximum suppression followed by hysteresis.
///
/// Output matches the historical implementation, faults included; see [`CannyOptions`] for
/// the corrected variants.
#[deprecated(
    note = "use `threshold_gradient_edges`, or `canny_edges_with` to pick corrected behavior"
)]
pub fn canny_edges(
    image: &GrayImage,
    kernel: &Kernel,
    alpha: f64,
    beta: f64,
) -> Result<BinaryEdgeMap> {
    canny_edges_with(
        image,
        kernel,
        &EdgeParams::new(alpha, beta)?,
        CannyOptions::default(),
        &mut NullSink,
    )
}

/// [`canny_edges`] with explicit options and stage snapshots sent to `sink`.
pub fn canny_edges_with(
    image: &GrayImage,
    kernel: &Kernel,
    params: &EdgeParams,
    options: CannyOptions,
    sink: &mut dyn ImageSink,
) -> Result<BinaryEdgeMap> {
    let (gradient, angle) = compute_gradient_with_angle(image, kernel, sink)?;
    let thinned = non_max_suppression(&gradient.magnitude, &angle, options.bucket_rule, sink);
    let edges = hysteresis_threshold(&thinned, gradient.max, params, options.hysteresis, sink);
    debug!("canny pipeline found {} edge pixels", edges.edge_count());
    Ok(edges)
}
