#![cfg_attr(all(test, feature = "unstable"), feature(test))]
#![warn(missing_docs)]

//! Edge maps from 3x3 gradient operators.
//!
//! An 8-bit grayscale image is convolved with a kernel such as [`Kernel::SOBEL`] or
//! [`Kernel::SCHARR`]. The resulting magnitudes are then either thresholded against a
//! fraction of the strongest gradient, or thinned by non-maximum suppression and resolved
//! with hysteresis the way the older Canny-style pipeline did.
//!
//! # Finding the edges in an image
//!
//! ```no_run
//! let source_image = image::open("input.png")
//!     .expect("failed to read image")
//!     .into_luma8();
//! let edges = gradient_edges::threshold_gradient_edges(
//!     &source_image,
//!     &gradient_edges::Kernel::SOBEL,
//!     0.3, // alpha
//!     0.5, // beta
//! )
//! .expect("invalid input");
//! edges.to_luma().save("edges.png").expect("failed to write image");
//! ```
//!
//! Intermediate stages can be captured by passing an [`ImageSink`] to the `_with` variants
//! of the entry points.

mod edge;
mod error;
mod gradient;
mod grayscale;
mod hysteresis;
mod kernel;
mod map;
mod params;
mod sink;
mod suppression;
mod threshold;

pub use edge::*;
pub use error::{InvalidInputError, Result, SnapshotError};
pub use gradient::{
    check_dimensions, compute_gradient, compute_gradient_with_angle, Gradient, BRIGHT_CUTOFF,
};
pub use grayscale::{to_grayscale, Average, GrayscaleConversion, Luminance};
pub use hysteresis::{classify, hysteresis_threshold, HysteresisMode, WeakPixelSet};
pub use kernel::Kernel;
pub use map::{AngleMap, BinaryEdgeMap, Grid, MagnitudeMap, MaxGradient};
pub use params::{EdgeParams, PRESET_ALPHA, PRESET_BETA};
pub use sink::{DirectorySink, ImageSink, MemorySink, NullSink, Stage};
pub use suppression::{non_max_suppression, AngleBucket, BucketRule};
pub use threshold::threshold_gradient;
