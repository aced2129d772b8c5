//! Gradient magnitudes from a 3x3 operator.
//!
//! Each interior pixel is convolved with the kernel along one axis and with the same kernel
//! read transposed along the other. Pixels next to anything brighter than [`BRIGHT_CUTOFF`]
//! get no gradient at all, which keeps saturated regions from producing edges. Border
//! rows and columns are never convolved and stay at zero.

use image::GrayImage;
use log::debug;
use rayon::prelude::*;

use crate::error::{InvalidInputError, Result};
use crate::kernel::Kernel;
use crate::map::{AngleMap, Grid, MagnitudeMap, MaxGradient};
use crate::sink::{emit, ImageSink, Stage};

/// Intensity above which a neighbour suppresses the gradient of the centre pixel.
pub const BRIGHT_CUTOFF: u8 = 100;

/// Output of one gradient pass.
#[derive(Clone, Debug)]
pub struct Gradient {
    /// Rounded magnitudes, zero on the border.
    pub magnitude: MagnitudeMap,
    /// Largest interior magnitude of this pass.
    pub max: MaxGradient,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Tap {
    magnitude: u32,
    angle: f64,
}

/// Fails unless the image has at least one interior pixel.
pub fn check_dimensions(image: &GrayImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return Err(InvalidInputError::ImageTooSmall { width, height });
    }
    Ok(())
}

/// Convolves every interior pixel of `image` with `kernel`.
///
/// The magnitude map is emitted to `sink` as [`Stage::Gradient`].
pub fn compute_gradient(
    image: &GrayImage,
    kernel: &Kernel,
    sink: &mut dyn ImageSink,
) -> Result<Gradient> {
    let (gradient, _) = gradient_pass(image, kernel, false, sink)?;
    Ok(gradient)
}

/// Like [`compute_gradient`], also returning the direction of every interior gradient.
pub fn compute_gradient_with_angle(
    image: &GrayImage,
    kernel: &Kernel,
    sink: &mut dyn ImageSink,
) -> Result<(Gradient, AngleMap)> {
    let (gradient, angles) = gradient_pass(image, kernel, true, sink)?;
    Ok((gradient, Grid::from_columns(angles)))
}

/// Angle columns are left empty unless `with_angle` is set.
fn gradient_pass(
    image: &GrayImage,
    kernel: &Kernel,
    with_angle: bool,
    sink: &mut dyn ImageSink,
) -> Result<(Gradient, Vec<Vec<f64>>)> {
    check_dimensions(image)?;
    let (width, height) = (image.width() as usize, image.height() as usize);

    let columns: Vec<(Vec<Tap>, u32)> = (0..width)
        .into_par_iter()
        .map(|x| {
            let mut column_max = 0;
            let taps = (0..height)
                .map(|y| {
                    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                        return Tap::default();
                    }
                    let tap = match convolve_at(image, kernel, x, y) {
                        Some((gx, gy)) => Tap {
                            magnitude: magnitude(gx, gy),
                            angle: direction(gx, gy),
                        },
                        None => Tap::default(),
                    };
                    column_max = column_max.max(tap.magnitude);
                    tap
                })
                .collect();
            (taps, column_max)
        })
        .collect();

    let max = MaxGradient::new(columns.iter().map(|(_, m)| *m).max().unwrap_or(0));
    let magnitude = Grid::from_columns(
        columns
            .iter()
            .map(|(taps, _)| taps.iter().map(|t| t.magnitude).collect())
            .collect(),
    );
    let angles = if with_angle {
        columns
            .iter()
            .map(|(taps, _)| taps.iter().map(|t| t.angle).collect())
            .collect()
    } else {
        Vec::new()
    };
    debug!(
        "gradient over {}x{} image: max magnitude {}",
        width,
        height,
        max.get()
    );

    emit(sink, &magnitude.to_luma(), Stage::Gradient);
    Ok((Gradient { magnitude, max }, angles))
}

/// Returns the directional sums at the interior pixel `(x, y)`, or `None` when any pixel of
/// its 3x3 neighbourhood is brighter than [`BRIGHT_CUTOFF`].
///
/// `a` is the column offset and `b` the row offset into the neighbourhood. The first sum
/// weighs with `kernel[a][b]`, the second with the transposed `kernel[b][a]`.
fn convolve_at(image: &GrayImage, kernel: &Kernel, x: usize, y: usize) -> Option<(i64, i64)> {
    let mut neighbourhood = [[0u8; 3]; 3];
    for (a, col) in neighbourhood.iter_mut().enumerate() {
        for (b, pix) in col.iter_mut().enumerate() {
            *pix = image.get_pixel((x + a - 1) as u32, (y + b - 1) as u32).0[0];
        }
    }
    if neighbourhood.iter().flatten().any(|&p| p > BRIGHT_CUTOFF) {
        return None;
    }

    let (mut gx, mut gy) = (0i64, 0i64);
    for (a, col) in neighbourhood.iter().enumerate() {
        for (b, &pix) in col.iter().enumerate() {
            gx += kernel.weight(a, b) * i64::from(pix);
            gy += kernel.weight(b, a) * i64::from(pix);
        }
    }
    Some((gx, gy))
}

fn magnitude(gx: i64, gy: i64) -> u32 {
    ((gx * gx + gy * gy) as f64).sqrt().round() as u32
}

/// `atan2(gy, gx)` in degrees, folded into [0, 180).
fn direction(gx: i64, gy: i64) -> f64 {
    let mut angle = (gy as f64).atan2(gx as f64).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }
    if angle >= 180.0 {
        angle -= 180.0;
    }
    angle
}
