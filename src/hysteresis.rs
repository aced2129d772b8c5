//! Double thresholding with propagation from strong to weak pixels.
//!
//! Pixels at or above the upper bound are edges, pixels at or below the lower bound are
//! background, and everything in between is weak and collected in a [`WeakPixelSet`]. Weak
//! pixels are then resolved against their 8-neighbourhood in the output being built.
//!
//! [`HysteresisMode::Legacy`] resolves each weak pixel once, in raster order. A weak pixel
//! therefore only benefits from weak neighbours that were promoted before it, so chains
//! running up or left from a strong pixel are cut short. It also keeps the historical bound
//! checks, which test the column index against the image height and the row index against
//! the width. [`HysteresisMode::Strict`] uses plain bounds and repeats until no weak pixel
//! changes, which promotes every weak pixel connected to a strong one.

use log::debug;

use crate::map::{BinaryEdgeMap, Grid, MagnitudeMap, MaxGradient};
use crate::params::EdgeParams;
use crate::sink::{emit, ImageSink, Stage};

/// How weak pixels are resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HysteresisMode {
    /// One raster-order pass with the historical bound checks.
    Legacy,
    /// Repeated passes until a fixed point, with normalized bounds.
    Strict,
}

impl Default for HysteresisMode {
    fn default() -> HysteresisMode {
        HysteresisMode::Legacy
    }
}

/// Weak pixel coordinates `(x, y)` in the raster order they were classified in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeakPixelSet {
    pixels: Vec<(usize, usize)>,
}

impl WeakPixelSet {
    /// Number of weak pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.pixels.iter()
    }
}

/// Splits `suppressed` into strong edges and weak candidates.
pub fn classify(
    suppressed: &MagnitudeMap,
    lower: u32,
    upper: u32,
) -> (BinaryEdgeMap, WeakPixelSet) {
    let mut edges = Grid::filled(suppressed.width(), suppressed.height(), false);
    let mut weak = WeakPixelSet::default();
    for (x, y, &amplitude) in suppressed.iter_rows() {
        if amplitude <= lower {
            continue;
        } else if amplitude >= upper {
            edges.set(x, y, true);
        } else {
            weak.pixels.push((x, y));
        }
    }
    (edges, weak)
}

/// Applies the double threshold `round(beta * round(alpha * max))` / `round(alpha * max)` to
/// a suppressed magnitude map. The result is emitted as [`Stage::HysteresisThreshold`].
pub fn hysteresis_threshold(
    suppressed: &MagnitudeMap,
    max: MaxGradient,
    params: &EdgeParams,
    mode: HysteresisMode,
    sink: &mut dyn ImageSink,
) -> BinaryEdgeMap {
    let (lower, upper) = params.hysteresis_bounds(max);
    let (mut edges, weak) = classify(suppressed, lower, upper);
    debug!(
        "hysteresis bounds {}..{}, {} weak pixels",
        lower,
        upper,
        weak.len()
    );

    match mode {
        HysteresisMode::Legacy => {
            for &(x, y) in weak.iter() {
                if legacy_neighbours(x, y, edges.width(), edges.height()).any(|n| edges[n]) {
                    edges.set(x, y, true);
                }
            }
        }
        HysteresisMode::Strict => {
            let mut pending = weak.pixels;
            let mut passes = 0;
            loop {
                passes += 1;
                let before = pending.len();
                pending.retain(|&(x, y)| {
                    if neighbours(x, y, edges.width(), edges.height()).any(|n| edges[n]) {
                        edges.set(x, y, true);
                        false
                    } else {
                        true
                    }
                });
                if pending.len() == before {
                    break;
                }
            }
            debug!(
                "strict hysteresis settled after {} passes, {} weak pixels dropped",
                passes,
                pending.len()
            );
        }
    }

    emit(sink, &edges.to_luma(), Stage::HysteresisThreshold);
    edges
}

/// The 8-neighbourhood of `(x, y)` inside a `width` x `height` image.
fn neighbours(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let dx_range = -((x > 0) as isize)..=(x + 1 < width) as isize;
    let dy_range = -((y > 0) as isize)..=(y + 1 < height) as isize;
    offsets(x, y, dx_range, dy_range)
}

/// Like [`neighbours`], but the upper column offset is dropped when `x == height` and the upper
/// row offset when `y == width`, matching the historical swapped dimension checks. Positions
/// outside the image are skipped.
fn legacy_neighbours(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let dx_range = -((x != 0) as isize)..=(x != height) as isize;
    let dy_range = -((y != 0) as isize)..=(y != width) as isize;
    offsets(x, y, dx_range, dy_range)
        .filter(move |&(nx, ny)| nx < width && ny < height)
}

fn offsets(
    x: usize,
    y: usize,
    dx_range: std::ops::RangeInclusive<isize>,
    dy_range: std::ops::RangeInclusive<isize>,
) -> impl Iterator<Item = (usize, usize)> {
    dy_range
        .flat_map(move |dy| dx_range.clone().map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| dx != 0 || dy != 0)
        .map(move |(dx, dy)| ((x as isize + dx) as usize, (y as isize + dy) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, NullSink};

    // With max 100 and alpha 0.5: upper = 50, lower = round(0.5 * 50) = 25.
    const STRONG: u32 = 60;
    const WEAK: u32 = 30;

    fn params() -> EdgeParams {
        EdgeParams::new(0.5, 0.5).unwrap()
    }

    fn run(mags: &MagnitudeMap, mode: HysteresisMode) -> BinaryEdgeMap {
        hysteresis_threshold(mags, MaxGradient::new(100), &params(), mode, &mut NullSink)
    }

    fn row(values: &[u32], height: usize, y: usize) -> MagnitudeMap {
        let mut mags = Grid::filled(values.len(), height, 0);
        for (x, &v) in values.iter().enumerate() {
            mags.set(x, y, v);
        }
        mags
    }

    #[test]
    fn classification_bounds() {
        let mags = row(&[25, 26, 49, 50, 0], 1, 0);
        let (edges, weak) = classify(&mags, 25, 50);
        assert_eq!(
            edges.columns(),
            &[vec![false], vec![false], vec![false], vec![true], vec![false]][..]
        );
        assert_eq!(weak.iter().copied().collect::<Vec<_>>(), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn isolated_weak_pixel_is_dropped() {
        for &mode in &[HysteresisMode::Legacy, HysteresisMode::Strict] {
            let mags = row(&[0, WEAK, 0, 0, STRONG], 3, 1);
            let edges = run(&mags, mode);
            assert!(!edges[(1, 1)]);
            assert!(edges[(4, 1)]);
        }
    }

    #[test]
    fn weak_touching_strong_is_promoted() {
        for &mode in &[HysteresisMode::Legacy, HysteresisMode::Strict] {
            let mut mags = Grid::filled(5, 5, 0);
            mags.set(2, 2, STRONG);
            mags.set(3, 3, WEAK);
            mags.set(1, 1, WEAK);
            let edges = run(&mags, mode);
            assert!(edges[(1, 1)]);
            assert!(edges[(3, 3)]);
            assert_eq!(edges.edge_count(), 3);
        }
    }

    #[test]
    fn legacy_pass_is_order_sensitive() {
        // Weak chain to the left of the strong pixel; raster order visits it backwards.
        let mags = row(&[0, WEAK, WEAK, WEAK, STRONG, 0], 7, 1);
        let legacy = run(&mags, HysteresisMode::Legacy);
        assert_eq!(
            (1..5).map(|x| legacy[(x, 1)]).collect::<Vec<_>>(),
            vec![false, false, true, true]
        );

        let strict = run(&mags, HysteresisMode::Strict);
        assert!((1..5).all(|x| strict[(x, 1)]));

        // Running the other way the single pass already follows the chain.
        let mags = row(&[0, STRONG, WEAK, WEAK, WEAK, 0], 7, 1);
        let legacy = run(&mags, HysteresisMode::Legacy);
        assert!((1..5).all(|x| legacy[(x, 1)]));
    }

    #[test]
    fn legacy_checks_column_against_height() {
        // 6x3 image: the weak pixel sits in column 3 == height, so its right-hand
        // neighbours are not looked at.
        let mags = row(&[0, 0, 0, WEAK, STRONG, 0], 3, 1);
        assert!(!run(&mags, HysteresisMode::Legacy)[(3, 1)]);
        assert!(run(&mags, HysteresisMode::Strict)[(3, 1)]);
    }

    #[test]
    fn legacy_checks_row_against_width() {
        // 3x6 image: the weak pixel sits in row 3 == width.
        let mut mags = Grid::filled(3, 6, 0);
        mags.set(1, 3, WEAK);
        mags.set(1, 4, STRONG);
        assert!(!run(&mags, HysteresisMode::Legacy)[(1, 3)]);
        assert!(run(&mags, HysteresisMode::Strict)[(1, 3)]);
    }

    #[test]
    fn neighbourhoods_stay_inside_image() {
        let corner: Vec<_> = neighbours(0, 0, 4, 4).collect();
        assert_eq!(corner, vec![(1, 0), (0, 1), (1, 1)]);
        let far: Vec<_> = neighbours(3, 3, 4, 4).collect();
        assert_eq!(far, vec![(2, 2), (3, 2), (2, 3)]);
        assert_eq!(neighbours(1, 1, 3, 3).count(), 8);
        assert!(legacy_neighbours(3, 0, 4, 2).all(|(x, y)| x < 4 && y < 2));
    }

    #[test]
    fn emits_hysteresis_snapshot() {
        let mut sink = MemorySink::new();
        let mags = row(&[0, STRONG, WEAK], 3, 1);
        hysteresis_threshold(
            &mags,
            MaxGradient::new(100),
            &params(),
            HysteresisMode::Legacy,
            &mut sink,
        );
        let snapshot = sink.get(Stage::HysteresisThreshold).unwrap();
        assert_eq!(snapshot.get_pixel(1, 1).0, [255]);
        assert_eq!(snapshot.get_pixel(2, 1).0, [255]);
        assert_eq!(snapshot.get_pixel(0, 1).0, [0]);
    }
}
