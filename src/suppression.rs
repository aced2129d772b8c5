//! Non-maximum suppression over quantized gradient directions.
//!
//! Every interior pixel is compared with the two neighbours picked by the bucket of its
//! direction and survives only if it is at least as strong as both. How directions map to
//! buckets is selected with [`BucketRule`], since the historical mapping is faulty and
//! existing outputs depend on it.

use log::debug;
use rayon::prelude::*;

use crate::map::{AngleMap, Grid, MagnitudeMap};
use crate::sink::{emit, ImageSink, Stage};

/// Direction class of a gradient, naming the pair of neighbours it is compared with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AngleBucket {
    /// Above and below.
    Vertical,
    /// Top right and bottom left.
    AntiDiagonal,
    /// Left and right.
    Horizontal,
    /// Top left and bottom right.
    Diagonal,
    /// No neighbours; the pixel is always kept.
    Undefined,
}

impl AngleBucket {
    /// `(dx, dy)` offsets of the two neighbours, `None` for [`AngleBucket::Undefined`].
    pub fn neighbour_offsets(self) -> Option<[(isize, isize); 2]> {
        match self {
            AngleBucket::Vertical => Some([(0, 1), (0, -1)]),
            AngleBucket::AntiDiagonal => Some([(1, -1), (-1, 1)]),
            AngleBucket::Horizontal => Some([(1, 0), (-1, 0)]),
            AngleBucket::Diagonal => Some([(-1, -1), (1, 1)]),
            AngleBucket::Undefined => None,
        }
    }
}

/// How a direction in degrees is assigned to an [`AngleBucket`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BucketRule {
    /// The historical conditions evaluated as written. They are disjunctions, so the first
    /// one always holds and every pixel is compared vertically.
    Literal,
    /// The historical ranges read as intended, including their hole: directions in
    /// [112.5, 122.5) fall into [`AngleBucket::Undefined`] and the pixel is kept unchecked.
    Compat,
    /// Contiguous ranges; [112.5, 157.5) is diagonal and `Undefined` never occurs.
    Corrected,
}

impl Default for BucketRule {
    fn default() -> BucketRule {
        BucketRule::Compat
    }
}

impl BucketRule {
    /// Bucket of a direction in degrees.
    pub fn classify(self, angle: f64) -> AngleBucket {
        match self {
            BucketRule::Literal => AngleBucket::Vertical,
            BucketRule::Compat => match angle {
                a if (0.0..22.5).contains(&a) || (157.5..180.0).contains(&a) => {
                    AngleBucket::Vertical
                }
                a if (22.5..67.5).contains(&a) => AngleBucket::AntiDiagonal,
                a if (67.5..112.5).contains(&a) => AngleBucket::Horizontal,
                a if (122.5..157.5).contains(&a) => AngleBucket::Diagonal,
                _ => AngleBucket::Undefined,
            },
            BucketRule::Corrected => match angle.rem_euclid(180.0) {
                a if a < 22.5 || a >= 157.5 => AngleBucket::Vertical,
                a if a < 67.5 => AngleBucket::AntiDiagonal,
                a if a < 112.5 => AngleBucket::Horizontal,
                _ => AngleBucket::Diagonal,
            },
        }
    }
}

/// Keeps each interior magnitude that is a local maximum along its direction bucket and
/// zeroes the rest, border included. The result is emitted as [`Stage::CannyEdge`].
pub fn non_max_suppression(
    magnitude: &MagnitudeMap,
    angle: &AngleMap,
    rule: BucketRule,
    sink: &mut dyn ImageSink,
) -> MagnitudeMap {
    debug_assert_eq!(
        (magnitude.width(), magnitude.height()),
        (angle.width(), angle.height())
    );
    let (width, height) = (magnitude.width(), magnitude.height());

    let thinned = Grid::from_columns(
        (0..width)
            .into_par_iter()
            .map(|x| {
                (0..height)
                    .map(|y| {
                        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
                            return 0;
                        }
                        let m = magnitude[(x, y)];
                        let is_max = match rule.classify(angle[(x, y)]).neighbour_offsets() {
                            Some(offsets) => offsets.iter().all(|&(dx, dy)| {
                                let nx = (x as isize + dx) as usize;
                                let ny = (y as isize + dy) as usize;
                                m >= magnitude[(nx, ny)]
                            }),
                            None => true,
                        };
                        if is_max {
                            m
                        } else {
                            0
                        }
                    })
                    .collect()
            })
            .collect(),
    );
    debug!("non-max suppression with {:?} buckets", rule);
    emit(sink, &thinned.to_luma(), Stage::CannyEdge);
    thinned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, NullSink};

    /// A 5x5 map whose values only vary along x, with a uniform angle.
    fn ridge_across_columns(angle: f64) -> (MagnitudeMap, AngleMap) {
        let profile = [0, 50, 90, 50, 0];
        let mags = Grid::from_columns(profile.iter().map(|&v| vec![v; 5]).collect());
        (mags, Grid::filled(5, 5, angle))
    }

    #[test]
    fn compat_ranges() {
        let rule = BucketRule::Compat;
        assert_eq!(rule.classify(0.0), AngleBucket::Vertical);
        assert_eq!(rule.classify(22.4), AngleBucket::Vertical);
        assert_eq!(rule.classify(22.5), AngleBucket::AntiDiagonal);
        assert_eq!(rule.classify(67.5), AngleBucket::Horizontal);
        assert_eq!(rule.classify(112.5), AngleBucket::Undefined);
        assert_eq!(rule.classify(122.4), AngleBucket::Undefined);
        assert_eq!(rule.classify(122.5), AngleBucket::Diagonal);
        assert_eq!(rule.classify(157.5), AngleBucket::Vertical);
        assert_eq!(rule.classify(179.9), AngleBucket::Vertical);
    }

    #[test]
    fn corrected_closes_the_gap() {
        let rule = BucketRule::Corrected;
        assert_eq!(rule.classify(112.5), AngleBucket::Diagonal);
        assert_eq!(rule.classify(120.0), AngleBucket::Diagonal);
        assert_eq!(rule.classify(90.0), AngleBucket::Horizontal);
        assert_eq!(rule.classify(180.0), AngleBucket::Vertical);
    }

    #[test]
    fn literal_is_always_vertical() {
        for &a in &[0.0, 45.0, 90.0, 115.0, 135.0] {
            assert_eq!(BucketRule::Literal.classify(a), AngleBucket::Vertical);
        }
    }

    #[test]
    fn horizontal_bucket_thins_ridge_to_one_column() {
        let (mags, angle) = ridge_across_columns(90.0);
        let thinned = non_max_suppression(&mags, &angle, BucketRule::Compat, &mut NullSink);
        for y in 1..4 {
            assert_eq!(thinned[(1, y)], 0);
            assert_eq!(thinned[(2, y)], 90);
            assert_eq!(thinned[(3, y)], 0);
        }
        for x in 0..5 {
            assert_eq!(thinned[(x, 0)], 0);
            assert_eq!(thinned[(x, 4)], 0);
        }
    }

    #[test]
    fn equal_neighbours_are_kept() {
        // Along the vertical bucket every neighbour has the same magnitude.
        let (mags, angle) = ridge_across_columns(0.0);
        let thinned = non_max_suppression(&mags, &angle, BucketRule::Compat, &mut NullSink);
        assert_eq!(thinned[(1, 2)], 50);
        assert_eq!(thinned[(2, 2)], 90);
    }

    #[test]
    fn literal_rule_misses_horizontal_ridge() {
        let (mags, angle) = ridge_across_columns(90.0);
        let thinned = non_max_suppression(&mags, &angle, BucketRule::Literal, &mut NullSink);
        assert_eq!(thinned[(1, 2)], 50);
    }

    #[test]
    fn undefined_bucket_keeps_pixel_only_in_compat() {
        let mags = Grid::from_columns(vec![
            vec![0, 0, 0],
            vec![0, 10, 0],
            vec![0, 0, 40],
        ]);
        let angle = Grid::filled(3, 3, 117.0);
        let compat = non_max_suppression(&mags, &angle, BucketRule::Compat, &mut NullSink);
        assert_eq!(compat[(1, 1)], 10);
        let corrected = non_max_suppression(&mags, &angle, BucketRule::Corrected, &mut NullSink);
        assert_eq!(corrected[(1, 1)], 0);
    }

    #[test]
    fn emits_canny_edge_snapshot() {
        let (mags, angle) = ridge_across_columns(90.0);
        let mut sink = MemorySink::new();
        non_max_suppression(&mags, &angle, BucketRule::Compat, &mut sink);
        let snapshot = sink.get(Stage::CannyEdge).unwrap();
        assert_eq!(snapshot.get_pixel(2, 2).0, [90]);
        assert_eq!(snapshot.get_pixel(1, 2).0, [0]);
    }
}
