use image::{GrayImage, Luma};
use rayon::prelude::*;

/// A per-pixel map stored column-major, indexed `[x][y]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    columns: Vec<Vec<T>>,
}

/// Rounded gradient magnitudes. Border cells stay at zero.
pub type MagnitudeMap = Grid<u32>;

/// Gradient directions in degrees within [0, 180), meaningful at interior pixels only.
pub type AngleMap = Grid<f64>;

/// Two-level output: `true` is an edge (white), `false` is background (black).
pub type BinaryEdgeMap = Grid<bool>;

impl<T: Clone> Grid<T> {
    /// A `width` x `height` grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Grid<T> {
        Grid {
            columns: vec![vec![value; height]; width],
        }
    }
}

impl<T> Grid<T> {
    pub(crate) fn from_columns(columns: Vec<Vec<T>>) -> Grid<T> {
        debug_assert!(columns.windows(2).all(|w| w[0].len() == w[1].len()));
        Grid { columns }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// The cell at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.columns.get(x).and_then(|col| col.get(y))
    }

    /// The cells as columns, each top to bottom.
    pub fn columns(&self) -> &[Vec<T>] {
        &self.columns
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: T) {
        self.columns[x][y] = value;
    }

    /// Iterates `(x, y, value)` in row-major order, top row first.
    pub fn iter_rows(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let (width, height) = (self.width(), self.height());
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y, &self.columns[x][y])))
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.columns[x][y]
    }
}

impl MagnitudeMap {
    /// Renders magnitudes as 8-bit gray, saturating at 255.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            let m = self.columns[x as usize][y as usize];
            Luma([m.min(u32::from(u8::MAX)) as u8])
        })
    }
}

impl BinaryEdgeMap {
    /// Renders edges as 255 and background as 0.
    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Luma([if self.columns[x as usize][y as usize] { 255 } else { 0 }])
        })
    }

    /// Number of edge pixels.
    pub fn edge_count(&self) -> usize {
        self.columns
            .par_iter()
            .map(|col| col.iter().filter(|&&white| white).count())
            .sum()
    }
}

/// The largest interior magnitude of one gradient pass.
///
/// Produced once by the gradient pass and passed by value to later stages, which only read it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxGradient(u32);

impl MaxGradient {
    pub(crate) fn new(value: u32) -> MaxGradient {
        MaxGradient(value)
    }

    /// The raw magnitude.
    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_and_indexing() {
        let mut grid = Grid::filled(4, 3, 0u32);
        grid.set(3, 2, 7);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid[(3, 2)], 7);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn iter_rows_is_row_major() {
        let grid = Grid::from_columns(vec![vec![0, 2], vec![1, 3]]);
        let order: Vec<_> = grid.iter_rows().map(|(x, y, &v)| (x, y, v)).collect();
        assert_eq!(order, vec![(0, 0, 0), (1, 0, 1), (0, 1, 2), (1, 1, 3)]);
    }

    #[test]
    fn magnitude_luma_saturates() {
        let grid = Grid::from_columns(vec![vec![12u32, 320]]);
        let img = grid.to_luma();
        assert_eq!(img.get_pixel(0, 0).0, [12]);
        assert_eq!(img.get_pixel(0, 1).0, [255]);
    }

    #[test]
    fn binary_luma_and_count() {
        let grid = Grid::from_columns(vec![vec![true, false], vec![false, true]]);
        assert_eq!(grid.edge_count(), 2);
        let img = grid.to_luma();
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
    }
}
