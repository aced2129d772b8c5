use crate::error::{InvalidInputError, Result};

/// A 3x3 signed derivative operator.
///
/// The same matrix yields both derivative axes: the gradient pass reads it once as
/// `weight(dx, dy)` and once with the indices swapped, so a kernel never comes as a pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Kernel([[i32; 3]; 3]);

impl Kernel {
    /// The Sobel operator.
    pub const SOBEL: Kernel = Kernel([[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]);

    /// The Scharr operator.
    pub const SCHARR: Kernel = Kernel([[-3, 0, 3], [-10, 0, 10], [-3, 0, 3]]);

    /// Wraps a row-major matrix.
    pub const fn new(rows: [[i32; 3]; 3]) -> Kernel {
        Kernel(rows)
    }

    /// Builds a kernel from dynamically sized rows, rejecting anything that is not 3x3.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Kernel> {
        let bad_row = rows
            .iter()
            .map(|row| row.as_ref().len())
            .find(|&len| len != 3);
        if rows.len() != 3 || bad_row.is_some() {
            let columns = bad_row
                .or_else(|| rows.first().map(|row| row.as_ref().len()))
                .unwrap_or(0);
            return Err(InvalidInputError::KernelShape {
                rows: rows.len(),
                columns,
            });
        }
        let mut matrix = [[0; 3]; 3];
        for (dst, src) in matrix.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(Kernel(matrix))
    }

    /// The matrix, row-major.
    pub fn rows(&self) -> &[[i32; 3]; 3] {
        &self.0
    }

    #[inline]
    pub(crate) fn weight(&self, a: usize, b: usize) -> i64 {
        i64::from(self.0[a][b])
    }
}

impl Default for Kernel {
    fn default() -> Kernel {
        Kernel::SOBEL
    }
}
