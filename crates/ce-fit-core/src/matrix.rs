//! Column-major dense matrix used for design matrices and correlation grids.
//!
//! [`DenseMatrix`] carries its dimensions alongside a flat column-major
//! buffer, so feature columns are contiguous slices and conversion to
//! nalgebra is a plain copy.

use nalgebra::DMatrix;

/// Dense column-major matrix of `f64`.
///
/// Element `(row, col)` lives at index `row + col * nrows`.
///
/// # Conventions
///
/// In a design matrix rows are samples (configurations) and columns are
/// features (cluster descriptors). Undefined entries of a correlation grid
/// are stored as `NaN`.
///
/// # Examples
///
/// ```
/// use ce_fit_core::matrix::DenseMatrix;
///
/// // 3 samples, 2 features
/// let x = DenseMatrix::from_column_major(vec![1.0, 2.0, 3.0, 10.0, 20.0, 30.0], 3, 2).unwrap();
///
/// assert_eq!(x[(2, 1)], 30.0);
/// assert_eq!(x.column(0), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl DenseMatrix {
    /// Create from flat column-major data.
    ///
    /// Returns `None` if `data.len() != nrows * ncols`.
    pub fn from_column_major(data: Vec<f64>, nrows: usize, ncols: usize) -> Option<Self> {
        if data.len() != nrows * ncols {
            return None;
        }
        Some(Self { data, nrows, ncols })
    }

    /// Create from a list of equally long columns.
    ///
    /// Returns `None` when the columns differ in length.
    pub fn from_columns(columns: &[Vec<f64>]) -> Option<Self> {
        let nrows = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != nrows) {
            return None;
        }
        let data: Vec<f64> = columns.iter().flatten().copied().collect();
        Some(Self {
            data,
            nrows,
            ncols: columns.len(),
        })
    }

    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, 0.0)
    }

    /// Create a matrix with every element set to `value`.
    pub fn filled(nrows: usize, ncols: usize, value: f64) -> Self {
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Dimensions as `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Contiguous column slice.
    ///
    /// # Panics
    /// Panics if `col >= ncols`.
    #[inline]
    pub fn column(&self, col: usize) -> &[f64] {
        let start = col * self.nrows;
        &self.data[start..start + self.nrows]
    }

    /// Flat column-major view.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Whether `self[(i, j)]` equals `self[(j, i)]` within `tol`.
    ///
    /// `NaN` entries count as equal to each other.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.nrows != self.ncols {
            return false;
        }
        for j in 0..self.ncols {
            for i in 0..j {
                let (a, b) = (self[(i, j)], self[(j, i)]);
                let same = (a.is_nan() && b.is_nan()) || (a - b).abs() <= tol;
                if !same {
                    return false;
                }
            }
        }
        true
    }

    /// Copy into a nalgebra `DMatrix<f64>`; both are column-major.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.nrows, self.ncols, &self.data)
    }

    /// Bounds-checked element access.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.nrows && col < self.ncols {
            Some(self.data[row + col * self.nrows])
        } else {
            None
        }
    }
}

impl std::ops::Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "DenseMatrix index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &self.data[row + col * self.nrows]
    }
}

impl std::ops::IndexMut<(usize, usize)> for DenseMatrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        debug_assert!(
            row < self.nrows && col < self.ncols,
            "DenseMatrix index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        &mut self.data[row + col * self.nrows]
    }
}
