//! Matrix type for 2D numeric data.

use super::Vector;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Pivots with absolute value below this are treated as zero during
/// elimination, marking the matrix singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// A 2D matrix of floating-point values (row-major storage).
///
/// # Examples
///
/// ```
/// use pronostico::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
///     .expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EngineError::dimension_mismatch(
                format!("{rows}x{cols} = {} elements", rows * cols),
                format!("{} elements", data.len()),
            ));
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Sets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Returns a row as a Vector.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> Vector<T> {
        let start = row_idx * self.cols;
        let end = start + self.cols;
        Vector::from_slice(&self.data[start..end])
    }

    /// Returns a column as a Vector.
    #[must_use]
    pub fn column(&self, col_idx: usize) -> Vector<T> {
        let data: Vec<T> = (0..self.rows)
            .map(|row| self.data[row * self.cols + col_idx])
            .collect();
        Vector::from_vec(data)
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f64> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn eye(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self {
            data,
            rows: n,
            cols: n,
        }
    }

    /// Transposes the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Matrix-matrix multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if `self.n_cols() != other.n_rows()`.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(EngineError::dimension_mismatch(
                format!("{} columns in left operand", self.cols),
                format!("{} rows in right operand", other.rows),
            ));
        }

        let mut result = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.get(i, k) * other.get(k, j);
                }
                result[i * other.cols + j] = sum;
            }
        }

        Ok(Self {
            data: result,
            rows: self.rows,
            cols: other.cols,
        })
    }

    /// Matrix-vector multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if `self.n_cols() != vec.len()`.
    pub fn matvec(&self, vec: &Vector<f64>) -> Result<Vector<f64>> {
        if self.cols != vec.len() {
            return Err(EngineError::dimension_mismatch(
                format!("{} columns", self.cols),
                format!("vector of length {}", vec.len()),
            ));
        }

        let result: Vec<f64> = (0..self.rows)
            .map(|i| {
                let row = self.row(i);
                row.dot(vec)
            })
            .collect();

        Ok(Vector::from_vec(result))
    }

    /// Inverts the matrix by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Builds the augmented matrix `[M | I]`, and for each pivot column
    /// selects the remaining row with the largest absolute value, swaps it
    /// into position, scales the pivot row so the pivot equals 1, then
    /// eliminates that column from every other row. The right half of the
    /// augmented matrix is the inverse.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square, or
    /// [`EngineError::SingularMatrix`] if a pivot is numerically zero.
    pub fn invert(&self) -> Result<Self> {
        if self.rows != self.cols {
            return Err(EngineError::dimension_mismatch(
                "square matrix",
                format!("{}x{}", self.rows, self.cols),
            ));
        }

        let n = self.rows;
        let width = 2 * n;

        // Augmented matrix [M | I]
        let mut aug = vec![0.0; n * width];
        for i in 0..n {
            for j in 0..n {
                aug[i * width + j] = self.get(i, j);
            }
            aug[i * width + n + i] = 1.0;
        }

        for col in 0..n {
            // Partial pivoting: largest absolute value among remaining rows
            let mut pivot_row = col;
            let mut max_abs = aug[col * width + col].abs();
            for r in (col + 1)..n {
                let candidate = aug[r * width + col].abs();
                if candidate > max_abs {
                    max_abs = candidate;
                    pivot_row = r;
                }
            }

            if max_abs < PIVOT_EPSILON {
                return Err(EngineError::SingularMatrix {
                    pivot: aug[pivot_row * width + col],
                    column: col,
                });
            }

            if pivot_row != col {
                for j in 0..width {
                    aug.swap(col * width + j, pivot_row * width + j);
                }
            }

            // Scale pivot row so the pivot equals 1
            let pivot = aug[col * width + col];
            for j in 0..width {
                aug[col * width + j] /= pivot;
            }

            // Eliminate the pivot column from every other row
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug[r * width + col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..width {
                    aug[r * width + j] -= factor * aug[col * width + j];
                }
            }
        }

        // Right half is the inverse
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(aug[i * width + n + j]);
            }
        }

        Self::from_vec(n, n, data)
    }
}
