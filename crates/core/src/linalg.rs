use std::ops::Mul;

use crate::error::PrtError;

const PIVOT_EPSILON: f32 = 1.0e-6;

/// Row-major `N`×`N` matrix. Only the 3×3 and 5×5 band sizes are used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareMatrix<const N: usize> {
    rows: [[f32; N]; N],
}

impl<const N: usize> SquareMatrix<N> {
    pub const fn from_rows(rows: [[f32; N]; N]) -> Self {
        Self { rows }
    }

    #[allow(clippy::needless_range_loop)]
    pub fn from_columns(columns: [[f32; N]; N]) -> Self {
        let mut rows = [[0.0f32; N]; N];
        for c in 0..N {
            for r in 0..N {
                rows[r][c] = columns[c][r];
            }
        }
        Self { rows }
    }

    #[allow(clippy::needless_range_loop)]
    pub fn identity() -> Self {
        let mut rows = [[0.0f32; N]; N];
        for i in 0..N {
            rows[i][i] = 1.0;
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[[f32; N]; N] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    #[allow(clippy::needless_range_loop)]
    pub fn transpose(&self) -> Self {
        let mut rows = [[0.0f32; N]; N];
        for r in 0..N {
            for c in 0..N {
                rows[c][r] = self.rows[r][c];
            }
        }
        Self { rows }
    }

    #[allow(clippy::needless_range_loop)]
    pub fn mul_vec(&self, v: &[f32; N]) -> [f32; N] {
        let mut out = [0.0f32; N];
        for r in 0..N {
            let mut sum = 0.0;
            for c in 0..N {
                sum += self.rows[r][c] * v[c];
            }
            out[r] = sum;
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|value| value.is_finite())
    }

    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }

    /// Gauss-Jordan elimination with partial pivoting.
    #[allow(clippy::needless_range_loop)]
    pub fn try_inverse(&self) -> Result<Self, PrtError> {
        if !self.is_finite() {
            return Err(PrtError::Numerical(
                "cannot invert a matrix with non-finite entries".to_string(),
            ));
        }
        let scale = self
            .rows
            .iter()
            .flatten()
            .fold(0.0f32, |acc, value| acc.max(value.abs()));
        if scale == 0.0 {
            return Err(PrtError::Numerical(format!("{N}x{N} matrix is zero")));
        }

        let mut a = self.rows;
        let mut inv = Self::identity().rows;

        for i in 0..N {
            let mut pivot = i;
            let mut max = a[i][i].abs();
            for r in (i + 1)..N {
                let value = a[r][i].abs();
                if value > max {
                    max = value;
                    pivot = r;
                }
            }
            if max < PIVOT_EPSILON * scale {
                return Err(PrtError::Numerical(format!(
                    "{N}x{N} matrix is singular (pivot {max:e} in column {i})"
                )));
            }
            if pivot != i {
                a.swap(i, pivot);
                inv.swap(i, pivot);
            }

            let recip = 1.0 / a[i][i];
            for j in 0..N {
                a[i][j] *= recip;
                inv[i][j] *= recip;
            }
            for r in 0..N {
                if r == i {
                    continue;
                }
                let factor = a[r][i];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..N {
                    a[r][j] -= factor * a[i][j];
                    inv[r][j] -= factor * inv[i][j];
                }
            }
        }

        let out = Self { rows: inv };
        if !out.is_finite() {
            return Err(PrtError::Numerical(format!(
                "{N}x{N} inverse is not finite"
            )));
        }
        Ok(out)
    }
}

impl<const N: usize> Mul for SquareMatrix<N> {
    type Output = SquareMatrix<N>;

    #[allow(clippy::needless_range_loop)]
    fn mul(self, rhs: Self) -> Self::Output {
        let mut rows = [[0.0f32; N]; N];
        for r in 0..N {
            for c in 0..N {
                let mut sum = 0.0;
                for k in 0..N {
                    sum += self.rows[r][k] * rhs.rows[k][c];
                }
                rows[r][c] = sum;
            }
        }
        SquareMatrix { rows }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn inverse_of_permutation_is_transpose() {
        let m = SquareMatrix::from_rows([[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
        let inv = m.try_inverse().unwrap();
        assert_eq!(inv, m.transpose());
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = SquareMatrix::from_rows([
            [2.0, 0.5, 0.0, 1.0, -1.0],
            [0.0, 3.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 4.0, 0.5, 0.0],
            [0.0, -1.0, 0.0, 2.0, 1.0],
            [0.5, 0.0, 0.0, 0.0, 1.5],
        ]);
        let inv = m.try_inverse().unwrap();
        let product = m * inv;
        assert!(product.max_abs_diff(&SquareMatrix::identity()) < 1.0e-5);
    }

    #[test]
    fn singular_matrix_is_a_numerical_error() {
        let m = SquareMatrix::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert!(matches!(m.try_inverse(), Err(PrtError::Numerical(_))));

        let zero = SquareMatrix::<5>::from_rows([[0.0; 5]; 5]);
        assert!(matches!(zero.try_inverse(), Err(PrtError::Numerical(_))));

        let nan = SquareMatrix::from_rows([[f32::NAN, 0.0], [0.0, 1.0]]);
        assert!(matches!(nan.try_inverse(), Err(PrtError::Numerical(_))));
    }

    #[test]
    fn columns_and_vectors() {
        let m = SquareMatrix::from_columns([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_abs_diff_eq!(m.get(0, 1), 4.0);
        assert_abs_diff_eq!(m.get(2, 0), 3.0);
        assert_eq!(m.mul_vec(&[1.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
        assert_eq!(m.transpose().rows()[0], [1.0, 2.0, 3.0]);
    }
}
