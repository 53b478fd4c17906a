use std::f32::consts::FRAC_1_SQRT_2;
use std::ops::Mul;

use glam::{Mat3, Mat4, Vec3};

use crate::error::PrtError;
use crate::linalg::SquareMatrix;
use crate::sh::eval_band;

const ORTHONORMAL_TOLERANCE: f32 = 1.0e-3;

pub type Band1Operator = SquareMatrix<3>;
pub type Band2Operator = SquareMatrix<5>;

/// Validated proper rotation. Matrices are column-major, as in glam and GL uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialRotation {
    matrix: Mat3,
}

impl SpatialRotation {
    pub const IDENTITY: Self = Self {
        matrix: Mat3::IDENTITY,
    };

    pub fn from_mat3(matrix: Mat3) -> Result<Self, PrtError> {
        if !matrix.is_finite() {
            return Err(PrtError::InvalidInput(
                "rotation has non-finite entries".to_string(),
            ));
        }
        let gram = matrix.transpose() * matrix;
        let error = (gram - Mat3::IDENTITY)
            .to_cols_array()
            .iter()
            .fold(0.0f32, |acc, value| acc.max(value.abs()));
        if error > ORTHONORMAL_TOLERANCE {
            return Err(PrtError::InvalidInput(format!(
                "rotation is not orthonormal (deviation {error:e})"
            )));
        }
        if matrix.determinant() < 0.0 {
            return Err(PrtError::InvalidInput(
                "rotation has negative determinant (reflection)".to_string(),
            ));
        }
        Ok(Self { matrix })
    }

    /// Uses the upper 3×3 block; translation has no effect on directions.
    pub fn from_mat4(matrix: Mat4) -> Result<Self, PrtError> {
        Self::from_mat3(Mat3::from_mat4(matrix))
    }

    /// Accepts 9 (3×3) or 16 (4×4) column-major values.
    pub fn from_slice(values: &[f32]) -> Result<Self, PrtError> {
        match values.len() {
            9 => Self::from_mat3(Mat3::from_cols_slice(values)),
            16 => Self::from_mat4(Mat4::from_cols_slice(values)),
            len => Err(PrtError::InvalidInput(format!(
                "rotation needs 9 or 16 values, got {len}"
            ))),
        }
    }

    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Result<Self, PrtError> {
        let axis = axis.try_normalize().ok_or_else(|| {
            PrtError::InvalidInput(format!("rotation axis {axis} is degenerate"))
        })?;
        if !radians.is_finite() {
            return Err(PrtError::InvalidInput(
                "rotation angle is not finite".to_string(),
            ));
        }
        Self::from_mat3(Mat3::from_axis_angle(axis, radians))
    }

    pub fn matrix(&self) -> Mat3 {
        self.matrix
    }

    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }
}

/// `a * b` applies `b` first, then `a`.
impl Mul for SpatialRotation {
    type Output = SpatialRotation;

    fn mul(self, rhs: Self) -> Self::Output {
        SpatialRotation {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

/// Rotation operators for the band-1 and band-2 coefficient subspaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandOperators {
    pub band1: Band1Operator,
    pub band2: Band2Operator,
}

impl BandOperators {
    pub fn identity() -> Self {
        Self {
            band1: Band1Operator::identity(),
            band2: Band2Operator::identity(),
        }
    }
}

pub fn band1_probes() -> [Vec3; 3] {
    [Vec3::X, Vec3::Z, Vec3::Y]
}

pub fn band2_probes() -> [Vec3; 5] {
    let k = FRAC_1_SQRT_2;
    [
        Vec3::X,
        Vec3::Z,
        Vec3::new(k, k, 0.0),
        Vec3::new(k, 0.0, k),
        Vec3::new(0.0, k, k),
    ]
}

/// Matrix whose columns are the band's basis values at each probe direction.
pub fn probe_matrix<const N: usize>(probes: &[Vec3; N]) -> Result<SquareMatrix<N>, PrtError> {
    let mut columns = [[0.0f32; N]; N];
    for (column, dir) in columns.iter_mut().zip(probes.iter()) {
        *column = eval_band::<N>(*dir)?;
    }
    Ok(SquareMatrix::from_columns(columns))
}

/// Operators that carry the coefficients of `f` to those of `f` rotated by `rotation`,
/// i.e. `w -> f(R^T w)`. They compose like the rotations: `op(A * B) = op(A) * op(B)`.
pub fn build_band_operators(rotation: &SpatialRotation) -> Result<BandOperators, PrtError> {
    let rot = rotation.matrix();
    let band1 = compute_band_operator(rot, &band1_probes())?;
    let band2 = compute_band_operator(rot, &band2_probes())?;
    tracing::debug!("built band operators for rotation {:?}", rot.to_cols_array());
    Ok(BandOperators { band1, band2 })
}

fn compute_band_operator<const N: usize>(
    rot: Mat3,
    probes: &[Vec3; N],
) -> Result<SquareMatrix<N>, PrtError> {
    let p_inv = probe_matrix(probes)?.try_inverse()?;

    let rot_inv = rot.transpose();
    let mut rotated = *probes;
    for dir in &mut rotated {
        *dir = rot_inv * *dir;
    }
    let s = probe_matrix(&rotated)?;

    let op = (s * p_inv).transpose();
    if !op.is_finite() {
        return Err(PrtError::Numerical(format!(
            "band operator {N}x{N} has non-finite entries"
        )));
    }
    Ok(op)
}
