use glam::Vec3;

use crate::error::PrtError;

/// Number of basis terms through band 2.
pub const SH_COEFF_COUNT: usize = 9;

/// Truncated (bands 0..=2) SH projection of one channel.
pub type ShVector = [f32; SH_COEFF_COUNT];

#[allow(clippy::excessive_precision)]
const SH_C0: f32 = 0.28209479177387814;
#[allow(clippy::excessive_precision)]
const SH_C1: f32 = 0.4886025119029199;
#[allow(clippy::excessive_precision)]
const SH_C2: [f32; 5] = [
    1.0925484305920792,
    -1.0925484305920792,
    0.31539156525252005,
    -1.0925484305920792,
    0.5462742152960396,
];

/// Index range of a band inside an [`ShVector`], keyed by the band's size.
pub fn band_range(size: usize) -> Result<std::ops::Range<usize>, PrtError> {
    match size {
        1 => Ok(0..1),
        3 => Ok(1..4),
        5 => Ok(4..9),
        _ => Err(PrtError::InvalidInput(format!(
            "unsupported SH band size {size}, expected 1, 3 or 5"
        ))),
    }
}

/// Evaluates all nine basis functions at `dir`. The direction does not need to be unit length.
pub fn eval_basis(dir: Vec3) -> Result<ShVector, PrtError> {
    let dir = normalize_direction(dir)?;
    let l1 = sh_basis_l1(dir);
    let l2 = sh_basis_l2(dir);
    Ok([SH_C0, l1[0], l1[1], l1[2], l2[0], l2[1], l2[2], l2[3], l2[4]])
}

/// Evaluates the basis sub-range of the band with `N` terms (1, 3 or 5) at `dir`.
pub fn eval_band<const N: usize>(dir: Vec3) -> Result<[f32; N], PrtError> {
    let range = band_range(N)?;
    let values = eval_basis(dir)?;
    let mut out = [0.0f32; N];
    out.copy_from_slice(&values[range]);
    Ok(out)
}

fn normalize_direction(dir: Vec3) -> Result<Vec3, PrtError> {
    if !dir.is_finite() {
        return Err(PrtError::InvalidInput(format!(
            "direction {dir} has non-finite components"
        )));
    }
    let len_sq = dir.length_squared();
    if !len_sq.is_normal() {
        return Err(PrtError::InvalidInput(format!(
            "direction {dir} has degenerate length"
        )));
    }
    Ok(dir / len_sq.sqrt())
}

fn sh_basis_l1(dir: Vec3) -> [f32; 3] {
    let x = dir.x;
    let y = dir.y;
    let z = dir.z;
    [-SH_C1 * y, SH_C1 * z, -SH_C1 * x]
}

fn sh_basis_l2(dir: Vec3) -> [f32; 5] {
    let x = dir.x;
    let y = dir.y;
    let z = dir.z;
    [
        SH_C2[0] * x * y,
        SH_C2[1] * y * z,
        SH_C2[2] * (3.0 * z * z - 1.0),
        SH_C2[3] * x * z,
        SH_C2[4] * (x * x - y * y),
    ]
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    use super::*;

    #[test]
    fn dc_term_is_constant() {
        for dir in [Vec3::X, Vec3::NEG_Y, Vec3::new(0.3, -2.0, 5.0)] {
            let values = eval_basis(dir).unwrap();
            assert_abs_diff_eq!(values[0], 0.282_095, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn band_one_follows_axes() {
        let values = eval_basis(Vec3::Z).unwrap();
        assert_abs_diff_eq!(values[1], 0.0, epsilon = 1.0e-6);
        assert_abs_diff_eq!(values[2], 0.488_603, epsilon = 1.0e-6);
        assert_abs_diff_eq!(values[3], 0.0, epsilon = 1.0e-6);

        let values = eval_basis(Vec3::X).unwrap();
        assert_abs_diff_eq!(values[3], -0.488_603, epsilon = 1.0e-6);
        let values = eval_basis(Vec3::Y).unwrap();
        assert_abs_diff_eq!(values[1], -0.488_603, epsilon = 1.0e-6);
    }

    #[test]
    fn band_two_signs() {
        let k = std::f32::consts::FRAC_1_SQRT_2;
        let values = eval_basis(Vec3::new(0.0, k, k)).unwrap();
        assert_abs_diff_eq!(values[5], -0.546_274, epsilon = 1.0e-5);
        let values = eval_basis(Vec3::new(k, 0.0, k)).unwrap();
        assert_abs_diff_eq!(values[7], -0.546_274, epsilon = 1.0e-5);
        let values = eval_basis(Vec3::new(k, k, 0.0)).unwrap();
        assert_abs_diff_eq!(values[4], 0.546_274, epsilon = 1.0e-5);
        assert_abs_diff_eq!(values[6], -0.315_392, epsilon = 1.0e-5);
    }

    #[test]
    fn non_unit_directions_are_normalized() {
        let unit = eval_basis(Vec3::new(1.0, 2.0, -2.0).normalize()).unwrap();
        let scaled = eval_basis(Vec3::new(3.0, 6.0, -6.0)).unwrap();
        for (a, b) in unit.iter().zip(scaled.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn band_slices_match_full_vector() {
        let dir = Vec3::new(0.2, -0.5, 0.8);
        let full = eval_basis(dir).unwrap();
        assert_eq!(eval_band::<1>(dir).unwrap(), [full[0]]);
        assert_eq!(eval_band::<3>(dir).unwrap(), [full[1], full[2], full[3]]);
        assert_eq!(eval_band::<5>(dir).unwrap()[..], full[4..9]);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            eval_basis(Vec3::ZERO),
            Err(PrtError::InvalidInput(_))
        ));
        assert!(matches!(
            eval_basis(Vec3::new(f32::NAN, 0.0, 1.0)),
            Err(PrtError::InvalidInput(_))
        ));
        assert!(matches!(
            eval_band::<4>(Vec3::X),
            Err(PrtError::InvalidInput(_))
        ));
    }
}
