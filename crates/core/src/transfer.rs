use crate::error::PrtError;
use crate::parallel::{map_indexed, try_for_each_indexed};
use crate::rotation::BandOperators;
use crate::sh::{ShVector, SH_COEFF_COUNT};

pub const CHANNEL_COUNT: usize = 3;

/// One coefficient vector per color channel, in R, G, B order.
pub type ChannelCoefficients = [ShVector; CHANNEL_COUNT];

/// Per-vertex (or per-environment-slot) RGB transfer coefficients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecomputedTransfer {
    entries: Vec<ChannelCoefficients>,
}

impl PrecomputedTransfer {
    pub fn new(entries: Vec<ChannelCoefficients>) -> Result<Self, PrtError> {
        try_for_each_indexed(&entries, |idx, channels| {
            if channels.iter().flatten().all(|value| value.is_finite()) {
                Ok(())
            } else {
                Err(PrtError::InvalidInput(format!(
                    "transfer entry {idx} has non-finite coefficients"
                )))
            }
        })?;
        Ok(Self { entries })
    }

    /// Builds a transfer from `[r, g, b]` slices per entry; each slice must hold nine terms.
    pub fn from_slices(entries: &[[&[f32]; CHANNEL_COUNT]]) -> Result<Self, PrtError> {
        let mut out = Vec::with_capacity(entries.len());
        for channels in entries {
            out.push([
                sh_vector_from_slice(channels[0])?,
                sh_vector_from_slice(channels[1])?,
                sh_vector_from_slice(channels[2])?,
            ]);
        }
        Self::new(out)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&ChannelCoefficients, PrtError> {
        self.entries.get(index).ok_or(PrtError::MissingEntry {
            index,
            len: self.entries.len(),
        })
    }

    pub fn entries(&self) -> &[ChannelCoefficients] {
        &self.entries
    }

    /// Returns a rotated copy; `self` is left untouched.
    pub fn rotated(&self, ops: &BandOperators) -> PrecomputedTransfer {
        let entries = map_indexed(&self.entries, |_, channels| rotate_channels(ops, channels));
        PrecomputedTransfer { entries }
    }
}

pub fn sh_vector_from_slice(values: &[f32]) -> Result<ShVector, PrtError> {
    values
        .try_into()
        .map_err(|_| PrtError::DimensionMismatch {
            expected: SH_COEFF_COUNT,
            actual: values.len(),
        })
}

/// Band 0 is copied, bands 1 and 2 are left-multiplied by their operators.
pub fn rotate_coefficients(ops: &BandOperators, coeffs: &ShVector) -> ShVector {
    let band1 = ops.band1.mul_vec(&[coeffs[1], coeffs[2], coeffs[3]]);
    let band2 = ops
        .band2
        .mul_vec(&[coeffs[4], coeffs[5], coeffs[6], coeffs[7], coeffs[8]]);
    [
        coeffs[0], band1[0], band1[1], band1[2], band2[0], band2[1], band2[2], band2[3],
        band2[4],
    ]
}

pub fn rotate_channels(ops: &BandOperators, channels: &ChannelCoefficients) -> ChannelCoefficients {
    [
        rotate_coefficients(ops, &channels[0]),
        rotate_coefficients(ops, &channels[1]),
        rotate_coefficients(ops, &channels[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::SquareMatrix;

    fn ramp(offset: f32) -> ShVector {
        let mut out = [0.0f32; SH_COEFF_COUNT];
        for (idx, value) in out.iter_mut().enumerate() {
            *value = offset + idx as f32;
        }
        out
    }

    #[test]
    fn identity_operators_leave_coefficients_alone() {
        let coeffs = ramp(1.0);
        assert_eq!(rotate_coefficients(&BandOperators::identity(), &coeffs), coeffs);
    }

    #[test]
    fn bands_are_routed_to_their_operators() {
        let ops = BandOperators {
            band1: SquareMatrix::from_rows([[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            band2: SquareMatrix::from_rows([[0.0; 5]; 5]),
        };
        let out = rotate_coefficients(&ops, &ramp(0.0));
        assert_eq!(out, [0.0, 3.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn rotated_does_not_mutate_input() {
        let transfer = PrecomputedTransfer::new(vec![[ramp(0.0), ramp(1.0), ramp(2.0)]]).unwrap();
        let before = transfer.clone();
        let ops = BandOperators {
            band1: SquareMatrix::from_rows([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]),
            band2: SquareMatrix::identity(),
        };
        let rotated = transfer.rotated(&ops);
        assert_eq!(transfer, before);
        assert_eq!(rotated.get(0).unwrap()[2][1], 6.0);
        assert_eq!(rotated.get(0).unwrap()[2][0], 2.0);
    }

    #[test]
    fn slices_must_hold_nine_terms() {
        let short = [0.0f32; 8];
        let full = [0.0f32; 9];
        let err = PrecomputedTransfer::from_slices(&[[&full[..], &short[..], &full[..]]]).unwrap_err();
        assert_eq!(
            err,
            PrtError::DimensionMismatch {
                expected: 9,
                actual: 8
            }
        );
        assert!(err.is_dimension_mismatch());
        assert!(PrecomputedTransfer::from_slices(&[[&full[..], &full[..], &full[..]]]).is_ok());
    }

    #[test]
    fn absent_index_is_reported() {
        let transfer = PrecomputedTransfer::new(vec![[ramp(0.0); 3]]).unwrap();
        let err = transfer.get(4).unwrap_err();
        assert_eq!(err, PrtError::MissingEntry { index: 4, len: 1 });
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn non_finite_coefficients_are_rejected() {
        let mut bad = ramp(0.0);
        bad[6] = f32::INFINITY;
        let result = PrecomputedTransfer::new(vec![[ramp(0.0), bad, ramp(0.0)]]);
        assert!(matches!(result, Err(PrtError::InvalidInput(_))));
    }
}
