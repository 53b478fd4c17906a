use glam::Mat3;
use serde::{Deserialize, Serialize};

use crate::error::PrtError;
use crate::sh::ShVector;
use crate::transfer::{ChannelCoefficients, PrecomputedTransfer};

/// How nine coefficients are laid into a 3×3 matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingLayout {
    /// Entry (row i, col j) = coefficient `3j + i`. The column-major flat array of the
    /// matrix is the coefficient order, which is what a `mat3` uniform upload expects.
    #[default]
    ColumnMajor,
    /// Transpose of [`PackingLayout::ColumnMajor`]: entry (i, j) = coefficient `3i + j`.
    RowMajor,
}

impl PackingLayout {
    pub fn pack(self, coeffs: &ShVector) -> Mat3 {
        let mat = Mat3::from_cols_array(coeffs);
        match self {
            PackingLayout::ColumnMajor => mat,
            PackingLayout::RowMajor => mat.transpose(),
        }
    }

    pub fn unpack(self, mat: Mat3) -> ShVector {
        match self {
            PackingLayout::ColumnMajor => mat.to_cols_array(),
            PackingLayout::RowMajor => mat.transpose().to_cols_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedChannelMatrices {
    pub red: Mat3,
    pub green: Mat3,
    pub blue: Mat3,
    pub layout: PackingLayout,
}

impl PackedChannelMatrices {
    pub fn channels(&self) -> [Mat3; 3] {
        [self.red, self.green, self.blue]
    }

    /// Recovers the coefficient vectors the matrices were packed from.
    pub fn coefficients(&self) -> ChannelCoefficients {
        self.channels().map(|mat| self.layout.unpack(mat))
    }
}

pub fn pack_entry(channels: &ChannelCoefficients, layout: PackingLayout) -> PackedChannelMatrices {
    PackedChannelMatrices {
        red: layout.pack(&channels[0]),
        green: layout.pack(&channels[1]),
        blue: layout.pack(&channels[2]),
        layout,
    }
}

/// Packs the entry selected by `index`; the index is always an explicit argument.
pub fn pack_channels(
    transfer: &PrecomputedTransfer,
    index: usize,
    layout: PackingLayout,
) -> Result<PackedChannelMatrices, PrtError> {
    let channels = transfer.get(index)?;
    Ok(pack_entry(channels, layout))
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn sample_transfer() -> PrecomputedTransfer {
        let mut red = [0.0f32; 9];
        let mut green = [0.0f32; 9];
        let mut blue = [0.0f32; 9];
        for k in 0..9 {
            red[k] = k as f32;
            green[k] = 10.0 + k as f32;
            blue[k] = 20.0 + k as f32;
        }
        PrecomputedTransfer::new(vec![[[0.5; 9]; 3], [red, green, blue]]).unwrap()
    }

    #[test]
    fn column_major_is_the_upload_layout() {
        let packed = pack_channels(&sample_transfer(), 1, PackingLayout::ColumnMajor).unwrap();
        assert_eq!(
            packed.red.to_cols_array(),
            [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
        assert_eq!(packed.green.col(0), Vec3::new(10.0, 11.0, 12.0));
        assert_eq!(packed.blue.row(0), Vec3::new(20.0, 23.0, 26.0));
    }

    #[test]
    fn row_major_is_the_transpose() {
        let transfer = sample_transfer();
        let col = pack_channels(&transfer, 1, PackingLayout::ColumnMajor).unwrap();
        let row = pack_channels(&transfer, 1, PackingLayout::RowMajor).unwrap();
        assert_eq!(row.red, col.red.transpose());
        assert_eq!(row.red.row(0), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(row.coefficients(), col.coefficients());
        assert_eq!(row.coefficients(), *transfer.get(1).unwrap());
    }

    #[test]
    fn packing_is_idempotent() {
        let transfer = sample_transfer();
        let first = pack_channels(&transfer, 1, PackingLayout::ColumnMajor).unwrap();
        let second = pack_channels(&transfer, 1, PackingLayout::ColumnMajor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn environment_index_selects_the_entry() {
        let transfer = sample_transfer();
        let packed = pack_channels(&transfer, 0, PackingLayout::ColumnMajor).unwrap();
        assert_eq!(packed.blue.to_cols_array(), [0.5; 9]);
        assert_eq!(
            pack_channels(&transfer, 2, PackingLayout::RowMajor).unwrap_err(),
            PrtError::MissingEntry { index: 2, len: 2 }
        );
    }

    #[test]
    fn layout_serializes_as_snake_case() {
        let json = serde_json::to_string(&PackingLayout::RowMajor).unwrap();
        assert_eq!(json, "\"row_major\"");
        let layout: PackingLayout = serde_json::from_str("\"column_major\"").unwrap();
        assert_eq!(layout, PackingLayout::ColumnMajor);
    }
}
