use glam::Mat3;
use prt_core::PackedChannelMatrices;

/// std140 block of the three lighting matrices; each `mat3` column is padded to a vec4.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PrtUniforms {
    pub precompute_l_r: [[f32; 4]; 3],
    pub precompute_l_g: [[f32; 4]; 3],
    pub precompute_l_b: [[f32; 4]; 3],
}

impl PrtUniforms {
    pub fn from_packed(packed: &PackedChannelMatrices) -> Self {
        Self {
            precompute_l_r: std140_mat3(packed.red),
            precompute_l_g: std140_mat3(packed.green),
            precompute_l_b: std140_mat3(packed.blue),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl From<&PackedChannelMatrices> for PrtUniforms {
    fn from(packed: &PackedChannelMatrices) -> Self {
        Self::from_packed(packed)
    }
}

fn std140_mat3(mat: Mat3) -> [[f32; 4]; 3] {
    [
        mat.x_axis.extend(0.0).to_array(),
        mat.y_axis.extend(0.0).to_array(),
        mat.z_axis.extend(0.0).to_array(),
    ]
}
