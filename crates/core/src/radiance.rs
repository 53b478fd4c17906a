use crate::packing::PackedChannelMatrices;
use crate::sh::ShVector;
use crate::transfer::ChannelCoefficients;

/// Per-channel dot product of lighting and transport coefficients.
pub fn shade_coefficients(light: &ChannelCoefficients, transport: &ShVector) -> [f32; 3] {
    light.map(|channel| {
        channel
            .iter()
            .zip(transport.iter())
            .map(|(l, t)| l * t)
            .sum::<f32>()
    })
}

/// Same as the shading stage: pack `transport` like the lighting, then sum the
/// component-wise products of the two matrices per channel.
pub fn shade_packed(packed: &PackedChannelMatrices, transport: &ShVector) -> [f32; 3] {
    let transport = packed.layout.pack(transport).to_cols_array();
    packed.channels().map(|light| {
        light
            .to_cols_array()
            .iter()
            .zip(transport.iter())
            .map(|(l, t)| l * t)
            .sum::<f32>()
    })
}

/// Barycentric blend of three corner colors.
pub fn interpolate(corners: &[[f32; 3]; 3], bary: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (corner, weight) in corners.iter().zip(bary) {
        for (value, channel) in out.iter_mut().zip(corner) {
            *value += weight * channel;
        }
    }
    out
}
