use prt_core::PackedChannelMatrices;

use crate::shaders::PRT_WGSL;
use crate::uniforms::PrtUniforms;

pub const UNIFORM_NAMES: [&str; 3] = ["uPrecomputeLR", "uPrecomputeLG", "uPrecomputeLB"];
pub const TRANSPORT_ATTRIBUTE: &str = "aPrecomputeLT";

/// Shader text handed through to the graphics backend untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSource {
    /// The bundled WGSL module holds both entry points.
    fn default() -> Self {
        Self {
            vertex: PRT_WGSL.to_string(),
            fragment: PRT_WGSL.to_string(),
        }
    }
}

/// Material whose lighting uniforms are refreshed every time the rotation changes.
#[derive(Debug, Clone)]
pub struct PrtMaterial {
    shaders: ShaderSource,
    packed: Option<PackedChannelMatrices>,
}

impl PrtMaterial {
    pub fn new(shaders: ShaderSource) -> Self {
        Self {
            shaders,
            packed: None,
        }
    }

    pub fn shaders(&self) -> &ShaderSource {
        &self.shaders
    }

    pub fn attributes(&self) -> &'static [&'static str] {
        &[TRANSPORT_ATTRIBUTE]
    }

    pub fn update(&mut self, packed: &PackedChannelMatrices) {
        tracing::trace!("prt material uniforms updated");
        self.packed = Some(*packed);
    }

    pub fn is_ready(&self) -> bool {
        self.packed.is_some()
    }

    /// `(name, column-major mat3)` triples, ready for a `uniformMatrix3fv` style upload.
    pub fn uniform_values(&self) -> Option<[(&'static str, [f32; 9]); 3]> {
        let packed = self.packed?;
        let [red, green, blue] = packed.channels();
        Some([
            (UNIFORM_NAMES[0], red.to_cols_array()),
            (UNIFORM_NAMES[1], green.to_cols_array()),
            (UNIFORM_NAMES[2], blue.to_cols_array()),
        ])
    }

    pub fn uniform_block(&self) -> Option<PrtUniforms> {
        self.packed.as_ref().map(PrtUniforms::from_packed)
    }
}
