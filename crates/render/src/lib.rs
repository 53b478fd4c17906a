mod material;
mod shaders;
mod uniforms;

pub use material::{PrtMaterial, ShaderSource, TRANSPORT_ATTRIBUTE, UNIFORM_NAMES};
pub use shaders::PRT_WGSL;
pub use uniforms::PrtUniforms;
