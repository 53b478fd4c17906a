/// Default PRT shading program. The uniform block mirrors [`crate::PrtUniforms`] and the
/// transport coefficients arrive as three `vec3` columns per vertex.
pub const PRT_WGSL: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

struct PrtUniforms {
    precompute_l_r: mat3x3<f32>,
    precompute_l_g: mat3x3<f32>,
    precompute_l_b: mat3x3<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(0) @binding(1)
var<uniform> prt: PrtUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) transport_0: vec3<f32>,
    @location(2) transport_1: vec3<f32>,
    @location(3) transport_2: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

fn comp_mult_sum(light: mat3x3<f32>, transport: mat3x3<f32>) -> f32 {
    return dot(light[0], transport[0]) + dot(light[1], transport[1]) + dot(light[2], transport[2]);
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    let transport = mat3x3<f32>(input.transport_0, input.transport_1, input.transport_2);
    var out: VertexOutput;
    out.color = vec3<f32>(
        comp_mult_sum(prt.precompute_l_r, transport),
        comp_mult_sum(prt.precompute_l_g, transport),
        comp_mult_sum(prt.precompute_l_b, transport),
    );
    out.position = camera.view_proj * vec4<f32>(input.position, 1.0);
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(pow(max(input.color, vec3<f32>(0.0)), vec3<f32>(1.0 / 2.2)), 1.0);
}
"#;
