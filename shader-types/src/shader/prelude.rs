//! WGSL declarations generated from the host definitions.
//!
//! The prelude is the shader-side copy of the interface: one `const` per
//! index, the `Uniforms` and `UniformsArray` structs, and one `override` per
//! function constant component. Shaders pull it in with
//! `#include "alvr/shader_types.wgsl"` instead of declaring any of it by
//! hand.

use crate::constants::FunctionConstantValues;
use crate::function_constant::{ConstantKind, FunctionConstant};
use crate::indices::{BufferIndex, Eye, TextureIndex, VertexAttribute};

/// Include path that resolves to the prelude.
pub const SHADER_TYPES_INCLUDE: &str = "alvr/shader_types.wgsl";

/// WGSL struct name and fields of [`Uniforms`](crate::Uniforms), with the
/// byte offset each field has on the host.
pub(crate) const UNIFORMS_FIELDS: [(&str, &str, u32); 3] = [
    ("projection_matrix", "mat4x4<f32>", 0),
    ("model_view_matrix", "mat4x4<f32>", 64),
    ("tangents", "vec4<f32>", 128),
];

/// Every index constant as `(name, value)`, in declaration order.
pub fn index_constants() -> Vec<(&'static str, i32)> {
    let buffers = BufferIndex::ALL.iter().map(|v| (v.name(), v.index()));
    let attributes = VertexAttribute::ALL.iter().map(|v| (v.name(), v.index()));
    let textures = TextureIndex::ALL.iter().map(|v| (v.name(), v.index()));
    let eyes = Eye::ALL.iter().map(|v| (v.name(), v.index()));
    buffers.chain(attributes).chain(textures).chain(eyes).collect()
}

/// Prelude with every override defaulting to zero (foveation disabled).
pub fn wgsl_prelude() -> String {
    wgsl_prelude_with(&FunctionConstantValues::new())
}

/// Prelude with override defaults taken from `values`.
///
/// Constants missing from `values` default to zero. The defaults only matter
/// when the pipeline does not override them.
pub fn wgsl_prelude_with(values: &FunctionConstantValues) -> String {
    let mut out = String::new();
    out.push_str("// Generated by alvr-shader-types. Do not edit.\n\n");

    for (name, value) in index_constants() {
        out.push_str(&format!("const {name}: i32 = {value};\n"));
    }

    out.push_str("\nstruct Uniforms {\n");
    for (field, ty, _) in UNIFORMS_FIELDS {
        out.push_str(&format!("    {field}: {ty},\n"));
    }
    out.push_str("}\n\n");
    out.push_str("struct UniformsArray {\n    uniforms: array<Uniforms, 2>,\n}\n\n");

    for constant in FunctionConstant::ALL {
        let value = values.get_or_zero(constant);
        let ty = constant.value_kind().shader_type();
        let names = constant.component_names();
        let literals = value.wgsl_literals();

        for (i, (name, literal)) in names.iter().zip(literals.iter()).enumerate() {
            // Only the first component carries the identifier.
            if i == 0 {
                out.push_str(&format!(
                    "@id({}) override {name}: {ty} = {literal};\n",
                    constant.override_id()
                ));
            } else {
                out.push_str(&format!("override {name}: {ty} = {literal};\n"));
            }
        }
    }

    out
}

/// WGSL expression rebuilding a two-component constant from its overrides,
/// e.g. `vec2<f32>(ffr_common_shader_center_size_x, ffr_common_shader_center_size_y)`.
///
/// Returns the bare override name for scalar constants.
pub fn vector_expression(constant: FunctionConstant) -> String {
    let names = constant.component_names();
    match constant.value_kind() {
        ConstantKind::Bool => names.join(""),
        kind => format!("vec2<{}>({})", kind.shader_type(), names.join(", ")),
    }
}
