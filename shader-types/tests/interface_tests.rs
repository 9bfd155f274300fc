//! Integration tests for the host/shader interface.
//!
//! These tests check the three places the interface can drift:
//!
//! - **Layout**: the WGSL generated for `Uniforms` / `UniformsArray` must have
//!   the same size and field offsets as the Rust structs, as computed by naga.
//! - **Upload**: bytes written through the staging ring must land at the
//!   offsets the shader reads.
//! - **Specialization**: foveation parameters must reach the shader as
//!   correctly identified overrides.

use std::mem::size_of;

use alvr_shader_types::shader::{self, ShaderComposer, STEREO_QUAD_SHADER};
use alvr_shader_types::{
    calculate_foveation_vars, BufferIndex, Eye, FoveationSettings, FunctionConstant,
    FunctionConstantValues, ShaderTypesError, TextureIndex, UniformRing, Uniforms, UniformsArray,
    VertexAttribute,
};
use glam::{Mat4, Vec4};
use rstest::rstest;

fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn prelude_module() -> naga::Module {
    naga::front::wgsl::parse_str(&shader::wgsl_prelude()).unwrap()
}

fn patterned_matrix() -> Mat4 {
    let mut cols = [0.0f32; 16];
    for (i, v) in cols.iter_mut().enumerate() {
        *v = (i as f32 + 1.0) * 0.5;
    }
    Mat4::from_cols_array(&cols)
}

// ============================================================================
// Layout
// ============================================================================

#[rstest]
#[case::uniforms("Uniforms", size_of::<Uniforms>())]
#[case::uniforms_array("UniformsArray", size_of::<UniformsArray>())]
fn test_generated_struct_size_matches_host(#[case] name: &str, #[case] host_size: usize) {
    let reflection = shader::reflect(&prelude_module());
    let declared = reflection.find_struct(name).unwrap();
    assert_eq!(declared.span as usize, host_size);
}

#[test]
fn test_generated_uniforms_offsets_match_host() {
    let reflection = shader::reflect(&prelude_module());
    let offsets: Vec<(String, u32)> = reflection.find_struct("Uniforms").unwrap().members.clone();

    assert_eq!(
        offsets,
        vec![
            (
                "projection_matrix".to_string(),
                std::mem::offset_of!(Uniforms, projection_matrix) as u32
            ),
            (
                "model_view_matrix".to_string(),
                std::mem::offset_of!(Uniforms, model_view_matrix) as u32
            ),
            (
                "tangents".to_string(),
                std::mem::offset_of!(Uniforms, tangents) as u32
            ),
        ]
    );
}

#[rstest]
#[case::mesh_positions(BufferIndex::MeshPositions.name(), 0)]
#[case::mesh_generics(BufferIndex::MeshGenerics.name(), 1)]
#[case::uniforms(BufferIndex::Uniforms.name(), 2)]
#[case::position(VertexAttribute::Position.name(), 0)]
#[case::texcoord(VertexAttribute::Texcoord.name(), 1)]
#[case::color(TextureIndex::Color.name(), 0)]
#[case::left(Eye::Left.name(), 0)]
#[case::right(Eye::Right.name(), 1)]
fn test_generated_index_constants(#[case] name: &str, #[case] value: i64) {
    let reflection = shader::reflect(&prelude_module());
    assert_eq!(reflection.find_constant(name), Some(value));
}

#[rstest]
#[case::enabled(FunctionConstant::FfrEnabled, "ffr_enabled", 100)]
#[case::target(
    FunctionConstant::FfrCommonShaderTargetResolution,
    "ffr_common_shader_target_resolution_x",
    101
)]
#[case::optimized(
    FunctionConstant::FfrCommonShaderOptimizedResolution,
    "ffr_common_shader_optimized_resolution_x",
    102
)]
#[case::eye_size_ratio(
    FunctionConstant::FfrCommonShaderEyeSizeRatio,
    "ffr_common_shader_eye_size_ratio_x",
    103
)]
#[case::center_size(
    FunctionConstant::FfrCommonShaderCenterSize,
    "ffr_common_shader_center_size_x",
    104
)]
#[case::center_shift(
    FunctionConstant::FfrCommonShaderCenterShift,
    "ffr_common_shader_center_shift_x",
    105
)]
#[case::edge_ratio(
    FunctionConstant::FfrCommonShaderEdgeRatio,
    "ffr_common_shader_edge_ratio_x",
    106
)]
fn test_generated_override_ids(
    #[case] constant: FunctionConstant,
    #[case] name: &str,
    #[case] id: u16,
) {
    assert_eq!(constant.override_id(), id);
    assert_eq!(constant.component_names()[0], name);

    let reflection = shader::reflect(&prelude_module());
    assert_eq!(reflection.find_override(name).unwrap().id, Some(id));
}

#[test]
fn test_hand_written_mismatch_is_rejected() {
    init_logging();

    let source = r#"
struct Uniforms {
    tangents: vec4<f32>,
    projection_matrix: mat4x4<f32>,
    model_view_matrix: mat4x4<f32>,
}

const EYE_RIGHT: i32 = 0;
"#;
    let composer = ShaderComposer::new();
    let err = composer.compose_verified(source).unwrap_err();
    let ShaderTypesError::InterfaceMismatch(message) = err else {
        panic!("expected an interface mismatch, got {err:?}");
    };
    assert!(message.contains("struct Uniforms members"));
    assert!(message.contains("EYE_RIGHT is 0, host has 1"));
}

// ============================================================================
// Upload
// ============================================================================

#[rstest]
#[case::single_buffered(1)]
#[case::double_buffered(2)]
#[case::triple_buffered(3)]
fn test_ring_round_trip(#[case] frames_in_flight: u32) {
    let mut ring = UniformRing::new(frames_in_flight).unwrap();

    let left = Uniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec4::ZERO);
    let right = Uniforms::new(
        patterned_matrix(),
        patterned_matrix().transpose(),
        Vec4::new(1.0, 1.5, 0.75, 1.25),
    );
    let uniforms = UniformsArray::new(left, right);

    for _ in 0..frames_in_flight + 1 {
        let offset = ring.advance() as usize;
        assert_eq!(offset % 256, 0);
        ring.write(&uniforms);

        let slot = &ring.as_bytes()[offset..offset + size_of::<UniformsArray>()];
        let left_at = UniformsArray::offset_of(Eye::Left);
        let right_at = UniformsArray::offset_of(Eye::Right);
        assert_eq!(left_at, 0);
        assert_eq!(right_at, 144);
        assert_eq!(&slot[left_at..left_at + 144], left.as_bytes());
        assert_eq!(&slot[right_at..right_at + 144], right.as_bytes());

        assert_eq!(ring.current(), uniforms);
        assert_eq!(UniformsArray::from_bytes(slot).unwrap(), uniforms);
    }
}

// ============================================================================
// Specialization
// ============================================================================

#[rstest]
#[case::disabled(None)]
#[case::aligned(Some(FoveationSettings {
    center_size_x: 0.5,
    center_size_y: 0.25,
    center_shift_x: 0.5,
    center_shift_y: 0.25,
    edge_ratio_x: 4.0,
    edge_ratio_y: 2.0,
}))]
#[case::snapped(Some(FoveationSettings {
    center_size_x: 0.45,
    center_size_y: 0.4,
    center_shift_x: 0.4,
    center_shift_y: 0.1,
    edge_ratio_x: 3.0,
    edge_ratio_y: 5.0,
}))]
fn test_foveation_reaches_shader(#[case] settings: Option<FoveationSettings>) {
    init_logging();

    let vars = calculate_foveation_vars(1888, 1792, settings.as_ref()).unwrap();
    let values = FunctionConstantValues::from_foveation(&vars);
    assert_eq!(values.len(), FunctionConstant::ALL.len());

    let composer = ShaderComposer::with_interface_values(&values);
    let module = composer.compose_verified(STEREO_QUAD_SHADER).unwrap();

    // Every scalar in the pipeline constant map names an override of the
    // composed module.
    let constants = values.to_pipeline_constants();
    let reflection = shader::reflect(&module);
    for name in constants.keys() {
        assert!(
            reflection.find_override(name).is_some(),
            "{name} is not declared by the shader"
        );
    }
    assert_eq!(
        constants["ffr_enabled"],
        if settings.is_some() { 1.0 } else { 0.0 }
    );
}

#[test]
fn test_foveation_from_streamer_json() {
    let json = r#"{
        "center_size_x": 0.5,
        "center_size_y": 0.25,
        "center_shift_x": 0.5,
        "center_shift_y": 0.25,
        "edge_ratio_x": 4.0,
        "edge_ratio_y": 2.0
    }"#;

    let settings = FoveationSettings::from_json(json).unwrap();
    let vars = calculate_foveation_vars(1920, 1824, Some(&settings)).unwrap();
    let constants = FunctionConstantValues::from_foveation(&vars).to_pipeline_constants();

    assert_eq!(constants["ffr_common_shader_optimized_resolution_x"], 1216.0);
    assert_eq!(constants["ffr_common_shader_optimized_resolution_y"], 1152.0);
}
