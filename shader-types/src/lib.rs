//! # ALVR Shader Types
//!
//! The interface shared by the visionOS streaming client's host code and its
//! shaders: binding indices, per-eye uniforms and foveated rendering
//! function constants.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`BufferIndex`], [`VertexAttribute`], [`TextureIndex`], [`Eye`] - binding slots
//! - [`Uniforms`] / [`UniformsArray`] - fixed-layout per-eye uniform data
//! - [`FunctionConstant`] and [`FunctionConstantValues`] - pipeline specialization
//! - [`foveation`] - fixed foveated rendering parameters from streamer settings
//! - [`shader`] - generated WGSL prelude, include resolution and interface checks
//! - [`wgpu_support`] - wgpu descriptors (feature `wgpu-backend`)
//!
//! The Rust definitions are the single source of truth. Shader code gets the
//! same declarations from [`shader::wgsl_prelude`], and
//! [`shader::verify_interface`] rejects shaders that disagree with them.
//!
//! ## Example
//!
//! ```ignore
//! use alvr_shader_types::*;
//!
//! let settings = FoveationSettings::from_json(&json)?;
//! let vars = calculate_foveation_vars(1920, 1824, Some(&settings))?;
//! let constants = FunctionConstantValues::from_foveation(&vars);
//!
//! let composer = ShaderComposer::with_interface_values(&constants);
//! let module = composer.compose_verified(SHADER_SOURCE)?;
//!
//! let mut ring = UniformRing::new(UniformRing::DEFAULT_FRAMES_IN_FLIGHT)?;
//! let offset = ring.advance();
//! ring.write(&UniformsArray::new(left, right));
//! ```

pub mod constants;
pub mod error;
pub mod foveation;
pub mod function_constant;
pub mod indices;
pub mod layout;
pub mod projection;
pub mod ring_buffer;
pub mod shader;
pub mod uniforms;

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_support;

// Re-export main types for convenience
pub use constants::{FunctionConstantValue, FunctionConstantValues};
pub use error::ShaderTypesError;
pub use foveation::{calculate_foveation_vars, FoveationSettings, FoveationVars};
pub use function_constant::{ConstantKind, FunctionConstant};
pub use indices::{BufferIndex, Eye, TextureIndex, VertexAttribute};
pub use layout::{BindingLayout, VertexLayout};
pub use projection::ViewTangents;
pub use ring_buffer::UniformRing;
pub use shader::{verify_interface, wgsl_prelude, ShaderComposer};
pub use uniforms::{Uniforms, UniformsArray, UNIFORMS_ARRAY_SIZE, UNIFORMS_SIZE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version.
pub fn init() {
    log::info!("ALVR shader types v{} initialized", VERSION);
}
