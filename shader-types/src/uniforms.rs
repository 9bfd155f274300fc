//! Per-eye uniform data uploaded to the GPU every frame.
//!
//! # Memory Layout
//!
//! Both structs are `#[repr(C)]` and `Pod`, so they can be copied straight
//! into GPU-visible memory with [`bytemuck`]:
//!
//! | Field | Offset | Size |
//! |-------|--------|------|
//! | `projection_matrix` | 0 | 64 |
//! | `model_view_matrix` | 64 | 64 |
//! | `tangents` | 128 | 16 |
//!
//! `Uniforms` is 144 bytes with 16-byte alignment, which is also the array
//! stride a WGSL or MSL `array<Uniforms, 2>` uses, so [`UniformsArray`] is
//! exactly 288 bytes with no padding between eyes.

use std::mem::{align_of, offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::error::ShaderTypesError;
use crate::indices::Eye;
use crate::projection::ViewTangents;

/// Transform and lens data for one eye.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    /// Eye projection (column-major).
    pub projection_matrix: Mat4,
    /// World-to-eye transform multiplied by the model transform (column-major).
    pub model_view_matrix: Mat4,
    /// Frustum tangents: left, right, top, bottom.
    pub tangents: Vec4,
}

/// Size of [`Uniforms`] in bytes.
pub const UNIFORMS_SIZE: usize = 144;
/// Size of [`UniformsArray`] in bytes.
pub const UNIFORMS_ARRAY_SIZE: usize = 2 * UNIFORMS_SIZE;

static_assertions::const_assert_eq!(size_of::<Uniforms>(), UNIFORMS_SIZE);
static_assertions::const_assert_eq!(align_of::<Uniforms>(), 16);
static_assertions::const_assert_eq!(offset_of!(Uniforms, projection_matrix), 0);
static_assertions::const_assert_eq!(offset_of!(Uniforms, model_view_matrix), 64);
static_assertions::const_assert_eq!(offset_of!(Uniforms, tangents), 128);
static_assertions::assert_impl_all!(Uniforms: Send, Sync);

impl Uniforms {
    /// Identity transforms and zero tangents.
    pub const IDENTITY: Self = Self {
        projection_matrix: Mat4::IDENTITY,
        model_view_matrix: Mat4::IDENTITY,
        tangents: Vec4::ZERO,
    };

    pub fn new(projection_matrix: Mat4, model_view_matrix: Mat4, tangents: Vec4) -> Self {
        Self {
            projection_matrix,
            model_view_matrix,
            tangents,
        }
    }

    /// Build the uniforms for one headset view.
    ///
    /// `view` transforms world space into the eye's space and `model`
    /// places the drawn geometry in the world. The projection is the
    /// reverse-Z off-centre projection of `tangents`.
    pub fn for_view(
        tangents: ViewTangents,
        view: Mat4,
        model: Mat4,
        near: f32,
        far: f32,
    ) -> Result<Self, ShaderTypesError> {
        Ok(Self {
            projection_matrix: tangents.projection(near, far)?,
            model_view_matrix: view * model,
            tangents: tangents.to_vec4(),
        })
    }

    /// View the uniforms as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Both eyes' uniforms in a single binding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct UniformsArray {
    /// Indexed by [`Eye`]: 0 is the left eye, 1 the right eye.
    pub uniforms: [Uniforms; 2],
}

static_assertions::const_assert_eq!(size_of::<UniformsArray>(), UNIFORMS_ARRAY_SIZE);
static_assertions::const_assert_eq!(size_of::<UniformsArray>(), 2 * size_of::<Uniforms>());
static_assertions::const_assert_eq!(align_of::<UniformsArray>(), 16);
static_assertions::assert_impl_all!(UniformsArray: Send, Sync);

impl UniformsArray {
    pub fn new(left: Uniforms, right: Uniforms) -> Self {
        Self {
            uniforms: [left, right],
        }
    }

    /// The same uniforms in both slots.
    ///
    /// Used when the drawable only exposes a single view; the second slot
    /// still has to hold valid data because the binding covers both.
    pub fn mono(uniforms: Uniforms) -> Self {
        Self::new(uniforms, uniforms)
    }

    /// Byte offset of an eye's entry within the array.
    pub const fn offset_of(eye: Eye) -> usize {
        eye as usize * UNIFORMS_SIZE
    }

    pub fn eye(&self, eye: Eye) -> &Uniforms {
        &self.uniforms[eye as usize]
    }

    pub fn eye_mut(&mut self, eye: Eye) -> &mut Uniforms {
        &mut self.uniforms[eye as usize]
    }

    pub fn set_eye(&mut self, eye: Eye, uniforms: Uniforms) {
        self.uniforms[eye as usize] = uniforms;
    }

    /// View the array as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Reinterpret an uploaded byte slice.
    ///
    /// Returns `InvalidParameter` if the slice has the wrong length. The
    /// bytes are copied, so the source alignment does not matter.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ShaderTypesError> {
        if bytes.len() != UNIFORMS_ARRAY_SIZE {
            return Err(ShaderTypesError::InvalidParameter(format!(
                "UniformsArray needs {UNIFORMS_ARRAY_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }
}

impl Default for UniformsArray {
    fn default() -> Self {
        Self::mono(Uniforms::IDENTITY)
    }
}
