//! Vertex and binding layouts of the stream rendering pipeline.
//!
//! Vertex data is split across two buffers, keyed by [`BufferIndex`]:
//!
//! - `MeshPositions`: float3 position, stride 12
//! - `MeshGenerics`: float2 texture coordinate, stride 8
//!
//! Both advance per vertex. Resource bindings are split into two bind groups:
//! group [`BUFFER_BIND_GROUP`] holds buffers (binding number = `BufferIndex`)
//! and group [`TEXTURE_BIND_GROUP`] holds textures (binding number =
//! `TextureIndex`).
//!
//! # Example
//!
//! ```ignore
//! let layout = VertexLayout::stream_quad();
//! layout.validate()?;
//! for buffer in &layout.buffers {
//!     let attrs: Vec<_> = layout.attributes_for_buffer(buffer.buffer).collect();
//!     // ...
//! }
//! ```

use std::mem::size_of;

use crate::error::ShaderTypesError;
use crate::indices::{BufferIndex, TextureIndex, VertexAttribute};
use crate::uniforms::UniformsArray;

/// Bind group holding every [`BufferIndex`] binding.
pub const BUFFER_BIND_GROUP: u32 = 0;
/// Bind group holding every [`TextureIndex`] binding and the color sampler.
pub const TEXTURE_BIND_GROUP: u32 = 1;
/// Binding of the color sampler within [`TEXTURE_BIND_GROUP`].
///
/// Placed right after the last texture slot.
pub const COLOR_SAMPLER_BINDING: u32 = TextureIndex::Color.slot() + 1;

/// Format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
}

impl VertexAttributeFormat {
    /// Size in bytes of this format.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
        }
    }

    /// Matching WGSL vertex input type.
    pub fn wgsl_type(&self) -> &'static str {
        match self {
            Self::Float2 => "vec2<f32>",
            Self::Float3 => "vec3<f32>",
        }
    }
}

/// How a vertex buffer advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexStepMode {
    #[default]
    Vertex,
    Instance,
}

/// Describes a single vertex buffer binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexBufferLayout {
    /// Slot this buffer is bound to.
    pub buffer: BufferIndex,
    /// Stride in bytes between consecutive elements.
    pub stride: u32,
    pub step_mode: VertexStepMode,
}

impl VertexBufferLayout {
    /// Create a per-vertex buffer layout.
    pub fn new(buffer: BufferIndex, stride: u32) -> Self {
        Self {
            buffer,
            stride,
            step_mode: VertexStepMode::Vertex,
        }
    }
}

/// A single vertex attribute description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttributeLayout {
    /// Attribute slot (shader location).
    pub attribute: VertexAttribute,
    pub format: VertexAttributeFormat,
    /// Byte offset within one element of the buffer.
    pub offset: u32,
    /// Buffer this attribute reads from.
    pub buffer: BufferIndex,
}

impl VertexAttributeLayout {
    pub fn new(
        attribute: VertexAttribute,
        format: VertexAttributeFormat,
        offset: u32,
        buffer: BufferIndex,
    ) -> Self {
        Self {
            attribute,
            format,
            offset,
            buffer,
        }
    }

    /// Float3 position at offset 0 of `MeshPositions`.
    pub fn position() -> Self {
        Self::new(
            VertexAttribute::Position,
            VertexAttributeFormat::Float3,
            0,
            BufferIndex::MeshPositions,
        )
    }

    /// Float2 texture coordinate at offset 0 of `MeshGenerics`.
    pub fn texcoord() -> Self {
        Self::new(
            VertexAttribute::Texcoord,
            VertexAttributeFormat::Float2,
            0,
            BufferIndex::MeshGenerics,
        )
    }

    /// Shader location of this attribute.
    pub fn shader_location(&self) -> u32 {
        self.attribute.slot()
    }
}

/// Layout of vertex data across one or more buffers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    pub buffers: Vec<VertexBufferLayout>,
    pub attributes: Vec<VertexAttributeLayout>,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex buffer binding.
    pub fn with_buffer(mut self, buffer: VertexBufferLayout) -> Self {
        self.buffers.push(buffer);
        self
    }

    /// Add a vertex attribute.
    pub fn with_attribute(mut self, attribute: VertexAttributeLayout) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The layout of the stream quad: positions and texture coordinates in
    /// separate per-vertex buffers.
    pub fn stream_quad() -> Self {
        Self::new()
            .with_buffer(VertexBufferLayout::new(BufferIndex::MeshPositions, 12))
            .with_buffer(VertexBufferLayout::new(BufferIndex::MeshGenerics, 8))
            .with_attribute(VertexAttributeLayout::position())
            .with_attribute(VertexAttributeLayout::texcoord())
            .with_label("stream_quad")
    }

    pub fn buffer(&self, buffer: BufferIndex) -> Option<&VertexBufferLayout> {
        self.buffers.iter().find(|b| b.buffer == buffer)
    }

    /// Stride of a buffer, or 0 if the buffer is not part of this layout.
    pub fn buffer_stride(&self, buffer: BufferIndex) -> u32 {
        self.buffer(buffer).map(|b| b.stride).unwrap_or(0)
    }

    pub fn get_attribute(&self, attribute: VertexAttribute) -> Option<&VertexAttributeLayout> {
        self.attributes.iter().find(|a| a.attribute == attribute)
    }

    /// All attributes reading from a specific buffer.
    pub fn attributes_for_buffer(
        &self,
        buffer: BufferIndex,
    ) -> impl Iterator<Item = &VertexAttributeLayout> {
        self.attributes.iter().filter(move |a| a.buffer == buffer)
    }

    /// Check that every attribute references a defined buffer and fits
    /// within its stride, and that no buffer or attribute slot is used twice.
    pub fn validate(&self) -> Result<(), ShaderTypesError> {
        for (i, buffer) in self.buffers.iter().enumerate() {
            if self.buffers[..i].iter().any(|b| b.buffer == buffer.buffer) {
                return Err(ShaderTypesError::InvalidParameter(format!(
                    "buffer {} defined more than once",
                    buffer.buffer
                )));
            }
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            let Some(buffer) = self.buffer(attr.buffer) else {
                return Err(ShaderTypesError::InvalidParameter(format!(
                    "attribute {} references buffer {} but it is not defined",
                    attr.attribute, attr.buffer
                )));
            };
            let end = attr.offset.checked_add(attr.format.size());
            if end.map_or(true, |end| end > buffer.stride) {
                return Err(ShaderTypesError::InvalidParameter(format!(
                    "attribute {} at offset {} ({} bytes) runs past the stride {} of buffer {}",
                    attr.attribute,
                    attr.offset,
                    attr.format.size(),
                    buffer.stride,
                    attr.buffer
                )));
            }
            if self.attributes[..i]
                .iter()
                .any(|a| a.attribute == attr.attribute)
            {
                return Err(ShaderTypesError::InvalidParameter(format!(
                    "attribute {} defined more than once",
                    attr.attribute
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Full-screen quad
// ============================================================================

/// Distance of the stream panel in front of the eye.
pub const PANEL_DEPTH: f32 = 1.0;

/// Corners of the stream panel, drawn as a 4-vertex triangle strip.
pub const FULLSCREEN_QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-PANEL_DEPTH, -PANEL_DEPTH, -PANEL_DEPTH],
    [PANEL_DEPTH, -PANEL_DEPTH, -PANEL_DEPTH],
    [-PANEL_DEPTH, PANEL_DEPTH, -PANEL_DEPTH],
    [PANEL_DEPTH, PANEL_DEPTH, -PANEL_DEPTH],
];

/// Texture coordinates of the quad corners.
///
/// They cover the left half of the side-by-side stereo frame; shaders shift
/// `u` by one half for the right eye.
pub const FULLSCREEN_QUAD_TEXCOORDS: [[f32; 2]; 4] =
    [[0.0, 1.0], [0.5, 1.0], [0.0, 0.0], [0.5, 0.0]];

/// Byte offset of the texture coordinates in [`fullscreen_quad_bytes`].
pub const FULLSCREEN_QUAD_TEXCOORD_OFFSET: u64 = size_of::<[[f32; 3]; 4]>() as u64;

/// Quad positions followed by texture coordinates in one upload, bound to
/// `MeshPositions` at offset 0 and `MeshGenerics` at
/// [`FULLSCREEN_QUAD_TEXCOORD_OFFSET`].
pub fn fullscreen_quad_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        size_of::<[[f32; 3]; 4]>() + size_of::<[[f32; 2]; 4]>(),
    );
    bytes.extend_from_slice(bytemuck::cast_slice(&FULLSCREEN_QUAD_POSITIONS));
    bytes.extend_from_slice(bytemuck::cast_slice(&FULLSCREEN_QUAD_TEXCOORDS));
    bytes
}

// ============================================================================
// Bindings
// ============================================================================

/// Type of resource that can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// Uniform buffer with the minimum size the shader reads.
    UniformBuffer { min_size: u64 },
    /// Filterable 2D float texture.
    Texture,
    /// Filtering sampler.
    Sampler,
}

bitflags::bitflags! {
    /// Shader stages that can access a binding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
    }
}

/// Describes a single binding slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingLayoutEntry {
    /// Bind group the binding lives in.
    pub group: u32,
    /// Binding index within the group.
    pub binding: u32,
    pub binding_type: BindingType,
    /// Shader stages that can access this binding.
    pub visibility: ShaderStageFlags,
    pub label: Option<String>,
}

impl BindingLayoutEntry {
    /// Create an entry visible to both stages.
    pub fn new(group: u32, binding: u32, binding_type: BindingType) -> Self {
        Self {
            group,
            binding,
            binding_type,
            visibility: ShaderStageFlags::VERTEX | ShaderStageFlags::FRAGMENT,
            label: None,
        }
    }

    pub fn with_visibility(mut self, visibility: ShaderStageFlags) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The set of bindings a pipeline expects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingLayout {
    pub entries: Vec<BindingLayoutEntry>,
    pub label: Option<String>,
}

impl BindingLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: BindingLayoutEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Add a buffer slot as a uniform buffer of at least `min_size` bytes.
    pub fn with_uniform_buffer(
        self,
        buffer: BufferIndex,
        min_size: u64,
        visibility: ShaderStageFlags,
    ) -> Self {
        self.with_entry(
            BindingLayoutEntry::new(
                BUFFER_BIND_GROUP,
                buffer.slot(),
                BindingType::UniformBuffer { min_size },
            )
            .with_visibility(visibility)
            .with_label(buffer.name()),
        )
    }

    /// Add a texture slot.
    pub fn with_texture(self, texture: TextureIndex, visibility: ShaderStageFlags) -> Self {
        self.with_entry(
            BindingLayoutEntry::new(TEXTURE_BIND_GROUP, texture.slot(), BindingType::Texture)
                .with_visibility(visibility)
                .with_label(texture.name()),
        )
    }

    /// Add a sampler in the texture group.
    pub fn with_sampler(self, binding: u32, visibility: ShaderStageFlags) -> Self {
        self.with_entry(
            BindingLayoutEntry::new(TEXTURE_BIND_GROUP, binding, BindingType::Sampler)
                .with_visibility(visibility),
        )
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The bindings of the stream rendering pipeline.
    ///
    /// The per-frame [`UniformsArray`] is read by the vertex stage; the
    /// decoded color texture and its sampler by the fragment stage.
    pub fn interface() -> Self {
        Self::new()
            .with_uniform_buffer(
                BufferIndex::Uniforms,
                size_of::<UniformsArray>() as u64,
                ShaderStageFlags::VERTEX,
            )
            .with_texture(TextureIndex::Color, ShaderStageFlags::FRAGMENT)
            .with_sampler(COLOR_SAMPLER_BINDING, ShaderStageFlags::FRAGMENT)
            .with_label("stream_interface")
    }

    /// Entries of one bind group, in declaration order.
    pub fn entries_for_group(&self, group: u32) -> impl Iterator<Item = &BindingLayoutEntry> {
        self.entries.iter().filter(move |e| e.group == group)
    }

    pub fn find(&self, group: u32, binding: u32) -> Option<&BindingLayoutEntry> {
        self.entries
            .iter()
            .find(|e| e.group == group && e.binding == binding)
    }

    /// Number of bind groups needed, i.e. the highest group used plus one.
    pub fn group_count(&self) -> u32 {
        self.entries.iter().map(|e| e.group + 1).max().unwrap_or(0)
    }
}
