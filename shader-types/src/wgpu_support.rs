//! Conversions from the interface layouts to wgpu types.

use std::collections::HashMap;

use crate::constants::FunctionConstantValues;
use crate::error::ShaderTypesError;
use crate::layout::{
    BindingLayout, BindingType, ShaderStageFlags, VertexAttributeFormat, VertexLayout,
    VertexStepMode,
};
use crate::ring_buffer::UniformRing;

/// Convert VertexAttributeFormat to wgpu vertex format.
pub fn convert_vertex_format(format: VertexAttributeFormat) -> wgpu::VertexFormat {
    match format {
        VertexAttributeFormat::Float2 => wgpu::VertexFormat::Float32x2,
        VertexAttributeFormat::Float3 => wgpu::VertexFormat::Float32x3,
    }
}

/// Convert VertexStepMode to wgpu step mode.
pub fn convert_step_mode(mode: VertexStepMode) -> wgpu::VertexStepMode {
    match mode {
        VertexStepMode::Vertex => wgpu::VertexStepMode::Vertex,
        VertexStepMode::Instance => wgpu::VertexStepMode::Instance,
    }
}

/// Convert ShaderStageFlags to wgpu shader stages.
pub fn convert_shader_stages(flags: ShaderStageFlags) -> wgpu::ShaderStages {
    let mut result = wgpu::ShaderStages::NONE;

    if flags.contains(ShaderStageFlags::VERTEX) {
        result |= wgpu::ShaderStages::VERTEX;
    }
    if flags.contains(ShaderStageFlags::FRAGMENT) {
        result |= wgpu::ShaderStages::FRAGMENT;
    }

    result
}

/// Convert BindingType to a wgpu binding type.
pub fn convert_binding_type(binding_type: BindingType) -> wgpu::BindingType {
    match binding_type {
        BindingType::UniformBuffer { min_size } => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(min_size),
        },
        BindingType::Texture => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        BindingType::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    }
}

/// A vertex buffer layout that owns its attributes.
///
/// `wgpu::VertexBufferLayout` borrows its attribute slice, so the converted
/// attributes need a home for as long as the pipeline descriptor lives.
#[derive(Debug, Clone)]
pub struct OwnedVertexBufferLayout {
    pub array_stride: wgpu::BufferAddress,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl OwnedVertexBufferLayout {
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}

/// Convert a vertex layout into wgpu buffer layouts.
///
/// wgpu binds vertex buffers by their position in the pipeline's buffer
/// list, so the result is ordered by buffer slot and the slots must be dense
/// from zero.
pub fn vertex_buffer_layouts(
    layout: &VertexLayout,
) -> Result<Vec<OwnedVertexBufferLayout>, ShaderTypesError> {
    layout.validate()?;

    let mut buffers: Vec<_> = layout.buffers.iter().collect();
    buffers.sort_by_key(|b| b.buffer);

    buffers
        .iter()
        .enumerate()
        .map(|(position, buffer)| {
            if buffer.buffer.slot() as usize != position {
                return Err(ShaderTypesError::InvalidParameter(format!(
                    "vertex buffer {} would be bound at position {position}",
                    buffer.buffer
                )));
            }

            let attributes = layout
                .attributes_for_buffer(buffer.buffer)
                .map(|attr| wgpu::VertexAttribute {
                    format: convert_vertex_format(attr.format),
                    offset: attr.offset as wgpu::BufferAddress,
                    shader_location: attr.shader_location(),
                })
                .collect();

            Ok(OwnedVertexBufferLayout {
                array_stride: buffer.stride as wgpu::BufferAddress,
                step_mode: convert_step_mode(buffer.step_mode),
                attributes,
            })
        })
        .collect()
}

/// Bind group layout entries of one group.
pub fn bind_group_layout_entries(
    layout: &BindingLayout,
    group: u32,
) -> Vec<wgpu::BindGroupLayoutEntry> {
    layout
        .entries_for_group(group)
        .map(|entry| wgpu::BindGroupLayoutEntry {
            binding: entry.binding,
            visibility: convert_shader_stages(entry.visibility),
            ty: convert_binding_type(entry.binding_type),
            count: None,
        })
        .collect()
}

/// Override map for `wgpu::PipelineCompilationOptions::constants`.
pub fn pipeline_constants(values: &FunctionConstantValues) -> HashMap<String, f64> {
    values.to_pipeline_constants()
}

/// Descriptor of the GPU buffer backing a [`UniformRing`].
pub fn uniform_ring_descriptor(ring: &UniformRing) -> wgpu::BufferDescriptor<'static> {
    wgpu::BufferDescriptor {
        label: Some("alvr_uniform_ring"),
        size: ring.capacity(),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }
}
