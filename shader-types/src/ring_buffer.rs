//! Staging ring for per-frame uniform uploads.
//!
//! The renderer keeps one [`UniformsArray`] slot per frame in flight in a
//! single buffer and rotates through them, so the CPU can fill the next
//! frame's uniforms while the GPU still reads earlier slots. Each slot starts
//! on a 256-byte boundary, the minimum uniform buffer offset alignment of
//! most GPUs, so the slot offset can be used directly as the binding offset.
//!
//! [`UniformRing`] only models the host side: the slot arithmetic and a byte
//! staging area that is copied into the GPU buffer. Waiting for the GPU
//! before reusing a slot is the renderer's job.
//!
//! # Example
//!
//! ```ignore
//! let mut ring = UniformRing::new(UniformRing::DEFAULT_FRAMES_IN_FLIGHT)?;
//!
//! // Each frame
//! let offset = ring.advance();
//! ring.write(&uniforms);
//! queue.write_buffer(&buffer, offset, ring.current_bytes());
//! ```

use std::fmt;
use std::mem::size_of;

use crate::error::ShaderTypesError;
use crate::uniforms::UniformsArray;

/// Minimum alignment of a uniform buffer binding offset.
pub const UNIFORM_OFFSET_ALIGNMENT: u64 = 256;

/// Byte stride of one ring slot: `UniformsArray` rounded up to
/// [`UNIFORM_OFFSET_ALIGNMENT`].
pub const fn aligned_uniforms_size() -> u64 {
    align_up(size_of::<UniformsArray>() as u64, UNIFORM_OFFSET_ALIGNMENT)
}

static_assertions::const_assert_eq!(aligned_uniforms_size(), 512);

/// Ring of uniform slots, one per frame in flight.
pub struct UniformRing {
    staging: Vec<u8>,
    frames_in_flight: u32,
    index: u32,
    frame_count: u64,
}

impl UniformRing {
    /// Number of frames the renderer keeps in flight by default.
    pub const DEFAULT_FRAMES_IN_FLIGHT: u32 = 3;

    /// Create a ring with one slot per frame in flight.
    ///
    /// Every slot starts out holding [`UniformsArray::default`].
    pub fn new(frames_in_flight: u32) -> Result<Self, ShaderTypesError> {
        if frames_in_flight == 0 {
            return Err(ShaderTypesError::InvalidParameter(
                "uniform ring needs at least one frame in flight".to_string(),
            ));
        }

        let slot = aligned_uniforms_size() as usize;
        let mut staging = vec![0u8; slot * frames_in_flight as usize];
        let initial = UniformsArray::default();
        for chunk in staging.chunks_exact_mut(slot) {
            chunk[..size_of::<UniformsArray>()].copy_from_slice(initial.as_bytes());
        }

        Ok(Self {
            staging,
            frames_in_flight,
            index: 0,
            frame_count: 0,
        })
    }

    pub fn frames_in_flight(&self) -> u32 {
        self.frames_in_flight
    }

    /// Total size of the staging area, and of the GPU buffer backing it.
    pub fn capacity(&self) -> u64 {
        self.staging.len() as u64
    }

    /// Index of the current slot.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Number of times [`advance`](Self::advance) has been called.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Byte offset of the current slot.
    pub fn current_offset(&self) -> u64 {
        aligned_uniforms_size() * self.index as u64
    }

    /// Rotate to the next slot and return its byte offset.
    pub fn advance(&mut self) -> u64 {
        self.index = (self.index + 1) % self.frames_in_flight;
        self.frame_count += 1;
        self.current_offset()
    }

    /// Copy uniforms into the current slot.
    pub fn write(&mut self, uniforms: &UniformsArray) {
        let start = self.current_offset() as usize;
        self.staging[start..start + size_of::<UniformsArray>()]
            .copy_from_slice(uniforms.as_bytes());
    }

    /// Read back the uniforms in the current slot.
    pub fn current(&self) -> UniformsArray {
        bytemuck::pod_read_unaligned(self.current_bytes())
    }

    /// The bytes of the current slot that hold the uniforms.
    pub fn current_bytes(&self) -> &[u8] {
        let start = self.current_offset() as usize;
        &self.staging[start..start + size_of::<UniformsArray>()]
    }

    /// The whole staging area, slot padding included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.staging
    }
}

impl fmt::Debug for UniformRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformRing")
            .field("frames_in_flight", &self.frames_in_flight)
            .field("index", &self.index)
            .field("frame_count", &self.frame_count)
            .field("capacity", &self.staging.len())
            .finish()
    }
}

/// Align a value up to the given power-of-two alignment.
#[inline]
pub const fn align_up(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) & !(alignment - 1)
}
