//! Binding index enumerations shared by host pipeline setup and shaders.
//!
//! Every enumeration is backed by `i32`, the 32-bit signed type shaders use
//! for their side of the contract. The numeric values are the contract: they
//! are pinned by compile-time assertions at the bottom of this file and must
//! never be renumbered once shaders have been compiled against them.
//!
//! Indices are dense and start at zero, so they can be used directly as
//! array or slot indices.

use std::fmt;

use crate::error::ShaderTypesError;

/// Implements the common accessors and the fallible `i32` conversion for an
/// interface enumeration.
macro_rules! interface_enum {
    ($ty:ident, $kind:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            /// Every variant, in ascending numeric order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The numeric value shared with shader code.
            #[inline]
            pub const fn index(self) -> i32 {
                self as i32
            }

            /// The value as an unsigned slot number for host APIs.
            #[inline]
            pub const fn slot(self) -> u32 {
                self as i32 as u32
            }

            /// The name used for the matching shader-side constant.
            pub const fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl TryFrom<i32> for $ty {
            type Error = ShaderTypesError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.index() == value)
                    .ok_or(ShaderTypesError::UnknownIndex { kind: $kind, value })
            }
        }

        impl From<$ty> for i32 {
            fn from(value: $ty) -> Self {
                value.index()
            }
        }

        impl From<$ty> for isize {
            fn from(value: $ty) -> Self {
                value.index() as isize
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// GPU buffer binding slots.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferIndex {
    /// Vertex positions (float3 per vertex).
    MeshPositions = 0,
    /// Remaining per-vertex data (texture coordinates).
    MeshGenerics = 1,
    /// The per-frame [`UniformsArray`](crate::UniformsArray).
    Uniforms = 2,
}

interface_enum!(BufferIndex, "BufferIndex", [
    MeshPositions => "BUFFER_INDEX_MESH_POSITIONS",
    MeshGenerics => "BUFFER_INDEX_MESH_GENERICS",
    Uniforms => "BUFFER_INDEX_UNIFORMS",
]);

/// Per-vertex attribute slots of the vertex-fetch stage.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexAttribute {
    Position = 0,
    Texcoord = 1,
}

interface_enum!(VertexAttribute, "VertexAttribute", [
    Position => "VERTEX_ATTRIBUTE_POSITION",
    Texcoord => "VERTEX_ATTRIBUTE_TEXCOORD",
]);

/// Fragment-stage texture binding slots.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureIndex {
    /// The decoded video frame.
    Color = 0,
}

interface_enum!(TextureIndex, "TextureIndex", [
    Color => "TEXTURE_INDEX_COLOR",
]);

/// Slot of a [`UniformsArray`](crate::UniformsArray) entry.
///
/// The stereo renderer fills index 0 with the left eye and index 1 with the
/// right eye.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Eye {
    Left = 0,
    Right = 1,
}

interface_enum!(Eye, "Eye", [
    Left => "EYE_LEFT",
    Right => "EYE_RIGHT",
]);

impl Eye {
    /// The other eye.
    pub const fn opposite(self) -> Self {
        match self {
            Eye::Left => Eye::Right,
            Eye::Right => Eye::Left,
        }
    }
}

static_assertions::const_assert_eq!(BufferIndex::MeshPositions as i32, 0);
static_assertions::const_assert_eq!(BufferIndex::MeshGenerics as i32, 1);
static_assertions::const_assert_eq!(BufferIndex::Uniforms as i32, 2);
static_assertions::const_assert_eq!(VertexAttribute::Position as i32, 0);
static_assertions::const_assert_eq!(VertexAttribute::Texcoord as i32, 1);
static_assertions::const_assert_eq!(TextureIndex::Color as i32, 0);
static_assertions::const_assert_eq!(Eye::Left as i32, 0);
static_assertions::const_assert_eq!(Eye::Right as i32, 1);
static_assertions::assert_eq_size!(BufferIndex, i32);
static_assertions::assert_eq_size!(VertexAttribute, i32);
static_assertions::assert_eq_size!(TextureIndex, i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_index_values() {
        assert_eq!(BufferIndex::MeshPositions.index(), 0);
        assert_eq!(BufferIndex::MeshGenerics.index(), 1);
        assert_eq!(BufferIndex::Uniforms.index(), 2);
        assert_eq!(BufferIndex::Uniforms.slot(), 2);
    }

    #[test]
    fn test_vertex_attribute_and_texture_values() {
        assert_eq!(VertexAttribute::Position.index(), 0);
        assert_eq!(VertexAttribute::Texcoord.index(), 1);
        assert_eq!(TextureIndex::Color.index(), 0);
    }

    #[test]
    fn test_all_is_dense_from_zero() {
        for (i, index) in BufferIndex::ALL.iter().enumerate() {
            assert_eq!(index.index(), i as i32);
        }
        for (i, attr) in VertexAttribute::ALL.iter().enumerate() {
            assert_eq!(attr.index(), i as i32);
        }
        for (i, tex) in TextureIndex::ALL.iter().enumerate() {
            assert_eq!(tex.index(), i as i32);
        }
    }

    #[test]
    fn test_try_from_roundtrip() {
        assert_eq!(BufferIndex::try_from(2).unwrap(), BufferIndex::Uniforms);
        assert_eq!(VertexAttribute::try_from(1).unwrap(), VertexAttribute::Texcoord);
        assert_eq!(TextureIndex::try_from(0).unwrap(), TextureIndex::Color);
        assert_eq!(Eye::try_from(1).unwrap(), Eye::Right);
    }

    #[test]
    fn test_native_width_conversion() {
        assert_eq!(isize::from(BufferIndex::Uniforms), 2);
        assert_eq!(isize::from(VertexAttribute::Texcoord), 1);
        assert_eq!(isize::from(TextureIndex::Color), 0);
        assert_eq!(isize::from(Eye::Right), i32::from(Eye::Right) as isize);
    }

    #[test]
    fn test_try_from_unknown() {
        let err = BufferIndex::try_from(3).unwrap_err();
        assert!(matches!(
            err,
            ShaderTypesError::UnknownIndex {
                kind: "BufferIndex",
                value: 3
            }
        ));
        assert!(TextureIndex::try_from(-1).is_err());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = BufferIndex::ALL
            .iter()
            .map(|v| v.name())
            .chain(VertexAttribute::ALL.iter().map(|v| v.name()))
            .chain(TextureIndex::ALL.iter().map(|v| v.name()))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_eye_opposite() {
        assert_eq!(Eye::Left.opposite(), Eye::Right);
        assert_eq!(Eye::Right.opposite(), Eye::Left);
        assert_eq!(Eye::Left.to_string(), "EYE_LEFT");
    }
}
