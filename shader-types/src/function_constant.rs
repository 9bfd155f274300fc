//! Specialization constant identifiers for the foveated shader variants.
//!
//! The identifiers start at 100 so they stay clear of other specialization
//! ranges used elsewhere in the shader pipeline.

use std::fmt;

use crate::error::ShaderTypesError;

/// Type of the value a [`FunctionConstant`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
    Bool,
    /// Two 32-bit unsigned integers (a resolution).
    UInt2,
    /// Two 32-bit floats.
    Float2,
}

impl ConstantKind {
    /// Name of the type as written in shader code.
    pub fn shader_type(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::UInt2 => "u32",
            Self::Float2 => "f32",
        }
    }

    /// Number of scalar components.
    pub fn components(&self) -> usize {
        match self {
            Self::Bool => 1,
            Self::UInt2 | Self::Float2 => 2,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::UInt2 => "uint2",
            Self::Float2 => "float2",
        }
    }
}

/// Identifiers of the fixed foveated rendering function constants.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionConstant {
    /// Whether the foveated decode path is compiled in.
    FfrEnabled = 100,
    /// Full per-eye resolution the stream was rendered at.
    FfrCommonShaderTargetResolution = 101,
    /// Per-eye resolution of the foveated (compressed) frame.
    FfrCommonShaderOptimizedResolution = 102,
    FfrCommonShaderEyeSizeRatio = 103,
    FfrCommonShaderCenterSize = 104,
    FfrCommonShaderCenterShift = 105,
    FfrCommonShaderEdgeRatio = 106,
}

impl FunctionConstant {
    /// Every constant, in ascending identifier order.
    pub const ALL: [FunctionConstant; 7] = [
        Self::FfrEnabled,
        Self::FfrCommonShaderTargetResolution,
        Self::FfrCommonShaderOptimizedResolution,
        Self::FfrCommonShaderEyeSizeRatio,
        Self::FfrCommonShaderCenterSize,
        Self::FfrCommonShaderCenterShift,
        Self::FfrCommonShaderEdgeRatio,
    ];

    /// The numeric identifier shared with the shader compiler.
    #[inline]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Identifier as used by WGSL `@id(...)` attributes.
    #[inline]
    pub const fn override_id(self) -> u16 {
        self as i32 as u16
    }

    /// Base name of the pipeline-overridable constant in shader code.
    pub const fn shader_name(self) -> &'static str {
        match self {
            Self::FfrEnabled => "ffr_enabled",
            Self::FfrCommonShaderTargetResolution => "ffr_common_shader_target_resolution",
            Self::FfrCommonShaderOptimizedResolution => "ffr_common_shader_optimized_resolution",
            Self::FfrCommonShaderEyeSizeRatio => "ffr_common_shader_eye_size_ratio",
            Self::FfrCommonShaderCenterSize => "ffr_common_shader_center_size",
            Self::FfrCommonShaderCenterShift => "ffr_common_shader_center_shift",
            Self::FfrCommonShaderEdgeRatio => "ffr_common_shader_edge_ratio",
        }
    }

    /// Type of value this constant carries.
    pub const fn value_kind(self) -> ConstantKind {
        match self {
            Self::FfrEnabled => ConstantKind::Bool,
            Self::FfrCommonShaderTargetResolution | Self::FfrCommonShaderOptimizedResolution => {
                ConstantKind::UInt2
            }
            Self::FfrCommonShaderEyeSizeRatio
            | Self::FfrCommonShaderCenterSize
            | Self::FfrCommonShaderCenterShift
            | Self::FfrCommonShaderEdgeRatio => ConstantKind::Float2,
        }
    }

    /// Names of the scalar overrides backing this constant.
    ///
    /// WGSL overrides are scalar only, so two-component constants are split
    /// into `<name>_x` and `<name>_y`.
    pub fn component_names(self) -> Vec<String> {
        let base = self.shader_name();
        match self.value_kind() {
            ConstantKind::Bool => vec![base.to_string()],
            ConstantKind::UInt2 | ConstantKind::Float2 => {
                vec![format!("{base}_x"), format!("{base}_y")]
            }
        }
    }
}

impl TryFrom<i32> for FunctionConstant {
    type Error = ShaderTypesError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == value)
            .ok_or(ShaderTypesError::UnknownIndex {
                kind: "FunctionConstant",
                value,
            })
    }
}

impl From<FunctionConstant> for i32 {
    fn from(value: FunctionConstant) -> Self {
        value.id()
    }
}

impl From<FunctionConstant> for isize {
    fn from(value: FunctionConstant) -> Self {
        value.id() as isize
    }
}

impl fmt::Display for FunctionConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.shader_name())
    }
}

static_assertions::const_assert_eq!(FunctionConstant::FfrEnabled as i32, 100);
static_assertions::const_assert_eq!(FunctionConstant::FfrCommonShaderTargetResolution as i32, 101);
static_assertions::const_assert_eq!(FunctionConstant::FfrCommonShaderOptimizedResolution as i32, 102);
static_assertions::const_assert_eq!(FunctionConstant::FfrCommonShaderEyeSizeRatio as i32, 103);
static_assertions::const_assert_eq!(FunctionConstant::FfrCommonShaderCenterSize as i32, 104);
static_assertions::const_assert_eq!(FunctionConstant::FfrCommonShaderCenterShift as i32, 105);
static_assertions::const_assert_eq!(FunctionConstant::FfrCommonShaderEdgeRatio as i32, 106);
static_assertions::assert_eq_size!(FunctionConstant, i32);
