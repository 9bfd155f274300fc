//! Function constant values for building a specialized pipeline.
//!
//! [`FunctionConstantValues`] is the host-side table of values keyed by
//! [`FunctionConstant`]. It is filled from [`FoveationVars`] once streaming
//! starts and handed to pipeline creation, either as a list of typed values
//! (Metal-style function constants) or flattened into the scalar
//! pipeline-overridable constants used by WGSL.

use std::collections::{BTreeMap, HashMap};

use crate::error::ShaderTypesError;
use crate::foveation::FoveationVars;
use crate::function_constant::{ConstantKind, FunctionConstant};

/// Typed value of a single function constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunctionConstantValue {
    Bool(bool),
    UInt2([u32; 2]),
    Float2([f32; 2]),
}

impl FunctionConstantValue {
    /// Kind of this value.
    pub fn kind(&self) -> ConstantKind {
        match self {
            Self::Bool(_) => ConstantKind::Bool,
            Self::UInt2(_) => ConstantKind::UInt2,
            Self::Float2(_) => ConstantKind::Float2,
        }
    }

    /// Scalar components widened to `f64`, the representation pipeline
    /// override maps use. Booleans become `0.0` / `1.0`.
    pub fn components(&self) -> Vec<f64> {
        match *self {
            Self::Bool(v) => vec![if v { 1.0 } else { 0.0 }],
            Self::UInt2([x, y]) => vec![x as f64, y as f64],
            Self::Float2([x, y]) => vec![x as f64, y as f64],
        }
    }

    /// Component literals as written in WGSL source.
    pub fn wgsl_literals(&self) -> Vec<String> {
        match *self {
            Self::Bool(v) => vec![v.to_string()],
            Self::UInt2([x, y]) => vec![format!("{x}u"), format!("{y}u")],
            Self::Float2([x, y]) => vec![wgsl_float(x), wgsl_float(y)],
        }
    }

    /// The zero value of the given kind.
    pub fn zero(kind: ConstantKind) -> Self {
        match kind {
            ConstantKind::Bool => Self::Bool(false),
            ConstantKind::UInt2 => Self::UInt2([0, 0]),
            ConstantKind::Float2 => Self::Float2([0.0, 0.0]),
        }
    }
}

/// Format an `f32` as a WGSL float literal that round-trips exactly.
fn wgsl_float(v: f32) -> String {
    // `{:?}` always prints a decimal point or exponent and the shortest
    // representation that round-trips.
    format!("{v:?}")
}

/// Table of function constant values, kept in ascending identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionConstantValues {
    values: BTreeMap<FunctionConstant, FunctionConstantValue>,
}

impl FunctionConstantValues {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every foveation constant from the derived parameters.
    pub fn from_foveation(vars: &FoveationVars) -> Self {
        use FunctionConstant::*;
        use FunctionConstantValue::*;

        let values = [
            (FfrEnabled, Bool(vars.enabled)),
            (
                FfrCommonShaderTargetResolution,
                UInt2([vars.target_eye_width, vars.target_eye_height]),
            ),
            (
                FfrCommonShaderOptimizedResolution,
                UInt2([vars.optimized_eye_width, vars.optimized_eye_height]),
            ),
            (
                FfrCommonShaderEyeSizeRatio,
                Float2([vars.eye_width_ratio, vars.eye_height_ratio]),
            ),
            (
                FfrCommonShaderCenterSize,
                Float2([vars.center_size_x, vars.center_size_y]),
            ),
            (
                FfrCommonShaderCenterShift,
                Float2([vars.center_shift_x, vars.center_shift_y]),
            ),
            (
                FfrCommonShaderEdgeRatio,
                Float2([vars.edge_ratio_x, vars.edge_ratio_y]),
            ),
        ];

        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Set a constant, checking the value matches the constant's kind.
    ///
    /// Float components must be finite: WGSL has no literal for infinity
    /// or NaN.
    pub fn set(
        &mut self,
        constant: FunctionConstant,
        value: FunctionConstantValue,
    ) -> Result<(), ShaderTypesError> {
        let expected = constant.value_kind();
        if value.kind() != expected {
            return Err(ShaderTypesError::ConstantTypeMismatch {
                constant: constant.shader_name(),
                expected: expected.label(),
                actual: value.kind().label(),
            });
        }
        if let FunctionConstantValue::Float2(components) = value {
            if components.iter().any(|c| !c.is_finite()) {
                return Err(ShaderTypesError::InvalidParameter(format!(
                    "{} must be finite, got {:?}",
                    constant.shader_name(),
                    components
                )));
            }
        }
        self.values.insert(constant, value);
        Ok(())
    }

    pub fn get(&self, constant: FunctionConstant) -> Option<&FunctionConstantValue> {
        self.values.get(&constant)
    }

    /// The value if set, otherwise the zero value of the constant's kind.
    pub fn get_or_zero(&self, constant: FunctionConstant) -> FunctionConstantValue {
        self.get(constant)
            .copied()
            .unwrap_or_else(|| FunctionConstantValue::zero(constant.value_kind()))
    }

    /// Iterate set constants in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionConstant, &FunctionConstantValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flatten into the scalar override map used by WGSL pipelines.
    ///
    /// Keys are the override names emitted by
    /// [`wgsl_prelude`](crate::shader::wgsl_prelude).
    pub fn to_pipeline_constants(&self) -> HashMap<String, f64> {
        self.iter()
            .flat_map(|(constant, value)| {
                constant
                    .component_names()
                    .into_iter()
                    .zip(value.components())
            })
            .collect()
    }
}
