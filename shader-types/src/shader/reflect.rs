//! Reflection of a parsed WGSL module against the host interface.
//!
//! [`verify_interface`] catches shaders that declare the interface by hand
//! and got it wrong: a struct with the wrong layout, an index constant with
//! the wrong value, or a foveation override with the wrong identifier.
//! Declarations the shader leaves out are not an error.

use std::mem::size_of;

use crate::error::ShaderTypesError;
use crate::function_constant::FunctionConstant;
use crate::uniforms::{Uniforms, UniformsArray};

use super::prelude::{index_constants, UNIFORMS_FIELDS};

/// A struct declared by the shader, with naga's computed layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedStruct {
    pub name: String,
    /// Size in bytes, including trailing padding.
    pub span: u32,
    /// `(member name, byte offset)` in declaration order.
    pub members: Vec<(String, u32)>,
}

/// A pipeline-overridable constant declared by the shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedOverride {
    pub name: String,
    pub id: Option<u16>,
}

/// Interface-relevant declarations found in a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderReflection {
    pub structs: Vec<ReflectedStruct>,
    /// Named integer constants as `(name, value)`.
    pub constants: Vec<(String, i64)>,
    pub overrides: Vec<ReflectedOverride>,
}

impl ShaderReflection {
    pub fn find_struct(&self, name: &str) -> Option<&ReflectedStruct> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_constant(&self, name: &str) -> Option<i64> {
        self.constants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn find_override(&self, name: &str) -> Option<&ReflectedOverride> {
        self.overrides.iter().find(|o| o.name == name)
    }
}

/// Collect the named structs, integer constants and overrides of a module.
pub fn reflect(module: &naga::Module) -> ShaderReflection {
    let structs = module
        .types
        .iter()
        .filter_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { members, span }) => Some(ReflectedStruct {
                name: name.clone(),
                span: *span,
                members: members
                    .iter()
                    .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                    .collect(),
            }),
            _ => None,
        })
        .collect();

    let constants = module
        .constants
        .iter()
        .filter_map(|(_, constant)| {
            let name = constant.name.clone()?;
            let value = match module.global_expressions[constant.init] {
                naga::Expression::Literal(naga::Literal::I32(v)) => v as i64,
                naga::Expression::Literal(naga::Literal::U32(v)) => v as i64,
                naga::Expression::Literal(naga::Literal::I64(v)) => v,
                naga::Expression::Literal(naga::Literal::AbstractInt(v)) => v,
                _ => return None,
            };
            Some((name, value))
        })
        .collect();

    let overrides = module
        .overrides
        .iter()
        .filter_map(|(_, o)| {
            Some(ReflectedOverride {
                name: o.name.clone()?,
                id: o.id,
            })
        })
        .collect();

    ShaderReflection {
        structs,
        constants,
        overrides,
    }
}

/// Check every interface declaration in `module` against the host.
///
/// Returns the reflection on success. All problems are collected into a
/// single `InterfaceMismatch` error.
pub fn verify_interface(module: &naga::Module) -> Result<ShaderReflection, ShaderTypesError> {
    let reflection = reflect(module);
    let mut problems = Vec::new();

    let uniforms_members: Vec<(&str, u32)> =
        UNIFORMS_FIELDS.iter().map(|(n, _, o)| (*n, *o)).collect();
    check_struct(
        &reflection,
        "Uniforms",
        size_of::<Uniforms>() as u32,
        &uniforms_members,
        &mut problems,
    );
    check_struct(
        &reflection,
        "UniformsArray",
        size_of::<UniformsArray>() as u32,
        &[("uniforms", 0)],
        &mut problems,
    );

    for (name, expected) in index_constants() {
        if let Some(actual) = reflection.find_constant(name) {
            if actual != expected as i64 {
                problems.push(format!("{name} is {actual}, host has {expected}"));
            }
        }
    }

    for constant in FunctionConstant::ALL {
        for (i, name) in constant.component_names().iter().enumerate() {
            let Some(declared) = reflection.find_override(name) else {
                continue;
            };
            let expected = (i == 0).then_some(constant.override_id());
            if declared.id != expected {
                problems.push(format!(
                    "override {name} has id {:?}, expected {:?}",
                    declared.id, expected
                ));
            }
        }
    }

    if problems.is_empty() {
        Ok(reflection)
    } else {
        let message = problems.join("; ");
        log::warn!("Rejected shader interface: {message}");
        Err(ShaderTypesError::InterfaceMismatch(message))
    }
}

fn check_struct(
    reflection: &ShaderReflection,
    name: &str,
    span: u32,
    members: &[(&str, u32)],
    problems: &mut Vec<String>,
) {
    let Some(declared) = reflection.find_struct(name) else {
        return;
    };

    if declared.span != span {
        problems.push(format!(
            "struct {name} is {} bytes, host has {span}",
            declared.span
        ));
    }

    let declared_members: Vec<(&str, u32)> = declared
        .members
        .iter()
        .map(|(n, o)| (n.as_str(), *o))
        .collect();
    if declared_members != members {
        problems.push(format!(
            "struct {name} members {declared_members:?}, host has {members:?}"
        ));
    }
}
