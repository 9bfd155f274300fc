//! WGSL side of the interface.
//!
//! # Overview
//!
//! - [`wgsl_prelude`] generates the WGSL declarations of every shared type
//!   and constant from the Rust definitions.
//! - [`ShaderComposer`] resolves `#include` directives, with the prelude
//!   available as `alvr/shader_types.wgsl`, and parses and validates the
//!   result through naga.
//! - [`verify_interface`] checks a parsed module's declarations against the
//!   host layout.
//!
//! # Example
//!
//! ```ignore
//! use alvr_shader_types::shader::ShaderComposer;
//!
//! let composer = ShaderComposer::with_interface();
//!
//! let source = r#"
//! #include "alvr/shader_types.wgsl"
//!
//! @group(0) @binding(2) var<uniform> uniforms: UniformsArray;
//! // ...
//! "#;
//!
//! let module = composer.compose_module(source)?;
//! ```

pub mod prelude;
pub mod reflect;

use std::collections::{HashMap, HashSet};

use crate::constants::FunctionConstantValues;
use crate::error::ShaderTypesError;

pub use prelude::{
    index_constants, vector_expression, wgsl_prelude, wgsl_prelude_with, SHADER_TYPES_INCLUDE,
};
pub use reflect::{reflect, verify_interface, ReflectedOverride, ReflectedStruct, ShaderReflection};

/// Stereo quad shader drawing the decoded stream, one instance per eye.
///
/// Expects [`VertexLayout::stream_quad`](crate::VertexLayout::stream_quad)
/// and [`BindingLayout::interface`](crate::BindingLayout::interface).
pub const STEREO_QUAD_SHADER: &str = include_str!("../../../shaders/stereo_quad.wgsl");

/// Resolves includes in WGSL sources and hands the result to naga.
///
/// # Include Syntax
///
/// ```wgsl
/// #include "alvr/shader_types.wgsl"
/// #include <my_project/common.wgsl>
/// ```
///
/// Each include path is expanded at most once per composition; later
/// directives for the same path are dropped.
pub struct ShaderComposer {
    /// Registered include sources: path -> source text.
    includes: HashMap<String, String>,
}

impl Default for ShaderComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderComposer {
    /// Create a composer with no includes.
    pub fn new() -> Self {
        Self {
            includes: HashMap::new(),
        }
    }

    /// Create a composer with the default prelude registered under
    /// [`SHADER_TYPES_INCLUDE`].
    pub fn with_interface() -> Self {
        Self::with_interface_values(&FunctionConstantValues::new())
    }

    /// Create a composer whose prelude bakes `values` in as override
    /// defaults.
    pub fn with_interface_values(values: &FunctionConstantValues) -> Self {
        let mut composer = Self::new();
        composer.register_include(SHADER_TYPES_INCLUDE, &wgsl_prelude_with(values));
        composer
    }

    /// Register a single include source.
    ///
    /// The path is what appears in `#include "path"` directives. Registering
    /// the same path again replaces the previous source.
    pub fn register_include(&mut self, path: &str, source: &str) {
        self.includes.insert(path.to_string(), source.to_string());
    }

    pub fn has_include(&self, path: &str) -> bool {
        self.includes.contains_key(path)
    }

    /// Resolve every `#include` directive and return the resulting WGSL.
    pub fn compose(&self, source: &str) -> Result<String, ShaderTypesError> {
        let mut included = HashSet::new();
        self.resolve_includes(source, &mut included)
    }

    /// Compose, then parse and validate the result with naga.
    pub fn compose_module(&self, source: &str) -> Result<naga::Module, ShaderTypesError> {
        let resolved = self.compose(source)?;

        let module = naga::front::wgsl::parse_str(&resolved).map_err(|e| {
            ShaderTypesError::ShaderCompilationFailed(format!(
                "WGSL parse error:\n{}",
                e.emit_to_string(&resolved)
            ))
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).map_err(|e| {
            ShaderTypesError::ShaderCompilationFailed(format!(
                "Validation error:\n{}",
                e.emit_to_string(&resolved)
            ))
        })?;

        Ok(module)
    }

    /// Compose a module and check its declarations against the host
    /// interface.
    pub fn compose_verified(&self, source: &str) -> Result<naga::Module, ShaderTypesError> {
        let module = self.compose_module(source)?;
        verify_interface(&module)?;
        Ok(module)
    }

    /// Resolve `#include` directives recursively.
    fn resolve_includes(
        &self,
        source: &str,
        included: &mut HashSet<String>,
    ) -> Result<String, ShaderTypesError> {
        let mut result = String::with_capacity(source.len());

        for line in source.lines() {
            if let Some(path) = parse_include_directive(line.trim()) {
                if !included.insert(path.to_string()) {
                    continue;
                }

                let include_source = self
                    .includes
                    .get(path)
                    .ok_or_else(|| ShaderTypesError::IncludeNotFound(path.to_string()))?;

                let resolved = self.resolve_includes(include_source, included)?;
                result.push_str(&resolved);
                result.push('\n');
            } else {
                result.push_str(line);
                result.push('\n');
            }
        }

        Ok(result)
    }
}

/// Parse a `#include "path"` or `#include <path>` directive.
fn parse_include_directive(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("#include")?.trim();
    if let Some(inner) = rest.strip_prefix('"') {
        inner.strip_suffix('"')
    } else if let Some(inner) = rest.strip_prefix('<') {
        inner.strip_suffix('>')
    } else {
        None
    }
}
