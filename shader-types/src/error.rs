//! Shader interface error types.

use thiserror::Error;

/// Errors produced by the shader interface helpers.
///
/// The declarations themselves cannot fail. These errors come from the
/// operations layered on top: parsing settings, deriving parameters, and
/// checking shader source against the host definitions.
#[derive(Debug, Error)]
pub enum ShaderTypesError {
    /// A raw integer does not name any variant of the enumeration.
    #[error("unknown {kind} value: {value}")]
    UnknownIndex { kind: &'static str, value: i32 },
    /// Projection parameters cannot produce a finite matrix.
    #[error("invalid projection: {0}")]
    InvalidProjection(String),
    /// Foveation settings are out of range for the requested eye size.
    #[error("invalid foveation settings: {0}")]
    InvalidFoveationSettings(String),
    /// The streamer's foveation JSON could not be decoded.
    #[error("failed to parse foveation settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
    /// A function constant was given a value of the wrong type.
    #[error("function constant {constant} expects {expected}, got {actual}")]
    ConstantTypeMismatch {
        constant: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A `#include` directive names a module that was never registered.
    #[error("include not found: \"{0}\"")]
    IncludeNotFound(String),
    /// WGSL parsing or validation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),
    /// A shader declaration disagrees with the host definition.
    #[error("shader interface mismatch: {0}")]
    InterfaceMismatch(String),
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
