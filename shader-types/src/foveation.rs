//! Fixed foveated rendering parameters.
//!
//! The streamer sends its foveation settings as JSON together with the
//! per-eye view size. The server renders each eye at the full ("target")
//! resolution and squeezes the periphery before encoding, producing a smaller
//! ("optimized") frame. The client needs the exact same derived numbers to
//! undo that squeeze in its shaders, so the math below must stay bit-for-bit
//! in step with the streamer:
//!
//! 1. The edge region is snapped so it divides evenly into `2 * edge_ratio`
//!    pixel blocks, which adjusts the centre size.
//! 2. The centre shift is snapped to the same block size.
//! 3. The optimized size is rounded up to a multiple of 32 pixels for the
//!    encoder, and the ratio between the unrounded and rounded sizes is kept
//!    so shaders can ignore the padding.

use serde::{Deserialize, Serialize};

use crate::error::ShaderTypesError;

/// Encoder frame dimensions are rounded up to this many pixels.
pub const ENCODER_ALIGNMENT: u32 = 32;

/// Foveation settings as read from the streamer's JSON config.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FoveationSettings {
    pub center_size_x: f32,
    pub center_size_y: f32,
    pub center_shift_x: f32,
    pub center_shift_y: f32,
    pub edge_ratio_x: f32,
    pub edge_ratio_y: f32,
}

impl FoveationSettings {
    /// Parse the streamer's foveation JSON object.
    pub fn from_json(json: &str) -> Result<Self, ShaderTypesError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the settings can produce finite shader parameters.
    pub fn validate(&self) -> Result<(), ShaderTypesError> {
        for (axis, size) in [("x", self.center_size_x), ("y", self.center_size_y)] {
            if !(size > 0.0 && size <= 1.0) {
                return Err(ShaderTypesError::InvalidFoveationSettings(format!(
                    "center_size_{axis} must be in (0, 1], got {size}"
                )));
            }
        }
        for (axis, shift) in [("x", self.center_shift_x), ("y", self.center_shift_y)] {
            if !shift.is_finite() {
                return Err(ShaderTypesError::InvalidFoveationSettings(format!(
                    "center_shift_{axis} must be finite, got {shift}"
                )));
            }
        }
        for (axis, ratio) in [("x", self.edge_ratio_x), ("y", self.edge_ratio_y)] {
            if !(ratio.is_finite() && ratio >= 1.0) {
                return Err(ShaderTypesError::InvalidFoveationSettings(format!(
                    "edge_ratio_{axis} must be at least 1, got {ratio}"
                )));
            }
        }
        Ok(())
    }
}

/// Shader parameters derived from [`FoveationSettings`] and the eye size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FoveationVars {
    pub enabled: bool,

    pub target_eye_width: u32,
    pub target_eye_height: u32,
    pub optimized_eye_width: u32,
    pub optimized_eye_height: u32,

    pub eye_width_ratio: f32,
    pub eye_height_ratio: f32,

    pub center_size_x: f32,
    pub center_size_y: f32,
    pub center_shift_x: f32,
    pub center_shift_y: f32,
    pub edge_ratio_x: f32,
    pub edge_ratio_y: f32,
}

impl FoveationVars {
    /// Foveation switched off; every parameter is zero.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Full-resolution eye size `(width, height)`.
    pub fn target_resolution(&self) -> (u32, u32) {
        (self.target_eye_width, self.target_eye_height)
    }

    /// Encoded eye size `(width, height)`.
    pub fn optimized_resolution(&self) -> (u32, u32) {
        (self.optimized_eye_width, self.optimized_eye_height)
    }
}

/// Result of snapping one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisVars {
    center_size: f32,
    center_shift: f32,
    optimized: u32,
    ratio: f32,
}

fn calculate_axis(
    axis: &str,
    target: f32,
    center_size: f32,
    center_shift: f32,
    edge_ratio: f32,
) -> Result<AxisVars, ShaderTypesError> {
    let block = edge_ratio * 2.0;

    let edge_size = target - center_size * target;
    let center_size_aligned = 1.0 - (edge_size / block).ceil() * block / target;
    if center_size_aligned < 0.0 {
        return Err(ShaderTypesError::InvalidFoveationSettings(format!(
            "center region on the {axis} axis vanishes after edge alignment"
        )));
    }

    let edge_size_aligned = target - center_size_aligned * target;
    let center_shift_aligned = if edge_size_aligned > 0.0 {
        (center_shift * edge_size_aligned / block).ceil() * block / edge_size_aligned
    } else {
        0.0
    };

    let foveation_scale = center_size_aligned + (1.0 - center_size_aligned) / edge_ratio;
    let optimized = foveation_scale * target;

    let alignment = ENCODER_ALIGNMENT as f32;
    let optimized_aligned = ((optimized / alignment).ceil() * alignment) as u32;
    let ratio = optimized / optimized_aligned as f32;

    Ok(AxisVars {
        center_size: center_size_aligned,
        center_shift: center_shift_aligned,
        optimized: optimized_aligned,
        ratio,
    })
}

/// Derive the foveation shader parameters for a stream.
///
/// `view_width` and `view_height` are the per-eye size announced when
/// streaming starts. Passing `None` for `settings` means the streamer has
/// foveation disabled.
pub fn calculate_foveation_vars(
    view_width: u32,
    view_height: u32,
    settings: Option<&FoveationSettings>,
) -> Result<FoveationVars, ShaderTypesError> {
    let Some(settings) = settings else {
        return Ok(FoveationVars::disabled());
    };

    if view_width == 0 || view_height == 0 {
        return Err(ShaderTypesError::InvalidFoveationSettings(format!(
            "eye size must be non-zero, got {view_width}x{view_height}"
        )));
    }
    settings.validate()?;

    let x = calculate_axis(
        "x",
        view_width as f32,
        settings.center_size_x,
        settings.center_shift_x,
        settings.edge_ratio_x,
    )?;
    let y = calculate_axis(
        "y",
        view_height as f32,
        settings.center_size_y,
        settings.center_shift_y,
        settings.edge_ratio_y,
    )?;

    log::debug!(
        "Foveation: target {}x{} -> optimized {}x{}, center {:.4}x{:.4}",
        view_width,
        view_height,
        x.optimized,
        y.optimized,
        x.center_size,
        y.center_size
    );

    Ok(FoveationVars {
        enabled: true,
        target_eye_width: view_width,
        target_eye_height: view_height,
        optimized_eye_width: x.optimized,
        optimized_eye_height: y.optimized,
        eye_width_ratio: x.ratio,
        eye_height_ratio: y.ratio,
        center_size_x: x.center_size,
        center_size_y: y.center_size,
        center_shift_x: x.center_shift,
        center_shift_y: y.center_shift,
        edge_ratio_x: settings.edge_ratio_x,
        edge_ratio_y: settings.edge_ratio_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    fn settings() -> FoveationSettings {
        FoveationSettings {
            center_size_x: 0.5,
            center_size_y: 0.25,
            center_shift_x: 0.5,
            center_shift_y: 0.25,
            edge_ratio_x: 4.0,
            edge_ratio_y: 2.0,
        }
    }

    #[test]
    fn test_disabled_without_settings() {
        let vars = calculate_foveation_vars(1920, 1824, None).unwrap();
        assert_eq!(vars, FoveationVars::disabled());
        assert!(!vars.enabled);
        assert_eq!(vars.target_resolution(), (0, 0));
    }

    #[test]
    fn test_already_aligned_settings() {
        let vars = calculate_foveation_vars(1920, 1824, Some(&settings())).unwrap();

        assert!(vars.enabled);
        assert_eq!(vars.target_resolution(), (1920, 1824));

        // X: edge 960 splits into 8px blocks; scale 0.5 + 0.5 / 4 = 0.625
        // gives 1200, rounded up to 1216.
        assert_close(vars.center_size_x, 0.5);
        assert_close(vars.center_shift_x, 0.5);
        assert_eq!(vars.optimized_eye_width, 1216);
        assert_close(vars.eye_width_ratio, 1200.0 / 1216.0);

        // Y: edge 1368 splits into 4px blocks; the shift snaps from 342 to
        // 344 pixels; scale 0.25 + 0.75 / 2 = 0.625 gives 1140 -> 1152.
        assert_close(vars.center_size_y, 0.25);
        assert_close(vars.center_shift_y, 344.0 / 1368.0);
        assert_eq!(vars.optimized_eye_height, 1152);
        assert_close(vars.eye_height_ratio, 1140.0 / 1152.0);

        assert_eq!(vars.edge_ratio_x, 4.0);
        assert_eq!(vars.edge_ratio_y, 2.0);
    }

    #[test]
    fn test_edge_is_snapped_to_blocks() {
        let s = FoveationSettings {
            center_size_x: 0.5,
            center_size_y: 1.0,
            center_shift_x: 0.0,
            center_shift_y: 0.0,
            edge_ratio_x: 3.0,
            edge_ratio_y: 1.0,
        };
        let vars = calculate_foveation_vars(1000, 640, Some(&s)).unwrap();

        // 500px edge grows to 504 (84 blocks of 6px).
        assert_close(vars.center_size_x, 0.496);
        let edge = 1000.0 - vars.center_size_x * 1000.0;
        assert!((edge - 504.0).abs() < 1e-3, "edge {edge}");

        // Full-size centre: no edge, no shift, no compression.
        assert_close(vars.center_size_y, 1.0);
        assert_close(vars.center_shift_y, 0.0);
        assert_eq!(vars.optimized_eye_height, 640);
        assert_close(vars.eye_height_ratio, 1.0);
    }

    #[test]
    fn test_optimized_is_encoder_aligned() {
        let vars = calculate_foveation_vars(1888, 1760, Some(&settings())).unwrap();
        assert_eq!(vars.optimized_eye_width % ENCODER_ALIGNMENT, 0);
        assert_eq!(vars.optimized_eye_height % ENCODER_ALIGNMENT, 0);
        assert!(vars.eye_width_ratio > 0.0 && vars.eye_width_ratio <= 1.0);
        assert!(vars.eye_height_ratio > 0.0 && vars.eye_height_ratio <= 1.0);
    }

    #[test]
    fn test_invalid_settings() {
        let mut s = settings();
        s.edge_ratio_x = 0.0;
        assert!(matches!(
            calculate_foveation_vars(1920, 1824, Some(&s)),
            Err(ShaderTypesError::InvalidFoveationSettings(_))
        ));

        let mut s = settings();
        s.center_size_y = 0.0;
        assert!(calculate_foveation_vars(1920, 1824, Some(&s)).is_err());

        let mut s = settings();
        s.center_shift_x = f32::NAN;
        assert!(calculate_foveation_vars(1920, 1824, Some(&s)).is_err());

        assert!(calculate_foveation_vars(0, 1824, Some(&settings())).is_err());
    }

    #[test]
    fn test_vanishing_center_is_rejected() {
        let s = FoveationSettings {
            center_size_x: 0.01,
            center_size_y: 0.5,
            center_shift_x: 0.0,
            center_shift_y: 0.0,
            edge_ratio_x: 4.0,
            edge_ratio_y: 2.0,
        };
        // 99px edge rounds up to 104px, wider than the 100px eye.
        assert!(calculate_foveation_vars(100, 100, Some(&s)).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "center_size_x": 0.45,
            "center_size_y": 0.4,
            "center_shift_x": 0.4,
            "center_shift_y": 0.1,
            "edge_ratio_x": 4.0,
            "edge_ratio_y": 5.0
        }"#;
        let s = FoveationSettings::from_json(json).unwrap();
        assert_eq!(s.center_size_x, 0.45);
        assert_eq!(s.edge_ratio_y, 5.0);

        let missing = r#"{ "center_size_x": 0.45 }"#;
        assert!(matches!(
            FoveationSettings::from_json(missing),
            Err(ShaderTypesError::SettingsParse(_))
        ));
    }
}
