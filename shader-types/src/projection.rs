//! Per-eye projection built from frustum tangents.
//!
//! Headsets describe each eye's frustum as four half-angle tangents rather
//! than a field of view and aspect ratio, and the frusta are asymmetric. The
//! projection produced here is right-handed (the eye looks down -Z), maps
//! clip depth to `[0, 1]`, and uses reverse-Z: the near plane lands on depth
//! 1 and the far plane (possibly at infinity) on depth 0.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::error::ShaderTypesError;

/// Frustum half-angle tangents of one eye.
///
/// All four values are positive magnitudes measured from the view axis. The
/// field order matches the `tangents` vector of [`Uniforms`](crate::Uniforms).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ViewTangents {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

static_assertions::assert_eq_size!(ViewTangents, Vec4);

impl ViewTangents {
    /// Create tangents from the four frustum edges.
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Symmetric frustum with the given horizontal and vertical half-angle
    /// tangents.
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, horizontal, vertical, vertical)
    }

    /// Pack into the vector layout shaders read.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.left, self.right, self.top, self.bottom)
    }

    /// Half angles of each frustum edge, in radians.
    pub fn fov_angles(self) -> Vec4 {
        Vec4::new(
            self.left.atan(),
            self.right.atan(),
            self.top.atan(),
            self.bottom.atan(),
        )
    }

    /// Build the off-centre reverse-Z projection for this eye.
    ///
    /// `far` may be `f32::INFINITY` for an infinite far plane.
    pub fn projection(self, near: f32, far: f32) -> Result<Mat4, ShaderTypesError> {
        let width = self.left + self.right;
        let height = self.top + self.bottom;

        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ShaderTypesError::InvalidProjection(format!(
                "tangents must span a non-empty frustum, got {self:?}"
            )));
        }
        if !near.is_finite() || near <= 0.0 {
            return Err(ShaderTypesError::InvalidProjection(format!(
                "near plane must be positive and finite, got {near}"
            )));
        }
        if far.is_nan() || far <= near {
            return Err(ShaderTypesError::InvalidProjection(format!(
                "far plane ({far}) must lie beyond the near plane ({near})"
            )));
        }

        let scale_x = 2.0 / width;
        let scale_y = 2.0 / height;
        let offset_x = (self.right - self.left) / width;
        let offset_y = (self.top - self.bottom) / height;

        let (depth_scale, depth_offset) = if far.is_infinite() {
            (0.0, near)
        } else {
            let range = far - near;
            (near / range, near * far / range)
        };
        if !(depth_scale.is_finite() && depth_offset.is_finite()) {
            return Err(ShaderTypesError::InvalidProjection(format!(
                "depth range near={near} far={far} does not fit in f32"
            )));
        }

        Ok(Mat4::from_cols(
            Vec4::new(scale_x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale_y, 0.0, 0.0),
            Vec4::new(offset_x, offset_y, depth_scale, -1.0),
            Vec4::new(0.0, 0.0, depth_offset, 0.0),
        ))
    }
}

impl From<Vec4> for ViewTangents {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<ViewTangents> for Vec4 {
    fn from(t: ViewTangents) -> Self {
        t.to_vec4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.truncate() / clip.w
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_symmetric_infinite_matches_glam() {
        let tangents = ViewTangents::symmetric(1.0, 1.0);
        let ours = tangents.projection(0.1, f32::INFINITY).unwrap();
        let glam = Mat4::perspective_infinite_reverse_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1);
        for (a, b) in ours.to_cols_array().iter().zip(glam.to_cols_array().iter()) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_frustum_edges_map_to_ndc_bounds() {
        // Vision Pro style asymmetric frustum.
        let tangents = ViewTangents::new(1.73205, 1.0, 1.0, 1.19175);
        let m = tangents.projection(0.1, 100.0).unwrap();
        let d = 5.0;

        assert_close(project(m, Vec3::new(tangents.right * d, 0.0, -d)).x, 1.0);
        assert_close(project(m, Vec3::new(-tangents.left * d, 0.0, -d)).x, -1.0);
        assert_close(project(m, Vec3::new(0.0, tangents.top * d, -d)).y, 1.0);
        assert_close(project(m, Vec3::new(0.0, -tangents.bottom * d, -d)).y, -1.0);
    }

    #[test]
    fn test_reverse_z_depth() {
        let m = ViewTangents::symmetric(1.0, 1.0)
            .projection(0.5, 50.0)
            .unwrap();
        assert_close(project(m, Vec3::new(0.0, 0.0, -0.5)).z, 1.0);
        assert_close(project(m, Vec3::new(0.0, 0.0, -50.0)).z, 0.0);

        let mid = project(m, Vec3::new(0.0, 0.0, -5.0)).z;
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_invalid_parameters() {
        let t = ViewTangents::symmetric(1.0, 1.0);
        assert!(t.projection(0.0, 10.0).is_err());
        assert!(t.projection(1.0, 1.0).is_err());
        assert!(t.projection(1.0, f32::NAN).is_err());
        assert!(ViewTangents::default().projection(0.1, 10.0).is_err());
    }

    #[test]
    fn test_depth_overflow() {
        let t = ViewTangents::symmetric(1.0, 1.0);
        let err = t.projection(1e20, 1e30).unwrap_err();
        assert!(matches!(err, ShaderTypesError::InvalidProjection(_)));
        assert!(t.projection(1e20, f32::INFINITY).is_ok());
    }

    #[test]
    fn test_vec4_conversion_and_angles() {
        let t = ViewTangents::new(1.0, 2.0, 3.0, 4.0);
        let v: Vec4 = t.into();
        assert_eq!(v, Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(ViewTangents::from(v), t);
        assert_close(t.fov_angles().x, std::f32::consts::FRAC_PI_4);
    }
}
