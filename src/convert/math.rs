use std::path::{Path, PathBuf};

use glam::{DVec3, Mat3, Mat4, Vec3};

use crate::external::{Float3D, Matrix4, Transform};

/// Expands a row-major 3x4 affine transform into a column-major `Mat4`.
///
/// Rotation and scale are copied as is, the translation lands in the last
/// column and the homogeneous row is fixed to `(0, 0, 0, 1)`.
#[must_use]
pub fn to_mat4(transform: &Transform) -> Mat4 {
    let m = &transform.matrix;
    Mat4::from_cols_array(&[
        m[0][0], m[1][0], m[2][0], 0.0, //
        m[0][1], m[1][1], m[2][1], 0.0, //
        m[0][2], m[1][2], m[2][2], 0.0, //
        m[0][3], m[1][3], m[2][3], 1.0,
    ])
}

/// Reinterprets an external 4x4 matrix. The memory order is kept, so each
/// stored row becomes one `Mat4` column.
#[inline]
#[must_use]
pub fn matrix4_to_mat4(m: &Matrix4) -> Mat4 {
    Mat4::from_cols_array_2d(m)
}

#[inline]
#[must_use]
pub fn mat4_to_matrix4(m: &Mat4) -> Matrix4 {
    m.to_cols_array_2d()
}

#[inline]
#[must_use]
pub fn to_vec3(v: Float3D) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
#[must_use]
pub fn to_dvec3(v: Float3D) -> DVec3 {
    DVec3::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

/// C booleans arrive as 32-bit integers; anything non-zero is true.
#[inline]
#[must_use]
pub fn to_bool(value: u32) -> bool {
    value != 0
}

/// An empty path counts as absent.
#[must_use]
pub fn to_path(path: Option<&Path>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty()).map(Path::to_path_buf)
}

/// Moves the viewer of `view` to `position` while keeping its orientation.
///
/// A missing view counts as identity.
#[must_use]
pub fn with_new_viewer_position(view: Option<&Mat4>, position: Vec3) -> Mat4 {
    let view = view.copied().unwrap_or(Mat4::IDENTITY);
    let translation = Mat3::from_mat4(view) * -position;
    let mut result = view;
    result.w_axis = translation.extend(view.w_axis.w);
    result
}
