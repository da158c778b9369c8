use std::sync::Arc;

use glam::{Mat4, Vec3};
use raylink_core::errors::{ApiError, Result};
use raylink_render::TextureRef;
use raylink_render::camera::ExternalCamera;
use raylink_render::device::ImageView;
use raylink_render::scene::UiDraw;

use crate::convert::{matrix4_to_mat4, with_new_viewer_position};
use crate::external::{Matrix4, UiInstanceFlags, UiInstanceInfo};

/// Builds a rasterized UI draw.
///
/// With `USE_MAINCAMERA_VIEW_PROJECTION` the view and projection come from
/// the last main camera (identity when none was set). Missing matrices are
/// identity. An unknown image name draws untextured.
pub fn translate_ui_instance(
    info: &UiInstanceInfo<'_>,
    main_camera: Option<&ExternalCamera>,
    find_image: impl FnOnce(&str) -> Option<Arc<ImageView>>,
) -> Result<UiDraw> {
    let (primitives, what) = if info.indices.is_empty() {
        (info.vertices.len(), "vertex")
    } else {
        (info.indices.len(), "index")
    };
    if primitives % 3 != 0 {
        return Err(ApiError::invalid(format!(
            "UI {what} count {primitives} is not a multiple of 3"
        )));
    }

    let (view, projection) = if info.flags.contains(UiInstanceFlags::USE_MAINCAMERA_VIEW_PROJECTION) {
        let view = main_camera.map(|camera| camera.world_to_view);
        let projection = main_camera.map_or(Mat4::IDENTITY, |camera| camera.view_to_projection);
        let view = if info.flags.contains(UiInstanceFlags::FORCE_SKYVIEWER_AT_ORIGIN) {
            with_new_viewer_position(view.as_ref(), Vec3::ZERO)
        } else {
            view.unwrap_or(Mat4::IDENTITY)
        };
        (view, projection)
    } else {
        (optional_matrix(info.view), optional_matrix(info.projection))
    };

    let image = info
        .image_name
        .filter(|name| !name.is_empty())
        .and_then(find_image)
        .map(TextureRef::Uploaded);

    Ok(UiDraw {
        image,
        world: optional_matrix(info.world),
        view,
        projection,
        viewport: info.viewport,
        vertices: info.vertices.to_vec(),
        indices: info.indices.to_vec(),
        color: info.color,
        sky: info.flags.contains(UiInstanceFlags::SKY),
        skip_normals: info.flags.contains(UiInstanceFlags::SKIP_NORMALS),
    })
}

fn optional_matrix(m: Option<&Matrix4>) -> Mat4 {
    m.map_or(Mat4::IDENTITY, matrix4_to_mat4)
}
