use glam::{DMat4, Mat4};
use raylink_core::errors::{ApiError, Result};
use raylink_render::CameraType;
use raylink_render::camera::ExternalCamera;
use raylink_render::draw::InstanceCategories;
use raylink_render::light::LightShaping;
use raylink_render::scene::OutputType as RtOutputType;

use super::math::{matrix4_to_mat4, to_dvec3, to_vec3};
use crate::external::{
    CameraInfo, CameraInfoParameterizedExt, CameraTypeTag, InstanceCategoryFlags, LightShapingInfo, OutputType,
};

// ============================================================================
// Cameras
// ============================================================================

#[must_use]
pub fn to_camera_type(tag: CameraTypeTag) -> CameraType {
    match tag {
        CameraTypeTag::World => CameraType::Main,
        CameraTypeTag::ViewModel => CameraType::ViewModel,
        CameraTypeTag::Sky => CameraType::Sky,
    }
}

/// Raw camera tags that name no type fall back to the main camera.
#[must_use]
pub fn camera_type_from_raw(raw: u32) -> CameraType {
    CameraTypeTag::from_raw(raw).map_or_else(
        || {
            log::warn!("unknown camera type {raw}, using the main camera");
            CameraType::Main
        },
        to_camera_type,
    )
}

/// Builds view and projection from position, axes and frustum parameters.
///
/// The basis is assembled and inverted in double precision. Axes are
/// normalized but not orthogonalized. The projection is left-handed with a
/// `[0, 1]` depth range.
#[must_use]
pub fn parameterized_camera(camera_type: CameraType, params: &CameraInfoParameterizedExt) -> ExternalCamera {
    let view_to_world = DMat4::from_cols(
        to_dvec3(params.right).normalize().extend(0.0),
        to_dvec3(params.up).normalize().extend(0.0),
        to_dvec3(params.forward).normalize().extend(0.0),
        to_dvec3(params.position).extend(1.0),
    );
    let world_to_view = view_to_world.inverse().as_mat4();
    let view_to_projection = Mat4::perspective_lh(
        params.fov_y_in_degrees.to_radians(),
        params.aspect,
        params.near_plane,
        params.far_plane,
    );
    ExternalCamera {
        camera_type,
        world_to_view,
        view_to_projection,
    }
}

/// Converts a camera, preferring the parameterized form when present.
#[must_use]
pub fn to_external_camera(info: &CameraInfo<'_>) -> ExternalCamera {
    let camera_type = to_camera_type(info.camera_type);
    match info.extensions.find::<CameraInfoParameterizedExt>() {
        Some(params) => parameterized_camera(camera_type, params),
        None => ExternalCamera {
            camera_type,
            world_to_view: matrix4_to_mat4(&info.view),
            view_to_projection: matrix4_to_mat4(&info.projection),
        },
    }
}

// ============================================================================
// Light shaping
// ============================================================================

/// Absent shaping yields the inert disabled shaping. Present shaping must
/// be valid, otherwise the whole light is rejected.
pub fn to_light_shaping(info: Option<&LightShapingInfo>) -> Result<LightShaping> {
    let Some(info) = info else {
        return Ok(LightShaping::disabled());
    };
    LightShaping::try_create(
        true,
        to_vec3(info.direction),
        info.cone_angle_degrees.to_radians().cos(),
        info.cone_softness,
        info.focus_exponent,
    )
    .ok_or_else(|| ApiError::invalid("light shaping parameters are out of range"))
}

// ============================================================================
// Instance categories
// ============================================================================

const CATEGORY_TABLE: [(InstanceCategoryFlags, InstanceCategories); 22] = [
    (InstanceCategoryFlags::WORLD_UI, InstanceCategories::WORLD_UI),
    (InstanceCategoryFlags::WORLD_MATTE, InstanceCategories::WORLD_MATTE),
    (InstanceCategoryFlags::SKY, InstanceCategories::SKY),
    (InstanceCategoryFlags::IGNORE, InstanceCategories::IGNORE),
    (InstanceCategoryFlags::IGNORE_LIGHTS, InstanceCategories::IGNORE_LIGHTS),
    (InstanceCategoryFlags::IGNORE_ANTI_CULLING, InstanceCategories::IGNORE_ANTI_CULLING),
    (InstanceCategoryFlags::IGNORE_MOTION_BLUR, InstanceCategories::IGNORE_MOTION_BLUR),
    (InstanceCategoryFlags::IGNORE_OPACITY_MICROMAP, InstanceCategories::IGNORE_OPACITY_MICROMAP),
    (InstanceCategoryFlags::IGNORE_ALPHA_CHANNEL, InstanceCategories::IGNORE_ALPHA_CHANNEL),
    (InstanceCategoryFlags::HIDDEN, InstanceCategories::HIDDEN),
    (InstanceCategoryFlags::PARTICLE, InstanceCategories::PARTICLE),
    (InstanceCategoryFlags::BEAM, InstanceCategories::BEAM),
    (InstanceCategoryFlags::DECAL_STATIC, InstanceCategories::DECAL_STATIC),
    (InstanceCategoryFlags::DECAL_DYNAMIC, InstanceCategories::DECAL_DYNAMIC),
    (InstanceCategoryFlags::DECAL_SINGLE_OFFSET, InstanceCategories::DECAL_SINGLE_OFFSET),
    (InstanceCategoryFlags::DECAL_NO_OFFSET, InstanceCategories::DECAL_NO_OFFSET),
    (InstanceCategoryFlags::ALPHA_BLEND_TO_CUTOUT, InstanceCategories::ALPHA_BLEND_TO_CUTOUT),
    (InstanceCategoryFlags::TERRAIN, InstanceCategories::TERRAIN),
    (InstanceCategoryFlags::ANIMATED_WATER, InstanceCategories::ANIMATED_WATER),
    (InstanceCategoryFlags::THIRD_PERSON_PLAYER_MODEL, InstanceCategories::THIRD_PERSON_PLAYER_MODEL),
    (InstanceCategoryFlags::THIRD_PERSON_PLAYER_BODY, InstanceCategories::THIRD_PERSON_PLAYER_BODY),
    (InstanceCategoryFlags::IGNORE_BAKED_LIGHTING, InstanceCategories::IGNORE_BAKED_LIGHTING),
];

/// One bit test per category. `FIRST_PERSON` has no internal category.
#[must_use]
pub fn to_categories(flags: InstanceCategoryFlags) -> InstanceCategories {
    CATEGORY_TABLE
        .iter()
        .filter(|(external, _)| flags.contains(*external))
        .fold(InstanceCategories::empty(), |acc, (_, internal)| acc | *internal)
}

/// Sky wins over first person.
#[must_use]
pub fn category_to_camera_type(flags: InstanceCategoryFlags) -> CameraType {
    if flags.contains(InstanceCategoryFlags::SKY) {
        CameraType::Sky
    } else if flags.contains(InstanceCategoryFlags::FIRST_PERSON) {
        CameraType::ViewModel
    } else {
        CameraType::Main
    }
}

// ============================================================================
// Outputs
// ============================================================================

#[must_use]
pub fn to_output_type(output: OutputType) -> RtOutputType {
    match output {
        OutputType::FinalColor => RtOutputType::FinalColor,
        OutputType::Depth => RtOutputType::Depth,
        OutputType::Normals => RtOutputType::Normals,
        OutputType::ObjectPicking => RtOutputType::ObjectPicking,
    }
}
