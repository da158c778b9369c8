//! `#[repr(C)]` mirrors of the external structs.
//!
//! Every struct that can head or join a chain starts with the same
//! `{ s_type, p_next }` header. Optional values travel as a
//! `*_hasvalue` flag next to the value; arrays as a `*_values` pointer plus
//! a `*_count`. Paths and names are NUL-terminated UTF-8.

use std::ffi::{c_char, c_void};

use crate::external::{Float3D, HardcodedVertex, Matrix4, Rect2D, Transform, Viewport};

/// C boolean. Any non-zero value is true.
pub type RlBool = u32;

/// NUL-terminated UTF-8 string. Null or empty means absent.
pub type RlPath = *const c_char;

/// The header every chainable struct starts with.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlBaseHeader {
    pub s_type: u32,
    pub p_next: *const c_void,
}

// ============================================================================
// Library
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlInitializeLibraryInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub version: u64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlStartupInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    /// Window the host renders into. Unused by the headless backend.
    pub hwnd: *mut c_void,
    pub disable_srgb_conversion_for_output: RlBool,
    pub editor_mode_enabled: RlBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlPresentInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub hwnd_override: *mut c_void,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlCreateImageInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub image_name: RlPath,
    pub width: u32,
    pub height: u32,
    /// Raw `Format` tag.
    pub format: u32,
    pub p_data: *const u8,
    pub data_size: usize,
}

// ============================================================================
// Materials
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMaterialInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub hash: u64,
    pub albedo_texture: RlPath,
    pub normal_texture: RlPath,
    pub tangent_texture: RlPath,
    pub emissive_texture: RlPath,
    pub emissive_intensity: f32,
    pub emissive_color_constant: Float3D,
    pub sprite_sheet_row: u8,
    pub sprite_sheet_col: u8,
    pub sprite_sheet_fps: u8,
    pub filter_mode: u8,
    pub wrap_mode_u: u8,
    pub wrap_mode_v: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMaterialInfoOpaqueExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub roughness_texture: RlPath,
    pub metallic_texture: RlPath,
    pub height_texture: RlPath,
    pub anisotropy: f32,
    pub albedo_constant: Float3D,
    pub opacity_constant: f32,
    pub roughness_constant: f32,
    pub metallic_constant: f32,
    pub thin_film_thickness_hasvalue: RlBool,
    pub thin_film_thickness_value: f32,
    pub alpha_is_thin_film_thickness: RlBool,
    pub height_texture_strength: f32,
    pub use_draw_call_alpha_state: RlBool,
    pub blend_type_hasvalue: RlBool,
    pub blend_type_value: i32,
    pub inverted_blend: RlBool,
    pub alpha_test_type: i32,
    pub alpha_reference_value: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMaterialInfoOpaqueSubsurfaceExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub subsurface_transmittance_texture: RlPath,
    pub subsurface_thickness_texture: RlPath,
    pub subsurface_single_scattering_albedo_texture: RlPath,
    pub subsurface_transmittance_color: Float3D,
    pub subsurface_measurement_distance: f32,
    pub subsurface_single_scattering_albedo: Float3D,
    pub subsurface_volumetric_anisotropy: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMaterialInfoTranslucentExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub transmittance_texture: RlPath,
    pub refractive_index: f32,
    pub transmittance_color: Float3D,
    pub transmittance_measurement_distance: f32,
    pub thin_wall_thickness_hasvalue: RlBool,
    pub thin_wall_thickness_value: f32,
    pub use_diffuse_layer: RlBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMaterialInfoPortalExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub ray_portal_index: u8,
    pub rotation_speed: f32,
}

// ============================================================================
// Meshes
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMeshInfoSkinning {
    pub bones_per_vertex: u32,
    pub blend_weights_values: *const f32,
    pub blend_weights_count: u32,
    pub blend_indices_values: *const u32,
    pub blend_indices_count: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMeshInfoSurfaceTriangles {
    pub vertices_values: *const HardcodedVertex,
    pub vertices_count: u64,
    pub indices_values: *const u32,
    pub indices_count: u64,
    pub skinning_hasvalue: RlBool,
    pub skinning_value: RlMeshInfoSkinning,
    pub material: u64,
    pub flags: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlMeshInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub hash: u64,
    pub surfaces_values: *const RlMeshInfoSurfaceTriangles,
    pub surfaces_count: u32,
}

// ============================================================================
// Lights
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoLightShaping {
    pub direction: Float3D,
    pub cone_angle_degrees: f32,
    pub cone_softness: f32,
    pub focus_exponent: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub hash: u64,
    pub radiance: Float3D,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoSphereExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub position: Float3D,
    pub radius: f32,
    pub shaping_hasvalue: RlBool,
    pub shaping_value: RlLightInfoLightShaping,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoRectExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub position: Float3D,
    pub x_axis: Float3D,
    pub x_size: f32,
    pub y_axis: Float3D,
    pub y_size: f32,
    pub direction: Float3D,
    pub shaping_hasvalue: RlBool,
    pub shaping_value: RlLightInfoLightShaping,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoDiskExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub position: Float3D,
    pub x_axis: Float3D,
    pub x_radius: f32,
    pub y_axis: Float3D,
    pub y_radius: f32,
    pub direction: Float3D,
    pub shaping_hasvalue: RlBool,
    pub shaping_value: RlLightInfoLightShaping,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoCylinderExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub position: Float3D,
    pub radius: f32,
    pub axis: Float3D,
    pub axis_length: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoDistantExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub direction: Float3D,
    pub angular_diameter_degrees: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoDomeExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub transform: Transform,
    pub color_texture: RlPath,
}

/// USD light attributes. A null pointer means the attribute is unauthored.
///
/// `light_type` holds the struct type tag of the analytic family the light
/// belongs to (`LightInfoSphereExt`, `LightInfoRectExt`, ...).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlLightInfoUsdExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub light_type: u32,
    pub transform: Transform,
    pub p_radius: *const f32,
    pub p_width: *const f32,
    pub p_height: *const f32,
    pub p_length: *const f32,
    pub p_angle_radians: *const f32,
    pub p_enable_color_temp: *const RlBool,
    pub p_color: *const Float3D,
    pub p_color_temp: *const f32,
    pub p_exposure: *const f32,
    pub p_intensity: *const f32,
    pub p_cone_angle_radians: *const f32,
    pub p_cone_softness: *const f32,
    pub p_focus: *const f32,
}

// ============================================================================
// Scene submission
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlCameraInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    /// Raw `CameraTypeTag`.
    pub camera_type: u32,
    pub view: Matrix4,
    pub projection: Matrix4,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlCameraInfoParameterizedExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub position: Float3D,
    pub forward: Float3D,
    pub up: Float3D,
    pub right: Float3D,
    pub fov_y_in_degrees: f32,
    pub aspect: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlInstanceInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub category_flags: u32,
    pub mesh: u64,
    pub transform: Transform,
    pub double_sided: RlBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlInstanceInfoBoneTransformsExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub bone_transforms_values: *const Transform,
    pub bone_transforms_count: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlInstanceInfoBlendExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub alpha_test_enabled: RlBool,
    pub alpha_test_reference_value: u8,
    pub alpha_test_compare_op: u32,
    pub alpha_blend_enabled: RlBool,
    pub src_color_blend_factor: u32,
    pub dst_color_blend_factor: u32,
    pub color_blend_op: u32,
    pub texture_color_operation: u32,
    pub texture_color_arg1_source: u32,
    pub texture_color_arg2_source: u32,
    pub texture_alpha_operation: u32,
    pub texture_alpha_arg1_source: u32,
    pub texture_alpha_arg2_source: u32,
    pub t_factor: u32,
    pub is_texture_factor_blend: RlBool,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlInstanceInfoObjectPickingExt {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub object_picking_value: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RlUiInstanceInfo {
    pub s_type: u32,
    pub p_next: *const c_void,
    pub flags: u32,
    pub image_name: RlPath,
    pub p_world: *const Matrix4,
    pub p_view: *const Matrix4,
    pub p_projection: *const Matrix4,
    pub viewport_hasvalue: RlBool,
    pub viewport_value: Viewport,
    pub vertices_values: *const HardcodedVertex,
    pub vertices_count: u32,
    pub indices_values: *const u32,
    pub indices_count: u32,
    pub color: u32,
}

// ============================================================================
// Picking
// ============================================================================

pub type RlRect2D = Rect2D;

/// Receives the picked values. `values` is only valid during the call.
pub type RlPickCallback = unsafe extern "C" fn(values: *const u32, values_count: u32, user_data: *mut c_void);
