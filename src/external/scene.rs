use bitflags::bitflags;
use raylink_core::MeshHandle;
use raylink_render::raw_enum;

use super::chain::ExtensionChain;
use super::{Float3D, Format, HardcodedVertex, Matrix4, Transform, Viewport};

// ============================================================================
// Camera
// ============================================================================

raw_enum! {
    #[derive(Default)]
    pub enum CameraTypeTag: u32 {
        #[default]
        World = 0,
        ViewModel = 1,
        Sky = 2,
    }
}

#[derive(Debug, Clone, Default)]
pub struct CameraInfo<'a> {
    pub camera_type: CameraTypeTag,
    /// World-to-view, used when no parameterized extension is present.
    pub view: Matrix4,
    pub projection: Matrix4,
    pub extensions: ExtensionChain<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInfoParameterizedExt {
    pub position: Float3D,
    pub forward: Float3D,
    pub up: Float3D,
    pub right: Float3D,
    pub fov_y_in_degrees: f32,
    pub aspect: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraInfoParameterizedExt {
    fn default() -> Self {
        Self {
            position: Float3D::default(),
            forward: Float3D::new(0.0, 0.0, 1.0),
            up: Float3D::new(0.0, 1.0, 0.0),
            right: Float3D::new(1.0, 0.0, 0.0),
            fov_y_in_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

// ============================================================================
// Instances
// ============================================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstanceCategoryFlags: u32 {
        const WORLD_UI = 1 << 0;
        const WORLD_MATTE = 1 << 1;
        const SKY = 1 << 2;
        const IGNORE = 1 << 3;
        const IGNORE_LIGHTS = 1 << 4;
        const IGNORE_ANTI_CULLING = 1 << 5;
        const IGNORE_MOTION_BLUR = 1 << 6;
        const IGNORE_OPACITY_MICROMAP = 1 << 7;
        const IGNORE_ALPHA_CHANNEL = 1 << 8;
        const HIDDEN = 1 << 9;
        const PARTICLE = 1 << 10;
        const BEAM = 1 << 11;
        const DECAL_STATIC = 1 << 12;
        const DECAL_DYNAMIC = 1 << 13;
        const DECAL_SINGLE_OFFSET = 1 << 14;
        const DECAL_NO_OFFSET = 1 << 15;
        const ALPHA_BLEND_TO_CUTOUT = 1 << 16;
        const TERRAIN = 1 << 17;
        const ANIMATED_WATER = 1 << 18;
        const THIRD_PERSON_PLAYER_MODEL = 1 << 19;
        const THIRD_PERSON_PLAYER_BODY = 1 << 20;
        const IGNORE_BAKED_LIGHTING = 1 << 21;
        /// Render with the view-model camera.
        const FIRST_PERSON = 1 << 30;
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstanceInfo<'a> {
    pub category_flags: InstanceCategoryFlags,
    pub mesh: MeshHandle,
    pub transform: Transform,
    pub double_sided: bool,
    pub extensions: ExtensionChain<'a>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceInfoObjectPickingExt {
    pub object_picking_value: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceInfoBoneTransformsExt<'a> {
    pub bone_transforms: &'a [Transform],
}

/// Fixed-function blend state. Enum fields are raw values and are checked
/// during translation.
#[derive(Debug, Clone, Copy)]
pub struct InstanceInfoBlendExt {
    pub alpha_test_enabled: bool,
    pub alpha_test_reference_value: u8,
    pub alpha_test_compare_op: u32,
    pub alpha_blend_enabled: bool,
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
    pub is_texture_factor_blend: bool,
}

impl Default for InstanceInfoBlendExt {
    fn default() -> Self {
        Self {
            alpha_test_enabled: false,
            alpha_test_reference_value: 0,
            alpha_test_compare_op: 7,
            alpha_blend_enabled: false,
            src_color_blend_factor: 1,
            dst_color_blend_factor: 0,
            color_blend_op: 0,
            texture_color_operation: 3,
            texture_color_arg1_source: 1,
            texture_color_arg2_source: 2,
            texture_alpha_operation: 1,
            texture_alpha_arg1_source: 1,
            texture_alpha_arg2_source: 0,
            t_factor: 0xFFFF_FFFF,
            is_texture_factor_blend: false,
        }
    }
}

// ============================================================================
// UI instances
// ============================================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UiInstanceFlags: u32 {
        const SKY = 1 << 0;
        const USE_MAINCAMERA_VIEW_PROJECTION = 1 << 1;
        const FORCE_SKYVIEWER_AT_ORIGIN = 1 << 2;
        const SKIP_NORMALS = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UiInstanceInfo<'a> {
    pub flags: UiInstanceFlags,
    /// Name of an image created through `CreateImage`.
    pub image_name: Option<&'a str>,
    pub world: Option<&'a Matrix4>,
    pub view: Option<&'a Matrix4>,
    pub projection: Option<&'a Matrix4>,
    pub viewport: Option<Viewport>,
    pub vertices: &'a [HardcodedVertex],
    pub indices: &'a [u32],
    /// Packed B8G8R8A8 texture factor.
    pub color: u32,
}

// ============================================================================
// Images, startup, outputs
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateImageInfo<'a> {
    pub image_name: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupInfo {
    pub disable_srgb_conversion_for_output: bool,
    pub editor_mode_enabled: bool,
}

raw_enum! {
    pub enum OutputType: u32 {
        FinalColor = 0,
        Depth = 1,
        Normals = 2,
        ObjectPicking = 3,
    }
}
