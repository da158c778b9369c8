//! Per-instance draw state.

use bitflags::bitflags;
use glam::Mat4;
use raylink_core::MeshHandle;

use crate::camera::CameraType;
use crate::raw_enum;

/// Upper bound on bone transforms per instance.
pub const MAX_BONES: usize = 256;

bitflags! {
    /// Renderer-side instance categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstanceCategories: u32 {
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
    }
}

// ============================================================================
// Fixed-function blend state
// ============================================================================

raw_enum! {
    #[derive(Default)]
    pub enum CompareOp: u32 {
        Never = 0,
        Less = 1,
        Equal = 2,
        LessOrEqual = 3,
        Greater = 4,
        NotEqual = 5,
        GreaterOrEqual = 6,
        #[default]
        Always = 7,
    }
}

raw_enum! {
    #[derive(Default)]
    pub enum BlendFactor: u32 {
        Zero = 0,
        #[default]
        One = 1,
        SrcColor = 2,
        OneMinusSrcColor = 3,
        DstColor = 4,
        OneMinusDstColor = 5,
        SrcAlpha = 6,
        OneMinusSrcAlpha = 7,
        DstAlpha = 8,
        OneMinusDstAlpha = 9,
        ConstantColor = 10,
        OneMinusConstantColor = 11,
        ConstantAlpha = 12,
        OneMinusConstantAlpha = 13,
        SrcAlphaSaturate = 14,
        Src1Color = 15,
        OneMinusSrc1Color = 16,
        Src1Alpha = 17,
        OneMinusSrc1Alpha = 18,
    }
}

raw_enum! {
    #[derive(Default)]
    pub enum BlendOp: u32 {
        #[default]
        Add = 0,
        Subtract = 1,
        ReverseSubtract = 2,
        Min = 3,
        Max = 4,
    }
}

raw_enum! {
    #[derive(Default)]
    pub enum TextureOperation: u32 {
        Disable = 0,
        SelectArg1 = 1,
        SelectArg2 = 2,
        #[default]
        Modulate = 3,
        Modulate2x = 4,
        Modulate4x = 5,
        Add = 6,
    }
}

raw_enum! {
    #[derive(Default)]
    pub enum TextureArgSource: u32 {
        None = 0,
        #[default]
        Texture = 1,
        VertexColor0 = 2,
        TFactor = 3,
    }
}

/// Legacy fixed-function state carried with every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyMaterialState {
    pub alpha_test_enabled: bool,
    pub alpha_test_reference_value: u8,
    pub alpha_test_compare_op: CompareOp,
    pub alpha_blend_enabled: bool,
    pub src_color_blend_factor: BlendFactor,
    pub dst_color_blend_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub texture_color_operation: TextureOperation,
    pub texture_color_arg1_source: TextureArgSource,
    pub texture_color_arg2_source: TextureArgSource,
    pub texture_alpha_operation: TextureOperation,
    pub texture_alpha_arg1_source: TextureArgSource,
    pub texture_alpha_arg2_source: TextureArgSource,
    pub t_factor: u32,
    pub is_texture_factor_blend: bool,
}

impl Default for LegacyMaterialState {
    fn default() -> Self {
        Self {
            alpha_test_enabled: false,
            alpha_test_reference_value: 0,
            alpha_test_compare_op: CompareOp::Always,
            alpha_blend_enabled: false,
            src_color_blend_factor: BlendFactor::One,
            dst_color_blend_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            texture_color_operation: TextureOperation::Modulate,
            texture_color_arg1_source: TextureArgSource::Texture,
            texture_color_arg2_source: TextureArgSource::VertexColor0,
            texture_alpha_operation: TextureOperation::SelectArg1,
            texture_alpha_arg1_source: TextureArgSource::Texture,
            texture_alpha_arg2_source: TextureArgSource::None,
            t_factor: 0xFFFF_FFFF,
            is_texture_factor_blend: false,
        }
    }
}

// ============================================================================
// Draw call
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexGenMode {
    #[default]
    None,
    ViewPositions,
    ViewNormals,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkinningData {
    pub bone_matrices: Vec<Mat4>,
    pub min_bone_index: u32,
    pub num_bones: u32,
    pub num_bones_per_vertex: u32,
}

/// Prototype draw call. Mesh-derived fields are completed on the render
/// thread when the instance is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCallState {
    pub camera_type: CameraType,
    pub object_to_world: Mat4,
    pub texture_transform: Mat4,
    pub texgen_mode: TexGenMode,
    pub categories: InstanceCategories,
    /// Value written into the object-picking output.
    pub draw_call_id: u32,
    pub skinning: SkinningData,
    pub material: LegacyMaterialState,
}

impl Default for DrawCallState {
    fn default() -> Self {
        Self {
            camera_type: CameraType::Main,
            object_to_world: Mat4::IDENTITY,
            texture_transform: Mat4::IDENTITY,
            texgen_mode: TexGenMode::None,
            categories: InstanceCategories::empty(),
            draw_call_id: 0,
            skinning: SkinningData::default(),
            material: LegacyMaterialState::default(),
        }
    }
}

/// An instance of a registered mesh, ready to be committed for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDrawState {
    pub prototype: DrawCallState,
    pub mesh: MeshHandle,
    pub camera_type: CameraType,
    pub categories: InstanceCategories,
    pub double_sided: bool,
}
