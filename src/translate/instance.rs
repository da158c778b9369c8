use raylink_core::errors::Result;
use raylink_render::CameraType;
use raylink_render::draw::{
    BlendFactor, BlendOp, CompareOp, DrawCallState, ExternalDrawState, LegacyMaterialState, MAX_BONES, SkinningData,
    TexGenMode, TextureArgSource, TextureOperation,
};

use super::checked_enum;
use crate::convert::{category_to_camera_type, to_categories, to_mat4};
use crate::external::{
    InstanceCategoryFlags, InstanceInfo, InstanceInfoBlendExt, InstanceInfoBoneTransformsExt,
    InstanceInfoObjectPickingExt,
};

/// Builds the per-frame draw prototype of a mesh instance.
///
/// Only the prototype's camera follows `FIRST_PERSON` alone; the draw state
/// itself uses [`category_to_camera_type`], where sky takes precedence.
pub fn translate_instance(info: &InstanceInfo<'_>) -> Result<ExternalDrawState> {
    let mut prototype = DrawCallState {
        camera_type: if info.category_flags.contains(InstanceCategoryFlags::FIRST_PERSON) {
            CameraType::ViewModel
        } else {
            CameraType::Main
        },
        object_to_world: to_mat4(&info.transform),
        texgen_mode: TexGenMode::None,
        categories: to_categories(info.category_flags),
        ..DrawCallState::default()
    };

    if let Some(picking) = info.extensions.find::<InstanceInfoObjectPickingExt>() {
        prototype.draw_call_id = picking.object_picking_value;
    }
    if let Some(bones) = info.extensions.find::<InstanceInfoBoneTransformsExt>() {
        prototype.skinning = skinning(bones);
    }
    if let Some(blend) = info.extensions.find::<InstanceInfoBlendExt>() {
        prototype.material = legacy_material(blend)?;
    }

    Ok(ExternalDrawState {
        prototype,
        mesh: info.mesh,
        camera_type: category_to_camera_type(info.category_flags),
        categories: to_categories(info.category_flags),
        double_sided: info.double_sided,
    })
}

/// Bones past [`MAX_BONES`] are dropped. Bones per vertex is filled in from
/// the mesh when the instance is committed.
fn skinning(ext: &InstanceInfoBoneTransformsExt<'_>) -> SkinningData {
    let bones = &ext.bone_transforms[..ext.bone_transforms.len().min(MAX_BONES)];
    if bones.len() < ext.bone_transforms.len() {
        log::warn!("instance has {} bone transforms, keeping {MAX_BONES}", ext.bone_transforms.len());
    }
    SkinningData {
        bone_matrices: bones.iter().map(to_mat4).collect(),
        min_bone_index: 0,
        num_bones: bones.len() as u32,
        num_bones_per_vertex: 0,
    }
}

fn legacy_material(ext: &InstanceInfoBlendExt) -> Result<LegacyMaterialState> {
    Ok(LegacyMaterialState {
        alpha_test_enabled: ext.alpha_test_enabled,
        alpha_test_reference_value: ext.alpha_test_reference_value,
        alpha_test_compare_op: checked_enum("CompareOp", ext.alpha_test_compare_op, CompareOp::from_raw)?,
        alpha_blend_enabled: ext.alpha_blend_enabled,
        src_color_blend_factor: checked_enum("BlendFactor", ext.src_color_blend_factor, BlendFactor::from_raw)?,
        dst_color_blend_factor: checked_enum("BlendFactor", ext.dst_color_blend_factor, BlendFactor::from_raw)?,
        color_blend_op: checked_enum("BlendOp", ext.color_blend_op, BlendOp::from_raw)?,
        texture_color_operation: checked_enum(
            "TextureOperation",
            ext.texture_color_operation,
            TextureOperation::from_raw,
        )?,
        texture_color_arg1_source: checked_enum(
            "TextureArgSource",
            ext.texture_color_arg1_source,
            TextureArgSource::from_raw,
        )?,
        texture_color_arg2_source: checked_enum(
            "TextureArgSource",
            ext.texture_color_arg2_source,
            TextureArgSource::from_raw,
        )?,
        texture_alpha_operation: checked_enum(
            "TextureOperation",
            ext.texture_alpha_operation,
            TextureOperation::from_raw,
        )?,
        texture_alpha_arg1_source: checked_enum(
            "TextureArgSource",
            ext.texture_alpha_arg1_source,
            TextureArgSource::from_raw,
        )?,
        texture_alpha_arg2_source: checked_enum(
            "TextureArgSource",
            ext.texture_alpha_arg2_source,
            TextureArgSource::from_raw,
        )?,
        t_factor: ext.t_factor,
        is_texture_factor_blend: ext.is_texture_factor_blend,
    })
}
