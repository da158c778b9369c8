//! Material translation.
//!
//! Runs on the caller thread and produces a [`PendingMaterial`] whose
//! texture slots still hold paths. The render thread resolves them later.

use raylink_core::errors::{ApiError, Result};
use raylink_render::material::{
    AlphaTestType, BlendType, Emission, FilterMode, MaterialData, OpaqueMaterial, PendingMaterial, RayPortalMaterial,
    SamplerState, SpriteSheet, TexturePath, TranslucentMaterial, WrapMode,
};

use super::checked_enum;
use crate::convert::{to_path, to_vec3};
use crate::external::{
    MaterialInfo, MaterialInfoOpaqueExt, MaterialInfoOpaqueSubsurfaceExt, MaterialInfoPortalExt,
    MaterialInfoTranslucentExt, StructType,
};

const MATERIAL_FAMILIES: [StructType; 3] = [
    StructType::MaterialInfoOpaqueExt,
    StructType::MaterialInfoTranslucentExt,
    StructType::MaterialInfoPortalExt,
];

pub fn translate_material(info: &MaterialInfo<'_>) -> Result<PendingMaterial> {
    let present = info.extensions.count_of(&MATERIAL_FAMILIES);
    if present > 1 {
        return Err(ApiError::invalid(
            "a material may carry only one of the opaque, translucent and portal extensions",
        ));
    }

    let sampler = sampler_state(info)?;
    let emission = Emission::from_intensity(info.emissive_intensity, to_vec3(info.emissive_color_constant));
    let sprite_sheet = SpriteSheet {
        rows: info.sprite_sheet_row,
        cols: info.sprite_sheet_col,
        fps: info.sprite_sheet_fps,
    };
    let common = Common {
        sampler,
        emission,
        sprite_sheet,
    };

    if let Some(opaque) = info.extensions.find::<MaterialInfoOpaqueExt>() {
        let subsurface = info.extensions.find::<MaterialInfoOpaqueSubsurfaceExt>();
        return opaque_material(info, opaque, subsurface, common).map(MaterialData::Opaque);
    }
    if let Some(translucent) = info.extensions.find::<MaterialInfoTranslucentExt>() {
        return Ok(MaterialData::Translucent(translucent_material(info, translucent, common)));
    }
    if let Some(portal) = info.extensions.find::<MaterialInfoPortalExt>() {
        return Ok(MaterialData::RayPortal(RayPortalMaterial {
            emissive_texture: to_path(info.emissive_texture),
            ray_portal_index: portal.ray_portal_index,
            rotation_speed: portal.rotation_speed,
            emission: common.emission,
            sprite_sheet: common.sprite_sheet,
            sampler: common.sampler,
        }));
    }

    missing_family(info.hash)
}

#[cfg(debug_assertions)]
fn missing_family(hash: u64) -> Result<PendingMaterial> {
    log::error!("material {hash:#018x} has no opaque, translucent or portal extension");
    Err(ApiError::invalid("material carries no material family extension"))
}

#[cfg(not(debug_assertions))]
fn missing_family(hash: u64) -> Result<PendingMaterial> {
    log::warn!("material {hash:#018x} has no material family extension, using the default opaque material");
    Ok(MaterialData::Opaque(OpaqueMaterial::default()))
}

#[derive(Clone, Copy)]
struct Common {
    sampler: SamplerState,
    emission: Emission,
    sprite_sheet: SpriteSheet,
}

fn sampler_state(info: &MaterialInfo<'_>) -> Result<SamplerState> {
    Ok(SamplerState {
        filter_mode: checked_enum("FilterMode", info.filter_mode, FilterMode::from_raw)?,
        wrap_mode_u: checked_enum("WrapMode", info.wrap_mode_u, WrapMode::from_raw)?,
        wrap_mode_v: checked_enum("WrapMode", info.wrap_mode_v, WrapMode::from_raw)?,
    })
}

fn opaque_material(
    info: &MaterialInfo<'_>,
    ext: &MaterialInfoOpaqueExt<'_>,
    subsurface: Option<&MaterialInfoOpaqueSubsurfaceExt<'_>>,
    common: Common,
) -> Result<OpaqueMaterial<TexturePath>> {
    let blend_type = match ext.blend_type {
        Some(raw) => checked_enum("BlendType", raw, BlendType::from_raw)?,
        None => BlendType::default(),
    };
    let alpha_test_type = checked_enum("AlphaTestType", ext.alpha_test_type, AlphaTestType::from_raw)?;

    let mut material = OpaqueMaterial {
        albedo_texture: to_path(info.albedo_texture),
        normal_texture: to_path(info.normal_texture),
        tangent_texture: to_path(info.tangent_texture),
        height_texture: to_path(ext.height_texture),
        roughness_texture: to_path(ext.roughness_texture),
        metallic_texture: to_path(ext.metallic_texture),
        emissive_texture: to_path(info.emissive_texture),
        anisotropy: ext.anisotropy,
        albedo_constant: to_vec3(ext.albedo_constant),
        opacity_constant: ext.opacity_constant,
        roughness_constant: ext.roughness_constant,
        metallic_constant: ext.metallic_constant,
        emission: common.emission,
        sprite_sheet: common.sprite_sheet,
        enable_thin_film: ext.thin_film_thickness.is_some(),
        alpha_is_thin_film_thickness: ext.alpha_is_thin_film_thickness,
        thin_film_thickness_constant: ext
            .thin_film_thickness
            .unwrap_or(OpaqueMaterial::<()>::DEFAULT_THIN_FILM_THICKNESS),
        use_legacy_alpha_state: ext.use_draw_call_alpha_state,
        blend_enabled: ext.blend_type.is_some(),
        blend_type,
        inverted_blend: ext.inverted_blend,
        alpha_test_type,
        alpha_test_reference_value: ext.alpha_reference_value,
        displace_in: ext.height_texture_strength,
        sampler: common.sampler,
        ..OpaqueMaterial::default()
    };

    if let Some(sss) = subsurface {
        material.subsurface_transmittance_texture = to_path(sss.subsurface_transmittance_texture);
        material.subsurface_thickness_texture = to_path(sss.subsurface_thickness_texture);
        material.subsurface_single_scattering_albedo_texture = to_path(sss.subsurface_single_scattering_albedo_texture);
        material.subsurface_transmittance_color = to_vec3(sss.subsurface_transmittance_color);
        material.subsurface_measurement_distance = sss.subsurface_measurement_distance;
        material.subsurface_single_scattering_albedo = to_vec3(sss.subsurface_single_scattering_albedo);
        material.subsurface_volumetric_anisotropy = sss.subsurface_volumetric_anisotropy;
    }

    Ok(material)
}

fn translucent_material(
    info: &MaterialInfo<'_>,
    ext: &MaterialInfoTranslucentExt<'_>,
    common: Common,
) -> TranslucentMaterial<TexturePath> {
    TranslucentMaterial {
        normal_texture: to_path(info.normal_texture),
        transmittance_texture: to_path(ext.transmittance_texture),
        emissive_texture: to_path(info.emissive_texture),
        refractive_index: ext.refractive_index,
        transmittance_color: to_vec3(ext.transmittance_color),
        transmittance_measurement_distance: ext.transmittance_measurement_distance,
        emission: common.emission,
        sprite_sheet: common.sprite_sheet,
        enable_thin_walled: ext.thin_wall_thickness.is_some(),
        thin_wall_thickness: ext
            .thin_wall_thickness
            .unwrap_or(TranslucentMaterial::<()>::DEFAULT_THIN_WALL_THICKNESS),
        enable_diffuse_layer: ext.use_diffuse_layer,
        sampler: common.sampler,
    }
}
