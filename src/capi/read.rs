//! Reading caller memory into the external data model.
//!
//! Every function here borrows from raw pointers the caller guarantees to
//! be valid for the duration of the current entry point. The returned
//! values carry an unbounded lifetime; the entry point that calls them is
//! what bounds it.

use std::ffi::{CStr, c_void};
use std::path::Path;
use std::slice;

use raylink_core::errors::{ApiError, Result};
use raylink_core::{MaterialHandle, MeshHandle};

use super::types::{
    RlBaseHeader, RlBool, RlCameraInfo, RlCameraInfoParameterizedExt, RlCreateImageInfo, RlInitializeLibraryInfo,
    RlInstanceInfo, RlInstanceInfoBlendExt, RlInstanceInfoBoneTransformsExt, RlInstanceInfoObjectPickingExt,
    RlLightInfo, RlLightInfoCylinderExt, RlLightInfoDiskExt, RlLightInfoDistantExt, RlLightInfoDomeExt,
    RlLightInfoLightShaping, RlLightInfoRectExt, RlLightInfoSphereExt, RlLightInfoUsdExt, RlMaterialInfo,
    RlMaterialInfoOpaqueExt, RlMaterialInfoOpaqueSubsurfaceExt, RlMaterialInfoPortalExt,
    RlMaterialInfoTranslucentExt, RlMeshInfo, RlMeshInfoSurfaceTriangles, RlPath, RlPresentInfo, RlStartupInfo,
    RlUiInstanceInfo,
};
use crate::convert::to_bool;
use crate::external::{
    CameraInfo, CameraInfoParameterizedExt, CameraTypeTag, CreateImageInfo, ExtensionBlock, ExtensionChain, Format,
    InstanceCategoryFlags, InstanceInfo, InstanceInfoBlendExt, InstanceInfoBoneTransformsExt,
    InstanceInfoObjectPickingExt, LightInfo, LightInfoCylinderExt, LightInfoDiskExt, LightInfoDistantExt,
    LightInfoDomeExt, LightInfoRectExt, LightInfoSphereExt, LightInfoUsdExt, LightShapingInfo, MaterialInfo,
    MaterialInfoOpaqueExt, MaterialInfoOpaqueSubsurfaceExt, MaterialInfoPortalExt, MaterialInfoTranslucentExt,
    MeshInfo, MeshSkinning, MeshSurfaceTriangles, StartupInfo, StructType, SurfaceFlags, UiInstanceFlags,
    UiInstanceInfo, UsdLightType,
};

/// Nodes visited after the base struct before a walk gives up.
pub const MAX_CHAIN_LENGTH: usize = 64;

// ============================================================================
// Headers
// ============================================================================

/// A struct that starts with the `{ s_type, p_next }` header.
pub trait RawStruct {
    const STRUCT_TYPE: StructType;

    fn header(&self) -> RlBaseHeader;
}

macro_rules! raw_structs {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl RawStruct for $ty {
                const STRUCT_TYPE: StructType = StructType::$tag;

                fn header(&self) -> RlBaseHeader {
                    RlBaseHeader {
                        s_type: self.s_type,
                        p_next: self.p_next,
                    }
                }
            }
        )*
    };
}

raw_structs! {
    RlInitializeLibraryInfo => InitializeLibraryInfo,
    RlStartupInfo => StartupInfo,
    RlPresentInfo => PresentInfo,
    RlCreateImageInfo => CreateImageInfo,
    RlMaterialInfo => MaterialInfo,
    RlMaterialInfoOpaqueExt => MaterialInfoOpaqueExt,
    RlMaterialInfoOpaqueSubsurfaceExt => MaterialInfoOpaqueSubsurfaceExt,
    RlMaterialInfoTranslucentExt => MaterialInfoTranslucentExt,
    RlMaterialInfoPortalExt => MaterialInfoPortalExt,
    RlMeshInfo => MeshInfo,
    RlLightInfo => LightInfo,
    RlLightInfoSphereExt => LightInfoSphereExt,
    RlLightInfoRectExt => LightInfoRectExt,
    RlLightInfoDiskExt => LightInfoDiskExt,
    RlLightInfoCylinderExt => LightInfoCylinderExt,
    RlLightInfoDistantExt => LightInfoDistantExt,
    RlLightInfoDomeExt => LightInfoDomeExt,
    RlLightInfoUsdExt => LightInfoUsdExt,
    RlCameraInfo => CameraInfo,
    RlCameraInfoParameterizedExt => CameraInfoParameterizedExt,
    RlInstanceInfo => InstanceInfo,
    RlInstanceInfoBoneTransformsExt => InstanceInfoBoneTransformsExt,
    RlInstanceInfoBlendExt => InstanceInfoBlendExt,
    RlInstanceInfoObjectPickingExt => InstanceInfoObjectPickingExt,
    RlUiInstanceInfo => UiInstanceInfo,
}

/// Dereferences a base struct, checking it is present and correctly
/// tagged.
pub unsafe fn base<'a, T: RawStruct>(ptr: *const T) -> Result<&'a T> {
    let Some(info) = (unsafe { ptr.as_ref() }) else {
        return Err(ApiError::invalid(format!("{:?} is null", T::STRUCT_TYPE)));
    };
    let found = info.header().s_type;
    if found != T::STRUCT_TYPE.raw() {
        return Err(ApiError::StructTypeMismatch {
            expected: T::STRUCT_TYPE.raw(),
            found,
        });
    }
    Ok(info)
}

/// Reads the extension nodes hanging off `first`.
///
/// Tags that name no extension (unknown values, base structs) are skipped.
/// The walk stops after [`MAX_CHAIN_LENGTH`] nodes.
pub unsafe fn chain<'a>(first: *const c_void) -> Result<ExtensionChain<'a>> {
    let mut extensions = ExtensionChain::new();
    let mut next = first.cast::<RlBaseHeader>();
    for _ in 0..MAX_CHAIN_LENGTH {
        let Some(header) = (unsafe { next.as_ref() }) else {
            return Ok(extensions);
        };
        if let Some(block) = unsafe { extension_block(next, header.s_type)? } {
            extensions.push(block);
        }
        next = header.p_next.cast();
    }
    if !next.is_null() {
        log::warn!("extension chain longer than {MAX_CHAIN_LENGTH} nodes, the rest is ignored");
    }
    Ok(extensions)
}

unsafe fn extension_block<'a>(node: *const RlBaseHeader, s_type: u32) -> Result<Option<ExtensionBlock<'a>>> {
    let Some(tag) = StructType::from_raw(s_type) else {
        log::debug!("skipping extension with unknown type {s_type}");
        return Ok(None);
    };
    let block: ExtensionBlock<'a> = unsafe {
        match tag {
            StructType::MaterialInfoOpaqueExt => opaque_ext(&*node.cast())?.into(),
            StructType::MaterialInfoOpaqueSubsurfaceExt => subsurface_ext(&*node.cast())?.into(),
            StructType::MaterialInfoTranslucentExt => translucent_ext(&*node.cast())?.into(),
            StructType::MaterialInfoPortalExt => portal_ext(&*node.cast()).into(),
            StructType::LightInfoSphereExt => sphere_ext(&*node.cast()).into(),
            StructType::LightInfoRectExt => rect_ext(&*node.cast()).into(),
            StructType::LightInfoDiskExt => disk_ext(&*node.cast()).into(),
            StructType::LightInfoCylinderExt => cylinder_ext(&*node.cast()).into(),
            StructType::LightInfoDistantExt => distant_ext(&*node.cast()).into(),
            StructType::LightInfoDomeExt => dome_ext(&*node.cast())?.into(),
            StructType::LightInfoUsdExt => usd_ext(&*node.cast())?.into(),
            StructType::InstanceInfoBoneTransformsExt => bone_transforms_ext(&*node.cast())?.into(),
            StructType::InstanceInfoBlendExt => blend_ext(&*node.cast()).into(),
            StructType::InstanceInfoObjectPickingExt => object_picking_ext(&*node.cast()).into(),
            StructType::CameraInfoParameterizedExt => parameterized_ext(&*node.cast()).into(),
            other => {
                log::debug!("skipping {other:?} found in an extension chain");
                return Ok(None);
            }
        }
    };
    Ok(Some(block))
}

// ============================================================================
// Primitives
// ============================================================================

/// Borrows `count` elements. A null pointer is only allowed with a zero
/// count.
pub unsafe fn array<'a, T>(values: *const T, count: usize, what: &str) -> Result<&'a [T]> {
    if count == 0 {
        return Ok(&[]);
    }
    if values.is_null() {
        return Err(ApiError::invalid(format!("{what} is null but its count is {count}")));
    }
    Ok(unsafe { slice::from_raw_parts(values, count) })
}

/// Borrows a NUL-terminated UTF-8 string. Null reads as empty.
pub unsafe fn text<'a>(ptr: RlPath) -> Result<&'a str> {
    if ptr.is_null() {
        return Ok("");
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|err| ApiError::invalid(format!("string is not UTF-8: {err}")))
}

unsafe fn path<'a>(ptr: RlPath) -> Result<Option<&'a Path>> {
    let text = unsafe { text(ptr)? };
    Ok((!text.is_empty()).then(|| Path::new(text)))
}

fn optional<T>(hasvalue: RlBool, value: T) -> Option<T> {
    to_bool(hasvalue).then_some(value)
}

unsafe fn attribute<T: Copy>(ptr: *const T) -> Option<T> {
    unsafe { ptr.as_ref() }.copied()
}

// ============================================================================
// Library
// ============================================================================

pub fn startup_info(raw: &RlStartupInfo) -> StartupInfo {
    StartupInfo {
        disable_srgb_conversion_for_output: to_bool(raw.disable_srgb_conversion_for_output),
        editor_mode_enabled: to_bool(raw.editor_mode_enabled),
    }
}

pub unsafe fn create_image_info<'a>(raw: &RlCreateImageInfo) -> Result<CreateImageInfo<'a>> {
    let format = Format::from_raw(raw.format).unwrap_or_else(|| {
        log::error!("unknown external format tag {}", raw.format);
        Format::Undefined
    });
    Ok(CreateImageInfo {
        image_name: unsafe { text(raw.image_name)? },
        width: raw.width,
        height: raw.height,
        format,
        data: unsafe { array(raw.p_data, raw.data_size, "image data")? },
    })
}

// ============================================================================
// Materials
// ============================================================================

pub unsafe fn material_info<'a>(raw: &RlMaterialInfo) -> Result<MaterialInfo<'a>> {
    unsafe {
        Ok(MaterialInfo {
            hash: raw.hash,
            albedo_texture: path(raw.albedo_texture)?,
            normal_texture: path(raw.normal_texture)?,
            tangent_texture: path(raw.tangent_texture)?,
            emissive_texture: path(raw.emissive_texture)?,
            emissive_intensity: raw.emissive_intensity,
            emissive_color_constant: raw.emissive_color_constant,
            sprite_sheet_row: raw.sprite_sheet_row,
            sprite_sheet_col: raw.sprite_sheet_col,
            sprite_sheet_fps: raw.sprite_sheet_fps,
            filter_mode: raw.filter_mode,
            wrap_mode_u: raw.wrap_mode_u,
            wrap_mode_v: raw.wrap_mode_v,
            extensions: chain(raw.p_next)?,
        })
    }
}

unsafe fn opaque_ext<'a>(raw: &RlMaterialInfoOpaqueExt) -> Result<MaterialInfoOpaqueExt<'a>> {
    unsafe {
        Ok(MaterialInfoOpaqueExt {
            roughness_texture: path(raw.roughness_texture)?,
            metallic_texture: path(raw.metallic_texture)?,
            height_texture: path(raw.height_texture)?,
            anisotropy: raw.anisotropy,
            albedo_constant: raw.albedo_constant,
            opacity_constant: raw.opacity_constant,
            roughness_constant: raw.roughness_constant,
            metallic_constant: raw.metallic_constant,
            thin_film_thickness: optional(raw.thin_film_thickness_hasvalue, raw.thin_film_thickness_value),
            alpha_is_thin_film_thickness: to_bool(raw.alpha_is_thin_film_thickness),
            height_texture_strength: raw.height_texture_strength,
            use_draw_call_alpha_state: to_bool(raw.use_draw_call_alpha_state),
            blend_type: optional(raw.blend_type_hasvalue, raw.blend_type_value),
            inverted_blend: to_bool(raw.inverted_blend),
            alpha_test_type: raw.alpha_test_type,
            alpha_reference_value: raw.alpha_reference_value,
        })
    }
}

unsafe fn subsurface_ext<'a>(raw: &RlMaterialInfoOpaqueSubsurfaceExt) -> Result<MaterialInfoOpaqueSubsurfaceExt<'a>> {
    unsafe {
        Ok(MaterialInfoOpaqueSubsurfaceExt {
            subsurface_transmittance_texture: path(raw.subsurface_transmittance_texture)?,
            subsurface_thickness_texture: path(raw.subsurface_thickness_texture)?,
            subsurface_single_scattering_albedo_texture: path(raw.subsurface_single_scattering_albedo_texture)?,
            subsurface_transmittance_color: raw.subsurface_transmittance_color,
            subsurface_measurement_distance: raw.subsurface_measurement_distance,
            subsurface_single_scattering_albedo: raw.subsurface_single_scattering_albedo,
            subsurface_volumetric_anisotropy: raw.subsurface_volumetric_anisotropy,
        })
    }
}

unsafe fn translucent_ext<'a>(raw: &RlMaterialInfoTranslucentExt) -> Result<MaterialInfoTranslucentExt<'a>> {
    Ok(MaterialInfoTranslucentExt {
        transmittance_texture: unsafe { path(raw.transmittance_texture)? },
        refractive_index: raw.refractive_index,
        transmittance_color: raw.transmittance_color,
        transmittance_measurement_distance: raw.transmittance_measurement_distance,
        thin_wall_thickness: optional(raw.thin_wall_thickness_hasvalue, raw.thin_wall_thickness_value),
        use_diffuse_layer: to_bool(raw.use_diffuse_layer),
    })
}

fn portal_ext(raw: &RlMaterialInfoPortalExt) -> MaterialInfoPortalExt {
    MaterialInfoPortalExt {
        ray_portal_index: raw.ray_portal_index,
        rotation_speed: raw.rotation_speed,
    }
}

// ============================================================================
// Meshes
// ============================================================================

/// Reads the surfaces of a mesh. The caller builds the [`MeshInfo`] over
/// the returned vector.
pub unsafe fn mesh_surfaces<'a>(raw: &RlMeshInfo) -> Result<Vec<MeshSurfaceTriangles<'a>>> {
    let surfaces = unsafe { array(raw.surfaces_values, raw.surfaces_count as usize, "mesh surfaces")? };
    surfaces.iter().map(|surface| unsafe { mesh_surface(surface) }).collect()
}

unsafe fn mesh_surface<'a>(raw: &RlMeshInfoSurfaceTriangles) -> Result<MeshSurfaceTriangles<'a>> {
    let skinning = if to_bool(raw.skinning_hasvalue) {
        let skin = &raw.skinning_value;
        Some(MeshSkinning {
            bones_per_vertex: skin.bones_per_vertex,
            blend_weights: unsafe {
                array(skin.blend_weights_values, skin.blend_weights_count as usize, "blend weights")?
            },
            blend_indices: unsafe {
                array(skin.blend_indices_values, skin.blend_indices_count as usize, "blend indices")?
            },
        })
    } else {
        None
    };
    Ok(MeshSurfaceTriangles {
        vertices: unsafe { array(raw.vertices_values, raw.vertices_count as usize, "vertices")? },
        indices: unsafe { array(raw.indices_values, raw.indices_count as usize, "indices")? },
        skinning,
        material: MaterialHandle(raw.material),
        flags: SurfaceFlags::from_bits_truncate(raw.flags),
    })
}

pub fn mesh_info<'a>(hash: u64, surfaces: &'a [MeshSurfaceTriangles<'a>]) -> MeshInfo<'a> {
    MeshInfo { hash, surfaces }
}

// ============================================================================
// Lights
// ============================================================================

pub unsafe fn light_info<'a>(raw: &RlLightInfo) -> Result<LightInfo<'a>> {
    Ok(LightInfo {
        hash: raw.hash,
        radiance: raw.radiance,
        extensions: unsafe { chain(raw.p_next)? },
    })
}

fn shaping(hasvalue: RlBool, raw: &RlLightInfoLightShaping) -> Option<LightShapingInfo> {
    optional(
        hasvalue,
        LightShapingInfo {
            direction: raw.direction,
            cone_angle_degrees: raw.cone_angle_degrees,
            cone_softness: raw.cone_softness,
            focus_exponent: raw.focus_exponent,
        },
    )
}

fn sphere_ext(raw: &RlLightInfoSphereExt) -> LightInfoSphereExt {
    LightInfoSphereExt {
        position: raw.position,
        radius: raw.radius,
        shaping: shaping(raw.shaping_hasvalue, &raw.shaping_value),
    }
}

fn rect_ext(raw: &RlLightInfoRectExt) -> LightInfoRectExt {
    LightInfoRectExt {
        position: raw.position,
        x_axis: raw.x_axis,
        x_size: raw.x_size,
        y_axis: raw.y_axis,
        y_size: raw.y_size,
        direction: raw.direction,
        shaping: shaping(raw.shaping_hasvalue, &raw.shaping_value),
    }
}

fn disk_ext(raw: &RlLightInfoDiskExt) -> LightInfoDiskExt {
    LightInfoDiskExt {
        position: raw.position,
        x_axis: raw.x_axis,
        x_radius: raw.x_radius,
        y_axis: raw.y_axis,
        y_radius: raw.y_radius,
        direction: raw.direction,
        shaping: shaping(raw.shaping_hasvalue, &raw.shaping_value),
    }
}

fn cylinder_ext(raw: &RlLightInfoCylinderExt) -> LightInfoCylinderExt {
    LightInfoCylinderExt {
        position: raw.position,
        radius: raw.radius,
        axis: raw.axis,
        axis_length: raw.axis_length,
    }
}

fn distant_ext(raw: &RlLightInfoDistantExt) -> LightInfoDistantExt {
    LightInfoDistantExt {
        direction: raw.direction,
        angular_diameter_degrees: raw.angular_diameter_degrees,
    }
}

unsafe fn dome_ext<'a>(raw: &RlLightInfoDomeExt) -> Result<LightInfoDomeExt<'a>> {
    Ok(LightInfoDomeExt {
        transform: raw.transform,
        color_texture: unsafe { path(raw.color_texture)? },
    })
}

/// Maps the family tag carried in `light_type` onto a USD light type.
pub fn usd_light_type(raw: u32) -> Result<UsdLightType> {
    match StructType::from_raw(raw) {
        Some(StructType::LightInfoSphereExt) => Ok(UsdLightType::Sphere),
        Some(StructType::LightInfoRectExt) => Ok(UsdLightType::Rect),
        Some(StructType::LightInfoDiskExt) => Ok(UsdLightType::Disk),
        Some(StructType::LightInfoCylinderExt) => Ok(UsdLightType::Cylinder),
        Some(StructType::LightInfoDistantExt) => Ok(UsdLightType::Distant),
        _ => Err(ApiError::InvalidEnum {
            name: "UsdLightType",
            value: i64::from(raw),
        }),
    }
}

unsafe fn usd_ext(raw: &RlLightInfoUsdExt) -> Result<LightInfoUsdExt> {
    unsafe {
        Ok(LightInfoUsdExt {
            light_type: usd_light_type(raw.light_type)?,
            transform: raw.transform,
            radius: attribute(raw.p_radius),
            width: attribute(raw.p_width),
            height: attribute(raw.p_height),
            length: attribute(raw.p_length),
            angle_radians: attribute(raw.p_angle_radians),
            enable_color_temperature: attribute(raw.p_enable_color_temp).map(to_bool),
            color: attribute(raw.p_color),
            color_temperature: attribute(raw.p_color_temp),
            exposure: attribute(raw.p_exposure),
            intensity: attribute(raw.p_intensity),
            cone_angle_radians: attribute(raw.p_cone_angle_radians),
            cone_softness: attribute(raw.p_cone_softness),
            focus: attribute(raw.p_focus),
        })
    }
}

// ============================================================================
// Cameras and instances
// ============================================================================

pub unsafe fn camera_info<'a>(raw: &RlCameraInfo) -> Result<CameraInfo<'a>> {
    let camera_type = CameraTypeTag::from_raw(raw.camera_type).unwrap_or_else(|| {
        log::warn!("unknown camera type {}, using the world camera", raw.camera_type);
        CameraTypeTag::World
    });
    Ok(CameraInfo {
        camera_type,
        view: raw.view,
        projection: raw.projection,
        extensions: unsafe { chain(raw.p_next)? },
    })
}

fn parameterized_ext(raw: &RlCameraInfoParameterizedExt) -> CameraInfoParameterizedExt {
    CameraInfoParameterizedExt {
        position: raw.position,
        forward: raw.forward,
        up: raw.up,
        right: raw.right,
        fov_y_in_degrees: raw.fov_y_in_degrees,
        aspect: raw.aspect,
        near_plane: raw.near_plane,
        far_plane: raw.far_plane,
    }
}

pub unsafe fn instance_info<'a>(raw: &RlInstanceInfo) -> Result<InstanceInfo<'a>> {
    Ok(InstanceInfo {
        category_flags: InstanceCategoryFlags::from_bits_truncate(raw.category_flags),
        mesh: MeshHandle(raw.mesh),
        transform: raw.transform,
        double_sided: to_bool(raw.double_sided),
        extensions: unsafe { chain(raw.p_next)? },
    })
}

unsafe fn bone_transforms_ext<'a>(raw: &RlInstanceInfoBoneTransformsExt) -> Result<InstanceInfoBoneTransformsExt<'a>> {
    Ok(InstanceInfoBoneTransformsExt {
        bone_transforms: unsafe {
            array(raw.bone_transforms_values, raw.bone_transforms_count as usize, "bone transforms")?
        },
    })
}

fn blend_ext(raw: &RlInstanceInfoBlendExt) -> InstanceInfoBlendExt {
    InstanceInfoBlendExt {
        alpha_test_enabled: to_bool(raw.alpha_test_enabled),
        alpha_test_reference_value: raw.alpha_test_reference_value,
        alpha_test_compare_op: raw.alpha_test_compare_op,
        alpha_blend_enabled: to_bool(raw.alpha_blend_enabled),
        src_color_blend_factor: raw.src_color_blend_factor,
        dst_color_blend_factor: raw.dst_color_blend_factor,
        color_blend_op: raw.color_blend_op,
        texture_color_operation: raw.texture_color_operation,
        texture_color_arg1_source: raw.texture_color_arg1_source,
        texture_color_arg2_source: raw.texture_color_arg2_source,
        texture_alpha_operation: raw.texture_alpha_operation,
        texture_alpha_arg1_source: raw.texture_alpha_arg1_source,
        texture_alpha_arg2_source: raw.texture_alpha_arg2_source,
        t_factor: raw.t_factor,
        is_texture_factor_blend: to_bool(raw.is_texture_factor_blend),
    }
}

fn object_picking_ext(raw: &RlInstanceInfoObjectPickingExt) -> InstanceInfoObjectPickingExt {
    InstanceInfoObjectPickingExt {
        object_picking_value: raw.object_picking_value,
    }
}

pub unsafe fn ui_instance_info<'a>(raw: &RlUiInstanceInfo) -> Result<UiInstanceInfo<'a>> {
    unsafe {
        let image_name = text(raw.image_name)?;
        Ok(UiInstanceInfo {
            flags: UiInstanceFlags::from_bits_truncate(raw.flags),
            image_name: (!image_name.is_empty()).then_some(image_name),
            world: raw.p_world.as_ref(),
            view: raw.p_view.as_ref(),
            projection: raw.p_projection.as_ref(),
            viewport: optional(raw.viewport_hasvalue, raw.viewport_value),
            vertices: array(raw.vertices_values, raw.vertices_count as usize, "UI vertices")?,
            indices: array(raw.indices_values, raw.indices_count as usize, "UI indices")?,
            color: raw.color,
        })
    }
}
