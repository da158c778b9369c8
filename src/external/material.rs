use std::path::Path;

use super::Float3D;
use super::chain::ExtensionChain;

/// Fields shared by every material family.
///
/// `filter_mode`, `wrap_mode_u` and `wrap_mode_v` are raw sampler enums and
/// are validated during translation.
#[derive(Debug, Clone)]
pub struct MaterialInfo<'a> {
    pub hash: u64,
    pub albedo_texture: Option<&'a Path>,
    pub normal_texture: Option<&'a Path>,
    pub tangent_texture: Option<&'a Path>,
    pub emissive_texture: Option<&'a Path>,
    pub emissive_intensity: f32,
    pub emissive_color_constant: Float3D,
    pub sprite_sheet_row: u8,
    pub sprite_sheet_col: u8,
    pub sprite_sheet_fps: u8,
    pub filter_mode: u8,
    pub wrap_mode_u: u8,
    pub wrap_mode_v: u8,
    pub extensions: ExtensionChain<'a>,
}

impl Default for MaterialInfo<'_> {
    fn default() -> Self {
        Self {
            hash: 0,
            albedo_texture: None,
            normal_texture: None,
            tangent_texture: None,
            emissive_texture: None,
            emissive_intensity: 0.0,
            emissive_color_constant: Float3D::default(),
            sprite_sheet_row: 1,
            sprite_sheet_col: 1,
            sprite_sheet_fps: 0,
            filter_mode: 1,
            wrap_mode_u: 0,
            wrap_mode_v: 0,
            extensions: ExtensionChain::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialInfoOpaqueExt<'a> {
    pub roughness_texture: Option<&'a Path>,
    pub metallic_texture: Option<&'a Path>,
    pub height_texture: Option<&'a Path>,
    pub anisotropy: f32,
    pub albedo_constant: Float3D,
    pub opacity_constant: f32,
    pub roughness_constant: f32,
    pub metallic_constant: f32,
    pub thin_film_thickness: Option<f32>,
    pub alpha_is_thin_film_thickness: bool,
    pub height_texture_strength: f32,
    /// Take the alpha state from the draw call instead of the material.
    pub use_draw_call_alpha_state: bool,
    pub blend_type: Option<i32>,
    pub inverted_blend: bool,
    pub alpha_test_type: i32,
    pub alpha_reference_value: u8,
}

impl Default for MaterialInfoOpaqueExt<'_> {
    fn default() -> Self {
        Self {
            roughness_texture: None,
            metallic_texture: None,
            height_texture: None,
            anisotropy: 0.0,
            albedo_constant: Float3D::new(0.2, 0.2, 0.2),
            opacity_constant: 1.0,
            roughness_constant: 0.5,
            metallic_constant: 0.0,
            thin_film_thickness: None,
            alpha_is_thin_film_thickness: false,
            height_texture_strength: 1.0,
            use_draw_call_alpha_state: true,
            blend_type: None,
            inverted_blend: false,
            alpha_test_type: 7,
            alpha_reference_value: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialInfoOpaqueSubsurfaceExt<'a> {
    pub subsurface_transmittance_texture: Option<&'a Path>,
    pub subsurface_thickness_texture: Option<&'a Path>,
    pub subsurface_single_scattering_albedo_texture: Option<&'a Path>,
    pub subsurface_transmittance_color: Float3D,
    pub subsurface_measurement_distance: f32,
    pub subsurface_single_scattering_albedo: Float3D,
    pub subsurface_volumetric_anisotropy: f32,
}

impl Default for MaterialInfoOpaqueSubsurfaceExt<'_> {
    fn default() -> Self {
        Self {
            subsurface_transmittance_texture: None,
            subsurface_thickness_texture: None,
            subsurface_single_scattering_albedo_texture: None,
            subsurface_transmittance_color: Float3D::new(0.5, 0.5, 0.5),
            subsurface_measurement_distance: 0.0,
            subsurface_single_scattering_albedo: Float3D::new(0.5, 0.5, 0.5),
            subsurface_volumetric_anisotropy: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialInfoTranslucentExt<'a> {
    pub transmittance_texture: Option<&'a Path>,
    pub refractive_index: f32,
    pub transmittance_color: Float3D,
    pub transmittance_measurement_distance: f32,
    pub thin_wall_thickness: Option<f32>,
    pub use_diffuse_layer: bool,
}

impl Default for MaterialInfoTranslucentExt<'_> {
    fn default() -> Self {
        Self {
            transmittance_texture: None,
            refractive_index: 1.3,
            transmittance_color: Float3D::new(0.97, 0.97, 0.97),
            transmittance_measurement_distance: 1.0,
            thin_wall_thickness: None,
            use_diffuse_layer: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialInfoPortalExt {
    pub ray_portal_index: u8,
    pub rotation_speed: f32,
}
