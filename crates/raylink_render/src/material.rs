//! Internal material representation.
//!
//! Materials are generic over the type stored in their texture slots. The
//! API layer builds them with [`TexturePath`] slots on the caller thread,
//! and the render thread maps the paths to [`TextureRef`]s through
//! [`MaterialData::map_textures`] before registering them.

use std::path::PathBuf;

use glam::Vec3;

use crate::raw_enum;
use crate::textures::TextureRef;

/// Texture slot before resolution.
pub type TexturePath = Option<PathBuf>;

/// Texture slot after resolution. `None` means no texture is bound.
pub type ResolvedTexture = Option<TextureRef>;

raw_enum! {
    #[derive(Default)]
    pub enum BlendType: i32 {
        #[default]
        Alpha = 0,
        AlphaEmissive = 1,
        ReverseAlphaEmissive = 2,
        Color = 3,
        ColorEmissive = 4,
        ReverseColorEmissive = 5,
        Emissive = 6,
        Multiplicative = 7,
        DoubleMultiplicative = 8,
    }
}

raw_enum! {
    #[derive(Default)]
    pub enum AlphaTestType: i32 {
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
    pub enum FilterMode: u8 {
        Nearest = 0,
        #[default]
        Linear = 1,
    }
}

raw_enum! {
    #[derive(Default)]
    pub enum WrapMode: u8 {
        #[default]
        Repeat = 0,
        MirroredRepeat = 1,
        ClampToEdge = 2,
        ClampToBorder = 3,
        MirrorClampToEdge = 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerState {
    pub filter_mode: FilterMode,
    pub wrap_mode_u: WrapMode,
    pub wrap_mode_v: WrapMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteSheet {
    pub rows: u8,
    pub cols: u8,
    pub fps: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub enabled: bool,
    pub intensity: f32,
    pub color: Vec3,
}

impl Default for Emission {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 1.0,
            color: Vec3::ZERO,
        }
    }
}

impl Emission {
    /// Emission is switched on by a positive intensity.
    #[must_use]
    pub fn from_intensity(intensity: f32, color: Vec3) -> Self {
        Self {
            enabled: intensity > 0.0,
            intensity,
            color,
        }
    }
}

// ============================================================================
// Opaque
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueMaterial<T> {
    pub albedo_texture: T,
    pub normal_texture: T,
    pub tangent_texture: T,
    pub height_texture: T,
    pub roughness_texture: T,
    pub metallic_texture: T,
    pub emissive_texture: T,
    pub subsurface_transmittance_texture: T,
    pub subsurface_thickness_texture: T,
    pub subsurface_single_scattering_albedo_texture: T,

    pub anisotropy: f32,
    pub albedo_constant: Vec3,
    pub opacity_constant: f32,
    pub roughness_constant: f32,
    pub metallic_constant: f32,
    pub emission: Emission,
    pub sprite_sheet: SpriteSheet,

    pub enable_thin_film: bool,
    pub alpha_is_thin_film_thickness: bool,
    pub thin_film_thickness_constant: f32,

    pub use_legacy_alpha_state: bool,
    pub blend_enabled: bool,
    pub blend_type: BlendType,
    pub inverted_blend: bool,
    pub alpha_test_type: AlphaTestType,
    pub alpha_test_reference_value: u8,
    pub displace_in: f32,

    pub subsurface_transmittance_color: Vec3,
    pub subsurface_measurement_distance: f32,
    pub subsurface_single_scattering_albedo: Vec3,
    pub subsurface_volumetric_anisotropy: f32,

    pub sampler: SamplerState,
}

impl OpaqueMaterial<()> {
    pub const DEFAULT_THIN_FILM_THICKNESS: f32 = 200.0;
    pub const DEFAULT_SUBSURFACE_COLOR: Vec3 = Vec3::splat(0.5);
}

impl<T: Default> Default for OpaqueMaterial<T> {
    fn default() -> Self {
        Self {
            albedo_texture: T::default(),
            normal_texture: T::default(),
            tangent_texture: T::default(),
            height_texture: T::default(),
            roughness_texture: T::default(),
            metallic_texture: T::default(),
            emissive_texture: T::default(),
            subsurface_transmittance_texture: T::default(),
            subsurface_thickness_texture: T::default(),
            subsurface_single_scattering_albedo_texture: T::default(),
            anisotropy: 0.0,
            albedo_constant: Vec3::splat(0.2),
            opacity_constant: 1.0,
            roughness_constant: 0.5,
            metallic_constant: 0.0,
            emission: Emission::default(),
            sprite_sheet: SpriteSheet::default(),
            enable_thin_film: false,
            alpha_is_thin_film_thickness: false,
            thin_film_thickness_constant: OpaqueMaterial::<()>::DEFAULT_THIN_FILM_THICKNESS,
            use_legacy_alpha_state: true,
            blend_enabled: false,
            blend_type: BlendType::Alpha,
            inverted_blend: false,
            alpha_test_type: AlphaTestType::Always,
            alpha_test_reference_value: 0,
            displace_in: 1.0,
            subsurface_transmittance_color: OpaqueMaterial::<()>::DEFAULT_SUBSURFACE_COLOR,
            subsurface_measurement_distance: 0.0,
            subsurface_single_scattering_albedo: OpaqueMaterial::<()>::DEFAULT_SUBSURFACE_COLOR,
            subsurface_volumetric_anisotropy: 0.0,
            sampler: SamplerState::default(),
        }
    }
}

// ============================================================================
// Translucent
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TranslucentMaterial<T> {
    pub normal_texture: T,
    pub transmittance_texture: T,
    pub emissive_texture: T,

    pub refractive_index: f32,
    pub transmittance_color: Vec3,
    pub transmittance_measurement_distance: f32,
    pub emission: Emission,
    pub sprite_sheet: SpriteSheet,
    pub enable_thin_walled: bool,
    pub thin_wall_thickness: f32,
    pub enable_diffuse_layer: bool,

    pub sampler: SamplerState,
}

impl TranslucentMaterial<()> {
    pub const DEFAULT_THIN_WALL_THICKNESS: f32 = 0.001;
}

// ============================================================================
// Ray portal
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RayPortalMaterial<T> {
    pub emissive_texture: T,
    pub ray_portal_index: u8,
    pub rotation_speed: f32,
    pub emission: Emission,
    pub sprite_sheet: SpriteSheet,
    pub sampler: SamplerState,
}

// ============================================================================
// MaterialData
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Opaque,
    Translucent,
    RayPortal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialData<T> {
    Opaque(OpaqueMaterial<T>),
    Translucent(TranslucentMaterial<T>),
    RayPortal(RayPortalMaterial<T>),
}

impl<T> MaterialData<T> {
    #[must_use]
    pub fn kind(&self) -> MaterialKind {
        match self {
            MaterialData::Opaque(_) => MaterialKind::Opaque,
            MaterialData::Translucent(_) => MaterialKind::Translucent,
            MaterialData::RayPortal(_) => MaterialKind::RayPortal,
        }
    }

    /// Rebuilds the material with every texture slot passed through `f`.
    /// All other fields are carried over unchanged.
    pub fn map_textures<U>(self, mut f: impl FnMut(T) -> U) -> MaterialData<U> {
        match self {
            MaterialData::Opaque(m) => MaterialData::Opaque(OpaqueMaterial {
                albedo_texture: f(m.albedo_texture),
                normal_texture: f(m.normal_texture),
                tangent_texture: f(m.tangent_texture),
                height_texture: f(m.height_texture),
                roughness_texture: f(m.roughness_texture),
                metallic_texture: f(m.metallic_texture),
                emissive_texture: f(m.emissive_texture),
                subsurface_transmittance_texture: f(m.subsurface_transmittance_texture),
                subsurface_thickness_texture: f(m.subsurface_thickness_texture),
                subsurface_single_scattering_albedo_texture: f(m.subsurface_single_scattering_albedo_texture),
                anisotropy: m.anisotropy,
                albedo_constant: m.albedo_constant,
                opacity_constant: m.opacity_constant,
                roughness_constant: m.roughness_constant,
                metallic_constant: m.metallic_constant,
                emission: m.emission,
                sprite_sheet: m.sprite_sheet,
                enable_thin_film: m.enable_thin_film,
                alpha_is_thin_film_thickness: m.alpha_is_thin_film_thickness,
                thin_film_thickness_constant: m.thin_film_thickness_constant,
                use_legacy_alpha_state: m.use_legacy_alpha_state,
                blend_enabled: m.blend_enabled,
                blend_type: m.blend_type,
                inverted_blend: m.inverted_blend,
                alpha_test_type: m.alpha_test_type,
                alpha_test_reference_value: m.alpha_test_reference_value,
                displace_in: m.displace_in,
                subsurface_transmittance_color: m.subsurface_transmittance_color,
                subsurface_measurement_distance: m.subsurface_measurement_distance,
                subsurface_single_scattering_albedo: m.subsurface_single_scattering_albedo,
                subsurface_volumetric_anisotropy: m.subsurface_volumetric_anisotropy,
                sampler: m.sampler,
            }),
            MaterialData::Translucent(m) => MaterialData::Translucent(TranslucentMaterial {
                normal_texture: f(m.normal_texture),
                transmittance_texture: f(m.transmittance_texture),
                emissive_texture: f(m.emissive_texture),
                refractive_index: m.refractive_index,
                transmittance_color: m.transmittance_color,
                transmittance_measurement_distance: m.transmittance_measurement_distance,
                emission: m.emission,
                sprite_sheet: m.sprite_sheet,
                enable_thin_walled: m.enable_thin_walled,
                thin_wall_thickness: m.thin_wall_thickness,
                enable_diffuse_layer: m.enable_diffuse_layer,
                sampler: m.sampler,
            }),
            MaterialData::RayPortal(m) => MaterialData::RayPortal(RayPortalMaterial {
                emissive_texture: f(m.emissive_texture),
                ray_portal_index: m.ray_portal_index,
                rotation_speed: m.rotation_speed,
                emission: m.emission,
                sprite_sheet: m.sprite_sheet,
                sampler: m.sampler,
            }),
        }
    }

    /// Iterates over the populated texture slots.
    pub fn textures(&self) -> impl Iterator<Item = &T> {
        let slots: Vec<&T> = match self {
            MaterialData::Opaque(m) => vec![
                &m.albedo_texture,
                &m.normal_texture,
                &m.tangent_texture,
                &m.height_texture,
                &m.roughness_texture,
                &m.metallic_texture,
                &m.emissive_texture,
                &m.subsurface_transmittance_texture,
                &m.subsurface_thickness_texture,
                &m.subsurface_single_scattering_albedo_texture,
            ],
            MaterialData::Translucent(m) => vec![&m.normal_texture, &m.transmittance_texture, &m.emissive_texture],
            MaterialData::RayPortal(m) => vec![&m.emissive_texture],
        };
        slots.into_iter()
    }
}

/// A material whose texture slots have been resolved on the render thread.
pub type ResolvedMaterial = MaterialData<ResolvedTexture>;

/// A material still carrying texture paths.
pub type PendingMaterial = MaterialData<TexturePath>;
