//! Internal light types.
//!
//! Every analytic light is built through a `try_create` constructor that
//! rejects physically meaningless parameters, so a [`RtLight`] that exists
//! is always valid to upload.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec3};

use crate::material::TexturePath;
use crate::textures::TextureRef;

const NORMALIZATION_TOLERANCE: f32 = 0.01;

#[inline]
#[must_use]
pub fn is_approx_normalized(v: Vec3) -> bool {
    v.is_finite() && (v.length() - 1.0).abs() <= NORMALIZATION_TOLERANCE
}

#[inline]
fn is_valid_radiance(radiance: Vec3) -> bool {
    radiance.is_finite() && radiance.min_element() >= 0.0
}

#[inline]
fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

// ============================================================================
// Shaping
// ============================================================================

/// Cone restriction applied to sphere, rect and disk lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightShaping {
    enabled: bool,
    direction: Vec3,
    cos_cone_angle: f32,
    cone_softness: f32,
    focus_exponent: f32,
}

impl Default for LightShaping {
    fn default() -> Self {
        Self::disabled()
    }
}

impl LightShaping {
    /// The inert shaping used when none was supplied.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            direction: Vec3::Z,
            cos_cone_angle: -1.0,
            cone_softness: 0.0,
            focus_exponent: 0.0,
        }
    }

    /// Returns `None` if any parameter is out of range. A disabled shaping
    /// always succeeds.
    #[must_use]
    pub fn try_create(
        enabled: bool,
        direction: Vec3,
        cos_cone_angle: f32,
        cone_softness: f32,
        focus_exponent: f32,
    ) -> Option<Self> {
        if !enabled {
            return Some(Self::disabled());
        }
        let valid = is_approx_normalized(direction)
            && cos_cone_angle.is_finite()
            && (-1.0..=1.0).contains(&cos_cone_angle)
            && is_non_negative(cone_softness)
            && is_non_negative(focus_exponent);
        valid.then_some(Self {
            enabled,
            direction,
            cos_cone_angle,
            cone_softness,
            focus_exponent,
        })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[must_use]
    pub fn cos_cone_angle(&self) -> f32 {
        self.cos_cone_angle
    }

    #[must_use]
    pub fn cone_softness(&self) -> f32 {
        self.cone_softness
    }

    #[must_use]
    pub fn focus_exponent(&self) -> f32 {
        self.focus_exponent
    }
}

// ============================================================================
// Analytic lights
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereLight {
    pub position: Vec3,
    pub radiance: Vec3,
    pub radius: f32,
    pub shaping: LightShaping,
}

impl SphereLight {
    #[must_use]
    pub fn try_create(position: Vec3, radiance: Vec3, radius: f32, shaping: LightShaping) -> Option<Self> {
        (position.is_finite() && is_valid_radiance(radiance) && is_non_negative(radius)).then_some(Self {
            position,
            radiance,
            radius,
            shaping,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectLight {
    pub position: Vec3,
    pub radiance: Vec3,
    pub dimensions: Vec2,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub direction: Vec3,
    pub shaping: LightShaping,
}

impl RectLight {
    #[must_use]
    pub fn try_create(
        position: Vec3,
        radiance: Vec3,
        dimensions: Vec2,
        x_axis: Vec3,
        y_axis: Vec3,
        direction: Vec3,
        shaping: LightShaping,
    ) -> Option<Self> {
        let valid = position.is_finite()
            && is_valid_radiance(radiance)
            && is_non_negative(dimensions.x)
            && is_non_negative(dimensions.y)
            && is_approx_normalized(x_axis)
            && is_approx_normalized(y_axis)
            && is_approx_normalized(direction);
        valid.then_some(Self {
            position,
            radiance,
            dimensions,
            x_axis,
            y_axis,
            direction,
            shaping,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskLight {
    pub position: Vec3,
    pub radiance: Vec3,
    pub half_dimensions: Vec2,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub direction: Vec3,
    pub shaping: LightShaping,
}

impl DiskLight {
    #[must_use]
    pub fn try_create(
        position: Vec3,
        radiance: Vec3,
        half_dimensions: Vec2,
        x_axis: Vec3,
        y_axis: Vec3,
        direction: Vec3,
        shaping: LightShaping,
    ) -> Option<Self> {
        let valid = position.is_finite()
            && is_valid_radiance(radiance)
            && is_non_negative(half_dimensions.x)
            && is_non_negative(half_dimensions.y)
            && is_approx_normalized(x_axis)
            && is_approx_normalized(y_axis)
            && is_approx_normalized(direction);
        valid.then_some(Self {
            position,
            radiance,
            half_dimensions,
            x_axis,
            y_axis,
            direction,
            shaping,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderLight {
    pub position: Vec3,
    pub radiance: Vec3,
    pub radius: f32,
    pub axis: Vec3,
    pub axis_length: f32,
}

impl CylinderLight {
    #[must_use]
    pub fn try_create(position: Vec3, radiance: Vec3, radius: f32, axis: Vec3, axis_length: f32) -> Option<Self> {
        let valid = position.is_finite()
            && is_valid_radiance(radiance)
            && is_non_negative(radius)
            && is_approx_normalized(axis)
            && is_non_negative(axis_length);
        valid.then_some(Self {
            position,
            radiance,
            radius,
            axis,
            axis_length,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistantLight {
    pub direction: Vec3,
    pub half_angle: f32,
    pub radiance: Vec3,
}

impl DistantLight {
    #[must_use]
    pub fn try_create(direction: Vec3, half_angle: f32, radiance: Vec3) -> Option<Self> {
        let valid = is_approx_normalized(direction)
            && half_angle.is_finite()
            && (0.0..=FRAC_PI_2).contains(&half_angle)
            && is_valid_radiance(radiance);
        valid.then_some(Self {
            direction,
            half_angle,
            radiance,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RtLight {
    Sphere(SphereLight),
    Rect(RectLight),
    Disk(DiskLight),
    Cylinder(CylinderLight),
    Distant(DistantLight),
}

impl RtLight {
    #[must_use]
    pub fn radiance(&self) -> Vec3 {
        match self {
            RtLight::Sphere(l) => l.radiance,
            RtLight::Rect(l) => l.radiance,
            RtLight::Disk(l) => l.radiance,
            RtLight::Cylinder(l) => l.radiance,
            RtLight::Distant(l) => l.radiance,
        }
    }

    #[must_use]
    pub fn shaping(&self) -> Option<&LightShaping> {
        match self {
            RtLight::Sphere(l) => Some(&l.shaping),
            RtLight::Rect(l) => Some(&l.shaping),
            RtLight::Disk(l) => Some(&l.shaping),
            RtLight::Cylinder(_) | RtLight::Distant(_) => None,
        }
    }
}

// ============================================================================
// Dome
// ============================================================================

/// Environment light. `T` is the texture slot, a path until the render
/// thread loads it.
#[derive(Debug, Clone, PartialEq)]
pub struct DomeLight<T> {
    pub radiance: Vec3,
    pub world_to_light: Mat4,
    pub texture: T,
}

impl<T> DomeLight<T> {
    pub fn map_texture<U>(self, f: impl FnOnce(T) -> U) -> DomeLight<U> {
        DomeLight {
            radiance: self.radiance,
            world_to_light: self.world_to_light,
            texture: f(self.texture),
        }
    }
}

/// A translated light, before or after texture resolution.
#[derive(Debug, Clone)]
pub enum LightData<T> {
    Analytic(RtLight),
    Dome(DomeLight<T>),
}

pub type PendingLight = LightData<TexturePath>;
pub type ResolvedLight = LightData<Option<TextureRef>>;

impl<T> LightData<T> {
    #[must_use]
    pub fn is_dome(&self) -> bool {
        matches!(self, LightData::Dome(_))
    }

    pub fn map_texture<U>(self, f: impl FnOnce(T) -> U) -> LightData<U> {
        match self {
            LightData::Analytic(light) => LightData::Analytic(light),
            LightData::Dome(dome) => LightData::Dome(dome.map_texture(f)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaping_rejects_out_of_range_values() {
        assert!(LightShaping::try_create(true, Vec3::Z, 0.5, 0.1, 1.0).is_some());
        assert!(LightShaping::try_create(true, Vec3::new(0.0, 0.0, 2.0), 0.5, 0.1, 1.0).is_none());
        assert!(LightShaping::try_create(true, Vec3::Z, 1.5, 0.1, 1.0).is_none());
        assert!(LightShaping::try_create(true, Vec3::Z, 0.5, -0.1, 1.0).is_none());
        assert!(LightShaping::try_create(true, Vec3::Z, 0.5, 0.0, f32::NAN).is_none());
        assert!(!LightShaping::try_create(false, Vec3::ZERO, 9.0, -1.0, -1.0).unwrap().enabled());
    }

    #[test]
    fn distant_half_angle_is_bounded() {
        assert!(DistantLight::try_create(Vec3::NEG_Y, 0.1, Vec3::ONE).is_some());
        assert!(DistantLight::try_create(Vec3::NEG_Y, 2.0, Vec3::ONE).is_none());
        assert!(DistantLight::try_create(Vec3::NEG_Y, -0.1, Vec3::ONE).is_none());
    }

    #[test]
    fn negative_radiance_is_rejected() {
        let shaping = LightShaping::disabled();
        assert!(SphereLight::try_create(Vec3::ZERO, Vec3::new(1.0, -1.0, 1.0), 1.0, shaping).is_none());
        assert!(SphereLight::try_create(Vec3::ZERO, Vec3::ONE, -1.0, shaping).is_none());
    }
}
