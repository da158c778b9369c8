use std::path::Path;

use super::chain::ExtensionChain;
use super::{Float3D, Transform};

#[derive(Debug, Clone, Default)]
pub struct LightInfo<'a> {
    pub hash: u64,
    pub radiance: Float3D,
    pub extensions: ExtensionChain<'a>,
}

/// Optional cone restriction for sphere, rect and disk lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightShapingInfo {
    pub direction: Float3D,
    pub cone_angle_degrees: f32,
    pub cone_softness: f32,
    pub focus_exponent: f32,
}

impl Default for LightShapingInfo {
    fn default() -> Self {
        Self {
            direction: Float3D::new(0.0, 0.0, 1.0),
            cone_angle_degrees: 180.0,
            cone_softness: 0.0,
            focus_exponent: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LightInfoSphereExt {
    pub position: Float3D,
    pub radius: f32,
    pub shaping: Option<LightShapingInfo>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LightInfoRectExt {
    pub position: Float3D,
    pub x_axis: Float3D,
    pub x_size: f32,
    pub y_axis: Float3D,
    pub y_size: f32,
    pub direction: Float3D,
    pub shaping: Option<LightShapingInfo>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LightInfoDiskExt {
    pub position: Float3D,
    pub x_axis: Float3D,
    pub x_radius: f32,
    pub y_axis: Float3D,
    pub y_radius: f32,
    pub direction: Float3D,
    pub shaping: Option<LightShapingInfo>,
}

#[derive(Debug, Clone, Copy)]
pub struct LightInfoCylinderExt {
    pub position: Float3D,
    pub radius: f32,
    pub axis: Float3D,
    pub axis_length: f32,
}

impl Default for LightInfoCylinderExt {
    fn default() -> Self {
        Self {
            position: Float3D::default(),
            radius: 1.0,
            axis: Float3D::new(1.0, 0.0, 0.0),
            axis_length: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LightInfoDistantExt {
    pub direction: Float3D,
    pub angular_diameter_degrees: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LightInfoDomeExt<'a> {
    pub transform: Transform,
    pub color_texture: Option<&'a Path>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UsdLightType {
    #[default]
    Sphere,
    Rect,
    Disk,
    Cylinder,
    Distant,
}

/// A light described with USD `UsdLux` attributes. Unauthored attributes
/// take their USD schema defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightInfoUsdExt {
    pub light_type: UsdLightType,
    pub transform: Transform,
    pub radius: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub length: Option<f32>,
    pub angle_radians: Option<f32>,
    pub enable_color_temperature: Option<bool>,
    pub color: Option<Float3D>,
    pub color_temperature: Option<f32>,
    pub exposure: Option<f32>,
    pub intensity: Option<f32>,
    pub cone_angle_radians: Option<f32>,
    pub cone_softness: Option<f32>,
    pub focus: Option<f32>,
}
