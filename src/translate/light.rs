//! Light translation.
//!
//! Exactly one light family extension must be attached. Analytic lights are
//! validated here; a dome light keeps its texture path for the render
//! thread.

use glam::{Mat4, Vec2, Vec3};
use raylink_core::errors::{ApiError, Result};
use raylink_render::light::{
    CylinderLight, DiskLight, DistantLight, DomeLight, LightData, LightShaping, PendingLight, RectLight, RtLight,
    SphereLight,
};

use crate::convert::{to_light_shaping, to_mat4, to_path, to_vec3};
use crate::external::{
    LightInfo, LightInfoCylinderExt, LightInfoDiskExt, LightInfoDistantExt, LightInfoDomeExt, LightInfoRectExt,
    LightInfoSphereExt, LightInfoUsdExt, StructType, UsdLightType,
};

const LIGHT_FAMILIES: [StructType; 7] = [
    StructType::LightInfoDomeExt,
    StructType::LightInfoUsdExt,
    StructType::LightInfoSphereExt,
    StructType::LightInfoRectExt,
    StructType::LightInfoDiskExt,
    StructType::LightInfoCylinderExt,
    StructType::LightInfoDistantExt,
];

fn out_of_range(kind: &str) -> ApiError {
    ApiError::invalid(format!("{kind} light parameters are out of range"))
}

pub fn translate_light(info: &LightInfo<'_>) -> Result<PendingLight> {
    let families = info.extensions.count_of(&LIGHT_FAMILIES);
    if families != 1 {
        return Err(ApiError::invalid(format!(
            "a light needs exactly one light type extension, found {families}"
        )));
    }

    let radiance = to_vec3(info.radiance);

    if let Some(dome) = info.extensions.find::<LightInfoDomeExt>() {
        return Ok(LightData::Dome(DomeLight {
            radiance,
            world_to_light: to_mat4(&dome.transform).inverse(),
            texture: to_path(dome.color_texture),
        }));
    }
    if let Some(usd) = info.extensions.find::<LightInfoUsdExt>() {
        return translate_usd_light(usd).map(LightData::Analytic);
    }

    let light = if let Some(src) = info.extensions.find::<LightInfoSphereExt>() {
        sphere(src, radiance)?
    } else if let Some(src) = info.extensions.find::<LightInfoRectExt>() {
        rect(src, radiance)?
    } else if let Some(src) = info.extensions.find::<LightInfoDiskExt>() {
        disk(src, radiance)?
    } else if let Some(src) = info.extensions.find::<LightInfoCylinderExt>() {
        CylinderLight::try_create(
            to_vec3(src.position),
            radiance,
            src.radius,
            to_vec3(src.axis),
            src.axis_length,
        )
        .map(RtLight::Cylinder)
        .ok_or_else(|| out_of_range("cylinder"))?
    } else if let Some(src) = info.extensions.find::<LightInfoDistantExt>() {
        distant(src, radiance)?
    } else {
        return Err(ApiError::invalid("light carries no light type extension"));
    };
    Ok(LightData::Analytic(light))
}

fn sphere(src: &LightInfoSphereExt, radiance: Vec3) -> Result<RtLight> {
    let shaping = to_light_shaping(src.shaping.as_ref())?;
    SphereLight::try_create(to_vec3(src.position), radiance, src.radius, shaping)
        .map(RtLight::Sphere)
        .ok_or_else(|| out_of_range("sphere"))
}

fn rect(src: &LightInfoRectExt, radiance: Vec3) -> Result<RtLight> {
    let shaping = to_light_shaping(src.shaping.as_ref())?;
    RectLight::try_create(
        to_vec3(src.position),
        radiance,
        Vec2::new(src.x_size, src.y_size),
        to_vec3(src.x_axis),
        to_vec3(src.y_axis),
        to_vec3(src.direction),
        shaping,
    )
    .map(RtLight::Rect)
    .ok_or_else(|| out_of_range("rect"))
}

fn disk(src: &LightInfoDiskExt, radiance: Vec3) -> Result<RtLight> {
    let shaping = to_light_shaping(src.shaping.as_ref())?;
    DiskLight::try_create(
        to_vec3(src.position),
        radiance,
        Vec2::new(src.x_radius, src.y_radius),
        to_vec3(src.x_axis),
        to_vec3(src.y_axis),
        to_vec3(src.direction),
        shaping,
    )
    .map(RtLight::Disk)
    .ok_or_else(|| out_of_range("disk"))
}

fn distant(src: &LightInfoDistantExt, radiance: Vec3) -> Result<RtLight> {
    DistantLight::try_create(
        to_vec3(src.direction),
        (src.angular_diameter_degrees * 0.5).to_radians(),
        radiance,
    )
    .map(RtLight::Distant)
    .ok_or_else(|| out_of_range("distant"))
}

// ============================================================================
// USD lights
// ============================================================================

mod usd_defaults {
    pub const RADIUS: f32 = 0.5;
    pub const WIDTH: f32 = 1.0;
    pub const HEIGHT: f32 = 1.0;
    pub const LENGTH: f32 = 1.0;
    pub const ANGLE_DEGREES: f32 = 0.53;
    pub const COLOR_TEMPERATURE: f32 = 6500.0;
    pub const EXPOSURE: f32 = 0.0;
    pub const INTENSITY: f32 = 1.0;
    pub const CONE_ANGLE: f32 = std::f32::consts::PI;
    pub const CONE_SOFTNESS: f32 = 0.0;
    pub const FOCUS: f32 = 0.0;
}

const MIN_COLOR_TEMPERATURE: f32 = 1000.0;
const MAX_COLOR_TEMPERATURE: f32 = 15000.0;
const REC709_LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Linear Rec.709 color of a blackbody at `kelvin`, normalized to unit
/// luminance.
///
/// Uses Krystek's rational approximation of the Planckian locus in CIE 1960
/// `uv`. The temperature is clamped to `[1000, 15000]` K.
#[must_use]
pub fn blackbody_to_linear_rgb(kelvin: f32) -> Vec3 {
    let t = f64::from(kelvin.clamp(MIN_COLOR_TEMPERATURE, MAX_COLOR_TEMPERATURE));
    let t2 = t * t;
    let u = (0.860_117_757 + 1.541_182_54e-4 * t + 1.286_412_12e-7 * t2)
        / (1.0 + 8.424_202_35e-4 * t + 7.081_451_63e-7 * t2);
    let v = (0.317_398_726 + 4.228_062_45e-5 * t + 4.204_816_91e-8 * t2)
        / (1.0 - 2.897_418_16e-5 * t + 1.614_560_53e-7 * t2);

    let denom = 2.0 * u - 8.0 * v + 4.0;
    let x = 3.0 * u / denom;
    let y = 2.0 * v / denom;

    // XYZ with Y = 1.
    let big_x = x / y;
    let big_z = (1.0 - x - y) / y;

    let rgb = Vec3::new(
        (3.240_454_2 * big_x - 1.537_138_5 - 0.498_531_4 * big_z) as f32,
        (-0.969_266_0 * big_x + 1.876_010_8 + 0.041_556_0 * big_z) as f32,
        (0.055_643_4 * big_x - 0.204_025_9 + 1.057_225_2 * big_z) as f32,
    )
    .max(Vec3::ZERO);

    let luma = rgb.dot(REC709_LUMA);
    if luma > 0.0 { rgb / luma } else { Vec3::ONE }
}

fn usd_radiance(src: &LightInfoUsdExt) -> Vec3 {
    let mut color = src.color.map_or(Vec3::ONE, to_vec3);
    if src.enable_color_temperature.unwrap_or(false) {
        color *= blackbody_to_linear_rgb(src.color_temperature.unwrap_or(usd_defaults::COLOR_TEMPERATURE));
    }
    let intensity = src.intensity.unwrap_or(usd_defaults::INTENSITY);
    let exposure = src.exposure.unwrap_or(usd_defaults::EXPOSURE);
    color * intensity * exposure.exp2()
}

fn usd_shaping(src: &LightInfoUsdExt, direction: Vec3) -> Result<LightShaping> {
    let authored = src.cone_angle_radians.is_some() || src.cone_softness.is_some() || src.focus.is_some();
    if !authored {
        return Ok(LightShaping::disabled());
    }
    LightShaping::try_create(
        true,
        direction,
        src.cone_angle_radians.unwrap_or(usd_defaults::CONE_ANGLE).cos(),
        src.cone_softness.unwrap_or(usd_defaults::CONE_SOFTNESS),
        src.focus.unwrap_or(usd_defaults::FOCUS),
    )
    .ok_or_else(|| ApiError::invalid("USD light shaping parameters are out of range"))
}

/// Axes of a USD light transform. Lights emit along their local `-Z`.
struct UsdFrame {
    position: Vec3,
    x: Vec3,
    y: Vec3,
    z: Vec3,
}

impl UsdFrame {
    fn new(transform: &Mat4) -> Self {
        Self {
            position: transform.w_axis.truncate(),
            x: transform.x_axis.truncate(),
            y: transform.y_axis.truncate(),
            z: transform.z_axis.truncate(),
        }
    }

    fn direction(&self) -> Vec3 {
        (-self.z).normalize_or_zero()
    }

    fn max_scale(&self) -> f32 {
        self.x.length().max(self.y.length()).max(self.z.length())
    }
}

/// Builds an analytic light from USD attributes. The light's radiance comes
/// entirely from its color, temperature, intensity and exposure.
pub fn translate_usd_light(src: &LightInfoUsdExt) -> Result<RtLight> {
    let frame = UsdFrame::new(&to_mat4(&src.transform));
    let radiance = usd_radiance(src);
    let direction = frame.direction();

    match src.light_type {
        UsdLightType::Sphere => {
            let radius = src.radius.unwrap_or(usd_defaults::RADIUS) * frame.max_scale();
            let shaping = usd_shaping(src, direction)?;
            SphereLight::try_create(frame.position, radiance, radius, shaping)
                .map(RtLight::Sphere)
                .ok_or_else(|| out_of_range("USD sphere"))
        }
        UsdLightType::Rect => {
            let dimensions = Vec2::new(
                src.width.unwrap_or(usd_defaults::WIDTH) * frame.x.length(),
                src.height.unwrap_or(usd_defaults::HEIGHT) * frame.y.length(),
            );
            let shaping = usd_shaping(src, direction)?;
            RectLight::try_create(
                frame.position,
                radiance,
                dimensions,
                frame.x.normalize_or_zero(),
                frame.y.normalize_or_zero(),
                direction,
                shaping,
            )
            .map(RtLight::Rect)
            .ok_or_else(|| out_of_range("USD rect"))
        }
        UsdLightType::Disk => {
            let radius = src.radius.unwrap_or(usd_defaults::RADIUS);
            let half_dimensions = Vec2::new(radius * frame.x.length(), radius * frame.y.length());
            let shaping = usd_shaping(src, direction)?;
            DiskLight::try_create(
                frame.position,
                radiance,
                half_dimensions,
                frame.x.normalize_or_zero(),
                frame.y.normalize_or_zero(),
                direction,
                shaping,
            )
            .map(RtLight::Disk)
            .ok_or_else(|| out_of_range("USD disk"))
        }
        UsdLightType::Cylinder => {
            let radius = src.radius.unwrap_or(usd_defaults::RADIUS) * frame.y.length().max(frame.z.length());
            let length = src.length.unwrap_or(usd_defaults::LENGTH) * frame.x.length();
            CylinderLight::try_create(frame.position, radiance, radius, frame.x.normalize_or_zero(), length)
                .map(RtLight::Cylinder)
                .ok_or_else(|| out_of_range("USD cylinder"))
        }
        UsdLightType::Distant => {
            let angle = src.angle_radians.unwrap_or(usd_defaults::ANGLE_DEGREES.to_radians());
            DistantLight::try_create(direction, angle * 0.5, radiance)
                .map(RtLight::Distant)
                .ok_or_else(|| out_of_range("USD distant"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blackbody_has_unit_luminance() {
        for kelvin in [1000.0, 3200.0, 6500.0, 12000.0] {
            let rgb = blackbody_to_linear_rgb(kelvin);
            assert!((rgb.dot(REC709_LUMA) - 1.0).abs() < 1e-4, "{kelvin} K -> {rgb}");
            assert!(rgb.min_element() >= 0.0);
        }
    }

    #[test]
    fn warm_is_red_and_cool_is_blue() {
        let warm = blackbody_to_linear_rgb(2000.0);
        let cool = blackbody_to_linear_rgb(12000.0);
        assert!(warm.x > warm.z);
        assert!(cool.z > cool.x);
    }

    #[test]
    fn temperature_is_clamped() {
        assert_eq!(blackbody_to_linear_rgb(10.0), blackbody_to_linear_rgb(1000.0));
        assert_eq!(blackbody_to_linear_rgb(1.0e6), blackbody_to_linear_rgb(15000.0));
    }
}
