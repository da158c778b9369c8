//! Translation tests
//!
//! Tests for:
//! - Transform and matrix conversion
//! - Parameterized cameras and camera type selection
//! - Instance categories, picking values and blend state validation
//! - Material family rules, sampler and blend enum validation
//! - Light family rules, shaping validation, USD lights
//! - Bone index packing

use std::path::Path;

use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};
use raylink::convert::{
    category_to_camera_type, mat4_to_matrix4, matrix4_to_mat4, parameterized_camera, to_categories, to_mat4,
};
use raylink::external::{
    CameraInfoParameterizedExt, ExtensionChain, Float3D, InstanceCategoryFlags, InstanceInfo, InstanceInfoBlendExt,
    InstanceInfoObjectPickingExt, LightInfo, LightInfoDistantExt, LightInfoDomeExt, LightInfoRectExt,
    LightInfoSphereExt, LightInfoUsdExt, LightShapingInfo, MaterialInfo, MaterialInfoOpaqueExt,
    MaterialInfoOpaqueSubsurfaceExt, MaterialInfoPortalExt, MaterialInfoTranslucentExt, Transform, UsdLightType,
};
use raylink::translate::{
    pack_bone_indices, packed_words_per_vertex, translate_instance, translate_light, translate_material,
    translate_usd_light, unpack_bone_indices,
};
use raylink::{ErrorCode, MeshHandle};
use raylink_render::CameraType;
use raylink_render::draw::InstanceCategories;
use raylink_render::light::{LightData, RtLight};
use raylink_render::material::{BlendType, MaterialData};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn material_with(extensions: ExtensionChain<'static>) -> MaterialInfo<'static> {
    MaterialInfo {
        hash: 1,
        extensions,
        ..MaterialInfo::default()
    }
}

fn light_with(extensions: ExtensionChain<'static>) -> LightInfo<'static> {
    LightInfo {
        hash: 1,
        radiance: Float3D::new(1.0, 2.0, 3.0),
        extensions,
    }
}

// ============================================================================
// Math conversion
// ============================================================================

#[test]
fn transform_translation_lands_in_last_column() {
    let m = to_mat4(&Transform::from_translation(1.0, 2.0, 3.0));
    assert!(vec3_approx(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(m.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn transform_rows_become_matrix_rows() {
    // 90 degrees about Z, stored row-major.
    let transform = Transform {
        matrix: [[0.0, -1.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
    };
    let m = to_mat4(&transform);
    assert!(vec3_approx(m.transform_vector3(Vec3::X), Vec3::Y));
}

#[test]
fn external_matrix_keeps_memory_order() {
    let m = Mat4::from_cols_array(&[
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
    ]);
    let external = mat4_to_matrix4(&m);
    assert_eq!(external[1], [5.0, 6.0, 7.0, 8.0]);
    assert_eq!(matrix4_to_mat4(&external), m);
}

// ============================================================================
// Cameras
// ============================================================================

#[test]
fn parameterized_camera_inverts_its_basis() {
    let params = CameraInfoParameterizedExt {
        position: Float3D::new(3.0, 4.0, 5.0),
        ..CameraInfoParameterizedExt::default()
    };
    let camera = parameterized_camera(CameraType::Main, &params);
    let eye = camera.view_to_world().transform_point3(Vec3::ZERO);
    assert!(vec3_approx(eye, Vec3::new(3.0, 4.0, 5.0)));

    let ahead = camera.world_to_view.transform_point3(Vec3::new(3.0, 4.0, 15.0));
    assert!(vec3_approx(ahead, Vec3::new(0.0, 0.0, 10.0)));
}

#[test]
fn parameterized_camera_keeps_a_rotated_basis() {
    let rotation = Quat::from_euler(EulerRot::YXZ, 30f32.to_radians(), 20f32.to_radians(), 0.0);
    let (right, up, forward) = (rotation * Vec3::X, rotation * Vec3::Y, rotation * Vec3::Z);
    let position = Vec3::new(-2.0, 1.5, 4.0);
    let params = CameraInfoParameterizedExt {
        position: Float3D::new(position.x, position.y, position.z),
        forward: Float3D::new(forward.x, forward.y, forward.z),
        up: Float3D::new(up.x, up.y, up.z),
        right: Float3D::new(right.x, right.y, right.z),
        ..CameraInfoParameterizedExt::default()
    };
    let camera = parameterized_camera(CameraType::Main, &params);

    // The f32 inverse loses a little precision over the rotated axes.
    let near = |a: Vec3, b: Vec3| (a - b).length() < 1e-4;
    let view_to_world = camera.view_to_world();
    assert!(near(view_to_world.transform_point3(Vec3::ZERO), position));
    assert!(near(view_to_world.x_axis.truncate(), right));
    assert!(near(view_to_world.y_axis.truncate(), up));
    assert!(near(view_to_world.z_axis.truncate(), forward));

    let ahead = camera.world_to_view.transform_point3(position + forward * 10.0);
    assert!(near(ahead, Vec3::new(0.0, 0.0, 10.0)));

    let expected = Mat4::perspective_lh(
        params.fov_y_in_degrees.to_radians(),
        params.aspect,
        params.near_plane,
        params.far_plane,
    );
    assert_eq!(camera.view_to_projection, expected);
}

#[test]
fn parameterized_camera_projection_is_left_handed() {
    let camera = parameterized_camera(CameraType::Main, &CameraInfoParameterizedExt::default());
    let near = camera.view_to_projection.project_point3(Vec3::new(0.0, 0.0, 0.1));
    let far = camera.view_to_projection.project_point3(Vec3::new(0.0, 0.0, 1000.0));
    assert!(near.z.abs() < 1e-3);
    assert!((far.z - 1.0).abs() < 1e-3);
}

#[test]
fn sky_takes_precedence_over_first_person() {
    let both = InstanceCategoryFlags::SKY | InstanceCategoryFlags::FIRST_PERSON;
    assert_eq!(category_to_camera_type(both), CameraType::Sky);
    assert_eq!(category_to_camera_type(InstanceCategoryFlags::FIRST_PERSON), CameraType::ViewModel);
    assert_eq!(category_to_camera_type(InstanceCategoryFlags::empty()), CameraType::Main);
}

// ============================================================================
// Instances
// ============================================================================

#[test]
fn categories_map_bit_by_bit() {
    let flags = InstanceCategoryFlags::SKY | InstanceCategoryFlags::TERRAIN | InstanceCategoryFlags::FIRST_PERSON;
    assert_eq!(to_categories(flags), InstanceCategories::SKY | InstanceCategories::TERRAIN);
    assert_eq!(to_categories(InstanceCategoryFlags::all()), InstanceCategories::all());
}

#[test]
fn instance_carries_picking_value_and_transform() {
    let info = InstanceInfo {
        mesh: MeshHandle(8),
        transform: Transform::from_translation(0.0, 1.0, 0.0),
        double_sided: true,
        extensions: ExtensionChain::new().with(InstanceInfoObjectPickingExt {
            object_picking_value: 1234,
        }),
        ..InstanceInfo::default()
    };
    let draw = translate_instance(&info).unwrap();
    assert_eq!(draw.prototype.draw_call_id, 1234);
    assert_eq!(draw.mesh, MeshHandle(8));
    assert!(draw.double_sided);
    assert!(vec3_approx(
        draw.prototype.object_to_world.transform_point3(Vec3::ZERO),
        Vec3::Y
    ));
}

#[test]
fn instance_rejects_unknown_blend_factor() {
    let info = InstanceInfo {
        mesh: MeshHandle(8),
        extensions: ExtensionChain::new().with(InstanceInfoBlendExt {
            src_color_blend_factor: 500,
            ..InstanceInfoBlendExt::default()
        }),
        ..InstanceInfo::default()
    };
    assert_eq!(translate_instance(&info).unwrap_err().code(), ErrorCode::InvalidArguments);
}

// ============================================================================
// Materials
// ============================================================================

#[test]
fn opaque_material_keeps_constants() {
    let info = material_with(ExtensionChain::new().with(MaterialInfoOpaqueExt {
        roughness_constant: 0.8,
        thin_film_thickness: Some(300.0),
        blend_type: Some(BlendType::Multiplicative.raw()),
        ..MaterialInfoOpaqueExt::default()
    }));
    let MaterialData::Opaque(material) = translate_material(&info).unwrap() else {
        panic!("expected an opaque material");
    };
    assert!(approx_eq(material.roughness_constant, 0.8));
    assert!(material.enable_thin_film);
    assert!(approx_eq(material.thin_film_thickness_constant, 300.0));
    assert!(material.blend_enabled);
    assert_eq!(material.blend_type, BlendType::Multiplicative);
}

#[test]
fn subsurface_applies_to_opaque_only() {
    let info = material_with(
        ExtensionChain::new()
            .with(MaterialInfoOpaqueExt::default())
            .with(MaterialInfoOpaqueSubsurfaceExt {
                subsurface_measurement_distance: 2.0,
                ..MaterialInfoOpaqueSubsurfaceExt::default()
            }),
    );
    let MaterialData::Opaque(material) = translate_material(&info).unwrap() else {
        panic!("expected an opaque material");
    };
    assert!(approx_eq(material.subsurface_measurement_distance, 2.0));
}

#[test]
fn translucent_and_portal_materials() {
    let translucent = material_with(ExtensionChain::new().with(MaterialInfoTranslucentExt {
        refractive_index: 1.5,
        ..MaterialInfoTranslucentExt::default()
    }));
    let MaterialData::Translucent(material) = translate_material(&translucent).unwrap() else {
        panic!("expected a translucent material");
    };
    assert!(approx_eq(material.refractive_index, 1.5));

    let portal = material_with(ExtensionChain::new().with(MaterialInfoPortalExt {
        ray_portal_index: 1,
        rotation_speed: 0.5,
    }));
    let MaterialData::RayPortal(material) = translate_material(&portal).unwrap() else {
        panic!("expected a portal material");
    };
    assert_eq!(material.ray_portal_index, 1);
}

#[test]
fn material_family_is_exclusive() {
    let info = material_with(
        ExtensionChain::new()
            .with(MaterialInfoOpaqueExt::default())
            .with(MaterialInfoTranslucentExt::default()),
    );
    assert_eq!(translate_material(&info).unwrap_err().code(), ErrorCode::InvalidArguments);
}

#[test]
fn material_enums_are_validated() {
    let mut info = material_with(ExtensionChain::new().with(MaterialInfoOpaqueExt::default()));
    info.filter_mode = 9;
    assert_eq!(translate_material(&info).unwrap_err().code(), ErrorCode::InvalidArguments);

    let info = material_with(ExtensionChain::new().with(MaterialInfoOpaqueExt {
        blend_type: Some(42),
        ..MaterialInfoOpaqueExt::default()
    }));
    assert_eq!(translate_material(&info).unwrap_err().code(), ErrorCode::InvalidArguments);
}

#[cfg(debug_assertions)]
#[test]
fn material_without_family_fails_in_debug() {
    let info = material_with(ExtensionChain::new());
    assert_eq!(translate_material(&info).unwrap_err().code(), ErrorCode::InvalidArguments);
}

// ============================================================================
// Lights
// ============================================================================

#[test]
fn sphere_light_takes_info_radiance() {
    let info = light_with(ExtensionChain::new().with(LightInfoSphereExt {
        position: Float3D::new(0.0, 1.0, 0.0),
        radius: 0.5,
        shaping: None,
    }));
    let LightData::Analytic(RtLight::Sphere(light)) = translate_light(&info).unwrap() else {
        panic!("expected a sphere light");
    };
    assert!(vec3_approx(light.radiance, Vec3::new(1.0, 2.0, 3.0)));
    assert!(approx_eq(light.radius, 0.5));
    assert!(!light.shaping.enabled());
}

#[test]
fn negative_radius_is_rejected() {
    let info = light_with(ExtensionChain::new().with(LightInfoSphereExt {
        radius: -1.0,
        ..LightInfoSphereExt::default()
    }));
    assert_eq!(translate_light(&info).unwrap_err().code(), ErrorCode::InvalidArguments);
}

#[test]
fn shaping_needs_a_normalized_direction() {
    let shaping = LightShapingInfo {
        direction: Float3D::new(0.0, 0.0, 2.0),
        ..LightShapingInfo::default()
    };
    let info = light_with(ExtensionChain::new().with(LightInfoSphereExt {
        radius: 1.0,
        shaping: Some(shaping),
        ..LightInfoSphereExt::default()
    }));
    assert_eq!(translate_light(&info).unwrap_err().code(), ErrorCode::InvalidArguments);

    let shaping = LightShapingInfo {
        cone_angle_degrees: 45.0,
        ..LightShapingInfo::default()
    };
    let info = light_with(ExtensionChain::new().with(LightInfoRectExt {
        x_axis: Float3D::new(1.0, 0.0, 0.0),
        y_axis: Float3D::new(0.0, 1.0, 0.0),
        direction: Float3D::new(0.0, 0.0, 1.0),
        x_size: 1.0,
        y_size: 1.0,
        shaping: Some(shaping),
        ..LightInfoRectExt::default()
    }));
    let LightData::Analytic(RtLight::Rect(light)) = translate_light(&info).unwrap() else {
        panic!("expected a rect light");
    };
    assert!(light.shaping.enabled());
    assert!(approx_eq(light.shaping.cos_cone_angle(), 45f32.to_radians().cos()));
}

#[test]
fn light_family_count_is_exactly_one() {
    assert_eq!(
        translate_light(&light_with(ExtensionChain::new())).unwrap_err().code(),
        ErrorCode::InvalidArguments
    );
    let two = light_with(
        ExtensionChain::new()
            .with(LightInfoSphereExt {
                radius: 1.0,
                ..LightInfoSphereExt::default()
            })
            .with(LightInfoDistantExt {
                direction: Float3D::new(0.0, -1.0, 0.0),
                angular_diameter_degrees: 0.5,
            }),
    );
    assert_eq!(translate_light(&two).unwrap_err().code(), ErrorCode::InvalidArguments);
}

#[test]
fn dome_light_keeps_its_texture_path() {
    let info = light_with(ExtensionChain::new().with(LightInfoDomeExt {
        transform: Transform::IDENTITY,
        color_texture: Some(Path::new("sky/dome.dds")),
    }));
    let LightData::Dome(dome) = translate_light(&info).unwrap() else {
        panic!("expected a dome light");
    };
    assert_eq!(dome.texture.as_deref(), Some(Path::new("sky/dome.dds")));
    assert_eq!(dome.world_to_light, Mat4::IDENTITY);
}

#[test]
fn usd_sphere_follows_its_transform() {
    let usd = LightInfoUsdExt {
        light_type: UsdLightType::Sphere,
        transform: Transform::from_translation(1.0, 2.0, 3.0),
        radius: Some(0.25),
        ..LightInfoUsdExt::default()
    };
    let RtLight::Sphere(light) = translate_usd_light(&usd).unwrap() else {
        panic!("expected a sphere light");
    };
    assert!(vec3_approx(light.position, Vec3::new(1.0, 2.0, 3.0)));
    assert!(approx_eq(light.radius, 0.25));
}

#[test]
fn usd_exposure_doubles_radiance() {
    let base = LightInfoUsdExt {
        light_type: UsdLightType::Distant,
        ..LightInfoUsdExt::default()
    };
    let brighter = LightInfoUsdExt {
        exposure: Some(1.0),
        ..base
    };
    let dim = translate_usd_light(&base).unwrap().radiance();
    let bright = translate_usd_light(&brighter).unwrap().radiance();
    assert!(vec3_approx(bright, dim * 2.0));
}

// ============================================================================
// Bone index packing
// ============================================================================

#[test]
fn bone_indices_pack_four_per_word() {
    assert_eq!(packed_words_per_vertex(4), 1);
    assert_eq!(packed_words_per_vertex(5), 2);

    let packed = pack_bone_indices(&[1, 2, 3, 4, 5], 1, 5).unwrap();
    assert_eq!(packed, vec![0x0403_0201, 5]);
    assert_eq!(unpack_bone_indices(&packed, 1, 5), vec![1, 2, 3, 4, 5]);
}

#[test]
fn bone_indices_survive_packing_for_any_count() {
    const VERTICES: usize = 3;
    for bones in [1u32, 4, 255, 256] {
        let indices: Vec<u32> = (0..VERTICES * bones as usize)
            .map(|i| (i as u32 * 37 + 11) % 256)
            .collect();
        let packed = pack_bone_indices(&indices, VERTICES, bones).unwrap();
        assert_eq!(packed.len(), VERTICES * packed_words_per_vertex(bones) as usize);
        assert_eq!(unpack_bone_indices(&packed, VERTICES, bones), indices, "bones per vertex {bones}");
    }
}

#[test]
fn bone_index_above_255_is_rejected() {
    let err = pack_bone_indices(&[256, 0], 1, 2).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
}
