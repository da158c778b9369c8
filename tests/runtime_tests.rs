//! Runtime tests
//!
//! Tests for:
//! - Lifecycle: startup, double startup, shutdown idempotence
//! - Calls before startup report a missing device
//! - Image, material, mesh and light create/destroy symmetry
//! - Instance submission reaching the render thread in order
//! - Camera setup, near-plane override reset
//! - Config variables with and without a device
//! - Object picking and highlighting across Present

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use parking_lot::Mutex;
use raylink::api::{RenderBackend, Runtime};
use raylink::external::{
    CameraInfo, CameraInfoParameterizedExt, CreateImageInfo, ExtensionChain, Float3D, Format, HardcodedVertex,
    InstanceInfo, InstanceInfoObjectPickingExt, LightInfo, LightInfoDistantExt, LightInfoSphereExt, MaterialInfo,
    MaterialInfoOpaqueExt, MaterialInfoPortalExt, MeshInfo, MeshSurfaceTriangles, OutputType, Rect2D, StartupInfo,
    UiInstanceInfo,
};
use raylink::{ErrorCode, LightHandle, MaterialHandle, MeshHandle};
use raylink_core::errors::{ApiError, Result};
use raylink_core::options::keys;
use raylink_render::commands::Command;
use raylink_render::device::{Buffer, BufferDesc, Image, ImageDesc, ImageView};
use raylink_render::textures::{MemoryAssetLocator, TextureCache};
use raylink_render::{CameraType, Device, HeadlessDevice};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn started() -> Runtime {
    let _ = env_logger::builder().is_test(true).try_init();
    let runtime = Runtime::default();
    runtime.startup(&StartupInfo::default()).unwrap();
    runtime
}

fn triangle() -> [HardcodedVertex; 3] {
    let mut vertices = [HardcodedVertex::default(); 3];
    vertices[0].position = [0.0, 0.0, 0.0];
    vertices[1].position = [1.0, 0.0, 0.0];
    vertices[2].position = [0.0, 1.0, 0.0];
    vertices
}

fn create_triangle_mesh(runtime: &Runtime, hash: u64) -> MeshHandle {
    let vertices = triangle();
    let surfaces = [MeshSurfaceTriangles {
        vertices: &vertices,
        ..MeshSurfaceTriangles::default()
    }];
    runtime.create_mesh(&MeshInfo { hash, surfaces: &surfaces }).unwrap()
}

fn opaque_material(hash: u64) -> MaterialInfo<'static> {
    MaterialInfo {
        hash,
        extensions: ExtensionChain::new().with(MaterialInfoOpaqueExt::default()),
        ..MaterialInfo::default()
    }
}

fn sphere_light(hash: u64) -> LightInfo<'static> {
    LightInfo {
        hash,
        radiance: Float3D::new(10.0, 10.0, 10.0),
        extensions: ExtensionChain::new().with(LightInfoSphereExt {
            position: Float3D::new(0.0, 2.0, 0.0),
            radius: 0.25,
            shaping: None,
        }),
    }
}

fn draw(runtime: &Runtime, mesh: MeshHandle, picking_value: u32) {
    let info = InstanceInfo {
        mesh,
        extensions: ExtensionChain::new().with(InstanceInfoObjectPickingExt {
            object_picking_value: picking_value,
        }),
        ..InstanceInfo::default()
    };
    runtime.draw_instance(&info).unwrap();
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn calls_before_startup_report_missing_device() {
    let runtime = Runtime::default();
    assert!(!runtime.is_running());

    let err = runtime.present().unwrap_err();
    assert_eq!(err.code(), ErrorCode::DeviceNotRegistered);
    let err = runtime.create_material(&opaque_material(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DeviceNotRegistered);
    let err = runtime.draw_light_instance(LightHandle(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DeviceNotRegistered);
}

#[test]
fn double_startup_already_exists() {
    let runtime = started();
    let err = runtime.startup(&StartupInfo::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    assert!(runtime.is_running());
}

#[test]
fn shutdown_is_idempotent_and_detaches() {
    let runtime = started();
    create_triangle_mesh(&runtime, 0x10);
    runtime.shutdown().unwrap();
    runtime.shutdown().unwrap();
    assert!(!runtime.is_running());
    assert_eq!(runtime.present().unwrap_err().code(), ErrorCode::DeviceNotRegistered);

    // Registries were cleared, so the same hash can be created again.
    runtime.startup(&StartupInfo::default()).unwrap();
    create_triangle_mesh(&runtime, 0x10);
}

#[test]
fn startup_info_sets_options() {
    let runtime = Runtime::default();
    let info = StartupInfo {
        disable_srgb_conversion_for_output: true,
        editor_mode_enabled: true,
    };
    runtime.startup(&info).unwrap();
    let options = runtime.options();
    assert_eq!(options.get_int(keys::FALLBACK_LIGHT_MODE), Some(0));
    assert_eq!(options.get_bool(keys::DESATURATE_OTHERS_ON_HIGHLIGHT), Some(false));
    assert_eq!(options.get_bool(keys::ALLOW_SRGB_CONVERSION_FOR_OUTPUT), Some(false));
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn material_create_destroy_symmetry() {
    let runtime = started();
    let handle = runtime.create_material(&opaque_material(0xAB)).unwrap();
    assert_eq!(handle, MaterialHandle(0xAB));

    let err = runtime.create_material(&opaque_material(0xAB)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    runtime.destroy_material(handle).unwrap();
    runtime.destroy_material(handle).unwrap();
    runtime.create_material(&opaque_material(0xAB)).unwrap();

    let registered = runtime
        .inspect(move |ctx| ctx.scene.materials.contains(handle))
        .unwrap();
    assert!(registered);
}

#[test]
fn zero_hash_is_rejected() {
    let runtime = started();
    let err = runtime.create_material(&opaque_material(0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidHashOrHandle);
    let err = runtime.create_light(&sphere_light(0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidHashOrHandle);
}

#[test]
fn material_with_two_families_is_invalid() {
    let runtime = started();
    let mut info = opaque_material(5);
    info.extensions.push(MaterialInfoPortalExt::default());
    let err = runtime.create_material(&info).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
}

#[test]
fn mesh_reaches_the_render_thread() {
    let runtime = started();
    let handle = create_triangle_mesh(&runtime, 0x42);

    let surfaces = runtime
        .inspect(move |ctx| ctx.scene.meshes.get(handle).map(|mesh| mesh.surfaces.len()))
        .unwrap();
    assert_eq!(surfaces, Some(1));

    runtime.destroy_mesh(handle).unwrap();
    let present = runtime.inspect(move |ctx| ctx.scene.meshes.contains(handle)).unwrap();
    assert!(!present);
}

#[test]
fn empty_mesh_surface_is_invalid() {
    let runtime = started();
    let surfaces = [MeshSurfaceTriangles::default()];
    let err = runtime
        .create_mesh(&MeshInfo {
            hash: 3,
            surfaces: &surfaces,
        })
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
}

#[test]
fn light_needs_exactly_one_family() {
    let runtime = started();
    let mut info = sphere_light(9);
    info.extensions.push(LightInfoDistantExt {
        direction: Float3D::new(0.0, -1.0, 0.0),
        angular_diameter_degrees: 0.5,
    });
    assert_eq!(runtime.create_light(&info).unwrap_err().code(), ErrorCode::InvalidArguments);

    let bare = LightInfo {
        hash: 9,
        ..LightInfo::default()
    };
    assert_eq!(runtime.create_light(&bare).unwrap_err().code(), ErrorCode::InvalidArguments);
}

#[test]
fn light_instances_need_a_live_light() {
    let runtime = started();
    let err = runtime.draw_light_instance(LightHandle(0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidHashOrHandle);
    let err = runtime.draw_light_instance(LightHandle(77)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidHashOrHandle);

    let handle = runtime.create_light(&sphere_light(77)).unwrap();
    runtime.draw_light_instance(handle).unwrap();
    let active = runtime
        .inspect(|ctx| ctx.scene.light_manager.active.len())
        .unwrap();
    assert_eq!(active, 1);

    runtime.present().unwrap();
    let active = runtime
        .inspect(|ctx| ctx.scene.light_manager.active.len())
        .unwrap();
    assert_eq!(active, 0);
}

#[test]
fn image_upload_and_lookup() {
    let runtime = started();
    let texels = [255u8; 4 * 2 * 2];
    let info = CreateImageInfo {
        image_name: "ui/cursor",
        width: 2,
        height: 2,
        format: Format::R8G8B8A8Unorm,
        data: &texels,
    };
    runtime.create_image(&info).unwrap();
    assert_eq!(runtime.create_image(&info).unwrap_err().code(), ErrorCode::AlreadyExists);

    let known = runtime
        .inspect(|ctx| ctx.scene.uploaded_images.contains_key("ui/cursor"))
        .unwrap();
    assert!(known);

    runtime.destroy_image("ui/cursor").unwrap();
    let known = runtime
        .inspect(|ctx| ctx.scene.uploaded_images.contains_key("ui/cursor"))
        .unwrap();
    assert!(!known);
}

#[test]
fn image_validation_order() {
    let runtime = started();
    let empty = CreateImageInfo {
        image_name: "a",
        width: 1,
        height: 1,
        format: Format::R8G8B8A8Unorm,
        data: &[],
    };
    assert_eq!(runtime.create_image(&empty).unwrap_err().code(), ErrorCode::InvalidInputData);

    let texels = [0u8; 4];
    let undefined = CreateImageInfo {
        format: Format::Undefined,
        data: &texels,
        ..empty
    };
    assert_eq!(runtime.create_image(&undefined).unwrap_err().code(), ErrorCode::InvalidArguments);

    let unnamed = CreateImageInfo {
        image_name: "",
        format: Format::R8G8B8A8Unorm,
        data: &texels,
        ..empty
    };
    assert_eq!(runtime.create_image(&unnamed).unwrap_err().code(), ErrorCode::InvalidHashOrHandle);
}

/// Headless device whose image views cannot be created.
#[derive(Default)]
struct ViewlessDevice {
    inner: HeadlessDevice,
}

impl Device for ViewlessDevice {
    fn name(&self) -> &str {
        "viewless"
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Arc<Buffer>> {
        self.inner.create_buffer(desc)
    }

    fn create_image(&self, desc: &ImageDesc) -> Result<Arc<Image>> {
        self.inner.create_image(desc)
    }

    fn create_image_view(&self, _image: &Arc<Image>) -> Result<Arc<ImageView>> {
        Err(ApiError::Backend("image views unavailable".to_string()))
    }

    fn submit(&self, commands: Vec<Command>) -> Result<()> {
        self.inner.submit(commands)
    }
}

#[test]
fn failed_image_view_queues_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let runtime = Runtime::default();
    let backend = RenderBackend::new(
        Arc::new(ViewlessDevice::default()),
        Box::new(MemoryAssetLocator::new()),
        Box::new(TextureCache::new()),
    );
    runtime.startup_with(&StartupInfo::default(), backend).unwrap();
    runtime.sync().unwrap();
    let before = runtime.stats().unwrap();

    let texels = [7u8; 4];
    let info = CreateImageInfo {
        image_name: "ui/broken",
        width: 1,
        height: 1,
        format: Format::R8G8B8A8Unorm,
        data: &texels,
    };
    assert_eq!(runtime.create_image(&info).unwrap_err().code(), ErrorCode::GeneralFailure);
    runtime.sync().unwrap();

    let after = runtime.stats().unwrap();
    assert_eq!(after.submitted, before.submitted);
    let known = runtime
        .inspect(|ctx| ctx.scene.uploaded_images.contains_key("ui/broken"))
        .unwrap();
    assert!(!known);
}

// ============================================================================
// Scene submission
// ============================================================================

#[test]
fn draw_instance_drains_one_unit() {
    let runtime = started();
    let mesh = create_triangle_mesh(&runtime, 0x99);
    runtime.sync().unwrap();
    let before = runtime.stats().unwrap();

    draw(&runtime, mesh, 4);
    runtime.sync().unwrap();
    let after = runtime.stats().unwrap();

    assert_eq!(after.submitted, before.submitted + 1);
    assert_eq!(after.executed, before.executed + 1);
    assert_eq!(after.failed, before.failed);

    let drawn = runtime.inspect(|ctx| ctx.scene.drawn_picking_values()).unwrap();
    assert_eq!(drawn, vec![4]);
}

#[test]
fn draw_instance_requires_a_live_mesh() {
    let runtime = started();
    let info = InstanceInfo {
        mesh: MeshHandle(1234),
        ..InstanceInfo::default()
    };
    assert_eq!(runtime.draw_instance(&info).unwrap_err().code(), ErrorCode::InvalidHashOrHandle);
}

#[test]
fn present_clears_frame_draws() {
    let runtime = started();
    let mesh = create_triangle_mesh(&runtime, 0x5);
    draw(&runtime, mesh, 1);
    draw(&runtime, mesh, 2);
    let frame_before = runtime.inspect(|ctx| ctx.scene.frame_id).unwrap();

    runtime.present().unwrap();
    let (instances, frame_after) = runtime
        .inspect(|ctx| (ctx.scene.draws.instances.len(), ctx.scene.frame_id))
        .unwrap();
    assert_eq!(instances, 0);
    assert_eq!(frame_after, frame_before + 1);
}

#[test]
fn parameterized_camera_is_returned() {
    let runtime = started();
    let info = CameraInfo {
        extensions: ExtensionChain::new().with(CameraInfoParameterizedExt {
            position: Float3D::new(0.0, 0.0, -5.0),
            ..CameraInfoParameterizedExt::default()
        }),
        ..CameraInfo::default()
    };
    let camera = runtime.setup_camera(&info).unwrap();
    assert_eq!(camera.camera_type, CameraType::Main);

    let origin_in_view = camera.world_to_view.transform_point3(Vec3::ZERO);
    assert!((origin_in_view - Vec3::new(0.0, 0.0, 5.0)).length() < EPSILON);

    let stored = runtime
        .inspect(|ctx| ctx.scene.cameras.get(CameraType::Main).copied())
        .unwrap()
        .unwrap();
    assert_eq!(stored.world_to_view, camera.world_to_view);
}

#[test]
fn near_plane_override_is_reset() {
    let runtime = started();
    runtime
        .set_config_variable(keys::ENABLE_NEAR_PLANE_OVERRIDE, "true")
        .unwrap();
    runtime.setup_camera(&CameraInfo::default()).unwrap();
    assert_eq!(runtime.options().get_bool(keys::ENABLE_NEAR_PLANE_OVERRIDE), Some(false));
}

#[test]
fn ui_draw_injects_rt_output_once() {
    let runtime = started();
    let vertices = triangle();
    let info = UiInstanceInfo {
        vertices: &vertices,
        image_name: Some("missing"),
        ..UiInstanceInfo::default()
    };
    runtime.draw_ui_instance(&info).unwrap();
    runtime.draw_ui_instance(&info).unwrap();

    let (ui, injected, textured) = runtime
        .inspect(|ctx| {
            let draws = &ctx.scene.draws;
            (draws.ui.len(), draws.rt_injected, draws.ui.iter().any(|d| d.image.is_some()))
        })
        .unwrap();
    assert_eq!(ui, 2);
    assert!(injected);
    assert!(!textured);
}

#[test]
fn ui_uses_main_camera_when_asked() {
    let runtime = started();
    let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let camera = CameraInfo {
        view: view.to_cols_array_2d(),
        ..CameraInfo::default()
    };
    let resolved = runtime.setup_camera(&camera).unwrap();
    assert_eq!(resolved.world_to_view, view);

    let vertices = triangle();
    let info = UiInstanceInfo {
        flags: raylink::external::UiInstanceFlags::USE_MAINCAMERA_VIEW_PROJECTION,
        vertices: &vertices,
        ..UiInstanceInfo::default()
    };
    runtime.draw_ui_instance(&info).unwrap();
    let drawn_view = runtime.inspect(|ctx| ctx.scene.draws.ui[0].view).unwrap();
    assert_eq!(drawn_view, view);
}

#[test]
fn default_output_reaches_globals() {
    let runtime = started();
    runtime
        .set_default_output(OutputType::FinalColor, [0.25, 0.5, 0.75, 1.0])
        .unwrap();
    let color = runtime.inspect(|ctx| ctx.scene.globals.clear_color_final).unwrap();
    assert!((color - Vec4::new(0.25, 0.5, 0.75, 1.0)).length() < EPSILON);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_variable_without_device() {
    let runtime = Runtime::default();
    runtime.set_config_variable(keys::BLOOM_ENABLE, "false").unwrap();
    assert!(!runtime.options().bloom().enable);

    let err = runtime.set_config_variable("rtx.doesNotExist", "1").unwrap_err();
    assert_eq!(err.code(), ErrorCode::GeneralFailure);
    let err = runtime.set_config_variable("", "1").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
    let err = runtime.set_config_variable(keys::BLOOM_ENABLE, "maybe").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
}

// ============================================================================
// Picking
// ============================================================================

#[test]
fn picking_resolves_at_present() {
    let runtime = started();
    let mesh = create_triangle_mesh(&runtime, 0x77);
    draw(&runtime, mesh, 30);
    draw(&runtime, mesh, 10);
    draw(&runtime, mesh, 30);

    let picked: Arc<Mutex<Vec<Vec<u32>>>> = Arc::default();
    let sink = Arc::clone(&picked);
    let region = Rect2D {
        left: 0,
        top: 0,
        right: 16,
        bottom: 16,
    };
    runtime
        .request_object_picking(&region, move |values| sink.lock().push(values.to_vec()))
        .unwrap();
    runtime.sync().unwrap();
    assert!(picked.lock().is_empty());

    runtime.present().unwrap();
    runtime.present().unwrap();
    runtime.sync().unwrap();
    assert_eq!(*picked.lock(), vec![vec![10, 30]]);
}

#[test]
fn highlight_lasts_one_frame() {
    let runtime = started();
    runtime.highlight_objects(&[], [255, 0, 0]).unwrap();
    let current = runtime
        .inspect(|ctx| ctx.scene.highlighting.current().is_some())
        .unwrap();
    assert!(!current);

    runtime.highlight_objects(&[1, 2], [0, 255, 0]).unwrap();
    let color = runtime
        .inspect(|ctx| ctx.scene.highlighting.current().map(|h| h.color))
        .unwrap();
    assert_eq!(color, Some([0, 255, 0]));

    runtime.present().unwrap();
    runtime.present().unwrap();
    let current = runtime
        .inspect(|ctx| ctx.scene.highlighting.current().is_some())
        .unwrap();
    assert!(!current);
}
