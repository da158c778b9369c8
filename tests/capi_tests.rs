//! C ABI tests
//!
//! Tests for:
//! - InitializeLibrary argument, header and version checks
//! - SetConfigVariable null handling without a device
//! - A full frame driven through the function table: startup, mesh,
//!   light, camera write-back, instance, picking callback, present,
//!   shutdown
//!
//! The table drives one process-wide runtime, so everything that needs a
//! device lives in a single test.

use std::ffi::c_void;
use std::ptr;

use parking_lot::Mutex;
use raylink::ErrorCode;
use raylink::capi::types::{
    RlCameraInfo, RlCameraInfoParameterizedExt, RlInitializeLibraryInfo, RlInstanceInfo,
    RlInstanceInfoObjectPickingExt, RlLightInfo, RlLightInfoLightShaping, RlLightInfoSphereExt, RlMeshInfo,
    RlMeshInfoSkinning, RlMeshInfoSurfaceTriangles, RlRect2D, RlStartupInfo,
};
use raylink::capi::{Interface, raylink_InitializeLibrary, runtime};
use raylink::external::{Float3D, HardcodedVertex, StructType, Transform};
use raylink_core::version::{COMPILED_VERSION, make_version};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn init_info(version: u64) -> RlInitializeLibraryInfo {
    RlInitializeLibraryInfo {
        s_type: StructType::InitializeLibraryInfo.raw(),
        p_next: ptr::null(),
        version,
    }
}

fn load_table() -> Interface {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut table = Interface::new();
    let code = unsafe { raylink_InitializeLibrary(&init_info(COMPILED_VERSION), &mut table) };
    assert_eq!(code, ErrorCode::Success);
    table
}

unsafe extern "C" fn collect_picked(values: *const u32, count: u32, user_data: *mut c_void) {
    let sink = unsafe { &*user_data.cast::<Mutex<Vec<u32>>>() };
    let values = unsafe { std::slice::from_raw_parts(values, count as usize) };
    sink.lock().extend_from_slice(values);
}

// ============================================================================
// InitializeLibrary
// ============================================================================

#[test]
fn initialize_rejects_null_arguments() {
    let mut table = Interface::new();
    let code = unsafe { raylink_InitializeLibrary(ptr::null(), &mut table) };
    assert_eq!(code, ErrorCode::InvalidArguments);

    let code = unsafe { raylink_InitializeLibrary(&init_info(COMPILED_VERSION), ptr::null_mut()) };
    assert_eq!(code, ErrorCode::InvalidArguments);
}

#[test]
fn initialize_checks_struct_type() {
    let mut info = init_info(COMPILED_VERSION);
    info.s_type = StructType::StartupInfo.raw();
    let mut table = Interface::new();
    let code = unsafe { raylink_InitializeLibrary(&info, &mut table) };
    assert_eq!(code, ErrorCode::InvalidArguments);
}

#[test]
fn initialize_checks_version() {
    let mut table = Interface::new();
    let code = unsafe { raylink_InitializeLibrary(&init_info(make_version(0, 6, 0)), &mut table) };
    assert_eq!(code, ErrorCode::IncompatibleVersion);

    let code = unsafe { raylink_InitializeLibrary(&init_info(make_version(0, 5, 3)), &mut table) };
    assert_eq!(code, ErrorCode::Success);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_variable_null_arguments() {
    let table = load_table();
    let code = unsafe { (table.set_config_variable)(ptr::null(), c"1".as_ptr()) };
    assert_eq!(code, ErrorCode::InvalidArguments);
    let code = unsafe { (table.set_config_variable)(c"rtx.bloom.burnIntensity".as_ptr(), ptr::null()) };
    assert_eq!(code, ErrorCode::InvalidArguments);

    let code = unsafe { (table.set_config_variable)(c"rtx.bloom.burnIntensity".as_ptr(), c"2.5".as_ptr()) };
    assert_eq!(code, ErrorCode::Success);
    assert!(approx_eq(runtime().options().bloom().burn_intensity, 2.5));
}

// ============================================================================
// Full frame
// ============================================================================

#[test]
fn frame_through_the_function_table() {
    let table = load_table();

    // Before startup every device call reports the missing device.
    let code = unsafe { (table.present)(ptr::null()) };
    assert_eq!(code, ErrorCode::DeviceNotRegistered);

    let startup = RlStartupInfo {
        s_type: StructType::StartupInfo.raw(),
        p_next: ptr::null(),
        hwnd: ptr::null_mut(),
        disable_srgb_conversion_for_output: 0,
        editor_mode_enabled: 0,
    };
    assert_eq!(unsafe { (table.startup)(&startup) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.startup)(&startup) }, ErrorCode::AlreadyExists);

    // Mesh
    let mut vertices = [HardcodedVertex::default(); 3];
    vertices[1].position = [1.0, 0.0, 0.0];
    vertices[2].position = [0.0, 1.0, 0.0];
    let surface = RlMeshInfoSurfaceTriangles {
        vertices_values: vertices.as_ptr(),
        vertices_count: vertices.len() as u64,
        indices_values: ptr::null(),
        indices_count: 0,
        skinning_hasvalue: 0,
        skinning_value: RlMeshInfoSkinning {
            bones_per_vertex: 0,
            blend_weights_values: ptr::null(),
            blend_weights_count: 0,
            blend_indices_values: ptr::null(),
            blend_indices_count: 0,
        },
        material: 0,
        flags: 0,
    };
    let mesh_info = RlMeshInfo {
        s_type: StructType::MeshInfo.raw(),
        p_next: ptr::null(),
        hash: 0xC0FFEE,
        surfaces_values: &surface,
        surfaces_count: 1,
    };
    let mut mesh = 0u64;
    assert_eq!(unsafe { (table.create_mesh)(&mesh_info, &mut mesh) }, ErrorCode::Success);
    assert_eq!(mesh, 0xC0FFEE);
    assert_eq!(
        unsafe { (table.create_mesh)(&mesh_info, ptr::null_mut()) },
        ErrorCode::InvalidArguments
    );

    // Light
    let sphere = RlLightInfoSphereExt {
        s_type: StructType::LightInfoSphereExt.raw(),
        p_next: ptr::null(),
        position: Float3D::new(0.0, 3.0, 0.0),
        radius: 0.5,
        shaping_hasvalue: 0,
        shaping_value: RlLightInfoLightShaping {
            direction: Float3D::new(0.0, 0.0, 1.0),
            cone_angle_degrees: 180.0,
            cone_softness: 0.0,
            focus_exponent: 0.0,
        },
    };
    let light_info = RlLightInfo {
        s_type: StructType::LightInfo.raw(),
        p_next: ptr::from_ref(&sphere).cast(),
        hash: 0x11,
        radiance: Float3D::new(5.0, 5.0, 5.0),
    };
    let mut light = 0u64;
    assert_eq!(unsafe { (table.create_light)(&light_info, &mut light) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.draw_light_instance)(light) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.draw_light_instance)(0) }, ErrorCode::InvalidHashOrHandle);

    // Camera: the parameterized form writes its matrices back.
    let params = RlCameraInfoParameterizedExt {
        s_type: StructType::CameraInfoParameterizedExt.raw(),
        p_next: ptr::null(),
        position: Float3D::new(2.0, 0.0, 0.0),
        forward: Float3D::new(0.0, 0.0, 1.0),
        up: Float3D::new(0.0, 1.0, 0.0),
        right: Float3D::new(1.0, 0.0, 0.0),
        fov_y_in_degrees: 60.0,
        aspect: 1.0,
        near_plane: 0.1,
        far_plane: 100.0,
    };
    let mut camera = RlCameraInfo {
        s_type: StructType::CameraInfo.raw(),
        p_next: ptr::from_ref(&params).cast(),
        camera_type: 0,
        view: [[0.0; 4]; 4],
        projection: [[0.0; 4]; 4],
    };
    assert_eq!(unsafe { (table.setup_camera)(&mut camera) }, ErrorCode::Success);
    // Column 3 of the view holds the inverted eye translation.
    assert!(approx_eq(camera.view[3][0], -2.0));
    assert!(approx_eq(camera.view[3][3], 1.0));
    assert!(camera.projection[2][3] > 0.0);

    // Instance carrying a picking value.
    let picking = RlInstanceInfoObjectPickingExt {
        s_type: StructType::InstanceInfoObjectPickingExt.raw(),
        p_next: ptr::null(),
        object_picking_value: 42,
    };
    let instance = RlInstanceInfo {
        s_type: StructType::InstanceInfo.raw(),
        p_next: ptr::from_ref(&picking).cast(),
        category_flags: 0,
        mesh,
        transform: Transform::from_translation(0.0, 0.0, 4.0),
        double_sided: 0,
    };
    assert_eq!(unsafe { (table.draw_instance)(&instance) }, ErrorCode::Success);

    let unknown_mesh = RlInstanceInfo { mesh: 0xDEAD, ..instance };
    assert_eq!(unsafe { (table.draw_instance)(&unknown_mesh) }, ErrorCode::InvalidHashOrHandle);

    let wrong_type = RlInstanceInfo {
        s_type: StructType::MeshInfo.raw(),
        ..instance
    };
    assert_eq!(unsafe { (table.draw_instance)(&wrong_type) }, ErrorCode::InvalidArguments);

    // Picking resolves when the frame is presented.
    let picked = Mutex::new(Vec::<u32>::new());
    let region = RlRect2D {
        left: 0,
        top: 0,
        right: 8,
        bottom: 8,
    };
    let user_data = ptr::from_ref(&picked).cast_mut().cast::<c_void>();
    assert_eq!(
        unsafe { (table.request_object_picking)(&region, None, user_data) },
        ErrorCode::InvalidArguments
    );
    assert_eq!(
        unsafe { (table.request_object_picking)(&region, Some(collect_picked), user_data) },
        ErrorCode::Success
    );

    let highlight = [42u32];
    assert_eq!(
        unsafe { (table.highlight_objects)(highlight.as_ptr(), 1, 255, 128, 0) },
        ErrorCode::Success
    );
    assert_eq!(
        unsafe { (table.highlight_objects)(ptr::null(), 0, 0, 0, 0) },
        ErrorCode::InvalidArguments
    );

    let clear = [0.1f32, 0.2, 0.3, 1.0];
    assert_eq!(unsafe { (table.set_default_output)(0, &clear) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.set_default_output)(99, &clear) }, ErrorCode::Success);
    assert_eq!(
        unsafe { (table.set_default_output)(0, ptr::null()) },
        ErrorCode::InvalidArguments
    );

    assert_eq!(unsafe { (table.present)(ptr::null()) }, ErrorCode::Success);
    runtime().sync().unwrap();
    assert_eq!(*picked.lock(), vec![42]);

    // Teardown
    assert_eq!(unsafe { (table.destroy_light)(light) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.destroy_mesh)(mesh) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.destroy_mesh)(mesh) }, ErrorCode::Success);
    assert_eq!(unsafe { (table.shutdown)() }, ErrorCode::Success);
    assert_eq!(unsafe { (table.shutdown)() }, ErrorCode::Success);
    assert_eq!(unsafe { (table.present)(ptr::null()) }, ErrorCode::DeviceNotRegistered);
}
