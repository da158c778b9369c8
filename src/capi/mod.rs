//! C ABI.
//!
//! The only exported symbol is [`raylink_InitializeLibrary`], which fills
//! an [`Interface`] table after a version check. Every entry point reads
//! caller memory through [`read`], forwards to a process-wide
//! [`Runtime`] and turns the result into an [`ErrorCode`]. Panics never
//! cross the boundary; they surface as `GeneralFailure`.

pub mod read;
pub mod types;

use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use raylink_core::errors::{ApiError, ErrorCode, Result};
use raylink_core::version::{COMPILED_VERSION, is_version_compatible};
use raylink_core::{LightHandle, MaterialHandle, MeshHandle};

use crate::api::Runtime;
use crate::convert::mat4_to_matrix4;
use crate::external::{CameraInfoParameterizedExt, OutputType};
use types::{
    RlCameraInfo, RlCreateImageInfo, RlInitializeLibraryInfo, RlInstanceInfo, RlLightInfo, RlMaterialInfo,
    RlMeshInfo, RlPath, RlPickCallback, RlPresentInfo, RlRect2D, RlStartupInfo, RlUiInstanceInfo,
};

static RUNTIME: LazyLock<Runtime> = LazyLock::new(Runtime::default);

/// The runtime behind the C entry points.
#[must_use]
pub fn runtime() -> &'static Runtime {
    &RUNTIME
}

// ============================================================================
// Interface table
// ============================================================================

pub type PfnShutdown = unsafe extern "C" fn() -> ErrorCode;
pub type PfnCreateMaterial = unsafe extern "C" fn(*const RlMaterialInfo, *mut u64) -> ErrorCode;
pub type PfnDestroyMaterial = unsafe extern "C" fn(u64) -> ErrorCode;
pub type PfnCreateMesh = unsafe extern "C" fn(*const RlMeshInfo, *mut u64) -> ErrorCode;
pub type PfnDestroyMesh = unsafe extern "C" fn(u64) -> ErrorCode;
pub type PfnSetupCamera = unsafe extern "C" fn(*mut RlCameraInfo) -> ErrorCode;
pub type PfnDrawInstance = unsafe extern "C" fn(*const RlInstanceInfo) -> ErrorCode;
pub type PfnCreateLight = unsafe extern "C" fn(*const RlLightInfo, *mut u64) -> ErrorCode;
pub type PfnDestroyLight = unsafe extern "C" fn(u64) -> ErrorCode;
pub type PfnDrawLightInstance = unsafe extern "C" fn(u64) -> ErrorCode;
pub type PfnSetConfigVariable = unsafe extern "C" fn(RlPath, RlPath) -> ErrorCode;
pub type PfnStartup = unsafe extern "C" fn(*const RlStartupInfo) -> ErrorCode;
pub type PfnPresent = unsafe extern "C" fn(*const RlPresentInfo) -> ErrorCode;
pub type PfnCreateImage = unsafe extern "C" fn(*const RlCreateImageInfo) -> ErrorCode;
pub type PfnDestroyImage = unsafe extern "C" fn(RlPath) -> ErrorCode;
pub type PfnDrawUiInstance = unsafe extern "C" fn(*const RlUiInstanceInfo) -> ErrorCode;
pub type PfnSetDefaultOutput = unsafe extern "C" fn(u32, *const [f32; 4]) -> ErrorCode;
pub type PfnRequestObjectPicking =
    unsafe extern "C" fn(*const RlRect2D, Option<RlPickCallback>, *mut c_void) -> ErrorCode;
pub type PfnHighlightObjects = unsafe extern "C" fn(*const u32, u32, u8, u8, u8) -> ErrorCode;

/// Function table handed out by [`raylink_InitializeLibrary`].
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Interface {
    pub shutdown: PfnShutdown,
    pub create_material: PfnCreateMaterial,
    pub destroy_material: PfnDestroyMaterial,
    pub create_mesh: PfnCreateMesh,
    pub destroy_mesh: PfnDestroyMesh,
    pub setup_camera: PfnSetupCamera,
    pub draw_instance: PfnDrawInstance,
    pub create_light: PfnCreateLight,
    pub destroy_light: PfnDestroyLight,
    pub draw_light_instance: PfnDrawLightInstance,
    pub set_config_variable: PfnSetConfigVariable,
    pub startup: PfnStartup,
    pub present: PfnPresent,
    pub create_image: PfnCreateImage,
    pub destroy_image: PfnDestroyImage,
    pub draw_ui_instance: PfnDrawUiInstance,
    pub set_default_output: PfnSetDefaultOutput,
    pub request_object_picking: PfnRequestObjectPicking,
    pub highlight_objects: PfnHighlightObjects,
}

impl Interface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shutdown,
            create_material,
            destroy_material,
            create_mesh,
            destroy_mesh,
            setup_camera,
            draw_instance,
            create_light,
            destroy_light,
            draw_light_instance,
            set_config_variable,
            startup,
            present,
            create_image,
            destroy_image,
            draw_ui_instance,
            set_default_output,
            request_object_picking,
            highlight_objects,
        }
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface").finish_non_exhaustive()
    }
}

/// Checks the caller's version and fills `out` with the entry points.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn raylink_InitializeLibrary(
    info: *const RlInitializeLibraryInfo,
    out: *mut Interface,
) -> ErrorCode {
    guard("InitializeLibrary", || {
        let info = unsafe { read::base(info)? };
        let Some(out) = (unsafe { out.as_mut() }) else {
            return Err(ApiError::invalid("interface output is null"));
        };
        if !is_version_compatible(info.version, COMPILED_VERSION) {
            return Err(ApiError::IncompatibleVersion {
                requested: info.version,
                implemented: COMPILED_VERSION,
            });
        }
        *out = Interface::new();
        Ok(())
    })
}

// ============================================================================
// Boundary helpers
// ============================================================================

fn guard(entry: &'static str, f: impl FnOnce() -> Result<()>) -> ErrorCode {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => ErrorCode::Success,
        Ok(Err(err)) => {
            log::warn!("{entry}: {err}");
            err.code()
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            log::error!("{entry}: panicked {message}");
            ErrorCode::GeneralFailure
        }
    }
}

unsafe fn write_handle(out: *mut u64, handle: u64) -> Result<()> {
    let Some(out) = (unsafe { out.as_mut() }) else {
        return Err(ApiError::invalid("handle output is null"));
    };
    *out = handle;
    Ok(())
}

fn require_output(out: *mut u64) -> Result<()> {
    if out.is_null() {
        return Err(ApiError::invalid("handle output is null"));
    }
    Ok(())
}

/// Caller data handed back to a picking callback on the render thread.
struct CallbackUserData(*mut c_void);

// SAFETY: the pointer is never dereferenced here, only passed back to the
// caller's own callback, which owns its thread-safety.
unsafe impl Send for CallbackUserData {}

// ============================================================================
// Lifecycle
// ============================================================================

unsafe extern "C" fn startup(info: *const RlStartupInfo) -> ErrorCode {
    guard("Startup", || {
        let info = unsafe { read::base(info)? };
        RUNTIME.startup(&read::startup_info(info))
    })
}

unsafe extern "C" fn shutdown() -> ErrorCode {
    guard("Shutdown", || RUNTIME.shutdown())
}

/// `info` is optional; its window override has no meaning headless.
unsafe extern "C" fn present(info: *const RlPresentInfo) -> ErrorCode {
    guard("Present", || {
        if !info.is_null() {
            unsafe { read::base(info)? };
        }
        RUNTIME.present()
    })
}

// ============================================================================
// Resources
// ============================================================================

unsafe extern "C" fn create_image(info: *const RlCreateImageInfo) -> ErrorCode {
    guard("CreateImage", || {
        RUNTIME.ensure_attached()?;
        let info = unsafe { read::create_image_info(read::base(info)?)? };
        RUNTIME.create_image(&info)
    })
}

unsafe extern "C" fn destroy_image(name: RlPath) -> ErrorCode {
    guard("DestroyImage", || {
        RUNTIME.ensure_attached()?;
        let name = unsafe { read::text(name)? };
        RUNTIME.destroy_image(name)
    })
}

unsafe extern "C" fn create_material(info: *const RlMaterialInfo, out: *mut u64) -> ErrorCode {
    guard("CreateMaterial", || {
        RUNTIME.ensure_attached()?;
        require_output(out)?;
        let info = unsafe { read::material_info(read::base(info)?)? };
        let handle = RUNTIME.create_material(&info)?;
        unsafe { write_handle(out, handle.raw()) }
    })
}

unsafe extern "C" fn destroy_material(handle: u64) -> ErrorCode {
    guard("DestroyMaterial", || RUNTIME.destroy_material(MaterialHandle(handle)))
}

unsafe extern "C" fn create_mesh(info: *const RlMeshInfo, out: *mut u64) -> ErrorCode {
    guard("CreateMesh", || {
        RUNTIME.ensure_attached()?;
        require_output(out)?;
        let info = unsafe { read::base(info)? };
        let surfaces = unsafe { read::mesh_surfaces(info)? };
        let handle = RUNTIME.create_mesh(&read::mesh_info(info.hash, &surfaces))?;
        unsafe { write_handle(out, handle.raw()) }
    })
}

unsafe extern "C" fn destroy_mesh(handle: u64) -> ErrorCode {
    guard("DestroyMesh", || RUNTIME.destroy_mesh(MeshHandle(handle)))
}

unsafe extern "C" fn create_light(info: *const RlLightInfo, out: *mut u64) -> ErrorCode {
    guard("CreateLight", || {
        RUNTIME.ensure_attached()?;
        require_output(out)?;
        let info = unsafe { read::light_info(read::base(info)?)? };
        let handle = RUNTIME.create_light(&info)?;
        unsafe { write_handle(out, handle.raw()) }
    })
}

unsafe extern "C" fn destroy_light(handle: u64) -> ErrorCode {
    guard("DestroyLight", || RUNTIME.destroy_light(LightHandle(handle)))
}

// ============================================================================
// Scene submission
// ============================================================================

/// With a parameterized extension, the computed matrices are written back
/// into `info`.
unsafe extern "C" fn setup_camera(info: *mut RlCameraInfo) -> ErrorCode {
    guard("SetupCamera", || {
        RUNTIME.ensure_attached()?;
        let raw = unsafe { read::base(info.cast_const())? };
        let camera_info = unsafe { read::camera_info(raw)? };
        let parameterized = camera_info.extensions.find::<CameraInfoParameterizedExt>().is_some();
        let camera = RUNTIME.setup_camera(&camera_info)?;
        if parameterized {
            // SAFETY: `base` checked the pointer is non-null.
            let raw = unsafe { &mut *info };
            raw.view = mat4_to_matrix4(&camera.world_to_view);
            raw.projection = mat4_to_matrix4(&camera.view_to_projection);
        }
        Ok(())
    })
}

unsafe extern "C" fn draw_instance(info: *const RlInstanceInfo) -> ErrorCode {
    guard("DrawInstance", || {
        RUNTIME.ensure_attached()?;
        let info = unsafe { read::instance_info(read::base(info)?)? };
        RUNTIME.draw_instance(&info)
    })
}

unsafe extern "C" fn draw_ui_instance(info: *const RlUiInstanceInfo) -> ErrorCode {
    guard("DrawUIInstance", || {
        RUNTIME.ensure_attached()?;
        let info = unsafe { read::ui_instance_info(read::base(info)?)? };
        RUNTIME.draw_ui_instance(&info)
    })
}

unsafe extern "C" fn draw_light_instance(handle: u64) -> ErrorCode {
    guard("DrawLightInstance", || RUNTIME.draw_light_instance(LightHandle(handle)))
}

// ============================================================================
// Configuration
// ============================================================================

unsafe extern "C" fn set_config_variable(key: RlPath, value: RlPath) -> ErrorCode {
    guard("SetConfigVariable", || {
        if key.is_null() || value.is_null() {
            return Err(ApiError::invalid("config key or value is null"));
        }
        let (key, value) = unsafe { (read::text(key)?, read::text(value)?) };
        RUNTIME.set_config_variable(key, value)
    })
}

/// Unknown output types are accepted and ignored.
unsafe extern "C" fn set_default_output(output: u32, color: *const [f32; 4]) -> ErrorCode {
    guard("SetDefaultOutput", || {
        let Some(color) = (unsafe { color.as_ref() }) else {
            return Err(ApiError::invalid("default output color is null"));
        };
        RUNTIME.ensure_attached()?;
        match OutputType::from_raw(output) {
            Some(output) => RUNTIME.set_default_output(output, *color),
            None => {
                log::warn!("unknown output type {output}, default output unchanged");
                Ok(())
            }
        }
    })
}

// ============================================================================
// Picking
// ============================================================================

unsafe extern "C" fn request_object_picking(
    region: *const RlRect2D,
    callback: Option<RlPickCallback>,
    user_data: *mut c_void,
) -> ErrorCode {
    guard("RequestObjectPicking", || {
        let (Some(region), Some(callback)) = (unsafe { region.as_ref() }, callback) else {
            return Err(ApiError::invalid("picking region or callback is null"));
        };
        let user_data = CallbackUserData(user_data);
        RUNTIME.request_object_picking(region, move |values: &[u32]| {
            // move the whole wrapper, not just its field
            let user_data = user_data;
            // SAFETY: the caller registered `callback` for exactly this
            // invocation; `values` outlives the call.
            unsafe { callback(values.as_ptr(), values.len() as u32, user_data.0) };
        })
    })
}

unsafe extern "C" fn highlight_objects(values: *const u32, count: u32, r: u8, g: u8, b: u8) -> ErrorCode {
    guard("HighlightObjects", || {
        if values.is_null() {
            return Err(ApiError::invalid("highlight values are null"));
        }
        let values = unsafe { read::array(values, count as usize, "highlight values")? };
        RUNTIME.highlight_objects(values, [r, g, b])
    })
}
