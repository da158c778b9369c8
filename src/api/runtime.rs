use std::sync::Arc;

use glam::Vec4;
use parking_lot::Mutex;
use raylink_core::errors::{ApiError, Result};
use raylink_core::options::keys;
use raylink_core::{HandleRegistry, LightHandle, MaterialHandle, MeshHandle, OptionRegistry, OptionValue};
use raylink_render::camera::ExternalCamera;
use raylink_render::device::{
    BufferDesc, BufferSlice, BufferUsage, Device, ImageDesc, ImageUsage, ImageView, MemoryLocation,
};
use raylink_render::material::MaterialKind;
use raylink_render::picking::PixelRect;
use raylink_render::{QueueStatsSnapshot, RenderContext, RenderThread, Submitter, TextureFormat};

use super::{RenderBackend, RuntimeSettings, init_logging};
use crate::convert::{to_external_camera, to_output_type, to_texture_format};
use crate::external::{
    CameraInfo, CreateImageInfo, InstanceInfo, LightInfo, MaterialInfo, MeshInfo, OutputType, Rect2D, StartupInfo,
    UiInstanceInfo,
};
use crate::translate::{
    stage_mesh, translate_instance, translate_light, translate_material, translate_ui_instance,
};

/// What the caller side remembers about each live resource.
#[derive(Default)]
struct Registries {
    images: HandleRegistry<String, Arc<ImageView>>,
    materials: HandleRegistry<MaterialHandle, MaterialKind>,
    /// Surface count per mesh.
    meshes: HandleRegistry<MeshHandle, usize>,
    /// Whether the light is a dome light.
    lights: HandleRegistry<LightHandle, bool>,
}

impl Registries {
    fn clear(&mut self) {
        self.images.clear();
        self.materials.clear();
        self.meshes.clear();
        self.lights.clear();
    }
}

struct Attached {
    device: Arc<dyn Device>,
    render_thread: RenderThread,
}

impl Attached {
    fn submitter(&self) -> &Submitter {
        self.render_thread.submitter()
    }
}

#[derive(Default)]
struct RuntimeState {
    attached: Option<Attached>,
    registries: Registries,
    /// Last camera set up, used by UI draws that borrow the main view.
    main_camera: Option<ExternalCamera>,
}

impl RuntimeState {
    fn attached(&self) -> Result<&Attached> {
        self.attached.as_ref().ok_or(ApiError::DeviceNotRegistered)
    }

    fn split(&mut self) -> Result<(&Attached, &mut Registries)> {
        let attached = self.attached.as_ref().ok_or(ApiError::DeviceNotRegistered)?;
        Ok((attached, &mut self.registries))
    }
}

/// The API runtime.
///
/// One coarse lock guards the caller-side registries and every enqueue, so
/// units reach the render thread in the order their calls returned. The
/// lock is never held while waiting on the render thread.
pub struct Runtime {
    settings: RuntimeSettings,
    options: Arc<OptionRegistry>,
    state: Mutex<RuntimeState>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeSettings::default())
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("settings", &self.settings)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    #[must_use]
    pub fn new(settings: RuntimeSettings) -> Self {
        Self::with_options(settings, Arc::new(OptionRegistry::with_defaults()))
    }

    #[must_use]
    pub fn with_options(settings: RuntimeSettings, options: Arc<OptionRegistry>) -> Self {
        Self {
            settings,
            options,
            state: Mutex::new(RuntimeState::default()),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    #[must_use]
    pub fn options(&self) -> &Arc<OptionRegistry> {
        &self.options
    }

    /// Whether a device is attached and its render thread is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .attached
            .as_ref()
            .is_some_and(|attached| attached.render_thread.is_running())
    }

    /// Fails with the error any scene call would report while no usable
    /// device is attached.
    pub fn ensure_attached(&self) -> Result<()> {
        self.state.lock().attached().map(|_| ())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Starts the runtime on the default headless backend.
    pub fn startup(&self, info: &StartupInfo) -> Result<()> {
        self.startup_with(info, RenderBackend::headless(&self.settings))
    }

    /// Starts the runtime on `backend`.
    pub fn startup_with(&self, info: &StartupInfo, backend: RenderBackend) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(attached) = &state.attached {
            return Err(ApiError::AlreadyExists {
                kind: "device",
                key: attached.device.name().to_string(),
            });
        }
        init_logging();

        self.apply_startup_info(info)?;
        self.load_config_file();

        let (device, context) = backend.into_context();
        let render_thread = RenderThread::spawn(&self.settings.render_thread_name, context)?;
        log::info!(
            "raylink {} started on device '{}'",
            env!("CARGO_PKG_VERSION"),
            device.name()
        );
        state.attached = Some(Attached { device, render_thread });
        Ok(())
    }

    fn apply_startup_info(&self, info: &StartupInfo) -> Result<()> {
        if info.editor_mode_enabled {
            self.options.set(keys::FALLBACK_LIGHT_MODE, OptionValue::Int(0))?;
            self.options
                .set(keys::DESATURATE_OTHERS_ON_HIGHLIGHT, OptionValue::Bool(false))?;
        }
        if info.disable_srgb_conversion_for_output {
            self.options
                .set(keys::ALLOW_SRGB_CONVERSION_FOR_OUTPUT, OptionValue::Bool(false))?;
        }
        Ok(())
    }

    fn load_config_file(&self) {
        let Some(path) = self.settings.resolved_config_file() else {
            return;
        };
        if let Err(err) = self.options.load_config_file(&path) {
            log::warn!("config file {} skipped: {err}", path.display());
        }
    }

    /// Drains and joins the render thread, then forgets every resource.
    /// Calling it without a running device does nothing.
    pub fn shutdown(&self) -> Result<()> {
        let attached = {
            let mut state = self.state.lock();
            state.registries.clear();
            state.main_camera = None;
            state.attached.take()
        };
        if let Some(mut attached) = attached {
            attached.render_thread.shutdown();
            log::info!("raylink shut down");
        }
        Ok(())
    }

    /// Ends the frame.
    pub fn present(&self) -> Result<()> {
        let state = self.state.lock();
        state.attached()?.submitter().emit("present", RenderContext::end_frame)
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Uploads a named image. Materials and UI draws refer to it by name.
    pub fn create_image(&self, info: &CreateImageInfo<'_>) -> Result<()> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;

        if info.data.is_empty() {
            return Err(ApiError::InvalidInputData(format!(
                "image '{}' has no texel data",
                info.image_name
            )));
        }
        let format = to_texture_format(info.format);
        if format == TextureFormat::UNDEFINED {
            return Err(ApiError::invalid(format!("image '{}' has an undefined format", info.image_name)));
        }
        let name = info.image_name.to_string();
        registries.images.check_vacant(&name)?;

        let device = &attached.device;
        let size = info.data.len() as u64;
        let staging = device.create_buffer(&BufferDesc {
            label: "image staging",
            size,
            usage: BufferUsage::TRANSFER_SRC,
            location: MemoryLocation::HostVisible,
        })?;
        staging.write(0, info.data)?;

        let image = device.create_image(&ImageDesc {
            label: "api image",
            width: info.width,
            height: info.height,
            format,
            usage: ImageUsage::TRANSFER_DST | ImageUsage::SAMPLED,
        })?;
        let view = device.create_image_view(&image)?;

        // Every device object exists before anything is queued.
        let (width, height) = (info.width, info.height);
        let render_name = name.clone();
        let render_view = Arc::clone(&view);
        attached.submitter().emit("upload image", move |ctx| {
            ctx.commands
                .copy_buffer_to_image(BufferSlice::sub(staging, 0, size), image, width, height);
            ctx.insert_uploaded_image(render_name, render_view);
            Ok(())
        })?;

        registries.images.create(name, view)
    }

    pub fn destroy_image(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        if registries.images.destroy(&name.to_string()).is_none() {
            return Ok(());
        }
        let name = name.to_string();
        attached.submitter().emit("destroy image", move |ctx| {
            ctx.remove_uploaded_image(&name);
            Ok(())
        })
    }

    // ========================================================================
    // Materials
    // ========================================================================

    pub fn create_material(&self, info: &MaterialInfo<'_>) -> Result<MaterialHandle> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        let handle = MaterialHandle(info.hash);
        registries.materials.check_vacant(&handle)?;

        let material = translate_material(info)?;
        let kind = material.kind();
        attached.submitter().emit("create material", move |ctx| {
            ctx.register_material(handle, material);
            Ok(())
        })?;
        registries.materials.create(handle, kind)?;
        Ok(handle)
    }

    pub fn destroy_material(&self, handle: MaterialHandle) -> Result<()> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        if registries.materials.destroy(&handle).is_none() {
            return Ok(());
        }
        attached.submitter().emit("destroy material", move |ctx| {
            ctx.remove_material(handle);
            Ok(())
        })
    }

    // ========================================================================
    // Meshes
    // ========================================================================

    /// Copies the mesh into staging memory and schedules its upload.
    pub fn create_mesh(&self, info: &MeshInfo<'_>) -> Result<MeshHandle> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        let handle = MeshHandle(info.hash);
        registries.meshes.check_vacant(&handle)?;

        let staged = stage_mesh(attached.device.as_ref(), info)?;
        let surfaces = staged.surface_count();
        attached.submitter().emit("create mesh", move |ctx| {
            let geometry = staged.upload(ctx)?;
            ctx.register_mesh(handle, geometry);
            Ok(())
        })?;
        registries.meshes.create(handle, surfaces)?;
        Ok(handle)
    }

    pub fn destroy_mesh(&self, handle: MeshHandle) -> Result<()> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        if registries.meshes.destroy(&handle).is_none() {
            return Ok(());
        }
        attached.submitter().emit("destroy mesh", move |ctx| {
            ctx.remove_mesh(handle);
            Ok(())
        })
    }

    // ========================================================================
    // Lights
    // ========================================================================

    pub fn create_light(&self, info: &LightInfo<'_>) -> Result<LightHandle> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        let handle = LightHandle(info.hash);
        registries.lights.check_vacant(&handle)?;

        let light = translate_light(info)?;
        let is_dome = light.is_dome();
        attached.submitter().emit("create light", move |ctx| {
            ctx.register_light(handle, light);
            Ok(())
        })?;
        registries.lights.create(handle, is_dome)?;
        Ok(handle)
    }

    pub fn destroy_light(&self, handle: LightHandle) -> Result<()> {
        let mut state = self.state.lock();
        let (attached, registries) = state.split()?;
        if registries.lights.destroy(&handle).is_none() {
            return Ok(());
        }
        attached.submitter().emit("destroy light", move |ctx| {
            ctx.remove_light(handle);
            Ok(())
        })
    }

    // ========================================================================
    // Scene submission
    // ========================================================================

    /// Sets up a camera for this frame and returns the matrices it resolved
    /// to.
    pub fn setup_camera(&self, info: &CameraInfo<'_>) -> Result<ExternalCamera> {
        let mut state = self.state.lock();
        state.attached()?;

        if self.options.get_bool(keys::ENABLE_NEAR_PLANE_OVERRIDE) == Some(true) {
            log::warn!("{} must stay off for external cameras, resetting it", keys::ENABLE_NEAR_PLANE_OVERRIDE);
            self.options
                .set(keys::ENABLE_NEAR_PLANE_OVERRIDE, OptionValue::Bool(false))?;
        }

        let camera = to_external_camera(info);
        state.attached()?.submitter().emit("setup camera", move |ctx| {
            ctx.process_camera(camera);
            Ok(())
        })?;
        state.main_camera = Some(camera);
        Ok(camera)
    }

    pub fn draw_instance(&self, info: &InstanceInfo<'_>) -> Result<()> {
        let state = self.state.lock();
        let attached = state.attached()?;
        state.registries.meshes.require(&info.mesh)?;

        let draw = translate_instance(info)?;
        attached
            .submitter()
            .emit("draw instance", move |ctx| ctx.commit_instance(draw))
    }

    /// Draws rasterized UI. Non-sky UI first composites the ray-traced image
    /// so the UI lands on top of it.
    pub fn draw_ui_instance(&self, info: &UiInstanceInfo<'_>) -> Result<()> {
        let state = self.state.lock();
        let attached = state.attached()?;

        let images = &state.registries.images;
        let draw = translate_ui_instance(info, state.main_camera.as_ref(), |name| {
            images.get(&name.to_string()).cloned()
        })?;

        if !draw.sky {
            attached.submitter().emit("inject rt", |ctx| {
                ctx.inject_rt_output();
                Ok(())
            })?;
        }
        attached.submitter().emit("draw ui", move |ctx| {
            ctx.draw_ui(draw);
            Ok(())
        })
    }

    pub fn draw_light_instance(&self, handle: LightHandle) -> Result<()> {
        let state = self.state.lock();
        let attached = state.attached()?;
        state.registries.lights.require(&handle)?;
        attached
            .submitter()
            .emit("draw light", move |ctx| ctx.draw_light(handle))
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Sets a registered option from its text form. Works with or without a
    /// device.
    pub fn set_config_variable(&self, key: &str, value: &str) -> Result<()> {
        let _state = self.state.lock();
        if key.is_empty() {
            return Err(ApiError::invalid("config key is empty"));
        }
        self.options.set_from_str(key, value)
    }

    pub fn set_default_output(&self, output: OutputType, color: [f32; 4]) -> Result<()> {
        let state = self.state.lock();
        let output = to_output_type(output);
        let color = Vec4::from_array(color);
        state.attached()?.submitter().emit("set default output", move |ctx| {
            ctx.scene.globals.set_default_output(output, color);
            Ok(())
        })
    }

    // ========================================================================
    // Picking
    // ========================================================================

    /// Asks for the picking values visible in `region`. `callback` runs on
    /// the render thread exactly once, at the end of the next frame.
    pub fn request_object_picking(
        &self,
        region: &Rect2D,
        callback: impl FnOnce(&[u32]) + Send + 'static,
    ) -> Result<()> {
        let state = self.state.lock();
        let region = PixelRect::new(region.left, region.top, region.right, region.bottom);
        let callback = Box::new(callback);
        state.attached()?.submitter().emit("request picking", move |ctx| {
            ctx.request_picking(region, callback);
            Ok(())
        })
    }

    /// Highlights the objects carrying `values`. An empty list changes
    /// nothing.
    pub fn highlight_objects(&self, values: &[u32], color: [u8; 3]) -> Result<()> {
        let state = self.state.lock();
        let attached = state.attached()?;
        if values.is_empty() {
            return Ok(());
        }
        let values = values.to_vec();
        attached.submitter().emit("highlight", move |ctx| {
            ctx.highlight(values, color);
            Ok(())
        })
    }

    // ========================================================================
    // Render thread access
    // ========================================================================

    fn submitter(&self) -> Result<Submitter> {
        Ok(self.state.lock().attached()?.submitter().clone())
    }

    /// Blocks until everything enqueued so far has executed.
    pub fn sync(&self) -> Result<()> {
        self.submitter()?.sync()
    }

    /// Runs `f` against the render context after all earlier work.
    pub fn inspect<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&RenderContext) -> R + Send + 'static,
    {
        self.submitter()?.inspect(f)
    }

    pub fn stats(&self) -> Result<QueueStatsSnapshot> {
        Ok(self.submitter()?.stats())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(mut attached) = self.state.get_mut().attached.take() {
            attached.render_thread.shutdown();
        }
    }
}
