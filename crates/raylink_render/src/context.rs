//! The render thread's view of the world.
//!
//! A [`RenderContext`] is handed mutably to every submission unit. It owns
//! the scene state, the collaborators used for texture resolution, and the
//! command list that is flushed to the device after each unit.

use std::path::Path;
use std::sync::Arc;

use raylink_core::errors::{ApiError, Result};
use raylink_core::{LightHandle, MaterialHandle, MeshHandle};
use smallvec::SmallVec;

use crate::camera::ExternalCamera;
use crate::commands::CommandList;
use crate::device::{Device, ImageView};
use crate::draw::ExternalDrawState;
use crate::geometry::RasterGeometry;
use crate::light::{LightData, PendingLight};
use crate::material::{PendingMaterial, ResolvedMaterial, TexturePath};
use crate::picking::{PickingCallback, PixelRect};
use crate::scene::{MeshRecord, SceneState, UiDraw};
use crate::textures::{AssetLocator, ColorSpace, TextureLoader, TextureRef};

pub struct RenderContext {
    device: Arc<dyn Device>,
    asset_locator: Box<dyn AssetLocator>,
    texture_loader: Box<dyn TextureLoader>,
    pub scene: SceneState,
    pub commands: CommandList,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("device", &self.device.name())
            .field("frame_id", &self.scene.frame_id)
            .field("recorded_commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    #[must_use]
    pub fn new(
        device: Arc<dyn Device>,
        asset_locator: Box<dyn AssetLocator>,
        texture_loader: Box<dyn TextureLoader>,
    ) -> Self {
        Self {
            device,
            asset_locator,
            texture_loader,
            scene: SceneState::new(),
            commands: CommandList::new(),
        }
    }

    #[must_use]
    pub fn device(&self) -> &Arc<dyn Device> {
        &self.device
    }

    /// Submits everything recorded so far.
    pub fn flush(&mut self) -> Result<()> {
        if self.commands.is_empty() {
            return Ok(());
        }
        let commands = self.commands.take();
        self.device.submit(commands)
    }

    // ========================================================================
    // Texture resolution
    // ========================================================================

    /// Resolves a material texture slot: uploaded images first, then the
    /// asset pipeline. Unknown paths resolve to no texture.
    pub fn resolve_texture(&mut self, path: &TexturePath) -> Option<TextureRef> {
        let path = path.as_deref()?;
        if path.as_os_str().is_empty() {
            return None;
        }
        if let Some(view) = self.uploaded_image(path) {
            return Some(TextureRef::Uploaded(view));
        }
        let resolved = self.load_asset(path, ColorSpace::Auto, false);
        if resolved.is_none() {
            log::debug!("texture '{}' not found, slot left empty", path.display());
        }
        resolved
    }

    fn uploaded_image(&self, path: &Path) -> Option<Arc<ImageView>> {
        let name = path.to_str()?;
        self.scene.uploaded_images.get(name).cloned()
    }

    fn load_asset(&mut self, path: &Path, color_space: ColorSpace, keep_resident: bool) -> Option<TextureRef> {
        let asset = self.asset_locator.find_asset(path)?;
        self.texture_loader
            .preload(&asset, color_space, keep_resident)
            .map(TextureRef::Asset)
    }

    #[must_use]
    pub fn resolve_material(&mut self, material: PendingMaterial) -> ResolvedMaterial {
        material.map_textures(|slot| self.resolve_texture(&slot))
    }

    // ========================================================================
    // Scene mutation
    // ========================================================================

    pub fn register_material(&mut self, handle: MaterialHandle, material: PendingMaterial) {
        let resolved = self.resolve_material(material);
        self.scene.materials.insert(handle, resolved);
    }

    pub fn remove_material(&mut self, handle: MaterialHandle) {
        self.scene.materials.remove(handle);
    }

    pub fn register_mesh(&mut self, handle: MeshHandle, surfaces: SmallVec<[RasterGeometry; 2]>) {
        self.scene.meshes.insert(handle, MeshRecord { surfaces });
    }

    pub fn remove_mesh(&mut self, handle: MeshHandle) {
        self.scene.meshes.remove(handle);
    }

    /// Registers a light. Dome textures are loaded through the asset
    /// pipeline only and kept resident for as long as the light lives.
    pub fn register_light(&mut self, handle: LightHandle, light: PendingLight) {
        let mut resident = None;
        let resolved = light.map_texture(|path| {
            let path = path?;
            let texture = self.load_asset(&path, ColorSpace::Auto, true);
            if texture.is_none() {
                log::warn!("dome light texture '{}' could not be located", path.display());
            }
            resident.clone_from(&texture);
            texture
        });
        self.scene.light_manager.add_external_light(handle, resolved);
        match resident {
            Some(texture) => {
                self.scene.light_manager.resident.insert(handle, texture);
            }
            None => {
                self.scene.light_manager.resident.remove(&handle);
            }
        }
    }

    pub fn remove_light(&mut self, handle: LightHandle) {
        self.scene.light_manager.remove_external_light(handle);
    }

    pub fn draw_light(&mut self, handle: LightHandle) -> Result<()> {
        if self.scene.light_manager.draw_external_light(handle) {
            Ok(())
        } else {
            Err(ApiError::UnknownHandle {
                kind: "light",
                handle: handle.raw(),
            })
        }
    }

    pub fn insert_uploaded_image(&mut self, name: String, view: Arc<ImageView>) {
        self.scene.uploaded_images.insert(name, view);
    }

    pub fn remove_uploaded_image(&mut self, name: &str) {
        self.scene.uploaded_images.remove(name);
    }

    pub fn process_camera(&mut self, camera: ExternalCamera) {
        self.scene.cameras.process_external_camera(camera, self.scene.frame_id);
    }

    /// Commits an instance for this frame, completing the prototype with
    /// data owned by the registered mesh.
    pub fn commit_instance(&mut self, mut draw: ExternalDrawState) -> Result<()> {
        let mesh = self.scene.meshes.get(draw.mesh).ok_or(ApiError::UnknownHandle {
            kind: "mesh",
            handle: draw.mesh.raw(),
        })?;
        draw.prototype.skinning.num_bones_per_vertex = mesh.num_bones_per_vertex();
        self.scene.draws.instances.push(draw);
        Ok(())
    }

    /// Makes the ray-traced image available for compositing. Only the
    /// first call in a frame has any effect.
    pub fn inject_rt_output(&mut self) -> bool {
        if self.scene.draws.rt_injected {
            return false;
        }
        self.scene.draws.rt_injected = true;
        true
    }

    pub fn draw_ui(&mut self, draw: UiDraw) {
        self.scene.draws.ui.push(draw);
    }

    pub fn request_picking(&mut self, region: PixelRect, callback: PickingCallback) {
        self.scene.picking.request(region, callback);
    }

    pub fn highlight(&mut self, values: Vec<u32>, color: [u8; 3]) {
        let frame_id = self.scene.frame_id;
        self.scene.highlighting.request(values, color, frame_id);
    }

    /// Closes the current frame.
    pub fn end_frame(&mut self) -> Result<()> {
        self.flush()?;
        let drawn = self.scene.drawn_picking_values();
        let device = Arc::clone(&self.device);
        self.scene
            .picking
            .resolve_all(|region| device.resolve_object_picking(region, &drawn));
        self.scene.highlighting.expire_before(self.scene.frame_id);
        self.scene.draws.clear();
        self.scene.light_manager.active.clear();
        self.scene.frame_id += 1;
        log::trace!("frame {} presented", self.scene.frame_id - 1);
        Ok(())
    }
}
