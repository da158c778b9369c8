use std::sync::Arc;

use raylink_render::device::{Device, HeadlessDevice};
use raylink_render::textures::{AssetLocator, DirectoryAssetLocator, TextureCache, TextureLoader};
use raylink_render::RenderContext;

use super::RuntimeSettings;

/// The collaborators a runtime renders with.
///
/// The default backend is headless: host-memory buffers and images, disk
/// asset lookup and a texture cache that reads image headers only.
pub struct RenderBackend {
    pub device: Arc<dyn Device>,
    pub asset_locator: Box<dyn AssetLocator>,
    pub texture_loader: Box<dyn TextureLoader>,
}

impl std::fmt::Debug for RenderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderBackend")
            .field("device", &self.device.name())
            .finish_non_exhaustive()
    }
}

impl RenderBackend {
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
        }
    }

    #[must_use]
    pub fn headless(settings: &RuntimeSettings) -> Self {
        Self::new(
            Arc::new(HeadlessDevice::default()),
            Box::new(DirectoryAssetLocator::new(settings.asset_roots.clone())),
            Box::new(TextureCache::new()),
        )
    }

    pub(crate) fn into_context(self) -> (Arc<dyn Device>, RenderContext) {
        let device = Arc::clone(&self.device);
        let context = RenderContext::new(self.device, self.asset_locator, self.texture_loader);
        (device, context)
    }
}
