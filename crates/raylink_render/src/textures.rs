//! Texture collaborators.
//!
//! Materials and dome lights name their textures by path. On the render
//! thread a path is turned into a [`TextureRef`] by consulting, in order,
//! the images uploaded through `CreateImage` and then the asset pipeline:
//! an [`AssetLocator`] maps the path to an [`AssetData`], and a
//! [`TextureLoader`] makes that asset resident.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};
use xxhash_rust::xxh64::xxh64;

use crate::device::ImageView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// Let the loader decide from the asset's format.
    #[default]
    Auto,
    Linear,
    Srgb,
}

/// Opaque handle to an asset found by an [`AssetLocator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetData {
    pub path: PathBuf,
    pub id: u64,
}

impl AssetData {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let id = xxh64(path.to_string_lossy().as_bytes(), 0);
        Self { path, id }
    }
}

pub trait AssetLocator: Send {
    fn find_asset(&self, path: &Path) -> Option<AssetData>;
}

/// Finds assets on disk, trying each search root in order.
///
/// Absolute paths are checked as given.
#[derive(Debug, Default, Clone)]
pub struct DirectoryAssetLocator {
    roots: Vec<PathBuf>,
}

impl DirectoryAssetLocator {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl AssetLocator for DirectoryAssetLocator {
    fn find_asset(&self, path: &Path) -> Option<AssetData> {
        if path.is_absolute() {
            return path.is_file().then(|| AssetData::new(path));
        }
        self.roots
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
            .map(AssetData::new)
    }
}

/// Locator over a fixed set of known paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetLocator {
    known: FxHashSet<PathBuf>,
}

impl MemoryAssetLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_asset(mut self, path: impl Into<PathBuf>) -> Self {
        self.insert(path);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>) {
        self.known.insert(path.into());
    }
}

impl AssetLocator for MemoryAssetLocator {
    fn find_asset(&self, path: &Path) -> Option<AssetData> {
        self.known.contains(path).then(|| AssetData::new(path))
    }
}

// ============================================================================
// Resident textures
// ============================================================================

#[derive(Debug)]
pub struct ResidentTexture {
    pub asset: AssetData,
    pub color_space: ColorSpace,
    /// Width and height read from the file header, when the format is known.
    pub extent: Option<(u32, u32)>,
    keep_resident: AtomicBool,
}

impl ResidentTexture {
    #[must_use]
    pub fn new(asset: AssetData, color_space: ColorSpace, keep_resident: bool) -> Self {
        Self {
            asset,
            color_space,
            extent: None,
            keep_resident: AtomicBool::new(keep_resident),
        }
    }

    #[must_use]
    pub fn with_extent(mut self, extent: Option<(u32, u32)>) -> Self {
        self.extent = extent;
        self
    }

    /// Whether the texture is pinned in video memory.
    #[must_use]
    pub fn keep_resident(&self) -> bool {
        self.keep_resident.load(Ordering::Relaxed)
    }

    pub fn pin(&self) {
        self.keep_resident.store(true, Ordering::Relaxed);
    }
}

pub trait TextureLoader: Send {
    fn preload(&mut self, asset: &AssetData, color_space: ColorSpace, keep_resident: bool) -> Option<Arc<ResidentTexture>>;
}

/// Loader that tracks residency and reads image headers, without decoding
/// texel data.
///
/// Repeated requests for the same asset share one [`ResidentTexture`]; a
/// later keep-resident request pins the shared entry.
#[derive(Debug, Default)]
pub struct TextureCache {
    loaded: FxHashMap<u64, Arc<ResidentTexture>>,
}

impl TextureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl TextureLoader for TextureCache {
    fn preload(&mut self, asset: &AssetData, color_space: ColorSpace, keep_resident: bool) -> Option<Arc<ResidentTexture>> {
        let texture = self
            .loaded
            .entry(asset.id)
            .or_insert_with(|| {
                let extent = read_extent(&asset.path);
                Arc::new(ResidentTexture::new(asset.clone(), color_space, keep_resident).with_extent(extent))
            });
        if keep_resident {
            texture.pin();
        }
        Some(Arc::clone(texture))
    }
}

fn read_extent(path: &Path) -> Option<(u32, u32)> {
    match image::image_dimensions(path) {
        Ok(extent) => Some(extent),
        Err(err) => {
            log::debug!("no image header for {}: {err}", path.display());
            None
        }
    }
}

// ============================================================================
// TextureRef
// ============================================================================

/// A resolved texture binding.
#[derive(Debug, Clone)]
pub enum TextureRef {
    /// An image created through `CreateImage`.
    Uploaded(Arc<ImageView>),
    /// A texture loaded from the asset pipeline.
    Asset(Arc<ResidentTexture>),
}

impl TextureRef {
    #[must_use]
    pub fn as_uploaded(&self) -> Option<&Arc<ImageView>> {
        match self {
            TextureRef::Uploaded(view) => Some(view),
            TextureRef::Asset(_) => None,
        }
    }

    #[must_use]
    pub fn as_asset(&self) -> Option<&Arc<ResidentTexture>> {
        match self {
            TextureRef::Asset(texture) => Some(texture),
            TextureRef::Uploaded(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_shares_and_pins() {
        let mut cache = TextureCache::new();
        let asset = AssetData::new("sky.dds");
        let a = cache.preload(&asset, ColorSpace::Auto, false).unwrap();
        assert!(!a.keep_resident());
        let b = cache.preload(&asset, ColorSpace::Auto, true).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.keep_resident());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_reads_png_extent() {
        let path = std::env::temp_dir().join(format!("raylink-extent-{}.png", std::process::id()));
        image::RgbaImage::new(3, 2).save(&path).unwrap();

        let mut cache = TextureCache::new();
        let texture = cache.preload(&AssetData::new(&path), ColorSpace::Srgb, false).unwrap();
        assert_eq!(texture.extent, Some((3, 2)));
        std::fs::remove_file(path).unwrap();

        let missing = cache.preload(&AssetData::new("missing.dds"), ColorSpace::Auto, false).unwrap();
        assert_eq!(missing.extent, None);
    }

    #[test]
    fn memory_locator_only_knows_inserted_paths() {
        let locator = MemoryAssetLocator::new().with_asset("textures/a.dds");
        assert!(locator.find_asset(Path::new("textures/a.dds")).is_some());
        assert!(locator.find_asset(Path::new("textures/b.dds")).is_none());
    }
}
