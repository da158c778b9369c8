//! Render-thread scene state.
//!
//! Everything in here is owned by the render thread and only mutated from
//! inside submission units, so none of it is locked. Externally issued
//! handles are mapped onto slotmap keys; the two identifier spaces never
//! mix.

use std::hash::Hash;
use std::sync::Arc;

use glam::{Mat4, Vec4};
use raylink_core::{LightHandle, MaterialHandle, MeshHandle};
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::camera::CameraManager;
use crate::device::ImageView;
use crate::draw::ExternalDrawState;
use crate::geometry::{HardcodedVertex, RasterGeometry};
use crate::light::ResolvedLight;
use crate::material::ResolvedMaterial;
use crate::picking::{Highlighting, ObjectPicking};
use crate::textures::TextureRef;

new_key_type! {
    pub struct MaterialKey;
    pub struct MeshKey;
    pub struct LightKey;
}

/// Slotmap storage addressed by an external handle.
#[derive(Debug)]
pub struct HandleMap<H, K: Key, V> {
    slots: SlotMap<K, V>,
    lookup: FxHashMap<H, K>,
}

impl<H, K: Key, V> Default for HandleMap<H, K, V> {
    fn default() -> Self {
        Self {
            slots: SlotMap::with_key(),
            lookup: FxHashMap::default(),
        }
    }
}

impl<H: Copy + Eq + Hash, K: Key, V> HandleMap<H, K, V> {
    /// Stores `value` under `handle`, replacing any previous value.
    pub fn insert(&mut self, handle: H, value: V) -> K {
        if let Some(old) = self.lookup.remove(&handle) {
            self.slots.remove(old);
        }
        let key = self.slots.insert(value);
        self.lookup.insert(handle, key);
        key
    }

    pub fn remove(&mut self, handle: H) -> Option<V> {
        let key = self.lookup.remove(&handle)?;
        self.slots.remove(key)
    }

    #[must_use]
    pub fn key(&self, handle: H) -> Option<K> {
        self.lookup.get(&handle).copied()
    }

    #[must_use]
    pub fn get(&self, handle: H) -> Option<&V> {
        self.key(handle).and_then(|key| self.slots.get(key))
    }

    #[must_use]
    pub fn get_by_key(&self, key: K) -> Option<&V> {
        self.slots.get(key)
    }

    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.lookup.contains_key(&handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.lookup.clear();
    }
}

// ============================================================================
// Meshes
// ============================================================================

#[derive(Debug, Clone)]
pub struct MeshRecord {
    pub surfaces: SmallVec<[RasterGeometry; 2]>,
}

impl MeshRecord {
    /// Largest bones-per-vertex count over all surfaces.
    #[must_use]
    pub fn num_bones_per_vertex(&self) -> u32 {
        self.surfaces
            .iter()
            .map(|surface| surface.num_bones_per_vertex)
            .max()
            .unwrap_or(0)
    }
}

// ============================================================================
// Lights
// ============================================================================

#[derive(Debug, Default)]
pub struct LightManager {
    pub lights: HandleMap<LightHandle, LightKey, ResolvedLight>,
    /// Lights submitted through `DrawLightInstance` this frame.
    pub active: Vec<LightKey>,
    /// Dome textures pinned while their light is alive.
    pub resident: FxHashMap<LightHandle, TextureRef>,
}

impl LightManager {
    pub fn add_external_light(&mut self, handle: LightHandle, light: ResolvedLight) -> LightKey {
        self.lights.insert(handle, light)
    }

    pub fn remove_external_light(&mut self, handle: LightHandle) -> Option<ResolvedLight> {
        self.resident.remove(&handle);
        if let Some(key) = self.lights.key(handle) {
            self.active.retain(|active| *active != key);
        }
        self.lights.remove(handle)
    }

    /// Marks a registered light as drawn this frame. Returns `false` if the
    /// handle is not registered on the render side.
    pub fn draw_external_light(&mut self, handle: LightHandle) -> bool {
        match self.lights.key(handle) {
            Some(key) => {
                self.active.push(key);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Per-frame lists
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// A screen-space or sky draw composited over the ray-traced image.
#[derive(Debug, Clone)]
pub struct UiDraw {
    pub image: Option<TextureRef>,
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Option<Viewport>,
    pub vertices: Vec<HardcodedVertex>,
    pub indices: Vec<u32>,
    pub color: u32,
    pub sky: bool,
    pub skip_normals: bool,
}

#[derive(Debug, Default)]
pub struct FrameDraws {
    pub instances: Vec<ExternalDrawState>,
    pub ui: Vec<UiDraw>,
    /// Set once the ray-traced output has been injected for UI compositing.
    pub rt_injected: bool,
}

impl FrameDraws {
    pub fn clear(&mut self) {
        self.instances.clear();
        self.ui.clear();
        self.rt_injected = false;
    }
}

// ============================================================================
// Outputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputType {
    FinalColor,
    Depth,
    Normals,
    ObjectPicking,
}

impl OutputType {
    pub const COUNT: usize = 4;
}

/// Clear values for the rendering outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtGlobals {
    pub clear_color_final: Vec4,
    pub clear_color_depth: f32,
    pub clear_color_normals: Vec4,
    pub clear_color_picking: u32,
}

impl Default for RtGlobals {
    fn default() -> Self {
        Self {
            clear_color_final: Vec4::new(0.0, 0.0, 0.0, 1.0),
            clear_color_depth: 1.0,
            clear_color_normals: Vec4::ZERO,
            clear_color_picking: u32::MAX,
        }
    }
}

impl RtGlobals {
    /// Picking outputs take the bit pattern of `color.x`; depth uses `color.x`.
    pub fn set_default_output(&mut self, output: OutputType, color: Vec4) {
        match output {
            OutputType::FinalColor => self.clear_color_final = color,
            OutputType::Depth => self.clear_color_depth = color.x,
            OutputType::Normals => self.clear_color_normals = color,
            OutputType::ObjectPicking => self.clear_color_picking = color.x.to_bits(),
        }
    }
}

// ============================================================================
// SceneState
// ============================================================================

#[derive(Debug, Default)]
pub struct SceneState {
    pub frame_id: u64,
    pub materials: HandleMap<MaterialHandle, MaterialKey, ResolvedMaterial>,
    pub meshes: HandleMap<MeshHandle, MeshKey, MeshRecord>,
    pub light_manager: LightManager,
    pub cameras: CameraManager,
    /// Images created through `CreateImage`, by name.
    pub uploaded_images: FxHashMap<String, Arc<ImageView>>,
    pub draws: FrameDraws,
    pub globals: RtGlobals,
    pub picking: ObjectPicking,
    pub highlighting: Highlighting,
}

impl SceneState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Picking values of every instance committed this frame.
    #[must_use]
    pub fn drawn_picking_values(&self) -> Vec<u32> {
        self.draws
            .instances
            .iter()
            .map(|draw| draw.prototype.draw_call_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_map_replaces_and_removes() {
        let mut map: HandleMap<MeshHandle, MeshKey, &str> = HandleMap::default();
        let first = map.insert(MeshHandle(5), "a");
        let second = map.insert(MeshHandle(5), "b");
        assert_ne!(first, second);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(MeshHandle(5)), Some(&"b"));
        assert_eq!(map.remove(MeshHandle(5)), Some("b"));
        assert!(map.remove(MeshHandle(5)).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn removed_light_leaves_the_active_list() {
        use glam::Vec3;

        use crate::light::{DistantLight, LightData, RtLight};

        let light = || {
            let distant = DistantLight::try_create(Vec3::NEG_Y, 0.01, Vec3::ONE).unwrap();
            LightData::Analytic(RtLight::Distant(distant))
        };
        let mut lights = LightManager::default();
        lights.add_external_light(LightHandle(1), light());
        lights.add_external_light(LightHandle(2), light());
        assert!(lights.draw_external_light(LightHandle(1)));
        assert!(lights.draw_external_light(LightHandle(2)));
        assert!(lights.draw_external_light(LightHandle(1)));

        assert!(lights.remove_external_light(LightHandle(1)).is_some());
        assert_eq!(lights.active, vec![lights.lights.key(LightHandle(2)).unwrap()]);
        assert!(!lights.draw_external_light(LightHandle(1)));
    }

    #[test]
    fn picking_clear_value_uses_float_bits() {
        let mut globals = RtGlobals::default();
        globals.set_default_output(OutputType::ObjectPicking, Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(globals.clear_color_picking, 1.0f32.to_bits());
    }
}
