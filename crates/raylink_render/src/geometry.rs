//! Raster geometry built from externally supplied meshes.

use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use raylink_core::MaterialHandle;
use xxhash_rust::xxh64::xxh64;

use crate::device::BufferSlice;
use crate::format::{IndexType, TextureFormat};

/// Vertex layout shared with the external API. 64 bytes, one cache line.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Default)]
pub struct HardcodedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
    /// Packed B8G8R8A8.
    pub color: u32,
    pub _pad: [u32; 7],
}

impl HardcodedVertex {
    pub const STRIDE: u32 = 64;
    pub const POSITION_OFFSET: u64 = 0;
    pub const NORMAL_OFFSET: u64 = 12;
    pub const TEXCOORD_OFFSET: u64 = 24;
    pub const COLOR_OFFSET: u64 = 32;
}

const _: () = assert!(std::mem::size_of::<HardcodedVertex>() == HardcodedVertex::STRIDE as usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    #[default]
    TriangleList,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// A strided view into a vertex buffer.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    pub slice: BufferSlice,
    pub format: TextureFormat,
    pub stride: u32,
}

impl RasterBuffer {
    #[must_use]
    pub fn new(slice: BufferSlice, format: TextureFormat, stride: u32) -> Self {
        Self { slice, format, stride }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.slice.offset
    }
}

#[derive(Debug, Clone)]
pub struct IndexBuffer {
    pub slice: BufferSlice,
    pub index_type: IndexType,
}

// ============================================================================
// Hashing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HashComponent {
    Indices,
    VertexPosition,
    VertexTexcoord,
    GeometryDescriptor,
    VertexLayout,
}

impl HashComponent {
    pub const COUNT: usize = 5;
}

static GEOMETRY_HASH_COUNTER: AtomicU64 = AtomicU64::new(u64::MAX);

/// Returns a fresh geometry hash.
///
/// Values are unique within one process run only.
#[must_use]
pub fn next_geometry_hash() -> u64 {
    let counter = GEOMETRY_HASH_COUNTER.fetch_sub(1, Ordering::Relaxed).wrapping_sub(1);
    xxh64(&counter.to_le_bytes(), 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryHashes {
    components: [u64; HashComponent::COUNT],
    precombined: u64,
}

impl GeometryHashes {
    /// Assigns fresh hashes to every component. Indices and positions
    /// share one value.
    #[must_use]
    pub fn generate() -> Self {
        let shared = next_geometry_hash();
        let mut components = [0; HashComponent::COUNT];
        components[HashComponent::Indices as usize] = shared;
        components[HashComponent::VertexPosition as usize] = shared;
        components[HashComponent::VertexTexcoord as usize] = next_geometry_hash();
        components[HashComponent::GeometryDescriptor as usize] = next_geometry_hash();
        components[HashComponent::VertexLayout as usize] = next_geometry_hash();
        let mut hashes = Self {
            components,
            precombined: 0,
        };
        hashes.precombine();
        hashes
    }

    fn precombine(&mut self) {
        let bytes: &[u8] = bytemuck::cast_slice(&self.components);
        self.precombined = xxh64(bytes, 0);
    }

    #[must_use]
    pub fn get(&self, component: HashComponent) -> u64 {
        self.components[component as usize]
    }

    #[must_use]
    pub fn precombined(&self) -> u64 {
        self.precombined
    }
}

// ============================================================================
// RasterGeometry
// ============================================================================

#[derive(Debug, Clone)]
pub struct RasterGeometry {
    pub topology: Topology,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub vertex_count: u32,
    pub index_count: u32,
    pub position_buffer: RasterBuffer,
    pub normal_buffer: Option<RasterBuffer>,
    pub texcoord_buffer: Option<RasterBuffer>,
    pub color0_buffer: Option<RasterBuffer>,
    pub blend_weight_buffer: Option<RasterBuffer>,
    pub blend_indices_buffer: Option<RasterBuffer>,
    pub index_buffer: Option<IndexBuffer>,
    pub num_bones_per_vertex: u32,
    pub material: MaterialHandle,
    pub hashes: GeometryHashes,
}

impl RasterGeometry {
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        self.blend_weight_buffer.is_some()
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }
}
