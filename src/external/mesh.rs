use bitflags::bitflags;
use raylink_core::MaterialHandle;

use super::HardcodedVertex;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceFlags: u32 {
        /// Shade with the geometric triangle normal; the vertex normals are ignored.
        const USE_TRIANGLE_NORMALS = 1 << 0;
    }
}

/// Bone weights and indices, `bones_per_vertex` entries per vertex.
#[derive(Debug, Clone, Copy)]
pub struct MeshSkinning<'a> {
    pub bones_per_vertex: u32,
    pub blend_weights: &'a [f32],
    pub blend_indices: &'a [u32],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeshSurfaceTriangles<'a> {
    pub vertices: &'a [HardcodedVertex],
    /// Empty for non-indexed surfaces.
    pub indices: &'a [u32],
    pub skinning: Option<MeshSkinning<'a>>,
    pub material: MaterialHandle,
    pub flags: SurfaceFlags,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeshInfo<'a> {
    pub hash: u64,
    pub surfaces: &'a [MeshSurfaceTriangles<'a>],
}
