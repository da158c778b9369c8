//! Mesh translation.
//!
//! Surface data is copied out of caller memory into host-visible staging
//! buffers before `CreateMesh` returns. The deferred half,
//! [`StagedMesh::upload`], runs on the render thread: it allocates the
//! device-local buffers, records the staging copies and builds the
//! [`RasterGeometry`] descriptors.

use std::sync::Arc;

use raylink_core::MaterialHandle;
use raylink_core::errors::{ApiError, Result};
use raylink_render::RenderContext;
use raylink_render::device::{Buffer, BufferDesc, BufferSlice, BufferUsage, Device, MemoryLocation};
use raylink_render::draw::MAX_BONES;
use raylink_render::format::{IndexType, TextureFormat};
use raylink_render::geometry::{
    CullMode, FrontFace, GeometryHashes, HardcodedVertex, IndexBuffer, RasterBuffer, RasterGeometry, Topology,
};
use smallvec::SmallVec;

use crate::external::{MeshInfo, MeshSkinning, MeshSurfaceTriangles, SurfaceFlags};

/// Usage of every device-local mesh buffer.
pub const MESH_BUFFER_USAGE: BufferUsage = BufferUsage::STORAGE
    .union(BufferUsage::TRANSFER_DST)
    .union(BufferUsage::TRANSFER_SRC)
    .union(BufferUsage::DEVICE_ADDRESS)
    .union(BufferUsage::ACCELERATION_STRUCTURE_INPUT);

const BONE_INDICES_PER_WORD: u32 = 4;

// ============================================================================
// Bone index packing
// ============================================================================

/// Number of packed `u32` words per vertex for `bones_per_vertex` bones.
#[inline]
#[must_use]
pub fn packed_words_per_vertex(bones_per_vertex: u32) -> u32 {
    bones_per_vertex.div_ceil(BONE_INDICES_PER_WORD)
}

/// Packs bone indices four to a word, eight bits each, lowest byte first.
///
/// Every vertex starts on a fresh word; unused bytes of its last word are
/// zero.
pub fn pack_bone_indices(indices: &[u32], vertex_count: usize, bones_per_vertex: u32) -> Result<Vec<u32>> {
    if bones_per_vertex == 0 || bones_per_vertex as usize > MAX_BONES {
        return Err(ApiError::invalid(format!(
            "bones per vertex must be within 1..={MAX_BONES}, got {bones_per_vertex}"
        )));
    }
    let bones = bones_per_vertex as usize;
    let required = vertex_count
        .checked_mul(bones)
        .ok_or_else(|| ApiError::invalid("skinning index count overflows"))?;
    if indices.len() < required {
        return Err(ApiError::invalid(format!(
            "expected at least {required} blend indices, got {}",
            indices.len()
        )));
    }
    if let Some(bad) = indices[..required].iter().find(|idx| **idx as usize >= MAX_BONES) {
        return Err(ApiError::invalid(format!("bone index {bad} does not fit in 8 bits")));
    }

    let words = packed_words_per_vertex(bones_per_vertex) as usize;
    let mut packed = vec![0u32; vertex_count * words];
    for (vertex, dst) in packed.chunks_exact_mut(words).enumerate() {
        let src = &indices[vertex * bones..(vertex + 1) * bones];
        for (word, group) in dst.iter_mut().zip(src.chunks(BONE_INDICES_PER_WORD as usize)) {
            *word = group
                .iter()
                .enumerate()
                .fold(0, |acc, (k, idx)| acc | (idx << (8 * k)));
        }
    }
    Ok(packed)
}

/// Inverse of [`pack_bone_indices`].
#[must_use]
pub fn unpack_bone_indices(packed: &[u32], vertex_count: usize, bones_per_vertex: u32) -> Vec<u32> {
    let words = packed_words_per_vertex(bones_per_vertex) as usize;
    let bones = bones_per_vertex as usize;
    let mut indices = Vec::with_capacity(vertex_count * bones);
    for vertex in packed.chunks_exact(words).take(vertex_count) {
        indices.extend((0..bones).map(|b| {
            let word = vertex[b / BONE_INDICES_PER_WORD as usize];
            (word >> (8 * (b % BONE_INDICES_PER_WORD as usize))) & 0xFF
        }));
    }
    indices
}

// ============================================================================
// Staging
// ============================================================================

#[derive(Debug)]
struct StagedSkinning {
    staging: Arc<Buffer>,
    bones_per_vertex: u32,
    weights_bytes: u64,
    indices_bytes: u64,
}

#[derive(Debug)]
struct StagedSurface {
    vertices: Arc<Buffer>,
    vertex_bytes: u64,
    vertex_count: u32,
    indices: Option<(Arc<Buffer>, u32)>,
    skinning: Option<StagedSkinning>,
    material: MaterialHandle,
    flags: SurfaceFlags,
}

/// A mesh whose surface data lives in renderer-owned staging memory.
#[derive(Debug)]
pub struct StagedMesh {
    surfaces: SmallVec<[StagedSurface; 2]>,
}

impl StagedMesh {
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Allocates device buffers, records the staging copies and returns the
    /// finished geometry. Must run on the render thread.
    pub fn upload(self, ctx: &mut RenderContext) -> Result<SmallVec<[RasterGeometry; 2]>> {
        self.surfaces
            .into_iter()
            .map(|surface| upload_surface(ctx, surface))
            .collect()
    }
}

fn bytes_len(bytes: &[u8]) -> u64 {
    bytes.len() as u64
}

fn stage_bytes(device: &dyn Device, label: &'static str, bytes: &[u8]) -> Result<Arc<Buffer>> {
    let buffer = device.create_buffer(&BufferDesc {
        label,
        size: bytes_len(bytes),
        usage: BufferUsage::TRANSFER_SRC,
        location: MemoryLocation::HostVisible,
    })?;
    buffer.write(0, bytes)?;
    Ok(buffer)
}

fn count_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| ApiError::invalid(format!("too many {what}: {len}")))
}

fn stage_skinning(device: &dyn Device, skinning: &MeshSkinning<'_>, vertex_count: usize) -> Result<StagedSkinning> {
    let packed = pack_bone_indices(skinning.blend_indices, vertex_count, skinning.bones_per_vertex)?;
    // Packed indices sit right after the weights in one buffer.
    let expected_weights = vertex_count * skinning.bones_per_vertex as usize;
    if skinning.blend_weights.len() != expected_weights {
        return Err(ApiError::invalid(format!(
            "expected {expected_weights} blend weights, got {}",
            skinning.blend_weights.len()
        )));
    }
    let weights: &[u8] = bytemuck::cast_slice(skinning.blend_weights);
    let indices: &[u8] = bytemuck::cast_slice(&packed);

    let mut bytes = Vec::with_capacity(weights.len() + indices.len());
    bytes.extend_from_slice(weights);
    bytes.extend_from_slice(indices);
    let staging = stage_bytes(device, "mesh skinning staging", &bytes)?;

    Ok(StagedSkinning {
        staging,
        bones_per_vertex: skinning.bones_per_vertex,
        weights_bytes: bytes_len(weights),
        indices_bytes: bytes_len(indices),
    })
}

fn stage_surface(device: &dyn Device, surface: &MeshSurfaceTriangles<'_>) -> Result<StagedSurface> {
    if surface.vertices.is_empty() {
        return Err(ApiError::invalid("mesh surface has no vertices"));
    }
    let vertex_count = count_u32(surface.vertices.len(), "vertices")?;
    let vertex_bytes: &[u8] = bytemuck::cast_slice(surface.vertices);
    let vertices = stage_bytes(device, "mesh vertex staging", vertex_bytes)?;

    let indices = if surface.indices.is_empty() {
        None
    } else {
        let count = count_u32(surface.indices.len(), "indices")?;
        let staging = stage_bytes(device, "mesh index staging", bytemuck::cast_slice(surface.indices))?;
        Some((staging, count))
    };

    let skinning = surface
        .skinning
        .as_ref()
        .map(|skinning| stage_skinning(device, skinning, surface.vertices.len()))
        .transpose()?;

    Ok(StagedSurface {
        vertices,
        vertex_bytes: bytes_len(vertex_bytes),
        vertex_count,
        indices,
        skinning,
        material: surface.material,
        flags: surface.flags,
    })
}

/// Validates a mesh and copies every surface into staging buffers.
pub fn stage_mesh(device: &dyn Device, info: &MeshInfo<'_>) -> Result<StagedMesh> {
    let surfaces = info
        .surfaces
        .iter()
        .map(|surface| stage_surface(device, surface))
        .collect::<Result<SmallVec<_>>>()?;
    Ok(StagedMesh { surfaces })
}

// ============================================================================
// Upload
// ============================================================================

/// Creates a device-local copy of the first `len` bytes of `staging`.
fn copy_to_device(ctx: &mut RenderContext, label: &'static str, staging: Arc<Buffer>, len: u64) -> Result<Arc<Buffer>> {
    let device_buffer = ctx.device().create_buffer(&BufferDesc {
        label,
        size: len,
        usage: MESH_BUFFER_USAGE,
        location: MemoryLocation::DeviceLocal,
    })?;
    ctx.commands.copy_buffer(
        BufferSlice::sub(staging, 0, len),
        BufferSlice::sub(Arc::clone(&device_buffer), 0, len),
    );
    Ok(device_buffer)
}

fn vertex_attribute(buffer: &Arc<Buffer>, vertex_bytes: u64, offset: u64, format: TextureFormat) -> RasterBuffer {
    RasterBuffer::new(
        BufferSlice::sub(Arc::clone(buffer), offset, vertex_bytes - offset),
        format,
        HardcodedVertex::STRIDE,
    )
}

fn upload_surface(ctx: &mut RenderContext, surface: StagedSurface) -> Result<RasterGeometry> {
    let StagedSurface {
        vertices,
        vertex_bytes,
        vertex_count,
        indices,
        skinning,
        material,
        flags,
    } = surface;

    let vertex_buffer = copy_to_device(ctx, "mesh vertices", vertices, vertex_bytes)?;

    let normal_buffer = (!flags.contains(SurfaceFlags::USE_TRIANGLE_NORMALS)).then(|| {
        vertex_attribute(
            &vertex_buffer,
            vertex_bytes,
            HardcodedVertex::NORMAL_OFFSET,
            TextureFormat::R32G32B32_SFLOAT,
        )
    });

    let (index_buffer, index_count) = match indices {
        Some((staging, count)) => {
            let len = u64::from(count) * IndexType::U32.size() as u64;
            let buffer = copy_to_device(ctx, "mesh indices", staging, len)?;
            let index_buffer = IndexBuffer {
                slice: BufferSlice::sub(buffer, 0, len),
                index_type: IndexType::U32,
            };
            (Some(index_buffer), count)
        }
        None => (None, 0),
    };

    let mut geometry = RasterGeometry {
        topology: Topology::TriangleList,
        cull_mode: CullMode::None,
        front_face: FrontFace::Clockwise,
        vertex_count,
        index_count,
        position_buffer: vertex_attribute(
            &vertex_buffer,
            vertex_bytes,
            HardcodedVertex::POSITION_OFFSET,
            TextureFormat::R32G32B32_SFLOAT,
        ),
        normal_buffer,
        texcoord_buffer: Some(vertex_attribute(
            &vertex_buffer,
            vertex_bytes,
            HardcodedVertex::TEXCOORD_OFFSET,
            TextureFormat::R32G32_SFLOAT,
        )),
        color0_buffer: Some(vertex_attribute(
            &vertex_buffer,
            vertex_bytes,
            HardcodedVertex::COLOR_OFFSET,
            TextureFormat::B8G8R8A8_UNORM,
        )),
        blend_weight_buffer: None,
        blend_indices_buffer: None,
        index_buffer,
        num_bones_per_vertex: 0,
        material,
        hashes: GeometryHashes::generate(),
    };

    if let Some(skinning) = skinning {
        let total = skinning.weights_bytes + skinning.indices_bytes;
        let buffer = copy_to_device(ctx, "mesh skinning", skinning.staging, total)?;
        geometry.num_bones_per_vertex = skinning.bones_per_vertex;
        geometry.blend_weight_buffer = Some(RasterBuffer::new(
            BufferSlice::sub(Arc::clone(&buffer), 0, skinning.weights_bytes),
            TextureFormat::R32_SFLOAT,
            4,
        ));
        geometry.blend_indices_buffer = Some(RasterBuffer::new(
            BufferSlice::sub(buffer, skinning.weights_bytes, skinning.indices_bytes),
            TextureFormat::R8G8B8A8_USCALED,
            4,
        ));
    }

    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_per_vertex_round_up() {
        assert_eq!(packed_words_per_vertex(1), 1);
        assert_eq!(packed_words_per_vertex(4), 1);
        assert_eq!(packed_words_per_vertex(5), 2);
        assert_eq!(packed_words_per_vertex(256), 64);
    }

    #[test]
    fn packing_is_little_endian_per_word() {
        let packed = pack_bone_indices(&[1, 2, 3, 4, 5], 1, 5).unwrap();
        assert_eq!(packed, vec![0x0403_0201, 0x0000_0005]);
    }

    #[test]
    fn packing_rejects_bad_input() {
        assert!(pack_bone_indices(&[], 1, 0).is_err());
        assert!(pack_bone_indices(&[0; 257], 1, 257).is_err());
        assert!(pack_bone_indices(&[256], 1, 1).is_err());
        assert!(pack_bone_indices(&[1, 2], 2, 2).is_err());
    }

    #[test]
    fn skinning_weights_must_cover_every_bone() {
        let device = raylink_render::HeadlessDevice::default();
        let vertices = [HardcodedVertex::default(); 2];
        let indices = [0, 1, 1, 0];
        let stage = |weights: &[f32]| {
            let surfaces = [MeshSurfaceTriangles {
                vertices: &vertices,
                skinning: Some(MeshSkinning {
                    bones_per_vertex: 2,
                    blend_weights: weights,
                    blend_indices: &indices,
                }),
                ..MeshSurfaceTriangles::default()
            }];
            stage_mesh(&device, &MeshInfo { hash: 1, surfaces: &surfaces })
        };

        let err = stage(&[0.5, 0.5, 1.0]).unwrap_err();
        assert_eq!(err.code(), raylink_core::ErrorCode::InvalidArguments);
        assert!(stage(&[0.5, 0.5, 1.0, 0.0, 0.25]).is_err());

        let staged = stage(&[0.5, 0.5, 1.0, 0.0]).unwrap();
        let skinning = staged.surfaces[0].skinning.as_ref().unwrap();
        assert_eq!(skinning.weights_bytes, 16);
        assert_eq!(skinning.indices_bytes, 8);
    }
}
