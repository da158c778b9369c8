//! External data model.
//!
//! These types mirror the structures a caller hands across the API. Each
//! entry point takes a base struct whose optional extensions live in an
//! [`ExtensionChain`]. Bulk data (vertices, indices, bone weights, texel
//! bytes) is borrowed for the duration of the call only; everything the
//! renderer keeps is copied out before the call returns.

pub mod chain;
mod light;
mod material;
mod mesh;
mod scene;

use raylink_render::raw_enum;

pub use chain::{Extension, ExtensionBlock, ExtensionChain, StructType};
pub use light::{
    LightInfo, LightInfoCylinderExt, LightInfoDiskExt, LightInfoDistantExt, LightInfoDomeExt, LightInfoRectExt,
    LightInfoSphereExt, LightInfoUsdExt, LightShapingInfo, UsdLightType,
};
pub use material::{
    MaterialInfo, MaterialInfoOpaqueExt, MaterialInfoOpaqueSubsurfaceExt, MaterialInfoPortalExt,
    MaterialInfoTranslucentExt,
};
pub use mesh::{MeshInfo, MeshSkinning, MeshSurfaceTriangles, SurfaceFlags};
pub use raylink_render::geometry::HardcodedVertex;
pub use raylink_render::scene::Viewport;
pub use scene::{
    CameraInfo, CameraInfoParameterizedExt, CameraTypeTag, CreateImageInfo, InstanceCategoryFlags, InstanceInfo,
    InstanceInfoBlendExt, InstanceInfoBoneTransformsExt, InstanceInfoObjectPickingExt, OutputType, StartupInfo,
    UiInstanceFlags, UiInstanceInfo,
};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Float3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Float3D {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Float3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Row-major 3x4 affine transform. The last column holds the translation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix: [[f32; 4]; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
    };

    #[must_use]
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut t = Self::IDENTITY;
        t.matrix[0][3] = x;
        t.matrix[1][3] = y;
        t.matrix[2][3] = z;
        t
    }
}

/// 4x4 matrix in D3D memory order (row vectors, rows stored contiguously).
pub type Matrix4 = [[f32; 4]; 4];

/// Pixel rectangle used by object picking.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2D {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

raw_enum! {
    /// External pixel formats.
    #[derive(Default)]
    pub enum Format: u32 {
        #[default]
        Undefined = 0,
        R8Uint = 1,
        R8Sint = 2,
        R8Unorm = 3,
        R8Snorm = 4,
        R8G8Uint = 5,
        R8G8Sint = 6,
        R8G8Unorm = 7,
        R8G8Snorm = 8,
        R16Uint = 9,
        R16Sint = 10,
        R16Unorm = 11,
        R16Snorm = 12,
        R16Sfloat = 13,
        B4G4R4A4UnormPack16 = 14,
        B5G6R5UnormPack16 = 15,
        B5G5R5A1UnormPack16 = 16,
        R8G8B8A8Uint = 17,
        R8G8B8A8Sint = 18,
        R8G8B8A8Unorm = 19,
        R8G8B8A8Snorm = 20,
        B8G8R8A8Unorm = 21,
        R8G8B8A8Srgb = 22,
        B8G8R8A8Srgb = 23,
        A2B10G10R10UnormPack32 = 24,
        B10G11R11UfloatPack32 = 25,
        R16G16Uint = 26,
        R16G16Sint = 27,
        R16G16Unorm = 28,
        R16G16Snorm = 29,
        R16G16Sfloat = 30,
        R32Uint = 31,
        R32Sint = 32,
        R32Sfloat = 33,
        R16G16B16A16Uint = 34,
        R16G16B16A16Sint = 35,
        R16G16B16A16Sfloat = 36,
        R16G16B16A16Unorm = 37,
        R16G16B16A16Snorm = 38,
        R32G32Uint = 39,
        R32G32Sint = 40,
        R32G32Sfloat = 41,
        R32G32B32Uint = 42,
        R32G32B32Sint = 43,
        R32G32B32Sfloat = 44,
        R32G32B32A32Uint = 45,
        R32G32B32A32Sint = 46,
        R32G32B32A32Sfloat = 47,
        D16Unorm = 48,
        D24UnormS8Uint = 49,
        D32Sfloat = 50,
        D32SfloatS8Uint = 51,
        Bc1RgbUnormBlock = 52,
        Bc1RgbSrgbBlock = 53,
        Bc2UnormBlock = 54,
        Bc2SrgbBlock = 55,
        Bc3UnormBlock = 56,
        Bc3SrgbBlock = 57,
        Bc4UnormBlock = 58,
        Bc4SnormBlock = 59,
        Bc5UnormBlock = 60,
        Bc5SnormBlock = 61,
        Bc6hUfloatBlock = 62,
        Bc6hSfloatBlock = 63,
        Bc7UnormBlock = 64,
        Bc7SrgbBlock = 65,
    }
}
