//! Internal texel and vertex attribute formats.
//!
//! Names follow the Vulkan `VkFormat` spelling so that a hardware backend
//! can map them one-to-one.

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    #[default]
    UNDEFINED,
    R8_UINT,
    R8_SINT,
    R8_UNORM,
    R8_SNORM,
    R8G8_UINT,
    R8G8_SINT,
    R8G8_UNORM,
    R8G8_SNORM,
    R16_UINT,
    R16_SINT,
    R16_UNORM,
    R16_SNORM,
    R16_SFLOAT,
    B4G4R4A4_UNORM_PACK16,
    B5G6R5_UNORM_PACK16,
    B5G5R5A1_UNORM_PACK16,
    R8G8B8A8_UINT,
    R8G8B8A8_SINT,
    R8G8B8A8_UNORM,
    R8G8B8A8_SNORM,
    R8G8B8A8_USCALED,
    B8G8R8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_SRGB,
    A2B10G10R10_UNORM_PACK32,
    B10G11R11_UFLOAT_PACK32,
    R16G16_UINT,
    R16G16_SINT,
    R16G16_UNORM,
    R16G16_SNORM,
    R16G16_SFLOAT,
    R32_UINT,
    R32_SINT,
    R32_SFLOAT,
    R16G16B16A16_UINT,
    R16G16B16A16_SINT,
    R16G16B16A16_SFLOAT,
    R16G16B16A16_UNORM,
    R16G16B16A16_SNORM,
    R32G32_UINT,
    R32G32_SINT,
    R32G32_SFLOAT,
    R32G32B32_UINT,
    R32G32B32_SINT,
    R32G32B32_SFLOAT,
    R32G32B32A32_UINT,
    R32G32B32A32_SINT,
    R32G32B32A32_SFLOAT,
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_SFLOAT,
    D32_SFLOAT_S8_UINT,
    BC1_RGB_UNORM_BLOCK,
    BC1_RGB_SRGB_BLOCK,
    BC2_UNORM_BLOCK,
    BC2_SRGB_BLOCK,
    BC3_UNORM_BLOCK,
    BC3_SRGB_BLOCK,
    BC4_UNORM_BLOCK,
    BC4_SNORM_BLOCK,
    BC5_UNORM_BLOCK,
    BC5_SNORM_BLOCK,
    BC6H_UFLOAT_BLOCK,
    BC6H_SFLOAT_BLOCK,
    BC7_UNORM_BLOCK,
    BC7_SRGB_BLOCK,
}

impl TextureFormat {
    #[must_use]
    pub fn is_block_compressed(self) -> bool {
        use TextureFormat::{
            BC1_RGB_SRGB_BLOCK, BC1_RGB_UNORM_BLOCK, BC2_SRGB_BLOCK, BC2_UNORM_BLOCK, BC3_SRGB_BLOCK,
            BC3_UNORM_BLOCK, BC4_SNORM_BLOCK, BC4_UNORM_BLOCK, BC5_SNORM_BLOCK, BC5_UNORM_BLOCK,
            BC6H_SFLOAT_BLOCK, BC6H_UFLOAT_BLOCK, BC7_SRGB_BLOCK, BC7_UNORM_BLOCK,
        };
        matches!(
            self,
            BC1_RGB_UNORM_BLOCK
                | BC1_RGB_SRGB_BLOCK
                | BC2_UNORM_BLOCK
                | BC2_SRGB_BLOCK
                | BC3_UNORM_BLOCK
                | BC3_SRGB_BLOCK
                | BC4_UNORM_BLOCK
                | BC4_SNORM_BLOCK
                | BC5_UNORM_BLOCK
                | BC5_SNORM_BLOCK
                | BC6H_UFLOAT_BLOCK
                | BC6H_SFLOAT_BLOCK
                | BC7_UNORM_BLOCK
                | BC7_SRGB_BLOCK
        )
    }

    #[must_use]
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM
                | TextureFormat::D24_UNORM_S8_UINT
                | TextureFormat::D32_SFLOAT
                | TextureFormat::D32_SFLOAT_S8_UINT
        )
    }
}

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexType {
    U16,
    #[default]
    U32,
}

impl IndexType {
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}
