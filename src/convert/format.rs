use raylink_render::TextureFormat;

use crate::external::Format;

/// Maps every external format onto its internal counterpart.
#[must_use]
pub fn to_texture_format(format: Format) -> TextureFormat {
    match format {
        Format::Undefined => TextureFormat::UNDEFINED,
        Format::R8Uint => TextureFormat::R8_UINT,
        Format::R8Sint => TextureFormat::R8_SINT,
        Format::R8Unorm => TextureFormat::R8_UNORM,
        Format::R8Snorm => TextureFormat::R8_SNORM,
        Format::R8G8Uint => TextureFormat::R8G8_UINT,
        Format::R8G8Sint => TextureFormat::R8G8_SINT,
        Format::R8G8Unorm => TextureFormat::R8G8_UNORM,
        Format::R8G8Snorm => TextureFormat::R8G8_SNORM,
        Format::R16Uint => TextureFormat::R16_UINT,
        Format::R16Sint => TextureFormat::R16_SINT,
        Format::R16Unorm => TextureFormat::R16_UNORM,
        Format::R16Snorm => TextureFormat::R16_SNORM,
        Format::R16Sfloat => TextureFormat::R16_SFLOAT,
        Format::B4G4R4A4UnormPack16 => TextureFormat::B4G4R4A4_UNORM_PACK16,
        Format::B5G6R5UnormPack16 => TextureFormat::B5G6R5_UNORM_PACK16,
        Format::B5G5R5A1UnormPack16 => TextureFormat::B5G5R5A1_UNORM_PACK16,
        Format::R8G8B8A8Uint => TextureFormat::R8G8B8A8_UINT,
        Format::R8G8B8A8Sint => TextureFormat::R8G8B8A8_SINT,
        Format::R8G8B8A8Unorm => TextureFormat::R8G8B8A8_UNORM,
        Format::R8G8B8A8Snorm => TextureFormat::R8G8B8A8_SNORM,
        Format::B8G8R8A8Unorm => TextureFormat::B8G8R8A8_UNORM,
        Format::R8G8B8A8Srgb => TextureFormat::R8G8B8A8_SRGB,
        Format::B8G8R8A8Srgb => TextureFormat::B8G8R8A8_SRGB,
        Format::A2B10G10R10UnormPack32 => TextureFormat::A2B10G10R10_UNORM_PACK32,
        Format::B10G11R11UfloatPack32 => TextureFormat::B10G11R11_UFLOAT_PACK32,
        Format::R16G16Uint => TextureFormat::R16G16_UINT,
        Format::R16G16Sint => TextureFormat::R16G16_SINT,
        Format::R16G16Unorm => TextureFormat::R16G16_UNORM,
        Format::R16G16Snorm => TextureFormat::R16G16_SNORM,
        Format::R16G16Sfloat => TextureFormat::R16G16_SFLOAT,
        Format::R32Uint => TextureFormat::R32_UINT,
        Format::R32Sint => TextureFormat::R32_SINT,
        Format::R32Sfloat => TextureFormat::R32_SFLOAT,
        Format::R16G16B16A16Uint => TextureFormat::R16G16B16A16_UINT,
        Format::R16G16B16A16Sint => TextureFormat::R16G16B16A16_SINT,
        Format::R16G16B16A16Sfloat => TextureFormat::R16G16B16A16_SFLOAT,
        Format::R16G16B16A16Unorm => TextureFormat::R16G16B16A16_UNORM,
        Format::R16G16B16A16Snorm => TextureFormat::R16G16B16A16_SNORM,
        Format::R32G32Uint => TextureFormat::R32G32_UINT,
        Format::R32G32Sint => TextureFormat::R32G32_SINT,
        Format::R32G32Sfloat => TextureFormat::R32G32_SFLOAT,
        Format::R32G32B32Uint => TextureFormat::R32G32B32_UINT,
        Format::R32G32B32Sint => TextureFormat::R32G32B32_SINT,
        Format::R32G32B32Sfloat => TextureFormat::R32G32B32_SFLOAT,
        Format::R32G32B32A32Uint => TextureFormat::R32G32B32A32_UINT,
        Format::R32G32B32A32Sint => TextureFormat::R32G32B32A32_SINT,
        Format::R32G32B32A32Sfloat => TextureFormat::R32G32B32A32_SFLOAT,
        Format::D16Unorm => TextureFormat::D16_UNORM,
        Format::D24UnormS8Uint => TextureFormat::D24_UNORM_S8_UINT,
        Format::D32Sfloat => TextureFormat::D32_SFLOAT,
        Format::D32SfloatS8Uint => TextureFormat::D32_SFLOAT_S8_UINT,
        Format::Bc1RgbUnormBlock => TextureFormat::BC1_RGB_UNORM_BLOCK,
        Format::Bc1RgbSrgbBlock => TextureFormat::BC1_RGB_SRGB_BLOCK,
        Format::Bc2UnormBlock => TextureFormat::BC2_UNORM_BLOCK,
        Format::Bc2SrgbBlock => TextureFormat::BC2_SRGB_BLOCK,
        Format::Bc3UnormBlock => TextureFormat::BC3_UNORM_BLOCK,
        Format::Bc3SrgbBlock => TextureFormat::BC3_SRGB_BLOCK,
        Format::Bc4UnormBlock => TextureFormat::BC4_UNORM_BLOCK,
        Format::Bc4SnormBlock => TextureFormat::BC4_SNORM_BLOCK,
        Format::Bc5UnormBlock => TextureFormat::BC5_UNORM_BLOCK,
        Format::Bc5SnormBlock => TextureFormat::BC5_SNORM_BLOCK,
        Format::Bc6hUfloatBlock => TextureFormat::BC6H_UFLOAT_BLOCK,
        Format::Bc6hSfloatBlock => TextureFormat::BC6H_SFLOAT_BLOCK,
        Format::Bc7UnormBlock => TextureFormat::BC7_UNORM_BLOCK,
        Format::Bc7SrgbBlock => TextureFormat::BC7_SRGB_BLOCK,
    }
}

/// Maps a raw format tag from the C boundary. Tags that name no format
/// become `UNDEFINED`, which image creation rejects.
#[must_use]
pub fn texture_format_from_raw(raw: u32) -> TextureFormat {
    match Format::from_raw(raw) {
        Some(format) => to_texture_format(format),
        None => {
            log::error!("unknown external format tag {raw}");
            TextureFormat::UNDEFINED
        }
    }
}
