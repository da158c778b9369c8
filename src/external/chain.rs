//! Extension chains.
//!
//! A base struct carries zero or more typed extension blocks. Lookup is a
//! linear scan comparing the block tag with the tag the requested type is
//! registered under; the tag-to-type table lives in the
//! `extension_blocks!` invocation below.

use raylink_render::raw_enum;
use smallvec::SmallVec;

use super::light::{
    LightInfoCylinderExt, LightInfoDiskExt, LightInfoDistantExt, LightInfoDomeExt, LightInfoRectExt,
    LightInfoSphereExt, LightInfoUsdExt,
};
use super::material::{
    MaterialInfoOpaqueExt, MaterialInfoOpaqueSubsurfaceExt, MaterialInfoPortalExt, MaterialInfoTranslucentExt,
};
use super::scene::{
    CameraInfoParameterizedExt, InstanceInfoBlendExt, InstanceInfoBoneTransformsExt, InstanceInfoObjectPickingExt,
};

raw_enum! {
    /// Tag identifying every struct that can appear in a chain.
    pub enum StructType: u32 {
        None = 0,
        InitializeLibraryInfo = 1,
        MaterialInfo = 2,
        MaterialInfoPortalExt = 3,
        MaterialInfoTranslucentExt = 4,
        MaterialInfoOpaqueExt = 5,
        LightInfo = 6,
        LightInfoDistantExt = 7,
        LightInfoCylinderExt = 8,
        LightInfoDiskExt = 9,
        LightInfoRectExt = 10,
        LightInfoSphereExt = 11,
        MeshInfo = 12,
        InstanceInfo = 13,
        InstanceInfoBoneTransformsExt = 14,
        InstanceInfoBlendExt = 15,
        CameraInfo = 16,
        CameraInfoParameterizedExt = 17,
        MaterialInfoOpaqueSubsurfaceExt = 18,
        InstanceInfoObjectPickingExt = 19,
        LightInfoDomeExt = 20,
        LightInfoUsdExt = 21,
        StartupInfo = 22,
        PresentInfo = 23,
        CreateImageInfo = 24,
        UiInstanceInfo = 25,
    }
}

/// A struct that can be looked up in an [`ExtensionChain`].
pub trait Extension<'a>: Sized {
    const STRUCT_TYPE: StructType;

    fn from_block<'b>(block: &'b ExtensionBlock<'a>) -> Option<&'b Self>;
}

macro_rules! extension_blocks {
    (<$lt:lifetime> $($variant:ident($ty:ty)),* $(,)?) => {
        /// One extension struct of a chain.
        #[derive(Debug, Clone)]
        pub enum ExtensionBlock<$lt> {
            $($variant($ty),)*
        }

        impl<$lt> ExtensionBlock<$lt> {
            #[must_use]
            pub fn struct_type(&self) -> StructType {
                match self {
                    $(ExtensionBlock::$variant(_) => StructType::$variant,)*
                }
            }
        }

        $(
            impl<$lt> Extension<$lt> for $ty {
                const STRUCT_TYPE: StructType = StructType::$variant;

                fn from_block<'b>(block: &'b ExtensionBlock<$lt>) -> Option<&'b Self> {
                    match block {
                        ExtensionBlock::$variant(ext) => Some(ext),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl<$lt> From<$ty> for ExtensionBlock<$lt> {
                fn from(ext: $ty) -> Self {
                    ExtensionBlock::$variant(ext)
                }
            }
        )*
    };
}

extension_blocks! {<'a>
    MaterialInfoPortalExt(MaterialInfoPortalExt),
    MaterialInfoTranslucentExt(MaterialInfoTranslucentExt<'a>),
    MaterialInfoOpaqueExt(MaterialInfoOpaqueExt<'a>),
    MaterialInfoOpaqueSubsurfaceExt(MaterialInfoOpaqueSubsurfaceExt<'a>),
    LightInfoDistantExt(LightInfoDistantExt),
    LightInfoCylinderExt(LightInfoCylinderExt),
    LightInfoDiskExt(LightInfoDiskExt),
    LightInfoRectExt(LightInfoRectExt),
    LightInfoSphereExt(LightInfoSphereExt),
    LightInfoDomeExt(LightInfoDomeExt<'a>),
    LightInfoUsdExt(LightInfoUsdExt),
    InstanceInfoBoneTransformsExt(InstanceInfoBoneTransformsExt<'a>),
    InstanceInfoBlendExt(InstanceInfoBlendExt),
    InstanceInfoObjectPickingExt(InstanceInfoObjectPickingExt),
    CameraInfoParameterizedExt(CameraInfoParameterizedExt),
}

/// The extensions attached to a base struct, in chain order.
#[derive(Debug, Clone, Default)]
pub struct ExtensionChain<'a> {
    blocks: SmallVec<[ExtensionBlock<'a>; 2]>,
}

impl<'a> ExtensionChain<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    #[must_use]
    pub fn with(mut self, block: impl Into<ExtensionBlock<'a>>) -> Self {
        self.push(block);
        self
    }

    pub fn push(&mut self, block: impl Into<ExtensionBlock<'a>>) {
        self.blocks.push(block.into());
    }

    /// First extension of type `T`, if any.
    #[must_use]
    pub fn find<T: Extension<'a>>(&self) -> Option<&T> {
        self.blocks
            .iter()
            .filter(|block| block.struct_type() == T::STRUCT_TYPE)
            .find_map(T::from_block)
    }

    #[must_use]
    pub fn contains(&self, struct_type: StructType) -> bool {
        self.blocks.iter().any(|block| block.struct_type() == struct_type)
    }

    /// How many of `family` are present. Used to enforce mutually exclusive
    /// extension families.
    #[must_use]
    pub fn count_of(&self, family: &[StructType]) -> usize {
        family.iter().filter(|tag| self.contains(**tag)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtensionBlock<'a>> {
        self.blocks.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<'a> FromIterator<ExtensionBlock<'a>> for ExtensionChain<'a> {
    fn from_iter<I: IntoIterator<Item = ExtensionBlock<'a>>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::Float3D;

    #[test]
    fn find_returns_first_match() {
        let chain = ExtensionChain::new()
            .with(InstanceInfoObjectPickingExt { object_picking_value: 1 })
            .with(MaterialInfoPortalExt {
                ray_portal_index: 3,
                rotation_speed: 0.5,
            })
            .with(InstanceInfoObjectPickingExt { object_picking_value: 2 });
        let picking = chain.find::<InstanceInfoObjectPickingExt>().unwrap();
        assert_eq!(picking.object_picking_value, 1);
        assert_eq!(chain.find::<MaterialInfoPortalExt>().unwrap().ray_portal_index, 3);
        assert!(chain.find::<LightInfoSphereExt>().is_none());
    }

    #[test]
    fn family_count() {
        let chain = ExtensionChain::new()
            .with(LightInfoDistantExt {
                direction: Float3D::new(0.0, -1.0, 0.0),
                angular_diameter_degrees: 0.5,
            })
            .with(LightInfoCylinderExt::default());
        let family = [
            StructType::LightInfoSphereExt,
            StructType::LightInfoDistantExt,
            StructType::LightInfoCylinderExt,
        ];
        assert_eq!(chain.count_of(&family), 2);
    }

    #[test]
    fn unknown_tags_do_not_decode() {
        assert_eq!(StructType::from_raw(21), Some(StructType::LightInfoUsdExt));
        assert_eq!(StructType::from_raw(999), None);
    }
}
