//! Caller-issued resource handles.
//!
//! Handles are opaque 64-bit values chosen by the caller, usually a
//! content hash. The renderer never generates them and keeps its own
//! internal keys on the render thread, so the two identifier spaces never
//! mix. Zero is reserved and never names a live resource.

use std::fmt;

use crate::errors::ApiError;

/// Key type stored in a [`HandleRegistry`](crate::registry::HandleRegistry).
pub trait RegistryKey: Clone + Eq + std::hash::Hash + fmt::Debug {
    /// Human readable resource kind, used in error messages.
    const KIND: &'static str;

    /// The reserved value that can never be registered.
    fn is_null(&self) -> bool;

    fn describe(&self) -> String {
        format!("{self:?}")
    }

    /// Error reported when the null key is supplied.
    fn null_error() -> ApiError {
        ApiError::ZeroHandle(Self::KIND)
    }
}

macro_rules! external_handles {
    ($($(#[$meta:meta])* $name:ident => $kind:literal;)*) => {
        $(
            $(#[$meta])*
            #[repr(transparent)]
            #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
            pub struct $name(pub u64);

            impl $name {
                pub const NULL: Self = Self(0);

                #[inline]
                #[must_use]
                pub const fn raw(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $name {
                #[inline]
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl From<$name> for u64 {
                #[inline]
                fn from(handle: $name) -> Self {
                    handle.0
                }
            }

            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!(stringify!($name), "({:#018x})"), self.0)
                }
            }

            impl RegistryKey for $name {
                const KIND: &'static str = $kind;

                #[inline]
                fn is_null(&self) -> bool {
                    self.0 == 0
                }
            }
        )*
    };
}

external_handles! {
    /// Identifies a material created through the API.
    MaterialHandle => "material";
    /// Identifies a mesh created through the API.
    MeshHandle => "mesh";
    /// Identifies a light created through the API.
    LightHandle => "light";
}

/// User-uploaded images are keyed by the path-like name they were created
/// with, which is also how materials refer to them.
impl RegistryKey for String {
    const KIND: &'static str = "image";

    fn is_null(&self) -> bool {
        self.is_empty()
    }

    fn describe(&self) -> String {
        self.clone()
    }

    fn null_error() -> ApiError {
        ApiError::EmptyImageName
    }
}
