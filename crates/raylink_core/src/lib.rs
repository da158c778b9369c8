//! Raylink Core
//!
//! Foundation shared by the API surface and the render thread:
//!
//! - [`errors`]: the [`ApiError`] type and the flat [`ErrorCode`] returned
//!   across the C boundary.
//! - [`version`]: interface version packing and the compatibility gate.
//! - [`handle`] / [`registry`]: caller-issued handles and the registry that
//!   enforces create/destroy symmetry.
//! - [`options`]: the string-keyed option registry behind
//!   `SetConfigVariable`.

pub mod errors;
pub mod handle;
pub mod options;
pub mod registry;
pub mod version;

pub use errors::{ApiError, ErrorCode, Result};
pub use handle::{LightHandle, MaterialHandle, MeshHandle, RegistryKey};
pub use options::{BloomOptions, OptionRegistry, OptionValue};
pub use registry::HandleRegistry;
