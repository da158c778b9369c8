#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! # Raylink
//!
//! Exposes a ray-traced renderer to host applications through a versioned
//! C function table.
//!
//! Calls are validated and translated on the caller's thread, then
//! enqueued as units that run in order on a dedicated render thread.
//!
//! ## Layers
//!
//! - [`external`]: the data model callers describe resources with.
//! - [`convert`]: stateless value mappings onto renderer types.
//! - [`translate`]: whole-struct translation into materials, lights,
//!   staged meshes and draw states.
//! - [`api`]: the safe [`Runtime`] implementing every entry point.
//! - [`capi`]: the `extern "C"` shim and [`capi::Interface`] table.

pub mod api;
pub mod capi;
pub mod convert;
pub mod external;
pub mod translate;

pub use api::{RenderBackend, Runtime, RuntimeSettings, init_logging};
pub use raylink_core::errors::{ApiError, ErrorCode, Result};
pub use raylink_core::version::COMPILED_VERSION;
pub use raylink_core::{LightHandle, MaterialHandle, MeshHandle, OptionRegistry, OptionValue};
