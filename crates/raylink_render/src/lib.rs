//! Raylink Render
//!
//! The render-thread half of Raylink. It owns everything the caller never
//! touches directly:
//!
//! - [`device`] / [`commands`]: the GPU seam and the bundled headless device.
//! - [`textures`]: asset lookup and texture residency.
//! - [`material`], [`geometry`], [`light`], [`camera`], [`draw`]: the
//!   internal scene representation produced by the translators.
//! - [`scene`] / [`context`]: render-side registries and the context every
//!   submission unit runs against.
//! - [`picking`]: object picking and highlight requests.
//! - [`queue`]: the deferred submission queue and the render thread.

mod macros;

pub mod camera;
pub mod commands;
pub mod context;
pub mod device;
pub mod draw;
pub mod format;
pub mod geometry;
pub mod light;
pub mod material;
pub mod picking;
pub mod queue;
pub mod scene;
pub mod textures;

pub use camera::{CameraManager, CameraType, ExternalCamera};
pub use context::RenderContext;
pub use device::{Device, HeadlessDevice};
pub use format::{IndexType, TextureFormat};
pub use queue::{QueueStatsSnapshot, RenderThread, SubmissionUnit, Submitter};
pub use scene::SceneState;
pub use textures::{AssetLocator, TextureLoader, TextureRef};
