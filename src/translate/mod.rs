//! Caller-thread translation of external descriptions.
//!
//! Everything here validates its input and copies out what the renderer
//! keeps, so the caller's memory may be released as soon as the entry point
//! returns. Texture paths stay unresolved until the render thread picks the
//! result up.

mod instance;
mod light;
mod material;
mod mesh;
mod ui;

use raylink_core::errors::{ApiError, Result};

pub use instance::translate_instance;
pub use light::{blackbody_to_linear_rgb, translate_light, translate_usd_light};
pub use material::translate_material;
pub use mesh::{
    MESH_BUFFER_USAGE, StagedMesh, pack_bone_indices, packed_words_per_vertex, stage_mesh, unpack_bone_indices,
};
pub use ui::translate_ui_instance;

/// Decodes a raw enum value, reporting the enum name on failure.
pub(crate) fn checked_enum<T, R>(name: &'static str, raw: R, from_raw: impl FnOnce(R) -> Option<T>) -> Result<T>
where
    R: Copy + Into<i64>,
{
    from_raw(raw).ok_or_else(|| ApiError::InvalidEnum {
        name,
        value: raw.into(),
    })
}
