//! Value converters.
//!
//! Stateless mappings from the external data model onto the internal
//! representation. Every function here is total unless it returns a
//! `Result`.

mod format;
mod math;
mod scene;

pub use format::{texture_format_from_raw, to_texture_format};
pub use math::{
    mat4_to_matrix4, matrix4_to_mat4, to_bool, to_dvec3, to_mat4, to_path, to_vec3, with_new_viewer_position,
};
pub use scene::{
    camera_type_from_raw, category_to_camera_type, parameterized_camera, to_camera_type, to_categories,
    to_external_camera, to_light_shaping, to_output_type,
};
