//! Safe Rust API.
//!
//! [`Runtime`] implements every entry point of the interface table on top
//! of plain Rust types; the C ABI in [`crate::capi`] is a thin shim over it.
//!
//! ```rust,ignore
//! use raylink::api::Runtime;
//! use raylink::external::StartupInfo;
//!
//! let runtime = Runtime::default();
//! runtime.startup(&StartupInfo::default())?;
//! runtime.set_config_variable("rtx.bloom.enable", "false")?;
//! runtime.present()?;
//! runtime.shutdown()?;
//! ```

mod backend;
mod runtime;
mod settings;

pub use backend::RenderBackend;
pub use runtime::Runtime;
pub use settings::{CONFIG_ENV_VAR, DEFAULT_RENDER_THREAD_NAME, RuntimeSettings};

/// Installs the `env_logger` backend, filtered by `RUST_LOG` and defaulting
/// to `info`. Only the first call in a process has an effect.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
