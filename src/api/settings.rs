use std::path::PathBuf;

/// Environment variable naming a config file, consulted when
/// [`RuntimeSettings::config_file`] is unset.
pub const CONFIG_ENV_VAR: &str = "RAYLINK_CONFIG";

/// Default name of the render thread.
pub const DEFAULT_RENDER_THREAD_NAME: &str = "raylink-render";

/// Process-level configuration of a [`Runtime`](super::Runtime).
///
/// # Example
///
/// ```rust,ignore
/// use raylink::api::{Runtime, RuntimeSettings};
///
/// let runtime = Runtime::new(RuntimeSettings {
///     config_file: Some("raylink.conf".into()),
///     asset_roots: vec!["mods/textures".into()],
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    // === Options ===
    /// File of `key = value` option lines applied at startup.
    ///
    /// `None` falls back to the file named by `RAYLINK_CONFIG`; with neither
    /// set, the built-in option defaults stay in effect. A file that cannot
    /// be read is logged and skipped.
    pub config_file: Option<PathBuf>,

    // === Render thread ===
    /// Name given to the render thread.
    pub render_thread_name: String,

    // === Assets ===
    /// Directories searched, in order, for relative texture paths when the
    /// default backend is used.
    pub asset_roots: Vec<PathBuf>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            config_file: None,
            render_thread_name: DEFAULT_RENDER_THREAD_NAME.to_string(),
            asset_roots: vec![PathBuf::from(".")],
        }
    }
}

impl RuntimeSettings {
    /// The config file to load: the explicit setting first, then the
    /// environment.
    #[must_use]
    pub fn resolved_config_file(&self) -> Option<PathBuf> {
        self.config_file.clone().or_else(|| {
            std::env::var_os(CONFIG_ENV_VAR)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
    }
}
