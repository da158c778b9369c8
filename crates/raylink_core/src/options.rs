//! Runtime Options
//!
//! A string-keyed registry of typed renderer options, modelled on the
//! dotted `rtx.*` keys used by the renderer's configuration files.
//!
//! The registry is shared between the API surface (which writes through
//! `SetConfigVariable` and startup flags) and the render thread (which
//! reads values while executing units), so it owns its own read-write lock
//! in the same way as the asset storages do.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raylink_core::options::{OptionRegistry, keys};
//!
//! let options = OptionRegistry::with_defaults();
//! options.set_from_str(keys::BLOOM_ENABLE, "false")?;
//! assert_eq!(options.get_bool(keys::BLOOM_ENABLE), Some(false));
//! ```
//!
//! # Config Files
//!
//! Files hold one `key = value` pair per line. Text after `#` is ignored.
//! Unknown keys are logged and skipped so that a config written for a
//! newer build still loads.

use std::fmt;
use std::path::Path;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{ApiError, Result};

/// Well-known option keys.
pub mod keys {
    pub const BLOOM_ENABLE: &str = "rtx.bloom.enable";
    pub const BLOOM_BURN_INTENSITY: &str = "rtx.bloom.burnIntensity";
    pub const BLOOM_LUMINANCE_THRESHOLD: &str = "rtx.bloom.luminanceThreshold";
    pub const ENABLE_NEAR_PLANE_OVERRIDE: &str = "rtx.enableNearPlaneOverride";
    pub const FALLBACK_LIGHT_MODE: &str = "rtx.fallbackLightMode";
    pub const DESATURATE_OTHERS_ON_HIGHLIGHT: &str = "rtx.postfx.desaturateOthersOnHighlight";
    pub const ALLOW_SRGB_CONVERSION_FOR_OUTPUT: &str = "rtx.allowSrgbConversionForOutput";
}

// ============================================================================
// Values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    String(String),
}

impl OptionValue {
    /// Parses `text` into a value of the same type as `self`.
    fn parse_like(&self, text: &str) -> Option<OptionValue> {
        let text = text.trim();
        match self {
            OptionValue::Bool(_) => parse_bool(text).map(OptionValue::Bool),
            OptionValue::Int(_) => text.parse().ok().map(OptionValue::Int),
            OptionValue::Float(_) => text
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(OptionValue::Float),
            OptionValue::String(_) => Some(OptionValue::String(text.to_owned())),
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::String(_) => "string",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", if *v { "True" } else { "False" }),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::String(v) => f.write_str(v),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") || text == "1" {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") || text == "0" {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct OptionEntry {
    pub value: OptionValue,
    pub default: OptionValue,
    pub description: &'static str,
}

// ============================================================================
// Registry
// ============================================================================

pub struct OptionRegistry {
    inner: RwLock<FxHashMap<String, OptionEntry>>,
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl OptionRegistry {
    /// An empty registry with no options declared.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(FxHashMap::default()),
        }
    }

    /// A registry holding every option the renderer understands.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        registry.declare(
            keys::BLOOM_ENABLE,
            OptionValue::Bool(true),
            "Enable bloom - glowing halos around intense, bright areas.",
        );
        registry.declare(
            keys::BLOOM_BURN_INTENSITY,
            OptionValue::Float(1.0),
            "Amount of bloom to add to the final image.",
        );
        registry.declare(
            keys::BLOOM_LUMINANCE_THRESHOLD,
            OptionValue::Float(0.25),
            "Adjust the bloom threshold to suppress blooming of the dim areas.",
        );
        registry.declare(
            keys::ENABLE_NEAR_PLANE_OVERRIDE,
            OptionValue::Bool(false),
            "Override the near plane of the main camera.",
        );
        registry.declare(
            keys::FALLBACK_LIGHT_MODE,
            OptionValue::Int(1),
            "When to add a fallback light: 0 never, 1 when no lights exist, 2 always.",
        );
        registry.declare(
            keys::DESATURATE_OTHERS_ON_HIGHLIGHT,
            OptionValue::Bool(true),
            "Desaturate objects that are not highlighted.",
        );
        registry.declare(
            keys::ALLOW_SRGB_CONVERSION_FOR_OUTPUT,
            OptionValue::Bool(true),
            "Convert the final output to sRGB when the swapchain expects it.",
        );
        registry
    }

    /// Declares an option. Re-declaring a key resets it to `default`.
    pub fn declare(&self, key: &str, default: OptionValue, description: &'static str) {
        self.inner.write().insert(
            key.to_owned(),
            OptionEntry {
                value: default.clone(),
                default,
                description,
            },
        );
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<OptionValue> {
        self.inner.read().get(key).map(|e| e.value.clone())
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            OptionValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            OptionValue::Float(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            OptionValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Replaces the value of a declared option. The type must match.
    pub fn set(&self, key: &str, value: OptionValue) -> Result<()> {
        let mut guard = self.inner.write();
        let entry = guard
            .get_mut(key)
            .ok_or_else(|| ApiError::UnknownOption(key.to_owned()))?;
        if std::mem::discriminant(&entry.value) != std::mem::discriminant(&value) {
            return Err(ApiError::InvalidOptionValue {
                key: key.to_owned(),
                value: value.to_string(),
            });
        }
        entry.value = value;
        Ok(())
    }

    /// Parses `text` according to the option's declared type and stores it.
    pub fn set_from_str(&self, key: &str, text: &str) -> Result<()> {
        let mut guard = self.inner.write();
        let entry = guard
            .get_mut(key)
            .ok_or_else(|| ApiError::UnknownOption(key.to_owned()))?;
        let parsed = entry
            .value
            .parse_like(text)
            .ok_or_else(|| ApiError::InvalidOptionValue {
                key: key.to_owned(),
                value: text.to_owned(),
            })?;
        log::debug!("option {key} = {parsed}");
        entry.value = parsed;
        Ok(())
    }

    /// Restores every option to its declared default.
    pub fn reset_all(&self) {
        for entry in self.inner.write().values_mut() {
            entry.value = entry.default.clone();
        }
    }

    /// Applies `key = value` lines. Returns the number of options applied.
    pub fn apply_config_str(&self, text: &str) -> usize {
        let mut applied = 0;
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("config line {}: expected `key = value`, got {line:?}", line_no + 1);
                continue;
            };
            match self.set_from_str(key.trim(), value) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("config line {}: {e}", line_no + 1),
            }
        }
        applied
    }

    pub fn load_config_file(&self, path: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(path)?;
        let applied = self.apply_config_str(&text);
        log::info!("Loaded {applied} option(s) from {}", path.display());
        Ok(applied)
    }

    /// Typed view over the bloom options.
    #[must_use]
    pub fn bloom(&self) -> BloomOptions {
        BloomOptions {
            enable: self.get_bool(keys::BLOOM_ENABLE).unwrap_or(true),
            burn_intensity: self.get_float(keys::BLOOM_BURN_INTENSITY).unwrap_or(1.0),
            luminance_threshold: self.get_float(keys::BLOOM_LUMINANCE_THRESHOLD).unwrap_or(0.25),
        }
    }
}

/// Snapshot of the `rtx.bloom.*` options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomOptions {
    pub enable: bool,
    pub burn_intensity: f32,
    pub luminance_threshold: f32,
}

impl BloomOptions {
    /// Bloom only contributes when enabled with a positive intensity.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enable && self.burn_intensity > 0.0
    }
}
