//! Option and configuration tests
//!
//! Tests for:
//! - Option defaults and typed access
//! - Typed set and text parsing
//! - Config text and config files
//! - Startup flags followed by the config file
//! - Version compatibility
//! - Handle registries

use std::path::PathBuf;

use raylink::api::{Runtime, RuntimeSettings};
use raylink::external::StartupInfo;
use raylink::{ErrorCode, MeshHandle, OptionRegistry, OptionValue};
use raylink_core::HandleRegistry;
use raylink_core::options::keys;
use raylink_core::version::{COMPILED_VERSION, is_version_compatible, make_version, version_minor};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn temp_config(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("raylink-{}-{name}.conf", std::process::id()));
    std::fs::write(&path, text).unwrap();
    path
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn defaults_are_declared() {
    let options = OptionRegistry::with_defaults();
    assert_eq!(options.get_bool(keys::BLOOM_ENABLE), Some(true));
    assert!(approx_eq(options.get_float(keys::BLOOM_BURN_INTENSITY).unwrap(), 1.0));
    assert!(approx_eq(options.get_float(keys::BLOOM_LUMINANCE_THRESHOLD).unwrap(), 0.25));
    assert_eq!(options.get_bool(keys::ENABLE_NEAR_PLANE_OVERRIDE), Some(false));
    assert_eq!(options.get_int(keys::FALLBACK_LIGHT_MODE), Some(1));
    assert_eq!(options.get_bool(keys::DESATURATE_OTHERS_ON_HIGHLIGHT), Some(true));
    assert_eq!(options.get_bool(keys::ALLOW_SRGB_CONVERSION_FOR_OUTPUT), Some(true));
    assert!(options.bloom().is_enabled());
}

#[test]
fn typed_set_checks_the_declared_type() {
    let options = OptionRegistry::with_defaults();
    options.set(keys::FALLBACK_LIGHT_MODE, OptionValue::Int(2)).unwrap();
    assert_eq!(options.get_int(keys::FALLBACK_LIGHT_MODE), Some(2));

    let err = options.set(keys::FALLBACK_LIGHT_MODE, OptionValue::Bool(true)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
    let err = options.set("rtx.missing", OptionValue::Int(0)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::GeneralFailure);
}

#[test]
fn text_values_follow_the_option_type() {
    let options = OptionRegistry::with_defaults();
    options.set_from_str(keys::BLOOM_ENABLE, "FALSE").unwrap();
    assert_eq!(options.get_bool(keys::BLOOM_ENABLE), Some(false));
    options.set_from_str(keys::BLOOM_ENABLE, "1").unwrap();
    assert_eq!(options.get_bool(keys::BLOOM_ENABLE), Some(true));

    options.set_from_str(keys::BLOOM_BURN_INTENSITY, " 0.5 ").unwrap();
    assert!(approx_eq(options.bloom().burn_intensity, 0.5));

    let err = options.set_from_str(keys::BLOOM_BURN_INTENSITY, "inf").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
    let err = options.set_from_str(keys::FALLBACK_LIGHT_MODE, "1.5").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArguments);
}

#[test]
fn reset_restores_defaults() {
    let options = OptionRegistry::with_defaults();
    options.set_from_str(keys::BLOOM_ENABLE, "false").unwrap();
    options.set_from_str(keys::FALLBACK_LIGHT_MODE, "2").unwrap();
    options.reset_all();
    assert_eq!(options.get_bool(keys::BLOOM_ENABLE), Some(true));
    assert_eq!(options.get_int(keys::FALLBACK_LIGHT_MODE), Some(1));
}

#[test]
fn zero_burn_intensity_disables_bloom() {
    let options = OptionRegistry::with_defaults();
    options.set_from_str(keys::BLOOM_BURN_INTENSITY, "0").unwrap();
    assert!(!options.bloom().is_enabled());
}

// ============================================================================
// Config files
// ============================================================================

#[test]
fn config_text_counts_applied_lines() {
    let options = OptionRegistry::with_defaults();
    let text = "\
# bloom
rtx.bloom.enable = false
rtx.bloom.luminanceThreshold = 0.5 # trailing comment
rtx.unknown = 3
not a pair
rtx.fallbackLightMode = nope
";
    assert_eq!(options.apply_config_str(text), 2);
    assert_eq!(options.get_bool(keys::BLOOM_ENABLE), Some(false));
    assert!(approx_eq(options.bloom().luminance_threshold, 0.5));
    assert_eq!(options.get_int(keys::FALLBACK_LIGHT_MODE), Some(1));
}

#[test]
fn missing_config_file_is_an_error() {
    let options = OptionRegistry::with_defaults();
    let err = options
        .load_config_file(&std::env::temp_dir().join("raylink-does-not-exist.conf"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GeneralFailure);
}

#[test]
fn config_file_applies_after_startup_flags() {
    let path = temp_config("startup", "rtx.fallbackLightMode = 2\nrtx.bloom.enable = false\n");
    let runtime = Runtime::new(RuntimeSettings {
        config_file: Some(path.clone()),
        ..RuntimeSettings::default()
    });
    let info = StartupInfo {
        editor_mode_enabled: true,
        ..StartupInfo::default()
    };
    runtime.startup(&info).unwrap();

    let options = runtime.options();
    assert_eq!(options.get_int(keys::FALLBACK_LIGHT_MODE), Some(2));
    assert_eq!(options.get_bool(keys::DESATURATE_OTHERS_ON_HIGHLIGHT), Some(false));
    assert!(!options.bloom().enable);

    runtime.shutdown().unwrap();
    std::fs::remove_file(path).unwrap();
}

#[test]
fn unreadable_config_file_does_not_block_startup() {
    let runtime = Runtime::new(RuntimeSettings {
        config_file: Some(std::env::temp_dir().join("raylink-missing-startup.conf")),
        ..RuntimeSettings::default()
    });
    runtime.startup(&StartupInfo::default()).unwrap();
    assert!(runtime.is_running());
}

// ============================================================================
// Versions
// ============================================================================

#[test]
fn compiled_version_matches_the_package() {
    assert_eq!(COMPILED_VERSION, make_version(0, 5, 0));
    assert_eq!(version_minor(COMPILED_VERSION), 5);
    assert!(is_version_compatible(COMPILED_VERSION, COMPILED_VERSION));
}

#[test]
fn development_versions_need_equal_minors() {
    assert!(is_version_compatible(make_version(0, 5, 7), COMPILED_VERSION));
    assert!(!is_version_compatible(make_version(0, 4, 0), COMPILED_VERSION));
    assert!(!is_version_compatible(make_version(1, 5, 0), COMPILED_VERSION));
}

// ============================================================================
// Registries
// ============================================================================

#[test]
fn registry_create_destroy_symmetry() {
    let mut registry = HandleRegistry::<MeshHandle, &str>::new();
    registry.create(MeshHandle(3), "triangle").unwrap();
    assert_eq!(
        registry.create(MeshHandle(3), "again").unwrap_err().code(),
        ErrorCode::AlreadyExists
    );
    assert_eq!(registry.require(&MeshHandle(3)).copied().unwrap(), "triangle");

    assert_eq!(registry.destroy(&MeshHandle(3)), Some("triangle"));
    assert_eq!(registry.destroy(&MeshHandle(3)), None);
    assert!(registry.is_empty());
    registry.create(MeshHandle(3), "recreated").unwrap();
}

#[test]
fn registry_rejects_null_keys() {
    let mut registry = HandleRegistry::<MeshHandle, u32>::new();
    assert_eq!(
        registry.create(MeshHandle(0), 1).unwrap_err().code(),
        ErrorCode::InvalidHashOrHandle
    );

    let mut images = HandleRegistry::<String, u32>::new();
    assert_eq!(
        images.create(String::new(), 1).unwrap_err().code(),
        ErrorCode::InvalidHashOrHandle
    );
    images.create("ui/font".to_string(), 7).unwrap();
    assert!(images.contains(&"ui/font".to_string()));
}
