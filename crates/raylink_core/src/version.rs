//! Interface versioning.
//!
//! A version is packed into a `u64` as `major << 48 | minor << 16 | patch`.

pub const VERSION_MAJOR: u64 = 0;
pub const VERSION_MINOR: u64 = 5;
pub const VERSION_PATCH: u64 = 0;

/// The version this binary implements.
pub const COMPILED_VERSION: u64 = make_version(VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH);

#[inline]
#[must_use]
pub const fn make_version(major: u64, minor: u64, patch: u64) -> u64 {
    (major << 48) | (minor << 16) | patch
}

#[inline]
#[must_use]
pub const fn version_major(version: u64) -> u64 {
    (version >> 48) & 0xFFFF
}

#[inline]
#[must_use]
pub const fn version_minor(version: u64) -> u64 {
    (version >> 16) & 0xFFFF_FFFF
}

#[inline]
#[must_use]
pub const fn version_patch(version: u64) -> u64 {
    version & 0xFFFF
}

/// Checks a caller version against `implemented`.
///
/// While both majors are zero every minor bump is breaking, so minors
/// must match exactly. Afterwards majors must match and the caller may
/// not request a newer minor than the binary provides.
#[must_use]
pub fn is_version_compatible(requested: u64, implemented: u64) -> bool {
    let development = version_major(requested) == 0 && version_major(implemented) == 0;
    if development {
        return version_minor(requested) == version_minor(implemented);
    }
    version_major(requested) == version_major(implemented)
        && version_minor(requested) <= version_minor(implemented)
}
