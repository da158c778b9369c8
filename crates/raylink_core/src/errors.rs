//! Error Types
//!
//! This module defines the error types shared by every Raylink crate.
//!
//! # Overview
//!
//! Two layers describe a failure:
//!
//! - [`ApiError`] is the rich Rust error, carrying context such as the
//!   offending handle or option key.
//! - [`ErrorCode`] is the flat discriminant handed back across the C
//!   boundary. Every [`ApiError`] maps onto exactly one code through
//!   [`ApiError::code`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use raylink_core::errors::{ApiError, Result};
//!
//! fn create(hash: u64) -> Result<()> {
//!     if hash == 0 {
//!         return Err(ApiError::ZeroHandle("mesh"));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result code returned by every entry point of the C interface.
///
/// `Success` is always `0`. The numbering is part of the ABI and must not
/// be reordered.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success = 0,
    GeneralFailure = 1,
    InvalidArguments = 3,
    AlreadyExists = 5,
    DeviceNotRegistered = 7,
    IncompatibleVersion = 8,
    InvalidHashOrHandle = 9,
    InvalidInputData = 10,
    NotInitialized = 11,
}

impl ErrorCode {
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}

/// The main error type of the API layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    // ========================================================================
    // Argument Validation
    // ========================================================================
    /// A required struct was missing or malformed.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A struct carried an unexpected type tag.
    #[error("Unexpected struct type {found}, expected {expected}")]
    StructTypeMismatch { expected: u32, found: u32 },

    /// A raw enum value does not name any variant.
    #[error("Invalid value {value} for enum {name}")]
    InvalidEnum { name: &'static str, value: i64 },

    /// Payload bytes were empty or missing.
    #[error("Invalid input data: {0}")]
    InvalidInputData(String),

    // ========================================================================
    // Handles & Registries
    // ========================================================================
    /// A zero handle was supplied where a live one is required.
    #[error("Zero is not a valid {0} handle")]
    ZeroHandle(&'static str),

    /// The handle does not refer to a live resource.
    #[error("Unknown {kind} handle {handle:#018x}")]
    UnknownHandle { kind: &'static str, handle: u64 },

    /// The name used to key an image is empty.
    #[error("Image name must not be empty")]
    EmptyImageName,

    /// A resource with this key is already registered.
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: String },

    // ========================================================================
    // Lifecycle
    // ========================================================================
    /// The API was used before a render device was attached.
    #[error("No render device registered")]
    DeviceNotRegistered,

    /// The caller was compiled against an incompatible interface version.
    #[error("Incompatible API version {requested:#x} (implementation {implemented:#x})")]
    IncompatibleVersion { requested: u64, implemented: u64 },

    /// The render thread is no longer accepting work.
    #[error("Render thread is not running")]
    NotInitialized,

    // ========================================================================
    // Configuration
    // ========================================================================
    /// No option is registered under this key.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// The option exists but the value could not be parsed.
    #[error("Invalid value '{value}' for option {key}")]
    InvalidOptionValue { key: String, value: String },

    // ========================================================================
    // Backend
    // ========================================================================
    /// A device or loader collaborator failed.
    #[error("Backend failure: {0}")]
    Backend(String),

    /// I/O error while reading configuration.
    #[error("IO error: {0}")]
    Io(String),
}

impl ApiError {
    /// Collapses the error into the code reported across the C boundary.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidArguments(_)
            | ApiError::StructTypeMismatch { .. }
            | ApiError::InvalidEnum { .. }
            | ApiError::InvalidOptionValue { .. } => ErrorCode::InvalidArguments,
            ApiError::InvalidInputData(_) => ErrorCode::InvalidInputData,
            ApiError::ZeroHandle(_) | ApiError::UnknownHandle { .. } | ApiError::EmptyImageName => {
                ErrorCode::InvalidHashOrHandle
            }
            ApiError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            ApiError::DeviceNotRegistered => ErrorCode::DeviceNotRegistered,
            ApiError::IncompatibleVersion { .. } => ErrorCode::IncompatibleVersion,
            ApiError::NotInitialized => ErrorCode::NotInitialized,
            ApiError::UnknownOption(_) | ApiError::Backend(_) | ApiError::Io(_) => ErrorCode::GeneralFailure,
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidArguments(msg.into())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

impl From<ApiError> for ErrorCode {
    fn from(err: ApiError) -> Self {
        err.code()
    }
}

/// Alias for `Result<T, ApiError>`.
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Converts a `Result` into the code reported to C callers.
pub fn to_code<T>(result: &Result<T>) -> ErrorCode {
    match result {
        Ok(_) => ErrorCode::Success,
        Err(err) => err.code(),
    }
}
