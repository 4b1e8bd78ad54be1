//! Error types for plugin initialization and device registration.

use scs_common::config::ConfigError;
use scs_shared_memory::RegionError;
use thiserror::Error;

/// The host declined the device descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The host returned a non-success result code.
    #[error("Host rejected device registration (result {code})")]
    Rejected {
        /// Host result code.
        code: i32,
    },

    /// The host did not provide a registration entry point.
    #[error("Host provides no device registration entry point")]
    Unavailable,
}

/// Errors raised by [`PluginLifecycle::initialize`](crate::PluginLifecycle::initialize).
///
/// Every variant is converted into a host result code at the C boundary;
/// none of them ever unwinds into the host.
#[derive(Debug, Error)]
pub enum InitError {
    /// The host speaks an input API version this plugin does not.
    #[error("Unsupported input API version {version:#010x}")]
    UnsupportedProtocolVersion {
        /// Version offered by the host.
        version: u32,
    },

    /// The configuration or schema failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The region could not be created, sized or mapped.
    #[error("Failed to init shm: {0}")]
    SharedMemoryFailure(#[from] RegionError),

    /// The region is smaller than the schema's layout.
    #[error("Region holds {actual} bytes but the schema needs {expected}")]
    LayoutMismatch {
        /// Bytes required by the schema.
        expected: usize,
        /// Bytes available in the region.
        actual: usize,
    },

    /// The host declined the device.
    #[error("Unable to register device: {0}")]
    RegistrationFailure(#[from] RegistrationError),
}

/// Result type for plugin initialization.
pub type InitResult<T> = Result<T, InitError>;
