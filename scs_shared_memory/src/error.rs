//! Error types for shared memory region operations

use thiserror::Error;

/// Errors that can occur during shared memory region operations
#[derive(Error, Debug)]
pub enum RegionError {
    /// Requested size cannot back a region
    #[error("Invalid region size: {size} bytes")]
    InvalidSize {
        /// Attempted size in bytes
        size: usize,
    },

    /// Region name cannot be used as an OS object name
    #[error("Invalid region name: {name:?}")]
    InvalidName {
        /// Offending name
        name: String,
    },

    /// The OS primitive backing the region could not be created
    #[error("Failed to create region {name}: {source}")]
    Create {
        /// Region identity
        name: String,
        /// Source IO error
        source: std::io::Error,
    },

    /// The backing object could not be sized and zero-filled
    #[error("Failed to resize region {name}: {source}")]
    Resize {
        /// Region identity
        name: String,
        /// Source IO error
        source: std::io::Error,
    },

    /// The region could not be mapped into the address space
    #[error("Failed to map region {name}: {source}")]
    Map {
        /// Region identity
        name: String,
        /// Source IO error
        source: std::io::Error,
    },

    /// No region exists under this identity
    #[error("Region not found: {name}")]
    NotFound {
        /// Region identity
        name: String,
    },

    /// An existing region is smaller than the layout requires
    #[error("Region {name} is {actual} bytes, expected at least {expected}")]
    TooSmall {
        /// Region identity
        name: String,
        /// Required size in bytes
        expected: usize,
        /// Actual size in bytes
        actual: usize,
    },

    /// A read past the end of the region
    #[error("Read of {len} bytes at offset {offset} exceeds region size {size}")]
    OutOfBounds {
        /// Read offset
        offset: usize,
        /// Read length
        len: usize,
        /// Region size
        size: usize,
    },

    /// The region has already been released
    #[error("Region already released")]
    Released,

    /// IO error
    #[error("IO error: {source}")]
    Io {
        /// Source IO error
        #[from]
        source: std::io::Error,
    },
}

/// Result type for shared memory region operations
pub type RegionResult<T> = Result<T, RegionError>;
