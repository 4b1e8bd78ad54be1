//! Prelude module for common re-exports.
//!
//! ```rust
//! use scs_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ConfigError, ConfigLoader, DeviceConfig, LogLevel, PluginConfig, RegionConfig, SharedConfig,
};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{CONFIG_ENV_VAR, SCS_INPUT_VERSION_1_00};

// ─── Schema & Values ────────────────────────────────────────────────
pub use crate::schema::{InputDescriptor, InputSchema, SchemaError, ValueKind};
pub use crate::value::{BOOL_WIDTH, FLOAT_WIDTH, InputValue, clamp_axis};
