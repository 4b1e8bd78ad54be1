//! # SCS Input
//!
//! Input device plugin for SCS simulators. The plugin registers one
//! semantical device whose values an external controller writes into a
//! named shared memory region; every frame the host polls the device and
//! receives one clamped value per input, in schema order.
//!
//! ## Modules
//!
//! | Module        | Purpose                                              |
//! |---------------|------------------------------------------------------|
//! | `enumerator`  | Frame cursor and per-poll decoding                   |
//! | `lifecycle`   | Region creation, registration and shutdown           |
//! | `host`        | Host services trait (log, register device)           |
//! | `ffi`         | Exported `scs_input_init` / `scs_input_shutdown`     |
//! | `sdk`         | `#[repr(C)]` mirrors of the host SDK types           |
//!
//! ## Configuration
//!
//! The plugin reads an optional TOML file named by `SCS_INPUT_CONFIG`.
//! Without one it exposes the lane assist layout over `SCSControls`.

#![deny(missing_docs)]

pub mod enumerator;
pub mod error;
pub mod ffi;
pub mod host;
pub mod lifecycle;
pub mod sdk;

pub use enumerator::{EventFlags, FrameCursor, InputEnumerator, InputEvent, InputPoll, InputSource};
pub use error::{InitError, InitResult, RegistrationError};
pub use host::{DeviceDescriptor, DeviceKind, Host, LogSeverity};
pub use lifecycle::{DeviceContext, DeviceHandle, PluginLifecycle};

use scs_common::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber at `level`, unless `RUST_LOG` overrides it.
///
/// The host process may already own a global subscriber, and the plugin may
/// be initialized more than once; both cases are ignored.
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
