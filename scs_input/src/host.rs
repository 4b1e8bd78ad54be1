//! Host seam: the services the simulation process provides to the plugin.
//!
//! The plugin talks to the host only through [`Host`]. The C ABI layer
//! implements it over the host's init parameters; tests implement it
//! with a recording mock.

use crate::error::RegistrationError;
use crate::lifecycle::DeviceContext;
use scs_common::schema::InputSchema;
use std::ptr::NonNull;

/// Severity of a message written to the host log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    /// Informational message.
    Message,
    /// Something unexpected, operation continues.
    Warning,
    /// Operation failed.
    Error,
}

/// Kind of input device registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Raw axes and buttons, bound by the user.
    Generic,
    /// Inputs named after host control mixes, bound automatically.
    Semantical,
}

/// Everything the host needs to register the device.
///
/// `context` is handed back to the per-frame callback. It points into an
/// allocation owned by [`PluginLifecycle`](crate::PluginLifecycle) that
/// outlives the registration.
#[derive(Debug)]
pub struct DeviceDescriptor<'a> {
    /// Device identifier.
    pub name: &'a str,
    /// Name shown in the host's UI.
    pub display_name: &'a str,
    /// Device kind; always semantical for this plugin.
    pub kind: DeviceKind,
    /// Ordered inputs.
    pub schema: &'a InputSchema,
    /// Opaque per-device callback context.
    pub context: NonNull<DeviceContext>,
}

/// Services provided by the host process.
pub trait Host {
    /// Write a line to the host log.
    fn log(&self, severity: LogSeverity, message: &str);

    /// Register an input device.
    ///
    /// # Errors
    ///
    /// `RegistrationError` if the host declines the descriptor.
    fn register_device(&self, device: &DeviceDescriptor<'_>) -> Result<(), RegistrationError>;
}
