//! Plugin lifecycle: region creation before registration, release at unload.
//!
//! ```text
//!  initialize(version, config, host)
//!    ├─ version check          → UnsupportedProtocolVersion (nothing touched)
//!    ├─ config + schema        → InvalidConfig
//!    ├─ create_or_open region  → SharedMemoryFailure
//!    ├─ bind enumerator        → LayoutMismatch
//!    └─ host.register_device   → RegistrationFailure (region released)
//!
//!  shutdown()   (explicit unload or abrupt detach, any number of times)
//!    └─ region.release()
//! ```

use crate::enumerator::{EventFlags, InputEnumerator, InputPoll};
use crate::error::{InitError, InitResult};
use crate::host::{DeviceDescriptor, DeviceKind, Host, LogSeverity};
use scs_common::config::PluginConfig;
use scs_common::consts::SCS_INPUT_VERSION_1_00;
use scs_shared_memory::{RegionId, SharedMemoryRegion};
use std::ptr::NonNull;

/// Per-device state reached through the host's callback context.
#[derive(Debug)]
pub struct DeviceContext {
    enumerator: InputEnumerator,
    region: SharedMemoryRegion,
}

impl DeviceContext {
    /// Report the next input of the current frame.
    #[inline]
    pub fn poll(&mut self, flags: EventFlags) -> InputPoll {
        self.enumerator.poll(flags, &self.region)
    }

    /// Enumerator bound to this device.
    pub fn enumerator(&self) -> &InputEnumerator {
        &self.enumerator
    }

    /// Region this device reads from.
    pub fn region(&self) -> &SharedMemoryRegion {
        &self.region
    }
}

/// Summary of a successfully registered device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// Device identifier.
    pub name: String,
    /// Number of inputs exposed.
    pub input_count: usize,
    /// Region size in bytes.
    pub region_size: usize,
    /// Platform identity of the region.
    pub region: String,
}

/// Process-lifetime owner of the region and the device context.
///
/// The context is a heap allocation shared with the host: the host holds
/// the same pointer as its callback context. It is only freed when a later
/// `initialize` replaces it or the lifecycle is dropped; `shutdown` just
/// releases the region, after which polls report `Exhausted`.
#[derive(Debug, Default)]
pub struct PluginLifecycle {
    context: Option<NonNull<DeviceContext>>,
}

// SAFETY: the context is only reached through `&mut self` or by the host
// callback, which the host never runs concurrently with init or shutdown.
unsafe impl Send for PluginLifecycle {}

/// Free a context allocated by `try_initialize`.
///
/// # Safety
///
/// `context` must come from `Box::into_raw` and must not be used again.
unsafe fn free_context(context: NonNull<DeviceContext>) {
    drop(unsafe { Box::from_raw(context.as_ptr()) });
}

impl PluginLifecycle {
    /// Lifecycle with nothing initialized.
    pub const fn new() -> Self {
        Self { context: None }
    }

    /// Whether a device is registered and its region is live.
    pub fn is_initialized(&self) -> bool {
        self.context
            // SAFETY: owned allocation, see `free_context`.
            .map(|ctx| unsafe { ctx.as_ref() })
            .is_some_and(|ctx| !ctx.region.is_released())
    }

    /// Live device context, if any.
    pub fn context_mut(&mut self) -> Option<&mut DeviceContext> {
        // SAFETY: owned allocation; `&mut self` excludes other borrows.
        self.context.map(|mut ctx| unsafe { ctx.as_mut() })
    }

    /// Create the region and register the device with the host.
    ///
    /// Failures are written to the host log before being returned.
    ///
    /// # Errors
    ///
    /// See [`InitError`]. On any error no device is registered and no
    /// region stays allocated.
    pub fn initialize(
        &mut self,
        version: u32,
        config: &PluginConfig,
        host: &dyn Host,
    ) -> InitResult<DeviceHandle> {
        if version != SCS_INPUT_VERSION_1_00 {
            tracing::warn!("Rejecting input API version {:#010x}", version);
            return Err(InitError::UnsupportedProtocolVersion { version });
        }

        if let Some(previous) = self.context.take() {
            tracing::warn!("Re-initializing; releasing previous device context");
            // SAFETY: taken out of `self`, nothing else frees it.
            unsafe { free_context(previous) };
        }

        let result = self.try_initialize(config, host);
        match &result {
            Ok(handle) => {
                tracing::info!(
                    "Registered device {} with {} inputs over {} ({} bytes)",
                    handle.name,
                    handle.input_count,
                    handle.region,
                    handle.region_size
                );
            }
            Err(e) => {
                tracing::error!("Initialization failed: {}", e);
                host.log(LogSeverity::Error, &e.to_string());
            }
        }
        result
    }

    fn try_initialize(&mut self, config: &PluginConfig, host: &dyn Host) -> InitResult<DeviceHandle> {
        config.validate()?;
        let schema = config.schema()?;

        let id = RegionId::from(&config.region);
        let region = SharedMemoryRegion::create_or_open(&id, schema.region_size())?;
        let enumerator = InputEnumerator::new(schema, region.size())?;

        let handle = DeviceHandle {
            name: config.device.name.clone(),
            input_count: enumerator.schema().len(),
            region_size: region.size(),
            region: region.id().to_string(),
        };

        let raw = Box::into_raw(Box::new(DeviceContext { enumerator, region }));
        // SAFETY: `Box::into_raw` never returns null.
        let context = unsafe { NonNull::new_unchecked(raw) };

        // The schema is cloned so no reference into the allocation is held
        // while the host owns a pointer to it.
        // SAFETY: freshly allocated, not yet shared.
        let schema = unsafe { context.as_ref() }.enumerator.schema().clone();
        let descriptor = DeviceDescriptor {
            name: &config.device.name,
            display_name: &config.device.display_name,
            kind: DeviceKind::Semantical,
            schema: &schema,
            context,
        };

        if let Err(e) = host.register_device(&descriptor) {
            // No retry path exists, so the region goes with the failed device.
            // SAFETY: the host declined it and never stored the pointer.
            unsafe { free_context(context) };
            return Err(e.into());
        }

        self.context = Some(context);
        Ok(handle)
    }

    /// Release the region. Safe to call repeatedly and before `initialize`.
    pub fn shutdown(&mut self) {
        if let Some(ctx) = self.context_mut() {
            if !ctx.region.is_released() {
                tracing::info!("Shutting down; releasing {}", ctx.region.id());
                ctx.region.release();
            }
        }
    }
}

impl Drop for PluginLifecycle {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            // SAFETY: owned allocation, freed only here or on replacement.
            unsafe { free_context(context) };
        }
    }
}
