//! C ABI entry points loaded by the host.
//!
//! - `scs_input_init` / `scs_input_shutdown` are the exported SDK entry
//!   points.
//! - An abrupt unload (ELF `.fini_array` on Unix, `DllMain` with
//!   `DLL_PROCESS_DETACH` on Windows) runs the same idempotent shutdown.
//!
//! Nothing here unwinds into the host: every error becomes a result code.

use crate::enumerator::{EventFlags, InputEvent, InputPoll};
use crate::error::{InitError, RegistrationError};
use crate::host::{DeviceDescriptor, DeviceKind, Host, LogSeverity};
use crate::lifecycle::{DeviceContext, PluginLifecycle};
use crate::sdk::*;
use parking_lot::Mutex;
use scs_common::config::PluginConfig;
use scs_common::schema::ValueKind;
use scs_common::value::InputValue;
use std::ffi::CString;

/// Process-wide plugin state. The per-frame callback never takes this lock.
static PLUGIN: Mutex<PluginLifecycle> = parking_lot::const_mutex(PluginLifecycle::new());

/// Strings and input table handed to the host, kept alive until the next
/// registration replaces them.
static NATIVE_DEVICE: Mutex<Option<NativeDevice>> = parking_lot::const_mutex(None);

struct NativeDevice {
    name: CString,
    display_name: CString,
    // Owns the strings `inputs` points into.
    _input_names: Vec<(CString, CString)>,
    inputs: Vec<scs_input_device_input_t>,
}

// SAFETY: the raw pointers in `inputs` point into heap buffers owned by
// `_input_names`, which move together with the struct.
unsafe impl Send for NativeDevice {}

fn c_string(value: &str) -> CString {
    // Names are validated NUL-free; log text may not be.
    CString::new(value.replace('\0', " ")).unwrap_or_default()
}

impl NativeDevice {
    fn build(device: &DeviceDescriptor<'_>) -> Self {
        let input_names: Vec<(CString, CString)> = device
            .schema
            .iter()
            .map(|d| (c_string(&d.name), c_string(d.display_name())))
            .collect();

        let inputs = device
            .schema
            .iter()
            .zip(&input_names)
            .map(|(d, (name, display))| scs_input_device_input_t {
                name: name.as_ptr(),
                display_name: display.as_ptr(),
                value_type: value_type(d.kind),
            })
            .collect();

        Self {
            name: c_string(device.name),
            display_name: c_string(device.display_name),
            _input_names: input_names,
            inputs,
        }
    }

    fn info(&self, device: &DeviceDescriptor<'_>) -> scs_input_device_t {
        scs_input_device_t {
            name: self.name.as_ptr(),
            display_name: self.display_name.as_ptr(),
            device_type: device_type(device.kind),
            input_count: self.inputs.len() as u32,
            inputs: self.inputs.as_ptr(),
            input_active_callback: None,
            input_event_callback: Some(input_event_callback),
            callback_context: device.context.as_ptr().cast(),
        }
    }
}

fn value_type(kind: ValueKind) -> scs_value_type_t {
    match kind {
        ValueKind::Float => SCS_VALUE_TYPE_FLOAT,
        ValueKind::Bool => SCS_VALUE_TYPE_BOOL,
    }
}

fn device_type(kind: DeviceKind) -> scs_input_device_type_t {
    match kind {
        DeviceKind::Generic => SCS_INPUT_DEVICE_TYPE_GENERIC,
        DeviceKind::Semantical => SCS_INPUT_DEVICE_TYPE_SEMANTICAL,
    }
}

fn log_type(severity: LogSeverity) -> scs_log_type_t {
    match severity {
        LogSeverity::Message => SCS_LOG_TYPE_MESSAGE,
        LogSeverity::Warning => SCS_LOG_TYPE_WARNING,
        LogSeverity::Error => SCS_LOG_TYPE_ERROR,
    }
}

impl From<InputEvent> for scs_input_event_t {
    fn from(event: InputEvent) -> Self {
        let value = match event.value {
            InputValue::Float(value) => scs_input_event_value_t {
                value_float: scs_value_float_t { value },
            },
            InputValue::Bool(value) => scs_input_event_value_t {
                value_bool: scs_value_bool_t {
                    value: u8::from(value),
                },
            },
        };
        Self {
            input_index: event.input_index,
            value,
        }
    }
}

/// [`Host`] over the init parameters the host passed to `scs_input_init`.
pub struct ScsHost<'a> {
    params: &'a scs_input_init_params_v100_t,
}

impl<'a> ScsHost<'a> {
    /// Wrap host init parameters.
    pub fn new(params: &'a scs_input_init_params_v100_t) -> Self {
        Self { params }
    }
}

impl Host for ScsHost<'_> {
    fn log(&self, severity: LogSeverity, message: &str) {
        let Some(log) = self.params.common.log else {
            return;
        };
        let message = c_string(message);
        // SAFETY: host-provided function, called with a valid C string.
        unsafe { log(log_type(severity), message.as_ptr()) };
    }

    fn register_device(&self, device: &DeviceDescriptor<'_>) -> Result<(), RegistrationError> {
        let register = self
            .params
            .register_device
            .ok_or(RegistrationError::Unavailable)?;

        let mut slot = NATIVE_DEVICE.lock();
        let native = slot.insert(NativeDevice::build(device));
        let info = native.info(device);

        // SAFETY: `info` and everything it points to live in NATIVE_DEVICE
        // for the rest of the registration's lifetime.
        let code = unsafe { register(&info) };
        if code == SCS_RESULT_OK {
            Ok(())
        } else {
            Err(RegistrationError::Rejected { code })
        }
    }
}

/// Per-frame callback handed to the host.
///
/// # Safety
///
/// `context` must be the pointer registered with the device and
/// `event_info` must be valid for writes.
pub unsafe extern "C" fn input_event_callback(
    event_info: *mut scs_input_event_t,
    flags: u32,
    context: scs_context_t,
) -> scs_result_t {
    if event_info.is_null() || context.is_null() {
        return SCS_RESULT_NOT_FOUND;
    }

    // SAFETY: the host hands back the context registered in
    // `register_device`, which the lifecycle keeps allocated.
    let context = unsafe { &mut *context.cast::<DeviceContext>() };
    match context.poll(EventFlags::from_bits_truncate(flags)) {
        InputPoll::Produced(event) => {
            // SAFETY: checked non-null; the host owns the storage.
            unsafe { event_info.write(event.into()) };
            SCS_RESULT_OK
        }
        InputPoll::Exhausted => SCS_RESULT_NOT_FOUND,
    }
}

/// Initialize the plugin and register its device.
///
/// # Safety
///
/// `params` must point to `scs_input_init_params_v100_t` when `version` is
/// 1.00, as guaranteed by the host.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn scs_input_init(
    version: u32,
    params: *const scs_input_init_params_v100_t,
) -> scs_result_t {
    if version != scs_common::consts::SCS_INPUT_VERSION_1_00 {
        return SCS_RESULT_UNSUPPORTED;
    }
    // SAFETY: layout is fixed by `version`, checked above.
    let Some(params) = (unsafe { params.as_ref() }) else {
        return SCS_RESULT_INVALID_PARAMETER;
    };
    let host = ScsHost::new(params);

    let config = match PluginConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            host.log(
                LogSeverity::Error,
                &format!("Failed to load configuration: {e}"),
            );
            return SCS_RESULT_GENERIC_ERROR;
        }
    };
    crate::init_tracing(config.shared.log_level);

    match PLUGIN.lock().initialize(version, &config, &host) {
        Ok(handle) => {
            host.log(
                LogSeverity::Message,
                &format!(
                    "Registered input device {} ({} inputs, region {})",
                    handle.name, handle.input_count, handle.region
                ),
            );
            SCS_RESULT_OK
        }
        Err(InitError::UnsupportedProtocolVersion { .. }) => SCS_RESULT_UNSUPPORTED,
        Err(_) => SCS_RESULT_GENERIC_ERROR,
    }
}

/// Release the region. Safe to call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn scs_input_shutdown() {
    PLUGIN.lock().shutdown();
}

/// Teardown for abrupt unloads. Never blocks: if the lock is held the
/// process is already tearing down the plugin.
fn detach() {
    if let Some(mut plugin) = PLUGIN.try_lock() {
        plugin.shutdown();
    }
}

#[cfg(all(unix, not(target_vendor = "apple")))]
mod unload_hook {
    extern "C" fn on_unload() {
        super::detach();
    }

    #[used]
    #[unsafe(link_section = ".fini_array")]
    static UNLOAD_HOOK: extern "C" fn() = on_unload;
}

/// Windows loader notification.
#[cfg(windows)]
#[unsafe(no_mangle)]
pub extern "system" fn DllMain(
    _module: windows_sys::Win32::Foundation::HINSTANCE,
    reason: u32,
    _reserved: *mut std::ffi::c_void,
) -> windows_sys::Win32::Foundation::BOOL {
    if reason == windows_sys::Win32::System::SystemServices::DLL_PROCESS_DETACH {
        detach();
    }
    windows_sys::Win32::Foundation::TRUE
}
