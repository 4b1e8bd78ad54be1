//! `#[repr(C)]` mirrors of the host input SDK types.
//!
//! Layouts follow the SDK headers for input API 1.00. Only the parts this
//! plugin touches are mirrored.

#![allow(non_camel_case_types)]

use static_assertions::const_assert_eq;
use std::ffi::{c_char, c_void};

/// Host result code.
pub type scs_result_t = i32;
/// Host string: NUL-terminated UTF-8.
pub type scs_string_t = *const c_char;
/// Opaque callback context.
pub type scs_context_t = *mut c_void;
/// Log line severity.
pub type scs_log_type_t = i32;
/// Value type identifier.
pub type scs_value_type_t = u32;
/// Input device type identifier.
pub type scs_input_device_type_t = u32;

/// Success.
pub const SCS_RESULT_OK: scs_result_t = 0;
/// Unsupported API version or feature.
pub const SCS_RESULT_UNSUPPORTED: scs_result_t = -1;
/// A parameter was invalid.
pub const SCS_RESULT_INVALID_PARAMETER: scs_result_t = -2;
/// Nothing more to report.
pub const SCS_RESULT_NOT_FOUND: scs_result_t = -4;
/// Unspecified failure.
pub const SCS_RESULT_GENERIC_ERROR: scs_result_t = -7;

/// Informational log line.
pub const SCS_LOG_TYPE_MESSAGE: scs_log_type_t = 0;
/// Warning log line.
pub const SCS_LOG_TYPE_WARNING: scs_log_type_t = 1;
/// Error log line.
pub const SCS_LOG_TYPE_ERROR: scs_log_type_t = 2;

/// Boolean value type.
pub const SCS_VALUE_TYPE_BOOL: scs_value_type_t = 1;
/// Single precision float value type.
pub const SCS_VALUE_TYPE_FLOAT: scs_value_type_t = 5;

/// Device with user-bound axes and buttons.
pub const SCS_INPUT_DEVICE_TYPE_GENERIC: scs_input_device_type_t = 1;
/// Device whose inputs are named after control mixes.
pub const SCS_INPUT_DEVICE_TYPE_SEMANTICAL: scs_input_device_type_t = 2;

/// Host log function.
pub type scs_log_t = unsafe extern "C" fn(scs_log_type_t, scs_string_t);

/// Host device registration function.
pub type scs_input_register_device_t =
    unsafe extern "C" fn(*const scs_input_device_t) -> scs_result_t;

/// Device activity notification.
pub type scs_input_active_callback_t = unsafe extern "C" fn(u8, scs_context_t);

/// Per-frame event callback.
pub type scs_input_event_callback_t =
    unsafe extern "C" fn(*mut scs_input_event_t, u32, scs_context_t) -> scs_result_t;

/// Parameters common to every SDK API.
#[repr(C)]
pub struct scs_sdk_init_params_v100_t {
    /// Game name.
    pub game_name: scs_string_t,
    /// Short game identifier.
    pub game_id: scs_string_t,
    /// Game version.
    pub game_version: u32,
    #[cfg(target_pointer_width = "64")]
    _padding: u32,
    /// Log function; may be null on broken hosts.
    pub log: Option<scs_log_t>,
}

/// Input API 1.00 init parameters.
#[repr(C)]
pub struct scs_input_init_params_v100_t {
    /// Common parameters.
    pub common: scs_sdk_init_params_v100_t,
    /// Registration function.
    pub register_device: Option<scs_input_register_device_t>,
}

/// One input of a device.
#[repr(C)]
pub struct scs_input_device_input_t {
    /// Input name.
    pub name: scs_string_t,
    /// Display name.
    pub display_name: scs_string_t,
    /// Value type.
    pub value_type: scs_value_type_t,
}

/// Device description passed to `register_device`.
#[repr(C)]
pub struct scs_input_device_t {
    /// Device name.
    pub name: scs_string_t,
    /// Display name.
    pub display_name: scs_string_t,
    /// Device type.
    pub device_type: scs_input_device_type_t,
    /// Number of entries in `inputs`.
    pub input_count: u32,
    /// Input table.
    pub inputs: *const scs_input_device_input_t,
    /// Activity callback; optional.
    pub input_active_callback: Option<scs_input_active_callback_t>,
    /// Event callback.
    pub input_event_callback: Option<scs_input_event_callback_t>,
    /// Context passed to both callbacks.
    pub callback_context: scs_context_t,
}

/// Boolean payload.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct scs_value_bool_t {
    /// Zero is false.
    pub value: u8,
}

/// Float payload.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct scs_value_float_t {
    /// Value.
    pub value: f32,
}

/// Payload of an input event; the active member follows the input's type.
#[repr(C)]
#[derive(Clone, Copy)]
pub union scs_input_event_value_t {
    /// Set for bool inputs.
    pub value_bool: scs_value_bool_t,
    /// Set for float inputs.
    pub value_float: scs_value_float_t,
}

/// Event filled in by the per-frame callback.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct scs_input_event_t {
    /// Index into the device's input table.
    pub input_index: u32,
    /// Payload.
    pub value: scs_input_event_value_t,
}

const_assert_eq!(std::mem::size_of::<scs_input_event_t>(), 8);
const_assert_eq!(std::mem::size_of::<scs_input_event_value_t>(), 4);

#[cfg(target_pointer_width = "64")]
mod layout_64 {
    use super::*;

    const_assert_eq!(std::mem::size_of::<scs_sdk_init_params_v100_t>(), 32);
    const_assert_eq!(std::mem::size_of::<scs_input_init_params_v100_t>(), 40);
    const_assert_eq!(std::mem::size_of::<scs_input_device_input_t>(), 24);
    const_assert_eq!(std::mem::size_of::<scs_input_device_t>(), 56);
    const_assert_eq!(std::mem::offset_of!(scs_input_device_t, inputs), 24);
}

impl scs_sdk_init_params_v100_t {
    /// Build a parameter block, filling in platform padding.
    pub fn new(
        game_name: scs_string_t,
        game_id: scs_string_t,
        game_version: u32,
        log: Option<scs_log_t>,
    ) -> Self {
        Self {
            game_name,
            game_id,
            game_version,
            #[cfg(target_pointer_width = "64")]
            _padding: 0,
            log,
        }
    }
}
