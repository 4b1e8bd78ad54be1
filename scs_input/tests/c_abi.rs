//! Drives the exported entry points the way the host does.
//!
//! The plugin state is process-global, so the whole sequence lives in one
//! test.

#![cfg(unix)]

use scs_common::consts::{CONFIG_ENV_VAR, SCS_INPUT_VERSION_1_00};
use scs_common::value::{InputValue, encode_all};
use scs_input::ffi::{scs_input_init, scs_input_shutdown};
use scs_input::sdk::*;
use std::ffi::CStr;
use std::fs::OpenOptions;
use std::os::unix::fs::FileExt;
use std::sync::Mutex;
use tempfile::TempDir;

struct Registered {
    callback: scs_input_event_callback_t,
    context: usize,
    names: Vec<String>,
    value_types: Vec<scs_value_type_t>,
    device_type: scs_input_device_type_t,
}

static REGISTERED: Mutex<Option<Registered>> = Mutex::new(None);
static LOG: Mutex<Vec<(scs_log_type_t, String)>> = Mutex::new(Vec::new());

unsafe extern "C" fn log(kind: scs_log_type_t, message: scs_string_t) {
    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned();
    LOG.lock().unwrap().push((kind, message));
}

unsafe extern "C" fn register(device: *const scs_input_device_t) -> scs_result_t {
    let device = unsafe { &*device };
    let inputs = unsafe { std::slice::from_raw_parts(device.inputs, device.input_count as usize) };
    let names = inputs
        .iter()
        .map(|i| unsafe { CStr::from_ptr(i.name) }.to_string_lossy().into_owned())
        .collect();
    let value_types = inputs.iter().map(|i| i.value_type).collect();

    *REGISTERED.lock().unwrap() = Some(Registered {
        callback: device.input_event_callback.unwrap(),
        context: device.callback_context as usize,
        names,
        value_types,
        device_type: device.device_type,
    });
    SCS_RESULT_OK
}

fn params() -> scs_input_init_params_v100_t {
    scs_input_init_params_v100_t {
        common: scs_sdk_init_params_v100_t::new(
            c"Euro Truck Simulator 2".as_ptr(),
            c"eut2".as_ptr(),
            0,
            Some(log),
        ),
        register_device: Some(register),
    }
}

fn poll(registered: &Registered, flags: u32) -> Option<scs_input_event_t> {
    let mut event = scs_input_event_t {
        input_index: u32::MAX,
        value: scs_input_event_value_t {
            value_float: scs_value_float_t { value: 0.0 },
        },
    };
    let result =
        unsafe { (registered.callback)(&mut event, flags, registered.context as scs_context_t) };
    match result {
        SCS_RESULT_OK => Some(event),
        SCS_RESULT_NOT_FOUND => None,
        other => panic!("unexpected result {other}"),
    }
}

#[test]
fn test_host_session() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("scs_input.toml");
    std::fs::write(
        &config,
        format!(
            "[region]\nname = \"abi\"\ndirectory = '{}'\n\n\
             [[inputs]]\nname = \"steer\"\nkind = \"float\"\n\n\
             [[inputs]]\nname = \"engaged\"\nkind = \"bool\"\n",
            dir.path().display()
        ),
    )
    .unwrap();
    // SAFETY: no other thread in this test binary reads the environment.
    unsafe { std::env::set_var(CONFIG_ENV_VAR, &config) };

    let params = params();
    let result = unsafe { scs_input_init(SCS_INPUT_VERSION_1_00, &params) };
    assert_eq!(result, SCS_RESULT_OK);

    let guard = REGISTERED.lock().unwrap();
    let registered = guard.as_ref().unwrap();
    assert_eq!(registered.names, vec!["steer", "engaged"]);
    assert_eq!(
        registered.value_types,
        vec![SCS_VALUE_TYPE_FLOAT, SCS_VALUE_TYPE_BOOL]
    );
    assert_eq!(registered.device_type, SCS_INPUT_DEVICE_TYPE_SEMANTICAL);
    assert!(
        LOG.lock()
            .unwrap()
            .iter()
            .any(|(kind, _)| *kind == SCS_LOG_TYPE_MESSAGE)
    );

    // Producer writes in place; truncating would fault the mapped view.
    OpenOptions::new()
        .write(true)
        .open(dir.path().join("abi"))
        .unwrap()
        .write_all_at(&encode_all(&[InputValue::Float(-3.0), InputValue::Bool(true)]), 0)
        .unwrap();

    let steer = poll(registered, 1).unwrap();
    assert_eq!(steer.input_index, 0);
    assert_eq!(unsafe { steer.value.value_float.value }, -1.0);
    let engaged = poll(registered, 0).unwrap();
    assert_eq!(engaged.input_index, 1);
    assert_eq!(unsafe { engaged.value.value_bool.value }, 1);
    assert!(poll(registered, 0).is_none());
    assert!(poll(registered, 0).is_none());

    // A new frame starts over.
    assert_eq!(poll(registered, 1).unwrap().input_index, 0);

    scs_input_shutdown();
    scs_input_shutdown();
    assert!(poll(registered, 1).is_none());
}
