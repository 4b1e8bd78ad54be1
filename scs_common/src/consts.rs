//! Well-known names and protocol constants.
//!
//! These constants are the single source of truth for the region identity
//! and the host protocol version. The external producer must use the same
//! region name and directory.

/// Logical name of the shared memory region.
pub const DEFAULT_REGION_NAME: &str = "SCSControls";

/// Directory holding the backing file on filesystem-backed platforms.
pub const DEFAULT_SHM_DIR: &str = "/dev/shm/SCS";

/// Namespace prefix for the named file mapping on Windows.
pub const WINDOWS_NAMESPACE: &str = "Local\\";

/// Device identifier reported to the host.
pub const DEFAULT_DEVICE_NAME: &str = "laneassist";

/// Human readable device name reported to the host.
pub const DEFAULT_DEVICE_DISPLAY_NAME: &str = "ETS2 Lane Assist";

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_ENV_VAR: &str = "SCS_INPUT_CONFIG";

/// Build a host API version number from its major and minor parts.
pub const fn make_version(major: u16, minor: u16) -> u32 {
    ((major as u32) << 16) | minor as u32
}

/// Input API version 1.00, the only version this plugin speaks.
pub const SCS_INPUT_VERSION_1_00: u32 = make_version(1, 0);
