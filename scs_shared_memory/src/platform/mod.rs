//! Platform backends for the shared memory region.
//!
//! Each backend exposes the same `PlatformRegion` surface:
//! `create_zeroed`, `open_existing`, `as_ptr` and `len`. Dropping a
//! `PlatformRegion` unmaps the view and closes the OS object.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::PlatformRegion;
#[cfg(windows)]
pub use windows::PlatformRegion;
