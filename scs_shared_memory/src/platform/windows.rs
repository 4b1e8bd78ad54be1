//! Windows shared memory using a pagefile-backed named file mapping.
//!
//! The mapping object lives in the session-local namespace
//! (`Local\<name>`). A writable view is required to zero the region, since
//! pagefile-backed mappings have no file to truncate.

use crate::error::{RegionError, RegionResult};
use crate::region::RegionId;
use std::ffi::c_void;
use std::iter::once;
use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Memory::{
    CreateFileMappingW, FILE_MAP_ALL_ACCESS, FILE_MAP_READ, MEMORY_MAPPED_VIEW_ADDRESS,
    MapViewOfFile, OpenFileMappingW, PAGE_READWRITE, UnmapViewOfFile,
};

/// Named file mapping plus its mapped view.
pub struct PlatformRegion {
    handle: HANDLE,
    view: *mut c_void,
    len: usize,
}

// SAFETY: the handle and view are process-wide kernel objects, not tied to
// the thread that created them.
unsafe impl Send for PlatformRegion {}

fn wide(name: &str) -> Vec<u16> {
    name.encode_utf16().chain(once(0)).collect()
}

impl PlatformRegion {
    /// Create (or open, if it exists) the named mapping and zero it.
    pub fn create_zeroed(id: &RegionId, size: usize) -> RegionResult<Self> {
        let name = id.to_string();
        let wide_name = wide(&name);

        let handle = unsafe {
            CreateFileMappingW(
                INVALID_HANDLE_VALUE,
                std::ptr::null(),
                PAGE_READWRITE,
                0,
                size as u32,
                wide_name.as_ptr(),
            )
        };
        if handle.is_null() {
            return Err(RegionError::Create {
                name,
                source: std::io::Error::last_os_error(),
            });
        }

        let view = unsafe { MapViewOfFile(handle, FILE_MAP_ALL_ACCESS, 0, 0, size) };
        if view.Value.is_null() {
            let source = std::io::Error::last_os_error();
            unsafe { CloseHandle(handle) };
            return Err(RegionError::Map { name, source });
        }

        unsafe { std::ptr::write_bytes(view.Value.cast::<u8>(), 0, size) };

        Ok(Self {
            handle,
            view: view.Value,
            len: size,
        })
    }

    /// Open an existing named mapping with a read-only view.
    pub fn open_existing(id: &RegionId, size: usize) -> RegionResult<Self> {
        let name = id.to_string();
        let wide_name = wide(&name);

        let handle = unsafe { OpenFileMappingW(FILE_MAP_READ, 0, wide_name.as_ptr()) };
        if handle.is_null() {
            return Err(RegionError::NotFound { name });
        }

        // Fails if the mapping is shorter than `size`.
        let view = unsafe { MapViewOfFile(handle, FILE_MAP_READ, 0, 0, size) };
        if view.Value.is_null() {
            let source = std::io::Error::last_os_error();
            unsafe { CloseHandle(handle) };
            return Err(RegionError::Map { name, source });
        }

        Ok(Self {
            handle,
            view: view.Value,
            len: size,
        })
    }

    /// Base address of the mapped view.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.view.cast::<u8>().cast_const()
    }

    /// Mapped length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl Drop for PlatformRegion {
    fn drop(&mut self) {
        // Both were checked non-null at construction.
        unsafe {
            UnmapViewOfFile(MEMORY_MAPPED_VIEW_ADDRESS { Value: self.view });
            CloseHandle(self.handle);
        }
    }
}
