//! Filesystem-backed shared memory (Linux `/dev/shm`, other Unix tmpfs).
//!
//! The region is a plain file under the configured directory. Zeroing goes
//! through the file descriptor, so the mapping itself can stay read-only:
//! this process only consumes the data, the producer owns write access.
//!
//! The file is never shrunk below the layout size while zeroing. A peer
//! that already maps it (the producer, or a probe attached with
//! `open_existing`) would fault on any page past the end of the file.

use crate::error::{RegionError, RegionResult};
use crate::region::RegionId;
use memmap2::{Mmap, MmapOptions};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::{FileExt, OpenOptionsExt};

/// Owner read/write only.
const REGION_FILE_MODE: u32 = 0o600;

/// Read-only mapping of the backing file.
pub struct PlatformRegion {
    mmap: Mmap,
    // Held so the descriptor is closed together with the mapping.
    _file: File,
}

impl PlatformRegion {
    /// Create the backing file if needed, zero it at `size` bytes and map it.
    pub fn create_zeroed(id: &RegionId, size: usize) -> RegionResult<Self> {
        let path = id.path();
        let name = id.to_string();

        if !id.directory.exists() {
            std::fs::create_dir_all(&id.directory).map_err(|source| RegionError::Create {
                name: name.clone(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .mode(REGION_FILE_MODE)
            .open(&path)
            .map_err(|source| RegionError::Create {
                name: name.clone(),
                source,
            })?;

        file.set_len(size as u64)
            .map_err(|source| RegionError::Resize {
                name: name.clone(),
                source,
            })?;
        file.write_all_at(&vec![0u8; size], 0)
            .map_err(|source| RegionError::Resize {
                name: name.clone(),
                source,
            })?;

        let mmap = unsafe { MmapOptions::new().len(size).map(&file) }
            .map_err(|source| RegionError::Map { name, source })?;

        Ok(Self { mmap, _file: file })
    }

    /// Map an existing backing file read-only without touching its contents.
    pub fn open_existing(id: &RegionId, size: usize) -> RegionResult<Self> {
        let path = id.path();
        let name = id.to_string();

        let file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => RegionError::NotFound { name: name.clone() },
                _ => RegionError::Create {
                    name: name.clone(),
                    source,
                },
            })?;

        let actual = file.metadata()?.len();
        if actual < size as u64 {
            return Err(RegionError::TooSmall {
                name,
                expected: size,
                actual: actual as usize,
            });
        }

        let mmap = unsafe { MmapOptions::new().len(size).map(&file) }
            .map_err(|source| RegionError::Map { name, source })?;

        Ok(Self { mmap, _file: file })
    }

    /// Base address of the mapped view.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    /// Mapped length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }
}
