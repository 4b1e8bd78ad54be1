//! Shared memory region: identity, lifecycle and bounded reads.

use crate::error::{RegionError, RegionResult};
use crate::platform::PlatformRegion;
use scs_common::config::RegionConfig;
use scs_common::consts::WINDOWS_NAMESPACE;
use std::fmt;
use std::path::{Path, PathBuf};

/// Platform identity of a region.
///
/// On Unix the region is the file `<directory>/<name>`; on Windows it is
/// the named mapping `Local\<name>` and `directory` is unused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionId {
    /// Logical name shared with the producer.
    pub name: String,
    /// Backing directory on filesystem-backed platforms.
    pub directory: PathBuf,
}

impl RegionId {
    /// Create an identity from a name and backing directory.
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
        }
    }

    /// Backing file path on filesystem-backed platforms.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Directory holding the backing file.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn validate(&self) -> RegionResult<()> {
        if self.name.is_empty() || self.name.contains(['/', '\\', '\0']) {
            return Err(RegionError::InvalidName {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl From<&RegionConfig> for RegionId {
    fn from(config: &RegionConfig) -> Self {
        Self::new(config.name.clone(), config.directory.clone())
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if cfg!(windows) {
            write!(f, "{}{}", WINDOWS_NAMESPACE, self.name)
        } else {
            write!(f, "{}", self.path().display())
        }
    }
}

/// Validate a region size. Zero-length mappings are not portable and
/// Windows takes the size as a 32-bit value.
fn validate_region_size(size: usize) -> RegionResult<()> {
    if size == 0 || u32::try_from(size).is_err() {
        return Err(RegionError::InvalidSize { size });
    }
    Ok(())
}

/// Named, fixed-size shared memory region consumed by this process.
///
/// The view is read-only on Unix. Reads are plain copies with no locking:
/// the producer may be mid-write, and a torn value is corrected on the
/// next frame.
pub struct SharedMemoryRegion {
    id: RegionId,
    size: usize,
    inner: Option<PlatformRegion>,
}

impl SharedMemoryRegion {
    /// Create the region, or open it if it already exists, and zero it.
    ///
    /// Postcondition: every byte of the region reads as zero.
    ///
    /// # Errors
    ///
    /// Returns `RegionError` if the name or size is invalid or if the OS
    /// primitive cannot be created, sized or mapped. Partially acquired
    /// resources are released before returning.
    pub fn create_or_open(id: &RegionId, size: usize) -> RegionResult<Self> {
        id.validate()?;
        validate_region_size(size)?;

        let inner = PlatformRegion::create_zeroed(id, size)?;
        tracing::info!("Created shared memory region {} ({} bytes)", id, size);

        Ok(Self {
            id: id.clone(),
            size,
            inner: Some(inner),
        })
    }

    /// Attach read-only to an existing region without zeroing it.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::NotFound` if the region does not exist and
    /// `RegionError::TooSmall` if it is shorter than `size`.
    pub fn open_existing(id: &RegionId, size: usize) -> RegionResult<Self> {
        id.validate()?;
        validate_region_size(size)?;

        let inner = PlatformRegion::open_existing(id, size)?;
        tracing::debug!("Attached to shared memory region {} ({} bytes)", id, size);

        Ok(Self {
            id: id.clone(),
            size,
            inner: Some(inner),
        })
    }

    /// Region identity.
    pub fn id(&self) -> &RegionId {
        &self.id
    }

    /// Region size in bytes, as requested at creation.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }

    fn mapped(&self, offset: usize, len: usize) -> RegionResult<&PlatformRegion> {
        let inner = self.inner.as_ref().ok_or(RegionError::Released)?;
        match offset.checked_add(len) {
            Some(end) if end <= inner.len() => Ok(inner),
            _ => Err(RegionError::OutOfBounds {
                offset,
                len,
                size: inner.len(),
            }),
        }
    }

    /// Copy `N` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `offset + N` exceeds the region, `Released` after
    /// release.
    #[inline]
    pub fn read_array<const N: usize>(&self, offset: usize) -> RegionResult<[u8; N]> {
        let inner = self.mapped(offset, N)?;
        let mut out = [0u8; N];
        // SAFETY: bounds checked above; the view stays mapped while `self`
        // is borrowed.
        unsafe {
            std::ptr::copy_nonoverlapping(inner.as_ptr().add(offset), out.as_mut_ptr(), N);
        }
        Ok(out)
    }

    /// Copy `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Same as [`read_array`](Self::read_array).
    pub fn read_bytes(&self, offset: usize, len: usize) -> RegionResult<Vec<u8>> {
        let inner = self.mapped(offset, len)?;
        let mut out = vec![0u8; len];
        // SAFETY: as in `read_array`.
        unsafe {
            std::ptr::copy_nonoverlapping(inner.as_ptr().add(offset), out.as_mut_ptr(), len);
        }
        Ok(out)
    }

    /// Unmap the view and close the backing object.
    ///
    /// Idempotent: later calls are no-ops.
    pub fn release(&mut self) {
        if let Some(inner) = self.inner.take() {
            drop(inner);
            tracing::debug!("Released shared memory region {}", self.id);
        }
    }
}

impl fmt::Debug for SharedMemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMemoryRegion")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("released", &self.is_released())
            .finish()
    }
}

impl Drop for SharedMemoryRegion {
    fn drop(&mut self) {
        self.release();
    }
}
