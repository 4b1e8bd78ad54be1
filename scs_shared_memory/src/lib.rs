//! # SCS Shared Memory Region
//!
//! Lifecycle management for the named shared memory region that bridges
//! an external producer process and the SCS input plugin.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Producer      │    │  Shared Memory  │    │   Plugin        │
//! │  (external)     ├───►│   Region        ├───►│                 │
//! │                 │    │ [f32|u8|f32...] │    │ InputEnumerator │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! The region has no header, no magic number and no version field. Its
//! layout is defined entirely by the input schema in `scs_common`.
//!
//! ## Platform Support
//!
//! | Platform | Identity                   | Zeroing                   | View       |
//! |----------|----------------------------|---------------------------|------------|
//! | Unix     | `<directory>/<name>` file  | truncate, then extend     | read-only  |
//! | Windows  | `Local\<name>` mapping     | write through the view    | read/write |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scs_shared_memory::{RegionId, SharedMemoryRegion};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let id = RegionId::new("SCSControls", "/dev/shm/SCS");
//! let mut region = SharedMemoryRegion::create_or_open(&id, 14)?;
//! let steering = f32::from_le_bytes(region.read_array::<4>(0)?);
//! region.release();
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! A region is owned by exactly one logical owner, which is the only one
//! allowed to call `release`. There is no synchronization with the
//! producer.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod platform;
pub mod region;

pub use error::{RegionError, RegionResult};
pub use region::{RegionId, SharedMemoryRegion};
