//! SCS Input Common Library
//!
//! This crate provides the input schema, the fixed-width value codec,
//! shared constants and configuration loading for all workspace crates.
//!
//! # Module Structure
//!
//! - [`schema`] - Ordered input descriptors and the region byte layout
//! - [`value`] - Typed input values and their wire encoding
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Well-known names and protocol constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use scs_common::prelude::*;
//!
//! let schema = InputSchema::lane_assist();
//! assert_eq!(schema.offset_of(0), Some(0));
//! assert!(schema.region_size() > 0);
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod consts;
pub mod prelude;
pub mod schema;
pub mod value;
