//! Input schema: the ordered list of semantic inputs exposed to the host.
//!
//! The schema is the single authority for two things that must never
//! diverge:
//!
//! - the order in which inputs are reported to the host each frame, and
//! - the byte layout of the shared memory region the producer writes.
//!
//! Fields are packed in declaration order with no header and no padding,
//! so the offset of input *k* is the sum of the widths of inputs `0..k`.
//!
//! ```text
//! [ steering:f32 | aforward:f32 | abackward:f32 | lblinkerh:u8 | rblinkerh:u8 ]
//!   0              4              8               12             13          14
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Value kind of a single input, fixing its width on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// IEEE-754 binary32, little-endian, reported clamped to `[-1, 1]`.
    Float,
    /// Single byte, zero is `false`, anything else is `true`.
    Bool,
}

impl ValueKind {
    /// Width of this kind in the region, in bytes.
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            Self::Float => 4,
            Self::Bool => 1,
        }
    }
}

/// One named input of the semantic device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Input name; must match the control mix name known to the host.
    pub name: String,

    /// Name shown in the host's UI. Falls back to `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Value kind, fixing the width of the field in the region.
    pub kind: ValueKind,
}

impl InputDescriptor {
    /// Create a descriptor whose display name equals its name.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            kind,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Display name, or the input name if none was given.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Errors raised while building an [`InputSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The schema has no inputs.
    #[error("Input schema is empty")]
    Empty,

    /// An input has an empty name.
    #[error("Input at index {index} has an empty name")]
    EmptyName {
        /// Position of the offending descriptor.
        index: usize,
    },

    /// A name contains an interior NUL byte and cannot cross the C boundary.
    #[error("Input name contains a NUL byte: {name:?}")]
    InteriorNul {
        /// Offending name.
        name: String,
    },

    /// The same name is declared twice.
    #[error("Duplicate input name: {name}")]
    DuplicateName {
        /// Offending name.
        name: String,
    },

    /// The host indexes inputs with a `u32`.
    #[error("Too many inputs: {count}")]
    TooManyInputs {
        /// Number of descriptors supplied.
        count: usize,
    },
}

/// Fixed, ordered list of input descriptors.
///
/// Immutable once built. Ordering is significant: it is both the
/// enumeration order and the byte layout of the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSchema {
    inputs: Vec<InputDescriptor>,
}

impl InputSchema {
    /// Validate and build a schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the list is empty, a name is empty or
    /// contains NUL, a name repeats, or there are more than `u32::MAX`
    /// inputs.
    pub fn new(inputs: Vec<InputDescriptor>) -> Result<Self, SchemaError> {
        if inputs.is_empty() {
            return Err(SchemaError::Empty);
        }
        if u32::try_from(inputs.len()).is_err() {
            return Err(SchemaError::TooManyInputs {
                count: inputs.len(),
            });
        }

        let mut seen = HashSet::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            if input.name.is_empty() {
                return Err(SchemaError::EmptyName { index });
            }
            let display_has_nul = input
                .display_name
                .as_deref()
                .is_some_and(|d| d.contains('\0'));
            if input.name.contains('\0') || display_has_nul {
                return Err(SchemaError::InteriorNul {
                    name: input.name.clone(),
                });
            }
            if !seen.insert(input.name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    name: input.name.clone(),
                });
            }
        }

        Ok(Self { inputs })
    }

    /// Built-in schema used when no configuration supplies one.
    pub fn lane_assist() -> Self {
        Self {
            inputs: vec![
                InputDescriptor::new("steering", ValueKind::Float).with_display_name("Steering"),
                InputDescriptor::new("aforward", ValueKind::Float).with_display_name("Acceleration"),
                InputDescriptor::new("abackward", ValueKind::Float).with_display_name("Brake"),
                InputDescriptor::new("lblinkerh", ValueKind::Bool)
                    .with_display_name("Left Blinker"),
                InputDescriptor::new("rblinkerh", ValueKind::Bool)
                    .with_display_name("Right Blinker"),
            ],
        }
    }

    /// Number of inputs.
    #[inline]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Always `false` for a validated schema.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Descriptor at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&InputDescriptor> {
        self.inputs.get(index)
    }

    /// Iterate descriptors in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, InputDescriptor> {
        self.inputs.iter()
    }

    /// Total byte footprint of the region.
    ///
    /// This is the only place the region size is derived.
    pub fn region_size(&self) -> usize {
        self.inputs.iter().map(|d| d.kind.width()).sum()
    }

    /// Byte offset of the input at `index`.
    pub fn offset_of(&self, index: usize) -> Option<usize> {
        if index >= self.inputs.len() {
            return None;
        }
        Some(self.inputs[..index].iter().map(|d| d.kind.width()).sum())
    }

    /// Byte offsets of all inputs, in declaration order.
    pub fn offsets(&self) -> Vec<usize> {
        self.inputs
            .iter()
            .scan(0usize, |offset, d| {
                let start = *offset;
                *offset += d.kind.width();
                Some(start)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a InputSchema {
    type Item = &'a InputDescriptor;
    type IntoIter = std::slice::Iter<'a, InputDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.inputs.iter()
    }
}

impl Default for InputSchema {
    fn default() -> Self {
        Self::lane_assist()
    }
}
