//! Typed input values and their fixed-width wire encoding.
//!
//! The encoding is chosen independently of any toolchain's native types:
//!
//! | Kind    | Width | Encoding                                  |
//! |---------|-------|-------------------------------------------|
//! | `Float` | 4     | IEEE-754 binary32, little-endian          |
//! | `Bool`  | 1     | `0x00` = false, any other byte = true     |
//!
//! Decoding never fails. Out-of-range floats are clamped and garbage
//! bytes are interpreted like any other value.

use crate::schema::ValueKind;
use serde::Serialize;

/// Width of an encoded float.
pub const FLOAT_WIDTH: usize = ValueKind::Float.width();

/// Width of an encoded bool.
pub const BOOL_WIDTH: usize = ValueKind::Bool.width();

/// Clamp an axis reading to `[-1.0, 1.0]`.
///
/// NaN maps to the neutral position `0.0`.
#[inline]
pub fn clamp_axis(raw: f32) -> f32 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(-1.0, 1.0)
    }
}

/// A decoded input value as handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Axis value, always within `[-1.0, 1.0]` after decoding.
    Float(f32),
    /// Button value.
    Bool(bool),
}

impl InputValue {
    /// Decode a float field.
    #[inline]
    pub fn decode_float(bytes: [u8; FLOAT_WIDTH]) -> Self {
        Self::Float(clamp_axis(f32::from_le_bytes(bytes)))
    }

    /// Decode a bool field.
    #[inline]
    pub fn decode_bool(bytes: [u8; BOOL_WIDTH]) -> Self {
        Self::Bool(bytes[0] != 0)
    }

    /// Decode a field of `kind` from the start of `bytes`.
    ///
    /// Returns `None` if `bytes` is shorter than the kind's width.
    pub fn decode(kind: ValueKind, bytes: &[u8]) -> Option<Self> {
        match kind {
            ValueKind::Float => bytes
                .get(..FLOAT_WIDTH)
                .and_then(|b| b.try_into().ok())
                .map(Self::decode_float),
            ValueKind::Bool => bytes
                .get(..BOOL_WIDTH)
                .and_then(|b| b.try_into().ok())
                .map(Self::decode_bool),
        }
    }

    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
        }
    }

    /// Append the wire encoding of this value to `out`.
    ///
    /// Floats are written as-is, without clamping; producers may write any
    /// value and the reader clamps.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match *self {
            Self::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
            Self::Bool(v) => out.push(u8::from(v)),
        }
    }

    /// Float payload, if any.
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            Self::Bool(_) => None,
        }
    }

    /// Bool payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

impl std::fmt::Display for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v:+.4}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Encode a sequence of values into a contiguous region image.
pub fn encode_all<'a>(values: impl IntoIterator<Item = &'a InputValue>) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        value.encode(&mut out);
    }
    out
}
