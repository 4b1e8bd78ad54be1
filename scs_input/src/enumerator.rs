//! Frame-synchronized input enumeration.
//!
//! The host polls the device repeatedly within a frame. The first call of
//! a frame carries [`EventFlags::FIRST_IN_FRAME`], which rewinds the
//! [`FrameCursor`]. Each call then reports one input, in schema order,
//! until the schema is exhausted:
//!
//! ```text
//! call:    1 (FIRST_IN_FRAME)   2            ...  N            N+1        N+2
//! result:  Produced(0)          Produced(1)  ...  Produced(N-1) Exhausted  Exhausted
//! ```
//!
//! Enumeration never fails. Values are decoded with the fixed-width codec
//! from `scs_common::value`, which clamps axes and accepts any byte.

use crate::error::{InitError, InitResult};
use bitflags::bitflags;
use scs_common::schema::{InputSchema, ValueKind};
use scs_common::value::{BOOL_WIDTH, FLOAT_WIDTH, InputValue};
use scs_shared_memory::{RegionError, RegionResult, SharedMemoryRegion};

bitflags! {
    /// Flags passed by the host with every poll.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventFlags: u32 {
        /// First call of a new frame; rewinds the cursor.
        const FIRST_IN_FRAME         = 0x0000_0001;
        /// First call after the device became active. Informational only.
        const FIRST_AFTER_ACTIVATION = 0x0000_0002;
    }
}

/// Byte source the enumerator reads fields from.
pub trait InputSource {
    /// Copy `N` bytes starting at `offset`.
    fn read_field<const N: usize>(&self, offset: usize) -> RegionResult<[u8; N]>;
}

impl InputSource for SharedMemoryRegion {
    #[inline]
    fn read_field<const N: usize>(&self, offset: usize) -> RegionResult<[u8; N]> {
        self.read_array::<N>(offset)
    }
}

impl InputSource for [u8] {
    fn read_field<const N: usize>(&self, offset: usize) -> RegionResult<[u8; N]> {
        offset
            .checked_add(N)
            .and_then(|end| self.get(offset..end))
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(RegionError::OutOfBounds {
                offset,
                len: N,
                size: self.len(),
            })
    }
}

/// Progress through one polling pass over the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCursor {
    input_index: u32,
    byte_offset: usize,
}

impl FrameCursor {
    /// Cursor positioned at the first input.
    pub const fn new() -> Self {
        Self {
            input_index: 0,
            byte_offset: 0,
        }
    }

    /// Index of the next input to report.
    #[inline]
    pub fn input_index(&self) -> u32 {
        self.input_index
    }

    /// Offset of the next input's field in the region.
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Rewind to the first input.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    fn advance(&mut self, width: usize) {
        self.input_index += 1;
        self.byte_offset += width;
    }

    fn finish(&mut self, schema: &InputSchema) {
        self.input_index = schema.len() as u32;
        self.byte_offset = schema.region_size();
    }
}

/// One input value reported to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// Position of the input in the schema.
    pub input_index: u32,
    /// Decoded value.
    pub value: InputValue,
}

/// Outcome of a single poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputPoll {
    /// One value was produced.
    Produced(InputEvent),
    /// No more values in this frame.
    Exhausted,
}

/// Walks the schema once per frame, decoding one field per call.
#[derive(Debug)]
pub struct InputEnumerator {
    schema: InputSchema,
    cursor: FrameCursor,
}

impl InputEnumerator {
    /// Bind a schema to a region of `region_len` bytes.
    ///
    /// # Errors
    ///
    /// `InitError::LayoutMismatch` if the region is smaller than the
    /// schema's layout; reads can then never go out of bounds.
    pub fn new(schema: InputSchema, region_len: usize) -> InitResult<Self> {
        let expected = schema.region_size();
        if region_len < expected {
            return Err(InitError::LayoutMismatch {
                expected,
                actual: region_len,
            });
        }
        Ok(Self {
            schema,
            cursor: FrameCursor::new(),
        })
    }

    /// Schema being enumerated.
    pub fn schema(&self) -> &InputSchema {
        &self.schema
    }

    /// Current cursor state.
    pub fn cursor(&self) -> FrameCursor {
        self.cursor
    }

    /// Report the next input of the current frame.
    pub fn poll<S: InputSource + ?Sized>(&mut self, flags: EventFlags, source: &S) -> InputPoll {
        if flags.contains(EventFlags::FIRST_IN_FRAME) {
            self.cursor.reset();
        }

        let index = self.cursor.input_index as usize;
        let Some(descriptor) = self.schema.get(index) else {
            return InputPoll::Exhausted;
        };

        let offset = self.cursor.byte_offset;
        let decoded = match descriptor.kind {
            ValueKind::Float => source
                .read_field::<FLOAT_WIDTH>(offset)
                .map(InputValue::decode_float),
            ValueKind::Bool => source
                .read_field::<BOOL_WIDTH>(offset)
                .map(InputValue::decode_bool),
        };

        match decoded {
            Ok(value) => {
                self.cursor.advance(descriptor.kind.width());
                InputPoll::Produced(InputEvent {
                    input_index: index as u32,
                    value,
                })
            }
            Err(e) => {
                // Only reachable after the region was released.
                tracing::warn!("Input {} unreadable, ending frame: {}", descriptor.name, e);
                self.cursor.finish(&self.schema);
                InputPoll::Exhausted
            }
        }
    }

    /// Poll a complete frame and collect every produced event.
    pub fn drain_frame<S: InputSource + ?Sized>(&mut self, source: &S) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(self.schema.len());
        let mut flags = EventFlags::FIRST_IN_FRAME;
        while let InputPoll::Produced(event) = self.poll(flags, source) {
            events.push(event);
            flags = EventFlags::empty();
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scs_common::schema::InputDescriptor;
    use scs_common::value::encode_all;

    fn schema(kinds: &[ValueKind]) -> InputSchema {
        InputSchema::new(
            kinds
                .iter()
                .enumerate()
                .map(|(i, k)| InputDescriptor::new(format!("in{i}"), *k))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_zeroed_region_yields_neutral_values() {
        let schema = schema(&[ValueKind::Float, ValueKind::Bool, ValueKind::Float]);
        let bytes = vec![0u8; schema.region_size()];
        let mut enumerator = InputEnumerator::new(schema, bytes.len()).unwrap();

        let events = enumerator.drain_frame(bytes.as_slice());
        let values: Vec<_> = events.iter().map(|e| e.value).collect();
        assert_eq!(
            values,
            vec![
                InputValue::Float(0.0),
                InputValue::Bool(false),
                InputValue::Float(0.0)
            ]
        );
    }

    #[test]
    fn test_steer_engaged_scenario() {
        let schema = InputSchema::new(vec![
            InputDescriptor::new("steer", ValueKind::Float),
            InputDescriptor::new("engaged", ValueKind::Bool),
        ])
        .unwrap();
        let bytes = encode_all(&[InputValue::Float(2.0), InputValue::Bool(true)]);
        let mut enumerator = InputEnumerator::new(schema, bytes.len()).unwrap();

        assert_eq!(
            enumerator.poll(EventFlags::FIRST_IN_FRAME, bytes.as_slice()),
            InputPoll::Produced(InputEvent {
                input_index: 0,
                value: InputValue::Float(1.0)
            })
        );
        assert_eq!(
            enumerator.poll(EventFlags::empty(), bytes.as_slice()),
            InputPoll::Produced(InputEvent {
                input_index: 1,
                value: InputValue::Bool(true)
            })
        );
        assert_eq!(
            enumerator.poll(EventFlags::empty(), bytes.as_slice()),
            InputPoll::Exhausted
        );
    }

    #[test]
    fn test_cursor_offsets_match_schema() {
        let schema = schema(&[ValueKind::Float, ValueKind::Bool, ValueKind::Float]);
        let offsets = schema.offsets();
        let bytes = vec![0u8; schema.region_size()];
        let mut enumerator = InputEnumerator::new(schema, bytes.len()).unwrap();

        let mut seen = Vec::new();
        let mut flags = EventFlags::FIRST_IN_FRAME;
        loop {
            let before = enumerator.cursor().byte_offset();
            match enumerator.poll(flags, bytes.as_slice()) {
                InputPoll::Produced(_) => seen.push(before),
                InputPoll::Exhausted => break,
            }
            flags = EventFlags::empty();
        }
        assert_eq!(seen, offsets);
        assert_eq!(seen, vec![0, 4, 4 + BOOL_WIDTH]);
    }

    #[test]
    fn test_exhausted_until_next_frame() {
        let schema = schema(&[ValueKind::Bool]);
        let bytes = [1u8];
        let mut enumerator = InputEnumerator::new(schema, 1).unwrap();

        assert!(matches!(
            enumerator.poll(EventFlags::FIRST_IN_FRAME, &bytes[..]),
            InputPoll::Produced(_)
        ));
        for _ in 0..3 {
            assert_eq!(
                enumerator.poll(EventFlags::empty(), &bytes[..]),
                InputPoll::Exhausted
            );
        }
        assert!(matches!(
            enumerator.poll(EventFlags::FIRST_IN_FRAME, &bytes[..]),
            InputPoll::Produced(InputEvent { input_index: 0, .. })
        ));
    }

    #[test]
    fn test_first_in_frame_mid_pass_restarts() {
        let schema = schema(&[ValueKind::Float, ValueKind::Float]);
        let bytes = encode_all(&[InputValue::Float(0.5), InputValue::Float(-0.5)]);
        let mut enumerator = InputEnumerator::new(schema, bytes.len()).unwrap();

        enumerator.poll(EventFlags::FIRST_IN_FRAME, bytes.as_slice());
        let restarted = enumerator.poll(
            EventFlags::FIRST_IN_FRAME | EventFlags::FIRST_AFTER_ACTIVATION,
            bytes.as_slice(),
        );
        assert_eq!(
            restarted,
            InputPoll::Produced(InputEvent {
                input_index: 0,
                value: InputValue::Float(0.5)
            })
        );
    }

    #[test]
    fn test_region_too_small_rejected() {
        let schema = schema(&[ValueKind::Float, ValueKind::Float]);
        assert!(matches!(
            InputEnumerator::new(schema, 7),
            Err(InitError::LayoutMismatch {
                expected: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn test_short_source_ends_frame() {
        let schema = schema(&[ValueKind::Bool, ValueKind::Float]);
        let mut enumerator = InputEnumerator::new(schema, 5).unwrap();
        // Source shorter than the layout the enumerator was built for.
        let short = [1u8, 0, 0];

        assert!(matches!(
            enumerator.poll(EventFlags::FIRST_IN_FRAME, &short[..]),
            InputPoll::Produced(_)
        ));
        assert_eq!(enumerator.poll(EventFlags::empty(), &short[..]), InputPoll::Exhausted);
        assert_eq!(enumerator.cursor().input_index(), 2);
        assert_eq!(enumerator.poll(EventFlags::empty(), &short[..]), InputPoll::Exhausted);
    }

    proptest::proptest! {
        #[test]
        fn prop_frame_visits_every_input_once(
            bools in proptest::collection::vec(proptest::bool::ANY, 1..32),
            fill in proptest::num::u8::ANY,
        ) {
            let kinds: Vec<_> = bools
                .iter()
                .map(|b| if *b { ValueKind::Bool } else { ValueKind::Float })
                .collect();
            let schema = schema(&kinds);
            let bytes = vec![fill; schema.region_size()];
            let mut enumerator = InputEnumerator::new(schema, bytes.len()).unwrap();

            let indices: Vec<u32> = enumerator
                .drain_frame(bytes.as_slice())
                .iter()
                .map(|e| e.input_index)
                .collect();
            let expected: Vec<u32> = (0..kinds.len() as u32).collect();
            proptest::prop_assert_eq!(indices, expected);
            proptest::prop_assert_eq!(
                enumerator.poll(EventFlags::empty(), bytes.as_slice()),
                InputPoll::Exhausted
            );
        }
    }

    #[test]
    fn test_slice_source_bounds() {
        let bytes = [1u8, 2, 3];
        assert_eq!(bytes[..].read_field::<2>(1).unwrap(), [2, 3]);
        assert!(matches!(
            bytes[..].read_field::<2>(2),
            Err(RegionError::OutOfBounds { offset: 2, len: 2, size: 3 })
        ));
        assert!(bytes[..].read_field::<1>(usize::MAX).is_err());
    }
}
