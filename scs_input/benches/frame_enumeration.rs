//! Per-frame enumeration cost.
//!
//! The host polls once per input every frame, so a full pass over the
//! lane assist schema is the unit measured here.

use criterion::{Criterion, criterion_group, criterion_main};
use scs_common::schema::InputSchema;
use scs_common::value::{InputValue, encode_all};
use scs_input::{EventFlags, InputEnumerator};
use std::hint::black_box;

fn lane_assist_image() -> Vec<u8> {
    encode_all(&[
        InputValue::Float(0.12),
        InputValue::Float(0.8),
        InputValue::Float(0.0),
        InputValue::Bool(true),
        InputValue::Bool(false),
    ])
}

/// Full frame decoded from an in-process buffer.
fn bench_frame_from_slice(c: &mut Criterion) {
    let image = lane_assist_image();
    let mut enumerator = InputEnumerator::new(InputSchema::lane_assist(), image.len()).unwrap();

    c.bench_function("frame_lane_assist_slice", |b| {
        b.iter(|| black_box(enumerator.drain_frame(image.as_slice())));
    });

    c.bench_function("poll_first_in_frame", |b| {
        b.iter(|| black_box(enumerator.poll(EventFlags::FIRST_IN_FRAME, image.as_slice())));
    });
}

/// Full frame decoded from a mapped region.
#[cfg(unix)]
fn bench_frame_from_region(c: &mut Criterion) {
    use scs_shared_memory::{RegionId, SharedMemoryRegion};

    let dir = tempfile::TempDir::new().unwrap();
    let id = RegionId::new("bench_frame", dir.path());
    let schema = InputSchema::lane_assist();
    let region = SharedMemoryRegion::create_or_open(&id, schema.region_size()).unwrap();
    std::fs::write(id.path(), lane_assist_image()).unwrap();

    let mut enumerator = InputEnumerator::new(schema, region.size()).unwrap();
    c.bench_function("frame_lane_assist_region", |b| {
        b.iter(|| black_box(enumerator.drain_frame(&region)));
    });
}

#[cfg(not(unix))]
fn bench_frame_from_region(_c: &mut Criterion) {}

criterion_group!(benches, bench_frame_from_slice, bench_frame_from_region);
criterion_main!(benches);
