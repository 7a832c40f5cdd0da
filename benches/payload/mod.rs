use criterion::{BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sensenode::payload::{
    ByteOrder, MeasurementVector, PAYLOAD_LEN, PayloadBuffer, SLOT_COUNT, pack, unpack,
};
use std::hint::black_box;

const ORDERS: [(&str, ByteOrder); 3] = [
    ("little", ByteOrder::Little),
    ("big", ByteOrder::Big),
    ("native", ByteOrder::Native),
];

fn sample_vector() -> MeasurementVector {
    let mut rng = StdRng::seed_from_u64(0xA1A5E45E);
    let mut values = [0.0f32; SLOT_COUNT];
    for value in values.iter_mut() {
        *value = rng.gen_range(-100.0f32..100.0);
    }
    MeasurementVector::new(values)
}

pub fn bench_pack(c: &mut Criterion) {
    let vector = sample_vector();
    let mut group = c.benchmark_group("pack");
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));
    for (name, order) in ORDERS {
        group.bench_with_input(BenchmarkId::from_parameter(name), &order, |b, order| {
            b.iter(|| pack(black_box(&vector), *order))
        });
    }
    group.finish();
}

pub fn bench_unpack(c: &mut Criterion) {
    let vector = sample_vector();
    let mut group = c.benchmark_group("unpack");
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));
    for (name, order) in ORDERS {
        let payload = pack(&vector, order);
        group.bench_with_input(BenchmarkId::from_parameter(name), &order, |b, order| {
            b.iter(|| unpack(black_box(&payload), *order))
        });
    }
    group.finish();
}

pub fn bench_buffer_cycle(c: &mut Criterion) {
    let readings = sample_vector().into_array();
    let mut buffer = PayloadBuffer::new(ByteOrder::Little);
    c.bench_function("buffer_pack_fresh", |b| {
        b.iter(|| {
            buffer.pack_fresh(black_box(&readings[..5]));
            buffer.payload()
        })
    });
}
