use criterion::{criterion_group, criterion_main};

mod model;
mod payload;

criterion_group!(
    benches,
    payload::bench_pack,
    payload::bench_unpack,
    payload::bench_buffer_cycle,
    model::bench_observation_json
);
criterion_main!(benches);
