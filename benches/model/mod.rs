use criterion::Criterion;
use sensenode::model::{DateTime, Datastream, Observation, UnitOfMeasurement};
use std::hint::black_box;

pub fn bench_observation_json(c: &mut Criterion) {
    let unit = UnitOfMeasurement::new("degree Celsius", "Cel", "ucum:Cel").unwrap();
    let stream = Datastream::new("temperature", "DHT22 air temperature", unit).unwrap();
    let at = DateTime::from_unix_timestamp(1_700_000_000).unwrap();
    let mut buf = [0u8; 512];

    c.bench_function("observation_to_json", |b| {
        b.iter(|| {
            Observation::new(&stream, at, black_box(21.5))
                .to_json(&mut buf)
                .unwrap()
        })
    });
}
