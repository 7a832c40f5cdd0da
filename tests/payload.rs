//! Payload packer round-trip and layout tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sensenode::payload::*;

const ORDERS: [ByteOrder; 3] = [ByteOrder::Little, ByteOrder::Big, ByteOrder::Native];

fn random_vector(rng: &mut StdRng) -> MeasurementVector {
    let mut values = [0.0f32; SLOT_COUNT];
    for value in values.iter_mut() {
        *value = f32::from_bits(rng.r#gen::<u32>());
    }
    MeasurementVector::new(values)
}

#[test]
fn test_random_bit_patterns_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5EED_A125);
    for _ in 0..1000 {
        let vector = random_vector(&mut rng);
        for order in ORDERS {
            let payload = pack(&vector, order);
            assert_eq!(payload.as_bytes().len(), PAYLOAD_LEN);
            assert!(unpack(&payload, order).bit_eq(&vector));
        }
    }
}

#[test]
fn test_finite_readings_round_trip_with_equality() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let mut values = [0.0f32; SLOT_COUNT];
        for value in values.iter_mut() {
            *value = rng.gen_range(-1000.0f32..1000.0);
        }
        let vector = MeasurementVector::from(values);
        assert_eq!(unpack(&pack(&vector, ByteOrder::Little), ByteOrder::Little), vector);
    }
}

#[test]
fn test_orders_are_byte_reversed_per_slot() {
    let vector = MeasurementVector::new([21.5, 48.25, -3.0, 1013.25, 0.5, 7.0, 99.0, -0.125]);
    let little = pack(&vector, ByteOrder::Little);
    let big = pack(&vector, ByteOrder::Big);

    for (le, be) in little
        .as_bytes()
        .chunks_exact(SLOT_SIZE)
        .zip(big.as_bytes().chunks_exact(SLOT_SIZE))
    {
        let mut reversed = [0u8; SLOT_SIZE];
        reversed.copy_from_slice(le);
        reversed.reverse();
        assert_eq!(&reversed[..], be);
    }
}

#[test]
fn test_sequential_writes_only_leak_unwritten_slots() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut buffer = PayloadBuffer::new(ByteOrder::Little);

    let first = random_vector(&mut rng);
    buffer.write_values(first.as_array());

    for count in 0..=SLOT_COUNT {
        buffer.write_values(first.as_array());
        let second = random_vector(&mut rng);
        assert_eq!(buffer.write_values(&second.as_array()[..count]), count);

        let bytes = buffer.as_bytes();
        let split = count * SLOT_SIZE;
        assert_eq!(&bytes[..split], &pack(&second, ByteOrder::Little).as_bytes()[..split]);
        assert_eq!(&bytes[split..], &pack(&first, ByteOrder::Little).as_bytes()[split..]);
    }
}

#[test]
fn test_pack_fresh_never_leaks() {
    let mut buffer = PayloadBuffer::new(ByteOrder::Big);
    buffer.write_values(&[f32::NAN; SLOT_COUNT]);

    for count in 0..=SLOT_COUNT {
        buffer.write_values(&[f32::NAN; SLOT_COUNT]);
        buffer.pack_fresh(&[1.5; SLOT_COUNT][..count]);
        let values = buffer.values();
        for slot in 0..SLOT_COUNT {
            let expected = if slot < count { 1.5 } else { 0.0 };
            assert_eq!(values.get(slot), Some(expected));
        }
    }
}

#[test]
fn test_base64_round_trip() {
    let vector = MeasurementVector::new([1.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let payload = pack(&vector, ByteOrder::Little);
    let text = payload.to_base64().unwrap();
    assert_eq!(text.as_str(), "AACAPwAAgL8AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");

    let decoded = Payload::from_base64(&text).unwrap();
    assert_eq!(decoded, payload);
    assert_eq!(unpack(&decoded, ByteOrder::Little), vector);
}

#[test]
fn test_payload_from_received_frame() {
    let frame: Vec<u8> = pack(&MeasurementVector::new([3.25; SLOT_COUNT]), ByteOrder::Big)
        .as_bytes()
        .to_vec();
    let payload = Payload::try_from(frame.as_slice()).unwrap();
    assert_eq!(unpack(&payload, ByteOrder::Big).into_array(), [3.25; SLOT_COUNT]);

    assert_eq!(
        Payload::try_from(&frame[..frame.len() - 1]),
        Err(Error::InvalidLength)
    );
}
