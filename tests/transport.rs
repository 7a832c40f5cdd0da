//! Transmitter tests against an in-memory radio

use sensenode::payload::{ByteOrder, MeasurementVector, Payload, unpack};
use sensenode::transport::{FillPolicy, Transmitter, Uplink};

#[derive(Debug, PartialEq, Eq)]
enum RadioError {
    DutyCycle,
}

#[derive(Debug, Default)]
struct MockRadio {
    sent: Vec<Payload>,
    fail_next: bool,
}

impl Uplink for MockRadio {
    type Error = RadioError;

    fn send(&mut self, payload: &Payload) -> Result<(), Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(RadioError::DutyCycle);
        }
        self.sent.push(*payload);
        Ok(())
    }
}

#[test]
fn test_transmit_sends_packed_readings() {
    let mut tx = Transmitter::new(MockRadio::default(), ByteOrder::Little, FillPolicy::ZeroFill);
    tx.transmit(&[21.5, 48.0, 12.25]).unwrap();

    let radio = tx.uplink();
    assert_eq!(radio.sent.len(), 1);
    assert_eq!(
        unpack(&radio.sent[0], ByteOrder::Little).into_array(),
        [21.5, 48.0, 12.25, 0.0, 0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(tx.cycles(), 1);
}

#[test]
fn test_zero_fill_policy_clears_stale_slots() {
    let mut tx = Transmitter::new(MockRadio::default(), ByteOrder::Big, FillPolicy::ZeroFill);
    tx.transmit(&[1.0; 8]).unwrap();
    tx.transmit(&[2.0, 3.0]).unwrap();

    let second = unpack(&tx.uplink().sent[1], ByteOrder::Big);
    assert_eq!(second.into_array(), [2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_retain_policy_keeps_stale_slots() {
    let mut tx = Transmitter::new(MockRadio::default(), ByteOrder::Little, FillPolicy::Retain);
    tx.transmit(&[1.0; 8]).unwrap();
    tx.transmit(&[2.0, 3.0]).unwrap();

    let second = unpack(&tx.uplink().sent[1], ByteOrder::Little);
    assert_eq!(second.into_array(), [2.0, 3.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_extra_readings_are_dropped() {
    let mut tx = Transmitter::new(MockRadio::default(), ByteOrder::Little, FillPolicy::default());
    let readings: Vec<f32> = (0..12).map(|i| i as f32).collect();
    assert_eq!(tx.transmit(&readings), Ok(8));
    assert_eq!(tx.transmit(&readings[..3]), Ok(3));
    tx.transmit(&readings).unwrap();

    let sent = unpack(&tx.last_payload(), ByteOrder::Little);
    assert_eq!(sent.into_array(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
}

#[test]
fn test_uplink_error_is_returned_and_not_counted() {
    let radio = MockRadio {
        fail_next: true,
        ..MockRadio::default()
    };
    let mut tx = Transmitter::new(radio, ByteOrder::Little, FillPolicy::ZeroFill);

    assert_eq!(tx.transmit(&[5.0]), Err(RadioError::DutyCycle));
    assert_eq!(tx.cycles(), 0);
    assert_eq!(unpack(&tx.last_payload(), ByteOrder::Little).get(0), Some(5.0));

    tx.transmit(&[6.0]).unwrap();
    assert_eq!(tx.cycles(), 1);
    assert_eq!(tx.into_uplink().sent.len(), 1);
}

#[test]
fn test_transmit_vector_preserves_special_values() {
    let vector = MeasurementVector::new([
        f32::NAN,
        f32::INFINITY,
        -0.0,
        1.0,
        0.0,
        0.0,
        0.0,
        f32::NEG_INFINITY,
    ]);
    let mut tx = Transmitter::new(MockRadio::default(), ByteOrder::Native, FillPolicy::ZeroFill);
    tx.transmit_vector(&vector).unwrap();

    assert!(unpack(&tx.uplink().sent[0], ByteOrder::Native).bit_eq(&vector));
}

#[cfg(feature = "async")]
mod async_uplink {
    use super::*;
    use futures::executor::block_on;
    use sensenode::transport::{AsyncTransmitter, AsyncUplink};

    #[derive(Debug, Default)]
    struct AsyncRadio {
        sent: Vec<Payload>,
    }

    impl AsyncUplink for AsyncRadio {
        type Error = RadioError;

        async fn send(&mut self, payload: &Payload) -> Result<(), Self::Error> {
            self.sent.push(*payload);
            Ok(())
        }
    }

    #[test]
    fn test_async_transmit() {
        let mut tx =
            AsyncTransmitter::new(AsyncRadio::default(), ByteOrder::Little, FillPolicy::ZeroFill);
        assert_eq!(block_on(tx.transmit(&[7.5, 8.5])), Ok(2));
        block_on(tx.transmit(&[9.5])).unwrap();

        assert_eq!(tx.cycles(), 2);
        let radio = tx.into_uplink();
        assert_eq!(
            unpack(&radio.sent[1], ByteOrder::Little).into_array(),
            [9.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }
}
