//! # Measurement payload packing
//!
//! The radio uplink of a sensor node carries a single fixed-size frame: eight
//! single-precision readings laid end to end, four bytes each, for a total of
//! 32 bytes. This module converts between that frame and the readings it
//! carries.
//!
//! ```text
//!  slot:   0        1        2        3        4        5        6        7
//!        ┌────────┬────────┬────────┬────────┬────────┬────────┬────────┬────────┐
//!  bytes │ 0..4   │ 4..8   │ 8..12  │ 12..16 │ 16..20 │ 20..24 │ 24..28 │ 28..32 │
//!        └────────┴────────┴────────┴────────┴────────┴────────┴────────┴────────┘
//! ```
//!
//! Each slot holds the raw IEEE-754 bit pattern of its value. Nothing is
//! scaled, validated or normalised on the way through: NaN payloads, signed
//! zeros and infinities come out exactly as they went in.
//!
//! # Byte order
//!
//! Sender and receiver must agree on the byte order of each slot. It is
//! always passed explicitly as a [`ByteOrder`] and defaults to
//! [`ByteOrder::Little`]. [`ByteOrder::Native`] reproduces the in-memory
//! layout of the host and exists only to talk to firmware that transmitted
//! its float array as-is; frames produced that way are not portable between
//! hosts of different endianness.
//!
//! # Usage
//!
//! ```rust
//! use sensenode::payload::{pack, unpack, ByteOrder, MeasurementVector};
//!
//! let readings = MeasurementVector::new([21.5, 48.0, 12.3, 7.9, 0.0, 0.0, 0.0, 0.0]);
//! let payload = pack(&readings, ByteOrder::Little);
//! assert_eq!(payload.as_bytes().len(), 32);
//!
//! let decoded = unpack(&payload, ByteOrder::Little);
//! assert!(decoded.bit_eq(&readings));
//! ```

#![deny(unsafe_code)]

use base64ct::{Base64, Encoding};
use core::ops::Range;
use heapless::String;

/// Error type for payload boundaries
pub mod error;

pub use error::Error;


/// Number of reading slots in a payload.
pub const SLOT_COUNT: usize = 8;

/// Width of one slot in bytes.
pub const SLOT_SIZE: usize = 4;

/// Total payload length in bytes.
pub const PAYLOAD_LEN: usize = SLOT_COUNT * SLOT_SIZE;

/// Length of a payload rendered as padded base64 text.
pub const BASE64_LEN: usize = 44;

/// Byte order used for every slot of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
    /// Whatever the host uses. Not portable across hosts.
    Native,
}

impl ByteOrder {
    /// Encode one reading into its slot bytes
    pub fn encode(self, value: f32) -> [u8; SLOT_SIZE] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Native => value.to_ne_bytes(),
        }
    }

    /// Decode one reading from its slot bytes
    pub fn decode(self, bytes: [u8; SLOT_SIZE]) -> f32 {
        match self {
            ByteOrder::Little => f32::from_le_bytes(bytes),
            ByteOrder::Big => f32::from_be_bytes(bytes),
            ByteOrder::Native => f32::from_ne_bytes(bytes),
        }
    }
}

/// Eight readings in the order agreed between sender and receiver.
///
/// Slots without a reading hold `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementVector([f32; SLOT_COUNT]);

impl MeasurementVector {
    /// All slots set to `0.0`.
    pub const ZERO: Self = Self([0.0; SLOT_COUNT]);

    /// Create a vector from exactly eight readings.
    pub const fn new(values: [f32; SLOT_COUNT]) -> Self {
        Self(values)
    }

    /// Create a vector from up to eight readings.
    ///
    /// Missing slots are `0.0`; readings past the eighth are ignored.
    pub fn from_slice(values: &[f32]) -> Self {
        let mut vector = Self::ZERO;
        for (slot, value) in vector.0.iter_mut().zip(values) {
            *slot = *value;
        }
        vector
    }

    /// Reading at `index`, if the index is a valid slot.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Replace the reading at `index`.
    pub fn set(&mut self, index: usize, value: f32) -> Result<(), Error> {
        let slot = self.0.get_mut(index).ok_or(Error::SlotOutOfRange)?;
        *slot = value;
        Ok(())
    }

    /// Borrow the readings as an array.
    pub fn as_array(&self) -> &[f32; SLOT_COUNT] {
        &self.0
    }

    /// Consume the vector, returning the readings.
    pub fn into_array(self) -> [f32; SLOT_COUNT] {
        self.0
    }

    /// Compare two vectors bit for bit.
    ///
    /// Unlike `==`, this treats identical NaN payloads as equal and tells
    /// `0.0` apart from `-0.0`.
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl From<[f32; SLOT_COUNT]> for MeasurementVector {
    fn from(values: [f32; SLOT_COUNT]) -> Self {
        Self(values)
    }
}

impl From<MeasurementVector> for [f32; SLOT_COUNT] {
    fn from(vector: MeasurementVector) -> Self {
        vector.0
    }
}

/// The 32 bytes handed to the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Payload([u8; PAYLOAD_LEN]);

impl Payload {
    /// A payload of zero bytes, which is also the packing of [`MeasurementVector::ZERO`].
    pub const ZERO: Self = Self([0; PAYLOAD_LEN]);

    /// Wrap raw payload bytes.
    pub const fn from_bytes(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    /// Consume the payload, returning the raw bytes.
    pub fn into_bytes(self) -> [u8; PAYLOAD_LEN] {
        self.0
    }

    /// Render the payload as padded standard base64.
    ///
    /// This is the form LoRaWAN network servers use for `frm_payload` in
    /// their JSON uplink messages.
    pub fn to_base64(&self) -> Result<String<BASE64_LEN>, Error> {
        let mut buf = [0u8; BASE64_LEN];
        let encoded = Base64::encode(&self.0, &mut buf).map_err(|_| Error::Encoding)?;
        String::try_from(encoded).map_err(|_| Error::Encoding)
    }

    /// Parse a payload from padded standard base64.
    ///
    /// # Errors
    ///
    /// * [`Error::Encoding`] - the text is not valid base64
    /// * [`Error::InvalidLength`] - the text decodes to something other than 32 bytes
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        // One spare byte so an oversized input reports its length, not a bad encoding.
        let mut buf = [0u8; PAYLOAD_LEN + 1];
        let decoded = match Base64::decode(text.as_bytes(), &mut buf) {
            Ok(decoded) => decoded,
            Err(base64ct::Error::InvalidLength) => return Err(Error::InvalidLength),
            Err(_) => return Err(Error::Encoding),
        };
        Self::try_from(decoded)
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::ZERO
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PAYLOAD_LEN]> for Payload {
    fn from(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Payload {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; PAYLOAD_LEN] = bytes.try_into().map_err(|_| Error::InvalidLength)?;
        Ok(Self(bytes))
    }
}

/// Pack eight readings into a payload.
///
/// Slot `i` of the payload holds the bytes of `vector[i]` in the given
/// byte order. This never fails and never alters a value.
pub fn pack(vector: &MeasurementVector, order: ByteOrder) -> Payload {
    let mut bytes = [0u8; PAYLOAD_LEN];
    for (chunk, value) in bytes.chunks_exact_mut(SLOT_SIZE).zip(vector.0.iter()) {
        chunk.copy_from_slice(&order.encode(*value));
    }
    Payload(bytes)
}

/// Unpack a payload into its eight readings.
///
/// `order` must match the order the payload was packed with.
pub fn unpack(payload: &Payload, order: ByteOrder) -> MeasurementVector {
    let mut values = [0.0f32; SLOT_COUNT];
    for (value, chunk) in values.iter_mut().zip(payload.0.chunks_exact(SLOT_SIZE)) {
        *value = order.decode(slot_bytes(chunk));
    }
    MeasurementVector(values)
}

fn slot_bytes(chunk: &[u8]) -> [u8; SLOT_SIZE] {
    let mut raw = [0u8; SLOT_SIZE];
    raw.copy_from_slice(chunk);
    raw
}

fn slot_range(index: usize) -> Result<Range<usize>, Error> {
    if index >= SLOT_COUNT {
        return Err(Error::SlotOutOfRange);
    }
    let start = index * SLOT_SIZE;
    Ok(start..start + SLOT_SIZE)
}

/// A payload that is filled in place, once per transmission cycle.
///
/// Writes only touch the slots they name. A cycle that writes fewer than
/// eight readings leaves the remaining slots holding whatever the previous
/// cycle put there; call [`clear`](Self::clear) or use
/// [`pack_fresh`](Self::pack_fresh) when stale slots must not go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PayloadBuffer {
    bytes: [u8; PAYLOAD_LEN],
    order: ByteOrder,
}

impl PayloadBuffer {
    /// Create a zeroed buffer using `order` for every slot.
    pub const fn new(order: ByteOrder) -> Self {
        Self {
            bytes: [0; PAYLOAD_LEN],
            order,
        }
    }

    /// Byte order used by this buffer.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Overwrite a single slot.
    ///
    /// # Arguments
    ///
    /// * `index` - Slot to write, `0..SLOT_COUNT`
    /// * `value` - Reading stored verbatim
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Slot written
    /// * `Err(Error::SlotOutOfRange)` - `index` is not a slot; the buffer is unchanged
    pub fn write_slot(&mut self, index: usize, value: f32) -> Result<(), Error> {
        let range = slot_range(index)?;
        self.bytes[range].copy_from_slice(&self.order.encode(value));
        Ok(())
    }

    /// Read a single slot back.
    pub fn read_slot(&self, index: usize) -> Result<f32, Error> {
        let range = slot_range(index)?;
        Ok(self.order.decode(slot_bytes(&self.bytes[range])))
    }

    /// Write readings into slots `0..values.len()`.
    ///
    /// At most [`SLOT_COUNT`] readings are written and the rest are
    /// ignored. Slots past the last reading are left untouched.
    ///
    /// Returns the number of slots written.
    pub fn write_values(&mut self, values: &[f32]) -> usize {
        let mut written = 0;
        for (chunk, value) in self.bytes.chunks_exact_mut(SLOT_SIZE).zip(values) {
            chunk.copy_from_slice(&self.order.encode(*value));
            written += 1;
        }
        written
    }

    /// Zero every byte.
    pub fn clear(&mut self) {
        self.bytes = [0; PAYLOAD_LEN];
    }

    /// Zero the buffer, then write `values` as [`write_values`](Self::write_values) does.
    pub fn pack_fresh(&mut self, values: &[f32]) -> usize {
        self.clear();
        self.write_values(values)
    }

    /// Current contents as a payload.
    pub fn payload(&self) -> Payload {
        Payload(self.bytes)
    }

    /// Current contents decoded into readings.
    pub fn values(&self) -> MeasurementVector {
        unpack(&self.payload(), self.order)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.bytes
    }
}
