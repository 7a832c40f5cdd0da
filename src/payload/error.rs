//! Error type for the edges of the payload packer

/// Errors raised when payload bytes cross a boundary the packer does not own.
///
/// Packing and unpacking themselves never fail; these only surface when a
/// caller hands over a slice, an index or a text encoding that cannot map
/// onto the fixed 32-byte layout.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A byte slice was not exactly [`PAYLOAD_LEN`](super::PAYLOAD_LEN) bytes long.
    InvalidLength,
    /// A slot index was not below [`SLOT_COUNT`](super::SLOT_COUNT).
    SlotOutOfRange,
    /// Base64 text could not be encoded or decoded.
    Encoding,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidLength => defmt::write!(f, "InvalidLength"),
            Error::SlotOutOfRange => defmt::write!(f, "SlotOutOfRange"),
            Error::Encoding => defmt::write!(f, "Encoding"),
        }
    }
}
