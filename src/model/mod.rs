//! # Reporting data model
//!
//! Plain records that carry readings from acquisition code to whatever
//! reports them: a wall-clock [`DateTime`] and a small SensorThings-like
//! entity set ([`Thing`], [`UnitOfMeasurement`], [`Datastream`],
//! [`Observation`]).
//!
//! The records have no behaviour beyond construction and serialization.
//! Strings are fixed-capacity so everything works without an allocator;
//! constructors fail with [`Error::BufferOverflow`] rather than truncating.
//!
//! ```rust
//! use sensenode::model::{DateTime, Datastream, Observation, UnitOfMeasurement};
//!
//! let unit = UnitOfMeasurement::new("degree Celsius", "°C", "ucum:Cel").unwrap();
//! let stream = Datastream::new("temperature", "DHT22 air temperature", unit).unwrap();
//! let at = DateTime::new(2024, 5, 1, 12, 0, 0).unwrap();
//!
//! let json = Observation::new(&stream, at, 21.5).to_json_string::<512>().unwrap();
//! assert!(json.starts_with(r#"{"phenomenonTime":"2024-05-01T12:00:00Z","result":21.5"#));
//! ```

#![deny(unsafe_code)]

/// Wall-clock timestamps
pub mod datetime;

/// SensorThings-style entities
pub mod sensorthings;

pub use datetime::DateTime;
pub use sensorthings::{
    Datastream, Location, Observation, ObservationType, Thing, UnitOfMeasurement,
};

/// Errors raised while building or serializing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A calendar field is out of range.
    InvalidDateTime,
    /// A string or output buffer is too small.
    BufferOverflow,
    /// The serializer rejected a value.
    Serialize,
}

impl From<serde_json_core::ser::Error> for Error {
    fn from(error: serde_json_core::ser::Error) -> Self {
        match error {
            serde_json_core::ser::Error::BufferFull => Error::BufferOverflow,
            #[allow(unreachable_patterns)]
            _ => Error::Serialize,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidDateTime => defmt::write!(f, "InvalidDateTime"),
            Error::BufferOverflow => defmt::write!(f, "BufferOverflow"),
            Error::Serialize => defmt::write!(f, "Serialize"),
        }
    }
}
