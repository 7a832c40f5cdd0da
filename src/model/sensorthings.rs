//! SensorThings-style records for reporting readings upstream

use super::{DateTime, Error};
use crate::config::DeviceConfig;
use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum length of entity names
pub const NAME_LEN: usize = 32;
/// Maximum length of entity descriptions
pub const DESCRIPTION_LEN: usize = 64;
/// Maximum length of a unit symbol
pub const SYMBOL_LEN: usize = 8;
/// Maximum length of a unit definition URI
pub const DEFINITION_LEN: usize = 96;

fn bounded<const N: usize>(value: &str) -> Result<String<N>, Error> {
    String::try_from(value).map_err(|_| Error::BufferOverflow)
}

/// Where a thing is deployed, in WGS-84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Degrees north
    pub latitude: f32,
    /// Degrees east
    pub longitude: f32,
}

/// The deployed sensor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    /// Short name, usually the device id
    pub name: String<NAME_LEN>,
    /// Free text, usually the site name
    pub description: String<DESCRIPTION_LEN>,
    /// Deployment location
    pub location: Location,
}

impl Thing {
    /// Create a thing, failing if a string does not fit its field.
    pub fn new(name: &str, description: &str, location: Location) -> Result<Self, Error> {
        Ok(Self {
            name: bounded(name)?,
            description: bounded(description)?,
            location,
        })
    }

    /// Describe the node identified by `config`.
    pub fn from_config(config: &DeviceConfig) -> Result<Self, Error> {
        Self::new(
            &config.device_id,
            &config.sitename,
            Location {
                latitude: config.latitude,
                longitude: config.longitude,
            },
        )
    }
}

/// Unit a datastream's results are expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasurement {
    /// Human readable name, e.g. "degree Celsius"
    pub name: String<NAME_LEN>,
    /// Symbol, e.g. "°C"
    pub symbol: String<SYMBOL_LEN>,
    /// URI defining the unit
    pub definition: String<DEFINITION_LEN>,
}

impl UnitOfMeasurement {
    /// Create a unit, failing if a string does not fit its field.
    pub fn new(name: &str, symbol: &str, definition: &str) -> Result<Self, Error> {
        Ok(Self {
            name: bounded(name)?,
            symbol: bounded(symbol)?,
            definition: bounded(definition)?,
        })
    }
}

/// Kind of result a datastream carries, serialized as its O&M type URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObservationType {
    /// Numeric measurement
    #[default]
    #[serde(rename = "http://www.opengis.net/def/observationType/OGC-OM/2.0/OM_Measurement")]
    Measurement,
    /// Integer count
    #[serde(rename = "http://www.opengis.net/def/observationType/OGC-OM/2.0/OM_CountObservation")]
    Count,
    /// Boolean result
    #[serde(rename = "http://www.opengis.net/def/observationType/OGC-OM/2.0/OM_TruthObservation")]
    Truth,
}

/// One quantity reported by a thing, e.g. "PM2.5".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastream {
    /// Short name
    pub name: String<NAME_LEN>,
    /// Free text
    pub description: String<DESCRIPTION_LEN>,
    /// Kind of result
    pub observation_type: ObservationType,
    /// Unit of every result in the stream
    pub unit_of_measurement: UnitOfMeasurement,
}

impl Datastream {
    /// Create a measurement datastream.
    pub fn new(name: &str, description: &str, unit: UnitOfMeasurement) -> Result<Self, Error> {
        Ok(Self {
            name: bounded(name)?,
            description: bounded(description)?,
            observation_type: ObservationType::Measurement,
            unit_of_measurement: unit,
        })
    }
}

/// A single timestamped result on a datastream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation<'a> {
    /// When the reading was taken
    #[serde(rename = "phenomenonTime")]
    pub phenomenon_time: DateTime,
    /// The reading
    pub result: f32,
    /// Stream the reading belongs to
    #[serde(rename = "Datastream")]
    pub datastream: &'a Datastream,
}

impl<'a> Observation<'a> {
    /// Record `result` on `datastream` at `phenomenon_time`.
    pub fn new(datastream: &'a Datastream, phenomenon_time: DateTime, result: f32) -> Self {
        Self {
            phenomenon_time,
            result,
            datastream,
        }
    }

    /// Serialize as JSON into `buf`, returning the number of bytes written.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, Error> {
        serde_json_core::to_slice(self, buf).map_err(Error::from)
    }

    /// Serialize as JSON into a fixed-capacity string.
    pub fn to_json_string<const N: usize>(&self) -> Result<String<N>, Error> {
        serde_json_core::to_string(self).map_err(Error::from)
    }
}
