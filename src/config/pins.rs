//! Sensor wiring of a node

use super::{Error, keys, small_number};

/// DHT temperature/humidity sensor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DhtModel {
    /// DHT11
    Dht11,
    /// DHT21 (AM2301)
    Dht21,
    /// DHT22 (AM2302, AM2321)
    #[default]
    Dht22,
}

impl DhtModel {
    /// Parse a model name such as `DHT22` or `am2302`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let is = |candidate: &str| name.eq_ignore_ascii_case(candidate);
        if is("DHT11") {
            Some(DhtModel::Dht11)
        } else if is("DHT21") || is("AM2301") {
            Some(DhtModel::Dht21)
        } else if is("DHT22") || is("AM2302") || is("AM2321") {
            Some(DhtModel::Dht22)
        } else {
            None
        }
    }
}

/// GPIO numbers the sensors are attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// GPS UART receive
    pub gps_rx: u8,
    /// GPS UART transmit
    pub gps_tx: u8,
    /// SDS011 particulate sensor UART receive
    pub sds_rx: u8,
    /// SDS011 particulate sensor UART transmit
    pub sds_tx: u8,
    /// DHT data line
    pub dht: u8,
    /// DHT variant
    pub dht_model: DhtModel,
}

impl PinMap {
    /// Wiring of the airsense board.
    pub const AIRSENSE: Self = Self {
        gps_rx: 38,
        gps_tx: 39,
        sds_rx: 17,
        sds_tx: 23,
        dht: 34,
        dht_model: DhtModel::Dht22,
    };

    /// Start from [`PinMap::AIRSENSE`] and apply any pin keys that are set.
    pub fn from_lookup<F, S>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<S>,
        S: AsRef<str>,
    {
        let base = Self::AIRSENSE;
        let dht_model = match lookup(keys::DHT_MODEL) {
            Some(name) => {
                DhtModel::from_name(name.as_ref()).ok_or(Error::InvalidValue(keys::DHT_MODEL))?
            }
            None => base.dht_model,
        };

        Ok(Self {
            gps_rx: small_number(&lookup, keys::PIN_GPS_RX)?.unwrap_or(base.gps_rx),
            gps_tx: small_number(&lookup, keys::PIN_GPS_TX)?.unwrap_or(base.gps_tx),
            sds_rx: small_number(&lookup, keys::PIN_SDS_RX)?.unwrap_or(base.sds_rx),
            sds_tx: small_number(&lookup, keys::PIN_SDS_TX)?.unwrap_or(base.sds_tx),
            dht: small_number(&lookup, keys::PIN_DHT)?.unwrap_or(base.dht),
            dht_model,
        })
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::AIRSENSE
    }
}
