//! # Device configuration
//!
//! Identity, credentials and wiring for a sensor node, populated at startup
//! from a key/value source instead of being compiled into the firmware.
//!
//! Any source works as long as it can answer "what is the value of this
//! key": a provisioning partition, a `.env` file on a development host, or
//! the process environment (see [`DeviceConfig::from_env`] with the `std`
//! feature).
//!
//! ```rust
//! use sensenode::config::{keys, DeviceConfig};
//!
//! let lookup = |key: &str| match key {
//!     keys::SITENAME => Some("stof"),
//!     keys::APP_ID => Some("airsense"),
//!     keys::DEVICE_ID => Some("1011DL143"),
//!     keys::LATITUDE => Some("52.3757"),
//!     keys::LONGITUDE => Some("4.9083"),
//!     _ => None,
//! };
//!
//! let config = DeviceConfig::from_lookup(lookup).unwrap();
//! assert_eq!(config.app_id.as_str(), "airsense");
//! assert!(config.lora.is_none());
//! ```

#![deny(unsafe_code)]

use core::fmt::{self, Write as _};
use heapless::String;

/// Pin assignments
pub mod pins;

pub use pins::{DhtModel, PinMap};

/// Maximum length of identity strings (site, application, device)
pub const IDENTITY_LEN: usize = 32;
/// Maximum length of a WiFi SSID
pub const SSID_LEN: usize = 32;
/// Maximum length of a WiFi passphrase
pub const PASSWORD_LEN: usize = 64;
/// Maximum length of an MQTT broker host name
pub const HOST_LEN: usize = 64;
/// Capacity of a rendered MQTT topic
pub const TOPIC_LEN: usize = 2 * IDENTITY_LEN + 16;

/// Broker used when none is configured.
pub const DEFAULT_MQTT_SERVER: &str = "test.mosquitto.org";

/// Names of the configuration keys.
pub mod keys {
    /// Human readable site name
    pub const SITENAME: &str = "SENSENODE_SITENAME";
    /// Application identifier, first MQTT topic level
    pub const APP_ID: &str = "SENSENODE_APP_ID";
    /// Device identifier, second MQTT topic level
    pub const DEVICE_ID: &str = "SENSENODE_DEVICE_ID";
    /// Deployment latitude in degrees
    pub const LATITUDE: &str = "SENSENODE_LATITUDE";
    /// Deployment longitude in degrees
    pub const LONGITUDE: &str = "SENSENODE_LONGITUDE";
    /// WiFi network name
    pub const WIFI_SSID: &str = "SENSENODE_WIFI_SSID";
    /// WiFi passphrase
    pub const WIFI_PASSWORD: &str = "SENSENODE_WIFI_PASSWORD";
    /// MQTT broker host
    pub const MQTT_SERVER: &str = "SENSENODE_MQTT_SERVER";
    /// LoRaWAN ABP device address
    pub const LORA_DEV_ADDR: &str = "SENSENODE_LORA_DEV_ADDR";
    /// LoRaWAN ABP network session key
    pub const LORA_NWK_S_KEY: &str = "SENSENODE_LORA_NWK_S_KEY";
    /// LoRaWAN ABP application session key
    pub const LORA_APP_S_KEY: &str = "SENSENODE_LORA_APP_S_KEY";
    /// LoRaWAN OTAA device EUI
    pub const LORA_DEV_EUI: &str = "SENSENODE_LORA_DEV_EUI";
    /// LoRaWAN OTAA application EUI
    pub const LORA_APP_EUI: &str = "SENSENODE_LORA_APP_EUI";
    /// LoRaWAN OTAA application key
    pub const LORA_APP_KEY: &str = "SENSENODE_LORA_APP_KEY";
    /// GPS UART receive pin
    pub const PIN_GPS_RX: &str = "SENSENODE_PIN_GPS_RX";
    /// GPS UART transmit pin
    pub const PIN_GPS_TX: &str = "SENSENODE_PIN_GPS_TX";
    /// Particulate sensor UART receive pin
    pub const PIN_SDS_RX: &str = "SENSENODE_PIN_SDS_RX";
    /// Particulate sensor UART transmit pin
    pub const PIN_SDS_TX: &str = "SENSENODE_PIN_SDS_TX";
    /// DHT data pin
    pub const PIN_DHT: &str = "SENSENODE_PIN_DHT";
    /// DHT sensor model
    pub const DHT_MODEL: &str = "SENSENODE_DHT_MODEL";
}

/// Errors raised while loading configuration. Each names the offending key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required key has no value.
    Missing(&'static str),
    /// A value does not fit its fixed-capacity field.
    TooLong(&'static str),
    /// A value is not a valid number.
    InvalidNumber(&'static str),
    /// A value is not hex of the expected length.
    InvalidHex(&'static str),
    /// A value is not one of the accepted names.
    InvalidValue(&'static str),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Missing(key) => defmt::write!(f, "Missing({=str})", key),
            Error::TooLong(key) => defmt::write!(f, "TooLong({=str})", key),
            Error::InvalidNumber(key) => defmt::write!(f, "InvalidNumber({=str})", key),
            Error::InvalidHex(key) => defmt::write!(f, "InvalidHex({=str})", key),
            Error::InvalidValue(key) => defmt::write!(f, "InvalidValue({=str})", key),
        }
    }
}

/// WiFi and MQTT settings for nodes that report over IP.
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// WiFi network name
    pub ssid: String<SSID_LEN>,
    /// WiFi passphrase, empty for open networks
    pub password: String<PASSWORD_LEN>,
    /// MQTT broker host
    pub mqtt_server: String<HOST_LEN>,
}

impl fmt::Debug for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("mqtt_server", &self.mqtt_server)
            .finish()
    }
}

/// LoRaWAN activation credentials.
#[derive(Clone, PartialEq, Eq)]
pub enum LoraKeys {
    /// Activation by personalisation: session keys are provisioned up front.
    Abp {
        /// Device address
        dev_addr: [u8; 4],
        /// Network session key
        nwk_s_key: [u8; 16],
        /// Application session key
        app_s_key: [u8; 16],
    },
    /// Over-the-air activation: session keys are negotiated on join.
    Otaa {
        /// Device EUI
        dev_eui: [u8; 8],
        /// Application (join) EUI
        app_eui: [u8; 8],
        /// Application root key
        app_key: [u8; 16],
    },
}

impl fmt::Debug for LoraKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoraKeys::Abp { dev_addr, .. } => f
                .debug_struct("Abp")
                .field("dev_addr", dev_addr)
                .finish_non_exhaustive(),
            LoraKeys::Otaa {
                dev_eui, app_eui, ..
            } => f
                .debug_struct("Otaa")
                .field("dev_eui", dev_eui)
                .field("app_eui", app_eui)
                .finish_non_exhaustive(),
        }
    }
}

impl LoraKeys {
    /// Load credentials, preferring OTAA when its device EUI is set.
    ///
    /// Returns `Ok(None)` when neither activation mode is configured.
    pub fn from_lookup<F, S>(lookup: F) -> Result<Option<Self>, Error>
    where
        F: Fn(&str) -> Option<S>,
        S: AsRef<str>,
    {
        if lookup(keys::LORA_DEV_EUI).is_some() {
            return Ok(Some(LoraKeys::Otaa {
                dev_eui: hex_value(&lookup, keys::LORA_DEV_EUI)?,
                app_eui: hex_value(&lookup, keys::LORA_APP_EUI)?,
                app_key: hex_value(&lookup, keys::LORA_APP_KEY)?,
            }));
        }

        if lookup(keys::LORA_DEV_ADDR).is_some() {
            return Ok(Some(LoraKeys::Abp {
                dev_addr: hex_value(&lookup, keys::LORA_DEV_ADDR)?,
                nwk_s_key: hex_value(&lookup, keys::LORA_NWK_S_KEY)?,
                app_s_key: hex_value(&lookup, keys::LORA_APP_S_KEY)?,
            }));
        }

        Ok(None)
    }
}

/// Everything a node needs to know about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    /// Human readable site name
    pub sitename: String<IDENTITY_LEN>,
    /// Application identifier
    pub app_id: String<IDENTITY_LEN>,
    /// Device identifier
    pub device_id: String<IDENTITY_LEN>,
    /// Deployment latitude in degrees
    pub latitude: f32,
    /// Deployment longitude in degrees
    pub longitude: f32,
    /// WiFi/MQTT settings, if the node reports over IP
    pub network: Option<NetworkConfig>,
    /// LoRaWAN credentials, if the node has a radio
    pub lora: Option<LoraKeys>,
    /// Sensor wiring
    pub pins: PinMap,
}

impl DeviceConfig {
    /// Populate a configuration from any key/value source.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value for a key from [`keys`], or `None` if unset
    ///
    /// # Returns
    ///
    /// * `Ok(config)` - All required keys present and valid
    /// * `Err(error)` - The first missing or malformed key
    pub fn from_lookup<F, S>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<S>,
        S: AsRef<str>,
    {
        let network = match lookup(keys::WIFI_SSID) {
            Some(ssid) => Some(NetworkConfig {
                ssid: bounded(keys::WIFI_SSID, ssid.as_ref())?,
                password: match lookup(keys::WIFI_PASSWORD) {
                    Some(password) => bounded(keys::WIFI_PASSWORD, password.as_ref())?,
                    None => String::new(),
                },
                mqtt_server: match lookup(keys::MQTT_SERVER) {
                    Some(host) => bounded(keys::MQTT_SERVER, host.as_ref())?,
                    None => bounded(keys::MQTT_SERVER, DEFAULT_MQTT_SERVER)?,
                },
            }),
            None => None,
        };

        let config = Self {
            sitename: required(&lookup, keys::SITENAME)?,
            app_id: required(&lookup, keys::APP_ID)?,
            device_id: required(&lookup, keys::DEVICE_ID)?,
            latitude: number(&lookup, keys::LATITUDE)?,
            longitude: number(&lookup, keys::LONGITUDE)?,
            network,
            lora: LoraKeys::from_lookup(&lookup)?,
            pins: PinMap::from_lookup(&lookup)?,
        };

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "config loaded for {=str}/{=str}: network={=bool} lora={=bool}",
            config.app_id.as_str(),
            config.device_id.as_str(),
            config.network.is_some(),
            config.lora.is_some()
        );

        Ok(config)
    }

    /// Populate a configuration from the process environment.
    #[cfg(feature = "std")]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// MQTT topic observations are published on: `{app_id}/{device_id}/observations`.
    pub fn observation_topic(&self) -> String<TOPIC_LEN> {
        let mut topic = String::new();
        // Identity fields are bounded, so the topic always fits.
        let _ = write!(topic, "{}/{}/observations", self.app_id, self.device_id);
        topic
    }
}

fn bounded<const N: usize>(key: &'static str, value: &str) -> Result<String<N>, Error> {
    String::try_from(value).map_err(|_| Error::TooLong(key))
}

fn required<F, S, const N: usize>(lookup: &F, key: &'static str) -> Result<String<N>, Error>
where
    F: Fn(&str) -> Option<S>,
    S: AsRef<str>,
{
    let value = lookup(key).ok_or(Error::Missing(key))?;
    bounded(key, value.as_ref())
}

fn number<F, S>(lookup: &F, key: &'static str) -> Result<f32, Error>
where
    F: Fn(&str) -> Option<S>,
    S: AsRef<str>,
{
    let value = lookup(key).ok_or(Error::Missing(key))?;
    value
        .as_ref()
        .trim()
        .parse::<f32>()
        .map_err(|_| Error::InvalidNumber(key))
}

pub(crate) fn small_number<F, S>(lookup: &F, key: &'static str) -> Result<Option<u8>, Error>
where
    F: Fn(&str) -> Option<S>,
    S: AsRef<str>,
{
    match lookup(key) {
        Some(value) => value
            .as_ref()
            .trim()
            .parse::<u8>()
            .map(Some)
            .map_err(|_| Error::InvalidNumber(key)),
        None => Ok(None),
    }
}

fn hex_value<F, S, const N: usize>(lookup: &F, key: &'static str) -> Result<[u8; N], Error>
where
    F: Fn(&str) -> Option<S>,
    S: AsRef<str>,
{
    let value = lookup(key).ok_or(Error::Missing(key))?;
    parse_hex(value.as_ref().trim()).ok_or(Error::InvalidHex(key))
}

/// Parse exactly `N` bytes of hex, most significant byte first.
///
/// Accepts upper or lower case digits. Anything else, including the
/// `CHANGE_ME` placeholder of an unprovisioned node, is rejected.
pub fn parse_hex<const N: usize>(text: &str) -> Option<[u8; N]> {
    let digits = text.as_bytes();
    if digits.len() != N * 2 {
        return None;
    }

    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }

    let mut bytes = [0u8; N];
    for (byte, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
        let pair = core::str::from_utf8(pair).ok()?;
        *byte = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(bytes)
}
