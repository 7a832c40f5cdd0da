//! # sensenode - payloads and reports for small sensor nodes
//!
//! Building blocks shared by the "airsense" (air quality over LoRaWAN) and
//! "websense" (environment over WiFi/MQTT) sensor nodes. Everything works in
//! `no_std` environments without an allocator.
//!
//! ## Modules
//!
//! - **[`payload`]**: packs eight `f32` readings into the fixed 32-byte radio
//!   payload and back, with an explicit byte order
//! - **[`transport`]**: the [`Uplink`](transport::Uplink) seam to a radio and a
//!   per-cycle [`Transmitter`](transport::Transmitter)
//! - **[`model`]**: timestamps and SensorThings-style records for reporting
//! - **[`config`]**: device identity, credentials and wiring loaded at startup
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sensenode = "0.1.0"
//! ```
//!
//! ### Packing readings for the radio
//!
//! ```rust
//! use sensenode::payload::{pack, unpack, ByteOrder, MeasurementVector};
//!
//! // temperature, humidity, PM2.5, PM10
//! let readings = MeasurementVector::from_slice(&[21.5, 48.0, 12.3, 20.1]);
//! let payload = pack(&readings, ByteOrder::Little);
//!
//! // On the receiving side, with the same byte order:
//! let received = unpack(&payload, ByteOrder::Little);
//! assert!(received.bit_eq(&readings));
//! ```
//!
//! ### Reporting an observation
//!
//! ```rust
//! use sensenode::model::{DateTime, Datastream, Observation, UnitOfMeasurement};
//!
//! let unit = UnitOfMeasurement::new("percent", "%", "ucum:%").unwrap();
//! let humidity = Datastream::new("humidity", "DHT22 relative humidity", unit).unwrap();
//! let now = DateTime::from_unix_timestamp(1_700_000_000).unwrap();
//!
//! let mut buf = [0u8; 512];
//! let len = Observation::new(&humidity, now, 48.5).to_json(&mut buf).unwrap();
//! assert!(len > 0);
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support, e.g. loading config from the environment
//! - `async`: Enable the async uplink and transmitter
//! - `defmt`: Enable defmt formatting and logging for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Fixed-layout packing of sensor readings into radio payloads.
pub mod payload;

/// Radio uplink abstraction and the per-cycle transmitter.
pub mod transport;

/// Timestamps and SensorThings-style reporting records.
pub mod model;

/// Device identity, credentials and pin wiring.
///
/// Replaces compiled-in constants with values read at startup.
pub mod config;
