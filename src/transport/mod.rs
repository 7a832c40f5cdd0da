//! # Radio uplink
//!
//! The packer hands finished payloads to a radio through the [`Uplink`]
//! trait. Framing, addressing, duty-cycle limits and delivery are the
//! implementor's business; this module only owns the per-cycle buffer and
//! the decision of what goes into it.
//!
//! ```rust
//! use sensenode::payload::{ByteOrder, Payload};
//! use sensenode::transport::{FillPolicy, Transmitter, Uplink};
//!
//! struct Loopback(Option<Payload>);
//!
//! impl Uplink for Loopback {
//!     type Error = ();
//!     fn send(&mut self, payload: &Payload) -> Result<(), Self::Error> {
//!         self.0 = Some(*payload);
//!         Ok(())
//!     }
//! }
//!
//! let mut tx = Transmitter::new(Loopback(None), ByteOrder::Little, FillPolicy::ZeroFill);
//! tx.transmit(&[21.5, 48.0]).unwrap();
//! assert_eq!(tx.cycles(), 1);
//! ```

#![allow(async_fn_in_trait)]
#![deny(unsafe_code)]

use crate::payload::{ByteOrder, MeasurementVector, Payload, PayloadBuffer};

/// A radio that accepts one 32-byte payload per call.
pub trait Uplink {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Queue or transmit a payload
    fn send(&mut self, payload: &Payload) -> Result<(), Self::Error>;
}

/// Asynchronous counterpart of [`Uplink`].
#[cfg(feature = "async")]
pub trait AsyncUplink {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Queue or transmit a payload asynchronously
    async fn send(&mut self, payload: &Payload) -> Result<(), Self::Error>;
}

/// What happens to slots a cycle does not write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// Unwritten slots are sent as `0.0`.
    #[default]
    ZeroFill,
    /// Unwritten slots keep the previous cycle's bytes.
    Retain,
}

/// Shared buffer handling for the sync and async transmitters.
#[derive(Debug, Clone)]
struct Cycle {
    buffer: PayloadBuffer,
    policy: FillPolicy,
    cycles: u32,
}

impl Cycle {
    fn new(order: ByteOrder, policy: FillPolicy) -> Self {
        Self {
            buffer: PayloadBuffer::new(order),
            policy,
            cycles: 0,
        }
    }

    fn fill(&mut self, readings: &[f32]) -> (Payload, usize) {
        let written = match self.policy {
            FillPolicy::ZeroFill => self.buffer.pack_fresh(readings),
            FillPolicy::Retain => self.buffer.write_values(readings),
        };

        #[cfg(feature = "defmt")]
        if written < readings.len() {
            defmt::warn!(
                "payload: {=usize} readings supplied, {=usize} sent",
                readings.len(),
                written
            );
        }

        (self.buffer.payload(), written)
    }

    fn complete(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
        #[cfg(feature = "defmt")]
        defmt::trace!("payload: cycle {=u32} sent", self.cycles);
    }
}

/// Packs readings and sends them over an [`Uplink`], one payload per cycle.
#[derive(Debug)]
pub struct Transmitter<U: Uplink> {
    uplink: U,
    cycle: Cycle,
}

impl<U: Uplink> Transmitter<U> {
    /// Create a transmitter around `uplink`.
    pub fn new(uplink: U, order: ByteOrder, policy: FillPolicy) -> Self {
        Self {
            uplink,
            cycle: Cycle::new(order, policy),
        }
    }

    /// Pack up to eight readings and send them.
    ///
    /// Returns how many readings went into the payload. Readings past the
    /// eighth are dropped. An uplink error is returned unchanged and the
    /// cycle is not counted; the buffer keeps what was packed.
    pub fn transmit(&mut self, readings: &[f32]) -> Result<usize, U::Error> {
        let (payload, written) = self.cycle.fill(readings);
        self.uplink.send(&payload)?;
        self.cycle.complete();
        Ok(written)
    }

    /// Send a full measurement vector.
    pub fn transmit_vector(&mut self, vector: &MeasurementVector) -> Result<(), U::Error> {
        self.transmit(vector.as_array()).map(|_| ())
    }

    /// Payload as it stands after the last cycle.
    pub fn last_payload(&self) -> Payload {
        self.cycle.buffer.payload()
    }

    /// Number of payloads the uplink accepted.
    pub fn cycles(&self) -> u32 {
        self.cycle.cycles
    }

    /// Borrow the uplink.
    pub fn uplink(&self) -> &U {
        &self.uplink
    }

    /// Mutably borrow the uplink.
    pub fn uplink_mut(&mut self) -> &mut U {
        &mut self.uplink
    }

    /// Give the uplink back.
    pub fn into_uplink(self) -> U {
        self.uplink
    }
}

/// Asynchronous counterpart of [`Transmitter`].
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncTransmitter<U: AsyncUplink> {
    uplink: U,
    cycle: Cycle,
}

#[cfg(feature = "async")]
impl<U: AsyncUplink> AsyncTransmitter<U> {
    /// Create a transmitter around `uplink`.
    pub fn new(uplink: U, order: ByteOrder, policy: FillPolicy) -> Self {
        Self {
            uplink,
            cycle: Cycle::new(order, policy),
        }
    }

    /// Pack up to eight readings and send them, returning how many were packed.
    pub async fn transmit(&mut self, readings: &[f32]) -> Result<usize, U::Error> {
        let (payload, written) = self.cycle.fill(readings);
        self.uplink.send(&payload).await?;
        self.cycle.complete();
        Ok(written)
    }

    /// Payload as it stands after the last cycle.
    pub fn last_payload(&self) -> Payload {
        self.cycle.buffer.payload()
    }

    /// Number of payloads the uplink accepted.
    pub fn cycles(&self) -> u32 {
        self.cycle.cycles
    }

    /// Give the uplink back.
    pub fn into_uplink(self) -> U {
        self.uplink
    }
}
