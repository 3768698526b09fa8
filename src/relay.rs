use core::fmt::Debug;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{Address, DeviceSearch, Driver, Error, Family, IoWire, Reading, Transmitter};

/// One polling cycle's worth of discovered thermometers, rebroadcast
/// over the pulse-width channel.
///
/// `N` bounds how many devices a cycle can carry; addresses are not
/// kept across cycles, every cycle re-discovers the bus.
pub struct Relay<const N: usize> {
    entries: [(Address, Reading); N],
    count: usize,
}

impl<const N: usize> Relay<N> {
    pub fn new() -> Self {
        Relay {
            entries: [(Address::default(), Reading::default()); N],
            count: 0,
        }
    }

    /// The entries accumulated by the last cycle.
    pub fn entries(&self) -> &[(Address, Reading)] {
        &self.entries[..self.count]
    }

    fn push(&mut self, address: Address, reading: Reading) -> bool {
        if self.count == N {
            return false;
        }
        self.entries[self.count] = (address, reading);
        self.count += 1;
        true
    }

    /// Runs one full blocking cycle: conversion broadcast, conversion
    /// wait, device discovery with a scratchpad read per recognized
    /// thermometer, then the outbound frame.
    ///
    /// Presence and data faults end the affected stage early and the
    /// frame carries whatever was accumulated; only pin errors abort
    /// the cycle. Returns the number of entries transmitted.
    pub fn run_cycle<E, W, P>(
        &mut self,
        driver: &mut Driver<W>,
        tx: &mut Transmitter<P>,
        delay: &mut impl DelayNs,
    ) -> Result<usize, Error<E>>
    where
        E: Debug,
        W: IoWire<Error = E>,
        P: OutputPin<Error = E>,
    {
        self.count = 0;

        if let Err(fault) = driver.convert_all(delay) {
            if let Error::PortError(e) = fault {
                return Err(Error::PortError(e));
            }
            // an unanswered broadcast is not fatal, discovery below
            // re-checks the bus
            #[cfg(feature = "defmt")]
            defmt::warn!("conversion broadcast unanswered");
        }

        let mut search = DeviceSearch::new();
        loop {
            match driver.search_next(&mut search, delay) {
                Ok(Some(address)) => {
                    if Family::from_code(address.family_code()).is_none() {
                        continue;
                    }
                    let reading = driver.read_reading(delay)?;
                    if !self.push(address, reading) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(Error::PortError(e)) => return Err(Error::PortError(e)),
                Err(_fault) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("device discovery ended early");
                    break;
                }
            }
        }

        tx.send_frame(delay, self.entries())?;

        #[cfg(feature = "defmt")]
        defmt::trace!("transmitted {} entries", self.count);

        Ok(self.count)
    }
}

impl<const N: usize> Default for Relay<N> {
    fn default() -> Self {
        Self::new()
    }
}
