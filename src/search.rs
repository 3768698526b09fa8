use crate::{Address, BitIo, Command, Driver, Error, IoWire};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;

/// Resumable enumeration state.
///
/// Holds the discrepancy cursor returned by the previous pass and the
/// address that pass resolved; the address is read back to break ties
/// when the next pass walks the shared prefix again.
#[derive(Clone)]
pub struct DeviceSearch {
    cursor: u8,
    address: Address,
}

impl DeviceSearch {
    /// Cursor sentinel before the first pass, every position unresolved
    const SEARCH_START: u8 = 0xFF;
    /// Cursor value left by the pass that visited the last device
    const LAST_DEVICE: u8 = 0x00;

    pub fn new() -> DeviceSearch {
        DeviceSearch {
            cursor: Self::SEARCH_START,
            address: Address::default(),
        }
    }

    /// True once every device on the bus has been visited.
    pub fn is_finished(&self) -> bool {
        self.cursor == Self::LAST_DEVICE
    }

    /// The address resolved by the most recent pass.
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn into_iter<'a, W: IoWire>(
        self,
        driver: &'a mut Driver<W>,
        delay: &'a mut impl DelayNs,
    ) -> DeviceSearchIter<'a, W, impl DelayNs> {
        DeviceSearchIter {
            search: Some(self),
            driver,
            delay,
        }
    }
}

impl Default for DeviceSearch {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DeviceSearchIter<'a, W: IoWire, Delay: DelayNs> {
    search: Option<DeviceSearch>,
    driver: &'a mut Driver<W>,
    delay: &'a mut Delay,
}

impl<'a, W: IoWire, Delay: DelayNs> Iterator for DeviceSearchIter<'a, W, Delay> {
    type Item = Result<Address, Error<W::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut search = self.search.take()?;
        let result = self
            .driver
            .search_next(&mut search, &mut *self.delay)
            .transpose()?;
        if result.is_ok() {
            self.search = Some(search);
        }
        Some(result)
    }
}

impl<E: Debug, W: IoWire<Error = E>> Driver<W> {
    /// Resolves the next device address, `Ok(None)` once the previous
    /// pass visited the last device.
    pub fn search_next(
        &mut self,
        search: &mut DeviceSearch,
        delay: &mut impl DelayNs,
    ) -> Result<Option<Address>, Error<E>> {
        if search.is_finished() {
            return Ok(None);
        }
        self.search_pass(search, delay).map(Some)
    }

    /// One full 64-position pass behind a fresh reset. Every position
    /// reads the address bit and its complement, picks the branch to
    /// follow and writes the choice back, which drops all disagreeing
    /// devices off the rest of the pass.
    fn search_pass(
        &mut self,
        search: &mut DeviceSearch,
        delay: &mut impl DelayNs,
    ) -> Result<Address, Error<E>> {
        self.reset(delay)?;
        self.write_command(delay, Command::SearchRom)?;

        let mut next_cursor = DeviceSearch::LAST_DEVICE;
        let mut pos = Address::BITS;

        for byte in search.address.iter_mut() {
            for _ in 0..8 {
                let mut bit = self.bit_io(delay, true)?;
                let complement = self.bit_io(delay, true)?;

                if complement {
                    if bit {
                        // nobody answered the slot pair
                        return Err(Error::DataFault);
                    }
                } else if !bit {
                    // collision; take the 1 branch on fresh territory
                    // and wherever the previous pass took it, take the
                    // 0 branch exactly at the cursor
                    if search.cursor > pos || (*byte & 0x01 != 0 && search.cursor != pos) {
                        bit = true;
                        next_cursor = pos;
                    }
                }

                self.bit_io(delay, bit)?;

                *byte >>= 1;
                if bit {
                    *byte |= 0x80;
                }
                pos -= 1;
            }
        }

        search.cursor = next_cursor;
        Ok(search.address)
    }
}
