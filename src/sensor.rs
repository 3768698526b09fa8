use byteorder::{ByteOrder, LittleEndian};
use embedded_hal::delay::DelayNs;

use crate::{BitIo, Driver, Error, IoWire, OpCode};
use core::fmt::Debug;

/// Function commands understood by the recognized thermometer families
#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    Convert = 0x44,
    ReadScratchpad = 0xBE,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}

/// Thermometer families recognized by their address family code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Family {
    Ds18b20 = 0x28,
    Ds18s20 = 0x10,
}

impl Family {
    pub fn from_code(code: u8) -> Option<Family> {
        match code {
            0x28 => Some(Family::Ds18b20),
            0x10 => Some(Family::Ds18s20),
            _ => None,
        }
    }
}

/// Worst-case conversion time over the supported families, in ms
pub const CONVERSION_TIME_MS: u32 = 750;

/// Raw scratchpad reading, low byte first, not interpreted further
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    raw: [u8; 2],
}

impl Reading {
    pub fn to_raw(&self) -> u16 {
        LittleEndian::read_u16(&self.raw)
    }
}

impl From<[u8; 2]> for Reading {
    fn from(raw: [u8; 2]) -> Self {
        Reading { raw }
    }
}

impl From<Reading> for [u8; 2] {
    fn from(reading: Reading) -> [u8; 2] {
        reading.raw
    }
}

impl AsRef<[u8]> for Reading {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl<E: Debug, W: IoWire<Error = E>> Driver<W> {
    /// Starts a measurement conversion on every device at once and
    /// powers the line until the slowest family is done.
    pub fn convert_all(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.reset_skip_write_only(delay, &[Command::Convert.op_code()])?;
        self.strong_pullup(true)?;
        delay.delay_ms(CONVERSION_TIME_MS);
        self.strong_pullup(false)?;
        Ok(())
    }

    /// Reads the two scratchpad bytes of the one device still addressed
    /// after a completed search pass.
    pub fn read_reading(&mut self, delay: &mut impl DelayNs) -> Result<Reading, Error<E>> {
        self.write_command(delay, Command::ReadScratchpad)?;
        let mut raw = [0u8; 2];
        self.read_bytes(delay, &mut raw)?;
        Ok(Reading { raw })
    }
}
