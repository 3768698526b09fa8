use crate::{BitIo, Command, Error, IoWire, OpCode};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;

/// Reset pulse width and presence sampling offset after release, in µs
const RESET_LOW_US: u32 = 480;
const PRESENCE_SAMPLE_US: u32 = 66;

/// Bit slot phases, counted from slot start, in µs
const SLOT_START_US: u32 = 1;
const SLOT_SAMPLE_US: u32 = 15;
const SLOT_END_US: u32 = 60;

pub struct Driver<W: IoWire> {
    io_wire: W,
}

impl<E: Debug, W: IoWire<Error = E>> Driver<W> {
    pub fn new(io_wire: W) -> Self {
        Driver { io_wire }
    }

    /// Performs a reset and listens for a presence pulse.
    ///
    /// Returns `Err(WireFault)` if the wire is still low at the end of
    /// the presence window and `Err(NoPresence)` if no device answered.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.set_low()?;
        delay.delay_us(RESET_LOW_US);

        let presence = critical_section::with(|_| {
            self.set_high()?;
            delay.delay_us(PRESENCE_SAMPLE_US);
            self.is_low()
        })?;
        delay.delay_us(RESET_LOW_US - PRESENCE_SAMPLE_US);

        if self.is_low()? {
            return Err(Error::WireFault);
        }
        if presence {
            Ok(())
        } else {
            Err(Error::NoPresence)
        }
    }

    pub fn skip(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.write_command(delay, Command::SkipRom)?;
        Ok(())
    }

    pub fn reset_skip_write_only(
        &mut self,
        delay: &mut impl DelayNs,
        write: &[u8],
    ) -> Result<(), Error<E>> {
        self.reset(delay)?;
        self.skip(delay)?;
        self.write_bytes(delay, write)?;
        Ok(())
    }

    pub fn write_command(&mut self, delay: &mut impl DelayNs, cmd: impl OpCode) -> Result<(), E> {
        self.write_byte(delay, cmd.op_code())
    }

    /// Drives the released line high for parasitic supply, where the
    /// wiring supports it.
    pub fn strong_pullup(&mut self, enable: bool) -> Result<(), E> {
        self.io_wire.strong_pullup(enable)
    }

    #[inline(always)]
    pub(crate) fn set_high(&mut self) -> Result<(), E> {
        self.io_wire.set_high()
    }

    #[inline(always)]
    pub(crate) fn set_low(&mut self) -> Result<(), E> {
        self.io_wire.set_low()
    }

    #[inline(always)]
    pub(crate) fn is_high(&mut self) -> Result<bool, E> {
        self.io_wire.is_high()
    }

    #[inline(always)]
    pub(crate) fn is_low(&mut self) -> Result<bool, E> {
        self.io_wire.is_low()
    }
}

impl<E: Debug, W: IoWire<Error = E>> BitIo for Driver<W> {
    type Error = E;

    /// One time slot: a short low start, release when presenting a 1,
    /// sample, then hold out the slot. The whole slot runs with
    /// interrupts suppressed to keep the sampling offset exact.
    fn bit_io(&mut self, delay: &mut impl DelayNs, bit: bool) -> Result<bool, E> {
        critical_section::with(|_| {
            self.set_low()?;
            delay.delay_us(SLOT_START_US);
            if bit {
                self.set_high()?;
            }
            delay.delay_us(SLOT_SAMPLE_US - SLOT_START_US);
            let sampled = self.is_high()?;
            delay.delay_us(SLOT_END_US - SLOT_SAMPLE_US);
            self.set_high()?;
            Ok(sampled)
        })
    }
}
