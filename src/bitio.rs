use embedded_hal::delay::DelayNs;

/// One-bit transfer capability shared by the bus driver and the
/// pulse-width transmitter.
///
/// `bit_io` presents a single bit on the line and returns the level
/// sampled back (pure writers return a fixed value). Byte transfers are
/// built on top of it, least-significant bit first; readers present `1`,
/// the line convention for a slot that only samples.
pub trait BitIo {
    type Error;

    /// Presents `bit` for one slot and returns the sampled level.
    fn bit_io(&mut self, delay: &mut impl DelayNs, bit: bool) -> Result<bool, Self::Error>;

    fn write_byte(&mut self, delay: &mut impl DelayNs, byte: u8) -> Result<(), Self::Error> {
        let mut byte = byte;
        for _ in 0..8 {
            self.bit_io(delay, (byte & 0x01) == 0x01)?;
            byte >>= 1;
        }
        Ok(())
    }

    fn read_byte(&mut self, delay: &mut impl DelayNs) -> Result<u8, Self::Error> {
        let mut byte = 0_u8;
        for _ in 0..8 {
            byte >>= 1;
            if self.bit_io(delay, true)? {
                byte |= 0x80;
            }
        }
        Ok(byte)
    }

    fn write_bytes(&mut self, delay: &mut impl DelayNs, bytes: &[u8]) -> Result<(), Self::Error> {
        for b in bytes {
            self.write_byte(delay, *b)?;
        }
        Ok(())
    }

    fn read_bytes(&mut self, delay: &mut impl DelayNs, dst: &mut [u8]) -> Result<(), Self::Error> {
        for d in dst {
            *d = self.read_byte(delay)?;
        }
        Ok(())
    }
}
