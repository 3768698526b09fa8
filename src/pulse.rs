use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{Address, BitIo, Reading};

/// Pulse widths of the outbound encoding, in µs, plus the marker byte
/// opening every frame.
///
/// A 1 bit is a long high followed by a short low, a 0 bit the other
/// way around. The defaults match the deployed receivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    pub long_us: u32,
    pub short_us: u32,
    pub lead_high_us: u32,
    pub lead_low_us: u32,
    pub marker: u8,
}

impl Default for PulseTiming {
    fn default() -> Self {
        PulseTiming {
            long_us: 1668,
            short_us: 834,
            lead_high_us: 3000,
            lead_low_us: 6000,
            marker: 0xFE,
        }
    }
}

/// Byte transmitter over a push-pull line that idles low.
///
/// Shares the serializer with the bus driver but encodes each bit by
/// pulse duration instead of a sampled time slot; nothing is received
/// back, so its slots always sample as 0.
pub struct Transmitter<P: OutputPin> {
    pin: P,
    timing: PulseTiming,
}

impl<P: OutputPin> Transmitter<P> {
    /// Takes the sender line, forcing it to its low idle state.
    pub fn new(mut pin: P, timing: PulseTiming) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Transmitter { pin, timing })
    }

    pub fn timing(&self) -> &PulseTiming {
        &self.timing
    }

    /// Long high/low lead announcing a frame, followed by the marker
    /// byte through the regular bit encoding.
    pub fn send_preamble(&mut self, delay: &mut impl DelayNs) -> Result<(), P::Error> {
        self.pin.set_high()?;
        delay.delay_us(self.timing.lead_high_us);
        self.pin.set_low()?;
        delay.delay_us(self.timing.lead_low_us);
        self.write_byte(delay, self.timing.marker)
    }

    /// One best-effort frame: preamble, then per entry the full address
    /// followed by its own reading. No acknowledgment comes back.
    pub fn send_frame(
        &mut self,
        delay: &mut impl DelayNs,
        entries: &[(Address, Reading)],
    ) -> Result<(), P::Error> {
        self.send_preamble(delay)?;
        for (address, reading) in entries {
            self.write_bytes(delay, address.as_ref())?;
            self.write_bytes(delay, reading.as_ref())?;
        }
        self.pin.set_low()?;
        Ok(())
    }
}

impl<P: OutputPin> BitIo for Transmitter<P> {
    type Error = P::Error;

    fn bit_io(&mut self, delay: &mut impl DelayNs, bit: bool) -> Result<bool, P::Error> {
        self.pin.set_high()?;
        delay.delay_us(if bit {
            self.timing.long_us
        } else {
            self.timing.short_us
        });
        self.pin.set_low()?;
        delay.delay_us(if bit {
            self.timing.short_us
        } else {
            self.timing.long_us
        });
        Ok(false)
    }
}
