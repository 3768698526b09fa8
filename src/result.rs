use core::fmt::Debug;

/// Error type
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: Sized + Debug> {
    /// Wire stays low after the reset pulse is released
    WireFault,
    /// No presence pulse on wire
    NoPresence,
    /// A search slot read an impossible bit/complement pattern
    DataFault,
    PortError(E),
}

impl<E: Sized + Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::PortError(e)
    }
}
