#![no_std]
#![doc = include_str!("../README.md")]

#[cfg(test)]
extern crate std;

mod address;
mod bitio;
mod command;
mod driver;
mod iowire;
mod pulse;
mod relay;
mod result;
mod search;
pub mod sensor;

pub use address::Address;
pub use bitio::BitIo;
pub use command::{Command, OpCode};
pub use driver::Driver;
pub use iowire::{Inverted, IoWire};
pub use pulse::{PulseTiming, Transmitter};
pub use relay::Relay;
pub use result::Error;
pub use search::{DeviceSearch, DeviceSearchIter};
pub use sensor::{Family, Reading, CONVERSION_TIME_MS};
