pub trait OpCode {
    fn op_code(&self) -> u8;
}

/// ROM-level commands addressing the devices sharing the bus
#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    SearchRom = 0xF0,
    SkipRom = 0xCC,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}
