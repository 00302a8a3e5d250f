//! In-memory DS1307 register model

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

/// 64 register bytes behind an auto-incrementing pointer, with bus traffic counters
pub struct FakeDs1307 {
    pub regs: [u8; 64],
    pub writes: usize,
    pub reads: usize,
    pub fail: bool,
    pointer: usize,
}

impl FakeDs1307 {
    pub const fn new() -> Self {
        Self {
            regs: [0; 64],
            writes: 0,
            reads: 0,
            fail: false,
            pointer: 0,
        }
    }
}

impl ErrorType for FakeDs1307 {
    type Error = ErrorKind;
}

impl I2c for FakeDs1307 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        assert_eq!(address, ds1307::DEFAULT_ADDRESS, "wrong device address");

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let (&register, data) = bytes.split_first().ok_or(ErrorKind::Other)?;
                    self.pointer = usize::from(register);
                    for &byte in data {
                        self.regs[self.pointer] = byte;
                        self.pointer = (self.pointer + 1) % self.regs.len();
                    }
                    if !data.is_empty() {
                        self.writes += 1;
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.regs[self.pointer];
                        self.pointer = (self.pointer + 1) % self.regs.len();
                    }
                    self.reads += 1;
                }
            }
        }
        Ok(())
    }
}
