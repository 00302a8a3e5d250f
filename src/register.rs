//! DS1307 register map
//!
//! ```text
//! Addr | Bit7 | 6     | 5     | 4        | 3 | 2 | 1   | 0   | Range
//! 0x00 | CH   | 10 Seconds               | Seconds           | 00-59
//! 0x01 | 0    | 10 Minutes               | Minutes           | 00-59
//! 0x02 | 0    | 12/24 | 10 Hours         | Hour              | 00-23
//!                     | AM/PM | 10 Hours | Hour              | 01-12
//! 0x03 | 0    | 0     | 0     | 0        | 0 | Day           | 1-7
//! 0x04 | 0    | 0     | 10 Date          | Date              | 01-31
//! 0x05 | 0    | 0     | 0     | 10 Month | Month             | 01-12
//! 0x06 | 10 Year                         | Year              | 00-99
//! 0x07 | OUT  | 0     | 0     | SQWE     | 0 | 0 | RS1 | RS0 |
//! 0x08 | RAM, 56 bytes                                       |
//! 0x3F |                                                     |
//! ```

/// Fixed 7-bit bus address of the timekeeping section
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Size of the battery-backed RAM block in bytes
pub const RAM_SIZE: usize = 56;

/// Number of timekeeping registers read or written as one block
pub const TIME_REGISTERS: usize = 7;

/// Register addresses
#[expect(missing_docs, reason = "self-explanatory variants")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Seconds = 0x00,
    Minutes = 0x01,
    Hours = 0x02,
    Day = 0x03,
    Date = 0x04,
    Month = 0x05,
    Year = 0x06,
    Control = 0x07,
    Ram = 0x08,
}

impl Register {
    /// Register address on the bus
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Position of the register inside a block read starting at [`Register::Seconds`]
    #[must_use]
    pub const fn offset(self) -> usize {
        self as usize
    }
}

pub(crate) const SEC_CH_BIT: u8 = 1 << 7;
pub(crate) const SEC_MASK: u8 = 0x7f;
pub(crate) const MIN_MASK: u8 = 0x7f;
pub(crate) const HOUR_12_BIT: u8 = 1 << 6;
pub(crate) const HOUR_PM_BIT: u8 = 1 << 5;
pub(crate) const HOUR_12_MASK: u8 = 0x1f;
pub(crate) const HOUR_24_MASK: u8 = 0x3f;
pub(crate) const DAY_MASK: u8 = 0x07;
pub(crate) const DATE_MASK: u8 = 0x3f;
pub(crate) const MONTH_MASK: u8 = 0x1f;
pub(crate) const CTRL_OUT_BIT: u8 = 1 << 7;
pub(crate) const CTRL_SQWE_BIT: u8 = 1 << 4;
pub(crate) const CTRL_RS_MASK: u8 = 0x03;

/// Single-purpose bit fields that are updated with a read-check-write cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Clock halt; oscillator stopped while set
    Halt,
    /// Static SQW/OUT level while the square wave is disabled
    Output,
    /// Square wave enable
    SquareWave,
    /// Square wave rate select, RS1:RS0
    RateSelect,
}

impl Field {
    /// Register holding the field
    #[must_use]
    pub const fn register(self) -> Register {
        match self {
            Self::Halt => Register::Seconds,
            Self::Output | Self::SquareWave | Self::RateSelect => Register::Control,
        }
    }

    /// Bits owned by the field
    #[must_use]
    pub const fn mask(self) -> u8 {
        match self {
            Self::Halt => SEC_CH_BIT,
            Self::Output => CTRL_OUT_BIT,
            Self::SquareWave => CTRL_SQWE_BIT,
            Self::RateSelect => CTRL_RS_MASK,
        }
    }

    /// Bits of the register that a write to this field must leave untouched
    #[must_use]
    pub const fn preserve_mask(self) -> u8 {
        !self.mask()
    }

    /// Compose the register value for `bits`, or `None` if `original` already holds them
    ///
    /// `bits` is masked to the field width first.
    #[must_use]
    pub const fn update(self, original: u8, bits: u8) -> Option<u8> {
        let bits = bits & self.mask();
        if original & self.mask() == bits {
            None
        } else {
            Some((original & self.preserve_mask()) | bits)
        }
    }
}
