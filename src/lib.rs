//! Platform-agnostic driver for the DS1307 I2C real-time clock
//!
//! Built on the [`embedded_hal::i2c::I2c`] trait. The driver owns the bus for as long as the
//! [`Ds1307`] handle lives; [`Ds1307::release`] hands it back. Bus speed and timeouts are
//! whatever the HAL's `I2c` implementation was configured with.
//!
//! Every operation is one or two blocking bus transactions. Single-field setters read the
//! register first and skip the write when the field already holds the requested value, so a
//! handle must be the only writer to the chip between those two transactions.
//!
//! ```ignore
//! let mut rtc = Ds1307::new(i2c, Config::default()).map_err(|(e, _)| e)?;
//! rtc.set_halt(false)?;
//! let now = rtc.get_time()?;
//! ```
#![cfg_attr(not(test), no_std)]

pub mod bcd;
pub mod register;
pub mod rtc;
pub mod time;

use core::fmt;

pub use rtcc::DateTimeAccess;

pub use crate::{
    register::{Field, Register, DEFAULT_ADDRESS, RAM_SIZE},
    rtc::{Ds1307, RateSelect},
    time::{CalendarTime, RawData, RawHour},
};

/// Century assumed when [`Config::century`] is 0
pub const DEFAULT_CENTURY: i32 = 21;

/// Largest value the year register decodes to, 0xff read as BCD
const MAX_STORED_YEAR: i32 = 165;

/// Year 0 of the `struct tm` year count
const TM_YEAR_ORIGIN: i32 = 1900;

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit bus address
    pub address: u8,

    /// Century of the stored two-digit year; 21 is 20xx, 0 selects [`DEFAULT_CENTURY`]
    pub century: i32,
}

impl Config {
    /// Offset added to the stored two-digit year, in years since 1900
    ///
    /// 0 is treated as [`DEFAULT_CENTURY`] and negative centuries are shifted up by one
    /// before computing `(century - 20) * 100`.
    ///
    /// Returns `None` if the base, or any year decoded on top of it, does not fit an `i32`.
    #[must_use]
    pub const fn year_base(&self) -> Option<i32> {
        let century = match self.century {
            0 => DEFAULT_CENTURY,
            c if c < 0 => c + 1,
            c => c,
        };
        let Some(offset) = century.checked_sub(20) else {
            return None;
        };
        let Some(base) = offset.checked_mul(100) else {
            return None;
        };
        if base.checked_add(MAX_STORED_YEAR + TM_YEAR_ORIGIN).is_none() {
            return None;
        }
        Some(base)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            century: 0,
        }
    }
}

/// Driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The I2C transaction failed
    Bus(E),

    /// An argument was out of range, e.g. a RAM access past the end of the RAM block
    InvalidArgument,

    /// The clock registers do not hold a valid calendar date
    InvalidDateTime,
}

impl<E> Error<E>
where
    E: embedded_hal::i2c::Error,
{
    /// Kind of the underlying bus error, if this is one
    pub fn bus_kind(&self) -> Option<embedded_hal::i2c::ErrorKind> {
        match self {
            Self::Bus(e) => Some(e.kind()),
            Self::InvalidArgument | Self::InvalidDateTime => None,
        }
    }
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "i2c bus error: {e:?}"),
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::InvalidDateTime => f.write_str("invalid date or time in clock registers"),
        }
    }
}
