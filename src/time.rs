//! Calendar and raw-register views of the DS1307 timekeeping registers

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use ufmt::{uDebug, uDisplay, uWrite, uwrite, Formatter};

use crate::{
    bcd::{decode_12_hour, encode_12_hour, from_bcd, to_bcd},
    register::{
        Register, DATE_MASK, DAY_MASK, HOUR_12_BIT, HOUR_12_MASK, HOUR_24_MASK, HOUR_PM_BIT,
        MIN_MASK, MONTH_MASK, SEC_MASK, TIME_REGISTERS,
    },
};

/// Offset of `struct tm` style years
const TM_YEAR_ORIGIN: i32 = 1900;

/// Fully decoded date and time
///
/// Fields follow the C `struct tm` conventions: `year` counts years since 1900, `month` is
/// 0-based and `weekday` counts from Sunday = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    /// Years since 1900
    pub year: i32,
    /// Month of the year, `0..=11`
    pub month: u8,
    /// Day of the month, `1..=31`
    pub day: u8,
    /// Day of the week, `0..=6` from Sunday
    pub weekday: u8,
    /// Hour of the day, `0..=23`
    pub hour: u8,
    /// Minute, `0..=59`
    pub minute: u8,
    /// Second, `0..=59`
    pub second: u8,
}

impl CalendarTime {
    /// Decode a block read of the seven timekeeping registers
    ///
    /// The hour is decoded according to the 12/24 mode bit found in the hours register, and
    /// the year is rebuilt as `year_base` plus the two stored digits.
    #[must_use]
    pub const fn from_registers(regs: &[u8; TIME_REGISTERS], year_base: i32) -> Self {
        let hours = regs[Register::Hours.offset()];
        let hour = if hours & HOUR_12_BIT != 0 {
            decode_12_hour(hours)
        } else {
            from_bcd(hours & HOUR_24_MASK)
        };

        Self {
            year: year_base.saturating_add(from_bcd(regs[Register::Year.offset()]) as i32),
            month: from_bcd(regs[Register::Month.offset()] & MONTH_MASK).saturating_sub(1),
            day: from_bcd(regs[Register::Date.offset()] & DATE_MASK),
            weekday: from_bcd(regs[Register::Day.offset()] & DAY_MASK).saturating_sub(1),
            hour,
            minute: from_bcd(regs[Register::Minutes.offset()] & MIN_MASK),
            second: from_bcd(regs[Register::Seconds.offset()] & SEC_MASK),
        }
    }

    /// Encode into the seven timekeeping registers
    ///
    /// `halt` is the clock-halt bit to carry in the seconds register and `twelve_hour`
    /// selects the hour encoding. Only the last two digits of the year are kept.
    #[must_use]
    pub fn to_registers(&self, halt: u8, twelve_hour: bool) -> [u8; TIME_REGISTERS] {
        let hour = if twelve_hour {
            encode_12_hour(self.hour)
        } else {
            to_bcd(self.hour)
        };
        let year = u8::try_from(self.year.rem_euclid(100)).unwrap_or_default();

        [
            (to_bcd(self.second) & SEC_MASK) | halt,
            to_bcd(self.minute),
            hour,
            to_bcd(self.weekday.wrapping_add(1)),
            to_bcd(self.day),
            to_bcd(self.month.wrapping_add(1)),
            to_bcd(year),
        ]
    }

    /// Full Gregorian year, e.g. 2024
    #[must_use]
    pub const fn full_year(&self) -> i32 {
        self.year.saturating_add(TM_YEAR_ORIGIN)
    }

    /// Convert to a [`NaiveDateTime`]; `None` if the fields do not form a valid date
    ///
    /// The weekday is not checked against the date.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            self.full_year(),
            u32::from(self.month) + 1,
            u32::from(self.day),
        )?
        .and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "chrono keeps every field below 60"
)]
impl From<&NaiveDateTime> for CalendarTime {
    fn from(datetime: &NaiveDateTime) -> Self {
        Self {
            year: datetime.year() - TM_YEAR_ORIGIN,
            month: datetime.month0() as u8,
            day: datetime.day() as u8,
            weekday: datetime.weekday().num_days_from_sunday() as u8,
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
        }
    }
}

impl From<NaiveDateTime> for CalendarTime {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::from(&datetime)
    }
}

impl uDisplay for CalendarTime {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{}-", self.full_year())?;
        write_2_digits(f, self.month.wrapping_add(1))?;
        f.write_char('-')?;
        write_2_digits(f, self.day)?;
        f.write_char(' ')?;
        write_2_digits(f, self.hour)?;
        f.write_char(':')?;
        write_2_digits(f, self.minute)?;
        f.write_char(':')?;
        write_2_digits(f, self.second)
    }
}

impl uDebug for CalendarTime {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uDisplay::fmt(self, f)?;
        uwrite!(f, " (weekday {})", self.weekday)
    }
}

/// Zero-padded two digit decimal
fn write_2_digits<W>(f: &mut Formatter<'_, W>, value: u8) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    f.write_char(char::from(b'0' + (value / 10) % 10))?;
    f.write_char(char::from(b'0' + value % 10))
}

/// Hours register as stored on the chip
///
/// `hour` holds the BCD hour digits without the mode and AM/PM flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawHour {
    /// 24-hour mode, `hour` is BCD `00..=23`
    TwentyFourHour {
        /// BCD hour digits
        hour: u8,
    },
    /// 12-hour mode, `hour` is BCD `01..=12`
    TwelveHour {
        /// BCD hour digits
        hour: u8,
        /// Whether the PM flag is set
        pm: bool,
    },
}

impl RawHour {
    /// Split an hours register into its mode, flag and digits
    #[must_use]
    pub const fn from_register(value: u8) -> Self {
        if value & HOUR_12_BIT != 0 {
            Self::TwelveHour {
                hour: value & HOUR_12_MASK,
                pm: value & HOUR_PM_BIT != 0,
            }
        } else {
            Self::TwentyFourHour { hour: value }
        }
    }

    /// Pack into an hours register, masking the digits to the width of the mode
    #[must_use]
    pub const fn register(self) -> u8 {
        match self {
            Self::TwentyFourHour { hour } => hour & HOUR_24_MASK,
            Self::TwelveHour { hour, pm } => {
                (hour & HOUR_12_MASK) | HOUR_12_BIT | if pm { HOUR_PM_BIT } else { 0 }
            }
        }
    }

    /// Whether the register is in 12-hour mode
    #[must_use]
    pub const fn is_12_hour(self) -> bool {
        matches!(self, Self::TwelveHour { .. })
    }
}

impl Default for RawHour {
    fn default() -> Self {
        Self::TwentyFourHour { hour: 0 }
    }
}

/// Timekeeping registers with every numeric field left in BCD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawData {
    /// BCD seconds, clock-halt bit removed
    pub second: u8,
    /// BCD minutes
    pub minute: u8,
    /// Hours with their 12/24 encoding
    pub hour: RawHour,
    /// Day of the week, `1..=7`
    pub day: u8,
    /// BCD day of the month
    pub date: u8,
    /// BCD month, `01..=12`
    pub month: u8,
    /// BCD year of the century
    pub year: u8,
}

impl RawData {
    /// Split a block read of the seven timekeeping registers
    #[must_use]
    pub const fn from_registers(regs: &[u8; TIME_REGISTERS]) -> Self {
        Self {
            second: regs[Register::Seconds.offset()] & SEC_MASK,
            minute: regs[Register::Minutes.offset()],
            hour: RawHour::from_register(regs[Register::Hours.offset()]),
            day: regs[Register::Day.offset()],
            date: regs[Register::Date.offset()],
            month: regs[Register::Month.offset()],
            year: regs[Register::Year.offset()],
        }
    }

    /// Pack into the seven timekeeping registers, masking each field to its width
    ///
    /// `halt` is the clock-halt bit to carry in the seconds register.
    #[must_use]
    pub const fn to_registers(&self, halt: u8) -> [u8; TIME_REGISTERS] {
        [
            (self.second & SEC_MASK) | halt,
            self.minute & MIN_MASK,
            self.hour.register(),
            self.day & DAY_MASK,
            self.date & DATE_MASK,
            self.month & MONTH_MASK,
            self.year,
        ]
    }
}
