//! DS1307 RTC handle and bus operations

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use rtcc::DateTimeAccess;

use crate::{
    bcd::{decode_12_hour, encode_12_hour, from_bcd, to_bcd},
    register::{
        Field, Register, HOUR_12_BIT, HOUR_24_MASK, RAM_SIZE, SEC_CH_BIT, TIME_REGISTERS,
    },
    time::{CalendarTime, RawData},
    Config, Error,
};

type RtcResult<E, T = ()> = Result<T, Error<E>>;

/// Number of registers read back before a time write: seconds, minutes and hours
const HEAD_REGISTERS: usize = 3;

/// ds1307 real-time clock; interfaced via I2C
///
/// Holds the bus and the year offset of the stored two-digit year. The handle must be the
/// only writer to the chip: setters read before they write.
#[must_use]
pub struct Ds1307<I2C> {
    i2c: I2C,
    address: u8,
    year_base: i32,
}

// Lifecycle
impl<I2C> Ds1307<I2C>
where
    I2C: I2c,
{
    /// Connect to the ds1307 by taking ownership of the I2C bus
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] together with the bus if the address is not a
    /// 7-bit address, or if the century gives years outside the `i32` range
    #[cfg_attr(
        not(feature = "defmt"),
        expect(clippy::missing_const_for_fn, reason = "defmt logging is not const")
    )]
    pub fn new(i2c: I2C, config: Config) -> Result<Self, (Error<I2C::Error>, I2C)> {
        if config.address > 0x7f {
            #[cfg(feature = "defmt")]
            defmt::warn!("ds1307: invalid address {=u8:#x}", config.address);
            return Err((Error::InvalidArgument, i2c));
        }
        let Some(year_base) = config.year_base() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("ds1307: century {=i32} out of range", config.century);
            return Err((Error::InvalidArgument, i2c));
        };

        Ok(Self {
            i2c,
            address: config.address,
            year_base,
        })
    }

    /// Disconnect to release the I2C bus
    #[must_use]
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Bus address the handle talks to
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Offset added to the stored two-digit year, in years since 1900
    #[must_use]
    pub const fn year_base(&self) -> i32 {
        self.year_base
    }
}

// Time
impl<I2C> Ds1307<I2C>
where
    I2C: I2c,
{
    /// Get complete date and time reading
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_time(&mut self) -> RtcResult<I2C::Error, CalendarTime> {
        let mut buf = [0u8; TIME_REGISTERS];
        self.read_registers(Register::Seconds.addr(), &mut buf)?;
        Ok(CalendarTime::from_registers(&buf, self.year_base))
    }

    /// Set complete date and time
    ///
    /// The clock-halt bit and the 12/24-hour mode currently on the chip are kept; the hour
    /// is encoded in whichever mode the chip is in. Only the last two digits of the year
    /// are stored.
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_time(&mut self, time: &CalendarTime) -> RtcResult<I2C::Error> {
        let mut head = [0u8; HEAD_REGISTERS];
        self.read_registers(Register::Seconds.addr(), &mut head)?;
        let halt = head[Register::Seconds.offset()] & SEC_CH_BIT;
        let twelve_hour = head[Register::Hours.offset()] & HOUR_12_BIT != 0;

        self.write_registers(
            Register::Seconds.addr(),
            &time.to_registers(halt, twelve_hour),
        )
    }

    /// Get the timekeeping registers without decoding BCD or the 12-hour format
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_raw_data(&mut self) -> RtcResult<I2C::Error, RawData> {
        let mut buf = [0u8; TIME_REGISTERS];
        self.read_registers(Register::Seconds.addr(), &mut buf)?;
        Ok(RawData::from_registers(&buf))
    }

    /// Write the timekeeping registers verbatim, keeping the clock-halt bit
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_raw_data(&mut self, data: &RawData) -> RtcResult<I2C::Error> {
        let seconds = self.read_register(Register::Seconds)?;
        self.write_registers(
            Register::Seconds.addr(),
            &data.to_registers(seconds & SEC_CH_BIT),
        )
    }

    /// Whether the hours register is in 12-hour mode
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_12_hour_mode(&mut self) -> RtcResult<I2C::Error, bool> {
        Ok(self.read_register(Register::Hours)? & HOUR_12_BIT != 0)
    }

    /// Switch between 12-hour and 24-hour mode
    ///
    /// The stored hour is re-encoded so the time of day is unchanged.
    /// (Does not alter the device register if already in the requested mode).
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_12_hour_mode(&mut self, twelve_hour: bool) -> RtcResult<I2C::Error> {
        let hours = self.read_register(Register::Hours)?;
        if (hours & HOUR_12_BIT != 0) == twelve_hour {
            return Ok(());
        }

        let hours = if twelve_hour {
            encode_12_hour(from_bcd(hours & HOUR_24_MASK))
        } else {
            to_bcd(decode_12_hour(hours))
        };
        self.write_register(Register::Hours, hours)
    }
}

// Control bits
impl<I2C> Ds1307<I2C>
where
    I2C: I2c,
{
    /// Whether the clock is halted
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_halt(&mut self) -> RtcResult<I2C::Error, bool> {
        Ok(self.get_field(Field::Halt)? != 0)
    }

    /// Set or clear the clock halt bit
    /// (Does not alter the device register if already in the requested state).
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_halt(&mut self, halt: bool) -> RtcResult<I2C::Error> {
        self.set_field(Field::Halt, if halt { Field::Halt.mask() } else { 0 })
    }

    /// SQW/OUT level while the square wave is disabled
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_output(&mut self) -> RtcResult<I2C::Error, bool> {
        Ok(self.get_field(Field::Output)? != 0)
    }

    /// Set the SQW/OUT level used while the square wave is disabled
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_output(&mut self, high: bool) -> RtcResult<I2C::Error> {
        self.set_field(Field::Output, if high { Field::Output.mask() } else { 0 })
    }

    /// Whether square wave output is enabled
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_square_wave_enable(&mut self) -> RtcResult<I2C::Error, bool> {
        Ok(self.get_field(Field::SquareWave)? != 0)
    }

    /// Enable or disable square wave output
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_square_wave_enable(&mut self, enable: bool) -> RtcResult<I2C::Error> {
        let bits = if enable { Field::SquareWave.mask() } else { 0 };
        self.set_field(Field::SquareWave, bits)
    }

    /// Get square wave output frequency
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn get_rate_select(&mut self) -> RtcResult<I2C::Error, RateSelect> {
        self.get_field(Field::RateSelect).map(RateSelect::from_bits)
    }

    /// Set square wave output frequency; only takes effect while the square wave is enabled
    ///
    /// # Errors
    /// Returns an error if the something goes wrong on the I2C bus
    pub fn set_rate_select(&mut self, rate: RateSelect) -> RtcResult<I2C::Error> {
        self.set_field(Field::RateSelect, rate.bits())
    }

    fn get_field(&mut self, field: Field) -> RtcResult<I2C::Error, u8> {
        Ok(self.read_register(field.register())? & field.mask())
    }

    fn set_field(&mut self, field: Field, bits: u8) -> RtcResult<I2C::Error> {
        let original = self.read_register(field.register())?;
        field
            .update(original, bits)
            .map_or(Ok(()), |value| self.write_register(field.register(), value))
    }
}

// RAM
impl<I2C> Ds1307<I2C>
where
    I2C: I2c,
{
    /// Read `buf.len()` bytes of battery-backed RAM starting at `offset`
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the range runs past the 56 byte RAM block, or an
    /// error if the something goes wrong on the I2C bus
    pub fn get_ram(&mut self, offset: u8, buf: &mut [u8]) -> RtcResult<I2C::Error> {
        check_ram_range(offset, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }
        self.read_registers(Register::Ram.addr() + offset, buf)
    }

    /// Write `data` to battery-backed RAM starting at `offset`
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the range runs past the 56 byte RAM block, or an
    /// error if the something goes wrong on the I2C bus
    pub fn set_ram(&mut self, offset: u8, data: &[u8]) -> RtcResult<I2C::Error> {
        check_ram_range(offset, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        self.write_registers(Register::Ram.addr() + offset, data)
    }
}

fn check_ram_range<E>(offset: u8, len: usize) -> RtcResult<E> {
    if usize::from(offset) + len > RAM_SIZE {
        #[cfg(feature = "defmt")]
        defmt::warn!("ds1307: RAM range {=u8}+{=usize} out of bounds", offset, len);
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

// Register access
impl<I2C> Ds1307<I2C>
where
    I2C: I2c,
{
    fn read_register(&mut self, register: Register) -> RtcResult<I2C::Error, u8> {
        let mut data = [0u8];
        self.read_registers(register.addr(), &mut data)?;
        Ok(data[0])
    }

    fn write_register(&mut self, register: Register, value: u8) -> RtcResult<I2C::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("ds1307: {} <- {=u8:#x}", register, value);
        self.i2c
            .write(self.address, &[register.addr(), value])
            .map_err(|e| bus_error(e, register.addr()))
    }

    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> RtcResult<I2C::Error> {
        self.i2c
            .write_read(self.address, &[start], buf)
            .map_err(|e| bus_error(e, start))
    }

    /// Address-prefixed block write; the chip auto-increments its register pointer
    fn write_registers(&mut self, start: u8, data: &[u8]) -> RtcResult<I2C::Error> {
        debug_assert!(data.len() <= RAM_SIZE, "block write larger than the chip");

        let mut buf = [0u8; RAM_SIZE + 1];
        buf[0] = start;
        buf[1..=data.len()].copy_from_slice(data);

        #[cfg(feature = "defmt")]
        defmt::debug!("ds1307: {=u8:#x} <- {=[u8]:x}", start, data);
        self.i2c
            .write(self.address, &buf[..=data.len()])
            .map_err(|e| bus_error(e, start))
    }
}

#[cfg_attr(
    not(feature = "defmt"),
    expect(unused_variables, reason = "only logged"),
    expect(clippy::missing_const_for_fn, reason = "defmt logging is not const")
)]
fn bus_error<E>(error: E, register: u8) -> Error<E> {
    #[cfg(feature = "defmt")]
    defmt::warn!("ds1307: i2c transaction at {=u8:#x} failed", register);
    Error::Bus(error)
}

impl<I2C> DateTimeAccess for Ds1307<I2C>
where
    I2C: I2c,
{
    type Error = Error<I2C::Error>;

    fn datetime(&mut self) -> Result<NaiveDateTime, Self::Error> {
        self.get_time()?.to_naive().ok_or(Error::InvalidDateTime)
    }

    fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Self::Error> {
        self.set_time(&CalendarTime::from(datetime))
    }
}

/// Square wave freqency selection
#[expect(missing_docs, reason = "self-explanatory variants")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RateSelect {
    Hz1,
    Hz4096,
    Hz8192,
    Hz32768,
}

impl RateSelect {
    /// Construct from the RS1:RS0 bits; higher bits are ignored
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Hz1,
            1 => Self::Hz4096,
            2 => Self::Hz8192,
            _ => Self::Hz32768,
        }
    }

    /// RS1:RS0 bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Output frequency in hertz
    #[must_use]
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Self::Hz1 => 1,
            Self::Hz4096 => 4096,
            Self::Hz8192 => 8192,
            Self::Hz32768 => 32768,
        }
    }
}
