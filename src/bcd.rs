//! Packed BCD and 12/24-hour encodings used by the DS1307 time registers

use crate::register::{HOUR_12_BIT, HOUR_12_MASK, HOUR_PM_BIT};

/// Pack a binary value `0..=99` into two BCD digits
///
/// Values above 99 are not rejected; the chip is the only consumer and the callers mask
/// the result to the field width.
#[must_use]
pub const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Unpack two BCD digits into a binary value
///
/// Nibbles above 9 pass through unchecked
#[must_use]
pub const fn from_bcd(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0f)
}

/// Decode a 12-hour hours register into a 24-hour value `0..=23`
///
/// The 12/24 mode bit is ignored; only the hour digits and the PM flag are read.
#[must_use]
pub const fn decode_12_hour(encoded: u8) -> u8 {
    let mut hour = from_bcd(encoded & HOUR_12_MASK);

    // 12 AM is midnight, 12 PM is noon
    if hour == 12 {
        hour = 0;
    }
    if encoded & HOUR_PM_BIT != 0 {
        hour += 12;
    }
    hour
}

/// Encode a 24-hour value `0..=23` as a 12-hour hours register, mode bit included
#[must_use]
pub const fn encode_12_hour(hour: u8) -> u8 {
    let (hour, pm) = if hour >= 12 {
        (hour - 12, HOUR_PM_BIT)
    } else {
        (hour, 0)
    };
    let hour = if hour == 0 { 12 } else { hour };
    (to_bcd(hour) & HOUR_12_MASK) | HOUR_12_BIT | pm
}
