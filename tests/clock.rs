//! End-to-end behaviour against an in-memory DS1307

mod common;

use chrono::NaiveDate;
use ds1307::{
    CalendarTime, Config, DateTimeAccess, Ds1307, Error, RateSelect, RawHour, RAM_SIZE,
};
use embedded_hal::i2c::ErrorKind;

use common::FakeDs1307;

fn rtc() -> Ds1307<FakeDs1307> {
    Ds1307::new(FakeDs1307::new(), Config::default())
        .map_err(|(e, _)| e)
        .unwrap()
}

fn sample_time() -> CalendarTime {
    // Saturday 2022-10-29 23:59:58
    CalendarTime {
        year: 122,
        month: 9,
        day: 29,
        weekday: 6,
        hour: 23,
        minute: 59,
        second: 58,
    }
}

#[test]
fn datetime_round_trip_24_hour() {
    let mut rtc = rtc();
    rtc.set_time(&sample_time()).unwrap();
    assert_eq!(rtc.get_time().unwrap(), sample_time(), "round trip");
    assert_eq!(
        rtc.release().regs[..7],
        [0x58, 0x59, 0x23, 0x07, 0x29, 0x10, 0x22],
        "register image"
    );
}

#[test]
fn datetime_round_trip_12_hour() {
    let mut rtc = rtc();
    rtc.set_12_hour_mode(true).unwrap();
    for hour in 0..24 {
        let time = CalendarTime {
            hour,
            ..sample_time()
        };
        rtc.set_time(&time).unwrap();
        assert_eq!(rtc.get_time().unwrap(), time, "round trip at {hour}h");
    }
    assert!(rtc.get_12_hour_mode().unwrap(), "still in 12-hour mode");
}

#[test]
fn set_time_keeps_halt() {
    let mut rtc = rtc();
    rtc.set_halt(true).unwrap();
    rtc.set_time(&sample_time()).unwrap();
    assert!(rtc.get_halt().unwrap(), "CH survives a time write");
    assert_eq!(rtc.get_time().unwrap().second, 58, "seconds unaffected by CH");
}

#[test]
fn year_keeps_only_two_digits() {
    let mut rtc = rtc();
    let time = CalendarTime {
        year: 305,
        ..sample_time()
    };
    rtc.set_time(&time).unwrap();
    assert_eq!(rtc.get_time().unwrap().year, 105, "2205 reads back as 2005");
}

#[test]
fn century_offsets_year() {
    let config = Config {
        century: 20,
        ..Config::default()
    };
    let mut rtc = Ds1307::new(FakeDs1307::new(), config)
        .map_err(|(e, _)| e)
        .unwrap();
    rtc.set_time(&sample_time()).unwrap();
    assert_eq!(rtc.get_time().unwrap().year, 22, "1922 with century 20");
}

#[test]
fn mode_switch_keeps_time_of_day() {
    let mut rtc = rtc();
    rtc.set_time(&CalendarTime {
        hour: 15,
        ..sample_time()
    })
    .unwrap();

    rtc.set_12_hour_mode(true).unwrap();
    assert!(rtc.get_12_hour_mode().unwrap(), "12-hour mode");
    let raw = rtc.get_raw_data().unwrap();
    assert_eq!(raw.hour, RawHour::TwelveHour { hour: 0x03, pm: true }, "3 PM");
    assert_eq!(rtc.get_time().unwrap().hour, 15, "decoded hour");

    rtc.set_12_hour_mode(false).unwrap();
    let raw = rtc.get_raw_data().unwrap();
    assert_eq!(raw.hour, RawHour::TwentyFourHour { hour: 0x15 }, "back to 24-hour");
}

#[test]
fn set_halt_twice_writes_once() {
    let mut rtc = rtc();
    rtc.set_halt(true).unwrap();
    assert!(rtc.get_halt().unwrap(), "halted");
    rtc.set_halt(true).unwrap();
    assert_eq!(rtc.release().writes, 1, "second set_halt must not write");
}

#[test]
fn rate_select_leaves_out_and_sqwe() {
    let mut rtc = rtc();
    rtc.set_output(true).unwrap();
    rtc.set_square_wave_enable(true).unwrap();

    for rate in [
        RateSelect::Hz4096,
        RateSelect::Hz8192,
        RateSelect::Hz32768,
        RateSelect::Hz1,
    ] {
        rtc.set_rate_select(rate).unwrap();
        assert_eq!(rtc.get_rate_select().unwrap(), rate, "rate");
        assert!(rtc.get_output().unwrap(), "OUT untouched");
        assert!(rtc.get_square_wave_enable().unwrap(), "SQWE untouched");
    }

    rtc.set_square_wave_enable(false).unwrap();
    assert!(rtc.get_output().unwrap(), "OUT untouched by SQWE");
    assert_eq!(rtc.release().regs[7], 0x80, "control register");
}

#[test]
fn raw_data_round_trip() {
    let mut rtc = rtc();
    rtc.set_halt(true).unwrap();
    let mut raw = rtc.get_raw_data().unwrap();
    raw.second = 0x12;
    raw.minute = 0x34;
    raw.hour = RawHour::TwelveHour { hour: 0x12, pm: false };
    raw.day = 0x05;
    raw.date = 0x17;
    raw.month = 0x08;
    raw.year = 0x99;
    rtc.set_raw_data(&raw).unwrap();

    assert_eq!(rtc.get_raw_data().unwrap(), raw, "raw round trip");
    assert!(rtc.get_halt().unwrap(), "CH kept");
    assert_eq!(rtc.get_time().unwrap().hour, 0, "12 AM is midnight");
}

#[test]
fn ram_access_is_bounded() {
    let mut rtc = rtc();
    let data: [u8; 16] = core::array::from_fn(|i| u8::try_from(i).unwrap());
    rtc.set_ram(40, &data).unwrap();

    let mut buf = [0u8; 16];
    rtc.get_ram(40, &mut buf).unwrap();
    assert_eq!(buf, data, "RAM round trip at the end boundary");

    let mut buf = [0u8; 10];
    assert_eq!(rtc.get_ram(50, &mut buf), Err(Error::InvalidArgument), "read past end");
    assert_eq!(rtc.set_ram(50, &buf), Err(Error::InvalidArgument), "write past end");

    let fake = rtc.release();
    assert_eq!(fake.regs[0x30..0x40], data, "absolute RAM addresses");
    assert_eq!(fake.regs[..8], [0; 8], "time registers untouched");
}

#[test]
fn whole_ram_block() {
    let mut rtc = rtc();
    rtc.set_ram(0, &[0xa5; RAM_SIZE]).unwrap();
    let mut buf = [0u8; RAM_SIZE];
    rtc.get_ram(0, &mut buf).unwrap();
    assert_eq!(buf, [0xa5; RAM_SIZE], "full RAM");
}

#[test]
fn bus_failure_is_surfaced() {
    let mut fake = FakeDs1307::new();
    fake.fail = true;
    let mut rtc = Ds1307::new(fake, Config::default())
        .map_err(|(e, _)| e)
        .unwrap();

    assert_eq!(rtc.get_time(), Err(Error::Bus(ErrorKind::Other)), "read failure");
    assert_eq!(rtc.set_halt(false), Err(Error::Bus(ErrorKind::Other)), "RMW failure");
    assert_eq!(rtc.release().reads, 0, "no retries");
}

#[test]
fn out_of_range_century_returns_bus() {
    let config = Config {
        century: i32::MIN,
        ..Config::default()
    };
    let (error, fake) = Ds1307::new(FakeDs1307::new(), config).err().unwrap();
    assert_eq!(error, Error::InvalidArgument, "century rejected");
    assert_eq!(fake.reads + fake.writes, 0, "no bus traffic");
}

#[test]
fn rtcc_datetime_access() {
    let mut rtc = rtc();
    let naive = NaiveDate::from_ymd_opt(2031, 1, 2)
        .unwrap()
        .and_hms_opt(4, 5, 6)
        .unwrap();
    rtc.set_datetime(&naive).unwrap();
    assert_eq!(rtc.datetime().unwrap(), naive, "chrono round trip");
    assert_eq!(rtc.get_time().unwrap().weekday, 4, "2031-01-02 is a Thursday");
}
