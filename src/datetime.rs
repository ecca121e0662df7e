//! Calendar record and register conversion for the DS3231 RTC.
//!
//! This module provides the plain-decimal [`DateTime`] record and the conversion
//! logic between it and the DS3231's BCD-encoded date/time registers.
//!
//! # Register Model
//!
//! The DS3231 stores date and time in 7 consecutive registers:
//! - Seconds, Minutes, Hours, Day, Date, Month, Year
//!
//! All fields are BCD-encoded. The driver always writes the hours register in
//! 24-hour form and never sets the century bit; encoding enforces per-field
//! upper bounds, while decoding is infallible and passes whatever digits the
//! device holds straight through.
//!
//! # Error Handling
//!
//! Conversion errors are reported via [`DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{Date, Day, Hours, Minutes, Month, Seconds, Year};

/// A decoded calendar date and time as kept by the DS3231.
///
/// All fields are plain decimal. The year is an offset from 2000, so the
/// representable span is 2000 through 2099; the century bit in the month
/// register is never used.
///
/// No calendar validation is applied: `month: 2, day: 31` is accepted and
/// written verbatim, exactly as the device itself would accept it. Only
/// per-field upper bounds are enforced when a record is encoded for the
/// device.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Year offset from 2000 (0 through 99)
    pub year: u8,
    /// Month, 1 through 12
    pub month: u8,
    /// Day of the month, 1 through 31
    pub day: u8,
    /// Day of the week, 1 through 7.
    ///
    /// The device simply increments this field at midnight; the meaning of
    /// each value is up to the application. The chrono conversions in this
    /// crate use 1 = Sunday.
    pub day_of_week: u8,
    /// Hour of the day, 0 through 23
    pub hour: u8,
    /// Minute, 0 through 59
    pub minute: u8,
    /// Second, 0 through 59
    pub second: u8,
}

/// Internal register image of the DS3231 date and time.
///
/// This struct models the 7 date/time registers of the DS3231, using
/// strongly-typed bitfield wrappers for each field. It is used for
/// register-level I/O and conversion to/from [`DateTime`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct DS3231DateTime {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    day: Day,
    date: Date,
    month: Month,
    year: Year,
}

impl DS3231DateTime {
    /// Helper function to convert a number to BCD format with validation
    pub(crate) fn make_bcd(value: u32, max_value: u32) -> Result<(u8, u8), DateTimeError> {
        if value > max_value {
            return Err(DateTimeError::InvalidDateTime);
        }
        let ones = u8::try_from(value % 10).map_err(|_| DateTimeError::InvalidDateTime)?;
        let tens = u8::try_from(value / 10).map_err(|_| DateTimeError::InvalidDateTime)?;
        Ok((ones, tens))
    }

    fn convert_seconds(seconds: u32) -> Result<Seconds, DateTimeError> {
        let (ones, tens) = Self::make_bcd(seconds, 59)?;
        let mut value = Seconds::default();
        value.set_seconds(ones);
        value.set_ten_seconds(tens);
        Ok(value)
    }

    fn convert_minutes(minutes: u32) -> Result<Minutes, DateTimeError> {
        let (ones, tens) = Self::make_bcd(minutes, 59)?;
        let mut value = Minutes::default();
        value.set_minutes(ones);
        value.set_ten_minutes(tens);
        Ok(value)
    }

    fn convert_hours(hour: u32) -> Result<Hours, DateTimeError> {
        let (ones, tens) = Self::make_bcd(hour, 23)?;
        let mut value = Hours::default();
        value.set_hours(ones);
        value.set_ten_hours(tens);
        Ok(value)
    }

    fn convert_day(day_of_week: u32) -> Result<Day, DateTimeError> {
        if day_of_week > 7 {
            return Err(DateTimeError::InvalidDateTime);
        }
        let mut value = Day::default();
        value.set_day(u8::try_from(day_of_week).map_err(|_| DateTimeError::InvalidDateTime)?);
        Ok(value)
    }

    fn convert_date(date: u32) -> Result<Date, DateTimeError> {
        let (ones, tens) = Self::make_bcd(date, 31)?;
        let mut value = Date::default();
        value.set_date(ones);
        value.set_ten_date(tens);
        Ok(value)
    }

    fn convert_month(month: u32) -> Result<Month, DateTimeError> {
        let (ones, tens) = Self::make_bcd(month, 12)?;
        let mut value = Month::default();
        value.set_month(ones);
        value.set_ten_month(tens);
        Ok(value)
    }

    fn convert_year(year: u32) -> Result<Year, DateTimeError> {
        let (ones, tens) = Self::make_bcd(year, 99)?;
        let mut value = Year::default();
        value.set_year(ones);
        value.set_ten_year(tens);
        Ok(value)
    }

    /// Encodes a [`DateTime`] record into the register image.
    ///
    /// Each field is bounds-checked and converted to BCD. The century bit in
    /// the month register is never set.
    pub(crate) fn from_record(datetime: &DateTime) -> Result<Self, DateTimeError> {
        let raw = DS3231DateTime {
            seconds: Self::convert_seconds(u32::from(datetime.second))?,
            minutes: Self::convert_minutes(u32::from(datetime.minute))?,
            hours: Self::convert_hours(u32::from(datetime.hour))?,
            day: Self::convert_day(u32::from(datetime.day_of_week))?,
            date: Self::convert_date(u32::from(datetime.day))?,
            month: Self::convert_month(u32::from(datetime.month))?,
            year: Self::convert_year(u32::from(datetime.year))?,
        };

        debug!("raw={:?}", raw);

        Ok(raw)
    }

    /// Decodes the register image into a [`DateTime`] record.
    ///
    /// Decoding never fails: the digit fields are extracted structurally, so
    /// the century bit and the 12-hour mode bit are masked away and any
    /// out-of-range nibbles the device holds pass through uninterpreted.
    pub(crate) fn into_record(self) -> DateTime {
        DateTime {
            year: 10 * self.year.ten_year() + self.year.year(),
            month: 10 * self.month.ten_month() + self.month.month(),
            day: 10 * self.date.ten_date() + self.date.date(),
            day_of_week: self.day.day(),
            hour: 10 * self.hours.ten_hours() + self.hours.hours(),
            minute: 10 * self.minutes.ten_minutes() + self.minutes.minutes(),
            second: 10 * self.seconds.ten_seconds() + self.seconds.seconds(),
        }
    }
}

impl From<[u8; 7]> for DS3231DateTime {
    fn from(data: [u8; 7]) -> Self {
        DS3231DateTime {
            seconds: Seconds(data[0]),
            minutes: Minutes(data[1]),
            hours: Hours(data[2]),
            day: Day(data[3]),
            date: Date(data[4]),
            month: Month(data[5]),
            year: Year(data[6]),
        }
    }
}

impl From<&DS3231DateTime> for [u8; 7] {
    fn from(dt: &DS3231DateTime) -> [u8; 7] {
        [
            dt.seconds.0,
            dt.minutes.0,
            dt.hours.0,
            dt.day.0,
            dt.date.0,
            dt.month.0,
            dt.year.0,
        ]
    }
}

impl TryFrom<NaiveDateTime> for DateTime {
    type Error = DateTimeError;

    /// Converts a chrono `NaiveDateTime` into a [`DateTime`] record.
    ///
    /// The year must fall in the device's 2000 through 2099 span. The day of
    /// the week is derived from the date, with 1 = Sunday.
    fn try_from(datetime: NaiveDateTime) -> Result<Self, Self::Error> {
        let year = datetime.year();
        if year < 2000 {
            error!("Year {} is too early! must be greater than 1999", year);
            return Err(DateTimeError::YearNotAfter1999);
        }
        if year > 2099 {
            error!("Year {} is too late! must be before 2100", year);
            return Err(DateTimeError::YearNotBefore2100);
        }
        let convert = |value: u32| u8::try_from(value).map_err(|_| DateTimeError::InvalidDateTime);
        Ok(DateTime {
            year: u8::try_from(year - 2000).map_err(|_| DateTimeError::InvalidDateTime)?,
            month: convert(datetime.month())?,
            day: convert(datetime.day())?,
            day_of_week: convert(datetime.weekday().num_days_from_sunday() + 1)?,
            hour: convert(datetime.hour())?,
            minute: convert(datetime.minute())?,
            second: convert(datetime.second())?,
        })
    }
}

impl TryFrom<DateTime> for NaiveDateTime {
    type Error = DateTimeError;

    /// Converts a [`DateTime`] record into a chrono `NaiveDateTime`.
    ///
    /// This is where calendar validation happens: a record holding a date
    /// that does not exist (or out-of-range digits read back from the
    /// device) is rejected. The stored day of the week is ignored; chrono
    /// derives it from the date.
    fn try_from(datetime: DateTime) -> Result<Self, Self::Error> {
        NaiveDate::from_ymd_opt(
            2000_i32 + i32::from(datetime.year),
            u32::from(datetime.month),
            u32::from(datetime.day),
        )
        .and_then(|d| {
            d.and_hms_opt(
                u32::from(datetime.hour),
                u32::from(datetime.minute),
                u32::from(datetime.second),
            )
        })
        .ok_or(DateTimeError::InvalidDateTime)
    }
}

#[derive(Debug, PartialEq)]
/// Errors that can occur during DS3231 date/time conversion or validation.
pub enum DateTimeError {
    /// The provided or decoded date/time is invalid (e.g., out of range, not representable)
    InvalidDateTime,
    /// The year is not before 2100 (this driver only supports years < 2100)
    YearNotBefore2100,
    /// The year is not after 1999 (this driver only supports years >= 2000)
    YearNotAfter1999,
}
