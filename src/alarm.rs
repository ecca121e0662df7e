//! Alarm configuration utilities for the DS3231 RTC.
//!
//! This module provides type-safe alarm configuration for the DS3231's alarm registers.
//! It uses enum-based configurations that clearly express the different alarm modes
//! without the confusion of mixing datetime objects with alarm semantics.
//!
//! # Features
//!
//! - Type-safe configuration of Alarm 1 (with seconds precision)
//! - Type-safe configuration of Alarm 2 (minute precision, triggers at 00 seconds)
//! - Clear separation between time specification and recurrence patterns
//! - Day-of-week and date-of-month matching
//!
//! Alarm times are always 24-hour. Each register byte carries a wildcard mask
//! in bit 7; a set mask bit removes that byte from the match, which is how the
//! recurrence patterns below are formed.
//!
//! # Alarm Types
//!
//! ## Alarm 1 Configurations
//! - `EverySecond` - Triggers every second
//! - `AtSeconds` - Triggers when seconds match
//! - `AtMinutesSeconds` - Triggers when minutes:seconds match
//! - `AtTime` - Triggers when hours:minutes:seconds match (daily)
//! - `AtTimeOnDate` - Triggers at specific time on specific date of month
//! - `AtTimeOnDay` - Triggers at specific time on specific day of week
//!
//! ## Alarm 2 Configurations
//! - `EveryMinute` - Triggers every minute (at 00 seconds)
//! - `AtMinutes` - Triggers when minutes match at 00 seconds
//! - `AtTime` - Triggers when hours:minutes match (at 00 seconds, daily)
//! - `AtTimeOnDate` - Triggers at specific time on specific date of month (at 00 seconds)
//! - `AtTimeOnDay` - Triggers at specific time on specific day of week (at 00 seconds)

use crate::{
    datetime::{DS3231DateTime, DateTimeError},
    AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, DayDateSelect,
};

/// Error type for alarm configuration operations.
#[derive(Debug)]
pub enum AlarmError {
    /// Invalid time component value
    InvalidTime(&'static str),
    /// Invalid day of week (must be 1-7)
    InvalidDayOfWeek,
    /// Invalid date of month (must be 1-31)
    InvalidDateOfMonth,
    /// `DateTime` conversion error
    DateTime(DateTimeError),
}

impl From<DateTimeError> for AlarmError {
    fn from(e: DateTimeError) -> Self {
        AlarmError::DateTime(e)
    }
}

/// Selects one of the two alarm channels.
///
/// Used by the flag polling and interrupt operations that behave the same
/// way for both alarms and only differ in which bit they touch.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// Alarm 1 (seconds precision)
    One,
    /// Alarm 2 (minute precision)
    Two,
}

/// Alarm 1 specific configurations.
///
/// Alarm 1 supports seconds-level precision and can match against various time components.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm1Config {
    /// Trigger every second (all mask bits set)
    EverySecond,

    /// Trigger when seconds match (A1M1=0, others=1)
    AtSeconds {
        /// Seconds value (0-59)
        seconds: u8,
    },

    /// Trigger when minutes and seconds match (A1M1=0, A1M2=0, others=1)
    AtMinutesSeconds {
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
    },

    /// Trigger when hours, minutes, and seconds match (A1M1=0, A1M2=0, A1M3=0, A1M4=1)
    /// This creates a daily alarm at the specified time.
    AtTime {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
    },

    /// Trigger at specific time on specific date of month (all mask bits=0, DY/DT=0)
    AtTimeOnDate {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
        /// Date of month (1-31)
        date: u8,
    },

    /// Trigger at specific time on specific day of week (all mask bits=0, DY/DT=1)
    AtTimeOnDay {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Seconds value (0-59)
        seconds: u8,
        /// Day of week (1-7, where 1=Sunday)
        day: u8,
    },
}

/// Alarm 2 specific configurations.
///
/// Alarm 2 has no seconds register and always triggers at 00 seconds of the matching minute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm2Config {
    /// Trigger every minute at 00 seconds (all mask bits set)
    EveryMinute,

    /// Trigger when minutes match at 00 seconds (A2M2=0, others=1)
    AtMinutes {
        /// Minutes value (0-59)
        minutes: u8,
    },

    /// Trigger when hours and minutes match at 00 seconds (A2M2=0, A2M3=0, A2M4=1)
    /// This creates a daily alarm at the specified time.
    AtTime {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
    },

    /// Trigger at specific time on specific date of month at 00 seconds (all mask bits=0, DY/DT=0)
    AtTimeOnDate {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Date of month (1-31)
        date: u8,
    },

    /// Trigger at specific time on specific day of week at 00 seconds (all mask bits=0, DY/DT=1)
    AtTimeOnDay {
        /// Hours value (0-23)
        hours: u8,
        /// Minutes value (0-59)
        minutes: u8,
        /// Day of week (1-7, where 1=Sunday)
        day: u8,
    },
}

impl Alarm1Config {
    /// Validates the alarm configuration and returns any errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any time component is out of valid range.
    pub fn validate(&self) -> Result<(), AlarmError> {
        match self {
            Alarm1Config::EverySecond => Ok(()),

            Alarm1Config::AtSeconds { seconds } => {
                if *seconds > 59 {
                    Err(AlarmError::InvalidTime("seconds must be 0-59"))
                } else {
                    Ok(())
                }
            }

            Alarm1Config::AtMinutesSeconds { minutes, seconds } => {
                if *minutes > 59 {
                    Err(AlarmError::InvalidTime("minutes must be 0-59"))
                } else if *seconds > 59 {
                    Err(AlarmError::InvalidTime("seconds must be 0-59"))
                } else {
                    Ok(())
                }
            }

            Alarm1Config::AtTime {
                hours,
                minutes,
                seconds,
            } => Self::validate_time(*hours, *minutes, *seconds),

            Alarm1Config::AtTimeOnDate {
                hours,
                minutes,
                seconds,
                date,
            } => {
                Self::validate_time(*hours, *minutes, *seconds)?;
                if *date == 0 || *date > 31 {
                    Err(AlarmError::InvalidDateOfMonth)
                } else {
                    Ok(())
                }
            }

            Alarm1Config::AtTimeOnDay {
                hours,
                minutes,
                seconds,
                day,
            } => {
                Self::validate_time(*hours, *minutes, *seconds)?;
                if *day == 0 || *day > 7 {
                    Err(AlarmError::InvalidDayOfWeek)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn validate_time(hours: u8, minutes: u8, seconds: u8) -> Result<(), AlarmError> {
        if minutes > 59 {
            return Err(AlarmError::InvalidTime("minutes must be 0-59"));
        }
        if seconds > 59 {
            return Err(AlarmError::InvalidTime("seconds must be 0-59"));
        }
        if hours > 23 {
            return Err(AlarmError::InvalidTime("hours must be 0-23"));
        }
        Ok(())
    }
}

impl Alarm2Config {
    /// Validates the alarm configuration and returns any errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any time component is out of valid range.
    pub fn validate(&self) -> Result<(), AlarmError> {
        match self {
            Alarm2Config::EveryMinute => Ok(()),

            Alarm2Config::AtMinutes { minutes } => {
                if *minutes > 59 {
                    Err(AlarmError::InvalidTime("minutes must be 0-59"))
                } else {
                    Ok(())
                }
            }

            Alarm2Config::AtTime { hours, minutes } => Self::validate_time(*hours, *minutes),

            Alarm2Config::AtTimeOnDate {
                hours,
                minutes,
                date,
            } => {
                Self::validate_time(*hours, *minutes)?;
                if *date == 0 || *date > 31 {
                    Err(AlarmError::InvalidDateOfMonth)
                } else {
                    Ok(())
                }
            }

            Alarm2Config::AtTimeOnDay {
                hours,
                minutes,
                day,
            } => {
                Self::validate_time(*hours, *minutes)?;
                if *day == 0 || *day > 7 {
                    Err(AlarmError::InvalidDayOfWeek)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn validate_time(hours: u8, minutes: u8) -> Result<(), AlarmError> {
        if minutes > 59 {
            return Err(AlarmError::InvalidTime("minutes must be 0-59"));
        }
        if hours > 23 {
            return Err(AlarmError::InvalidTime("hours must be 0-23"));
        }
        Ok(())
    }
}

/// Internal representation of DS3231 Alarm 1 registers.
///
/// This struct models the 4 alarm 1 registers of the DS3231, using strongly-typed bitfield wrappers for each field.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DS3231Alarm1 {
    seconds: AlarmSeconds,
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

/// Creates configured time components (minutes and hours) for both alarm types
fn create_alarm_time_components(
    hour: u8,
    minute: u8,
) -> Result<(AlarmMinutes, AlarmHours), AlarmError> {
    let (min_ones, min_tens) = DS3231DateTime::make_bcd(u32::from(minute), 59)?;
    let mut minutes = AlarmMinutes::default();
    minutes.set_minutes(min_ones);
    minutes.set_ten_minutes(min_tens);

    let (hour_ones, hour_tens) = DS3231DateTime::make_bcd(u32::from(hour), 23)?;
    let mut hours = AlarmHours::default();
    hours.set_hours(hour_ones);
    hours.set_ten_hours(hour_tens);

    Ok((minutes, hours))
}

/// Creates configured day/date component for both alarm types
fn create_alarm_day_date_component(
    day_or_date: u8,
    is_day: bool,
) -> Result<AlarmDayDate, AlarmError> {
    let mut day_date = AlarmDayDate::default();

    if is_day {
        day_date.set_day_date_select(DayDateSelect::Day);
        day_date.set_day_or_date(day_or_date);
    } else {
        day_date.set_day_date_select(DayDateSelect::Date);
        let (date_ones, date_tens) = DS3231DateTime::make_bcd(u32::from(day_or_date), 31)?;
        day_date.set_day_or_date(date_ones);
        day_date.set_ten_date(date_tens);
    }

    Ok(day_date)
}

impl DS3231Alarm1 {
    /// Creates an Alarm 1 register configuration from an `Alarm1Config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or contains out-of-range values.
    pub fn from_config(config: &Alarm1Config) -> Result<Self, AlarmError> {
        config.validate()?;

        let mut alarm = Self {
            seconds: AlarmSeconds::default(),
            minutes: AlarmMinutes::default(),
            hours: AlarmHours::default(),
            day_date: AlarmDayDate::default(),
        };

        match config {
            Alarm1Config::EverySecond => {
                Self::configure_every_second(&mut alarm);
            }

            Alarm1Config::AtSeconds { seconds: sec } => {
                Self::configure_at_seconds(&mut alarm, *sec)?;
            }

            Alarm1Config::AtMinutesSeconds {
                minutes: min,
                seconds: sec,
            } => {
                Self::configure_at_minutes_seconds(&mut alarm, *min, *sec)?;
            }

            Alarm1Config::AtTime {
                hours: hr,
                minutes: min,
                seconds: sec,
            } => {
                Self::configure_at_time(&mut alarm, *hr, *min, *sec)?;
            }

            Alarm1Config::AtTimeOnDate {
                hours: hr,
                minutes: min,
                seconds: sec,
                date,
            } => {
                Self::configure_at_time_on_date(&mut alarm, *hr, *min, *sec, *date)?;
            }

            Alarm1Config::AtTimeOnDay {
                hours: hr,
                minutes: min,
                seconds: sec,
                day,
            } => {
                Self::configure_at_time_on_day(&mut alarm, *hr, *min, *sec, *day)?;
            }
        }

        Ok(alarm)
    }

    /// Converts the register values back to an `Alarm1Config`.
    ///
    /// # Returns
    ///
    /// The `Alarm1Config` that corresponds to the current register values.
    ///
    /// # Errors
    ///
    /// Returns an error if the register values don't form a valid configuration,
    /// contain invalid BCD values, or use the hardware's 12-hour hour encoding.
    pub fn to_config(&self) -> Result<Alarm1Config, AlarmError> {
        // The mask bit pattern determines the alarm type
        let mask1 = self.seconds.alarm_mask1();
        let mask2 = self.minutes.alarm_mask2();
        let mask3 = self.hours.alarm_mask3();
        let mask4 = self.day_date.alarm_mask4();

        match (mask1, mask2, mask3, mask4) {
            // All masks set - every second
            (true, true, true, true) => Ok(Alarm1Config::EverySecond),

            // Only seconds mask clear - match seconds
            (false, true, true, true) => {
                let seconds = self.decode_bcd_seconds()?;
                Ok(Alarm1Config::AtSeconds { seconds })
            }

            // Seconds and minutes masks clear - match minutes:seconds
            (false, false, true, true) => {
                let seconds = self.decode_bcd_seconds()?;
                let minutes = self.decode_bcd_minutes()?;
                Ok(Alarm1Config::AtMinutesSeconds { minutes, seconds })
            }

            // Only day/date mask set - match time daily
            (false, false, false, true) => {
                let seconds = self.decode_bcd_seconds()?;
                let minutes = self.decode_bcd_minutes()?;
                let hours = self.decode_bcd_hours()?;
                Ok(Alarm1Config::AtTime {
                    hours,
                    minutes,
                    seconds,
                })
            }

            // No masks set - match specific date/day
            (false, false, false, false) => {
                let seconds = self.decode_bcd_seconds()?;
                let minutes = self.decode_bcd_minutes()?;
                let hours = self.decode_bcd_hours()?;

                if self.day_date.day_date_select() == DayDateSelect::Day {
                    // Day of week alarm
                    let day = self.decode_day()?;
                    Ok(Alarm1Config::AtTimeOnDay {
                        hours,
                        minutes,
                        seconds,
                        day,
                    })
                } else {
                    // Date of month alarm
                    let date = self.decode_bcd_day_date()?;
                    Ok(Alarm1Config::AtTimeOnDate {
                        hours,
                        minutes,
                        seconds,
                        date,
                    })
                }
            }

            // Invalid mask combination
            _ => Err(AlarmError::InvalidTime(
                "Invalid alarm mask bit combination",
            )),
        }
    }

    fn decode_bcd_seconds(self) -> Result<u8, AlarmError> {
        let ones = self.seconds.seconds();
        let tens = self.seconds.ten_seconds();
        if ones > 9 || tens > 5 {
            return Err(AlarmError::InvalidTime("Invalid BCD seconds value"));
        }
        Ok(tens * 10 + ones)
    }

    fn decode_bcd_minutes(self) -> Result<u8, AlarmError> {
        let ones = self.minutes.minutes();
        let tens = self.minutes.ten_minutes();
        if ones > 9 || tens > 5 {
            return Err(AlarmError::InvalidTime("Invalid BCD minutes value"));
        }
        Ok(tens * 10 + ones)
    }

    fn decode_bcd_hours(self) -> Result<u8, AlarmError> {
        if self.hours.twelve_hour() {
            return Err(AlarmError::InvalidTime(
                "12-hour alarm encoding is not supported",
            ));
        }
        let ones = self.hours.hours();
        let tens = self.hours.ten_hours();
        if ones > 9 {
            return Err(AlarmError::InvalidTime("Invalid BCD hours value"));
        }
        let hours = tens * 10 + ones;
        if hours > 23 {
            return Err(AlarmError::InvalidTime("Invalid 24-hour value"));
        }
        Ok(hours)
    }

    fn decode_day(self) -> Result<u8, AlarmError> {
        let day = self.day_date.day_or_date();
        if day == 0 || day > 7 {
            return Err(AlarmError::InvalidDayOfWeek);
        }
        Ok(day)
    }

    fn decode_bcd_day_date(self) -> Result<u8, AlarmError> {
        let ones = self.day_date.day_or_date();
        let tens = self.day_date.ten_date();
        if ones > 9 || tens > 3 {
            return Err(AlarmError::InvalidTime("Invalid BCD date value"));
        }
        let date = tens * 10 + ones;
        if date == 0 || date > 31 {
            return Err(AlarmError::InvalidTime("Invalid date value"));
        }
        Ok(date)
    }

    fn configure_every_second(alarm: &mut Self) {
        alarm.seconds.set_alarm_mask1(true);
        alarm.minutes.set_alarm_mask2(true);
        alarm.hours.set_alarm_mask3(true);
        alarm.day_date.set_alarm_mask4(true);
    }

    fn configure_at_seconds(alarm: &mut Self, sec: u8) -> Result<(), AlarmError> {
        let (sec_ones, sec_tens) = DS3231DateTime::make_bcd(u32::from(sec), 59)?;
        alarm.seconds.set_seconds(sec_ones);
        alarm.seconds.set_ten_seconds(sec_tens);
        alarm.seconds.set_alarm_mask1(false);
        alarm.minutes.set_alarm_mask2(true);
        alarm.hours.set_alarm_mask3(true);
        alarm.day_date.set_alarm_mask4(true);
        Ok(())
    }

    fn configure_at_minutes_seconds(alarm: &mut Self, min: u8, sec: u8) -> Result<(), AlarmError> {
        let (sec_ones, sec_tens) = DS3231DateTime::make_bcd(u32::from(sec), 59)?;
        alarm.seconds.set_seconds(sec_ones);
        alarm.seconds.set_ten_seconds(sec_tens);
        alarm.seconds.set_alarm_mask1(false);

        let (min_ones, min_tens) = DS3231DateTime::make_bcd(u32::from(min), 59)?;
        alarm.minutes.set_minutes(min_ones);
        alarm.minutes.set_ten_minutes(min_tens);
        alarm.minutes.set_alarm_mask2(false);

        alarm.hours.set_alarm_mask3(true);
        alarm.day_date.set_alarm_mask4(true);
        Ok(())
    }

    fn configure_at_time(alarm: &mut Self, hr: u8, min: u8, sec: u8) -> Result<(), AlarmError> {
        Self::set_time_components(
            &mut alarm.seconds,
            &mut alarm.minutes,
            &mut alarm.hours,
            hr,
            min,
            sec,
        )?;
        alarm.seconds.set_alarm_mask1(false);
        alarm.minutes.set_alarm_mask2(false);
        alarm.hours.set_alarm_mask3(false);
        alarm.day_date.set_alarm_mask4(true);
        Ok(())
    }

    fn configure_at_time_on_date(
        alarm: &mut Self,
        hr: u8,
        min: u8,
        sec: u8,
        date: u8,
    ) -> Result<(), AlarmError> {
        Self::set_time_components(
            &mut alarm.seconds,
            &mut alarm.minutes,
            &mut alarm.hours,
            hr,
            min,
            sec,
        )?;
        alarm.seconds.set_alarm_mask1(false);
        alarm.minutes.set_alarm_mask2(false);
        alarm.hours.set_alarm_mask3(false);

        alarm.day_date = create_alarm_day_date_component(date, false)?;
        alarm.day_date.set_alarm_mask4(false);
        Ok(())
    }

    fn configure_at_time_on_day(
        alarm: &mut Self,
        hr: u8,
        min: u8,
        sec: u8,
        day: u8,
    ) -> Result<(), AlarmError> {
        Self::set_time_components(
            &mut alarm.seconds,
            &mut alarm.minutes,
            &mut alarm.hours,
            hr,
            min,
            sec,
        )?;
        alarm.seconds.set_alarm_mask1(false);
        alarm.minutes.set_alarm_mask2(false);
        alarm.hours.set_alarm_mask3(false);

        alarm.day_date = create_alarm_day_date_component(day, true)?;
        alarm.day_date.set_alarm_mask4(false);
        Ok(())
    }

    fn set_time_components(
        seconds: &mut AlarmSeconds,
        minutes: &mut AlarmMinutes,
        hours: &mut AlarmHours,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<(), AlarmError> {
        // Set seconds
        let (sec_ones, sec_tens) = DS3231DateTime::make_bcd(u32::from(second), 59)?;
        seconds.set_seconds(sec_ones);
        seconds.set_ten_seconds(sec_tens);

        // Use shared helper for minutes and hours
        let (new_minutes, new_hours) = create_alarm_time_components(hour, minute)?;
        *minutes = new_minutes;
        *hours = new_hours;
        Ok(())
    }

    /// Gets the alarm seconds register
    #[must_use]
    pub fn seconds(&self) -> AlarmSeconds {
        self.seconds
    }

    /// Gets the alarm minutes register
    #[must_use]
    pub fn minutes(&self) -> AlarmMinutes {
        self.minutes
    }

    /// Gets the alarm hours register
    #[must_use]
    pub fn hours(&self) -> AlarmHours {
        self.hours
    }

    /// Gets the alarm day/date register
    #[must_use]
    pub fn day_date(&self) -> AlarmDayDate {
        self.day_date
    }

    /// Creates an Alarm 1 configuration from existing register values.
    #[must_use]
    pub fn from_registers(
        seconds: AlarmSeconds,
        minutes: AlarmMinutes,
        hours: AlarmHours,
        day_date: AlarmDayDate,
    ) -> Self {
        DS3231Alarm1 {
            seconds,
            minutes,
            hours,
            day_date,
        }
    }
}

impl From<[u8; 4]> for DS3231Alarm1 {
    fn from(data: [u8; 4]) -> Self {
        DS3231Alarm1 {
            seconds: AlarmSeconds(data[0]),
            minutes: AlarmMinutes(data[1]),
            hours: AlarmHours(data[2]),
            day_date: AlarmDayDate(data[3]),
        }
    }
}

impl From<&DS3231Alarm1> for [u8; 4] {
    fn from(alarm: &DS3231Alarm1) -> [u8; 4] {
        [
            alarm.seconds.0,
            alarm.minutes.0,
            alarm.hours.0,
            alarm.day_date.0,
        ]
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DS3231Alarm1 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DS3231Alarm1 {{ ");
        defmt::write!(f, "seconds: {}, ", self.seconds);
        defmt::write!(f, "minutes: {}, ", self.minutes);
        defmt::write!(f, "hours: {}, ", self.hours);
        defmt::write!(f, "day_date: {} ", self.day_date);
        defmt::write!(f, "}}");
    }
}

/// Internal representation of DS3231 Alarm 2 registers.
///
/// This struct models the 3 alarm 2 registers of the DS3231 (no seconds register).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DS3231Alarm2 {
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

impl DS3231Alarm2 {
    /// Creates an Alarm 2 register configuration from an `Alarm2Config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or contains out-of-range values.
    pub fn from_config(config: &Alarm2Config) -> Result<Self, AlarmError> {
        config.validate()?;

        let mut minutes = AlarmMinutes::default();
        let mut hours = AlarmHours::default();
        let mut day_date = AlarmDayDate::default();

        match config {
            Alarm2Config::EveryMinute => {
                // All mask bits set
                minutes.set_alarm_mask2(true);
                hours.set_alarm_mask3(true);
                day_date.set_alarm_mask4(true);
            }

            Alarm2Config::AtMinutes { minutes: min } => {
                let (min_ones, min_tens) = DS3231DateTime::make_bcd(u32::from(*min), 59)?;
                minutes.set_minutes(min_ones);
                minutes.set_ten_minutes(min_tens);
                minutes.set_alarm_mask2(false);
                hours.set_alarm_mask3(true);
                day_date.set_alarm_mask4(true);
            }

            Alarm2Config::AtTime {
                hours: hr,
                minutes: min,
            } => {
                Self::set_time_components(&mut minutes, &mut hours, *hr, *min)?;
                minutes.set_alarm_mask2(false);
                hours.set_alarm_mask3(false);
                day_date.set_alarm_mask4(true); // Don't match day/date
            }

            Alarm2Config::AtTimeOnDate {
                hours: hr,
                minutes: min,
                date,
            } => {
                Self::set_time_components(&mut minutes, &mut hours, *hr, *min)?;
                minutes.set_alarm_mask2(false);
                hours.set_alarm_mask3(false);

                day_date = create_alarm_day_date_component(*date, false)?;
                day_date.set_alarm_mask4(false);
            }

            Alarm2Config::AtTimeOnDay {
                hours: hr,
                minutes: min,
                day,
            } => {
                Self::set_time_components(&mut minutes, &mut hours, *hr, *min)?;
                minutes.set_alarm_mask2(false);
                hours.set_alarm_mask3(false);

                day_date = create_alarm_day_date_component(*day, true)?;
                day_date.set_alarm_mask4(false);
            }
        }

        Ok(DS3231Alarm2 {
            minutes,
            hours,
            day_date,
        })
    }

    /// Converts the register values back to an `Alarm2Config`.
    ///
    /// # Returns
    ///
    /// The `Alarm2Config` that corresponds to the current register values.
    ///
    /// # Errors
    ///
    /// Returns an error if the register values don't form a valid configuration,
    /// contain invalid BCD values, or use the hardware's 12-hour hour encoding.
    pub fn to_config(&self) -> Result<Alarm2Config, AlarmError> {
        // The mask bit pattern determines the alarm type
        let mask2 = self.minutes.alarm_mask2();
        let mask3 = self.hours.alarm_mask3();
        let mask4 = self.day_date.alarm_mask4();

        match (mask2, mask3, mask4) {
            // All masks set - every minute
            (true, true, true) => Ok(Alarm2Config::EveryMinute),

            // Only minutes mask clear - match minutes
            (false, true, true) => {
                let minutes = self.decode_bcd_minutes()?;
                Ok(Alarm2Config::AtMinutes { minutes })
            }

            // Only day/date mask set - match time daily
            (false, false, true) => {
                let minutes = self.decode_bcd_minutes()?;
                let hours = self.decode_bcd_hours()?;
                Ok(Alarm2Config::AtTime { hours, minutes })
            }

            // No masks set - match specific date/day
            (false, false, false) => {
                let minutes = self.decode_bcd_minutes()?;
                let hours = self.decode_bcd_hours()?;

                if self.day_date.day_date_select() == DayDateSelect::Day {
                    // Day of week alarm
                    let day = self.decode_day()?;
                    Ok(Alarm2Config::AtTimeOnDay {
                        hours,
                        minutes,
                        day,
                    })
                } else {
                    // Date of month alarm
                    let date = self.decode_bcd_day_date()?;
                    Ok(Alarm2Config::AtTimeOnDate {
                        hours,
                        minutes,
                        date,
                    })
                }
            }

            // Invalid mask combination
            _ => Err(AlarmError::InvalidTime(
                "Invalid alarm mask bit combination",
            )),
        }
    }

    fn decode_bcd_minutes(self) -> Result<u8, AlarmError> {
        let ones = self.minutes.minutes();
        let tens = self.minutes.ten_minutes();
        if ones > 9 || tens > 5 {
            return Err(AlarmError::InvalidTime("Invalid BCD minutes value"));
        }
        Ok(tens * 10 + ones)
    }

    fn decode_bcd_hours(self) -> Result<u8, AlarmError> {
        if self.hours.twelve_hour() {
            return Err(AlarmError::InvalidTime(
                "12-hour alarm encoding is not supported",
            ));
        }
        let ones = self.hours.hours();
        let tens = self.hours.ten_hours();
        if ones > 9 {
            return Err(AlarmError::InvalidTime("Invalid BCD hours value"));
        }
        let hours = tens * 10 + ones;
        if hours > 23 {
            return Err(AlarmError::InvalidTime("Invalid 24-hour value"));
        }
        Ok(hours)
    }

    fn decode_day(self) -> Result<u8, AlarmError> {
        let day = self.day_date.day_or_date();
        if day == 0 || day > 7 {
            return Err(AlarmError::InvalidDayOfWeek);
        }
        Ok(day)
    }

    fn decode_bcd_day_date(self) -> Result<u8, AlarmError> {
        let ones = self.day_date.day_or_date();
        let tens = self.day_date.ten_date();
        if ones > 9 || tens > 3 {
            return Err(AlarmError::InvalidTime("Invalid BCD date value"));
        }
        let date = tens * 10 + ones;
        if date == 0 || date > 31 {
            return Err(AlarmError::InvalidTime("Invalid date value"));
        }
        Ok(date)
    }

    fn set_time_components(
        minutes: &mut AlarmMinutes,
        hours: &mut AlarmHours,
        hour: u8,
        minute: u8,
    ) -> Result<(), AlarmError> {
        // Use shared helper for minutes and hours
        let (new_minutes, new_hours) = create_alarm_time_components(hour, minute)?;
        *minutes = new_minutes;
        *hours = new_hours;
        Ok(())
    }

    /// Gets the alarm minutes register
    #[must_use]
    pub fn minutes(&self) -> AlarmMinutes {
        self.minutes
    }

    /// Gets the alarm hours register
    #[must_use]
    pub fn hours(&self) -> AlarmHours {
        self.hours
    }

    /// Gets the alarm day/date register
    #[must_use]
    pub fn day_date(&self) -> AlarmDayDate {
        self.day_date
    }

    /// Creates an Alarm 2 configuration from existing register values.
    #[must_use]
    pub fn from_registers(
        minutes: AlarmMinutes,
        hours: AlarmHours,
        day_date: AlarmDayDate,
    ) -> Self {
        DS3231Alarm2 {
            minutes,
            hours,
            day_date,
        }
    }
}

impl From<[u8; 3]> for DS3231Alarm2 {
    fn from(data: [u8; 3]) -> Self {
        DS3231Alarm2 {
            minutes: AlarmMinutes(data[0]),
            hours: AlarmHours(data[1]),
            day_date: AlarmDayDate(data[2]),
        }
    }
}

impl From<&DS3231Alarm2> for [u8; 3] {
    fn from(alarm: &DS3231Alarm2) -> [u8; 3] {
        [alarm.minutes.0, alarm.hours.0, alarm.day_date.0]
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DS3231Alarm2 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "DS3231Alarm2 {{ ");
        defmt::write!(f, "minutes: {}, ", self.minutes);
        defmt::write!(f, "hours: {}, ", self.hours);
        defmt::write!(f, "day_date: {} ", self.day_date);
        defmt::write!(f, "}}");
    }
}
