//! A platform-agnostic, `no_std` driver for the DS3231 real-time clock,
//! built on the `embedded-hal` 1.0 I2C traits.
//!
//! The DS3231 keeps time in packed BCD across a 19-register map. This crate
//! exposes that map three ways:
//!
//! - a plain [`DateTime`] record with [`DS3231::read_time`] and
//!   [`DS3231::set_time`], plus `chrono` conversions via
//!   [`DS3231::datetime`] and [`DS3231::set_datetime`],
//! - type-safe alarm configuration for both alarm channels
//!   ([`Alarm1Config`], [`Alarm2Config`]) with flag polling and selective
//!   clearing,
//! - typed single-register accessors (`control()`, `set_control(..)`, ...)
//!   and raw register access for everything else, including the control of
//!   the multiplexed INT/SQW output pin and the 32 kHz output.
//!
//! # Features
//!
//! - `async` - Async driver mirror in the `asynch` module, using
//!   `embedded-hal-async`.
//! - `log` - Debug output through the `log` crate.
//! - `defmt` - `defmt::Format` impls and RTT-friendly debug output.
//! - `temperature_f32` - Floating point readout of the die temperature.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds3231_rtc::{Alarm, Alarm1Config, DateTime, DS3231, DEVICE_ADDRESS};
//!
//! let mut rtc = DS3231::new(i2c, DEVICE_ADDRESS);
//!
//! rtc.set_time(&DateTime {
//!     year: 25,
//!     month: 10,
//!     day: 12,
//!     day_of_week: 1,
//!     hour: 14,
//!     minute: 30,
//!     second: 0,
//! })?;
//!
//! rtc.set_alarm1(&Alarm1Config::AtTime {
//!     hours: 6,
//!     minutes: 30,
//!     seconds: 0,
//! })?;
//!
//! if rtc.alarm_triggered(Alarm::One)? {
//!     rtc.clear_alarm_flag(Alarm::One)?;
//! }
//! ```

#![no_std]

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! debug {
    ($($arg:tt)*) => {
        defmt::debug!($($arg)*)
    };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(all(feature = "defmt", not(feature = "log")))]
macro_rules! error {
    ($($arg:tt)*) => {
        defmt::error!($($arg)*)
    };
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! error {
    ($($arg:tt)*) => {};
}

pub mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
pub mod datetime;
pub mod registers;

pub use alarm::{Alarm, Alarm1Config, Alarm2Config, AlarmError, DS3231Alarm1, DS3231Alarm2};
pub use datetime::{DateTime, DateTimeError};
pub use registers::*;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

use crate::datetime::DS3231DateTime;

/// Factory-fixed I2C address of the DS3231.
pub const DEVICE_ADDRESS: u8 = 0x68;

/// Device configuration applied in one control-register update.
///
/// Covers the control bits that are set once at startup; the alarm
/// interrupt enables are managed by the alarm operations instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Whether the oscillator keeps running on battery power (EOSC)
    pub oscillator_enable: Oscillator,
    /// Whether the square wave output keeps running on battery power (BBSQW)
    pub battery_backed_square_wave: bool,
    /// Square wave output frequency (rate select bits)
    pub square_wave_frequency: SquareWaveFrequency,
    /// Output pin mode: square wave or alarm interrupt (INTCN)
    pub interrupt_control: InterruptControl,
}

/// Error type for DS3231 operations.
#[derive(Debug)]
pub enum DS3231Error<I2CE> {
    /// I2C bus error
    I2c(I2CE),
    /// Date/time conversion error
    DateTime(DateTimeError),
    /// Alarm configuration error
    Alarm(AlarmError),
}

impl<I2CE> From<I2CE> for DS3231Error<I2CE> {
    fn from(e: I2CE) -> Self {
        DS3231Error::I2c(e)
    }
}

/// DS3231 Real-Time Clock driver.
///
/// This struct provides the blocking interface to the DS3231 RTC device.
/// It owns the I2C bus handle it is given and performs no locking or
/// retries; read-modify-write sequences assume a single bus master.
pub struct DS3231<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> DS3231<I2C> {
    /// Creates a new DS3231 driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`DEVICE_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Reads a single register.
    ///
    /// One `write_read` transaction: register pointer write, repeated
    /// start, one byte read.
    ///
    /// # Errors
    ///
    /// Returns `DS3231Error::I2c` if the transfer fails.
    pub fn read_register(&mut self, reg: RegAddr) -> Result<u8, DS3231Error<I2C::Error>> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)?;
        Ok(data[0])
    }

    /// Writes a single register.
    ///
    /// # Errors
    ///
    /// Returns `DS3231Error::I2c` if the transfer fails.
    pub fn write_register(
        &mut self,
        reg: RegAddr,
        value: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg as u8, value])?;
        Ok(())
    }

    /// Read-modify-writes a single register.
    ///
    /// The new value is `(old & !clear_mask) | set_bits`. Exactly one read
    /// and one write are performed; the write is skipped when the read
    /// fails. The sequence is not atomic on the bus.
    ///
    /// # Errors
    ///
    /// Returns `DS3231Error::I2c` if either transfer fails.
    pub fn update_register_bits(
        &mut self,
        reg: RegAddr,
        clear_mask: u8,
        set_bits: u8,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let value = self.read_register(reg)?;
        self.write_register(reg, (value & !clear_mask) | set_bits)
    }

    /// Reads `N` consecutive registers starting at `reg` in one transaction.
    fn read_register_block<const N: usize>(
        &mut self,
        reg: RegAddr,
    ) -> Result<[u8; N], DS3231Error<I2C::Error>> {
        let mut data = [0; N];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut data)?;
        Ok(data)
    }

    /// Writes consecutive registers starting at `reg` in one transaction.
    fn write_register_block(
        &mut self,
        reg: RegAddr,
        data: &[u8],
    ) -> Result<(), DS3231Error<I2C::Error>> {
        // Largest transfer is the 7-byte time block plus the register pointer.
        let mut buf = [0u8; 8];
        buf[0] = reg as u8;
        buf[1..=data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &buf[..=data.len()])?;
        Ok(())
    }

    /// Reads the raw datetime registers from the device.
    fn read_raw_datetime(&mut self) -> Result<DS3231DateTime, DS3231Error<I2C::Error>> {
        let data: [u8; 7] = self.read_register_block(RegAddr::Seconds)?;
        Ok(data.into())
    }

    /// Writes raw datetime values to the device registers.
    fn write_raw_datetime(
        &mut self,
        datetime: &DS3231DateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let data: [u8; 7] = datetime.into();
        self.write_register_block(RegAddr::Seconds, &data)
    }

    /// Gets the current time and date as a [`DateTime`] record.
    ///
    /// One 7-byte block read; the BCD registers are decoded structurally,
    /// so the call fails exactly when the transfer fails.
    ///
    /// # Returns
    /// * `Ok(DateTime)` - The current time and date
    /// * `Err(DS3231Error)` on error
    pub fn read_time(&mut self) -> Result<DateTime, DS3231Error<I2C::Error>> {
        let raw = self.read_raw_datetime()?;
        Ok(raw.into_record())
    }

    /// Sets the time and date from a [`DateTime`] record.
    ///
    /// The record is encoded to BCD and written as one 8-byte transaction
    /// (register pointer plus 7 data bytes), so the device's shadow-buffer
    /// coherency guarantees apply.
    ///
    /// # Arguments
    /// * `time` - The time and date to set
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error, including out-of-range fields
    pub fn set_time(&mut self, time: &DateTime) -> Result<(), DS3231Error<I2C::Error>> {
        let raw = DS3231DateTime::from_record(time).map_err(DS3231Error::DateTime)?;
        self.write_raw_datetime(&raw)
    }

    /// Gets the current date and time as a `chrono` value.
    ///
    /// # Returns
    /// * `Ok(NaiveDateTime)` - The current date and time
    /// * `Err(DS3231Error)` on error, including register contents that do
    ///   not form a real calendar date
    pub fn datetime(&mut self) -> Result<NaiveDateTime, DS3231Error<I2C::Error>> {
        let record = self.read_time()?;
        NaiveDateTime::try_from(record).map_err(DS3231Error::DateTime)
    }

    /// Sets the current date and time from a `chrono` value.
    ///
    /// # Arguments
    /// * `datetime` - The date and time to set; the year must fall in
    ///   2000 through 2099
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        let record = DateTime::try_from(*datetime).map_err(DS3231Error::DateTime)?;
        self.set_time(&record)
    }

    /// Configures Alarm 1 and enables its interrupt.
    ///
    /// Writes the 4-byte alarm block in one transaction, then sets A1IE and
    /// INTCN in the control register so the INT/SQW pin asserts on a match.
    /// If the control update fails the alarm block stays written; the call
    /// is idempotent and safe to retry.
    ///
    /// # Arguments
    /// * `config` - The alarm configuration to apply
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error, including invalid configurations
    pub fn set_alarm1(&mut self, config: &Alarm1Config) -> Result<(), DS3231Error<I2C::Error>> {
        let alarm = DS3231Alarm1::from_config(config).map_err(DS3231Error::Alarm)?;
        let data: [u8; 4] = (&alarm).into();
        debug!("alarm1: {:?}", data);
        self.write_register_block(RegAddr::Alarm1Seconds, &data)?;
        self.update_register_bits(
            RegAddr::Control,
            0,
            Control::ALARM1_INTERRUPT_ENABLE | Control::INTERRUPT_CONTROL,
        )
    }

    /// Configures Alarm 2 and enables its interrupt.
    ///
    /// Writes the 3-byte alarm block in one transaction, then sets A2IE and
    /// INTCN in the control register so the INT/SQW pin asserts on a match.
    ///
    /// # Arguments
    /// * `config` - The alarm configuration to apply
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error, including invalid configurations
    pub fn set_alarm2(&mut self, config: &Alarm2Config) -> Result<(), DS3231Error<I2C::Error>> {
        let alarm = DS3231Alarm2::from_config(config).map_err(DS3231Error::Alarm)?;
        let data: [u8; 3] = (&alarm).into();
        debug!("alarm2: {:?}", data);
        self.write_register_block(RegAddr::Alarm2Minutes, &data)?;
        self.update_register_bits(
            RegAddr::Control,
            0,
            Control::ALARM2_INTERRUPT_ENABLE | Control::INTERRUPT_CONTROL,
        )
    }

    /// Reads back the Alarm 1 configuration from the device.
    ///
    /// # Returns
    /// * `Ok(Alarm1Config)` - The configuration currently in the registers
    /// * `Err(DS3231Error)` on error, including register contents that do
    ///   not form a recognized configuration
    pub fn alarm1(&mut self) -> Result<Alarm1Config, DS3231Error<I2C::Error>> {
        let data: [u8; 4] = self.read_register_block(RegAddr::Alarm1Seconds)?;
        DS3231Alarm1::from(data)
            .to_config()
            .map_err(DS3231Error::Alarm)
    }

    /// Reads back the Alarm 2 configuration from the device.
    ///
    /// # Returns
    /// * `Ok(Alarm2Config)` - The configuration currently in the registers
    /// * `Err(DS3231Error)` on error, including register contents that do
    ///   not form a recognized configuration
    pub fn alarm2(&mut self) -> Result<Alarm2Config, DS3231Error<I2C::Error>> {
        let data: [u8; 3] = self.read_register_block(RegAddr::Alarm2Minutes)?;
        DS3231Alarm2::from(data)
            .to_config()
            .map_err(DS3231Error::Alarm)
    }

    /// Checks whether the given alarm has triggered.
    ///
    /// Reads the status register and returns the channel's flag. A failed
    /// read is reported as an error, never as a clear flag.
    ///
    /// # Returns
    /// * `Ok(true)` - The alarm flag is set
    /// * `Ok(false)` - The alarm flag is clear
    /// * `Err(DS3231Error)` on error
    pub fn alarm_triggered(&mut self, alarm: Alarm) -> Result<bool, DS3231Error<I2C::Error>> {
        let status = self.status()?;
        Ok(match alarm {
            Alarm::One => status.alarm1_flag(),
            Alarm::Two => status.alarm2_flag(),
        })
    }

    /// Clears the given alarm's triggered flag.
    ///
    /// Only that channel's flag bit is cleared; the other flag and the
    /// remaining status bits are preserved.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn clear_alarm_flag(&mut self, alarm: Alarm) -> Result<(), DS3231Error<I2C::Error>> {
        let flag = match alarm {
            Alarm::One => Status::ALARM1_FLAG,
            Alarm::Two => Status::ALARM2_FLAG,
        };
        self.update_register_bits(RegAddr::ControlStatus, flag, 0)
    }

    /// Disables the given alarm's interrupt.
    ///
    /// Clears that channel's interrupt enable bit; the alarm registers and
    /// the other channel are untouched.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn disable_alarm(&mut self, alarm: Alarm) -> Result<(), DS3231Error<I2C::Error>> {
        let enable = match alarm {
            Alarm::One => Control::ALARM1_INTERRUPT_ENABLE,
            Alarm::Two => Control::ALARM2_INTERRUPT_ENABLE,
        };
        self.update_register_bits(RegAddr::Control, enable, 0)
    }

    /// Enables or disables the 32 kHz output pin.
    ///
    /// # Arguments
    /// * `enable` - `true` to drive the pin, `false` to leave it high impedance
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn enable_32khz_output(&mut self, enable: bool) -> Result<(), DS3231Error<I2C::Error>> {
        let set_bits = if enable { Status::ENABLE_32KHZ_OUTPUT } else { 0 };
        self.update_register_bits(RegAddr::ControlStatus, Status::ENABLE_32KHZ_OUTPUT, set_bits)
    }

    /// Switches the INT/SQW pin to square wave output at the given frequency.
    ///
    /// Clears INTCN and the rate select field, then sets the requested
    /// rate. The alarm interrupt enable bits are untouched, so switching
    /// back with [`DS3231::enable_interrupt_mode`] re-arms the alarms.
    ///
    /// # Arguments
    /// * `frequency` - The square wave frequency to output
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn enable_square_wave_output(
        &mut self,
        frequency: SquareWaveFrequency,
    ) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register_bits(
            RegAddr::Control,
            Control::INTERRUPT_CONTROL | Control::RATE_SELECT,
            u8::from(frequency) << Control::RATE_SELECT_SHIFT,
        )
    }

    /// Switches the INT/SQW pin to alarm interrupt mode.
    ///
    /// Sets INTCN; square wave output stops. The two output modes are
    /// mutually exclusive by construction.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn enable_interrupt_mode(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register_bits(RegAddr::Control, 0, Control::INTERRUPT_CONTROL)
    }

    /// Checks the oscillator stop flag.
    ///
    /// A set flag means the oscillator stopped at some point (first power
    /// up, battery exhausted) and the time may be invalid.
    ///
    /// # Returns
    /// * `Ok(true)` - The oscillator has stopped since the flag was last cleared
    /// * `Ok(false)` - The oscillator ran continuously
    /// * `Err(DS3231Error)` on error
    pub fn oscillator_stop_flag(&mut self) -> Result<bool, DS3231Error<I2C::Error>> {
        Ok(self.status()?.oscillator_stop_flag())
    }

    /// Clears the oscillator stop flag, preserving the other status bits.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn clear_oscillator_stop_flag(&mut self) -> Result<(), DS3231Error<I2C::Error>> {
        self.update_register_bits(RegAddr::ControlStatus, Status::OSCILLATOR_STOP_FLAG, 0)
    }

    /// Configures the device according to the provided configuration.
    ///
    /// One control-register read-modify-write; the alarm interrupt enable
    /// bits are preserved.
    ///
    /// # Arguments
    /// * `config` - The configuration to apply
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(DS3231Error)` on error
    pub fn configure(&mut self, config: &Config) -> Result<(), DS3231Error<I2C::Error>> {
        let mut control = self.control()?;
        control.set_oscillator_enable(config.oscillator_enable);
        control.set_battery_backed_square_wave(config.battery_backed_square_wave);
        control.set_square_wave_frequency(config.square_wave_frequency);
        control.set_interrupt_control(config.interrupt_control);
        debug!("control: {:?}", control);
        self.set_control(control)
    }

    /// Gets the die temperature in degrees Celsius.
    ///
    /// Combines the integer and fractional temperature registers into a
    /// quarter-degree resolution reading. The value is updated by the
    /// device every 64 seconds.
    ///
    /// # Returns
    /// * `Ok(f32)` - The temperature in degrees Celsius
    /// * `Err(DS3231Error)` on error
    #[cfg(feature = "temperature_f32")]
    pub fn temperature_celsius(&mut self) -> Result<f32, DS3231Error<I2C::Error>> {
        let msb = self.temperature()?;
        let lsb = self.temperature_fraction()?;
        // 10-bit two's complement value in quarter degrees
        let raw = (i16::from(msb.temperature()) << 2) | i16::from(lsb.temperature_fraction());
        Ok(f32::from(raw) * 0.25)
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> DS3231<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Returns"]
                    #[doc = concat!("* `Ok(", stringify!($typ), ")` - The register value on success")]
                    #[doc = "* `Err(DS3231Error)` on error"]
                    pub fn $name(&mut self) -> Result<$typ, DS3231Error<I2C::Error>> {
                        Ok(<$typ>::from(self.read_register($regaddr)?))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Arguments"]
                    #[doc = concat!("* `value` - The value to write to the ", stringify!($name), " register")]
                    #[doc = "\n\n# Returns"]
                    #[doc = "* `Ok(())` on success"]
                    #[doc = "* `Err(DS3231Error)` on error"]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), DS3231Error<I2C::Error>> {
                        self.write_register($regaddr, value.into())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (second, RegAddr::Seconds, Seconds),
    (minute, RegAddr::Minutes, Minutes),
    (hour, RegAddr::Hours, Hours),
    (day, RegAddr::Day, Day),
    (date, RegAddr::Date, Date),
    (month, RegAddr::Month, Month),
    (year, RegAddr::Year, Year),
    (alarm1_second, RegAddr::Alarm1Seconds, AlarmSeconds),
    (alarm1_minute, RegAddr::Alarm1Minutes, AlarmMinutes),
    (alarm1_hour, RegAddr::Alarm1Hours, AlarmHours),
    (alarm1_day_date, RegAddr::Alarm1DayDate, AlarmDayDate),
    (alarm2_minute, RegAddr::Alarm2Minutes, AlarmMinutes),
    (alarm2_hour, RegAddr::Alarm2Hours, AlarmHours),
    (alarm2_day_date, RegAddr::Alarm2DayDate, AlarmDayDate),
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status),
    (aging_offset, RegAddr::AgingOffset, AgingOffset),
    (temperature, RegAddr::MSBTemp, Temperature),
    (temperature_fraction, RegAddr::LSBTemp, TemperatureFraction)
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use chrono::{Datelike, NaiveDate, Timelike};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    #[test]
    fn test_raw_register_access() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x88]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x00]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert_eq!(dev.read_register(RegAddr::ControlStatus).unwrap(), 0x88);
        dev.write_register(RegAddr::ControlStatus, 0x00).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_update_register_bits() {
        // (0xF0 & !0x30) | 0x03 = 0xC3, one read and one write
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0xF0]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0xC3]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.update_register_bits(RegAddr::Control, 0x30, 0x03)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_update_register_bits_skips_write_on_read_failure() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Control as u8],
            vec![0],
        )
        .with_error(ErrorKind::Other)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.update_register_bits(RegAddr::Control, 0xFF, 0x00),
            Err(DS3231Error::I2c(_))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_register_accessors() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8], vec![0x45]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Seconds as u8, 0x30]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::AgingOffset as u8], vec![0xFE]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let seconds = dev.second().unwrap();
        assert_eq!(seconds.ten_seconds(), 4);
        assert_eq!(seconds.seconds(), 5);
        dev.set_second(Seconds(0x30)).unwrap();

        assert_eq!(dev.aging_offset().unwrap().aging_offset(), -2);
        dev.i2c.done();
    }

    #[test]
    fn test_set_time_writes_bcd_block() {
        let time = DateTime {
            year: 25,
            month: 10,
            day: 12,
            day_of_week: 1,
            hour: 14,
            minute: 30,
            second: 0,
        };

        // Register pointer followed by the 7 BCD bytes in one transaction
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Seconds as u8,
                0x00,
                0x30,
                0x14,
                0x01,
                0x12,
                0x10,
                0x25,
            ],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_time(&time).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_read_time_decodes_bcd_block() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x14, 0x01, 0x12, 0x10, 0x25],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let time = dev.read_time().unwrap();
        assert_eq!(
            time,
            DateTime {
                year: 25,
                month: 10,
                day: 12,
                day_of_week: 1,
                hour: 14,
                minute: 30,
                second: 0,
            }
        );
        dev.i2c.done();
    }

    #[test]
    fn test_read_time_masks_century_bit() {
        // Month register 0x92: century bit set on top of BCD 12
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x14, 0x01, 0x12, 0x92, 0x25],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let time = dev.read_time().unwrap();
        assert_eq!(time.month, 12);
        dev.i2c.done();
    }

    #[test]
    fn test_set_time_rejects_out_of_range_without_bus_traffic() {
        let mock = I2cMock::new(&[]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let time = DateTime {
            year: 25,
            month: 10,
            day: 12,
            day_of_week: 1,
            hour: 14,
            minute: 30,
            second: 60,
        };
        assert!(matches!(
            dev.set_time(&time),
            Err(DS3231Error::DateTime(DateTimeError::InvalidDateTime))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_datetime() {
        // 2024-03-14 15:30:00, a Thursday (day register 5, 1 = Sunday)
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x15, 0x05, 0x14, 0x03, 0x24],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        let dt = dev.datetime().unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 3);
        assert_eq!(dt.day(), 14);
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.second(), 0);
        dev.i2c.done();
    }

    #[test]
    fn test_set_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();

        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![
                RegAddr::Seconds as u8,
                0x00,
                0x30,
                0x15,
                0x05,
                0x14,
                0x03,
                0x24,
            ],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_datetime(&dt).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_datetime_rejects_impossible_date() {
        // Structurally valid BCD for February 30th
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x15, 0x05, 0x30, 0x02, 0x24],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.datetime(),
            Err(DS3231Error::DateTime(DateTimeError::InvalidDateTime))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm1_writes_block_then_enables_interrupt() {
        let mock = I2cMock::new(&[
            // Alarm 1 block at 0x07: seconds match, everything else masked
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::Alarm1Seconds as u8, 0x30, 0x80, 0x80, 0x80],
            ),
            // Control RMW sets A1IE | INTCN
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x05]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarm1(&Alarm1Config::AtSeconds { seconds: 30 })
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm2_writes_block_then_enables_interrupt() {
        let mock = I2cMock::new(&[
            // Alarm 2 block at 0x0B
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::Alarm2Minutes as u8, 0x30, 0x14, 0x80],
            ),
            // Control RMW sets A2IE | INTCN
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x00]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x06]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarm2(&Alarm2Config::AtTime {
            hours: 14,
            minutes: 30,
        })
        .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm1_preserves_other_control_bits() {
        let mock = I2cMock::new(&[
            I2cTrans::write(
                DEVICE_ADDRESS,
                vec![RegAddr::Alarm1Seconds as u8, 0x80, 0x80, 0x80, 0x80],
            ),
            // BBSQW and A2IE survive the RMW
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x42]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x47]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.set_alarm1(&Alarm1Config::EverySecond).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_stops_after_block_write_failure() {
        // No control transactions expected after the failed block write
        let mock = I2cMock::new(&[I2cTrans::write(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm1Seconds as u8, 0x30, 0x80, 0x80, 0x80],
        )
        .with_error(ErrorKind::Other)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.set_alarm1(&Alarm1Config::AtSeconds { seconds: 30 }),
            Err(DS3231Error::I2c(_))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_set_alarm_rejects_invalid_config_without_bus_traffic() {
        let mock = I2cMock::new(&[]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.set_alarm1(&Alarm1Config::AtSeconds { seconds: 60 }),
            Err(DS3231Error::Alarm(_))
        ));
        assert!(matches!(
            dev.set_alarm2(&Alarm2Config::AtMinutes { minutes: 60 }),
            Err(DS3231Error::Alarm(_))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_alarm1_readback() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm1Seconds as u8],
            vec![0x30, 0x80, 0x80, 0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert_eq!(
            dev.alarm1().unwrap(),
            Alarm1Config::AtSeconds { seconds: 30 }
        );
        dev.i2c.done();
    }

    #[test]
    fn test_alarm2_readback() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm2Minutes as u8],
            vec![0x30, 0x14, 0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert_eq!(
            dev.alarm2().unwrap(),
            Alarm2Config::AtTime {
                hours: 14,
                minutes: 30,
            }
        );
        dev.i2c.done();
    }

    #[test]
    fn test_alarm1_readback_rejects_unrecognized_pattern() {
        // Seconds masked while minutes match is not a device mode
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Alarm1Seconds as u8],
            vec![0x80, 0x45, 0x80, 0x80],
        )]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(dev.alarm1(), Err(DS3231Error::Alarm(_))));
        dev.i2c.done();
    }

    #[test]
    fn test_alarm_triggered() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x01]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x02]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(dev.alarm_triggered(Alarm::One).unwrap());
        assert!(!dev.alarm_triggered(Alarm::Two).unwrap());
        assert!(dev.alarm_triggered(Alarm::Two).unwrap());
        dev.i2c.done();
    }

    #[test]
    fn test_alarm_triggered_read_failure_is_an_error() {
        let mock = I2cMock::new(&[I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::ControlStatus as u8],
            vec![0],
        )
        .with_error(ErrorKind::Other)]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(matches!(
            dev.alarm_triggered(Alarm::One),
            Err(DS3231Error::I2c(_))
        ));
        dev.i2c.done();
    }

    #[test]
    fn test_clear_alarm_flag_is_selective() {
        let mock = I2cMock::new(&[
            // Both flags set; clearing alarm 1 leaves alarm 2 pending
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x03]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x02]),
            // OSF set as well; clearing alarm 2 preserves it
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x83]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x81]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.clear_alarm_flag(Alarm::One).unwrap();
        dev.clear_alarm_flag(Alarm::Two).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_disable_alarm() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x07]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x06]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x07]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x05]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.disable_alarm(Alarm::One).unwrap();
        dev.disable_alarm(Alarm::Two).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_enable_32khz_output() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x80]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x88]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x88]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x80]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_32khz_output(true).unwrap();
        dev.enable_32khz_output(false).unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_enable_square_wave_output_clears_interrupt_mode() {
        // Control starts with INTCN, both rate bits, and both alarm enables
        // set; Hz1 clears INTCN and the rate field, preserving the enables.
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x1F]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x03]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_square_wave_output(SquareWaveFrequency::Hz1)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_enable_square_wave_output_sets_rate_bits() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x04]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x10]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_square_wave_output(SquareWaveFrequency::Hz4096)
            .unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_enable_interrupt_mode_preserves_rate_bits() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x18]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0x1C]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.enable_interrupt_mode().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_oscillator_stop_flag() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x80]),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x00]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        assert!(dev.oscillator_stop_flag().unwrap());
        assert!(!dev.oscillator_stop_flag().unwrap());
        dev.i2c.done();
    }

    #[test]
    fn test_clear_oscillator_stop_flag_preserves_alarm_flags() {
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8], vec![0x83]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::ControlStatus as u8, 0x03]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.clear_oscillator_stop_flag().unwrap();
        dev.i2c.done();
    }

    #[test]
    fn test_configure() {
        let config = Config {
            oscillator_enable: Oscillator::Disabled,
            battery_backed_square_wave: true,
            square_wave_frequency: SquareWaveFrequency::Hz8192,
            interrupt_control: InterruptControl::Interrupt,
        };

        // EOSC | BBSQW | rate 0b11 | INTCN on top of the preserved alarm enables
        let mock = I2cMock::new(&[
            I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::Control as u8], vec![0x03]),
            I2cTrans::write(DEVICE_ADDRESS, vec![RegAddr::Control as u8, 0xDF]),
        ]);
        let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

        dev.configure(&config).unwrap();
        dev.i2c.done();
    }

    #[cfg(feature = "temperature_f32")]
    mod temperature {
        use super::*;

        #[test]
        fn test_temperature_celsius() {
            // 25°C integer part, fraction bits 0b01 = 0.25°C
            let mock = I2cMock::new(&[
                I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::MSBTemp as u8], vec![0x19]),
                I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::LSBTemp as u8], vec![0x40]),
            ]);
            let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

            assert_eq!(dev.temperature_celsius().unwrap(), 25.25);
            dev.i2c.done();
        }

        #[test]
        fn test_temperature_celsius_negative() {
            // MSB 0xE7 is -25; with fraction 0b01 the 10-bit value is -99
            let mock = I2cMock::new(&[
                I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::MSBTemp as u8], vec![0xE7]),
                I2cTrans::write_read(DEVICE_ADDRESS, vec![RegAddr::LSBTemp as u8], vec![0x40]),
            ]);
            let mut dev = DS3231::new(mock, DEVICE_ADDRESS);

            assert_eq!(dev.temperature_celsius().unwrap(), -24.75);
            dev.i2c.done();
        }
    }
}
