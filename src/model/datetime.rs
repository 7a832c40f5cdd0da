//! Calendar timestamps as kept by the node's real-time clock

use super::Error;
use core::fmt::{self, Write as _};
use heapless::String;
use serde::{Serialize, Serializer};

/// Capacity of the ISO-8601 rendering, wide enough for any field values.
pub const ISO8601_CAPACITY: usize = 32;

const SECONDS_PER_DAY: u64 = 86_400;
const MAX_YEAR: u16 = 9999;
const UNIX_EPOCH_YEAR: u16 = 1970;

/// A UTC wall-clock reading.
///
/// The record mirrors an RTC register dump: the broken-down fields plus the
/// values derived from them (`dsec`, `dow`, `doy`). Fields are public so a
/// driver can fill them straight from hardware; [`DateTime::new`] and
/// [`DateTime::from_unix_timestamp`] compute the derived fields for you.
///
/// A hand-filled record may hold out-of-range fields. [`Display`](fmt::Display)
/// renders such fields verbatim, while serialization emits `null` for any
/// record [`is_valid`](Self::is_valid) rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Seconds (0-59)
    pub sec: u8,
    /// Seconds since midnight (0-86399)
    pub dsec: u32,
    /// Minutes (0-59)
    pub min: u8,
    /// Hours (0-23)
    pub hour: u8,
    /// Day of week, 0 = Sunday
    pub dow: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Four digit year
    pub year: u16,
    /// Opaque RTC control byte, carried through untouched
    pub config: u8,
    /// Day of year (1-366), plain binary
    pub doy: u16,
}

impl DateTime {
    /// 1970-01-01T00:00:00Z
    pub const UNIX_EPOCH: Self = Self {
        sec: 0,
        dsec: 0,
        min: 0,
        hour: 0,
        dow: 4,
        day: 1,
        month: 1,
        year: UNIX_EPOCH_YEAR,
        config: 0,
        doy: 1,
    };

    /// Build a timestamp from calendar fields, deriving the rest.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDateTime`] if any field is out of range or the year
    /// is outside 1970-9999.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, min: u8, sec: u8) -> Result<Self, Error> {
        if !(UNIX_EPOCH_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || min > 59
            || sec > 59
        {
            return Err(Error::InvalidDateTime);
        }

        let days = days_from_civil(year as i64, month as i64, day as i64);
        Ok(Self {
            sec,
            dsec: hour as u32 * 3600 + min as u32 * 60 + sec as u32,
            min,
            hour,
            dow: weekday(days),
            day,
            month,
            year,
            config: 0,
            doy: day_of_year(year, month, day),
        })
    }

    /// Convert seconds since the Unix epoch.
    pub fn from_unix_timestamp(timestamp: u64) -> Result<Self, Error> {
        let days = (timestamp / SECONDS_PER_DAY) as i64;
        let dsec = (timestamp % SECONDS_PER_DAY) as u32;
        let (year, month, day) = civil_from_days(days);
        if year > MAX_YEAR as i64 {
            return Err(Error::InvalidDateTime);
        }

        Self::new(
            year as u16,
            month as u8,
            day as u8,
            (dsec / 3600) as u8,
            (dsec / 60 % 60) as u8,
            (dsec % 60) as u8,
        )
    }

    /// Seconds since the Unix epoch.
    ///
    /// Uses the broken-down fields; `dsec`, `dow` and `doy` are ignored.
    pub fn to_unix_timestamp(&self) -> Result<u64, Error> {
        let checked = Self::new(self.year, self.month, self.day, self.hour, self.min, self.sec)?;
        let days = days_from_civil(checked.year as i64, checked.month as i64, checked.day as i64);
        Ok(days as u64 * SECONDS_PER_DAY + checked.dsec as u64)
    }

    /// Whether the broken-down fields form a date [`DateTime::new`] would accept.
    pub fn is_valid(&self) -> bool {
        Self::new(self.year, self.month, self.day, self.hour, self.min, self.sec).is_ok()
    }

    /// Same record with a different RTC control byte.
    pub fn with_config(self, config: u8) -> Self {
        Self { config, ..self }
    }

    /// Render as `YYYY-MM-DDThh:mm:ssZ`.
    pub fn to_iso8601(&self) -> String<ISO8601_CAPACITY> {
        let mut out = String::new();
        // Cannot overflow: widest possible field values fit the capacity.
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.min, self.sec
        )
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_valid() {
            serializer.serialize_str(&self.to_iso8601())
        } else {
            serializer.serialize_none()
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DateTime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=u16}-{=u8}-{=u8}T{=u8}:{=u8}:{=u8}Z",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.min,
            self.sec
        )
    }
}

/// Whether `year` is a Gregorian leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`, or 0 for an invalid month.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn day_of_year(year: u16, month: u8, day: u8) -> u16 {
    (1..month).map(|m| days_in_month(year, m) as u16).sum::<u16>() + day as u16
}

fn weekday(days_since_epoch: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    (days_since_epoch + 4).rem_euclid(7) as u8
}

// Howard Hinnant's days_from_civil / civil_from_days,
// http://howardhinnant.github.io/date_algorithms.html
// Days since 1970-01-01 in the proleptic Gregorian calendar.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}
