//! Conversions between UTC instants and the user's local wall clock.
//!
//! Offsets follow the browser convention: `local = UTC - offset_minutes`,
//! so a user in UTC+2 sends `-120`.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// Wall-clock time of `instant` for the given offset, saturating at chrono's range.
pub fn to_local(instant: DateTime<Utc>, offset_minutes: i32) -> NaiveDateTime {
    shift(instant.naive_utc(), -i64::from(offset_minutes))
}

/// Absolute instant for a local wall-clock time.
pub fn from_local(local: NaiveDateTime, offset_minutes: i32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&shift(local, i64::from(offset_minutes)))
}

fn shift(naive: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    naive
        .checked_add_signed(Duration::minutes(minutes))
        .unwrap_or(if minutes < 0 { NaiveDateTime::MIN } else { NaiveDateTime::MAX })
}

/// Instant of `hour:minute` local time on `date`. Out-of-range values are clamped.
pub fn local_at(date: NaiveDate, hour: u32, minute: u32, offset_minutes: i32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or(NaiveTime::MIN);
    from_local(date.and_time(time), offset_minutes)
}

pub fn local_hour(instant: DateTime<Utc>, offset_minutes: i32) -> u32 {
    to_local(instant, offset_minutes).hour()
}

pub fn local_date(instant: DateTime<Utc>, offset_minutes: i32) -> NaiveDate {
    to_local(instant, offset_minutes).date()
}

/// The calendar day after `date` (saturating at chrono's max date).
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// First local 5-minute boundary strictly after `instant`.
pub fn next_five_minute_boundary(instant: DateTime<Utc>, offset_minutes: i32) -> NaiveDateTime {
    let local = to_local(instant, offset_minutes);
    let minutes_into_day = i64::from(local.hour() * 60 + local.minute());
    let boundary = (minutes_into_day / 5 + 1) * 5;
    shift(local.date().and_time(NaiveTime::MIN), boundary)
}

/// `HH:MM` in local time.
pub fn format_local(instant: DateTime<Utc>, offset_minutes: i32) -> String {
    to_local(instant, offset_minutes).format("%H:%M").to_string()
}

/// `YYYY-MM-DD HH:MM` in local time.
pub fn format_local_datetime(instant: DateTime<Utc>, offset_minutes: i32) -> String {
    to_local(instant, offset_minutes).format("%Y-%m-%d %H:%M").to_string()
}

/// Whether `instant` falls on `date` in local time.
pub fn is_local_date(instant: DateTime<Utc>, date: NaiveDate, offset_minutes: i32) -> bool {
    local_date(instant, offset_minutes) == date
}
