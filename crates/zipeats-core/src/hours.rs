//! Open-now evaluation from weekly opening periods.
//!
//! Times are HHMM integers (`930` is 09:30). Days follow the provider
//! convention: `0` is Sunday through `6` Saturday.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Implicit closing time for a period with no `close` entry.
pub const END_OF_DAY: u16 = 2359;

/// One weekly opening window as reported by the places provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub day_of_week: u8,
    pub open_time: u16,
    pub close_time: Option<u16>,
}

/// Parses an HHMM string such as `"0900"` or `"2330"`.
///
/// Returns `None` for anything that is not 1-4 ASCII digits forming a valid
/// 24-hour time (`2400` is accepted as end of day).
#[must_use]
pub fn parse_hhmm(raw: &str) -> Option<u16> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u16 = raw.parse().ok()?;
    let (hours, minutes) = (value / 100, value % 100);
    if minutes > 59 || hours > 24 || (hours == 24 && minutes > 0) {
        return None;
    }
    Some(value)
}

/// Reports whether a place is open at `now`, evaluated in `now`'s time zone.
///
/// - `None` when no periods are known.
/// - `Some(false)` when no period starts on today's weekday.
/// - Otherwise compares `now` against today's first period as the half-open
///   range `[open, close)`. A close earlier than the open means the window
///   runs past midnight.
///
/// Only the first period for the day is considered; split shifts are not
/// modelled.
#[must_use]
pub fn is_open_now<Tz: TimeZone>(periods: &[OpeningPeriod], now: &DateTime<Tz>) -> Option<bool> {
    if periods.is_empty() {
        return None;
    }

    let today = u8::try_from(now.weekday().num_days_from_sunday()).unwrap_or(u8::MAX);
    let Some(period) = periods.iter().find(|p| p.day_of_week == today) else {
        return Some(false);
    };

    let current = u16::try_from(now.hour() * 100 + now.minute()).unwrap_or(u16::MAX);
    let open = period.open_time;
    let close = period.close_time.unwrap_or(END_OF_DAY);

    if close < open {
        Some(current >= open || current < close)
    } else {
        Some(open <= current && current < close)
    }
}
