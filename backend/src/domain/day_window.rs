//! Calendar-day windows in the server's local time zone.
//!
//! Notification passes select events by the local calendar day they fall on.
//! Windows are half-open `[start, end)` and expressed in UTC so they can be
//! compared directly with stored event dates.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, TimeZone, Utc};

/// Source of "now" for notification passes
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A fixed instant, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Start of a local calendar day, as a UTC instant.
pub fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    midnight_in(&Local, date)
}

/// Start of `date` in `tz`.
///
/// When midnight doesn't exist (a DST gap) the first valid whole hour after
/// the gap is used; when it is ambiguous the earlier instant wins.
fn midnight_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // DST gaps are at most a few hours; walk forward an hour at a time
            (1..=3)
                .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
                .find_map(|later| tz.from_local_datetime(&later).earliest())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The local calendar day `offset_days` after the day containing `now`
    pub fn for_day_offset(now: DateTime<Local>, offset_days: u64) -> Self {
        let today = now.date_naive();
        let day = today.checked_add_days(Days::new(offset_days)).unwrap_or(today);
        let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
        Self {
            start: local_midnight(day),
            end: local_midnight(next),
        }
    }

    pub fn today(now: DateTime<Local>) -> Self {
        Self::for_day_offset(now, 0)
    }

    pub fn tomorrow(now: DateTime<Local>) -> Self {
        Self::for_day_offset(now, 1)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}
