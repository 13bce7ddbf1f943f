use crate::analytics::snapshot::DailyCount;
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Offset, Utc};

/// Maps instants onto civil calendar days for one fixed UTC offset.
///
/// The offset is always passed in explicitly; the process timezone is never
/// consulted, so every caller with the same offset buckets identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucketer {
    offset: FixedOffset,
}

impl DayBucketer {
    pub fn new(offset: FixedOffset) -> Self {
        DayBucketer { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day the instant falls on at this offset
    pub fn day_key(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.day_key(now)
    }

    /// The last `days` calendar days ending today, oldest first, each with a
    /// zero count
    pub fn trailing_window(&self, days: usize, now: DateTime<Utc>) -> Vec<DailyCount> {
        let today = self.today(now);
        (0..days as u64)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| DailyCount { date, count: 0 })
            .collect()
    }

    /// Start of the Sunday-based week containing `now`
    pub fn week_start(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = self.today(now);
        let since_sunday = today.weekday().num_days_from_sunday() as u64;
        today
            .checked_sub_days(Days::new(since_sunday))
            .unwrap_or(today)
    }
}

impl Default for DayBucketer {
    fn default() -> Self {
        Self::utc()
    }
}
