use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Timelike, Utc};

/// Trait for providing the current date/time to the storage layer and CLI.
/// The analytics core never reads the clock itself; callers pass "now" in.
pub trait DateProvider: Send + Sync {
    /// Get the current date/time
    fn get_current_time(&self) -> DateTime<Utc>;
}

/// Default date provider that uses the system's current date/time
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Date provider that uses an overridden date instead of system time
/// Preserves the current hours/minutes/seconds from system time, read at
/// the given offset so the local calendar day is always the override date
pub struct OverrideDateProvider {
    override_date: NaiveDate,
    offset: FixedOffset,
}

impl OverrideDateProvider {
    /// Create a new override date provider with a specific date, in UTC
    pub fn new(override_date: NaiveDate) -> Self {
        Self::with_offset(override_date, Utc.fix())
    }

    pub fn with_offset(override_date: NaiveDate, offset: FixedOffset) -> Self {
        Self {
            override_date,
            offset,
        }
    }
}

impl DateProvider for OverrideDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        let now = Utc::now().with_timezone(&self.offset);
        let time_of_day = NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second())
            .unwrap_or(NaiveTime::MIN);
        let local = self.override_date.and_time(time_of_day);
        let utc = local - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        utc.and_utc()
    }
}

/// Date provider frozen at one instant
pub struct FixedDateProvider {
    instant: DateTime<Utc>,
}

impl FixedDateProvider {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl DateProvider for FixedDateProvider {
    fn get_current_time(&self) -> DateTime<Utc> {
        self.instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_date_provider_returns_current_time() {
        let provider = SystemDateProvider;
        let time1 = provider.get_current_time();
        let time2 = provider.get_current_time();

        // Times should be very close (within a second)
        assert!((time2 - time1).num_seconds() <= 1);
    }

    #[test]
    fn test_override_date_provider_uses_override_date() {
        let override_date = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        let provider = OverrideDateProvider::new(override_date);
        let time = provider.get_current_time();

        assert_eq!(time.format("%Y-%m-%d").to_string(), "2025-11-18");
    }

    #[test]
    fn test_override_date_provider_preserves_time_of_day() {
        let override_date = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        let provider = OverrideDateProvider::new(override_date);
        let before = Utc::now().num_seconds_from_midnight();
        let time = provider.get_current_time().num_seconds_from_midnight();
        let after = Utc::now().num_seconds_from_midnight();

        // Tolerate the clock rolling over midnight between the reads
        assert!((before <= time && time <= after) || after < before);
    }

    #[test]
    fn test_override_date_is_local_to_offset() {
        let override_date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        for hours in [-11, -3, 0, 5, 14] {
            let offset = FixedOffset::east_opt(hours * 3600 + 30 * 60).unwrap();
            let provider = OverrideDateProvider::with_offset(override_date, offset);
            let local = provider.get_current_time().with_timezone(&offset);
            assert_eq!(local.date_naive(), override_date);
        }
    }

    #[test]
    fn test_fixed_date_provider_never_moves() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap();
        let provider = FixedDateProvider::new(instant);
        assert_eq!(provider.get_current_time(), instant);
        assert_eq!(provider.get_current_time(), instant);
    }
}
