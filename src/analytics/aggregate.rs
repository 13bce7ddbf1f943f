use crate::analytics::buckets::DayBucketer;
use crate::analytics::snapshot::{DailyCount, Tally};
use crate::records::{MistakeRecord, MistakeType, Subject};
use chrono::{DateTime, Duration, Utc};

pub fn subject_counts(records: &[MistakeRecord]) -> Tally<Subject> {
    records.iter().map(|record| record.subject).collect()
}

pub fn type_counts(records: &[MistakeRecord]) -> Tally<MistakeType> {
    records.iter().map(|record| record.mistake_type).collect()
}

/// Mistakes per day over the trailing window, oldest day first.
///
/// Records falling outside the window are ignored; days without records keep
/// their zero count.
pub fn daily_counts(
    records: &[MistakeRecord],
    bucketer: &DayBucketer,
    window_days: usize,
    now: DateTime<Utc>,
) -> Vec<DailyCount> {
    let mut days = bucketer.trailing_window(window_days, now);
    let Some(first) = days.first().map(|day| day.date) else {
        return days;
    };

    for record in records {
        let key = bucketer.day_key(record.created_at);
        let offset = (key - first).num_days();
        if offset < 0 {
            continue;
        }
        if let Some(slot) = days.get_mut(offset as usize) {
            slot.count += 1;
        }
    }

    days
}

/// Records created within the last `days` days, measured as an instant
/// span back from `now`
pub fn recent_count(records: &[MistakeRecord], days: i64, now: DateTime<Utc>) -> u32 {
    let cutoff = now - Duration::days(days);
    records
        .iter()
        .filter(|record| record.created_at >= cutoff)
        .count() as u32
}

pub fn top_mistake_type(type_counts: &Tally<MistakeType>) -> Option<MistakeType> {
    type_counts.most_frequent().copied()
}
