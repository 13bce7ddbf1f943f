use crate::analytics::buckets::DayBucketer;
use crate::analytics::snapshot::GoalProgress;
use crate::records::{GoalRecord, MistakeRecord};
use chrono::{Days, NaiveDate};

/// Length of a goal window in days
pub const GOAL_WINDOW_DAYS: u64 = 7;

/// Pick the goal in force for the week starting on `week_start`.
///
/// Several goals may share a week; the most recently created one wins, and
/// among equal creation times the one appearing last.
pub fn select_goal(goals: &[GoalRecord], week_start: NaiveDate) -> Option<&GoalRecord> {
    goals
        .iter()
        .filter(|goal| goal.week_start_date == week_start)
        .max_by_key(|goal| goal.created_at)
}

/// Reviewed records whose review day lies inside the goal window
pub fn reviewed_in_window(
    records: &[MistakeRecord],
    bucketer: &DayBucketer,
    week_start: NaiveDate,
) -> u32 {
    let week_end = week_start
        .checked_add_days(Days::new(GOAL_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    records
        .iter()
        .filter(|record| record.is_reviewed)
        .filter_map(|record| record.reviewed_at)
        .map(|reviewed_at| bucketer.day_key(reviewed_at))
        .filter(|day| *day >= week_start && *day < week_end)
        .count() as u32
}

/// Completion percentage, rounded half up and clamped to 0..=100.
///
/// A non-positive target cannot be divided by; it reads as complete once
/// anything has been reviewed.
pub fn percent_complete(current_count: u32, target_count: i64) -> u8 {
    if target_count <= 0 {
        return if current_count > 0 { 100 } else { 0 };
    }
    let current = i128::from(current_count);
    let target = i128::from(target_count);
    let rounded = (200 * current + target) / (2 * target);
    rounded.clamp(0, 100) as u8
}

pub fn evaluate(
    goal: &GoalRecord,
    records: &[MistakeRecord],
    bucketer: &DayBucketer,
) -> GoalProgress {
    let current_count = reviewed_in_window(records, bucketer, goal.week_start_date);
    GoalProgress {
        goal_text: goal.goal_text.clone(),
        target_count: goal.target_count,
        current_count,
        percent_complete: percent_complete(current_count, goal.target_count),
    }
}
