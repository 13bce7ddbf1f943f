use crate::analytics::snapshot::MetricsSnapshot;
use crate::analytics::{AnalyticsConfig, DayBucketer, aggregate, goal, streak, weak_areas};
use crate::error::ValidationError;
use crate::records::{GoalRecord, MistakeRecord, RawGoal, RawMistake};
use chrono::{DateTime, Utc};
use log::{debug, warn};

/// Composes the individual analytics into one dashboard snapshot.
///
/// Holds configuration only; every call works from the records it is given
/// and the supplied `now`, so repeated calls on the same input return equal
/// snapshots.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: AnalyticsConfig,
    bucketer: DayBucketer,
}

impl Dashboard {
    pub fn new(config: AnalyticsConfig) -> Self {
        let bucketer = config.bucketer();
        Dashboard { config, bucketer }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn bucketer(&self) -> &DayBucketer {
        &self.bucketer
    }

    /// Validate raw collaborator rows, then compute the snapshot
    pub fn compute_raw(
        &self,
        mistakes: &[RawMistake],
        goals: &[RawGoal],
        now: DateTime<Utc>,
    ) -> Result<MetricsSnapshot, ValidationError> {
        let records = validate_mistakes(mistakes)?;
        let goals = validate_goals(goals)?;
        self.compute(&records, &goals, now)
    }

    pub fn compute(
        &self,
        records: &[MistakeRecord],
        goals: &[GoalRecord],
        now: DateTime<Utc>,
    ) -> Result<MetricsSnapshot, ValidationError> {
        check_consistency(records, goals).inspect_err(|err| {
            warn!("Rejecting snapshot input: {}", err);
        })?;

        debug!(
            "Computing metrics for {} mistake(s) and {} goal candidate(s) at offset {}",
            records.len(),
            goals.len(),
            self.bucketer.offset()
        );

        let today = self.bucketer.today(now);
        let activity_days = records
            .iter()
            .map(|record| self.bucketer.day_key(record.created_at));
        let streak_days = streak::consecutive_days(activity_days, today);

        let subject_counts = aggregate::subject_counts(records);
        let type_counts = aggregate::type_counts(records);
        let top_mistake_type = aggregate::top_mistake_type(&type_counts);
        let daily_counts =
            aggregate::daily_counts(records, &self.bucketer, self.config.trailing_days, now);
        let week_count = aggregate::recent_count(records, self.config.recent_window_days, now);

        let weak_areas = weak_areas::weak_areas(
            records,
            self.config.chapter_grouping,
            self.config.weak_area_limit,
        );

        let week_start = self.bucketer.week_start(now);
        let goal_progress = goal::select_goal(goals, week_start)
            .map(|selected| goal::evaluate(selected, records, &self.bucketer));

        debug!(
            "Streak {} day(s), {} this week, {} weak area(s), goal {}",
            streak_days,
            week_count,
            weak_areas.len(),
            goal_progress
                .as_ref()
                .map_or("absent".to_string(), |p| format!("{}%", p.percent_complete))
        );

        Ok(MetricsSnapshot {
            total_count: records.len() as u32,
            week_count,
            streak_days,
            top_mistake_type,
            subject_counts,
            type_counts,
            daily_counts,
            weak_areas,
            goal_progress,
        })
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

/// Validate every raw mistake, failing on the first malformed one
pub fn validate_mistakes(raw: &[RawMistake]) -> Result<Vec<MistakeRecord>, ValidationError> {
    raw.iter().map(RawMistake::validate).collect()
}

pub fn validate_goals(raw: &[RawGoal]) -> Result<Vec<GoalRecord>, ValidationError> {
    raw.iter().map(RawGoal::validate).collect()
}

/// Records must satisfy their own invariants and all belong to one user
fn check_consistency(records: &[MistakeRecord], goals: &[GoalRecord]) -> Result<(), ValidationError> {
    let owner = records
        .first()
        .map(|record| record.user_id.as_str())
        .or_else(|| goals.first().map(|goal| goal.user_id.as_str()));

    for record in records {
        record.validate()?;
        if Some(record.user_id.as_str()) != owner {
            return Err(ValidationError::new(
                &record.id,
                "user_id",
                "belongs to a different user than the rest of the snapshot",
            ));
        }
    }

    for goal in goals {
        if Some(goal.user_id.as_str()) != owner {
            return Err(ValidationError::new(
                &goal.id,
                "user_id",
                "belongs to a different user than the rest of the snapshot",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::ChapterGrouping;
    use crate::records::fixtures::{at, goal, mistake, reviewed};
    use crate::records::{MistakeType, Subject};
    use chrono::{Duration, NaiveDate};

    fn now() -> DateTime<Utc> {
        // Wednesday
        at(2025, 3, 12)
    }

    #[test]
    fn test_empty_input_degrades_to_zero_values() {
        let snapshot = Dashboard::default().compute(&[], &[], now()).unwrap();
        assert_eq!(snapshot.total_count, 0);
        assert_eq!(snapshot.week_count, 0);
        assert_eq!(snapshot.streak_days, 0);
        assert_eq!(snapshot.top_mistake_type_label(), "none");
        assert!(snapshot.subject_counts.is_empty());
        assert!(snapshot.type_counts.is_empty());
        assert_eq!(snapshot.daily_counts.len(), 30);
        assert!(snapshot.weak_areas.is_empty());
        assert!(snapshot.goal_progress.is_none());
    }

    #[test]
    fn test_streak_with_gap_three_days_ago() {
        let records = vec![
            mistake("1", Subject::Physics, "Optics", now()),
            mistake("2", Subject::Physics, "Optics", now() - Duration::days(1)),
            mistake("3", Subject::Physics, "Optics", now() - Duration::days(3)),
        ];
        let snapshot = Dashboard::default().compute(&records, &[], now()).unwrap();
        assert_eq!(snapshot.streak_days, 2);
        assert_eq!(snapshot.total_count, 3);
        assert_eq!(snapshot.week_count, 3);
    }

    #[test]
    fn test_full_snapshot() {
        let mut records = vec![
            mistake("1", Subject::Chemistry, "Redox", now()),
            mistake("2", Subject::Chemistry, "Redox", now() - Duration::days(1)),
            mistake("3", Subject::Physics, "Optics", now() - Duration::days(10)),
            reviewed(
                mistake("4", Subject::Mathematics, "Calculus", now() - Duration::days(20)),
                now() - Duration::days(1),
            ),
        ];
        records[2].mistake_type = MistakeType::ConceptNotClear;
        records[3].mistake_type = MistakeType::ConceptNotClear;

        let goals = vec![goal("g", 4, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), at(2025, 3, 9))];
        let snapshot = Dashboard::default().compute(&records, &goals, now()).unwrap();

        assert_eq!(snapshot.total_count, 4);
        assert_eq!(snapshot.week_count, 2);
        assert_eq!(snapshot.streak_days, 2);
        assert_eq!(snapshot.top_mistake_type, Some(MistakeType::SillyMistake));
        assert_eq!(snapshot.subject_counts.total(), snapshot.total_count);
        assert_eq!(snapshot.daily_counts.iter().map(|d| d.count).sum::<u32>(), 4);

        let weak: Vec<_> = snapshot
            .weak_areas
            .iter()
            .map(|a| (a.chapter.as_str(), a.count))
            .collect();
        assert_eq!(weak, vec![("Redox", 2), ("Optics", 1)]);

        let progress = snapshot.goal_progress.unwrap();
        assert_eq!(progress.current_count, 1);
        assert_eq!(progress.percent_complete, 25);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let records = vec![
            mistake("1", Subject::Chemistry, "Redox", now()),
            mistake("2", Subject::Physics, "Waves", now() - Duration::days(2)),
        ];
        let dashboard = Dashboard::new(
            AnalyticsConfig::default().with_chapter_grouping(ChapterGrouping::SubjectAndChapter),
        );
        let first = dashboard.compute(&records, &[], now()).unwrap();
        let second = dashboard.compute(&records, &[], now()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_latest_goal_for_week_is_used() {
        let week = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let goals = vec![
            goal("late", 8, week, at(2025, 3, 11)),
            goal("early", 2, week, at(2025, 3, 9)),
        ];
        let snapshot = Dashboard::default().compute(&[], &goals, now()).unwrap();
        assert_eq!(snapshot.goal_progress.unwrap().target_count, 8);
    }

    #[test]
    fn test_mixed_users_are_rejected() {
        let mut other = mistake("2", Subject::Physics, "Waves", now());
        other.user_id = "user-2".to_string();
        let records = vec![mistake("1", Subject::Physics, "Waves", now()), other];

        let err = Dashboard::default().compute(&records, &[], now()).unwrap_err();
        assert_eq!(err.record_id, "2");
        assert_eq!(err.field, "user_id");
    }

    #[test]
    fn test_raw_input_with_missing_created_at_fails() {
        let mut raw = RawMistake::from(&mistake("m-7", Subject::Physics, "Waves", now()));
        raw.created_at = None;
        let err = Dashboard::default()
            .compute_raw(&[raw], &[], now())
            .unwrap_err();
        assert_eq!(err.record_id, "m-7");
        assert_eq!(err.field, "created_at");
    }

    #[test]
    fn test_invalid_typed_record_fails() {
        let mut record = mistake("m-8", Subject::Physics, "Waves", now());
        record.is_reviewed = true;
        let err = Dashboard::default().compute(&[record], &[], now()).unwrap_err();
        assert_eq!(err.field, "reviewed_at");
    }
}
