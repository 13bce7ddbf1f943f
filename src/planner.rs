use crate::analytics::goal::percent_complete;
use crate::analytics::snapshot::WeakArea;
use crate::analytics::weak_areas::{ChapterGrouping, ReviewFilter, rank_chapters};
use crate::records::{MistakeRecord, StudyTask};
use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// The study planner for a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerView<'a> {
    pub today: NaiveDate,
    /// Tasks scheduled for today, in creation order
    pub today_tasks: Vec<&'a StudyTask>,
    /// Unfinished tasks from earlier days
    pub backlog: Vec<&'a StudyTask>,
    pub done_count: usize,
    pub percent_done: u8,
    pub planned_minutes: u32,
    /// Chapters with the most mistakes overall, reviewed or not
    pub suggestions: Vec<WeakArea>,
}

pub fn plan<'a>(
    tasks: &'a [StudyTask],
    records: &[MistakeRecord],
    today: NaiveDate,
    grouping: ChapterGrouping,
    suggestion_limit: usize,
) -> PlannerView<'a> {
    let mut ordered: Vec<&StudyTask> = tasks.iter().collect();
    ordered.sort_by_key(|task| task.created_at);

    let today_tasks: Vec<&StudyTask> = ordered
        .iter()
        .copied()
        .filter(|task| task.date == today)
        .collect();
    let backlog: Vec<&StudyTask> = ordered
        .iter()
        .copied()
        .filter(|task| task.date < today && !task.is_done)
        .collect();

    let done_count = today_tasks.iter().filter(|task| task.is_done).count();
    let planned_minutes = today_tasks.iter().map(|task| task.estimated_minutes).sum();
    let percent_done = percent_complete(done_count as u32, today_tasks.len() as i64);

    PlannerView {
        today,
        today_tasks,
        backlog,
        done_count,
        percent_done,
        planned_minutes,
        suggestions: rank_chapters(records, ReviewFilter::All, grouping, suggestion_limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Subject;
    use crate::records::fixtures::{at, mistake, reviewed};

    fn task(id: &str, date: NaiveDate, done: bool, minutes: u32, created_day: u32) -> StudyTask {
        StudyTask {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            subject: Subject::Physics,
            topic: format!("Topic {}", id),
            estimated_minutes: minutes,
            is_done: done,
            date,
            created_at: at(2025, 3, created_day),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_splits_today_and_backlog() {
        let tasks = vec![
            task("b", day(10), false, 45, 10),
            task("a", day(10), true, 30, 9),
            task("old-open", day(8), false, 20, 8),
            task("old-done", day(7), true, 20, 7),
            task("future", day(11), false, 20, 10),
        ];
        let view = plan(&tasks, &[], day(10), ChapterGrouping::ChapterOnly, 3);

        let today: Vec<_> = view.today_tasks.iter().map(|t| t.id.as_str()).collect();
        let backlog: Vec<_> = view.backlog.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(today, vec!["a", "b"]);
        assert_eq!(backlog, vec!["old-open"]);
        assert_eq!(view.done_count, 1);
        assert_eq!(view.percent_done, 50);
        assert_eq!(view.planned_minutes, 75);
    }

    #[test]
    fn test_no_tasks_is_zero_percent() {
        let view = plan(&[], &[], day(10), ChapterGrouping::ChapterOnly, 3);
        assert_eq!(view.percent_done, 0);
        assert!(view.today_tasks.is_empty());
    }

    #[test]
    fn test_suggestions_include_reviewed_mistakes() {
        let records = vec![
            mistake("1", Subject::Physics, "Optics", at(2025, 3, 1)),
            reviewed(mistake("2", Subject::Chemistry, "Redox", at(2025, 3, 1)), at(2025, 3, 2)),
            reviewed(mistake("3", Subject::Chemistry, "Redox", at(2025, 3, 1)), at(2025, 3, 2)),
        ];
        let view = plan(&[], &records, day(10), ChapterGrouping::ChapterOnly, 3);
        let chapters: Vec<_> = view.suggestions.iter().map(|s| s.chapter.as_str()).collect();
        assert_eq!(chapters, vec!["Redox", "Optics"]);
    }
}
