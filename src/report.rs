use crate::analytics::{DayBucketer, MetricsSnapshot, Tally, WeakArea};
use crate::history::{HistoryPage, ReviewStatus};
use crate::planner::PlannerView;
use crate::records::{MistakeRecord, StudyTask};
use crate::time_format::format_days_ago;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::fmt;

const LABEL_WIDTH: usize = 19;
const SPARK_DAYS: usize = 7;

/// Applies terminal colors only when asked to
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    use_color: bool,
}

impl Painter {
    pub fn new(use_color: bool) -> Self {
        Painter { use_color }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: impl ToString) -> String {
        let text = text.to_string();
        if self.use_color {
            text.cyan().to_string()
        } else {
            text
        }
    }

    fn warn(&self, text: impl ToString) -> String {
        let text = text.to_string();
        if self.use_color {
            text.yellow().to_string()
        } else {
            text
        }
    }

    fn good(&self, text: impl ToString) -> String {
        let text = text.to_string();
        if self.use_color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn dim(&self, text: impl ToString) -> String {
        let text = text.to_string();
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text
        }
    }
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn tally_lines<K: PartialEq + fmt::Display>(tally: &Tally<K>, painter: &Painter) -> Vec<String> {
    if tally.is_empty() {
        return vec![painter.dim("  (none)")];
    }
    tally
        .entries()
        .iter()
        .map(|entry| {
            format!(
                "  {:<width$}{}",
                entry.name.to_string(),
                painter.value(entry.count),
                width = LABEL_WIDTH
            )
        })
        .collect()
}

fn weak_area_lines(areas: &[WeakArea], suffix: &str, painter: &Painter) -> Vec<String> {
    if areas.is_empty() {
        return vec![painter.dim("  (none)")];
    }
    areas
        .iter()
        .enumerate()
        .map(|(rank, area)| {
            format!(
                "  {}. {} ({}): {}",
                rank + 1,
                area.chapter,
                area.subject,
                painter.warn(format!("{} {}", area.count, suffix))
            )
        })
        .collect()
}

fn describe(record: &MistakeRecord) -> String {
    format!(
        "{} / {} - {} ({})",
        record.subject, record.chapter, record.mistake_type, record.difficulty
    )
}

/// Text rendering of the dashboard plus the most recent mistakes
pub fn render_dashboard(
    snapshot: &MetricsSnapshot,
    recent: &[&MistakeRecord],
    now: DateTime<Utc>,
    bucketer: &DayBucketer,
    use_color: bool,
) -> String {
    let p = Painter::new(use_color);
    let row = |label: &str, value: String| format!("{:<width$}{}", label, value, width = LABEL_WIDTH);

    let mut lines = vec![
        p.heading("Mistake Dashboard"),
        "=================".to_string(),
        row("Total mistakes:", p.value(snapshot.total_count)),
        row("This week:", p.value(snapshot.week_count)),
        row("Streak:", p.value(plural(snapshot.streak_days, "day"))),
        row("Top mistake type:", p.value(snapshot.top_mistake_type_label())),
        String::new(),
        p.heading("By subject"),
    ];
    lines.extend(tally_lines(&snapshot.subject_counts, &p));

    lines.push(String::new());
    lines.push(p.heading("By type"));
    lines.extend(tally_lines(&snapshot.type_counts, &p));

    lines.push(String::new());
    lines.push(p.heading(&format!("Last {} days", SPARK_DAYS)));
    let skip = snapshot.daily_counts.len().saturating_sub(SPARK_DAYS);
    for day in snapshot.daily_counts.iter().skip(skip) {
        let bar = "#".repeat(day.count as usize);
        let line = format!("  {} {:>3} {}", day.date, day.count, p.value(bar));
        lines.push(line.trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(p.heading("Weak areas"));
    lines.extend(weak_area_lines(&snapshot.weak_areas, "unreviewed", &p));

    lines.push(String::new());
    lines.push(p.heading("Weekly goal"));
    match &snapshot.goal_progress {
        Some(progress) => {
            let status = format!(
                "{}/{} reviewed ({}%)",
                progress.current_count, progress.target_count, progress.percent_complete
            );
            let status = if progress.is_complete() {
                p.good(format!("{} - complete", status))
            } else {
                p.value(status)
            };
            lines.push(format!("  {}: {}", progress.goal_text, status));
        }
        None => lines.push(p.dim("  No goal set for this week")),
    }

    lines.push(String::new());
    lines.push(p.heading("Recent mistakes"));
    if recent.is_empty() {
        lines.push(p.dim("  No mistakes logged yet"));
    }
    for record in recent {
        let mut line = format!(
            "  {}, {}",
            describe(record),
            format_days_ago(record.created_at, now, bucketer)
        );
        if record.is_reviewed {
            line.push_str(&format!(" {}", p.good("[reviewed]")));
        }
        lines.push(line);
    }

    finish(lines)
}

pub fn render_history(
    page: &HistoryPage<'_>,
    now: DateTime<Utc>,
    bucketer: &DayBucketer,
    use_color: bool,
) -> String {
    let p = Painter::new(use_color);
    let label = match page.status {
        ReviewStatus::All => "matching",
        status => status.as_str(),
    };
    let mut lines = vec![p.heading(&format!(
        "History (page {} of {}, {} {})",
        page.page + 1,
        page.total_pages.max(1),
        page.total,
        label
    ))];

    if page.items.is_empty() {
        lines.push(p.dim("  Nothing matches"));
    }
    for record in &page.items {
        let status = if record.is_reviewed {
            p.good("reviewed")
        } else {
            p.warn("pending")
        };
        lines.push(format!(
            "  {}  {}, {} [{}]",
            p.dim(&record.id),
            describe(record),
            format_days_ago(record.created_at, now, bucketer),
            status
        ));
        if let Some(notes) = &record.notes {
            lines.push(format!("      {}", notes));
        }
    }

    finish(lines)
}

/// Unreviewed mistakes, oldest first
pub fn render_revision_queue(
    queue: &[&MistakeRecord],
    now: DateTime<Utc>,
    bucketer: &DayBucketer,
    use_color: bool,
) -> String {
    let p = Painter::new(use_color);
    let mut lines = vec![p.heading(&format!(
        "Revision queue ({} unreviewed)",
        queue.len()
    ))];

    if queue.is_empty() {
        lines.push(p.good("  All caught up"));
    }
    for record in queue {
        lines.push(format!(
            "  {}  {}, {}",
            p.dim(&record.id),
            describe(record),
            p.warn(format_days_ago(record.created_at, now, bucketer))
        ));
        if let Some(notes) = &record.notes {
            lines.push(format!("      {}", notes));
        }
    }

    finish(lines)
}

fn task_line(task: &StudyTask, show_date: bool, painter: &Painter) -> String {
    let mark = if task.is_done {
        painter.good("[x]")
    } else {
        "[ ]".to_string()
    };
    let date = if show_date {
        format!("{} ", task.date)
    } else {
        String::new()
    };
    format!(
        "  {} {}{}: {} ({} min)  {}",
        mark,
        date,
        task.subject,
        task.topic,
        task.estimated_minutes,
        painter.dim(&task.id)
    )
}

pub fn render_planner(view: &PlannerView<'_>, use_color: bool) -> String {
    let p = Painter::new(use_color);
    let mut lines = vec![p.heading(&format!("Study plan for {}", view.today))];

    if view.today_tasks.is_empty() {
        lines.push(p.dim("  No tasks planned"));
    }
    lines.extend(view.today_tasks.iter().map(|task| task_line(task, false, &p)));
    lines.push(format!(
        "Done {}/{} ({}%), {} min planned",
        view.done_count,
        view.today_tasks.len(),
        p.value(view.percent_done),
        view.planned_minutes
    ));

    if !view.backlog.is_empty() {
        lines.push(String::new());
        lines.push(p.heading("Backlog"));
        lines.extend(view.backlog.iter().map(|task| task_line(task, true, &p)));
    }

    lines.push(String::new());
    lines.push(p.heading("Suggested focus"));
    lines.extend(weak_area_lines(&view.suggestions, "mistakes", &p));

    finish(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Dashboard;
    use crate::history::{HistoryFilter, history_page, recent_mistakes, revision_queue};
    use crate::records::fixtures::{at, goal, mistake, reviewed};
    use crate::records::{MistakeType, Subject};
    use chrono::NaiveDate;

    fn records() -> Vec<MistakeRecord> {
        let mut concept = reviewed(
            mistake("3", Subject::Physics, "Optics", at(2025, 3, 2)),
            at(2025, 3, 10),
        );
        concept.mistake_type = MistakeType::ConceptNotClear;
        vec![
            mistake("1", Subject::Chemistry, "Redox", at(2025, 3, 12)),
            mistake("2", Subject::Chemistry, "Redox", at(2025, 3, 11)),
            concept,
        ]
    }

    #[test]
    fn test_render_dashboard_plain() {
        let now = at(2025, 3, 12);
        let records = records();
        let week = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let goals = vec![goal("g", 4, week, at(2025, 3, 9))];

        let dashboard = Dashboard::default();
        let snapshot = dashboard.compute(&records, &goals, now).unwrap();
        let recent = recent_mistakes(&records, 5);
        let output = render_dashboard(&snapshot, &recent, now, dashboard.bucketer(), false);

        insta::assert_snapshot!(output.trim_end(), @r"
Mistake Dashboard
=================
Total mistakes:    3
This week:         2
Streak:            2 days
Top mistake type:  Silly Mistake

By subject
  Chemistry          2
  Physics            1

By type
  Silly Mistake      2
  Concept Not Clear  1

Last 7 days
  2025-03-06   0
  2025-03-07   0
  2025-03-08   0
  2025-03-09   0
  2025-03-10   0
  2025-03-11   1 #
  2025-03-12   1 #

Weak areas
  1. Redox (Chemistry): 2 unreviewed

Weekly goal
  Review 4 mistakes: 1/4 reviewed (25%)

Recent mistakes
  Chemistry / Redox - Silly Mistake (Medium), today
  Chemistry / Redox - Silly Mistake (Medium), yesterday
  Physics / Optics - Concept Not Clear (Medium), 10 days ago [reviewed]
");
    }

    #[test]
    fn test_render_empty_dashboard() {
        let now = at(2025, 3, 12);
        let snapshot = Dashboard::default().compute(&[], &[], now).unwrap();
        let output = render_dashboard(&snapshot, &[], now, &DayBucketer::utc(), false);

        assert!(output.contains("Top mistake type:  none"));
        assert!(output.contains("Streak:            0 days"));
        assert!(output.contains("No goal set for this week"));
        assert!(output.contains("No mistakes logged yet"));
    }

    #[test]
    fn test_render_history_shows_ids_and_notes() {
        let now = at(2025, 3, 12);
        let mut records = records();
        records[0].notes = Some("Sign error in half reaction".to_string());
        let page = history_page(&records, &HistoryFilter::default(), 0, 2);
        let output = render_history(&page, now, &DayBucketer::utc(), false);

        assert!(output.starts_with("History (page 1 of 2, 3 matching)"));
        assert!(output.contains("  1  Chemistry / Redox - Silly Mistake (Medium), today [pending]"));
        assert!(output.contains("      Sign error in half reaction"));
        assert!(!output.contains("Optics"));
    }

    #[test]
    fn test_render_history_names_status_filter() {
        let now = at(2025, 3, 12);
        let records = records();
        let filter = HistoryFilter {
            status: ReviewStatus::Unreviewed,
            ..HistoryFilter::default()
        };
        let page = history_page(&records, &filter, 0, 5);
        let output = render_history(&page, now, &DayBucketer::utc(), false);

        assert!(output.starts_with("History (page 1 of 1, 2 unreviewed)"));
        assert!(!output.contains("[reviewed]"));
    }

    #[test]
    fn test_render_revision_queue() {
        let now = at(2025, 3, 12);
        let records = records();
        let output = render_revision_queue(&revision_queue(&records), now, &DayBucketer::utc(), false);

        assert!(output.starts_with("Revision queue (2 unreviewed)"));
        assert!(output.find("  2  ").unwrap() < output.find("  1  ").unwrap());
        assert!(render_revision_queue(&[], now, &DayBucketer::utc(), false).contains("All caught up"));
    }

    #[test]
    fn test_colored_output_differs_only_when_enabled() {
        colored::control::set_override(true);
        let now = at(2025, 3, 12);
        let snapshot = Dashboard::default().compute(&[], &[], now).unwrap();
        let colored = render_dashboard(&snapshot, &[], now, &DayBucketer::utc(), true);
        let plain = render_dashboard(&snapshot, &[], now, &DayBucketer::utc(), false);
        colored::control::unset_override();

        assert!(colored.contains("\u{1b}["));
        assert!(!plain.contains("\u{1b}["));
    }
}
