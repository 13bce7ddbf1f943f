use crate::analytics::dashboard::{validate_goals, validate_mistakes};
use crate::analytics::goal::select_goal;
use crate::analytics::{Dashboard, MetricsSnapshot};
use crate::error::Result;
use crate::records::{GoalRecord, MistakeRecord, RawGoal, RawMistake};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Read side of the record store. The dashboard only ever sees what comes
/// back from here, so any storage that can produce raw rows can feed it.
pub trait RecordSource {
    /// Every mistake logged by `user_id`, in no particular order
    fn fetch_mistakes(&self, user_id: &str) -> Result<Vec<RawMistake>>;

    /// Every goal `user_id` set for the week starting on `week_start`
    fn fetch_goals(&self, user_id: &str, week_start: NaiveDate) -> Result<Vec<RawGoal>>;

    /// The goal in effect for the week: the most recently created one
    fn fetch_goal(&self, user_id: &str, week_start: NaiveDate) -> Result<Option<GoalRecord>> {
        let goals = validate_goals(&self.fetch_goals(user_id, week_start)?)?;
        Ok(select_goal(&goals, week_start).cloned())
    }
}

/// Load and validate everything the dashboard needs for one user
pub fn fetch_records<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    week_start: NaiveDate,
) -> Result<(Vec<MistakeRecord>, Vec<GoalRecord>)> {
    let mistakes = validate_mistakes(&source.fetch_mistakes(user_id)?)?;
    let goals = validate_goals(&source.fetch_goals(user_id, week_start)?)?;
    debug!(
        "Fetched {} mistake(s) and {} goal(s) for {}",
        mistakes.len(),
        goals.len(),
        user_id
    );
    Ok((mistakes, goals))
}

pub fn compute_for_user<S: RecordSource + ?Sized>(
    source: &S,
    dashboard: &Dashboard,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<MetricsSnapshot> {
    let week_start = dashboard.bucketer().week_start(now);
    let (mistakes, goals) = fetch_records(source, user_id, week_start)?;
    Ok(dashboard.compute(&mistakes, &goals, now)?)
}

/// Records exported to a JSON file:
/// `{ "mistakes": [...], "goals": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JsonSnapshotSource {
    mistakes: Vec<RawMistake>,
    goals: Vec<RawGoal>,
}

impl JsonSnapshotSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        debug!("Loaded record export from {}", path.as_ref().display());
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

// Rows without a user_id are kept so validation can report them.
fn owned_by(row_user: &Option<String>, user_id: &str) -> bool {
    row_user.as_deref().is_none_or(|owner| owner == user_id)
}

impl RecordSource for JsonSnapshotSource {
    fn fetch_mistakes(&self, user_id: &str) -> Result<Vec<RawMistake>> {
        Ok(self
            .mistakes
            .iter()
            .filter(|row| owned_by(&row.user_id, user_id))
            .cloned()
            .collect())
    }

    fn fetch_goals(&self, user_id: &str, week_start: NaiveDate) -> Result<Vec<RawGoal>> {
        let week = week_start.format("%Y-%m-%d").to_string();
        Ok(self
            .goals
            .iter()
            .filter(|row| owned_by(&row.user_id, user_id))
            .filter(|row| row.week_start_date.as_deref() == Some(week.as_str()))
            .cloned()
            .collect())
    }
}
