use crate::records::RawGoal;
use crate::row_factories::GoalRowFactory;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rusqlite::{Connection, Result, params};
use uuid::Uuid;

pub struct GoalsRepository<'a> {
    conn: &'a Connection,
    get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a> GoalsRepository<'a> {
    pub fn new(
        conn: &'a Connection,
        get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
    ) -> Self {
        GoalsRepository {
            conn,
            get_current_time,
        }
    }

    /// Stores a goal for the week starting on `week_start`. Earlier goals for
    /// the same week are kept; readers pick the newest.
    pub fn insert(
        &self,
        user_id: &str,
        goal_text: &str,
        target_count: i64,
        week_start: NaiveDate,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let created_at = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO goals (id, user_id, goal_text, target_count, week_start_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                user_id,
                goal_text,
                target_count,
                week_start.format("%Y-%m-%d").to_string(),
                created_at
            ],
        )?;
        debug!(
            "Created goal {} for user {} (week of {}, target {})",
            id, user_id, week_start, target_count
        );
        Ok(id)
    }

    /// Every goal candidate of one user for the given week
    pub fn fetch_for_week(&self, user_id: &str, week_start: NaiveDate) -> Result<Vec<RawGoal>> {
        let sql = format!(
            "SELECT {} FROM goals WHERE user_id = ?1 AND week_start_date = ?2",
            GoalRowFactory::COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![user_id, week_start.format("%Y-%m-%d").to_string()],
            GoalRowFactory::from_row,
        )?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
