use crate::records::{StudyTask, Subject};
use crate::row_factories::StudyTaskRowFactory;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rusqlite::{Connection, Result, params};
use uuid::Uuid;

pub struct TasksRepository<'a> {
    conn: &'a Connection,
    get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a> TasksRepository<'a> {
    pub fn new(
        conn: &'a Connection,
        get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
    ) -> Self {
        TasksRepository {
            conn,
            get_current_time,
        }
    }

    pub fn insert(
        &self,
        user_id: &str,
        subject: Subject,
        topic: &str,
        estimated_minutes: u32,
        date: NaiveDate,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let created_at = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO study_tasks (id, user_id, subject, topic, estimated_minutes, is_done, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
            params![
                id,
                user_id,
                subject.as_str(),
                topic.trim(),
                estimated_minutes,
                date,
                created_at
            ],
        )?;
        debug!("Planned task {} for user {} on {}", id, user_id, date);
        Ok(id)
    }

    /// Sets the done flag; returns the number of rows changed
    pub fn set_done(&self, task_id: &str, done: bool) -> Result<usize> {
        self.conn.execute(
            "UPDATE study_tasks SET is_done = ?1 WHERE id = ?2",
            params![done as i32, task_id],
        )
    }

    pub fn delete(&self, task_id: &str) -> Result<usize> {
        self.conn
            .execute("DELETE FROM study_tasks WHERE id = ?1", [task_id])
    }

    pub fn fetch_for_user(&self, user_id: &str) -> Result<Vec<StudyTask>> {
        let sql = format!(
            "SELECT {} FROM study_tasks WHERE user_id = ?1 ORDER BY created_at ASC",
            StudyTaskRowFactory::COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([user_id], StudyTaskRowFactory::from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
