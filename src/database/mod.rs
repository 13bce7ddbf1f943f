pub mod connection;
pub mod goals;
pub mod mistakes;
pub mod tasks;

use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::error::{Error, Result};
use crate::records::{RawGoal, RawMistake, StudyTask, Subject};
use crate::source::RecordSource;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use rusqlite::Connection;
use std::sync::Arc;

pub use goals::GoalsRepository;
pub use mistakes::{MistakesRepository, NewMistake};
pub use tasks::TasksRepository;

/// Main Database struct providing access to all repositories
pub struct Database {
    pub conn: Connection,
    date_provider: Arc<dyn DateProvider>,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        Self::init(db_path, Arc::new(SystemDateProvider))
    }

    pub fn with_date_provider(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        Self::init(db_path, date_provider)
    }

    fn init(db_path: &str, date_provider: Arc<dyn DateProvider>) -> Result<Self> {
        let conn = connection::init_connection(db_path)?;
        Ok(Database {
            conn,
            date_provider,
        })
    }

    /// Helper method to get the current time (delegates to date provider)
    pub fn get_current_time(&self) -> DateTime<Utc> {
        self.date_provider.get_current_time()
    }

    fn mistakes(&self) -> MistakesRepository<'_> {
        MistakesRepository::new(&self.conn, Box::new(|| self.get_current_time()))
    }

    fn goals(&self) -> GoalsRepository<'_> {
        GoalsRepository::new(&self.conn, Box::new(|| self.get_current_time()))
    }

    fn tasks(&self) -> TasksRepository<'_> {
        TasksRepository::new(&self.conn, Box::new(|| self.get_current_time()))
    }

    // ===== Mistakes =====

    pub fn log_mistake(&self, mistake: &NewMistake) -> Result<String> {
        let id = self.mistakes().insert(mistake)?;
        info!("Logged {} mistake in {}", mistake.subject, mistake.chapter);
        Ok(id)
    }

    /// Marks a mistake reviewed. Returns `false` when it already was.
    pub fn mark_reviewed(&self, mistake_id: &str) -> Result<bool> {
        let repo = self.mistakes();
        if repo.mark_reviewed(mistake_id)? > 0 {
            return Ok(true);
        }
        match repo.get(mistake_id)? {
            Some(_) => Ok(false),
            None => Err(Error::NotFound {
                kind: "Mistake",
                id: mistake_id.to_string(),
            }),
        }
    }

    pub fn get_mistake(&self, mistake_id: &str) -> Result<Option<RawMistake>> {
        Ok(self.mistakes().get(mistake_id)?)
    }

    pub fn count_mistakes(&self, user_id: &str) -> Result<i64> {
        Ok(self.mistakes().count_for_user(user_id)?)
    }

    // ===== Goals =====

    pub fn set_goal(
        &self,
        user_id: &str,
        goal_text: &str,
        target_count: i64,
        week_start: NaiveDate,
    ) -> Result<String> {
        Ok(self
            .goals()
            .insert(user_id, goal_text, target_count, week_start)?)
    }

    // ===== Study tasks =====

    pub fn add_task(
        &self,
        user_id: &str,
        subject: Subject,
        topic: &str,
        estimated_minutes: u32,
        date: NaiveDate,
    ) -> Result<String> {
        Ok(self
            .tasks()
            .insert(user_id, subject, topic, estimated_minutes, date)?)
    }

    pub fn complete_task(&self, task_id: &str) -> Result<()> {
        self.set_task_done(task_id, true)
    }

    /// Marks a finished task as still to do
    pub fn reopen_task(&self, task_id: &str) -> Result<()> {
        self.set_task_done(task_id, false)
    }

    fn set_task_done(&self, task_id: &str, done: bool) -> Result<()> {
        match self.tasks().set_done(task_id, done)? {
            0 => Err(Error::NotFound {
                kind: "Task",
                id: task_id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn delete_task(&self, task_id: &str) -> Result<()> {
        match self.tasks().delete(task_id)? {
            0 => Err(Error::NotFound {
                kind: "Task",
                id: task_id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn fetch_tasks(&self, user_id: &str) -> Result<Vec<StudyTask>> {
        Ok(self.tasks().fetch_for_user(user_id)?)
    }
}

impl RecordSource for Database {
    fn fetch_mistakes(&self, user_id: &str) -> Result<Vec<RawMistake>> {
        Ok(self.mistakes().fetch_for_user(user_id)?)
    }

    fn fetch_goals(&self, user_id: &str, week_start: NaiveDate) -> Result<Vec<RawGoal>> {
        Ok(self.goals().fetch_for_week(user_id, week_start)?)
    }
}
