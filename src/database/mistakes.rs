use crate::records::{Difficulty, MistakeType, RawMistake, Subject};
use crate::row_factories::MistakeRowFactory;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, Result, params};
use uuid::Uuid;

/// Fields entered by the logging form
#[derive(Debug, Clone, PartialEq)]
pub struct NewMistake {
    pub user_id: String,
    pub subject: Subject,
    pub chapter: String,
    pub mistake_type: MistakeType,
    pub difficulty: Difficulty,
    pub notes: Option<String>,
}

pub struct MistakesRepository<'a> {
    conn: &'a Connection,
    get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a> MistakesRepository<'a> {
    pub fn new(
        conn: &'a Connection,
        get_current_time: Box<dyn Fn() -> DateTime<Utc> + 'a>,
    ) -> Self {
        MistakesRepository {
            conn,
            get_current_time,
        }
    }

    /// Stores a new unreviewed mistake and returns its id
    pub fn insert(&self, mistake: &NewMistake) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let created_at = (self.get_current_time)().to_rfc3339();
        self.conn.execute(
            "INSERT INTO mistakes (id, user_id, subject, chapter, mistake_type, difficulty,
                                   notes, is_reviewed, reviewed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, NULL, ?8)",
            params![
                id,
                mistake.user_id,
                mistake.subject.as_str(),
                mistake.chapter.trim(),
                mistake.mistake_type.as_str(),
                mistake.difficulty.as_str(),
                mistake.notes,
                created_at
            ],
        )?;
        debug!(
            "Logged mistake {} for user {}: {} / {}",
            id, mistake.user_id, mistake.subject, mistake.chapter
        );
        Ok(id)
    }

    /// Marks a mistake reviewed. Only the first call has an effect; returns the
    /// number of rows changed (0 when already reviewed or unknown).
    pub fn mark_reviewed(&self, mistake_id: &str) -> Result<usize> {
        let reviewed_at = (self.get_current_time)().to_rfc3339();
        let changed = self.conn.execute(
            "UPDATE mistakes SET is_reviewed = 1, reviewed_at = ?1
             WHERE id = ?2 AND is_reviewed = 0",
            params![reviewed_at, mistake_id],
        )?;
        debug!("Marked mistake {} reviewed ({} row(s))", mistake_id, changed);
        Ok(changed)
    }

    pub fn get(&self, mistake_id: &str) -> Result<Option<RawMistake>> {
        let sql = format!(
            "SELECT {} FROM mistakes WHERE id = ?1",
            MistakeRowFactory::COLUMNS
        );
        self.conn
            .query_row(&sql, [mistake_id], MistakeRowFactory::from_row)
            .optional()
    }

    /// All mistakes of one user, in storage order
    pub fn fetch_for_user(&self, user_id: &str) -> Result<Vec<RawMistake>> {
        let sql = format!(
            "SELECT {} FROM mistakes WHERE user_id = ?1",
            MistakeRowFactory::COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([user_id], MistakeRowFactory::from_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }

        debug!("Retrieved {} mistake(s) for user {}", result.len(), user_id);
        Ok(result)
    }

    pub fn count_for_user(&self, user_id: &str) -> Result<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM mistakes WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )
    }
}
