use crate::records::{RawGoal, RawMistake, StudyTask, Subject};
use rusqlite::Row;
use rusqlite::types::Type;

/// Factory for creating RawMistake objects from database rows
pub struct MistakeRowFactory;

impl MistakeRowFactory {
    /// Columns selected by every mistakes query, in the order `from_row` reads them
    pub const COLUMNS: &'static str = "id, user_id, subject, chapter, mistake_type, difficulty,
                    notes, is_reviewed, reviewed_at, created_at";

    /// Creates a RawMistake from a database row.
    /// Nothing is interpreted here; validation happens in the analytics layer.
    pub fn from_row(row: &Row) -> rusqlite::Result<RawMistake> {
        Ok(RawMistake {
            id: row.get(0)?,
            user_id: row.get(1)?,
            subject: row.get(2)?,
            chapter: row.get(3)?,
            mistake_type: row.get(4)?,
            difficulty: row.get(5)?,
            notes: row.get(6)?,
            is_reviewed: row.get::<_, Option<i64>>(7)?.map(|flag| flag != 0),
            reviewed_at: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}

/// Factory for creating RawGoal objects from database rows
pub struct GoalRowFactory;

impl GoalRowFactory {
    pub const COLUMNS: &'static str =
        "id, user_id, goal_text, target_count, week_start_date, created_at";

    pub fn from_row(row: &Row) -> rusqlite::Result<RawGoal> {
        Ok(RawGoal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            goal_text: row.get(2)?,
            target_count: row.get(3)?,
            week_start_date: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// Factory for creating StudyTask objects from database rows
pub struct StudyTaskRowFactory;

impl StudyTaskRowFactory {
    pub const COLUMNS: &'static str =
        "id, user_id, subject, topic, estimated_minutes, is_done, date, created_at";

    pub fn from_row(row: &Row) -> rusqlite::Result<StudyTask> {
        let subject = row
            .get::<_, String>(2)?
            .parse::<Subject>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;

        Ok(StudyTask {
            id: row.get(0)?,
            user_id: row.get(1)?,
            subject,
            topic: row.get(3)?,
            estimated_minutes: row.get(4)?,
            is_done: row.get::<_, i64>(5)? != 0,
            date: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}
