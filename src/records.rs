use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Physics,
    Chemistry,
    Mathematics,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Physics, Subject::Chemistry, Subject::Mathematics];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Mathematics => "Mathematics",
        }
    }

    /// Chapters offered by the logging form for this subject
    pub fn chapters(&self) -> &'static [&'static str] {
        match self {
            Subject::Physics => &[
                "Motion",
                "Laws of Motion",
                "Work Energy Power",
                "Gravitation",
                "Thermodynamics",
                "Waves",
                "Electrostatics",
                "Current Electricity",
                "Magnetism",
                "Optics",
                "Modern Physics",
            ],
            Subject::Chemistry => &[
                "Atomic Structure",
                "Chemical Bonding",
                "Thermodynamics",
                "Equilibrium",
                "Redox",
                "Electrochemistry",
                "Organic Basics",
                "Hydrocarbons",
                "Coordination Compounds",
            ],
            Subject::Mathematics => &[
                "Algebra",
                "Trigonometry",
                "Coordinate Geometry",
                "Calculus",
                "Vectors",
                "Statistics",
                "Probability",
                "Matrices",
            ],
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown subject '{}'", s))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MistakeType {
    #[serde(rename = "Silly Mistake")]
    SillyMistake,
    #[serde(rename = "Concept Not Clear")]
    ConceptNotClear,
    #[serde(rename = "Formula Forgotten")]
    FormulaForgotten,
    #[serde(rename = "Misread Question")]
    MisreadQuestion,
    #[serde(rename = "Calculation Error")]
    CalculationError,
    #[serde(rename = "Time Management")]
    TimeManagement,
}

impl MistakeType {
    pub const ALL: [MistakeType; 6] = [
        MistakeType::SillyMistake,
        MistakeType::ConceptNotClear,
        MistakeType::FormulaForgotten,
        MistakeType::MisreadQuestion,
        MistakeType::CalculationError,
        MistakeType::TimeManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeType::SillyMistake => "Silly Mistake",
            MistakeType::ConceptNotClear => "Concept Not Clear",
            MistakeType::FormulaForgotten => "Formula Forgotten",
            MistakeType::MisreadQuestion => "Misread Question",
            MistakeType::CalculationError => "Calculation Error",
            MistakeType::TimeManagement => "Time Management",
        }
    }
}

impl FromStr for MistakeType {
    type Err = String;

    /// Accepts the display label ("Silly Mistake") or a hyphenated form
    /// ("silly-mistake") as typed on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        MistakeType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown mistake type '{}'", s))
    }
}

impl fmt::Display for MistakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged exam mistake, validated and typed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MistakeRecord {
    pub id: String,
    pub user_id: String,
    pub subject: Subject,
    pub chapter: String,
    pub mistake_type: MistakeType,
    pub difficulty: Difficulty,
    pub notes: Option<String>,
    pub is_reviewed: bool,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MistakeRecord {
    /// Checks the review invariants: `reviewed_at` is present exactly when
    /// `is_reviewed` is set, and never precedes `created_at`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chapter.trim().is_empty() {
            return Err(ValidationError::new(&self.id, "chapter", "is empty"));
        }
        match (self.is_reviewed, self.reviewed_at) {
            (true, None) => Err(ValidationError::new(
                &self.id,
                "reviewed_at",
                "is missing on a reviewed record",
            )),
            (false, Some(_)) => Err(ValidationError::new(
                &self.id,
                "reviewed_at",
                "is set on an unreviewed record",
            )),
            (true, Some(reviewed_at)) if reviewed_at < self.created_at => Err(
                ValidationError::new(&self.id, "reviewed_at", "precedes created_at"),
            ),
            _ => Ok(()),
        }
    }
}

/// A mistake as handed over by a storage collaborator, before validation.
///
/// Every field is optional so that a hole in upstream data is reported as a
/// `ValidationError` instead of being silently defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMistake {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub mistake_type: Option<String>,
    pub difficulty: Option<String>,
    pub notes: Option<String>,
    pub is_reviewed: Option<bool>,
    pub reviewed_at: Option<String>,
    pub created_at: Option<String>,
}

impl RawMistake {
    pub fn validate(&self) -> Result<MistakeRecord, ValidationError> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| ValidationError::missing("<unknown>", "id"))?;

        let user_id = required(&id, "user_id", &self.user_id)?.to_string();
        let subject = parse_enum(&id, "subject", required(&id, "subject", &self.subject)?)?;
        let chapter = required(&id, "chapter", &self.chapter)?.to_string();
        let mistake_type = parse_enum(
            &id,
            "mistake_type",
            required(&id, "mistake_type", &self.mistake_type)?,
        )?;
        let difficulty = parse_enum(
            &id,
            "difficulty",
            required(&id, "difficulty", &self.difficulty)?,
        )?;
        let is_reviewed = self
            .is_reviewed
            .ok_or_else(|| ValidationError::missing(&id, "is_reviewed"))?;
        let created_at = parse_timestamp(&id, "created_at", required(&id, "created_at", &self.created_at)?)?;
        let reviewed_at = self
            .reviewed_at
            .as_deref()
            .map(|value| parse_timestamp(&id, "reviewed_at", value))
            .transpose()?;

        let record = MistakeRecord {
            id,
            user_id,
            subject,
            chapter,
            mistake_type,
            difficulty,
            notes: self.notes.clone().filter(|notes| !notes.trim().is_empty()),
            is_reviewed,
            reviewed_at,
            created_at,
        };
        record.validate()?;
        Ok(record)
    }
}

impl From<&MistakeRecord> for RawMistake {
    fn from(record: &MistakeRecord) -> Self {
        RawMistake {
            id: Some(record.id.clone()),
            user_id: Some(record.user_id.clone()),
            subject: Some(record.subject.as_str().to_string()),
            chapter: Some(record.chapter.clone()),
            mistake_type: Some(record.mistake_type.as_str().to_string()),
            difficulty: Some(record.difficulty.as_str().to_string()),
            notes: record.notes.clone(),
            is_reviewed: Some(record.is_reviewed),
            reviewed_at: record.reviewed_at.map(|ts| ts.to_rfc3339()),
            created_at: Some(record.created_at.to_rfc3339()),
        }
    }
}

/// A weekly goal: review `target_count` mistakes in the week starting on
/// `week_start_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRecord {
    pub id: String,
    pub user_id: String,
    pub goal_text: String,
    /// Positive by contract; non-positive values are tolerated by the evaluator
    pub target_count: i64,
    pub week_start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGoal {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub goal_text: Option<String>,
    pub target_count: Option<i64>,
    pub week_start_date: Option<String>,
    pub created_at: Option<String>,
}

impl RawGoal {
    pub fn validate(&self) -> Result<GoalRecord, ValidationError> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| ValidationError::missing("<unknown>", "id"))?;
        let user_id = required(&id, "user_id", &self.user_id)?.to_string();
        let goal_text = required(&id, "goal_text", &self.goal_text)?.to_string();
        let target_count = self
            .target_count
            .ok_or_else(|| ValidationError::missing(&id, "target_count"))?;
        let week_start_raw = required(&id, "week_start_date", &self.week_start_date)?;
        let week_start_date = NaiveDate::parse_from_str(week_start_raw, "%Y-%m-%d").map_err(|_| {
            ValidationError::new(
                &id,
                "week_start_date",
                format!("is not a YYYY-MM-DD date: '{}'", week_start_raw),
            )
        })?;
        let created_at = parse_timestamp(&id, "created_at", required(&id, "created_at", &self.created_at)?)?;

        Ok(GoalRecord {
            id,
            user_id,
            goal_text,
            target_count,
            week_start_date,
            created_at,
        })
    }
}

impl From<&GoalRecord> for RawGoal {
    fn from(goal: &GoalRecord) -> Self {
        RawGoal {
            id: Some(goal.id.clone()),
            user_id: Some(goal.user_id.clone()),
            goal_text: Some(goal.goal_text.clone()),
            target_count: Some(goal.target_count),
            week_start_date: Some(goal.week_start_date.format("%Y-%m-%d").to_string()),
            created_at: Some(goal.created_at.to_rfc3339()),
        }
    }
}

/// A planned study block for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyTask {
    pub id: String,
    pub user_id: String,
    pub subject: Subject,
    pub topic: String,
    pub estimated_minutes: u32,
    pub is_done: bool,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

fn required<'v>(
    record_id: &str,
    field: &'static str,
    value: &'v Option<String>,
) -> Result<&'v str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::missing(record_id, field)),
    }
}

fn parse_enum<T: FromStr<Err = String>>(
    record_id: &str,
    field: &'static str,
    value: &str,
) -> Result<T, ValidationError> {
    value
        .parse()
        .map_err(|reason: String| ValidationError::new(record_id, field, reason))
}

fn parse_timestamp(
    record_id: &str,
    field: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| {
            ValidationError::new(
                record_id,
                field,
                format!("is not an RFC 3339 timestamp: '{}'", value),
            )
        })
}
