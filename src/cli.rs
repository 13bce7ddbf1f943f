use crate::analytics::{AnalyticsConfig, ChapterGrouping};
use crate::database_factory::DatabaseConfig;
use crate::history::{DEFAULT_PAGE_SIZE, HistoryFilter, ReviewStatus};
use crate::records::{Difficulty, MistakeType, Subject};
use chrono::{FixedOffset, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_USER: &str = "local";

/// Track exam mistakes and see where revision time should go
#[derive(Parser, Debug, Clone)]
#[command(name = "mistake_tracker")]
#[command(about = "Log exam mistakes and analyse them", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, global = true, help = "Use in-memory database for testing")]
    pub test: bool,

    /// Custom database file path
    #[arg(long, global = true, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    /// Override current date for testing (YYYY-MM-DD format)
    #[arg(
        long,
        global = true,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    /// Offset used to decide which calendar day an instant falls on
    #[arg(
        long,
        global = true,
        value_name = "OFFSET",
        allow_hyphen_values = true,
        value_parser = parse_utc_offset,
        help = "UTC offset for day boundaries, e.g. +05:30 (default UTC)"
    )]
    pub utc_offset: Option<FixedOffset>,

    #[arg(long, global = true, default_value = DEFAULT_USER, help = "User whose records to use")]
    pub user: String,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Record a new mistake
    Log {
        #[arg(long)]
        subject: Subject,
        #[arg(long)]
        chapter: String,
        #[arg(long = "type", value_name = "TYPE")]
        mistake_type: MistakeType,
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a mistake as reviewed
    Review { id: String },
    /// Show the metrics dashboard
    Dashboard {
        #[arg(long, help = "Print the snapshot as JSON")]
        json: bool,
        #[arg(long, value_name = "DAYS", help = "Length of the daily series")]
        window_days: Option<usize>,
        #[arg(long, help = "Keep same-named chapters of different subjects apart")]
        compound_chapters: bool,
        #[arg(long, value_name = "FILE", help = "Read records from a JSON export instead of the database")]
        from_json: Option<PathBuf>,
    },
    /// Browse logged mistakes, newest first
    History {
        #[arg(long)]
        subject: Option<Subject>,
        #[arg(long = "type", value_name = "TYPE")]
        mistake_type: Option<MistakeType>,
        #[arg(long, default_value = "all")]
        status: ReviewStatus,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// List unreviewed mistakes, oldest first
    Revise,
    /// Set this week's review goal
    Goal {
        target: i64,
        #[arg(long)]
        text: Option<String>,
    },
    /// Manage study tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Show today's study plan
    Plan {
        #[arg(long)]
        compound_chapters: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TaskCommand {
    Add {
        #[arg(long)]
        subject: Subject,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value_t = 30)]
        minutes: u32,
        #[arg(long, value_name = "DATE", help = "Day to plan for (YYYY-MM-DD, default today)")]
        date: Option<String>,
    },
    Done { id: String },
    /// Mark a finished task as not done again
    Reopen { id: String },
    Remove { id: String },
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> Result<Option<NaiveDate>, String> {
        match &self.override_date {
            Some(date_str) => parse_date("--override-date", date_str).map(Some),
            None => Ok(None),
        }
    }

    pub fn database_config(&self) -> Result<DatabaseConfig, String> {
        let mut config = DatabaseConfig::default()
            .test_mode(self.test)
            .date_ymd(self.validate_override_date()?)
            .utc_offset(self.utc_offset);
        if let Some(path) = &self.db_path {
            config = config.path(path.to_string_lossy());
        }
        Ok(config)
    }

    pub fn analytics_config(&self) -> AnalyticsConfig {
        let mut config = AnalyticsConfig::default();
        if let Some(offset) = self.utc_offset {
            config = config.with_utc_offset(offset);
        }
        match &self.command {
            Command::Dashboard {
                window_days,
                compound_chapters,
                ..
            } => {
                if let Some(days) = window_days {
                    config = config.with_trailing_days(*days);
                }
                config.with_chapter_grouping(grouping(*compound_chapters))
            }
            Command::Plan { compound_chapters } => {
                config.with_chapter_grouping(grouping(*compound_chapters))
            }
            _ => config,
        }
    }
}

impl Command {
    /// The history filter and zero-based page for a `history` invocation
    pub fn history_query(&self) -> Option<(HistoryFilter, usize, usize)> {
        match self {
            Command::History {
                subject,
                mistake_type,
                status,
                search,
                page,
                page_size,
            } => Some((
                HistoryFilter {
                    subject: *subject,
                    mistake_type: *mistake_type,
                    status: *status,
                    search: search.clone(),
                },
                page.saturating_sub(1),
                *page_size,
            )),
            _ => None,
        }
    }
}

fn grouping(compound_chapters: bool) -> ChapterGrouping {
    if compound_chapters {
        ChapterGrouping::SubjectAndChapter
    } else {
        ChapterGrouping::ChapterOnly
    }
}

pub fn parse_date(flag: &str, date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        format!(
            "Invalid date format for {}: '{}'. Expected YYYY-MM-DD",
            flag, date_str
        )
    })
}

/// Parses `Z`, `UTC`, `+HH`, `+HH:MM` or `+HHMM` (and the `-` forms)
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "invalid offset".to_string());
    }

    let invalid = || format!("Invalid UTC offset '{}'. Expected +HH:MM or -HH:MM", value);
    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().map_err(|_| invalid())?, 0),
        4 => (
            digits[..2].parse::<i32>().map_err(|_| invalid())?,
            digits[2..].parse::<i32>().map_err(|_| invalid())?,
        ),
        _ => return Err(invalid()),
    };
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["mistake_tracker"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn test_parse_dashboard_defaults() {
        let args = parse(&["dashboard"]);
        assert!(!args.test);
        assert!(args.db_path.is_none());
        assert!(args.override_date.is_none());
        assert_eq!(args.user, DEFAULT_USER);
        assert_eq!(
            args.command,
            Command::Dashboard {
                json: false,
                window_days: None,
                compound_chapters: false,
                from_json: None,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["dashboard", "--test", "--db-path", "/tmp/test.db", "--no-color"]);
        assert!(args.test);
        assert!(args.no_color);
        assert_eq!(args.db_path.as_deref(), Some(PathBuf::from("/tmp/test.db").as_path()));
    }

    #[test]
    fn test_parse_log_command() {
        let args = parse(&[
            "log",
            "--subject",
            "physics",
            "--chapter",
            "Optics",
            "--type",
            "silly-mistake",
            "--notes",
            "Sign convention",
        ]);
        assert_eq!(
            args.command,
            Command::Log {
                subject: Subject::Physics,
                chapter: "Optics".to_string(),
                mistake_type: MistakeType::SillyMistake,
                difficulty: Difficulty::Medium,
                notes: Some("Sign convention".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_log_rejects_unknown_subject() {
        let result = Args::try_parse_from([
            "mistake_tracker",
            "log",
            "--subject",
            "biology",
            "--chapter",
            "Cells",
            "--type",
            "silly-mistake",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_task_add() {
        let args = parse(&["task", "add", "--subject", "chemistry", "--topic", "Redox drills"]);
        assert_eq!(
            args.command,
            Command::Task {
                action: TaskCommand::Add {
                    subject: Subject::Chemistry,
                    topic: "Redox drills".to_string(),
                    minutes: 30,
                    date: None,
                }
            }
        );
    }

    #[test]
    fn test_parse_task_reopen() {
        let args = parse(&["task", "reopen", "task-1"]);
        assert_eq!(
            args.command,
            Command::Task {
                action: TaskCommand::Reopen {
                    id: "task-1".to_string()
                }
            }
        );
    }

    #[test]
    fn test_history_query_is_zero_based() {
        let args = parse(&["history", "--status", "unreviewed", "--page", "2", "--search", "optic"]);
        let (filter, page, page_size) = args.command.history_query().unwrap();
        assert_eq!(filter.status, ReviewStatus::Unreviewed);
        assert_eq!(filter.search.as_deref(), Some("optic"));
        assert_eq!(page, 1);
        assert_eq!(page_size, DEFAULT_PAGE_SIZE);
        assert!(parse(&["revise"]).command.history_query().is_none());
    }

    #[test]
    fn test_validate_override_date_valid() {
        let args = parse(&["--override-date", "2024-01-15", "revise"]);
        let date = args.validate_override_date().unwrap();
        assert_eq!(date, Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
    }

    #[test]
    fn test_validate_override_date_invalid_format() {
        let args = parse(&["--override-date", "2024/01/15", "revise"]);
        let result = args.validate_override_date();
        assert!(result.unwrap_err().contains("Invalid date format"));
    }

    #[test]
    fn test_validate_override_date_invalid_date() {
        let args = parse(&["--override-date", "2024-13-01", "revise"]);
        assert!(args.validate_override_date().is_err());
        assert!(args.database_config().is_err());
    }

    #[test]
    fn test_database_config_from_args() {
        let args = parse(&["--test", "--override-date", "2024-12-31", "plan"]);
        let config = args.database_config().unwrap();
        assert_eq!(config.get_path(), ":memory:");
        assert_eq!(config.override_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_analytics_config_from_dashboard_flags() {
        let args = parse(&[
            "dashboard",
            "--window-days",
            "14",
            "--compound-chapters",
            "--utc-offset",
            "-08:00",
        ]);
        let config = args.analytics_config();
        assert_eq!(config.trailing_days, 14);
        assert_eq!(config.chapter_grouping, ChapterGrouping::SubjectAndChapter);
        assert_eq!(config.utc_offset.local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn test_parse_utc_offset_forms() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("+0530").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("-3").unwrap().local_minus_utc(), -10800);
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        assert!(parse_utc_offset("05:30").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("+05:75").is_err());
        assert!(parse_utc_offset("+5:3").is_err());
        assert!(parse_utc_offset("+ab").is_err());
        assert!(parse_utc_offset("").is_err());
    }
}
