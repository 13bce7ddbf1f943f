use crate::database::Database;
use crate::date_provider::{DateProvider, OverrideDateProvider, SystemDateProvider};
use crate::error::Result;
use chrono::{FixedOffset, NaiveDate};
use log::debug;
use std::sync::Arc;

pub const DEFAULT_DB_PATH: &str = "mistake_tracker.db";

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Whether to use in-memory database
    pub is_test_mode: bool,
    /// Custom database file path (ignored if in test mode)
    pub custom_path: Option<String>,
    /// Pin "today" to this date while keeping the wall-clock time of day
    pub override_date: Option<NaiveDate>,
    /// Offset at which the override date is "today" (UTC when unset)
    pub utc_offset: Option<FixedOffset>,
}

impl DatabaseConfig {
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.is_test_mode = enabled;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.custom_path = Some(path.into());
        self
    }

    pub fn date_ymd(mut self, date: Option<NaiveDate>) -> Self {
        self.override_date = date;
        self
    }

    pub fn utc_offset(mut self, offset: Option<FixedOffset>) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Gets the effective database path
    pub fn get_path(&self) -> &str {
        if self.is_test_mode {
            ":memory:"
        } else {
            self.custom_path.as_deref().unwrap_or(DEFAULT_DB_PATH)
        }
    }

    pub fn date_provider(&self) -> Arc<dyn DateProvider> {
        match self.override_date {
            Some(date) => match self.utc_offset {
                Some(offset) => Arc::new(OverrideDateProvider::with_offset(date, offset)),
                None => Arc::new(OverrideDateProvider::new(date)),
            },
            None => Arc::new(SystemDateProvider),
        }
    }
}

/// Factory for creating Database instances
pub struct DatabaseFactory;

impl DatabaseFactory {
    /// Creates a database with the specified configuration
    pub fn create(config: &DatabaseConfig) -> Result<Database> {
        let path = config.get_path();
        debug!(
            "Opening database at {} (override date: {:?})",
            path, config.override_date
        );
        Database::with_date_provider(path, config.date_provider())
    }
}
