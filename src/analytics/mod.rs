pub mod aggregate;
pub mod buckets;
pub mod dashboard;
pub mod goal;
pub mod snapshot;
pub mod streak;
pub mod weak_areas;

use chrono::{FixedOffset, Offset, Utc};

pub use buckets::DayBucketer;
pub use dashboard::Dashboard;
pub use snapshot::{DailyCount, GoalProgress, MetricsSnapshot, Tally, TallyEntry, WeakArea};
pub use weak_areas::{ChapterGrouping, ReviewFilter};

pub const DEFAULT_TRAILING_DAYS: usize = 30;
pub const DEFAULT_WEAK_AREA_LIMIT: usize = 5;
pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 7;

/// Tunables for one analytics computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Offset used to turn instants into calendar days
    pub utc_offset: FixedOffset,
    /// Length of the zero-filled daily series
    pub trailing_days: usize,
    pub weak_area_limit: usize,
    /// Look-back span for the "this week" count
    pub recent_window_days: i64,
    pub chapter_grouping: ChapterGrouping,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            utc_offset: Utc.fix(),
            trailing_days: DEFAULT_TRAILING_DAYS,
            weak_area_limit: DEFAULT_WEAK_AREA_LIMIT,
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
            chapter_grouping: ChapterGrouping::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_trailing_days(mut self, days: usize) -> Self {
        self.trailing_days = days;
        self
    }

    pub fn with_weak_area_limit(mut self, limit: usize) -> Self {
        self.weak_area_limit = limit;
        self
    }

    pub fn with_chapter_grouping(mut self, grouping: ChapterGrouping) -> Self {
        self.chapter_grouping = grouping;
        self
    }

    pub fn bucketer(&self) -> DayBucketer {
        DayBucketer::new(self.utc_offset)
    }
}
