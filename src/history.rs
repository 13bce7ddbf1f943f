use crate::records::{MistakeRecord, MistakeType, Subject};
use serde::Serialize;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ReviewStatus {
    #[default]
    All,
    Reviewed,
    Unreviewed,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::All => "all",
            ReviewStatus::Reviewed => "reviewed",
            ReviewStatus::Unreviewed => "unreviewed",
        }
    }

    fn admits(&self, record: &MistakeRecord) -> bool {
        match self {
            ReviewStatus::All => true,
            ReviewStatus::Reviewed => record.is_reviewed,
            ReviewStatus::Unreviewed => !record.is_reviewed,
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(ReviewStatus::All),
            "reviewed" => Ok(ReviewStatus::Reviewed),
            "unreviewed" => Ok(ReviewStatus::Unreviewed),
            other => Err(format!(
                "unknown status '{}', expected all, reviewed or unreviewed",
                other
            )),
        }
    }
}

/// Criteria for the history listing; every unset criterion matches all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub subject: Option<Subject>,
    pub mistake_type: Option<MistakeType>,
    pub status: ReviewStatus,
    /// Case-insensitive substring matched against chapter and notes
    pub search: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &MistakeRecord) -> bool {
        if self.subject.is_some_and(|subject| subject != record.subject) {
            return false;
        }
        if self
            .mistake_type
            .is_some_and(|kind| kind != record.mistake_type)
        {
            return false;
        }
        if !self.status.admits(record) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                record.chapter.to_lowercase().contains(&needle)
                    || record
                        .notes
                        .as_deref()
                        .is_some_and(|notes| notes.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// One page of the filtered history, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage<'a> {
    pub items: Vec<&'a MistakeRecord>,
    /// Zero-based page index
    pub page: usize,
    pub page_size: usize,
    /// Matching records across all pages
    pub total: usize,
    pub total_pages: usize,
    /// Review status the page was filtered on
    pub status: ReviewStatus,
}

pub fn history_page<'a>(
    records: &'a [MistakeRecord],
    filter: &HistoryFilter,
    page: usize,
    page_size: usize,
) -> HistoryPage<'a> {
    let page_size = page_size.max(1);
    let matching = newest_first(records.iter().filter(|record| filter.matches(record)));
    let total = matching.len();

    let items = matching
        .into_iter()
        .skip(page.saturating_mul(page_size))
        .take(page_size)
        .collect();

    HistoryPage {
        items,
        page,
        page_size,
        total,
        total_pages: total.div_ceil(page_size),
        status: filter.status,
    }
}

/// The most recently logged mistakes, newest first
pub fn recent_mistakes(records: &[MistakeRecord], limit: usize) -> Vec<&MistakeRecord> {
    let mut recent = newest_first(records.iter());
    recent.truncate(limit);
    recent
}

/// Unreviewed mistakes in the order they should be revised: oldest first
pub fn revision_queue(records: &[MistakeRecord]) -> Vec<&MistakeRecord> {
    let mut queue: Vec<&MistakeRecord> = records.iter().filter(|r| !r.is_reviewed).collect();
    queue.sort_by_key(|record| record.created_at);
    queue
}

fn newest_first<'a>(records: impl Iterator<Item = &'a MistakeRecord>) -> Vec<&'a MistakeRecord> {
    let mut sorted: Vec<&MistakeRecord> = records.collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}
