use crate::analytics::snapshot::WeakArea;
use crate::records::MistakeRecord;

/// How records are grouped into chapters for ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChapterGrouping {
    /// Group by chapter name alone. A name reused by two subjects collapses
    /// into one entry attributed to the subject seen first.
    #[default]
    ChapterOnly,
    /// Group by (subject, chapter), keeping same-named chapters apart
    SubjectAndChapter,
}

/// Which records take part in a chapter ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFilter {
    UnreviewedOnly,
    All,
}

impl ReviewFilter {
    fn admits(&self, record: &MistakeRecord) -> bool {
        match self {
            ReviewFilter::UnreviewedOnly => !record.is_reviewed,
            ReviewFilter::All => true,
        }
    }
}

/// Rank chapters by mistake count, highest first, keeping at most `limit`.
///
/// Ties keep the order in which chapters were first encountered.
pub fn rank_chapters(
    records: &[MistakeRecord],
    filter: ReviewFilter,
    grouping: ChapterGrouping,
    limit: usize,
) -> Vec<WeakArea> {
    let mut ranked: Vec<WeakArea> = Vec::new();

    for record in records.iter().filter(|record| filter.admits(record)) {
        let existing = ranked.iter_mut().find(|area| match grouping {
            ChapterGrouping::ChapterOnly => area.chapter == record.chapter,
            ChapterGrouping::SubjectAndChapter => {
                area.chapter == record.chapter && area.subject == record.subject
            }
        });

        match existing {
            Some(area) => area.count += 1,
            None => ranked.push(WeakArea {
                chapter: record.chapter.clone(),
                subject: record.subject,
                count: 1,
            }),
        }
    }

    // sort_by is stable, which preserves first-encountered order on ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Chapters with the most unreviewed mistakes
pub fn weak_areas(
    records: &[MistakeRecord],
    grouping: ChapterGrouping,
    limit: usize,
) -> Vec<WeakArea> {
    rank_chapters(records, ReviewFilter::UnreviewedOnly, grouping, limit)
}
