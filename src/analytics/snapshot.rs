use crate::records::{MistakeType, Subject};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Label used for the top mistake type when there are no records
pub const NO_TOP_TYPE: &str = "none";

/// A count table that remembers the order in which keys were first seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally<K> {
    entries: Vec<TallyEntry<K>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyEntry<K> {
    pub name: K,
    pub count: u32,
}

impl<K: PartialEq> Tally<K> {
    pub fn new() -> Self {
        Tally {
            entries: Vec::new(),
        }
    }

    pub fn increment(&mut self, key: K) {
        match self.entries.iter_mut().find(|entry| entry.name == key) {
            Some(entry) => entry.count += 1,
            None => self.entries.push(TallyEntry { name: key, count: 1 }),
        }
    }

    pub fn get(&self, key: &K) -> u32 {
        self.entries
            .iter()
            .find(|entry| &entry.name == key)
            .map_or(0, |entry| entry.count)
    }

    pub fn entries(&self) -> &[TallyEntry<K>] {
        &self.entries
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key with the highest count; on a tie the first-seen key wins
    pub fn most_frequent(&self) -> Option<&K> {
        self.entries
            .iter()
            .fold(None::<&TallyEntry<K>>, |best, entry| match best {
                Some(b) if b.count >= entry.count => Some(b),
                _ => Some(entry),
            })
            .map(|entry| &entry.name)
    }
}

impl<K: PartialEq> Default for Tally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.increment(key);
        }
        tally
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakArea {
    pub chapter: String,
    pub subject: Subject,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub goal_text: String,
    pub target_count: i64,
    pub current_count: u32,
    /// Always within 0..=100
    pub percent_complete: u8,
}

impl GoalProgress {
    pub fn is_complete(&self) -> bool {
        i64::from(self.current_count) >= self.target_count
    }
}

/// Everything the dashboard and analytics views display for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_count: u32,
    pub week_count: u32,
    pub streak_days: u32,
    #[serde(serialize_with = "serialize_top_type")]
    pub top_mistake_type: Option<MistakeType>,
    pub subject_counts: Tally<Subject>,
    pub type_counts: Tally<MistakeType>,
    pub daily_counts: Vec<DailyCount>,
    pub weak_areas: Vec<WeakArea>,
    pub goal_progress: Option<GoalProgress>,
}

impl MetricsSnapshot {
    pub fn top_mistake_type_label(&self) -> &'static str {
        self.top_mistake_type
            .as_ref()
            .map_or(NO_TOP_TYPE, MistakeType::as_str)
    }
}

fn serialize_top_type<S: Serializer>(
    top: &Option<MistakeType>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(top.as_ref().map_or(NO_TOP_TYPE, MistakeType::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_keeps_first_seen_order() {
        let tally: Tally<&str> = ["b", "a", "b", "c", "a", "b"].into_iter().collect();
        let names: Vec<_> = tally.entries().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(tally.get(&"b"), 3);
        assert_eq!(tally.get(&"z"), 0);
        assert_eq!(tally.total(), 6);
    }

    #[test]
    fn test_most_frequent_prefers_first_seen_on_tie() {
        let tally: Tally<&str> = ["x", "y", "y", "x"].into_iter().collect();
        assert_eq!(tally.most_frequent(), Some(&"x"));

        let empty: Tally<&str> = Tally::new();
        assert_eq!(empty.most_frequent(), None);
    }

    #[test]
    fn test_goal_completion_is_derived() {
        let mut progress = GoalProgress {
            goal_text: "Review 10".to_string(),
            target_count: 10,
            current_count: 7,
            percent_complete: 70,
        };
        assert!(!progress.is_complete());
        progress.current_count = 10;
        assert!(progress.is_complete());
    }

    #[test]
    fn test_top_type_serializes_sentinel() {
        let snapshot = MetricsSnapshot {
            total_count: 0,
            week_count: 0,
            streak_days: 0,
            top_mistake_type: None,
            subject_counts: Tally::new(),
            type_counts: Tally::new(),
            daily_counts: Vec::new(),
            weak_areas: Vec::new(),
            goal_progress: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["top_mistake_type"], "none");
        assert_eq!(json["subject_counts"], serde_json::json!([]));
        assert_eq!(snapshot.top_mistake_type_label(), "none");
    }
}
