use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Calculate the number of consecutive days with at least one logged mistake.
///
/// The run must end today or yesterday; anything older means the streak is
/// already broken and 0 is returned.
pub fn consecutive_days<I>(activity_days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    // Distinct days, most recent first
    let days: BTreeSet<NaiveDate> = activity_days.into_iter().collect();
    let mut descending = days.into_iter().rev();

    let Some(most_recent) = descending.next() else {
        return 0;
    };

    let yesterday = today.pred_opt();
    if most_recent != today && Some(most_recent) != yesterday {
        return 0;
    }

    let mut streak = 1;
    let mut previous = most_recent;
    for day in descending {
        match (previous - day).num_days() {
            0 => {}
            1 => streak += 1,
            _ => break,
        }
        previous = day;
    }

    streak
}
