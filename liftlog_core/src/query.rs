//! Filtering and ordering of workout entries for history views.

use crate::{metrics, WeightUnit, WorkoutEntry};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Conjunctive filter over workout entries. Empty fields match everything.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
    pub muscle_group: Option<String>,
    pub exercise: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &WorkoutEntry) -> bool {
        if let Some(ref muscle) = self.muscle_group {
            // A compound label matches on the whole label or any expanded group
            let hit = entry.muscle_group.eq_ignore_ascii_case(muscle)
                || entry
                    .muscle_groups
                    .iter()
                    .any(|group| group.eq_ignore_ascii_case(muscle));
            if !hit {
                return false;
            }
        }

        if let Some(ref exercise) = self.exercise {
            if !entry.exercise.eq_ignore_ascii_case(exercise) {
                return false;
            }
        }

        if let Some(from) = self.from {
            if entry.date < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if entry.date > to {
                return false;
            }
        }

        true
    }
}

/// Ordering for history listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    Exercise,
    Rpe,
    Volume,
}

/// Collect the entries matched by `filter`, preserving file order
pub fn filter_entries<'a>(
    entries: &'a [WorkoutEntry],
    filter: &EntryFilter,
) -> Vec<&'a WorkoutEntry> {
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}

/// Stable-sort a filtered view by the given key.
///
/// `Rpe` and `Volume` sort descending (biggest first), matching how history
/// views surface them.
pub fn sort_entries(entries: &mut [&WorkoutEntry], key: SortKey, unit: WeightUnit) {
    match key {
        SortKey::DateDesc => entries.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::DateAsc => entries.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::Exercise => entries.sort_by(|a, b| a.exercise.cmp(&b.exercise)),
        SortKey::Rpe => entries.sort_by(|a, b| b.rpe.cmp(&a.rpe)),
        SortKey::Volume => entries.sort_by(|a, b| {
            let volume_a = metrics::total_volume(&a.sets, unit);
            let volume_b = metrics::total_volume(&b.sets, unit);
            volume_b.partial_cmp(&volume_a).unwrap_or(Ordering::Equal)
        }),
    }
}
