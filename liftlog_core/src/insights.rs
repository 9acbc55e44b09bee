//! Rule-based training insights derived from the workout log.
//!
//! Overview stats, weekly volume, intensity zones, recovery warnings,
//! balance reports and personal records. All functions are pure over entry
//! slices plus configured thresholds; empty input yields empty or
//! zero-valued results, never a panic or a division by zero, because every
//! number here ends up in a view.
//!
//! Per-muscle breakdowns attribute an entry's full volume to each of its
//! expanded groups, while whole-log totals count every entry exactly once.

use crate::{metrics, muscles, Config, WeightUnit, WorkoutEntry};
use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Date-ordered (date, value) series for progression charts
pub type DailySeries = Vec<(NaiveDate, f64)>;

// ============================================================================
// Overview
// ============================================================================

/// Headline numbers for the dashboard view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverviewStats {
    /// Distinct calendar days with at least one entry
    pub workout_days: usize,
    pub total_entries: usize,
    /// Entries per calendar day over the observed span
    pub entries_per_day: f64,
    /// Mean distinct muscle groups trained per ISO week
    pub muscle_groups_per_week: f64,
    pub average_rpe: f64,
}

pub fn overview(entries: &[WorkoutEntry]) -> OverviewStats {
    if entries.is_empty() {
        return OverviewStats::default();
    }

    let days: BTreeSet<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
    let (Some(&first), Some(&last)) = (days.iter().next(), days.iter().next_back()) else {
        return OverviewStats::default();
    };
    let span_days = (last - first).num_days() + 1;

    let mut groups_per_week: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for entry in entries {
        groups_per_week
            .entry(week_start(entry.date))
            .or_default()
            .extend(entry.muscle_groups.iter().map(String::as_str));
    }
    let muscle_groups_per_week = groups_per_week
        .values()
        .map(|groups| groups.len() as f64)
        .sum::<f64>()
        / groups_per_week.len() as f64;

    OverviewStats {
        workout_days: days.len(),
        total_entries: entries.len(),
        entries_per_day: entries.len() as f64 / span_days as f64,
        muscle_groups_per_week,
        average_rpe: entries.iter().map(|e| f64::from(e.rpe)).sum::<f64>() / entries.len() as f64,
    }
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

// ============================================================================
// Volume Breakdowns
// ============================================================================

/// Weekly training volume per muscle group, keyed by (week start, group)
pub fn weekly_volume(
    entries: &[WorkoutEntry],
    unit: WeightUnit,
) -> BTreeMap<(NaiveDate, String), f64> {
    let mut totals = BTreeMap::new();

    for entry in entries {
        let volume = metrics::total_volume(&entry.sets, unit);
        for group in &entry.muscle_groups {
            *totals
                .entry((week_start(entry.date), group.clone()))
                .or_insert(0.0) += volume;
        }
    }

    totals
}

/// Entry counts per muscle group; `grouped` collapses onto coarse groups
pub fn muscle_distribution(
    entries: &[WorkoutEntry],
    grouped: bool,
    config: &Config,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();

    for entry in entries {
        for group in &entry.muscle_groups {
            let name = if grouped {
                muscles::grouped_muscle_label(group, config)
            } else {
                group.clone()
            };
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    counts
}

/// How a muscle group's share of total volume reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolumeRemark {
    VeryHigh,
    Low,
    Good,
    Balanced,
}

/// One muscle group's slice of the training volume
#[derive(Clone, Debug, PartialEq)]
pub struct MuscleShare {
    pub muscle_group: String,
    pub volume: f64,
    pub share_percent: f64,
    pub remark: VolumeRemark,
}

/// Per-muscle-group volume shares, sorted biggest first
pub fn muscle_balance(
    entries: &[WorkoutEntry],
    unit: WeightUnit,
    config: &Config,
) -> Vec<MuscleShare> {
    let mut volumes: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries {
        let volume = metrics::total_volume(&entry.sets, unit);
        for group in &entry.muscle_groups {
            *volumes.entry(group.as_str()).or_insert(0.0) += volume;
        }
    }

    let total: f64 = volumes.values().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<MuscleShare> = volumes
        .into_iter()
        .map(|(group, volume)| {
            let share_percent = volume / total * 100.0;
            let remark = if share_percent > config.analysis.high_volume_threshold {
                VolumeRemark::VeryHigh
            } else if share_percent < config.analysis.low_volume_threshold {
                VolumeRemark::Low
            } else if share_percent > 25.0 {
                VolumeRemark::Good
            } else {
                VolumeRemark::Balanced
            };
            MuscleShare {
                muscle_group: group.to_string(),
                volume,
                share_percent,
                remark,
            }
        })
        .collect();

    shares.sort_by(|a, b| {
        b.share_percent
            .partial_cmp(&a.share_percent)
            .unwrap_or(Ordering::Equal)
    });
    shares
}

// ============================================================================
// Intensity and Recovery
// ============================================================================

/// RPE intensity zone
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RpeZone {
    Easy,
    Moderate,
    Hard,
}

impl RpeZone {
    pub fn of(rpe: u8) -> Self {
        match rpe {
            0..=6 => RpeZone::Easy,
            7..=8 => RpeZone::Moderate,
            _ => RpeZone::Hard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RpeZone::Easy => "Easy (<7)",
            RpeZone::Moderate => "Moderate (7-8)",
            RpeZone::Hard => "Hard (>8)",
        }
    }
}

/// Entry counts per intensity zone
pub fn intensity_zones(entries: &[WorkoutEntry]) -> BTreeMap<RpeZone, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(RpeZone::of(entry.rpe)).or_insert(0) += 1;
    }
    counts
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryStatus {
    Ok,
    Elevated,
    Warning,
}

/// Consecutive high-RPE streak over the date-ordered log
#[derive(Clone, Debug, PartialEq)]
pub struct RecoveryReport {
    pub max_consecutive_high_rpe: usize,
    pub status: RecoveryStatus,
}

/// Longest run of consecutive entries above the high-RPE threshold.
///
/// Entries are considered in date order regardless of file order.
pub fn recovery(entries: &[WorkoutEntry], config: &Config) -> RecoveryReport {
    let mut ordered: Vec<&WorkoutEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.date);

    let mut longest = 0usize;
    let mut run = 0usize;
    for entry in ordered {
        if f64::from(entry.rpe) > config.analysis.high_rpe_threshold {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let status = if longest >= config.analysis.consecutive_high_rpe_warning {
        RecoveryStatus::Warning
    } else if longest >= 2 {
        RecoveryStatus::Elevated
    } else {
        RecoveryStatus::Ok
    };

    RecoveryReport {
        max_consecutive_high_rpe: longest,
        status,
    }
}

// ============================================================================
// Exercise Records
// ============================================================================

/// Exercises absent from the last configured number of weeks, relative to
/// the newest entry date
pub fn undertrained_exercises(entries: &[WorkoutEntry], config: &Config) -> Vec<String> {
    let Some(latest) = entries.iter().map(|entry| entry.date).max() else {
        return Vec::new();
    };
    let cutoff = latest - Duration::weeks(config.analysis.undertrained_weeks);

    let recent: BTreeSet<&str> = entries
        .iter()
        .filter(|entry| entry.date >= cutoff)
        .map(|entry| entry.exercise.as_str())
        .collect();

    let all: BTreeSet<&str> = entries.iter().map(|entry| entry.exercise.as_str()).collect();

    all.difference(&recent).map(|name| name.to_string()).collect()
}

/// Most frequently trained exercises, by session count
pub fn top_exercises(entries: &[WorkoutEntry], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.exercise.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// A best reps-at-weight record for an exercise
#[derive(Clone, Debug, PartialEq)]
pub struct SetRepRecord {
    pub exercise: String,
    pub weight: f64,
    pub max_reps: u32,
    /// `weight * max_reps`, the ranking score
    pub score: f64,
}

/// Best rep counts at each weight per exercise, ranked by `weight * reps`
pub fn set_rep_records(
    entries: &[WorkoutEntry],
    unit: WeightUnit,
    limit: usize,
) -> Vec<SetRepRecord> {
    // Keyed on the weight's bit pattern; weights at the same nominal value
    // convert identically so this groups them correctly
    let mut best: HashMap<(&str, u64), (f64, u32)> = HashMap::new();

    for entry in entries {
        for set in &entry.sets {
            if set.is_failure || set.reps == 0 {
                continue;
            }
            let weight = set.weight_in(unit);
            if weight <= 0.0 {
                continue;
            }
            let slot = best
                .entry((entry.exercise.as_str(), weight.to_bits()))
                .or_insert((weight, 0));
            slot.1 = slot.1.max(set.reps);
        }
    }

    let mut records: Vec<SetRepRecord> = best
        .into_iter()
        .map(|((exercise, _), (weight, max_reps))| SetRepRecord {
            exercise: exercise.to_string(),
            weight,
            max_reps,
            score: weight * f64::from(max_reps),
        })
        .collect();

    records.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });
    records.truncate(limit);
    records
}

/// Best estimated one-rep max per tracked compound lift present in the log
pub fn compound_lift_records(entries: &[WorkoutEntry], unit: WeightUnit) -> Vec<(String, f64)> {
    let mut best: BTreeMap<String, f64> = BTreeMap::new();

    for entry in entries {
        let name = entry.exercise.to_lowercase();
        if !muscles::COMPOUND_LIFTS.iter().any(|lift| name.contains(lift)) {
            continue;
        }
        let one_rm = metrics::estimated_one_rep_max(&entry.sets, unit);
        if one_rm <= 0.0 {
            continue;
        }
        let slot = best.entry(entry.exercise.clone()).or_insert(0.0);
        if one_rm > *slot {
            *slot = one_rm;
        }
    }

    best.into_iter().collect()
}

/// Per-exercise summary for the analysis view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExerciseSummary {
    pub exercise: String,
    pub sessions: usize,
    pub average_rpe: f64,
    /// Highest per-entry average weight
    pub best_average_weight: f64,
    pub best_one_rep_max: f64,
    pub total_volume: f64,
}

pub fn exercise_summary(
    entries: &[WorkoutEntry],
    exercise: &str,
    unit: WeightUnit,
) -> ExerciseSummary {
    let sessions: Vec<&WorkoutEntry> = entries
        .iter()
        .filter(|entry| entry.exercise.eq_ignore_ascii_case(exercise))
        .collect();

    if sessions.is_empty() {
        return ExerciseSummary {
            exercise: exercise.to_string(),
            ..Default::default()
        };
    }

    let mut best_average_weight = 0.0f64;
    let mut best_one_rep_max = 0.0f64;
    let mut total_volume = 0.0f64;
    for entry in &sessions {
        best_average_weight = best_average_weight.max(metrics::average_weight(&entry.sets, unit));
        best_one_rep_max = best_one_rep_max.max(metrics::estimated_one_rep_max(&entry.sets, unit));
        total_volume += metrics::total_volume(&entry.sets, unit);
    }

    ExerciseSummary {
        exercise: sessions[0].exercise.clone(),
        sessions: sessions.len(),
        average_rpe: sessions.iter().map(|e| f64::from(e.rpe)).sum::<f64>() / sessions.len() as f64,
        best_average_weight,
        best_one_rep_max,
        total_volume,
    }
}

// ============================================================================
// Progression Series
// ============================================================================

/// Total volume per calendar day
pub fn daily_volume_series(entries: &[WorkoutEntry], unit: WeightUnit) -> DailySeries {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.date).or_insert(0.0) += metrics::total_volume(&entry.sets, unit);
    }
    totals.into_iter().collect()
}

/// Mean RPE per calendar day
pub fn daily_rpe_series(entries: &[WorkoutEntry]) -> DailySeries {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        let slot = sums.entry(entry.date).or_insert((0.0, 0));
        slot.0 += f64::from(entry.rpe);
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}

/// Mean per-entry average weight per calendar day, skipping days where no
/// reps were performed
pub fn daily_avg_weight_series(entries: &[WorkoutEntry], unit: WeightUnit) -> DailySeries {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        if metrics::total_reps(&entry.sets) == 0 {
            continue;
        }
        let slot = sums.entry(entry.date).or_insert((0.0, 0));
        slot.0 += metrics::average_weight(&entry.sets, unit);
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}
