//! Core domain types for the Lift Log workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Weight units and their conversion
//! - Set records parsed from the compact notation
//! - Workout entries (one per CSV row)
//! - Aggregate metrics derived from sets

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pounds in one kilogram
pub const POUNDS_PER_KILOGRAM: f64 = 2.20462;

// ============================================================================
// Weight Units
// ============================================================================

/// Unit a set's weight was recorded in
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    #[serde(alias = "lb", alias = "lbs")]
    Pound,
    #[serde(alias = "kg", alias = "kgs")]
    Kilogram,
}

impl WeightUnit {
    /// Convert a weight recorded in this unit into `target`
    pub fn convert(self, weight: f64, target: WeightUnit) -> f64 {
        match (self, target) {
            (WeightUnit::Pound, WeightUnit::Kilogram) => weight / POUNDS_PER_KILOGRAM,
            (WeightUnit::Kilogram, WeightUnit::Pound) => weight * POUNDS_PER_KILOGRAM,
            _ => weight,
        }
    }

    /// Notation suffix for this unit (`lb` / `kg`)
    pub fn suffix(self) -> &'static str {
        match self {
            WeightUnit::Pound => "lb",
            WeightUnit::Kilogram => "kg",
        }
    }
}

// ============================================================================
// Set Records
// ============================================================================

/// A single performed set of an exercise.
///
/// Invariant: when `is_failure` is set the set was taken to failure and
/// `reps`/`weight` are zero; such records are excluded from volume and rep
/// totals.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    pub reps: u32,
    pub weight: f64,
    pub unit: WeightUnit,
    pub is_failure: bool,
}

impl SetRecord {
    /// A working set of `reps` at `weight`
    pub fn working(reps: u32, weight: f64, unit: WeightUnit) -> Self {
        Self {
            reps,
            weight,
            unit,
            is_failure: false,
        }
    }

    /// A set taken to failure
    pub fn failure() -> Self {
        Self {
            reps: 0,
            weight: 0.0,
            unit: WeightUnit::default(),
            is_failure: true,
        }
    }

    /// This set's weight expressed in `target`
    pub fn weight_in(&self, target: WeightUnit) -> f64 {
        self.unit.convert(self.weight, target)
    }
}

// ============================================================================
// Workout Entries
// ============================================================================

/// One logged workout entry, created from a single CSV row.
///
/// Immutable once built: the sets notation is parsed eagerly so malformed
/// rows surface at construction rather than downstream in analytics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    pub date: NaiveDate,
    pub exercise: String,
    /// Raw `Sets x Reps x Weight` column value, kept for round-tripping
    pub sets_notation: String,
    pub sets: Vec<SetRecord>,
    /// Rate of Perceived Exertion, 1-10
    pub rpe: u8,
    /// Raw `Muscle Group` column value, possibly a compound label
    pub muscle_group: String,
    /// Individual groups expanded from a compound label
    pub muscle_groups: Vec<String>,
}

impl WorkoutEntry {
    /// Build a validated entry.
    ///
    /// Fails with [`Error::MalformedEntry`] when the sets notation does not
    /// parse and [`Error::InvalidEntry`] when the exercise name is empty or
    /// RPE is outside 1-10.
    pub fn new(
        date: NaiveDate,
        exercise: &str,
        sets_notation: &str,
        rpe: u8,
        muscle_group: &str,
        default_unit: WeightUnit,
    ) -> Result<Self> {
        let exercise = exercise.trim();
        if exercise.is_empty() {
            return Err(Error::InvalidEntry("exercise name is empty".into()));
        }
        if !(1..=10).contains(&rpe) {
            return Err(Error::InvalidEntry(format!("RPE {rpe} is outside 1-10")));
        }

        let sets = crate::parser::parse_sets(sets_notation, default_unit)?;
        let muscle_group = muscle_group.trim();

        Ok(Self {
            date,
            exercise: exercise.to_string(),
            sets_notation: sets_notation.trim().to_string(),
            sets,
            rpe,
            muscle_groups: crate::muscles::expand_muscle_groups(muscle_group),
            muscle_group: muscle_group.to_string(),
        })
    }

    /// Aggregate metrics for this entry's sets in the given display unit
    pub fn metrics(&self, unit: WeightUnit) -> AggregateMetrics {
        crate::metrics::compute_metrics(&self.sets, unit)
    }
}

// ============================================================================
// Aggregate Metrics
// ============================================================================

/// Derived training metrics over a sequence of sets.
///
/// Recomputed on demand, never stored. All fields are zero for an empty or
/// all-failure input.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateMetrics {
    pub total_volume: f64,
    pub average_weight: f64,
    pub total_reps: u32,
    pub estimated_one_rep_max: f64,
    pub max_weight: f64,
    pub max_reps_at_max_weight: u32,
}
