//! Derived training metrics over parsed set records.
//!
//! Everything here is a pure function: no I/O, no state. Failure sets are
//! excluded from volume and rep totals, and empty input yields zero-valued
//! results rather than errors, because these numbers render directly in a
//! view.
//!
//! Weights are converted to a single display unit before aggregating, so a
//! log that mixes `lb` and `kg` entries still sums to one number.

use crate::{AggregateMetrics, SetRecord, WeightUnit};

/// Epley estimate for a single set: `weight * (1 + reps / 30)`
pub fn epley_one_rep_max(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + f64::from(reps) / 30.0)
}

/// Total volume (reps x weight) over working sets, in `unit`
pub fn total_volume(sets: &[SetRecord], unit: WeightUnit) -> f64 {
    sets.iter()
        .filter(|set| !set.is_failure)
        .map(|set| f64::from(set.reps) * set.weight_in(unit))
        .sum()
}

/// Total reps over working sets; failure sets contribute nothing
pub fn total_reps(sets: &[SetRecord]) -> u32 {
    sets.iter()
        .filter(|set| !set.is_failure)
        .map(|set| set.reps)
        .sum()
}

/// Volume-weighted average weight, or 0 when no reps were performed
pub fn average_weight(sets: &[SetRecord], unit: WeightUnit) -> f64 {
    let reps = total_reps(sets);
    if reps == 0 {
        return 0.0;
    }
    total_volume(sets, unit) / f64::from(reps)
}

/// Best per-set Epley estimate across working sets, or 0 when no set has
/// both positive reps and positive weight
pub fn estimated_one_rep_max(sets: &[SetRecord], unit: WeightUnit) -> f64 {
    sets.iter()
        .filter(|set| !set.is_failure && set.reps > 0 && set.weight > 0.0)
        .map(|set| epley_one_rep_max(set.weight_in(unit), set.reps))
        .fold(0.0, f64::max)
}

/// Heaviest weight lifted and the rep count achieved at that weight.
///
/// Ties on weight keep the higher rep count.
pub fn max_weight_and_reps(sets: &[SetRecord], unit: WeightUnit) -> (f64, u32) {
    let mut max_weight = 0.0;
    let mut reps_at_max = 0;

    for set in sets.iter().filter(|set| !set.is_failure) {
        let weight = set.weight_in(unit);
        if weight > max_weight {
            max_weight = weight;
            reps_at_max = set.reps;
        } else if weight == max_weight {
            reps_at_max = reps_at_max.max(set.reps);
        }
    }

    (max_weight, reps_at_max)
}

/// Compute all aggregate metrics for a sequence of sets in one display unit
pub fn compute_metrics(sets: &[SetRecord], unit: WeightUnit) -> AggregateMetrics {
    let (max_weight, max_reps_at_max_weight) = max_weight_and_reps(sets, unit);

    AggregateMetrics {
        total_volume: total_volume(sets, unit),
        average_weight: average_weight(sets, unit),
        total_reps: total_reps(sets),
        estimated_one_rep_max: estimated_one_rep_max(sets, unit),
        max_weight,
        max_reps_at_max_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_sets;

    #[test]
    fn test_metrics_over_mixed_working_and_failure_sets() {
        let sets = parse_sets("2x8x155lb; 1xfailure", WeightUnit::Pound).unwrap();

        assert_eq!(total_reps(&sets), 16);
        assert_eq!(total_volume(&sets, WeightUnit::Pound), 2480.0);
    }

    #[test]
    fn test_empty_sets_yield_zero_metrics() {
        let metrics = compute_metrics(&[], WeightUnit::Pound);
        assert_eq!(metrics, AggregateMetrics::default());
    }

    #[test]
    fn test_all_failure_sets_yield_zero_metrics() {
        let sets = parse_sets("3xfailure", WeightUnit::Pound).unwrap();
        let metrics = compute_metrics(&sets, WeightUnit::Pound);

        assert_eq!(metrics.total_reps, 0);
        assert_eq!(metrics.total_volume, 0.0);
        assert_eq!(metrics.average_weight, 0.0);
        assert_eq!(metrics.estimated_one_rep_max, 0.0);
    }

    #[test]
    fn test_epley_estimate() {
        // 135 * (1 + 10/30) = 180
        assert!((epley_one_rep_max(135.0, 10) - 180.0).abs() < 1e-9);

        let sets = parse_sets("1x10x135lb", WeightUnit::Pound).unwrap();
        assert!((estimated_one_rep_max(&sets, WeightUnit::Pound) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_rep_max_takes_best_set() {
        let sets = parse_sets("1x10x135lb; 1x3x185lb", WeightUnit::Pound).unwrap();
        // 185 * (1 + 3/30) = 203.5 beats 180
        assert!((estimated_one_rep_max(&sets, WeightUnit::Pound) - 203.5).abs() < 1e-9);
    }

    #[test]
    fn test_average_weight_is_volume_over_reps() {
        let sets = parse_sets("3x10x135lb; 2x8x155lb", WeightUnit::Pound).unwrap();
        let expected = (30.0 * 135.0 + 16.0 * 155.0) / 46.0;
        assert!((average_weight(&sets, WeightUnit::Pound) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_kilogram_sets_convert_into_pound_totals() {
        let sets = parse_sets("1x10x100kg", WeightUnit::Pound).unwrap();
        let volume = total_volume(&sets, WeightUnit::Pound);
        assert!((volume - 10.0 * 220.462).abs() < 1e-6);

        // And the other direction
        let volume_kg = total_volume(&sets, WeightUnit::Kilogram);
        assert!((volume_kg - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_weight_ties_keep_higher_reps() {
        let sets = parse_sets("1x3x200lb; 1x5x200lb; 1x8x155lb", WeightUnit::Pound).unwrap();
        let (weight, reps) = max_weight_and_reps(&sets, WeightUnit::Pound);
        assert_eq!(weight, 200.0);
        assert_eq!(reps, 5);
    }

    #[test]
    fn test_bodyweight_sets_count_reps_but_not_volume() {
        let sets = parse_sets("3x12", WeightUnit::Pound).unwrap();
        assert_eq!(total_reps(&sets), 36);
        assert_eq!(total_volume(&sets, WeightUnit::Pound), 0.0);
        assert_eq!(estimated_one_rep_max(&sets, WeightUnit::Pound), 0.0);
    }
}
