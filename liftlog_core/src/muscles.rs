//! Muscle-group catalog: compound-label expansion and coarse grouping.
//!
//! Workout rows may tag a compound label like `Back/Biceps` or
//! `Posterior Chain (Glutes/Hamstrings/Back)`. Analytics want both the
//! individual groups and a coarse grouped view (Biceps and Triceps roll up
//! into Arms), so this module provides the expansion and the grouping table.

use crate::Config;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical muscle groups offered when logging a workout
pub const MUSCLE_GROUPS: &[&str] = &[
    "Chest",
    "Back",
    "Shoulders",
    "Arms",
    "Biceps",
    "Triceps",
    "Legs",
    "Rear Delts",
    "Core",
    "Other",
];

/// Lifts tracked for one-rep-max records (matched as lowercase substrings)
pub const COMPOUND_LIFTS: &[&str] = &[
    "squat",
    "bench",
    "bench press",
    "deadlift",
    "overhead press",
    "row",
    "barbell row",
];

/// Built-in coarse grouping, applied after any configured overrides
static GROUPED: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Biceps", "Arms"),
        ("Triceps", "Arms"),
        ("Forearms", "Arms"),
        ("Rear Delts", "Shoulders"),
        ("Front Delts", "Shoulders"),
        ("Side Delts", "Shoulders"),
        ("Lats", "Back"),
        ("Traps", "Back"),
        ("Lower Back", "Back"),
        ("Quads", "Legs"),
        ("Hamstrings", "Legs"),
        ("Glutes", "Legs"),
        ("Calves", "Legs"),
        ("Abs", "Core"),
        ("Obliques", "Core"),
    ])
});

/// Expand a compound muscle-group label into its individual groups.
///
/// `Back/Biceps` lists groups directly; a parenthesised label like
/// `Posterior Chain (Glutes/Hamstrings/Back)` lists them inside the
/// parentheses. Plain labels pass through as a single-element list.
pub fn expand_muscle_groups(label: &str) -> Vec<String> {
    let label = label.trim();
    if !label.contains('/') {
        return vec![label.to_string()];
    }

    let inner = match (label.find('('), label.rfind(')')) {
        (Some(open), Some(close)) if open < close => &label[open + 1..close],
        _ => label,
    };

    inner
        .split('/')
        .map(|group| group.trim().to_string())
        .filter(|group| !group.is_empty())
        .collect()
}

/// Map a muscle group onto its coarse analytics group.
///
/// Configured overrides win over the built-in table; unmapped names pass
/// through unchanged.
pub fn grouped_muscle_label(name: &str, config: &Config) -> String {
    if let Some(mapped) = config.muscles.extra_groupings.get(name) {
        return mapped.clone();
    }
    GROUPED
        .get(name)
        .map(|mapped| (*mapped).to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_label_passes_through() {
        assert_eq!(expand_muscle_groups("Chest"), vec!["Chest"]);
    }

    #[test]
    fn test_slash_label_expands() {
        assert_eq!(expand_muscle_groups("Back/Biceps"), vec!["Back", "Biceps"]);
    }

    #[test]
    fn test_parenthesised_label_expands_inner_groups() {
        assert_eq!(
            expand_muscle_groups("Posterior Chain (Glutes/Hamstrings/Back)"),
            vec!["Glutes", "Hamstrings", "Back"]
        );
    }

    #[test]
    fn test_expansion_trims_whitespace() {
        assert_eq!(
            expand_muscle_groups(" Back / Biceps "),
            vec!["Back", "Biceps"]
        );
    }

    #[test]
    fn test_grouped_label_uses_builtin_table() {
        let config = Config::default();
        assert_eq!(grouped_muscle_label("Biceps", &config), "Arms");
        assert_eq!(grouped_muscle_label("Rear Delts", &config), "Shoulders");
        assert_eq!(grouped_muscle_label("Chest", &config), "Chest");
    }

    #[test]
    fn test_grouped_label_prefers_configured_override() {
        let mut config = Config::default();
        config
            .muscles
            .extra_groupings
            .insert("Neck".into(), "Other".into());
        config
            .muscles
            .extra_groupings
            .insert("Biceps".into(), "Pull".into());

        assert_eq!(grouped_muscle_label("Neck", &config), "Other");
        assert_eq!(grouped_muscle_label("Biceps", &config), "Pull");
    }
}
