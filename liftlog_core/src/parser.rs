//! Parser for the compact `Sets x Reps x Weight` notation.
//!
//! A raw entry like `3x10x135lb; 2x8x155lb` describes groups of identical
//! sets separated by semicolons. Each group is one of:
//! - `<sets>x<reps>x<weight><unit>` - working sets at a weight
//! - `<sets>x<reps>` - bodyweight work, weight 0
//! - `<sets>xfailure` - sets taken to failure
//!
//! The group multiplier expands into repeated [`SetRecord`]s, so `3x10x135lb`
//! yields three records of 10 reps at 135. The unit suffix (`lb`/`kg`) is
//! optional; when absent the caller's configured default unit applies.

use crate::{Error, Result, SetRecord, WeightUnit};

/// Parse a raw sets string into an ordered sequence of set records.
///
/// The empty (or all-whitespace) string parses to an empty sequence; empty
/// segments from trailing semicolons are ignored. Any segment that matches
/// neither grammar fails the whole parse with [`Error::MalformedEntry`].
pub fn parse_sets(raw: &str, default_unit: WeightUnit) -> Result<Vec<SetRecord>> {
    let mut records = Vec::new();

    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        parse_segment(segment, default_unit, &mut records)?;
    }

    Ok(records)
}

fn parse_segment(
    segment: &str,
    default_unit: WeightUnit,
    out: &mut Vec<SetRecord>,
) -> Result<()> {
    let mut parts = segment.splitn(3, ['x', 'X']);
    let sets_part = parts.next().unwrap_or("").trim();
    let reps_part = parts
        .next()
        .ok_or_else(|| Error::malformed(segment, "expected `<sets>x<reps>x<weight>`"))?
        .trim();
    let weight_part = parts.next().map(str::trim);

    let sets = parse_count(sets_part)
        .ok_or_else(|| Error::malformed(segment, "set count is not a non-negative integer"))?;
    if sets == 0 {
        return Err(Error::malformed(segment, "set count must be at least 1"));
    }

    // `NxFailure` marks sets taken to failure
    if weight_part.is_none() && reps_part.eq_ignore_ascii_case("failure") {
        out.extend(std::iter::repeat(SetRecord::failure()).take(sets as usize));
        return Ok(());
    }

    let reps = parse_count(reps_part)
        .ok_or_else(|| Error::malformed(segment, "rep count is not a non-negative integer"))?;

    let (weight, unit) = match weight_part {
        Some(weight_part) => parse_weight(weight_part).ok_or_else(|| {
            Error::malformed(
                segment,
                "weight must be a non-negative number with an optional lb/kg suffix",
            )
        })?,
        // Bodyweight shorthand `SxR`
        None => (0.0, None),
    };

    let record = SetRecord::working(reps, weight, unit.unwrap_or(default_unit));
    out.extend(std::iter::repeat(record).take(sets as usize));
    Ok(())
}

/// Parse a non-negative integer, rejecting signs and stray characters
fn parse_count(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse `<number><unit?>`, e.g. `135lb`, `62.5kg`, `200`
fn parse_weight(s: &str) -> Option<(f64, Option<WeightUnit>)> {
    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);

    let weight: f64 = number.parse().ok()?;
    if !weight.is_finite() || weight < 0.0 {
        return None;
    }

    let unit = match suffix.trim().to_ascii_lowercase().as_str() {
        "" => None,
        "lb" | "lbs" => Some(WeightUnit::Pound),
        "kg" | "kgs" => Some(WeightUnit::Kilogram),
        _ => return None,
    };

    Some((weight, unit))
}

/// Format records back into the compact notation, merging runs of identical
/// sets into one `SxRxW` group.
///
/// Inverse of [`parse_sets`]: re-parsing the output yields an equal sequence
/// regardless of the default unit, because every group carries its suffix.
pub fn format_sets(records: &[SetRecord]) -> String {
    let mut groups: Vec<(usize, &SetRecord)> = Vec::new();
    for record in records {
        match groups.last_mut() {
            Some((count, head)) if *head == record => *count += 1,
            _ => groups.push((1, record)),
        }
    }

    let segments: Vec<String> = groups
        .into_iter()
        .map(|(count, record)| {
            if record.is_failure {
                format!("{count}xfailure")
            } else {
                format!(
                    "{}x{}x{}{}",
                    count,
                    record.reps,
                    format_weight(record.weight),
                    record.unit.suffix()
                )
            }
        })
        .collect();

    segments.join("; ")
}

/// Render a weight without a trailing `.0` for whole numbers
fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 && weight < u64::MAX as f64 {
        format!("{}", weight as u64)
    } else {
        format!("{weight}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expands_set_multiplier() {
        let sets = parse_sets("3x10x135lb", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 3);
        for set in &sets {
            assert_eq!(set.reps, 10);
            assert_eq!(set.weight, 135.0);
            assert_eq!(set.unit, WeightUnit::Pound);
            assert!(!set.is_failure);
        }
    }

    #[test]
    fn test_parse_multiple_segments_with_failure() {
        let sets = parse_sets("2x8x155lb; 1xfailure", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].reps, 8);
        assert_eq!(sets[1].reps, 8);
        assert!(sets[2].is_failure);
    }

    #[test]
    fn test_parse_empty_string_is_empty_sequence() {
        assert!(parse_sets("", WeightUnit::Pound).unwrap().is_empty());
        assert!(parse_sets("   ", WeightUnit::Pound).unwrap().is_empty());
    }

    #[test]
    fn test_parse_ignores_trailing_semicolon() {
        let sets = parse_sets("2x5x100lb; ", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_numeric_sets() {
        let err = parse_sets("abcx10x135lb", WeightUnit::Pound).unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { .. }));
    }

    #[test]
    fn test_parse_rejects_negative_numbers() {
        assert!(parse_sets("-3x10x135lb", WeightUnit::Pound).is_err());
        assert!(parse_sets("3x-10x135lb", WeightUnit::Pound).is_err());
        assert!(parse_sets("3x10x-135lb", WeightUnit::Pound).is_err());
    }

    #[test]
    fn test_parse_rejects_zero_sets() {
        assert!(parse_sets("0x10x135lb", WeightUnit::Pound).is_err());
    }

    #[test]
    fn test_parse_rejects_bare_number() {
        assert!(parse_sets("135", WeightUnit::Pound).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_weight_suffix() {
        assert!(parse_sets("3x10x135stone", WeightUnit::Pound).is_err());
    }

    #[test]
    fn test_parse_decimal_weight() {
        let sets = parse_sets("1x5x62.5kg", WeightUnit::Pound).unwrap();
        assert_eq!(sets[0].weight, 62.5);
        assert_eq!(sets[0].unit, WeightUnit::Kilogram);
    }

    #[test]
    fn test_parse_bodyweight_shorthand() {
        let sets = parse_sets("3x12", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].reps, 12);
        assert_eq!(sets[0].weight, 0.0);
    }

    #[test]
    fn test_parse_unit_defaults_to_caller_unit() {
        let sets = parse_sets("2x10x60", WeightUnit::Kilogram).unwrap();
        assert_eq!(sets[0].unit, WeightUnit::Kilogram);

        let sets = parse_sets("2x10x60", WeightUnit::Pound).unwrap();
        assert_eq!(sets[0].unit, WeightUnit::Pound);
    }

    #[test]
    fn test_parse_failure_marker_is_case_insensitive() {
        let sets = parse_sets("2xFAILURE", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 2);
        assert!(sets.iter().all(|s| s.is_failure));
    }

    #[test]
    fn test_parse_uppercase_separator() {
        let sets = parse_sets("3X10X135LB", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].weight, 135.0);
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let sets = parse_sets("  3x10x135lb ;  2x8x155lb  ", WeightUnit::Pound).unwrap();
        assert_eq!(sets.len(), 5);
    }

    #[test]
    fn test_format_merges_identical_runs() {
        let sets = parse_sets("3x10x135lb; 2x8x155lb", WeightUnit::Pound).unwrap();
        assert_eq!(format_sets(&sets), "3x10x135lb; 2x8x155lb");
    }

    #[test]
    fn test_format_failure_sets() {
        let sets = parse_sets("2x8x155lb; 1xfailure", WeightUnit::Pound).unwrap();
        assert_eq!(format_sets(&sets), "2x8x155lb; 1xfailure");
    }

    #[test]
    fn test_roundtrip_parse_format_parse() {
        for raw in [
            "3x10x135lb",
            "2x8x155lb; 1xfailure",
            "1x5x62.5kg; 3x12",
            "4x6x225lb; 2x3x245lb; 2xfailure",
        ] {
            let parsed = parse_sets(raw, WeightUnit::Pound).unwrap();
            let reparsed = parse_sets(&format_sets(&parsed), WeightUnit::Kilogram).unwrap();
            assert_eq!(parsed, reparsed, "round-trip failed for {raw:?}");
        }
    }
}
