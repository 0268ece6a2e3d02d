//! Field-level conflict resolution between two records sharing a key.

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::ReconcilePolicy;
use crate::model::Record;

#[derive(Clone, Copy)]
enum Side {
    Target,
    Source,
}

/// Fold `source`'s fields into `target`.
///
/// Blank source values never overwrite. Equal values are left alone. A
/// genuine conflict goes to the latest-wins rule when the field is listed in
/// the policy and both update timestamps parse to different instants;
/// every other conflict keeps both values, existing first: `"old, new"`.
/// The field named by `exclude` is skipped entirely.
pub fn reconcile(
    target: &mut Record,
    source: &Record,
    exclude: Option<&str>,
    policy: &ReconcilePolicy,
) {
    // Decide the latest-wins direction once, against both sides' original
    // timestamps, before any field (the timestamp included) is overwritten.
    let later = later_side(target, source, policy);

    for (name, value) in &source.fields {
        if Some(name.as_str()) == exclude {
            continue;
        }
        if value.trim().is_empty() {
            continue;
        }
        let current = target.value(name).to_string();
        if current.trim().is_empty() {
            target.set(name.clone(), value.clone());
            continue;
        }
        if current == *value {
            continue;
        }
        if policy.is_latest_wins(name) {
            match later {
                Some(Side::Source) => {
                    target.set(name.clone(), value.clone());
                    continue;
                }
                Some(Side::Target) => continue,
                // Missing, unparseable, or tied timestamps: fall through to
                // the lossless default.
                None => {}
            }
        }
        target.set(name.clone(), format!("{current}, {value}"));
    }
}

/// Which side carries the strictly later update timestamp, if decidable.
fn later_side(target: &Record, source: &Record, policy: &ReconcilePolicy) -> Option<Side> {
    let t = parse_timestamp(target.value(&policy.updated_at))?;
    let s = parse_timestamp(source.value(&policy.updated_at))?;
    if s > t {
        Some(Side::Source)
    } else if t > s {
        Some(Side::Target)
    } else {
        None
    }
}

/// Parse an update timestamp against the handful of forms the source files
/// actually carry. Returns None for anything else; callers fall back to
/// concatenation rather than erroring.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        for (name, value) in pairs {
            r.set(*name, *value);
        }
        r
    }

    fn policy(latest_wins: &[&str]) -> ReconcilePolicy {
        ReconcilePolicy {
            latest_wins: latest_wins.iter().map(|s| s.to_string()).collect(),
            updated_at: "updated_at".into(),
        }
    }

    #[test]
    fn blank_source_values_never_overwrite() {
        let mut target = record(&[("name", "Sato")]);
        let source = record(&[("name", "  ")]);
        reconcile(&mut target, &source, None, &policy(&[]));
        assert_eq!(target.value("name"), "Sato");
    }

    #[test]
    fn blank_target_fields_are_filled() {
        let mut target = record(&[("name", "Sato"), ("dept", "")]);
        let source = record(&[("dept", "Sales")]);
        reconcile(&mut target, &source, None, &policy(&[]));
        assert_eq!(target.value("dept"), "Sales");
    }

    #[test]
    fn reconcile_with_self_is_a_no_op() {
        let mut target = record(&[("id", "1"), ("name", "Sato"), ("dept", "Sales")]);
        let copy = target.clone();
        reconcile(&mut target, &copy, None, &policy(&["dept"]));
        assert_eq!(target, copy);
    }

    #[test]
    fn conflicting_values_concatenate_existing_first() {
        let mut target = record(&[("status", "A")]);
        let source = record(&[("status", "B")]);
        reconcile(&mut target, &source, None, &policy(&[]));
        assert_eq!(target.value("status"), "A, B");
    }

    #[test]
    fn latest_wins_takes_the_newer_side() {
        let mut target = record(&[("status", "A"), ("updated_at", "2024-01-01")]);
        let source = record(&[("status", "B"), ("updated_at", "2024-06-01")]);
        reconcile(&mut target, &source, None, &policy(&["status"]));
        assert_eq!(target.value("status"), "B");
    }

    #[test]
    fn latest_wins_keeps_the_newer_target() {
        let mut target = record(&[("status", "A"), ("updated_at", "2024-06-01")]);
        let source = record(&[("status", "B"), ("updated_at", "2024-01-01")]);
        reconcile(&mut target, &source, None, &policy(&["status"]));
        assert_eq!(target.value("status"), "A");
    }

    #[test]
    fn missing_timestamp_falls_back_to_concat() {
        let mut target = record(&[("status", "A"), ("updated_at", "2024-01-01")]);
        let source = record(&[("status", "B")]);
        reconcile(&mut target, &source, None, &policy(&["status"]));
        assert_eq!(target.value("status"), "A, B");
    }

    #[test]
    fn tied_timestamps_fall_back_to_concat() {
        let mut target = record(&[("status", "A"), ("updated_at", "2024-03-01")]);
        let source = record(&[("status", "B"), ("updated_at", "2024-03-01")]);
        reconcile(&mut target, &source, None, &policy(&["status"]));
        assert_eq!(target.value("status"), "A, B");
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_concat() {
        let mut target = record(&[("status", "A"), ("updated_at", "yesterday")]);
        let source = record(&[("status", "B"), ("updated_at", "2024-06-01")]);
        reconcile(&mut target, &source, None, &policy(&["status"]));
        assert_eq!(target.value("status"), "A, B");
    }

    #[test]
    fn excluded_field_is_skipped() {
        let mut target = record(&[("id", "Tanaka"), ("dept", "Sales")]);
        let source = record(&[("id", "ｔａｎａｋａ"), ("dept", "Sales")]);
        reconcile(&mut target, &source, Some("id"), &policy(&[]));
        assert_eq!(target.value("id"), "Tanaka");
    }

    #[test]
    fn timestamp_formats() {
        for ok in [
            "2024-06-01",
            "2024/06/01",
            "2024-06-01 09:30:00",
            "2024-06-01T09:30:00",
            "2024/06/01 09:30:00",
            "2024-06-01T09:30:00+09:00",
        ] {
            assert!(parse_timestamp(ok).is_some(), "should parse: {ok}");
        }
        for bad in ["", "  ", "June 1st", "01-06-2024", "2024-13-40"] {
            assert!(parse_timestamp(bad).is_none(), "should not parse: {bad}");
        }
    }

    #[test]
    fn datetime_beats_date_only_same_day() {
        let mut target = record(&[("role", "staff"), ("updated_at", "2024-06-01")]);
        let source = record(&[("role", "lead"), ("updated_at", "2024-06-01 08:00:00")]);
        reconcile(&mut target, &source, None, &policy(&["role"]));
        assert_eq!(target.value("role"), "lead");
    }
}
