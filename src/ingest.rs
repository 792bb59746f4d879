use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value;

/// Which shape of raw upstream payload is being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Player,
    MatchStats,
}

struct FieldSpec {
    name: &'static str,
    bounds: Option<(f64, f64)>,
}

const fn free(name: &'static str) -> FieldSpec {
    FieldSpec { name, bounds: None }
}

const fn bounded(name: &'static str, lo: f64, hi: f64) -> FieldSpec {
    FieldSpec {
        name,
        bounds: Some((lo, hi)),
    }
}

const PLAYER_FIELDS: &[FieldSpec] = &[
    bounded("rating", 0.0, 10.0),
    bounded("form_rating", 0.0, 10.0),
    bounded("pass_accuracy", 0.0, 1.0),
    bounded("shot_accuracy", 0.0, 1.0),
    bounded("duel_win_rate", 0.0, 1.0),
    free("goals_last_5"),
    free("assists_last_5"),
    free("saves_last_5"),
    free("tackles_last_5"),
    free("interceptions_last_5"),
    bounded("minutes_last_5", 0.0, 450.0),
    free("total_stat"),
    free("total_minutes"),
    free("match_count"),
];

const MATCH_FIELDS: &[FieldSpec] = &[
    bounded("rating", 0.0, 10.0),
    bounded("possession_pct", 0.0, 100.0),
    bounded("pass_pct", 0.0, 100.0),
    bounded("duel_win_pct", 0.0, 100.0),
    free("goals"),
    free("assists"),
    free("saves"),
    free("tackles"),
    free("interceptions"),
    bounded("minutes", 0.0, 120.0),
];

const DATE_FIELDS: &[&str] = &["updated_at", "match_date"];

/// Defensive normalization for freshly ingested upstream data: numeric
/// coercion (0.0 on failure), clamping of known-bounded fields, and repair of
/// unparsable dates to now. This deliberately clamps instead of flagging; it
/// runs once at ingestion and never against already-validated records.
pub fn clean_incoming(mut raw: Value, kind: RecordKind) -> Value {
    let Some(obj) = raw.as_object_mut() else {
        return raw;
    };

    let specs = match kind {
        RecordKind::Player => PLAYER_FIELDS,
        RecordKind::MatchStats => MATCH_FIELDS,
    };

    for spec in specs {
        let Some(entry) = obj.get(spec.name) else {
            continue;
        };
        let mut value = coerce_numeric(entry);
        if let Some((lo, hi)) = spec.bounds {
            if value < lo || value > hi {
                debug!("clamping {} from {value} into [{lo}, {hi}]", spec.name);
                value = value.clamp(lo, hi);
            }
        }
        obj.insert(spec.name.to_string(), json_number(value));
    }

    for name in DATE_FIELDS {
        let Some(entry) = obj.get(*name) else {
            continue;
        };
        let ok = entry
            .as_str()
            .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
        if !ok {
            obj.insert(name.to_string(), Value::String(Utc::now().to_rfc3339()));
        }
    }

    raw
}

fn coerce_numeric(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches('%');
            trimmed
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rating_fifteen_is_clamped_to_ten() {
        let cleaned = clean_incoming(json!({"rating": 15}), RecordKind::Player);
        assert_eq!(cleaned["rating"], json!(10.0));
    }

    #[test]
    fn string_numbers_and_percents_are_coerced() {
        let cleaned = clean_incoming(
            json!({"goals_last_5": "3", "pass_accuracy": "0.87", "tackles_last_5": "bad"}),
            RecordKind::Player,
        );
        assert_eq!(cleaned["goals_last_5"], json!(3.0));
        assert_eq!(cleaned["pass_accuracy"], json!(0.87));
        assert_eq!(cleaned["tackles_last_5"], json!(0.0));
    }

    #[test]
    fn match_percentages_clamp_to_hundred() {
        let cleaned = clean_incoming(
            json!({"possession_pct": 132.0, "pass_pct": "88%"}),
            RecordKind::MatchStats,
        );
        assert_eq!(cleaned["possession_pct"], json!(100.0));
        assert_eq!(cleaned["pass_pct"], json!(88.0));
    }

    #[test]
    fn broken_date_is_repaired_to_now() {
        let cleaned = clean_incoming(
            json!({"updated_at": "last tuesday", "match_date": "2026-08-20T18:30:00+00:00"}),
            RecordKind::Player,
        );
        let repaired = cleaned["updated_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(repaired).is_ok());
        // Valid dates pass through untouched.
        assert_eq!(cleaned["match_date"], json!("2026-08-20T18:30:00+00:00"));
    }

    #[test]
    fn unknown_fields_and_non_objects_pass_through() {
        let cleaned = clean_incoming(json!({"nickname": "El Toro"}), RecordKind::Player);
        assert_eq!(cleaned["nickname"], json!("El Toro"));

        let scalar = clean_incoming(json!(42), RecordKind::Player);
        assert_eq!(scalar, json!(42));
    }
}
