//! Result shape normalization for screening output.
//!
//! The scoring collaborator is loosely typed: a match field may come back as a
//! sentence, a bullet list, an object or null. Downstream consumers expect an
//! object, so each field is resolved once into a [`MatchField`] and written back
//! in object form. The function is total; nothing here can fail a screening.

use serde_json::{json, Map, Number, Value};
use tracing::warn;

use crate::models::resume::{JsonMap, ScreeningResult};

/// Fields that must be objects after normalization.
pub const MATCH_FIELDS: &[&str] = &[
    "project_match",
    "education_match",
    "experience_match",
    "skill_match",
    "cultural_fit",
];

pub const OVERALL_SCORE_FIELD: &str = "overall_score";

/// A match field as the collaborator returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchField {
    Text(String),
    Items(Vec<Value>),
    Object(JsonMap),
    Empty,
    /// Numbers and booleans are passed through untouched.
    Scalar(Value),
}

impl From<Value> for MatchField {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => MatchField::Text(text),
            Value::Array(items) => MatchField::Items(items),
            Value::Object(map) => MatchField::Object(map),
            Value::Null => MatchField::Empty,
            other => MatchField::Scalar(other),
        }
    }
}

impl MatchField {
    pub fn into_value(self) -> Value {
        match self {
            MatchField::Text(text) => json!({ "text": text }),
            MatchField::Items(items) => json!({ "items": items }),
            MatchField::Object(map) => Value::Object(map),
            MatchField::Empty => Value::Object(Map::new()),
            MatchField::Scalar(value) => value,
        }
    }
}

/// Coerces match fields into objects and a string `overall_score` into a
/// number. Keys that are absent stay absent.
pub fn normalize_screening_result(result: ScreeningResult) -> ScreeningResult {
    let mut fields = result.0;

    for &key in MATCH_FIELDS {
        if let Some(value) = fields.get_mut(key) {
            *value = MatchField::from(value.take()).into_value();
        }
    }

    if let Some(Value::String(raw)) = fields.get(OVERALL_SCORE_FIELD).cloned() {
        match parse_score(&raw) {
            Some(score) => {
                fields.insert(OVERALL_SCORE_FIELD.to_string(), Value::Number(score));
            }
            None => {
                warn!("Dropping non-numeric overall_score {raw:?} from screening result");
                fields.remove(OVERALL_SCORE_FIELD);
            }
        }
    }

    ScreeningResult(fields)
}

/// `None` for unparseable or non-finite input; JSON has no NaN.
fn parse_score(raw: &str) -> Option<Number> {
    raw.trim().parse::<f64>().ok().and_then(Number::from_f64)
}
