use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::skills::SkillSet;

pub type JsonMap = Map<String, Value>;

/// Optional per-category weights forwarded to the scoring collaborator,
/// e.g. `{"skills": 0.4, "experience": 0.3}`.
pub type ScoringWeights = BTreeMap<String, f64>;

/// Free-form resume fields returned by the interpretation collaborator.
/// Only `skills` is read and rewritten locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredResume(pub JsonMap);

impl StructuredResume {
    /// Skill names from the `skills` field, whatever shape the interpreter chose:
    /// a list, a comma-separated string, or an object of grouped lists.
    /// A missing or null field reads as no skills. `None` means the field holds
    /// something else (a number, a bool) and should be left alone.
    pub fn skills(&self) -> Option<Vec<String>> {
        let mut skills = Vec::new();
        match self.0.get("skills") {
            None | Some(Value::Null) => {}
            Some(value @ (Value::String(_) | Value::Array(_) | Value::Object(_))) => {
                collect_skills(value, &mut skills)
            }
            Some(_) => return None,
        }
        Some(skills)
    }

    pub fn set_skills(&mut self, skills: &SkillSet) {
        let values = skills.iter().cloned().map(Value::String).collect();
        self.0.insert("skills".to_string(), Value::Array(values));
    }
}

/// Depth-first. Non-string leaves inside containers are skipped.
fn collect_skills(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => out.extend(
            text.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        ),
        Value::Array(items) => items.iter().for_each(|item| collect_skills(item, out)),
        Value::Object(groups) => groups.values().for_each(|group| collect_skills(group, out)),
        _ => {}
    }
}

/// Scoring collaborator output. Expected to carry `overall_score` (0–10) and
/// per-category match fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreeningResult(pub JsonMap);

impl ScreeningResult {
    pub fn overall_score(&self) -> Option<f64> {
        self.0.get("overall_score").and_then(Value::as_f64)
    }
}

/// Suggestion collaborator output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub content_gaps: Vec<String>,
    #[serde(default)]
    pub formatting_tips: Vec<String>,
    #[serde(default)]
    pub customization_tips: Vec<String>,
    /// Top three actions, most important first.
    #[serde(default)]
    pub priority_actions: Vec<String>,
}
