//! Implied-Skill Expander: infers extra skills from vocabulary present in a job description.
//!
//! 1. Known terms = every canonical name and variant in the synonym table.
//! 2. `jd_terms` = known terms occurring as a literal substring of the lowercased JD.
//! 3. Each candidate skill is scored against `jd_terms` with token-set similarity;
//!    the best term is added when it reaches the threshold.
//!
//! Expansion runs against the full synonym vocabulary, not the normalized skill
//! set, so a JD mentioning "mysql" can surface "mysql" even though the candidate's
//! skills were already folded to "sql".

use std::sync::Arc;

use tracing::debug;

use crate::skills::similarity::token_set_ratio;
use crate::skills::synonyms::SynonymTable;
use crate::skills::SkillSet;

pub const DEFAULT_THRESHOLD: f64 = 85.0;

/// Best-scoring JD term for a single skill.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatch<'a> {
    pub term: &'a str,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct SkillExpander {
    table: Arc<SynonymTable>,
    threshold: f64,
}

impl SkillExpander {
    pub fn new(table: Arc<SynonymTable>) -> Self {
        Self {
            table,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Threshold on the 0–100 scale; out-of-range values are clamped.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 100.0);
        self
    }

    #[cfg(test)]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Known terms occurring literally in `jd_text`, in synonym-table order.
    pub fn jd_terms(&self, jd_text: &str) -> Vec<&str> {
        let jd_lower = jd_text.to_lowercase();
        self.table
            .known_terms()
            .into_iter()
            .filter(|term| jd_lower.contains(term))
            .collect()
    }

    /// Returns `skills` plus every JD term that best-matches one of them at or
    /// above the threshold. Empty skills, empty text, or a JD with no known
    /// terms returns `skills` unchanged.
    pub fn expand(&self, skills: &SkillSet, jd_text: &str) -> SkillSet {
        if skills.is_empty() || jd_text.trim().is_empty() {
            return skills.clone();
        }

        let jd_terms = self.jd_terms(jd_text);
        if jd_terms.is_empty() {
            return skills.clone();
        }

        let mut expanded = skills.clone();
        for skill in skills {
            let Some(best) = best_match(skill, &jd_terms) else {
                debug!("No comparable JD term for skill '{skill}', skipping");
                continue;
            };
            if best.score >= self.threshold {
                debug!(
                    "Skill '{skill}' matched JD term '{}' ({:.1})",
                    best.term, best.score
                );
                expanded.insert(best.term.to_string());
            }
        }
        expanded
    }
}

/// Highest-scoring candidate; the first one wins on ties. `None` when there is
/// nothing to compare against.
pub fn best_match<'a>(skill: &str, candidates: &[&'a str]) -> Option<TermMatch<'a>> {
    if skill.trim().is_empty() {
        return None;
    }
    candidates
        .iter()
        .map(|&term| TermMatch {
            term,
            score: token_set_ratio(skill, term),
        })
        .fold(None, |best: Option<TermMatch<'a>>, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
}
