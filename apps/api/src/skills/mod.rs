// Skill reconciliation: synonym folding + fuzzy expansion against a job description.
// Pure, synchronous and shareable across requests behind an Arc.

use std::collections::BTreeSet;

pub mod expander;
pub mod normalizer;
pub mod similarity;
pub mod synonyms;

/// Lowercase, trimmed, deduplicated skill tokens.
pub type SkillSet = BTreeSet<String>;
