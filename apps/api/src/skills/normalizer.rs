use std::sync::Arc;

use crate::skills::synonyms::{fold, SynonymTable};
use crate::skills::SkillSet;

/// Folds raw skill strings into canonical, lowercase, deduplicated form.
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    table: Arc<SynonymTable>,
}

impl SkillNormalizer {
    pub fn new(table: Arc<SynonymTable>) -> Self {
        Self { table }
    }

    /// Lowercases and trims each entry, maps it through the synonym table and
    /// collects the results. Blank entries are dropped.
    pub fn normalize<I, S>(&self, skills: I) -> SkillSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        skills
            .into_iter()
            .map(|s| fold(s.as_ref()))
            .filter(|s| !s.is_empty())
            .map(|s| self.table.lookup_canonical(&s).to_string())
            .collect()
    }
}
