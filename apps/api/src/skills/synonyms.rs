//! Synonym Table: canonical skill names and the lexical variants that fold into them.
//!
//! Built once at startup (built-in defaults or a TOML file) and shared read-only
//! between the normalizer and the expander.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Built-in families. Order matters: the first family claiming a token wins.
const DEFAULT_FAMILIES: &[(&str, &[&str])] = &[
    ("sql", &["mysql", "postgresql", "sqlite", "mariadb"]),
    ("nosql", &["mongodb", "cassandra", "dynamodb", "couchdb"]),
    ("ml", &["machine learning", "ml", "ai"]),
    ("nlp", &["natural language processing", "text analytics"]),
    (
        "frontend",
        &["react", "vue", "angular", "html", "css", "javascript"],
    ),
    ("backend", &["fastapi", "django", "flask", "node.js"]),
];

#[derive(Debug, Error)]
pub enum SynonymTableError {
    #[error("failed to read synonym file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid synonym TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("synonym table has no entries")]
    Empty,
}

/// One canonical skill and its variants, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillFamily {
    pub canonical: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SynonymFile {
    #[serde(default)]
    skill: Vec<SkillFamily>,
}

/// Immutable canonical → variants mapping with a reverse index for lookups.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    families: Vec<SkillFamily>,
    /// token → index into `families`
    index: HashMap<String, usize>,
}

impl SynonymTable {
    /// Builds a table from families. Entries are lowercased and trimmed; a variant
    /// listed under several families belongs to the first one, and a canonical
    /// name always resolves to itself.
    pub fn new(families: Vec<SkillFamily>) -> Self {
        let families: Vec<SkillFamily> = families
            .into_iter()
            .map(|f| SkillFamily {
                canonical: fold(&f.canonical),
                variants: f.variants.iter().map(|v| fold(v)).collect(),
            })
            .filter(|f| !f.canonical.is_empty())
            .collect();

        // Canonical names are indexed first so they always resolve to themselves.
        let mut index = HashMap::new();
        for (i, family) in families.iter().enumerate() {
            index.entry(family.canonical.clone()).or_insert(i);
        }
        for (i, family) in families.iter().enumerate() {
            for variant in &family.variants {
                index.entry(variant.clone()).or_insert(i);
            }
        }

        Self { families, index }
    }

    /// Parses the `[[skill]]` TOML format.
    pub fn from_toml_str(source: &str) -> Result<Self, SynonymTableError> {
        let file: SynonymFile = toml::from_str(source)?;
        if file.skill.is_empty() {
            return Err(SynonymTableError::Empty);
        }
        Ok(Self::new(file.skill))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SynonymTableError> {
        let source = std::fs::read_to_string(path).map_err(|source| SynonymTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Returns the canonical name for `token`, or `token` itself when unknown.
    /// Expects an already lowercased, trimmed token.
    pub fn lookup_canonical<'a>(&'a self, token: &'a str) -> &'a str {
        match self.index.get(token) {
            Some(&i) => &self.families[i].canonical,
            None => token,
        }
    }

    /// Every canonical name and variant, deduplicated, in table order.
    pub fn known_terms(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut terms = Vec::new();
        for family in &self.families {
            for term in std::iter::once(&family.canonical).chain(family.variants.iter()) {
                if !term.is_empty() && seen.insert(term.as_str()) {
                    terms.push(term.as_str());
                }
            }
        }
        terms
    }

    #[cfg(test)]
    pub fn families(&self) -> &[SkillFamily] {
        &self.families
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_FAMILIES
                .iter()
                .map(|(canonical, variants)| SkillFamily {
                    canonical: canonical.to_string(),
                    variants: variants.iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
        )
    }
}

pub(crate) fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_maps_to_its_canonical() {
        let table = SynonymTable::default();
        for family in table.families() {
            for variant in &family.variants {
                assert_eq!(table.lookup_canonical(variant), family.canonical);
            }
        }
    }

    #[test]
    fn test_canonical_maps_to_itself() {
        let table = SynonymTable::default();
        for family in table.families() {
            assert_eq!(table.lookup_canonical(&family.canonical), family.canonical);
        }
    }

    #[test]
    fn test_unknown_token_is_preserved() {
        let table = SynonymTable::default();
        assert_eq!(table.lookup_canonical("rust"), "rust");
    }

    #[test]
    fn test_default_lookups() {
        let table = SynonymTable::default();
        assert_eq!(table.lookup_canonical("postgresql"), "sql");
        assert_eq!(table.lookup_canonical("mongodb"), "nosql");
        assert_eq!(table.lookup_canonical("machine learning"), "ml");
        assert_eq!(table.lookup_canonical("node.js"), "backend");
    }

    #[test]
    fn test_first_family_wins_on_shared_variant() {
        let table = SynonymTable::new(vec![
            SkillFamily {
                canonical: "cloud".to_string(),
                variants: vec!["aws".to_string()],
            },
            SkillFamily {
                canonical: "devops".to_string(),
                variants: vec!["aws".to_string(), "terraform".to_string()],
            },
        ]);
        assert_eq!(table.lookup_canonical("aws"), "cloud");
        assert_eq!(table.lookup_canonical("terraform"), "devops");
    }

    #[test]
    fn test_canonical_beats_earlier_variant() {
        let table = SynonymTable::new(vec![
            SkillFamily {
                canonical: "data".to_string(),
                variants: vec!["sql".to_string()],
            },
            SkillFamily {
                canonical: "sql".to_string(),
                variants: vec!["mysql".to_string()],
            },
        ]);
        assert_eq!(table.lookup_canonical("sql"), "sql");
        assert_eq!(table.lookup_canonical("mysql"), "sql");
    }

    #[test]
    fn test_known_terms_are_deduplicated_in_table_order() {
        let table = SynonymTable::default();
        let terms = table.known_terms();
        assert_eq!(&terms[..5], &["sql", "mysql", "postgresql", "sqlite", "mariadb"]);
        // "ml" is both canonical and variant in the default table
        assert_eq!(terms.iter().filter(|t| **t == "ml").count(), 1);
    }

    #[test]
    fn test_from_toml_str_folds_case_and_whitespace() {
        let source = r#"
            [[skill]]
            canonical = " Cloud "
            variants = ["AWS", "gcp "]

            [[skill]]
            canonical = "containers"
            variants = ["docker", "kubernetes"]
        "#;
        let table = SynonymTable::from_toml_str(source).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup_canonical("aws"), "cloud");
        assert_eq!(table.lookup_canonical("gcp"), "cloud");
        assert_eq!(table.lookup_canonical("kubernetes"), "containers");
    }

    #[test]
    fn test_from_toml_str_rejects_empty_table() {
        let err = SynonymTable::from_toml_str("").unwrap_err();
        assert!(matches!(err, SynonymTableError::Empty));
    }

    #[test]
    fn test_from_toml_str_rejects_malformed_input() {
        let err = SynonymTable::from_toml_str("[[skill]\ncanonical = 1").unwrap_err();
        assert!(matches!(err, SynonymTableError::Toml(_)));
    }
}
