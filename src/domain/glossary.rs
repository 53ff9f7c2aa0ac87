//! Participant name glossary
//!
//! Maps the many spellings a transcript uses for a person ("Bob", "Robert",
//! "bob s.") onto one canonical name so tasks group under a single owner.

use crate::domain::models::GlossaryEntry;
use crate::error::{AppError, Result};
use std::collections::HashMap;

/// Validated glossary with a case-insensitive lookup table
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
    lookup: HashMap<String, String>,
}

fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Glossary {
    /// Build a glossary, rejecting blank names and aliases claimed twice
    pub fn new(entries: Vec<GlossaryEntry>) -> Result<Self> {
        let mut lookup = HashMap::new();
        let mut cleaned = Vec::with_capacity(entries.len());

        for entry in entries {
            let canonical = entry.canonical.trim().to_string();
            if canonical.is_empty() {
                return Err(AppError::InvalidInput(
                    "Glossary entry has an empty canonical name".to_string(),
                ));
            }

            let aliases: Vec<String> = entry
                .aliases
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();

            for key in std::iter::once(&canonical).chain(aliases.iter()) {
                let key = normalize_key(key);
                match lookup.get(&key) {
                    Some(existing) if existing != &canonical => {
                        return Err(AppError::InvalidInput(format!(
                            "Name '{}' is claimed by both '{}' and '{}'",
                            key, existing, canonical
                        )));
                    }
                    _ => {
                        lookup.insert(key, canonical.clone());
                    }
                }
            }

            cleaned.push(GlossaryEntry { canonical, aliases });
        }

        Ok(Self {
            entries: cleaned,
            lookup,
        })
    }

    /// Canonical form of `name`, or the trimmed input when unknown
    pub fn resolve(&self, name: &str) -> String {
        self.lookup
            .get(&normalize_key(name))
            .cloned()
            .unwrap_or_else(|| name.trim().to_string())
    }

    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    pub fn canonical_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.canonical.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(canonical: &str, aliases: &[&str]) -> GlossaryEntry {
        GlossaryEntry {
            canonical: canonical.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_resolves_aliases_case_insensitively() {
        let glossary = Glossary::new(vec![entry("Robert Smith", &["Bob", "Rob S."])]).unwrap();

        assert_eq!(glossary.resolve("bob"), "Robert Smith");
        assert_eq!(glossary.resolve("  ROB S. "), "Robert Smith");
        assert_eq!(glossary.resolve("robert smith"), "Robert Smith");
        assert_eq!(glossary.resolve(" Alice "), "Alice");
    }

    #[test]
    fn test_rejects_blank_canonical() {
        let result = Glossary::new(vec![entry("   ", &["x"])]);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_alias_claimed_twice() {
        let result = Glossary::new(vec![
            entry("Robert Smith", &["Bob"]),
            entry("Bob Jones", &[]),
        ]);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_drops_empty_aliases() {
        let glossary = Glossary::new(vec![entry("Ana", &["", " Annie "])]).unwrap();
        assert_eq!(glossary.entries()[0].aliases, vec!["Annie".to_string()]);
        assert_eq!(glossary.canonical_names(), vec!["Ana"]);
    }
}
