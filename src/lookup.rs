//! Per-root accessors over the frequency table.
//!
//! Every accessor is total: an unknown root never fails, it yields the
//! documented sentinel instead, so a bulk computation never aborts on one
//! missing key.

use std::collections::HashMap;

use tracing::warn;

use crate::tables::RootFrequency;
use crate::types::identifiers::{RootId, SemanticCategory};

#[derive(Debug, Clone, PartialEq)]
pub struct LookupEntry {
    /// Zero-based load position of the row.
    pub position: usize,
    pub arabic: Option<String>,
    pub category: SemanticCategory,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    by_root: HashMap<RootId, LookupEntry>,
    by_arabic: HashMap<String, RootId>,
}

impl LookupIndex {
    /// Index the frequency rows. When a root repeats, the first row wins.
    pub fn build(rows: &[RootFrequency]) -> Self {
        let mut by_root = HashMap::with_capacity(rows.len());
        let mut by_arabic = HashMap::new();

        for (position, row) in rows.iter().enumerate() {
            if by_root.contains_key(&row.root) {
                warn!(root = %row.root, position, "duplicate frequency row ignored by lookup index");
                continue;
            }
            let arabic = row.arabic.clone().filter(|a| !a.trim().is_empty());
            if let Some(arabic) = &arabic {
                by_arabic.entry(arabic.clone()).or_insert_with(|| row.root.clone());
            }
            by_root.insert(
                row.root.clone(),
                LookupEntry {
                    position,
                    arabic,
                    category: row.category,
                    total: row.total,
                },
            );
        }

        Self { by_root, by_arabic }
    }

    pub fn len(&self) -> usize {
        self.by_root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_root.is_empty()
    }

    pub fn get(&self, root: &str) -> Option<&LookupEntry> {
        self.by_root.get(root)
    }

    pub fn contains(&self, root: &str) -> bool {
        self.by_root.contains_key(root)
    }

    /// Stored Arabic form; the root identifier itself when the row is
    /// missing or has no Arabic rendering.
    pub fn arabic_form_of(&self, root: &str) -> String {
        self.get(root)
            .and_then(|entry| entry.arabic.clone())
            .unwrap_or_else(|| root.to_string())
    }

    /// Stored category; `Uncategorized` for unknown roots.
    pub fn category_of(&self, root: &str) -> SemanticCategory {
        self.get(root).map(|entry| entry.category).unwrap_or_default()
    }

    /// Stored total frequency; `0` for unknown roots.
    pub fn frequency_of(&self, root: &str) -> u64 {
        self.get(root).map(|entry| entry.total).unwrap_or(0)
    }

    /// Resolve a root given either its identifier or its Arabic form.
    pub fn resolve(&self, query: &str) -> Option<&RootId> {
        if let Some((root, _)) = self.by_root.get_key_value(query) {
            return Some(root);
        }
        self.by_arabic.get(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RootFrequency> {
        vec![
            RootFrequency::new("ktb", SemanticCategory::KnowledgeWisdom, 100, 20).with_arabic("كتب"),
            RootFrequency::new("qra", SemanticCategory::Communication, 10, 10),
            RootFrequency::new("ktb", SemanticCategory::Uncategorized, 1, 0),
        ]
    }

    #[test]
    fn known_roots_return_stored_values() {
        let index = LookupIndex::build(&rows());
        assert_eq!(index.arabic_form_of("ktb"), "كتب");
        assert_eq!(index.category_of("ktb"), SemanticCategory::KnowledgeWisdom);
        assert_eq!(index.frequency_of("ktb"), 120);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn unknown_roots_degrade_to_sentinels() {
        let index = LookupIndex::build(&rows());
        assert_eq!(index.arabic_form_of("zzz"), "zzz");
        assert_eq!(index.category_of("zzz"), SemanticCategory::Uncategorized);
        assert_eq!(index.frequency_of("zzz"), 0);
        // Present but without an Arabic rendering.
        assert_eq!(index.arabic_form_of("qra"), "qra");
    }

    #[test]
    fn resolves_by_identifier_or_arabic_form() {
        let index = LookupIndex::build(&rows());
        assert_eq!(index.resolve("ktb").map(RootId::as_str), Some("ktb"));
        assert_eq!(index.resolve("كتب").map(RootId::as_str), Some("ktb"));
        assert!(index.resolve("nothing").is_none());
    }
}
