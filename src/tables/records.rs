use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::{RootId, SemanticCategory};

pub const MAX_SURA: u16 = 114;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Sura number must be between 1 and 114, got {0}")]
    InvalidSura(u16),
    #[error("Verse number must be positive in sura {0}")]
    InvalidVerse(u16),
    #[error("Frequency row has an empty root identifier")]
    EmptyRoot,
    #[error("Co-occurrence count must be at least 1 for pair {0}-{1}")]
    ZeroCount(String, String),
}

/// One morphological token occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub sura: u16,
    #[serde(rename = "aya", alias = "verse")]
    pub verse: u16,
    #[serde(rename = "Root", alias = "root", default)]
    pub root: Option<RootId>,
    #[serde(rename = "FORM", alias = "form", default)]
    pub form: String,
    #[serde(rename = "TAG", alias = "tag", default)]
    pub tag: String,
}

impl OccurrenceRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.sura == 0 || self.sura > MAX_SURA {
            return Err(RecordError::InvalidSura(self.sura));
        }
        if self.verse == 0 {
            return Err(RecordError::InvalidVerse(self.sura));
        }
        Ok(())
    }

    /// The root, if present and non-blank.
    pub fn root(&self) -> Option<&RootId> {
        self.root.as_ref().filter(|root| !root.is_empty())
    }
}

/// Aggregate counts for one distinct root.
///
/// Column names follow the corpus export (`meccan_*`/`medinan_*`); the
/// neutral `period_a_*`/`period_b_*` spellings are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootFrequency {
    pub root: RootId,
    #[serde(rename = "root_arabic", default)]
    pub arabic: Option<String>,
    #[serde(rename = "semantic_category", default)]
    pub category: SemanticCategory,
    #[serde(rename = "total_frequency")]
    pub total: u64,
    #[serde(rename = "meccan_frequency", alias = "period_a_frequency")]
    pub period_a: u64,
    #[serde(rename = "medinan_frequency", alias = "period_b_frequency")]
    pub period_b: u64,
    #[serde(rename = "meccan_ratio", alias = "period_a_ratio", default)]
    pub stored_ratio: Option<f64>,
}

impl RootFrequency {
    pub fn new(root: impl Into<String>, category: SemanticCategory, period_a: u64, period_b: u64) -> Self {
        Self {
            root: RootId::new(root),
            arabic: None,
            category,
            total: period_a + period_b,
            period_a,
            period_b,
            stored_ratio: None,
        }
    }

    pub fn with_arabic(mut self, arabic: impl Into<String>) -> Self {
        self.arabic = Some(arabic.into());
        self
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.root.is_empty() {
            return Err(RecordError::EmptyRoot);
        }
        Ok(())
    }

    /// `total == period_a + period_b`. Rows that break this are still loaded,
    /// but their ratios are derived from the period counts only.
    pub fn is_consistent(&self) -> bool {
        self.total == self.period_a + self.period_b
    }

    /// Period-A share of the period counts. A finite stored ratio wins;
    /// otherwise it is computed, and is `None` when both counts are zero.
    pub fn period_a_ratio(&self) -> Option<f64> {
        if let Some(ratio) = self.stored_ratio.filter(|r| r.is_finite()) {
            return Some(ratio);
        }
        let period_total = self.period_a + self.period_b;
        if period_total == 0 {
            None
        } else {
            Some(self.period_a as f64 / period_total as f64)
        }
    }
}

/// Unordered pair of distinct roots seen in the same verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrencePair {
    pub root1: RootId,
    pub root2: RootId,
    #[serde(rename = "cooccurrence_count", alias = "count")]
    pub count: u64,
}

impl CooccurrencePair {
    pub fn new(root1: impl Into<String>, root2: impl Into<String>, count: u64) -> Self {
        Self {
            root1: RootId::new(root1),
            root2: RootId::new(root2),
            count,
        }
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.count == 0 {
            return Err(RecordError::ZeroCount(
                self.root1.to_string(),
                self.root2.to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_self_pair(&self) -> bool {
        self.root1 == self.root2
    }

    /// The partner of `root` in this pair, if `root` is a member.
    pub fn partner_of(&self, root: &str) -> Option<&RootId> {
        if self.root1.as_str() == root {
            Some(&self.root2)
        } else if self.root2.as_str() == root {
            Some(&self.root1)
        } else {
            None
        }
    }

    /// `root1-root2`, the key used when grouping pairs.
    pub fn key(&self) -> String {
        format!("{}-{}", self.root1, self.root2)
    }
}
