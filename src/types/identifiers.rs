use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Transliterated root identifier. The join key between all three tables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootId(String);

impl RootId {
    pub fn new(root: impl Into<String>) -> Self {
        RootId(root.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for RootId {
    fn from(value: &str) -> Self {
        RootId(value.to_string())
    }
}

impl Borrow<str> for RootId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label assigned by a clustering run. Orders numerically and serializes as
/// `cluster_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ClusterId(pub usize);

impl From<ClusterId> for String {
    fn from(id: ClusterId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ClusterId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .strip_prefix("cluster_")
            .and_then(|n| n.parse().ok())
            .map(ClusterId)
            .ok_or_else(|| format!("invalid cluster id '{value}'"))
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster_{}", self.0)
    }
}

/// Closed semantic taxonomy. Unknown labels collapse to `Uncategorized`
/// when read from a table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SemanticCategory {
    DivineAttributes,
    WorshipRitual,
    FaithBelief,
    FamilyRelations,
    SocialJustice,
    CommerceEconomics,
    KnowledgeWisdom,
    Communication,
    BooksRevelation,
    CreationNature,
    TimeTemporal,
    NaturalElements,
    MovementDirection,
    EmotionsStates,
    MoralConduct,
    #[default]
    Uncategorized,
}

impl SemanticCategory {
    pub const ALL: [SemanticCategory; 16] = [
        SemanticCategory::DivineAttributes,
        SemanticCategory::WorshipRitual,
        SemanticCategory::FaithBelief,
        SemanticCategory::FamilyRelations,
        SemanticCategory::SocialJustice,
        SemanticCategory::CommerceEconomics,
        SemanticCategory::KnowledgeWisdom,
        SemanticCategory::Communication,
        SemanticCategory::BooksRevelation,
        SemanticCategory::CreationNature,
        SemanticCategory::TimeTemporal,
        SemanticCategory::NaturalElements,
        SemanticCategory::MovementDirection,
        SemanticCategory::EmotionsStates,
        SemanticCategory::MoralConduct,
        SemanticCategory::Uncategorized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticCategory::DivineAttributes => "divine_attributes",
            SemanticCategory::WorshipRitual => "worship_ritual",
            SemanticCategory::FaithBelief => "faith_belief",
            SemanticCategory::FamilyRelations => "family_relations",
            SemanticCategory::SocialJustice => "social_justice",
            SemanticCategory::CommerceEconomics => "commerce_economics",
            SemanticCategory::KnowledgeWisdom => "knowledge_wisdom",
            SemanticCategory::Communication => "communication",
            SemanticCategory::BooksRevelation => "books_revelation",
            SemanticCategory::CreationNature => "creation_nature",
            SemanticCategory::TimeTemporal => "time_temporal",
            SemanticCategory::NaturalElements => "natural_elements",
            SemanticCategory::MovementDirection => "movement_direction",
            SemanticCategory::EmotionsStates => "emotions_states",
            SemanticCategory::MoralConduct => "moral_conduct",
            SemanticCategory::Uncategorized => "uncategorized",
        }
    }

    pub fn is_categorized(&self) -> bool {
        *self != SemanticCategory::Uncategorized
    }

    /// Strict label lookup: `None` for anything outside the taxonomy.
    pub fn parse_label(value: &str) -> Option<Self> {
        let label = value.trim().to_lowercase();
        SemanticCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }
}

impl From<&str> for SemanticCategory {
    fn from(value: &str) -> Self {
        SemanticCategory::parse_label(value).unwrap_or_default()
    }
}

impl From<String> for SemanticCategory {
    fn from(value: String) -> Self {
        SemanticCategory::from(value.as_str())
    }
}

impl fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_fall_back_to_uncategorized() {
        assert_eq!(SemanticCategory::from("knowledge_wisdom"), SemanticCategory::KnowledgeWisdom);
        assert_eq!(SemanticCategory::from(" Faith_Belief "), SemanticCategory::FaithBelief);
        assert_eq!(SemanticCategory::from("astronomy"), SemanticCategory::Uncategorized);
        assert_eq!(SemanticCategory::from(""), SemanticCategory::Uncategorized);
    }

    #[test]
    fn strict_lookup_rejects_unknown_labels() {
        assert_eq!(SemanticCategory::parse_label("moral_conduct"), Some(SemanticCategory::MoralConduct));
        assert_eq!(SemanticCategory::parse_label("uncategorized"), Some(SemanticCategory::Uncategorized));
        assert_eq!(SemanticCategory::parse_label("astronomy"), None);
    }

    #[test]
    fn cluster_ids_print_and_parse_with_prefix() {
        assert_eq!(ClusterId(10).to_string(), "cluster_10");
        assert_eq!(ClusterId::try_from("cluster_7".to_string()), Ok(ClusterId(7)));
        assert!(ClusterId::try_from("group_7".to_string()).is_err());
        assert!(ClusterId(2) < ClusterId(10));
    }

    #[test]
    fn labels_roundtrip_through_json() {
        for category in SemanticCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            let back: SemanticCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }
}
