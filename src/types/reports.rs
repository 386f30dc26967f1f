use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::types::identifiers::{ClusterId, RootId, SemanticCategory};

/// Row selection applied before frequency analysis. All fields are optional
/// and conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyFilter {
    #[serde(default)]
    pub min_frequency: Option<u64>,
    #[serde(default, alias = "semantic_category", deserialize_with = "strict_category")]
    pub category: Option<SemanticCategory>,
    #[serde(default, alias = "revelation_preference")]
    pub period_preference: Option<PeriodPreference>,
}

/// Query filters reject labels outside the taxonomy instead of widening
/// them to `uncategorized`.
fn strict_category<'de, D>(deserializer: D) -> Result<Option<SemanticCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|label| {
            SemanticCategory::parse_label(&label)
                .ok_or_else(|| de::Error::custom(format!("unknown semantic category '{label}'")))
        })
        .transpose()
}

/// Keeps rows strongly skewed towards one period, not a 50/50 split:
/// `PeriodA` means ratio > 0.6, `PeriodB` means ratio < 0.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPreference {
    #[serde(alias = "periodA", alias = "meccan")]
    PeriodA,
    #[serde(alias = "periodB", alias = "medinan")]
    PeriodB,
}

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyReport {
    pub total_unique_roots: usize,
    pub hapax_legomena_count: usize,
    pub very_frequent_count: usize,
    pub frequency_distribution: FrequencyDistribution,
    pub top_frequent_roots: Vec<RankedRoot>,
    pub category_distribution: BTreeMap<SemanticCategory, CategoryAggregate>,
    pub period_analysis: PeriodAnalysis,
    pub statistical_summary: SummaryStatistics,
}

/// Inclusive, non-overlapping buckets over total frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyDistribution {
    #[serde(rename = "1")]
    pub once: usize,
    #[serde(rename = "2-5")]
    pub two_to_five: usize,
    #[serde(rename = "6-20")]
    pub six_to_twenty: usize,
    #[serde(rename = "21-100")]
    pub twenty_one_to_hundred: usize,
    #[serde(rename = "101+")]
    pub over_hundred: usize,
}

impl FrequencyDistribution {
    pub fn total(&self) -> usize {
        self.once + self.two_to_five + self.six_to_twenty + self.twenty_one_to_hundred + self.over_hundred
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRoot {
    pub root: RootId,
    pub root_arabic: String,
    pub total_frequency: u64,
    pub semantic_category: SemanticCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub count: usize,
    pub sum: u64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAnalysis {
    pub period_a_total_occurrences: u64,
    pub period_b_total_occurrences: u64,
    pub period_a_percentage: f64,
    pub strongly_period_a_roots: usize,
    pub strongly_period_b_roots: usize,
    pub balanced_roots: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean_frequency: f64,
    pub median_frequency: f64,
    pub std_frequency: f64,
    /// Only present when extended statistics are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skewness: Option<f64>,
}

// ---------------------------------------------------------------------------
// Co-occurrence & network
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooccurrenceReport {
    pub total_pairs_analyzed: usize,
    pub significant_pairs: usize,
    pub top_cooccurring_pairs: Vec<PairSummary>,
    pub network_metrics: NetworkSection,
    pub semantic_clustering: BTreeMap<SemanticCategory, Vec<String>>,
    pub strong_associations: Vec<Association>,
    pub statistics: CooccurrenceStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSummary {
    pub root1: RootId,
    pub root2: RootId,
    pub cooccurrence_count: u64,
    pub root1_arabic: String,
    pub root2_arabic: String,
}

/// Network metrics, or a descriptive note when network analysis is disabled
/// or the graph has no nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkSection {
    Available(NetworkMetrics),
    Unavailable { note: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub number_of_components: usize,
    /// Present only for connected graphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_path_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub root1: RootId,
    pub root2: RootId,
    pub cooccurrence: u64,
    pub expected: f64,
    pub association_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceStatistics {
    pub mean_cooccurrence: f64,
    pub max_cooccurrence: u64,
    pub network_density: f64,
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringReport {
    pub clusters: BTreeMap<ClusterId, Vec<ClusterMember>>,
    pub cluster_analysis: BTreeMap<ClusterId, ClusterSummary>,
    pub clustering_metrics: ClusteringMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub root: RootId,
    pub root_arabic: String,
    pub category: SemanticCategory,
    pub frequency: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub size: usize,
    pub dominant_category: SemanticCategory,
    pub category_diversity: usize,
    pub avg_frequency: f64,
    pub top_roots: Vec<ClusterMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringMetrics {
    pub n_clusters: usize,
    pub non_empty_clusters: usize,
    pub silhouette_score: f64,
    pub inertia: f64,
}

// ---------------------------------------------------------------------------
// Evolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub vocabulary_overlap: VocabularyOverlap,
    pub category_evolution: BTreeMap<SemanticCategory, CategoryEvolution>,
    pub new_vocabulary: NewVocabulary,
    pub frequency_shifts: FrequencyShifts,
    pub linguistic_diversity: LinguisticDiversity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyOverlap {
    pub total_roots: usize,
    pub shared_roots: usize,
    pub period_a_only: usize,
    pub period_b_only: usize,
    pub overlap_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEvolution {
    pub period_a_prominence: f64,
    pub period_b_prominence: f64,
    pub evolution_trend: Trend,
}

/// `Increased` only when the period-B sum is strictly greater; equal sums
/// are reported as `Decreased`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increased,
    Decreased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVocabulary {
    pub count: usize,
    pub examples: Vec<VocabularyExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyExample {
    pub root: RootId,
    pub root_arabic: String,
    pub semantic_category: SemanticCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyShifts {
    pub increasing_usage: Vec<FrequencyShift>,
    pub decreasing_usage: Vec<FrequencyShift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyShift {
    pub root: RootId,
    pub root_arabic: String,
    pub relative_shift: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticDiversity {
    pub period_a_diversity: usize,
    pub period_b_diversity: usize,
    pub diversity_ratio: f64,
}

// ---------------------------------------------------------------------------
// Thematic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThematicReport {
    pub category_distribution: BTreeMap<SemanticCategory, CategoryProfile>,
    pub period_preferences: BTreeMap<SemanticCategory, PeriodLeaning>,
    pub category_relationships: BTreeMap<String, u64>,
    pub temporal_evolution: Note,
    pub diversity_metrics: DiversityMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub root_count: usize,
    pub total_occurrences: u64,
    pub avg_frequency: f64,
    pub period_a_total: u64,
    pub period_b_total: u64,
    pub period_a_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodLeaning {
    StronglyPeriodA,
    StronglyPeriodB,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityMetrics {
    pub categories_with_data: usize,
    pub most_diverse_category: SemanticCategory,
    pub most_frequent_category: SemanticCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note: String,
}

// ---------------------------------------------------------------------------
// Dataset statistics & root profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub dataset_info: DatasetInfo,
    pub root_statistics: RootStatistics,
    pub categorical_distribution: BTreeMap<SemanticCategory, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub total_entries: usize,
    pub total_unique_roots: usize,
    pub total_cooccurrence_pairs: usize,
    pub dataset_version: String,
    pub generated_at: DateTime<Utc>, // informational only
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_stats: Option<FrequencyStats>,
    pub period_a_roots: usize,
    pub period_b_roots: usize,
    pub hapax_legomena: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootProfile {
    pub root: RootId,
    pub root_arabic: String,
    pub semantic_category: SemanticCategory,
    pub total_frequency: u64,
    pub period_a_frequency: u64,
    pub period_b_frequency: u64,
    pub period_a_ratio: f64,
    pub frequency_rank: usize,
    pub related_roots: Vec<RelatedRoot>,
    pub usage_examples: Vec<UsageExample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedRoot {
    pub root: RootId,
    pub cooccurrence_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageExample {
    pub sura: u16,
    pub aya: u16,
    pub form: String,
    pub tag: String,
}

// ---------------------------------------------------------------------------
// Suras
// ---------------------------------------------------------------------------

/// Fixed period assignment of a sura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    PeriodA,
    PeriodB,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuraDetail {
    pub sura_number: u16,
    pub verse_count: u16,
    pub unique_roots_count: usize,
    pub period: Period,
    pub most_frequent_roots: Vec<SuraRoot>,
    pub thematic_breakdown: BTreeMap<SemanticCategory, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuraRoot {
    pub root: RootId,
    pub root_arabic: String,
    pub frequency_in_sura: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuraComparison {
    pub suras_compared: Vec<u16>,
    pub vocabulary_overlap: Vec<SuraOverlap>,
}

/// Root-set overlap of two suras; Jaccard is 0 when the union is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuraOverlap {
    pub sura_a: u16,
    pub sura_b: u16,
    pub intersection: usize,
    pub union: usize,
    pub jaccard_similarity: f64,
}

// ---------------------------------------------------------------------------
// Root search
// ---------------------------------------------------------------------------

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 1000;

/// Listing filter over the frequency table. Filters are conjunctive; the
/// page is taken after filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootQuery {
    #[serde(default, alias = "semantic_category", deserialize_with = "strict_category")]
    pub category: Option<SemanticCategory>,
    #[serde(default)]
    pub min_frequency: Option<u64>,
    /// Case-insensitive substring of the root or its Arabic form.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_page_size")]
    pub limit: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for RootQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_frequency: None,
            search: None,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RootQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootListing {
    pub total_matches: usize,
    pub offset: usize,
    pub limit: usize,
    pub roots: Vec<RootSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootSummary {
    pub root: RootId,
    pub root_arabic: String,
    pub semantic_category: SemanticCategory,
    pub total_frequency: u64,
    pub period_a_frequency: u64,
    pub period_b_frequency: u64,
    pub period_a_ratio: f64,
    pub frequency_rank: usize,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Total failure of one analysis call. Serialized for callers as the
/// single-field [`ErrorReport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("No frequency data available")]
    NoFrequencyData,

    #[error("No co-occurrence data available")]
    NoCooccurrenceData,

    #[error("Clustering capability not available")]
    ClusteringUnavailable,

    #[error("Cannot form {requested} clusters from {available} roots")]
    InvalidClusterCount { requested: usize, available: usize },

    #[error("Root '{0}' not found")]
    UnknownRoot(String),

    #[error("Clustering failed: {0}")]
    ClusteringFailed(String),

    #[error("No occurrence data available")]
    NoOccurrenceData,

    #[error("Sura number must be between 1 and 114, got {0}")]
    InvalidSura(u16),

    #[error("Sura {0} not found")]
    SuraNotFound(u16),

    #[error("Between 2 and 10 suras can be compared, got {0}")]
    InvalidComparison(usize),
}

impl AnalysisError {
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            error: self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}
