use root_analytics::tables::{CooccurrencePair, OccurrenceRecord, RootFrequency, TableSet};
use root_analytics::types::{AnalysisError, NetworkSection, SemanticCategory};
use root_analytics::{into_json, AnalyticsEngine, Capabilities, EngineConfig};
use serde_json::json;

fn occurrence(root: Option<&str>) -> OccurrenceRecord {
    OccurrenceRecord {
        sura: 2,
        verse: 1,
        root: root.map(Into::into),
        form: "x".into(),
        tag: "N".into(),
    }
}

fn freq(root: &str, category: SemanticCategory, total: u64) -> RootFrequency {
    RootFrequency::new(root, category, total, 0)
}

fn pair(a: &str, b: &str, count: u64) -> CooccurrencePair {
    CooccurrencePair::new(a, b, count)
}

fn engine(tables: TableSet) -> AnalyticsEngine {
    AnalyticsEngine::from_tables(tables, EngineConfig::v0())
}

fn association_tables() -> TableSet {
    let mut occurrences: Vec<OccurrenceRecord> = (0..100).map(|_| occurrence(Some("ktb"))).collect();
    // Rootless particles do not count towards the expected-value denominator.
    occurrences.extend((0..7).map(|_| occurrence(None)));

    TableSet::new(
        occurrences,
        vec![
            freq("ktb", SemanticCategory::BooksRevelation, 10).with_arabic("كتب"),
            freq("qra", SemanticCategory::BooksRevelation, 20).with_arabic("قرأ"),
        ],
        vec![pair("ktb", "qra", 5)],
    )
}

#[test]
fn association_strength_scenario() {
    let report = engine(association_tables()).analyze_cooccurrence(2).unwrap();

    assert_eq!(report.strong_associations.len(), 1);
    let association = &report.strong_associations[0];
    assert_eq!(association.root1.as_str(), "ktb");
    assert_eq!(association.root2.as_str(), "qra");
    assert_eq!(association.cooccurrence, 5);
    assert!((association.expected - 2.0).abs() < 1e-9);
    assert!((association.association_strength - 2.5).abs() < 1e-9);

    assert_eq!(report.top_cooccurring_pairs[0].root1_arabic, "كتب");
    assert_eq!(report.top_cooccurring_pairs[0].root2_arabic, "قرأ");
}

#[test]
fn associations_exceed_threshold_and_are_sorted() {
    let occurrences = (0..1000).map(|_| occurrence(Some("r"))).collect();
    let tables = TableSet::new(
        occurrences,
        vec![
            freq("a", SemanticCategory::FaithBelief, 100),
            freq("b", SemanticCategory::FaithBelief, 100),
            freq("c", SemanticCategory::FaithBelief, 10),
            freq("d", SemanticCategory::FaithBelief, 10),
        ],
        vec![
            pair("a", "b", 15), // expected 10, strength 1.5
            pair("c", "d", 3),  // expected 0.1, strength 30
            pair("a", "c", 5),  // expected 1, strength 5
        ],
    );
    let report = engine(tables).analyze_cooccurrence(2).unwrap();
    let strengths: Vec<f64> = report
        .strong_associations
        .iter()
        .map(|a| a.association_strength)
        .collect();

    assert_eq!(strengths.len(), 2);
    assert!(strengths.windows(2).all(|w| w[0] >= w[1]));
    for association in &report.strong_associations {
        assert!(association.association_strength > 2.0);
        let recomputed = association.cooccurrence as f64 / association.expected;
        assert!((association.association_strength - recomputed).abs() < 1e-9);
    }
}

#[test]
fn unknown_roots_have_zero_expected_and_are_not_associations() {
    let tables = TableSet::new(
        vec![occurrence(Some("a"))],
        vec![freq("a", SemanticCategory::FaithBelief, 4)],
        vec![pair("ghost", "phantom", 9)],
    );
    let report = engine(tables).analyze_cooccurrence(2).unwrap();

    assert!(report.strong_associations.is_empty());
    assert_eq!(report.top_cooccurring_pairs[0].root1_arabic, "ghost");
}

#[test]
fn empty_pair_table_returns_error_result() {
    let tables = TableSet::new(vec![], vec![freq("a", SemanticCategory::FaithBelief, 1)], vec![]);
    let result = engine(tables).analyze_cooccurrence(2);

    assert_eq!(result.as_ref().unwrap_err(), &AnalysisError::NoCooccurrenceData);
    assert_eq!(into_json(&result), json!({ "error": "No co-occurrence data available" }));
}

#[test]
fn min_count_filters_top_pairs_but_not_network() {
    let tables = TableSet::new(
        vec![],
        vec![
            freq("a", SemanticCategory::FaithBelief, 5),
            freq("b", SemanticCategory::FaithBelief, 5),
            freq("c", SemanticCategory::FaithBelief, 5),
        ],
        vec![pair("a", "b", 1), pair("b", "c", 4), pair("a", "c", 9)],
    );
    let report = engine(tables).analyze_cooccurrence(2).unwrap();

    assert_eq!(report.total_pairs_analyzed, 3);
    assert_eq!(report.significant_pairs, 2);
    let counts: Vec<u64> = report
        .top_cooccurring_pairs
        .iter()
        .map(|p| p.cooccurrence_count)
        .collect();
    assert_eq!(counts, vec![9, 4]);
    assert_eq!(report.statistics.max_cooccurrence, 9);
    assert!((report.statistics.mean_cooccurrence - 6.5).abs() < 1e-9);

    match &report.network_metrics {
        NetworkSection::Available(metrics) => {
            assert_eq!(metrics.nodes, 3);
            assert_eq!(metrics.edges, 3);
            assert!((metrics.density - 1.0).abs() < 1e-9);
            assert_eq!(metrics.number_of_components, 1);
            assert_eq!(metrics.diameter, Some(1));
            assert_eq!(metrics.average_path_length, Some(1.0));
        }
        NetworkSection::Unavailable { .. } => panic!("network should be available"),
    }
    assert!((report.statistics.network_density - 1.0).abs() < 1e-9);
}

/// Twenty weak pairs (strength 1.5) plus one strong pair (strength 30),
/// with the strong pair at `strong_at` in the table.
fn association_sample_tables(strong_at: usize) -> TableSet {
    let occurrences = (0..1000).map(|_| occurrence(Some("ktb"))).collect();
    let mut rows = Vec::new();
    let mut pairs = Vec::new();
    for i in 0..20 {
        let (a, b) = (format!("w{i}a"), format!("w{i}b"));
        rows.push(freq(&a, SemanticCategory::Uncategorized, 100));
        rows.push(freq(&b, SemanticCategory::Uncategorized, 100));
        pairs.push(pair(&a, &b, 15));
    }
    rows.push(freq("s1", SemanticCategory::Uncategorized, 10));
    rows.push(freq("s2", SemanticCategory::Uncategorized, 10));
    pairs.insert(strong_at, pair("s1", "s2", 3));

    TableSet::new(occurrences, rows, pairs)
}

#[test]
fn associations_score_only_the_first_twenty_filtered_rows() {
    let late = engine(association_sample_tables(20)).analyze_cooccurrence(2).unwrap();
    assert_eq!(late.significant_pairs, 21);
    assert!(late.strong_associations.is_empty());

    let early = engine(association_sample_tables(0)).analyze_cooccurrence(2).unwrap();
    assert_eq!(early.strong_associations.len(), 1);
    let association = &early.strong_associations[0];
    assert_eq!(association.root1.as_str(), "s1");
    assert!((association.expected - 0.1).abs() < 1e-9);
    assert!((association.association_strength - 30.0).abs() < 1e-9);
}

#[test]
fn top_pairs_are_bounded_to_twenty() {
    let rows: Vec<RootFrequency> = (0..30)
        .map(|i| freq(&format!("r{i}"), SemanticCategory::Uncategorized, 3))
        .collect();
    let pairs = (0..29)
        .map(|i| pair(&format!("r{i}"), &format!("r{}", i + 1), 2 + i as u64))
        .collect();
    let report = engine(TableSet::new(vec![], rows, pairs)).analyze_cooccurrence(2).unwrap();

    assert_eq!(report.top_cooccurring_pairs.len(), 20);
    assert_eq!(report.top_cooccurring_pairs[0].cooccurrence_count, 30);
    assert!(report
        .top_cooccurring_pairs
        .windows(2)
        .all(|w| w[0].cooccurrence_count >= w[1].cooccurrence_count));
}

#[test]
fn disconnected_network_omits_path_metrics() {
    let tables = TableSet::new(
        vec![],
        vec![],
        vec![pair("a", "b", 3), pair("c", "d", 3)],
    );
    let report = engine(tables).analyze_cooccurrence(2).unwrap();

    match &report.network_metrics {
        NetworkSection::Available(metrics) => {
            assert_eq!(metrics.nodes, 4);
            assert_eq!(metrics.number_of_components, 2);
            assert!(metrics.average_path_length.is_none());
            assert!(metrics.diameter.is_none());
        }
        NetworkSection::Unavailable { .. } => panic!("network should be available"),
    }

    let value = into_json(&Ok::<_, AnalysisError>(report.clone()));
    assert!(value["network_metrics"].get("diameter").is_none());
}

#[test]
fn disabled_network_reports_note() {
    let mut config = EngineConfig::v0();
    config.capabilities = Capabilities {
        network_analysis: false,
        ..Capabilities::default()
    };
    let engine = AnalyticsEngine::from_tables(association_tables(), config);
    assert!(engine.network().is_none());

    let result = engine.analyze_cooccurrence(2);
    let report = result.as_ref().unwrap();
    assert_eq!(report.statistics.network_density, 0.0);
    assert_eq!(
        into_json(&result)["network_metrics"],
        json!({ "note": "Network analysis not available" })
    );
    // Association strength does not depend on the graph.
    assert_eq!(report.strong_associations.len(), 1);
}

#[test]
fn same_category_pairs_scan_first_fifty_rows() {
    let rows: Vec<RootFrequency> = (0..61)
        .map(|i| freq(&format!("r{i}"), SemanticCategory::WorshipRitual, 2))
        .collect();
    let mut pairs: Vec<CooccurrencePair> = (0..60)
        .map(|i| pair(&format!("r{i}"), &format!("r{}", i + 1), 1))
        .collect();
    pairs.insert(0, pair("r0", "unknown", 1));

    let report = engine(TableSet::new(vec![], rows, pairs)).analyze_cooccurrence(2).unwrap();
    let worship = &report.semantic_clustering[&SemanticCategory::WorshipRitual];

    // The mixed pair is the first of the fifty scanned rows.
    assert_eq!(worship.len(), 49);
    assert_eq!(worship[0], "r0-r1");
    assert!(!report.semantic_clustering.contains_key(&SemanticCategory::Uncategorized));
    // Sampling ignores `min_count`.
    assert_eq!(report.significant_pairs, 0);
}

#[test]
fn default_threshold_comes_from_config() {
    let mut config = EngineConfig::v0();
    config.cooccurrence_min_threshold = 6;
    let engine = AnalyticsEngine::from_tables(association_tables(), config);

    let report = engine.analyze_cooccurrence_default().unwrap();
    assert_eq!(report.significant_pairs, 0);
    assert!(report.strong_associations.is_empty());
}
