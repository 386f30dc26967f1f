use std::collections::BTreeMap;

use crate::analysis::network::RootNetwork;
use crate::analysis::stats;
use crate::lookup::LookupIndex;
use crate::tables::CooccurrencePair;
use crate::types::identifiers::SemanticCategory;
use crate::types::reports::{
    AnalysisError, Association, CooccurrenceReport, CooccurrenceStatistics, NetworkSection,
    PairSummary,
};

pub const TOP_PAIRS: usize = 20;
/// Rows of the unfiltered table scanned for same-category pairs.
pub const CATEGORY_SAMPLE: usize = 50;
/// Rows of the filtered table scored for association strength.
pub const ASSOCIATION_SAMPLE: usize = 20;
pub const SIGNIFICANT_STRENGTH: f64 = 2.0;

/// `network` is `None` when network analysis is disabled.
pub fn analyze(
    pairs: &[CooccurrencePair],
    lookup: &LookupIndex,
    network: Option<&RootNetwork>,
    occurrences_with_root: usize,
    min_count: u64,
) -> Result<CooccurrenceReport, AnalysisError> {
    if pairs.is_empty() {
        return Err(AnalysisError::NoCooccurrenceData);
    }

    let significant: Vec<&CooccurrencePair> = pairs.iter().filter(|p| p.count >= min_count).collect();
    let counts: Vec<f64> = significant.iter().map(|p| p.count as f64).collect();

    Ok(CooccurrenceReport {
        total_pairs_analyzed: pairs.len(),
        significant_pairs: significant.len(),
        top_cooccurring_pairs: top_pairs(&significant, lookup, TOP_PAIRS),
        network_metrics: network_section(network),
        semantic_clustering: same_category_pairs(pairs, lookup),
        strong_associations: strong_associations(&significant, lookup, occurrences_with_root),
        statistics: CooccurrenceStatistics {
            mean_cooccurrence: stats::mean(&counts),
            max_cooccurrence: significant.iter().map(|p| p.count).max().unwrap_or(0),
            network_density: network.map(RootNetwork::density).unwrap_or(0.0),
        },
    })
}

fn top_pairs(pairs: &[&CooccurrencePair], lookup: &LookupIndex, limit: usize) -> Vec<PairSummary> {
    let mut ranked: Vec<&CooccurrencePair> = pairs.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    ranked
        .into_iter()
        .take(limit)
        .map(|pair| PairSummary {
            root1: pair.root1.clone(),
            root2: pair.root2.clone(),
            cooccurrence_count: pair.count,
            root1_arabic: lookup.arabic_form_of(pair.root1.as_str()),
            root2_arabic: lookup.arabic_form_of(pair.root2.as_str()),
        })
        .collect()
}

pub fn network_section(network: Option<&RootNetwork>) -> NetworkSection {
    match network {
        Some(net) if net.node_count() > 0 => NetworkSection::Available(net.metrics()),
        _ => NetworkSection::Unavailable {
            note: "Network analysis not available".to_string(),
        },
    }
}

fn same_category_pairs(
    pairs: &[CooccurrencePair],
    lookup: &LookupIndex,
) -> BTreeMap<SemanticCategory, Vec<String>> {
    let mut groups: BTreeMap<SemanticCategory, Vec<String>> = BTreeMap::new();
    for pair in pairs.iter().take(CATEGORY_SAMPLE) {
        let first = lookup.category_of(pair.root1.as_str());
        let second = lookup.category_of(pair.root2.as_str());
        if first == second && first.is_categorized() {
            groups.entry(first).or_default().push(pair.key());
        }
    }
    groups
}

/// Observed over expected co-occurrence, where expected assumes the two
/// roots are independent: `freq1 * freq2 / occurrences_with_root`.
pub fn strong_associations(
    pairs: &[&CooccurrencePair],
    lookup: &LookupIndex,
    occurrences_with_root: usize,
) -> Vec<Association> {
    let mut associations: Vec<Association> = pairs
        .iter()
        .take(ASSOCIATION_SAMPLE)
        .filter_map(|pair| {
            let freq1 = lookup.frequency_of(pair.root1.as_str()) as f64;
            let freq2 = lookup.frequency_of(pair.root2.as_str()) as f64;
            let expected = stats::ratio(freq1 * freq2, occurrences_with_root as f64);
            let strength = stats::ratio(pair.count as f64, expected);

            (strength > SIGNIFICANT_STRENGTH).then(|| Association {
                root1: pair.root1.clone(),
                root2: pair.root2.clone(),
                cooccurrence: pair.count,
                expected,
                association_strength: strength,
            })
        })
        .collect();

    associations.sort_by(|a, b| b.association_strength.total_cmp(&a.association_strength));
    associations
}
