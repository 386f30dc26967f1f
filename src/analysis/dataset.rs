use std::collections::BTreeMap;

use chrono::Utc;

use crate::analysis::stats;
use crate::lookup::LookupIndex;
use crate::tables::{TableSet, TableSetVersion};
use crate::tables::RootFrequency;
use crate::types::reports::{
    AnalysisError, DatasetInfo, DatasetStatistics, FrequencyStats, RelatedRoot, RootListing,
    RootProfile, RootQuery, RootStatistics, RootSummary, UsageExample,
};

pub const RELATED_ROOTS: usize = 10;
pub const USAGE_EXAMPLES: usize = 5;

pub fn statistics(tables: &TableSet, version: &TableSetVersion) -> DatasetStatistics {
    let rows = &tables.frequencies;
    let totals: Vec<f64> = rows.iter().map(|row| row.total as f64).collect();

    let frequency_stats = (!totals.is_empty()).then(|| FrequencyStats {
        mean: stats::mean(&totals),
        median: stats::median(&totals),
        std: stats::population_std(&totals),
        min: totals.iter().copied().fold(f64::INFINITY, f64::min),
        max: totals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        q25: stats::percentile(&totals, 25.0),
        q75: stats::percentile(&totals, 75.0),
    });

    let mut categorical_distribution = BTreeMap::new();
    for row in rows {
        *categorical_distribution.entry(row.category).or_insert(0usize) += 1;
    }

    DatasetStatistics {
        dataset_info: DatasetInfo {
            total_entries: tables.occurrences.len(),
            total_unique_roots: rows.len(),
            total_cooccurrence_pairs: tables.cooccurrences.len(),
            dataset_version: version.as_str().to_string(),
            generated_at: Utc::now(),
        },
        root_statistics: RootStatistics {
            frequency_stats,
            period_a_roots: rows.iter().filter(|row| row.period_a > 0).count(),
            period_b_roots: rows.iter().filter(|row| row.period_b > 0).count(),
            hapax_legomena: rows.iter().filter(|row| row.total == 1).count(),
        },
        categorical_distribution,
    }
}

/// Detail view of one root, found by identifier or by Arabic form.
pub fn root_profile(tables: &TableSet, lookup: &LookupIndex, query: &str) -> Result<RootProfile, AnalysisError> {
    let root = lookup
        .resolve(query)
        .ok_or_else(|| AnalysisError::UnknownRoot(query.to_string()))?;
    let entry = lookup
        .get(root.as_str())
        .ok_or_else(|| AnalysisError::UnknownRoot(query.to_string()))?;
    let row = &tables.frequencies[entry.position];

    let related_roots = tables
        .cooccurrences
        .iter()
        .filter_map(|pair| {
            pair.partner_of(root.as_str()).map(|partner| RelatedRoot {
                root: partner.clone(),
                cooccurrence_count: pair.count,
            })
        })
        .take(RELATED_ROOTS)
        .collect();

    let usage_examples = tables
        .occurrences
        .iter()
        .filter(|record| record.root() == Some(root))
        .take(USAGE_EXAMPLES)
        .map(|record| UsageExample {
            sura: record.sura,
            aya: record.verse,
            form: record.form.clone(),
            tag: record.tag.clone(),
        })
        .collect();

    Ok(RootProfile {
        root: row.root.clone(),
        root_arabic: lookup.arabic_form_of(row.root.as_str()),
        semantic_category: row.category,
        total_frequency: row.total,
        period_a_frequency: row.period_a,
        period_b_frequency: row.period_b,
        period_a_ratio: row.period_a_ratio().unwrap_or(0.0),
        frequency_rank: entry.position + 1,
        related_roots,
        usage_examples,
    })
}

/// One page of frequency rows matching `query`, in load order. Ranks are
/// 1-based load positions, so they survive filtering.
pub fn search_roots(rows: &[RootFrequency], lookup: &LookupIndex, query: &RootQuery) -> Result<RootListing, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoFrequencyData);
    }
    let needle = query.search.as_deref().map(str::to_lowercase);

    let matches: Vec<(usize, &RootFrequency)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| query.category.map_or(true, |category| row.category == category))
        .filter(|(_, row)| query.min_frequency.map_or(true, |min| row.total >= min))
        .filter(|(_, row)| needle.as_deref().map_or(true, |needle| mentions(row, needle)))
        .collect();

    let limit = query.page_size();
    let roots = matches
        .iter()
        .skip(query.offset)
        .take(limit)
        .map(|(position, row)| RootSummary {
            root: row.root.clone(),
            root_arabic: lookup.arabic_form_of(row.root.as_str()),
            semantic_category: row.category,
            total_frequency: row.total,
            period_a_frequency: row.period_a,
            period_b_frequency: row.period_b,
            period_a_ratio: row.period_a_ratio().unwrap_or(0.0),
            frequency_rank: position + 1,
        })
        .collect();

    Ok(RootListing {
        total_matches: matches.len(),
        offset: query.offset,
        limit,
        roots,
    })
}

/// `needle` is already lowercased.
fn mentions(row: &RootFrequency, needle: &str) -> bool {
    row.root.as_str().to_lowercase().contains(needle)
        || row
            .arabic
            .as_deref()
            .map_or(false, |arabic| arabic.to_lowercase().contains(needle))
}
