use std::collections::BTreeMap;

use crate::analysis::stats;
use crate::config::Capabilities;
use crate::lookup::LookupIndex;
use crate::tables::RootFrequency;
use crate::types::identifiers::SemanticCategory;
use crate::types::reports::{
    AnalysisError, CategoryAggregate, FrequencyDistribution, FrequencyFilter, FrequencyReport,
    PeriodAnalysis, PeriodPreference, RankedRoot, SummaryStatistics,
};

pub const TOP_ROOTS: usize = 20;
pub const VERY_FREQUENT_THRESHOLD: u64 = 100;

const PERIOD_A_PREFERENCE: f64 = 0.6;
const PERIOD_B_PREFERENCE: f64 = 0.4;
const STRONGLY_PERIOD_A: f64 = 0.8;
const STRONGLY_PERIOD_B: f64 = 0.2;

pub fn analyze(
    rows: &[RootFrequency],
    lookup: &LookupIndex,
    filter: Option<&FrequencyFilter>,
    capabilities: Capabilities,
) -> Result<FrequencyReport, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoFrequencyData);
    }

    let selected: Vec<&RootFrequency> = rows
        .iter()
        .filter(|row| filter.map_or(true, |f| matches(f, row)))
        .collect();

    let frequency_distribution = distribution(&selected);
    let totals: Vec<f64> = selected.iter().map(|row| row.total as f64).collect();

    Ok(FrequencyReport {
        total_unique_roots: selected.len(),
        hapax_legomena_count: selected.iter().filter(|row| row.total == 1).count(),
        very_frequent_count: selected
            .iter()
            .filter(|row| row.total >= VERY_FREQUENT_THRESHOLD)
            .count(),
        frequency_distribution,
        top_frequent_roots: top_roots(&selected, lookup, TOP_ROOTS),
        category_distribution: category_aggregates(&selected),
        period_analysis: period_analysis(&selected),
        statistical_summary: SummaryStatistics {
            mean_frequency: stats::mean(&totals),
            median_frequency: stats::median(&totals),
            std_frequency: stats::population_std(&totals),
            skewness: capabilities
                .extended_statistics
                .then(|| stats::skewness(&totals)),
        },
    })
}

pub fn matches(filter: &FrequencyFilter, row: &RootFrequency) -> bool {
    if let Some(min) = filter.min_frequency {
        if row.total < min {
            return false;
        }
    }
    if let Some(category) = filter.category {
        if row.category != category {
            return false;
        }
    }
    match filter.period_preference {
        // An undefined ratio satisfies neither preference.
        Some(PeriodPreference::PeriodA) => row.period_a_ratio().is_some_and(|r| r > PERIOD_A_PREFERENCE),
        Some(PeriodPreference::PeriodB) => row.period_a_ratio().is_some_and(|r| r < PERIOD_B_PREFERENCE),
        None => true,
    }
}

fn distribution(rows: &[&RootFrequency]) -> FrequencyDistribution {
    let mut buckets = FrequencyDistribution::default();
    for row in rows {
        match row.total {
            // Zero-total rows belong to no bucket.
            0 => {}
            1 => buckets.once += 1,
            2..=5 => buckets.two_to_five += 1,
            6..=20 => buckets.six_to_twenty += 1,
            21..=100 => buckets.twenty_one_to_hundred += 1,
            _ => buckets.over_hundred += 1,
        }
    }
    buckets
}

fn top_roots(rows: &[&RootFrequency], lookup: &LookupIndex, limit: usize) -> Vec<RankedRoot> {
    let mut ranked: Vec<&RootFrequency> = rows.to_vec();
    // Stable: equal totals keep load order.
    ranked.sort_by(|a, b| b.total.cmp(&a.total));

    let top: Vec<RankedRoot> = ranked
        .into_iter()
        .take(limit)
        .map(|row| RankedRoot {
            root: row.root.clone(),
            root_arabic: row
                .arabic
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| lookup.arabic_form_of(row.root.as_str())),
            total_frequency: row.total,
            semantic_category: row.category,
        })
        .collect();

    debug_assert!(top.windows(2).all(|w| w[0].total_frequency >= w[1].total_frequency));
    top
}

fn category_aggregates(rows: &[&RootFrequency]) -> BTreeMap<SemanticCategory, CategoryAggregate> {
    let mut sums: BTreeMap<SemanticCategory, (usize, u64)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.category).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += row.total;
    }

    sums.into_iter()
        .map(|(category, (count, sum))| {
            let mean = stats::round2(stats::ratio(sum as f64, count as f64));
            (category, CategoryAggregate { count, sum, mean })
        })
        .collect()
}

fn period_analysis(rows: &[&RootFrequency]) -> PeriodAnalysis {
    let period_a_total: u64 = rows.iter().map(|row| row.period_a).sum();
    let period_b_total: u64 = rows.iter().map(|row| row.period_b).sum();
    let grand_total = (period_a_total + period_b_total) as f64;

    let ratios: Vec<f64> = rows.iter().filter_map(|row| row.period_a_ratio()).collect();

    PeriodAnalysis {
        period_a_total_occurrences: period_a_total,
        period_b_total_occurrences: period_b_total,
        period_a_percentage: stats::round2(stats::ratio(period_a_total as f64, grand_total) * 100.0),
        strongly_period_a_roots: ratios.iter().filter(|r| **r > STRONGLY_PERIOD_A).count(),
        strongly_period_b_roots: ratios.iter().filter(|r| **r < STRONGLY_PERIOD_B).count(),
        balanced_roots: ratios
            .iter()
            .filter(|r| (PERIOD_B_PREFERENCE..=PERIOD_A_PREFERENCE).contains(*r))
            .count(),
    }
}
