use std::collections::BTreeMap;

use crate::analysis::stats;
use crate::lookup::LookupIndex;
use crate::tables::{CooccurrencePair, RootFrequency};
use crate::types::identifiers::SemanticCategory;
use crate::types::reports::{
    AnalysisError, CategoryProfile, DiversityMetrics, Note, PeriodLeaning, ThematicReport,
};

const STRONGLY_PERIOD_A: f64 = 0.7;
const STRONGLY_PERIOD_B: f64 = 0.3;

pub fn analyze(
    rows: &[RootFrequency],
    pairs: &[CooccurrencePair],
    lookup: &LookupIndex,
) -> Result<ThematicReport, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoFrequencyData);
    }

    let category_distribution = category_profiles(rows);

    let period_preferences = category_distribution
        .iter()
        .map(|(category, profile)| (*category, leaning(profile)))
        .collect();

    let diversity_metrics = DiversityMetrics {
        categories_with_data: category_distribution
            .values()
            .filter(|profile| profile.root_count > 0)
            .count(),
        most_diverse_category: first_max_by(&category_distribution, |p| p.root_count as u64),
        most_frequent_category: first_max_by(&category_distribution, |p| p.total_occurrences),
    };

    Ok(ThematicReport {
        category_distribution,
        period_preferences,
        category_relationships: category_relationships(pairs, lookup),
        temporal_evolution: Note {
            note: "Temporal evolution analysis requires chronological data".to_string(),
        },
        diversity_metrics,
    })
}

fn category_profiles(rows: &[RootFrequency]) -> BTreeMap<SemanticCategory, CategoryProfile> {
    let mut profiles: BTreeMap<SemanticCategory, CategoryProfile> = BTreeMap::new();
    for row in rows {
        let profile = profiles.entry(row.category).or_insert(CategoryProfile {
            root_count: 0,
            total_occurrences: 0,
            avg_frequency: 0.0,
            period_a_total: 0,
            period_b_total: 0,
            period_a_ratio: 0.0,
        });
        profile.root_count += 1;
        profile.total_occurrences += row.total;
        profile.period_a_total += row.period_a;
        profile.period_b_total += row.period_b;
    }

    for profile in profiles.values_mut() {
        profile.avg_frequency =
            stats::round2(stats::ratio(profile.total_occurrences as f64, profile.root_count as f64));
        profile.period_a_ratio = stats::ratio(
            profile.period_a_total as f64,
            (profile.period_a_total + profile.period_b_total) as f64,
        );
    }
    profiles
}

/// A category with no period occurrences at all has no leaning.
fn leaning(profile: &CategoryProfile) -> PeriodLeaning {
    if profile.period_a_total + profile.period_b_total == 0 {
        return PeriodLeaning::Balanced;
    }
    let period_a_ratio = profile.period_a_ratio;
    if period_a_ratio > STRONGLY_PERIOD_A {
        PeriodLeaning::StronglyPeriodA
    } else if period_a_ratio < STRONGLY_PERIOD_B {
        PeriodLeaning::StronglyPeriodB
    } else {
        PeriodLeaning::Balanced
    }
}

/// Co-occurrence counts summed per unordered category pair, keyed
/// `first|second` with the labels in lexicographic order.
fn category_relationships(pairs: &[CooccurrencePair], lookup: &LookupIndex) -> BTreeMap<String, u64> {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for pair in pairs {
        let a = lookup.category_of(pair.root1.as_str()).as_str();
        let b = lookup.category_of(pair.root2.as_str()).as_str();
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        *totals.entry(format!("{first}|{second}")).or_default() += pair.count;
    }
    totals
}

fn first_max_by(
    profiles: &BTreeMap<SemanticCategory, CategoryProfile>,
    key: impl Fn(&CategoryProfile) -> u64,
) -> SemanticCategory {
    let mut best: Option<(SemanticCategory, u64)> = None;
    for (category, profile) in profiles {
        let value = key(profile);
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((*category, value));
        }
    }
    best.map(|(category, _)| category).unwrap_or_default()
}
