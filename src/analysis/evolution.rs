use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::stats;
use crate::lookup::LookupIndex;
use crate::tables::RootFrequency;
use crate::types::identifiers::{RootId, SemanticCategory};
use crate::types::reports::{
    AnalysisError, CategoryEvolution, EvolutionReport, FrequencyShift, FrequencyShifts,
    LinguisticDiversity, NewVocabulary, Trend, VocabularyExample, VocabularyOverlap,
};

pub const NEW_VOCABULARY_EXAMPLES: usize = 10;
pub const SHIFT_EXTREMES: usize = 10;

pub fn analyze(rows: &[RootFrequency], lookup: &LookupIndex) -> Result<EvolutionReport, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoFrequencyData);
    }

    let period_a: BTreeSet<&RootId> = rows.iter().filter(|r| r.period_a > 0).map(|r| &r.root).collect();
    let period_b: BTreeSet<&RootId> = rows.iter().filter(|r| r.period_b > 0).map(|r| &r.root).collect();

    Ok(EvolutionReport {
        vocabulary_overlap: overlap(&period_a, &period_b),
        category_evolution: category_evolution(rows),
        new_vocabulary: new_vocabulary(rows, lookup),
        frequency_shifts: frequency_shifts(rows, lookup),
        linguistic_diversity: LinguisticDiversity {
            period_a_diversity: period_a.len(),
            period_b_diversity: period_b.len(),
            diversity_ratio: stats::ratio(period_b.len() as f64, period_a.len() as f64),
        },
    })
}

fn overlap(period_a: &BTreeSet<&RootId>, period_b: &BTreeSet<&RootId>) -> VocabularyOverlap {
    let union = period_a.union(period_b).count();
    let shared = period_a.intersection(period_b).count();
    let report = VocabularyOverlap {
        total_roots: union,
        shared_roots: shared,
        period_a_only: period_a.difference(period_b).count(),
        period_b_only: period_b.difference(period_a).count(),
        overlap_percentage: stats::ratio(shared as f64, union as f64) * 100.0,
    };
    debug_assert_eq!(
        report.shared_roots + report.period_a_only + report.period_b_only,
        report.total_roots
    );
    report
}

fn category_evolution(rows: &[RootFrequency]) -> BTreeMap<SemanticCategory, CategoryEvolution> {
    let mut sums: BTreeMap<SemanticCategory, (u64, u64)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.category).or_insert((0, 0));
        entry.0 += row.period_a;
        entry.1 += row.period_b;
    }

    sums.into_iter()
        .filter(|(_, (a, b))| a + b > 0)
        .map(|(category, (a, b))| {
            let total = (a + b) as f64;
            let evolution = CategoryEvolution {
                period_a_prominence: a as f64 / total,
                period_b_prominence: b as f64 / total,
                // Equal sums fold into `Decreased`.
                evolution_trend: if b > a { Trend::Increased } else { Trend::Decreased },
            };
            (category, evolution)
        })
        .collect()
}

fn new_vocabulary(rows: &[RootFrequency], lookup: &LookupIndex) -> NewVocabulary {
    let introduced: Vec<&RootFrequency> = rows
        .iter()
        .filter(|row| row.period_b > 0 && row.period_a == 0)
        .collect();

    NewVocabulary {
        count: introduced.len(),
        examples: introduced
            .iter()
            .take(NEW_VOCABULARY_EXAMPLES)
            .map(|row| VocabularyExample {
                root: row.root.clone(),
                root_arabic: lookup.arabic_form_of(row.root.as_str()),
                semantic_category: row.category,
            })
            .collect(),
    }
}

fn frequency_shifts(rows: &[RootFrequency], lookup: &LookupIndex) -> FrequencyShifts {
    let shifts: Vec<FrequencyShift> = rows
        .iter()
        .filter(|row| row.total > 0)
        .map(|row| FrequencyShift {
            root: row.root.clone(),
            root_arabic: lookup.arabic_form_of(row.root.as_str()),
            relative_shift: (row.period_b as f64 - row.period_a as f64) / row.total as f64,
        })
        .collect();

    let mut increasing = shifts.clone();
    increasing.sort_by(|a, b| b.relative_shift.total_cmp(&a.relative_shift));
    increasing.truncate(SHIFT_EXTREMES);

    let mut decreasing = shifts;
    decreasing.sort_by(|a, b| a.relative_shift.total_cmp(&b.relative_shift));
    decreasing.truncate(SHIFT_EXTREMES);

    FrequencyShifts {
        increasing_usage: increasing,
        decreasing_usage: decreasing,
    }
}
