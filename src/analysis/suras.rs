//! Per-sura views over the occurrence table.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::analysis::stats;
use crate::lookup::LookupIndex;
use crate::tables::records::MAX_SURA;
use crate::tables::OccurrenceRecord;
use crate::types::identifiers::{RootId, SemanticCategory};
use crate::types::reports::{AnalysisError, Period, SuraComparison, SuraDetail, SuraOverlap, SuraRoot};

pub const TOP_SURA_ROOTS: usize = 10;
pub const MIN_COMPARED: usize = 2;
pub const MAX_COMPARED: usize = 10;

/// Suras assigned to period B; every other sura belongs to period A.
pub const PERIOD_B_SURAS: [u16; 28] = [
    2, 3, 4, 5, 8, 9, 13, 22, 24, 33, 47, 48, 49, 55, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 76,
    98, 99, 110,
];

pub fn period_of(sura: u16) -> Period {
    if PERIOD_B_SURAS.contains(&sura) {
        Period::PeriodB
    } else {
        Period::PeriodA
    }
}

fn validate(sura: u16) -> Result<u16, AnalysisError> {
    if sura == 0 || sura > MAX_SURA {
        return Err(AnalysisError::InvalidSura(sura));
    }
    Ok(sura)
}

fn records_of(occurrences: &[OccurrenceRecord], sura: u16) -> impl Iterator<Item = &OccurrenceRecord> {
    occurrences.iter().filter(move |record| record.sura == sura)
}

/// Distinct non-blank roots of one sura.
fn root_set(occurrences: &[OccurrenceRecord], sura: u16) -> BTreeSet<&RootId> {
    records_of(occurrences, sura).filter_map(OccurrenceRecord::root).collect()
}

pub fn sura_detail(
    occurrences: &[OccurrenceRecord],
    lookup: &LookupIndex,
    sura: u16,
) -> Result<SuraDetail, AnalysisError> {
    let sura = validate(sura)?;
    if occurrences.is_empty() {
        return Err(AnalysisError::NoOccurrenceData);
    }

    let mut verse_count = 0u16;
    let mut seen = false;
    // Encounter order is kept so ties in the top list go to the first seen.
    let mut counts: Vec<(&RootId, usize)> = Vec::new();
    let mut positions: HashMap<&RootId, usize> = HashMap::new();
    for record in records_of(occurrences, sura) {
        seen = true;
        verse_count = verse_count.max(record.verse);
        if let Some(root) = record.root() {
            match positions.get(root) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    positions.insert(root, counts.len());
                    counts.push((root, 1));
                }
            }
        }
    }
    if !seen {
        return Err(AnalysisError::SuraNotFound(sura));
    }

    // Only roots present in the frequency table carry a category.
    let mut thematic_breakdown: BTreeMap<SemanticCategory, usize> = BTreeMap::new();
    for (root, _) in &counts {
        if let Some(entry) = lookup.get(root.as_str()) {
            *thematic_breakdown.entry(entry.category).or_default() += 1;
        }
    }

    let unique_roots_count = counts.len();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let most_frequent_roots = counts
        .into_iter()
        .take(TOP_SURA_ROOTS)
        .map(|(root, frequency_in_sura)| SuraRoot {
            root: root.clone(),
            root_arabic: lookup.arabic_form_of(root.as_str()),
            frequency_in_sura,
        })
        .collect();

    Ok(SuraDetail {
        sura_number: sura,
        verse_count,
        unique_roots_count,
        period: period_of(sura),
        most_frequent_roots,
        thematic_breakdown,
    })
}

/// Pairwise vocabulary overlap, in request order. Repeated suras are
/// compared once; suras with no occurrences are left out of the pairs.
pub fn compare_suras(occurrences: &[OccurrenceRecord], suras: &[u16]) -> Result<SuraComparison, AnalysisError> {
    if !(MIN_COMPARED..=MAX_COMPARED).contains(&suras.len()) {
        return Err(AnalysisError::InvalidComparison(suras.len()));
    }
    let mut suras_compared: Vec<u16> = Vec::with_capacity(suras.len());
    for sura in suras {
        let sura = validate(*sura)?;
        if !suras_compared.contains(&sura) {
            suras_compared.push(sura);
        }
    }
    if occurrences.is_empty() {
        return Err(AnalysisError::NoOccurrenceData);
    }

    let present: Vec<(u16, BTreeSet<&RootId>)> = suras_compared
        .iter()
        .filter(|sura| records_of(occurrences, **sura).next().is_some())
        .map(|sura| (*sura, root_set(occurrences, *sura)))
        .collect();

    let mut vocabulary_overlap = Vec::new();
    for (i, (sura_a, roots_a)) in present.iter().enumerate() {
        for (sura_b, roots_b) in &present[i + 1..] {
            let intersection = roots_a.intersection(roots_b).count();
            let union = roots_a.union(roots_b).count();
            vocabulary_overlap.push(SuraOverlap {
                sura_a: *sura_a,
                sura_b: *sura_b,
                intersection,
                union,
                jaccard_similarity: stats::ratio(intersection as f64, union as f64),
            });
        }
    }

    Ok(SuraComparison {
        suras_compared,
        vocabulary_overlap,
    })
}
