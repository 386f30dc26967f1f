use std::collections::{BTreeMap, HashMap, HashSet};

use linfa::metrics::SilhouetteScore;
use linfa::prelude::*;
use linfa_clustering::KMeans as LinfaKMeans;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::analysis::stats;
use crate::config::ClusteringConfig;
use crate::lookup::LookupIndex;
use crate::tables::{CooccurrencePair, RootFrequency};
use crate::types::identifiers::{ClusterId, RootId, SemanticCategory};
use crate::types::reports::{
    AnalysisError, ClusterMember, ClusterSummary, ClusteringMetrics, ClusteringReport,
};

pub const TOP_MEMBERS: usize = 5;

/// Output of one clustering run: a label per input row plus the
/// within-cluster sum of squared distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub inertia: f64,
}

pub trait Clusterer {
    /// Partition the rows of `rows` into at most `k` groups. Callers
    /// guarantee `1 <= k <= rows.nrows()`.
    fn fit(&self, rows: &Array2<f64>, k: usize) -> Result<Clustering, AnalysisError>;
}

/// k-means with k-means++ seeding. Deterministic for a given seed: all
/// restarts draw from one seeded stream and the lowest inertia wins.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    pub seed: u64,
    pub restarts: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        KMeans::from_config(&ClusteringConfig::default())
    }
}

impl KMeans {
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            seed: config.seed,
            restarts: config.restarts.max(1),
            max_iterations: config.max_iterations.max(1),
            tolerance: config.tolerance,
        }
    }
}

impl Clusterer for KMeans {
    fn fit(&self, rows: &Array2<f64>, k: usize) -> Result<Clustering, AnalysisError> {
        let dataset = DatasetBase::new(rows.clone(), Array1::from_elem(rows.nrows(), ()));

        let model = LinfaKMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(self.seed))
            .n_runs(self.restarts)
            .max_n_iterations(self.max_iterations as u64)
            .tolerance(self.tolerance)
            .fit(&dataset)
            .map_err(|e| AnalysisError::ClusteringFailed(e.to_string()))?;

        let labels: Array1<usize> = model.predict(rows);
        let centroids = model.centroids();
        let inertia = rows
            .rows()
            .into_iter()
            .zip(labels.iter())
            .map(|(row, label)| {
                row.iter()
                    .zip(centroids.row(*label).iter())
                    .map(|(x, c)| (x - c) * (x - c))
                    .sum::<f64>()
            })
            .sum();

        Ok(Clustering {
            labels: labels.to_vec(),
            inertia,
        })
    }
}

/// Mean silhouette coefficient with euclidean distance. Defined only for
/// 2..=n-1 distinct labels; 0 otherwise.
pub fn silhouette_score(rows: &Array2<f64>, labels: &[usize]) -> f64 {
    let mut distinct = labels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 2 || distinct.len() >= rows.nrows() {
        return 0.0;
    }

    let dataset = DatasetBase::new(rows.clone(), Array1::from_vec(labels.to_vec()));
    match dataset.silhouette_score() {
        Ok(score) if score.is_finite() => score,
        _ => 0.0,
    }
}

/// Symmetric root-by-root matrix of co-occurrence counts, zero diagonal.
/// Pairs naming a root outside `roots` are skipped. A root listed twice
/// maps to its first position.
pub fn cooccurrence_matrix(roots: &[RootId], pairs: &[CooccurrencePair]) -> Array2<f64> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(roots.len());
    for (i, root) in roots.iter().enumerate() {
        index.entry(root.as_str()).or_insert(i);
    }
    let mut matrix = Array2::zeros((roots.len(), roots.len()));

    for pair in pairs {
        if pair.is_self_pair() {
            continue;
        }
        if let (Some(&i), Some(&j)) = (index.get(pair.root1.as_str()), index.get(pair.root2.as_str())) {
            matrix[[i, j]] = pair.count as f64;
            matrix[[j, i]] = pair.count as f64;
        }
    }
    matrix
}

/// Roots of the frequency table in load order, each once.
fn distinct_roots(rows: &[RootFrequency]) -> Vec<RootId> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter()
        .filter(|row| seen.insert(row.root.as_str()))
        .map(|row| row.root.clone())
        .collect()
}

pub fn cluster_roots<C: Clusterer>(
    clusterer: &C,
    rows: &[RootFrequency],
    pairs: &[CooccurrencePair],
    lookup: &LookupIndex,
    k: usize,
) -> Result<ClusteringReport, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoFrequencyData);
    }
    let roots = distinct_roots(rows);
    if k == 0 || k > roots.len() {
        return Err(AnalysisError::InvalidClusterCount {
            requested: k,
            available: roots.len(),
        });
    }

    let matrix = cooccurrence_matrix(&roots, pairs);
    let fitted = clusterer.fit(&matrix, k)?;

    let mut clusters: BTreeMap<ClusterId, Vec<ClusterMember>> = BTreeMap::new();
    for (root, label) in roots.iter().zip(&fitted.labels) {
        clusters
            .entry(ClusterId(*label))
            .or_default()
            .push(ClusterMember {
                root: root.clone(),
                root_arabic: lookup.arabic_form_of(root.as_str()),
                category: lookup.category_of(root.as_str()),
                frequency: lookup.frequency_of(root.as_str()),
            });
    }

    let cluster_analysis = clusters
        .iter()
        .map(|(id, members)| (*id, summarize(members)))
        .collect();

    Ok(ClusteringReport {
        clustering_metrics: ClusteringMetrics {
            n_clusters: k,
            non_empty_clusters: clusters.len(),
            silhouette_score: silhouette_score(&matrix, &fitted.labels),
            inertia: fitted.inertia,
        },
        clusters,
        cluster_analysis,
    })
}

fn summarize(members: &[ClusterMember]) -> ClusterSummary {
    // Encounter order is kept so the first category seen wins a tie.
    let mut counts: Vec<(SemanticCategory, usize)> = Vec::new();
    for member in members {
        match counts.iter_mut().find(|(category, _)| *category == member.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((member.category, 1)),
        }
    }
    let dominant_category = counts
        .iter()
        .fold(None, |best: Option<(SemanticCategory, usize)>, (category, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((*category, *count)),
        })
        .map(|(category, _)| category)
        .unwrap_or_default();

    let frequencies: Vec<f64> = members.iter().map(|m| m.frequency as f64).collect();

    let mut top_roots = members.to_vec();
    top_roots.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    top_roots.truncate(TOP_MEMBERS);

    ClusterSummary {
        size: members.len(),
        dominant_category,
        category_diversity: counts.len(),
        avg_frequency: stats::mean(&frequencies),
        top_roots,
    }
}
