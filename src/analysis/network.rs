use std::collections::HashMap;

use petgraph::algo::{connected_components, dijkstra};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{info, warn};

use crate::analysis::stats;
use crate::lookup::LookupIndex;
use crate::tables::{CooccurrencePair, RootFrequency};
use crate::types::identifiers::{RootId, SemanticCategory};
use crate::types::reports::NetworkMetrics;

/// Node payload: a root annotated from the frequency table.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    pub root: RootId,
    pub frequency: u64,
    pub category: SemanticCategory,
    pub arabic: String,
}

/// Co-occurrence graph built once from the frequency and pair tables.
///
/// Pairs naming a root missing from the frequency table still contribute
/// an edge; the missing endpoint becomes a node with default annotations.
/// A repeated pair keeps a single edge carrying the last count seen.
#[derive(Debug, Clone, Default)]
pub struct RootNetwork {
    graph: UnGraph<RootNode, u64>,
    nodes: HashMap<RootId, NodeIndex>,
}

impl RootNetwork {
    pub fn build(rows: &[RootFrequency], pairs: &[CooccurrencePair], lookup: &LookupIndex) -> Self {
        let mut network = RootNetwork::default();

        for row in rows {
            network.node_for(&row.root, lookup);
        }

        let mut self_pairs = 0usize;
        for pair in pairs {
            if pair.is_self_pair() {
                self_pairs += 1;
                continue;
            }
            let a = network.node_for(&pair.root1, lookup);
            let b = network.node_for(&pair.root2, lookup);
            network.graph.update_edge(a, b, pair.count);
        }
        if self_pairs > 0 {
            warn!(pairs = self_pairs, "self co-occurrence pairs skipped in network graph");
        }

        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "network graph built"
        );
        network
    }

    fn node_for(&mut self, root: &RootId, lookup: &LookupIndex) -> NodeIndex {
        if let Some(index) = self.nodes.get(root) {
            return *index;
        }
        let index = self.graph.add_node(RootNode {
            root: root.clone(),
            frequency: lookup.frequency_of(root.as_str()),
            category: lookup.category_of(root.as_str()),
            arabic: lookup.arabic_form_of(root.as_str()),
        });
        self.nodes.insert(root.clone(), index);
        index
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, root: &str) -> Option<&RootNode> {
        self.nodes.get(root).map(|index| &self.graph[*index])
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<u64> {
        let a = *self.nodes.get(a)?;
        let b = *self.nodes.get(b)?;
        self.graph.find_edge(a, b).map(|edge| self.graph[edge])
    }

    /// `2E / (N(N-1))`; 0 for fewer than two nodes.
    pub fn density(&self) -> f64 {
        let n = self.node_count() as f64;
        stats::ratio(2.0 * self.edge_count() as f64, n * (n - 1.0))
    }

    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    pub fn is_connected(&self) -> bool {
        self.node_count() > 0 && self.component_count() == 1
    }

    pub fn metrics(&self) -> NetworkMetrics {
        let mut metrics = NetworkMetrics {
            nodes: self.node_count(),
            edges: self.edge_count(),
            density: self.density(),
            number_of_components: self.component_count(),
            average_path_length: None,
            diameter: None,
        };

        // Path metrics are only defined on a connected graph.
        if self.is_connected() {
            let (average, diameter) = self.path_lengths();
            metrics.average_path_length = Some(average);
            metrics.diameter = Some(diameter);
        }
        metrics
    }

    /// Mean unweighted shortest-path length over ordered node pairs, and the
    /// longest such path. Assumes a connected graph.
    fn path_lengths(&self) -> (f64, usize) {
        let n = self.node_count();
        let mut total_hops = 0usize;
        let mut diameter = 0usize;

        for source in self.graph.node_indices() {
            // Unit edge cost: distances are hop counts.
            for hops in dijkstra(&self.graph, source, None, |_| 1usize).into_values() {
                total_hops += hops;
                diameter = diameter.max(hops);
            }
        }

        let pairs = (n * n.saturating_sub(1)) as f64;
        (stats::ratio(total_hops as f64, pairs), diameter)
    }
}
