pub mod clustering;
pub mod cooccurrence;
pub mod dataset;
pub mod evolution;
pub mod frequency;
pub mod network;
pub mod stats;
pub mod suras;
pub mod thematic;

use serde::Serialize;
use tracing::{debug, error};

use crate::config::EngineConfig;
use crate::lookup::LookupIndex;
use crate::tables::{TableLoader, TableSet, TableSetVersion};
use crate::types::reports::{
	AnalysisError, ClusteringReport, CooccurrenceReport, DatasetStatistics, EvolutionReport,
	FrequencyFilter, FrequencyReport, RootListing, RootProfile, RootQuery, SuraComparison,
	SuraDetail, ThematicReport,
};
pub use clustering::{Clusterer, Clustering, KMeans};
pub use network::{RootNetwork, RootNode};

/// One engine per process: owns the loaded tables, the lookup index and
/// the network graph, all immutable after construction. Every operation is
/// a pure read, so a shared `&AnalyticsEngine` serves concurrent callers.
pub struct AnalyticsEngine<C = KMeans> {
	tables: TableSet,
	lookup: LookupIndex,
	network: Option<RootNetwork>,
	version: TableSetVersion,
	config: EngineConfig,
	clusterer: C,
}

impl AnalyticsEngine<KMeans> {
	/// Load the tables named by `config`. A failed load leaves the engine
	/// with three empty tables; build a new engine to retry.
	pub fn from_config(config: EngineConfig) -> Self {
		let tables = TableLoader::new(config.table_paths()).load_or_empty();
		Self::from_tables(tables, config)
	}

	pub fn from_tables(tables: TableSet, config: EngineConfig) -> Self {
		let clusterer = KMeans::from_config(&config.clustering);
		Self::with_clusterer(tables, config, clusterer)
	}
}

impl<C> AnalyticsEngine<C>
where
	C: Clusterer,
{
	pub fn with_clusterer(tables: TableSet, config: EngineConfig, clusterer: C) -> Self {
		let lookup = LookupIndex::build(&tables.frequencies);
		let network = config
			.capabilities
			.network_analysis
			.then(|| RootNetwork::build(&tables.frequencies, &tables.cooccurrences, &lookup));
		let version = tables.version();
		debug!(version = version.as_str(), "analytics engine ready");

		Self {
			tables,
			lookup,
			network,
			version,
			config,
			clusterer,
		}
	}

	pub fn tables(&self) -> &TableSet {
		&self.tables
	}

	pub fn lookup(&self) -> &LookupIndex {
		&self.lookup
	}

	pub fn network(&self) -> Option<&RootNetwork> {
		self.network.as_ref()
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn version(&self) -> &TableSetVersion {
		&self.version
	}

	pub fn analyze_frequency(
		&self,
		filter: Option<&FrequencyFilter>,
	) -> Result<FrequencyReport, AnalysisError> {
		logged(
			"frequency",
			frequency::analyze(
				&self.tables.frequencies,
				&self.lookup,
				filter,
				self.config.capabilities,
			),
		)
	}

	pub fn analyze_cooccurrence(&self, min_count: u64) -> Result<CooccurrenceReport, AnalysisError> {
		logged(
			"cooccurrence",
			cooccurrence::analyze(
				&self.tables.cooccurrences,
				&self.lookup,
				self.network.as_ref(),
				self.tables.occurrences_with_root(),
				min_count,
			),
		)
	}

	/// Co-occurrence analysis at the configured minimum count.
	pub fn analyze_cooccurrence_default(&self) -> Result<CooccurrenceReport, AnalysisError> {
		self.analyze_cooccurrence(self.config.cooccurrence_min_threshold)
	}

	pub fn analyze_thematic(&self) -> Result<ThematicReport, AnalysisError> {
		logged(
			"thematic",
			thematic::analyze(&self.tables.frequencies, &self.tables.cooccurrences, &self.lookup),
		)
	}

	pub fn cluster_roots(&self, k: usize) -> Result<ClusteringReport, AnalysisError> {
		// Capability check comes before any data check.
		if !self.config.capabilities.clustering {
			return logged("clustering", Err(AnalysisError::ClusteringUnavailable));
		}
		logged(
			"clustering",
			clustering::cluster_roots(
				&self.clusterer,
				&self.tables.frequencies,
				&self.tables.cooccurrences,
				&self.lookup,
				k,
			),
		)
	}

	/// Clustering with the configured default cluster count.
	pub fn cluster_roots_default(&self) -> Result<ClusteringReport, AnalysisError> {
		self.cluster_roots(self.config.clustering.default_k)
	}

	pub fn analyze_evolution(&self) -> Result<EvolutionReport, AnalysisError> {
		logged(
			"evolution",
			evolution::analyze(&self.tables.frequencies, &self.lookup),
		)
	}

	pub fn dataset_statistics(&self) -> DatasetStatistics {
		dataset::statistics(&self.tables, &self.version)
	}

	pub fn root_profile(&self, root: &str) -> Result<RootProfile, AnalysisError> {
		logged(
			"root_profile",
			dataset::root_profile(&self.tables, &self.lookup, root),
		)
	}

	pub fn search_roots(&self, query: &RootQuery) -> Result<RootListing, AnalysisError> {
		logged(
			"search_roots",
			dataset::search_roots(&self.tables.frequencies, &self.lookup, query),
		)
	}

	pub fn sura_detail(&self, sura: u16) -> Result<SuraDetail, AnalysisError> {
		logged(
			"sura_detail",
			suras::sura_detail(&self.tables.occurrences, &self.lookup, sura),
		)
	}

	pub fn compare_suras(&self, suras: &[u16]) -> Result<SuraComparison, AnalysisError> {
		logged("compare_suras", suras::compare_suras(&self.tables.occurrences, suras))
	}
}

fn logged<T>(operation: &str, result: Result<T, AnalysisError>) -> Result<T, AnalysisError> {
	if let Err(e) = &result {
		error!(operation, error = %e, "analysis failed");
	}
	result
}

/// Collapse an analysis result into the value handed to a boundary layer:
/// the report itself, or `{"error": <message>}`.
pub fn into_json<T: Serialize>(result: &Result<T, AnalysisError>) -> serde_json::Value {
	let value = match result {
		Ok(report) => serde_json::to_value(report),
		Err(e) => serde_json::to_value(e.to_report()),
	};
	value.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
}
