pub mod loader;
pub mod records;
pub mod versioning;

pub use loader::{LoadError, TableLoader, TablePaths};
pub use records::{CooccurrencePair, OccurrenceRecord, RecordError, RootFrequency};
pub use versioning::TableSetVersion;

/// The three source tables, immutable once handed to an engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    pub occurrences: Vec<OccurrenceRecord>,
    pub frequencies: Vec<RootFrequency>,
    pub cooccurrences: Vec<CooccurrencePair>,
}

impl TableSet {
    pub fn new(
        occurrences: Vec<OccurrenceRecord>,
        frequencies: Vec<RootFrequency>,
        cooccurrences: Vec<CooccurrencePair>,
    ) -> Self {
        Self {
            occurrences,
            frequencies,
            cooccurrences,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty() && self.frequencies.is_empty() && self.cooccurrences.is_empty()
    }

    /// Number of occurrence records carrying a non-blank root.
    pub fn occurrences_with_root(&self) -> usize {
        self.occurrences.iter().filter(|r| r.root().is_some()).count()
    }

    pub fn version(&self) -> TableSetVersion {
        TableSetVersion::from_tables(self)
    }
}
