//! Deterministic analytics over a corpus of lexical roots.
//!
//! `root-analytics` loads three tables (per-occurrence entries, per-root
//! frequencies and per-pair co-occurrence counts) and derives frequency
//! distributions, co-occurrence network metrics, k-means clustering,
//! thematic breakdowns and period-evolution statistics. The tables are
//! loaded once and never mutated; every analysis is a pure function of
//! them, and identical inputs always produce identical reports.

pub mod analysis;
pub mod config;
pub mod lookup;
pub mod tables;
pub mod types;

pub use analysis::{into_json, AnalyticsEngine};
pub use config::{Capabilities, EngineConfig};
