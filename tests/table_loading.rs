use std::fs;
use std::path::Path;

use root_analytics::config::TableFiles;
use root_analytics::tables::{LoadError, RecordError, TableLoader, TableSet};
use root_analytics::types::SemanticCategory;
use root_analytics::{into_json, AnalyticsEngine, EngineConfig};
use serde_json::json;
use tempfile::tempdir;

const OCCURRENCES_CSV: &str = "\
sura,aya,Root,FORM,TAG
96,1,qrA,iqra,V
96,1,,bi,P
96,1,,ismi,N
2,2,ktb,alkitab,N
";

const FREQUENCIES_CSV: &str = "\
root,root_arabic,semantic_category,total_frequency,meccan_frequency,medinan_frequency,meccan_ratio
ktb,كتب,books_revelation,319,200,119,0.627
qrA,قرأ,Books_Revelation ,88,60,28,
xyz,,not_a_category,3,3,0,
";

const PAIRS_CSV: &str = "\
root1,root2,cooccurrence_count
ktb,qrA,9
qrA,xyz,1
";

fn write_tables(dir: &Path, occurrences: &str, frequencies: &str, pairs: &str) {
    fs::write(dir.join("quran-enhanced-phase1.csv"), occurrences).unwrap();
    fs::write(dir.join("root-frequency-analysis.csv"), frequencies).unwrap();
    fs::write(dir.join("root-cooccurrence-matrix.csv"), pairs).unwrap();
}

fn config_for(dir: &Path) -> EngineConfig {
    EngineConfig {
        data_dir: dir.to_path_buf(),
        ..EngineConfig::v0()
    }
}

#[test]
fn csv_tables_load_with_column_conventions() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), OCCURRENCES_CSV, FREQUENCIES_CSV, PAIRS_CSV);

    let tables = TableLoader::new(config_for(dir.path()).table_paths()).load().unwrap();

    assert_eq!(tables.occurrences.len(), 4);
    assert_eq!(tables.occurrences_with_root(), 2);
    assert!(tables.occurrences[1].root().is_none());
    assert_eq!(tables.occurrences[3].verse, 2);

    let ktb = &tables.frequencies[0];
    assert_eq!(ktb.arabic.as_deref(), Some("كتب"));
    assert_eq!(ktb.category, SemanticCategory::BooksRevelation);
    assert_eq!(ktb.period_a_ratio(), Some(0.627));

    let qra = &tables.frequencies[1];
    assert_eq!(qra.category, SemanticCategory::BooksRevelation);
    assert!(qra.stored_ratio.is_none());
    assert!((qra.period_a_ratio().unwrap() - 60.0 / 88.0).abs() < 1e-9);

    let xyz = &tables.frequencies[2];
    assert!(xyz.arabic.is_none());
    assert_eq!(xyz.category, SemanticCategory::Uncategorized);

    assert_eq!(tables.cooccurrences.len(), 2);
    assert_eq!(tables.cooccurrences[0].count, 9);
}

#[test]
fn engine_from_config_serves_loaded_tables() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), OCCURRENCES_CSV, FREQUENCIES_CSV, PAIRS_CSV);

    let engine = AnalyticsEngine::from_config(config_for(dir.path()));

    assert_eq!(engine.tables().frequencies.len(), 3);
    let report = engine.analyze_frequency(None).unwrap();
    assert_eq!(report.top_frequent_roots[0].root.as_str(), "ktb");
    assert_eq!(engine.root_profile("كتب").unwrap().frequency_rank, 1);
}

#[test]
fn missing_file_leaves_all_tables_empty() {
    let dir = tempdir().unwrap();
    write_tables(dir.path(), OCCURRENCES_CSV, FREQUENCIES_CSV, PAIRS_CSV);
    fs::remove_file(dir.path().join("root-cooccurrence-matrix.csv")).unwrap();

    let loader = TableLoader::new(config_for(dir.path()).table_paths());
    assert!(matches!(loader.load(), Err(LoadError::Csv { .. }) | Err(LoadError::Io { .. })));
    assert_eq!(loader.load_or_empty(), TableSet::empty());

    // Tables that did load are discarded too.
    let engine = AnalyticsEngine::from_config(config_for(dir.path()));
    assert!(engine.tables().is_empty());
    assert_eq!(
        into_json(&engine.analyze_frequency(None)),
        json!({ "error": "No frequency data available" })
    );
    assert_eq!(
        into_json(&engine.analyze_cooccurrence(2)),
        json!({ "error": "No co-occurrence data available" })
    );
}

#[test]
fn out_of_range_sura_rejects_the_load() {
    let dir = tempdir().unwrap();
    let occurrences = "sura,aya,Root,FORM,TAG\n115,1,ktb,k,N\n";
    write_tables(dir.path(), occurrences, FREQUENCIES_CSV, PAIRS_CSV);

    let loader = TableLoader::new(config_for(dir.path()).table_paths());
    match loader.load() {
        Err(LoadError::InvalidRow { row, source, .. }) => {
            assert_eq!(row, 1);
            assert_eq!(source, RecordError::InvalidSura(115));
        }
        other => panic!("expected invalid row, got {other:?}"),
    }
    assert!(loader.load_or_empty().is_empty());
}

#[test]
fn zero_count_pair_rejects_the_load() {
    let dir = tempdir().unwrap();
    let pairs = "root1,root2,cooccurrence_count\nktb,qrA,0\n";
    write_tables(dir.path(), OCCURRENCES_CSV, FREQUENCIES_CSV, pairs);

    let loader = TableLoader::new(config_for(dir.path()).table_paths());
    assert!(matches!(
        loader.load(),
        Err(LoadError::InvalidRow { source: RecordError::ZeroCount(_, _), .. })
    ));
}

#[test]
fn malformed_number_rejects_the_load() {
    let dir = tempdir().unwrap();
    let frequencies = "root,total_frequency,meccan_frequency,medinan_frequency\nktb,many,1,1\n";
    write_tables(dir.path(), OCCURRENCES_CSV, frequencies, PAIRS_CSV);

    let loader = TableLoader::new(config_for(dir.path()).table_paths());
    assert!(matches!(loader.load(), Err(LoadError::Csv { .. })));
}

#[test]
fn json_tables_use_the_same_record_shapes() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("occurrences.json"),
        r#"[{ "sura": 1, "verse": 1, "root": "smw", "form": "bismi", "tag": "N" }]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("frequencies.json"),
        r#"[{ "root": "smw", "total_frequency": 4, "period_a_frequency": 3, "period_b_frequency": 1 }]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pairs.json"),
        r#"[{ "root1": "smw", "root2": "Alh", "count": 2 }]"#,
    )
    .unwrap();

    let config = EngineConfig {
        data_dir: dir.path().to_path_buf(),
        tables: TableFiles {
            occurrences: "occurrences.json".into(),
            frequencies: "frequencies.json".into(),
            cooccurrences: "pairs.json".into(),
        },
        ..EngineConfig::v0()
    };
    let tables = TableLoader::new(config.table_paths()).load().unwrap();

    assert_eq!(tables.occurrences[0].root().map(|r| r.as_str()), Some("smw"));
    assert_eq!(tables.frequencies[0].period_a, 3);
    assert_eq!(tables.frequencies[0].category, SemanticCategory::Uncategorized);
    assert_eq!(tables.cooccurrences[0].count, 2);
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let config = EngineConfig {
        data_dir: dir.path().to_path_buf(),
        tables: TableFiles {
            occurrences: "occurrences.parquet".into(),
            ..TableFiles::default()
        },
        ..EngineConfig::v0()
    };
    fs::write(dir.path().join("occurrences.parquet"), b"PAR1").unwrap();

    let loader = TableLoader::new(config.table_paths());
    assert!(matches!(loader.load(), Err(LoadError::UnsupportedFormat(_))));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("analytics.json");
    fs::write(
        &path,
        r#"{
            "data_dir": "/srv/corpus",
            "clustering": { "default_k": 4 },
            "cooccurrence_min_threshold": 5
        }"#,
    )
    .unwrap();

    let config = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(config.clustering.default_k, 4);
    assert_eq!(config.clustering.seed, 42);
    assert_eq!(config.cooccurrence_min_threshold, 5);
    assert!(config.capabilities.clustering);
    assert_eq!(
        config.table_paths().occurrences,
        Path::new("/srv/corpus").join("quran-enhanced-phase1.csv")
    );

    assert!(EngineConfig::load_from_file(dir.path().join("missing.json")).is_err());
    fs::write(&path, "{ not json").unwrap();
    assert!(EngineConfig::load_from_file(&path).is_err());
}
