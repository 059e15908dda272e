//! Tests for the corpus commands: scan, aggregate, select, vectorize, run

use std::fs;

use crate::common::{assert_ranking, assert_training_rows, assert_valid_json, TestCorpus};

fn sample_corpus() -> TestCorpus {
    let corpus = TestCorpus::new();
    corpus
        .with_malicious_package("evil")
        .with_benign_package("lib")
        .add_calls("small", &["foo", "bar", "foo"]);
    corpus
}

#[test]
fn test_stages_one_by_one() {
    let corpus = sample_corpus();
    let root = corpus.path_str();

    let scan = corpus.run_cli_success(&["scan", &root, "-j", "2"]);
    assert!(scan.contains("packages: 3 processed, 0 skipped"));
    assert_ranking(&corpus.package("small").join("degree_new.json"));

    let aggregate = corpus.run_cli_success(&["aggregate", &root]);
    assert!(aggregate.contains("packages: 3"));
    let mean = assert_ranking(&corpus.path().join("degree_final_new.json"));
    assert!(mean.get("foo").is_some());

    corpus.run_cli_success(&["select", &root, "-k", "3"]);
    assert!(corpus.path().join("output_top_3_katz_centrality.json").exists());

    let train = corpus.path().join("train.txt");
    corpus.run_cli_success(&[
        "vectorize",
        &root,
        "-k",
        "3",
        "--metric",
        "katz",
        "--train-file",
        train.to_str().unwrap(),
        "--label",
        "1",
    ]);
    assert_training_rows(&fs::read_to_string(&train).unwrap(), 3, 4, "1");
    assert!(corpus.package("evil").join("katz_feature_vector.json").exists());
    assert!(!corpus.package("evil").join("degree_feature_vector.json").exists());
}

#[test]
fn test_run_json_summary() {
    let corpus = sample_corpus();
    let out = tempfile::TempDir::new().unwrap();

    let output = corpus.run_cli_success(&[
        "run",
        &corpus.path_str(),
        "--output",
        out.path().to_str().unwrap(),
        "--top-k",
        "4",
        "-m",
        "degree",
        "-m",
        "harmonic",
        "--label",
        "0",
        "-f",
        "json",
    ]);
    let json = assert_valid_json(&output, "run");

    assert_eq!(json["scan"]["packages"], 3);
    assert_eq!(json["select"]["top_k"], 4);
    assert_eq!(json["select"]["schemas"].as_array().unwrap().len(), 2);
    assert_eq!(json["vectorize"].as_array().unwrap().len(), 2);

    // Everything lands under --output, nothing in the corpus
    assert!(out.path().join("evil/degree_new.json").exists());
    assert!(out.path().join("harmonic_final_new.json").exists());
    assert!(out.path().join("degree_training.txt").exists());
    assert!(!out.path().join("katz_final_new.json").exists());
    assert!(!corpus.package("evil").join("degree_new.json").exists());
}

#[test]
fn test_config_file_with_flag_override() {
    let corpus = sample_corpus();
    let config = corpus.path().join("apisense.toml");
    fs::write(
        &config,
        "top_k = 2\nmetrics = [\"closeness\"]\n\n[katz]\nalpha = 0.05\n",
    )
    .unwrap();

    corpus.run_cli_success(&[
        "run",
        &corpus.path_str(),
        "--config",
        config.to_str().unwrap(),
        "-k",
        "3",
    ]);

    assert!(corpus.path().join("output_top_3_closeness_centrality.json").exists());
    assert!(!corpus.path().join("output_top_2_closeness_centrality.json").exists());
    assert!(!corpus.path().join("degree_final_new.json").exists());
}

#[test]
fn test_package_command() {
    let corpus = sample_corpus();
    let output = corpus.run_cli_success(&["package", "evil", "--dry-run"]);

    assert!(output.contains("package: evil"));
    assert!(output.contains("os.system"));
    assert!(!corpus.package("evil").join("degree_new.json").exists());
}
