//! Error Handling and Edge Case Tests
//!
//! Fatal errors are configuration problems caught before any work starts.
//! Everything else degrades to "no contribution" for one file or package.

use std::fs;

use apisense::{pipeline, ApiSenseError, Metric, PipelineConfig};

use crate::common::{assert_ranking, TestCorpus};

// ============================================================================
// FAIL-FAST CONFIGURATION ERRORS
// ============================================================================

#[test]
fn test_missing_corpus_root_fails_fast() {
    let corpus = TestCorpus::new();
    let missing = corpus.path().join("no-such-corpus");

    let (code, stderr) = corpus.run_cli_failure(&["scan", missing.to_str().unwrap()]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Corpus root not found"), "{}", stderr);
    assert!(!missing.exists());
}

#[test]
fn test_corpus_root_is_a_file() {
    let corpus = TestCorpus::new();
    corpus.add_file("pkg", "a.py", "f()\n");

    let (code, stderr) = corpus.run_cli_failure(&["scan", "pkg/a.py"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Not a directory"), "{}", stderr);
}

#[test]
fn test_zero_top_k_is_configuration_error() {
    let corpus = TestCorpus::new();
    let (code, _) = corpus.run_cli_failure(&["select", &corpus.path_str(), "-k", "0"]);
    assert_eq!(code, Some(2));
}

#[test]
fn test_invalid_config_file() {
    let corpus = TestCorpus::new();
    let config = corpus.path().join("bad.toml");
    fs::write(&config, "metrics = [\"pagerank\"]\n").unwrap();

    let (code, stderr) = corpus.run_cli_failure(&[
        "scan",
        &corpus.path_str(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("Configuration error"), "{}", stderr);
}

#[test]
fn test_vectorize_without_schema() {
    let corpus = TestCorpus::new();
    corpus.add_calls("pkg", &["eval"]);

    let (code, _) = corpus.run_cli_failure(&["vectorize", &corpus.path_str(), "-m", "degree"]);
    assert_eq!(code, Some(1));
}

#[test]
fn test_malformed_schema_is_artifact_error() {
    let corpus = TestCorpus::new();
    corpus.add_calls("pkg", &["eval"]);
    let schema = corpus.path().join("schema.json");
    fs::write(&schema, "[\"eval\", \"exec\"]").unwrap();

    let (code, stderr) = corpus.run_cli_failure(&[
        "vectorize",
        &corpus.path_str(),
        "-m",
        "degree",
        "--schema",
        schema.to_str().unwrap(),
    ]);
    assert_eq!(code, Some(4));
    assert!(stderr.contains("Malformed artifact"), "{}", stderr);
}

// ============================================================================
// NON-FATAL: PER-FILE AND PER-PACKAGE DEGRADATION
// ============================================================================

#[test]
fn test_empty_corpus() {
    let corpus = TestCorpus::new();
    let config = corpus.config();

    let scan = pipeline::run_scan(&config, false).unwrap();
    assert_eq!(scan.packages, 0);

    let aggregate = pipeline::run_aggregate(&config).unwrap();
    for metric in &aggregate.metrics {
        assert_eq!(metric.symbols, 0);
    }
    assert!(assert_ranking(&corpus.path().join("katz_final_new.json")).is_empty());
}

#[test]
fn test_files_without_calls_and_empty_packages() {
    let corpus = TestCorpus::new();
    corpus
        .add_file("consts", "settings.py", "DEBUG = False\nNAME = 'x'\n")
        .add_file("blank", "__init__.py", "")
        .add_empty_package("nothing");

    let summary = pipeline::run_scan(&corpus.config(), false).unwrap();
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.files_with_calls, 0);
    for pkg in ["consts", "blank", "nothing"] {
        assert!(assert_ranking(&corpus.package(pkg).join("harmonic_new.json")).is_empty());
    }
}

#[test]
fn test_broken_file_uses_lexical_fallback() {
    let corpus = TestCorpus::new();
    corpus
        .add_file("legacy", "setup.py", "print 'installing'\nexec urllib2.urlopen(URL).read()\nsetup(name='legacy'\n")
        .add_file("legacy", "ok.py", "os.system(cmd)\n");

    let summary = pipeline::run_scan(&corpus.config(), false).unwrap();
    assert_eq!(summary.lexical_fallbacks, 1);

    let record = assert_ranking(&corpus.package("legacy").join("degree_new.json"));
    assert!(record.get("urlopen").is_some());
    assert!(record.get("os.system").is_some());
}

#[test]
fn test_invalid_utf8_is_read_lossily() {
    let corpus = TestCorpus::new();
    corpus.add_empty_package("binary");
    let mut bytes = b"eval(x)\n# \xff\xfe\n".to_vec();
    bytes.extend_from_slice(b"exec(y)\n");
    fs::write(corpus.package("binary").join("odd.py"), bytes).unwrap();

    let summary = pipeline::run_scan(&corpus.config(), false).unwrap();
    assert_eq!(summary.failed_files, 0);
    assert_eq!(summary.calls, 2);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped_not_fatal() {
    let corpus = TestCorpus::new();
    corpus.add_file("mixed", "good.py", "eval(x)\nexec(y)\n");
    std::os::unix::fs::symlink(
        corpus.path().join("nowhere.py"),
        corpus.package("mixed").join("broken.py"),
    )
    .unwrap();

    let summary = pipeline::run_scan(&corpus.config(), false).unwrap();
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);

    let record = assert_ranking(&corpus.package("mixed").join("degree_new.json"));
    assert!(record.get("eval").is_some());
    assert!(record.get("exec").is_some());
}

#[test]
fn test_malformed_package_record_counts_as_zero() {
    let corpus = TestCorpus::new();
    corpus.add_calls("good", &["eval", "exec"]).add_calls("bad", &["eval"]);
    let config = corpus.config();

    pipeline::run_scan(&config, false).unwrap();
    fs::write(corpus.package("bad").join("degree_new.json"), "{\"eval\": ").unwrap();

    let summary = pipeline::run_aggregate(&config).unwrap();
    let degree = summary
        .metrics
        .iter()
        .find(|m| m.metric == Metric::Degree)
        .unwrap();
    assert_eq!(degree.records_malformed, 1);

    let good = assert_ranking(&corpus.package("good").join("degree_new.json"));
    assert_eq!(degree.ranking.get("eval"), Some(good.get("eval").unwrap() / 2.0));
}

#[test]
fn test_javascript_corpus_by_extension() {
    let corpus = TestCorpus::new();
    corpus
        .add_file("npm-evil", "index.js", "require('https').get(u, r => eval(r.body));\n")
        .add_file("npm-evil", "node_modules/dep/index.js", "ignored()\n")
        .add_file("npm-evil", "build.py", "python_only()\n");

    let mut config = PipelineConfig::for_corpus(corpus.path());
    config.parallelism = Some(1);
    config.extensions = vec!["js".to_string()];
    config.validate().unwrap();

    pipeline::run_scan(&config, false).unwrap();
    let record = assert_ranking(&corpus.package("npm-evil").join("closeness_new.json"));
    assert!(record.get("get").is_some());
    assert!(record.get("eval").is_some());
    assert!(record.get("ignored").is_none());
    assert!(record.get("python_only").is_none());
}

#[test]
fn test_config_error_variant() {
    let corpus = TestCorpus::new();
    let mut config = PipelineConfig::for_corpus(corpus.path());
    config.metrics.clear();
    assert!(matches!(config.validate(), Err(ApiSenseError::Config { .. })));
}
