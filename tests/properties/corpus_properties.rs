//! Accumulation, aggregation and encoding properties

use std::fs;

use apisense::aggregate::aggregate_metric;
use apisense::package::CentralityAccumulator;
use apisense::{
    centrality, extract_symbols, mean_ranking, vectorize, CallGraph, FeatureSchema, GraphScores,
    KatzParams, Lang, Metric, PackageProcessor, Ranking,
};

use crate::common::{assert_rankings_close, TestCorpus};

const SOURCES: &[&str] = &[
    "import os\nos.system(cmd)\nexec(payload)\n",
    "data = open(path).read()\nprint(len(data))\n",
    "s = socket.socket()\ns.connect(addr)\ns.send(data)\ns.close()\n",
    "exec(base64.b64decode(blob))\nexec(zlib.decompress(blob))\n",
    "print('a')\nprint('b')\nopen(p)\n",
    "requests.get(url)\nos.system(cmd)\nsubprocess.Popen(args)\nos.system(cmd2)\n",
];

fn file_scores() -> Vec<GraphScores> {
    SOURCES
        .iter()
        .filter_map(|src| {
            let extraction = extract_symbols(src, Lang::Python);
            CallGraph::from_sequence(extraction.symbols())
        })
        .map(|graph| centrality::compute(&graph, &Metric::ALL, &KatzParams::default()))
        .collect()
}

fn accumulate(scores: &[GraphScores], order: &[usize]) -> Vec<Ranking> {
    let mut acc = CentralityAccumulator::new(&Metric::ALL);
    for &i in order {
        acc.add(&scores[i]);
    }
    acc.into_records().into_values().collect()
}

fn ranking(pairs: &[(&str, f64)]) -> Ranking {
    Ranking::from_scores(pairs.iter().map(|(s, v)| (s.to_string(), *v)))
}

#[test]
fn test_accumulation_ignores_file_order() {
    let scores = file_scores();
    let n = scores.len();
    let baseline = accumulate(&scores, &(0..n).collect::<Vec<_>>());

    // Rotations and their reversals cover every file in every position
    for shift in 0..n {
        let rotated: Vec<usize> = (0..n).map(|i| (i + shift) % n).collect();
        let reversed: Vec<usize> = rotated.iter().rev().copied().collect();
        for order in [rotated, reversed] {
            let records = accumulate(&scores, &order);
            for (expected, actual) in baseline.iter().zip(&records) {
                assert_rankings_close(expected, actual, 1e-9);
            }
        }
    }
}

#[test]
fn test_package_record_independent_of_worker_count() {
    let corpus = TestCorpus::new();
    for (i, src) in SOURCES.iter().enumerate() {
        corpus.add_file("pkg", &format!("mod_{}.py", i), src);
    }

    let mut serial = corpus.config();
    serial.parallelism = Some(1);
    let mut parallel = corpus.config();
    parallel.parallelism = Some(4);

    let a = PackageProcessor::new(&serial).unwrap().analyze(&corpus.package("pkg")).unwrap();
    let b = PackageProcessor::new(&parallel).unwrap().analyze(&corpus.package("pkg")).unwrap();

    assert_eq!(a.calls, b.calls);
    for metric in Metric::ALL {
        assert_rankings_close(&a.records[&metric], &b.records[&metric], 1e-9);
    }
}

#[test]
fn test_corpus_mean_uses_full_package_count() {
    let records = [
        ranking(&[("socket.connect", 3.0), ("print", 1.5)]),
        ranking(&[("print", 1.5)]),
        ranking(&[("print", 3.0)]),
    ];
    let mean = mean_ranking(&records, 3);

    assert_eq!(mean.get("socket.connect"), Some(1.0));
    assert_eq!(mean.get("print"), Some(2.0));
    assert_eq!(mean.entries()[0].0, "print");
}

#[test]
fn test_missing_metric_file_contributes_zero() {
    let corpus = TestCorpus::new();
    corpus
        .add_empty_package("a")
        .add_empty_package("b")
        .add_empty_package("c");
    ranking(&[("socket.connect", 3.0)])
        .save(&corpus.package("a").join("closeness_new.json"))
        .unwrap();
    // b has only a degree record, c has nothing
    ranking(&[("socket.connect", 9.0)])
        .save(&corpus.package("b").join("degree_new.json"))
        .unwrap();

    let config = corpus.config();
    let packages = vec![corpus.package("a"), corpus.package("b"), corpus.package("c")];
    let aggregate = aggregate_metric(&packages, Metric::Closeness, &config);

    assert_eq!(aggregate.records_found, 1);
    assert_eq!(aggregate.records_missing, 2);
    assert_eq!(aggregate.ranking.get("socket.connect"), Some(1.0));
}

#[test]
fn test_vector_width_is_schema_width() {
    let corpus_ranking = ranking(&[
        ("os.system", 5.0),
        ("exec", 4.0),
        ("eval", 3.0),
        ("socket.socket", 2.0),
        ("base64.b64decode", 1.5),
        ("print", 1.0),
    ]);
    let schema = FeatureSchema::select(&corpus_ranking, 5);
    let package = ranking(&[("exec", 2.0), ("print", 7.0), ("socket.socket", 1.25)]);

    let vector = vectorize(&schema, &package);
    assert_eq!(vector.len(), 5);
    assert_eq!(vector.values(), [0.0, 2.0, 0.0, 1.25, 0.0]);
    assert_eq!(vector.values().iter().filter(|v| **v == 0.0).count(), 3);
    assert_eq!(vector.to_line(Some(1)).split(' ').count(), 6);
}

#[test]
fn test_top_k_selection_is_byte_identical() {
    let corpus = TestCorpus::new();
    corpus.with_malicious_package("evil").with_benign_package("lib");

    let mut config = corpus.config();
    config.top_k = 500;
    apisense::pipeline::run_scan(&config, false).unwrap();
    apisense::pipeline::run_aggregate(&config).unwrap();

    let path = FeatureSchema::default_path(corpus.path(), 500, Metric::Degree);
    apisense::pipeline::run_select(&config).unwrap();
    let first = fs::read(&path).unwrap();
    apisense::pipeline::run_select(&config).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}
