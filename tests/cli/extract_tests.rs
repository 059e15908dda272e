//! Tests for the extract command

use crate::common::{assert_valid_json, TestCorpus};

#[test]
fn test_extract_json_structural() {
    let corpus = TestCorpus::new();
    corpus.add_file(
        "pkg",
        "setup.py",
        "import os\n@register\ndef run():\n    os.system(cmd)\n    helper.decode(x).strip()\n",
    );

    let output = corpus.run_cli_success(&["extract", "pkg/setup.py", "-f", "json"]);
    let json = assert_valid_json(&output, "extract");

    assert_eq!(json["language"], "python");
    assert_eq!(json["strategy"], "structural");
    let calls: Vec<&str> = json["calls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    // A bare decorator is a reference, not a call
    assert_eq!(calls, ["os.system", "helper.decode", "strip"]);
}

#[test]
fn test_extract_falls_back_on_broken_source() {
    let corpus = TestCorpus::new();
    corpus.add_file("pkg", "broken.py", "data = urllib.urlopen(url\nexec(data)\n");

    let output = corpus.run_cli_success(&["extract", "pkg/broken.py", "--format", "json"]);
    let json = assert_valid_json(&output, "extract fallback");

    assert_eq!(json["strategy"], "lexical_fallback");
    assert_eq!(json["calls"], serde_json::json!(["urlopen", "exec"]));
}

#[test]
fn test_extract_javascript() {
    let corpus = TestCorpus::new();
    corpus.add_file(
        "npm-pkg",
        "index.js",
        "const cp = require('child_process');\ncp.exec(cmd);\neval(atob(payload));\n",
    );

    let output = corpus.run_cli_success(&["extract", "npm-pkg/index.js"]);
    assert!(output.contains("language: javascript"));
    assert!(output.contains("strategy: structural"));
    assert!(output.contains("calls: 4"));
    assert!(output.contains("cp.exec"));
}
