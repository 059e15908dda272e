//! Lexical fallback for files the structural parser rejects

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::CallSequence;
use crate::lang::Lang;

static CALL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\(").expect("valid call token regex"));

/// Report every `identifier(` token in order of appearance.
///
/// Receivers are not recovered (`os.system(` yields `system`), and language
/// keywords followed by a parenthesis are dropped.
pub fn scan_calls(source: &str, lang: Lang) -> CallSequence {
    let keywords = lang.keywords();
    CALL_TOKEN
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| !keywords.contains(name))
        .map(str::to_string)
        .collect()
}
