//! Structural call extraction over a tree-sitter syntax tree

use tree_sitter::{Node, Parser};

use crate::error::{ApiSenseError, Result};
use crate::extract::{CallSequence, Symbol};
use crate::lang::Lang;

/// Parse `source` and collect the target of every call expression, ordered
/// by where the called name appears in the text. A chained call like
/// `open(p).read()` yields `open` before `read`, while a nested call like
/// `exec(decode(x))` keeps the outer `exec` first.
///
/// The call target is:
/// - the bare name for `foo()`
/// - `receiver.method` for `os.system()` when the receiver is a plain name
/// - just `method` when the receiver is any other expression
///   (`self.session.get()`, `open(p).read()`)
///
/// Calls through subscripts, lambdas or parenthesized expressions have no
/// static name and are skipped.
///
/// # Errors
///
/// Returns `ApiSenseError::ParseFailure` when the grammar cannot be loaded
/// or the tree contains syntax errors.
pub fn extract_calls(source: &str, lang: Lang) -> Result<CallSequence> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| ApiSenseError::ParseFailure {
            message: format!("Failed to set language {}: {:?}", lang.name(), e),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ApiSenseError::ParseFailure {
            message: format!("{} parser returned no tree", lang.name()),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ApiSenseError::ParseFailure {
            message: format!(
                "syntax error near line {}",
                first_error_line(&root).unwrap_or(root.start_position().row) + 1
            ),
        });
    }

    let call_kind = lang.call_kind();
    let mut calls = Vec::new();
    visit_all(&root, |node| {
        if node.kind() == call_kind {
            if let Some(target) = call_target(node, source, lang) {
                calls.push(target);
            }
        }
    });
    calls.sort_by_key(|(position, _)| *position);

    Ok(calls.into_iter().map(|(_, symbol)| symbol).collect())
}

/// Resolve the callee of a call node to a symbol, paired with the byte
/// offset where that symbol starts in the source
fn call_target(call: &Node, source: &str, lang: Lang) -> Option<(usize, Symbol)> {
    let callee = call.child_by_field_name("function")?;
    let (member_kind, object_field, member_field) = lang.member_access();

    match callee.kind() {
        "identifier" => Some((callee.start_byte(), node_text(&callee, source))),
        kind if kind == member_kind => {
            let member = callee.child_by_field_name(member_field)?;
            let method = node_text(&member, source);
            match callee.child_by_field_name(object_field) {
                Some(object) if object.kind() == "identifier" => Some((
                    object.start_byte(),
                    format!("{}.{}", node_text(&object, source), method),
                )),
                _ => Some((member.start_byte(), method)),
            }
        }
        _ => None,
    }
}

fn node_text(node: &Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

/// Row of the first error or missing node, for diagnostics
fn first_error_line(root: &Node) -> Option<usize> {
    let mut line = None;
    visit_all(root, |node| {
        if line.is_none() && (node.is_error() || node.is_missing()) {
            line = Some(node.start_position().row);
        }
    });
    line
}

/// Pre-order walk over every node (iterative to avoid stack overflow on
/// deeply nested generated code)
fn visit_all<F>(node: &Node, mut visitor: F)
where
    F: FnMut(&Node),
{
    let mut cursor = node.walk();
    let mut did_visit_children = false;

    loop {
        if !did_visit_children {
            visitor(&cursor.node());

            if cursor.goto_first_child() {
                continue;
            }
        }

        if cursor.goto_next_sibling() {
            did_visit_children = false;
            continue;
        }

        if !cursor.goto_parent() {
            break;
        }
        did_visit_children = true;
    }
}
