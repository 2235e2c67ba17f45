use crate::error::ParseError;
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::{clean, expect_sequence};

/// Extract the table name from the `CREATE OR REPLACE TABLE <name>` head of
/// the cleaned top-level statement.
///
/// Strict by design: this name anchors every subsequent step, so a statement
/// that contains a layer call but not this shape is rejected outright.
pub fn extract_target_name(tree: &SyntaxTree, statement: NodeId) -> Result<String, ParseError> {
    let tokens = clean(tree, tree.children(statement));
    let tail = expect_sequence(
        tree,
        &tokens,
        &[
            &|t, n| t.is_keyword(n, "create"),
            &|t, n| t.is_keyword(n, "or"),
            &|t, n| t.is_keyword(n, "replace"),
            &|t, n| t.is_keyword(n, "table"),
            &|t, n| t.is_group(n),
        ],
    )
    .ok_or_else(|| {
        ParseError::InvalidSqlSyntax("expected 'create or replace table <name>'".to_string())
    })?;
    target_name_from_group(tree, tail[0])
}

/// Concatenate the group's leaves from its first name up to, but not
/// including, the next whitespace leaf; newlines are ignored entirely.
fn target_name_from_group(tree: &SyntaxTree, group: NodeId) -> Result<String, ParseError> {
    let leaves: Vec<NodeId> = tree
        .flatten(group)
        .into_iter()
        .filter(|&leaf| !tree.is_newline(leaf))
        .collect();
    let start = leaves
        .iter()
        .position(|&leaf| tree.is_name(leaf))
        .ok_or_else(|| ParseError::InvalidSqlSyntax("table name not found".to_string()))?;
    let mut name = String::new();
    for &leaf in &leaves[start..] {
        if tree.is_whitespace(leaf) {
            break;
        }
        name.push_str(&tree.text(leaf));
    }
    Ok(name)
}
