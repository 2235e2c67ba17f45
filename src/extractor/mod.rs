/// `layer.automl(...)` extraction.
pub mod automl;
/// Command value types handed to the execution dispatcher.
pub mod command;
/// Two-pass sub-statement resolution and `FROM` clause extraction.
pub mod fragment;
/// `layer.predict(...)` extraction.
pub mod predict;
/// Fetch-SQL rebuilding and normalization.
pub mod rebuild;
/// `CREATE OR REPLACE TABLE` target-name extraction.
pub mod target;
/// `layer.train(...)` extraction.
pub mod train;

use crate::classifier::layer_call::{classify_verb, locate_layer_call, Verb};
use crate::error::ParseError;
use crate::extractor::command::LayerCommand;
use crate::extractor::fragment::SelectFragment;
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::clean;

/// Parse one rendered SQL statement.
///
/// Returns `Ok(None)` when no `layer.*` call is present anywhere in the
/// statement — the caller should execute the SQL unmodified. Returns a
/// command for a well-formed embedded call, and an error for a statement
/// that contains a layer call but is malformed around it.
pub fn parse_layer_sql(sql: &str) -> Result<Option<LayerCommand>, ParseError> {
    let tree = SyntaxTree::parse(sql)?;
    let root = tree.root();
    let Some(call) = locate_layer_call(&tree, root) else {
        return Ok(None);
    };
    let target_name = target::extract_target_name(&tree, root)?;
    let verb = classify_verb(&tree, call)?;
    let fragment = SelectFragment::resolve(&tree, call)?;
    let command = match verb {
        Verb::Train => LayerCommand::Train(train::extract_train(&tree, call, &fragment, target_name)?),
        Verb::Predict => {
            LayerCommand::Predict(predict::extract_predict(&tree, call, &fragment, target_name)?)
        }
        Verb::AutoMl => {
            LayerCommand::AutoMl(automl::extract_automl(&tree, call, &fragment, target_name)?)
        }
    };
    Ok(Some(command))
}

/// Column names held by a call-argument container: a bracket group holding
/// an identifier list or a single identifier, or a lone identifier.
pub(crate) fn container_columns(tree: &SyntaxTree, container: NodeId) -> Vec<String> {
    if tree.is_brackets(container) {
        let inner = clean(tree, tree.children(container));
        let Some(&first) = inner.first() else {
            return Vec::new();
        };
        if tree.is_identifier_list(first) {
            return tree
                .list_items(first)
                .into_iter()
                .map(|item| tree.text(item).trim().to_string())
                .collect();
        }
        return vec![tree.text(first).trim().to_string()];
    }
    vec![tree.text(container).trim().to_string()]
}

/// Build the malformed-arguments error naming the verb and the raw argument
/// text.
pub(crate) fn invalid_call(tree: &SyntaxTree, verb: Verb, arguments: &[NodeId]) -> ParseError {
    let raw = arguments
        .iter()
        .map(|&node| tree.text(node))
        .collect::<Vec<_>>()
        .join(" ");
    ParseError::InvalidFunctionSyntax { verb, raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::walk::find_functions;

    #[test]
    fn container_columns_reads_a_bracketed_list() {
        let tree = SyntaxTree::parse("f(ARRAY[c1, c2])").unwrap();
        let call = find_functions(&tree, tree.root())[0];
        let args = crate::parser::walk::function_arguments(&tree, call);
        assert_eq!(
            container_columns(&tree, args[1]),
            vec!["c1".to_string(), "c2".to_string()]
        );
    }

    #[test]
    fn container_columns_reads_a_single_column_bracket() {
        let tree = SyntaxTree::parse("f(ARRAY[c1])").unwrap();
        let call = find_functions(&tree, tree.root())[0];
        let args = crate::parser::walk::function_arguments(&tree, call);
        assert_eq!(container_columns(&tree, args[1]), vec!["c1".to_string()]);
    }

    #[test]
    fn empty_brackets_yield_no_columns() {
        let tree = SyntaxTree::parse("f(ARRAY[])").unwrap();
        let call = find_functions(&tree, tree.root())[0];
        let args = crate::parser::walk::function_arguments(&tree, call);
        assert!(container_columns(&tree, args[1]).is_empty());
    }
}
