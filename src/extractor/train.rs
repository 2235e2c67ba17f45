use crate::classifier::layer_call::Verb;
use crate::error::ParseError;
use crate::extractor::command::TrainCommand;
use crate::extractor::fragment::SelectFragment;
use crate::extractor::{container_columns, invalid_call};
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::function_arguments;

/// Sentinel meaning "all columns from source".
const ALL_COLUMNS: &str = "*";

/// Extract a [`TrainCommand`] from a classified `layer.train(...)` call.
pub fn extract_train(
    tree: &SyntaxTree,
    call: NodeId,
    fragment: &SelectFragment,
    target_name: String,
) -> Result<TrainCommand, ParseError> {
    let (source_name, _trailing) = fragment.from_where()?;
    let arguments = function_arguments(tree, call);
    let train_columns = train_columns(tree, &arguments)?;
    Ok(TrainCommand {
        source_name,
        target_name,
        train_columns,
    })
}

/// Column selection rules: no arguments or a lone `*` mean all columns;
/// `ARRAY[...]` lists columns in call order; anything else is taken as one
/// column token.
fn train_columns(tree: &SyntaxTree, arguments: &[NodeId]) -> Result<Vec<String>, ParseError> {
    if arguments.is_empty() {
        return Ok(vec![ALL_COLUMNS.to_string()]);
    }
    if arguments.len() == 1 && tree.is_wildcard(arguments[0]) {
        return Ok(vec![ALL_COLUMNS.to_string()]);
    }
    if tree.is_keyword(arguments[0], "array") {
        let container = arguments
            .get(1)
            .copied()
            .filter(|&node| tree.is_brackets(node))
            .ok_or_else(|| invalid_call(tree, Verb::Train, arguments))?;
        let columns = container_columns(tree, container);
        if columns.is_empty() {
            return Err(invalid_call(tree, Verb::Train, arguments));
        }
        return Ok(columns);
    }
    Ok(vec![tree.text(arguments[0]).trim().to_string()])
}
