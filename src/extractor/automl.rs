use crate::classifier::layer_call::Verb;
use crate::error::ParseError;
use crate::extractor::command::AutoMlCommand;
use crate::extractor::fragment::SelectFragment;
use crate::extractor::rebuild::{build_sql, format_sql};
use crate::extractor::{container_columns, invalid_call};
use crate::parser::lexer::unquote;
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::function_arguments;

/// Extract an [`AutoMlCommand`] from a classified `layer.automl(...)` call.
///
/// Expected argument shape: `("model_type", ARRAY[features...], target)`.
pub fn extract_automl(
    tree: &SyntaxTree,
    call: NodeId,
    fragment: &SelectFragment,
    target_name: String,
) -> Result<AutoMlCommand, ParseError> {
    let (source_name, trailing) = fragment.from_where()?;

    let arguments = function_arguments(tree, call);
    if arguments.len() < 4 {
        return Err(invalid_call(tree, Verb::AutoMl, &arguments));
    }
    let model_type = unquote(&tree.text(arguments[0])).to_string();
    let feature_columns = container_columns(tree, arguments[2]);
    if feature_columns.is_empty() {
        return Err(invalid_call(tree, Verb::AutoMl, &arguments));
    }
    let target_column = unquote(&tree.text(arguments[3])).to_string();

    // Fetch columns: features then the target, deduplicated by value with
    // the first occurrence winning.
    let mut all_columns: Vec<String> = Vec::with_capacity(feature_columns.len() + 1);
    for column in feature_columns.iter().chain(std::iter::once(&target_column)) {
        if !all_columns.contains(column) {
            all_columns.push(column.clone());
        }
    }
    let sql = format_sql(&build_sql(&all_columns, &source_name, &trailing))?;

    Ok(AutoMlCommand {
        source_name,
        target_name,
        model_type,
        feature_columns,
        target_column,
        sql,
    })
}
