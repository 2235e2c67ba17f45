use crate::classifier::layer_call::{locate_layer_call, Verb};
use crate::error::ParseError;
use crate::extractor::command::PredictCommand;
use crate::extractor::fragment::SelectFragment;
use crate::extractor::rebuild::{build_sql, format_sql};
use crate::extractor::{container_columns, invalid_call};
use crate::parser::lexer::unquote;
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::function_arguments;

/// Default alias for the prediction column when the call carries none.
const DEFAULT_PREDICTION_ALIAS: &str = "prediction";

/// Extract a [`PredictCommand`] from a classified `layer.predict(...)` call.
///
/// The select list and `FROM` clause come from the re-parsed fragment; the
/// model name, predict columns, and alias come from the call node in the
/// outer tree.
pub fn extract_predict(
    tree: &SyntaxTree,
    call: NodeId,
    fragment: &SelectFragment,
    target_name: String,
) -> Result<PredictCommand, ParseError> {
    let (source_name, trailing) = fragment.from_where()?;

    let list = fragment.select_list().ok_or_else(|| {
        ParseError::InvalidSqlSyntax("select columns are missing".to_string())
    })?;
    let inner = fragment.tree();
    // Source order, deduplicated by value with the first occurrence winning.
    let mut select_columns: Vec<String> = Vec::new();
    for item in inner.list_items(list) {
        if !inner.is_identifier(item) || locate_layer_call(inner, item).is_some() {
            continue;
        }
        let column = inner.text(item).trim().to_string();
        if !select_columns.contains(&column) {
            select_columns.push(column);
        }
    }

    let arguments = function_arguments(tree, call);
    if arguments.len() < 3 {
        return Err(invalid_call(tree, Verb::Predict, &arguments));
    }
    let model_name = unquote(&tree.text(arguments[0])).to_string();
    let predict_columns = container_columns(tree, arguments[2]);
    if predict_columns.is_empty() {
        return Err(invalid_call(tree, Verb::Predict, &arguments));
    }

    let prediction_alias = tree
        .parent(call)
        .and_then(|parent| tree.alias(parent))
        .unwrap_or_else(|| DEFAULT_PREDICTION_ALIAS.to_string());

    // Fetch columns: the select list first, then any predict column not
    // already in it, first occurrence wins.
    let mut all_columns = select_columns.clone();
    for column in &predict_columns {
        if !all_columns.contains(column) {
            all_columns.push(column.clone());
        }
    }
    let sql = format_sql(&build_sql(&all_columns, &source_name, &trailing))?;

    Ok(PredictCommand {
        source_name,
        target_name,
        model_name,
        select_columns,
        predict_columns,
        prediction_alias,
        sql,
    })
}
