use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::parser::tree::{NodeId, SyntaxTree};
use crate::parser::walk::find_functions;

/// The recognized layer verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// `layer.train(...)` — train a model on source rows.
    Train,
    /// `layer.predict(...)` — score source rows with a named model.
    Predict,
    /// `layer.automl(...)` — fit an automatically selected model.
    AutoMl,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Train => write!(f, "train"),
            Verb::Predict => write!(f, "predict"),
            Verb::AutoMl => write!(f, "automl"),
        }
    }
}

/// True iff the call's immediate parent is a dotted identifier whose first
/// token is literally `layer` (case-sensitive).
pub fn is_layer_call(tree: &SyntaxTree, call: NodeId) -> bool {
    let Some(parent) = tree.parent(call) else {
        return false;
    };
    if !tree.is_identifier(parent) {
        return false;
    }
    tree.children(parent)
        .first()
        .is_some_and(|&first| tree.is_name(first) && tree.text(first) == "layer")
}

/// First layer call under `node`, depth-first, left to right.
pub fn locate_layer_call(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    find_functions(tree, node)
        .into_iter()
        .find(|&call| is_layer_call(tree, call))
}

/// Classify a layer call's verb; any verb outside the supported set is a
/// hard error naming it.
pub fn classify_verb(tree: &SyntaxTree, call: NodeId) -> Result<Verb, ParseError> {
    let name = tree
        .function_name(call)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match name.as_str() {
        "train" => Ok(Verb::Train),
        "predict" => Ok(Verb::Predict),
        "automl" => Ok(Verb::AutoMl),
        other => Err(ParseError::UnsupportedFunction(other.to_string())),
    }
}
