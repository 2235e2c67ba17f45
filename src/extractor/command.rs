use serde::{Deserialize, Serialize};

use crate::classifier::layer_call::Verb;

/// A parsed `layer.train(...)` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainCommand {
    /// Relation referenced in the `FROM` clause.
    pub source_name: String,
    /// Table being created or replaced.
    pub target_name: String,
    /// Feature columns in call order, or the single `"*"` sentinel for all
    /// columns of the source. Never empty.
    pub train_columns: Vec<String>,
}

/// A parsed `layer.predict(...)` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictCommand {
    /// Relation referenced in the `FROM` clause.
    pub source_name: String,
    /// Table being created or replaced.
    pub target_name: String,
    /// Model reference passed as the first call argument, quotes stripped.
    pub model_name: String,
    /// Non-layer columns of the outer `SELECT`, in source order.
    pub select_columns: Vec<String>,
    /// Columns passed to the call, in call order. Never empty.
    pub predict_columns: Vec<String>,
    /// Alias of the call itself, or `"prediction"` when none was given.
    pub prediction_alias: String,
    /// Rebuilt, executable fetch statement covering `select_columns` plus
    /// any `predict_columns` not already selected.
    pub sql: String,
}

/// A parsed `layer.automl(...)` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMlCommand {
    /// Relation referenced in the `FROM` clause.
    pub source_name: String,
    /// Table being created or replaced.
    pub target_name: String,
    /// Model type passed as the first call argument, quotes stripped.
    pub model_type: String,
    /// Feature columns in call order.
    pub feature_columns: Vec<String>,
    /// Label column, quotes stripped.
    pub target_column: String,
    /// Rebuilt, executable fetch statement covering features and target.
    pub sql: String,
}

/// One recognized embedded layer call, ready for the execution dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerCommand {
    /// `layer.train(...)`
    Train(TrainCommand),
    /// `layer.predict(...)`
    Predict(PredictCommand),
    /// `layer.automl(...)`
    AutoMl(AutoMlCommand),
}

impl LayerCommand {
    /// The verb this command was parsed from.
    pub fn verb(&self) -> Verb {
        match self {
            LayerCommand::Train(_) => Verb::Train,
            LayerCommand::Predict(_) => Verb::Predict,
            LayerCommand::AutoMl(_) => Verb::AutoMl,
        }
    }

    /// Relation read by this command.
    pub fn source_name(&self) -> &str {
        match self {
            LayerCommand::Train(c) => &c.source_name,
            LayerCommand::Predict(c) => &c.source_name,
            LayerCommand::AutoMl(c) => &c.source_name,
        }
    }

    /// Table written by this command.
    pub fn target_name(&self) -> &str {
        match self {
            LayerCommand::Train(c) => &c.target_name,
            LayerCommand::Predict(c) => &c.target_name,
            LayerCommand::AutoMl(c) => &c.target_name,
        }
    }
}
