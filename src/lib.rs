//! Recognize `layer.train` / `layer.predict` / `layer.automl` calls embedded
//! in `CREATE OR REPLACE TABLE ... AS (SELECT ...)` statements and extract
//! them into structured commands for an external executor.
#![warn(missing_docs)]

/// Layer-call detection and verb classification.
pub mod classifier;
/// Parse error kinds surfaced to the caller.
pub mod error;
/// Per-verb command extraction and fetch-SQL rebuilding.
pub mod extractor;
/// SQL lexing and the arena syntax tree.
pub mod parser;

pub use classifier::layer_call::Verb;
pub use error::ParseError;
pub use extractor::command::{AutoMlCommand, LayerCommand, PredictCommand, TrainCommand};
pub use extractor::parse_layer_sql;
